
pub mod ast;
pub mod grammar;
pub mod lexer;
pub mod parser;
pub mod token;

pub use ast::{Node, NodeKind};
pub use lexer::{tokenize, LexError};
pub use parser::{parse, parse_str, Error, ParseError, Parser};
pub use token::{Token, TokenKind};
