
mod builder;
mod items;
mod types;
mod api;
mod pda;
mod error;

pub use api::{build_table, validate, Grammar};
pub use error::{ParseError, TableError};
pub use pda::{Lexeme, Step, PDA};
pub use types::{Action, Production, Symbol, Table};
