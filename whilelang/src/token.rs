
use std::fmt;

use automata::parser::Lexeme;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum TokenKind {
    While,
    Done,
    Semicolon,
    LParen,
    RParen,
    Identifier,
    RomanNumeral,
    Assign,
    Less,
    Greater,
    Equal,
    EndOfInput,
}

impl TokenKind {
    pub const ALL: [TokenKind; 12] = [
        TokenKind::While,
        TokenKind::Done,
        TokenKind::Semicolon,
        TokenKind::LParen,
        TokenKind::RParen,
        TokenKind::Identifier,
        TokenKind::RomanNumeral,
        TokenKind::Assign,
        TokenKind::Less,
        TokenKind::Greater,
        TokenKind::Equal,
        TokenKind::EndOfInput,
    ];

    /*
     * The fixed spelling of keywords and punctuation, None for
     * the kinds whose text varies.
     */
    pub fn spelling(self) -> Option<&'static str> {
        match self {
            TokenKind::While => Some("while"),
            TokenKind::Done => Some("done"),
            TokenKind::Semicolon => Some(";"),
            TokenKind::LParen => Some("("),
            TokenKind::RParen => Some(")"),
            TokenKind::Assign => Some(":="),
            TokenKind::Less => Some("<"),
            TokenKind::Greater => Some(">"),
            TokenKind::Equal => Some("="),
            TokenKind::EndOfInput => Some(""),
            TokenKind::Identifier | TokenKind::RomanNumeral => None,
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    // Byte offset of the first character.
    pub position: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, position: usize) -> Token {
        Token { kind, text: text.into(), position }
    }
}

impl Lexeme for Token {
    type Kind = TokenKind;

    fn kind(&self) -> TokenKind {
        self.kind
    }

    fn position(&self) -> usize {
        self.position
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?} {:?} @{}", self.kind, self.text, self.position)
    }
}
