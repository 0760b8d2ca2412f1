
use log::{debug, trace};
use thiserror::Error;

use automata::location::{locate, Location};

use crate::token::{Token, TokenKind};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unexpected character '{character}' at position {position}")]
pub struct LexError {
    pub character: char,
    pub position: usize,
}

impl LexError {
    pub fn location(&self, input: &str) -> Location {
        locate(input, self.position)
    }
}

const KEYWORDS: [TokenKind; 2] = [TokenKind::While, TokenKind::Done];

fn punctuation(c: char) -> Option<TokenKind> {
    match c {
        ';' => Some(TokenKind::Semicolon),
        '(' => Some(TokenKind::LParen),
        ')' => Some(TokenKind::RParen),
        '<' => Some(TokenKind::Less),
        '>' => Some(TokenKind::Greater),
        '=' => Some(TokenKind::Equal),
        _ => None,
    }
}

pub fn is_roman(word: &str) -> bool {
    !word.is_empty() && word.chars().all(|c| matches!(c, 'I' | 'V' | 'X'))
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Lexer {
            input,
            pos: 0,
            tokens: Vec::new(),
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn push(&mut self, kind: TokenKind, len: usize) {
        let text = &self.input[self.pos..self.pos + len];
        trace!("{:?} {:?} at {}", kind, text, self.pos);
        self.tokens.push(Token::new(kind, text, self.pos));
        self.pos += len;
    }

    /*
     * Keywords are matched as prefixes, before any identifier:
     * "whilex" is `while` followed by `x`.
     */
    fn keyword(&self) -> Option<(TokenKind, usize)> {
        KEYWORDS.iter()
            .filter_map(|kind| kind.spelling().map(|s| (*kind, s)))
            .find(|(_, s)| self.rest().starts_with(s))
            .map(|(kind, s)| (kind, s.len()))
    }

    fn word_len(&self) -> usize {
        let rest = self.rest();
        rest.find(|c: char| !c.is_ascii_alphanumeric()).unwrap_or(rest.len())
    }

    fn run(mut self) -> Result<Vec<Token>, LexError> {
        while let Some(c) = self.rest().chars().next() {
            if c.is_whitespace() {
                self.pos += c.len_utf8();
            } else if let Some((kind, len)) = self.keyword() {
                self.push(kind, len);
            } else if let Some(kind) = punctuation(c) {
                self.push(kind, 1);
            } else if self.rest().starts_with(":=") {
                self.push(TokenKind::Assign, 2);
            } else if c.is_ascii_alphabetic() {
                let len = self.word_len();
                let kind = if is_roman(&self.rest()[..len]) {
                    TokenKind::RomanNumeral
                } else {
                    TokenKind::Identifier
                };
                self.push(kind, len);
            } else {
                debug!("invalid character {:?} at {}", c, self.pos);
                return Err(LexError { character: c, position: self.pos })
            }
        }

        self.push(TokenKind::EndOfInput, 0);
        Ok(self.tokens)
    }
}

/*
 * Splits `input` into tokens, the last one being the only
 * `EndOfInput`. Stops at the first invalid character.
 */
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(input).run()
}
