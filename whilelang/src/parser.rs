
use lazy_static::lazy_static;
use log::debug;
use thiserror::Error;

use automata::location::{locate, Location};
use automata::parser::{self as pda, build_table, Step, Table, PDA};

use crate::ast::{Node, NodeKind};
use crate::grammar::{fixed_table, grammar, NonTerminal, PRODUCTIONS};
use crate::lexer::{tokenize, LexError};
use crate::token::{Token, TokenKind};

pub type ParseError = pda::ParseError<TokenKind>;
pub type TableError = pda::TableError<TokenKind, NonTerminal>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl Error {
    /*
     * Where in `input` the error is, when it can be told.
     */
    pub fn location(&self, input: &str) -> Option<Location> {
        match self {
            Error::Lex(e) => Some(e.location(input)),
            Error::Parse(ParseError::UnexpectedToken { position, .. }) => Some(locate(input, *position)),
            Error::Parse(ParseError::UnterminatedInput { .. }) => None,
        }
    }
}

/*
 * A parser owns an automaton; it is immutable and can be shared
 * between threads.
 */
pub struct Parser {
    table: Table<TokenKind, NonTerminal>,
}

impl Parser {
    // Runs the fixed, hand-checked table.
    pub fn new() -> Parser {
        Parser { table: fixed_table() }
    }

    // Runs the canonical LR(1) table built from the grammar.
    pub fn generated() -> Result<Parser, TableError> {
        let table = build_table(&grammar())?;
        Ok(Parser { table })
    }

    pub fn table(&self) -> &Table<TokenKind, NonTerminal> {
        &self.table
    }

    /*
     * The tokens that would have been accepted in the given state.
     */
    pub fn expected(&self, state: usize) -> Vec<TokenKind> {
        self.table.expected(state)
    }

    fn pda(&self) -> PDA<'_, TokenKind, NonTerminal, Node> {
        PDA::new(&self.table, PRODUCTIONS)
    }

    pub fn parse(&self, tokens: &[Token]) -> Result<Node, ParseError> {
        self.parse_observed(tokens, &mut |_| ())
    }

    pub fn parse_observed(
        &self,
        tokens: &[Token],
        observe: &mut dyn FnMut(Step<TokenKind, NonTerminal>),
    ) -> Result<Node, ParseError> {
        debug!("parsing {} tokens", tokens.len());
        self.pda().parse_observed(
            tokens,
            &|token: &Token| Node::leaf(NodeKind::Token, token.text.as_str()),
            observe,
        )
    }

    pub fn parse_str(&self, input: &str) -> Result<Node, Error> {
        let tokens = tokenize(input)?;
        Ok(self.parse(&tokens)?)
    }
}

impl Default for Parser {
    fn default() -> Self {
        Parser::new()
    }
}

lazy_static! {
    static ref PARSER: Parser = Parser::new();
}

pub fn parse(tokens: &[Token]) -> Result<Node, ParseError> {
    PARSER.parse(tokens)
}

pub fn parse_str(input: &str) -> Result<Node, Error> {
    PARSER.parse_str(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_loop() {
        let _ = env_logger::builder().is_test(true).try_init();
        let program = parse_str("while (x < V) y := I done").unwrap();
        assert_eq!(
            program.to_string(),
            "Program\n\
             \x20 StatementList\n\
             \x20   WhileLoop\n\
             \x20     Condition\n\
             \x20       Identifier (x)\n\
             \x20       RelOp (<)\n\
             \x20       RomanNumeral (V)\n\
             \x20     Assignment\n\
             \x20       LValue (y)\n\
             \x20       RomanNumeral (I)\n"
        );
    }

    #[test]
    fn lex_errors_come_first() {
        assert_eq!(
            parse_str("while (x @ V) y := I done"),
            Err(Error::Lex(LexError { character: '@', position: 9 }))
        );
    }

    #[test]
    fn error_locations() {
        let input = "while (x < V)\ny := I";
        let err = parse_str(input).unwrap_err();
        assert_eq!(err.location(input).map(|l| (l.line, l.column)), Some((2, 7)));
    }

    #[test]
    fn tokens_without_end_marker() {
        let mut tokens = tokenize("while").unwrap();
        tokens.pop();
        assert_eq!(parse(&tokens), Err(ParseError::UnterminatedInput { state: 3 }));
    }

    #[test]
    fn input_after_end_marker() {
        let mut tokens = tokenize("while (x < V) y := I done").unwrap();
        tokens.push(Token::new(TokenKind::Semicolon, ";", 26));
        tokens.push(Token::new(TokenKind::Done, "done", 27));
        tokens.push(Token::new(TokenKind::EndOfInput, "", 31));
        assert_eq!(
            parse(&tokens),
            Err(ParseError::UnexpectedToken { kind: TokenKind::Semicolon, state: 1, position: 26 })
        );
    }

    #[test]
    fn expected_tokens() {
        let parser = Parser::new();
        match parser.parse_str("while (x <> V) y := I done") {
            Err(Error::Parse(ParseError::UnexpectedToken { state, .. })) => {
                assert_eq!(parser.expected(state), vec![TokenKind::Identifier, TokenKind::RomanNumeral]);
            },
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn parsers_are_shareable() {
        fn assert_sync<S: Sync + Send>() {}
        assert_sync::<Parser>();
    }
}
