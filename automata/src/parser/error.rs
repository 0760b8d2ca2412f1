
use std::fmt::Debug;

use thiserror::Error;

/*
 * The input is not derivable in the grammar. These are the only
 * failures the driver reports as values: inconsistencies of the
 * table itself are bugs and panic.
 */
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError<T: Debug> {
    #[error("unexpected token {kind:?} at position {position} (automaton state {state})")]
    UnexpectedToken {
        kind: T,
        state: usize,
        position: usize,
    },
    #[error("input ended without an end-of-input token (automaton state {state})")]
    UnterminatedInput { state: usize },
}

impl<T: Debug> ParseError<T> {
    pub fn state(&self) -> usize {
        match self {
            ParseError::UnexpectedToken { state, .. } => *state,
            ParseError::UnterminatedInput { state } => *state,
        }
    }
}

/*
 * Static defects found while building or checking a table.
 */
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TableError<T: Debug, N: Debug> {
    #[error("conflict in state {state} on {term:?}: {first} / {second}")]
    Conflict {
        state: usize,
        term: T,
        first: String,
        second: String,
    },
    #[error("state {state} shifts {term:?} to missing state {target}")]
    DanglingShift { state: usize, term: T, target: usize },
    #[error("state {state} reduces {term:?} by missing production {production}")]
    DanglingReduce { state: usize, term: T, production: usize },
    #[error("state {state} goes to missing state {target} on {nterm:?}")]
    DanglingGoto { state: usize, nterm: N, target: usize },
    #[error("state {state} has no action")]
    DeadState { state: usize },
    #[error("expected exactly one accepting entry, found {count}")]
    AcceptCount { count: usize },
    #[error("state {state} accepts on {term:?}, which is not the end marker")]
    AcceptOnToken { state: usize, term: T },
    #[error("unknown {what} {name}")]
    UnknownSymbol { what: &'static str, name: String },
}
