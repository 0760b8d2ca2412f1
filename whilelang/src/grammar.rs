
//! The grammar of the language and its LALR(1) automaton:
//!
//! ```text
//! 0  Start         -> Program $
//! 1  Program       -> StatementList
//! 2  StatementList -> Statement
//! 3  StatementList -> StatementList ; Statement
//! 4  Statement     -> while ( Condition ) Body done
//! 5  Condition     -> Expression RelOp Expression
//! 6  Body          -> Assignment
//! 7  Assignment    -> id := Expression
//! 8  Expression    -> id
//! 9  Expression    -> roman
//! 10 RelOp         -> <
//! 11 RelOp         -> >
//! 12 RelOp         -> =
//! ```

use std::convert::TryInto;

use automata::parser::{Action, Grammar, Production, Symbol, Table};

use crate::ast::{Node, NodeKind};
use crate::token::TokenKind;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum NonTerminal {
    Start,
    Program,
    StatementList,
    Statement,
    Condition,
    RelOp,
    Body,
    Assignment,
    Expression,
}

pub const NONTERMINALS: [NonTerminal; 9] = [
    NonTerminal::Start,
    NonTerminal::Program,
    NonTerminal::StatementList,
    NonTerminal::Statement,
    NonTerminal::Condition,
    NonTerminal::RelOp,
    NonTerminal::Body,
    NonTerminal::Assignment,
    NonTerminal::Expression,
];

pub type Rule = Production<TokenKind, NonTerminal, Node>;

use self::NonTerminal as N;
use crate::token::TokenKind as T;

const fn t(kind: TokenKind) -> Symbol<TokenKind, NonTerminal> {
    Symbol::T(kind)
}

const fn n(nterm: NonTerminal) -> Symbol<TokenKind, NonTerminal> {
    Symbol::N(nterm)
}

pub const PRODUCTIONS: &[Rule] = &[
    Production { lhs: N::Start, rhs: &[n(N::Program), t(T::EndOfInput)], build: start },
    Production { lhs: N::Program, rhs: &[n(N::StatementList)], build: program },
    Production { lhs: N::StatementList, rhs: &[n(N::Statement)], build: statement_list },
    Production {
        lhs: N::StatementList,
        rhs: &[n(N::StatementList), t(T::Semicolon), n(N::Statement)],
        build: append_statement,
    },
    Production {
        lhs: N::Statement,
        rhs: &[t(T::While), t(T::LParen), n(N::Condition), t(T::RParen), n(N::Body), t(T::Done)],
        build: while_loop,
    },
    Production {
        lhs: N::Condition,
        rhs: &[n(N::Expression), n(N::RelOp), n(N::Expression)],
        build: condition,
    },
    Production { lhs: N::Body, rhs: &[n(N::Assignment)], build: body },
    Production {
        lhs: N::Assignment,
        rhs: &[t(T::Identifier), t(T::Assign), n(N::Expression)],
        build: assignment,
    },
    Production { lhs: N::Expression, rhs: &[t(T::Identifier)], build: identifier },
    Production { lhs: N::Expression, rhs: &[t(T::RomanNumeral)], build: roman_numeral },
    Production { lhs: N::RelOp, rhs: &[t(T::Less)], build: rel_op },
    Production { lhs: N::RelOp, rhs: &[t(T::Greater)], build: rel_op },
    Production { lhs: N::RelOp, rhs: &[t(T::Equal)], build: rel_op },
];

/*
 * The driver always hands a builder as many children as its
 * production has symbols; anything else is a bug in the tables.
 */
fn take<const K: usize>(rule: &str, children: Vec<Node>) -> [Node; K] {
    match children.try_into() {
        Ok(children) => children,
        Err(children) => {
            let children: Vec<Node> = children;
            panic!("malformed stack: {} expects {} children, got {}", rule, K, children.len())
        },
    }
}

// Accepting leaves `Program` on the stack, so rule 0 is never reduced.
fn start(_: Vec<Node>) -> Node {
    panic!("malformed automaton: reduction by the start rule")
}

fn program(children: Vec<Node>) -> Node {
    let [list] = take::<1>("Program", children);
    Node::internal(NodeKind::Program, vec![list])
}

fn statement_list(children: Vec<Node>) -> Node {
    let [statement] = take::<1>("StatementList", children);
    Node::internal(NodeKind::StatementList, vec![statement])
}

// The list stays flat: one child per statement.
fn append_statement(children: Vec<Node>) -> Node {
    let [list, _, statement] = take::<3>("StatementList", children);
    let mut statements = list.children;
    statements.push(statement);
    Node::internal(NodeKind::StatementList, statements)
}

fn while_loop(children: Vec<Node>) -> Node {
    let [_, _, condition, _, body, _] = take::<6>("Statement", children);
    Node::internal(NodeKind::WhileLoop, vec![condition, body])
}

fn condition(children: Vec<Node>) -> Node {
    let [left, op, right] = take::<3>("Condition", children);
    Node::internal(NodeKind::Condition, vec![left, op, right])
}

fn body(children: Vec<Node>) -> Node {
    let [assignment] = take::<1>("Body", children);
    assignment
}

fn assignment(children: Vec<Node>) -> Node {
    let [target, _, value] = take::<3>("Assignment", children);
    Node::internal(NodeKind::Assignment, vec![
        Node::leaf(NodeKind::LValue, target.into_text()),
        value,
    ])
}

fn identifier(children: Vec<Node>) -> Node {
    let [token] = take::<1>("Expression", children);
    Node::leaf(NodeKind::Identifier, token.into_text())
}

fn roman_numeral(children: Vec<Node>) -> Node {
    let [token] = take::<1>("Expression", children);
    Node::leaf(NodeKind::RomanNumeral, token.into_text())
}

fn rel_op(children: Vec<Node>) -> Node {
    let [token] = take::<1>("RelOp", children);
    Node::leaf(NodeKind::RelOp, token.into_text())
}

pub fn grammar() -> Grammar<'static, TokenKind, NonTerminal, Node> {
    Grammar {
        terminals: &TokenKind::ALL,
        nonterminals: &NONTERMINALS,
        productions: PRODUCTIONS,
        end: TokenKind::EndOfInput,
    }
}

pub const ACCEPTING_STATE: usize = 1;

/*
 * The fixed LALR(1) table of the grammar above.
 * Rows are `(state, entries)`, in state order.
 */
pub fn fixed_table() -> Table<TokenKind, NonTerminal> {
    use automata::parser::Action::{Accept, Reduce as R, Shift as S};

    // Reductions of a complete Expression (8, 9) happen on anything
    // that may follow an operand.
    const AFTER_OPERAND: [TokenKind; 5] = [T::Less, T::Greater, T::Equal, T::RParen, T::Done];

    let reduce_expression = |p: usize| -> Vec<(TokenKind, Action)> {
        AFTER_OPERAND.iter().map(|k| (*k, R(p))).collect()
    };
    let state_8 = reduce_expression(8);
    let state_9 = reduce_expression(9);

    Table::from_rows(
        &[
            (0, &[(T::While, S(3))]),
            (1, &[(T::EndOfInput, Accept)]),
            (2, &[(T::EndOfInput, R(1)), (T::Semicolon, S(5))]),
            (3, &[(T::LParen, S(6))]),
            (4, &[(T::EndOfInput, R(2)), (T::Semicolon, R(2))]),
            (5, &[(T::While, S(3))]),
            (6, &[(T::Identifier, S(8)), (T::RomanNumeral, S(9))]),
            (7, &[(T::EndOfInput, R(3)), (T::Semicolon, R(3))]),
            (8, state_8.as_slice()),
            (9, state_9.as_slice()),
            (10, &[(T::RParen, S(12))]),
            (11, &[(T::Less, S(13)), (T::Greater, S(14)), (T::Equal, S(15))]),
            (12, &[(T::Identifier, S(17))]),
            (13, &[(T::Identifier, R(10)), (T::RomanNumeral, R(10))]),
            (14, &[(T::Identifier, R(11)), (T::RomanNumeral, R(11))]),
            (15, &[(T::Identifier, R(12)), (T::RomanNumeral, R(12))]),
            (16, &[(T::Identifier, S(8)), (T::RomanNumeral, S(9))]),
            (17, &[(T::Assign, S(21))]),
            (18, &[(T::Done, S(22))]),
            (19, &[(T::Done, R(6))]),
            (20, &[(T::RParen, R(5))]),
            (21, &[(T::Identifier, S(8)), (T::RomanNumeral, S(9))]),
            (22, &[(T::EndOfInput, R(4)), (T::Semicolon, R(4))]),
            (23, &[(T::Done, R(7))]),
        ],
        &[
            (0, &[(N::Program, 1), (N::StatementList, 2), (N::Statement, 4)]),
            (5, &[(N::Statement, 7)]),
            (6, &[(N::Condition, 10), (N::Expression, 11)]),
            (11, &[(N::RelOp, 16)]),
            (12, &[(N::Body, 18), (N::Assignment, 19)]),
            (16, &[(N::Expression, 20)]),
            (21, &[(N::Expression, 23)]),
        ],
    )
}
