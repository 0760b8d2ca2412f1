
use std::fmt::{self, Debug};

use log::{debug, trace};

use super::error::ParseError;
use super::types::*;

/*
 * What the driver needs to know about an input token.
 */
pub trait Lexeme {
    type Kind: Copy + Ord + Debug;

    fn kind(&self) -> Self::Kind;

    // Used to locate errors.
    fn position(&self) -> usize;
}

/*
 * One move of the automaton, as reported to observers.
 */
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Step<T, N> {
    Shift { state: usize, kind: T, target: usize },
    Reduce { state: usize, kind: T, production: usize, lhs: N, from: usize, target: usize },
    Accept { state: usize },
}

impl<T: Debug, N: Debug> fmt::Display for Step<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Step::Shift { state, kind, target } =>
                write!(f, "{:>3}: shift {:?}, go to {}", state, kind, target),
            Step::Reduce { state, kind, production, lhs, from, target } =>
                write!(f, "{:>3}: reduce by {} on {:?}, {:?} from {} goes to {}",
                    state, production, kind, lhs, from, target),
            Step::Accept { state } => write!(f, "{:>3}: accept", state),
        }
    }
}

/*
 * A shift-reduce automaton: a table and the productions its reduce
 * actions refer to. It holds no parsing state, so the same PDA can
 * run any number of parses, concurrently if need be.
 */
pub struct PDA<'a, T: 'static, N: 'static, V> {
    table: &'a Table<T, N>,
    rules: &'a [Production<T, N, V>],
}

fn top(states: &[usize]) -> usize {
    match states.last() {
        Some(q) => *q,
        None => panic!("malformed stack: the state stack is empty, this is a bug !"),
    }
}

impl<'a, T, N, V> PDA<'a, T, N, V>
    where T: Copy + Ord + Debug + 'static,
          N: Copy + Ord + Debug + 'static,
{
    pub fn new(table: &'a Table<T, N>, rules: &'a [Production<T, N, V>]) -> PDA<'a, T, N, V> {
        PDA { table, rules }
    }

    /*
     * Runs the automaton over `tokens`, which should end with the end
     * marker. Tokens left after the accepted end marker are rejected.
     * `shift` turns a consumed token into a value (a leaf).
     *
     * Invariant: `states.len() == values.len() + 1` between steps, the
     * bottom of `states` being the initial state 0.
     */
    pub fn parse<L>(&self, tokens: &[L], shift: &dyn Fn(&L) -> V) -> Result<V, ParseError<T>>
        where L: Lexeme<Kind = T>
    {
        self.parse_observed(tokens, shift, &mut |_| ())
    }

    /*
     * Same as `parse`, reporting every move to `observe`.
     */
    pub fn parse_observed<L>(
        &self,
        tokens: &[L],
        shift: &dyn Fn(&L) -> V,
        observe: &mut dyn FnMut(Step<T, N>),
    ) -> Result<V, ParseError<T>>
        where L: Lexeme<Kind = T>
    {
        let mut states: Vec<usize> = vec![0];
        let mut values: Vec<V> = Vec::new();
        let mut cursor = 0;

        loop {
            let state = top(&states);
            let token = match tokens.get(cursor) {
                Some(token) => token,
                None => {
                    debug!("ran out of tokens in state {}", state);
                    return Err(ParseError::UnterminatedInput { state })
                }
            };
            let kind = token.kind();

            let action = match self.table.action(state, kind) {
                Some(Some(action)) => action,
                Some(None) => {
                    debug!("rejecting {:?} at {} in state {}", kind, token.position(), state);
                    return Err(ParseError::UnexpectedToken {
                        kind,
                        state,
                        position: token.position(),
                    })
                },
                None => panic!("malformed automaton: state {} does not exist", state),
            };

            match action {
                Action::Shift(q) => {
                    let step = Step::Shift { state, kind, target: q };
                    trace!("{}", step);
                    observe(step);
                    states.push(q);
                    values.push(shift(token));
                    cursor += 1;
                },
                Action::Reduce(rule_id) => {
                    let rule = match self.rules.get(rule_id) {
                        Some(rule) => rule,
                        None => panic!("malformed automaton: production {} does not exist", rule_id),
                    };
                    let len = rule.rhs_len();
                    if values.len() < len {
                        panic!(
                            "malformed stack: cannot pop {} symbols from {} for {}",
                            len, values.len(), rule
                        );
                    }

                    // `split_off` keeps the children in their left-to-right order.
                    let children = values.split_off(values.len() - len);
                    states.truncate(states.len() - len);
                    let built = (rule.build)(children);

                    let from = top(&states);
                    let q = match self.table.goto(from, rule.lhs) {
                        Some(q) => q,
                        None => panic!(
                            "malformed automaton: no goto from state {} on {:?}",
                            from, rule.lhs
                        ),
                    };
                    let step = Step::Reduce { state, kind, production: rule_id, lhs: rule.lhs, from, target: q };
                    trace!("{} ({})", step, rule);
                    observe(step);
                    values.push(built);
                    states.push(q);
                },
                Action::Accept => {
                    if values.len() != 1 {
                        panic!("malformed stack: {} values left on accept", values.len());
                    }
                    // The end marker must be the last token.
                    if let Some(extra) = tokens.get(cursor + 1) {
                        debug!("rejecting {:?} at {} past the end marker", extra.kind(), extra.position());
                        return Err(ParseError::UnexpectedToken {
                            kind: extra.kind(),
                            state,
                            position: extra.position(),
                        })
                    }
                    debug!("accepted {} tokens", cursor + 1);
                    observe(Step::Accept { state });
                    return match values.pop() {
                        Some(root) => Ok(root),
                        None => unreachable!(),
                    }
                },
            }

            debug_assert_eq!(states.len(), values.len() + 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // A tiny grammar, S -> ( S ) | x, building the nesting depth.
    #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
    enum Term { Open, Close, X, Eof }

    #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
    enum Nterm { Start, S }

    struct Tok(Term, usize);

    impl Lexeme for Tok {
        type Kind = Term;
        fn kind(&self) -> Term { self.0 }
        fn position(&self) -> usize { self.1 }
    }

    fn rules() -> Vec<Production<Term, Nterm, usize>> {
        vec![
            Production { lhs: Nterm::Start, rhs: &[Symbol::N(Nterm::S), Symbol::T(Term::Eof)], build: |mut c| c.remove(0) },
            Production { lhs: Nterm::S, rhs: &[Symbol::T(Term::Open), Symbol::N(Nterm::S), Symbol::T(Term::Close)], build: |c| c[1] + 1 },
            Production { lhs: Nterm::S, rhs: &[Symbol::T(Term::X)], build: |_| 0 },
        ]
    }

    fn table() -> Table<Term, Nterm> {
        use Action::*;
        Table::from_rows(
            &[
                (0, &[(Term::Open, Shift(2)), (Term::X, Shift(3))]),
                (1, &[(Term::Eof, Accept)]),
                (2, &[(Term::Open, Shift(2)), (Term::X, Shift(3))]),
                (3, &[(Term::Close, Reduce(2)), (Term::Eof, Reduce(2))]),
                (4, &[(Term::Close, Shift(5))]),
                (5, &[(Term::Close, Reduce(1)), (Term::Eof, Reduce(1))]),
            ],
            &[
                (0, &[(Nterm::S, 1)]),
                (2, &[(Nterm::S, 4)]),
            ],
        )
    }

    fn toks(s: &str) -> Vec<Tok> {
        s.chars().enumerate().map(|(i, c)| match c {
            '(' => Tok(Term::Open, i),
            ')' => Tok(Term::Close, i),
            _ => Tok(Term::X, i),
        }).chain(std::iter::once(Tok(Term::Eof, s.len()))).collect()
    }

    #[test]
    fn counts_nesting() {
        let _ = env_logger::builder().is_test(true).try_init();
        let (table, rules) = (table(), rules());
        let pda = PDA::new(&table, &rules);
        assert_eq!(pda.parse(&toks("x"), &|_| 0), Ok(0));
        assert_eq!(pda.parse(&toks("((x))"), &|_| 0), Ok(2));
    }

    #[test]
    fn observer_sees_every_move() {
        let (table, rules) = (table(), rules());
        let pda = PDA::new(&table, &rules);
        let mut steps = Vec::new();
        pda.parse_observed(&toks("(x)"), &|_| 0, &mut |step| steps.push(step)).unwrap();
        assert_eq!(steps, vec![
            Step::Shift { state: 0, kind: Term::Open, target: 2 },
            Step::Shift { state: 2, kind: Term::X, target: 3 },
            Step::Reduce { state: 3, kind: Term::Close, production: 2, lhs: Nterm::S, from: 2, target: 4 },
            Step::Shift { state: 4, kind: Term::Close, target: 5 },
            Step::Reduce { state: 5, kind: Term::Eof, production: 1, lhs: Nterm::S, from: 0, target: 1 },
            Step::Accept { state: 1 },
        ]);
    }

    #[test]
    fn reports_the_offending_token() {
        let (table, rules) = (table(), rules());
        let pda = PDA::new(&table, &rules);
        assert_eq!(
            pda.parse(&toks("((x)"), &|_| 0),
            Err(ParseError::UnexpectedToken { kind: Term::Eof, state: 4, position: 4 })
        );
        assert_eq!(
            pda.parse(&toks("x)"), &|_| 0),
            Err(ParseError::UnexpectedToken { kind: Term::Close, state: 1, position: 1 })
        );
    }

    #[test]
    fn missing_end_marker() {
        let (table, rules) = (table(), rules());
        let pda = PDA::new(&table, &rules);
        let tokens = vec![Tok(Term::X, 0)];
        assert_eq!(
            pda.parse(&tokens, &|_| 0),
            Err(ParseError::UnterminatedInput { state: 3 })
        );
    }

    #[test]
    #[should_panic(expected = "malformed automaton")]
    fn missing_goto_is_a_bug() {
        let rules = rules();
        let table = Table::from_rows(
            &[
                (0, &[(Term::X, Action::Shift(1))]),
                (1, &[(Term::Eof, Action::Reduce(2))]),
            ],
            &[],
        );
        let _ = PDA::new(&table, &rules).parse(&toks("x"), &|_| 0);
    }

    #[test]
    fn nothing_after_the_end_marker() {
        let (table, rules) = (table(), rules());
        let pda = PDA::new(&table, &rules);

        let mut tokens = toks("x");
        tokens.push(Tok(Term::Close, 2));
        assert_eq!(
            pda.parse(&tokens, &|_| 0),
            Err(ParseError::UnexpectedToken { kind: Term::Close, state: 1, position: 2 })
        );

        let mut tokens = toks("(x)");
        tokens.push(Tok(Term::Eof, 4));
        assert_eq!(
            pda.parse(&tokens, &|_| 0),
            Err(ParseError::UnexpectedToken { kind: Term::Eof, state: 1, position: 4 })
        );
    }

    #[test]
    #[should_panic(expected = "malformed automaton: state 7 does not exist")]
    fn shift_to_missing_state_is_a_bug() {
        let rules = rules();
        let table = Table::from_rows(
            &[(0, &[(Term::X, Action::Shift(7))])],
            &[],
        );
        let _ = PDA::new(&table, &rules).parse(&toks("x"), &|_| 0);
    }

    #[test]
    #[should_panic(expected = "malformed automaton: production 9 does not exist")]
    fn missing_production_is_a_bug() {
        let rules = rules();
        let table = Table::from_rows(
            &[
                (0, &[(Term::X, Action::Shift(1))]),
                (1, &[(Term::Eof, Action::Reduce(9))]),
            ],
            &[],
        );
        let _ = PDA::new(&table, &rules).parse(&toks("x"), &|_| 0);
    }

    #[test]
    #[should_panic(expected = "malformed stack: cannot pop 3 symbols from 1")]
    fn popping_past_the_stack_is_a_bug() {
        let rules = rules();
        let table = Table::from_rows(
            &[
                (0, &[(Term::X, Action::Shift(1))]),
                (1, &[(Term::Eof, Action::Reduce(1))]),
            ],
            &[],
        );
        let _ = PDA::new(&table, &rules).parse(&toks("x"), &|_| 0);
    }

    #[test]
    #[should_panic(expected = "malformed stack: 0 values left on accept")]
    fn accept_on_empty_stack_is_a_bug() {
        let rules = rules();
        let table = Table::from_rows(&[(0, &[(Term::Eof, Action::Accept)])], &[]);
        let _ = PDA::new(&table, &rules).parse(&toks(""), &|_| 0);
    }

    #[test]
    #[should_panic(expected = "malformed stack: 2 values left on accept")]
    fn accept_with_leftovers_is_a_bug() {
        let rules = rules();
        let table = Table::from_rows(
            &[
                (0, &[(Term::X, Action::Shift(1))]),
                (1, &[(Term::X, Action::Shift(2))]),
                (2, &[(Term::Eof, Action::Accept)]),
            ],
            &[],
        );
        let _ = PDA::new(&table, &rules).parse(&toks("xx"), &|_| 0);
    }
}
