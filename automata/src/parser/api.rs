
use std::fmt::Debug;

use log::debug;

use super::builder::Builder;
use super::error::TableError;
use super::items::{LR1Item, Rule, Sym};
use super::types::*;

/*
 * A grammar as the table builder sees it. Production 0 must be the
 * augmented rule `Start -> X end`; the end marker appears nowhere else.
 */
pub struct Grammar<'g, T: 'static, N: 'static, V> {
    pub terminals: &'g [T],
    pub nonterminals: &'g [N],
    pub productions: &'g [Production<T, N, V>],
    pub end: T,
}

impl<'g, T, N, V> Grammar<'g, T, N, V>
    where T: Copy + Ord + Debug + 'static,
          N: Copy + Ord + Debug + 'static,
{
    // The end marker always gets index 0.
    fn term_index(&self, t: T) -> Result<usize, TableError<T, N>> {
        if t == self.end {
            return Ok(0)
        }
        self.terminals.iter()
            .filter(|x| **x != self.end)
            .position(|x| *x == t)
            .map(|i| i + 1)
            .ok_or_else(|| TableError::UnknownSymbol { what: "terminal", name: format!("{:?}", t) })
    }

    fn term(&self, i: usize) -> T {
        if i == 0 {
            self.end
        } else {
            self.terminals.iter().copied().filter(|x| *x != self.end).nth(i - 1).unwrap_or(self.end)
        }
    }

    // The start symbol (lhs of production 0) always gets index 0.
    fn nterm_index(&self, n: N) -> Result<usize, TableError<T, N>> {
        let start = self.start()?;
        if n == start {
            return Ok(0)
        }
        self.nonterminals.iter()
            .filter(|x| **x != start)
            .position(|x| *x == n)
            .map(|i| i + 1)
            .ok_or_else(|| TableError::UnknownSymbol { what: "non-terminal", name: format!("{:?}", n) })
    }

    fn start(&self) -> Result<N, TableError<T, N>> {
        self.productions.first()
            .map(|p| p.lhs)
            .ok_or(TableError::UnknownSymbol { what: "production", name: "0".to_string() })
    }

    fn rules(&self) -> Result<Vec<Rule>, TableError<T, N>> {
        self.productions.iter().enumerate().map(|(i, p)| {
            let expand = p.rhs.iter().enumerate().map(|(pos, sym)| match sym {
                Symbol::T(t) if *t == self.end && (i != 0 || pos + 1 != p.rhs.len()) => {
                    Err(TableError::UnknownSymbol {
                        what: "use of the end marker in production",
                        name: i.to_string(),
                    })
                },
                Symbol::T(t) => self.term_index(*t).map(Symbol::T),
                Symbol::N(n) => self.nterm_index(*n).map(Symbol::N),
            }).collect::<Result<Vec<Sym>, _>>()?;

            Ok(Rule { symbol: self.nterm_index(p.lhs)?, expand })
        }).collect()
    }

    fn nterm_count(&self) -> Result<usize, TableError<T, N>> {
        let start = self.start()?;
        Ok(1 + self.nonterminals.iter().filter(|x| **x != start).count())
    }
}

/*
 * Builds the canonical LR(1) table of the grammar.
 */
pub fn build_table<T, N, V>(grammar: &Grammar<T, N, V>) -> Result<Table<T, N>, TableError<T, N>>
    where T: Copy + Ord + Debug + 'static,
          N: Copy + Ord + Debug + 'static,
{
    let rules = grammar.rules()?;
    let term_count = 1 + grammar.terminals.iter().filter(|x| **x != grammar.end).count();
    let nterm_count = grammar.nterm_count()?;

    let machine = Builder::<LR1Item>::new(&rules, term_count, nterm_count)
        .build()
        .map_err(|(state, term, first, second)| TableError::Conflict {
            state,
            term: grammar.term(term),
            first: first.to_string(),
            second: second.to_string(),
        })?;
    debug!("built a LR(1) automaton with {} states", machine.len());

    let start = grammar.start()?;
    let nterms: Vec<N> = std::iter::once(start)
        .chain(grammar.nonterminals.iter().copied().filter(|n| *n != start))
        .collect();

    let mut table = Table::with_states(machine.len());
    for (state, (actions, gotos)) in machine.into_iter().enumerate() {
        for (i, action) in actions.into_iter().enumerate() {
            if let Some(action) = action {
                table.actions_mut(state).insert(grammar.term(i), action);
            }
        }
        for (i, goto) in gotos.into_iter().enumerate() {
            if let Some(q) = goto {
                table.gotos_mut(state).insert(nterms[i], q);
            }
        }
    }

    Ok(table)
}

/*
 * Checks that a table is consistent with its productions: every target
 * exists, every state can act, and exactly one entry accepts, on `end`.
 * A table that passes cannot hit a "malformed automaton" panic on a
 * missing state or production; missing gotos are only caught by
 * running it.
 */
pub fn validate<T, N, V>(
    table: &Table<T, N>,
    productions: &[Production<T, N, V>],
    end: T,
) -> Result<(), TableError<T, N>>
    where T: Copy + Ord + Debug + 'static,
          N: Copy + Ord + Debug + 'static,
{
    let count = table.state_count();
    let mut accepts = 0;

    for state in 0..count {
        if table.actions(state).next().is_none() {
            return Err(TableError::DeadState { state })
        }

        for (term, action) in table.actions(state) {
            match action {
                Action::Shift(target) if target >= count => {
                    return Err(TableError::DanglingShift { state, term, target })
                },
                Action::Reduce(production) if production >= productions.len() => {
                    return Err(TableError::DanglingReduce { state, term, production })
                },
                Action::Accept if term != end => {
                    return Err(TableError::AcceptOnToken { state, term })
                },
                Action::Accept => accepts += 1,
                _ => (),
            }
        }

        for (nterm, target) in table.gotos(state) {
            if target >= count {
                return Err(TableError::DanglingGoto { state, nterm, target })
            }
        }
    }

    if accepts != 1 {
        return Err(TableError::AcceptCount { count: accepts })
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
    enum Term { Plus, X, Eof }

    #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
    enum Nterm { Start, E }

    const PRODUCTIONS: &[Production<Term, Nterm, ()>] = &[
        Production { lhs: Nterm::Start, rhs: &[Symbol::N(Nterm::E), Symbol::T(Term::Eof)], build: drop_all },
        Production { lhs: Nterm::E, rhs: &[Symbol::N(Nterm::E), Symbol::T(Term::Plus), Symbol::T(Term::X)], build: drop_all },
        Production { lhs: Nterm::E, rhs: &[Symbol::T(Term::X)], build: drop_all },
    ];

    fn drop_all(_: Vec<()>) {}

    fn grammar() -> Grammar<'static, Term, Nterm, ()> {
        Grammar {
            terminals: &[Term::Plus, Term::X, Term::Eof],
            nonterminals: &[Nterm::Start, Nterm::E],
            productions: PRODUCTIONS,
            end: Term::Eof,
        }
    }

    #[test]
    fn generated_table_is_valid() {
        let _ = env_logger::builder().is_test(true).try_init();
        let table = build_table(&grammar()).unwrap();
        assert_eq!(table.state_count(), 5);
        assert_eq!(table.action(0, Term::X).map(|a| a.is_some()), Some(true));
        assert_eq!(table.action(0, Term::Plus), Some(None));
        validate(&table, PRODUCTIONS, Term::Eof).unwrap();
    }

    #[test]
    fn validation_finds_dangling_targets() {
        let table: Table<Term, Nterm> = Table::from_rows(
            &[(0, &[(Term::X, Action::Shift(7))])],
            &[],
        );
        assert_eq!(
            validate(&table, PRODUCTIONS, Term::Eof),
            Err(TableError::DanglingShift { state: 0, term: Term::X, target: 7 })
        );

        let table: Table<Term, Nterm> = Table::from_rows(
            &[(0, &[(Term::X, Action::Reduce(2))])],
            &[],
        );
        assert_eq!(
            validate(&table, PRODUCTIONS, Term::Eof),
            Err(TableError::AcceptCount { count: 0 })
        );
    }

    #[test]
    fn end_marker_only_ends_the_start_rule() {
        const BAD: &[Production<Term, Nterm, ()>] = &[
            Production { lhs: Nterm::Start, rhs: &[Symbol::N(Nterm::E), Symbol::T(Term::Eof)], build: drop_all },
            Production { lhs: Nterm::E, rhs: &[Symbol::T(Term::X), Symbol::T(Term::Eof)], build: drop_all },
        ];
        let grammar = Grammar { productions: BAD, ..grammar() };
        assert!(matches!(build_table(&grammar), Err(TableError::UnknownSymbol { .. })));
    }
}
