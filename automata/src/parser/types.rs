
use std::collections::BTreeMap;
use std::fmt;

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum Symbol<T, N> {
    // Terminal
    T(T),
    // Non-terminal
    N(N),
}

/*
 * A production `lhs -> rhs`, along with the semantic action that
 * builds the value of `lhs` from the values of the `rhs` symbols
 * (given in left-to-right order).
 */
pub struct Production<T: 'static, N: 'static, V> {
    pub lhs: N,
    pub rhs: &'static [Symbol<T, N>],
    pub build: fn(Vec<V>) -> V,
}

impl<T: 'static, N: 'static, V> Production<T, N, V> {
    pub fn rhs_len(&self) -> usize {
        self.rhs.len()
    }
}

impl<T: fmt::Debug + 'static, N: fmt::Debug + 'static, V> fmt::Display for Production<T, N, V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?} ->", self.lhs)?;
        for sym in self.rhs {
            match sym {
                Symbol::T(t) => write!(f, " {:?}", t)?,
                Symbol::N(n) => write!(f, " <{:?}>", n)?,
            }
        }
        Ok(())
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Action {
    Shift(usize),
    Reduce(usize),
    Accept,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Action::Shift(q) => write!(f, "s{}", q),
            Action::Reduce(p) => write!(f, "r{}", p),
            Action::Accept => write!(f, "acc"),
        }
    }
}

/*
 * The ACTION/GOTO table. States are the indices of `actions`
 * (and of `gotos`, which always has the same length).
 * A table is never mutated once built.
 */
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Table<T, N> {
    actions: Vec<BTreeMap<T, Action>>,
    gotos: Vec<BTreeMap<N, usize>>,
}

impl<T: Ord + Copy, N: Ord + Copy> Table<T, N> {
    /*
     * Builds a table from explicit rows, `(state, entries)`.
     * States that are never mentioned get empty rows.
     */
    pub fn from_rows(
        actions: &[(usize, &[(T, Action)])],
        gotos: &[(usize, &[(N, usize)])],
    ) -> Table<T, N> {
        let count = actions.iter().map(|(q, _)| q + 1)
            .chain(gotos.iter().map(|(q, _)| q + 1))
            .max()
            .unwrap_or(0);

        let mut table = Table::with_states(count);
        for (q, row) in actions {
            table.actions[*q].extend(row.iter().copied());
        }
        for (q, row) in gotos {
            table.gotos[*q].extend(row.iter().copied());
        }
        table
    }

    pub(super) fn with_states(count: usize) -> Table<T, N> {
        Table {
            actions: vec![BTreeMap::new(); count],
            gotos: vec![BTreeMap::new(); count],
        }
    }

    pub(super) fn actions_mut(&mut self, state: usize) -> &mut BTreeMap<T, Action> {
        &mut self.actions[state]
    }

    pub(super) fn gotos_mut(&mut self, state: usize) -> &mut BTreeMap<N, usize> {
        &mut self.gotos[state]
    }

    pub fn state_count(&self) -> usize {
        self.actions.len()
    }

    /*
     * `None` if the state does not exist; `Some(None)` if the state
     * has no action for this terminal.
     */
    pub fn action(&self, state: usize, term: T) -> Option<Option<Action>> {
        self.actions.get(state).map(|row| row.get(&term).copied())
    }

    pub fn goto(&self, state: usize, nterm: N) -> Option<usize> {
        self.gotos.get(state).and_then(|row| row.get(&nterm).copied())
    }

    pub fn actions(&self, state: usize) -> impl Iterator<Item = (T, Action)> + '_ {
        self.actions.get(state).into_iter().flat_map(|row| row.iter().map(|(t, a)| (*t, *a)))
    }

    pub fn gotos(&self, state: usize) -> impl Iterator<Item = (N, usize)> + '_ {
        self.gotos.get(state).into_iter().flat_map(|row| row.iter().map(|(n, q)| (*n, *q)))
    }

    /*
     * The terminals the given state can act on, i.e. what was
     * expected when an error is reported in that state.
     */
    pub fn expected(&self, state: usize) -> Vec<T> {
        self.actions(state).map(|(t, _)| t).collect()
    }
}

impl<T: fmt::Debug + Ord + Copy, N: fmt::Debug + Ord + Copy> fmt::Display for Table<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for state in 0..self.state_count() {
            write!(f, "{:>3}:", state)?;
            for (t, a) in self.actions(state) {
                write!(f, " {:?}={}", t, a)?;
            }
            let mut gotos = self.gotos(state).peekable();
            if gotos.peek().is_some() {
                write!(f, " |")?;
                for (n, q) in gotos {
                    write!(f, " {:?}->{}", n, q)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
