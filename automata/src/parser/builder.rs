
use std::collections::{BTreeSet, BTreeMap};

use super::types::*;
use super::items::*;

// One row per state: the actions (indexed by terminal) and
// the gotos (indexed by non-terminal).
pub type MachineTable = Vec<(Vec<Option<Action>>, Vec<Option<usize>>)>;

// (state, terminal, action already there, conflicting action)
pub type Conflict = (usize, usize, Action, Action);

pub struct Builder<'a, I> {
    rules: &'a [Rule],
    term_count: usize,
    nterm_count: usize,
    // Stores the states that are built, and the transition
    // map for each state.
    states: Vec<(BTreeSet<I>, BTreeMap<Sym, usize>)>,
}

impl<'a, I> Builder<'a, I> where
    I: LRItem
{
    pub fn new(
        rules: &'a [Rule],
        term_count: usize, nterm_count: usize,
    ) -> Builder<'a, I> {
        Builder {
            rules,
            term_count, nterm_count,
            states: Vec::new(),
        }
    }

    /*
     * Returns the symbol after the bullet in the given item
     * (if it exists, None otherwise).
     */
    fn next_token(&self, item: &I) -> Option<&Sym> {
        let (prod_id, pos) = item.prod_and_pos();
        self.rules.get(prod_id).and_then(|rule| rule.expand.get(pos))
    }

    /*
     * Returns the items that should be added when computing
     * a closure.
     */
    fn neighbors(&self, item: &I) -> Vec<I> {
        if let Some(Symbol::N(id)) = self.next_token(item) {
            self.rules.iter().enumerate().filter_map(|(i, rule)| {
                if rule.symbol == *id {
                    Some(item.neighbor_items(i, self.rules))
                } else {None}
            }).flatten().collect()
        } else {vec!()}
    }

    fn closure(&self, set: BTreeSet<I>) -> BTreeSet<I> {
        let mut set = set;
        let mut pending: Vec<I> = set.iter().copied().collect();

        while let Some(item) = pending.pop() {
            for next in self.neighbors(&item) {
                if set.insert(next) {
                    pending.push(next);
                }
            }
        }

        set
    }

    /*
     * Finds the id of the state that is represented by the given set
     * (if it exists).
     */
    fn state_id(&self, set: &BTreeSet<I>) -> Option<usize> {
        self.states.iter().position(|(state, _)| state == set)
    }

    /*
     * Computes the transitions from the given state, building the
     * target states as they are discovered.
     * The end marker is never shifted: it is accepted instead.
     */
    fn transitions_from(&mut self, id: usize) {
        let symbols: Vec<Sym> = (1..self.term_count).map(Symbol::T)
            .chain((0..self.nterm_count).map(Symbol::N))
            .collect();

        for token in symbols {
            let next_set: BTreeSet<I> = self.states[id].0.iter()
                .filter(|item| self.next_token(item) == Some(&token))
                .map(|item| item.move_bullet())
                .collect();

            if next_set.is_empty() {
                continue
            }

            let state = self.closure(next_set);
            let tgt_id = match self.state_id(&state) {
                Some(tgt_id) => tgt_id,
                None => {
                    let tgt_id = self.states.len();
                    self.states.push((state, BTreeMap::new()));
                    self.transitions_from(tgt_id);
                    tgt_id
                }
            };
            self.states[id].1.insert(token, tgt_id);
        }
    }

    fn build_states(&mut self) {
        let mut set = BTreeSet::new();
        set.insert(I::root());
        set = self.closure(set);
        self.states.push((set, BTreeMap::new()));
        self.transitions_from(0);
    }

    pub fn build(&mut self) -> Result<MachineTable, Conflict> {
        self.build_states();

        let mut table = Vec::with_capacity(self.states.len());
        for (id, (items, trans)) in self.states.iter().enumerate() {
            let mut actions = vec![None; self.term_count];
            let mut goto = vec![None; self.nterm_count];

            // Fill the shifts and gotos
            for (sym, state) in trans {
                match sym {
                    Symbol::T(k) => actions[*k] = Some(Action::Shift(*state)),
                    Symbol::N(k) => goto[*k] = Some(*state),
                }
            }

            for item in items {
                let (prod, pos) = item.prod_and_pos();
                let len = self.rules[prod].expand.len();

                if prod == 0 && pos + 1 == len {
                    // Start -> ... . $
                    actions[0] = Some(Action::Accept);
                } else if pos == len {
                    // We are at the end of a production.
                    // In this case we may want to reduce.
                    for i in 0..self.term_count {
                        if item.reduce_on(i) {
                            let reduce = Action::Reduce(prod);
                            match actions[i] {
                                None => actions[i] = Some(reduce),
                                Some(other) if other == reduce => (),
                                Some(other) => return Err((id, i, other, reduce)),
                            }
                        }
                    }
                }
            }

            table.push((actions, goto));
        }

        Ok(table)
    }
}
