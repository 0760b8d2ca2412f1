
use std::collections::BTreeSet;

use super::types::Symbol;

// Symbols as indices: terminal 0 is always the end marker,
// non-terminal 0 is always the start symbol.
pub type Sym = Symbol<usize, usize>;

pub struct Rule {
    pub symbol: usize,
    pub expand: Vec<Sym>,
}

/*
 * The terminals that can start a derivation of `sym`.
 * Rules never derive the empty word, so looking at the first
 * symbol of each alternative is enough.
 */
fn first(rules: &[Rule], sym: &Sym) -> Vec<usize> {
    struct Visitor<'a> {
        rules: &'a [Rule],
        found: BTreeSet<usize>,
        visited_nterms: BTreeSet<usize>,
    }

    impl<'a> Visitor<'a> {
        fn visit(&mut self, sym: &Sym) {
            match sym {
                Symbol::T(k) => {
                    self.found.insert(*k);
                },
                Symbol::N(k) if !self.visited_nterms.contains(k) => {
                    self.visited_nterms.insert(*k);
                    let rules = self.rules;
                    rules.iter()
                        .filter_map(|r| if r.symbol == *k { r.expand.first() } else { None })
                        .for_each(|s| self.visit(s));
                },
                _ => ()
            }
        }
    }

    let mut visitor = Visitor {
        rules,
        found: BTreeSet::new(),
        visited_nterms: BTreeSet::new(),
    };
    visitor.visit(sym);
    visitor.found.into_iter().collect()
}

// A LR(0) item (production, bullet position) with 1 token lookahead.
pub type LR1Item = (usize, usize, usize);

pub trait LRItem: Ord + Copy {
    // The item the start state is the closure of.
    fn root() -> Self;

    // (production, bullet position)
    fn prod_and_pos(&self) -> (usize, usize);

    /*
     * The items of rule `rule_id` that a closure gains from this item,
     * `rule_id` being a rule of the non-terminal after the bullet.
     */
    fn neighbor_items(&self, rule_id: usize, rules: &[Rule]) -> Vec<Self>;

    fn move_bullet(&self) -> Self;

    /*
     * Whether a state holding this complete item reduces
     * on the given terminal.
     */
    fn reduce_on(&self, term: usize) -> bool;
}

impl LRItem for LR1Item {
    fn root() -> LR1Item {
        (0, 0, 0) // 0 is always the end marker.
    }

    fn prod_and_pos(&self) -> (usize, usize) {
        (self.0, self.1)
    }

    fn neighbor_items(&self, rule_id: usize, rules: &[Rule]) -> Vec<LR1Item> {
        match rules.get(self.0).and_then(|r| r.expand.get(self.1 + 1)) {
            Some(sym) => first(rules, sym).into_iter().map(|s| (rule_id, 0, s)).collect(),
            None => vec![(rule_id, 0, self.2)],
        }
    }

    fn move_bullet(&self) -> LR1Item {
        (self.0, self.1 + 1, self.2)
    }

    fn reduce_on(&self, term: usize) -> bool {
        term == self.2
    }
}
