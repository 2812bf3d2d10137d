//! The canonicalizing BDD engine.
//!
//! [`Bdd`] layers reduced-ordered-BDD discipline on top of the
//! [`TermStore`]: every formula it hands out is a canonical handle, so two
//! formulas are logically equivalent exactly when their handles are equal.
//!
//! The engine rests on three rules:
//!
//! - every boolean connective is expressed through [`ite`][Bdd::ite]
//!   (Shannon expansion);
//! - within any produced conditional, the condition atom's tag is strictly
//!   below every atom tag reachable in its branches (the interning order of
//!   the bare atoms *is* the variable order);
//! - no produced conditional has identical branches (reducedness).
//!
//! A memo cache keyed by the operand handle triple collapses repeated
//! subproblems, and the connective layer applies algebraic fast paths
//! (terminal identities, idempotence, double-negation elimination,
//! commutative operand normalization) before delegating. The fast paths only
//! improve sharing and cache locality; they never change the resulting
//! canonical handle.
//!
//! One engine instance is one single-writer formula universe. Independent
//! sessions (tests, parallel problem instances) should each own a `Bdd`.

use std::cell::RefCell;
use std::fmt::Debug;

use log::debug;

use crate::cache::OpCache;
use crate::reference::Ref;
use crate::store::TermStore;
use crate::term::Term;

pub struct Bdd {
    store: RefCell<TermStore>,
    cache: RefCell<OpCache<(Ref, Ref, Ref), Ref>>,
    /// The `true` terminal, interned at construction.
    pub one: Ref,
    /// The `false` terminal, interned at construction.
    pub zero: Ref,
}

impl Bdd {
    /// Create an engine with `2^bits` interning buckets.
    pub fn new(bits: usize) -> Self {
        let mut store = TermStore::new(bits);
        let one = store.t();
        let zero = store.f();
        Self {
            store: RefCell::new(store),
            cache: RefCell::new(OpCache::new()),
            one,
            zero,
        }
    }
}

impl Default for Bdd {
    fn default() -> Self {
        Bdd::new(16)
    }
}

impl Debug for Bdd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bdd")
            .field("terms", &self.node_count())
            .field("memoized", &self.cache.borrow().len())
            .finish()
    }
}

impl Bdd {
    /// The `true` terminal.
    pub fn t(&self) -> Ref {
        self.one
    }

    /// The `false` terminal.
    pub fn f(&self) -> Ref {
        self.zero
    }

    pub fn is_terminal(&self, node: Ref) -> bool {
        node == self.zero || node == self.one
    }

    /// The variable node for a named atomic proposition: `ite(atom, 1, 0)`.
    ///
    /// The bare atom is interned first; its tag fixes the variable's place
    /// in the order. Requesting the same name again returns the same handle.
    pub fn atom(&self, name: &str) -> Ref {
        self.atom_with_delimiter(name, "\"")
    }

    /// Like [`atom`][Bdd::atom], preserving the source spelling of the atom.
    /// The delimiter never affects identity.
    pub fn atom_with_delimiter(&self, name: &str, delimiter: &str) -> Ref {
        let mut store = self.store.borrow_mut();
        let var = store.atom_with_delimiter(name, delimiter);
        store.conditional(var, self.one, self.zero)
    }

    /// Number of distinct structural classes interned so far.
    pub fn node_count(&self) -> usize {
        self.store.borrow().len()
    }

    /// Memo-cache hits since construction.
    pub fn cache_hits(&self) -> usize {
        self.cache.borrow().hits()
    }

    /// Memo-cache misses since construction.
    pub fn cache_misses(&self) -> usize {
        self.cache.borrow().misses()
    }

    /// The `(condition, high, low)` children of a conditional node.
    pub fn as_conditional(&self, node: Ref) -> Option<(Ref, Ref, Ref)> {
        match *self.store.borrow().term(node) {
            Term::Conditional { condition, high, low } => Some((condition, high, low)),
            _ => None,
        }
    }

    /// Positive and negative cofactors of `node` with respect to the split
    /// variable `split` (a bare atom handle).
    ///
    /// A terminal is its own cofactor both ways, as is a conditional whose
    /// condition orders strictly after `split`. A conditional splitting on
    /// `split` yields its branches.
    ///
    /// # Panics
    ///
    /// Panics if `node` splits on a variable ordered strictly before
    /// `split` — the node was assembled by hand around the canonicalizing
    /// constructors — or if `node` is not a BDD shape at all.
    pub fn cofactors(&self, node: Ref, split: Ref) -> (Ref, Ref) {
        if self.is_terminal(node) {
            return (node, node);
        }

        let Some((condition, high, low)) = self.as_conditional(node) else {
            panic!("cofactor extraction on non-BDD operand {}", node);
        };

        if split.tag() < condition.tag() {
            // `node` does not depend on `split`.
            (node, node)
        } else if split.tag() == condition.tag() {
            (high, low)
        } else {
            panic!(
                "variable ordering violation: node {} splits on {}, ordered before the requested variable {}",
                node, condition, split
            );
        }
    }

    /// The condition atom of `node`, when `node` is a conditional.
    fn top_variable(&self, node: Ref) -> Option<Ref> {
        self.as_conditional(node).map(|(condition, _, _)| condition)
    }

    /// Apply the ITE operation to the arguments.
    ///
    /// ```text
    /// ite(f, g, h) = (f ∧ g) ∨ (¬f ∧ h)
    /// ```
    ///
    /// Terminal and identity rules are tried first; otherwise the memo cache
    /// is consulted and the operation recurses by Shannon expansion on the
    /// smallest condition-atom tag among the conditional operands. The
    /// result is always reduced and canonically interned.
    ///
    /// # Examples
    ///
    /// ```
    /// use termdd::bdd::Bdd;
    ///
    /// let bdd = Bdd::default();
    /// let x = bdd.atom("x");
    /// let y = bdd.atom("y");
    /// let f = bdd.ite(x, y, bdd.zero);
    /// assert_eq!(f, bdd.and(x, y));
    /// ```
    pub fn ite(&self, f: Ref, g: Ref, h: Ref) -> Ref {
        debug!("ite(f = {}, g = {}, h = {})", f, g, h);

        // Base cases:
        //   ite(1,g,h) => g
        //   ite(0,g,h) => h
        //   ite(f,g,g) => g
        //   ite(f,1,0) => f
        if f == self.one {
            debug!("ite(1,g,h) => g");
            return g;
        }
        if f == self.zero {
            debug!("ite(0,g,h) => h");
            return h;
        }
        if g == h {
            debug!("ite(f,g,g) => g");
            return g;
        }
        if g == self.one && h == self.zero {
            debug!("ite(f,1,0) => f");
            return f;
        }

        // Standard triples:
        //   ite(f,f,h) => ite(f,1,h)
        //   ite(f,g,f) => ite(f,g,0)
        if f == g {
            debug!("ite(f,f,h) => ite(f,1,h)");
            return self.ite(f, self.one, h);
        }
        if f == h {
            debug!("ite(f,g,f) => ite(f,g,0)");
            return self.ite(f, g, self.zero);
        }

        let key = (f, g, h);
        if let Some(res) = self.cache.borrow().get(&key) {
            debug!("cache: ite(f = {}, g = {}, h = {}) -> {}", f, g, h, res);
            return res;
        }

        // Determine the top variable: the smallest condition-atom tag among
        // the conditional operands. The terminal rules above guarantee at
        // least one operand is a conditional.
        let split = [f, g, h]
            .iter()
            .filter_map(|&node| self.top_variable(node))
            .min()
            .unwrap_or_else(|| {
                panic!(
                    "no conditional operand in ite(f = {}, g = {}, h = {}): terminal rules should have applied",
                    f, g, h
                )
            });
        debug!("split variable = {}", split);

        let (f1, f0) = self.cofactors(f, split);
        debug!("cofactors of f = {}: high = {}, low = {}", f, f1, f0);
        let (g1, g0) = self.cofactors(g, split);
        debug!("cofactors of g = {}: high = {}, low = {}", g, g1, g0);
        let (h1, h0) = self.cofactors(h, split);
        debug!("cofactors of h = {}: high = {}, low = {}", h, h1, h0);

        // Shannon expansion.
        let high = self.ite(f1, g1, h1);
        let low = self.ite(f0, g0, h0);

        let res = if high == low {
            // Reduction: both branches agree, the split is redundant.
            debug!("reduce: high == low == {}", high);
            high
        } else {
            self.store.borrow_mut().conditional(split, high, low)
        };
        debug!("computed: ite(f = {}, g = {}, h = {}) -> {}", f, g, h, res);
        self.cache.borrow_mut().insert(key, res);
        res
    }

    /// [`ite`][Bdd::ite] under the factory vocabulary of the surrounding
    /// toolchain.
    pub fn conditional(&self, condition: Ref, high: Ref, low: Ref) -> Ref {
        self.ite(condition, high, low)
    }

    /// Conjunction: `f ∧ g = ite(f, g, 0)`.
    pub fn and(&self, f: Ref, g: Ref) -> Ref {
        debug!("and(f = {}, g = {})", f, g);

        // and(1,g) => g; and(f,1) => f
        if f == self.one {
            return g;
        }
        if g == self.one {
            return f;
        }
        // and(0,_) => 0; and(_,0) => 0
        if f == self.zero || g == self.zero {
            return self.zero;
        }
        // and(f,f) => f
        if f == g {
            return f;
        }
        // Normalize commutativity: smaller handle first.
        if g < f {
            return self.and(g, f);
        }

        self.ite(f, g, self.zero)
    }

    /// Disjunction: `f ∨ g = ite(f, 1, g)`.
    pub fn or(&self, f: Ref, g: Ref) -> Ref {
        debug!("or(f = {}, g = {})", f, g);

        // or(1,_) => 1; or(_,1) => 1
        if f == self.one || g == self.one {
            return self.one;
        }
        // or(0,g) => g; or(f,0) => f
        if f == self.zero {
            return g;
        }
        if g == self.zero {
            return f;
        }
        // or(f,f) => f
        if f == g {
            return f;
        }
        // Normalize commutativity: smaller handle first.
        if g < f {
            return self.or(g, f);
        }

        self.ite(f, self.one, g)
    }

    /// Negation: `¬f = ite(f, 0, 1)`.
    pub fn not(&self, f: Ref) -> Ref {
        debug!("not(f = {})", f);

        // not(1) => 0; not(0) => 1
        if f == self.one {
            return self.zero;
        }
        if f == self.zero {
            return self.one;
        }
        // not(not(v)) => v: a negated variable is literally ite(v, 0, 1),
        // and its negation is the variable node itself.
        if let Some((condition, high, low)) = self.as_conditional(f) {
            if high == self.zero && low == self.one {
                debug!("not(not({})) => variable node", condition);
                return self.store.borrow_mut().conditional(condition, self.one, self.zero);
            }
        }

        self.ite(f, self.zero, self.one)
    }

    /// Exclusive disjunction: `f ⊕ g = ite(f, ¬g, g)`.
    pub fn xor(&self, f: Ref, g: Ref) -> Ref {
        debug!("xor(f = {}, g = {})", f, g);

        // xor(0,g) => g; xor(f,0) => f
        if f == self.zero {
            return g;
        }
        if g == self.zero {
            return f;
        }
        // xor(1,g) => not(g); xor(f,1) => not(f)
        if f == self.one {
            return self.not(g);
        }
        if g == self.one {
            return self.not(f);
        }
        // xor(f,f) => 0
        if f == g {
            return self.zero;
        }
        // Normalize commutativity: smaller handle first.
        if g < f {
            return self.xor(g, f);
        }

        let ng = self.not(g);
        self.ite(f, ng, g)
    }

    /// Implication: `f → g = ite(f, g, 1)`.
    pub fn implies(&self, f: Ref, g: Ref) -> Ref {
        debug!("implies(f = {}, g = {})", f, g);

        // implies(0,_) => 1; implies(_,1) => 1
        if f == self.zero || g == self.one {
            return self.one;
        }
        // implies(1,g) => g
        if f == self.one {
            return g;
        }
        // implies(f,0) => not(f)
        if g == self.zero {
            return self.not(f);
        }
        // implies(f,f) => 1
        if f == g {
            return self.one;
        }

        self.ite(f, g, self.one)
    }

    /// Equivalence: `f ↔ g = ite(f, g, ¬g)`.
    pub fn equiv(&self, f: Ref, g: Ref) -> Ref {
        debug!("equiv(f = {}, g = {})", f, g);

        // equiv(1,g) => g; equiv(f,1) => f
        if f == self.one {
            return g;
        }
        if g == self.one {
            return f;
        }
        // equiv(0,g) => not(g); equiv(f,0) => not(f)
        if f == self.zero {
            return self.not(g);
        }
        if g == self.zero {
            return self.not(f);
        }
        // equiv(f,f) => 1
        if f == g {
            return self.one;
        }
        // Normalize commutativity: smaller handle first.
        if g < f {
            return self.equiv(g, f);
        }

        let ng = self.not(g);
        self.ite(f, g, ng)
    }

    /// Negated conjunction: `f ⊼ g = ite(f, ¬g, 1)`.
    pub fn nand(&self, f: Ref, g: Ref) -> Ref {
        debug!("nand(f = {}, g = {})", f, g);

        // nand(0,_) => 1; nand(_,0) => 1
        if f == self.zero || g == self.zero {
            return self.one;
        }
        // nand(1,g) => not(g); nand(f,1) => not(f)
        if f == self.one {
            return self.not(g);
        }
        if g == self.one {
            return self.not(f);
        }
        // nand(f,f) => not(f)
        if f == g {
            return self.not(f);
        }
        // Normalize commutativity: smaller handle first.
        if g < f {
            return self.nand(g, f);
        }

        let ng = self.not(g);
        self.ite(f, ng, self.one)
    }

    /// Negated disjunction: `f ⊽ g = ite(f, 0, ¬g)`.
    pub fn nor(&self, f: Ref, g: Ref) -> Ref {
        debug!("nor(f = {}, g = {})", f, g);

        // nor(1,_) => 0; nor(_,1) => 0
        if f == self.one || g == self.one {
            return self.zero;
        }
        // nor(0,g) => not(g); nor(f,0) => not(f)
        if f == self.zero {
            return self.not(g);
        }
        if g == self.zero {
            return self.not(f);
        }
        // nor(f,f) => not(f)
        if f == g {
            return self.not(f);
        }
        // Normalize commutativity: smaller handle first.
        if g < f {
            return self.nor(g, f);
        }

        let ng = self.not(g);
        self.ite(f, self.zero, ng)
    }

    /// Negated exclusive disjunction. Same function as [`equiv`][Bdd::equiv].
    pub fn xnor(&self, f: Ref, g: Ref) -> Ref {
        self.equiv(f, g)
    }

    /// Conjunction over any number of operands. Empty input yields `1`.
    pub fn and_all(&self, nodes: impl IntoIterator<Item = Ref>) -> Ref {
        let mut res = self.one;
        for node in nodes {
            res = self.and(res, node);
        }
        res
    }

    /// Disjunction over any number of operands. Empty input yields `0`.
    pub fn or_all(&self, nodes: impl IntoIterator<Item = Ref>) -> Ref {
        let mut res = self.zero;
        for node in nodes {
            res = self.or(res, node);
        }
        res
    }
}
