//! The term store: canonicalizing construction primitives.
//!
//! [`TermStore`] owns the interning table and is the only shared mutable
//! state in the crate. Every constructor routes through [`intern`][TermStore::intern],
//! so a handle comparison is always a structural comparison.
//!
//! The store enforces *sharing*, not BDD discipline: [`conditional`][TermStore::conditional]
//! happily interns any three children. Ordering and reducedness are the
//! engine's job ([`Bdd`][crate::bdd::Bdd]); nodes hand-assembled here must
//! not be fed to the engine's cofactor logic.

use std::fmt::Debug;

use log::debug;

use crate::reference::Ref;
use crate::table::Table;
use crate::term::Term;

const DEFAULT_BUCKET_BITS: usize = 16;

pub struct TermStore {
    table: Table<Term>,
}

impl Default for TermStore {
    fn default() -> Self {
        Self::new(DEFAULT_BUCKET_BITS)
    }
}

impl Debug for TermStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TermStore").field("len", &self.len()).finish()
    }
}

impl TermStore {
    /// Create a store with `2^bits` interning buckets.
    pub fn new(bits: usize) -> Self {
        Self {
            table: Table::new(bits),
        }
    }

    /// Intern a term: the canonical handle for its structural-equality class.
    ///
    /// Idempotent. A fresh class is tagged with the current store size, so
    /// tags increase monotonically in construction order and are never
    /// reused.
    pub fn intern(&mut self, term: Term) -> Ref {
        debug_assert!(self.children_are_valid(&term), "child handle out of range");
        Ref::new(self.table.put(term) as u32)
    }

    fn children_are_valid(&self, term: &Term) -> bool {
        let len = self.table.len() as u32;
        match *term {
            Term::True | Term::False | Term::Atom { .. } => true,
            Term::Reference { target, .. } => target.map_or(true, |t| t.tag() < len),
            Term::Conditional { condition, high, low } => {
                condition.tag() < len && high.tag() < len && low.tag() < len
            }
        }
    }

    /// The `true` terminal.
    pub fn t(&mut self) -> Ref {
        self.intern(Term::True)
    }

    /// The `false` terminal.
    pub fn f(&mut self) -> Ref {
        self.intern(Term::False)
    }

    /// An atomic proposition with the default quoting delimiter.
    pub fn atom(&mut self, name: &str) -> Ref {
        self.atom_with_delimiter(name, "\"")
    }

    /// An atomic proposition as it was spelled in the source. The delimiter
    /// is recorded for diagnostics but does not affect identity: `"x"` and
    /// `|x|` intern to the same handle.
    pub fn atom_with_delimiter(&mut self, name: &str, delimiter: &str) -> Ref {
        let node = self.intern(Term::Atom {
            name: name.to_string(),
            delimiter: delimiter.to_string(),
        });
        debug!("atom(name = {:?}) -> {}", name, node);
        node
    }

    /// An unresolved reference to a named formula.
    pub fn reference(&mut self, name: &str) -> Ref {
        self.intern(Term::Reference {
            name: name.to_string(),
            target: None,
        })
    }

    /// A reference whose target is known. Identity follows the target, not
    /// the name: two resolved references to the same term are one handle.
    pub fn resolved_reference(&mut self, name: &str, target: Ref) -> Ref {
        self.intern(Term::Reference {
            name: name.to_string(),
            target: Some(target),
        })
    }

    /// A raw conditional node over already-canonical children.
    pub fn conditional(&mut self, condition: Ref, high: Ref, low: Ref) -> Ref {
        let node = self.intern(Term::Conditional { condition, high, low });
        debug!(
            "conditional(c = {}, high = {}, low = {}) -> {}",
            condition, high, low, node
        );
        node
    }

    /// The interned term behind a handle.
    pub fn term(&self, node: Ref) -> &Term {
        self.table.value(node.index())
    }

    /// The memoized structural hash behind a handle.
    pub fn structural_hash(&self, node: Ref) -> u64 {
        self.table.hash(node.index())
    }

    /// Number of distinct structural classes interned so far.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_interning_is_idempotent() {
        let mut store = TermStore::default();
        let x1 = store.atom("x");
        let x2 = store.atom("x");
        let y = store.atom("y");
        assert_eq!(x1, x2);
        assert_ne!(x1, y);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_tags_follow_construction_order() {
        let mut store = TermStore::default();
        let a = store.atom("a");
        let b = store.atom("b");
        let t = store.t();
        assert_eq!(a.tag(), 0);
        assert_eq!(b.tag(), 1);
        assert_eq!(t.tag(), 2);
        // Re-interning mints nothing.
        assert_eq!(store.atom("a").tag(), 0);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_terminals_are_singletons() {
        let mut store = TermStore::default();
        assert_eq!(store.t(), store.t());
        assert_eq!(store.f(), store.f());
        assert_ne!(store.t(), store.f());
    }

    #[test]
    fn test_atom_delimiter_is_spelling_only() {
        let mut store = TermStore::default();
        let quoted = store.atom_with_delimiter("ready", "\"");
        let piped = store.atom_with_delimiter("ready", "|");
        assert_eq!(quoted, piped);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_conditionals_share_structurally() {
        let mut store = TermStore::default();
        let x = store.atom("x");
        let t = store.t();
        let f = store.f();
        let c1 = store.conditional(x, t, f);
        let c2 = store.conditional(x, t, f);
        let c3 = store.conditional(x, f, t);
        assert_eq!(c1, c2);
        assert_ne!(c1, c3);
    }

    #[test]
    fn test_resolved_references_are_nameless() {
        let mut store = TermStore::default();
        let x = store.atom("x");
        let p = store.resolved_reference("p", x);
        let q = store.resolved_reference("q", x);
        assert_eq!(p, q);

        let named_p = store.reference("p");
        let named_p2 = store.reference("p");
        let named_q = store.reference("q");
        assert_eq!(named_p, named_p2);
        assert_ne!(named_p, named_q);
        // Resolution state is part of the class.
        assert_ne!(named_p, p);
    }

    #[test]
    fn test_structural_hash_is_memoized_consistently() {
        let mut store = TermStore::default();
        let x = store.atom("x");
        let y = store.atom_with_delimiter("x", "|");
        assert_eq!(store.structural_hash(x), store.structural_hash(y));
    }
}
