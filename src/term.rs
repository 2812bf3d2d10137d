//! The term language and the structural ("nameless") equality/hash oracle.
//!
//! A [`Term`] is one node of a boolean formula. Children are canonical
//! handles ([`Ref`]), so every term is logically the root of a DAG shared
//! through the store. Because children are already canonical, comparing two
//! candidate nodes shallowly — handle by handle — decides *deep* structural
//! equality by induction, and the identity fast path (tag comparison) is
//! exact rather than heuristic.
//!
//! "Nameless" means incidental surface details do not affect equality:
//!
//! - the quoting delimiter an atom was written with is ignored;
//! - a resolved reference is compared by what it points at, not what it is
//!   called; unresolved references fall back to their name.
//!
//! The oracle is total: terms of mismatched shape are simply unequal.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::reference::Ref;
use crate::utils::{pairing2, pairing3, StructuralHash};

/// One node of a boolean formula.
///
/// `Conditional` is the three-way `if-then-else` split the BDD engine
/// produces; `high` is the then-branch, `low` the else-branch. Engine-built
/// conditionals always have a bare [`Term::Atom`] as `condition`, and the
/// atom's tag orders the split.
#[derive(Debug, Clone)]
pub enum Term {
    True,
    False,
    Atom {
        name: String,
        /// The quoting delimiter recorded at construction time. Carried for
        /// diagnostics only; never part of the structural identity.
        delimiter: String,
    },
    Reference {
        name: String,
        /// The resolved target, if resolution has happened.
        target: Option<Ref>,
    },
    Conditional {
        condition: Ref,
        high: Ref,
        low: Ref,
    },
}

/// Structural equality, shallow over canonical children.
///
/// Mixed resolved/unresolved references compare unequal: deciding them by
/// name would make terms equal whose hashes differ, breaking the interning
/// contract.
impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Term::True, Term::True) => true,
            (Term::False, Term::False) => true,
            // The delimiter is spelling, not structure.
            (Term::Atom { name: a, .. }, Term::Atom { name: b, .. }) => a == b,
            // Resolved references are equal when they point at the same
            // canonical term, whatever they are called.
            (
                Term::Reference { target: Some(a), .. },
                Term::Reference { target: Some(b), .. },
            ) => a == b,
            (
                Term::Reference { name: a, target: None },
                Term::Reference { name: b, target: None },
            ) => a == b,
            (
                Term::Conditional { condition: c1, high: h1, low: l1 },
                Term::Conditional { condition: c2, high: h2, low: l2 },
            ) => c1 == c2 && h1 == h2 && l1 == l2,
            _ => false,
        }
    }
}

impl Eq for Term {}

// Per-shape seeds keep the variant hash spaces apart.
const SEED_ATOM: u64 = 2;
const SEED_REF_RESOLVED: u64 = 3;
const SEED_REF_NAMED: u64 = 4;

fn str_hash(s: &str) -> u64 {
    let mut h = DefaultHasher::new();
    s.hash(&mut h);
    h.finish()
}

/// Structural hash, consistent with the equality above: whatever equality
/// ignores, the hash must not see.
impl StructuralHash for Term {
    fn hash(&self) -> u64 {
        match self {
            Term::True => 0,
            Term::False => 1,
            Term::Atom { name, .. } => pairing2(SEED_ATOM, str_hash(name)),
            Term::Reference { target: Some(t), .. } => {
                pairing2(SEED_REF_RESOLVED, t.tag() as u64)
            }
            Term::Reference { name, target: None } => {
                pairing2(SEED_REF_NAMED, str_hash(name))
            }
            Term::Conditional { condition, high, low } => pairing3(
                condition.tag() as u64,
                high.tag() as u64,
                low.tag() as u64,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom(name: &str, delimiter: &str) -> Term {
        Term::Atom {
            name: name.to_string(),
            delimiter: delimiter.to_string(),
        }
    }

    #[test]
    fn test_terminals() {
        assert_eq!(Term::True, Term::True);
        assert_eq!(Term::False, Term::False);
        assert_ne!(Term::True, Term::False);
    }

    #[test]
    fn test_atom_spelling_is_ignored() {
        let quoted = atom("ready", "\"");
        let piped = atom("ready", "|");
        assert_eq!(quoted, piped);
        assert_eq!(StructuralHash::hash(&quoted), StructuralHash::hash(&piped));

        assert_ne!(atom("ready", "\""), atom("busy", "\""));
    }

    #[test]
    fn test_atom_is_not_a_terminal_or_reference() {
        assert_ne!(atom("t", "\""), Term::True);
        let named = Term::Reference {
            name: "t".to_string(),
            target: None,
        };
        assert_ne!(atom("t", "\""), named);
    }

    #[test]
    fn test_resolved_references_compare_by_target() {
        let p = Term::Reference {
            name: "p".to_string(),
            target: Some(Ref::new(5)),
        };
        let q = Term::Reference {
            name: "q".to_string(),
            target: Some(Ref::new(5)),
        };
        let r = Term::Reference {
            name: "p".to_string(),
            target: Some(Ref::new(6)),
        };
        assert_eq!(p, q);
        assert_eq!(StructuralHash::hash(&p), StructuralHash::hash(&q));
        assert_ne!(p, r);
    }

    #[test]
    fn test_unresolved_references_compare_by_name() {
        let a = Term::Reference {
            name: "a".to_string(),
            target: None,
        };
        let a2 = Term::Reference {
            name: "a".to_string(),
            target: None,
        };
        let b = Term::Reference {
            name: "b".to_string(),
            target: None,
        };
        assert_eq!(a, a2);
        assert_eq!(StructuralHash::hash(&a), StructuralHash::hash(&a2));
        assert_ne!(a, b);
    }

    #[test]
    fn test_mixed_resolution_is_unequal() {
        let named = Term::Reference {
            name: "a".to_string(),
            target: None,
        };
        let resolved = Term::Reference {
            name: "a".to_string(),
            target: Some(Ref::new(0)),
        };
        assert_ne!(named, resolved);
    }

    #[test]
    fn test_conditionals_compare_by_children() {
        let c1 = Term::Conditional {
            condition: Ref::new(0),
            high: Ref::new(1),
            low: Ref::new(2),
        };
        let c2 = Term::Conditional {
            condition: Ref::new(0),
            high: Ref::new(1),
            low: Ref::new(2),
        };
        let c3 = Term::Conditional {
            condition: Ref::new(0),
            high: Ref::new(2),
            low: Ref::new(1),
        };
        assert_eq!(c1, c2);
        assert_eq!(StructuralHash::hash(&c1), StructuralHash::hash(&c2));
        assert_ne!(c1, c3);
    }
}
