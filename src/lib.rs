//! # termdd: hash-consed terms and canonicalizing BDDs
//!
//! **`termdd`** is the formula-construction core of a property-specification
//! toolchain: a canonicalizing **Binary Decision Diagram (BDD)** engine built
//! on a generic hash-consing (structural interning) substrate.
//!
//! ## What it guarantees
//!
//! Every formula built through the engine is a *canonical handle*: for a
//! fixed variable ordering, structurally equal formulas are the same handle,
//! so logical equivalence checks are a single integer comparison. The engine
//! maintains three invariants over arbitrarily large formula graphs:
//!
//! - **Canonicality** --- interning maps each structural-equality class to
//!   exactly one handle, shared forever.
//! - **Ordering** --- every produced conditional splits on the variable with
//!   the smallest interning tag among its operands; tags are assigned in
//!   creation order and double as the total variable order.
//! - **Reducedness** --- a conditional whose branches agree is never stored;
//!   it collapses to the shared branch.
//!
//! ## Key pieces
//!
//! - **Manager-centric API**: all operations go through the [`Bdd`][crate::bdd::Bdd]
//!   manager, which owns the [`TermStore`][crate::store::TermStore] (the only
//!   shared mutable state) and the operation memo cache.
//! - **Structural ("nameless") interning**: atoms compare by name, not by
//!   the delimiter they were quoted with; resolved references compare by
//!   their target, not their name. See [`term`].
//! - **Shannon expansion with fast paths**: all connectives reduce to
//!   [`ite`][crate::bdd::Bdd::ite]; an algebraic fast-path layer
//!   short-circuits terminal operands, idempotence and double negation, and
//!   normalizes commutative operands --- without ever changing the resulting
//!   handle.
//!
//! ## Basic usage
//!
//! ```rust
//! use termdd::bdd::Bdd;
//!
//! // 1. One manager per formula universe.
//! let bdd = Bdd::default();
//!
//! // 2. Atoms are ordered by creation.
//! let req = bdd.atom("request");
//! let ack = bdd.atom("acknowledge");
//!
//! // 3. Build formulas through the manager.
//! let f = bdd.implies(req, ack);
//! let g = bdd.or(bdd.not(req), ack);
//!
//! // 4. Equivalent formulas are the same handle.
//! assert_eq!(f, g);
//! assert_eq!(bdd.and(f, bdd.not(g)), bdd.zero);
//! ```
//!
//! ## Sessions and threading
//!
//! A `Bdd` is a single-writer universe: share it freely within one thread,
//! and give independent sessions independent managers. The manager is not
//! `Sync`; cross-thread sharing requires external synchronization by
//! design.
//!
//! ## Core components
//!
//! - **[`bdd`]**: the [`Bdd`][crate::bdd::Bdd] manager --- ITE/Shannon
//!   expansion, fast-path connectives, cofactor extraction.
//! - **[`store`]**: canonicalizing construction primitives over the
//!   interning table.
//! - **[`term`]**: the closed term union and the structural
//!   equality/hash oracle.
//! - **[`table`]**: the generic hash-consing table.
//! - **[`cache`]**: exact operation memoization with hit/miss accounting.

pub mod bdd;
pub mod cache;
pub mod reference;
pub mod store;
pub mod table;
pub mod term;
pub mod utils;
