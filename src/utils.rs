//! Hashing primitives for the interning substrate.
//!
//! The interning table keys entries by a *structural* hash, computed once per
//! term and memoized. [`StructuralHash`] is deliberately distinct from
//! [`std::hash::Hash`]: the latter is what the memo cache uses on canonical
//! handles, the former is the oracle-defined hash over term shapes.

/// [Szudzik pairing function][szudzik-pairing].
///
/// ```text
/// (a, b) -> if (a < b) then (b^2 + a) else (a^2 + a + b)
/// ```
///
/// Wraps on overflow: the result is a hash, not an index.
///
/// [szudzik-pairing]: https://en.wikipedia.org/wiki/Pairing_function
pub fn pairing_szudzik(a: u64, b: u64) -> u64 {
    if a < b {
        b.wrapping_mul(b).wrapping_add(a)
    } else {
        a.wrapping_mul(a).wrapping_add(a).wrapping_add(b)
    }
}

/// Pairing function for two `u64` values.
pub fn pairing2(a: u64, b: u64) -> u64 {
    pairing_szudzik(a, b)
}

/// Pairing function for three `u64` values.
pub fn pairing3(a: u64, b: u64, c: u64) -> u64 {
    pairing2(pairing2(a, b), c)
}

/// Structural hash used as the interning key.
///
/// Consistency contract: values that are structurally equal (per the
/// structural equality oracle) must hash equal. Collisions between unequal
/// values are fine; the table resolves them by chaining.
pub trait StructuralHash {
    fn hash(&self) -> u64;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_szudzik() {
        // a\b  0  1  2  3  4
        // ------------------
        // 0    0  1  4  9 16
        // 1    2  3  5 10 17
        // 2    6  7  8 11 18
        // 3   12 13 14 15 19
        // 4   20 21 22 23 24
        assert_eq!(pairing_szudzik(0, 0), 0);
        assert_eq!(pairing_szudzik(0, 1), 1);
        assert_eq!(pairing_szudzik(1, 0), 2);
        assert_eq!(pairing_szudzik(1, 1), 3);
        assert_eq!(pairing_szudzik(0, 2), 4);
        assert_eq!(pairing_szudzik(1, 2), 5);
        assert_eq!(pairing_szudzik(2, 0), 6);
        assert_eq!(pairing_szudzik(2, 1), 7);
        assert_eq!(pairing_szudzik(2, 2), 8);
        assert_eq!(pairing_szudzik(4, 0), 20);
        assert_eq!(pairing_szudzik(4, 4), 24);
    }

    #[test]
    fn test_pairing_is_injective_on_small_values() {
        let mut seen = std::collections::HashSet::new();
        for a in 0..64u64 {
            for b in 0..64u64 {
                assert!(seen.insert(pairing2(a, b)), "collision at ({}, {})", a, b);
            }
        }
    }

    #[test]
    fn test_pairing3_distinguishes_argument_order() {
        assert_ne!(pairing3(1, 2, 3), pairing3(3, 2, 1));
        assert_ne!(pairing3(1, 2, 3), pairing3(2, 1, 3));
    }
}
