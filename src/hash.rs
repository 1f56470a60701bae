//! Perfect hashes for structural keys.
//!
//! The unique table and the operation cache both index by a single `u64`
//! computed from small non-negative integers (variable ids and node ids).
//! A pairing function keeps distinct keys distinct, so a bucket/slot
//! collision can only come from the bitmask truncation, never from the
//! hash itself.

/// [Szudzik pairing function][szudzik-pairing].
///
/// ```text
/// (a, b) -> if (a < b) then (b^2 + a) else (a^2 + a + b)
/// ```
///
/// [szudzik-pairing]: https://en.wikipedia.org/wiki/Pairing_function
pub fn pairing2(a: u64, b: u64) -> u64 {
    if a < b {
        b.wrapping_mul(b).wrapping_add(a)
    } else {
        a.wrapping_mul(a).wrapping_add(a).wrapping_add(b)
    }
}

/// Pairing function for three `u64` values.
pub fn pairing3(a: u64, b: u64, c: u64) -> u64 {
    pairing2(pairing2(a, b), c)
}

/// Hash suitable for the unique table and the operation cache.
///
/// Implementations are expected to be collision-free on the value ranges
/// that actually occur (a *perfect* hash), so that table lookups can
/// compare hashes before values.
pub trait StructuralHash {
    fn hash64(&self) -> u64;
}

impl StructuralHash for (u64, u64) {
    fn hash64(&self) -> u64 {
        pairing2(self.0, self.1)
    }
}

impl StructuralHash for (u64, u64, u64) {
    fn hash64(&self) -> u64 {
        pairing3(self.0, self.1, self.2)
    }
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
        assert_eq!(pairing2(0, 0), 0);
        assert_eq!(pairing2(0, 1), 1);
        assert_eq!(pairing2(1, 0), 2);
        assert_eq!(pairing2(1, 1), 3);
        assert_eq!(pairing2(0, 2), 4);
        assert_eq!(pairing2(1, 2), 5);
        assert_eq!(pairing2(2, 0), 6);
        assert_eq!(pairing2(2, 1), 7);
        assert_eq!(pairing2(2, 2), 8);
        assert_eq!(pairing2(0, 4), 16);
        assert_eq!(pairing2(4, 0), 20);
        assert_eq!(pairing2(4, 4), 24);
    }

    #[test]
    fn test_pairing3_distinct() {
        let keys = [(1, 2, 3), (3, 2, 1), (2, 1, 3), (1, 3, 2)];
        for (i, a) in keys.iter().enumerate() {
            for (j, b) in keys.iter().enumerate() {
                if i != j {
                    assert_ne!(pairing3(a.0, a.1, a.2), pairing3(b.0, b.1, b.2));
                }
            }
        }
    }
}
