//! Division by the small wheel constants without a hardware divide.
//!
//! `n / d` is computed as `((n >> pre) * magic) >> post`, with `magic` a
//! rounded-up fixed-point reciprocal. Every constant below satisfies the
//! Granlund–Montgomery bound `magic * (d >> pre) - 2^post <= 2^(post - bits + pre)`
//! for its word width, which makes the quotient exact for every input of that
//! width. The table matching the target's pointer width is picked at compile
//! time; other widths divide directly.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reciprocal {
    pub divisor: u64,
    pub pre: u32,
    pub magic: u64,
    pub post: u32,
}

impl Reciprocal {
    #[inline]
    pub const fn div_u64(self, n: u64) -> u64 {
        (((n >> self.pre) as u128 * self.magic as u128) >> self.post) as u64
    }

    #[inline]
    pub const fn div_u32(self, n: u32) -> u32 {
        (((n >> self.pre) as u64 * self.magic) >> self.post) as u32
    }
}

/// Reciprocals for one word width.
#[derive(Clone, Copy, Debug)]
pub struct Table {
    pub div6: Reciprocal,
    pub div30: Reciprocal,
    pub div48: Reciprocal,
    pub div210: Reciprocal,
}

pub const W64: Table = Table {
    div6: Reciprocal { divisor: 6, pre: 0, magic: 0xAAAA_AAAA_AAAA_AAAB, post: 66 },
    div30: Reciprocal { divisor: 30, pre: 0, magic: 0x8888_8888_8888_8889, post: 68 },
    div48: Reciprocal { divisor: 48, pre: 0, magic: 0xAAAA_AAAA_AAAA_AAAB, post: 69 },
    div210: Reciprocal { divisor: 210, pre: 0, magic: 0x4E04_E04E_04E0_4E05, post: 70 },
};

// 1 / 210 needs a 33-bit multiplier at 32 bits; halving first brings it to 1 / 105.
pub const W32: Table = Table {
    div6: Reciprocal { divisor: 6, pre: 0, magic: 0xAAAA_AAAB, post: 34 },
    div30: Reciprocal { divisor: 30, pre: 0, magic: 0x8888_8889, post: 36 },
    div48: Reciprocal { divisor: 48, pre: 0, magic: 0xAAAA_AAAB, post: 37 },
    div210: Reciprocal { divisor: 210, pre: 1, magic: 0x9C09_C09D, post: 38 },
};

#[cfg(target_pointer_width = "64")]
pub const WORD: Table = W64;

#[cfg(not(target_pointer_width = "64"))]
pub const WORD: Table = W32;

/// `n / r.divisor` for a machine word.
#[cfg(target_pointer_width = "64")]
#[inline]
pub const fn div(r: Reciprocal, n: usize) -> usize {
    r.div_u64(n as u64) as usize
}

#[cfg(target_pointer_width = "32")]
#[inline]
pub const fn div(r: Reciprocal, n: usize) -> usize {
    r.div_u32(n as u32) as usize
}

#[cfg(not(any(target_pointer_width = "32", target_pointer_width = "64")))]
#[inline]
pub const fn div(r: Reciprocal, n: usize) -> usize {
    n / r.divisor as usize
}

/// `(n / r.divisor, n % r.divisor)` for a machine word.
#[inline]
pub const fn div_rem(r: Reciprocal, n: usize) -> (usize, usize) {
    let q = div(r, n);
    (q, n - q * r.divisor as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all(table: Table) -> [Reciprocal; 4] {
        [table.div6, table.div30, table.div48, table.div210]
    }

    /// Checks the error bound that guarantees exactness for `bits`-wide inputs.
    fn exact_for_width(r: Reciprocal, bits: u32) -> bool {
        let d = (r.divisor >> r.pre) as u128;
        let excess = r.magic as u128 * d - (1u128 << r.post);
        r.magic as u128 * d >= 1u128 << r.post
            && excess << (bits - r.pre) <= 1u128 << r.post
            && r.divisor % (1 << r.pre) == 0
    }

    #[test]
    fn test_constants_are_provably_exact() {
        for r in all(W64) {
            assert!(exact_for_width(r, 64), "{r:?} not exact at 64 bits");
        }
        for r in all(W32) {
            assert!(exact_for_width(r, 32), "{r:?} not exact at 32 bits");
            assert!(r.magic < 1 << (32 + r.pre), "{r:?} overflows a 64-bit product");
        }
    }

    #[test]
    fn test_u64_edges() {
        for r in all(W64) {
            let d = r.divisor;
            for n in [0, 1, d - 1, d, d + 1, u64::MAX, u64::MAX - 1, u64::MAX - d] {
                assert_eq!(r.div_u64(n), n / d, "{n} / {d}");
            }
            let top = u64::MAX / d * d;
            for n in [top - 1, top, top.wrapping_add(d - 1)] {
                assert_eq!(r.div_u64(n), n / d, "{n} / {d}");
            }
        }
    }

    #[test]
    fn test_u32_edges() {
        for r in all(W32) {
            let d = r.divisor as u32;
            for n in [0, 1, d - 1, d, d + 1, u32::MAX, u32::MAX - 1, u32::MAX - d] {
                assert_eq!(r.div_u32(n), n / d, "{n} / {d}");
            }
        }
    }

    #[test]
    fn test_u32_dense_low_range() {
        for r in all(W32) {
            let d = r.divisor as u32;
            for n in 0..100_000u32 {
                assert_eq!(r.div_u32(n), n / d);
            }
        }
    }

    #[test]
    fn test_word_div_rem() {
        for n in [0usize, 5, 29, 30, 31, 209, 210, 211, usize::MAX] {
            assert_eq!(div_rem(WORD.div30, n), (n / 30, n % 30));
            assert_eq!(div_rem(WORD.div210, n), (n / 210, n % 210));
            assert_eq!(div_rem(WORD.div6, n), (n / 6, n % 6));
            assert_eq!(div_rem(WORD.div48, n), (n / 48, n % 48));
        }
    }
}
