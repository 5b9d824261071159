//! Signed ↔ unsigned machine words.
//!
//! Zigzag order (`0, -1, 1, -2, 2, …`) keeps small magnitudes at small
//! indices, so a signed domain stays dense in a `MemoArray`. Both directions
//! are total, including `isize::MIN` and `isize::MAX`.

#[inline]
pub const fn from_signed(i: isize) -> usize {
    ((i << 1) ^ (i >> (isize::BITS - 1))) as usize
}

#[inline]
pub const fn to_signed(w: usize) -> isize {
    ((w >> 1) as isize) ^ -((w & 1) as isize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zigzag_order() {
        let words: Vec<usize> = [0, -1, 1, -2, 2].into_iter().map(from_signed).collect();
        assert_eq!(words, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_extremes_roundtrip() {
        for i in [isize::MIN, isize::MIN + 1, -1, 0, 1, isize::MAX - 1, isize::MAX] {
            assert_eq!(to_signed(from_signed(i)), i);
        }
        assert_eq!(from_signed(isize::MIN), usize::MAX);
        assert_eq!(from_signed(isize::MAX), usize::MAX - 1);
        for w in [0, 1, usize::MAX - 1, usize::MAX] {
            assert_eq!(from_signed(to_signed(w)), w);
        }
    }
}
