//! Shelf layout shared by every `MemoArray`.
//!
//! Shelf 0 holds index 0. Shelf `k ≥ 1` holds the `2^(k-1)` indices
//! `2^(k-1) ..= 2^k - 1`, so sizes double and the whole `usize` range fits
//! in `usize::BITS + 1` shelves. Resolving an index is one leading-zero count
//! plus a mask.

use std::ops::RangeInclusive;

/// Number of shelves needed to cover every `usize` index.
pub const SHELVES: usize = usize::BITS as usize + 1;

/// Shelf holding index `i`: the bit length of `i`.
#[inline]
pub const fn shelf_of(i: usize) -> usize {
    (usize::BITS - i.leading_zeros()) as usize
}

/// Position of index `i` inside its shelf: `i` with its top bit cleared.
#[inline]
pub const fn offset_in_shelf(i: usize) -> usize {
    match usize::MAX.checked_shr(i.leading_zeros() + 1) {
        Some(mask) => i & mask,
        None => 0,
    }
}

/// `(shelf, offset)` for index `i`.
#[inline]
pub const fn locate(i: usize) -> (usize, usize) {
    (shelf_of(i), offset_in_shelf(i))
}

/// First index stored in shelf `k`.
#[inline]
pub const fn shelf_start(k: usize) -> usize {
    if k == 0 { 0 } else { 1 << (k - 1) }
}

/// Number of slots in shelf `k`.
#[inline]
pub const fn shelf_len(k: usize) -> usize {
    if k == 0 { 1 } else { 1 << (k - 1) }
}

/// Indices covered by shelf `k`. Inclusive so the last shelf can end at `usize::MAX`.
#[inline]
pub fn shelf_range(k: usize) -> RangeInclusive<usize> {
    let start = shelf_start(k);
    start..=start + (shelf_len(k) - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_indices() {
        assert_eq!(locate(0), (0, 0));
        assert_eq!(locate(1), (1, 0));
        assert_eq!(locate(2), (2, 0));
        assert_eq!(locate(3), (2, 1));
        assert_eq!(locate(4), (3, 0));
        assert_eq!(locate(7), (3, 3));
        assert_eq!(locate(8), (4, 0));
    }

    #[test]
    fn test_extremes() {
        assert_eq!(shelf_of(usize::MAX), SHELVES - 1);
        assert_eq!(offset_in_shelf(usize::MAX), usize::MAX >> 1);
        assert_eq!(*shelf_range(SHELVES - 1).end(), usize::MAX);
    }

    #[test]
    fn test_shelves_tile_the_index_space() {
        let mut next = 0;
        for k in 0..20 {
            let range = shelf_range(k);
            assert_eq!(*range.start(), next, "shelf {k} leaves a gap");
            assert_eq!(range.clone().count(), shelf_len(k));
            for i in range {
                assert_eq!(locate(i), (k, i - shelf_start(k)));
            }
            next = shelf_start(k) + shelf_len(k);
        }
    }

    #[test]
    fn test_sizes_double() {
        for k in 2..SHELVES {
            assert_eq!(shelf_len(k), 2 * shelf_len(k - 1));
        }
        assert_eq!(shelf_len(0), shelf_len(1));
    }
}
