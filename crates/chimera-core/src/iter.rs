use std::iter::FusedIterator;
use std::slice;

use crate::array::MemoArray;
use crate::shelf::SHELVES;

/// Lazy enumeration of a `MemoArray` from index 0.
///
/// Shelves are realized only when the iterator reaches them.
pub struct Iter<'a, T> {
    array: &'a MemoArray<T>,
    next_shelf: usize,
    current: slice::Iter<'a, T>,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(array: &'a MemoArray<T>) -> Self {
        Self {
            array,
            next_shelf: 0,
            current: Default::default(),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        loop {
            if let Some(value) = self.current.next() {
                return Some(value);
            }
            if self.next_shelf >= SHELVES {
                return None;
            }
            self.current = self.array.shelf(self.next_shelf).iter();
            self.next_shelf += 1;
        }
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_realizes_shelves_as_it_goes() {
        let array = MemoArray::tabulate(|i| i + 1);
        let mut iter = array.iter();
        assert_eq!(iter.next(), Some(&1));
        assert_eq!(array.realized_shelves(), 1);
        assert_eq!(iter.next(), Some(&2));
        assert_eq!(iter.next(), Some(&3));
        assert_eq!(array.realized_shelves(), 3);
    }

    #[test]
    fn test_independent_enumerations() {
        let array = MemoArray::tabulate(|i| i);
        let mut a = array.iter();
        let mut b = array.iter();
        a.nth(40);
        assert_eq!(b.next(), Some(&0));
        assert_eq!(a.next(), Some(&41));
    }
}
