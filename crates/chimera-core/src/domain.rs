//! Memo arrays behind an index transform.
//!
//! Each adapter maps its natural key into the dense index space of a
//! `MemoArray` on the way in, and back to natural coordinates before calling
//! the user's generator.

use crate::array::MemoArray;
use crate::curve::{from_curve, from_curve3, to_curve, to_curve3};
use crate::error::Result;
use crate::fix::Lookup;
use crate::wheel::Wheel;

/// A function memoized only on the integers coprime to a wheel's modulus.
///
/// Storage is `totient / modulus` of a plain array over the same range
/// (1/2, 1/3, 4/15 or 8/35).
#[derive(Clone, Debug)]
pub struct WheelMemo<T> {
    wheel: Wheel,
    array: MemoArray<T>,
}

impl<T: 'static> WheelMemo<T> {
    pub fn new<F>(wheel: Wheel, f: F) -> Self
    where
        F: Fn(usize) -> T + Send + Sync + 'static,
    {
        Self {
            wheel,
            array: MemoArray::tabulate(move |i| f(wheel.from_wheel(i))),
        }
    }
}

impl<T> WheelMemo<T> {
    /// Memoized value at `n`, or `None` when `n` is not on the wheel.
    pub fn get(&self, n: usize) -> Option<&T> {
        if self.wheel.contains(n) {
            Some(self.array.index(self.wheel.to_wheel(n)))
        } else {
            None
        }
    }

    pub fn wheel(&self) -> Wheel {
        self.wheel
    }

    /// Underlying array, indexed by wheel position.
    pub fn array(&self) -> &MemoArray<T> {
        &self.array
    }
}

/// A memoized function of two coordinates, stored along the Z-order curve.
#[derive(Clone, Debug)]
pub struct Grid2<T> {
    array: MemoArray<T>,
}

/// Cell access for a 2D recurrence. See [`Grid2::fix`].
pub struct Lookup2<'a, T> {
    inner: &'a Lookup<'a, T>,
}

impl<'a, T> Lookup2<'a, T> {
    pub fn try_get(&self, x: usize, y: usize) -> Result<&'a T> {
        self.inner.try_get(to_curve(x, y))
    }

    /// # Panics
    /// If `(x, y)` does not precede the cell being computed on the curve.
    pub fn get(&self, x: usize, y: usize) -> &'a T {
        self.inner.get(to_curve(x, y))
    }
}

impl<T: 'static> Grid2<T> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(usize, usize) -> T + Send + Sync + 'static,
    {
        Self {
            array: MemoArray::tabulate(move |key| {
                let (x, y) = from_curve(key);
                f(x, y)
            }),
        }
    }

    /// 2D recurrence. A cell may read any cell that is componentwise `<=`
    /// and not equal to it, since those always sit earlier on the curve.
    pub fn fix<G>(g: G) -> Self
    where
        G: Fn(usize, usize, &Lookup2<'_, T>) -> T + Send + Sync + 'static,
    {
        Self {
            array: MemoArray::tabulate_fix(move |key, lookup| {
                let (x, y) = from_curve(key);
                g(x, y, &Lookup2 { inner: lookup })
            }),
        }
    }
}

impl<T> Grid2<T> {
    pub fn get(&self, x: usize, y: usize) -> &T {
        self.array.index(to_curve(x, y))
    }

    pub fn array(&self) -> &MemoArray<T> {
        &self.array
    }
}

/// A memoized function of three coordinates, stored along the 3D Z-order curve.
#[derive(Clone, Debug)]
pub struct Grid3<T> {
    array: MemoArray<T>,
}

impl<T: 'static> Grid3<T> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(usize, usize, usize) -> T + Send + Sync + 'static,
    {
        Self {
            array: MemoArray::tabulate(move |key| {
                let (x, y, z) = from_curve3(key);
                f(x, y, z)
            }),
        }
    }
}

impl<T> Grid3<T> {
    pub fn get(&self, x: usize, y: usize, z: usize) -> &T {
        self.array.index(to_curve3(x, y, z))
    }

    pub fn array(&self) -> &MemoArray<T> {
        &self.array
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn is_prime(n: usize) -> bool {
        n >= 2 && (2..).take_while(|d| d * d <= n).all(|d| n % d != 0)
    }

    #[test]
    fn test_wheel_memo_primes() {
        let primes = WheelMemo::new(Wheel::W30, is_prime);
        assert_eq!(primes.get(31), Some(&true));
        assert_eq!(primes.get(49), Some(&false));
        assert_eq!(primes.get(1), Some(&false));
        assert_eq!(primes.get(15), None);
        assert_eq!(primes.get(0), None);
        assert_eq!(primes.wheel(), Wheel::W30);
    }

    #[test]
    fn test_wheel_memo_only_evaluates_wheel_elements() {
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&seen);
        let odd = WheelMemo::new(Wheel::W2, move |n| {
            assert_eq!(n % 2, 1, "generator called off the wheel");
            counter.fetch_add(1, Ordering::SeqCst);
            n / 2
        });
        assert_eq!(odd.get(9), Some(&4));
        assert_eq!(odd.get(10), None);
        // 9 is wheel index 4, in shelf 3 (indices 4..=7).
        assert_eq!(seen.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_grid2_matches_function() {
        let grid = Grid2::new(|x, y| x * 1000 + y);
        assert_eq!(*grid.get(3, 4), 3004);
        assert_eq!(*grid.get(0, 77), 77);
        assert_eq!(*grid.get(500, 0), 500_000);
    }

    #[test]
    fn test_grid2_lattice_paths() {
        let paths = Grid2::<u64>::fix(|x, y, paths| {
            if x == 0 || y == 0 {
                1
            } else {
                paths.get(x - 1, y) + paths.get(x, y - 1)
            }
        });
        assert_eq!(*paths.get(2, 2), 6);
        assert_eq!(*paths.get(10, 10), 184_756);
        assert_eq!(*paths.get(3, 7), 120);
    }

    #[test]
    fn test_grid3_matches_function() {
        let grid = Grid3::new(|x, y, z| (x, y, z));
        assert_eq!(*grid.get(1, 2, 3), (1, 2, 3));
        assert_eq!(*grid.get(40, 0, 9), (40, 0, 9));
    }
}
