use std::fmt;
use std::ops::Index;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use crate::fix::Lookup;
use crate::iter::Iter;
use crate::shelf::{SHELVES, locate, shelf_len, shelf_of, shelf_range, shelf_start};
use crate::word;

/// How an array's shelves get filled. Reported in traces and `Debug` output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Pure generator, one call per index.
    Plain,
    /// Stateful generator, called in strictly increasing index order.
    Effectful,
    /// Generator reading smaller indices of the array being built.
    Recurrence,
    /// Result of `map_with_key` / `zip_with_key` over other arrays.
    Derived,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Effectful => "effectful",
            Self::Recurrence => "recurrence",
            Self::Derived => "derived",
        }
    }
}

type Fill<T> = dyn Fn(&Shelves<T>, usize) -> Box<[T]> + Send + Sync;

/// Shelf directory plus the function that realizes one shelf.
///
/// The fill function receives the directory itself so recurrences and
/// effectful generators can force lower shelves of the same array.
pub(crate) struct Shelves<T> {
    cells: [OnceLock<Box<[T]>>; SHELVES],
    fill: Box<Fill<T>>,
    mode: Mode,
}

impl<T> Shelves<T> {
    pub(crate) fn get(&self, k: usize) -> &[T] {
        self.cells[k].get_or_init(|| {
            let values = (self.fill)(self, k);
            debug_assert_eq!(values.len(), shelf_len(k));
            tracing::trace!(
                shelf = k,
                len = values.len(),
                mode = self.mode.as_str(),
                "realized shelf"
            );
            values
        })
    }
}

/// An infinite array over `usize` indices whose values are computed on first
/// access, one whole shelf at a time, and cached for the array's lifetime.
///
/// Cloning is cheap and shares the cache: a value computed through one
/// handle is visible through every clone. Shelves are published through
/// `OnceLock`, so even under concurrent first access each shelf is filled
/// exactly once.
pub struct MemoArray<T> {
    shelves: Arc<Shelves<T>>,
}

impl<T> Clone for MemoArray<T> {
    fn clone(&self) -> Self {
        Self {
            shelves: Arc::clone(&self.shelves),
        }
    }
}

impl<T: 'static> MemoArray<T> {
    fn from_fill<F>(mode: Mode, fill: F) -> Self
    where
        F: Fn(&Shelves<T>, usize) -> Box<[T]> + Send + Sync + 'static,
    {
        Self {
            shelves: Arc::new(Shelves {
                cells: std::array::from_fn(|_| OnceLock::new()),
                fill: Box::new(fill),
                mode,
            }),
        }
    }

    /// Array whose slot `i` is `f(i)`. Nothing is evaluated until indexed.
    pub fn tabulate<F>(f: F) -> Self
    where
        F: Fn(usize) -> T + Send + Sync + 'static,
    {
        Self::from_fill(Mode::Plain, move |_, k| shelf_range(k).map(&f).collect())
    }

    /// Array filled by a stateful generator.
    ///
    /// `f` runs exactly once per index and always in increasing index order:
    /// demanding shelf `k` first realizes every shelf below it. Access stays
    /// lazy in the sense that shelves past the highest one demanded are never
    /// filled. If `f` panics, the values it already produced for that shelf
    /// are kept and the next access resumes at the index that panicked.
    pub fn tabulate_effectful<F>(f: F) -> Self
    where
        T: Send,
        F: FnMut(usize) -> T + Send + 'static,
    {
        // Generator plus the finished prefix of the lowest unrealized shelf.
        let state = Mutex::new((f, Vec::new()));
        Self::from_fill(Mode::Effectful, move |shelves, k| {
            if k > 0 {
                shelves.get(k - 1);
            }
            let mut guard = state.lock().unwrap_or_else(PoisonError::into_inner);
            let (f, pending) = &mut *guard;
            for i in shelf_range(k).skip(pending.len()) {
                let value = f(i);
                pending.push(value);
            }
            std::mem::take(pending).into_boxed_slice()
        })
    }

    /// Memoized recurrence: `g(i, lookup)` may read any index `< i` through
    /// `lookup`, and those reads come from this array's own cache.
    ///
    /// Shelves are filled front to back, so reads inside the shelf being
    /// built see the values already produced for it. Reading an index
    /// `>= i` is reported by [`Lookup::try_get`] and panics in
    /// [`Lookup::get`]. Recursion depth is bounded by the shelf count, not by
    /// the index.
    pub fn tabulate_fix<G>(g: G) -> Self
    where
        G: Fn(usize, &Lookup<'_, T>) -> T + Send + Sync + 'static,
    {
        Self::from_fill(Mode::Recurrence, move |shelves, k| {
            let mut values = Vec::with_capacity(shelf_len(k));
            for i in shelf_range(k) {
                let value = g(i, &Lookup::new(shelves, i, &values));
                values.push(value);
            }
            values.into_boxed_slice()
        })
    }

    /// `seed, f(seed), f(f(seed)), …`
    pub fn iterate<F>(seed: T, f: F) -> Self
    where
        T: Clone + Send + Sync,
        F: Fn(&T) -> T + Send + Sync + 'static,
    {
        Self::tabulate_fix(move |i, lookup| {
            if i == 0 {
                seed.clone()
            } else {
                f(lookup.get(i - 1))
            }
        })
    }

    /// Sequential unfolding: slot `i` is the `i`-th value `step` yields while
    /// threading `seed` through.
    pub fn unfold<S, F>(seed: S, mut step: F) -> Self
    where
        T: Send,
        S: Send + 'static,
        F: FnMut(&mut S) -> T + Send + 'static,
    {
        let mut state = seed;
        Self::tabulate_effectful(move |_| step(&mut state))
    }

    /// Periodic array repeating `values`. `None` when `values` is empty.
    pub fn cycle(values: Vec<T>) -> Option<Self>
    where
        T: Clone + Send + Sync,
    {
        if values.is_empty() {
            return None;
        }
        Some(Self::tabulate(move |i| values[i % values.len()].clone()))
    }

    /// `values` followed by `default` forever.
    pub fn from_vec_with_default(values: Vec<T>, default: T) -> Self
    where
        T: Clone + Send + Sync,
    {
        Self::tabulate(move |i| values.get(i).unwrap_or(&default).clone())
    }

    /// Array over signed indices, laid out as `0, -1, 1, -2, 2, …`.
    pub fn tabulate_signed<F>(f: F) -> Self
    where
        F: Fn(isize) -> T + Send + Sync + 'static,
    {
        Self::tabulate(move |w| f(word::to_signed(w)))
    }

    /// Memoized version of `f`.
    pub fn memoize<F>(f: F) -> impl Fn(usize) -> T
    where
        T: Clone,
        F: Fn(usize) -> T + Send + Sync + 'static,
    {
        let array = Self::tabulate(f);
        move |i| array.index(i).clone()
    }

    /// Memoized fixpoint of `g`, see [`MemoArray::tabulate_fix`].
    pub fn memoize_fix<G>(g: G) -> impl Fn(usize) -> T
    where
        T: Clone,
        G: Fn(usize, &Lookup<'_, T>) -> T + Send + Sync + 'static,
    {
        let array = Self::tabulate_fix(g);
        move |i| array.index(i).clone()
    }
}

impl<T: Send + Sync + 'static> MemoArray<T> {
    /// Array whose slot `i` is `f(i, &self[i])`.
    ///
    /// Nothing is forced here; realizing a shelf of the result realizes the
    /// same shelf of `self`.
    pub fn map_with_key<U, F>(&self, f: F) -> MemoArray<U>
    where
        U: 'static,
        F: Fn(usize, &T) -> U + Send + Sync + 'static,
    {
        let source = self.clone();
        MemoArray::from_fill(Mode::Derived, move |_, k| {
            let start = shelf_start(k);
            source
                .shelf(k)
                .iter()
                .enumerate()
                .map(|(offset, value)| f(start + offset, value))
                .collect()
        })
    }

    pub fn map<U, F>(&self, f: F) -> MemoArray<U>
    where
        U: 'static,
        F: Fn(&T) -> U + Send + Sync + 'static,
    {
        self.map_with_key(move |_, value| f(value))
    }

    /// Array whose slot `i` is `f(i, &self[i], &other[i])`, forced shelf by
    /// shelf like [`MemoArray::map_with_key`].
    pub fn zip_with_key<U, V, F>(&self, other: &MemoArray<U>, f: F) -> MemoArray<V>
    where
        U: Send + Sync + 'static,
        V: 'static,
        F: Fn(usize, &T, &U) -> V + Send + Sync + 'static,
    {
        let left = self.clone();
        let right = other.clone();
        MemoArray::from_fill(Mode::Derived, move |_, k| {
            let start = shelf_start(k);
            left.shelf(k)
                .iter()
                .zip(right.shelf(k))
                .enumerate()
                .map(|(offset, (a, b))| f(start + offset, a, b))
                .collect()
        })
    }

    pub fn zip<U, V, F>(&self, other: &MemoArray<U>, f: F) -> MemoArray<V>
    where
        U: Send + Sync + 'static,
        V: 'static,
        F: Fn(&T, &U) -> V + Send + Sync + 'static,
    {
        self.zip_with_key(other, move |_, a, b| f(a, b))
    }
}

impl<T> MemoArray<T> {
    /// Value at `i`, realizing its shelf first if needed.
    #[inline]
    pub fn index(&self, i: usize) -> &T {
        let (k, offset) = locate(i);
        &self.shelves.get(k)[offset]
    }

    pub fn index_signed(&self, i: isize) -> &T {
        self.index(word::from_signed(i))
    }

    /// All values of shelf `k`, realizing it if needed.
    ///
    /// # Panics
    /// If `k >= SHELVES`.
    pub fn shelf(&self, k: usize) -> &[T] {
        self.shelves.get(k)
    }

    /// Values at `0, 1, 2, …`. Every call starts a fresh enumeration.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self)
    }

    pub fn prefix(&self, n: usize) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().take(n).cloned().collect()
    }

    /// Whether the shelf holding `i` has been computed.
    pub fn is_realized(&self, i: usize) -> bool {
        self.shelves.cells[shelf_of(i)].get().is_some()
    }

    pub fn realized_shelves(&self) -> usize {
        self.shelves
            .cells
            .iter()
            .filter(|cell| cell.get().is_some())
            .count()
    }

    pub fn mode(&self) -> Mode {
        self.shelves.mode
    }
}

impl<T> Index<usize> for MemoArray<T> {
    type Output = T;

    fn index(&self, i: usize) -> &T {
        MemoArray::index(self, i)
    }
}

impl<'a, T> IntoIterator for &'a MemoArray<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T> fmt::Debug for MemoArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoArray")
            .field("mode", &self.shelves.mode)
            .field("realized_shelves", &self.realized_shelves())
            .finish()
    }
}
