use crate::array::Shelves;
use crate::error::{ChimeraError, Result};
use crate::shelf::{locate, shelf_of};

/// Read access handed to a recurrence generator while it computes one index.
///
/// Reads below the current shelf go through the array's cache (realizing
/// lower shelves on demand); reads inside the current shelf come from the
/// values already produced for it.
pub struct Lookup<'a, T> {
    shelves: &'a Shelves<T>,
    at: usize,
    shelf: usize,
    partial: &'a [T],
}

impl<'a, T> Lookup<'a, T> {
    pub(crate) fn new(shelves: &'a Shelves<T>, at: usize, partial: &'a [T]) -> Self {
        Self {
            shelves,
            at,
            shelf: shelf_of(at),
            partial,
        }
    }

    /// Index currently being computed.
    pub fn index(&self) -> usize {
        self.at
    }

    /// Value at `j`, or `UpwardReference` unless `j` is strictly below the
    /// index being computed.
    pub fn try_get(&self, j: usize) -> Result<&'a T> {
        if j >= self.at {
            tracing::debug!(index = self.at, requested = j, "upward reference in recurrence");
            return Err(ChimeraError::UpwardReference {
                index: self.at,
                requested: j,
            });
        }
        let (k, offset) = locate(j);
        if k == self.shelf {
            Ok(&self.partial[offset])
        } else {
            Ok(&self.shelves.get(k)[offset])
        }
    }

    /// Value at `j`.
    ///
    /// # Panics
    /// If `j` is not strictly below the index being computed.
    pub fn get(&self, j: usize) -> &'a T {
        match self.try_get(j) {
            Ok(value) => value,
            Err(e) => panic!("{e}"),
        }
    }
}
