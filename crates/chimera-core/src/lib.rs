//! Lazy, infinite, memoizing arrays over machine-word indices.
//!
//! A `MemoArray` behaves as if it held a value for every `usize`, computing
//! each one on first access and caching it forever. Storage is split into
//! shelves whose sizes double, so locating an index is a leading-zero count
//! and a shelf is computed as a whole the first time any of its slots is
//! read.
//!
//! Wheel and Z-order transforms shrink or pack the index domain before it
//! reaches the array: memoize only odd numbers, only numbers coprime to 210,
//! or a 2D/3D grid along a space-filling curve.
//!
//! Zero I/O. Shelf realization is reported through `tracing` at trace level.

pub mod array;
pub mod curve;
pub mod domain;
pub mod error;
pub mod fix;
pub mod iter;
pub mod reciprocal;
pub mod shelf;
pub mod wheel;
pub mod word;

pub use array::{MemoArray, Mode};
pub use curve::{from_curve, from_curve3, to_curve, to_curve3};
pub use domain::{Grid2, Grid3, Lookup2, WheelMemo};
pub use error::{ChimeraError, Result};
pub use fix::Lookup;
pub use iter::Iter;
pub use shelf::SHELVES;
pub use wheel::{
    Wheel, from_wheel2, from_wheel6, from_wheel30, from_wheel210, to_wheel2, to_wheel6,
    to_wheel30, to_wheel210,
};
