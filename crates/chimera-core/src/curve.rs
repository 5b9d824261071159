//! Z-order (Morton) curves: interleave 2 or 3 coordinates into one word.
//!
//! In 2D each coordinate gets `usize::BITS / 2` bits, `x` on even bit
//! positions and `y` on odd ones. In 3D each coordinate gets
//! `usize::BITS / 3` bits; `from_curve3` only reads the low
//! `3 * (usize::BITS / 3)` bits of its key, so `to_curve3(from_curve3(z))`
//! is `z` modulo `2^CURVE3_KEY_BITS`. Coordinates wider than their share are
//! truncated.
//!
//! Spreading and compacting use the usual shift-or-mask ladders; the masks
//! are derived at compile time from the word width.

/// Bits per coordinate in 2D.
pub const CURVE2_COORD_BITS: u32 = usize::BITS / 2;
/// Bits per coordinate in 3D.
pub const CURVE3_COORD_BITS: u32 = usize::BITS / 3;
/// Bits of a 3D key that carry coordinates.
pub const CURVE3_KEY_BITS: u32 = 3 * CURVE3_COORD_BITS;

const LADDER: usize = usize::BITS.trailing_zeros() as usize + 1;

/// Mask ladder for spreading `width`-bit coordinates `dims` bits apart.
///
/// `masks[t]` holds the positions bit `b` occupies once the ladder has
/// reached step `s = 2^t`: `dims * s * (b / s) + b % s`.
struct Lanes {
    dims: u32,
    top: usize,
    masks: [usize; LADDER],
}

impl Lanes {
    const fn new(dims: u32) -> Self {
        let width = usize::BITS / dims;
        let top = width.next_power_of_two().trailing_zeros() as usize;
        let mut masks = [0usize; LADDER];
        let mut t = 0;
        while t <= top {
            let s = 1 << t;
            let mut b = 0;
            while b < width {
                masks[t] |= 1 << (dims * s * (b / s) + b % s);
                b += 1;
            }
            t += 1;
        }
        Self { dims, top, masks }
    }

    #[inline]
    const fn spread(&self, mut x: usize) -> usize {
        x &= self.masks[self.top];
        let mut t = self.top;
        while t > 0 {
            t -= 1;
            x = (x | (x << ((self.dims - 1) << t))) & self.masks[t];
        }
        x
    }

    #[inline]
    const fn compact(&self, mut x: usize) -> usize {
        x &= self.masks[0];
        let mut t = 0;
        while t < self.top {
            x = (x | (x >> ((self.dims - 1) << t))) & self.masks[t + 1];
            t += 1;
        }
        x
    }
}

const PAIR: Lanes = Lanes::new(2);
const TRIPLE: Lanes = Lanes::new(3);

#[inline]
pub const fn to_curve(x: usize, y: usize) -> usize {
    PAIR.spread(x) | (PAIR.spread(y) << 1)
}

#[inline]
pub const fn from_curve(z: usize) -> (usize, usize) {
    (PAIR.compact(z), PAIR.compact(z >> 1))
}

#[inline]
pub const fn to_curve3(x: usize, y: usize, z: usize) -> usize {
    TRIPLE.spread(x) | (TRIPLE.spread(y) << 1) | (TRIPLE.spread(z) << 2)
}

#[inline]
pub const fn from_curve3(key: usize) -> (usize, usize, usize) {
    (TRIPLE.compact(key), TRIPLE.compact(key >> 1), TRIPLE.compact(key >> 2))
}
