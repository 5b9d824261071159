//! Wheel mappings: dense indices ↔ positive integers coprime to 2, 6, 30 or 210.
//!
//! `from_wheelM(i)` is the `(i + 1)`-th positive integer coprime to `M`.
//! `to_wheelM(n)` counts the positive integers coprime to `M` that are
//! smaller than `n`, so it is the exact inverse on wheel elements and rounds
//! every other `n` up to the next wheel element's index. Quotients come from
//! [`crate::reciprocal`]; remainders map through tables built at compile time.
//!
//! `to_wheelM` is total. `from_wheelM(i)` is defined for
//! `i < Wheel::max_index()`; larger inputs overflow the word.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ChimeraError;
use crate::reciprocal::{WORD, div_rem};

const fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// Residues in `1..M` coprime to `M`, ascending.
const fn residues<const M: usize, const PHI: usize>() -> [u8; PHI] {
    let mut out = [0u8; PHI];
    let mut n = 1;
    let mut j = 0;
    while n < M {
        if gcd(n, M) == 1 {
            out[j] = n as u8;
            j += 1;
        }
        n += 1;
    }
    out
}

/// For each residue `r`, how many residues coprime to `M` lie in `1..r`.
const fn below<const M: usize>() -> [u8; M] {
    let mut out = [0u8; M];
    let mut r = 1;
    let mut count = 0;
    while r < M {
        out[r] = count;
        if gcd(r, M) == 1 {
            count += 1;
        }
        r += 1;
    }
    out
}

/// Residue classes coprime to `M`.
const fn coprime<const M: usize>() -> [bool; M] {
    let mut out = [false; M];
    let mut r = 1;
    while r < M {
        out[r] = gcd(r, M) == 1;
        r += 1;
    }
    out
}

const BELOW6: [u8; 6] = below::<6>();
const COPRIME6: [bool; 6] = coprime::<6>();
const COPRIME30: [bool; 30] = coprime::<30>();
const COPRIME210: [bool; 210] = coprime::<210>();
const WHEEL30: [u8; 8] = residues::<30, 8>();
const BELOW30: [u8; 30] = below::<30>();
const WHEEL210: [u8; 48] = residues::<210, 48>();
const BELOW210: [u8; 210] = below::<210>();

/// Exclusive upper bound on `i` for `from_wheelM(i)` with `M = modulus`.
pub const fn from_wheel_bound(modulus: usize, totient: usize) -> usize {
    usize::MAX / modulus * totient
}

#[inline]
pub const fn from_wheel2(i: usize) -> usize {
    debug_assert!(i < from_wheel_bound(2, 1));
    (i << 1) | 1
}

#[inline]
pub const fn to_wheel2(n: usize) -> usize {
    n >> 1
}

#[inline]
pub const fn from_wheel6(i: usize) -> usize {
    debug_assert!(i < from_wheel_bound(6, 2));
    (i << 1) + i + (i & 1) + 1
}

#[inline]
pub const fn to_wheel6(n: usize) -> usize {
    let (q, r) = div_rem(WORD.div6, n);
    (q << 1) + BELOW6[r] as usize
}

#[inline]
pub const fn from_wheel30(i: usize) -> usize {
    debug_assert!(i < from_wheel_bound(30, 8));
    (i >> 3) * 30 + WHEEL30[i & 7] as usize
}

#[inline]
pub const fn to_wheel30(n: usize) -> usize {
    let (q, r) = div_rem(WORD.div30, n);
    (q << 3) + BELOW30[r] as usize
}

#[inline]
pub const fn from_wheel210(i: usize) -> usize {
    debug_assert!(i < from_wheel_bound(210, 48));
    let (q, r) = div_rem(WORD.div48, i);
    q * 210 + WHEEL210[r] as usize
}

#[inline]
pub const fn to_wheel210(n: usize) -> usize {
    let (q, r) = div_rem(WORD.div210, n);
    q * 48 + BELOW210[r] as usize
}

/// One of the four supported wheels, identified by its modulus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub enum Wheel {
    W2,
    W6,
    W30,
    W210,
}

impl Wheel {
    pub const ALL: [Wheel; 4] = [Wheel::W2, Wheel::W6, Wheel::W30, Wheel::W210];

    pub const fn modulus(self) -> usize {
        match self {
            Wheel::W2 => 2,
            Wheel::W6 => 6,
            Wheel::W30 => 30,
            Wheel::W210 => 210,
        }
    }

    /// Wheel elements per period: Euler's totient of the modulus.
    pub const fn totient(self) -> usize {
        match self {
            Wheel::W2 => 1,
            Wheel::W6 => 2,
            Wheel::W30 => 8,
            Wheel::W210 => 48,
        }
    }

    /// Exclusive upper bound on the indices [`Wheel::from_wheel`] accepts.
    pub const fn max_index(self) -> usize {
        from_wheel_bound(self.modulus(), self.totient())
    }

    #[inline]
    pub const fn from_wheel(self, i: usize) -> usize {
        match self {
            Wheel::W2 => from_wheel2(i),
            Wheel::W6 => from_wheel6(i),
            Wheel::W30 => from_wheel30(i),
            Wheel::W210 => from_wheel210(i),
        }
    }

    #[inline]
    pub const fn to_wheel(self, n: usize) -> usize {
        match self {
            Wheel::W2 => to_wheel2(n),
            Wheel::W6 => to_wheel6(n),
            Wheel::W30 => to_wheel30(n),
            Wheel::W210 => to_wheel210(n),
        }
    }

    /// Whether `n` is a wheel element (positive and coprime to the modulus).
    #[inline]
    pub const fn contains(self, n: usize) -> bool {
        match self {
            Wheel::W2 => n & 1 == 1,
            Wheel::W6 => COPRIME6[div_rem(WORD.div6, n).1],
            Wheel::W30 => COPRIME30[div_rem(WORD.div30, n).1],
            Wheel::W210 => COPRIME210[div_rem(WORD.div210, n).1],
        }
    }
}

impl fmt::Display for Wheel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.modulus())
    }
}

impl TryFrom<usize> for Wheel {
    type Error = ChimeraError;

    fn try_from(modulus: usize) -> Result<Self, Self::Error> {
        match modulus {
            2 => Ok(Wheel::W2),
            6 => Ok(Wheel::W6),
            30 => Ok(Wheel::W30),
            210 => Ok(Wheel::W210),
            other => Err(ChimeraError::UnsupportedWheel(other.to_string())),
        }
    }
}

impl From<Wheel> for usize {
    fn from(wheel: Wheel) -> usize {
        wheel.modulus()
    }
}

impl FromStr for Wheel {
    type Err = ChimeraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<usize>()
            .map_err(|_| ChimeraError::UnsupportedWheel(s.to_string()))
            .and_then(Wheel::try_from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brute_force(modulus: usize, count: usize) -> Vec<usize> {
        (1..).filter(|&n| gcd(n, modulus) == 1).take(count).collect()
    }

    #[test]
    fn test_known_prefixes() {
        let first4 = |f: fn(usize) -> usize| (0..4).map(f).collect::<Vec<_>>();
        assert_eq!(first4(from_wheel2), vec![1, 3, 5, 7]);
        assert_eq!(first4(from_wheel6), vec![1, 5, 7, 11]);
        assert_eq!(first4(from_wheel30), vec![1, 7, 11, 13]);
        assert_eq!(first4(from_wheel210), vec![1, 11, 13, 17]);
        let back: Vec<usize> = [1, 3, 5, 7].into_iter().map(to_wheel2).collect();
        assert_eq!(back, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_tables() {
        assert_eq!(WHEEL30, [1, 7, 11, 13, 17, 19, 23, 29]);
        assert_eq!(WHEEL210[47], 209);
        assert_eq!(BELOW6, [0, 0, 1, 1, 1, 1]);
        assert_eq!(BELOW30[29], 7);
        assert_eq!(BELOW210[209], 47);
    }

    #[test]
    fn test_matches_brute_force() {
        for wheel in Wheel::ALL {
            let expected = brute_force(wheel.modulus(), 2000);
            let actual: Vec<usize> = (0..2000).map(|i| wheel.from_wheel(i)).collect();
            assert_eq!(actual, expected, "wheel {wheel}");
        }
    }

    #[test]
    fn test_to_wheel_counts_smaller_elements() {
        for wheel in Wheel::ALL {
            let mut count = 0;
            for n in 0..5000 {
                assert_eq!(wheel.to_wheel(n), count, "wheel {wheel}, n = {n}");
                if wheel.contains(n) {
                    count += 1;
                }
            }
        }
    }

    #[test]
    fn test_contains_matches_gcd() {
        for wheel in Wheel::ALL {
            for n in 0..3000 {
                assert_eq!(
                    wheel.contains(n),
                    n != 0 && gcd(n, wheel.modulus()) == 1,
                    "wheel {wheel}, n = {n}"
                );
            }
        }
    }

    #[test]
    fn test_roundtrip_at_bound() {
        for wheel in Wheel::ALL {
            let last = wheel.max_index() - 1;
            for i in [0, 1, last - 1000, last - 1, last] {
                let n = wheel.from_wheel(i);
                assert!(wheel.contains(n));
                assert_eq!(wheel.to_wheel(n), i, "wheel {wheel}, i = {i}");
            }
        }
    }

    #[test]
    fn test_to_wheel_total_at_word_max() {
        for wheel in Wheel::ALL {
            let top = wheel.to_wheel(usize::MAX);
            assert!(top >= wheel.to_wheel(usize::MAX - 1));
            assert!(top >= wheel.max_index() - 1);
        }
    }

    #[test]
    fn test_parse_and_serde() {
        assert_eq!("30".parse::<Wheel>().unwrap(), Wheel::W30);
        assert_eq!(" 210 ".parse::<Wheel>().unwrap(), Wheel::W210);
        assert!("7".parse::<Wheel>().is_err());
        assert!("abc".parse::<Wheel>().is_err());
        assert_eq!(Wheel::try_from(6).unwrap(), Wheel::W6);
        assert_eq!(usize::from(Wheel::W2), 2);
    }
}
