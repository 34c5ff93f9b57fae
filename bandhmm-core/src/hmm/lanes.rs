//! Fixed-width vector of `i16` scores, one lane per band diagonal.
//!
//! The recurrence only needs a handful of lane-parallel operations, so any
//! backend that provides them can drive the same engine. Shifts move whole
//! lanes: `shift_up` carries lane `i` into lane `i + 1` and `shift_down`
//! carries lane `i + 1` into lane `i`, both filling the vacated lane with zero.

#[cfg(feature = "simd")]
use wide::{i16x16, i16x8, CmpEq};

pub trait Lanes: Copy + Send + Sync + 'static {
    /// Number of lanes, which is also the band size of the engine.
    const LANES: usize;

    fn splat(value: i16) -> Self;

    fn from_fn(f: impl FnMut(usize) -> i16) -> Self;

    /// Lane-wise wrapping addition.
    fn add(self, rhs: Self) -> Self;

    /// Lane-wise signed minimum.
    fn min(self, rhs: Self) -> Self;

    fn and(self, rhs: Self) -> Self;

    fn or(self, rhs: Self) -> Self;

    /// `!self & rhs`
    fn andnot(self, rhs: Self) -> Self;

    /// All bits set in lanes that compare equal, zero elsewhere.
    fn cmp_eq(self, rhs: Self) -> Self;

    fn shift_up(self) -> Self;

    fn shift_down(self) -> Self;

    fn insert(self, lane: usize, value: i16) -> Self;

    fn extract(self, lane: usize) -> i16;
}

/// Plain array backend. Works for any band size and serves as the reference
/// the vector backends are checked against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Portable<const N: usize>(pub [i16; N]);

impl<const N: usize> Lanes for Portable<N> {
    const LANES: usize = N;

    #[inline]
    fn splat(value: i16) -> Self {
        Portable([value; N])
    }

    #[inline]
    fn from_fn(f: impl FnMut(usize) -> i16) -> Self {
        Portable(std::array::from_fn(f))
    }

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Portable(std::array::from_fn(|k| self.0[k].wrapping_add(rhs.0[k])))
    }

    #[inline]
    fn min(self, rhs: Self) -> Self {
        Portable(std::array::from_fn(|k| self.0[k].min(rhs.0[k])))
    }

    #[inline]
    fn and(self, rhs: Self) -> Self {
        Portable(std::array::from_fn(|k| self.0[k] & rhs.0[k]))
    }

    #[inline]
    fn or(self, rhs: Self) -> Self {
        Portable(std::array::from_fn(|k| self.0[k] | rhs.0[k]))
    }

    #[inline]
    fn andnot(self, rhs: Self) -> Self {
        Portable(std::array::from_fn(|k| !self.0[k] & rhs.0[k]))
    }

    #[inline]
    fn cmp_eq(self, rhs: Self) -> Self {
        Portable(std::array::from_fn(|k| {
            if self.0[k] == rhs.0[k] {
                -1
            } else {
                0
            }
        }))
    }

    #[inline]
    fn shift_up(self) -> Self {
        let mut arr = self.0;
        for i in (1..N).rev() {
            arr[i] = arr[i - 1];
        }
        arr[0] = 0;
        Portable(arr)
    }

    #[inline]
    fn shift_down(self) -> Self {
        let mut arr = self.0;
        for i in 1..N {
            arr[i - 1] = arr[i];
        }
        arr[N - 1] = 0;
        Portable(arr)
    }

    #[inline]
    fn insert(mut self, lane: usize, value: i16) -> Self {
        self.0[lane] = value;
        self
    }

    #[inline]
    fn extract(self, lane: usize) -> i16 {
        self.0[lane]
    }
}

// `wide` has no lane-granular shift or insert, so those go through the array
// form; the arithmetic stays in registers.
#[cfg(feature = "simd")]
macro_rules! impl_wide_lanes {
    ($ty:ty, $lanes:expr, $build:path) => {
        impl Lanes for $ty {
            const LANES: usize = $lanes;

            #[inline]
            fn splat(value: i16) -> Self {
                <$ty>::splat(value)
            }

            #[inline]
            fn from_fn(f: impl FnMut(usize) -> i16) -> Self {
                $build(std::array::from_fn::<i16, $lanes, _>(f))
            }

            #[inline]
            fn add(self, rhs: Self) -> Self {
                self + rhs
            }

            #[inline]
            fn min(self, rhs: Self) -> Self {
                <$ty>::min(self, rhs)
            }

            #[inline]
            fn and(self, rhs: Self) -> Self {
                self & rhs
            }

            #[inline]
            fn or(self, rhs: Self) -> Self {
                self | rhs
            }

            #[inline]
            fn andnot(self, rhs: Self) -> Self {
                !self & rhs
            }

            #[inline]
            fn cmp_eq(self, rhs: Self) -> Self {
                CmpEq::cmp_eq(self, rhs)
            }

            #[inline]
            fn shift_up(self) -> Self {
                let mut arr = self.to_array();
                for i in (1..$lanes).rev() {
                    arr[i] = arr[i - 1];
                }
                arr[0] = 0;
                $build(arr)
            }

            #[inline]
            fn shift_down(self) -> Self {
                let mut arr = self.to_array();
                for i in 1..$lanes {
                    arr[i - 1] = arr[i];
                }
                arr[$lanes - 1] = 0;
                $build(arr)
            }

            #[inline]
            fn insert(self, lane: usize, value: i16) -> Self {
                let mut arr = self.to_array();
                arr[lane] = value;
                $build(arr)
            }

            #[inline]
            fn extract(self, lane: usize) -> i16 {
                self.to_array()[lane]
            }
        }
    };
}

#[cfg(feature = "simd")]
impl_wide_lanes!(i16x8, 8, i16x8::from);
#[cfg(feature = "simd")]
impl_wide_lanes!(i16x16, 16, i16x16::from);
