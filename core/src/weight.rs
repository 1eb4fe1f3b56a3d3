use std::fmt;

use num_traits::{Bounded, Float, SaturatingAdd, Zero};

/// Numeric edge weight.
///
/// Integers use their maximum value as the "unreachable" sentinel, floats use
/// positive infinity. Addition saturates at the sentinel so that relaxing an
/// edge out of an unreachable node can never wrap around.
pub trait Weight:
    Copy + PartialOrd + PartialEq + Zero + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// Sentinel distance for nodes not (yet) reached.
    fn infinity() -> Self;

    /// `self + rhs`, clamped at [`Weight::infinity`].
    fn saturating_add(self, rhs: Self) -> Self;

    /// True for weights the shortest-path algorithms must refuse.
    /// Unsigned types never report negative weights.
    fn is_negative(&self) -> bool;

    /// Hashable key identifying this exact value.
    fn memo_key(&self) -> u64;

    fn is_infinite(&self) -> bool {
        *self == Self::infinity()
    }
}

macro_rules! impl_signed_weight {
    ($($t:ty),*) => {$(
        impl Weight for $t {
            #[inline]
            fn infinity() -> Self {
                <$t as Bounded>::max_value()
            }

            #[inline]
            fn saturating_add(self, rhs: Self) -> Self {
                SaturatingAdd::saturating_add(&self, &rhs)
            }

            #[inline]
            fn is_negative(&self) -> bool {
                *self < <$t as Zero>::zero()
            }

            #[inline]
            fn memo_key(&self) -> u64 {
                *self as i64 as u64
            }
        }
    )*};
}

macro_rules! impl_unsigned_weight {
    ($($t:ty),*) => {$(
        impl Weight for $t {
            #[inline]
            fn infinity() -> Self {
                <$t as Bounded>::max_value()
            }

            #[inline]
            fn saturating_add(self, rhs: Self) -> Self {
                SaturatingAdd::saturating_add(&self, &rhs)
            }

            #[inline]
            fn is_negative(&self) -> bool {
                false
            }

            #[inline]
            fn memo_key(&self) -> u64 {
                *self as u64
            }
        }
    )*};
}

macro_rules! impl_float_weight {
    ($($t:ty),*) => {$(
        impl Weight for $t {
            #[inline]
            fn infinity() -> Self {
                <$t as Float>::infinity()
            }

            // inf + finite = inf, so plain addition already saturates.
            #[inline]
            fn saturating_add(self, rhs: Self) -> Self {
                self + rhs
            }

            #[inline]
            fn is_negative(&self) -> bool {
                self.is_nan() || *self < 0.0
            }

            #[inline]
            fn memo_key(&self) -> u64 {
                // +0.0 and -0.0 must share a key
                if *self == 0.0 {
                    0
                } else {
                    self.to_bits() as u64
                }
            }
        }
    )*};
}

impl_signed_weight!(i8, i16, i32, i64, isize);
impl_unsigned_weight!(u8, u16, u32, u64, usize);
impl_float_weight!(f32, f64);
