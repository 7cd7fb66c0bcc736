//! Integer helpers for base-m decompositions of the triangle

use num_traits::{CheckedMul, PrimInt, Unsigned};

/// Natural cubic spline colour ramps for palettes
pub mod interpolation;
/// Weighted index selection for contraction maps
pub mod probability;

/// Largest `(exponent, base^exponent)` with `base^exponent <= n`
///
/// Returns `None` when `n` is zero or `base < 2`, since no power of such a
/// base is bounded usefully. `n = 1` yields `(0, 1)`.
pub fn largest_power_at_most<T>(n: T, base: T) -> Option<(u32, T)>
where
    T: PrimInt + Unsigned + CheckedMul,
{
    let two = T::one() + T::one();
    if n.is_zero() || base < two {
        return None;
    }

    let mut exponent = 0;
    let mut power = T::one();
    while let Some(next) = power.checked_mul(&base) {
        if next > n {
            break;
        }
        power = next;
        exponent += 1;
    }
    Some((exponent, power))
}

/// Trial division primality test
pub fn is_prime<T>(n: T) -> bool
where
    T: PrimInt + Unsigned,
{
    let two = T::one() + T::one();
    if n < two {
        return false;
    }
    let mut divisor = two;
    while divisor <= n / divisor {
        if (n % divisor).is_zero() {
            return false;
        }
        divisor = divisor + T::one();
    }
    true
}
