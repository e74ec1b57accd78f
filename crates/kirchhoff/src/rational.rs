//! Exact rational helpers shared by the lattice, the simplex and extraction.
//!
//! Everything in this crate computes over `BigRational` so that thousands of
//! pivots never accumulate rounding error. The helpers here cover the few
//! integer-theoretic folds the pipeline needs: least common denominators for
//! lattice spacing, and primitive integer normalization for solutions.

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, ToPrimitive, Zero};

/// Exact scalar used throughout the crate.
pub type Rational = BigRational;

/// Rational from a small integer.
#[inline]
pub fn int(n: i64) -> Rational {
    Rational::from_integer(BigInt::from(n))
}

/// Rational `numer / denom`. Panics on a zero denominator, like `Ratio::new`.
#[inline]
pub fn ratio(numer: i64, denom: i64) -> Rational {
    Rational::new(BigInt::from(numer), BigInt::from(denom))
}

/// Least common denominator of a sequence of rationals (1 for an empty one).
pub fn common_denominator<'a, I>(values: I) -> BigInt
where
    I: IntoIterator<Item = &'a Rational>,
{
    values
        .into_iter()
        .fold(BigInt::one(), |acc, v| acc.lcm(v.denom()))
}

/// Gcd of the numerators of integer-valued rationals; zero when all are zero.
fn numerator_gcd<'a, I>(values: I) -> BigInt
where
    I: IntoIterator<Item = &'a Rational>,
{
    values
        .into_iter()
        .fold(BigInt::zero(), |acc, v| acc.gcd(v.numer()))
}

/// Scale a rational vector to the primitive integer vector on the same ray.
///
/// Post: result is integral, has the sign pattern of `values`, and its entries
/// have gcd 1 (unless every entry is zero, in which case zeros are returned).
pub fn to_primitive_integers(values: &[Rational]) -> Vec<BigInt> {
    let lcd = Rational::from_integer(common_denominator(values));
    let scaled: Vec<Rational> = values.iter().map(|v| v * &lcd).collect();
    let g = numerator_gcd(&scaled);
    if g.is_zero() {
        return vec![BigInt::zero(); values.len()];
    }
    scaled.iter().map(|v| v.numer() / &g).collect()
}

/// Smallest integer `>= value`.
pub fn ceil_to_usize(value: &Rational) -> Option<usize> {
    value.ceil().to_integer().to_usize()
}

/// Render as `p` or `p/q`, the same syntax `Rational::from_str` accepts.
pub fn display(value: &Rational) -> String {
    if value.is_integer() {
        value.numer().to_string()
    } else {
        format!("{}/{}", value.numer(), value.denom())
    }
}
