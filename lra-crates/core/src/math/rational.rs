use num::BigInt;
use num::BigRational;

/// An arbitrary-precision rational number.
pub type Rational = BigRational;

/// Creates the integral rational `value`.
pub fn rational(value: i64) -> Rational {
    Rational::from_integer(BigInt::from(value))
}

/// Creates the rational `numerator / denominator`.
///
/// # Panics
/// If `denominator` is zero.
pub fn ratio(numerator: i64, denominator: i64) -> Rational {
    assert!(denominator != 0, "a rational cannot have a zero denominator");
    Rational::new(BigInt::from(numerator), BigInt::from(denominator))
}
