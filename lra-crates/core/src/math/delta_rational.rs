use std::fmt::Display;
use std::fmt::Formatter;
use std::ops::Add;
use std::ops::Div;
use std::ops::Mul;
use std::ops::Neg;
use std::ops::Sub;

use num::One;
use num::Signed;
use num::Zero;

use super::Rational;

/// A rational extended with a symbolic infinitesimal: `(c, k)` stands for `c + k·δ`, where `δ`
/// is positive and smaller than any positive rational the engine compares it against.
///
/// This is how strict bounds become non-strict ones: `x < 5` is the bound `x ≤ (5, -1)` and
/// `x > 5` is `x ≥ (5, 1)`.
///
/// The order is lexicographic; the standard part is compared first and the infinitesimal
/// coefficient breaks ties. Two delta-rationals cannot be multiplied with each other since
/// `δ·δ` is not representable, only scaled by a plain [`Rational`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct DeltaRational {
    // The declaration order of the fields is what makes the derived order lexicographic.
    c: Rational,
    k: Rational,
}

impl DeltaRational {
    pub fn new(c: Rational, k: Rational) -> DeltaRational {
        DeltaRational { c, k }
    }

    pub fn zero() -> DeltaRational {
        DeltaRational::default()
    }

    /// The standard (non-infinitesimal) part.
    pub fn standard_part(&self) -> &Rational {
        &self.c
    }

    /// The coefficient of `δ`.
    pub fn infinitesimal_part(&self) -> &Rational {
        &self.k
    }

    pub fn is_zero(&self) -> bool {
        self.c.is_zero() && self.k.is_zero()
    }

    pub fn infinitesimal_is_zero(&self) -> bool {
        self.k.is_zero()
    }

    /// Evaluates `c + d·k` for a concrete `d`.
    ///
    /// Only meaningful when `d` is small enough that no comparison the engine made is flipped,
    /// see [`PartialModel::compute_concrete_delta`].
    ///
    /// [`PartialModel::compute_concrete_delta`]: crate::engine::PartialModel::compute_concrete_delta
    pub fn substitute_delta(&self, d: &Rational) -> Rational {
        &self.c + d * &self.k
    }

    /// The greatest integer not above this value.
    ///
    /// An integral standard part that is approached from below (`k < 0`) rounds down to the
    /// previous integer.
    pub fn floor(&self) -> Rational {
        if self.c.is_integer() {
            if self.k.is_negative() {
                &self.c - Rational::one()
            } else {
                self.c.clone()
            }
        } else {
            self.c.floor()
        }
    }

    /// The smallest integer not below this value.
    ///
    /// An integral standard part that is approached from above (`k > 0`) rounds up to the next
    /// integer.
    pub fn ceiling(&self) -> Rational {
        if self.c.is_integer() {
            if self.k.is_positive() {
                &self.c + Rational::one()
            } else {
                self.c.clone()
            }
        } else {
            self.c.ceil()
        }
    }
}

impl From<Rational> for DeltaRational {
    fn from(c: Rational) -> Self {
        DeltaRational {
            c,
            k: Rational::zero(),
        }
    }
}

impl Add<&DeltaRational> for &DeltaRational {
    type Output = DeltaRational;

    fn add(self, rhs: &DeltaRational) -> DeltaRational {
        DeltaRational {
            c: &self.c + &rhs.c,
            k: &self.k + &rhs.k,
        }
    }
}

impl Add for DeltaRational {
    type Output = DeltaRational;

    fn add(self, rhs: DeltaRational) -> DeltaRational {
        &self + &rhs
    }
}

impl Sub<&DeltaRational> for &DeltaRational {
    type Output = DeltaRational;

    fn sub(self, rhs: &DeltaRational) -> DeltaRational {
        DeltaRational {
            c: &self.c - &rhs.c,
            k: &self.k - &rhs.k,
        }
    }
}

impl Sub for DeltaRational {
    type Output = DeltaRational;

    fn sub(self, rhs: DeltaRational) -> DeltaRational {
        &self - &rhs
    }
}

impl Neg for DeltaRational {
    type Output = DeltaRational;

    fn neg(self) -> DeltaRational {
        DeltaRational {
            c: -self.c,
            k: -self.k,
        }
    }
}

impl Mul<&Rational> for &DeltaRational {
    type Output = DeltaRational;

    fn mul(self, rhs: &Rational) -> DeltaRational {
        DeltaRational {
            c: &self.c * rhs,
            k: &self.k * rhs,
        }
    }
}

impl Div<&Rational> for &DeltaRational {
    type Output = DeltaRational;

    fn div(self, rhs: &Rational) -> DeltaRational {
        DeltaRational {
            c: &self.c / rhs,
            k: &self.k / rhs,
        }
    }
}

impl Display for DeltaRational {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.k.is_zero() {
            write!(f, "{}", self.c)
        } else if self.k.is_negative() {
            write!(f, "{}-{}δ", self.c, -&self.k)
        } else {
            write!(f, "{}+{}δ", self.c, self.k)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::ratio;
    use crate::math::rational;

    fn dr(c: Rational, k: i64) -> DeltaRational {
        DeltaRational::new(c, rational(k))
    }

    #[test]
    fn order_compares_standard_part_first() {
        assert!(dr(rational(1), 5) < dr(rational(2), -5));
        assert!(dr(rational(2), -1) < dr(rational(2), 0));
        assert!(dr(rational(2), 0) < dr(rational(2), 1));
    }

    #[test]
    fn order_agrees_with_small_substitutions() {
        let values = [
            dr(rational(0), 0),
            dr(rational(0), 1),
            dr(rational(0), -1),
            dr(ratio(1, 1000), -3),
            dr(ratio(-7, 2), 2),
            dr(ratio(-7, 2), 0),
            dr(rational(3), -1),
        ];
        let d = ratio(1, 100_000);

        for a in values.iter() {
            for b in values.iter() {
                assert_eq!(
                    a < b,
                    a.substitute_delta(&d) < b.substitute_delta(&d),
                    "{a} vs {b}"
                );
            }
        }
    }

    #[test]
    fn arithmetic_is_componentwise() {
        let a = dr(rational(3), -1);
        let b = dr(ratio(1, 2), 2);

        assert_eq!(&a + &b, dr(ratio(7, 2), 1));
        assert_eq!(&a - &b, dr(ratio(5, 2), -3));
        assert_eq!(&a * &rational(2), dr(rational(6), -2));
        assert_eq!(&a / &rational(-2), DeltaRational::new(ratio(-3, 2), ratio(1, 2)));
        assert_eq!(-a, dr(rational(-3), 1));
    }

    #[test]
    fn floor_and_ceiling_at_integral_values() {
        assert_eq!(dr(rational(4), 1).ceiling(), rational(5));
        assert_eq!(dr(rational(4), -1).floor(), rational(3));
        assert_eq!(dr(rational(4), 1).floor(), rational(4));
        assert_eq!(dr(rational(4), -1).ceiling(), rational(4));
        assert_eq!(dr(rational(4), 0).floor(), rational(4));
        assert_eq!(dr(rational(4), 0).ceiling(), rational(4));
    }

    #[test]
    fn floor_and_ceiling_ignore_delta_for_fractions() {
        for k in [-1, 0, 1] {
            assert_eq!(dr(ratio(7, 2), k).floor(), rational(3));
            assert_eq!(dr(ratio(7, 2), k).ceiling(), rational(4));
            assert_eq!(dr(ratio(-7, 2), k).floor(), rational(-4));
            assert_eq!(dr(ratio(-7, 2), k).ceiling(), rational(-3));
        }
    }

    #[test]
    fn display_shows_the_infinitesimal() {
        assert_eq!(dr(rational(5), 0).to_string(), "5");
        assert_eq!(dr(rational(5), -1).to_string(), "5-1δ");
        assert_eq!(dr(rational(5), 1).to_string(), "5+1δ");
    }
}
