//! Rewriting relational atoms into a comparison of one variable with a constant.
use std::cmp::Ordering;

use num::One;
use num::Zero;

use crate::basic_types::ArithError;
use crate::containers::HashMap;
use crate::engine::ConstraintType;
use crate::math::rational;
use crate::math::DeltaRational;
use crate::math::Rational;
use crate::terms::Kind;
use crate::terms::Term;

/// The relation of a literal once an outer negation is pushed into it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum SimplifiedKind {
    Lt,
    Leq,
    Eq,
    Distinct,
    Geq,
    Gt,
}

impl SimplifiedKind {
    /// The relation after multiplying both sides with a negative number.
    pub(crate) fn flipped(self) -> SimplifiedKind {
        match self {
            SimplifiedKind::Lt => SimplifiedKind::Gt,
            SimplifiedKind::Leq => SimplifiedKind::Geq,
            SimplifiedKind::Geq => SimplifiedKind::Leq,
            SimplifiedKind::Gt => SimplifiedKind::Lt,
            SimplifiedKind::Eq | SimplifiedKind::Distinct => self,
        }
    }

    /// Whether `lhs ⋈ rhs` holds given `lhs.cmp(rhs)`.
    pub(crate) fn holds(self, ordering: Ordering) -> bool {
        match self {
            SimplifiedKind::Lt => ordering == Ordering::Less,
            SimplifiedKind::Leq => ordering != Ordering::Greater,
            SimplifiedKind::Eq => ordering == Ordering::Equal,
            SimplifiedKind::Distinct => ordering != Ordering::Equal,
            SimplifiedKind::Geq => ordering != Ordering::Less,
            SimplifiedKind::Gt => ordering == Ordering::Greater,
        }
    }

    pub(crate) fn constraint_type(self) -> ConstraintType {
        match self {
            SimplifiedKind::Lt | SimplifiedKind::Leq => ConstraintType::UpperBound,
            SimplifiedKind::Geq | SimplifiedKind::Gt => ConstraintType::LowerBound,
            SimplifiedKind::Eq => ConstraintType::Equality,
            SimplifiedKind::Distinct => ConstraintType::Disequality,
        }
    }

    /// The coefficient of `δ` which turns a strict comparison into a non-strict one.
    pub(crate) fn delta_coeff(self) -> i64 {
        match self {
            SimplifiedKind::Lt => -1,
            SimplifiedKind::Gt => 1,
            _ => 0,
        }
    }
}

/// The relation a literal states, or `None` if it is not a (negated) relational atom.
pub(crate) fn simplified_kind(literal: &Term) -> Option<SimplifiedKind> {
    let (kind, negated) = match literal.kind() {
        Kind::Not => (literal.child(0).kind(), true),
        kind => (kind, false),
    };

    let positive = match kind {
        Kind::Lt => SimplifiedKind::Lt,
        Kind::Leq => SimplifiedKind::Leq,
        Kind::Eq => SimplifiedKind::Eq,
        Kind::Geq => SimplifiedKind::Geq,
        Kind::Gt => SimplifiedKind::Gt,
        _ => return None,
    };

    Some(if negated {
        match positive {
            SimplifiedKind::Lt => SimplifiedKind::Geq,
            SimplifiedKind::Leq => SimplifiedKind::Gt,
            SimplifiedKind::Eq => SimplifiedKind::Distinct,
            SimplifiedKind::Geq => SimplifiedKind::Lt,
            SimplifiedKind::Gt => SimplifiedKind::Leq,
            SimplifiedKind::Distinct => unreachable!("atoms are never disequalities"),
        }
    } else {
        positive
    })
}

/// The bound value for `x ⋈ constant`, with strictness encoded as an infinitesimal offset.
pub(crate) fn determine_right_constant(kind: SimplifiedKind, constant: Rational) -> DeltaRational {
    DeltaRational::new(constant, rational(kind.delta_coeff()))
}

/// A linear combination `Σ coefficient·leaf + constant`, with the leaves kept in the order in
/// which they were first met.
///
/// Leaves are the terms the theory treats as variables: variables proper, `ite` terms and
/// products of more than one non-constant factor.
#[derive(Clone, Debug, Default)]
pub(crate) struct LinearSum {
    leaves: Vec<(Term, Rational)>,
    positions: HashMap<Term, usize>,
    constant: Rational,
}

impl LinearSum {
    pub(crate) fn of(term: &Term) -> Result<LinearSum, ArithError> {
        let mut sum = LinearSum::default();
        sum.add_term(term, &Rational::one())?;
        Ok(sum)
    }

    /// Adds `scale·term`.
    pub(crate) fn add_term(&mut self, term: &Term, scale: &Rational) -> Result<(), ArithError> {
        match term.kind() {
            Kind::Constant(value) => self.constant += scale * value,
            Kind::Plus => {
                for summand in term.children() {
                    self.add_term(summand, scale)?;
                }
            }
            Kind::Mult => {
                let mut factor = scale.clone();
                let mut non_constant = Vec::new();
                for child in term.children() {
                    match child.constant_value() {
                        Some(value) => factor *= value,
                        None if is_arithmetic(child) => non_constant.push(child.clone()),
                        None => return Err(ArithError::NotArithmetic(child.clone())),
                    }
                }

                match non_constant.len() {
                    0 => self.constant += factor,
                    1 => self.add_term(&non_constant[0], &factor)?,
                    _ if non_constant.len() == term.num_children() => {
                        self.add_leaf(term.clone(), factor)
                    }
                    _ => self.add_leaf(Term::mult(non_constant), factor),
                }
            }
            Kind::Variable(_) | Kind::Ite => self.add_leaf(term.clone(), scale.clone()),
            _ => return Err(ArithError::NotArithmetic(term.clone())),
        }

        Ok(())
    }

    fn add_leaf(&mut self, leaf: Term, coefficient: Rational) {
        match self.positions.get(&leaf) {
            Some(&position) => self.leaves[position].1 += coefficient,
            None => {
                let _ = self.positions.insert(leaf.clone(), self.leaves.len());
                self.leaves.push((leaf, coefficient));
            }
        }
    }

    pub(crate) fn constant(&self) -> &Rational {
        &self.constant
    }

    /// The leaves whose coefficient did not cancel out.
    pub(crate) fn leaves(&self) -> impl Iterator<Item = (&Term, &Rational)> + '_ {
        self.leaves
            .iter()
            .filter(|(_, coefficient)| !coefficient.is_zero())
            .map(|(leaf, coefficient)| (leaf, coefficient))
    }
}

/// Whether `term` can appear as an operand of `+` or `*`.
pub(crate) fn is_arithmetic(term: &Term) -> bool {
    matches!(
        term.kind(),
        Kind::Variable(_) | Kind::Constant(_) | Kind::Plus | Kind::Mult | Kind::Ite
    )
}

/// Scales `Σ coefficient·x ⋈ constant` so that the first coefficient is one, flipping the
/// relation when dividing by a negative number.
pub(crate) fn normalize_leading_coefficient<V>(
    kind: SimplifiedKind,
    combination: &mut [(V, Rational)],
    constant: Rational,
) -> (SimplifiedKind, Rational) {
    let Some((_, leading)) = combination.first() else {
        return (kind, constant);
    };
    let leading = leading.clone();

    for (_, coefficient) in combination.iter_mut() {
        *coefficient /= &leading;
    }

    let kind = if leading < Rational::zero() {
        kind.flipped()
    } else {
        kind
    };
    (kind, constant / leading)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::ratio;

    #[test]
    fn negation_is_pushed_into_the_relation() {
        let x = Term::variable("x");
        let five = Term::integer(5);

        assert_eq!(
            Some(SimplifiedKind::Gt),
            simplified_kind(&Term::not(Term::leq(x.clone(), five.clone())))
        );
        assert_eq!(
            Some(SimplifiedKind::Distinct),
            simplified_kind(&Term::not(Term::equal(x.clone(), five.clone())))
        );
        assert_eq!(Some(SimplifiedKind::Lt), simplified_kind(&Term::lt(x.clone(), five)));
        assert_eq!(None, simplified_kind(&x));
    }

    #[test]
    fn strict_relations_become_infinitesimal_offsets() {
        assert_eq!(
            DeltaRational::new(rational(3), rational(-1)),
            determine_right_constant(SimplifiedKind::Lt, rational(3))
        );
        assert_eq!(
            DeltaRational::new(rational(3), rational(1)),
            determine_right_constant(SimplifiedKind::Gt, rational(3))
        );
        assert_eq!(
            DeltaRational::from(rational(3)),
            determine_right_constant(SimplifiedKind::Leq, rational(3))
        );
    }

    #[test]
    fn sums_and_products_are_flattened() {
        let x = Term::variable("x");
        let y = Term::variable("y");
        // 2·(x + 3) + (-1)·x + y·x + 4
        let term = Term::plus(vec![
            Term::mult(vec![
                Term::integer(2),
                Term::plus(vec![x.clone(), Term::integer(3)]),
            ]),
            Term::mult(vec![Term::integer(-1), x.clone()]),
            Term::mult(vec![y.clone(), x.clone()]),
            Term::integer(4),
        ]);

        let sum = LinearSum::of(&term).unwrap();
        let leaves = sum.leaves().collect::<Vec<_>>();

        assert_eq!(&rational(10), sum.constant());
        assert_eq!(2, leaves.len());
        assert_eq!((&x, &rational(1)), leaves[0]);
        assert_eq!((&Term::mult(vec![y, x]), &rational(1)), leaves[1]);
    }

    #[test]
    fn cancelled_leaves_are_dropped() {
        let x = Term::variable("x");
        let term = Term::plus(vec![
            x.clone(),
            Term::mult(vec![Term::integer(-1), x]),
        ]);

        assert_eq!(0, LinearSum::of(&term).unwrap().leaves().count());
    }

    #[test]
    fn boolean_operands_are_rejected() {
        let bad = Term::plus(vec![Term::variable("x"), Term::boolean(true)]);
        assert!(matches!(LinearSum::of(&bad), Err(ArithError::NotArithmetic(_))));
    }

    #[test]
    fn dividing_by_a_negative_leading_coefficient_flips_the_relation() {
        let mut combination = vec![("x", rational(-2)), ("y", rational(3))];
        let (kind, constant) =
            normalize_leading_coefficient(SimplifiedKind::Lt, &mut combination, rational(5));

        assert_eq!(SimplifiedKind::Gt, kind);
        assert_eq!(ratio(-5, 2), constant);
        assert_eq!(vec![("x", rational(1)), ("y", ratio(-3, 2))], combination);
    }
}
