//! Reading concrete values out of the current assignment.
use num::One;
use num::Zero;

use super::normal_form::simplified_kind;
use super::normal_form::LinearSum;
use super::TheoryArith;
use crate::basic_types::ArithError;
use crate::engine::ArithVar;
use crate::math::Rational;
use crate::terms::Kind;
use crate::terms::Term;

/// The value of a term in the model of the current assignment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModelValue {
    Rational(Rational),
    Boolean(bool),
}

impl TheoryArith {
    /// The rational value of an arithmetic term.
    ///
    /// The `δ` of every assignment is replaced by one concrete value which keeps all bounds and
    /// asserted disequalities satisfied, see [`PartialModel::compute_concrete_delta`].
    ///
    /// [`PartialModel::compute_concrete_delta`]: crate::engine::PartialModel::compute_concrete_delta
    pub fn get_value(&self, term: &Term) -> Result<Rational, ArithError> {
        let delta = self.concrete_delta();
        self.rational_value(term, &delta)
    }

    /// The value of an arithmetic term or of a boolean combination of arithmetic atoms.
    pub fn evaluate(&self, term: &Term) -> Result<ModelValue, ArithError> {
        let delta = self.concrete_delta();
        match term.kind() {
            Kind::Boolean(_)
            | Kind::Not
            | Kind::And
            | Kind::Or
            | Kind::Implies
            | Kind::Lt
            | Kind::Leq
            | Kind::Eq
            | Kind::Geq
            | Kind::Gt => self.boolean_value(term, &delta).map(ModelValue::Boolean),
            Kind::Ite if !self.is_owned_leaf(term) && self.is_boolean_ite(term) => {
                self.boolean_value(term, &delta).map(ModelValue::Boolean)
            }
            _ => self.rational_value(term, &delta).map(ModelValue::Rational),
        }
    }

    fn concrete_delta(&self) -> Rational {
        self.simplex
            .partial_model()
            .compute_concrete_delta(
                &self.options.default_delta,
                self.asserted_disequalities.iter().map(|&disequality| {
                    let constraint = self.constraint_database.get(disequality);
                    (constraint.variable(), constraint.value())
                }),
            )
    }

    fn is_boolean_ite(&self, term: &Term) -> bool {
        !matches!(
            term.child(1).kind(),
            Kind::Variable(_) | Kind::Constant(_) | Kind::Plus | Kind::Mult
        ) && !self.is_owned_leaf(term.child(1))
    }

    /// The value of a variable; eliminated variables are evaluated through their row.
    pub(super) fn variable_value(&self, variable: ArithVar, delta: &Rational) -> Rational {
        match self.removed_rows.get(&variable) {
            Some(row) => row
                .iter()
                .map(|(used, coefficient)| coefficient * self.variable_value(used, delta))
                .fold(Rational::zero(), |sum, term| sum + term),
            None => self
                .simplex
                .assignment(variable)
                .substitute_delta(delta),
        }
    }

    fn rational_value(&self, term: &Term, delta: &Rational) -> Result<Rational, ArithError> {
        if let Some(variable) = self.variable_of(term) {
            return Ok(self.variable_value(variable, delta));
        }

        match term.kind() {
            Kind::Constant(value) => Ok(value.clone()),
            Kind::Plus | Kind::Mult => {
                let sum = LinearSum::of(term)?;
                let mut value = sum.constant().clone();
                for (leaf, coefficient) in sum.leaves() {
                    value += coefficient * self.leaf_value(leaf, delta)?;
                }
                Ok(value)
            }
            Kind::Ite => self.leaf_value(term, delta),
            Kind::Variable(_) => Err(ArithError::NoValue(term.clone())),
            _ => Err(ArithError::NotArithmetic(term.clone())),
        }
    }

    /// The value of a leaf of a linear sum which may not have a variable of its own.
    fn leaf_value(&self, leaf: &Term, delta: &Rational) -> Result<Rational, ArithError> {
        if let Some(variable) = self.variable_of(leaf) {
            return Ok(self.variable_value(variable, delta));
        }

        match leaf.kind() {
            Kind::Mult => leaf
                .children()
                .iter()
                .try_fold(
                    Rational::one(),
                    |product, factor| -> Result<Rational, ArithError> {
                        Ok(product * self.rational_value(factor, delta)?)
                    },
                ),
            Kind::Ite => {
                if self.boolean_value(leaf.child(0), delta)? {
                    self.rational_value(leaf.child(1), delta)
                } else {
                    self.rational_value(leaf.child(2), delta)
                }
            }
            _ => Err(ArithError::NoValue(leaf.clone())),
        }
    }

    fn boolean_value(&self, term: &Term, delta: &Rational) -> Result<bool, ArithError> {
        match term.kind() {
            Kind::Boolean(value) => Ok(*value),
            Kind::Not => Ok(!self.boolean_value(term.child(0), delta)?),
            Kind::And => {
                for conjunct in term.children() {
                    if !self.boolean_value(conjunct, delta)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Kind::Or => {
                for disjunct in term.children() {
                    if self.boolean_value(disjunct, delta)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Kind::Implies => Ok(!self.boolean_value(term.child(0), delta)?
                || self.boolean_value(term.child(1), delta)?),
            Kind::Ite => {
                if self.boolean_value(term.child(0), delta)? {
                    self.boolean_value(term.child(1), delta)
                } else {
                    self.boolean_value(term.child(2), delta)
                }
            }
            Kind::Lt | Kind::Leq | Kind::Eq | Kind::Geq | Kind::Gt => {
                let lhs = self.rational_value(term.child(0), delta)?;
                let rhs = self.rational_value(term.child(1), delta)?;
                match simplified_kind(term) {
                    Some(kind) => Ok(kind.holds(lhs.cmp(&rhs))),
                    None => Err(ArithError::NotAnAtom(term.clone())),
                }
            }
            Kind::Variable(_) => Err(ArithError::NoValue(term.clone())),
            Kind::Constant(_) | Kind::Plus | Kind::Mult => {
                Err(ArithError::NotArithmetic(term.clone()))
            }
        }
    }
}
