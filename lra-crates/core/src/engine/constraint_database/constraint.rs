use std::fmt::Display;
use std::fmt::Formatter;

use enum_map::Enum;
use num::One;
use num::Zero;

use super::ProofId;
use crate::containers::StorageKey;
use crate::engine::ArithVar;
use crate::math::DeltaRational;
use crate::math::Rational;
use crate::terms::Term;

/// A handle to a constraint stored in the [`ConstraintDatabase`].
///
/// [`ConstraintDatabase`]: super::ConstraintDatabase
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstraintId {
    id: u32,
}

impl StorageKey for ConstraintId {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        ConstraintId { id: index as u32 }
    }
}

impl Display for ConstraintId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "c{}", self.id)
    }
}

/// The relation between a variable and a value which a constraint states.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Enum)]
pub enum ConstraintType {
    /// `x ≥ v`
    LowerBound,
    /// `x ≤ v`
    UpperBound,
    /// `x = v`
    Equality,
    /// `x ≠ v`
    Disequality,
}

impl ConstraintType {
    pub fn is_bound(&self) -> bool {
        matches!(self, ConstraintType::LowerBound | ConstraintType::UpperBound)
    }
}

impl Display for ConstraintType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            ConstraintType::LowerBound => ">=",
            ConstraintType::UpperBound => "<=",
            ConstraintType::Equality => "==",
            ConstraintType::Disequality => "!=",
        };
        write!(f, "{symbol}")
    }
}

/// The data of a single constraint `variable ⋈ value`.
#[derive(Clone, Debug)]
pub struct ConstraintValue {
    pub(super) variable: ArithVar,
    pub(super) constraint_type: ConstraintType,
    pub(super) value: DeltaRational,
    pub(super) literal: Option<Term>,
    /// The literal this constraint was asserted as, when that differs from `literal`.
    pub(super) asserted: Option<Term>,
    pub(super) negation: ConstraintId,
    pub(super) proof: Option<ProofId>,
    pub(super) preregistered: bool,
    pub(super) split: bool,
    /// Cleared when the constraint is garbage collected; the slot in the arena is never reused.
    pub(super) live: bool,
}

impl ConstraintValue {
    pub fn variable(&self) -> ArithVar {
        self.variable
    }

    pub fn constraint_type(&self) -> ConstraintType {
        self.constraint_type
    }

    pub fn value(&self) -> &DeltaRational {
        &self.value
    }

    /// The literal this constraint stands for, if one has been attached.
    pub fn literal(&self) -> Option<&Term> {
        self.literal.as_ref()
    }

    pub fn negation(&self) -> ConstraintId {
        self.negation
    }

    pub fn has_proof(&self) -> bool {
        self.proof.is_some()
    }

    pub fn is_preregistered(&self) -> bool {
        self.preregistered
    }

    pub fn is_split(&self) -> bool {
        self.split
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    pub fn safe_to_garbage_collect(&self) -> bool {
        !self.split && !self.preregistered && self.proof.is_none()
    }
}

impl Display for ConstraintValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.variable, self.constraint_type, self.value)
    }
}

/// The type and value of the negation of `constraint_type value`.
///
/// Bounds are closed under negation thanks to the infinitesimal: `¬(x ≥ c)` is `x ≤ c - δ` and
/// `¬(x ≥ c + δ)` is `x ≤ c`.
///
/// # Panics
/// If the infinitesimal part of a bound is not one of the values a strict or non-strict
/// comparison against a rational produces.
pub(super) fn negation_of(
    constraint_type: ConstraintType,
    value: &DeltaRational,
) -> (ConstraintType, DeltaRational) {
    let c = value.standard_part().clone();
    let k = value.infinitesimal_part();

    match constraint_type {
        ConstraintType::Equality => (ConstraintType::Disequality, value.clone()),
        ConstraintType::Disequality => (ConstraintType::Equality, value.clone()),
        ConstraintType::LowerBound if k.is_zero() => (
            ConstraintType::UpperBound,
            DeltaRational::new(c, -Rational::one()),
        ),
        ConstraintType::LowerBound if k.is_one() => {
            (ConstraintType::UpperBound, DeltaRational::from(c))
        }
        ConstraintType::UpperBound if k.is_zero() => (
            ConstraintType::LowerBound,
            DeltaRational::new(c, Rational::one()),
        ),
        ConstraintType::UpperBound if (-k).is_one() => {
            (ConstraintType::LowerBound, DeltaRational::from(c))
        }
        ConstraintType::LowerBound | ConstraintType::UpperBound => {
            panic!("the bound {constraint_type} {value} has no representable negation")
        }
    }
}
