use log::debug;
use num::Zero;

use crate::basic_types::Trail;
use crate::containers::KeyedVec;
use crate::engine::ArithVar;
use crate::engine::ConstraintId;
use crate::lra_assert_simple;
use crate::math::rational;
use crate::math::DeltaRational;
use crate::math::Rational;

/// A bound on a variable together with the constraint that justifies it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bound {
    pub value: DeltaRational,
    pub reason: ConstraintId,
}

#[derive(Clone, Debug)]
enum BoundChange {
    Lower {
        variable: ArithVar,
        previous: Option<Bound>,
    },
    Upper {
        variable: ArithVar,
        previous: Option<Bound>,
    },
}

/// The assignment of the Simplex procedure and the bounds it has to respect.
///
/// Assignment changes are transactional. The first change to a variable since the last
/// [`PartialModel::commit_assignment_changes`] remembers the old value as the safe assignment, and
/// [`PartialModel::revert_assignment_changes`] restores the safe values after a conflict. Bounds
/// follow the search instead: they are recorded on a trail and undone on
/// [`PartialModel::synchronise`].
#[derive(Debug, Default)]
pub struct PartialModel {
    assignment: KeyedVec<ArithVar, DeltaRational>,
    safe_assignment: KeyedVec<ArithVar, Option<DeltaRational>>,
    changed: Vec<ArithVar>,

    lower_bounds: KeyedVec<ArithVar, Option<Bound>>,
    upper_bounds: KeyedVec<ArithVar, Option<Bound>>,
    bound_changes: Trail<BoundChange>,
}

impl PartialModel {
    pub fn ensure_variable(&mut self, variable: ArithVar) {
        self.assignment.accomodate(variable, DeltaRational::zero());
        self.safe_assignment.accomodate(variable, None);
        self.lower_bounds.accomodate(variable, None);
        self.upper_bounds.accomodate(variable, None);
    }

    pub fn num_variables(&self) -> usize {
        self.assignment.len()
    }

    pub fn assignment(&self, variable: ArithVar) -> &DeltaRational {
        &self.assignment[variable]
    }

    /// The value of `variable` at the last commit.
    pub fn safe_assignment(&self, variable: ArithVar) -> &DeltaRational {
        self.safe_assignment[variable]
            .as_ref()
            .unwrap_or(&self.assignment[variable])
    }

    pub fn set_assignment(&mut self, variable: ArithVar, value: DeltaRational) {
        if self.safe_assignment[variable].is_none() {
            let previous = std::mem::replace(&mut self.assignment[variable], value);
            self.safe_assignment[variable] = Some(previous);
            self.changed.push(variable);
        } else {
            self.assignment[variable] = value;
        }
    }

    /// Sets both the current and the safe value of a variable which has not been changed in
    /// the current transaction.
    pub fn initialize_assignment(
        &mut self,
        variable: ArithVar,
        current: DeltaRational,
        safe: DeltaRational,
    ) {
        lra_assert_simple!(self.safe_assignment[variable].is_none());

        self.assignment[variable] = safe;
        if current != self.assignment[variable] {
            self.set_assignment(variable, current);
        }
    }

    pub fn has_uncommitted_changes(&self) -> bool {
        !self.changed.is_empty()
    }

    pub fn revert_assignment_changes(&mut self) {
        debug!("Reverting {} assignment changes", self.changed.len());
        for variable in self.changed.drain(..) {
            if let Some(safe) = self.safe_assignment[variable].take() {
                self.assignment[variable] = safe;
            }
        }
    }

    pub fn commit_assignment_changes(&mut self) {
        for variable in self.changed.drain(..) {
            self.safe_assignment[variable] = None;
        }
    }

    pub fn lower_bound(&self, variable: ArithVar) -> Option<&Bound> {
        self.lower_bounds[variable].as_ref()
    }

    pub fn upper_bound(&self, variable: ArithVar) -> Option<&Bound> {
        self.upper_bounds[variable].as_ref()
    }

    pub fn has_bounds(&self, variable: ArithVar) -> bool {
        self.lower_bounds[variable].is_some() || self.upper_bounds[variable].is_some()
    }

    pub fn set_lower_bound(&mut self, variable: ArithVar, bound: Bound) {
        let previous = self.lower_bounds[variable].replace(bound);
        self.bound_changes
            .push(BoundChange::Lower { variable, previous });
    }

    pub fn set_upper_bound(&mut self, variable: ArithVar, bound: Bound) {
        let previous = self.upper_bounds[variable].replace(bound);
        self.bound_changes
            .push(BoundChange::Upper { variable, previous });
    }

    pub fn below_lower_bound(&self, variable: ArithVar, value: &DeltaRational) -> bool {
        self.lower_bound(variable)
            .is_some_and(|bound| *value < bound.value)
    }

    pub fn above_upper_bound(&self, variable: ArithVar, value: &DeltaRational) -> bool {
        self.upper_bound(variable)
            .is_some_and(|bound| *value > bound.value)
    }

    /// Whether the current assignment of `variable` violates one of its bounds.
    pub fn violates_bounds(&self, variable: ArithVar) -> bool {
        let value = &self.assignment[variable];
        self.below_lower_bound(variable, value) || self.above_upper_bound(variable, value)
    }

    pub fn new_checkpoint(&mut self) {
        self.bound_changes.new_checkpoint();
    }

    /// Restores the bounds as they were when `new_level` was entered.
    pub fn synchronise(&mut self, new_level: usize) {
        for change in self.bound_changes.synchronise(new_level) {
            match change {
                BoundChange::Lower { variable, previous } => {
                    self.lower_bounds[variable] = previous
                }
                BoundChange::Upper { variable, previous } => {
                    self.upper_bounds[variable] = previous
                }
            }
        }
    }

    /// A concrete value, at most `default`, which can be substituted for `δ` without moving any
    /// assignment across one of its bounds or onto one of the `excluded` values.
    ///
    /// For a lower bound `(lc, lk) ≤ (c, k)` with `lc < c` and `lk > k`, substitution keeps the
    /// order as long as `δ ≤ (c - lc) / (lk - k)`; upper bounds are symmetric. Pairs whose
    /// standard parts agree keep their order for every positive `δ`. An excluded value `(v, j)`
    /// is hit by exactly one `δ`, so `δ` stays below half of the smallest positive one.
    pub fn compute_concrete_delta<'a>(
        &self,
        default: &Rational,
        excluded: impl IntoIterator<Item = (ArithVar, &'a DeltaRational)>,
    ) -> Rational {
        let mut delta = default.clone();

        for variable in self.assignment.keys() {
            let value = &self.assignment[variable];
            if let Some(bound) = self.lower_bound(variable) {
                if let Some(limit) = delta_limit(&bound.value, value) {
                    delta = delta.min(limit);
                }
            }
            if let Some(bound) = self.upper_bound(variable) {
                if let Some(limit) = delta_limit(value, &bound.value) {
                    delta = delta.min(limit);
                }
            }
        }

        let closest_collision = excluded
            .into_iter()
            .filter_map(|(variable, value)| collision(&self.assignment[variable], value))
            .min();
        if let Some(collision) = closest_collision {
            let limit = collision / rational(2);
            if limit < delta {
                debug!("Lowering the concrete delta to {limit} to avoid an excluded value");
                delta = limit;
            }
        }

        lra_assert_simple!(delta > Rational::zero());
        delta
    }
}

/// The positive `δ` for which `assignment` and `excluded` substitute to the same rational, if
/// there is one.
fn collision(assignment: &DeltaRational, excluded: &DeltaRational) -> Option<Rational> {
    let infinitesimal_gap = assignment.infinitesimal_part() - excluded.infinitesimal_part();
    if infinitesimal_gap.is_zero() {
        return None;
    }

    let delta = (excluded.standard_part() - assignment.standard_part()) / infinitesimal_gap;
    (delta > Rational::zero()).then_some(delta)
}

/// The largest `δ` for which `smaller ≤ larger` survives substitution, if there is a limit.
fn delta_limit(smaller: &DeltaRational, larger: &DeltaRational) -> Option<Rational> {
    let standard_gap = larger.standard_part() - smaller.standard_part();
    let infinitesimal_gap = smaller.infinitesimal_part() - larger.infinitesimal_part();

    if standard_gap > Rational::zero() && infinitesimal_gap > Rational::zero() {
        Some(standard_gap / infinitesimal_gap)
    } else {
        None
    }
}
