//! The general Simplex procedure for deciding the feasibility of bounds over a tableau.
//!
//! The procedure keeps every non-basic variable within its bounds. Asserting a bound on a
//! non-basic variable moves it (and every basic variable that depends on it) immediately, while a
//! basic variable is only queued as possibly inconsistent. [`SimplexDecisionProcedure::update_inconsistent_vars`]
//! then repairs violated basic variables by pivoting until either every bound holds or a row is
//! found whose basic variable cannot move towards its bound. That row and the bounds blocking
//! its entries are the explanation of the conflict.
mod pivot_rule;

use std::collections::BTreeSet;
use std::collections::VecDeque;

use log::debug;
use log::trace;
use num::Signed;
pub use pivot_rule::PivotRule;

use crate::engine::ArithVar;
use crate::engine::Bound;
use crate::engine::ConstraintId;
use crate::engine::PartialModel;
use crate::engine::Tableau;
use crate::lra_assert_advanced;
use crate::lra_assert_simple;
use crate::math::DeltaRational;
use crate::terms::Term;

/// The constraints of a set of bounds which cannot hold together.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArithConflict {
    constraints: Vec<ConstraintId>,
}

impl ArithConflict {
    pub fn new(mut constraints: Vec<ConstraintId>) -> ArithConflict {
        let mut seen = Vec::with_capacity(constraints.len());
        constraints.retain(|constraint| {
            if seen.contains(constraint) {
                false
            } else {
                seen.push(*constraint);
                true
            }
        });
        ArithConflict { constraints }
    }

    pub fn constraints(&self) -> &[ConstraintId] {
        &self.constraints
    }
}

/// The outcome of asserting bounds or repairing the assignment.
pub type SimplexStatus = Result<(), ArithConflict>;

#[derive(Debug, Default, Clone, Copy)]
pub struct SimplexStatistics {
    pub num_pivots: u64,
    pub num_conflicts: u64,
    pub num_bland_fallbacks: u64,
}

#[derive(Debug)]
pub struct SimplexDecisionProcedure {
    tableau: Tableau,
    partial_model: PartialModel,
    /// Basic variables which may violate one of their bounds.
    possibly_inconsistent: BTreeSet<ArithVar>,
    pivot_rule: PivotRule,
    /// Pivots in one call of `update_inconsistent_vars` after which Bland's rule takes over.
    bland_threshold: u64,
    lemmas: VecDeque<Term>,
    statistics: SimplexStatistics,
}

impl SimplexDecisionProcedure {
    pub fn new(pivot_rule: PivotRule, bland_threshold: u64) -> SimplexDecisionProcedure {
        SimplexDecisionProcedure {
            tableau: Tableau::default(),
            partial_model: PartialModel::default(),
            possibly_inconsistent: BTreeSet::default(),
            pivot_rule,
            bland_threshold,
            lemmas: VecDeque::default(),
            statistics: SimplexStatistics::default(),
        }
    }

    pub fn tableau(&self) -> &Tableau {
        &self.tableau
    }

    pub fn tableau_mut(&mut self) -> &mut Tableau {
        &mut self.tableau
    }

    pub fn partial_model(&self) -> &PartialModel {
        &self.partial_model
    }

    pub fn partial_model_mut(&mut self) -> &mut PartialModel {
        &mut self.partial_model
    }

    pub fn statistics(&self) -> SimplexStatistics {
        self.statistics
    }

    pub fn ensure_variable(&mut self, variable: ArithVar) {
        self.tableau.ensure_variable(variable);
        self.partial_model.ensure_variable(variable);
    }

    pub fn assignment(&self, variable: ArithVar) -> &DeltaRational {
        self.partial_model.assignment(variable)
    }

    /// Queues a basic variable for the next repair pass.
    pub fn mark_possibly_inconsistent(&mut self, variable: ArithVar) {
        let _ = self.possibly_inconsistent.insert(variable);
    }

    /// Asserts `variable ≥ value`.
    pub fn assert_lower(
        &mut self,
        variable: ArithVar,
        value: DeltaRational,
        reason: ConstraintId,
    ) -> SimplexStatus {
        if let Some(upper) = self.partial_model.upper_bound(variable) {
            if value > upper.value {
                return Err(ArithConflict::new(vec![reason, upper.reason]));
            }
        }
        if self.partial_model.lower_bound(variable).is_some_and(|lower| value <= lower.value) {
            return Ok(());
        }

        trace!("Asserting {variable} >= {value}");
        self.partial_model.set_lower_bound(
            variable,
            Bound {
                value: value.clone(),
                reason,
            },
        );

        if *self.partial_model.assignment(variable) < value {
            if self.tableau.is_basic(variable) {
                self.mark_possibly_inconsistent(variable);
            } else {
                self.update(variable, value);
            }
        }

        Ok(())
    }

    /// Asserts `variable ≤ value`.
    pub fn assert_upper(
        &mut self,
        variable: ArithVar,
        value: DeltaRational,
        reason: ConstraintId,
    ) -> SimplexStatus {
        if let Some(lower) = self.partial_model.lower_bound(variable) {
            if value < lower.value {
                return Err(ArithConflict::new(vec![reason, lower.reason]));
            }
        }
        if self.partial_model.upper_bound(variable).is_some_and(|upper| value >= upper.value) {
            return Ok(());
        }

        trace!("Asserting {variable} <= {value}");
        self.partial_model.set_upper_bound(
            variable,
            Bound {
                value: value.clone(),
                reason,
            },
        );

        if *self.partial_model.assignment(variable) > value {
            if self.tableau.is_basic(variable) {
                self.mark_possibly_inconsistent(variable);
            } else {
                self.update(variable, value);
            }
        }

        Ok(())
    }

    /// Asserts `variable = value` as a lower and an upper bound with the same reason.
    pub fn assert_equality(
        &mut self,
        variable: ArithVar,
        value: DeltaRational,
        reason: ConstraintId,
    ) -> SimplexStatus {
        if let Some(lower) = self.partial_model.lower_bound(variable) {
            if value < lower.value {
                return Err(ArithConflict::new(vec![reason, lower.reason]));
            }
        }
        if let Some(upper) = self.partial_model.upper_bound(variable) {
            if value > upper.value {
                return Err(ArithConflict::new(vec![reason, upper.reason]));
            }
        }

        trace!("Asserting {variable} == {value}");
        if !self.partial_model.lower_bound(variable).is_some_and(|lower| lower.value == value) {
            self.partial_model.set_lower_bound(
                variable,
                Bound {
                    value: value.clone(),
                    reason,
                },
            );
        }
        if !self.partial_model.upper_bound(variable).is_some_and(|upper| upper.value == value) {
            self.partial_model.set_upper_bound(
                variable,
                Bound {
                    value: value.clone(),
                    reason,
                },
            );
        }

        if *self.partial_model.assignment(variable) != value {
            if self.tableau.is_basic(variable) {
                self.mark_possibly_inconsistent(variable);
            } else {
                self.update(variable, value);
            }
        }

        Ok(())
    }

    /// Moves the non-basic `variable` to `value` and the basic variables depending on it along.
    pub fn update(&mut self, variable: ArithVar, value: DeltaRational) {
        lra_assert_simple!(!self.tableau.is_basic(variable));

        let difference = &value - self.partial_model.assignment(variable);
        let dependents = self.tableau.column(variable).collect::<Vec<_>>();
        for basic in dependents {
            let Some(coefficient) = self.tableau.coefficient(basic, variable) else {
                continue;
            };
            let shifted = self.partial_model.assignment(basic) + &(&difference * coefficient);
            self.partial_model.set_assignment(basic, shifted);
            self.mark_possibly_inconsistent(basic);
        }

        self.partial_model.set_assignment(variable, value);
    }

    /// Evaluates the row of `basic` under the current or the safe assignment.
    pub fn compute_row_value(&self, basic: ArithVar, use_safe_assignment: bool) -> DeltaRational {
        self.tableau
            .row(basic)
            .iter()
            .map(|(variable, coefficient)| {
                let value = if use_safe_assignment {
                    self.partial_model.safe_assignment(variable)
                } else {
                    self.partial_model.assignment(variable)
                };
                value * coefficient
            })
            .fold(DeltaRational::zero(), |sum, term| sum + term)
    }

    /// Pivots until every basic variable satisfies its bounds, or until a row proves that the
    /// bounds are infeasible.
    ///
    /// The assignment is committed on success and reverted to the last committed assignment on
    /// conflict.
    pub fn update_inconsistent_vars(&mut self) -> SimplexStatus {
        let mut num_pivots = 0;
        let mut switched_to_bland = false;

        loop {
            let use_bland = num_pivots >= self.bland_threshold;

            let Some(basic) = self.select_violated_basic(use_bland) else {
                self.partial_model.commit_assignment_changes();
                lra_assert_advanced!(self.is_consistent());
                return Ok(());
            };

            if use_bland && !switched_to_bland {
                debug!("Switching to Bland's rule after {num_pivots} pivots");
                self.statistics.num_bland_fallbacks += 1;
                switched_to_bland = true;
            }

            let value = self.partial_model.assignment(basic).clone();
            let below_lower = self.partial_model.below_lower_bound(basic, &value);
            let target = if below_lower {
                self.partial_model.lower_bound(basic).map(|bound| bound.value.clone())
            } else {
                self.partial_model.upper_bound(basic).map(|bound| bound.value.clone())
            };
            let Some(target) = target else {
                unreachable!("a violated variable has the bound it violates");
            };

            match self.select_entering(basic, below_lower, use_bland) {
                Some(entering) => {
                    self.pivot_and_update(basic, entering, target);
                    num_pivots += 1;
                }
                None => {
                    let conflict = self.row_conflict(basic, below_lower);
                    debug!(
                        "Row of {basic} is infeasible, explained by {} bounds",
                        conflict.constraints().len()
                    );
                    self.statistics.num_conflicts += 1;
                    self.partial_model.revert_assignment_changes();
                    return Err(conflict);
                }
            }
        }
    }

    fn select_violated_basic(&mut self, use_bland: bool) -> Option<ArithVar> {
        let tableau = &self.tableau;
        let partial_model = &self.partial_model;
        self.possibly_inconsistent
            .retain(|&variable| tableau.is_basic(variable) && partial_model.violates_bounds(variable));

        if use_bland {
            return self.possibly_inconsistent.first().copied();
        }

        match self.pivot_rule {
            PivotRule::MinimumIndex => self.possibly_inconsistent.first().copied(),
            PivotRule::MaximumIndex => self.possibly_inconsistent.last().copied(),
            PivotRule::ShortestRow => self
                .possibly_inconsistent
                .iter()
                .copied()
                .min_by_key(|&variable| (self.tableau.row(variable).len(), variable)),
        }
    }

    /// A non-basic variable in the row of `basic` which can move so that `basic` moves up (if
    /// `increase`) or down.
    fn select_entering(&self, basic: ArithVar, increase: bool, use_bland: bool) -> Option<ArithVar> {
        let mut candidates = self
            .tableau
            .row(basic)
            .iter()
            .filter(|(variable, coefficient)| {
                let value = self.partial_model.assignment(*variable);
                if increase == coefficient.is_positive() {
                    self.partial_model
                        .upper_bound(*variable)
                        .map_or(true, |upper| *value < upper.value)
                } else {
                    self.partial_model
                        .lower_bound(*variable)
                        .map_or(true, |lower| *value > lower.value)
                }
            })
            .map(|(variable, _)| variable);

        if use_bland {
            // Rows are sorted, so the first candidate has the smallest index.
            candidates.next()
        } else {
            candidates.min_by_key(|&variable| (self.tableau.column_len(variable), variable))
        }
    }

    /// Sets `basic` to `target` by moving `entering`, and then exchanges their roles.
    fn pivot_and_update(&mut self, basic: ArithVar, entering: ArithVar, target: DeltaRational) {
        let Some(coefficient) = self.tableau.coefficient(basic, entering).cloned() else {
            panic!("{entering} does not occur in the row of {basic}");
        };

        let theta = &(&target - self.partial_model.assignment(basic)) / &coefficient;
        self.partial_model.set_assignment(basic, target);

        let entering_value = self.partial_model.assignment(entering) + &theta;
        self.partial_model.set_assignment(entering, entering_value);

        let dependents = self.tableau.column(entering).collect::<Vec<_>>();
        for other in dependents {
            if other == basic {
                continue;
            }
            let Some(factor) = self.tableau.coefficient(other, entering) else {
                continue;
            };
            let shifted = self.partial_model.assignment(other) + &(&theta * factor);
            self.partial_model.set_assignment(other, shifted);
            self.mark_possibly_inconsistent(other);
        }

        self.tableau.pivot(basic, entering);
        self.mark_possibly_inconsistent(entering);
        self.statistics.num_pivots += 1;
    }

    /// The violated bound of `basic` and, for every entry of its row, the bound which keeps the
    /// entry from moving `basic` towards feasibility.
    fn row_conflict(&self, basic: ArithVar, below_lower: bool) -> ArithConflict {
        let violated = if below_lower {
            self.partial_model.lower_bound(basic)
        } else {
            self.partial_model.upper_bound(basic)
        };
        let Some(violated) = violated else {
            unreachable!("a violated variable has the bound it violates");
        };

        let mut constraints = vec![violated.reason];
        for (variable, coefficient) in self.tableau.row(basic).iter() {
            let blocking = if below_lower == coefficient.is_positive() {
                self.partial_model.upper_bound(variable)
            } else {
                self.partial_model.lower_bound(variable)
            };
            let Some(blocking) = blocking else {
                unreachable!("{variable} can still move, so the row of {basic} is not infeasible");
            };
            constraints.push(blocking.reason);
        }

        ArithConflict::new(constraints)
    }

    pub fn push_lemma(&mut self, lemma: Term) {
        self.lemmas.push_back(lemma);
    }

    pub fn has_more_lemmas(&self) -> bool {
        !self.lemmas.is_empty()
    }

    pub fn pop_lemma(&mut self) -> Option<Term> {
        self.lemmas.pop_front()
    }

    /// Checks that basic assignments agree with their rows and that no bound is violated.
    pub(crate) fn is_consistent(&self) -> bool {
        self.tableau.is_consistent()
            && self.tableau.basic_variables().all(|basic| {
                *self.partial_model.assignment(basic) == self.compute_row_value(basic, false)
            })
            && (0..self.partial_model.num_variables())
                .map(|id| ArithVar::new(id as u32))
                .all(|variable| !self.partial_model.violates_bounds(variable))
    }
}
