//! The theory of linear real arithmetic.
//!
//! [`TheoryArith`] turns the literals asserted by the search into bounds on variables and keeps
//! the [`SimplexDecisionProcedure`] up to date with them. Every relational atom is rewritten into
//! a comparison of one variable with a constant; an atom over a linear combination of several
//! variables compares a slack variable which stands for the (normalised) combination. Rows for
//! slack variables only enter the tableau once a literal over them is asserted, and periodic
//! tableau resets drop the rows which turned out not to be needed.
mod model;
mod normal_form;
mod options;
mod static_learning;

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::collections::VecDeque;

use log::debug;
use log::info;
use log::warn;
pub use model::ModelValue;
use normal_form::determine_right_constant;
use normal_form::normalize_leading_coefficient;
use normal_form::simplified_kind;
use normal_form::LinearSum;
use num::One;
use num::Zero;
pub use options::ArithOptions;

use crate::basic_types::ArithError;
use crate::basic_types::Trail;
use crate::containers::HashMap;
use crate::containers::KeyedVec;
use crate::engine::constraint_database::AtomClassification;
use crate::engine::tableau::Row;
use crate::engine::ArithConflict;
use crate::engine::ArithVar;
use crate::engine::ConstraintDatabase;
use crate::engine::ConstraintId;
use crate::engine::ConstraintType;
use crate::engine::Effort;
use crate::engine::OutputChannel;
use crate::engine::SimplexDecisionProcedure;
use crate::engine::SimplexStatus;
use crate::engine::Theory;
use crate::lra_assert_simple;
use crate::math::DeltaRational;
use crate::math::Rational;
use crate::terms::Kind;
use crate::terms::Term;

#[derive(Debug)]
struct VariableInfo {
    /// The leaf this variable stands for, or the sum a slack variable stands for.
    term: Term,
    /// For slack variables, the linear combination they are equal to.
    definition: Option<Vec<(ArithVar, Rational)>>,
    /// Whether the row of a slack variable has been added to the tableau.
    materialized: bool,
}

#[derive(Debug)]
enum Classified {
    /// The atom compares constants.
    Constant(bool),
    Constraint(AtomClassification),
}

#[derive(Debug)]
pub struct TheoryArith {
    options: ArithOptions,

    variables: KeyedVec<ArithVar, VariableInfo>,
    leaves: HashMap<Term, ArithVar>,
    /// Slack variables by the normalised combination they stand for.
    slacks: HashMap<Vec<(ArithVar, Rational)>, ArithVar>,
    /// Atoms without variables, with their truth value.
    constant_atoms: HashMap<Term, bool>,

    constraint_database: ConstraintDatabase,
    simplex: SimplexDecisionProcedure,

    /// Asserted literals which have not been processed yet, with the level they were asserted at.
    pending_facts: VecDeque<(Term, usize)>,
    /// Processed literals, with the level they were asserted at.
    processed_facts: Trail<(Term, usize)>,
    asserted_disequalities: Trail<ConstraintId>,
    propagations: VecDeque<Term>,

    /// Eliminated variables and the row which defines their value.
    removed_rows: BTreeMap<ArithVar, Row>,

    num_restarts: u64,
    restarts_since_reset: u32,
    reset_period: u32,
    density_after_reset: Option<f64>,

    level: usize,
}

impl Default for TheoryArith {
    fn default() -> Self {
        TheoryArith::new(ArithOptions::default())
    }
}

impl TheoryArith {
    pub fn new(options: ArithOptions) -> TheoryArith {
        let simplex = SimplexDecisionProcedure::new(options.pivot_rule, options.bland_threshold);
        let reset_period = options.initial_reset_period;

        TheoryArith {
            options,
            variables: KeyedVec::default(),
            leaves: HashMap::default(),
            slacks: HashMap::default(),
            constant_atoms: HashMap::default(),
            constraint_database: ConstraintDatabase::default(),
            simplex,
            pending_facts: VecDeque::default(),
            processed_facts: Trail::default(),
            asserted_disequalities: Trail::default(),
            propagations: VecDeque::default(),
            removed_rows: BTreeMap::default(),
            num_restarts: 0,
            restarts_since_reset: 0,
            reset_period,
            density_after_reset: None,
            level: 0,
        }
    }

    pub fn options(&self) -> &ArithOptions {
        &self.options
    }

    pub fn constraint_database(&self) -> &ConstraintDatabase {
        &self.constraint_database
    }

    pub fn simplex(&self) -> &SimplexDecisionProcedure {
        &self.simplex
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_restarts(&self) -> u64 {
        self.num_restarts
    }

    /// The variable of a leaf term (a variable, an `ite` or a non-linear product).
    pub fn variable_of(&self, leaf: &Term) -> Option<ArithVar> {
        self.leaves.get(leaf).copied()
    }

    /// The term a variable stands for.
    pub fn term_of(&self, variable: ArithVar) -> &Term {
        &self.variables[variable].term
    }

    /// Whether `term` is a leaf this theory has a variable for, and so can give a value to.
    pub fn is_owned_leaf(&self, term: &Term) -> bool {
        self.leaves.contains_key(term)
    }

    pub fn is_slack(&self, variable: ArithVar) -> bool {
        self.variables[variable].definition.is_some()
    }

    pub fn is_removed(&self, variable: ArithVar) -> bool {
        self.removed_rows.contains_key(&variable)
    }

    /// The slack variable which stands for the sum of `leaves` with the given coefficients,
    /// if one has been introduced.
    pub fn slack_of(&self, combination: &[(Term, Rational)]) -> Option<ArithVar> {
        let mut key = combination
            .iter()
            .map(|(leaf, coefficient)| Some((self.variable_of(leaf)?, coefficient.clone())))
            .collect::<Option<Vec<_>>>()?;
        key.sort_by_key(|(variable, _)| *variable);
        let _ = normalize_leading_coefficient(
            normal_form::SimplifiedKind::Eq,
            &mut key,
            Rational::zero(),
        );
        self.slacks.get(&key).copied()
    }

    fn new_variable(
        &mut self,
        term: Term,
        definition: Option<Vec<(ArithVar, Rational)>>,
    ) -> ArithVar {
        let variable = self.variables.push(VariableInfo {
            term,
            definition,
            materialized: false,
        });
        self.simplex.ensure_variable(variable);
        variable
    }

    /// The variable of a leaf, allocated on first use. A leaf whose variable was eliminated is
    /// reinstated.
    fn request_variable(&mut self, leaf: &Term) -> ArithVar {
        if let Some(&variable) = self.leaves.get(leaf) {
            self.reinstate(variable);
            return variable;
        }

        let variable = self.new_variable(leaf.clone(), None);
        let _ = self.leaves.insert(leaf.clone(), variable);
        debug!("Allocated {variable} for {leaf}");
        variable
    }

    /// The slack variable for a normalised combination of at least two variables.
    fn slack_for(&mut self, combination: Vec<(ArithVar, Rational)>) -> ArithVar {
        if let Some(&slack) = self.slacks.get(&combination) {
            return slack;
        }

        let summands = combination
            .iter()
            .map(|(variable, coefficient)| {
                let leaf = self.variables[variable].term.clone();
                if coefficient.is_one() {
                    leaf
                } else {
                    Term::mult(vec![Term::constant(coefficient.clone()), leaf])
                }
            })
            .collect::<Vec<_>>();

        let slack = self.new_variable(Term::plus(summands), Some(combination.clone()));
        let _ = self.slacks.insert(combination, slack);
        debug!("Introduced slack {slack} for {}", self.variables[slack].term);
        slack
    }

    /// Rewrites `lhs ⋈ rhs` into `variable ⋈' value`.
    fn classify_atom(&mut self, atom: &Term) -> Result<Classified, ArithError> {
        let kind = match simplified_kind(atom) {
            Some(kind) if atom.kind().is_relational() => kind,
            _ => return Err(ArithError::NotAnAtom(atom.clone())),
        };

        // lhs - rhs ⋈ 0
        let mut sum = LinearSum::default();
        sum.add_term(atom.child(0), &Rational::one())?;
        sum.add_term(atom.child(1), &-Rational::one())?;

        let constant = -sum.constant().clone();
        let leaves = sum
            .leaves()
            .map(|(leaf, coefficient)| (leaf.clone(), coefficient.clone()))
            .collect::<Vec<_>>();
        let mut combination = leaves
            .into_iter()
            .map(|(leaf, coefficient)| (self.request_variable(&leaf), coefficient))
            .collect::<Vec<_>>();
        combination.sort_by_key(|(variable, _)| *variable);

        if combination.is_empty() {
            return Ok(Classified::Constant(
                kind.holds(Rational::zero().cmp(&constant)),
            ));
        }

        let (kind, constant) = normalize_leading_coefficient(kind, &mut combination, constant);
        let variable = if combination.len() == 1 {
            combination[0].0
        } else {
            self.slack_for(combination)
        };

        Ok(Classified::Constraint(AtomClassification {
            variable,
            constraint_type: kind.constraint_type(),
            value: determine_right_constant(kind, constant),
        }))
    }

    /// The constraint of a literal, registering it if it is new. Literals whose atom compares
    /// constants have no constraint.
    fn register_literal(&mut self, literal: &Term) -> Result<Option<ConstraintId>, ArithError> {
        if let Some(constraint) = self.constraint_database.lookup(literal) {
            return Ok(Some(constraint));
        }

        let atom = match literal.kind() {
            Kind::Not => literal.child(0),
            _ => literal,
        };
        if !atom.kind().is_relational() {
            return Err(ArithError::NotAnAtom(literal.clone()));
        }
        if self.constant_atoms.contains_key(atom) {
            return Ok(None);
        }

        match self.classify_atom(atom)? {
            Classified::Constant(value) => {
                let _ = self.constant_atoms.insert(atom.clone(), value);
                Ok(None)
            }
            Classified::Constraint(classification) => {
                let constraint = self
                    .constraint_database
                    .add_literal(literal, |_| Ok::<_, ArithError>(classification))?;
                Ok(Some(constraint))
            }
        }
    }

    /// The truth value of a literal over a constant atom.
    fn constant_truth(&self, literal: &Term) -> Option<bool> {
        match literal.kind() {
            Kind::Not => self.constant_atoms.get(literal.child(0)).map(|value| !value),
            _ => self.constant_atoms.get(literal).copied(),
        }
    }

    /// Makes sure the row of a slack variable is in the tableau, and that an eliminated
    /// variable is back.
    fn materialize(&mut self, variable: ArithVar) {
        self.reinstate(variable);

        let info = &self.variables[variable];
        if info.materialized {
            return;
        }
        let Some(definition) = info.definition.clone() else {
            return;
        };

        for (used, _) in definition.iter() {
            self.reinstate(*used);
        }

        let tableau = self.simplex.tableau_mut();
        if tableau.is_ejected(variable) {
            tableau.reinject_basic(variable);
        } else {
            let (variables, coefficients): (Vec<_>, Vec<_>) = definition.into_iter().unzip();
            tableau.add_row(variable, &coefficients, &variables);
        }

        self.initialize_basic_assignment(variable);
        self.variables[variable].materialized = true;
        debug!("Added the row of {variable} to the tableau");
    }

    /// Gives a basic variable whose row was just added the value of its row.
    fn initialize_basic_assignment(&mut self, basic: ArithVar) {
        let current = self.simplex.compute_row_value(basic, false);
        let safe = self.simplex.compute_row_value(basic, true);
        self.simplex
            .partial_model_mut()
            .initialize_assignment(basic, current, safe);
        self.simplex.mark_possibly_inconsistent(basic);
    }

    /// Puts an eliminated variable back into the tableau as a basic variable.
    fn reinstate(&mut self, variable: ArithVar) {
        let Some(row) = self.removed_rows.remove(&variable) else {
            return;
        };

        let (variables, coefficients): (Vec<_>, Vec<_>) = row
            .iter()
            .map(|(used, coefficient)| (used, coefficient.clone()))
            .unzip();
        for &used in variables.iter() {
            self.reinstate(used);
        }

        self.simplex
            .tableau_mut()
            .add_row(variable, &coefficients, &variables);
        self.initialize_basic_assignment(variable);
        info!("Reinstated the eliminated variable {variable}");
    }

    fn conflict_term(&self, conflict: &ArithConflict) -> Term {
        Term::and(
            self.constraint_database
                .explanation_literals(conflict.constraints()),
        )
    }

    /// Processes one asserted literal; on conflict, returns the conflicting conjunction.
    fn assert_constraint_fact(&mut self, fact: &Term) -> Result<(), Term> {
        let constraint = match self.register_literal(fact) {
            Ok(Some(constraint)) => constraint,
            Ok(None) => {
                return if self.constant_truth(fact) == Some(true) {
                    Ok(())
                } else {
                    warn!("Asserted {fact}, which is false");
                    Err(fact.clone())
                };
            }
            Err(error) => unreachable!("{fact} was accepted when it was asserted: {error}"),
        };

        if self.constraint_database.negation_has_proof(constraint) {
            let negation = self.constraint_database.get(constraint).negation();
            let mut literals = vec![fact.clone()];
            for literal in self.constraint_database.explanation_literals(&[negation]) {
                if !literals.contains(&literal) {
                    literals.push(literal);
                }
            }
            return Err(Term::and(literals));
        }
        if self.constraint_database.has_proof(constraint) {
            return Ok(());
        }

        self.constraint_database
            .mark_as_asserted(constraint, fact.clone());

        let value = self.constraint_database.get(constraint);
        let variable = value.variable();
        let constraint_type = value.constraint_type();
        let bound = value.value().clone();

        self.materialize(variable);
        self.assert_bound(constraint, variable, constraint_type, bound)
            .map_err(|conflict| self.conflict_term(&conflict))?;

        if self.options.propagate_bounds && constraint_type != ConstraintType::Disequality {
            self.propagate_implied(constraint);
        }
        Ok(())
    }

    fn assert_bound(
        &mut self,
        constraint: ConstraintId,
        variable: ArithVar,
        constraint_type: ConstraintType,
        value: DeltaRational,
    ) -> SimplexStatus {
        match constraint_type {
            ConstraintType::LowerBound => {
                self.early_disequality_conflict(constraint, variable, &value, true)?;
                self.simplex.assert_lower(variable, value, constraint)
            }
            ConstraintType::UpperBound => {
                self.early_disequality_conflict(constraint, variable, &value, false)?;
                self.simplex.assert_upper(variable, value, constraint)
            }
            ConstraintType::Equality => self.simplex.assert_equality(variable, value, constraint),
            ConstraintType::Disequality => {
                self.asserted_disequalities.push(constraint);

                let model = self.simplex.partial_model();
                match (model.lower_bound(variable), model.upper_bound(variable)) {
                    (Some(lower), Some(upper)) if lower.value == value && upper.value == value => {
                        Err(ArithConflict::new(vec![
                            constraint,
                            lower.reason,
                            upper.reason,
                        ]))
                    }
                    _ => Ok(()),
                }
            }
        }
    }

    /// A non-strict bound at a value which an asserted disequality excludes, while the opposite
    /// bound already sits at that value, is a conflict without any pivoting.
    fn early_disequality_conflict(
        &self,
        constraint: ConstraintId,
        variable: ArithVar,
        value: &DeltaRational,
        is_lower: bool,
    ) -> SimplexStatus {
        if !value.infinitesimal_is_zero() {
            return Ok(());
        }
        let Some(disequality) =
            self.constraint_database
                .find(variable, ConstraintType::Disequality, value)
        else {
            return Ok(());
        };
        if !self.constraint_database.has_proof(disequality) {
            return Ok(());
        }

        let model = self.simplex.partial_model();
        let opposite = if is_lower {
            model.upper_bound(variable)
        } else {
            model.lower_bound(variable)
        };

        match opposite {
            Some(bound) if bound.value == *value => {
                debug!("{variable} is pinned to the excluded value {value}");
                Err(ArithConflict::new(vec![
                    disequality,
                    constraint,
                    bound.reason,
                ]))
            }
            _ => Ok(()),
        }
    }

    /// Marks the literals implied by `constraint` as true and queues them for propagation.
    fn propagate_implied(&mut self, constraint: ConstraintId) {
        for implied in self.constraint_database.implied_by(constraint) {
            let Some(literal) = self.constraint_database.get(implied).literal().cloned() else {
                continue;
            };
            self.constraint_database.mark_as_true_by(implied, constraint);
            self.propagations.push_back(literal);
        }
    }

    /// Queues the trichotomy lemma for every asserted disequality whose sides are currently
    /// equal.
    fn split_disequalities(&mut self) {
        let to_split = self
            .asserted_disequalities
            .iter()
            .copied()
            .filter(|&disequality| {
                let value = self.constraint_database.get(disequality);
                !value.is_split() && self.simplex.assignment(value.variable()) == value.value()
            })
            .collect::<Vec<_>>();

        for disequality in to_split {
            let lemma = self.constraint_database.split(disequality);
            debug!("Splitting on {lemma}");

            let equality = lemma.child(0).clone();
            let less = lemma.child(1).clone();
            let greater = lemma.child(2).clone();

            self.simplex.push_lemma(lemma);
            self.simplex
                .push_lemma(Term::implies(less.clone(), equality.negate()));
            self.simplex
                .push_lemma(Term::implies(greater.clone(), equality.negate()));
            self.simplex
                .push_lemma(Term::implies(less, greater.negate()));
        }
    }

    fn report_conflict(&mut self, conflict: Term, out: &mut dyn OutputChannel) {
        self.simplex
            .partial_model_mut()
            .revert_assignment_changes();
        debug!("Conflict {conflict}");
        out.conflict(conflict);
    }

    /// The value of an eliminated variable, or the assignment of any other variable.
    fn removed_value(&self, variable: ArithVar) -> DeltaRational {
        match self.removed_rows.get(&variable) {
            Some(row) => row
                .iter()
                .map(|(used, coefficient)| &self.removed_value(used) * coefficient)
                .fold(DeltaRational::zero(), |sum, term| sum + term),
            None => self.simplex.assignment(variable).clone(),
        }
    }

    /// Eliminates a variable which no constraint mentions from the tableau, remembering its row
    /// so that its value can still be computed. Returns whether the variable is eliminated.
    ///
    /// A non-basic variable is first pivoted into the basis using the shortest row containing
    /// it; a variable which occurs in no row cannot be eliminated. Must only be called while the
    /// assignment satisfies every bound.
    pub fn permanently_remove_variable(&mut self, variable: ArithVar) -> bool {
        lra_assert_simple!(!self.constraint_database.has_constraints(variable));
        if self.removed_rows.contains_key(&variable) {
            return true;
        }

        let tableau = self.simplex.tableau_mut();
        if !tableau.is_basic(variable) {
            let Some(basic) = tableau.shortest_row_containing(variable) else {
                return false;
            };
            tableau.pivot(basic, variable);
        }

        let row = tableau.remove_row(variable);
        debug!("Eliminated {variable} with a row of {} entries", row.len());
        let _ = self.removed_rows.insert(variable, row);
        true
    }

    /// Adds the rows of constrained slack variables and eliminates the variables which no
    /// constraint mentions. Returns the number of eliminated variables.
    pub fn presolve(&mut self) -> usize {
        if !self.options.eliminate_unconstrained {
            return 0;
        }

        let constrained_slacks = self
            .variables
            .keys()
            .filter(|&variable| {
                self.is_slack(variable) && self.constraint_database.has_constraints(variable)
            })
            .collect::<Vec<_>>();
        for slack in constrained_slacks {
            self.materialize(slack);
        }
        self.simplex
            .partial_model_mut()
            .commit_assignment_changes();

        let candidates = self
            .variables
            .keys()
            .filter(|&variable| {
                !self.is_slack(variable)
                    && !self.constraint_database.has_constraints(variable)
                    && !self.is_removed(variable)
            })
            .collect::<Vec<_>>();
        let eliminated = candidates
            .into_iter()
            .filter(|&variable| self.permanently_remove_variable(variable))
            .count();

        info!("Presolve eliminated {eliminated} unconstrained variables");
        eliminated
    }

    /// Rebuilds the tableau from the definitions of the slack variables which are still needed,
    /// i.e. those with bounds or asserted disequalities. Rows of other slack variables which
    /// were in the tableau are ejected, so they can be reinjected cheaply later.
    ///
    /// The rebuilt tableau only depends on the asserted facts, so a second reset without new
    /// facts reproduces the same rows.
    pub fn reset_tableau(&mut self) {
        lra_assert_simple!(!self.simplex.partial_model().has_uncommitted_changes());

        let mut needed = BTreeSet::new();
        for variable in self.variables.keys() {
            if self.is_slack(variable) && self.simplex.partial_model().has_bounds(variable) {
                let _ = needed.insert(variable);
            }
        }
        for &disequality in self.asserted_disequalities.iter() {
            let variable = self.constraint_database.get(disequality).variable();
            if self.is_slack(variable) {
                let _ = needed.insert(variable);
            }
        }

        // Eliminated variables become ordinary variables with the value of their row.
        let removed = self.removed_rows.keys().copied().collect::<Vec<_>>();
        for &variable in removed.iter() {
            let value = self.removed_value(variable);
            self.simplex
                .partial_model_mut()
                .set_assignment(variable, value);
        }
        self.removed_rows.clear();

        let slacks = self
            .variables
            .keys()
            .filter(|&variable| self.is_slack(variable))
            .collect::<Vec<_>>();
        let had_row = slacks
            .iter()
            .copied()
            .filter(|&slack| {
                self.variables[slack].materialized || self.simplex.tableau().is_ejected(slack)
            })
            .collect::<BTreeSet<_>>();

        self.simplex.tableau_mut().clear();
        for info in self.variables.iter_mut() {
            info.materialized = false;
        }

        for slack in slacks {
            if !needed.contains(&slack) && !had_row.contains(&slack) {
                continue;
            }
            let Some(definition) = self.variables[slack].definition.clone() else {
                continue;
            };
            let (variables, coefficients): (Vec<_>, Vec<_>) = definition.into_iter().unzip();
            let tableau = self.simplex.tableau_mut();
            tableau.add_row(slack, &coefficients, &variables);

            if needed.contains(&slack) {
                self.variables[slack].materialized = true;
            } else {
                tableau.eject_basic(slack);
            }
        }

        let basics = self.simplex.tableau().basic_variables().collect::<Vec<_>>();
        for &basic in basics.iter() {
            let value = self.simplex.compute_row_value(basic, false);
            self.simplex
                .partial_model_mut()
                .set_assignment(basic, value);
        }

        for variable in removed {
            if !self.permanently_remove_variable(variable) {
                debug!("{variable} no longer occurs in any row and stays a free variable");
            }
        }

        self.repair_non_basic_bounds();
        let basics = self.simplex.tableau().basic_variables().collect::<Vec<_>>();
        for basic in basics {
            self.simplex.mark_possibly_inconsistent(basic);
        }
        self.simplex
            .partial_model_mut()
            .commit_assignment_changes();

        let density = self.simplex.tableau().density();
        self.density_after_reset = Some(density);
        let collected = self.constraint_database.collect_garbage();
        info!(
            "Reset the tableau to {} rows with density {density:.3}, collected {collected} constraints",
            self.simplex.tableau().num_rows()
        );
    }

    /// Moves every non-basic variable which violates a bound onto that bound.
    fn repair_non_basic_bounds(&mut self) {
        for variable in self.variables.keys() {
            if self.simplex.tableau().is_basic(variable) || self.is_removed(variable) {
                continue;
            }

            let model = self.simplex.partial_model();
            let value = model.assignment(variable);
            let target = if model.below_lower_bound(variable, value) {
                model.lower_bound(variable).map(|bound| bound.value.clone())
            } else if model.above_upper_bound(variable, value) {
                model.upper_bound(variable).map(|bound| bound.value.clone())
            } else {
                None
            };

            if let Some(target) = target {
                self.simplex.update(variable, target);
            }
        }
    }
}

impl Theory for TheoryArith {
    fn pre_register_term(&mut self, term: &Term) -> Result<(), ArithError> {
        if term.is_arith_literal() {
            if let Some(constraint) = self.register_literal(term)? {
                let negation = self.constraint_database.get(constraint).negation();
                if !self.constraint_database.get(constraint).is_preregistered()
                    && !self.constraint_database.get(negation).is_preregistered()
                {
                    self.constraint_database.set_preregistered(constraint);
                }
            }
            return Ok(());
        }

        let sum = LinearSum::of(term)?;
        let leaves = sum
            .leaves()
            .map(|(leaf, _)| leaf.clone())
            .collect::<Vec<_>>();
        for leaf in leaves {
            let _ = self.request_variable(&leaf);
        }
        Ok(())
    }

    fn assert_fact(&mut self, literal: Term) -> Result<(), ArithError> {
        if !literal.is_arith_literal() {
            return Err(ArithError::NotAnAtom(literal));
        }

        let _ = self.register_literal(&literal)?;
        self.pending_facts.push_back((literal, self.level));
        Ok(())
    }

    fn check(&mut self, effort: Effort, out: &mut dyn OutputChannel) {
        while let Some((fact, fact_level)) = self.pending_facts.pop_front() {
            self.processed_facts.push((fact.clone(), fact_level));
            if let Err(conflict) = self.assert_constraint_fact(&fact) {
                self.report_conflict(conflict, out);
                return;
            }
        }

        if let Err(conflict) = self.simplex.update_inconsistent_vars() {
            let conflict = self.conflict_term(&conflict);
            self.report_conflict(conflict, out);
            return;
        }

        if effort == Effort::Full {
            self.split_disequalities();
            while let Some(lemma) = self.simplex.pop_lemma() {
                out.lemma(lemma);
            }
        }
    }

    fn propagate(&mut self, out: &mut dyn OutputChannel) {
        while let Some(literal) = self.propagations.pop_front() {
            out.propagate(literal);
        }
        while let Some(lemma) = self.simplex.pop_lemma() {
            out.lemma(lemma);
        }
    }

    fn explain(&mut self, literal: &Term) -> Result<Term, ArithError> {
        match self.constraint_database.lookup(literal) {
            Some(constraint) if self.constraint_database.has_proof(constraint) => {
                Ok(self.constraint_database.explain(constraint))
            }
            _ => Err(ArithError::UnknownLiteral(literal.clone())),
        }
    }

    fn push(&mut self) {
        self.level += 1;
        self.constraint_database.new_checkpoint();
        self.simplex.partial_model_mut().new_checkpoint();
        self.processed_facts.new_checkpoint();
        self.asserted_disequalities.new_checkpoint();
    }

    fn pop(&mut self, levels: usize) {
        lra_assert_simple!(levels <= self.level);
        let new_level = self.level - levels;

        self.constraint_database.synchronise(new_level);
        self.simplex.partial_model_mut().synchronise(new_level);
        let _ = self.asserted_disequalities.synchronise(new_level);

        // Literals which are still asserted but were processed in a popped scope are processed
        // again.
        self.pending_facts
            .retain(|(_, fact_level)| *fact_level <= new_level);
        let still_asserted = self
            .processed_facts
            .synchronise(new_level)
            .filter(|(_, fact_level)| *fact_level <= new_level)
            .collect::<Vec<_>>();
        for fact in still_asserted {
            self.pending_facts.push_front(fact);
        }

        self.propagations.clear();
        self.level = new_level;
    }

    fn notify_restart(&mut self) {
        self.num_restarts += 1;
        self.restarts_since_reset += 1;
        if self.restarts_since_reset < self.reset_period {
            return;
        }

        self.restarts_since_reset = 0;
        self.reset_period += self.options.reset_period_increment;

        let density = self.simplex.tableau().density();
        let bloated = self
            .density_after_reset
            .map_or(true, |previous| density >= previous * self.options.reset_density_factor);
        if bloated {
            self.reset_tableau();
        } else {
            debug!("Skipping the tableau reset, density is only {density:.3}");
        }
    }
}
