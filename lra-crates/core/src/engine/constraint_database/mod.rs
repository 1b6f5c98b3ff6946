//! The database of arithmetic constraints.
//!
//! Every constraint is a triple `(variable, type, value)` and exists at most once; asking for
//! the same triple twice gives the same [`ConstraintId`]. Constraints come in pairs with their
//! negation, and both halves of a pair can carry the literal (term) they stand for. Whether a
//! constraint is known to hold is recorded as a proof in a backtrackable log, which is what
//! conflicts and propagations are explained from.
mod constraint;
mod proof_log;
mod value_collection;

use std::collections::BTreeMap;
use std::ops::Bound::Excluded;
use std::ops::Bound::Unbounded;

pub use constraint::ConstraintId;
pub use constraint::ConstraintType;
pub use constraint::ConstraintValue;
use constraint::negation_of;
use log::debug;
pub use proof_log::ProofId;
use proof_log::ProofLog;
use value_collection::ValueCollection;

use crate::basic_types::Trail;
use crate::containers::HashMap;
use crate::containers::HashSet;
use crate::containers::KeyedVec;
use crate::containers::StorageKey;
use crate::engine::ArithVar;
use crate::lra_assert_moderate;
use crate::lra_assert_simple;
use crate::math::DeltaRational;
use crate::terms::Kind;
use crate::terms::Term;

/// What an atom says, in terms of a single variable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AtomClassification {
    pub variable: ArithVar,
    pub constraint_type: ConstraintType,
    pub value: DeltaRational,
}

#[derive(Clone, Copy, Debug)]
enum ConstraintChange {
    Proof(ConstraintId),
    Preregistered(ConstraintId),
    Split(ConstraintId),
}

#[derive(Debug, Default)]
pub struct ConstraintDatabase {
    constraints: KeyedVec<ConstraintId, ConstraintValue>,
    /// For every variable its constraints, ordered by value.
    variable_constraints: KeyedVec<ArithVar, BTreeMap<DeltaRational, ValueCollection>>,
    literals: HashMap<Term, ConstraintId>,
    proofs: ProofLog,
    changes: Trail<ConstraintChange>,
}

impl ConstraintDatabase {
    pub fn get(&self, constraint: ConstraintId) -> &ConstraintValue {
        &self.constraints[constraint]
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.iter().filter(|value| value.live).count()
    }

    /// The constraint `variable constraint_type value`, created together with its negation if
    /// it does not exist yet.
    pub fn get_constraint(
        &mut self,
        variable: ArithVar,
        constraint_type: ConstraintType,
        value: DeltaRational,
    ) -> ConstraintId {
        if let Some(existing) = self.find(variable, constraint_type, &value) {
            return existing;
        }

        let (negated_type, negated_value) = negation_of(constraint_type, &value);
        lra_assert_simple!(
            self.find(variable, negated_type, &negated_value).is_none(),
            "a constraint exists without its negation"
        );

        let constraint = self.constraints.next_key();
        let negation = ConstraintId::create_from_index(constraint.index() + 1);

        let _ = self.insert(ConstraintValue {
            variable,
            constraint_type,
            value,
            literal: None,
            asserted: None,
            negation,
            proof: None,
            preregistered: false,
            split: false,
            live: true,
        });
        let _ = self.insert(ConstraintValue {
            variable,
            constraint_type: negated_type,
            value: negated_value,
            literal: None,
            asserted: None,
            negation: constraint,
            proof: None,
            preregistered: false,
            split: false,
            live: true,
        });

        constraint
    }

    /// The constraint `variable constraint_type value`, if it exists.
    pub fn find(
        &self,
        variable: ArithVar,
        constraint_type: ConstraintType,
        value: &DeltaRational,
    ) -> Option<ConstraintId> {
        self.variable_constraints
            .get(variable)?
            .get(value)?
            .get(constraint_type)
    }

    fn insert(&mut self, value: ConstraintValue) -> ConstraintId {
        let variable = value.variable;
        let constraint_type = value.constraint_type;
        let key = value.value.clone();

        self.variable_constraints
            .accomodate(variable, BTreeMap::default());
        let constraint = self.constraints.push(value);
        self.variable_constraints[variable]
            .entry(key)
            .or_default()
            .set(constraint_type, constraint);

        constraint
    }

    /// Whether any constraint mentions `variable`.
    pub fn has_constraints(&self, variable: ArithVar) -> bool {
        self.variable_constraints
            .get(variable)
            .is_some_and(|constraints| !constraints.is_empty())
    }

    pub fn has_literal(&self, literal: &Term) -> bool {
        self.literals.contains_key(literal)
    }

    pub fn lookup(&self, literal: &Term) -> Option<ConstraintId> {
        self.literals.get(literal).copied()
    }

    /// Registers a literal which has not been seen before and returns its constraint.
    ///
    /// An outer negation is stripped and the atom underneath is handed to `classify`; the
    /// returned constraint is the negation of the atom's constraint if the literal is negated.
    pub fn add_literal<E>(
        &mut self,
        literal: &Term,
        classify: impl FnOnce(&Term) -> Result<AtomClassification, E>,
    ) -> Result<ConstraintId, E> {
        lra_assert_simple!(!self.has_literal(literal));

        let (atom, negated) = match literal.kind() {
            Kind::Not => (literal.child(0), true),
            _ => (literal, false),
        };

        let classification = classify(atom)?;
        let constraint = self.add_atom(atom, classification);

        if negated {
            Ok(self.constraints[constraint].negation)
        } else {
            Ok(constraint)
        }
    }

    /// Attaches `atom` and its negation to the constraint pair described by `classification`,
    /// creating the pair if needed.
    ///
    /// A pair which already carries literals keeps them; `atom` then becomes another name for
    /// the same constraint.
    pub fn add_atom(&mut self, atom: &Term, classification: AtomClassification) -> ConstraintId {
        let AtomClassification {
            variable,
            constraint_type,
            value,
        } = classification;

        let constraint = self.get_constraint(variable, constraint_type, value);
        let negation = self.constraints[constraint].negation;

        self.attach_literal(constraint, atom.clone());
        self.attach_literal(negation, Term::not(atom.clone()));

        constraint
    }

    fn attach_literal(&mut self, constraint: ConstraintId, literal: Term) {
        if self.constraints[constraint].literal.is_none() {
            self.constraints[constraint].literal = Some(literal.clone());
        }
        let _ = self.literals.entry(literal).or_insert(constraint);
    }

    pub fn has_proof(&self, constraint: ConstraintId) -> bool {
        self.constraints[constraint].has_proof()
    }

    pub fn negation_has_proof(&self, constraint: ConstraintId) -> bool {
        self.constraints[self.constraints[constraint].negation].has_proof()
    }

    /// Neither the constraint nor its negation is known to hold.
    pub fn truth_is_unknown(&self, constraint: ConstraintId) -> bool {
        !self.has_proof(constraint) && !self.negation_has_proof(constraint)
    }

    /// Records that `constraint` holds because it was asserted; it explains itself.
    pub fn mark_as_true(&mut self, constraint: ConstraintId) {
        self.mark_as_true_with(constraint, &[])
    }

    pub fn mark_as_true_by(&mut self, constraint: ConstraintId, antecedent: ConstraintId) {
        self.mark_as_true_with(constraint, &[antecedent])
    }

    pub fn mark_as_true_by_both(
        &mut self,
        constraint: ConstraintId,
        first: ConstraintId,
        second: ConstraintId,
    ) {
        self.mark_as_true_with(constraint, &[first, second])
    }

    /// Records that `constraint` holds because `literal`, one of its names, was asserted.
    /// Explanations mention `literal` rather than the name the constraint was created with.
    pub fn mark_as_asserted(&mut self, constraint: ConstraintId, literal: Term) {
        lra_assert_simple!(self.lookup(&literal) == Some(constraint));

        if self.constraints[constraint].literal.as_ref() != Some(&literal) {
            self.constraints[constraint].asserted = Some(literal);
        }
        self.mark_as_true(constraint);
    }

    /// Records that `constraint` holds because all of `antecedents` hold.
    ///
    /// The antecedents must already have a proof, and a constraint without antecedents must
    /// have a literal to explain itself with.
    pub fn mark_as_true_with(&mut self, constraint: ConstraintId, antecedents: &[ConstraintId]) {
        lra_assert_simple!(self.truth_is_unknown(constraint));
        lra_assert_simple!(
            !antecedents.is_empty() || self.constraints[constraint].literal.is_some(),
            "a constraint without a literal cannot explain itself"
        );
        lra_assert_moderate!(antecedents
            .iter()
            .all(|antecedent| self.constraints[antecedent].has_proof()));

        let proof = self.proofs.record(antecedents.iter().copied());
        self.constraints[constraint].proof = Some(proof);
        self.changes.push(ConstraintChange::Proof(constraint));
    }

    /// The conjunction of asserted literals which entails `constraint`.
    pub fn explain(&self, constraint: ConstraintId) -> Term {
        Term::and(self.explanation_literals(&[constraint]))
    }

    /// The literals of [`ConstraintDatabase::explanation`].
    pub fn explanation_literals(&self, constraints: &[ConstraintId]) -> Vec<Term> {
        self.explanation(constraints)
            .into_iter()
            .map(|constraint| {
                let value = &self.constraints[constraint];
                value
                    .asserted
                    .as_ref()
                    .or(value.literal.as_ref())
                    .cloned()
                    .unwrap_or_else(|| panic!("{constraint} explains itself without a literal"))
            })
            .collect()
    }

    /// The self-explaining constraints which together entail every one of `constraints`,
    /// without duplicates and in a deterministic order.
    ///
    /// # Panics
    /// If one of the constraints has no proof.
    pub fn explanation(&self, constraints: &[ConstraintId]) -> Vec<ConstraintId> {
        let mut visited: HashSet<ConstraintId> = HashSet::default();
        let mut leaves = Vec::new();
        let mut to_explain = constraints.iter().rev().copied().collect::<Vec<_>>();

        while let Some(constraint) = to_explain.pop() {
            if !visited.insert(constraint) {
                continue;
            }

            let Some(proof) = self.constraints[constraint].proof else {
                panic!("{constraint} is explained but has no proof");
            };

            let num_pending = to_explain.len();
            to_explain.extend(self.proofs.antecedents(proof));
            if to_explain.len() == num_pending {
                leaves.push(constraint);
            }
        }

        leaves
    }

    /// The lemma `(= l r) ∨ (< l r) ∨ (> l r)` for the equality underlying `constraint`, which
    /// must be an equality or a disequality with a literal.
    ///
    /// Both halves of the pair are marked as split.
    pub fn split(&mut self, constraint: ConstraintId) -> Term {
        let constraint_type = self.constraints[constraint].constraint_type;
        lra_assert_simple!(matches!(
            constraint_type,
            ConstraintType::Equality | ConstraintType::Disequality
        ));

        let negation = self.constraints[constraint].negation;
        let equality = if constraint_type == ConstraintType::Equality {
            constraint
        } else {
            negation
        };

        let Some(atom) = self.constraints[equality].literal.clone() else {
            panic!("cannot split {constraint} without a literal");
        };
        lra_assert_simple!(*atom.kind() == Kind::Eq);

        self.set_split(constraint);
        self.set_split(negation);

        let lhs = atom.child(0).clone();
        let rhs = atom.child(1).clone();
        Term::or(vec![
            atom,
            Term::lt(lhs.clone(), rhs.clone()),
            Term::gt(lhs, rhs),
        ])
    }

    fn set_split(&mut self, constraint: ConstraintId) {
        if !self.constraints[constraint].split {
            self.constraints[constraint].split = true;
            self.changes.push(ConstraintChange::Split(constraint));
        }
    }

    /// Marks both halves of the pair as preregistered, which protects them from garbage
    /// collection.
    pub fn set_preregistered(&mut self, constraint: ConstraintId) {
        let negation = self.constraints[constraint].negation;
        lra_assert_simple!(
            !self.constraints[constraint].preregistered && !self.constraints[negation].preregistered
        );

        for id in [constraint, negation] {
            self.constraints[id].preregistered = true;
            self.changes.push(ConstraintChange::Preregistered(id));
        }
    }

    /// The constraints whose truth is unknown and which are implied to hold by `constraint`,
    /// found by walking the sorted constraints of its variable away from its value.
    ///
    /// The walk stops at the first bound in the same direction which already has a proof, since
    /// everything beyond it was implied when that bound was proven.
    pub fn implied_by(&self, constraint: ConstraintId) -> Vec<ConstraintId> {
        let value = &self.constraints[constraint];
        let Some(sorted) = self.variable_constraints.get(value.variable) else {
            return vec![];
        };

        let mut implied = Vec::new();
        match value.constraint_type {
            ConstraintType::LowerBound => self.sweep_below(sorted, &value.value, &mut implied),
            ConstraintType::UpperBound => self.sweep_above(sorted, &value.value, &mut implied),
            ConstraintType::Equality => {
                if let Some(at_value) = sorted.get(&value.value) {
                    for bound in [ConstraintType::LowerBound, ConstraintType::UpperBound] {
                        if let Some(bound) = at_value.get(bound) {
                            self.push_if_unknown(bound, &mut implied);
                        }
                    }
                }
                self.sweep_below(sorted, &value.value, &mut implied);
                self.sweep_above(sorted, &value.value, &mut implied);
            }
            ConstraintType::Disequality => {}
        }

        implied.retain(|&other| other != constraint);
        implied
    }

    /// `x ≥ value` holds; visit the constraints strictly below `value`.
    fn sweep_below(
        &self,
        sorted: &BTreeMap<DeltaRational, ValueCollection>,
        value: &DeltaRational,
        implied: &mut Vec<ConstraintId>,
    ) {
        for (_, collection) in sorted.range(..value).rev() {
            let mut reached_proven_bound = false;
            for other in collection.iter() {
                let other_value = &self.constraints[other];
                match other_value.constraint_type {
                    ConstraintType::LowerBound if other_value.has_proof() => {
                        reached_proven_bound = true
                    }
                    ConstraintType::LowerBound | ConstraintType::Disequality => {
                        self.push_if_unknown(other, implied)
                    }
                    ConstraintType::UpperBound | ConstraintType::Equality => {
                        self.push_if_unknown(other_value.negation, implied)
                    }
                }
            }

            if reached_proven_bound {
                break;
            }
        }
    }

    /// `x ≤ value` holds; visit the constraints strictly above `value`.
    fn sweep_above(
        &self,
        sorted: &BTreeMap<DeltaRational, ValueCollection>,
        value: &DeltaRational,
        implied: &mut Vec<ConstraintId>,
    ) {
        for (_, collection) in sorted.range((Excluded(value), Unbounded)) {
            let mut reached_proven_bound = false;
            for other in collection.iter() {
                let other_value = &self.constraints[other];
                match other_value.constraint_type {
                    ConstraintType::UpperBound if other_value.has_proof() => {
                        reached_proven_bound = true
                    }
                    ConstraintType::UpperBound | ConstraintType::Disequality => {
                        self.push_if_unknown(other, implied)
                    }
                    ConstraintType::LowerBound | ConstraintType::Equality => {
                        self.push_if_unknown(other_value.negation, implied)
                    }
                }
            }

            if reached_proven_bound {
                break;
            }
        }
    }

    fn push_if_unknown(&self, constraint: ConstraintId, implied: &mut Vec<ConstraintId>) {
        if self.truth_is_unknown(constraint) && !implied.contains(&constraint) {
            implied.push(constraint);
        }
    }

    /// Removes every constraint pair in which both halves are safe to garbage collect, and
    /// returns the number of constraints removed.
    pub fn collect_garbage(&mut self) -> usize {
        let collectible = self
            .constraints
            .keys()
            .filter(|&constraint| {
                let value = &self.constraints[constraint];
                value.live
                    && constraint < value.negation
                    && value.safe_to_garbage_collect()
                    && self.constraints[value.negation].safe_to_garbage_collect()
            })
            .collect::<Vec<_>>();

        for &constraint in collectible.iter() {
            let negation = self.constraints[constraint].negation;
            self.remove(constraint);
            self.remove(negation);
        }

        let constraints = &self.constraints;
        self.literals
            .retain(|_, constraint| constraints[*constraint].live);

        debug!("Collected {} constraint pairs", collectible.len());
        2 * collectible.len()
    }

    fn remove(&mut self, constraint: ConstraintId) {
        let value = &mut self.constraints[constraint];
        value.live = false;
        let _ = value.literal.take();

        let sorted = &mut self.variable_constraints[value.variable];
        if let Some(collection) = sorted.get_mut(&value.value) {
            collection.remove(value.constraint_type);
            if collection.is_empty() {
                let _ = sorted.remove(&value.value);
            }
        }
    }

    pub fn new_checkpoint(&mut self) {
        self.proofs.new_checkpoint();
        self.changes.new_checkpoint();
    }

    /// Undoes every proof and flag recorded after `new_level` was entered.
    pub fn synchronise(&mut self, new_level: usize) {
        for change in self.changes.synchronise(new_level) {
            match change {
                ConstraintChange::Proof(constraint) => {
                    self.constraints[constraint].proof = None;
                    self.constraints[constraint].asserted = None;
                }
                ConstraintChange::Preregistered(constraint) => {
                    self.constraints[constraint].preregistered = false
                }
                ConstraintChange::Split(constraint) => self.constraints[constraint].split = false,
            }
        }
        self.proofs.synchronise(new_level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::rational;

    fn x() -> ArithVar {
        ArithVar::new(0)
    }

    fn bound(constraint_type: ConstraintType, value: i64) -> AtomClassification {
        AtomClassification {
            variable: x(),
            constraint_type,
            value: DeltaRational::from(rational(value)),
        }
    }

    fn atom(relation: fn(Term, Term) -> Term, value: i64) -> Term {
        relation(Term::variable("x"), Term::integer(value))
    }

    #[test]
    fn get_constraint_is_idempotent_and_links_the_negation() {
        let mut database = ConstraintDatabase::default();
        let value = DeltaRational::from(rational(4));

        let constraint = database.get_constraint(x(), ConstraintType::LowerBound, value.clone());
        let again = database.get_constraint(x(), ConstraintType::LowerBound, value);
        assert_eq!(constraint, again);

        let negation = database.get(constraint).negation();
        assert_eq!(constraint, database.get(negation).negation());
        assert_eq!(ConstraintType::UpperBound, database.get(negation).constraint_type());
        assert_eq!(
            &DeltaRational::new(rational(4), rational(-1)),
            database.get(negation).value()
        );
        assert_eq!(2, database.num_constraints());
    }

    #[test]
    fn negated_literal_maps_to_the_negation() {
        let mut database = ConstraintDatabase::default();
        let atom = atom(Term::geq, 4);

        let negated = database
            .add_literal::<()>(&Term::not(atom.clone()), |_| {
                Ok(bound(ConstraintType::LowerBound, 4))
            })
            .unwrap();

        let positive = database.lookup(&atom).unwrap();
        assert_eq!(negated, database.get(positive).negation());
        assert_eq!(Some(&atom), database.get(positive).literal());
        assert!(database.has_literal(&Term::not(atom)));
    }

    #[test]
    fn atom_attaches_to_an_existing_structural_pair() {
        let mut database = ConstraintDatabase::default();
        let structural = database.get_constraint(
            x(),
            ConstraintType::Equality,
            DeltaRational::from(rational(1)),
        );

        let attached = database.add_atom(&atom(Term::equal, 1), bound(ConstraintType::Equality, 1));

        assert_eq!(structural, attached);
        assert_eq!(2, database.num_constraints());
        assert_eq!(Some(&atom(Term::equal, 1)), database.get(attached).literal());
    }

    #[test]
    fn explanation_follows_proof_chains_to_asserted_literals() {
        let mut database = ConstraintDatabase::default();
        let a = database.add_atom(&atom(Term::geq, 1), bound(ConstraintType::LowerBound, 1));
        let d = database.add_atom(&atom(Term::leq, 9), bound(ConstraintType::UpperBound, 9));
        let b = database.add_atom(&atom(Term::geq, 0), bound(ConstraintType::LowerBound, 0));
        let c = database.add_atom(&atom(Term::equal, 20), bound(ConstraintType::Equality, 20));
        let c = database.get(c).negation();

        database.mark_as_true(a);
        database.mark_as_true(d);
        database.mark_as_true_by(b, a);
        database.mark_as_true_by_both(c, b, d);

        assert_eq!(vec![a, d], database.explanation(&[c]));
        assert_eq!(
            Term::and(vec![atom(Term::geq, 1), atom(Term::leq, 9)]),
            database.explain(c)
        );
        assert_eq!(atom(Term::geq, 1), database.explain(b));
    }

    #[test]
    fn asserted_aliases_are_used_in_explanations() {
        let mut database = ConstraintDatabase::default();
        let original = atom(Term::gt, 5);
        let constraint = database.add_atom(
            &original,
            AtomClassification {
                variable: x(),
                constraint_type: ConstraintType::LowerBound,
                value: DeltaRational::new(rational(5), rational(1)),
            },
        );
        let alias = Term::not(atom(Term::leq, 5));
        let negation = database.get(constraint).negation();
        let _ = database.add_atom(
            &atom(Term::leq, 5),
            AtomClassification {
                variable: x(),
                constraint_type: ConstraintType::UpperBound,
                value: DeltaRational::from(rational(5)),
            },
        );
        assert_eq!(Some(negation), database.lookup(&atom(Term::leq, 5)));

        database.new_checkpoint();
        database.mark_as_asserted(constraint, alias.clone());
        assert_eq!(alias, database.explain(constraint));

        database.synchronise(0);
        database.mark_as_asserted(constraint, original.clone());
        assert_eq!(original, database.explain(constraint));
    }

    #[test]
    fn proofs_and_flags_are_undone_on_synchronise() {
        let mut database = ConstraintDatabase::default();
        let a = database.add_atom(&atom(Term::geq, 1), bound(ConstraintType::LowerBound, 1));
        let e = database.add_atom(&atom(Term::equal, 1), bound(ConstraintType::Equality, 1));

        database.new_checkpoint();
        database.mark_as_true(a);
        database.set_preregistered(a);
        let _ = database.split(e);
        assert!(database.negation_has_proof(database.get(a).negation()));

        database.synchronise(0);

        assert!(database.truth_is_unknown(a));
        assert!(!database.get(a).is_preregistered());
        assert!(!database.get(e).is_split());
        assert!(!database.get(database.get(e).negation()).is_split());
    }

    #[test]
    fn split_of_a_disequality_produces_the_trichotomy() {
        let mut database = ConstraintDatabase::default();
        let equality = atom(Term::equal, 5);
        let disequality = database
            .add_literal::<()>(&Term::not(equality.clone()), |_| {
                Ok(bound(ConstraintType::Equality, 5))
            })
            .unwrap();

        let lemma = database.split(disequality);

        let x = Term::variable("x");
        assert_eq!(
            Term::or(vec![
                equality,
                Term::lt(x.clone(), Term::integer(5)),
                Term::gt(x, Term::integer(5)),
            ]),
            lemma
        );
        assert!(database.get(disequality).is_split());
    }

    #[test]
    fn garbage_collection_spares_protected_pairs() {
        let mut database = ConstraintDatabase::default();
        let kept = database.add_atom(&atom(Term::geq, 1), bound(ConstraintType::LowerBound, 1));
        let proven = database.add_atom(&atom(Term::leq, 7), bound(ConstraintType::UpperBound, 7));
        let dropped = database.add_atom(&atom(Term::geq, 3), bound(ConstraintType::LowerBound, 3));
        database.set_preregistered(kept);
        database.mark_as_true(proven);

        assert_eq!(2, database.collect_garbage());

        assert!(!database.get(dropped).is_live());
        assert!(!database.has_literal(&atom(Term::geq, 3)));
        assert!(database
            .find(x(), ConstraintType::LowerBound, &DeltaRational::from(rational(3)))
            .is_none());
        assert!(database.get(kept).is_live());
        assert!(database.has_literal(&atom(Term::leq, 7)));
        assert_eq!(4, database.num_constraints());
    }

    #[test]
    fn lower_bound_implies_weaker_bounds_and_refutes_smaller_values() {
        let mut database = ConstraintDatabase::default();
        let weaker = database.add_atom(&atom(Term::geq, 2), bound(ConstraintType::LowerBound, 2));
        let small_upper =
            database.add_atom(&atom(Term::leq, 3), bound(ConstraintType::UpperBound, 3));
        let small_equality =
            database.add_atom(&atom(Term::equal, 1), bound(ConstraintType::Equality, 1));
        let large_upper =
            database.add_atom(&atom(Term::leq, 9), bound(ConstraintType::UpperBound, 9));
        let strong = database.add_atom(&atom(Term::geq, 5), bound(ConstraintType::LowerBound, 5));

        database.mark_as_true(strong);
        let implied = database.implied_by(strong);

        assert!(implied.contains(&weaker));
        assert!(implied.contains(&database.get(small_upper).negation()));
        assert!(implied.contains(&database.get(small_equality).negation()));
        assert!(!implied.contains(&large_upper));
        assert!(!implied.contains(&database.get(large_upper).negation()));
    }

    #[test]
    fn sweep_stops_at_a_proven_bound() {
        let mut database = ConstraintDatabase::default();
        let weakest = database.add_atom(&atom(Term::geq, 0), bound(ConstraintType::LowerBound, 0));
        let middle = database.add_atom(&atom(Term::geq, 2), bound(ConstraintType::LowerBound, 2));
        let strong = database.add_atom(&atom(Term::geq, 5), bound(ConstraintType::LowerBound, 5));

        database.mark_as_true(middle);
        database.mark_as_true(strong);

        assert!(database.implied_by(strong).is_empty());
        assert!(database.implied_by(middle).contains(&weakest));
    }
}
