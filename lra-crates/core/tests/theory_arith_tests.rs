#![cfg(test)]

mod helpers;

use helpers::assert_same_literals;
use helpers::int;
use helpers::sum;
use helpers::var;
use helpers::Harness;
use lra_core::engine::tableau::Row;
use lra_core::engine::ArithVar;
use lra_core::math::rational;
use lra_core::math::DeltaRational;
use lra_core::terms::Term;
use lra_core::ArithOptions;
use lra_core::Effort;
use lra_core::Theory;

#[test]
fn contradicting_bounds_on_one_variable() {
    let mut harness = Harness::new();
    let lower = Term::geq(var("x"), int(5));
    let upper = Term::leq(var("x"), int(3));

    harness.assert_and_check(&[lower.clone(), upper.clone()], Effort::Standard);

    assert_same_literals(&[lower, upper], &harness.conflict());
}

#[test]
fn infeasible_sum_is_found_through_its_slack() {
    let mut harness = Harness::new();
    let facts = [
        Term::leq(sum(&[var("x"), var("y")]), int(10)),
        Term::geq(var("x"), int(7)),
        Term::geq(var("y"), int(7)),
    ];

    harness.assert_and_check(&facts, Effort::Standard);

    assert_same_literals(&facts, &harness.conflict());
}

#[test]
fn bound_onto_an_excluded_value_conflicts_without_pivoting() {
    let mut harness = Harness::new();
    let facts = [
        Term::not(Term::equal(var("x"), int(5))),
        Term::leq(var("x"), int(5)),
        Term::geq(var("x"), int(5)),
    ];

    harness.assert_and_check(&facts, Effort::Standard);

    assert_same_literals(&facts, &harness.conflict());
    assert_eq!(0, harness.theory.simplex().statistics().num_pivots);
}

#[test]
fn equality_and_disequality_of_the_same_pair() {
    let mut harness = Harness::new();
    let equality = Term::equal(var("x"), var("y"));
    let disequality = Term::not(equality.clone());

    harness.assert_and_check(&[equality.clone(), disequality.clone()], Effort::Standard);

    assert_same_literals(&[equality, disequality], &harness.conflict());
}

#[test]
fn pinned_variable_has_exactly_that_value() {
    let mut harness = Harness::new();

    harness.assert_and_check(
        &[Term::geq(var("x"), int(2)), Term::leq(var("x"), int(2))],
        Effort::Full,
    );

    harness.assert_consistent();
    assert_eq!(Ok(rational(2)), harness.theory.get_value(&var("x")));
}

#[test]
fn feasible_system_gets_a_model_that_satisfies_it() {
    let mut harness = Harness::new();
    let facts = [
        Term::leq(sum(&[var("x"), var("y")]), int(10)),
        Term::geq(
            sum(&[var("x"), Term::mult(vec![int(-2), var("y")])]),
            int(1),
        ),
        Term::gt(var("y"), int(2)),
    ];

    harness.assert_and_check(&facts, Effort::Full);

    harness.assert_consistent();
    assert!(harness.out.lemmas.is_empty());
    for fact in facts {
        assert_eq!(
            Ok(lra_core::ModelValue::Boolean(true)),
            harness.theory.evaluate(&fact),
            "{fact} does not hold in the model"
        );
    }
}

#[test]
fn strict_bound_next_to_an_excluded_value_has_a_model() {
    let mut harness = Harness::new();
    let facts = [
        Term::gt(var("x"), int(3)),
        Term::not(Term::equal(var("x"), int(4))),
    ];

    harness.assert_and_check(&facts, Effort::Full);

    harness.assert_consistent();
    assert!(harness.out.lemmas.is_empty());
    for fact in facts {
        assert_eq!(
            Ok(lra_core::ModelValue::Boolean(true)),
            harness.theory.evaluate(&fact),
            "{fact} does not hold in the model"
        );
    }
}

#[test]
fn disequality_at_the_current_value_is_split_at_full_effort() {
    let mut harness = Harness::new();
    let equality = Term::equal(var("x"), int(0));

    harness.assert_and_check(&[Term::not(equality.clone())], Effort::Standard);
    harness.assert_consistent();
    assert!(harness.out.lemmas.is_empty());

    harness.check(Effort::Full);
    harness.assert_consistent();

    let less = Term::lt(var("x"), int(0));
    let greater = Term::gt(var("x"), int(0));
    assert_eq!(
        vec![
            Term::or(vec![equality.clone(), less.clone(), greater.clone()]),
            Term::implies(less.clone(), Term::not(equality.clone())),
            Term::implies(greater.clone(), Term::not(equality)),
            Term::implies(less, Term::not(greater.clone())),
        ],
        harness.out.lemmas
    );

    // Picking a side moves the value away from the excluded one.
    harness.assert_and_check(&[greater], Effort::Full);
    harness.assert_consistent();
    assert!(harness.out.lemmas.is_empty());
    assert!(harness.theory.get_value(&var("x")).unwrap() > rational(0));
}

#[test]
fn bounds_on_a_slack_propagate_weaker_bounds() {
    let mut harness = Harness::new();
    let x_plus_y = sum(&[var("x"), var("y")]);
    let tight = Term::leq(x_plus_y.clone(), int(10));
    let loose = Term::leq(x_plus_y.clone(), int(20));
    let refuted = Term::geq(x_plus_y, int(30));
    harness.register(&[tight.clone(), loose.clone(), refuted.clone()]);

    harness.assert_and_check(&[tight.clone()], Effort::Standard);
    harness.propagate();

    assert!(harness.out.propagations.contains(&loose));
    assert!(harness.out.propagations.contains(&Term::not(refuted.clone())));
    assert_eq!(Ok(tight.clone()), harness.theory.explain(&loose));
    assert_eq!(Ok(tight), harness.theory.explain(&Term::not(refuted)));
}

#[test]
fn asserting_the_negation_of_a_propagated_literal_conflicts() {
    let mut harness = Harness::new();
    let strong = Term::geq(var("x"), int(5));
    let weak = Term::geq(var("x"), int(1));
    harness.register(&[strong.clone(), weak.clone()]);

    harness.assert_and_check(&[strong.clone()], Effort::Standard);
    harness.assert_and_check(&[Term::not(weak.clone())], Effort::Standard);

    assert_same_literals(&[Term::not(weak), strong], &harness.conflict());
}

#[test]
fn popped_bounds_are_forgotten() {
    let mut harness = Harness::new();

    harness.push();
    harness.assert_and_check(&[Term::geq(var("x"), int(5))], Effort::Standard);
    harness.assert_consistent();
    harness.pop();

    harness.assert_and_check(&[Term::leq(var("x"), int(3))], Effort::Full);
    harness.assert_consistent();
    assert!(harness.theory.get_value(&var("x")).unwrap() <= rational(3));
}

#[test]
fn theory_recovers_after_a_conflict() {
    let mut harness = Harness::new();

    harness.push();
    harness.assert_and_check(&[Term::geq(var("x"), int(5))], Effort::Standard);
    harness.assert_consistent();

    harness.push();
    harness.assert_and_check(&[Term::leq(var("x"), int(3))], Effort::Standard);
    assert_eq!(1, harness.out.conflicts.len());
    harness.pop();

    harness.assert_and_check(&[Term::leq(var("x"), int(7))], Effort::Full);
    harness.assert_consistent();
    let value = harness.theory.get_value(&var("x")).unwrap();
    assert!(rational(5) <= value && value <= rational(7));
}

#[test]
fn literals_which_are_not_atoms_are_rejected() {
    let mut harness = Harness::new();

    assert!(harness.theory.assert_fact(var("x")).is_err());
    assert!(harness
        .theory
        .explain(&Term::leq(var("x"), int(1)))
        .is_err());
}

type Snapshot = (Vec<(ArithVar, Row)>, Vec<DeltaRational>);

fn snapshot(harness: &Harness) -> Snapshot {
    let simplex = harness.theory.simplex();
    let tableau = simplex.tableau();
    let rows = tableau
        .basic_variables()
        .map(|basic| (basic, tableau.row(basic).clone()))
        .collect();
    let assignment = (0..harness.theory.num_variables() as u32)
        .map(|id| simplex.assignment(ArithVar::new(id)).clone())
        .collect();
    (rows, assignment)
}

#[test]
fn resetting_twice_is_the_same_as_resetting_once() {
    let mut harness = Harness::new();
    let facts = [
        Term::leq(sum(&[var("x"), var("y")]), int(10)),
        Term::geq(sum(&[var("x"), Term::mult(vec![int(2), var("y")])]), int(4)),
        Term::geq(var("x"), int(1)),
    ];
    harness.register(&[Term::leq(sum(&[var("y"), var("z")]), int(3))]);
    harness.assert_and_check(&facts, Effort::Standard);
    harness.assert_consistent();

    harness.theory.reset_tableau();
    let once = snapshot(&harness);
    harness.theory.reset_tableau();
    let twice = snapshot(&harness);

    assert_eq!(2, once.0.len());
    assert_eq!(once, twice);

    harness.check(Effort::Full);
    harness.assert_consistent();
}

#[test]
fn reset_ejects_rows_which_are_no_longer_constrained() {
    let mut harness = Harness::new();
    let fact = Term::leq(sum(&[var("x"), var("y")]), int(10));

    harness.push();
    harness.assert_and_check(&[fact.clone()], Effort::Standard);
    harness.pop();
    assert_eq!(1, harness.theory.simplex().tableau().num_rows());

    harness.theory.reset_tableau();
    assert_eq!(0, harness.theory.simplex().tableau().num_rows());

    harness.assert_and_check(
        &[fact, Term::geq(var("x"), int(8)), Term::geq(var("y"), int(3))],
        Effort::Standard,
    );
    assert_eq!(1, harness.theory.simplex().tableau().num_rows());
    assert_eq!(3, harness.conflict().len());
}

#[test]
fn restarts_trigger_a_reset_once_the_period_is_over() {
    let mut harness = Harness::with_options(ArithOptions {
        initial_reset_period: 2,
        ..ArithOptions::default()
    });

    harness.push();
    harness.assert_and_check(
        &[Term::leq(sum(&[var("x"), var("y")]), int(10))],
        Effort::Standard,
    );
    harness.pop();

    harness.theory.notify_restart();
    assert_eq!(1, harness.theory.simplex().tableau().num_rows());
    harness.theory.notify_restart();
    assert_eq!(0, harness.theory.simplex().tableau().num_rows());
    assert_eq!(2, harness.theory.num_restarts());
}

#[test]
fn presolve_eliminates_unconstrained_variables() {
    let mut harness = Harness::new();
    let bounded_sum = Term::leq(sum(&[var("x"), var("y")]), int(10));
    let y_bound = Term::geq(var("y"), int(2));
    harness.register(&[bounded_sum.clone(), y_bound.clone()]);

    assert_eq!(1, harness.theory.presolve());
    let x = harness.theory.variable_of(&var("x")).unwrap();
    assert!(harness.theory.is_removed(x));

    harness.assert_and_check(&[bounded_sum.clone(), y_bound.clone()], Effort::Full);
    harness.assert_consistent();
    let total = harness
        .theory
        .get_value(&sum(&[var("x"), var("y")]))
        .unwrap();
    assert!(total <= rational(10));
    assert!(harness.theory.get_value(&var("y")).unwrap() >= rational(2));

    // A new atom over the eliminated variable brings it back.
    let x_bound = Term::geq(var("x"), int(100));
    harness.assert_and_check(&[x_bound.clone()], Effort::Standard);
    assert!(!harness.theory.is_removed(x));
    assert_same_literals(&[bounded_sum, y_bound, x_bound], &harness.conflict());
}
