//! Lemmas derived from the shape of the input formula before the search starts.
use log::debug;

use super::TheoryArith;
use crate::containers::HashMap;
use crate::containers::HashSet;
use crate::math::Rational;
use crate::terms::Kind;
use crate::terms::Term;
use crate::terms::ValidityOracle;

impl TheoryArith {
    /// Scans `term` and adds valid lemmas to `learned`:
    /// - `(ite (<= x y) x y)` and its variants are a minimum or a maximum, and so bounded by
    ///   both `x` and `y`;
    /// - `(ite c k1 k2)` over constants lies between the smaller and the larger constant;
    /// - top-level conjuncts `(=> A (= v k))` for which the disjunction of the `A` is valid
    ///   restrict `v` to a finite set of constants, which gives a bound on `v` and excludes the
    ///   gaps between consecutive constants.
    pub fn static_learning(
        &self,
        term: &Term,
        learned: &mut Vec<Term>,
        oracle: &mut dyn ValidityOracle,
    ) {
        let num_learned = learned.len();

        let mut visited: HashSet<Term> = HashSet::default();
        let mut stack = vec![term.clone()];
        while let Some(current) = stack.pop() {
            if !visited.insert(current.clone()) {
                continue;
            }
            if *current.kind() == Kind::Ite {
                learn_from_ite(&current, learned);
            }
            stack.extend(current.children().iter().cloned());
        }

        learn_finite_domains(term, learned, oracle);

        debug!("Static learning found {} lemmas", learned.len() - num_learned);
    }
}

fn learn_from_ite(ite: &Term, learned: &mut Vec<Term>) {
    let condition = ite.child(0);
    let then_branch = ite.child(1);
    let else_branch = ite.child(2);

    if let (Some(first), Some(second)) = (then_branch.constant_value(), else_branch.constant_value())
    {
        let (min, max) = if first <= second {
            (first, second)
        } else {
            (second, first)
        };
        learned.push(Term::and(vec![
            Term::geq(ite.clone(), Term::constant(min.clone())),
            Term::leq(ite.clone(), Term::constant(max.clone())),
        ]));
        return;
    }

    let condition_is_less = match condition.kind() {
        Kind::Lt | Kind::Leq => true,
        Kind::Gt | Kind::Geq => false,
        _ => return,
    };
    let lhs = condition.child(0);
    let rhs = condition.child(1);

    // Whether the branch taken when the condition holds is its left hand side.
    let then_is_lhs = if then_branch == lhs && else_branch == rhs {
        true
    } else if then_branch == rhs && else_branch == lhs {
        false
    } else {
        return;
    };

    let relation: fn(Term, Term) -> Term = if condition_is_less == then_is_lhs {
        Term::leq
    } else {
        Term::geq
    };
    learned.push(Term::and(vec![
        relation(ite.clone(), lhs.clone()),
        relation(ite.clone(), rhs.clone()),
    ]));
}

fn learn_finite_domains(term: &Term, learned: &mut Vec<Term>, oracle: &mut dyn ValidityOracle) {
    let mut conjuncts = Vec::new();
    collect_conjuncts(term, &mut conjuncts);

    let mut positions: HashMap<Term, usize> = HashMap::default();
    let mut domains: Vec<(Term, Vec<(Term, Rational)>)> = Vec::new();
    for conjunct in conjuncts {
        let Some((condition, variable, value)) = as_conditional_assignment(&conjunct) else {
            continue;
        };
        let position = *positions.entry(variable.clone()).or_insert_with(|| {
            domains.push((variable, Vec::new()));
            domains.len() - 1
        });
        domains[position].1.push((condition, value));
    }

    for (variable, cases) in domains {
        if cases.len() < 2 {
            continue;
        }

        let conditions = cases
            .iter()
            .map(|(condition, _)| condition.clone())
            .collect::<Vec<_>>();
        if !oracle.is_valid(&Term::or(conditions)) {
            continue;
        }

        let mut values = cases.into_iter().map(|(_, value)| value).collect::<Vec<_>>();
        values.sort();
        values.dedup();
        debug!("{variable} takes one of {} values", values.len());

        let (Some(min), Some(max)) = (values.first(), values.last()) else {
            continue;
        };
        learned.push(Term::and(vec![
            Term::geq(variable.clone(), Term::constant(min.clone())),
            Term::leq(variable.clone(), Term::constant(max.clone())),
        ]));
        for gap in values.windows(2) {
            learned.push(Term::or(vec![
                Term::leq(variable.clone(), Term::constant(gap[0].clone())),
                Term::geq(variable.clone(), Term::constant(gap[1].clone())),
            ]));
        }
    }
}

fn collect_conjuncts(term: &Term, conjuncts: &mut Vec<Term>) {
    if *term.kind() == Kind::And {
        for child in term.children() {
            collect_conjuncts(child, conjuncts);
        }
    } else {
        conjuncts.push(term.clone());
    }
}

/// Matches `(=> A (= v k))` and `(or (not A) (= v k))`, in either orientation of the equality.
fn as_conditional_assignment(conjunct: &Term) -> Option<(Term, Term, Rational)> {
    let (condition, equality) = match conjunct.kind() {
        Kind::Implies => (conjunct.child(0).clone(), conjunct.child(1)),
        Kind::Or if conjunct.num_children() == 2 => {
            if *conjunct.child(0).kind() != Kind::Not {
                return None;
            }
            (conjunct.child(0).child(0).clone(), conjunct.child(1))
        }
        _ => return None,
    };

    if *equality.kind() != Kind::Eq {
        return None;
    }
    let (variable, value) = match (equality.child(0), equality.child(1)) {
        (variable, value) | (value, variable)
            if matches!(variable.kind(), Kind::Variable(_)) && value.is_constant() =>
        {
            (variable, value)
        }
        _ => return None,
    };

    Some((condition, variable.clone(), value.constant_value()?.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::rational;
    use crate::terms::TruthTableOracle;

    fn x() -> Term {
        Term::variable("x")
    }

    fn y() -> Term {
        Term::variable("y")
    }

    fn learn(term: &Term) -> Vec<Term> {
        let theory = TheoryArith::default();
        let mut learned = Vec::new();
        theory.static_learning(term, &mut learned, &mut TruthTableOracle::default());
        learned
    }

    #[test]
    fn minimum_is_bounded_by_both_arguments() {
        let min = Term::ite(Term::leq(x(), y()), x(), y());
        let atom = Term::geq(min.clone(), Term::integer(0));

        assert_eq!(
            vec![Term::and(vec![
                Term::leq(min.clone(), x()),
                Term::leq(min, y())
            ])],
            learn(&atom)
        );
    }

    #[test]
    fn swapped_branches_give_a_maximum() {
        let max = Term::ite(Term::lt(x(), y()), y(), x());

        assert_eq!(
            vec![Term::and(vec![
                Term::geq(max.clone(), x()),
                Term::geq(max.clone(), y())
            ])],
            learn(&Term::leq(max, Term::integer(4)))
        );
    }

    #[test]
    fn constant_branches_sandwich_the_ite() {
        let ite = Term::ite(Term::variable("p"), Term::integer(7), Term::integer(-2));

        assert_eq!(
            vec![Term::and(vec![
                Term::geq(ite.clone(), Term::integer(-2)),
                Term::leq(ite.clone(), Term::integer(7))
            ])],
            learn(&Term::equal(ite.clone(), x()))
        );
    }

    #[test]
    fn covered_cases_restrict_a_variable_to_its_values() {
        let p = Term::variable("p");
        let q = Term::variable("q");
        let formula = Term::and(vec![
            Term::implies(p.clone(), Term::equal(x(), Term::integer(3))),
            Term::or(vec![
                Term::not(Term::and(vec![Term::not(p.clone()), q.clone()])),
                Term::equal(Term::integer(0), x()),
            ]),
            Term::implies(
                Term::and(vec![Term::not(p), Term::not(q)]),
                Term::equal(x(), Term::integer(1)),
            ),
        ]);

        let learned = learn(&formula);

        let at = |value: i64| Term::constant(rational(value));
        assert_eq!(
            vec![
                Term::and(vec![Term::geq(x(), at(0)), Term::leq(x(), at(3))]),
                Term::or(vec![Term::leq(x(), at(0)), Term::geq(x(), at(1))]),
                Term::or(vec![Term::leq(x(), at(1)), Term::geq(x(), at(3))]),
            ],
            learned
        );
    }

    #[test]
    fn uncovered_cases_teach_nothing() {
        let formula = Term::and(vec![
            Term::implies(Term::variable("p"), Term::equal(x(), Term::integer(0))),
            Term::implies(Term::variable("q"), Term::equal(x(), Term::integer(1))),
        ]);

        assert!(learn(&formula).is_empty());
    }
}
