//! The sparse Simplex tableau.
//!
//! Every basic variable owns one [`Row`] `basic = Σ coefficient·non_basic` which only mentions
//! non-basic variables. A column index keeps, for every non-basic variable, the basic variables
//! whose rows mention it, which is what makes pivoting and updates proportional to the number of
//! affected rows.
mod row;

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use log::trace;
use num::One;
use num::Zero;
pub use row::Row;
use row::EntryChange;

use crate::containers::KeyedVec;
use crate::engine::ArithVar;
use crate::lra_assert_advanced;
use crate::lra_assert_simple;
use crate::math::Rational;

#[derive(Debug, Default)]
pub struct Tableau {
    /// `Some` exactly for the basic variables.
    rows: KeyedVec<ArithVar, Option<Row>>,
    /// For every variable, the basic variables whose row mentions it.
    columns: KeyedVec<ArithVar, BTreeSet<ArithVar>>,
    /// Rows which are kept aside; their basic variable is neither basic nor used in any row.
    ejected: BTreeMap<ArithVar, Row>,
    num_rows: usize,
    num_entries: usize,
}

impl Tableau {
    /// Makes room for `variable`, which starts out non-basic.
    pub fn ensure_variable(&mut self, variable: ArithVar) {
        self.rows.accomodate(variable, None);
        self.columns.accomodate(variable, BTreeSet::default());
    }

    pub fn num_variables(&self) -> usize {
        self.rows.len()
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_entries(&self) -> usize {
        self.num_entries
    }

    pub fn is_basic(&self, variable: ArithVar) -> bool {
        self.rows.get(variable).is_some_and(Option::is_some)
    }

    pub fn is_ejected(&self, variable: ArithVar) -> bool {
        self.ejected.contains_key(&variable)
    }

    pub fn basic_variables(&self) -> impl Iterator<Item = ArithVar> + '_ {
        self.rows
            .keys()
            .filter(|&variable| self.rows[variable].is_some())
    }

    /// The row of a basic variable.
    ///
    /// # Panics
    /// If `basic` is not basic.
    pub fn row(&self, basic: ArithVar) -> &Row {
        match &self.rows[basic] {
            Some(row) => row,
            None => panic!("{basic} is not basic"),
        }
    }

    pub fn coefficient(&self, basic: ArithVar, variable: ArithVar) -> Option<&Rational> {
        self.row(basic).coefficient(variable)
    }

    /// The basic variables whose row mentions `variable`.
    pub fn column(&self, variable: ArithVar) -> impl Iterator<Item = ArithVar> + '_ {
        self.columns.get(variable).into_iter().flatten().copied()
    }

    pub fn column_len(&self, variable: ArithVar) -> usize {
        self.columns.get(variable).map_or(0, BTreeSet::len)
    }

    /// Of the rows mentioning `variable`, the one with the fewest entries; ties go to the
    /// smallest basic variable.
    pub fn shortest_row_containing(&self, variable: ArithVar) -> Option<ArithVar> {
        self.column(variable)
            .min_by_key(|&basic| (self.row(basic).len(), basic))
    }

    /// `#entries / (#rows × #variables)`, or zero for an empty tableau.
    pub fn density(&self) -> f64 {
        if self.num_rows == 0 || self.rows.is_empty() {
            0.0
        } else {
            self.num_entries as f64 / (self.num_rows * self.rows.len()) as f64
        }
    }

    /// Adds the row `basic = Σ coefficients[i]·variables[i]`.
    ///
    /// Variables of the definition which are currently basic are replaced by their rows, so the
    /// installed row only mentions non-basic variables. `basic` must not be basic, ejected, or
    /// mentioned by any row.
    pub fn add_row(&mut self, basic: ArithVar, coefficients: &[Rational], variables: &[ArithVar]) {
        lra_assert_simple!(coefficients.len() == variables.len());

        let definition = variables
            .iter()
            .copied()
            .zip(coefficients.iter().cloned())
            .collect::<Vec<_>>();
        self.install_definition(basic, definition);
    }

    fn install_definition(
        &mut self,
        basic: ArithVar,
        definition: impl IntoIterator<Item = (ArithVar, Rational)>,
    ) {
        self.ensure_variable(basic);
        lra_assert_simple!(!self.is_basic(basic), "{basic} already has a row");
        lra_assert_simple!(!self.is_ejected(basic), "{basic} has an ejected row");
        lra_assert_simple!(self.column_len(basic) == 0, "{basic} is used in a row");

        let mut row = Row::default();
        for (variable, coefficient) in definition {
            self.ensure_variable(variable);
            match &self.rows[variable] {
                Some(substitute) => {
                    for (non_basic, factor) in substitute.iter() {
                        let _ = row.add(non_basic, &coefficient * factor);
                    }
                }
                None => {
                    let _ = row.add(variable, coefficient);
                }
            }
        }

        lra_assert_simple!(!row.contains(basic), "{basic} is defined in terms of itself");
        self.install(basic, row);
        lra_assert_advanced!(self.is_consistent());
    }

    fn install(&mut self, basic: ArithVar, row: Row) {
        for variable in row.variables() {
            let _ = self.columns[variable].insert(basic);
        }
        self.num_entries += row.len();
        self.num_rows += 1;
        self.rows[basic] = Some(row);
    }

    fn uninstall(&mut self, basic: ArithVar) -> Row {
        let Some(row) = self.rows[basic].take() else {
            panic!("{basic} is not basic");
        };

        for variable in row.variables() {
            let _ = self.columns[variable].remove(&basic);
        }
        self.num_entries -= row.len();
        self.num_rows -= 1;
        row
    }

    /// Exchanges the roles of the basic variable `basic` and the non-basic variable
    /// `non_basic`, which must occur in the row of `basic`.
    ///
    /// The row of `basic` is solved for `non_basic`, and that solution is substituted into every
    /// other row which mentions `non_basic`.
    pub fn pivot(&mut self, basic: ArithVar, non_basic: ArithVar) {
        lra_assert_simple!(self.is_basic(basic));
        lra_assert_simple!(!self.is_basic(non_basic));

        let mut row = self.uninstall(basic);
        let Some(coefficient) = row.remove(non_basic) else {
            panic!("cannot pivot {basic} with {non_basic}, which is not in its row");
        };

        // basic = a·non_basic + rest  ⟹  non_basic = (1/a)·basic - (1/a)·rest
        let inverse = Rational::one() / coefficient;
        row.scale(&-&inverse);
        let _ = row.add(basic, inverse);

        let affected = self.column(non_basic).collect::<Vec<_>>();
        for other in affected {
            self.substitute(other, non_basic, &row);
        }

        self.install(non_basic, row);
        trace!("Pivoted {basic} out of the basis in favour of {non_basic}");
        lra_assert_advanced!(self.is_consistent());
    }

    /// Replaces `variable` in the row of `basic` by `definition`.
    fn substitute(&mut self, basic: ArithVar, variable: ArithVar, definition: &Row) {
        let Some(row) = self.rows[basic].as_mut() else {
            panic!("{basic} is not basic");
        };
        let Some(factor) = row.remove(variable) else {
            return;
        };
        let _ = self.columns[variable].remove(&basic);
        self.num_entries -= 1;

        for (other, coefficient) in definition.iter() {
            match row.add(other, &factor * coefficient) {
                EntryChange::Created => {
                    let _ = self.columns[other].insert(basic);
                    self.num_entries += 1;
                }
                EntryChange::Cancelled => {
                    let _ = self.columns[other].remove(&basic);
                    self.num_entries -= 1;
                }
                EntryChange::Updated | EntryChange::Unchanged => {}
            }
        }
    }

    /// Takes the row of `basic` out of the tableau but keeps it aside for
    /// [`Tableau::reinject_basic`].
    pub fn eject_basic(&mut self, basic: ArithVar) {
        let row = self.uninstall(basic);
        let _ = self.ejected.insert(basic, row);
    }

    /// Puts an ejected row back, rewritten over the current non-basic variables.
    pub fn reinject_basic(&mut self, basic: ArithVar) {
        let Some(row) = self.ejected.remove(&basic) else {
            panic!("{basic} has no ejected row");
        };
        self.install_definition(
            basic,
            row.iter()
                .map(|(variable, coefficient)| (variable, coefficient.clone()))
                .collect::<Vec<_>>(),
        );
    }

    pub fn reinject_all(&mut self) {
        let ejected = self.ejected.keys().copied().collect::<Vec<_>>();
        for basic in ejected {
            self.reinject_basic(basic);
        }
    }

    /// Deletes the row of `basic` for good; `basic` is neither basic nor non-basic afterwards.
    pub fn remove_row(&mut self, basic: ArithVar) -> Row {
        self.uninstall(basic)
    }

    /// Removes every row, ejected ones included.
    pub fn clear(&mut self) {
        self.rows.iter_mut().for_each(|row| *row = None);
        self.columns.iter_mut().for_each(BTreeSet::clear);
        self.ejected.clear();
        self.num_rows = 0;
        self.num_entries = 0;
    }

    /// Checks that rows only mention non-basic variables, hold no zeros, and agree with the
    /// column index and the counters.
    pub(crate) fn is_consistent(&self) -> bool {
        let mut num_rows = 0;
        let mut num_entries = 0;

        for basic in self.basic_variables() {
            let row = self.row(basic);
            num_rows += 1;
            num_entries += row.len();

            let row_is_consistent = row.iter().all(|(variable, coefficient)| {
                !coefficient.is_zero()
                    && !self.is_basic(variable)
                    && self.columns[variable].contains(&basic)
            });
            if !row_is_consistent {
                return false;
            }
        }

        let columns_are_consistent = self.columns.keys().all(|variable| {
            self.columns[variable]
                .iter()
                .all(|&basic| self.is_basic(basic) && self.row(basic).contains(variable))
        });

        columns_are_consistent && num_rows == self.num_rows && num_entries == self.num_entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::rational;

    fn var(id: u32) -> ArithVar {
        ArithVar::new(id)
    }

    fn rows_of(tableau: &Tableau) -> Vec<(ArithVar, Row)> {
        tableau
            .basic_variables()
            .map(|basic| (basic, tableau.row(basic).clone()))
            .collect()
    }

    /// s = x + 2y, t = x - y
    fn example() -> Tableau {
        let mut tableau = Tableau::default();
        tableau.add_row(var(2), &[rational(1), rational(2)], &[var(0), var(1)]);
        tableau.add_row(var(3), &[rational(1), rational(-1)], &[var(0), var(1)]);
        tableau
    }

    #[test]
    fn add_row_substitutes_basic_variables() {
        let mut tableau = example();
        // u = s + x = 2x + 2y
        tableau.add_row(var(4), &[rational(1), rational(1)], &[var(2), var(0)]);

        assert_eq!(Some(&rational(2)), tableau.coefficient(var(4), var(0)));
        assert_eq!(Some(&rational(2)), tableau.coefficient(var(4), var(1)));
        assert!(tableau.coefficient(var(4), var(2)).is_none());
        assert!(tableau.is_consistent());
    }

    #[test]
    fn pivot_solves_and_substitutes() {
        let mut tableau = example();
        tableau.pivot(var(2), var(0));

        // x = s - 2y
        assert!(tableau.is_basic(var(0)));
        assert!(!tableau.is_basic(var(2)));
        assert_eq!(Some(&rational(1)), tableau.coefficient(var(0), var(2)));
        assert_eq!(Some(&rational(-2)), tableau.coefficient(var(0), var(1)));
        // t = s - 3y
        assert_eq!(Some(&rational(1)), tableau.coefficient(var(3), var(2)));
        assert_eq!(Some(&rational(-3)), tableau.coefficient(var(3), var(1)));
        assert!(tableau.is_consistent());
    }

    #[test]
    fn pivoting_back_restores_the_tableau() {
        let mut tableau = example();
        let before = rows_of(&tableau);

        tableau.pivot(var(3), var(1));
        tableau.pivot(var(1), var(3));

        assert_eq!(before, rows_of(&tableau));
    }

    #[test]
    fn pivot_preserves_solutions() {
        let mut tableau = example();
        let x = rational(3);
        let y = rational(-5);
        let s = &x + rational(2) * &y;
        let t = &x - &y;

        tableau.pivot(var(2), var(1));

        // y and t are now expressed in x and s.
        let value_of = |variable: ArithVar| match variable.id() {
            0 => x.clone(),
            2 => s.clone(),
            _ => unreachable!(),
        };
        let evaluate = |basic: ArithVar| {
            tableau
                .row(basic)
                .iter()
                .map(|(variable, coefficient)| coefficient * value_of(variable))
                .fold(rational(0), |sum, term| sum + term)
        };
        assert_eq!(y, evaluate(var(1)));
        assert_eq!(t, evaluate(var(3)));
    }

    #[test]
    fn reinjected_rows_are_rewritten_over_the_current_basis() {
        let mut tableau = example();
        tableau.eject_basic(var(2));
        assert!(!tableau.is_basic(var(2)));
        assert!(tableau.is_ejected(var(2)));

        // y = x - t
        tableau.pivot(var(3), var(1));
        tableau.reinject_all();

        // s = x + 2(x - t) = 3x - 2t
        assert!(tableau.is_basic(var(2)));
        assert_eq!(Some(&rational(3)), tableau.coefficient(var(2), var(0)));
        assert_eq!(Some(&rational(-2)), tableau.coefficient(var(2), var(3)));
        assert!(tableau.is_consistent());
    }

    #[test]
    fn shortest_row_and_density() {
        let mut tableau = example();
        tableau.add_row(var(4), &[rational(1)], &[var(1)]);

        assert_eq!(Some(var(4)), tableau.shortest_row_containing(var(1)));
        assert_eq!(Some(var(2)), tableau.shortest_row_containing(var(0)));
        // 5 entries over 3 rows of 5 variables.
        assert!((tableau.density() - 5.0 / 15.0).abs() < 1e-9);

        let removed = tableau.remove_row(var(4));
        assert_eq!(1, removed.len());
        assert_eq!(2, tableau.num_rows());

        tableau.clear();
        assert_eq!(0, tableau.num_rows());
        assert_eq!(0.0, tableau.density());
    }
}
