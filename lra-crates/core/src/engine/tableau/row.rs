use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use num::Zero;

use crate::engine::ArithVar;
use crate::math::Rational;

/// The sparse right-hand side `Σ coefficient·variable` of a tableau row.
///
/// Entries are kept sorted by variable and never hold a zero coefficient.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Row {
    entries: BTreeMap<ArithVar, Rational>,
}

/// What [`Row::add`] did to the entry of a variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum EntryChange {
    Created,
    Updated,
    Cancelled,
    Unchanged,
}

impl Row {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn coefficient(&self, variable: ArithVar) -> Option<&Rational> {
        self.entries.get(&variable)
    }

    pub fn contains(&self, variable: ArithVar) -> bool {
        self.entries.contains_key(&variable)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ArithVar, &Rational)> + '_ {
        self.entries
            .iter()
            .map(|(variable, coefficient)| (*variable, coefficient))
    }

    pub fn variables(&self) -> impl Iterator<Item = ArithVar> + '_ {
        self.entries.keys().copied()
    }

    /// Adds `coefficient·variable` to the row.
    pub(crate) fn add(&mut self, variable: ArithVar, coefficient: Rational) -> EntryChange {
        if coefficient.is_zero() {
            return EntryChange::Unchanged;
        }

        match self.entries.entry(variable) {
            Entry::Vacant(entry) => {
                let _ = entry.insert(coefficient);
                EntryChange::Created
            }
            Entry::Occupied(mut entry) => {
                *entry.get_mut() += coefficient;
                if entry.get().is_zero() {
                    let _ = entry.remove();
                    EntryChange::Cancelled
                } else {
                    EntryChange::Updated
                }
            }
        }
    }

    pub(crate) fn remove(&mut self, variable: ArithVar) -> Option<Rational> {
        self.entries.remove(&variable)
    }

    pub(crate) fn scale(&mut self, factor: &Rational) {
        crate::lra_assert_simple!(!factor.is_zero());
        self.entries
            .values_mut()
            .for_each(|coefficient| *coefficient *= factor);
    }
}

impl FromIterator<(ArithVar, Rational)> for Row {
    fn from_iter<T: IntoIterator<Item = (ArithVar, Rational)>>(iter: T) -> Self {
        let mut row = Row::default();
        for (variable, coefficient) in iter {
            let _ = row.add(variable, coefficient);
        }
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::rational;

    #[test]
    fn adding_reports_how_the_entry_changed() {
        let x = ArithVar::new(0);
        let mut row = Row::default();

        assert_eq!(EntryChange::Created, row.add(x, rational(2)));
        assert_eq!(EntryChange::Updated, row.add(x, rational(1)));
        assert_eq!(EntryChange::Cancelled, row.add(x, rational(-3)));
        assert_eq!(EntryChange::Unchanged, row.add(x, rational(0)));
        assert!(row.is_empty());
    }

    #[test]
    fn collecting_merges_duplicates_and_drops_zeros() {
        let x = ArithVar::new(0);
        let y = ArithVar::new(1);
        let row = [(x, rational(1)), (y, rational(0)), (x, rational(4))]
            .into_iter()
            .collect::<Row>();

        assert_eq!(1, row.len());
        assert_eq!(Some(&rational(5)), row.coefficient(x));
        assert!(!row.contains(y));
    }
}
