use log::debug;

use super::Kind;
use super::Term;
use crate::containers::HashMap;

/// Decides whether a boolean formula is valid.
///
/// Static learning only emits a lemma when the oracle confirms a side condition, so an oracle
/// that answers `false` whenever it is unsure is always sound.
pub trait ValidityOracle {
    fn is_valid(&mut self, formula: &Term) -> bool;
}

/// A [`ValidityOracle`] which abstracts every non-connective subterm into a propositional atom
/// and enumerates all truth assignments.
///
/// A formula that is valid after abstraction is valid; the converse does not hold, which only
/// costs completeness.
#[derive(Debug, Clone, Copy)]
pub struct TruthTableOracle {
    /// Formulas with more atoms than this are reported as not valid without enumeration. The
    /// enumeration never goes beyond 63 atoms, whatever this limit says.
    pub max_atoms: usize,
}

/// Assignments are enumerated as the bits of a `u64`.
const MAX_ENUMERABLE_ATOMS: usize = u64::BITS as usize - 1;

impl Default for TruthTableOracle {
    fn default() -> Self {
        TruthTableOracle { max_atoms: 16 }
    }
}

impl ValidityOracle for TruthTableOracle {
    fn is_valid(&mut self, formula: &Term) -> bool {
        let mut atoms: HashMap<Term, usize> = HashMap::default();
        collect_atoms(formula, &mut atoms);

        if atoms.len() > self.max_atoms.min(MAX_ENUMERABLE_ATOMS) {
            debug!(
                "Giving up on validity of a formula with {} atoms",
                atoms.len()
            );
            return false;
        }

        (0..1u64 << atoms.len()).all(|assignment| evaluate(formula, &atoms, assignment))
    }
}

fn collect_atoms(formula: &Term, atoms: &mut HashMap<Term, usize>) {
    match formula.kind() {
        Kind::Boolean(_) => {}
        Kind::Not | Kind::And | Kind::Or | Kind::Implies => formula
            .children()
            .iter()
            .for_each(|child| collect_atoms(child, atoms)),
        _ => {
            let next = atoms.len();
            let _ = atoms.entry(formula.clone()).or_insert(next);
        }
    }
}

fn evaluate(formula: &Term, atoms: &HashMap<Term, usize>, assignment: u64) -> bool {
    match formula.kind() {
        Kind::Boolean(value) => *value,
        Kind::Not => !evaluate(formula.child(0), atoms, assignment),
        Kind::And => formula
            .children()
            .iter()
            .all(|child| evaluate(child, atoms, assignment)),
        Kind::Or => formula
            .children()
            .iter()
            .any(|child| evaluate(child, atoms, assignment)),
        Kind::Implies => {
            !evaluate(formula.child(0), atoms, assignment)
                || evaluate(formula.child(1), atoms, assignment)
        }
        _ => (assignment >> atoms[formula]) & 1 == 1,
    }
}
