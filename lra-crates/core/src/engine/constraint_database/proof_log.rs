use super::ConstraintId;
use crate::basic_types::Trail;
use crate::containers::StorageKey;

/// Identifies the run of antecedents in the [`ProofLog`] which justifies a constraint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ProofId {
    id: u32,
}

impl StorageKey for ProofId {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        ProofId { id: index as u32 }
    }
}

/// The backtrackable log of proofs.
///
/// A proof is a run of entries: a `None` marker followed by the antecedents. The [`ProofId`] of
/// a proof is the position of its last entry, so a proof without antecedents points at its own
/// marker; such a constraint explains itself. Reading a proof walks backward from its id until
/// the marker.
#[derive(Clone, Debug, Default)]
pub(crate) struct ProofLog {
    entries: Trail<Option<ConstraintId>>,
}

impl ProofLog {
    pub(crate) fn record(&mut self, antecedents: impl IntoIterator<Item = ConstraintId>) -> ProofId {
        self.entries.push(None);
        for antecedent in antecedents {
            self.entries.push(Some(antecedent));
        }
        ProofId::create_from_index(self.entries.len() - 1)
    }

    /// The antecedents of a proof, the most recently recorded first. Empty for a constraint which
    /// explains itself.
    pub(crate) fn antecedents(&self, proof: ProofId) -> impl Iterator<Item = ConstraintId> + '_ {
        self.entries[..=proof.index()]
            .iter()
            .rev()
            .map_while(|entry| *entry)
    }

    pub(crate) fn new_checkpoint(&mut self) {
        self.entries.new_checkpoint();
    }

    pub(crate) fn synchronise(&mut self, new_level: usize) {
        let _ = self.entries.synchronise(new_level);
    }
}
