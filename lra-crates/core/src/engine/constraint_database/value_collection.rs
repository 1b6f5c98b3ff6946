use enum_map::EnumMap;

use super::ConstraintId;
use super::ConstraintType;

/// The (at most four) constraints on one variable which share a value, one per
/// [`ConstraintType`].
#[derive(Clone, Debug, Default)]
pub(crate) struct ValueCollection {
    slots: EnumMap<ConstraintType, Option<ConstraintId>>,
}

impl ValueCollection {
    pub(crate) fn get(&self, constraint_type: ConstraintType) -> Option<ConstraintId> {
        self.slots[constraint_type]
    }

    pub(crate) fn set(&mut self, constraint_type: ConstraintType, constraint: ConstraintId) {
        crate::lra_assert_simple!(self.slots[constraint_type].is_none());
        self.slots[constraint_type] = Some(constraint);
    }

    pub(crate) fn remove(&mut self, constraint_type: ConstraintType) {
        self.slots[constraint_type] = None;
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.slots.values().all(Option::is_none)
    }

    /// The constraints in this collection, in the declaration order of [`ConstraintType`].
    pub(crate) fn iter(&self) -> impl Iterator<Item = ConstraintId> + '_ {
        self.slots.values().flatten().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::StorageKey;

    #[test]
    fn collection_is_empty_after_removing_every_slot() {
        let mut collection = ValueCollection::default();
        collection.set(ConstraintType::Equality, ConstraintId::create_from_index(0));
        collection.set(ConstraintType::Disequality, ConstraintId::create_from_index(1));
        assert_eq!(2, collection.iter().count());

        collection.remove(ConstraintType::Equality);
        assert!(!collection.is_empty());
        collection.remove(ConstraintType::Disequality);
        assert!(collection.is_empty());
    }
}
