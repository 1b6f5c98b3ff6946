use std::fmt::Display;
use std::fmt::Formatter;

use crate::containers::StorageKey;

/// A dense handle for a variable of the arithmetic theory.
///
/// Every leaf term the theory is told about and every slack variable it introduces for a
/// linear combination gets one. Handles are allocated in order and never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArithVar {
    id: u32,
}

impl ArithVar {
    pub fn new(id: u32) -> ArithVar {
        ArithVar { id }
    }

    pub fn id(&self) -> u32 {
        self.id
    }
}

impl StorageKey for ArithVar {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        ArithVar { id: index as u32 }
    }
}

impl Display for ArithVar {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{}", self.id)
    }
}
