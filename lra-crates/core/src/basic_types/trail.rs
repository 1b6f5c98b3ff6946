use std::iter::Rev;
use std::ops::Deref;
use std::vec::Drain;

use crate::lra_assert_simple;

/// An append-only log which remembers where every backtracking scope starts.
///
/// Entering a scope remembers the current length; leaving it truncates back to that length and
/// hands the removed entries to the caller (newest first) so that their side effects can be
/// undone. Every piece of context-dependent state in the engine (proof log, flag changes,
/// bounds, asserted facts) is built on top of this.
#[derive(Clone, Debug)]
pub(crate) struct Trail<T> {
    current_level: usize,
    /// At index i is the length of the trail when scope i + 1 was entered.
    scope_starts: Vec<usize>,
    entries: Vec<T>,
}

// Implemented by hand to avoid imposing `Default` on `T`.
impl<T> Default for Trail<T> {
    fn default() -> Self {
        Trail {
            current_level: 0,
            scope_starts: Vec::new(),
            entries: Vec::new(),
        }
    }
}

impl<T> Trail<T> {
    pub(crate) fn new_checkpoint(&mut self) {
        self.current_level += 1;
        self.scope_starts.push(self.entries.len());
    }

    /// Drop every entry pushed after `new_level` was entered. The removed entries are yielded
    /// newest first.
    pub(crate) fn synchronise(&mut self, new_level: usize) -> Rev<Drain<'_, T>> {
        lra_assert_simple!(new_level <= self.current_level);

        let new_len = if new_level == self.current_level {
            self.entries.len()
        } else {
            self.scope_starts[new_level]
        };

        self.current_level = new_level;
        self.scope_starts.truncate(new_level);
        self.entries.drain(new_len..).rev()
    }

    pub(crate) fn push(&mut self, elem: T) {
        self.entries.push(elem)
    }
}

impl<T> Deref for Trail<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.entries
    }
}
