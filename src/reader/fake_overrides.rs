//! Fake-override deferral
//!
//! When a session is not decoding fake overrides eagerly, public overriding
//! members are omitted from a class's decoded member list and rebuilt by a
//! global pass once every module is loaded and the full inheritance graph
//! exists. This module holds the queue of classes waiting for that pass;
//! the skip decision itself lives with the declaration decoder, which can
//! peek at member records.

use rustc_hash::FxHashSet;
use tracing::debug;

use crate::symbols::SymbolId;

/// Classes whose fake overrides must be reconstructed globally.
///
/// Deduplicated: a class is queued at most once per session.
#[derive(Debug, Default)]
pub struct FakeOverrideQueue {
    classes: Vec<SymbolId>,
    seen: FxHashSet<SymbolId>,
}

impl FakeOverrideQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a class for reconstruction. Returns false if it was already
    /// queued.
    pub fn enqueue(&mut self, class: SymbolId) -> bool {
        if !self.seen.insert(class) {
            return false;
        }
        debug!(class = class.as_u32(), "queued class for fake-override reconstruction");
        self.classes.push(class);
        true
    }

    /// Classes in enqueue order
    pub fn classes(&self) -> &[SymbolId] {
        &self.classes
    }

    /// Hand the queue to the global reconstruction pass
    pub fn into_classes(self) -> Vec<SymbolId> {
        self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enqueue_deduplicates() {
        let mut queue = FakeOverrideQueue::new();
        assert!(queue.enqueue(SymbolId(1)));
        assert!(queue.enqueue(SymbolId(2)));
        assert!(!queue.enqueue(SymbolId(1)));
        assert_eq!(queue.classes(), &[SymbolId(1), SymbolId(2)]);
        assert_eq!(queue.len(), 2);
    }
}
