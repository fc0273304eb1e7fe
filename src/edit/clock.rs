//! Shared latest-revision counter for staleness checks.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Latest document revision, shared between the editor and background work.
///
/// Cloning is cheap; all clones observe the same counter. The value never
/// decreases.
#[derive(Debug, Clone, Default)]
pub struct RevisionClock(Arc<AtomicU64>);

impl RevisionClock {
    /// Create a clock starting at `revision`.
    pub fn new(revision: u64) -> Self {
        Self(Arc::new(AtomicU64::new(revision)))
    }

    /// Latest published revision.
    pub fn latest(&self) -> u64 {
        self.0.load(Ordering::Acquire)
    }

    /// Publish a revision. Older values are ignored.
    pub fn publish(&self, revision: u64) {
        self.0.fetch_max(revision, Ordering::AcqRel);
    }

    /// Check if work started for `revision` has been overtaken.
    pub fn is_superseded(&self, revision: u64) -> bool {
        self.latest() > revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_is_monotonic_and_shared() {
        let clock = RevisionClock::new(3);
        let observer = clock.clone();

        clock.publish(5);
        clock.publish(4);
        assert_eq!(observer.latest(), 5);
        assert!(observer.is_superseded(4));
        assert!(!observer.is_superseded(5));
    }
}
