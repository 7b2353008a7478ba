//! Event Sequencer - Monotonic counters for staleness detection.
//!
//! The single ordering mechanism between remote commits and local edits.
//! Local edits draw fresh counts from `next()`; accepted remote counts
//! advance the floor through `observe()` so a later local edit always
//! produces a count greater than anything the remote side has committed.
//!
//! There is no locking anywhere in this protocol. Both writers run on the
//! UI-affinity thread; the counter comparison at the point of application
//! fully orders their writes.

/// Compare an incoming counter against the last acknowledged one.
///
/// Returns true iff the incoming update is stale and must be dropped.
/// Ties are NOT stale: an update describing state the local side already
/// reached is still applied (re-application is idempotent).
#[inline]
pub fn is_stale(incoming: u64, last_acknowledged: u64) -> bool {
    incoming < last_acknowledged
}

/// A strictly increasing event counter.
///
/// Baseline is 0: the first `next()` returns 1. u64 gives headroom far
/// beyond the 2^53 range the protocol requires; no wraparound handling.
#[derive(Debug, Clone, Default)]
pub struct EventSequencer {
    last: u64,
}

impl EventSequencer {
    pub fn new() -> Self {
        Self { last: 0 }
    }

    /// The most recent count handed out or observed.
    pub fn last(&self) -> u64 {
        self.last
    }

    /// Produce the next count. Strictly greater than every count this
    /// sequencer has handed out or observed.
    pub fn next(&mut self) -> u64 {
        self.last += 1;
        self.last
    }

    /// Advance the floor to an externally supplied count (an accepted
    /// remote commit). Counts at or below the floor leave it unchanged.
    pub fn observe(&mut self, count: u64) {
        if count > self.last {
            self.last = count;
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
