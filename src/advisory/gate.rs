//! Settle-once bookkeeping for in-flight submissions.
//!
//! Each submission gets a fresh id. The remote path and the timeout
//! fallback both race to [`SubmissionGate::settle`] that id; exactly one
//! wins, and only the winner may append to the transcript.

use std::sync::Mutex;

#[derive(Debug, Default)]
struct GateState {
    next_id: u64,
    /// Highest id that has been settled.
    settled: Option<u64>,
}

/// Hands out submission ids and records which one settled.
#[derive(Debug, Default)]
pub struct SubmissionGate {
    state: Mutex<GateState>,
}

impl SubmissionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the id for a new submission. Ids only go up.
    pub fn begin(&self) -> u64 {
        let mut state = self.lock();
        state.next_id += 1;
        state.next_id
    }

    /// Claim the right to append for `id`.
    ///
    /// Returns `true` exactly once per id. Returns `false` for an id that is
    /// already settled, or one older than the last settled id.
    pub fn settle(&self, id: u64) -> bool {
        let mut state = self.lock();
        if state.settled.is_some_and(|s| s >= id) {
            return false;
        }
        state.settled = Some(id);
        true
    }

    /// Whether `id` has been settled (by either path).
    pub fn is_settled(&self, id: u64) -> bool {
        self.lock().settled.is_some_and(|s| s >= id)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, GateState> {
        // State stays consistent across a panic; recover the guard.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}
