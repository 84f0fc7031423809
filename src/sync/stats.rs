//! Counters for the sync subsystem.
//!
//! Backend failures never reach the user; these counters are how tests and
//! diagnostics tell "backend not ready" apart from "nothing happened".

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use ts_rs::TS;

use crate::error::PointerPadError;

#[derive(Debug, Default)]
pub struct SyncStats {
    poll_cycles: AtomicU64,
    positions_applied: AtomicU64,
    moves_dispatched: AtomicU64,
    backend_unavailable: AtomicU64,
    backend_errors: AtomicU64,
    decode_failures: AtomicU64,
    discarded_responses: AtomicU64,
    stale_responses: AtomicU64,
    skipped_frames: AtomicU64,
    ignored_keys: AtomicU64,
}

/// Point-in-time copy of `SyncStats`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../types/generated/")]
pub struct StatsSnapshot {
    /// Completed `get_cursor` cycles, successful or not.
    pub poll_cycles: u64,
    /// Backend answers written to the cursor state.
    pub positions_applied: u64,
    /// `move_cursor` calls issued.
    pub moves_dispatched: u64,
    pub backend_unavailable: u64,
    pub backend_errors: u64,
    pub decode_failures: u64,
    /// Answers that arrived after teardown.
    pub discarded_responses: u64,
    /// Poll answers older than one already applied.
    pub stale_responses: u64,
    /// Frames dropped because too many polls were in flight.
    pub skipped_frames: u64,
    /// Key presses with no binding.
    pub ignored_keys: u64,
}

impl StatsSnapshot {
    /// Total backend failures swallowed so far.
    pub fn swallowed_errors(&self) -> u64 {
        self.backend_unavailable + self.backend_errors + self.decode_failures
    }
}

impl SyncStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_poll_cycle(&self) {
        self.poll_cycles.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_applied(&self) {
        self.positions_applied.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_move(&self) {
        self.moves_dispatched.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_discarded(&self) {
        self.discarded_responses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_stale(&self) {
        self.stale_responses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_skipped_frame(&self) {
        self.skipped_frames.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_ignored_key(&self) {
        self.ignored_keys.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a swallowed error under its kind.
    pub(crate) fn record_failure(&self, err: &PointerPadError) {
        let counter = match err {
            PointerPadError::BackendUnavailable(_) => &self.backend_unavailable,
            PointerPadError::DecodeFailure(_) => &self.decode_failures,
            // Anything else coming out of a backend call is an error response
            _ => &self.backend_errors,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            poll_cycles: self.poll_cycles.load(Ordering::Relaxed),
            positions_applied: self.positions_applied.load(Ordering::Relaxed),
            moves_dispatched: self.moves_dispatched.load(Ordering::Relaxed),
            backend_unavailable: self.backend_unavailable.load(Ordering::Relaxed),
            backend_errors: self.backend_errors.load(Ordering::Relaxed),
            decode_failures: self.decode_failures.load(Ordering::Relaxed),
            discarded_responses: self.discarded_responses.load(Ordering::Relaxed),
            stale_responses: self.stale_responses.load(Ordering::Relaxed),
            skipped_frames: self.skipped_frames.load(Ordering::Relaxed),
            ignored_keys: self.ignored_keys.load(Ordering::Relaxed),
        }
    }
}
