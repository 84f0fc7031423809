//! Applying backend answers to the cursor state.
//!
//! Shared by the poll loop and the input dispatcher. The two are independent
//! producers into one cell: between them, whichever answer is applied last
//! wins. Poll answers are additionally ordered among themselves, so a slow
//! poll never rolls the cell back past a newer one.

use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value;
use tokio_util::sync::CancellationToken;

use super::stats::SyncStats;
use crate::cursor::{decode_position, CursorPosition, CursorState};
use crate::error::PointerPadResult;

/// What happened to one backend answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The answer decoded and was written to the state.
    Applied(CursorPosition),
    /// The call failed or the answer did not decode; state untouched.
    Skipped,
    /// A newer answer from the same producer was already applied.
    Stale,
    /// The owner was torn down before the answer could be used.
    Discarded,
}

/// Newest sequence number applied by one producer.
#[derive(Debug, Default)]
pub(crate) struct AnswerOrder {
    newest_applied: AtomicU64,
}

impl AnswerOrder {
    /// Record `seq` as applied unless something newer already was.
    fn claim(&self, seq: u64) -> bool {
        self.newest_applied.fetch_max(seq, Ordering::SeqCst) < seq
    }
}

/// Position of one answer in its producer's call order. Sequences start at 1.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Ticket<'a> {
    pub order: &'a AnswerOrder,
    pub seq: u64,
}

/// Write a backend answer into `state` unless `live` has been cancelled or
/// `ticket` shows the answer is outdated.
///
/// Failures are swallowed: counted in `stats` and logged at trace level.
pub(crate) fn reconcile(
    result: PointerPadResult<Value>,
    live: &CancellationToken,
    state: &CursorState,
    stats: &SyncStats,
    source: &str,
    ticket: Option<Ticket<'_>>,
) -> CycleOutcome {
    if live.is_cancelled() {
        return discard(stats, source);
    }

    let position = match result.and_then(|value| decode_position(&value)) {
        Ok(position) => position,
        Err(e) => {
            stats.record_failure(&e);
            log::trace!("[{}] Ignoring backend failure: {}", source, e);
            return CycleOutcome::Skipped;
        },
    };

    // Both checks run under the state's write lock, so teardown and newer
    // answers cannot slip in between the check and the write
    let mut outcome = CycleOutcome::Applied(position);
    state.publish_if(position, || {
        if live.is_cancelled() {
            outcome = CycleOutcome::Discarded;
            return false;
        }
        if let Some(ticket) = ticket {
            if !ticket.order.claim(ticket.seq) {
                outcome = CycleOutcome::Stale;
                return false;
            }
        }
        true
    });

    match outcome {
        CycleOutcome::Applied(_) => stats.record_applied(),
        CycleOutcome::Stale => {
            stats.record_stale();
            log::trace!("[{}] Dropping outdated answer {}", source, position);
        },
        CycleOutcome::Discarded => return discard(stats, source),
        CycleOutcome::Skipped => {},
    }
    outcome
}

fn discard(stats: &SyncStats, source: &str) -> CycleOutcome {
    stats.record_discarded();
    log::trace!("[{}] Discarding answer received after teardown", source);
    CycleOutcome::Discarded
}
