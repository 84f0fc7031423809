//! Position poll loop.
//!
//! Asks the backend for the cursor position once per display frame and
//! republishes the answer. The backend is usually not up yet while the app
//! starts, so every failure is skipped silently and the loop carries on.
//!
//! Each cycle runs as its own task: a `get_cursor` call that never resolves
//! stalls only that cycle, and the next frame polls again. Cycles are
//! numbered in frame order and an answer older than the last applied one is
//! dropped, so overlapping polls never move the cursor backwards in time.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use super::frame::FrameClock;
use super::lifecycle::LoopHandle;
use super::reconcile::{reconcile, AnswerOrder, CycleOutcome, Ticket};
use super::stats::SyncStats;
use crate::backend::SharedBackend;
use crate::cursor::CursorState;

/// Upper bound on outstanding `get_cursor` calls.
pub const MAX_POLLS_IN_FLIGHT: usize = 4;

const SOURCE: &str = "POLLER";

pub struct PositionPoller {
    backend: SharedBackend,
    state: CursorState,
    stats: Arc<SyncStats>,
    next_seq: AtomicU64,
    order: AnswerOrder,
}

impl PositionPoller {
    pub fn new(backend: SharedBackend, state: CursorState, stats: Arc<SyncStats>) -> Self {
        Self {
            backend,
            state,
            stats,
            next_seq: AtomicU64::new(1),
            order: AnswerOrder::default(),
        }
    }

    /// Spawn the loop on `runtime`, one cycle per frame of `clock`.
    pub(crate) fn start<C: FrameClock>(
        self,
        clock: C,
        tracker: &TaskTracker,
        runtime: &Handle,
    ) -> LoopHandle {
        let handle = LoopHandle::new("poll loop");
        let live = handle.token();
        tracker.spawn_on(self.run(clock, live, tracker.clone()), runtime);
        handle.activate();
        handle
    }

    async fn run<C: FrameClock>(self, mut clock: C, live: CancellationToken, tracker: TaskTracker) {
        let poller = Arc::new(self);
        let in_flight = Arc::new(AtomicUsize::new(0));
        log::debug!("[POLLER] Poll loop started");

        loop {
            let tick = tokio::select! {
                biased;
                _ = live.cancelled() => break,
                tick = clock.next_frame() => tick,
            };

            let Some(tick) = tick else {
                log::debug!("[POLLER] Frame source closed");
                break;
            };

            if live.is_cancelled() {
                break;
            }

            if in_flight.load(Ordering::SeqCst) >= MAX_POLLS_IN_FLIGHT {
                poller.stats.record_skipped_frame();
                log::trace!("[POLLER] Frame {} skipped, backend busy", tick.index);
                continue;
            }

            in_flight.fetch_add(1, Ordering::SeqCst);
            let seq = poller.next_sequence();
            let cycle = Arc::clone(&poller);
            let cycle_live = live.clone();
            let cycle_in_flight = Arc::clone(&in_flight);
            tracker.spawn(async move {
                cycle.poll_cycle(seq, &cycle_live).await;
                cycle_in_flight.fetch_sub(1, Ordering::SeqCst);
            });
        }

        log::debug!("[POLLER] Poll loop stopped");
    }

    fn next_sequence(&self) -> u64 {
        self.next_seq.fetch_add(1, Ordering::SeqCst)
    }

    /// One poll cycle numbered after every cycle started so far.
    pub(crate) async fn poll_once(&self, live: &CancellationToken) -> CycleOutcome {
        self.poll_cycle(self.next_sequence(), live).await
    }

    /// Poll cycle `seq`: `get_cursor` plus handling of the answer.
    async fn poll_cycle(&self, seq: u64, live: &CancellationToken) -> CycleOutcome {
        // A cycle spawned just before teardown must not reach the backend
        if live.is_cancelled() {
            self.stats.record_discarded();
            return CycleOutcome::Discarded;
        }

        let result = self.backend.get_cursor().await;
        let ticket = Ticket {
            order: &self.order,
            seq,
        };
        let outcome = reconcile(result, live, &self.state, &self.stats, SOURCE, Some(ticket));
        if outcome != CycleOutcome::Discarded {
            self.stats.record_poll_cycle();
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock::ScriptedBackend;
    use crate::cursor::CursorPosition;
    use crate::error::PointerPadError;
    use serde_json::json;

    fn poller(backend: &Arc<ScriptedBackend>) -> (PositionPoller, CursorState, Arc<SyncStats>) {
        let state = CursorState::new();
        let stats = Arc::new(SyncStats::new());
        let backend: SharedBackend = backend.clone();
        (
            PositionPoller::new(backend, state.clone(), Arc::clone(&stats)),
            state,
            stats,
        )
    }

    #[tokio::test]
    async fn test_poll_once_applies_position() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_get(Ok(json!([10, 20])));
        let (poller, state, stats) = poller(&backend);

        let outcome = poller.poll_once(&CancellationToken::new()).await;

        assert_eq!(outcome, CycleOutcome::Applied(CursorPosition::new(10, 20)));
        assert_eq!(state.get(), CursorPosition::new(10, 20));
        assert_eq!(stats.snapshot().poll_cycles, 1);
    }

    #[tokio::test]
    async fn test_poll_once_swallows_backend_error() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_get(Err(PointerPadError::BackendError("boom".into())));
        let (poller, state, stats) = poller(&backend);

        let outcome = poller.poll_once(&CancellationToken::new()).await;

        assert_eq!(outcome, CycleOutcome::Skipped);
        assert_eq!(state.get(), CursorPosition::ORIGIN);
        assert_eq!(stats.snapshot().backend_errors, 1);
        assert_eq!(stats.snapshot().poll_cycles, 1);
    }

    #[tokio::test]
    async fn test_late_poll_answer_does_not_roll_back() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_get(Ok(json!([7, 8])));
        backend.push_get(Ok(json!([1, 1])));
        let (poller, state, stats) = poller(&backend);
        let live = CancellationToken::new();

        // Cycle 2 answers first, cycle 1 lands afterwards
        let newer = poller.poll_cycle(2, &live).await;
        let older = poller.poll_cycle(1, &live).await;

        assert_eq!(newer, CycleOutcome::Applied(CursorPosition::new(7, 8)));
        assert_eq!(older, CycleOutcome::Stale);
        assert_eq!(state.get(), CursorPosition::new(7, 8));
        assert_eq!(stats.snapshot().stale_responses, 1);
        assert_eq!(stats.snapshot().poll_cycles, 2);
    }

    #[tokio::test]
    async fn test_poll_once_numbers_cycles_in_call_order() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_get(Ok(json!([1, 1])));
        backend.push_get(Ok(json!([2, 2])));
        let (poller, state, _stats) = poller(&backend);
        let live = CancellationToken::new();

        poller.poll_once(&live).await;
        let outcome = poller.poll_once(&live).await;

        assert_eq!(outcome, CycleOutcome::Applied(CursorPosition::new(2, 2)));
        assert_eq!(state.get(), CursorPosition::new(2, 2));
    }

    #[tokio::test]
    async fn test_poll_once_after_cancel_skips_backend() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_get(Ok(json!([10, 20])));
        let (poller, state, _stats) = poller(&backend);
        let live = CancellationToken::new();
        live.cancel();

        assert_eq!(poller.poll_once(&live).await, CycleOutcome::Discarded);
        assert_eq!(backend.get_calls(), 0);
        assert_eq!(state.get(), CursorPosition::ORIGIN);
    }
}
