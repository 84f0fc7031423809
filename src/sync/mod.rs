//! Cursor position sync subsystem.
//!
//! Two producers keep one `CursorState` in line with the backend:
//!
//! - `poller`: polls `get_cursor` once per display frame
//! - `input`: maps bound keys to `move_cursor` calls (optional, see
//!   `SyncConfig::enable_local_input_dispatch`)
//!
//! `start` wires both up and returns a `SyncHandle`. Dropping the handle (or
//! calling `teardown`) stops the loop and detaches the listener; answers that
//! arrive afterwards are discarded.

pub mod frame;
pub mod input;
pub mod lifecycle;
pub mod poller;
pub mod reconcile;
pub mod stats;


use std::sync::Arc;

use tokio::runtime::Handle;
use tokio_util::task::TaskTracker;

use crate::backend::{CursorBackend, SharedBackend};
use crate::config::SyncConfig;
use crate::cursor::{CursorPosition, CursorState};
use crate::error::{PointerPadError, PointerPadResult};

pub use frame::{frame_channel, ChannelClock, FrameClock, FrameTick, FrameTrigger, RefreshClock};
pub use input::{Direction, InputCommandDispatcher, InputListener, KeyEvent, Propagation};
pub use lifecycle::{Lifecycle, LifecycleHandle, ListenerHandle, LoopHandle};
pub use poller::{PositionPoller, MAX_POLLS_IN_FLIGHT};
pub use reconcile::CycleOutcome;
pub use stats::{StatsSnapshot, SyncStats};

/// Running sync subsystem.
pub struct SyncHandle {
    state: CursorState,
    stats: Arc<SyncStats>,
    poll_loop: LoopHandle,
    input: Option<(InputListener, ListenerHandle)>,
    tracker: TaskTracker,
}

/// Start the poll loop on `clock` and, if enabled, the key listener.
///
/// Must be called from within a Tokio runtime; the runtime is captured so
/// key events may later be delivered from any thread.
pub fn start<B, C>(config: &SyncConfig, backend: B, clock: C) -> PointerPadResult<SyncHandle>
where
    B: CursorBackend,
    C: FrameClock,
{
    let mut config = config.clone();
    config.validate()?;

    let runtime = Handle::try_current()
        .map_err(|e| PointerPadError::RuntimeUnavailable(e.to_string()))?;

    let backend: SharedBackend = Arc::new(backend);
    let state = CursorState::new();
    let stats = Arc::new(SyncStats::new());
    let tracker = TaskTracker::new();

    let poll_loop = PositionPoller::new(Arc::clone(&backend), state.clone(), Arc::clone(&stats))
        .start(clock, &tracker, &runtime);

    let input = config.enable_local_input_dispatch.then(|| {
        InputListener::attach(
            backend,
            state.clone(),
            Arc::clone(&stats),
            &config,
            tracker.clone(),
            runtime,
        )
    });

    log::info!(
        "[SYNC] Started (local input dispatch: {}, backend global capture: {}, step: {})",
        config.enable_local_input_dispatch,
        config.backend_global_capture,
        config.step
    );

    Ok(SyncHandle {
        state,
        stats,
        poll_loop,
        input,
        tracker,
    })
}

/// `start` with a `RefreshClock` at `config.refresh_rate_hz`.
pub fn start_with_refresh_clock<B>(config: &SyncConfig, backend: B) -> PointerPadResult<SyncHandle>
where
    B: CursorBackend,
{
    start(config, backend, RefreshClock::new(config.refresh_rate_hz))
}

impl SyncHandle {
    /// The shared cell, for the view layer to read or subscribe to.
    pub fn state(&self) -> &CursorState {
        &self.state
    }

    pub fn position(&self) -> CursorPosition {
        self.state.get()
    }

    /// The key listener, `None` when local input dispatch is disabled.
    pub fn input(&self) -> Option<&InputListener> {
        self.input.as_ref().map(|(listener, _)| listener)
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    pub fn poll_loop_state(&self) -> Lifecycle {
        self.poll_loop.state()
    }

    pub fn listener_state(&self) -> Option<Lifecycle> {
        self.input.as_ref().map(|(_, handle)| handle.state())
    }

    /// Stop the poll loop and detach the listener. Safe to call repeatedly.
    ///
    /// Once this returns no further write reaches the cursor state, from any
    /// thread.
    pub fn teardown(&self) {
        let stopped = self.poll_loop.stop();
        if let Some((_, handle)) = &self.input {
            handle.stop();
        }
        self.state.barrier();
        if stopped {
            log::info!("[SYNC] Torn down: {:?}", self.stats.snapshot());
        }
    }

    /// Tear down and wait until every spawned cycle and move has finished.
    pub async fn shutdown(self) {
        self.teardown();
        self.tracker.close();
        self.tracker.wait().await;
    }
}

impl Drop for SyncHandle {
    fn drop(&mut self) {
        self.teardown();
    }
}
