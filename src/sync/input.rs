//! Directional input dispatch.
//!
//! Turns bound key presses into `move_cursor` calls and writes the
//! backend's post-move position (which may be clamped at a screen edge) back
//! into the cursor state.
//!
//! Key handling is split the way a UI event handler is: the decision to
//! consume the key is synchronous, the backend call runs afterwards as a
//! tracked task.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use ts_rs::TS;

use super::lifecycle::ListenerHandle;
use super::reconcile::reconcile;
use super::stats::SyncStats;
use crate::backend::{MoveDelta, SharedBackend};
use crate::config::SyncConfig;
use crate::cursor::CursorState;
use crate::error::{PointerPadError, PointerPadResult};

const SOURCE: &str = "INPUT";

/// Logical movement direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "../types/generated/")]
pub enum Direction {
    Left,
    Down,
    Up,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Down,
        Direction::Up,
        Direction::Right,
    ];

    /// Screen-space delta for one step. Y grows downwards.
    pub fn delta(self, step: i32) -> MoveDelta {
        match self {
            Direction::Left => MoveDelta::new(step.saturating_neg(), 0),
            Direction::Down => MoveDelta::new(0, step),
            Direction::Up => MoveDelta::new(0, step.saturating_neg()),
            Direction::Right => MoveDelta::new(step, 0),
        }
    }
}

/// A key-down event coming from the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    key: String,
    default_prevented: bool,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            default_prevented: false,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Ask the host not to run its default action for this key.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Whether the listener consumed a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Propagation {
    Handled,
    PassThrough,
}

/// Key name → delta table derived from a config.
#[derive(Debug)]
struct KeyMap {
    bindings: HashMap<String, Direction>,
    step: i32,
}

impl KeyMap {
    fn from_config(config: &SyncConfig) -> Self {
        Self {
            bindings: config
                .key_bindings
                .iter()
                .map(|(key, direction)| (key.to_lowercase(), *direction))
                .collect(),
            step: config.step,
        }
    }

    fn resolve(&self, key: &str) -> Option<MoveDelta> {
        self.bindings
            .get(&key.to_lowercase())
            .map(|direction| direction.delta(self.step))
    }
}

pub struct InputCommandDispatcher {
    backend: SharedBackend,
    state: CursorState,
    stats: Arc<SyncStats>,
    keymap: RwLock<KeyMap>,
    live: CancellationToken,
    tracker: TaskTracker,
    runtime: Handle,
}

impl InputCommandDispatcher {
    /// Handle a key-down event.
    ///
    /// Bound keys get their default action suppressed and a `move_cursor`
    /// call issued in the background. Unbound keys, and every key after
    /// teardown, pass through untouched.
    pub fn on_key_down(&self, event: &mut KeyEvent) -> Propagation {
        if self.live.is_cancelled() {
            return Propagation::PassThrough;
        }

        let Some(delta) = self.keymap.read().resolve(event.key()) else {
            self.stats.record_ignored_key();
            return Propagation::PassThrough;
        };

        event.prevent_default();
        self.dispatch(delta);
        Propagation::Handled
    }

    fn dispatch(&self, delta: MoveDelta) {
        let backend = Arc::clone(&self.backend);
        let state = self.state.clone();
        let stats = Arc::clone(&self.stats);
        let live = self.live.clone();

        self.tracker.spawn_on(
            async move {
                if live.is_cancelled() {
                    stats.record_discarded();
                    return;
                }
                stats.record_move();
                log::trace!("[INPUT] move_cursor({}, {})", delta.dx, delta.dy);
                let result = backend.move_cursor(delta).await;
                reconcile(result, &live, &state, &stats, SOURCE, None);
            },
            &self.runtime,
        );
    }

    /// Swap key bindings and step size.
    ///
    /// The config is validated first; a rejected config leaves the current
    /// bindings in place. Backend global capture cannot be switched on while
    /// this listener is attached.
    pub fn apply_config(&self, config: &SyncConfig) -> PointerPadResult<()> {
        let mut config = config.clone();
        config.validate()?;
        if config.backend_global_capture && !self.live.is_cancelled() {
            return Err(PointerPadError::ConfigError(
                "backend global capture cannot be enabled while the local key listener is attached"
                    .to_string(),
            ));
        }

        let keymap = KeyMap::from_config(&config);
        log::debug!(
            "[INPUT] Key bindings updated: {} keys, step {}",
            keymap.bindings.len(),
            keymap.step
        );
        *self.keymap.write() = keymap;
        Ok(())
    }
}

/// Host-facing side of the registered key listener.
#[derive(Clone)]
pub struct InputListener {
    dispatcher: Arc<InputCommandDispatcher>,
}

impl InputListener {
    /// Register a listener; it stays attached until the returned handle stops.
    pub(crate) fn attach(
        backend: SharedBackend,
        state: CursorState,
        stats: Arc<SyncStats>,
        config: &SyncConfig,
        tracker: TaskTracker,
        runtime: Handle,
    ) -> (Self, ListenerHandle) {
        let handle = ListenerHandle::new("input listener");
        let dispatcher = InputCommandDispatcher {
            backend,
            state,
            stats,
            keymap: RwLock::new(KeyMap::from_config(config)),
            live: handle.token(),
            tracker,
            runtime,
        };
        handle.activate();
        log::debug!("[INPUT] Listener attached");

        (
            Self {
                dispatcher: Arc::new(dispatcher),
            },
            handle,
        )
    }

    pub fn on_key_down(&self, event: &mut KeyEvent) -> Propagation {
        self.dispatcher.on_key_down(event)
    }

    pub fn apply_config(&self, config: &SyncConfig) -> PointerPadResult<()> {
        self.dispatcher.apply_config(config)
    }

    /// False once the subsystem has been torn down.
    pub fn is_attached(&self) -> bool {
        !self.dispatcher.live.is_cancelled()
    }
}
