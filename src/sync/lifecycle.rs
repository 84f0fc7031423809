//! Lifecycle of the poll loop and the input listener.
//!
//! A handle moves `Inactive → Active → Stopped` once. Its cancellation token
//! is the liveness flag the running task checks before every backend call and
//! before every state write.

use std::sync::atomic::{AtomicU8, Ordering};

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use ts_rs::TS;

const INACTIVE: u8 = 0;
const ACTIVE: u8 = 1;
const STOPPED: u8 = 2;

/// Observable lifecycle state of a handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "../types/generated/")]
pub enum Lifecycle {
    Inactive,
    Active,
    Stopped,
}

/// Owner side of a running task's liveness.
pub struct LifecycleHandle {
    name: &'static str,
    state: AtomicU8,
    live: CancellationToken,
}

/// Handle of the running poll loop.
pub type LoopHandle = LifecycleHandle;

/// Handle of the registered input listener.
pub type ListenerHandle = LifecycleHandle;

impl LifecycleHandle {
    pub(crate) fn new(name: &'static str) -> Self {
        Self {
            name,
            state: AtomicU8::new(INACTIVE),
            live: CancellationToken::new(),
        }
    }

    /// Token cloned into the task this handle controls.
    pub(crate) fn token(&self) -> CancellationToken {
        self.live.clone()
    }

    /// Mark the task as running. Has no effect once stopped.
    pub(crate) fn activate(&self) -> bool {
        self.state
            .compare_exchange(INACTIVE, ACTIVE, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    /// Stop the task. Returns true only for the call that actually stopped it.
    pub fn stop(&self) -> bool {
        let previous = self.state.swap(STOPPED, Ordering::SeqCst);
        self.live.cancel();
        if previous != STOPPED {
            log::debug!("[SYNC] {} stopped", self.name);
            true
        } else {
            false
        }
    }

    pub fn state(&self) -> Lifecycle {
        match self.state.load(Ordering::SeqCst) {
            INACTIVE => Lifecycle::Inactive,
            ACTIVE => Lifecycle::Active,
            _ => Lifecycle::Stopped,
        }
    }

    pub fn is_active(&self) -> bool {
        self.state() == Lifecycle::Active
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl std::fmt::Debug for LifecycleHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleHandle")
            .field("name", &self.name)
            .field("state", &self.state())
            .finish()
    }
}
