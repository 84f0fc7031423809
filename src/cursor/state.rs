//! Shared cursor state cell.
//!
//! Written by the poll loop and the input dispatcher, read by the view layer.
//! Backed by a `watch` channel: each write replaces the whole coordinate pair,
//! and subscribers are only woken when the value actually changes.

use std::sync::Arc;

use tokio::sync::watch;

use super::CursorPosition;

/// Last cursor position reported by the backend.
#[derive(Clone)]
pub struct CursorState {
    tx: Arc<watch::Sender<CursorPosition>>,
}

impl CursorState {
    /// Create a cell holding the origin.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(CursorPosition::ORIGIN);
        Self { tx: Arc::new(tx) }
    }

    /// Current position.
    pub fn get(&self) -> CursorPosition {
        *self.tx.borrow()
    }

    /// Subscribe to position changes.
    pub fn subscribe(&self) -> watch::Receiver<CursorPosition> {
        self.tx.subscribe()
    }

    /// Replace the stored position. Returns true if the value changed.
    #[cfg(test)]
    pub(crate) fn publish(&self, position: CursorPosition) -> bool {
        self.tx.send_if_modified(|current| {
            if *current == position {
                return false;
            }
            *current = position;
            true
        })
    }

    /// Replace the stored position if `admit` allows it.
    ///
    /// `admit` runs under the cell's write lock, so the decision and the
    /// write cannot be split by another writer or by `barrier`. Returns
    /// whether the write was admitted.
    pub(crate) fn publish_if(&self, position: CursorPosition, admit: impl FnOnce() -> bool) -> bool {
        let mut admitted = false;
        self.tx.send_if_modified(|current| {
            if !admit() {
                return false;
            }
            admitted = true;
            if *current == position {
                return false;
            }
            *current = position;
            true
        });
        admitted
    }

    /// Wait out any `publish_if` currently holding the write lock.
    pub(crate) fn barrier(&self) {
        self.tx.send_if_modified(|_| false);
    }
}

impl Default for CursorState {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CursorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CursorState")
            .field("position", &self.get())
            .finish()
    }
}
