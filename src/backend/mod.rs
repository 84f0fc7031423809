//! Call contract of the native cursor backend.
//!
//! The backend owns the OS cursor and exposes two request/response
//! operations. Both answer with a raw JSON payload; decoding it (and
//! deciding what a malformed payload means) is the caller's job.
//!
//! - `get_cursor()` → `[x, y, ...]`
//! - `move_cursor({dx, dy})` → `[x, y, ...]` (position after the move)

pub mod invoke;

#[cfg(test)]
pub(crate) mod mock;

use std::sync::Arc;

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use crate::error::PointerPadResult;

pub use invoke::{Invoke, InvokeBackend};

/// Backend command that reads the cursor position.
pub const GET_CURSOR: &str = "get_cursor";

/// Backend command that moves the cursor relatively.
pub const MOVE_CURSOR: &str = "move_cursor";

/// Relative cursor movement, the argument of `move_cursor`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../types/generated/")]
pub struct MoveDelta {
    pub dx: i32,
    pub dy: i32,
}

impl MoveDelta {
    pub fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }
}

/// Asynchronous access to the cursor backend.
///
/// Errors should be reported as `BackendUnavailable` when the backend could
/// not be reached and `BackendError` when it answered with an error.
pub trait CursorBackend: Send + Sync + 'static {
    /// Read the current cursor position.
    fn get_cursor(&self) -> BoxFuture<'_, PointerPadResult<Value>>;

    /// Move the cursor by `delta` and report where it ended up.
    fn move_cursor(&self, delta: MoveDelta) -> BoxFuture<'_, PointerPadResult<Value>>;
}

impl<T: CursorBackend + ?Sized> CursorBackend for Arc<T> {
    fn get_cursor(&self) -> BoxFuture<'_, PointerPadResult<Value>> {
        (**self).get_cursor()
    }

    fn move_cursor(&self, delta: MoveDelta) -> BoxFuture<'_, PointerPadResult<Value>> {
        (**self).move_cursor(delta)
    }
}

/// Shared, type-erased backend used by the sync components.
pub type SharedBackend = Arc<dyn CursorBackend>;
