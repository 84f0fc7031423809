//! Cursor position sync for the pointer-control surface.
//!
//! The view owns a `SyncHandle` for its lifetime: a per-frame poll loop keeps
//! the shared `CursorState` in line with the backend, and an optional key
//! listener turns h/j/k/l into `move_cursor` calls.

pub mod backend;
pub mod config;
pub mod cursor;
pub mod error;
pub mod logging;
pub mod sync;

pub use backend::{CursorBackend, Invoke, InvokeBackend, MoveDelta};
pub use config::SyncConfig;
pub use cursor::{CursorPosition, CursorState};
pub use error::{PointerPadError, PointerPadResult};
pub use logging::init_logging;
pub use sync::{
    frame_channel, start, start_with_refresh_clock, Direction, FrameTrigger, KeyEvent,
    Propagation, RefreshClock, StatsSnapshot, SyncHandle,
};
