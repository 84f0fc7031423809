//! Configuration management.
//!
//! - `SyncConfig`: poll cadence, input dispatch mode, step size and key
//!   bindings, loadable from and savable to a JSON file.
//!
//! The config is passed explicitly to `sync::start` and to
//! `InputListener::apply_config`; there is no global instance.

pub mod sync;

pub use sync::{SyncConfig, DEFAULT_REFRESH_RATE_HZ, DEFAULT_STEP};
