//! Cursor subsystem for PointerPad.
//!
//! - `position`: Cursor coordinates and decoding of backend payloads
//! - `state`: The shared cell both producers write and the view reads

pub mod position;
pub mod state;

pub use position::{decode_position, CursorPosition};
pub use state::CursorState;
