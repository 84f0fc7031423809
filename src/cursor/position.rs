//! Cursor position type and backend payload decoding.
//!
//! The backend answers both `get_cursor` and `move_cursor` with a JSON
//! sequence whose first two elements are the screen coordinates:
//! `[x, y, ...]`. Anything else is a decode failure.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use crate::error::{PointerPadError, PointerPadResult};

/// Cursor position in backend screen coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../types/generated/")]
pub struct CursorPosition {
    pub x: i32,
    pub y: i32,
}

impl CursorPosition {
    /// Screen origin; the value shown before the backend has answered.
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    /// Create from explicit coordinates.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for CursorPosition {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Coordinate readout, e.g. `"10, 20"`.
impl std::fmt::Display for CursorPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.x, self.y)
    }
}

/// Decode a backend response into a position.
///
/// Trailing elements after `x` and `y` are ignored. Fractional numbers are
/// rounded to the nearest integer; values outside the `i32` range are
/// rejected.
pub fn decode_position(value: &Value) -> PointerPadResult<CursorPosition> {
    let items = value.as_array().ok_or_else(|| {
        PointerPadError::DecodeFailure(format!("expected [x, y, ...], got {}", json_kind(value)))
    })?;

    if items.len() < 2 {
        return Err(PointerPadError::DecodeFailure(format!(
            "expected at least 2 values, got {}",
            items.len()
        )));
    }

    Ok(CursorPosition {
        x: decode_coordinate(&items[0], "x")?,
        y: decode_coordinate(&items[1], "y")?,
    })
}

fn decode_coordinate(value: &Value, axis: &str) -> PointerPadResult<i32> {
    let Value::Number(number) = value else {
        return Err(PointerPadError::DecodeFailure(format!(
            "{} is not a number ({})",
            axis,
            json_kind(value)
        )));
    };

    if let Some(int) = number.as_i64() {
        return i32::try_from(int).map_err(|_| {
            PointerPadError::DecodeFailure(format!("{} out of range: {}", axis, int))
        });
    }

    match number.as_f64().map(f64::round) {
        Some(rounded) if rounded >= i32::MIN as f64 && rounded <= i32::MAX as f64 => {
            Ok(rounded as i32)
        },
        _ => Err(PointerPadError::DecodeFailure(format!(
            "{} out of range: {}",
            axis, number
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_pair() {
        let pos = decode_position(&json!([10, 20])).unwrap();
        assert_eq!(pos, CursorPosition::new(10, 20));
    }

    #[test]
    fn test_decode_ignores_trailing_values() {
        let pos = decode_position(&json!([-5, 1080, 3, "extra"])).unwrap();
        assert_eq!(pos, CursorPosition::new(-5, 1080));
    }

    #[test]
    fn test_decode_rounds_fractional_numbers() {
        let pos = decode_position(&json!([10.4, 27.6])).unwrap();
        assert_eq!(pos, CursorPosition::new(10, 28));
    }

    #[test]
    fn test_decode_rejects_malformed_shapes() {
        let malformed = [
            json!([]),
            json!([10]),
            json!(["10", 20]),
            json!([10, null]),
            json!([true, false]),
            json!({ "x": 10, "y": 20 }),
            json!("10, 20"),
            json!(null),
        ];

        for value in malformed {
            let result = decode_position(&value);
            assert!(
                matches!(result, Err(PointerPadError::DecodeFailure(_))),
                "{} should not decode",
                value
            );
        }
    }

    #[test]
    fn test_decode_rejects_out_of_range() {
        assert!(decode_position(&json!([i64::from(i32::MAX) + 1, 0])).is_err());
        assert!(decode_position(&json!([0, 1e12])).is_err());
        assert!(decode_position(&json!([u64::MAX, 0])).is_err());
    }

    #[test]
    fn test_display_readout() {
        assert_eq!(CursorPosition::new(10, 28).to_string(), "10, 28");
        assert_eq!(CursorPosition::default().to_string(), "0, 0");
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&CursorPosition::new(3, 4)).unwrap();
        assert_eq!(json, r#"{"x":3,"y":4}"#);
    }
}
