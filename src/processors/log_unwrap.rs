//! Structured-log unwrapping for message telemetry.
//!
//! JSON loggers (bunyan and friends) write one object per line. Console
//! auto-collection forwards that line verbatim, so the portal shows the whole
//! object instead of the message. This keeps only `msg`.

use crate::envelope::{Envelope, ProcessorContext};
use serde_json::Value;

/// Fields that identify a structured log line.
const REQUIRED_FIELDS: [&str; 3] = ["msg", "level", "name"];

/// Replace a JSON log line in `message` with its `msg` field.
pub fn unpack_structured_log(envelope: &mut Envelope, _context: Option<&ProcessorContext>) -> bool {
    if !envelope.is_message() {
        return true;
    }
    let Some(base) = envelope.base_data_mut() else {
        return true;
    };
    let Some(Value::String(raw)) = base.message.as_ref() else {
        return true;
    };
    let Ok(Value::Object(mut fields)) = serde_json::from_str::<Value>(raw) else {
        return true;
    };
    if !REQUIRED_FIELDS
        .iter()
        .all(|field| fields.get(*field).is_some_and(is_truthy))
    {
        return true;
    }

    base.message = fields.remove("msg");
    true
}

/// Loose truthiness, as JSON loggers use it: `null`, `false`, `0` and `""`
/// don't count as present.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
