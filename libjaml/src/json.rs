//! J tree adapter.
//!
//! The conversion core emits and consumes text; the tree itself is
//! `serde_json::Value`, which covers the collaborator contract: strict
//! parsing, pretty and compact serialization, child access by index and
//! name, `/`-separated path lookup via `Value::pointer`, and typed
//! accessors.

use crate::error::{ParseError, Result};
use serde_json::Value;

/// Parse J text strictly. The document root must be an array or object.
pub fn parse_json(input: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(input)?;
    if !value.is_object() && !value.is_array() {
        return Err(ParseError::JsonRoot);
    }
    Ok(value)
}

/// True when the input parses as a J document with a container root.
pub fn try_parse_json(input: &str) -> bool {
    parse_json(input).is_ok()
}
