//! jaml: conversion between an indentation-structured document format
//! (the YAML family, "Y") and a bracket-delimited one (the JSON family,
//! "J"), preserving scalar semantics, containers, anchors, aliases, merge
//! keys, and tags.
//!
//! # Conversion Pipeline
//!
//! The Y → J direction runs in staged phases:
//!
//! 1. **Line provider**: splits the source into indexed lines with their
//!    indentation.
//!
//! 2. **Token scanner**: produces key and value tokens, resolving quoting,
//!    block scalars, multi-line joins, tags, and anchors.
//!
//! 3. **Structure builder**: emits the flat element list, with containers
//!    bracketed by open/close marker elements.
//!
//! 4. **Resolver**: expands aliases by subtree copy, then merge keys by
//!    field-wise union with override.
//!
//! 5. **Classifier and emitter**: types each scalar and renders J text.
//!
//! The reverse direction walks a `serde_json::Value` tree and writes Y
//! lines directly.
//!
//! # Example
//!
//! ```
//! use libjaml::{yaml_to_json, Options};
//!
//! let json = yaml_to_json("key: value", &Options::default()).unwrap();
//! assert_eq!(json, "{\n  \"key\": \"value\"\n}");
//! ```

mod build;
mod classify;
mod element;
mod emit;
mod error;
mod json;
mod line;
mod resolve;
mod scan;
mod yaml_out;

pub use emit::minify_json;
pub use error::{ParseError, Result};
pub use json::{parse_json, try_parse_json};

/// Conversion options.
#[derive(Debug, Clone)]
pub struct Options {
    /// Spaces per nesting level in the output. Clamped to 0–8 for J
    /// output and 2–8 for Y output.
    pub indent: usize,
    /// Treat `yes`/`no` as booleans in Y → J, and spell booleans as
    /// `yes`/`no` in J → Y.
    pub yes_no_bool: bool,
    /// Permit two identical keys inside one mapping.
    pub allow_duplicate_keys: bool,
}

impl Default for Options {
    fn default() -> Options {
        Options {
            indent: 2,
            yes_no_bool: false,
            allow_duplicate_keys: false,
        }
    }
}

/// Convert Y text to J text.
pub fn yaml_to_json(input: &str, options: &Options) -> Result<String> {
    let lines = line::split_lines(input);
    let mut elements = build::build(&lines, options.allow_duplicate_keys)?;
    resolve::resolve(&mut elements)?;
    emit::emit(&elements, options.indent, options.yes_no_bool)
}

/// Convert Y text to a J tree.
pub fn yaml_to_json_value(input: &str, options: &Options) -> Result<serde_json::Value> {
    let text = yaml_to_json(input, options)?;
    json::parse_json(&text)
}

/// Convert J text to Y text.
pub fn json_to_yaml(input: &str, options: &Options) -> Result<String> {
    let value = json::parse_json(input)?;
    Ok(yaml_out::emit_yaml(&value, options.indent, options.yes_no_bool))
}

/// Convert a J tree to Y text.
pub fn json_value_to_yaml(value: &serde_json::Value, options: &Options) -> String {
    yaml_out::emit_yaml(value, options.indent, options.yes_no_bool)
}
