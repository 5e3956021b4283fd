//! J → Y emitter.
//!
//! Walks a J tree and writes Y lines: objects as `key:` blocks, arrays as
//! `- ` items, empty containers as `{}` and `[]`. Scalars format directly;
//! strings quote themselves whenever the plain spelling would re-classify
//! as something else, and strings with embedded newlines switch to a
//! literal block scalar with the chomp modifier that reproduces their
//! trailing newlines.

use crate::classify::{parse_float, parse_timestamp};
use crate::scan::escape_plain;
use serde_json::Value;

/// Continuation indent under a `- ` item lead.
const ITEM_PAD: &str = "  ";

/// Render a J tree as Y text.
pub(crate) fn emit_yaml(value: &Value, indent: usize, yes_no_bool: bool) -> String {
    let unit = indent.clamp(2, 8);
    match render(value, unit, yes_no_bool) {
        Node::Inline(text) => text,
        Node::BlockScalar(header, body) => {
            let mut lines = vec![header];
            for line in body {
                lines.push(format!("{}{}", " ".repeat(unit), line));
            }
            lines.join("\n")
        }
        Node::Block(lines) => lines.join("\n"),
    }
}

/// A rendered node: a one-token spelling, a block scalar header with its
/// body, or a block of sibling lines at relative indent zero.
enum Node {
    Inline(String),
    BlockScalar(String, Vec<String>),
    Block(Vec<String>),
}

fn render(value: &Value, unit: usize, yes_no: bool) -> Node {
    match value {
        Value::Null => Node::Inline("null".to_string()),
        Value::Bool(b) => Node::Inline(bool_text(*b, yes_no)),
        Value::Number(n) => Node::Inline(number_text(n)),
        Value::String(s) => render_string(s, yes_no),
        Value::Array(items) if items.is_empty() => Node::Inline("[]".to_string()),
        Value::Object(map) if map.is_empty() => Node::Inline("{}".to_string()),
        Value::Array(items) => {
            let mut lines = Vec::new();
            for item in items {
                match render(item, unit, yes_no) {
                    Node::Inline(text) => lines.push(format!("- {}", text)),
                    Node::BlockScalar(header, body) => {
                        lines.push(format!("- {}", header));
                        for line in body {
                            lines.push(format!("{}{}", ITEM_PAD, line));
                        }
                    }
                    Node::Block(child) => {
                        // The item body continues at the dash lead's width.
                        for (j, line) in child.into_iter().enumerate() {
                            if j == 0 {
                                lines.push(format!("- {}", line));
                            } else {
                                lines.push(format!("{}{}", ITEM_PAD, line));
                            }
                        }
                    }
                }
            }
            Node::Block(lines)
        }
        Value::Object(map) => {
            let mut lines = Vec::new();
            for (k, v) in map {
                let key = key_text(k);
                match render(v, unit, yes_no) {
                    Node::Inline(text) => lines.push(format!("{}: {}", key, text)),
                    Node::BlockScalar(header, body) => {
                        lines.push(format!("{}: {}", key, header));
                        for line in body {
                            lines.push(format!("{}{}", " ".repeat(unit), line));
                        }
                    }
                    Node::Block(child) => {
                        lines.push(format!("{}:", key));
                        for line in child {
                            lines.push(format!("{}{}", " ".repeat(unit), line));
                        }
                    }
                }
            }
            Node::Block(lines)
        }
    }
}

fn bool_text(b: bool, yes_no: bool) -> String {
    if yes_no {
        if b { "yes" } else { "no" }.to_string()
    } else {
        b.to_string()
    }
}

/// Integers print as digits; floats keep a decimal point so the reverse
/// direction classifies them as floats again.
fn number_text(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    let f = n.as_f64().unwrap_or(0.0);
    if f.is_finite() && f == f.trunc() {
        format!("{:.1}", f)
    } else {
        format!("{}", f)
    }
}

fn render_string(s: &str, yes_no: bool) -> Node {
    if s.contains('\n') && is_block_safe(s) {
        let stripped = s.trim_end_matches('\n');
        if !stripped.is_empty() {
            let trailing = s.len() - stripped.len();
            let mut body: Vec<String> = stripped.split('\n').map(String::from).collect();
            let header = match trailing {
                0 => "|-",
                1 => "|",
                _ => {
                    for _ in 0..trailing - 1 {
                        body.push(String::new());
                    }
                    "|+"
                }
            };
            return Node::BlockScalar(header.to_string(), body);
        }
    }
    Node::Inline(quote_scalar(s, yes_no))
}

/// A string can render as a literal block only when margin stripping and
/// blank-line coalescing reproduce it exactly.
fn is_block_safe(s: &str) -> bool {
    if !s.chars().all(|c| c == '\n' || c as u32 >= 0x20) {
        return false;
    }
    let lines: Vec<&str> = s.split('\n').collect();
    if lines.iter().any(|l| l.ends_with(' ') || l.ends_with('\t')) {
        return false;
    }
    // Margin stripping needs an anchor line with no leading space.
    lines.iter().any(|l| !l.is_empty() && !l.starts_with(' '))
}

fn quote_scalar(s: &str, yes_no: bool) -> String {
    if s.is_empty() {
        return "''".to_string();
    }
    if s.chars().any(|c| {
        (c as u32) < 0x20 || matches!(c, '\u{0085}' | '\u{2028}' | '\u{2029}')
    }) {
        return format!("\"{}\"", escape_plain(s));
    }
    if needs_quotes(s, yes_no) {
        return format!("'{}'", s.replace('\'', "''"));
    }
    s.to_string()
}

/// True when the plain spelling would re-classify as a non-string or would
/// disturb the structural syntax.
fn needs_quotes(s: &str, yes_no: bool) -> bool {
    if s.trim() != s {
        return true;
    }
    if s.eq_ignore_ascii_case("null") || s == "true" || s == "false" {
        return true;
    }
    if yes_no && (s == "yes" || s == "no") {
        return true;
    }
    if s.parse::<i64>().is_ok() || parse_float(s).is_some() || parse_timestamp(s).is_some() {
        return true;
    }
    if matches!(
        s.chars().next(),
        Some('&' | '*' | '!' | '|' | '>' | '"' | '\'' | '#' | '[' | ']' | '{' | '}' | ',' | '%' | '@' | '`')
    ) {
        return true;
    }
    s == "-" || s.starts_with("- ") || s.contains(": ") || s.ends_with(':') || s.contains(" #")
}

fn key_text(k: &str) -> String {
    let plain = !k.is_empty()
        && k != "<<"
        && k.chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if plain {
        k.to_string()
    } else {
        format!("'{}'", k.replace('\'', "''"))
    }
}
