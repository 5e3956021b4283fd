//! Phase 6: J emitter
//!
//! Walks the resolved element list left to right and writes the J text.
//! Container openers merge onto their owner key's line; closers get their
//! own line, with a trailing comma whenever the following element is not
//! another closer. `!!binary` leaves render as an array with one byte per
//! line at one extra indent step.

use crate::classify::{classify, Rendered};
use crate::element::{Element, Tag};
use crate::error::{ParseError, Result};

/// Render the resolved element list as J text.
pub(crate) fn emit(elements: &[Element], indent: usize, yes_no_bool: bool) -> Result<String> {
    let unit = " ".repeat(indent.min(8));
    let pad = |depth: usize| unit.repeat(depth);
    let mut lines: Vec<String> = Vec::new();
    let mut i = 0;

    while i < elements.len() {
        let el = &elements[i];

        if el.is_opener() {
            lines.push(format!("{}{}", pad(el.indent), el.value));
            i += 1;
            continue;
        }
        if el.is_closer() {
            let mut line = format!("{}{}", pad(el.indent), el.value);
            if needs_comma(elements, i) {
                line.push(',');
            }
            lines.push(line);
            i += 1;
            continue;
        }

        // Owner element: its container opener follows at the same depth.
        let owned = el.value.is_empty()
            && i + 1 < elements.len()
            && elements[i + 1].is_opener()
            && elements[i + 1].indent == el.indent;
        if owned {
            let opener = &elements[i + 1];
            match (&el.tag, opener.value.as_str()) {
                (Tag::None, _) | (Tag::Map, "{") | (Tag::Seq, "[") => {}
                (tag, _) => {
                    return Err(ParseError::InvalidValueForTag(tag.to_string(), el.line));
                }
            }
            if el.key.is_empty() {
                lines.push(format!("{}{}", pad(el.indent), opener.value));
            } else {
                lines.push(format!(
                    "{}\"{}\": {}",
                    pad(el.indent),
                    el.key,
                    opener.value
                ));
            }
            i += 2;
            continue;
        }

        // Leaf element.
        match classify(el, yes_no_bool)? {
            Rendered::Text(text) => {
                let mut line = pad(el.indent);
                if el.key.is_empty() {
                    line.push_str(&text);
                } else {
                    line.push_str(&format!("\"{}\": {}", el.key, text));
                }
                if needs_comma(elements, i) {
                    line.push(',');
                }
                lines.push(line);
            }
            Rendered::Bytes(bytes) => {
                if el.key.is_empty() {
                    lines.push(format!("{}[", pad(el.indent)));
                } else {
                    lines.push(format!("{}\"{}\": [", pad(el.indent), el.key));
                }
                for (k, byte) in bytes.iter().enumerate() {
                    let mut line = format!("{}{}", pad(el.indent + 1), byte);
                    if k + 1 < bytes.len() {
                        line.push(',');
                    }
                    lines.push(line);
                }
                let mut close = format!("{}]", pad(el.indent));
                if needs_comma(elements, i) {
                    close.push(',');
                }
                lines.push(close);
            }
        }
        i += 1;
    }

    Ok(lines.join("\n"))
}

/// A leaf or closer takes a trailing comma unless the next element closes
/// its container.
fn needs_comma(elements: &[Element], i: usize) -> bool {
    elements.get(i + 1).is_some_and(|next| !next.is_closer())
}

/// Flatten J text to one line: each line's trimmed contents joined by
/// single spaces. Purely textual, no reparse.
pub fn minify_json(input: &str) -> String {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
