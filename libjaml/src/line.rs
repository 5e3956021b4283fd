//! Phase 1: Line provider
//!
//! The line provider converts raw source text into indexed lines. It
//! performs:
//! - Line splitting (LF and CRLF)
//! - Indentation counting (leading spaces)
//! - 1-based numbering for error reporting
//!
//! Blank lines and comment lines are kept in the sequence; the scanner
//! decides when they matter (they do inside quoted and block scalars).

/// A single source line.
#[derive(Debug, Clone)]
pub(crate) struct SourceLine {
    /// Content after the leading spaces.
    pub text: String,
    /// Number of leading spaces.
    pub indent: usize,
    /// One-based line number for error reporting.
    pub number: usize,
}

impl SourceLine {
    /// True if the line holds no content at all.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// True if the line is a whole-line comment.
    pub fn is_comment(&self) -> bool {
        self.text.starts_with('#')
    }
}

/// Split source text into lines with their indentation.
pub(crate) fn split_lines(source: &str) -> Vec<SourceLine> {
    source
        .split('\n')
        .enumerate()
        .map(|(i, raw)| {
            let raw = raw.strip_suffix('\r').unwrap_or(raw);
            let indent = count_indent(raw);
            SourceLine {
                text: raw[indent..].to_string(),
                indent,
                number: i + 1,
            }
        })
        .collect()
}

/// Count the number of leading spaces in a line.
fn count_indent(line: &str) -> usize {
    line.bytes().take_while(|&b| b == b' ').count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_indent() {
        assert_eq!(count_indent(""), 0);
        assert_eq!(count_indent("hello"), 0);
        assert_eq!(count_indent("  hello"), 2);
        assert_eq!(count_indent("    hello"), 4);
    }

    #[test]
    fn test_split_simple() {
        let lines = split_lines("a: 1\n  b: 2");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "a: 1");
        assert_eq!(lines[0].indent, 0);
        assert_eq!(lines[0].number, 1);
        assert_eq!(lines[1].text, "b: 2");
        assert_eq!(lines[1].indent, 2);
        assert_eq!(lines[1].number, 2);
    }

    #[test]
    fn test_split_crlf() {
        let lines = split_lines("a: 1\r\nb: 2");
        assert_eq!(lines[0].text, "a: 1");
        assert_eq!(lines[1].text, "b: 2");
    }

    #[test]
    fn test_blank_and_comment() {
        let lines = split_lines("a: 1\n\n# note\nb: 2");
        assert!(lines[1].is_blank());
        assert!(lines[2].is_comment());
        assert!(!lines[3].is_comment());
    }
}
