//! Phase 2: Token scanner
//!
//! The scanner turns the line sequence into key and value tokens. It owns
//! the `(row, rest, indent)` cursor and resolves everything that happens
//! below the structural level:
//! - comment and blank skipping
//! - tag prefixes (`!!name`, `!name`)
//! - anchor and alias designators (`&name`, `*name`)
//! - quoted scalars with sentinel substitution, possibly multi-line
//! - block scalars (`|` literal, `>` folded) with chomp modifiers
//! - plain scalars with multi-line joins and trailing comments
//! - inline-array punctuation (`[`, `]`, `,`)
//!
//! String text leaves the scanner already escaped to J conventions. Hard
//! line breaks inside multi-line scalars are carried as an internal
//! sentinel that becomes `\n` during escaping, so the emitter never has to
//! re-inspect the join mode.

use crate::element::Tag;
use crate::error::{ParseError, Result};
use crate::line::SourceLine;

/// Internal hard-break sentinel; cannot appear in source (it is a C0
/// control, which the escape pass would re-encode anyway).
pub(crate) const LINE_FEED: char = '\u{1}';

/// Token kind: the text before a `: ` marker, or a scalar value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Key,
    Value,
}

/// A scanned token with its attributes.
#[derive(Debug, Clone)]
pub(crate) struct Token {
    pub kind: TokenKind,
    /// Token text, escaped to J string conventions.
    pub text: String,
    pub tag: Tag,
    /// Raw designator (`&name` or `*name`), empty if none.
    pub designator: String,
    /// Bare anchor/alias name.
    pub anchor: String,
    /// True when the scalar came from a quoted or block form.
    pub literal: bool,
    /// True when the scalar spanned more than one source line.
    pub multiline: bool,
    /// One-based source line where the token started.
    pub line: usize,
}

impl Token {
    fn at(line: usize) -> Token {
        Token {
            kind: TokenKind::Value,
            text: String::new(),
            tag: Tag::None,
            designator: String::new(),
            anchor: String::new(),
            literal: false,
            multiline: false,
            line,
        }
    }

    /// True when this token carries an alias reference.
    pub fn is_alias(&self) -> bool {
        self.designator.starts_with('*')
    }
}

/// Saved cursor position for builder rollback.
#[derive(Debug, Clone)]
pub(crate) struct Mark {
    row: usize,
    rest: String,
    indent: usize,
    line_start: bool,
}

/// Chomp policy for block scalars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Chomp {
    Clip,
    Strip,
    Keep,
}

/// The token scanner over a fixed line sequence.
pub(crate) struct Scanner<'a> {
    lines: &'a [SourceLine],
    /// Index of the current line; `lines.len()` at end of input.
    pub row: usize,
    /// Unconsumed suffix of the current line (leading indent removed).
    pub rest: String,
    /// Indent of the current line.
    pub indent: usize,
    /// True while nothing has been consumed from the current line.
    pub line_start: bool,
    /// True inside `[ ... ]`, where `[` `]` `,` punctuate.
    pub in_inline: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(lines: &'a [SourceLine]) -> Scanner<'a> {
        let mut sc = Scanner {
            lines,
            row: 0,
            rest: String::new(),
            indent: 0,
            line_start: true,
            in_inline: false,
        };
        if let Some(first) = lines.first() {
            sc.rest = first.text.clone();
            sc.indent = first.indent;
        }
        sc
    }

    /// One-based line number of the cursor, clamped to the last line.
    pub fn line_number(&self) -> usize {
        if self.row < self.lines.len() {
            self.lines[self.row].number
        } else {
            self.lines.last().map(|l| l.number).unwrap_or(1)
        }
    }

    pub fn mark(&self) -> Mark {
        Mark {
            row: self.row,
            rest: self.rest.clone(),
            indent: self.indent,
            line_start: self.line_start,
        }
    }

    pub fn restore(&mut self, mark: Mark) {
        self.row = mark.row;
        self.rest = mark.rest;
        self.indent = mark.indent;
        self.line_start = mark.line_start;
    }

    fn at_eof(&self) -> bool {
        self.row >= self.lines.len()
    }

    /// Move the cursor to the start of the next line.
    fn advance_line(&mut self) {
        self.row += 1;
        if self.row < self.lines.len() {
            self.rest = self.lines[self.row].text.clone();
            self.indent = self.lines[self.row].indent;
        } else {
            self.rest = String::new();
        }
        self.line_start = true;
    }

    /// Skip blank remainders and comments. Returns false at end of input.
    pub fn skip_blank(&mut self) -> bool {
        loop {
            if self.at_eof() {
                return false;
            }
            let rest = self.rest.trim_start();
            if rest.is_empty() || rest.starts_with('#') {
                self.advance_line();
                continue;
            }
            return true;
        }
    }

    /// Consume a collection-item lead (`- ` or bare `-`) and return its
    /// offset: 1 plus the run of spaces after the dash.
    pub fn take_item_lead(&mut self) -> Option<usize> {
        if self.rest == "-" {
            self.rest.clear();
            self.line_start = false;
            return Some(1);
        }
        if let Some(after) = self.rest.strip_prefix("- ") {
            let pad = after.len() - after.trim_start_matches(' ').len();
            self.rest = after[pad..].to_string();
            self.line_start = false;
            return Some(2 + pad);
        }
        None
    }

    /// True when the remaining line begins a collection item.
    pub fn has_item_lead(&self) -> bool {
        self.rest == "-" || self.rest.starts_with("- ")
    }

    // ------------------------------------------------------------------
    // Token assembly
    // ------------------------------------------------------------------

    /// Scan the next token. Returns `None` at end of input.
    pub fn next_token(&mut self) -> Result<Option<Token>> {
        if !self.skip_blank() {
            return Ok(None);
        }
        let at_start = self.line_start;
        self.rest = self.rest.trim_start().to_string();
        let mut tok = Token::at(self.line_number());

        // Tag and designator prefixes; either order is accepted.
        loop {
            if self.rest.starts_with('!') {
                if tok.tag != Tag::None {
                    return Err(ParseError::InvalidTag(tok.line));
                }
                tok.tag = self.take_tag()?;
                self.rest = self.rest.trim_start().to_string();
                continue;
            }
            if (self.rest.starts_with('&') || self.rest.starts_with('*'))
                && tok.designator.is_empty()
            {
                self.take_designator(&mut tok)?;
                self.rest = self.rest.trim_start().to_string();
                continue;
            }
            break;
        }

        // Inline structural punctuation.
        if self.rest.starts_with('[') {
            if tok.is_alias() {
                return Err(ParseError::AliasValue(tok.line));
            }
            tok.text = self.rest[..1].to_string();
            self.rest = self.rest[1..].to_string();
            self.line_start = false;
            return Ok(Some(tok));
        }
        if self.in_inline && (self.rest.starts_with(']') || self.rest.starts_with(',')) {
            if !tok.designator.is_empty() || tok.tag != Tag::None {
                // Prefix-only entry; the separator stays for the builder.
                return Ok(Some(tok));
            }
            tok.text = self.rest[..1].to_string();
            self.rest = self.rest[1..].to_string();
            self.line_start = false;
            return Ok(Some(tok));
        }

        // Block scalar.
        if !self.in_inline && (self.rest.starts_with('|') || self.rest.starts_with('>')) {
            let folded = self.rest.starts_with('>');
            let chomp = self.take_block_header()?;
            tok.text = escape_plain(&self.scan_block(folded, chomp));
            tok.literal = true;
            tok.multiline = true;
            self.finish_alias_check(&tok)?;
            return Ok(Some(tok));
        }

        // Quoted scalar.
        if self.rest.starts_with('"') || self.rest.starts_with('\'') {
            let quote = self.rest.chars().next().unwrap();
            let (text, multiline) = self.scan_quoted(quote)?;
            tok.text = text;
            tok.literal = true;
            tok.multiline = multiline;
            // A quoted token followed by a colon is a key.
            let after = self.rest.trim_start().to_string();
            if after == ":" || after.starts_with(": ") {
                if multiline {
                    return Err(ParseError::KeyNameMultiline(tok.line));
                }
                if !tok.designator.is_empty() {
                    return Err(ParseError::KeyNameAnchorAlias(tok.line));
                }
                self.rest = after[1..].to_string();
                self.line_start = false;
                tok.kind = TokenKind::Key;
                return Ok(Some(tok));
            }
            if self.in_inline {
                if !after.is_empty()
                    && !after.starts_with(',')
                    && !after.starts_with(']')
                {
                    return Err(ParseError::InvalidIndent(tok.line));
                }
                self.rest = after;
            } else {
                if !after.is_empty() && !after.starts_with('#') {
                    return Err(ParseError::InvalidIndent(tok.line));
                }
                self.rest.clear();
            }
            self.finish_alias_check(&tok)?;
            return Ok(Some(tok));
        }

        // Plain scalar.
        let (raw, is_key, multiline) = self.scan_plain(tok.tag == Tag::Binary, at_start)?;
        tok.multiline = multiline;
        if is_key {
            if !tok.designator.is_empty() {
                return Err(ParseError::KeyNameAnchorAlias(tok.line));
            }
            let key = raw.trim().to_string();
            if key.is_empty() {
                return Err(ParseError::KeyNameEmpty(tok.line));
            }
            if key.contains(['{', '}', '[', ']']) {
                return Err(ParseError::KeyNameInvalidChar(tok.line));
            }
            tok.kind = TokenKind::Key;
            tok.text = escape_plain(&key);
            return Ok(Some(tok));
        }
        tok.text = escape_plain(&raw);
        self.finish_alias_check(&tok)?;
        Ok(Some(tok))
    }

    /// An alias must not carry a scalar of its own.
    fn finish_alias_check(&self, tok: &Token) -> Result<()> {
        if tok.is_alias() && !tok.text.is_empty() {
            return Err(ParseError::AliasValue(tok.line));
        }
        Ok(())
    }

    /// Consume a `!!builtin` or `!local` tag prefix.
    fn take_tag(&mut self) -> Result<Tag> {
        let line = self.line_number();
        let inline = self.in_inline;
        let boundary = |c: char| c == ' ' || (inline && (c == ',' || c == ']'));
        if let Some(after) = self.rest.strip_prefix("!!") {
            let end = after.find(boundary).unwrap_or(after.len());
            let name = after[..end].to_string();
            let tail = after[end..].to_string();
            let tag = Tag::builtin(&name).ok_or(ParseError::InvalidTag(line))?;
            self.rest = tail;
            self.line_start = false;
            return Ok(tag);
        }
        let after = self.rest[1..].to_string();
        let end = after.find(boundary).unwrap_or(after.len());
        let name = after[..end].to_string();
        self.rest = after[end..].to_string();
        self.line_start = false;
        Ok(Tag::Local(name))
    }

    /// Consume an `&name` anchor or `*name` alias designator.
    fn take_designator(&mut self, tok: &mut Token) -> Result<()> {
        let line = self.line_number();
        let lead = self.rest.chars().next().unwrap_or('&');
        let after = self.rest[1..].to_string();
        let end = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '-'))
            .unwrap_or(after.len());
        if end == 0 {
            return Err(ParseError::AnchorAliasName(line));
        }
        let boundary = after[end..].chars().next();
        match boundary {
            None | Some(' ') | Some(':') => {}
            Some(',') | Some(']') if self.in_inline => {}
            _ => return Err(ParseError::AnchorAliasName(line)),
        }
        tok.anchor = after[..end].to_string();
        tok.designator = format!("{}{}", lead, tok.anchor);
        self.rest = after[end..].to_string();
        self.line_start = false;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Block scalars
    // ------------------------------------------------------------------

    /// Consume the `|`/`>` header and its optional chomp modifier.
    fn take_block_header(&mut self) -> Result<Chomp> {
        let line = self.line_number();
        let mut after = &self.rest[1..];
        let chomp = match after.chars().next() {
            Some('+') => {
                after = &after[1..];
                Chomp::Keep
            }
            Some('-') => {
                after = &after[1..];
                Chomp::Strip
            }
            _ => Chomp::Clip,
        };
        let after = after.trim_start();
        if !after.is_empty() && !after.starts_with('#') {
            return Err(ParseError::InvalidBlock(line));
        }
        self.rest.clear();
        self.line_start = false;
        Ok(chomp)
    }

    /// Collect a block scalar's body, strip the common margin, join per
    /// mode, and apply the chomp policy. The cursor ends on the first line
    /// after the block.
    fn scan_block(&mut self, folded: bool, chomp: Chomp) -> String {
        let entry = self.indent;
        let mut collected: Vec<(usize, String)> = Vec::new();
        loop {
            self.advance_line();
            if self.at_eof() {
                break;
            }
            let line = &self.lines[self.row];
            if line.is_blank() {
                collected.push((usize::MAX, String::new()));
                continue;
            }
            if line.indent <= entry {
                break;
            }
            collected.push((line.indent, line.text.clone()));
        }

        let margin = collected
            .iter()
            .filter(|(ind, _)| *ind != usize::MAX)
            .map(|(ind, _)| *ind)
            .min()
            .unwrap_or(entry + 1);
        let body: Vec<String> = collected
            .iter()
            .map(|(ind, text)| {
                if *ind == usize::MAX {
                    String::new()
                } else {
                    format!("{}{}", " ".repeat(ind - margin), text)
                }
            })
            .collect();

        let mut joined = if folded {
            fold_lines(&body)
        } else {
            body.join(&LINE_FEED.to_string())
        };
        match chomp {
            Chomp::Keep => {
                if !body.is_empty() {
                    joined.push(LINE_FEED);
                }
            }
            Chomp::Clip => {
                while joined.ends_with(LINE_FEED) {
                    joined.pop();
                }
                if !joined.is_empty() {
                    joined.push(LINE_FEED);
                }
            }
            Chomp::Strip => {
                while joined.ends_with(LINE_FEED) {
                    joined.pop();
                }
            }
        }
        joined
    }

    // ------------------------------------------------------------------
    // Quoted scalars
    // ------------------------------------------------------------------

    /// Scan a quoted scalar starting at the opening quote. Returns the
    /// escaped body and whether it spanned lines.
    fn scan_quoted(&mut self, quote: char) -> Result<(String, bool)> {
        let start_line = self.line_number();
        let sentinel: &str = if quote == '"' { "\\\"" } else { "''" };
        let hole = "\u{2}\u{2}";
        let mut segments: Vec<String> = Vec::new();
        let mut segment = self.rest[1..].to_string();

        loop {
            // Sentinel and hole have equal byte length, so a position in
            // the masked text maps straight onto the raw segment.
            let masked = segment.replace(sentinel, hole);
            if let Some(pos) = masked.find(quote) {
                segments.push(segment[..pos].to_string());
                self.rest = segment[pos + quote.len_utf8()..].to_string();
                self.line_start = false;
                break;
            }
            segments.push(segment);
            self.advance_line();
            if self.at_eof() {
                return Err(ParseError::UnclosedLiteral(start_line));
            }
            // Closure search appends lines verbatim, indent included.
            let line = &self.lines[self.row];
            segment = format!("{}{}", " ".repeat(line.indent), line.text);
        }

        let multiline = segments.len() > 1;
        let body = segments.join(&LINE_FEED.to_string());
        let text = if quote == '"' {
            escape_double_body(&body)
        } else {
            escape_plain(&body.replace("''", "'"))
        };
        Ok((text, multiline))
    }

    // ------------------------------------------------------------------
    // Plain scalars
    // ------------------------------------------------------------------

    /// Scan a plain scalar. Returns the raw text, whether a key marker
    /// terminated it, and whether it spanned lines. A scalar that opened a
    /// line continues on lines at its own indent; a mid-line scalar only
    /// continues on strictly deeper lines.
    fn scan_plain(&mut self, binary: bool, at_start: bool) -> Result<(String, bool, bool)> {
        let min_indent = if at_start {
            self.indent
        } else {
            self.indent + 1
        };
        let mut parts: Vec<String> = Vec::new();
        let mut crossed = false;
        loop {
            if let Some((text, is_key, commented)) = self.scan_plain_first_line() {
                if !text.is_empty() {
                    parts.push(text);
                }
                if !is_key && !commented && !crossed && !self.in_inline && self.rest.is_empty() {
                    // Line exhausted: the scalar may continue deeper.
                    let first = parts.pop().unwrap_or_default();
                    let (joined, multiline) = self.scan_plain_continuation(first, binary, min_indent);
                    return Ok((joined, false, multiline));
                }
                return Ok((parts.join(" "), is_key, crossed));
            }
            // Inline mode, scalar runs past the line end.
            let text = self.rest.trim_end().to_string();
            if !text.is_empty() {
                parts.push(text);
            }
            self.advance_line();
            crossed = true;
            if !self.skip_blank() {
                // The enclosing builder reports the unclosed array.
                return Ok((parts.join(" "), false, true));
            }
            self.rest = self.rest.trim_start().to_string();
        }
    }

    /// Scan the current line for a plain-scalar terminator. Returns the
    /// text, key flag, and comment flag, or `None` in inline mode when the
    /// scalar runs past the line end.
    fn scan_plain_first_line(&mut self) -> Option<(String, bool, bool)> {
        let rest = self.rest.clone();
        let bytes = rest.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            let b = bytes[i];
            if b == b':' && (i + 1 == bytes.len() || bytes[i + 1] == b' ') {
                let text = rest[..i].trim_end().to_string();
                self.rest = rest[i + 1..].to_string();
                self.line_start = false;
                return Some((text, true, false));
            }
            if self.in_inline && (b == b',' || b == b']' || b == b'[') {
                let text = rest[..i].trim_end().to_string();
                self.rest = rest[i..].to_string();
                self.line_start = false;
                return Some((text, false, false));
            }
            if b == b'#' && i > 0 && bytes[i - 1] == b' ' {
                let text = rest[..i].trim_end().to_string();
                self.rest.clear();
                self.line_start = false;
                return Some((text, false, true));
            }
            i += 1;
        }
        if self.in_inline {
            return None;
        }
        let text = rest.trim_end().to_string();
        self.rest.clear();
        self.line_start = false;
        Some((text, false, false))
    }

    /// Join continuation lines onto a plain scalar. Binary scalars join
    /// with no separator and no hard-break sentinel.
    fn scan_plain_continuation(
        &mut self,
        first: String,
        binary: bool,
        min_indent: usize,
    ) -> (String, bool) {
        let mut cont: Vec<(usize, String)> = Vec::new();
        loop {
            let next = self.row + 1;
            if next >= self.lines.len() {
                break;
            }
            let line = &self.lines[next];
            if line.is_blank()
                || line.is_comment()
                || line.indent < min_indent
                || is_key_like(&line.text)
                || line.text == "-"
                || line.text.starts_with("- ")
                || line.text.starts_with('[')
            {
                break;
            }
            let mut text = line.text.clone();
            if let Some(cut) = find_trailing_comment(&text) {
                text.truncate(cut);
            }
            cont.push((line.indent, text.trim_end().to_string()));
            self.advance_line();
        }
        if cont.is_empty() {
            return (first, false);
        }
        if binary {
            let mut joined = first;
            for (_, text) in &cont {
                joined.push_str(text.trim());
            }
            return (joined, true);
        }
        let margin = cont.iter().map(|(ind, _)| *ind).min().unwrap_or(min_indent);
        let mut joined = first;
        for (ind, text) in &cont {
            if !joined.is_empty() {
                joined.push(' ');
            }
            joined.push_str(&" ".repeat(ind - margin));
            joined.push_str(text);
        }
        (joined, true)
    }
}

/// True when a line reads as `key: ...` or `key:` outside quotes and
/// brackets.
pub(crate) fn is_key_like(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut in_single = false;
    let mut in_double = false;
    let mut escape = false;
    let mut depth = 0usize;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if escape {
            escape = false;
            i += 1;
            continue;
        }
        match b {
            b'\\' => escape = true,
            b'"' if !in_single => in_double = !in_double,
            b'\'' if !in_double => in_single = !in_single,
            b'[' | b'{' if !in_single && !in_double => depth += 1,
            b']' | b'}' if !in_single && !in_double => depth = depth.saturating_sub(1),
            b':' if !in_single && !in_double && depth == 0 => {
                if i + 1 == bytes.len() || bytes[i + 1] == b' ' {
                    return true;
                }
            }
            b'#' if !in_single && !in_double && i > 0 && bytes[i - 1] == b' ' => {
                return false;
            }
            _ => {}
        }
        i += 1;
    }
    false
}

/// Byte offset of a ` #` trailing comment, or `None`.
fn find_trailing_comment(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    (1..bytes.len()).find(|&i| bytes[i] == b'#' && bytes[i - 1] == b' ')
}

/// Fold lines: adjacent non-blank lines join with a space; blank lines and
/// margin-indented lines stay hard breaks.
fn fold_lines(body: &[String]) -> String {
    let mut out = String::new();
    let mut prev_text = false;
    for line in body {
        if line.is_empty() {
            out.push(LINE_FEED);
            prev_text = false;
        } else if line.starts_with(' ') {
            if prev_text {
                out.push(LINE_FEED);
            }
            out.push_str(line);
            out.push(LINE_FEED);
            prev_text = false;
        } else {
            if prev_text {
                out.push(' ');
            }
            out.push_str(line);
            prev_text = true;
        }
    }
    out
}

// ----------------------------------------------------------------------
// J string escaping
// ----------------------------------------------------------------------

/// Escape raw text to J string conventions. Hard-break sentinels become
/// `\n`; the three Unicode line terminators are re-encoded as `\uXXXX`.
pub(crate) fn escape_plain(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        escape_char(c, &mut out);
    }
    out
}

/// Escape a double-quoted body: existing backslash escapes pass through
/// untouched; everything else is escaped as in plain text.
fn escape_double_body(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            out.push('\\');
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            escape_char(c, &mut out);
        }
    }
    out
}

fn escape_char(c: char, out: &mut String) {
    match c {
        '"' => out.push_str("\\\""),
        '\\' => out.push_str("\\\\"),
        '\x08' => out.push_str("\\b"),
        '\t' => out.push_str("\\t"),
        '\n' | LINE_FEED => out.push_str("\\n"),
        '\x0c' => out.push_str("\\f"),
        '\r' => out.push_str("\\r"),
        '\u{0085}' => out.push_str("\\u0085"),
        '\u{2028}' => out.push_str("\\u2028"),
        '\u{2029}' => out.push_str("\\u2029"),
        c if (c as u32) < 0x20 => {
            out.push_str(&format!("\\u{:04x}", c as u32));
        }
        c => out.push(c),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::split_lines;

    fn scan_one(source: &str) -> Token {
        let lines = split_lines(source);
        let mut sc = Scanner::new(&lines);
        sc.next_token().unwrap().unwrap()
    }

    #[test]
    fn test_key_token() {
        let lines = split_lines("name: value");
        let mut sc = Scanner::new(&lines);
        let key = sc.next_token().unwrap().unwrap();
        assert_eq!(key.kind, TokenKind::Key);
        assert_eq!(key.text, "name");
        let value = sc.next_token().unwrap().unwrap();
        assert_eq!(value.kind, TokenKind::Value);
        assert_eq!(value.text, "value");
    }

    #[test]
    fn test_trailing_colon_is_key() {
        let tok = scan_one("name:");
        assert_eq!(tok.kind, TokenKind::Key);
        assert_eq!(tok.text, "name");
    }

    #[test]
    fn test_comment_skipping() {
        let lines = split_lines("# header\n\nname: 1");
        let mut sc = Scanner::new(&lines);
        let tok = sc.next_token().unwrap().unwrap();
        assert_eq!(tok.text, "name");
        assert_eq!(tok.line, 3);
    }

    #[test]
    fn test_trailing_comment_ends_scalar() {
        let lines = split_lines("a: hello # note");
        let mut sc = Scanner::new(&lines);
        sc.next_token().unwrap();
        let value = sc.next_token().unwrap().unwrap();
        assert_eq!(value.text, "hello");
    }

    #[test]
    fn test_tag_prefix() {
        let lines = split_lines("a: !!int 42");
        let mut sc = Scanner::new(&lines);
        sc.next_token().unwrap();
        let value = sc.next_token().unwrap().unwrap();
        assert_eq!(value.tag, Tag::Int);
        assert_eq!(value.text, "42");
    }

    #[test]
    fn test_unknown_builtin_tag() {
        let lines = split_lines("a: !!frob 42");
        let mut sc = Scanner::new(&lines);
        sc.next_token().unwrap();
        assert!(matches!(
            sc.next_token(),
            Err(ParseError::InvalidTag(1))
        ));
    }

    #[test]
    fn test_local_tag() {
        let lines = split_lines("a: !mine 42");
        let mut sc = Scanner::new(&lines);
        sc.next_token().unwrap();
        let value = sc.next_token().unwrap().unwrap();
        assert_eq!(value.tag, Tag::Local("mine".to_string()));
    }

    #[test]
    fn test_anchor_designator() {
        let lines = split_lines("a: &base 5");
        let mut sc = Scanner::new(&lines);
        sc.next_token().unwrap();
        let value = sc.next_token().unwrap().unwrap();
        assert_eq!(value.designator, "&base");
        assert_eq!(value.anchor, "base");
        assert_eq!(value.text, "5");
    }

    #[test]
    fn test_alias_with_value_fails() {
        let lines = split_lines("a: *base 5");
        let mut sc = Scanner::new(&lines);
        sc.next_token().unwrap();
        assert!(matches!(
            sc.next_token(),
            Err(ParseError::AliasValue(1))
        ));
    }

    #[test]
    fn test_double_quoted_escapes_pass_through() {
        let lines = split_lines(r#"a: "x\n\"y\"""#);
        let mut sc = Scanner::new(&lines);
        sc.next_token().unwrap();
        let value = sc.next_token().unwrap().unwrap();
        assert!(value.literal);
        assert_eq!(value.text, r#"x\n\"y\""#);
    }

    #[test]
    fn test_single_quoted_escaping() {
        let lines = split_lines("a: 'it''s \"x\"'");
        let mut sc = Scanner::new(&lines);
        sc.next_token().unwrap();
        let value = sc.next_token().unwrap().unwrap();
        assert!(value.literal);
        assert_eq!(value.text, "it's \\\"x\\\"");
    }

    #[test]
    fn test_unclosed_quote() {
        let lines = split_lines("a: \"never closed");
        let mut sc = Scanner::new(&lines);
        sc.next_token().unwrap();
        assert!(matches!(
            sc.next_token(),
            Err(ParseError::UnclosedLiteral(1))
        ));
    }

    #[test]
    fn test_literal_block_clip() {
        let lines = split_lines("a: |\n  one\n  two\nb: 1");
        let mut sc = Scanner::new(&lines);
        sc.next_token().unwrap();
        let value = sc.next_token().unwrap().unwrap();
        assert_eq!(value.text, "one\\ntwo\\n");
        let next_key = sc.next_token().unwrap().unwrap();
        assert_eq!(next_key.text, "b");
    }

    #[test]
    fn test_folded_block() {
        let lines = split_lines("a: >\n  one\n  two\n  three");
        let mut sc = Scanner::new(&lines);
        sc.next_token().unwrap();
        let value = sc.next_token().unwrap().unwrap();
        assert_eq!(value.text, "one two three\\n");
    }

    #[test]
    fn test_literal_block_keep() {
        let lines = split_lines("a: |+\n  a\n\n  b\n\nc: 1");
        let mut sc = Scanner::new(&lines);
        sc.next_token().unwrap();
        let value = sc.next_token().unwrap().unwrap();
        assert_eq!(value.text, "a\\n\\nb\\n\\n");
    }

    #[test]
    fn test_literal_block_strip() {
        let lines = split_lines("a: |-\n  x\n");
        let mut sc = Scanner::new(&lines);
        sc.next_token().unwrap();
        let value = sc.next_token().unwrap().unwrap();
        assert_eq!(value.text, "x");
    }

    #[test]
    fn test_plain_multiline_join() {
        let lines = split_lines("a: one\n  two\n  three\nb: 1");
        let mut sc = Scanner::new(&lines);
        sc.next_token().unwrap();
        let value = sc.next_token().unwrap().unwrap();
        assert_eq!(value.text, "one two three");
        assert!(value.multiline);
    }

    #[test]
    fn test_is_key_like() {
        assert!(is_key_like("a: 1"));
        assert!(is_key_like("a:"));
        assert!(!is_key_like("a:1"));
        assert!(!is_key_like("\"a: b\""));
        assert!(!is_key_like("[a: b]"));
        assert!(!is_key_like("plain text"));
    }

    #[test]
    fn test_escape_plain() {
        assert_eq!(escape_plain("a\"b\\c"), "a\\\"b\\\\c");
        assert_eq!(escape_plain("a\u{2028}b"), "a\\u2028b");
        assert_eq!(escape_plain(&format!("x{}y", LINE_FEED)), "x\\ny");
    }
}
