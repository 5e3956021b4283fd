//! Phase 3: Structure builder
//!
//! Three mutually recursive builders consume the scanner and emit the flat
//! element list: block mappings, block sequences, and inline arrays. Each
//! container contributes an opening and a closing marker element at the
//! container's logical depth, with its children one deeper.
//!
//! The logical depth threaded through the recursion is what the emitter
//! uses; the source columns (`src_col`, `key_col`) only decide where each
//! construct ends.

use crate::element::Element;
use crate::error::{ParseError, Result};
use crate::line::SourceLine;
use crate::scan::{is_key_like, Scanner, TokenKind};
use std::collections::HashSet;

/// Build the element list for a document.
pub(crate) fn build(lines: &[SourceLine], allow_duplicate_keys: bool) -> Result<Vec<Element>> {
    let mut b = Builder {
        sc: Scanner::new(lines),
        out: Vec::new(),
        anchors: HashSet::new(),
        allow_duplicate_keys,
    };
    if !b.sc.skip_blank() {
        // A blank document converts to an empty mapping.
        b.out.push(Element::open('{', 0, 1));
        b.out.push(Element::close('}', 0, 1));
        return Ok(b.out);
    }
    let col = b.sc.indent;
    let line = b.sc.line_number();
    if b.sc.has_item_lead() {
        b.sequence(col, 0)?;
    } else if b.sc.rest.trim_start().starts_with('[') {
        b.sc.rest = b.sc.rest.trim_start()[1..].to_string();
        b.sc.line_start = false;
        b.inline_array(0)?;
    } else if b.sc.rest.trim() == "{}" {
        b.sc.rest.clear();
        b.out.push(Element::open('{', 0, line));
        b.out.push(Element::close('}', 0, line));
    } else {
        b.mapping(col, 0)?;
    }
    if b.sc.skip_blank() {
        return Err(ParseError::InvalidIndent(b.sc.line_number()));
    }
    Ok(b.out)
}

struct Builder<'a> {
    sc: Scanner<'a>,
    out: Vec<Element>,
    anchors: HashSet<String>,
    allow_duplicate_keys: bool,
}

impl Builder<'_> {
    /// Push an element, registering any anchor it defines.
    fn push(&mut self, el: Element) -> Result<()> {
        if !el.anchor.is_empty() && !self.anchors.insert(el.anchor.clone()) {
            return Err(ParseError::DuplicateAnchor(el.anchor, el.line));
        }
        self.out.push(el);
        Ok(())
    }

    /// Consume a `{}` empty-mapping literal if the remaining line is one.
    fn take_empty_mapping(&mut self) -> bool {
        if let Some(after) = self.sc.rest.strip_prefix("{}") {
            let after = after.trim_start();
            if after.is_empty() || after.starts_with('#') {
                self.sc.rest.clear();
                self.sc.line_start = false;
                return true;
            }
        }
        false
    }

    // ------------------------------------------------------------------
    // Mappings
    // ------------------------------------------------------------------

    /// Build a block mapping whose keys sit at `src_col`. The first key
    /// may start mid-line (tuple-in-item).
    fn mapping(&mut self, src_col: usize, depth: usize) -> Result<()> {
        self.out.push(Element::open('{', depth, self.sc.line_number()));
        let open_idx = self.out.len() - 1;
        loop {
            if !self.sc.skip_blank() {
                break;
            }
            if self.sc.line_start {
                if self.sc.indent < src_col {
                    break;
                }
                if self.sc.indent > src_col {
                    return Err(ParseError::InvalidIndent(self.sc.line_number()));
                }
                if self.sc.has_item_lead() {
                    return Err(ParseError::CollectionItem(self.sc.line_number()));
                }
            }
            let key_col = if self.sc.line_start {
                self.sc.indent
            } else {
                src_col
            };
            let tok = match self.sc.next_token()? {
                Some(t) => t,
                None => break,
            };
            if tok.kind != TokenKind::Key {
                return Err(ParseError::ExpectedKey(tok.line));
            }
            if !self.allow_duplicate_keys {
                let dup = self.out[open_idx + 1..]
                    .iter()
                    .any(|e| e.indent == depth + 1 && !e.key.is_empty() && e.key == tok.text);
                if dup {
                    return Err(ParseError::DuplicatedKey(tok.text, tok.line));
                }
            }
            let el = Element {
                key: tok.text,
                indent: depth + 1,
                line: tok.line,
                ..Element::default()
            };
            self.read_value(el, key_col, depth)?;
        }
        self.out
            .push(Element::close('}', depth, self.sc.line_number()));
        Ok(())
    }

    /// Read the value owned by the key element `el`, dispatching into a
    /// nested builder when the value is a container.
    fn read_value(&mut self, mut el: Element, key_col: usize, depth: usize) -> Result<()> {
        if !self.sc.skip_blank() {
            // On EOF the value is null.
            return self.push(el);
        }
        if self.sc.line_start {
            // A sequence may sit at the key's own column.
            if self.sc.indent == key_col && self.sc.has_item_lead() {
                let col = self.sc.indent;
                self.push(el)?;
                return self.sequence(col, depth + 1);
            }
            if self.sc.indent <= key_col {
                // Next entry belongs to this or an outer container.
                return self.push(el);
            }
            return self.nested_value(el, depth);
        }

        // Same-line value.
        self.sc.rest = self.sc.rest.trim_start().to_string();
        if self.take_empty_mapping() {
            let line = el.line;
            let indent = el.indent;
            self.push(el)?;
            self.out.push(Element::open('{', indent, line));
            self.out.push(Element::close('}', indent, line));
            return Ok(());
        }
        if self.sc.has_item_lead() {
            return Err(ParseError::CollectionItem(self.sc.line_number()));
        }
        let tok = match self.sc.next_token()? {
            Some(t) => t,
            None => return self.push(el),
        };
        if tok.kind == TokenKind::Key {
            return Err(ParseError::InvalidIndent(tok.line));
        }
        el.literal = tok.literal;
        el.tag = tok.tag;
        el.alias = tok.designator;
        if el.alias.starts_with('&') {
            el.anchor = tok.anchor;
        }
        if tok.text == "[" {
            self.push(el)?;
            return self.inline_array(depth + 1);
        }
        if tok.text.is_empty() && !el.alias.starts_with('*') {
            // Anchor or tag with no same-line scalar: the value may be a
            // nested block on deeper lines.
            if self.sc.skip_blank() && self.sc.line_start && self.sc.indent > key_col {
                return self.nested_value(el, depth);
            }
            if self.sc.line_start && self.sc.indent == key_col && self.sc.has_item_lead() {
                let col = self.sc.indent;
                self.push(el)?;
                return self.sequence(col, depth + 1);
            }
            return self.push(el);
        }
        el.value = tok.text;
        self.push(el)
    }

    /// Build the nested block value starting at the current (deeper) line.
    /// `el` is the owning key or item element; its value stays empty.
    fn nested_value(&mut self, mut el: Element, depth: usize) -> Result<()> {
        let col = self.sc.indent;
        if self.sc.has_item_lead() {
            self.push(el)?;
            return self.sequence(col, depth + 1);
        }
        if self.sc.rest.trim_start().starts_with('[') {
            self.sc.rest = self.sc.rest.trim_start()[1..].to_string();
            self.sc.line_start = false;
            self.push(el)?;
            return self.inline_array(depth + 1);
        }
        if is_key_like(&self.sc.rest) {
            self.push(el)?;
            return self.mapping(col, depth + 1);
        }
        // Deeper scalar: merge the scanned token into the owner element.
        let tok = match self.sc.next_token()? {
            Some(t) => t,
            None => return self.push(el),
        };
        if tok.kind == TokenKind::Key {
            return Err(ParseError::InvalidIndent(tok.line));
        }
        if el.tag == crate::element::Tag::None {
            el.tag = tok.tag;
        }
        if el.alias.is_empty() {
            el.alias = tok.designator;
            if el.alias.starts_with('&') {
                el.anchor = tok.anchor;
            }
        }
        if tok.text == "[" {
            self.push(el)?;
            return self.inline_array(depth + 1);
        }
        el.value = tok.text;
        el.literal = tok.literal;
        self.push(el)
    }

    // ------------------------------------------------------------------
    // Sequences
    // ------------------------------------------------------------------

    /// Build a block sequence whose items sit at `src_col`. The first item
    /// may start mid-line (`- - x`).
    fn sequence(&mut self, src_col: usize, depth: usize) -> Result<()> {
        self.out.push(Element::open('[', depth, self.sc.line_number()));
        let mut first = true;
        loop {
            if !self.sc.skip_blank() {
                break;
            }
            if !(first && !self.sc.line_start) {
                if !self.sc.line_start {
                    break;
                }
                if self.sc.indent != src_col {
                    if self.sc.indent > src_col {
                        return Err(ParseError::InvalidIndent(self.sc.line_number()));
                    }
                    break;
                }
                if !self.sc.has_item_lead() {
                    break;
                }
            }
            first = false;
            let item_line = self.sc.line_number();
            let off = match self.sc.take_item_lead() {
                Some(off) => off,
                None => break,
            };
            self.sequence_item(src_col + off, depth, item_line)?;
        }
        self.out
            .push(Element::close(']', depth, self.sc.line_number()));
        Ok(())
    }

    /// Build one collection item whose head follows the dash.
    fn sequence_item(&mut self, item_col: usize, depth: usize, item_line: usize) -> Result<()> {
        if self.sc.rest.starts_with('|') || self.sc.rest.starts_with('>') {
            return Err(ParseError::CollectionBlock(item_line));
        }
        if self.take_empty_mapping() {
            self.out.push(Element::open('{', depth + 1, item_line));
            self.out.push(Element::close('}', depth + 1, item_line));
            return Ok(());
        }
        if self.sc.rest.trim_start().starts_with('#') {
            self.sc.rest.clear();
        }
        if self.sc.rest.trim().is_empty() {
            // Bare dash: the item is a nested block on deeper lines, or null.
            self.sc.rest.clear();
            let el = Element {
                indent: depth + 1,
                line: item_line,
                ..Element::default()
            };
            if self.sc.skip_blank() && self.sc.line_start && self.sc.indent > item_col - 1 {
                return self.nested_value(el, depth);
            }
            return self.push(el);
        }
        if self.sc.has_item_lead() {
            return self.sequence(item_col, depth + 1);
        }
        if self.sc.rest.starts_with('[') {
            self.sc.rest = self.sc.rest[1..].to_string();
            self.sc.line_start = false;
            return self.inline_array(depth + 1);
        }
        if is_key_like(&self.sc.rest) {
            return self.mapping(item_col, depth + 1);
        }
        // Scalar item.
        let mark = self.sc.mark();
        let tok = match self.sc.next_token()? {
            Some(t) => t,
            None => {
                return self.push(Element {
                    indent: depth + 1,
                    line: item_line,
                    ..Element::default()
                })
            }
        };
        if tok.kind == TokenKind::Key {
            // The key-likeness check missed (multi-line edge); rebuild as a
            // mapping from the saved position.
            self.sc.restore(mark);
            return self.mapping(item_col, depth + 1);
        }
        let mut el = Element {
            indent: depth + 1,
            line: tok.line,
            literal: tok.literal,
            tag: tok.tag,
            alias: tok.designator,
            ..Element::default()
        };
        if el.alias.starts_with('&') {
            el.anchor = tok.anchor;
        }
        if tok.text == "[" {
            self.push(el)?;
            return self.inline_array(depth + 1);
        }
        if tok.text.is_empty() && !el.alias.starts_with('*') {
            // Anchored or tagged item whose body sits on deeper lines.
            if self.sc.skip_blank() && self.sc.line_start && self.sc.indent >= item_col {
                return self.nested_value(el, depth);
            }
            return self.push(el);
        }
        el.value = tok.text;
        self.push(el)
    }

    // ------------------------------------------------------------------
    // Inline arrays
    // ------------------------------------------------------------------

    /// Build an inline `[ ... ]` array. The opening bracket has already
    /// been consumed by the caller.
    fn inline_array(&mut self, depth: usize) -> Result<()> {
        let open_line = self.sc.line_number();
        let was_inline = self.sc.in_inline;
        self.sc.in_inline = true;
        self.out.push(Element::open('[', depth, open_line));

        #[derive(PartialEq)]
        enum Sep {
            Open,
            Value,
            Comma,
        }
        let mut state = Sep::Open;
        let outcome = loop {
            if !self.sc.skip_blank() {
                break Err(ParseError::UnclosedArray(open_line));
            }
            self.sc.rest = self.sc.rest.trim_start().to_string();
            let line = self.sc.line_number();
            if self.sc.rest.starts_with(']') {
                self.sc.rest = self.sc.rest[1..].to_string();
                self.sc.line_start = false;
                if state == Sep::Comma {
                    // A null sneaks in only after a comma separator.
                    self.out.push(Element {
                        indent: depth + 1,
                        line,
                        ..Element::default()
                    });
                }
                break Ok(());
            }
            if self.sc.rest.starts_with(',') {
                self.sc.rest = self.sc.rest[1..].to_string();
                self.sc.line_start = false;
                if state != Sep::Value {
                    self.out.push(Element {
                        indent: depth + 1,
                        line,
                        ..Element::default()
                    });
                }
                state = Sep::Comma;
                continue;
            }
            if state == Sep::Value {
                break Err(ParseError::InvalidArray(line));
            }
            if self.sc.rest.starts_with('[') {
                self.sc.rest = self.sc.rest[1..].to_string();
                self.sc.line_start = false;
                if let Err(e) = self.inline_array(depth + 1) {
                    break Err(e);
                }
                state = Sep::Value;
                continue;
            }
            if self.sc.has_item_lead() {
                break Err(ParseError::CollectionInArray(line));
            }
            let tok = match self.sc.next_token()? {
                Some(t) => t,
                None => break Err(ParseError::UnclosedArray(open_line)),
            };
            match tok.kind {
                TokenKind::Key => {
                    if tok.text == "<<" {
                        break Err(ParseError::MergeInArray(tok.line));
                    }
                    // Each keyed inline entry becomes a one-field object.
                    if let Err(e) = self.inline_tuple(tok.text, tok.line, depth) {
                        break Err(e);
                    }
                    state = Sep::Value;
                }
                TokenKind::Value => {
                    if tok.text == "[" {
                        // Prefixed nested array; the anchor rides on its
                        // opener marker.
                        let open_idx = self.out.len();
                        if let Err(e) = self.inline_array(depth + 1) {
                            break Err(e);
                        }
                        if !tok.anchor.is_empty() {
                            if !self.anchors.insert(tok.anchor.clone()) {
                                break Err(ParseError::DuplicateAnchor(tok.anchor, tok.line));
                            }
                            self.out[open_idx].anchor = tok.anchor;
                            self.out[open_idx].alias = tok.designator;
                        }
                        state = Sep::Value;
                        continue;
                    }
                    let mut el = Element {
                        indent: depth + 1,
                        line: tok.line,
                        literal: tok.literal,
                        tag: tok.tag,
                        alias: tok.designator,
                        value: tok.text,
                        ..Element::default()
                    };
                    if el.alias.starts_with('&') {
                        el.anchor = tok.anchor;
                    }
                    if let Err(e) = self.push(el) {
                        break Err(e);
                    }
                    state = Sep::Value;
                }
            }
        };
        self.sc.in_inline = was_inline;
        outcome?;
        self.out
            .push(Element::close(']', depth, self.sc.line_number()));

        if !was_inline {
            let after = self.sc.rest.trim_start().to_string();
            if !after.is_empty() && !after.starts_with('#') {
                return Err(ParseError::InvalidArray(self.sc.line_number()));
            }
            self.sc.rest.clear();
        }
        Ok(())
    }

    /// Build the `{ key: value }` wrapper for a keyed inline entry.
    fn inline_tuple(&mut self, key: String, line: usize, depth: usize) -> Result<()> {
        self.out.push(Element::open('{', depth + 1, line));
        let mut el = Element {
            key,
            indent: depth + 2,
            line,
            ..Element::default()
        };
        self.sc.rest = self.sc.rest.trim_start().to_string();
        if self.sc.rest.starts_with('[') {
            self.sc.rest = self.sc.rest[1..].to_string();
            self.sc.line_start = false;
            self.push(el)?;
            self.inline_array(depth + 2)?;
        } else {
            let mark = self.sc.mark();
            match self.sc.next_token()? {
                None => {
                    // The enclosing loop reports the unclosed array.
                }
                Some(vt) if vt.text == "," || vt.text == "]" => {
                    // Empty tuple value; hand the separator back.
                    self.sc.restore(mark);
                }
                Some(vt) if vt.kind == TokenKind::Key => {
                    return Err(ParseError::InvalidArray(vt.line));
                }
                Some(vt) if vt.text == "[" => {
                    el.tag = vt.tag;
                    el.alias = vt.designator;
                    if el.alias.starts_with('&') {
                        el.anchor = vt.anchor;
                    }
                    self.push(el)?;
                    self.inline_array(depth + 2)?;
                    self.out.push(Element::close('}', depth + 1, line));
                    return Ok(());
                }
                Some(vt) => {
                    el.value = vt.text;
                    el.literal = vt.literal;
                    el.tag = vt.tag;
                    el.alias = vt.designator;
                    if el.alias.starts_with('&') {
                        el.anchor = vt.anchor;
                    }
                }
            }
            self.push(el)?;
        }
        self.out.push(Element::close('}', depth + 1, line));
        Ok(())
    }
}
