//! The flat element list: the pivot representation between parsing and
//! emission.
//!
//! Nested containers are expressed by open/close marker elements (`{` `}`
//! `[` `]`) carried with empty keys, bracketing their children at one
//! deeper logical indent. The logical indent is a nesting depth computed by
//! the builder, not a source column, which makes anchor expansion a pure
//! range-copy and merge expansion a range-splice.

use std::fmt;

/// Explicit tag attached to a scalar.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) enum Tag {
    #[default]
    None,
    Str,
    Int,
    Float,
    Bool,
    Null,
    Map,
    Seq,
    Binary,
    Timestamp,
    /// Application-local `!name` tag.
    Local(String),
}

impl Tag {
    /// Resolve a builtin `!!name` tag, case-insensitively.
    pub fn builtin(name: &str) -> Option<Tag> {
        match name.to_ascii_lowercase().as_str() {
            "str" => Some(Tag::Str),
            "int" => Some(Tag::Int),
            "float" => Some(Tag::Float),
            "bool" => Some(Tag::Bool),
            "null" => Some(Tag::Null),
            "map" => Some(Tag::Map),
            "seq" => Some(Tag::Seq),
            "binary" => Some(Tag::Binary),
            "timestamp" => Some(Tag::Timestamp),
            _ => None,
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tag::None => Ok(()),
            Tag::Str => write!(f, "!!str"),
            Tag::Int => write!(f, "!!int"),
            Tag::Float => write!(f, "!!float"),
            Tag::Bool => write!(f, "!!bool"),
            Tag::Null => write!(f, "!!null"),
            Tag::Map => write!(f, "!!map"),
            Tag::Seq => write!(f, "!!seq"),
            Tag::Binary => write!(f, "!!binary"),
            Tag::Timestamp => write!(f, "!!timestamp"),
            Tag::Local(name) => write!(f, "!{}", name),
        }
    }
}

/// One record of the element list.
#[derive(Debug, Clone, Default)]
pub(crate) struct Element {
    /// Scalar key, or empty for array items and container markers.
    pub key: String,
    /// Scalar value text, a container marker (`{` `}` `[` `]`), the `null`
    /// marker, or empty when a container opener follows.
    pub value: String,
    /// Logical nesting depth, not a source column.
    pub indent: usize,
    /// True when the scalar came from a quoted form.
    pub literal: bool,
    /// Raw alias/anchor designator (`*name` or `&name`), empty if none.
    pub alias: String,
    /// Anchor name when this element defines one.
    pub anchor: String,
    /// One-based source line for error reporting.
    pub line: usize,
    /// Explicit tag, if any.
    pub tag: Tag,
}

impl Element {
    /// Container opener at the given depth.
    pub fn open(marker: char, indent: usize, line: usize) -> Element {
        Element {
            value: marker.to_string(),
            indent,
            line,
            ..Element::default()
        }
    }

    /// Container closer at the given depth.
    pub fn close(marker: char, indent: usize, line: usize) -> Element {
        Element::open(marker, indent, line)
    }

    /// True for `{` and `[` marker elements.
    pub fn is_opener(&self) -> bool {
        self.key.is_empty() && (self.value == "{" || self.value == "[")
    }

    /// True for `}` and `]` marker elements.
    pub fn is_closer(&self) -> bool {
        self.key.is_empty() && (self.value == "}" || self.value == "]")
    }

    /// True for any of the four container markers.
    pub fn is_marker(&self) -> bool {
        self.is_opener() || self.is_closer()
    }
}

/// Index just past the subtree whose opener sits at `open_idx`.
///
/// The matching closer is the next marker at the opener's indent; children
/// all sit deeper.
pub(crate) fn subtree_end(elements: &[Element], open_idx: usize) -> usize {
    debug_assert!(elements[open_idx].is_opener());
    let depth = elements[open_idx].indent;
    let mut i = open_idx + 1;
    while i < elements.len() {
        if elements[i].is_closer() && elements[i].indent == depth {
            return i + 1;
        }
        i += 1;
    }
    elements.len()
}

/// Index just past the whole entry starting at `idx`: a scalar element
/// alone, or a key/item element together with the container subtree it
/// owns.
pub(crate) fn entry_end(elements: &[Element], idx: usize) -> usize {
    if elements[idx].is_opener() {
        return subtree_end(elements, idx);
    }
    if elements[idx].value.is_empty()
        && idx + 1 < elements.len()
        && elements[idx + 1].is_opener()
        && elements[idx + 1].indent == elements[idx].indent
    {
        return subtree_end(elements, idx + 1);
    }
    idx + 1
}
