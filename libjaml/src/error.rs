//! Error types for Y/J conversion.
//!
//! Every parse and resolve failure carries the offending 1-based source
//! line. Partial output is never delivered: the emitter only runs after the
//! element list resolved cleanly.

use thiserror::Error;

/// Result type for conversion operations.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Error type for Y parsing, resolution, and the J sub-parser.
#[derive(Error, Debug)]
pub enum ParseError {
    /// Collection item marker in a position that cannot hold one.
    #[error("collection item not allowed here (line {0})")]
    CollectionItem(usize),

    /// Malformed inline array syntax.
    #[error("invalid inline array (line {0})")]
    InvalidArray(usize),

    /// Content at an indentation no construct can claim.
    #[error("invalid indentation (line {0})")]
    InvalidIndent(usize),

    /// Anchor or alias name is missing or not an identifier.
    #[error("invalid anchor or alias name (line {0})")]
    AnchorAliasName(usize),

    /// Anchor name defined more than once.
    #[error("duplicate anchor name \"{0}\" (line {1})")]
    DuplicateAnchor(String, usize),

    /// Block scalar modifier on a collection item lead.
    #[error("block modifier not allowed on a collection item (line {0})")]
    CollectionBlock(usize),

    /// Malformed block scalar header.
    #[error("invalid block scalar header (line {0})")]
    InvalidBlock(usize),

    /// Quoted scalar not closed before end of input.
    #[error("unclosed quoted scalar (line {0})")]
    UnclosedLiteral(usize),

    /// Mapping key with no name.
    #[error("empty key name (line {0})")]
    KeyNameEmpty(usize),

    /// Mapping key spanning multiple lines.
    #[error("key name cannot span lines (line {0})")]
    KeyNameMultiline(usize),

    /// Anchor or alias attached to a mapping key.
    #[error("anchor or alias not allowed on a key (line {0})")]
    KeyNameAnchorAlias(usize),

    /// Forbidden character in an unquoted key.
    #[error("invalid character in key name (line {0})")]
    KeyNameInvalidChar(usize),

    /// Alias followed by a scalar value.
    #[error("alias cannot carry a value (line {0})")]
    AliasValue(usize),

    /// Unrecognized `!!` tag.
    #[error("invalid tag (line {0})")]
    InvalidTag(usize),

    /// Mapping position holds something other than a key.
    #[error("expected a key (line {0})")]
    ExpectedKey(usize),

    /// Two identical keys in one mapping with the policy off.
    #[error("duplicated key \"{0}\" (line {1})")]
    DuplicatedKey(String, usize),

    /// Merge key inside an inline array.
    #[error("merge key not allowed in an inline array (line {0})")]
    MergeInArray(usize),

    /// Collection item inside an inline array.
    #[error("collection item not allowed in an inline array (line {0})")]
    CollectionInArray(usize),

    /// Inline array not closed before end of input.
    #[error("unclosed inline array (line {0})")]
    UnclosedArray(usize),

    /// Alias names an anchor that does not exist.
    #[error("anchor \"{0}\" not found (line {1})")]
    AnchorNotFound(String, usize),

    /// Alias expansion would recurse into itself.
    #[error("recursive alias \"{0}\" (line {1})")]
    AliasRecursive(String, usize),

    /// Merge key referencing a scalar anchor.
    #[error("merge requires an anchored mapping, not a single value (line {0})")]
    MergeSingleValue(usize),

    /// Merge key without an alias reference.
    #[error("merge key requires an alias value (line {0})")]
    MergeInvalid(usize),

    /// Scalar cannot satisfy its explicit tag.
    #[error("value does not match tag {0} (line {1})")]
    InvalidValueForTag(String, usize),

    /// The J sub-parser rejected its input.
    #[error("parse error: {0}")]
    JsonParsing(#[from] serde_json::Error),

    /// The J document root is a scalar.
    #[error("root must be array or object")]
    JsonRoot,
}
