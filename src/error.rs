//! Information about a codec/validation failure and the location at which it occurred.

use std::fmt::{self, Display};

pub type Result<T> = std::result::Result<T, Error>;

// --- Error ------------------------------------------------------------------------------------

/// Details of a failure and the location in the data where the problem occurred.
///
/// An error consists of an [ErrorKind] that identifies the kind of error that occurred, and an
/// [ErrorLocation] that describes where in the data the problem occurred.
#[derive(Debug)]
#[non_exhaustive]
pub struct Error {
    kind: ErrorKind,
    location: ErrorLocation,
}

impl Error {
    pub(crate) fn new(kind: ErrorKind, location: ErrorLocation) -> Self {
        Self { kind, location }
    }

    pub(crate) fn at_offset(kind: ErrorKind, offset: usize) -> Self {
        Self::new(kind, ErrorLocation::at_offset(offset))
    }

    pub(crate) fn at_path(kind: ErrorKind, path: impl Into<String>) -> Self {
        Self::new(kind, ErrorLocation::at_path(path))
    }

    pub(crate) fn unlocated(kind: ErrorKind) -> Self {
        Self::new(kind, ErrorLocation::unknown())
    }

    /// Details about the kind of error that occurred.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Details about where in the data the error occurred.
    pub fn location(&self) -> &ErrorLocation {
        &self.location
    }
}

impl std::error::Error for Error {}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at {})", self.kind, self.location)
    }
}

// --- ErrorKind --------------------------------------------------------------------------------

/// The taxonomy of errors the core can report. None of these are raised as Rust panics or
/// unhandled exceptions; every core API returns them as a typed [Result].
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Truncated frame, invalid extended length, length overrun, or malformed structured
    /// document shape.
    #[error("parse error: {0}")]
    Parse(#[from] ParseErrorDetail),

    /// A TLV type unknown at the requested version (only ever fatal in strict validation;
    /// recoverable at parse time).
    #[error("schema error: {0}")]
    Schema(#[from] SchemaErrorDetail),

    /// Out-of-range integer, malformed IP/MAC, unknown enum name, or invalid UTF-8 with no hex
    /// fallback permitted.
    #[error("value error: {0}")]
    Value(#[from] ValueErrorDetail),

    /// A CM/CMTS MIC is missing or does not match its computed value.
    #[error("MIC error: {0}")]
    Mic(#[from] MicErrorDetail),

    /// Schema/range/required-TLV validation failure (only produced by [crate::validate] when
    /// `strict` escalates warnings, or when a caller asks for a hard failure).
    #[error("validation error: {0}")]
    Validation(#[from] ValidationErrorDetail),
}

#[derive(thiserror::Error, Debug)]
pub enum ParseErrorDetail {
    #[error("unexpected end of input, expected {expected} more byte(s)")]
    Truncated { expected: usize },

    #[error("TLV value of length {length} at offset {offset} overruns the enclosing frame")]
    LengthOverrun { length: usize, offset: usize },

    #[error("invalid extended length encoding")]
    InvalidExtendedLength,

    #[error("invalid hex scalar: {0}")]
    InvalidHex(String),

    #[error("invalid structured document: {0}")]
    InvalidDocument(String),

    #[error("invalid config text syntax: {0}")]
    InvalidConfigSyntax(String),

    #[error("unknown identifier '{0}' in config text")]
    UnknownIdentifier(String),
}

#[derive(thiserror::Error, Debug)]
pub enum SchemaErrorDetail {
    #[error("TLV type {type_} is not defined for version {version}")]
    UnsupportedTlvType { type_: u16, version: String },

    #[error("sub-TLV type {subtype} of parent {parent} is not defined for version {version}")]
    UnsupportedSubTlvType {
        parent: u16,
        subtype: u8,
        version: String,
    },
}

#[derive(thiserror::Error, Debug)]
pub enum ValueErrorDetail {
    #[error("integer {value} out of range for a {bits}-bit field")]
    IntegerOutOfRange { value: i64, bits: u8 },

    #[error("malformed IPv4 address: {0}")]
    MalformedIpv4(String),

    #[error("malformed IPv6 address: {0}")]
    MalformedIpv6(String),

    #[error("malformed MAC address: {0}")]
    MalformedMac(String),

    #[error("unknown enum name '{0}'")]
    UnknownEnumName(String),

    #[error("string is not valid UTF-8 and no hex fallback is permitted here")]
    InvalidUtf8,

    #[error("odd number of hex digits in '{0}'")]
    OddHexDigits(String),

    #[error("value kind mismatch: expected {expected}, formatted value was {actual}")]
    KindMismatch {
        expected: &'static str,
        actual: &'static str,
    },
}

#[derive(thiserror::Error, Debug)]
pub enum MicErrorDetail {
    #[error("CM MIC (TLV 6) is missing")]
    CmMissing,

    #[error("CMTS MIC (TLV 7) is missing")]
    CmtsMissing,

    #[error("CM MIC mismatch: stored {stored}, computed {computed}")]
    CmInvalid { stored: String, computed: String },

    #[error("CMTS MIC mismatch: stored {stored}, computed {computed}")]
    CmtsInvalid { stored: String, computed: String },

    #[error("TLV {type_} has length {length}, expected 16 for a MIC")]
    UnexpectedLength { type_: u8, length: usize },
}

#[derive(thiserror::Error, Debug)]
pub enum ValidationErrorDetail {
    #[error("{count} validation error(s) present in strict mode")]
    ErrorsPresent { count: usize },
}

// --- ErrorLocation ------------------------------------------------------------------------------

/// Where in the input the error occurred: a byte offset for binary input, a JSON/YAML path for
/// structured input, or a TLV path (e.g. `[24].1`) for tree-relative errors.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ErrorLocation {
    offset: Option<usize>,
    path: Option<String>,
}

impl ErrorLocation {
    pub(crate) fn unknown() -> Self {
        Self::default()
    }

    pub(crate) fn at_offset(offset: usize) -> Self {
        Self {
            offset: Some(offset),
            path: None,
        }
    }

    pub(crate) fn at_path(path: impl Into<String>) -> Self {
        Self {
            offset: None,
            path: Some(path.into()),
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.offset.is_none() && self.path.is_none()
    }

    pub fn offset(&self) -> Option<usize> {
        self.offset
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }
}

impl Display for ErrorLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.offset, &self.path) {
            (Some(offset), Some(path)) => write!(f, "offset {offset}, path {path}"),
            (Some(offset), None) => write!(f, "offset {offset}"),
            (None, Some(path)) => write!(f, "path {path}"),
            (None, None) => f.write_str("unknown location"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind_and_location() {
        let err = Error::at_offset(
            ErrorKind::Parse(ParseErrorDetail::Truncated { expected: 3 }),
            12,
        );
        let msg = err.to_string();
        assert!(msg.contains("offset 12"));
        assert!(msg.contains("3 more byte"));
    }

    #[test]
    fn unlocated_error_reports_unknown_location() {
        let err = Error::unlocated(ErrorKind::Mic(MicErrorDetail::CmMissing));
        assert!(err.location().is_unknown());
    }
}
