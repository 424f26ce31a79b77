//! Error types for auxiliary data encoding/decoding.

use thiserror::Error;

/// Error codes grouping the error variants below.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// E001: Malformed type descriptor
    MalformedTypeName,
    /// E002: Wrong number of subtypes, or wrong tuple length
    Arity,
    /// E003: Type name not present in the registry
    UnknownCodec,
    /// E004: Invalid UTF-8 encoding
    InvalidUtf8,
    /// E005: Truncated or otherwise malformed bytes
    MalformedEncoding,
    /// E006: Value does not match the codec it was encoded with
    TypeMismatch,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "E001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::MalformedTypeName => "E001",
            ErrorCode::Arity => "E002",
            ErrorCode::UnknownCodec => "E003",
            ErrorCode::InvalidUtf8 => "E004",
            ErrorCode::MalformedEncoding => "E005",
            ErrorCode::TypeMismatch => "E006",
        }
    }
}

/// Malformed type descriptor.
///
/// Always carries the complete descriptor that failed to parse, never the
/// fragment the parser was looking at.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[E001] malformed type name: '{descriptor}'")]
pub struct TypeNameError {
    pub descriptor: String,
}

impl TypeNameError {
    pub fn new(descriptor: impl Into<String>) -> Self {
        Self {
            descriptor: descriptor.into(),
        }
    }
}

/// Error during binary decoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error(transparent)]
    TypeName(#[from] TypeNameError),

    // === E002: Arity ===
    #[error("[E002] {codec} expects {expected} subtype(s), got {actual}")]
    Arity {
        codec: &'static str,
        expected: &'static str,
        actual: usize,
    },

    // === E003: Unknown codec ===
    #[error("[E003] unknown codec: {name}")]
    UnknownCodec { name: String },

    // === E004: Invalid UTF-8 ===
    #[error("[E004] invalid UTF-8 in {field}")]
    InvalidUtf8 { field: &'static str },

    // === E005: Malformed encoding ===
    #[error("[E005] unexpected end of input while reading {context}")]
    UnexpectedEof { context: &'static str },

    #[error("[E005] {field} length {len} does not fit in memory")]
    LengthOverflow { field: &'static str, len: u64 },

    #[error("[E005] failed to read input: {0}")]
    Io(String),
}

impl DecodeError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            DecodeError::TypeName(_) => ErrorCode::MalformedTypeName,
            DecodeError::Arity { .. } => ErrorCode::Arity,
            DecodeError::UnknownCodec { .. } => ErrorCode::UnknownCodec,
            DecodeError::InvalidUtf8 { .. } => ErrorCode::InvalidUtf8,
            _ => ErrorCode::MalformedEncoding,
        }
    }
}

/// Error during binary encoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    #[error(transparent)]
    TypeName(#[from] TypeNameError),

    #[error("[E002] {codec} expects {expected} subtype(s), got {actual}")]
    Arity {
        codec: &'static str,
        expected: &'static str,
        actual: usize,
    },

    #[error("[E002] tuple has {actual} elements but the type has {expected} subtypes")]
    TupleLength { expected: usize, actual: usize },

    #[error("[E003] unknown codec: {name}")]
    UnknownCodec { name: String },

    #[error("[E006] {codec} codec cannot encode a {found} value")]
    TypeMismatch {
        codec: &'static str,
        found: &'static str,
    },
}

impl EncodeError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            EncodeError::TypeName(_) => ErrorCode::MalformedTypeName,
            EncodeError::Arity { .. } | EncodeError::TupleLength { .. } => ErrorCode::Arity,
            EncodeError::UnknownCodec { .. } => ErrorCode::UnknownCodec,
            EncodeError::TypeMismatch { .. } => ErrorCode::TypeMismatch,
        }
    }
}
