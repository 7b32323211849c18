//! Error types for calltable encoding, JSON decoding and key parsing.

use thiserror::Error;

/// Error categories shared by every error type in this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A key string or key byte sequence has the wrong length or shape.
    MalformedAddress,
    /// A mixed-case hex string failed its checksum.
    ChecksumMismatch,
    /// A calltable index was used twice.
    DuplicateField,
    /// A JSON document (or binary envelope) does not match the expected schema.
    PayloadDecode,
    /// A transform document lacks `key` or `transform`.
    IncompleteTransform,
    /// A transform discriminant is not part of the closed set.
    UnknownDiscriminant,
    /// The requested conversion is not supported for this value.
    UnsupportedOperation,
}

impl ErrorKind {
    /// Returns the category name.
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::MalformedAddress => "MalformedAddress",
            ErrorKind::ChecksumMismatch => "ChecksumMismatch",
            ErrorKind::DuplicateField => "DuplicateField",
            ErrorKind::PayloadDecode => "PayloadDecode",
            ErrorKind::IncompleteTransform => "IncompleteTransform",
            ErrorKind::UnknownDiscriminant => "UnknownDiscriminant",
            ErrorKind::UnsupportedOperation => "UnsupportedOperation",
        }
    }
}

/// Error while parsing a global-state key, account hash or public key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("malformed key {key:?}: {reason}")]
    MalformedAddress { key: String, reason: &'static str },

    #[error("checksum mismatch in key {key:?}")]
    ChecksumMismatch { key: String },

    #[error("{context} requires {expected} bytes, found {found}")]
    InvalidLength {
        context: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("unknown {context} tag: {tag}")]
    UnknownTag { context: &'static str, tag: u8 },
}

impl KeyError {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            KeyError::ChecksumMismatch { .. } => ErrorKind::ChecksumMismatch,
            _ => ErrorKind::MalformedAddress,
        }
    }
}

/// Error during encoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("calltable field index {index} added twice")]
    DuplicateField { index: u16 },

    #[error("{field} length {len} exceeds maximum {max}")]
    LengthExceedsLimit {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("cannot render {field} as JSON: {message}")]
    Json { field: &'static str, message: String },

    #[error("timestamp {millis} ms exceeds maximum {max} ms")]
    TimestampOutOfRange { millis: u64, max: u64 },
}

impl EncodeError {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EncodeError::DuplicateField { .. } => ErrorKind::DuplicateField,
            EncodeError::LengthExceedsLimit { .. }
            | EncodeError::Json { .. }
            | EncodeError::TimestampOutOfRange { .. } => ErrorKind::PayloadDecode,
        }
    }
}

/// Error during decoding of a binary envelope or a JSON document.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    // === binary envelope ===
    #[error("unexpected end of input while reading {context}")]
    UnexpectedEof { context: &'static str },

    #[error("{field} length {len} exceeds maximum {max}")]
    LengthExceedsLimit {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("invalid UTF-8 in {field}")]
    InvalidUtf8 { field: &'static str },

    #[error("{count} trailing bytes after {context}")]
    TrailingBytes { context: &'static str, count: usize },

    #[error("calltable field index {index} appears twice")]
    DuplicateField { index: u16 },

    // === JSON documents ===
    #[error("invalid JSON in {context}: {message}")]
    Json {
        context: &'static str,
        message: String,
    },

    #[error("invalid {field}: {message}")]
    Payload { field: String, message: String },

    #[error("unrecognized payload field key {key:?}")]
    UnknownFieldKey { key: String },

    #[error("invalid key in {field}: {source}")]
    InvalidKey {
        field: &'static str,
        #[source]
        source: KeyError,
    },

    #[error("incomplete transform: missing {missing:?}")]
    IncompleteTransform { missing: &'static str },

    #[error("unknown transform discriminant {name:?}")]
    UnknownDiscriminant { name: String },

    #[error("unsupported operation: {operation}")]
    UnsupportedOperation { operation: &'static str },
}

impl DecodeError {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DecodeError::InvalidKey { source, .. } => source.kind(),
            DecodeError::DuplicateField { .. } => ErrorKind::DuplicateField,
            DecodeError::IncompleteTransform { .. } => ErrorKind::IncompleteTransform,
            DecodeError::UnknownDiscriminant { .. } => ErrorKind::UnknownDiscriminant,
            DecodeError::UnsupportedOperation { .. } => ErrorKind::UnsupportedOperation,
            _ => ErrorKind::PayloadDecode,
        }
    }

    pub(crate) fn payload(field: impl Into<String>, message: impl std::fmt::Display) -> Self {
        DecodeError::Payload {
            field: field.into(),
            message: message.to_string(),
        }
    }
}
