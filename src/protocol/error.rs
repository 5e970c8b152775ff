//! NDEF error types

use thiserror::Error;

use super::TypeNameFormat;

/// NDEF codec errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A declared length runs past the end of the buffer
    #[error("truncated input: need {needed} bytes, got {available}")]
    TruncatedInput {
        /// Bytes the next read required
        needed: usize,
        /// Bytes left in the buffer
        available: usize,
    },

    /// Empty chunk group
    #[error("no chunks to assemble")]
    NoChunks,

    /// First chunk of a group does not carry the MB flag
    #[error("first chunk is missing the message begin flag")]
    MissingMessageBegin,

    /// A lone chunk has the CF flag set
    #[error("a single chunk cannot be chunked")]
    SingleChunkCannotBeChunked,

    /// Last chunk of a group does not carry the ME flag
    #[error("last chunk is missing the message end flag")]
    MissingMessageEnd,

    /// Both ends of a chunked group have the CF flag set
    #[error("last chunk cannot be chunked")]
    LastCannotBeChunked,

    /// A chunk before the last one has no CF flag
    #[error("chunk flag missing on a non-terminal chunk")]
    MissingChunkFlag,

    /// A continuation chunk carries an ID
    #[error("unexpected ID length flag on a continuation chunk")]
    UnexpectedIDFlag,

    /// A continuation chunk carries a type
    #[error("unexpected type length on a continuation chunk")]
    UnexpectedTypeLength,

    /// A continuation chunk has a TNF other than Unchanged
    #[error("continuation chunk TNF must be Unchanged")]
    UnexpectedTNF,

    /// Payload does not fit the 4-byte length field
    #[error("payload too large: {size} bytes (max {max})")]
    PayloadTooLarge {
        /// Payload size
        size: u64,
        /// Maximum allowed
        max: u64,
    },

    /// Message has no records to encode
    #[error("message has no records")]
    EmptyMessage,

    /// Type or ID longer than its 1-byte length field allows
    #[error("{field} too long: {len} bytes (max 255)")]
    FieldTooLong {
        /// Offending field
        field: &'static str,
        /// Field length
        len: usize,
    },

    /// Record type is inconsistent with its TNF
    #[error("invalid record type for TNF {tnf}: {reason}")]
    InvalidRecordType {
        /// Record TNF
        tnf: TypeNameFormat,
        /// Which rule failed
        reason: &'static str,
    },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Message decode failure.
///
/// Carries the number of bytes consumed by fully decoded chunks before the
/// failure, for diagnostics. No partial message is produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("decode failed after {consumed} bytes: {source}")]
pub struct DecodeError {
    /// Bytes consumed before the failing chunk
    pub consumed: usize,
    /// Underlying error
    #[source]
    pub source: Error,
}

impl DecodeError {
    /// Create a decode error
    #[must_use]
    pub const fn new(consumed: usize, source: Error) -> Self {
        Self { consumed, source }
    }

    /// Underlying error kind
    #[must_use]
    pub const fn kind(&self) -> &Error {
        &self.source
    }
}
