//! Error types for the codec, the coordinate text adapter and the elevation client.

use std::num::ParseFloatError;

/// Failure to decode an encoded polyline string.
///
/// A decode error always aborts the whole call; no prefix of the sequence is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// Input ended while the continuation bit of a varint was still set.
    #[error("input ended inside a varint starting at byte {offset}")]
    MalformedVarint { offset: usize },

    /// Input ended between two integers of the same point.
    #[error("input ended after {found} of {expected} values of a point")]
    IncompleteGroup { expected: usize, found: usize },

    /// Byte outside the printable polyline alphabet (63..=126).
    #[error("invalid byte 0x{byte:02x} at offset {offset}")]
    InvalidByte { offset: usize, byte: u8 },

    /// A single varint carried more than 64 bits of payload.
    #[error("varint starting at byte {offset} overflows 64 bits")]
    Overflow { offset: usize },
}

/// Failure to parse `"lat,lng"` / `"lat,lng,ele"` text.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("expected {expected} comma-separated fields, found {found} in {input:?}")]
    FieldCount {
        expected: usize,
        found: usize,
        input: String,
    },

    #[error("invalid number in field {field} of {input:?}")]
    InvalidNumber {
        field: usize,
        input: String,
        #[source]
        source: ParseFloatError,
    },
}

/// Failure of an elevation lookup.
#[derive(Debug, thiserror::Error)]
pub enum ElevationError {
    #[error("elevation request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered but reported a non-`OK` status.
    #[error("elevation service returned {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Status {
        status: String,
        message: Option<String>,
    },

    #[error("requested {requested} elevations, service returned {returned}")]
    CountMismatch { requested: usize, returned: usize },
}
