//! # Error Types
//!
//! Two layers of errors live here. [`Error`] is the combinator-level error threaded
//! through the `nom` parsers (frame trailer, field tokens, binary bodies). The
//! `thiserror` enums describe why a whole line or payload was rejected.

use nom::error::{ErrorKind, FromExternalError, ParseError};
use thiserror::Error as ThisError;

use crate::nmea_content::MessageType;

/// Holds the result of parsing functions.
///
/// It depends on the input type `I`, the output type `O`, and the error type `E`
/// (by default `nom::error::Error<I>`).
///
/// Outside of the parsing code, you can use the [nom::Finish::finish] method to convert
/// it to a more common result type.
pub type IResult<I, O, E = nom::error::Error<I>> = nom::IResult<I, O, Error<I, E>>;

/// Combinator-level parsing error.
#[derive(Debug, PartialEq)]
pub enum Error<I, E> {
    /// The input did not match the expected syntax.
    ///
    /// This wraps nom's standard parsing errors.
    ParsingError(E),

    /// The input was well formed but carried a value outside its domain,
    /// such as minute `61` or month `13`.
    InvalidValue(I),
}

impl<I, E> ParseError<I> for Error<I, E>
where
    E: ParseError<I>,
{
    fn from_error_kind(input: I, kind: ErrorKind) -> Self {
        Error::ParsingError(E::from_error_kind(input, kind))
    }

    fn append(_: I, _: ErrorKind, other: Self) -> Self {
        other
    }
}

impl<I, E, EX> FromExternalError<I, EX> for Error<I, E>
where
    E: FromExternalError<I, EX>,
{
    fn from_external_error(input: I, kind: ErrorKind, e: EX) -> Self {
        Error::ParsingError(E::from_external_error(input, kind, e))
    }
}

/// Reasons a line is rejected by the frame validator.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum FrameError {
    /// The line ending does not match the configured mode.
    #[error("unexpected line ending")]
    LineEnding,

    /// The line contains non-ASCII bytes.
    #[error("message contains non-ASCII characters")]
    NonAscii,

    /// Shorter than the smallest possible frame.
    #[error("message too short ({length} bytes)")]
    TooShort { length: usize },

    /// The first byte is not `$`.
    #[error("invalid message start")]
    MissingStart,

    /// No `*` followed by at least two characters.
    #[error("checksum marker not found")]
    MissingChecksum,

    /// Longer than the configured maximum, line ending excluded.
    #[error("message too long ({length} > {max} bytes)")]
    TooLong { length: usize, max: usize },

    /// The trailer after `*` is not exactly two hex digits.
    #[error("malformed checksum trailer")]
    MalformedChecksum,

    /// The XOR of the payload differs from the trailer.
    #[error("checksum mismatch (calculated {expected:02X}, received {found:02X})")]
    ChecksumMismatch {
        /// The checksum calculated from the message content
        expected: u8,
        /// The checksum found in the message
        found: u8,
    },
}

/// A field failed a strict check.
#[derive(Debug, Clone, PartialEq, ThisError)]
#[error("{field}: {reason}")]
pub struct FieldError {
    pub field: &'static str,
    pub reason: String,
}

impl FieldError {
    pub(crate) fn new(field: &'static str, reason: impl Into<String>) -> Self {
        FieldError {
            field,
            reason: reason.into(),
        }
    }
}

/// Why a line did not produce a sentence.
#[derive(Debug, Clone, PartialEq, ThisError)]
pub enum ParseFailure {
    #[error("invalid frame: {0}")]
    Frame(#[from] FrameError),

    #[error("unsupported message type: {0:?}")]
    UnsupportedMessage(String),

    #[error("{message_type}: insufficient fields ({found} < {required})")]
    InsufficientFields {
        message_type: MessageType,
        found: usize,
        required: usize,
    },

    #[error("{message_type}: invalid field {source}")]
    InvalidField {
        message_type: MessageType,
        source: FieldError,
    },
}

impl ParseFailure {
    /// The message type the failing line was routed to, if it got that far.
    pub fn message_type(&self) -> Option<MessageType> {
        match self {
            ParseFailure::Frame(_) | ParseFailure::UnsupportedMessage(_) => None,
            ParseFailure::InsufficientFields { message_type, .. }
            | ParseFailure::InvalidField { message_type, .. } => Some(*message_type),
        }
    }
}

/// Why a serialized payload could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum DecodeError {
    #[error("payload shorter than its header")]
    Truncated,

    #[error("unsupported payload format version {0}")]
    UnsupportedVersion(u8),

    #[error("unknown message tag {0}")]
    UnknownMessageType(u8),

    #[error("body length mismatch (header says {declared}, found {actual})")]
    LengthMismatch { declared: usize, actual: usize },

    #[error("malformed {0} body")]
    MalformedBody(MessageType),
}
