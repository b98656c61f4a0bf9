//! # NMEA 0183 Frame Validation
//!
//! Every line must have the shape `$AATTT,D1,D2,...,Dn*CC[\r\n]`. The
//! [`FrameValidator`] checks that shape, the length limit and the XOR checksum,
//! and hands back a [`RawSentence`] borrowing the comma-separated parts.

use nom::{
    Parser,
    bytes::complete::{take, take_until},
    character::complete::{char, hex_digit0},
    error::ErrorKind,
    number::complete::hex_u32,
};

use crate::{
    FrameError, IResult,
    diagnostics::{Diagnostics, LogSink, excerpt},
    parsing::consumed,
};

/// Longest accepted frame, line ending excluded.
pub const MAX_LINE_LENGTH: usize = 82;

/// Shortest accepted frame in bytes, line ending excluded. Anything shorter is
/// rejected before the `$` and `*CC` checks.
pub const MIN_LINE_LENGTH: usize = 7;

/// Defines how the validator should handle CRLF line endings.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum LineEndingMode {
    /// The line must end with `\r\n`.
    Required,

    /// The line must not end with `\r` or `\n`.
    ///
    /// A reassembled frame follows the mode of its last piece only; the earlier
    /// piece is always kept without its terminator.
    Forbidden,

    #[default]
    /// Any trailing `\r` and `\n` characters are stripped before validation.
    ///
    /// Serial and socket transports disagree on terminators, so this is the default.
    Optional,
}

/// Validates the framing of a single line.
///
/// It uses the builder pattern for its two settings.
///
/// # Examples
///
/// ```rust
/// use nmea0183_navdata::{FrameError, FrameValidator, LineEndingMode};
///
/// let validator = FrameValidator::new();
/// let raw = validator.validate("$GNZDA,052714.00,06,12,2024,00,00*7C\r\n").unwrap();
/// assert_eq!(raw.address(), "GNZDA");
/// assert_eq!(raw.field(4), "2024");
///
/// let strict = FrameValidator::new().line_ending_mode(LineEndingMode::Required);
/// assert_eq!(
///     strict.validate("$GNZDA,052714.00,06,12,2024,00,00*7C"),
///     Err(FrameError::LineEnding)
/// );
/// ```
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameValidator {
    max_length: usize,
    line_ending_mode: LineEndingMode,
}

impl FrameValidator {
    /// Creates a validator with default settings.
    ///
    /// The default settings are:
    /// - Maximum length: [`MAX_LINE_LENGTH`]
    /// - Line ending mode: [`LineEndingMode::Optional`]
    pub fn new() -> Self {
        FrameValidator {
            max_length: MAX_LINE_LENGTH,
            line_ending_mode: LineEndingMode::default(),
        }
    }

    /// Sets the longest accepted frame, line ending excluded.
    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    /// Sets the line ending mode.
    pub fn line_ending_mode(mut self, mode: LineEndingMode) -> Self {
        self.line_ending_mode = mode;
        self
    }

    pub fn max_len(&self) -> usize {
        self.max_length
    }

    /// Removes the line terminator according to the configured mode.
    pub fn strip_line_ending<'a>(&self, line: &'a str) -> Result<&'a str, FrameError> {
        match self.line_ending_mode {
            LineEndingMode::Required => line.strip_suffix("\r\n").ok_or(FrameError::LineEnding),
            LineEndingMode::Forbidden if line.ends_with(['\r', '\n']) => {
                Err(FrameError::LineEnding)
            }
            LineEndingMode::Forbidden => Ok(line),
            LineEndingMode::Optional => Ok(line.trim_end_matches(['\r', '\n'])),
        }
    }

    /// Validates a line as received from a transport.
    pub fn validate<'a>(&self, line: &'a str) -> Result<RawSentence<'a>, FrameError> {
        let line = self.strip_line_ending(line)?;
        self.validate_unterminated(line)
    }

    /// Validates a line whose terminator has already been removed.
    ///
    /// Checks run in this order: ASCII, minimum length, `$` start, `*` marker,
    /// maximum length, trailer syntax, checksum value.
    pub fn validate_unterminated<'a>(&self, line: &'a str) -> Result<RawSentence<'a>, FrameError> {
        if !line.is_ascii() {
            return Err(FrameError::NonAscii);
        }

        if line.len() < MIN_LINE_LENGTH {
            return Err(FrameError::TooShort { length: line.len() });
        }

        let start: IResult<&str, char> = char('$').parse(line);
        let (rest, _) = start.map_err(|_| FrameError::MissingStart)?;

        let marker: IResult<&str, &str> = take_until("*").parse(rest);
        let (trailer, data) = marker.map_err(|_| FrameError::MissingChecksum)?;
        if trailer.len() < 3 {
            return Err(FrameError::MissingChecksum);
        }

        if line.len() > self.max_length {
            return Err(FrameError::TooLong {
                length: line.len(),
                max: self.max_length,
            });
        }

        let (_, found) = checksum_trailer(trailer).map_err(|_| FrameError::MalformedChecksum)?;
        let expected = checksum(data.as_bytes());

        if found != expected {
            return Err(FrameError::ChecksumMismatch { expected, found });
        }

        Ok(RawSentence::split(data, found))
    }
}

impl Default for FrameValidator {
    fn default() -> Self {
        FrameValidator::new()
    }
}

/// Validates `line` with the default settings, logging the reason of a rejection
/// as a warning.
pub fn validate_frame(line: &str, sink: &dyn LogSink) -> bool {
    match FrameValidator::new().validate(line) {
        Ok(_) => true,
        Err(failure) => {
            Diagnostics::new(sink, "FRAME").warning(format_args!("{failure}: {}", excerpt(line)));
            false
        }
    }
}

/// Parses `*CC` where `CC` is exactly two hex digits, in either case.
fn checksum_trailer(i: &str) -> IResult<&str, u8> {
    let (i, _) = char('*').parse(i)?;
    let (_, cc) = consumed(take(2u8), ErrorKind::Count).parse(i)?;
    let (_, cc) = consumed(hex_digit0, ErrorKind::IsA).parse(cc)?;

    hex_u32.map(|cc| cc as u8).parse(cc)
}

/// Calculates the NMEA 0183 checksum: the XOR of every byte between `$` and `*`.
///
/// ```rust
/// use nmea0183_navdata::checksum;
///
/// assert_eq!(checksum(b"GNZDA,052714.00,06,12,2024,00,00"), 0x7C);
/// assert_eq!(checksum(b""), 0);
/// ```
pub fn checksum(data: &[u8]) -> u8 {
    data.iter().fold(0u8, |accumulated_xor, &byte| accumulated_xor ^ byte)
}

/// The comma-separated parts of a validated frame.
///
/// Index 0 is the address token (`GNRMC`), so NMEA field `n` sits at index `n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSentence<'a> {
    fields: Vec<&'a str>,
    checksum: u8,
}

impl<'a> RawSentence<'a> {
    /// Splits the text between `$` and `*` without any framing checks.
    ///
    /// ```rust
    /// use nmea0183_navdata::RawSentence;
    ///
    /// let raw = RawSentence::from_payload("GNGSA,A,3,,,");
    /// assert_eq!(raw.len(), 6);
    /// assert_eq!(raw.field(3), "");
    /// assert_eq!(raw.field(42), "");
    /// ```
    pub fn from_payload(payload: &'a str) -> Self {
        Self::split(payload, checksum(payload.as_bytes()))
    }

    fn split(payload: &'a str, checksum: u8) -> Self {
        RawSentence {
            fields: payload.split(',').collect(),
            checksum,
        }
    }

    /// The dispatch key, e.g. `GNRMC`.
    pub fn address(&self) -> &'a str {
        self.field(0)
    }

    /// Field `index`, or an empty string when the sentence is shorter.
    pub fn field(&self, index: usize) -> &'a str {
        self.fields.get(index).copied().unwrap_or_default()
    }

    pub fn fields(&self) -> &[&'a str] {
        &self.fields
    }

    /// Number of parts, address token included.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn checksum(&self) -> u8 {
        self.checksum
    }
}

#[cfg(test)]
mod tests {
    mod checksum;
    mod frame;
}
