//! # Sentence Content
//!
//! Routing of validated frames to the ten supported sentence parsers, and the
//! typed sentence structs themselves.

pub(crate) mod parse;
pub mod sentences;

use std::fmt;

use crate::{
    FieldError, ParseFailure, RawSentence,
    diagnostics::{Diagnostics, LogSink},
};

pub use sentences::*;

/// The closed set of sentences the engine understands.
///
/// The address token must match exactly: a `GPRMC` is not a `GNRMC`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    /// Recommended minimum navigation information
    Gnrmc,
    /// Fix data
    Gngga,
    /// DOP and active satellites
    Gngsa,
    /// Time and date
    Gnzda,
    /// Velocity (u-blox proprietary layout)
    Gndhv,
    /// Pseudorange error statistics
    Gngst,
    /// Text transmission
    Gptxt,
    /// Geographic position
    Gngll,
    /// GLONASS satellites in view
    Glgsv,
    /// Course and speed over ground
    Gnvtg,
}

impl MessageType {
    pub const ALL: [MessageType; 10] = [
        MessageType::Gnrmc,
        MessageType::Gngga,
        MessageType::Gngsa,
        MessageType::Gnzda,
        MessageType::Gndhv,
        MessageType::Gngst,
        MessageType::Gptxt,
        MessageType::Gngll,
        MessageType::Glgsv,
        MessageType::Gnvtg,
    ];

    /// The five character address token.
    pub fn token(self) -> &'static str {
        match self {
            MessageType::Gnrmc => "GNRMC",
            MessageType::Gngga => "GNGGA",
            MessageType::Gngsa => "GNGSA",
            MessageType::Gnzda => "GNZDA",
            MessageType::Gndhv => "GNDHV",
            MessageType::Gngst => "GNGST",
            MessageType::Gptxt => "GPTXT",
            MessageType::Gngll => "GNGLL",
            MessageType::Glgsv => "GLGSV",
            MessageType::Gnvtg => "GNVTG",
        }
    }

    /// ```rust
    /// use nmea0183_navdata::MessageType;
    ///
    /// assert_eq!(MessageType::from_token("GNGGA"), Some(MessageType::Gngga));
    /// assert_eq!(MessageType::from_token("GPGGA"), None);
    /// ```
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.token() == token)
    }

    /// Wire tag of this type.
    pub fn tag(self) -> u8 {
        self as u8
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        Self::ALL.get(usize::from(tag)).copied()
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// A sentence body parsed from the parts of a [`RawSentence`].
pub(crate) trait FieldSchema: Sized {
    const MESSAGE_TYPE: MessageType;

    /// Minimum number of parts, address token included.
    const MIN_FIELDS: usize;

    fn parse_fields(raw: &RawSentence<'_>, log: &Diagnostics<'_>) -> Result<Self, FieldError>;
}

/// Checks the part count, runs the schema and logs the outcome.
fn parse_schema<S: FieldSchema>(raw: &RawSentence<'_>, log: &Diagnostics<'_>) -> Result<S, ParseFailure> {
    if raw.len() < S::MIN_FIELDS {
        log.error(format_args!(
            "Insufficient fields: {} < {}",
            raw.len(),
            S::MIN_FIELDS
        ));
        return Err(ParseFailure::InsufficientFields {
            message_type: S::MESSAGE_TYPE,
            found: raw.len(),
            required: S::MIN_FIELDS,
        });
    }

    match S::parse_fields(raw, log) {
        Ok(sentence) => {
            log.info("Successfully parsed message");
            Ok(sentence)
        }
        Err(source) => {
            log.error(format_args!("Parse error: {source}"));
            Err(ParseFailure::InvalidField {
                message_type: S::MESSAGE_TYPE,
                source,
            })
        }
    }
}

/// A unified enum over all supported sentences.
///
/// ```rust
/// use nmea0183_navdata::{FrameValidator, NmeaSentence, diagnostics::NullSink};
///
/// let raw = FrameValidator::new()
///     .validate("$GNZDA,052714.00,06,12,2024,00,00*7C")
///     .unwrap();
///
/// match NmeaSentence::from_raw(&raw, &NullSink).unwrap() {
///     NmeaSentence::ZDA(zda) => assert_eq!(zda.local_offset.whole_seconds(), 0),
///     other => panic!("unexpected {other:?}"),
/// }
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum NmeaSentence {
    /// Recommended Minimum Navigation Information
    RMC(RMC),
    /// Global Positioning System Fix Data
    GGA(GGA),
    /// DOP and active satellites
    GSA(GSA),
    /// Time & Date
    ZDA(ZDA),
    /// Velocity solution
    DHV(DHV),
    /// Pseudorange Noise Statistics
    GST(GST),
    /// Text Transmission
    TXT(TXT),
    /// Geographic Position - Latitude/Longitude
    GLL(GLL),
    /// Satellites in View
    GSV(GSV),
    /// Track made good and Ground speed
    VTG(VTG),
}

impl NmeaSentence {
    /// Routes a validated frame to its parser.
    ///
    /// Soft problems are reported to `sink` under the message token; hard ones
    /// come back as a [`ParseFailure`].
    pub fn from_raw(raw: &RawSentence<'_>, sink: &dyn LogSink) -> Result<Self, ParseFailure> {
        let Some(message_type) = MessageType::from_token(raw.address()) else {
            return Err(ParseFailure::UnsupportedMessage(raw.address().to_string()));
        };

        let log = Diagnostics::new(sink, message_type.token());

        match message_type {
            MessageType::Gnrmc => parse_schema(raw, &log).map(Self::RMC),
            MessageType::Gngga => parse_schema(raw, &log).map(Self::GGA),
            MessageType::Gngsa => parse_schema(raw, &log).map(Self::GSA),
            MessageType::Gnzda => parse_schema(raw, &log).map(Self::ZDA),
            MessageType::Gndhv => parse_schema(raw, &log).map(Self::DHV),
            MessageType::Gngst => parse_schema(raw, &log).map(Self::GST),
            MessageType::Gptxt => parse_schema(raw, &log).map(Self::TXT),
            MessageType::Gngll => parse_schema(raw, &log).map(Self::GLL),
            MessageType::Glgsv => parse_schema(raw, &log).map(Self::GSV),
            MessageType::Gnvtg => parse_schema(raw, &log).map(Self::VTG),
        }
    }

    pub fn message_type(&self) -> MessageType {
        match self {
            NmeaSentence::RMC(_) => MessageType::Gnrmc,
            NmeaSentence::GGA(_) => MessageType::Gngga,
            NmeaSentence::GSA(_) => MessageType::Gngsa,
            NmeaSentence::ZDA(_) => MessageType::Gnzda,
            NmeaSentence::DHV(_) => MessageType::Gndhv,
            NmeaSentence::GST(_) => MessageType::Gngst,
            NmeaSentence::TXT(_) => MessageType::Gptxt,
            NmeaSentence::GLL(_) => MessageType::Gngll,
            NmeaSentence::GSV(_) => MessageType::Glgsv,
            NmeaSentence::VTG(_) => MessageType::Gnvtg,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{diagnostics::Severity, tests::support::RecordingSink};

    #[test]
    fn test_message_type_tokens_and_tags() {
        for (tag, kind) in MessageType::ALL.into_iter().enumerate() {
            assert_eq!(MessageType::from_token(kind.token()), Some(kind));
            assert_eq!(usize::from(kind.tag()), tag);
            assert_eq!(MessageType::from_tag(kind.tag()), Some(kind));
        }

        assert_eq!(MessageType::from_tag(10), None);
        assert_eq!(MessageType::from_token("gnrmc"), None);
        assert_eq!(MessageType::from_token("GNRMC "), None);
        assert_eq!(MessageType::Glgsv.to_string(), "GLGSV");
    }

    #[test]
    fn test_routing() {
        let sink = RecordingSink::default();
        let cases = [
            ("GNRMC,052712.00,A,5624.91014,N,06153.41794,E,0.302,,061224,,,A,V", MessageType::Gnrmc),
            ("GNGGA,052714.00,5624.91149,N,06153.42199,E,1,06,1.27,204.2,M,-12.4,M,,", MessageType::Gngga),
            ("GNGSA,M,3,67,77,79,69,68,78,,,,,,,2.33,1.27,1.95,2", MessageType::Gngsa),
            ("GNZDA,052714.00,06,12,2024,00,00", MessageType::Gnzda),
            ("GNDHV,052714.00,0.12,0.07,0.09,0.04,0.11", MessageType::Gndhv),
            ("GNGST,052714.00,12,2.5,1.5,45.0,1.8,1.9,3.2", MessageType::Gngst),
            ("GPTXT,01,01,02,ANTSTATUS=OK", MessageType::Gptxt),
            ("GNGLL,5624.91149,N,06153.42199,E,052714.00,A,A", MessageType::Gngll),
            ("GLGSV,1,1,01,67,45,120,38", MessageType::Glgsv),
            ("GNVTG,45.0,T,,M,0.120,N,0.222,K,A", MessageType::Gnvtg),
        ];

        for (payload, expected) in cases {
            let raw = RawSentence::from_payload(payload);
            let result = NmeaSentence::from_raw(&raw, &sink);
            assert!(result.is_ok(), "Failed: {payload:?}\n\t{result:?}");
            assert_eq!(result.unwrap().message_type(), expected);
        }

        assert_eq!(sink.count(Severity::Info), cases.len());
    }

    #[test]
    fn test_unsupported_message() {
        let sink = RecordingSink::default();
        let raw = RawSentence::from_payload("GPGGA,052714.00,5624.91149,N,06153.42199,E,1,06,1.27,204.2,M,-12.4,M,,");

        assert_eq!(
            NmeaSentence::from_raw(&raw, &sink),
            Err(ParseFailure::UnsupportedMessage("GPGGA".to_string()))
        );
    }

    #[test]
    fn test_insufficient_fields() {
        let sink = RecordingSink::default();
        let raw = RawSentence::from_payload("GNGGA,052714.00,5624.91149,N,06153.42199,E,1,06,1.27,204.2,M,-12.4,M,");
        assert_eq!(raw.len(), 14);

        assert_eq!(
            NmeaSentence::from_raw(&raw, &sink),
            Err(ParseFailure::InsufficientFields {
                message_type: MessageType::Gngga,
                found: 14,
                required: 15,
            })
        );
        assert!(sink.contains(Severity::Error, "[GNGGA] Insufficient fields: 14 < 15"));
    }
}
