use nom::number::complete::le_u8;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    FieldError, IResult, RawSentence,
    diagnostics::Diagnostics,
    nmea_content::{
        FieldSchema, MessageType,
        parse::{clamp, integer},
    },
    wire::{PayloadWriter, WireBody, text},
};

/// TXT - Text transmission
///
/// ```text
///         1  2  3  4
///         |  |  |  |
///  $--TXT,xx,xx,xx,c--c*hh<CR><LF>
/// ```
///
/// Commas inside the message are kept: everything after field 3 is joined back.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq)]
pub struct TXT {
    /// Total number of sentences, `[1, 99]`
    pub total: u8,
    /// Sentence number, `[1, 99]`
    pub number: u8,
    /// Text identifier, `[0, 99]`
    pub identifier: u8,
    pub text: String,
}

impl FieldSchema for TXT {
    const MESSAGE_TYPE: MessageType = MessageType::Gptxt;
    const MIN_FIELDS: usize = 5;

    fn parse_fields(raw: &RawSentence<'_>, log: &Diagnostics<'_>) -> Result<Self, FieldError> {
        let bounded = |index: usize, min: i64, field: &str| {
            clamp(integer(raw.field(index), field, log), min, 99, field, log) as u8
        };

        let txt = TXT {
            total: bounded(1, 1, "total sentences"),
            number: bounded(2, 1, "sentence number"),
            identifier: bounded(3, 0, "text identifier"),
            text: raw.fields().get(4..).unwrap_or_default().join(","),
        };

        if txt.number > txt.total {
            log.warning(format_args!(
                "Sentence number {} exceeds total {}",
                txt.number, txt.total
            ));
        }

        Ok(txt)
    }
}

impl WireBody for TXT {
    fn write_body(&self, w: &mut PayloadWriter) {
        w.u8(self.total);
        w.u8(self.number);
        w.u8(self.identifier);
        w.text(&self.text);
    }

    fn read_body(i: &[u8]) -> IResult<&[u8], Self> {
        let (i, total) = le_u8(i)?;
        let (i, number) = le_u8(i)?;
        let (i, identifier) = le_u8(i)?;
        let (i, text) = text(i)?;

        Ok((
            i,
            TXT {
                total,
                number,
                identifier,
                text,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{diagnostics::Severity, tests::support::RecordingSink};

    fn parse(payload: &str, sink: &RecordingSink) -> TXT {
        let log = Diagnostics::new(sink, "GPTXT");
        TXT::parse_fields(&RawSentence::from_payload(payload), &log).unwrap()
    }

    #[test]
    fn test_txt_parsing() {
        let sink = RecordingSink::default();

        let txt = parse("GPTXT,01,01,02,ANTSTATUS=OK", &sink);
        assert_eq!((txt.total, txt.number, txt.identifier), (1, 1, 2));
        assert_eq!(txt.text, "ANTSTATUS=OK");

        let txt = parse("GPTXT,01,01,02,u-blox ag,www.u-blox.com", &sink);
        assert_eq!(txt.text, "u-blox ag,www.u-blox.com");

        let txt = parse("GPTXT,01,01,02,", &sink);
        assert_eq!(txt.text, "");
        assert!(sink.entries().is_empty());
    }

    #[test]
    fn test_txt_ranges() {
        let sink = RecordingSink::default();

        let txt = parse("GPTXT,00,150,02,X", &sink);
        assert_eq!((txt.total, txt.number), (1, 99));
        assert!(sink.contains(Severity::Warning, "total sentences 0 out of range [1, 99]"));
        assert!(sink.contains(Severity::Warning, "sentence number 150 out of range [1, 99]"));
        assert!(sink.contains(Severity::Warning, "Sentence number 99 exceeds total 1"));
    }
}
