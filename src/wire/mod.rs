//! # Wire Format
//!
//! Versioned binary encoding of parsed sentences, used as the payload of a
//! [`NavigationRecord`](crate::record::NavigationRecord).
//!
//! ```text
//! [0] format version  [1] message tag  [2..4] body length (u16 LE)  [4..] body
//! ```
//!
//! Body fields follow the declaration order of each sentence struct. All
//! integers and floats are little-endian; optional values carry a presence byte.

use nom::{
    Parser,
    combinator::{map_opt, map_res, verify},
    error::ErrorKind,
    multi::length_data,
    number::complete::{le_f32, le_f64, le_i16, le_u8, le_u16},
};
use time::{Date, Month, Time};

use crate::{
    DecodeError, Error, IResult,
    nmea_content::{MessageType, NmeaSentence, sentences::FieldEnum},
    parsing::consumed,
};

/// Version byte written at the start of every payload.
pub const FORMAT_VERSION: u8 = 1;

/// Version, tag and body length.
pub const HEADER_LEN: usize = 4;

type WireError<'a> = Error<&'a [u8], nom::error::Error<&'a [u8]>>;

/// A sentence body with a fixed binary layout.
pub(crate) trait WireBody: Sized {
    fn write_body(&self, w: &mut PayloadWriter);

    fn read_body(i: &[u8]) -> IResult<&[u8], Self>;
}

/// Encodes a sentence into a self-describing payload.
///
/// ```rust
/// use nmea0183_navdata::{FrameValidator, NmeaSentence, diagnostics::NullSink, wire};
///
/// let raw = FrameValidator::new()
///     .validate("$GNZDA,052714.00,06,12,2024,00,00*7C")
///     .unwrap();
/// let sentence = NmeaSentence::from_raw(&raw, &NullSink).unwrap();
///
/// let payload = wire::serialize(&sentence);
/// assert_eq!(&payload[..2], &[wire::FORMAT_VERSION, 3]);
/// assert_eq!(wire::deserialize(&payload), Ok(sentence));
/// ```
pub fn serialize(sentence: &NmeaSentence) -> Vec<u8> {
    let mut body = PayloadWriter::default();

    match sentence {
        NmeaSentence::RMC(rmc) => rmc.write_body(&mut body),
        NmeaSentence::GGA(gga) => gga.write_body(&mut body),
        NmeaSentence::GSA(gsa) => gsa.write_body(&mut body),
        NmeaSentence::ZDA(zda) => zda.write_body(&mut body),
        NmeaSentence::DHV(dhv) => dhv.write_body(&mut body),
        NmeaSentence::GST(gst) => gst.write_body(&mut body),
        NmeaSentence::TXT(txt) => txt.write_body(&mut body),
        NmeaSentence::GLL(gll) => gll.write_body(&mut body),
        NmeaSentence::GSV(gsv) => gsv.write_body(&mut body),
        NmeaSentence::VTG(vtg) => vtg.write_body(&mut body),
    }

    let body = body.into_inner();
    let mut payload = Vec::with_capacity(HEADER_LEN + body.len());
    payload.push(FORMAT_VERSION);
    payload.push(sentence.message_type().tag());
    // bodies are bounded by the line length and the fixed list capacities
    payload.extend_from_slice(&(body.len() as u16).to_le_bytes());
    payload.extend_from_slice(&body);
    payload
}

/// Decodes a payload produced by [`serialize`].
pub fn deserialize(payload: &[u8]) -> Result<NmeaSentence, DecodeError> {
    let [version, tag, low, high, body @ ..] = payload else {
        return Err(DecodeError::Truncated);
    };

    if *version != FORMAT_VERSION {
        return Err(DecodeError::UnsupportedVersion(*version));
    }

    let message_type = MessageType::from_tag(*tag).ok_or(DecodeError::UnknownMessageType(*tag))?;

    let declared = usize::from(u16::from_le_bytes([*low, *high]));
    if declared != body.len() {
        return Err(DecodeError::LengthMismatch {
            declared,
            actual: body.len(),
        });
    }

    let sentence = match message_type {
        MessageType::Gnrmc => read_all(body).map(NmeaSentence::RMC),
        MessageType::Gngga => read_all(body).map(NmeaSentence::GGA),
        MessageType::Gngsa => read_all(body).map(NmeaSentence::GSA),
        MessageType::Gnzda => read_all(body).map(NmeaSentence::ZDA),
        MessageType::Gndhv => read_all(body).map(NmeaSentence::DHV),
        MessageType::Gngst => read_all(body).map(NmeaSentence::GST),
        MessageType::Gptxt => read_all(body).map(NmeaSentence::TXT),
        MessageType::Gngll => read_all(body).map(NmeaSentence::GLL),
        MessageType::Glgsv => read_all(body).map(NmeaSentence::GSV),
        MessageType::Gnvtg => read_all(body).map(NmeaSentence::VTG),
    };

    sentence.ok_or(DecodeError::MalformedBody(message_type))
}

/// The whole body must be consumed; trailing bytes are as bad as missing ones.
fn read_all<T: WireBody>(body: &[u8]) -> Option<T> {
    consumed(T::read_body, ErrorKind::Eof)
        .parse(body)
        .ok()
        .map(|(_, value)| value)
}

/// Little-endian body writer.
#[derive(Debug, Default)]
pub(crate) struct PayloadWriter {
    buf: Vec<u8>,
}

impl PayloadWriter {
    pub(crate) fn into_inner(self) -> Vec<u8> {
        self.buf
    }

    pub(crate) fn u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub(crate) fn u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub(crate) fn i16(&mut self, value: i16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub(crate) fn i32(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub(crate) fn u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub(crate) fn f32(&mut self, value: f32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub(crate) fn f64(&mut self, value: f64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub(crate) fn bool(&mut self, value: bool) {
        self.u8(value.into());
    }

    pub(crate) fn code<T: FieldEnum>(&mut self, value: T) {
        self.u8(value.code());
    }

    pub(crate) fn option<T>(&mut self, value: Option<T>, write: impl FnOnce(&mut Self, T)) {
        match value {
            Some(value) => {
                self.bool(true);
                write(self, value);
            }
            None => self.bool(false),
        }
    }

    pub(crate) fn time(&mut self, time: Option<Time>) {
        self.option(time, |w, time| {
            w.u8(time.hour());
            w.u8(time.minute());
            w.u8(time.second());
            w.u16(time.millisecond());
        });
    }

    pub(crate) fn date(&mut self, date: Option<Date>) {
        self.option(date, |w, date| {
            // parsed years stay within 1970..=2100
            w.i16(date.year() as i16);
            w.u8(date.month().into());
            w.u8(date.day());
        });
    }

    pub(crate) fn text(&mut self, text: &str) {
        let bytes = &text.as_bytes()[..text.len().min(usize::from(u16::MAX))];
        self.u16(bytes.len() as u16);
        self.buf.extend_from_slice(bytes);
    }

    /// Count byte followed by the items. Lists never exceed their 12 slots.
    pub(crate) fn list<T>(&mut self, items: &[T], mut write: impl FnMut(&mut Self, &T)) {
        self.u8(items.len() as u8);
        for item in items {
            write(self, item);
        }
    }
}

pub(crate) fn flag(i: &[u8]) -> IResult<&[u8], bool> {
    map_opt(le_u8, |byte| match byte {
        0 => Some(false),
        1 => Some(true),
        _ => None,
    })
    .parse(i)
}

pub(crate) fn code<T: FieldEnum>(i: &[u8]) -> IResult<&[u8], T> {
    map_opt(le_u8, T::from_code).parse(i)
}

pub(crate) fn finite_f64(i: &[u8]) -> IResult<&[u8], f64> {
    verify(le_f64, |value: &f64| value.is_finite()).parse(i)
}

pub(crate) fn finite_f32(i: &[u8]) -> IResult<&[u8], f32> {
    verify(le_f32, |value: &f32| value.is_finite()).parse(i)
}

/// Presence byte, then the value when present.
pub(crate) fn optional<'a, O, F>(mut f: F) -> impl Parser<&'a [u8], Output = Option<O>, Error = WireError<'a>>
where
    F: Parser<&'a [u8], Output = O, Error = WireError<'a>>,
{
    move |i: &'a [u8]| -> IResult<&'a [u8], Option<O>> {
        let (i, present) = flag(i)?;

        if present {
            let (i, value) = f.parse(i)?;
            Ok((i, Some(value)))
        } else {
            Ok((i, None))
        }
    }
}

/// Count byte, then that many elements. A count above `N` is rejected.
pub(crate) fn bounded_list<'a, T, F, const N: usize>(
    mut element: F,
) -> impl Parser<&'a [u8], Output = heapless::Vec<T, N>, Error = WireError<'a>>
where
    F: Parser<&'a [u8], Output = T, Error = WireError<'a>>,
{
    move |input: &'a [u8]| -> IResult<&'a [u8], heapless::Vec<T, N>> {
        let (mut i, count) = le_u8(input)?;
        if usize::from(count) > N {
            return Err(nom::Err::Error(Error::InvalidValue(input)));
        }

        let mut items = heapless::Vec::new();
        for _ in 0..count {
            let (rest, item) = element.parse(i)?;
            if items.push(item).is_err() {
                return Err(nom::Err::Error(Error::InvalidValue(input)));
            }
            i = rest;
        }

        Ok((i, items))
    }
}

pub(crate) fn text(i: &[u8]) -> IResult<&[u8], String> {
    map_res(length_data(le_u16), |bytes: &[u8]| {
        std::str::from_utf8(bytes).map(str::to_owned)
    })
    .parse(i)
}

fn hms(i: &[u8]) -> IResult<&[u8], Time> {
    let input = i;
    let (i, (hour, minute, second, millisecond)) = (le_u8, le_u8, le_u8, le_u16).parse(i)?;

    match Time::from_hms_milli(hour, minute, second, millisecond) {
        Ok(time) => Ok((i, time)),
        Err(_) => Err(nom::Err::Error(Error::InvalidValue(input))),
    }
}

fn ymd(i: &[u8]) -> IResult<&[u8], Date> {
    let input = i;
    let (i, (year, month, day)) = (le_i16, le_u8, le_u8).parse(i)?;

    let date = Month::try_from(month)
        .ok()
        .and_then(|month| Date::from_calendar_date(year.into(), month, day).ok());

    match date {
        Some(date) => Ok((i, date)),
        None => Err(nom::Err::Error(Error::InvalidValue(input))),
    }
}

pub(crate) fn time_of_day(i: &[u8]) -> IResult<&[u8], Option<Time>> {
    optional(hms).parse(i)
}

pub(crate) fn calendar_date(i: &[u8]) -> IResult<&[u8], Option<Date>> {
    optional(ymd).parse(i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nmea_content::{DHV, GSA, ZDA, sentences::FixMode, sentences::GnssSystem, sentences::SelectionMode};

    fn zda() -> NmeaSentence {
        NmeaSentence::ZDA(ZDA {
            time: Time::from_hms_milli(5, 27, 14, 250).ok(),
            date: Date::from_calendar_date(2024, Month::December, 6).ok(),
            local_offset: time::UtcOffset::from_hms(-5, -30, 0).unwrap(),
        })
    }

    fn gsa() -> NmeaSentence {
        NmeaSentence::GSA(GSA {
            selection_mode: SelectionMode::Automatic,
            fix_mode: FixMode::Fix3D,
            satellites: heapless::Vec::from_slice(&[67, 77, 79]).unwrap(),
            pdop: 23,
            hdop: 13,
            vdop: 20,
            system: GnssSystem::Glonass,
        })
    }

    #[test]
    fn test_header() {
        let payload = serialize(&zda());

        // 6 byte time, 5 byte date, 4 byte offset
        assert_eq!(&payload[..HEADER_LEN], &[FORMAT_VERSION, 3, 15, 0]);
        assert_eq!(payload.len(), HEADER_LEN + 15);
        assert_eq!(deserialize(&payload), Ok(zda()));
    }

    #[test]
    fn test_absent_values() {
        let sentence = NmeaSentence::ZDA(ZDA {
            time: None,
            date: None,
            local_offset: time::UtcOffset::UTC,
        });
        let payload = serialize(&sentence);

        assert_eq!(&payload[HEADER_LEN..], &[0, 0, 0, 0, 0, 0]);
        assert_eq!(deserialize(&payload), Ok(sentence));
    }

    #[test]
    fn test_header_corruption() {
        let payload = serialize(&zda());

        assert_eq!(deserialize(&[]), Err(DecodeError::Truncated));
        assert_eq!(deserialize(&payload[..3]), Err(DecodeError::Truncated));

        let mut corrupted = payload.clone();
        corrupted[0] = 2;
        assert_eq!(deserialize(&corrupted), Err(DecodeError::UnsupportedVersion(2)));

        let mut corrupted = payload.clone();
        corrupted[1] = 10;
        assert_eq!(deserialize(&corrupted), Err(DecodeError::UnknownMessageType(10)));

        assert_eq!(
            deserialize(&payload[..payload.len() - 1]),
            Err(DecodeError::LengthMismatch {
                declared: 15,
                actual: 14
            })
        );
    }

    #[test]
    fn test_body_corruption() {
        let malformed = Err(DecodeError::MalformedBody(MessageType::Gnzda));

        // trailing byte with a matching length
        let mut corrupted = serialize(&zda());
        corrupted.push(0);
        corrupted[2] = 16;
        assert_eq!(deserialize(&corrupted), malformed);

        // hour 24
        let mut corrupted = serialize(&zda());
        corrupted[HEADER_LEN + 1] = 24;
        assert_eq!(deserialize(&corrupted), malformed);

        // presence byte that is neither 0 nor 1
        let mut corrupted = serialize(&zda());
        corrupted[HEADER_LEN] = 2;
        assert_eq!(deserialize(&corrupted), malformed);

        // month 13
        let mut corrupted = serialize(&zda());
        corrupted[HEADER_LEN + 9] = 13;
        assert_eq!(deserialize(&corrupted), malformed);
    }

    #[test]
    fn test_enum_and_list_corruption() {
        let malformed = Err(DecodeError::MalformedBody(MessageType::Gngsa));

        let payload = serialize(&gsa());
        assert_eq!(deserialize(&payload), Ok(gsa()));

        let mut corrupted = payload.clone();
        corrupted[HEADER_LEN] = 9;
        assert_eq!(deserialize(&corrupted), malformed);

        let mut corrupted = payload.clone();
        corrupted[HEADER_LEN + 2] = 13;
        assert_eq!(deserialize(&corrupted), malformed);
    }

    #[test]
    fn test_non_finite_float() {
        let sentence = NmeaSentence::DHV(DHV {
            time: None,
            speed_3d: 0.12,
            ecef_x: 0.07,
            ecef_y: 0.09,
            ecef_z: 0.04,
            ground_speed: 0.11,
        });
        let mut payload = serialize(&sentence);
        assert_eq!(deserialize(&payload), Ok(sentence));

        payload[HEADER_LEN + 1..HEADER_LEN + 9].copy_from_slice(&f64::NAN.to_le_bytes());
        assert_eq!(deserialize(&payload), Err(DecodeError::MalformedBody(MessageType::Gndhv)));
    }

    #[test]
    fn test_text() {
        let mut w = PayloadWriter::default();
        w.text("ANTSTATUS=OK");
        let bytes = w.into_inner();

        assert_eq!(&bytes[..2], &[12, 0]);
        assert_eq!(text(&bytes).unwrap(), (&[][..], "ANTSTATUS=OK".to_string()));
        assert!(text(&[2, 0, 0xff, 0xfe]).is_err());
        assert!(text(&[5, 0, b'a']).is_err());
    }
}
