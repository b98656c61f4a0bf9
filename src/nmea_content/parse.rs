//! Field validators shared by all sentence parsers.
//!
//! Apart from [`require_non_negative`] and [`require_angle`], nothing here fails:
//! a bad value is logged and replaced by a default or clamped into range.

use std::fmt::Display;

use nom::{
    Parser,
    character::complete::{char, digit1},
    combinator::opt,
    error::ErrorKind,
    sequence::preceded,
};
use time::{Date, Month, Time};

use crate::{
    Error, FieldError, IResult,
    diagnostics::Diagnostics,
    nmea_content::sentences::FieldEnum,
    parsing::{self, consumed, two_digits},
};

/// Which coordinate a `DDDMM.mmmm` value encodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    fn limit(self) -> f64 {
        match self {
            Axis::Latitude => 90.0,
            Axis::Longitude => 180.0,
        }
    }

    fn hemispheres(self) -> (&'static str, &'static str) {
        match self {
            Axis::Latitude => ("N", "S"),
            Axis::Longitude => ("E", "W"),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Axis::Latitude => "latitude",
            Axis::Longitude => "longitude",
        }
    }
}

/// `hhmmss[.f...]`, the fraction being a decimal fraction of a second.
fn hhmmss(i: &str) -> IResult<&str, Time> {
    let input = i;
    let (i, (hour, minute, second)) = (two_digits, two_digits, two_digits).parse(i)?;
    let (i, fraction) = opt(preceded(char('.'), digit1)).parse(i)?;
    let millisecond = fraction.map_or(0, fraction_millis);

    match Time::from_hms_milli(hour, minute, second, millisecond) {
        Ok(time) => Ok((i, time)),
        Err(_) => Err(nom::Err::Error(Error::InvalidValue(input))),
    }
}

fn fraction_millis(digits: &str) -> u16 {
    digits
        .bytes()
        .chain(std::iter::repeat(b'0'))
        .take(3)
        .fold(0, |millis, digit| millis * 10 + u16::from(digit - b'0'))
}

/// UTC time of day. Invalid or empty tokens give `None` and an error log.
pub(crate) fn utc_time(token: &str, log: &Diagnostics<'_>) -> Option<Time> {
    if token.len() < 6 {
        log.error(format_args!("Invalid time format: {token:?}"));
        return None;
    }

    match consumed(hhmmss, ErrorKind::Eof).parse(token) {
        Ok((_, time)) => Some(time),
        Err(_) => {
            log.error(format_args!("Invalid time value: {token:?}"));
            None
        }
    }
}

/// A `DDMMYY` date in the 2000s.
pub(crate) fn date_ddmmyy(token: &str, log: &Diagnostics<'_>) -> Option<Date> {
    let parsed: IResult<&str, (u8, u8, u8)> =
        consumed((two_digits, two_digits, two_digits), ErrorKind::Eof).parse(token);

    match parsed {
        Ok((_, (day, month, year))) => calendar_date(day.into(), month.into(), 2000 + i64::from(year), log),
        Err(_) => {
            log.error(format_args!("Invalid date format: {token:?}"));
            None
        }
    }
}

/// A date spread over three fields, the year written in full.
pub(crate) fn date_parts(day: &str, month: &str, year: &str, log: &Diagnostics<'_>) -> Option<Date> {
    let field = |token: &str, name: &str| match parsing::integer(token) {
        Ok((_, value)) => Some(value),
        Err(_) => {
            log.error(format_args!("Invalid {name} value: {token:?}"));
            None
        }
    };

    let (day, month, year) = (field(day, "day")?, field(month, "month")?, field(year, "year")?);

    if !(1970..=2100).contains(&year) {
        log.error(format_args!("Invalid year value: {year}"));
        return None;
    }

    calendar_date(day, month, year, log)
}

fn calendar_date(day: i64, month: i64, year: i64, log: &Diagnostics<'_>) -> Option<Date> {
    if !(1..=31).contains(&day) {
        log.error(format_args!("Invalid day value: {day}"));
        return None;
    }

    let Some(month) = u8::try_from(month).ok().and_then(|m| Month::try_from(m).ok()) else {
        log.error(format_args!("Invalid month value: {month}"));
        return None;
    };

    // day is within 1..=31 and year within 1970..=2100 at this point
    match Date::from_calendar_date(year as i32, month, day as u8) {
        Ok(date) => Some(date),
        Err(_) => {
            log.error(format_args!("Invalid date: {year}-{month}-{day}"));
            None
        }
    }
}

/// Converts `DDDMM.mmmm` plus hemisphere to signed decimal degrees.
pub(crate) fn coordinate(value: &str, hemisphere: &str, axis: Axis, log: &Diagnostics<'_>) -> f64 {
    let name = axis.name();

    if value.is_empty() || hemisphere.is_empty() {
        log.error(format_args!("Empty {name} value or direction"));
        return 0.0;
    }

    let Ok((_, raw)) = parsing::number(value) else {
        log.error(format_args!("Invalid {name} value: {value:?}"));
        return 0.0;
    };

    let degrees = (raw / 100.0).floor() + (raw % 100.0) / 60.0;
    let (positive, negative) = axis.hemispheres();
    let signed = if hemisphere == negative {
        -degrees
    } else {
        if hemisphere != positive {
            log.warning(format_args!("Unexpected {name} direction: {hemisphere:?}"));
        }
        degrees
    };

    clamp(signed, -axis.limit(), axis.limit(), name, log)
}

/// Folds `degrees` into `[0, 360)`.
///
/// ```rust
/// use nmea0183_navdata::normalize_angle;
///
/// assert_eq!(normalize_angle(-10.0), 350.0);
/// assert_eq!(normalize_angle(370.0), 10.0);
/// assert_eq!(normalize_angle(360.0), 0.0);
/// ```
pub fn normalize_angle(degrees: f64) -> f64 {
    let mut angle = degrees % 360.0;
    if angle < 0.0 {
        angle += 360.0;
    }

    // -0.0 and a tiny negative remainder rounding up to 360.0 both fold to 0
    if angle == 0.0 || angle >= 360.0 { 0.0 } else { angle }
}

/// Soft angle check: a non-finite value becomes `0` with a warning.
pub(crate) fn angle(degrees: f64, field: &str, log: &Diagnostics<'_>) -> f64 {
    if !degrees.is_finite() {
        log.warning(format_args!("Invalid {field} angle {degrees}, using 0"));
        return 0.0;
    }

    normalize_angle(degrees)
}

/// Strict angle check.
pub(crate) fn require_angle(degrees: f64, field: &'static str, log: &Diagnostics<'_>) -> Result<f64, FieldError> {
    let angle = normalize_angle(degrees);

    if !(0.0..360.0).contains(&angle) {
        log.error(format_args!("Invalid {field} angle: {degrees}"));
        return Err(FieldError::new(field, format!("angle {degrees} out of range")));
    }

    Ok(angle)
}

/// Strict non-negative check.
pub(crate) fn require_non_negative(value: f64, field: &'static str, log: &Diagnostics<'_>) -> Result<f64, FieldError> {
    if value < 0.0 {
        log.error(format_args!("Negative {field} value: {value}"));
        return Err(FieldError::new(field, format!("negative value {value}")));
    }

    Ok(value)
}

/// Clamps `value` into `[min, max]`, warning when it had to.
pub(crate) fn clamp<T>(value: T, min: T, max: T, field: &str, log: &Diagnostics<'_>) -> T
where
    T: PartialOrd + Copy + Display,
{
    let clamped = if value < min {
        min
    } else if value > max {
        max
    } else {
        return value;
    };

    log.warning(format_args!(
        "{field} {value} out of range [{min}, {max}], clamped to {clamped}"
    ));
    clamped
}

/// A required decimal field. Empty gives `0` with a warning, garbage gives `0` with an error.
pub(crate) fn number(token: &str, field: &str, log: &Diagnostics<'_>) -> f64 {
    if token.is_empty() {
        log.warning(format_args!("Empty {field} value, using 0"));
        return 0.0;
    }

    match parsing::number(token) {
        Ok((_, value)) => value,
        Err(_) => {
            log.error(format_args!("Invalid {field} value: {token:?}"));
            0.0
        }
    }
}

/// A required integer field, same rules as [`number`].
pub(crate) fn integer(token: &str, field: &str, log: &Diagnostics<'_>) -> i64 {
    if token.is_empty() {
        log.warning(format_args!("Empty {field} value, using 0"));
        return 0;
    }

    match parsing::integer(token) {
        Ok((_, value)) => value,
        Err(_) => {
            log.error(format_args!("Invalid {field} value: {token:?}"));
            0
        }
    }
}

/// An optional decimal field. Empty is silently `None`.
pub(crate) fn optional_number(token: &str, field: &str, log: &Diagnostics<'_>) -> Option<f64> {
    if token.is_empty() {
        return None;
    }

    let parsed = parsing::number(token).map(|(_, value)| value).ok();
    if parsed.is_none() {
        log.warning(format_args!("Invalid {field} value: {token:?}"));
    }
    parsed
}

/// An optional integer field. Empty is silently `None`.
pub(crate) fn optional_integer(token: &str, field: &str, log: &Diagnostics<'_>) -> Option<i64> {
    if token.is_empty() {
        return None;
    }

    let parsed = parsing::integer(token).map(|(_, value)| value).ok();
    if parsed.is_none() {
        log.warning(format_args!("Invalid {field} value: {token:?}"));
    }
    parsed
}

/// A dilution of precision, clamped to `[0, 99.9]` and stored in tenths.
pub(crate) fn dop(token: &str, field: &str, log: &Diagnostics<'_>) -> u16 {
    let value = clamp(number(token, field, log), 0.0, 99.9, field, log);
    (value * 10.0).round() as u16
}

/// `A` is valid, `V` is not. Anything else counts as not valid.
pub(crate) fn status(token: &str, field: &str, log: &Diagnostics<'_>) -> bool {
    match token {
        "A" => true,
        "V" => false,
        other => {
            log.warning(format_args!("Unexpected {field} status: {other:?}"));
            false
        }
    }
}

/// Maps a token to its closed-set member. Empty is the fallback member, an
/// unknown token is the fallback member plus a warning.
pub(crate) fn enumerated<T: FieldEnum>(token: &str, field: &str, log: &Diagnostics<'_>) -> T {
    if token.is_empty() {
        return T::UNDEFINED;
    }

    T::from_token(token).unwrap_or_else(|| {
        log.warning(format_args!("Unknown {field} value: {token:?}"));
        T::UNDEFINED
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{diagnostics::Severity, tests::support::RecordingSink};

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() < tolerance,
            "{actual} is not within {tolerance} of {expected}"
        );
    }

    #[test]
    fn test_utc_time() {
        let sink = RecordingSink::default();
        let log = Diagnostics::new(&sink, "TEST");

        let cases = [
            ("052714.00", Time::from_hms_milli(5, 27, 14, 0)),
            ("052714", Time::from_hms_milli(5, 27, 14, 0)),
            ("235959.5", Time::from_hms_milli(23, 59, 59, 500)),
            ("120000.25", Time::from_hms_milli(12, 0, 0, 250)),
            ("120000.1234", Time::from_hms_milli(12, 0, 0, 123)),
        ];

        for (input, expected) in cases {
            assert_eq!(utc_time(input, &log), expected.ok(), "Failed: {input:?}");
        }
        assert!(sink.entries().is_empty());

        for input in ["", "0527", "05271a", "246000", "126100.00", "120000.", "120000,5"] {
            assert_eq!(utc_time(input, &log), None, "Failed: {input:?}");
        }
        assert_eq!(sink.count(Severity::Error), 7);
    }

    #[test]
    fn test_dates() {
        let sink = RecordingSink::default();
        let log = Diagnostics::new(&sink, "TEST");

        assert_eq!(
            date_ddmmyy("061224", &log),
            Date::from_calendar_date(2024, Month::December, 6).ok()
        );
        assert_eq!(
            date_parts("06", "12", "2024", &log),
            Date::from_calendar_date(2024, Month::December, 6).ok()
        );
        assert!(sink.entries().is_empty());

        assert_eq!(date_ddmmyy("", &log), None);
        assert_eq!(date_ddmmyy("321224", &log), None);
        assert_eq!(date_ddmmyy("061324", &log), None);
        assert_eq!(date_ddmmyy("310224", &log), None);
        assert_eq!(date_parts("06", "12", "1969", &log), None);
        assert_eq!(date_parts("06", "12", "2101", &log), None);
        assert_eq!(date_parts("00", "12", "2024", &log), None);
        assert_eq!(date_parts("", "", "", &log), None);
        assert_eq!(sink.count(Severity::Error), 8);
    }

    #[test]
    fn test_coordinate() {
        let sink = RecordingSink::default();
        let log = Diagnostics::new(&sink, "TEST");

        assert_close(coordinate("4807.038", "N", Axis::Latitude, &log), 48.1173, 1e-4);
        assert_close(coordinate("01131.000", "W", Axis::Longitude, &log), -11.5167, 1e-4);
        assert_close(coordinate("5624.91014", "N", Axis::Latitude, &log), 56.4152, 1e-4);
        assert_close(coordinate("06153.41794", "E", Axis::Longitude, &log), 61.8903, 1e-4);
        assert_close(coordinate("3345.000", "S", Axis::Latitude, &log), -33.75, 1e-9);
        assert!(sink.entries().is_empty());

        assert_eq!(coordinate("", "N", Axis::Latitude, &log), 0.0);
        assert_eq!(coordinate("4807.038", "", Axis::Latitude, &log), 0.0);
        assert_eq!(coordinate("48x7.038", "N", Axis::Latitude, &log), 0.0);
        assert_eq!(sink.count(Severity::Error), 3);

        assert_close(coordinate("4807.038", "Q", Axis::Latitude, &log), 48.1173, 1e-4);
        assert!(sink.contains(Severity::Warning, "Unexpected latitude direction"));

        assert_eq!(coordinate("9530.000", "N", Axis::Latitude, &log), 90.0);
        assert!(sink.contains(Severity::Warning, "latitude 95.5 out of range"));
    }

    #[test]
    fn test_angles() {
        assert_eq!(normalize_angle(-10.0), 350.0);
        assert_eq!(normalize_angle(370.0), 10.0);
        assert_eq!(normalize_angle(0.0), 0.0);
        assert_eq!(normalize_angle(720.0), 0.0);
        assert_eq!(normalize_angle(-360.0).to_bits(), 0.0f64.to_bits());
        assert_eq!(normalize_angle(-1e-20), 0.0);
        assert_eq!(normalize_angle(359.5), 359.5);

        let sink = RecordingSink::default();
        let log = Diagnostics::new(&sink, "TEST");

        assert_eq!(angle(f64::NAN, "course", &log), 0.0);
        assert!(sink.contains(Severity::Warning, "Invalid course angle"));

        assert_eq!(require_angle(-90.0, "orientation", &log), Ok(270.0));
        assert!(require_angle(f64::INFINITY, "orientation", &log).is_err());
        assert_eq!(require_non_negative(0.0, "rms", &log), Ok(0.0));
        assert!(require_non_negative(-0.1, "rms", &log).is_err());
    }

    #[test]
    fn test_numbers() {
        let sink = RecordingSink::default();
        let log = Diagnostics::new(&sink, "TEST");

        assert_eq!(number("1.27", "hdop", &log), 1.27);
        assert_eq!(integer("06", "satellites", &log), 6);
        assert_eq!(optional_number("", "age", &log), None);
        assert_eq!(optional_integer("", "station", &log), None);
        assert!(sink.entries().is_empty());

        assert_eq!(number("", "course", &log), 0.0);
        assert!(sink.contains(Severity::Warning, "Empty course value"));
        assert_eq!(number("fast", "speed", &log), 0.0);
        assert!(sink.contains(Severity::Error, "Invalid speed value"));
        assert_eq!(optional_integer("x1", "station", &log), None);
        assert!(sink.contains(Severity::Warning, "Invalid station value"));
    }

    #[test]
    fn test_clamp_and_dop() {
        let sink = RecordingSink::default();
        let log = Diagnostics::new(&sink, "GNGGA");

        assert_eq!(clamp(5, 0, 99, "satellites", &log), 5);
        assert!(sink.entries().is_empty());

        assert_eq!(clamp(150, 0, 99, "satellites", &log), 99);
        assert_eq!(clamp(-3.5, 0.0, 1.0, "speed", &log), 0.0);
        assert_eq!(sink.count(Severity::Warning), 2);

        sink.clear();
        assert_eq!(dop("1.27", "HDOP", &log), 13);
        assert_eq!(dop("999.9", "HDOP", &log), 999);
        assert!(sink.contains(Severity::Warning, "[GNGGA] HDOP 999.9 out of range"));
    }
}
