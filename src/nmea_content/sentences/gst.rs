#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    FieldError, IResult, RawSentence,
    diagnostics::Diagnostics,
    nmea_content::{
        FieldSchema, MessageType,
        parse::{number, require_angle, require_non_negative, utc_time},
    },
    wire::{PayloadWriter, WireBody, finite_f64, time_of_day},
};

/// GST - GPS Pseudorange Noise Statistics
///
/// <https://gpsd.gitlab.io/gpsd/NMEA.html#_gst_gps_pseudorange_noise_statistics>
///
/// ```text
///              1    2 3 4 5 6 7 8
///              |    | | | | | | |
///  $ --GST,hhmmss.ss,x,x,x,x,x,x,x*hh<CR><LF>
/// ```
///
/// Unlike the other sentences, a negative deviation or an unusable orientation
/// rejects the whole sentence.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq)]
pub struct GST {
    pub time: Option<time::Time>,
    /// RMS value of the standard deviation of the range inputs
    pub rms: f64,
    /// Standard deviation of the semi-major axis of the error ellipse, meters
    pub semi_major: f64,
    /// Standard deviation of the semi-minor axis of the error ellipse, meters
    pub semi_minor: f64,
    /// Orientation of the semi-major axis, degrees from true north
    pub orientation: f64,
    /// Standard deviation of latitude error, meters
    pub latitude_error: f64,
    /// Standard deviation of longitude error, meters
    pub longitude_error: f64,
    /// Standard deviation of altitude error, meters
    pub altitude_error: f64,
}

impl FieldSchema for GST {
    const MESSAGE_TYPE: MessageType = MessageType::Gngst;
    const MIN_FIELDS: usize = 9;

    fn parse_fields(raw: &RawSentence<'_>, log: &Diagnostics<'_>) -> Result<Self, FieldError> {
        let deviation = |index: usize, field: &'static str| {
            require_non_negative(number(raw.field(index), field, log), field, log)
        };

        let gst = GST {
            time: utc_time(raw.field(1), log),
            rms: deviation(2, "RMS")?,
            semi_major: deviation(3, "semi-major error")?,
            semi_minor: deviation(4, "semi-minor error")?,
            orientation: require_angle(number(raw.field(5), "orientation", log), "orientation", log)?,
            latitude_error: deviation(6, "latitude error")?,
            longitude_error: deviation(7, "longitude error")?,
            altitude_error: deviation(8, "altitude error")?,
        };

        if gst.semi_major < gst.semi_minor {
            log.warning(format_args!(
                "Semi-major error {} is smaller than semi-minor error {}",
                gst.semi_major, gst.semi_minor
            ));
        }

        Ok(gst)
    }
}

impl WireBody for GST {
    fn write_body(&self, w: &mut PayloadWriter) {
        w.time(self.time);
        for value in [
            self.rms,
            self.semi_major,
            self.semi_minor,
            self.orientation,
            self.latitude_error,
            self.longitude_error,
            self.altitude_error,
        ] {
            w.f64(value);
        }
    }

    fn read_body(i: &[u8]) -> IResult<&[u8], Self> {
        let (i, time) = time_of_day(i)?;
        let (i, rms) = finite_f64(i)?;
        let (i, semi_major) = finite_f64(i)?;
        let (i, semi_minor) = finite_f64(i)?;
        let (i, orientation) = finite_f64(i)?;
        let (i, latitude_error) = finite_f64(i)?;
        let (i, longitude_error) = finite_f64(i)?;
        let (i, altitude_error) = finite_f64(i)?;

        Ok((
            i,
            GST {
                time,
                rms,
                semi_major,
                semi_minor,
                orientation,
                latitude_error,
                longitude_error,
                altitude_error,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{diagnostics::Severity, tests::support::RecordingSink};

    #[test]
    fn test_gst_parsing() {
        let sink = RecordingSink::default();
        let log = Diagnostics::new(&sink, "GNGST");
        let raw = RawSentence::from_payload("GNGST,052714.00,12,2.5,1.5,-45.0,1.8,1.9,3.2");
        let gst = GST::parse_fields(&raw, &log).unwrap();

        assert_eq!(gst.rms, 12.0);
        assert_eq!((gst.semi_major, gst.semi_minor), (2.5, 1.5));
        assert_eq!(gst.orientation, 315.0);
        assert_eq!(
            (gst.latitude_error, gst.longitude_error, gst.altitude_error),
            (1.8, 1.9, 3.2)
        );
        assert!(sink.entries().is_empty());
    }

    #[test]
    fn test_gst_strict_checks() {
        let sink = RecordingSink::default();
        let log = Diagnostics::new(&sink, "GNGST");

        let raw = RawSentence::from_payload("GNGST,052714.00,12,2.5,1.5,45.0,-1.8,1.9,3.2");
        let error = GST::parse_fields(&raw, &log).unwrap_err();
        assert_eq!(error.field, "latitude error");
        assert!(sink.contains(Severity::Error, "Negative latitude error value: -1.8"));

        let raw = RawSentence::from_payload("GNGST,052714.00,-0.5,2.5,1.5,45.0,1.8,1.9,3.2");
        let error = GST::parse_fields(&raw, &log).unwrap_err();
        assert_eq!(error.field, "RMS");
    }

    #[test]
    fn test_gst_advisory_ellipse() {
        let sink = RecordingSink::default();
        let log = Diagnostics::new(&sink, "GNGST");
        let raw = RawSentence::from_payload("GNGST,052714.00,12,1.5,2.5,45.0,1.8,1.9,3.2");

        assert!(GST::parse_fields(&raw, &log).is_ok());
        assert!(sink.contains(Severity::Warning, "Semi-major error 1.5 is smaller than semi-minor error 2.5"));
    }
}
