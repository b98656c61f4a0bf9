//! # Reports
//!
//! Human-readable rendering of sentences and records, one `Label: value` line
//! per field.
//!
//! ```rust
//! use nmea0183_navdata::{NavigationEngine, diagnostics::NullSink};
//!
//! let mut engine = NavigationEngine::builder().log_sink(NullSink).build();
//! let record = engine.process_line("$GNZDA,052714.00,06,12,2024,00,00*7C");
//!
//! let report = record.report().to_string();
//! assert!(report.starts_with("Parsing Timestamp: "));
//! assert!(report.ends_with("GNZDA\n  UTC Time: 05:27:14.000\n  Date: 06.12.2024\n  Local Offset: UTC+00:00\n"));
//! ```

use std::fmt::{self, Display, Formatter};

use time::{Date, Time, UtcOffset};

use crate::{
    nmea_content::{DHV, GGA, GLL, GSA, GST, GSV, NmeaSentence, RMC, TXT, VTG, ZDA, sentences::GnssSystem},
    record::NavigationRecord,
};

struct Clock(Option<Time>);

impl Display for Clock {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(time) => write!(
                f,
                "{:02}:{:02}:{:02}.{:03}",
                time.hour(),
                time.minute(),
                time.second(),
                time.millisecond()
            ),
            None => f.write_str("N/A"),
        }
    }
}

struct Day(Option<Date>);

impl Display for Day {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(date) => write!(f, "{:02}.{:02}.{:04}", date.day(), u8::from(date.month()), date.year()),
            None => f.write_str("N/A"),
        }
    }
}

/// Degrees, minutes and seconds with a hemisphere letter.
struct Dms {
    degrees: f64,
    hemispheres: (char, char),
}

impl Dms {
    fn latitude(degrees: f64) -> Self {
        Dms {
            degrees,
            hemispheres: ('N', 'S'),
        }
    }

    fn longitude(degrees: f64) -> Self {
        Dms {
            degrees,
            hemispheres: ('E', 'W'),
        }
    }
}

impl Display for Dms {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let (positive, negative) = self.hemispheres;
        let direction = if self.degrees >= 0.0 { positive } else { negative };

        let value = self.degrees.abs();
        let whole = value.trunc();
        let minutes = (value - whole) * 60.0;
        let seconds = (minutes - minutes.trunc()) * 60.0;

        write!(f, "{whole}°{:02}'{seconds:05.2}\" {direction}", minutes.trunc())
    }
}

struct Offset(UtcOffset);

impl Display for Offset {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let seconds = self.0.whole_seconds();
        let sign = if seconds < 0 { '-' } else { '+' };
        let minutes = seconds.abs() / 60;
        write!(f, "UTC{sign}{:02}:{:02}", minutes / 60, minutes % 60)
    }
}

fn tenths(value: u16) -> f64 {
    f64::from(value) / 10.0
}

fn yes_no(value: bool) -> &'static str {
    if value { "Yes" } else { "No" }
}

fn or_na<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| "N/A".to_string(), |value| value.to_string())
}

impl Display for RMC {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Time: {}", Clock(self.time))?;
        writeln!(f, "  Date: {}", Day(self.date))?;
        writeln!(f, "  Latitude: {:.6}", self.latitude)?;
        writeln!(f, "  Longitude: {:.6}", self.longitude)?;
        writeln!(f, "  Speed: {:.1} knots", self.speed)?;
        writeln!(f, "  Course: {:.1}°", self.course)?;
        writeln!(f, "  Magnetic Variation: {:.1}°", self.magnetic_variation)?;
        writeln!(f, "  Mode: {:?}", self.coordinate_definition)?;
        writeln!(f, "  Valid: {}", yes_no(self.is_valid))
    }
}

impl Display for GGA {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Time: {}", Clock(self.time))?;
        writeln!(f, "  Latitude: {:.6}", self.latitude)?;
        writeln!(f, "  Longitude: {:.6}", self.longitude)?;
        writeln!(f, "  Quality: {:?}", self.fix_quality)?;
        writeln!(f, "  Satellites: {}", self.satellites)?;
        writeln!(f, "  HDOP: {:.1}", tenths(self.hdop))?;
        writeln!(f, "  Altitude: {:.2} {:?}", self.altitude, self.altitude_unit)?;
        writeln!(f, "  Geoid Separation: {:.2} {:?}", self.geoid_separation, self.geoid_unit)?;
        writeln!(
            f,
            "  DGPS Age: {}",
            or_na(self.dgps_age.map(|age| format!("{:.1} s", age.as_secs_f64())))
        )?;
        writeln!(f, "  DGPS ID: {}", or_na(self.dgps_station))
    }
}

impl Display for GSA {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let satellites: Vec<String> = self.satellites.iter().map(u8::to_string).collect();
        let system = match self.system {
            GnssSystem::Gps => "GPS",
            GnssSystem::Glonass => "GLONASS",
            GnssSystem::Galileo => "Galileo",
            GnssSystem::Beidou => "BeiDou",
            GnssSystem::Undefined => "Unknown",
        };

        writeln!(f, "  Selection: {:?}", self.selection_mode)?;
        writeln!(f, "  Fix Type: {:?}", self.fix_mode)?;
        writeln!(f, "  Satellites Used: {}", satellites.join(", "))?;
        writeln!(f, "  PDOP: {:.1}", tenths(self.pdop))?;
        writeln!(f, "  HDOP: {:.1}", tenths(self.hdop))?;
        writeln!(f, "  VDOP: {:.1}", tenths(self.vdop))?;
        writeln!(f, "  GNSS: {system}")
    }
}

impl Display for ZDA {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "  UTC Time: {}", Clock(self.time))?;
        writeln!(f, "  Date: {}", Day(self.date))?;
        writeln!(f, "  Local Offset: {}", Offset(self.local_offset))
    }
}

impl Display for DHV {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Time: {}", Clock(self.time))?;
        writeln!(f, "  3D Speed: {:.2} m/s", self.speed_3d)?;
        writeln!(f, "  ECEF X: {:.2} m/s", self.ecef_x)?;
        writeln!(f, "  ECEF Y: {:.2} m/s", self.ecef_y)?;
        writeln!(f, "  ECEF Z: {:.2} m/s", self.ecef_z)?;
        writeln!(f, "  Ground Speed: {:.2} m/s", self.ground_speed)
    }
}

impl Display for GST {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Time: {}", Clock(self.time))?;
        writeln!(f, "  RMS: {:.2}", self.rms)?;
        writeln!(f, "  Error Ellipse: {:.2} m x {:.2} m at {:.1}°", self.semi_major, self.semi_minor, self.orientation)?;
        writeln!(
            f,
            "  Position Error: {:.2} m lat, {:.2} m lon, {:.2} m alt",
            self.latitude_error, self.longitude_error, self.altitude_error
        )
    }
}

impl Display for TXT {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Message: {}", self.text)?;
        writeln!(f, "  Type: {}", self.identifier)?;
        writeln!(f, "  Number: {} of {}", self.number, self.total)
    }
}

impl Display for GLL {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Latitude: {}", Dms::latitude(self.latitude))?;
        writeln!(f, "  Longitude: {}", Dms::longitude(self.longitude))?;
        writeln!(f, "  Time: {}", Clock(self.time))?;
        writeln!(f, "  Valid: {}", yes_no(self.is_valid))
    }
}

impl Display for GSV {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Total Messages: {}", self.total)?;
        writeln!(f, "  Current Message: {}", self.number)?;
        writeln!(f, "  Satellites in View: {}", self.satellites_in_view)?;
        writeln!(f, "  Satellites Data:")?;
        for satellite in &self.satellites {
            writeln!(
                f,
                "    PRN: {}  Elev: {}  Azim: {}  SNR: {}",
                satellite.prn,
                or_na(satellite.elevation.map(|value| format!("{value:.1}°"))),
                or_na(satellite.azimuth.map(|value| format!("{value:.1}°"))),
                or_na(satellite.snr.map(|value| format!("{value:.1} dBHz"))),
            )?;
        }
        Ok(())
    }
}

impl Display for VTG {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Course: {:.1}°", self.true_course)?;
        writeln!(f, "  Ground Speed: {:.1} knots", self.speed_knots)?;
        writeln!(f, "  Ground Speed (km/h): {:.1} km/h", self.speed_kmh)
    }
}

impl Display for NmeaSentence {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.message_type())?;

        match self {
            NmeaSentence::RMC(rmc) => Display::fmt(rmc, f),
            NmeaSentence::GGA(gga) => Display::fmt(gga, f),
            NmeaSentence::GSA(gsa) => Display::fmt(gsa, f),
            NmeaSentence::ZDA(zda) => Display::fmt(zda, f),
            NmeaSentence::DHV(dhv) => Display::fmt(dhv, f),
            NmeaSentence::GST(gst) => Display::fmt(gst, f),
            NmeaSentence::TXT(txt) => Display::fmt(txt, f),
            NmeaSentence::GLL(gll) => Display::fmt(gll, f),
            NmeaSentence::GSV(gsv) => Display::fmt(gsv, f),
            NmeaSentence::VTG(vtg) => Display::fmt(vtg, f),
        }
    }
}

/// Printable view of a [`NavigationRecord`], see [`NavigationRecord::report`].
pub struct Report<'a>(&'a NavigationRecord);

impl NavigationRecord {
    /// Renders the processing time followed by the decoded sentence.
    pub fn report(&self) -> Report<'_> {
        Report(self)
    }
}

impl Display for Report<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let at = self.0.parsed_at();
        writeln!(
            f,
            "Parsing Timestamp: {:04}-{:02}-{:02} {:02}:{:02}:{:02}\n",
            at.year(),
            u8::from(at.month()),
            at.day(),
            at.hour(),
            at.minute(),
            at.second()
        )?;

        if !self.0.is_ok() {
            return match self.0.message_type() {
                Some(message_type) => writeln!(f, "{message_type}\n  Parse failed"),
                None => writeln!(f, "Parse failed"),
            };
        }

        match self.0.decode() {
            Ok(sentence) => Display::fmt(&sentence, f),
            Err(error) => writeln!(f, "Undecodable payload: {error}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nmea_content::sentences::{ModeIndicator, Satellite};

    #[test]
    fn test_coordinates() {
        assert_eq!(Dms::latitude(-33.75).to_string(), "33°45'00.00\" S");
        assert_eq!(Dms::longitude(151.5).to_string(), "151°30'00.00\" E");
        assert_eq!(Dms::longitude(-0.25).to_string(), "0°15'00.00\" W");
    }

    #[test]
    fn test_offsets_and_clock() {
        assert_eq!(Offset(UtcOffset::from_hms(-5, -30, 0).unwrap()).to_string(), "UTC-05:30");
        assert_eq!(Offset(UtcOffset::UTC).to_string(), "UTC+00:00");
        assert_eq!(Clock(Time::from_hms_milli(5, 27, 14, 50).ok()).to_string(), "05:27:14.050");
        assert_eq!(Clock(None).to_string(), "N/A");
        assert_eq!(Day(None).to_string(), "N/A");
    }

    #[test]
    fn test_sentence_report() {
        let gll = NmeaSentence::GLL(GLL {
            latitude: -33.75,
            longitude: 151.5,
            time: Time::from_hms(5, 27, 14).ok(),
            is_valid: true,
            mode: ModeIndicator::Autonomous,
        });

        assert_eq!(
            gll.to_string(),
            "GNGLL\n  Latitude: 33°45'00.00\" S\n  Longitude: 151°30'00.00\" E\n  Time: 05:27:14.000\n  Valid: Yes\n"
        );

        let gsv = GSV {
            total: 1,
            number: 1,
            satellites_in_view: 1,
            satellites: heapless::Vec::from_slice(&[Satellite {
                prn: 67,
                elevation: Some(45.0),
                azimuth: None,
                snr: Some(38.0),
            }])
            .unwrap(),
            signal_id: None,
        };
        assert!(gsv.to_string().contains("    PRN: 67  Elev: 45.0°  Azim: N/A  SNR: 38.0 dBHz\n"));
    }

    #[test]
    fn test_failed_record_report() {
        let record = NavigationRecord::failed(None);
        assert!(record.report().to_string().ends_with("\n\nParse failed\n"));
    }
}
