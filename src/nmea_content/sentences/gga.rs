use std::time::Duration;

use nom::{
    Parser,
    number::complete::{le_u8, le_u16, le_u32},
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    FieldError, IResult, RawSentence,
    diagnostics::Diagnostics,
    nmea_content::{
        FieldSchema, MessageType,
        parse::{Axis, clamp, coordinate, dop, enumerated, integer, number, optional_integer, optional_number, utc_time},
        sentences::{DistanceUnit, FixQuality},
    },
    wire::{PayloadWriter, WireBody, code, finite_f32, finite_f64, optional, time_of_day},
};

/// Longest DGPS correction age in seconds, the four digit field of the sentence.
const MAX_DGPS_AGE: f64 = 9999.9;

/// GGA - Global Positioning System Fix Data
///
/// <https://gpsd.gitlab.io/gpsd/NMEA.html#_gga_global_positioning_system_fix_data>
///
/// ```text
///                                                      11
///         1         2       3 4        5 6 7  8   9  10 |  12 13  14
///         |         |       | |        | | |  |   |   | |   | |   |
///  $--GGA,hhmmss.ss,ddmm.mm,a,dddmm.mm,a,x,xx,x.x,x.x,M,x.x,M,x.x,xxxx*hh<CR><LF>
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq)]
pub struct GGA {
    /// Fix time in UTC
    pub time: Option<time::Time>,
    pub latitude: f64,
    pub longitude: f64,
    /// GPS Quality Indicator
    pub fix_quality: FixQuality,
    /// Number of satellites in use, `[0, 99]`
    pub satellites: u8,
    /// Horizontal Dilution of Precision in tenths (`127` is 12.7)
    pub hdop: u16,
    /// Altitude above/below mean sea level
    pub altitude: f32,
    pub altitude_unit: DistanceUnit,
    /// Geoidal separation, negative when the geoid is below the ellipsoid
    pub geoid_separation: f32,
    pub geoid_unit: DistanceUnit,
    /// Age of differential corrections in whole milliseconds, `[0, 9999.9]` s,
    /// absent when DGPS is not used
    pub dgps_age: Option<Duration>,
    /// Differential reference station ID
    pub dgps_station: Option<u16>,
}

impl FieldSchema for GGA {
    const MESSAGE_TYPE: MessageType = MessageType::Gngga;
    const MIN_FIELDS: usize = 15;

    fn parse_fields(raw: &RawSentence<'_>, log: &Diagnostics<'_>) -> Result<Self, FieldError> {
        let satellites = clamp(integer(raw.field(7), "satellite count", log), 0, 99, "satellite count", log);

        let dgps_age = optional_number(raw.field(13), "DGPS age", log).map(|seconds| {
            let seconds = clamp(seconds, 0.0, MAX_DGPS_AGE, "DGPS age", log);
            Duration::from_millis((seconds * 1000.0).round() as u64)
        });

        let dgps_station = optional_integer(raw.field(14), "DGPS station", log)
            .map(|id| clamp(id, 0, 1023, "DGPS station", log) as u16);

        Ok(GGA {
            time: utc_time(raw.field(1), log),
            latitude: coordinate(raw.field(2), raw.field(3), Axis::Latitude, log),
            longitude: coordinate(raw.field(4), raw.field(5), Axis::Longitude, log),
            fix_quality: enumerated(raw.field(6), "fix quality", log),
            satellites: satellites as u8,
            hdop: dop(raw.field(8), "HDOP", log),
            altitude: altitude(raw.field(9), "altitude", log),
            altitude_unit: enumerated(raw.field(10), "altitude unit", log),
            geoid_separation: altitude(raw.field(11), "geoid separation", log),
            geoid_unit: enumerated(raw.field(12), "geoid unit", log),
            dgps_age,
            dgps_station,
        })
    }
}

/// Heights are stored as `f32`; anything that does not fit becomes `0`.
fn altitude(token: &str, field: &str, log: &Diagnostics<'_>) -> f32 {
    let value = number(token, field, log) as f32;

    if value.is_finite() {
        value
    } else {
        log.warning(format_args!("{field} {token} does not fit, using 0"));
        0.0
    }
}

impl WireBody for GGA {
    fn write_body(&self, w: &mut PayloadWriter) {
        w.time(self.time);
        w.f64(self.latitude);
        w.f64(self.longitude);
        w.code(self.fix_quality);
        w.u8(self.satellites);
        w.u16(self.hdop);
        w.f32(self.altitude);
        w.code(self.altitude_unit);
        w.f32(self.geoid_separation);
        w.code(self.geoid_unit);
        w.option(self.dgps_age, |w, age| {
            w.u32(u32::try_from(age.as_millis()).unwrap_or(u32::MAX))
        });
        w.option(self.dgps_station, PayloadWriter::u16);
    }

    fn read_body(i: &[u8]) -> IResult<&[u8], Self> {
        let (i, time) = time_of_day(i)?;
        let (i, latitude) = finite_f64(i)?;
        let (i, longitude) = finite_f64(i)?;
        let (i, fix_quality) = code(i)?;
        let (i, satellites) = le_u8(i)?;
        let (i, hdop) = le_u16(i)?;
        let (i, altitude) = finite_f32(i)?;
        let (i, altitude_unit) = code(i)?;
        let (i, geoid_separation) = finite_f32(i)?;
        let (i, geoid_unit) = code(i)?;
        let (i, dgps_age) = optional(le_u32).parse(i)?;
        let dgps_age = dgps_age.map(|ms| Duration::from_millis(ms.into()));
        let (i, dgps_station) = optional(le_u16).parse(i)?;

        Ok((
            i,
            GGA {
                time,
                latitude,
                longitude,
                fix_quality,
                satellites,
                hdop,
                altitude,
                altitude_unit,
                geoid_separation,
                geoid_unit,
                dgps_age,
                dgps_station,
            },
        ))
    }
}
