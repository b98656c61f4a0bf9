#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    FieldError, IResult, RawSentence,
    diagnostics::Diagnostics,
    nmea_content::{
        FieldSchema, MessageType,
        parse::{Axis, angle, clamp, coordinate, date_ddmmyy, enumerated, number, optional_number, status, utc_time},
        sentences::CoordinateDefinition,
    },
    wire::{PayloadWriter, WireBody, calendar_date, code, finite_f32, finite_f64, flag, time_of_day},
};

/// RMC - Recommended Minimum Navigation Information
///
/// <https://gpsd.gitlab.io/gpsd/NMEA.html#_rmc_recommended_minimum_navigation_information>
///
/// ```text
///                                                            12
///         1         2 3       4 5        6 7   8   9      10 11| 13
///         |         | |       | |        | |   |   |      |  | | |
///  $--RMC,hhmmss.ss,A,ddmm.mm,a,dddmm.mm,a,x.x,x.x,ddmmyy,x.x,a,m,s*hh<CR><LF>
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq)]
pub struct RMC {
    /// Fix time in UTC
    pub time: Option<time::Time>,
    /// Status, `true` for A (valid)
    pub is_valid: bool,
    /// Latitude in decimal degrees, south negative
    pub latitude: f64,
    /// Longitude in decimal degrees, west negative
    pub longitude: f64,
    /// Speed over ground in knots, `[0, 102.3]`
    pub speed: f64,
    /// Course over ground in degrees true, `[0, 360)`
    pub course: f64,
    /// Fix date in UTC
    pub date: Option<time::Date>,
    /// Magnetic variation in degrees, west negative, `[-180, 180]`
    pub magnetic_variation: f32,
    /// Mode indicator
    pub coordinate_definition: CoordinateDefinition,
    /// Navigational status (NMEA 4.1), `true` for A
    pub nav_status: bool,
}

impl FieldSchema for RMC {
    const MESSAGE_TYPE: MessageType = MessageType::Gnrmc;
    const MIN_FIELDS: usize = 12;

    fn parse_fields(raw: &RawSentence<'_>, log: &Diagnostics<'_>) -> Result<Self, FieldError> {
        let variation = optional_number(raw.field(10), "magnetic variation", log).unwrap_or(0.0);
        let variation = match raw.field(11) {
            "W" => -variation,
            _ => variation,
        };
        let magnetic_variation = clamp(variation, -180.0, 180.0, "magnetic variation", log) as f32;

        Ok(RMC {
            time: utc_time(raw.field(1), log),
            is_valid: status(raw.field(2), "RMC", log),
            latitude: coordinate(raw.field(3), raw.field(4), Axis::Latitude, log),
            longitude: coordinate(raw.field(5), raw.field(6), Axis::Longitude, log),
            speed: clamp(number(raw.field(7), "speed", log), 0.0, 102.3, "speed", log),
            course: angle(number(raw.field(8), "course", log), "course", log),
            date: date_ddmmyy(raw.field(9), log),
            magnetic_variation,
            coordinate_definition: enumerated(raw.field(12), "coordinate definition", log),
            nav_status: raw.field(13) == "A",
        })
    }
}

impl WireBody for RMC {
    fn write_body(&self, w: &mut PayloadWriter) {
        w.time(self.time);
        w.bool(self.is_valid);
        w.f64(self.latitude);
        w.f64(self.longitude);
        w.f64(self.speed);
        w.f64(self.course);
        w.date(self.date);
        w.f32(self.magnetic_variation);
        w.code(self.coordinate_definition);
        w.bool(self.nav_status);
    }

    fn read_body(i: &[u8]) -> IResult<&[u8], Self> {
        let (i, time) = time_of_day(i)?;
        let (i, is_valid) = flag(i)?;
        let (i, latitude) = finite_f64(i)?;
        let (i, longitude) = finite_f64(i)?;
        let (i, speed) = finite_f64(i)?;
        let (i, course) = finite_f64(i)?;
        let (i, date) = calendar_date(i)?;
        let (i, magnetic_variation) = finite_f32(i)?;
        let (i, coordinate_definition) = code(i)?;
        let (i, nav_status) = flag(i)?;

        Ok((
            i,
            RMC {
                time,
                is_valid,
                latitude,
                longitude,
                speed,
                course,
                date,
                magnetic_variation,
                coordinate_definition,
                nav_status,
            },
        ))
    }
}
