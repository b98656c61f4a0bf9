#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    FieldError, IResult, RawSentence,
    diagnostics::Diagnostics,
    nmea_content::{
        FieldSchema, MessageType,
        parse::{Axis, coordinate, enumerated, status, utc_time},
        sentences::ModeIndicator,
    },
    wire::{PayloadWriter, WireBody, code, finite_f64, flag, time_of_day},
};

/// GLL - Geographic Position - Latitude/Longitude
///
/// <https://gpsd.gitlab.io/gpsd/NMEA.html#_gll_geographic_position_latitudelongitude>
///
/// ```text
///         1       2 3        4 5         6 7
///         |       | |        | |         | |
///  $--GLL,ddmm.mm,a,dddmm.mm,a,hhmmss.ss,a,m*hh<CR><LF>
/// ```
///
/// The mode indicator (field 7) only exists from NMEA 2.3 on.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq)]
pub struct GLL {
    pub latitude: f64,
    pub longitude: f64,
    /// Fix time in UTC
    pub time: Option<time::Time>,
    /// Status, `true` for A (data valid)
    pub is_valid: bool,
    pub mode: ModeIndicator,
}

impl FieldSchema for GLL {
    const MESSAGE_TYPE: MessageType = MessageType::Gngll;
    const MIN_FIELDS: usize = 7;

    fn parse_fields(raw: &RawSentence<'_>, log: &Diagnostics<'_>) -> Result<Self, FieldError> {
        Ok(GLL {
            latitude: coordinate(raw.field(1), raw.field(2), Axis::Latitude, log),
            longitude: coordinate(raw.field(3), raw.field(4), Axis::Longitude, log),
            time: utc_time(raw.field(5), log),
            is_valid: status(raw.field(6), "GLL", log),
            mode: enumerated(raw.field(7), "mode", log),
        })
    }
}

impl WireBody for GLL {
    fn write_body(&self, w: &mut PayloadWriter) {
        w.f64(self.latitude);
        w.f64(self.longitude);
        w.time(self.time);
        w.bool(self.is_valid);
        w.code(self.mode);
    }

    fn read_body(i: &[u8]) -> IResult<&[u8], Self> {
        let (i, latitude) = finite_f64(i)?;
        let (i, longitude) = finite_f64(i)?;
        let (i, time) = time_of_day(i)?;
        let (i, is_valid) = flag(i)?;
        let (i, mode) = code(i)?;

        Ok((
            i,
            GLL {
                latitude,
                longitude,
                time,
                is_valid,
                mode,
            },
        ))
    }
}
