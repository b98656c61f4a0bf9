#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    FieldError, IResult, RawSentence,
    diagnostics::Diagnostics,
    nmea_content::{
        FieldSchema, MessageType,
        parse::{clamp, number, utc_time},
    },
    wire::{PayloadWriter, WireBody, finite_f64, time_of_day},
};

/// DHV - Velocity solution
///
/// ```text
///         1         2   3   4   5   6
///         |         |   |   |   |   |
///  $--DHV,hhmmss.ss,x.x,x.x,x.x,x.x,x.x*hh<CR><LF>
/// ```
///
/// Speeds are in m/s. The ECEF components are not range checked.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq)]
pub struct DHV {
    pub time: Option<time::Time>,
    /// Three dimensional speed, `[0, 9999.9]`
    pub speed_3d: f64,
    pub ecef_x: f64,
    pub ecef_y: f64,
    pub ecef_z: f64,
    /// Horizontal speed, `[0, 9999.9]`
    pub ground_speed: f64,
}

const MAX_SPEED: f64 = 9999.9;

impl FieldSchema for DHV {
    const MESSAGE_TYPE: MessageType = MessageType::Gndhv;
    const MIN_FIELDS: usize = 7;

    fn parse_fields(raw: &RawSentence<'_>, log: &Diagnostics<'_>) -> Result<Self, FieldError> {
        let dhv = DHV {
            time: utc_time(raw.field(1), log),
            speed_3d: clamp(number(raw.field(2), "3D speed", log), 0.0, MAX_SPEED, "3D speed", log),
            ecef_x: number(raw.field(3), "ECEF X speed", log),
            ecef_y: number(raw.field(4), "ECEF Y speed", log),
            ecef_z: number(raw.field(5), "ECEF Z speed", log),
            ground_speed: clamp(number(raw.field(6), "ground speed", log), 0.0, MAX_SPEED, "ground speed", log),
        };

        let magnitude = (dhv.ecef_x.powi(2) + dhv.ecef_y.powi(2) + dhv.ecef_z.powi(2)).sqrt();
        if (dhv.speed_3d - magnitude).abs() > 0.1 {
            log.warning(format_args!(
                "3D speed {} does not match ECEF components ({magnitude:.3})",
                dhv.speed_3d
            ));
        }

        Ok(dhv)
    }
}

impl WireBody for DHV {
    fn write_body(&self, w: &mut PayloadWriter) {
        w.time(self.time);
        w.f64(self.speed_3d);
        w.f64(self.ecef_x);
        w.f64(self.ecef_y);
        w.f64(self.ecef_z);
        w.f64(self.ground_speed);
    }

    fn read_body(i: &[u8]) -> IResult<&[u8], Self> {
        let (i, time) = time_of_day(i)?;
        let (i, speed_3d) = finite_f64(i)?;
        let (i, ecef_x) = finite_f64(i)?;
        let (i, ecef_y) = finite_f64(i)?;
        let (i, ecef_z) = finite_f64(i)?;
        let (i, ground_speed) = finite_f64(i)?;

        Ok((
            i,
            DHV {
                time,
                speed_3d,
                ecef_x,
                ecef_y,
                ecef_z,
                ground_speed,
            },
        ))
    }
}
