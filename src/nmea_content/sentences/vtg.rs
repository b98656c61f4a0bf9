use nom::Parser;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    FieldError, IResult, RawSentence,
    diagnostics::Diagnostics,
    nmea_content::{
        FieldSchema, MessageType,
        parse::{angle, clamp, enumerated, number, optional_number},
        sentences::ModeIndicator,
    },
    wire::{PayloadWriter, WireBody, code, finite_f64, optional},
};

/// VTG - Track made good and Ground speed
///
/// <https://gpsd.gitlab.io/gpsd/NMEA.html#_vtg_track_made_good_and_ground_speed>
///
/// ```text
///          1  2  3  4  5  6  7  8 9
///          |  |  |  |  |  |  |  | |
///  $--VTG,x.x,T,x.x,M,x.x,N,x.x,K,m*hh<CR><LF>
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq)]
pub struct VTG {
    /// Course over ground, degrees true
    pub true_course: f64,
    /// Course over ground, degrees magnetic. Most receivers leave it empty.
    pub magnetic_course: Option<f64>,
    /// Speed over ground in knots, `[0, 999.9]`
    pub speed_knots: f64,
    /// Speed over ground in km/h, `[0, 9999.9]`
    pub speed_kmh: f64,
    pub mode: ModeIndicator,
}

const KNOTS_TO_KMH: f64 = 1.852;

impl FieldSchema for VTG {
    const MESSAGE_TYPE: MessageType = MessageType::Gnvtg;
    const MIN_FIELDS: usize = 9;

    fn parse_fields(raw: &RawSentence<'_>, log: &Diagnostics<'_>) -> Result<Self, FieldError> {
        let vtg = VTG {
            true_course: angle(number(raw.field(1), "true course", log), "true course", log),
            magnetic_course: optional_number(raw.field(3), "magnetic course", log)
                .map(|course| angle(course, "magnetic course", log)),
            speed_knots: clamp(number(raw.field(5), "speed", log), 0.0, 999.9, "speed", log),
            speed_kmh: clamp(number(raw.field(7), "speed km/h", log), 0.0, 9999.9, "speed km/h", log),
            mode: enumerated(raw.field(9), "mode", log),
        };

        let converted = vtg.speed_kmh / KNOTS_TO_KMH;
        if (vtg.speed_knots - converted).abs() > 0.1 {
            log.warning(format_args!(
                "Speed {} kn does not match {} km/h ({converted:.3} kn)",
                vtg.speed_knots, vtg.speed_kmh
            ));
        }

        Ok(vtg)
    }
}

impl WireBody for VTG {
    fn write_body(&self, w: &mut PayloadWriter) {
        w.f64(self.true_course);
        w.option(self.magnetic_course, PayloadWriter::f64);
        w.f64(self.speed_knots);
        w.f64(self.speed_kmh);
        w.code(self.mode);
    }

    fn read_body(i: &[u8]) -> IResult<&[u8], Self> {
        let (i, true_course) = finite_f64(i)?;
        let (i, magnetic_course) = optional(finite_f64).parse(i)?;
        let (i, speed_knots) = finite_f64(i)?;
        let (i, speed_kmh) = finite_f64(i)?;
        let (i, mode) = code(i)?;

        Ok((
            i,
            VTG {
                true_course,
                magnetic_course,
                speed_knots,
                speed_kmh,
                mode,
            },
        ))
    }
}
