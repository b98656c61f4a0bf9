use nom::{
    Parser,
    number::complete::{le_u8, le_u16},
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    FieldError, IResult, RawSentence,
    diagnostics::Diagnostics,
    nmea_content::{
        FieldSchema, MessageType,
        parse::{dop, enumerated, optional_integer},
        sentences::{FixMode, GnssSystem, SelectionMode},
    },
    wire::{PayloadWriter, WireBody, bounded_list, code},
};

/// GSA - GPS DOP and active satellites
///
/// <https://gpsd.gitlab.io/gpsd/NMEA.html#_gsa_gps_dop_and_active_satellites>
///
/// ```text
///         1 2 3                        14 15  16  17  18
///         | | |                         |  |   |   |   |
///  $--GSA,a,a,x,x,x,x,x,x,x,x,x,x,x,x,x,x,x.x,x.x,x.x,h*hh<CR><LF>
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq)]
pub struct GSA {
    pub selection_mode: SelectionMode,
    pub fix_mode: FixMode,
    /// PRNs of the satellites used in the solution, empty slots dropped
    pub satellites: heapless::Vec<u8, 12>,
    /// Position dilution of precision in tenths
    pub pdop: u16,
    /// Horizontal dilution of precision in tenths
    pub hdop: u16,
    /// Vertical dilution of precision in tenths
    pub vdop: u16,
    /// System the PRNs belong to (NMEA 4.11)
    pub system: GnssSystem,
}

impl FieldSchema for GSA {
    const MESSAGE_TYPE: MessageType = MessageType::Gngsa;
    const MIN_FIELDS: usize = 18;

    fn parse_fields(raw: &RawSentence<'_>, log: &Diagnostics<'_>) -> Result<Self, FieldError> {
        let mut satellites = heapless::Vec::new();

        for slot in 3..=14 {
            let Some(prn) = optional_integer(raw.field(slot), "satellite PRN", log) else {
                continue;
            };

            match u8::try_from(prn) {
                Ok(prn) if prn > 0 => {
                    if satellites.push(prn).is_err() {
                        log.warning(format_args!("Satellite list full, dropping PRN {prn}"));
                    }
                }
                _ => log.warning(format_args!("Invalid satellite PRN {prn} in slot {}", slot - 2)),
            }
        }

        Ok(GSA {
            selection_mode: enumerated(raw.field(1), "selection mode", log),
            fix_mode: enumerated(raw.field(2), "fix mode", log),
            satellites,
            pdop: dop(raw.field(15), "PDOP", log),
            hdop: dop(raw.field(16), "HDOP", log),
            vdop: dop(raw.field(17), "VDOP", log),
            system: enumerated(raw.field(18), "system id", log),
        })
    }
}

impl WireBody for GSA {
    fn write_body(&self, w: &mut PayloadWriter) {
        w.code(self.selection_mode);
        w.code(self.fix_mode);
        w.list(&self.satellites, |w, &prn| w.u8(prn));
        w.u16(self.pdop);
        w.u16(self.hdop);
        w.u16(self.vdop);
        w.code(self.system);
    }

    fn read_body(i: &[u8]) -> IResult<&[u8], Self> {
        let (i, selection_mode) = code(i)?;
        let (i, fix_mode) = code(i)?;
        let (i, satellites) = bounded_list(le_u8).parse(i)?;
        let (i, pdop) = le_u16(i)?;
        let (i, hdop) = le_u16(i)?;
        let (i, vdop) = le_u16(i)?;
        let (i, system) = code(i)?;

        Ok((
            i,
            GSA {
                selection_mode,
                fix_mode,
                satellites,
                pdop,
                hdop,
                vdop,
                system,
            },
        ))
    }
}
