use nom::{
    Parser,
    number::complete::le_u8,
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    FieldError, IResult, RawSentence,
    diagnostics::Diagnostics,
    nmea_content::{
        FieldSchema, MessageType,
        parse::{angle, clamp, integer, optional_integer, optional_number},
        sentences::Satellite,
    },
    parsing::hex_byte,
    wire::{PayloadWriter, WireBody, bounded_list, finite_f64, optional},
};

/// GSV - Satellites in view
///
/// <https://gpsd.gitlab.io/gpsd/NMEA.html#_gsv_satellites_in_view>
///
/// ```text
///         1 2 3 4 5 6 7     n
///         | | | | | | |     |
///  $--GSV,x,x,x,x,x,x,x,...,h*hh<CR><LF>
/// ```
///
/// Fields 4 to 7 repeat for every satellite in the sentence. NMEA 4.10 adds a
/// trailing hexadecimal signal id.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq)]
pub struct GSV {
    /// Total number of GSV sentences in the group
    pub total: u8,
    /// Sentence number within the group
    pub number: u8,
    /// Total number of satellites in view
    pub satellites_in_view: u8,
    pub satellites: heapless::Vec<Satellite, 12>,
    pub signal_id: Option<u8>,
}

impl FieldSchema for GSV {
    const MESSAGE_TYPE: MessageType = MessageType::Glgsv;
    const MIN_FIELDS: usize = 4;

    fn parse_fields(raw: &RawSentence<'_>, log: &Diagnostics<'_>) -> Result<Self, FieldError> {
        let total = clamp(integer(raw.field(1), "total sentences", log), 1, 99, "total sentences", log) as u8;
        let number = clamp(integer(raw.field(2), "sentence number", log), 1, 99, "sentence number", log) as u8;
        let satellites_in_view = clamp(
            integer(raw.field(3), "satellites in view", log),
            0,
            99,
            "satellites in view",
            log,
        ) as u8;

        let blocks = raw.fields().get(4..).unwrap_or_default();
        let mut satellites = heapless::Vec::new();

        for block in blocks.chunks_exact(4) {
            let Some(satellite) = satellite(block, log) else {
                continue;
            };
            if satellites.push(satellite).is_err() {
                log.warning(format_args!("Satellite list full, dropping PRN {}", satellite.prn));
            }
        }

        let signal_id = match blocks.chunks_exact(4).remainder() {
            [""] | [] => None,
            [token] => signal_id(token, log),
            extra => {
                log.warning(format_args!("Ignoring {} trailing fields", extra.len()));
                None
            }
        };

        if number > total {
            log.warning(format_args!("Sentence number {number} exceeds total {total}"));
        }

        Ok(GSV {
            total,
            number,
            satellites_in_view,
            satellites,
            signal_id,
        })
    }
}

/// One `PRN,elevation,azimuth,SNR` block. Blocks without a usable PRN are skipped.
fn satellite(block: &[&str], log: &Diagnostics<'_>) -> Option<Satellite> {
    let prn = optional_integer(block[0], "satellite PRN", log)?;
    let Some(prn) = u8::try_from(prn).ok().filter(|&prn| prn > 0) else {
        log.warning(format_args!("Invalid satellite PRN {prn}"));
        return None;
    };

    Some(Satellite {
        prn,
        elevation: optional_number(block[1], "elevation", log)
            .map(|elevation| clamp(elevation, 0.0, 90.0, "elevation", log)),
        azimuth: optional_number(block[2], "azimuth", log).map(|azimuth| angle(azimuth, "azimuth", log)),
        snr: optional_number(block[3], "SNR", log).map(|snr| clamp(snr, 0.0, 99.0, "SNR", log)),
    })
}

fn signal_id(token: &str, log: &Diagnostics<'_>) -> Option<u8> {
    match hex_byte(token) {
        Ok((_, id)) => Some(id),
        Err(_) => {
            log.warning(format_args!("Invalid signal id value: {token:?}"));
            None
        }
    }
}

/// Running satellite count across a multi-sentence GSV group.
///
/// Message 1 opens a group and every following message must carry the next
/// number. On the last message the count is compared with the advertised
/// number of satellites in view.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SatelliteTally {
    next: Option<u8>,
    running: usize,
}

impl SatelliteTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Satellites seen so far in the open group.
    pub fn running_total(&self) -> usize {
        self.running
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn observe(&mut self, gsv: &GSV, log: &Diagnostics<'_>) {
        if gsv.number == 1 {
            if let Some(expected) = self.next {
                log.warning(format_args!(
                    "GSV group restarted while waiting for message {expected}, resetting satellite tally"
                ));
            }
            self.reset();
        } else if self.next != Some(gsv.number) {
            log.warning(format_args!(
                "GSV message {} of {} out of sequence, resetting satellite tally",
                gsv.number, gsv.total
            ));
            self.reset();
            return;
        }

        self.running += gsv.satellites.len();

        if gsv.number < gsv.total {
            self.next = Some(gsv.number + 1);
            return;
        }

        if usize::from(gsv.satellites_in_view) != self.running {
            log.warning(format_args!(
                "Satellites in view {} do not match {} reported across the group",
                gsv.satellites_in_view, self.running
            ));
        }
        self.reset();
    }
}

impl WireBody for GSV {
    fn write_body(&self, w: &mut PayloadWriter) {
        w.u8(self.total);
        w.u8(self.number);
        w.u8(self.satellites_in_view);
        w.list(&self.satellites, |w, satellite| {
            w.u8(satellite.prn);
            w.option(satellite.elevation, PayloadWriter::f64);
            w.option(satellite.azimuth, PayloadWriter::f64);
            w.option(satellite.snr, PayloadWriter::f64);
        });
        w.option(self.signal_id, PayloadWriter::u8);
    }

    fn read_body(i: &[u8]) -> IResult<&[u8], Self> {
        let (i, total) = le_u8(i)?;
        let (i, number) = le_u8(i)?;
        let (i, satellites_in_view) = le_u8(i)?;
        let (i, satellites) = bounded_list(read_satellite).parse(i)?;
        let (i, signal_id) = optional(le_u8).parse(i)?;

        Ok((
            i,
            GSV {
                total,
                number,
                satellites_in_view,
                satellites,
                signal_id,
            },
        ))
    }
}

fn read_satellite(i: &[u8]) -> IResult<&[u8], Satellite> {
    let (i, prn) = le_u8(i)?;
    let (i, elevation) = optional(finite_f64).parse(i)?;
    let (i, azimuth) = optional(finite_f64).parse(i)?;
    let (i, snr) = optional(finite_f64).parse(i)?;

    Ok((
        i,
        Satellite {
            prn,
            elevation,
            azimuth,
            snr,
        },
    ))
}
