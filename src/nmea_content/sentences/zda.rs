use nom::{
    Parser,
    combinator::map_opt,
    number::complete::le_i32,
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use time::UtcOffset;

use crate::{
    FieldError, IResult, RawSentence,
    diagnostics::Diagnostics,
    nmea_content::{
        FieldSchema, MessageType,
        parse::{clamp, date_parts, integer, utc_time},
    },
    wire::{PayloadWriter, WireBody, calendar_date, time_of_day},
};

/// ZDA - Time & Date - UTC, day, month, year and local time zone
///
/// <https://gpsd.gitlab.io/gpsd/NMEA.html#_zda_time_date_utc_day_month_year_and_local_time_zone>
///
/// ```text
///         1         2  3  4    5  6
///         |         |  |  |    |  |
///  $--ZDA,hhmmss.ss,xx,xx,xxxx,xx,xx*hh<CR><LF>
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq)]
pub struct ZDA {
    /// Time in UTC
    pub time: Option<time::Time>,
    /// Date in UTC
    pub date: Option<time::Date>,
    /// Local zone description, offset from UTC
    pub local_offset: UtcOffset,
}

impl ZDA {
    /// The instant described by the sentence, when both time and date were valid.
    pub fn to_offset_date_time(&self) -> Option<time::OffsetDateTime> {
        let (time, date) = (self.time?, self.date?);
        Some(date.with_time(time).assume_utc().to_offset(self.local_offset))
    }
}

impl FieldSchema for ZDA {
    const MESSAGE_TYPE: MessageType = MessageType::Gnzda;
    const MIN_FIELDS: usize = 7;

    fn parse_fields(raw: &RawSentence<'_>, log: &Diagnostics<'_>) -> Result<Self, FieldError> {
        let hours = clamp(integer(raw.field(5), "local zone hours", log), -23, 23, "local zone hours", log);
        let minutes = clamp(integer(raw.field(6), "local zone minutes", log), 0, 59, "local zone minutes", log);

        // "-00,30" is half an hour west of UTC
        let west = hours < 0 || raw.field(5).starts_with('-');
        let seconds = (hours.abs() * 3600 + minutes * 60) as i32;
        let local_offset = UtcOffset::from_whole_seconds(if west { -seconds } else { seconds })
            .unwrap_or(UtcOffset::UTC);

        Ok(ZDA {
            time: utc_time(raw.field(1), log),
            date: date_parts(raw.field(2), raw.field(3), raw.field(4), log),
            local_offset,
        })
    }
}

impl WireBody for ZDA {
    fn write_body(&self, w: &mut PayloadWriter) {
        w.time(self.time);
        w.date(self.date);
        w.i32(self.local_offset.whole_seconds());
    }

    fn read_body(i: &[u8]) -> IResult<&[u8], Self> {
        let (i, time) = time_of_day(i)?;
        let (i, date) = calendar_date(i)?;
        let (i, local_offset) =
            map_opt(le_i32, |seconds| UtcOffset::from_whole_seconds(seconds).ok()).parse(i)?;

        Ok((
            i,
            ZDA {
                time,
                date,
                local_offset,
            },
        ))
    }
}
