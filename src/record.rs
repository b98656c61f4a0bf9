//! # Navigation Records
//!
//! The unit handed to downstream consumers: one record per processed line,
//! carrying the outcome and, on success, the serialized sentence.

use time::OffsetDateTime;

use crate::{DecodeError, MessageType, NmeaSentence, wire};

/// Outcome of processing one line.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseResult {
    Ok,
    Error,
}

/// One processed line.
///
/// Records are immutable. A failed record has an empty payload, and its
/// message type is known only if the line got as far as routing.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationRecord {
    message_type: Option<MessageType>,
    parsed_at: OffsetDateTime,
    result: ParseResult,
    payload: Vec<u8>,
}

impl NavigationRecord {
    pub(crate) fn parsed(sentence: &NmeaSentence) -> Self {
        NavigationRecord {
            message_type: Some(sentence.message_type()),
            parsed_at: OffsetDateTime::now_utc(),
            result: ParseResult::Ok,
            payload: wire::serialize(sentence),
        }
    }

    pub(crate) fn failed(message_type: Option<MessageType>) -> Self {
        NavigationRecord {
            message_type,
            parsed_at: OffsetDateTime::now_utc(),
            result: ParseResult::Error,
            payload: Vec::new(),
        }
    }

    pub fn message_type(&self) -> Option<MessageType> {
        self.message_type
    }

    /// When the line was processed, not when the fix was taken.
    pub fn parsed_at(&self) -> OffsetDateTime {
        self.parsed_at
    }

    pub fn result(&self) -> ParseResult {
        self.result
    }

    pub fn is_ok(&self) -> bool {
        self.result == ParseResult::Ok
    }

    /// The serialized sentence, see [`wire`](crate::wire). Empty for failed records.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }

    /// Decodes the payload back into a sentence.
    ///
    /// A failed record has nothing to decode and reports [`DecodeError::Truncated`].
    pub fn decode(&self) -> Result<NmeaSentence, DecodeError> {
        wire::deserialize(&self.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nmea_content::TXT;

    #[test]
    fn test_records() {
        let sentence = NmeaSentence::TXT(TXT {
            total: 1,
            number: 1,
            identifier: 2,
            text: "ANTSTATUS=OK".to_string(),
        });

        let record = NavigationRecord::parsed(&sentence);
        assert!(record.is_ok());
        assert_eq!(record.message_type(), Some(MessageType::Gptxt));
        assert_eq!(record.payload()[1], MessageType::Gptxt.tag());
        assert_eq!(record.decode(), Ok(sentence));

        let record = NavigationRecord::failed(Some(MessageType::Gngga));
        assert_eq!(record.result(), ParseResult::Error);
        assert!(record.payload().is_empty());
        assert_eq!(record.decode(), Err(DecodeError::Truncated));
        assert!(record.parsed_at() <= OffsetDateTime::now_utc());
    }
}
