//! # Line Reassembly
//!
//! Receivers on a lossy transport sometimes deliver one sentence in two pieces.
//! The [`LineReassembler`] keeps the last line that failed frame validation and
//! tries it as the head of the next failing line.

use crate::{
    FrameValidator,
    diagnostics::{Diagnostics, LogSink, excerpt},
};

/// What to do with lines that fail frame validation.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ReassemblyPolicy {
    /// Keep the most recent failing line and join it with the next one.
    #[default]
    KeepLatest,

    /// Never join lines.
    Disabled,
}

/// Holds at most one pending fragment.
///
/// # Examples
///
/// ```rust
/// use nmea0183_navdata::{FrameValidator, diagnostics::NullSink, reassembler::LineReassembler};
///
/// let validator = FrameValidator::new();
/// let mut reassembler = LineReassembler::default();
///
/// let head = "$GNZDA,052714.00,06,";
/// let tail = "12,2024,00,00*7C\r\n";
///
/// assert_eq!(reassembler.recover(head, &validator, &NullSink), None);
/// assert_eq!(reassembler.pending(), Some(head));
///
/// let joined = reassembler.recover(tail, &validator, &NullSink).unwrap();
/// assert_eq!(joined, "$GNZDA,052714.00,06,12,2024,00,00*7C");
/// assert_eq!(reassembler.pending(), None);
/// ```
#[derive(Debug, Default, Clone)]
pub struct LineReassembler {
    policy: ReassemblyPolicy,
    pending: Option<String>,
}

impl LineReassembler {
    pub fn new(policy: ReassemblyPolicy) -> Self {
        LineReassembler {
            policy,
            pending: None,
        }
    }

    pub fn policy(&self) -> ReassemblyPolicy {
        self.policy
    }

    /// The fragment waiting for its continuation, without line terminator.
    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }

    /// Handles a line that failed validation on its own.
    ///
    /// Returns the joined line when the pending fragment followed by `line`
    /// forms a valid frame and `line` ends the way the validator's
    /// [`LineEndingMode`](crate::LineEndingMode) requires. Otherwise `line`
    /// replaces the pending fragment.
    pub fn recover(&mut self, line: &str, validator: &FrameValidator, sink: &dyn LogSink) -> Option<String> {
        if self.policy == ReassemblyPolicy::Disabled {
            return None;
        }

        let log = Diagnostics::new(sink, "PARSE");
        let fragment = line.trim_end_matches(['\r', '\n']);

        if let Some(pending) = self.pending.take() {
            let joined = format!("{pending}{fragment}");

            // the last piece carries the line ending of the whole frame
            let terminated = validator.strip_line_ending(line).is_ok();

            if terminated && validator.validate_unterminated(&joined).is_ok() {
                log.debug(format_args!("Reassembled split line: {}", excerpt(&joined)));
                return Some(joined);
            }

            log.warning(format_args!("Discarding incomplete line: {}", excerpt(&pending)));
        }

        if fragment.len() > validator.max_len() {
            log.debug(format_args!("Line too long to keep for reassembly: {}", excerpt(fragment)));
        } else {
            self.pending = Some(fragment.to_owned());
        }

        None
    }

    /// Drops a stale fragment once a line validates on its own.
    pub fn observe_valid(&mut self, sink: &dyn LogSink) {
        if let Some(stale) = self.pending.take() {
            Diagnostics::new(sink, "PARSE").debug(format_args!("Dropping stale fragment: {}", excerpt(&stale)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LineEndingMode, diagnostics::Severity, tests::support::RecordingSink};

    const HEAD: &str = "$GNZDA,052714.00,06,";
    const TAIL: &str = "12,2024,00,00*7C\r\n";

    #[test]
    fn test_join() {
        let sink = RecordingSink::default();
        let validator = FrameValidator::new();
        let mut reassembler = LineReassembler::default();

        assert_eq!(reassembler.recover("$GNZDA,052714.00,06,\r\n", &validator, &sink), None);
        assert_eq!(reassembler.pending(), Some(HEAD));

        let joined = reassembler.recover(TAIL, &validator, &sink);
        assert_eq!(joined.as_deref(), Some("$GNZDA,052714.00,06,12,2024,00,00*7C"));
        assert_eq!(reassembler.pending(), None);
        assert_eq!(sink.count(Severity::Warning), 0);
    }

    #[test]
    fn test_keep_latest() {
        let sink = RecordingSink::default();
        let validator = FrameValidator::new();
        let mut reassembler = LineReassembler::default();

        reassembler.recover("$GNRMC,garbage", &validator, &sink);
        reassembler.recover(HEAD, &validator, &sink);
        assert_eq!(reassembler.pending(), Some(HEAD));
        assert!(sink.contains(Severity::Warning, "Discarding incomplete line: $GNRMC,garbage"));

        let joined = reassembler.recover(TAIL, &validator, &sink);
        assert!(joined.is_some());
    }

    #[test]
    fn test_stale_and_oversized_fragments() {
        let sink = RecordingSink::default();
        let validator = FrameValidator::new().max_length(20);
        let mut reassembler = LineReassembler::default();

        reassembler.recover("$GNZDA,052714.00,06,12,2024", &validator, &sink);
        assert_eq!(reassembler.pending(), None);
        assert!(sink.contains(Severity::Debug, "Line too long to keep"));

        reassembler.recover("$GNZDA,05", &validator, &sink);
        assert!(reassembler.pending().is_some());
        reassembler.observe_valid(&sink);
        assert_eq!(reassembler.pending(), None);
        assert!(sink.contains(Severity::Debug, "Dropping stale fragment: $GNZDA,05"));
    }

    #[test]
    fn test_disabled() {
        let sink = RecordingSink::default();
        let validator = FrameValidator::new();
        let mut reassembler = LineReassembler::new(ReassemblyPolicy::Disabled);

        assert_eq!(reassembler.recover(HEAD, &validator, &sink), None);
        assert_eq!(reassembler.recover(TAIL, &validator, &sink), None);
        assert_eq!(reassembler.pending(), None);
        assert!(sink.entries().is_empty());
    }

    #[test]
    fn test_line_ending_of_last_piece() {
        let sink = RecordingSink::default();

        let forbidden = FrameValidator::new().line_ending_mode(LineEndingMode::Forbidden);
        let mut reassembler = LineReassembler::default();
        assert_eq!(reassembler.recover(HEAD, &forbidden, &sink), None);
        assert_eq!(reassembler.recover(TAIL, &forbidden, &sink), None);
        assert_eq!(reassembler.pending(), Some("12,2024,00,00*7C"));
        assert!(sink.contains(Severity::Warning, "Discarding incomplete line: $GNZDA,052714.00,06,"));

        let required = FrameValidator::new().line_ending_mode(LineEndingMode::Required);
        let mut reassembler = LineReassembler::default();
        assert_eq!(reassembler.recover(HEAD, &required, &sink), None);
        assert_eq!(reassembler.recover("12,2024,00,00*7C", &required, &sink), None);

        assert_eq!(reassembler.recover("$GNZDA,052714.00,06,\r\n", &required, &sink), None);
        let joined = reassembler.recover(TAIL, &required, &sink);
        assert_eq!(joined.as_deref(), Some("$GNZDA,052714.00,06,12,2024,00,00*7C"));
    }
}
