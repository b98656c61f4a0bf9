//! # Navigation Engine
//!
//! Ties the stages together: frame validation, reassembly of split lines,
//! routing, field parsing and serialization. One engine serves one input
//! stream, since it remembers a pending fragment and the open GSV group.

use std::sync::Arc;

use crate::{
    FrameValidator, LineEndingMode, MAX_LINE_LENGTH, MessageType, NmeaSentence, ParseFailure,
    diagnostics::{Diagnostics, LogFacade, LogSink, excerpt},
    nmea_content::SatelliteTally,
    reassembler::{LineReassembler, ReassemblyPolicy},
    record::NavigationRecord,
};

/// Builder for [`NavigationEngine`].
///
/// # Examples
///
/// ```rust
/// use nmea0183_navdata::{
///     LineEndingMode, NavigationEngine, diagnostics::NullSink, reassembler::ReassemblyPolicy,
/// };
///
/// let mut engine = NavigationEngine::builder()
///     .line_ending_mode(LineEndingMode::Required)
///     .reassembly(ReassemblyPolicy::Disabled)
///     .log_sink(NullSink)
///     .build();
///
/// assert!(engine.process_line("$GNZDA,052714.00,06,12,2024,00,00*7C\r\n").is_ok());
/// assert!(!engine.process_line("$GNZDA,052714.00,06,12,2024,00,00*7C").is_ok());
/// ```
#[must_use]
pub struct NavigationEngineBuilder {
    max_length: usize,
    line_ending_mode: LineEndingMode,
    reassembly: ReassemblyPolicy,
    log_sink: Arc<dyn LogSink>,
}

impl NavigationEngineBuilder {
    /// Creates a builder with default settings.
    ///
    /// The default settings are:
    /// - Maximum length: [`MAX_LINE_LENGTH`]
    /// - Line ending mode: [`LineEndingMode::Optional`]
    /// - Reassembly: [`ReassemblyPolicy::KeepLatest`]
    /// - Log sink: [`LogFacade`]
    pub fn new() -> Self {
        NavigationEngineBuilder {
            max_length: MAX_LINE_LENGTH,
            line_ending_mode: LineEndingMode::default(),
            reassembly: ReassemblyPolicy::default(),
            log_sink: Arc::new(LogFacade),
        }
    }

    /// Sets the longest accepted frame, line ending excluded.
    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    pub fn line_ending_mode(mut self, mode: LineEndingMode) -> Self {
        self.line_ending_mode = mode;
        self
    }

    pub fn reassembly(mut self, policy: ReassemblyPolicy) -> Self {
        self.reassembly = policy;
        self
    }

    /// Sets where diagnostics go.
    pub fn log_sink(mut self, sink: impl LogSink + 'static) -> Self {
        self.log_sink = Arc::new(sink);
        self
    }

    /// Sets a sink that is also used elsewhere, such as one engine per receiver
    /// all writing to the same log.
    pub fn shared_log_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.log_sink = sink;
        self
    }

    pub fn build(self) -> NavigationEngine {
        NavigationEngine {
            validator: FrameValidator::new()
                .max_length(self.max_length)
                .line_ending_mode(self.line_ending_mode),
            reassembler: LineReassembler::new(self.reassembly),
            satellites: SatelliteTally::new(),
            sink: self.log_sink,
        }
    }
}

impl Default for NavigationEngineBuilder {
    fn default() -> Self {
        NavigationEngineBuilder::new()
    }
}

/// Turns receiver lines into [`NavigationRecord`]s.
///
/// ```rust
/// use nmea0183_navdata::{NavigationEngine, NmeaSentence, diagnostics::NullSink};
///
/// let mut engine = NavigationEngine::builder().log_sink(NullSink).build();
/// let record = engine.process_line("$GNZDA,052714.00,06,12,2024,00,00*7C");
///
/// assert!(record.is_ok());
/// assert!(matches!(record.decode(), Ok(NmeaSentence::ZDA(_))));
/// ```
pub struct NavigationEngine {
    validator: FrameValidator,
    reassembler: LineReassembler,
    satellites: SatelliteTally,
    sink: Arc<dyn LogSink>,
}

impl NavigationEngine {
    /// An engine with default settings, logging through the `log` facade.
    pub fn new() -> Self {
        NavigationEngineBuilder::new().build()
    }

    pub fn builder() -> NavigationEngineBuilder {
        NavigationEngineBuilder::new()
    }

    pub fn validator(&self) -> &FrameValidator {
        &self.validator
    }

    /// The fragment kept for reassembly, if any.
    pub fn pending_fragment(&self) -> Option<&str> {
        self.reassembler.pending()
    }

    /// Processes one line into a record.
    ///
    /// Never fails: problems end up in the log and in the record's result.
    pub fn process_line(&mut self, line: &str) -> NavigationRecord {
        match self.parse_line(line) {
            Ok(sentence) => NavigationRecord::parsed(&sentence),
            Err(failure) => {
                Diagnostics::new(self.sink.as_ref(), "PARSE")
                    .error(format_args!("Error: {failure}. Data: {}", excerpt(line)));
                NavigationRecord::failed(failure.message_type())
            }
        }
    }

    /// Processes one line into a typed sentence.
    ///
    /// A line failing frame validation is handed to the reassembler; if it
    /// completes the pending fragment, the joined line is parsed instead.
    pub fn parse_line(&mut self, line: &str) -> Result<NmeaSentence, ParseFailure> {
        let sink = self.sink.as_ref();
        let joined;

        let raw = match self.validator.validate(line) {
            Ok(raw) => {
                self.reassembler.observe_valid(sink);
                raw
            }
            Err(failure) => {
                Diagnostics::new(sink, "PARSE").warning(format_args!("{failure}: {}", excerpt(line)));

                match self.reassembler.recover(line, &self.validator, sink) {
                    Some(line) => {
                        joined = line;
                        self.validator.validate_unterminated(&joined)?
                    }
                    None => return Err(failure.into()),
                }
            }
        };

        let sentence = NmeaSentence::from_raw(&raw, sink)?;

        if let NmeaSentence::GSV(gsv) = &sentence {
            let log = Diagnostics::new(sink, MessageType::Glgsv.token());
            self.satellites.observe(gsv, &log);
        }

        Ok(sentence)
    }
}

impl Default for NavigationEngine {
    fn default() -> Self {
        NavigationEngine::new()
    }
}
