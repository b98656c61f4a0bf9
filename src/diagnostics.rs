//! # Diagnostics
//!
//! Every soft failure (a clamped value, an unexpected hemisphere letter, a missing
//! field) is reported through a [`LogSink`] instead of failing the line. The engine
//! owns one sink; the default [`LogFacade`] forwards to the [`log`] crate so any
//! `log`-compatible backend picks the messages up.
//!
//! Messages are prefixed with a context tag, usually the message token:
//!
//! ```text
//! [GNGGA] HDOP 999.9 out of range [0, 99.9], clamped to 99.9
//! ```

use std::fmt::Display;

/// Severity of a diagnostic message.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl Severity {
    /// Upper-case label used by text sinks.
    pub fn label(self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl From<Severity> for log::Level {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Debug => log::Level::Debug,
            Severity::Info => log::Level::Info,
            Severity::Warning => log::Level::Warn,
            Severity::Error | Severity::Critical => log::Level::Error,
        }
    }
}

/// Receives leveled diagnostic messages.
///
/// Implementations must not fail; a sink that cannot write simply drops the message.
/// Closures of the shape `Fn(Severity, &str)` are sinks too.
pub trait LogSink: Send + Sync {
    fn log(&self, severity: Severity, message: &str);
}

impl<F> LogSink for F
where
    F: Fn(Severity, &str) + Send + Sync,
{
    fn log(&self, severity: Severity, message: &str) {
        self(severity, message)
    }
}

/// Forwards diagnostics to the [`log`] facade under the `nmea0183_navdata` target.
///
/// [`Severity::Critical`] has no `log` counterpart and is emitted at error level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogFacade;

impl LogSink for LogFacade {
    fn log(&self, severity: Severity, message: &str) {
        log::log!(target: "nmea0183_navdata", log::Level::from(severity), "{message}");
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl LogSink for NullSink {
    fn log(&self, _: Severity, _: &str) {}
}

/// A sink bound to a context tag.
#[derive(Clone, Copy)]
pub(crate) struct Diagnostics<'a> {
    sink: &'a dyn LogSink,
    context: &'a str,
}

impl<'a> Diagnostics<'a> {
    pub(crate) fn new(sink: &'a dyn LogSink, context: &'a str) -> Self {
        Diagnostics { sink, context }
    }

    pub(crate) fn emit(&self, severity: Severity, message: impl Display) {
        self.sink.log(severity, &format!("[{}] {message}", self.context));
    }

    pub(crate) fn debug(&self, message: impl Display) {
        self.emit(Severity::Debug, message);
    }

    pub(crate) fn info(&self, message: impl Display) {
        self.emit(Severity::Info, message);
    }

    pub(crate) fn warning(&self, message: impl Display) {
        self.emit(Severity::Warning, message);
    }

    pub(crate) fn error(&self, message: impl Display) {
        self.emit(Severity::Error, message);
    }
}

/// The first 50 characters of `line`, for attributing a failure in a log message.
pub(crate) fn excerpt(line: &str) -> &str {
    let line = line.trim_end_matches(['\r', '\n']);
    line.char_indices().nth(50).map_or(line, |(end, _)| &line[..end])
}
