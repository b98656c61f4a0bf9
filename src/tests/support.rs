use std::sync::Mutex;

use crate::{
    checksum,
    diagnostics::{LogSink, Severity},
};

/// Keeps every diagnostic in memory.
#[derive(Default)]
pub(crate) struct RecordingSink {
    entries: Mutex<Vec<(Severity, String)>>,
}

impl RecordingSink {
    pub(crate) fn entries(&self) -> Vec<(Severity, String)> {
        self.entries.lock().unwrap().clone()
    }

    pub(crate) fn contains(&self, severity: Severity, needle: &str) -> bool {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .any(|(level, message)| *level == severity && message.contains(needle))
    }

    pub(crate) fn count(&self, severity: Severity) -> usize {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|(level, _)| *level == severity)
            .count()
    }

    pub(crate) fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }
}

impl LogSink for RecordingSink {
    fn log(&self, severity: Severity, message: &str) {
        self.entries
            .lock()
            .unwrap()
            .push((severity, message.to_string()));
    }
}

/// Frames `payload` as `$payload*CC`.
pub(crate) fn framed(payload: &str) -> String {
    format!("${payload}*{:02X}", checksum(payload.as_bytes()))
}
