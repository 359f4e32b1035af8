//! Injected diagnostics capability.
//!
//! Components take a `&dyn Diagnostics` instead of writing to the global
//! logger, so tests can inspect exactly what a parser or store reported.

use std::sync::Mutex;

use log::Level;

/// Sink for human-readable diagnostics emitted by library components.
pub trait Diagnostics: Send + Sync {
    fn emit(&self, level: Level, message: String);

    fn debug(&self, message: String) {
        self.emit(Level::Debug, message);
    }

    fn info(&self, message: String) {
        self.emit(Level::Info, message);
    }

    fn warn(&self, message: String) {
        self.emit(Level::Warn, message);
    }

    fn error(&self, message: String) {
        self.emit(Level::Error, message);
    }
}

/// Forwards everything to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn emit(&self, level: Level, message: String) {
        log::log!(target: "tablado", level, "{message}");
    }
}

/// Records diagnostics in memory.
#[derive(Debug, Default)]
pub struct MemoryDiagnostics {
    records: Mutex<Vec<(Level, String)>>,
}

impl MemoryDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<(Level, String)> {
        self.records.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Messages at `level` or more severe.
    pub fn messages_at(&self, level: Level) -> Vec<String> {
        self.records()
            .into_iter()
            .filter(|(l, _)| *l <= level)
            .map(|(_, m)| m)
            .collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.records().iter().any(|(_, m)| m.contains(needle))
    }
}

impl Diagnostics for MemoryDiagnostics {
    fn emit(&self, level: Level, message: String) {
        if let Ok(mut records) = self.records.lock() {
            records.push((level, message));
        }
    }
}
