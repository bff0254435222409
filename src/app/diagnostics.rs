//! Structured per-file diagnostic reporting.
//!
//! Derivation steps never fail on missing optional inputs; they describe what
//! was missing and move on. A [`Reporter`] is passed into each step so the
//! caller can aggregate the warnings for one file without depending on global
//! logger state. Every event is also emitted through `tracing` for live
//! operator output.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

/// Severity of a diagnostic event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational trace of a decision (e.g. which sensor was auto-chosen)
    Debug,
    /// A derivation precondition failed; the step produced no output
    Warning,
}

/// One diagnostic event tied to a source file and, usually, a sensor name
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    /// File the event was raised for
    pub source_file: PathBuf,
    /// Sensor the event concerns, when there is a specific one
    pub sensor: Option<String>,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.sensor {
            Some(sensor) => write!(
                f,
                "{}: {} [{}]",
                self.source_file.display(),
                self.message,
                sensor
            ),
            None => write!(f, "{}: {}", self.source_file.display(), self.message),
        }
    }
}

/// Collects diagnostics for one processing pass.
#[derive(Debug, Default)]
pub struct Reporter {
    events: Vec<Diagnostic>,
}

impl Reporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning about a specific sensor
    pub fn warn_sensor(&mut self, file: &Path, sensor: &str, message: impl Into<String>) {
        let message = message.into();
        warn!("{}: {} [{}]", file.display(), message, sensor);
        self.events.push(Diagnostic {
            severity: Severity::Warning,
            source_file: file.to_path_buf(),
            sensor: Some(sensor.to_string()),
            message,
        });
    }

    /// Record a warning not tied to one sensor
    pub fn warn(&mut self, file: &Path, message: impl Into<String>) {
        let message = message.into();
        warn!("{}: {}", file.display(), message);
        self.events.push(Diagnostic {
            severity: Severity::Warning,
            source_file: file.to_path_buf(),
            sensor: None,
            message,
        });
    }

    /// Record a decision trace (kept for the summary, logged at debug)
    pub fn note(&mut self, file: &Path, message: impl Into<String>) {
        let message = message.into();
        debug!("{}: {}", file.display(), message);
        self.events.push(Diagnostic {
            severity: Severity::Debug,
            source_file: file.to_path_buf(),
            sensor: None,
            message,
        });
    }

    /// All events recorded so far, in order
    pub fn events(&self) -> &[Diagnostic] {
        &self.events
    }

    /// Warnings only
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.events
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    /// Number of warnings recorded
    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    /// Drain all events, leaving the reporter empty for the next file
    pub fn take_events(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.events)
    }
}
