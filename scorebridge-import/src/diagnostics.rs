//! Diagnostic sinks
//!
//! Pipeline functions take a `&dyn DiagnosticSink` instead of logging through
//! a global, so each call's diagnostics can be captured and asserted on.
//! [`TracingSink`] forwards to `tracing` and is what the binary uses.

use std::fmt;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Debug,
    Info,
    Warn,
    Error,
    /// A defect that needs a code or configuration fix
    Severe,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
            Severity::Severe => "severe",
        };
        f.write_str(s)
    }
}

/// One diagnostic event with structured key/value context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub fields: Vec<(&'static str, String)>,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            fields: Vec::new(),
        }
    }

    pub fn with(mut self, key: &'static str, value: impl fmt::Display) -> Self {
        self.fields.push((key, value.to_string()));
        self
    }

    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    fn fields_display(&self) -> String {
        self.fields
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, diagnostic: Diagnostic);

    fn debug(&self, message: &str) {
        self.emit(Diagnostic::new(Severity::Debug, message));
    }

    fn info(&self, message: &str) {
        self.emit(Diagnostic::new(Severity::Info, message));
    }

    fn warn(&self, message: &str) {
        self.emit(Diagnostic::new(Severity::Warn, message));
    }

    fn error(&self, message: &str) {
        self.emit(Diagnostic::new(Severity::Error, message));
    }

    fn severe(&self, message: &str) {
        self.emit(Diagnostic::new(Severity::Severe, message));
    }
}

/// Forwards diagnostics to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        let fields = diagnostic.fields_display();
        match diagnostic.severity {
            Severity::Debug => tracing::debug!(context = %fields, "{}", diagnostic.message),
            Severity::Info => tracing::info!(context = %fields, "{}", diagnostic.message),
            Severity::Warn => tracing::warn!(context = %fields, "{}", diagnostic.message),
            Severity::Error => tracing::error!(context = %fields, "{}", diagnostic.message),
            Severity::Severe => {
                tracing::error!(severe = true, context = %fields, "{}", diagnostic.message)
            }
        }
    }
}

/// Records diagnostics in memory
#[derive(Debug, Default)]
pub struct CaptureSink {
    records: Mutex<Vec<Diagnostic>>,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<Diagnostic> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn clear(&self) {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.records()
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    /// Highest severity seen, if anything was emitted
    pub fn max_severity(&self) -> Option<Severity> {
        self.records().iter().map(|d| d.severity).max()
    }

    pub fn contains(&self, pattern: &str) -> bool {
        self.records().iter().any(|d| d.message.contains(pattern))
    }
}

impl DiagnosticSink for CaptureSink {
    fn emit(&self, diagnostic: Diagnostic) {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(diagnostic);
    }
}
