//! Import failure taxonomy
//!
//! The orchestrator routes on the failure kind: reference misses become
//! orphans, converter failures reject the submission, internal and store
//! failures are reported with an incident id and never discard data.

use scorebridge_common::game::{ConfigError, GradeError};
use scorebridge_common::metrics::MetricError;
use scorebridge_common::ImportType;
use serde_json::Value;
use thiserror::Error;

/// Message shown for submissions parked as orphans
pub const QUEUED_MESSAGE: &str =
    "Your score has been queued and will be resolved once we learn about this chart.";

pub type ImportResult<T> = std::result::Result<T, ImportFailure>;

#[derive(Debug, Error)]
pub enum ImportFailure {
    /// The chart (or its song lookup key) is unknown; retry later
    #[error("Reference not found: {message}")]
    ReferenceNotFound {
        message: String,
        import_type: ImportType,
        data: Value,
        context: Value,
    },

    /// Malformed or unsupported input; the reason is safe to show the user
    #[error("{0}")]
    Converter(String),

    /// Broken invariant between code and configuration
    #[error("Internal failure: {0}")]
    Internal(String),

    #[error("Store failure: {0}")]
    Store(#[from] scorebridge_common::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    ReferenceNotFound,
    Converter,
    Internal,
    Store,
}

impl FailureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FailureKind::ReferenceNotFound => "ReferenceNotFound",
            FailureKind::Converter => "ConverterFailure",
            FailureKind::Internal => "InternalFailure",
            FailureKind::Store => "StoreFailure",
        }
    }
}

impl ImportFailure {
    pub fn reference_not_found(
        import_type: ImportType,
        data: &Value,
        context: &Value,
        message: impl Into<String>,
    ) -> Self {
        ImportFailure::ReferenceNotFound {
            message: message.into(),
            import_type,
            data: data.clone(),
            context: context.clone(),
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            ImportFailure::ReferenceNotFound { .. } => FailureKind::ReferenceNotFound,
            ImportFailure::Converter(_) => FailureKind::Converter,
            ImportFailure::Internal(_) => FailureKind::Internal,
            ImportFailure::Store(_) => FailureKind::Store,
        }
    }

    /// Text reported back to the submitter
    ///
    /// Internal and store failures never expose their cause, only the
    /// incident id under which the details were logged.
    pub fn user_message(&self, incident_id: &str) -> String {
        match self {
            ImportFailure::ReferenceNotFound { .. } => QUEUED_MESSAGE.to_string(),
            ImportFailure::Converter(reason) => reason.clone(),
            ImportFailure::Internal(_) | ImportFailure::Store(_) => format!(
                "An internal error occurred while processing this score (incident {}).",
                incident_id
            ),
        }
    }
}

impl From<ConfigError> for ImportFailure {
    fn from(err: ConfigError) -> Self {
        ImportFailure::Internal(err.to_string())
    }
}

impl From<GradeError> for ImportFailure {
    fn from(err: GradeError) -> Self {
        ImportFailure::Internal(err.to_string())
    }
}

impl From<MetricError> for ImportFailure {
    fn from(err: MetricError) -> Self {
        ImportFailure::Internal(err.to_string())
    }
}
