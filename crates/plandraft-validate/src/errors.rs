use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured validation issue with an error code and a location path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub code: String,
    pub message: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ValidationIssue {
    /// Create a new validation issue without a hint.
    pub fn new(
        code: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            path: path.into(),
            hint: None,
        }
    }

    /// Attach a remediation hint.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Aggregated validation result; `ok` is true iff `errors` is empty.
///
/// Serializes directly as the wire result `{ok, errors}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub ok: bool,
    pub errors: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Build a report from accumulated issues.
    pub fn from_errors(errors: Vec<ValidationIssue>) -> Self {
        Self {
            ok: errors.is_empty(),
            errors,
        }
    }

    /// Returns true when the validated graph had no errors.
    pub fn is_ok(&self) -> bool {
        self.ok
    }
}

/// Failures of the validation machinery itself, as opposed to rule
/// violations, which are collected into reports.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("schema error: {0}")]
    Schema(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for plan validation operations.
pub type Result<T> = std::result::Result<T, PlanError>;
