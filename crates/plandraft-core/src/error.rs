use thiserror::Error;

/// Shape-level constraint violations raised at construction time.
///
/// Shape errors are fatal: a graph that fails them is malformed input and
/// never reaches cross-reference validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ShapeError {
    /// The graph contains no objectives.
    #[error("at least one objective is required")]
    MissingObjectives,
    /// The graph contains no KPIs.
    #[error("at least one KPI is required")]
    MissingKpis,
}

/// Core error type shared across Plandraft crates.
#[derive(Debug, Error)]
pub enum Error {
    /// The graph violates a construction-time shape constraint.
    #[error("invalid plan shape: {0}")]
    Shape(#[from] ShapeError),
    /// A plan document could not be parsed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for results returned by Plandraft crates.
pub type Result<T> = std::result::Result<T, Error>;
