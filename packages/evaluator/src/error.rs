//! Typed errors for the evaluator library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.

use thiserror::Error;

/// Errors that can occur during evaluation operations.
///
/// Note that most of the pipeline deliberately does *not* error:
/// extraction misses yield absent attributes, comps-resolution misses
/// yield neutral value scores, and collaborator failures degrade per the
/// fail-open policy. Errors are reserved for invalid configuration and
/// for collaborator transports that callers may want to observe.
#[derive(Debug, Error)]
pub enum EvaluatorError {
    /// Configuration rejected at parse/validation time
    #[error("invalid configuration: {reason}")]
    Config { reason: String },

    /// JSON parsing error (configuration or listing payloads)
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// LLM attribute-fallback collaborator failed
    #[error("attribute fallback error: {0}")]
    Fallback(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Domain-discovery collaborator failed
    #[error("domain discovery error: {0}")]
    Discovery(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Result type alias for evaluator operations.
pub type Result<T> = std::result::Result<T, EvaluatorError>;
