// ─── Error ──────────────────────────────────────────────────────────────────
use thiserror::Error;

/// Failures of the conversion entry points. Record operations themselves are
/// total and never return this.
#[derive(Debug, Error)]
pub enum EntityError {
    #[error("Can't build an entity from a non-object value")]
    NotAnObject,
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
