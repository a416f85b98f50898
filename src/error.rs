use thiserror::Error;

/// Failures surfaced by the reconciliation engine.
///
/// Validation problems are reported before any row is written; transactional
/// failures roll the whole operation back before surfacing.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("settlement aborted: {0}")]
    SettlementFailed(#[source] sqlx::Error),

    #[error("database error")]
    Database(#[from] sqlx::Error),
}

impl EngineError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        EngineError::InvalidInput(msg.into())
    }
}
