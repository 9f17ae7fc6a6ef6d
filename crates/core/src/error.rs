use thiserror::Error;

/// Top-level error type used across the entire dashboard.
#[derive(Debug, Error)]
pub enum ResonanceError {
    #[error("config error: {0}")]
    Config(String),

    /// One tier of the acquisition chain failed; the next tier is tried.
    #[error("source '{tier}' unavailable: {reason}")]
    SourceUnavailable { tier: String, reason: String },

    #[error("scheduler error: {0}")]
    Scheduler(String),
}

impl ResonanceError {
    pub fn unavailable(tier: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::SourceUnavailable {
            tier:   tier.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T, E = ResonanceError> = std::result::Result<T, E>;
