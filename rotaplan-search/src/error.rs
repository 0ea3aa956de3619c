use rotaplan_core::PlanError;

/// Reasons a search cannot be started
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("invalid plan: {0}")]
    Plan(#[from] PlanError),

    #[error("iteration budget must be at least 1")]
    ZeroIterations,

    #[error("progress interval must be at least 1")]
    ZeroProgressInterval,

    #[error("epsilon must be a non-negative number, got {0}")]
    InvalidEpsilon(String),
}
