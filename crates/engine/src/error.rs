use holonet_api::FetchFailure;
use thiserror::Error;

/// Failure of a whole aggregation run.
///
/// Fetch failures surface unchanged; there is no partial or degraded result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregationError {
    #[error(transparent)]
    Fetch(#[from] FetchFailure),

    /// Only produced by a cancelled stream subscription.
    #[error("resolution of '{subject}' was cancelled before completing")]
    Cancelled { subject: String },
}

impl AggregationError {
    pub fn cancelled(subject: impl Into<String>) -> Self {
        Self::Cancelled { subject: subject.into() }
    }

    /// The underlying fetch failure, if this error came from one.
    pub fn fetch_failure(&self) -> Option<&FetchFailure> {
        match self {
            Self::Fetch(failure) => Some(failure),
            Self::Cancelled { .. } => None,
        }
    }
}
