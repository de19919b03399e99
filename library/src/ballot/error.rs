use thiserror::Error;

use super::gate::GateFailure;

#[derive(Error, Debug)]
pub enum BallotError {
    #[error("unknown ballot action: {0}")]
    UnknownAction(String),
    #[error("malformed ballot action: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("vote is disabled: {0}")]
    SubmissionDisabled(GateFailure),
    #[error("vote is already being submitted")]
    SubmissionPending,
    #[error(transparent)]
    Submit(#[from] SubmitError),
}

impl BallotError {
    /// Errors caused by the caller, not by the network or the user.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::UnknownAction(_) | Self::Malformed(_)
        )
    }
}

/// Failure reported by the vote submitter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("transaction was rejected")]
    Rejected,
    #[error("transaction reverted: {0}")]
    Reverted(String),
    #[error("network error: {0}")]
    Network(String),
}
