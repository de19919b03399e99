use alloy_primitives::{Address, TxHash, U256};
use async_trait::async_trait;

use super::error::SubmitError;

/// Sends the vote transaction and waits for it to land.
#[async_trait]
pub trait VoteSubmitter {
    async fn submit_vote(
        &self,
        grantees: &[Address],
        amounts: &[U256],
    ) -> Result<TxHash, SubmitError>;
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Pending,
    /// Message shown to the user until dismissed.
    Failed(String),
    Submitted(TxHash),
}

impl SubmissionStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, SubmissionStatus::Pending)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            SubmissionStatus::Failed(msg) => Some(msg.as_str()),
            _ => None,
        }
    }
}
