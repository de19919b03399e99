//! Draft re-allocation of a council member's votes.
//!
//! Edits go through [`BallotAction`] and the pure [`reduce`] function.
//! [`Ballot`] wraps the draft together with the submission status and
//! derives everything the ballot panel shows from the [`SessionState`].

use alloy_primitives::{Address, TxHash};
use tracing::{debug, info, warn};

use crate::{config::BallotSettings, session::SessionState, types::Allocation, Votes};

mod action;
mod error;
mod gate;
mod reducer;
mod submission;

pub use action::BallotAction;
pub use error::{BallotError, SubmitError};
pub use gate::{check_submission, summarize, total_votes, BallotSummary, GateFailure, VoteRequest};
pub use reducer::{reduce, DraftAllocation};
pub use submission::{SubmissionStatus, VoteSubmitter};

#[derive(Clone, Debug, Default)]
pub struct Ballot {
    draft: DraftAllocation,
    status: SubmissionStatus,
    settings: BallotSettings,
}

impl Ballot {
    pub fn new(settings: BallotSettings) -> Self {
        Ballot {
            draft: DraftAllocation::new(),
            status: SubmissionStatus::Idle,
            settings,
        }
    }

    pub fn draft(&self) -> &DraftAllocation {
        &self.draft
    }

    pub fn is_visible(&self) -> bool {
        self.draft.visible
    }

    pub fn status(&self) -> &SubmissionStatus {
        &self.status
    }

    pub fn dispatch(&mut self, action: BallotAction) {
        self.draft.apply(action);
    }

    /// Dispatches an action received as json.
    pub fn dispatch_json(&mut self, input: &str) -> Result<(), BallotError> {
        match BallotAction::from_json_str(input)? {
            Some(action) => self.dispatch(action),
            None => debug!(input, "ballot action without payload ignored"),
        }
        Ok(())
    }

    /// Opens the ballot, seeded with the current votes when known.
    pub fn open(&mut self, session: &SessionState) {
        match session.current_allocation() {
            Some(current) => self.dispatch(BallotAction::Seed {
                current: current.clone(),
            }),
            None => self.dispatch(BallotAction::ShowBallot),
        }
    }

    pub fn hide(&mut self) {
        self.dispatch(BallotAction::HideBallot);
    }

    /// True if the grantee already has votes on chain or in the draft.
    pub fn is_allocated(&self, session: &SessionState, grantee: &Address) -> bool {
        session
            .current_allocation()
            .map(|c| c.contains(grantee))
            .unwrap_or(false)
            || self.draft.get(grantee).is_some()
    }

    /// Puts the grantee on the ballot with zero votes and shows it.
    /// Returns false if the grantee was already allocated.
    pub fn add_grantee(&mut self, session: &SessionState, grantee: Address) -> bool {
        if self.is_allocated(session, &grantee) {
            return false;
        }
        self.dispatch(BallotAction::Add {
            allocation: Allocation::new(grantee, 0),
            current: session.current_allocation().cloned(),
        });
        self.dispatch(BallotAction::ShowBallot);
        true
    }

    /// Update for the +/- buttons of the entry at `index`. Never goes below zero.
    pub fn step_amount(&self, index: usize, increment: bool) -> Option<BallotAction> {
        let entry = self.draft.allocation.get(index)?;
        let step = self.settings.amount_step;
        let amount = if increment {
            entry.amount.saturating_add(step)
        } else {
            entry.amount.saturating_sub(step)
        };
        Some(BallotAction::Update(Allocation::new(entry.grantee, amount)))
    }

    /// Update for the amount text field of the entry at `index`.
    /// Empty input means zero, anything but a whole number is ignored.
    pub fn input_amount(&self, index: usize, input: &str) -> Option<BallotAction> {
        let entry = self.draft.allocation.get(index)?;
        let input = input.trim();
        let amount = if input.is_empty() {
            0
        } else {
            input.parse::<Votes>().ok()?
        };
        Some(BallotAction::Update(Allocation::new(entry.grantee, amount)))
    }

    pub fn voting_power(&self, session: &SessionState) -> Votes {
        session.voting_power()
    }

    /// Entry cap of the council, the configured one when the council sets none.
    pub fn max_allocations(&self, session: &SessionState) -> usize {
        session
            .council()
            .map(|c| c.max_allocations_per_member as usize)
            .filter(|max| *max > 0)
            .unwrap_or(self.settings.max_allocations_per_member)
    }

    pub fn summary(&self, session: &SessionState) -> BallotSummary {
        summarize(
            &self.draft,
            session.voting_power(),
            self.max_allocations(session),
        )
    }

    pub fn check_submission(&self, session: &SessionState) -> Result<(), GateFailure> {
        check_submission(
            &self.draft,
            session.current_allocation(),
            session.voting_power(),
            self.max_allocations(session),
        )
    }

    pub fn can_submit(&self, session: &SessionState) -> bool {
        !self.status.is_pending() && self.check_submission(session).is_ok()
    }

    /// Validates the draft and marks the submission as pending.
    pub fn begin_submission(&mut self, session: &SessionState) -> Result<VoteRequest, BallotError> {
        if self.status.is_pending() {
            return Err(BallotError::SubmissionPending);
        }
        self.check_submission(session)
            .map_err(BallotError::SubmissionDisabled)?;
        self.status = SubmissionStatus::Pending;
        Ok(VoteRequest::from_allocation(&self.draft.allocation))
    }

    /// Records the submitter's result. The draft is kept either way.
    pub fn finish_submission(
        &mut self,
        result: Result<TxHash, SubmitError>,
    ) -> Result<TxHash, BallotError> {
        match result {
            Ok(hash) => {
                info!(%hash, entries = self.draft.len(), "vote submitted");
                self.status = SubmissionStatus::Submitted(hash);
                Ok(hash)
            }
            Err(err) => {
                warn!(error = %err, "vote submission failed");
                self.status = SubmissionStatus::Failed(err.to_string());
                Err(err.into())
            }
        }
    }

    pub async fn submit<S>(
        &mut self,
        session: &SessionState,
        submitter: &S,
    ) -> Result<TxHash, BallotError>
    where
        S: VoteSubmitter + ?Sized,
    {
        let request = self.begin_submission(session)?;
        let result = submitter
            .submit_vote(&request.grantees, &request.amounts)
            .await;
        self.finish_submission(result)
    }

    /// Clears a failure message.
    pub fn dismiss_error(&mut self) {
        if self.status.error_message().is_some() {
            self.status = SubmissionStatus::Idle;
        }
    }

    /// Drops whatever status is recorded, including an abandoned `Pending`.
    pub fn reset_status(&mut self) {
        self.status = SubmissionStatus::Idle;
    }
}
