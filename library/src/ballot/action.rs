use alloy_primitives::Address;
use serde::Deserialize;

use super::error::BallotError;
use crate::types::{Allocation, CurrentAllocation};

/// Every edit the ballot accepts.
#[derive(Clone, Debug, PartialEq)]
pub enum BallotAction {
    /// Opens the ballot for editing the member's existing votes.
    /// Copies `current` only into an empty draft.
    Seed { current: CurrentAllocation },
    /// Appends `allocation`. An empty draft is first seeded from `current`.
    Add {
        allocation: Allocation,
        current: Option<CurrentAllocation>,
    },
    /// Replaces the entry of the same grantee in place.
    Update(Allocation),
    Delete { grantee: Address },
    ShowBallot,
    HideBallot,
}

/// Action as dispatched from an untyped boundary,
/// e.g. `{"type": "add", "allocation": {...}, "currentAllocation": {...}}`.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct RawAction {
    #[serde(rename = "type")]
    kind: String,
    allocation: Option<Allocation>,
    current_allocation: Option<CurrentAllocation>,
}

impl BallotAction {
    /// Parses an untyped action. Known actions lacking their payload leave
    /// the draft unchanged and come back as `None`.
    pub fn from_json_str(input: &str) -> Result<Option<Self>, BallotError> {
        let raw: RawAction = serde_json::from_str(input)?;
        Self::from_raw(raw)
    }

    pub fn name(&self) -> &'static str {
        match self {
            BallotAction::Seed { .. } => "seed",
            BallotAction::Add { .. } => "add",
            BallotAction::Update(_) => "update",
            BallotAction::Delete { .. } => "delete",
            BallotAction::ShowBallot => "show-ballot",
            BallotAction::HideBallot => "hide-ballot",
        }
    }

    fn from_raw(raw: RawAction) -> Result<Option<Self>, BallotError> {
        let RawAction {
            kind,
            allocation,
            current_allocation,
        } = raw;

        let action = match (kind.as_str(), allocation) {
            ("add", Some(allocation)) => Some(BallotAction::Add {
                allocation,
                current: current_allocation,
            }),
            // "add" without a target opens the ballot with the current votes.
            ("add", None) => current_allocation.map(|current| BallotAction::Seed { current }),
            ("update", allocation) => allocation.map(BallotAction::Update),
            ("delete", allocation) => allocation.map(|a| BallotAction::Delete { grantee: a.grantee }),
            ("show-ballot", _) => Some(BallotAction::ShowBallot),
            ("hide-ballot", _) => Some(BallotAction::HideBallot),
            _ => return Err(BallotError::UnknownAction(kind.clone())),
        };
        Ok(action)
    }
}
