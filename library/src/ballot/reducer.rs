use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::action::BallotAction;
use crate::types::Allocation;

/// Working copy of the member's votes. Lives only for the session.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct DraftAllocation {
    pub visible: bool,
    pub allocation: Vec<Allocation>,
}

impl DraftAllocation {
    pub fn new() -> Self {
        DraftAllocation {
            visible: false,
            allocation: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.allocation.is_empty()
    }

    pub fn len(&self) -> usize {
        self.allocation.len()
    }

    pub fn get(&self, grantee: &Address) -> Option<&Allocation> {
        self.allocation.iter().find(|a| a.grantee == *grantee)
    }

    /// Applies `action` in place.
    pub fn apply(&mut self, action: BallotAction) {
        debug!(action = action.name(), entries = self.len(), "ballot action");
        *self = reduce(self, action);
    }
}

/// Computes the next draft. Pure; `draft` is left untouched.
pub fn reduce(draft: &DraftAllocation, action: BallotAction) -> DraftAllocation {
    let mut next = draft.clone();

    match action {
        BallotAction::Seed { current } => {
            if next.allocation.is_empty() {
                next.allocation = current.allocation;
            }
            next.visible = true;
        }
        BallotAction::Add {
            allocation,
            current,
        } => {
            if next.allocation.is_empty() {
                if let Some(current) = current {
                    next.allocation = current.allocation;
                }
            }
            next.allocation.push(allocation);
        }
        BallotAction::Update(allocation) => {
            if let Some(entry) = next
                .allocation
                .iter_mut()
                .find(|a| a.grantee == allocation.grantee)
            {
                *entry = allocation;
            }
        }
        BallotAction::Delete { grantee } => {
            next.allocation.retain(|a| a.grantee != grantee);
        }
        BallotAction::ShowBallot => next.visible = true,
        BallotAction::HideBallot => next.visible = false,
    }

    next
}
