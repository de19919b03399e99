use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use super::wire::de_u64;
use crate::{ProfileId, Votes};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CouncilMember {
    pub account: Address,
    #[serde(deserialize_with = "de_u64")]
    pub voting_power: Votes,
    #[serde(default = "enabled")]
    pub enabled: bool,
}

/// Grantee as registered on the council contract.
/// `name` references the metadata profile id.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CouncilGrantee {
    pub name: ProfileId,
    pub account: Address,
    #[serde(default = "enabled")]
    pub enabled: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Council {
    pub council_name: String,
    #[serde(default)]
    pub council_symbol: String,
    pub pool: Address,
    #[serde(default)]
    pub council_members: Vec<CouncilMember>,
    #[serde(default)]
    pub grantees: Vec<CouncilGrantee>,
    #[serde(default, deserialize_with = "de_u64")]
    pub max_allocations_per_member: u64,
}

fn enabled() -> bool {
    true
}

impl Council {
    pub fn member(&self, account: &Address) -> Option<&CouncilMember> {
        self.council_members.iter().find(|m| m.account == *account)
    }

    /// Voting power of the account. Non-members have none.
    pub fn voting_power(&self, account: &Address) -> Votes {
        self.member(account).map(|m| m.voting_power).unwrap_or(0)
    }

    pub fn grantee_by_account(&self, account: &Address) -> Option<&CouncilGrantee> {
        self.grantees.iter().find(|g| g.account == *account)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectMetadata {
    pub title: String,
    pub description: String,
    pub website: String,
    pub logo_img: String,
    pub banner_img: String,
    pub project_twitter: String,
    pub user_github: String,
    pub project_github: String,
    pub project_telegram: String,
    pub project_warpcast: String,
    pub project_guild: String,
    pub project_discord: String,
    pub project_lens: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct FlowStateProfile {
    pub id: ProfileId,
    pub metadata: ProjectMetadata,
}
