use serde::{Deserialize, Serialize};

use crate::{
    constants::{AMOUNT_STEP, DEFAULT_CHAIN_ID, GRANTEES_BATCH_SIZE, MAX_ALLOCATIONS_PER_MEMBER},
    error::ConfigError,
    ChainId,
};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CouncilConfig {
    #[serde(default = "default_chain_id")]
    pub default_chain_id: ChainId,
    #[serde(default)]
    pub feed: FeedSettings,
    #[serde(default)]
    pub ballot: BallotSettings,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeedSettings {
    /// Grantees revealed per viewport trigger.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BallotSettings {
    #[serde(default = "default_max_allocations")]
    pub max_allocations_per_member: usize,
    #[serde(default = "default_amount_step")]
    pub amount_step: u64,
}

fn default_chain_id() -> ChainId {
    DEFAULT_CHAIN_ID
}

fn default_batch_size() -> usize {
    GRANTEES_BATCH_SIZE
}

fn default_max_allocations() -> usize {
    MAX_ALLOCATIONS_PER_MEMBER
}

fn default_amount_step() -> u64 {
    AMOUNT_STEP
}

impl Default for CouncilConfig {
    fn default() -> Self {
        Self {
            default_chain_id: DEFAULT_CHAIN_ID,
            feed: FeedSettings::default(),
            ballot: BallotSettings::default(),
        }
    }
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            batch_size: GRANTEES_BATCH_SIZE,
        }
    }
}

impl Default for BallotSettings {
    fn default() -> Self {
        Self {
            max_allocations_per_member: MAX_ALLOCATIONS_PER_MEMBER,
            amount_step: AMOUNT_STEP,
        }
    }
}

impl CouncilConfig {
    /// Parses config json. Missing fields fall back to defaults.
    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        let config: CouncilConfig = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.feed.batch_size == 0 {
            return Err(ConfigError::Invalid("feed batch size must be positive".into()));
        }
        if self.ballot.max_allocations_per_member == 0 {
            return Err(ConfigError::Invalid(
                "max allocations per member must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::CouncilConfig;
    use crate::error::ConfigError;

    #[test]
    fn config_defaults_for_missing_fields() {
        let config = CouncilConfig::from_json_str(r#"{"feed": {"batchSize": 8}}"#).unwrap();
        assert_eq!(config.feed.batch_size, 8);
        assert_eq!(config.ballot.max_allocations_per_member, 10);
        assert_eq!(config.ballot.amount_step, 10);
        assert_eq!(config.default_chain_id, 11_155_420);
        assert_eq!(CouncilConfig::from_json_str("{}").unwrap(), CouncilConfig::default());
    }

    #[test]
    fn config_rejects_zero_batch() {
        let err = CouncilConfig::from_json_str(r#"{"feed": {"batchSize": 0}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        let err = CouncilConfig::from_json_str("{").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }
}
