use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("allocation has {grantees} grantees but {amounts} amounts")]
    AllocationShape { grantees: usize, amounts: usize },
    #[error("amount {0} does not fit into votes")]
    AmountOverflow(String),
    #[error("failed to parse snapshot: {0}")]
    Json(#[from] serde_json::Error),
}
