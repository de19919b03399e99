pub const DEFAULT_CHAIN_ID: u64 = 11_155_420;

pub const MAX_ALLOCATIONS_PER_MEMBER: usize = 10;
/// Step used by the ballot +/- buttons.
pub const AMOUNT_STEP: u64 = 10;
pub const GRANTEES_BATCH_SIZE: usize = 20;

pub const SECONDS_IN_DAY: u64 = 86_400;
pub const SECONDS_IN_WEEK: u64 = 604_800;
pub const SECONDS_IN_MONTH: u64 = 2_628_000;
pub const SECONDS_IN_YEAR: u64 = 31_536_000;

/// Decimals of the streamed super token.
pub const TOKEN_DECIMALS: u8 = 18;
