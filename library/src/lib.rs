#![allow(clippy::new_without_default)]

use alloy_primitives::Address;

mod unit_tests;

pub mod ballot;
pub mod config;
pub mod constants;
pub mod error;
pub mod feed;
pub mod session;
pub mod types;
pub mod utils;

/// Integer vote amount as stored by the council contract.
pub type Votes = u64;
/// Units a grantee holds in the distribution pool.
pub type Units = u128;
pub type ChainId = u64;
/// Profile id on the metadata provider.
pub type ProfileId = String;
/// Identity of a grantee across feed batches.
pub type GranteeKey = (ProfileId, Address);
