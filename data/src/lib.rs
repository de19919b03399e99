pub mod network;

pub use library::constants::DEFAULT_CHAIN_ID;
pub use network::{find_network, networks, Network, Token};
