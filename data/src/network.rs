//! Chains the council front-end is deployed on.

use alloy_primitives::{address, Address};
use library::ChainId;
use serde::Serialize;

/// Distribution super token.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub name: &'static str,
    pub address: Address,
    pub icon: &'static str,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Network {
    pub id: ChainId,
    pub name: &'static str,
    pub icon: &'static str,
    pub rpc_url: &'static str,
    pub block_explorer: &'static str,
    pub council_address: Address,
    pub council_subgraph: &'static str,
    pub superfluid_explorer: &'static str,
    pub superfluid_dashboard: &'static str,
    pub superfluid_subgraph: &'static str,
    pub on_ramp_name: &'static str,
    pub superfluid_host: Address,
    pub superfluid_resolver: Address,
    pub gda_forwarder: Address,
    pub tokens: &'static [Token],
}

static OP_SEPOLIA_TOKENS: [Token; 1] = [Token {
    name: "fDAIx",
    address: address!("D6FAF98BeFA647403cc56bDB598690660D5257d2"),
    icon: "/dai.svg",
}];

static NETWORKS: [Network; 1] = [Network {
    id: 11_155_420,
    name: "OP Sepolia",
    icon: "/optimism.svg",
    rpc_url: "https://optimism-sepolia-rpc.publicnode.com",
    block_explorer: "https://sepolia-optimism.etherscan.io",
    council_address: address!("4F2289c1719a2DaF0a38B1983265eC848aFCd36e"),
    council_subgraph: "https://api.goldsky.com/api/public/project_cm2vlxq9s82qo01xtc11y9stm/subgraphs/flowstate-council-optimism-sepolia/0.0.2/gn",
    superfluid_explorer: "https://explorer.superfluid.finance/optimism-sepolia",
    superfluid_dashboard: "https://app.superfluid.finance",
    superfluid_subgraph: "https://subgraph-endpoints.superfluid.dev/optimism-sepolia/protocol-v1",
    on_ramp_name: "OPTIMISM_ETH",
    superfluid_host: address!("d399e2Fb5f4cf3722a11F65b88FAB6B2B8621005"),
    superfluid_resolver: address!("554c06487bEc8c890A0345eb05a5292C1b1017Bd"),
    gda_forwarder: address!("6DA13Bde224A05a288748d857b9e7DDEffd1dE08"),
    tokens: &OP_SEPOLIA_TOKENS,
}];

pub fn networks() -> &'static [Network] {
    &NETWORKS
}

/// Network for `chain_id`. Unknown chains fall back to the first entry.
pub fn find_network(chain_id: ChainId) -> &'static Network {
    NETWORKS
        .iter()
        .find(|n| n.id == chain_id)
        .unwrap_or(&NETWORKS[0])
}

#[cfg(test)]
mod tests {
    use library::constants::DEFAULT_CHAIN_ID;

    use super::*;

    #[test]
    fn default_chain_is_listed() {
        let network = find_network(DEFAULT_CHAIN_ID);
        assert_eq!(network.id, DEFAULT_CHAIN_ID);
        assert_eq!(network.name, "OP Sepolia");
        assert_eq!(network.tokens[0].name, "fDAIx");
    }

    #[test]
    fn unknown_chain_falls_back() {
        assert_eq!(find_network(1), &networks()[0]);
    }

    #[test]
    fn serializes_camel_case() {
        let value = serde_json::to_value(find_network(DEFAULT_CHAIN_ID)).unwrap();
        assert_eq!(value["rpcUrl"], "https://optimism-sepolia-rpc.publicnode.com");
        let forwarder: Address = serde_json::from_value(value["gdaForwarder"].clone()).unwrap();
        assert_eq!(forwarder, address!("6DA13Bde224A05a288748d857b9e7DDEffd1dE08"));
    }
}
