//! Configuration structures.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use pricer_types::{Address, BlockNumber, ChainId, SourceKind};

use crate::serde_helpers;

/// Top-level configuration: one network table per chain.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PricerConfig {
	#[serde(
		default,
		deserialize_with = "serde_helpers::deserialize_chain_id_map",
		serialize_with = "serde_helpers::serialize_chain_id_map"
	)]
	pub networks: HashMap<ChainId, NetworkConfig>,
}

impl PricerConfig {
	/// Configuration with only the built-in Ethereum mainnet table.
	pub fn builtin() -> Self {
		let mut networks = HashMap::new();
		networks.insert(ChainId::ETHEREUM, crate::mainnet::network_config());
		Self { networks }
	}

	pub fn network(&self, chain: ChainId) -> Option<&NetworkConfig> {
		self.networks.get(&chain)
	}
}

/// A deployed oracle contract and the block it became usable at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractInfo {
	pub address: Address,
	#[serde(default)]
	pub start_block: BlockNumber,
}

impl ContractInfo {
	pub fn new(address: Address, start_block: BlockNumber) -> Self {
		Self {
			address,
			start_block,
		}
	}

	/// Whether the contract already exists at the queried block. A `None`
	/// block means "latest" and every configured contract qualifies.
	pub fn active_at(&self, block: Option<BlockNumber>) -> bool {
		block.map_or(true, |number| self.start_block <= number)
	}
}

/// Which sources to try, in what order, and how many answers to collect
/// before reducing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleChainConfig {
	pub order: Vec<SourceKind>,
	pub count: usize,
}

/// Oracle contract deployments for one network. Absent entries mean the
/// source is unavailable there.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceContracts {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub yearn_lens: Option<ContractInfo>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub chainlink_feed: Option<ContractInfo>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub aave_oracle: Option<ContractInfo>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub oneinch_oracle: Option<ContractInfo>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub curve_calculations: Option<ContractInfo>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub sushi_calculations: Option<ContractInfo>,
	/// Curve registries, walked in order.
	#[serde(default)]
	pub curve_registries: Vec<ContractInfo>,
	/// Uniswap-fork routers, tried in order.
	#[serde(default)]
	pub uniswap_routers: Vec<ContractInfo>,
}

/// Tokens a given source is known to misprice.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Denylists {
	#[serde(default)]
	pub yearn_lens: Vec<Address>,
	#[serde(default)]
	pub chainlink_feed: Vec<Address>,
	#[serde(default)]
	pub aave_oracle: Vec<Address>,
	#[serde(default)]
	pub oneinch_oracle: Vec<Address>,
	#[serde(default)]
	pub curve_calculations: Vec<Address>,
	#[serde(default)]
	pub sushi_calculations: Vec<Address>,
}

impl Denylists {
	pub fn contains(&self, kind: SourceKind, token: &Address) -> bool {
		let list = match kind {
			SourceKind::YearnLens => &self.yearn_lens,
			SourceKind::ChainlinkFeed => &self.chainlink_feed,
			SourceKind::AaveOracle => &self.aave_oracle,
			SourceKind::OneInchOracle => &self.oneinch_oracle,
			SourceKind::CurveCalculations => &self.curve_calculations,
			SourceKind::SushiCalculations => &self.sushi_calculations,
			_ => return false,
		};
		list.contains(token)
	}
}

/// A well-known token with its decimal scale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRef {
	pub address: Address,
	pub decimals: u32,
}

/// Everything the resolver needs to price tokens on one network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
	/// Default source order and answer count.
	pub oracle: OracleChainConfig,
	/// Per-token overrides of the default chain.
	#[serde(default)]
	pub overrides: HashMap<Address, OracleChainConfig>,
	pub contracts: SourceContracts,
	#[serde(default)]
	pub denylists: Denylists,
	/// Tokens quoted at exactly one dollar without any calls.
	#[serde(default)]
	pub hardcoded_stables: Vec<Address>,
	/// Tokens the change validator forces to zero.
	#[serde(default)]
	pub blacklist: Vec<Address>,
	/// Canonical USD reference token (USDC).
	pub usdc: TokenRef,
	/// Wrapped native token used as the routing hop.
	pub weth: TokenRef,
	/// Pseudo-address some protocols use for the unwrapped native asset;
	/// mapped onto `weth` before routing.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub eth_alias: Option<Address>,
	/// Reference stables for spot-quote oracles, in preference order.
	#[serde(default)]
	pub stable_path: Vec<TokenRef>,
}

impl NetworkConfig {
	/// The oracle chain for a token, honoring per-token overrides.
	pub fn oracle_config(&self, token: &Address) -> &OracleChainConfig {
		self.overrides.get(token).unwrap_or(&self.oracle)
	}

	pub fn is_hardcoded_stable(&self, token: &Address) -> bool {
		self.hardcoded_stables.contains(token)
	}
}
