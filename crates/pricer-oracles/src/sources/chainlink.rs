//! Chainlink feed registry: `latestAnswer` against the USD quote currency.

use async_trait::async_trait;

use pricer_types::{
	u256_to_decimal, Address, BlockNumber, CallArg, PriceError, PriceQuote, SourceKind, U256,
};

use crate::helpers::MAX_TOKEN_DECIMALS;
use crate::{PriceResolver, PriceSource};

/// Denomination address the registry uses for USD pairs.
fn usd_quote_address() -> Address {
	Address::from_low_u64_be(0x348)
}

pub struct ChainlinkFeed;

#[async_trait]
impl PriceSource for ChainlinkFeed {
	fn kind(&self) -> SourceKind {
		SourceKind::ChainlinkFeed
	}

	async fn quote(
		&self,
		resolver: &PriceResolver,
		token: Address,
		block: Option<BlockNumber>,
		_depth: u32,
	) -> Result<PriceQuote, PriceError> {
		let network = resolver.network()?;
		if network.denylists.contains(self.kind(), &token) {
			return Err(PriceError::SourceDenylisted(self.kind()));
		}
		let registry = network
			.contracts
			.chainlink_feed
			.as_ref()
			.filter(|contract| contract.active_at(block))
			.ok_or(PriceError::SourceUnavailable(self.kind()))?;

		let pair = [
			CallArg::Address(token),
			CallArg::Address(usd_quote_address()),
		];
		let answer = resolver
			.client()
			.call(registry.address, "latestAnswer", &pair, block)
			.await
			.map_err(|_| PriceError::SourceReverted(self.kind()))?
			.as_uint()
			.unwrap_or_default();
		if answer.is_zero() {
			return Err(PriceError::SourceReverted(self.kind()));
		}

		// Feed scale varies per pair and must be read alongside the answer;
		// a scale no feed could have marks the pair corrupt.
		let decimals = resolver
			.client()
			.call(registry.address, "decimals", &pair, block)
			.await
			.map_err(|_| PriceError::SourceReverted(self.kind()))?
			.as_uint()
			.filter(|d| *d <= U256::from(MAX_TOKEN_DECIMALS))
			.ok_or(PriceError::SourceReverted(self.kind()))?;

		Ok(PriceQuote::new(
			u256_to_decimal(answer, 0),
			decimals.as_u32(),
			self.kind(),
		))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testutil::MockCallClient;
	use pricer_config::{
		ContractInfo, NetworkConfig, OracleChainConfig, PricerConfig, SourceContracts, TokenRef,
	};
	use pricer_types::{CallValue, ChainId};
	use rust_decimal_macros::dec;
	use std::sync::Arc;

	fn addr(n: u64) -> Address {
		Address::from_low_u64_be(n)
	}

	fn resolver(client: MockCallClient) -> PriceResolver {
		let network = NetworkConfig {
			oracle: OracleChainConfig {
				order: vec![SourceKind::ChainlinkFeed],
				count: 1,
			},
			overrides: Default::default(),
			contracts: SourceContracts {
				chainlink_feed: Some(ContractInfo::new(addr(0x12), 0)),
				..Default::default()
			},
			denylists: Default::default(),
			hardcoded_stables: Vec::new(),
			blacklist: Vec::new(),
			usdc: TokenRef {
				address: addr(0xA0),
				decimals: 6,
			},
			weth: TokenRef {
				address: addr(0xE0),
				decimals: 18,
			},
			eth_alias: None,
			stable_path: Vec::new(),
		};
		let mut config = PricerConfig::default();
		config.networks.insert(ChainId::ETHEREUM, network);
		PriceResolver::new(ChainId::ETHEREUM, config, Arc::new(client))
	}

	#[tokio::test]
	async fn test_reads_answer_at_feed_scale() {
		let token = addr(0x10);
		let pair = [
			CallArg::Address(token),
			CallArg::Address(usd_quote_address()),
		];
		let mut client = MockCallClient::new();
		// 1850.12345678 USD at the conventional 8 feed decimals.
		client.on(
			addr(0x12),
			"latestAnswer",
			&pair,
			CallValue::Uint(U256::from(185_012_345_678u64)),
		);
		client.on(addr(0x12), "decimals", &pair, CallValue::Uint(U256::from(8)));

		let quote = resolver(client).resolve_price_usd(token, None).await;
		assert_eq!(quote.value(), dec!(1850.12345678));
		assert_eq!(quote.decimals(), 8);
		assert_eq!(quote.source(), SourceKind::ChainlinkFeed);
	}

	#[tokio::test]
	async fn test_zero_answer_fails() {
		let token = addr(0x10);
		let pair = [
			CallArg::Address(token),
			CallArg::Address(usd_quote_address()),
		];
		let mut client = MockCallClient::new();
		client.on(
			addr(0x12),
			"latestAnswer",
			&pair,
			CallValue::Uint(U256::zero()),
		);
		client.on(addr(0x12), "decimals", &pair, CallValue::Uint(U256::from(8)));

		let quote = resolver(client).resolve_price_usd(token, None).await;
		assert!(quote.failed_quote());
	}

	#[tokio::test]
	async fn test_absurd_feed_scale_fails() {
		let token = addr(0x10);
		let pair = [
			CallArg::Address(token),
			CallArg::Address(usd_quote_address()),
		];
		let mut client = MockCallClient::new();
		client.on(
			addr(0x12),
			"latestAnswer",
			&pair,
			CallValue::Uint(U256::from(185_012_345_678u64)),
		);
		client.on(
			addr(0x12),
			"decimals",
			&pair,
			CallValue::Uint(U256::from(100)),
		);

		let quote = resolver(client).resolve_price_usd(token, None).await;
		assert!(quote.failed_quote());
	}

	#[tokio::test]
	async fn test_unlisted_pair_fails() {
		let quote = resolver(MockCallClient::new())
			.resolve_price_usd(addr(0x10), None)
			.await;
		assert!(quote.failed_quote());
	}
}
