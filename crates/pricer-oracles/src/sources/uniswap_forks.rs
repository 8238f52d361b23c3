//! Uniswap-fork AMM router: spot quotes through the WETH/USDC path, pair
//! liquidity attachment, and LP share pricing from pair reserves.

use async_trait::async_trait;
use rust_decimal::Decimal;

use pricer_types::{
	pow10, u256_to_decimal, Address, BlockNumber, CallArg, PriceError, PriceQuote, SourceKind,
	U256, USD_DECIMALS,
};

use crate::{helpers, PriceResolver, PriceSource};

/// LP fee taken on every hop of a swap, in basis points.
const FEE_BIPS_PER_HOP: u64 = 30;
const BIPS: u64 = 10_000;

pub struct UniswapForksRouter;

#[async_trait]
impl PriceSource for UniswapForksRouter {
	fn kind(&self) -> SourceKind {
		SourceKind::UniswapForksRouter
	}

	async fn quote(
		&self,
		resolver: &PriceResolver,
		token: Address,
		block: Option<BlockNumber>,
		depth: u32,
	) -> Result<PriceQuote, PriceError> {
		let network = resolver.network()?;

		// The unwrapped-native pseudo-address trades as WETH.
		let mut token = token;
		if network.eth_alias == Some(token) {
			token = network.weth.address;
		}
		if token == network.usdc.address {
			return Ok(PriceQuote::new(
				pow10(USD_DECIMALS),
				USD_DECIMALS,
				self.kind(),
			));
		}

		if self.is_lp_pair(resolver, token, block).await {
			return self.lp_share_price(resolver, token, block, depth).await;
		}
		self.spot_price(resolver, token, block, depth).await
	}
}

impl UniswapForksRouter {
	/// Pair contracts expose `factory()`; plain tokens revert on it.
	async fn is_lp_pair(
		&self,
		resolver: &PriceResolver,
		token: Address,
		block: Option<BlockNumber>,
	) -> bool {
		let network = match resolver.network() {
			Ok(network) => network,
			Err(_) => return false,
		};
		if token == network.weth.address {
			return false;
		}
		resolver
			.client()
			.call(token, "factory", &[], block)
			.await
			.ok()
			.and_then(|value| value.as_address())
			.map(|factory| !factory.is_zero())
			.unwrap_or(false)
	}

	async fn spot_price(
		&self,
		resolver: &PriceResolver,
		token: Address,
		block: Option<BlockNumber>,
		depth: u32,
	) -> Result<PriceQuote, PriceError> {
		let network = resolver.network()?;
		let path: Vec<Address> = if token == network.weth.address {
			vec![network.weth.address, network.usdc.address]
		} else {
			vec![token, network.weth.address, network.usdc.address]
		};
		let hops = (path.len() - 1) as u64;

		let decimals = helpers::token_decimals(resolver.client(), token, block).await;
		let amount_in = U256::exp10(decimals as usize);

		let mut answer: Option<(Address, U256)> = None;
		for router in &network.contracts.uniswap_routers {
			if !router.active_at(block) {
				continue;
			}
			let amounts = match resolver
				.client()
				.call(
					router.address,
					"getAmountsOut",
					&[
						CallArg::Uint(amount_in),
						CallArg::Addresses(path.clone()),
					],
					block,
				)
				.await
			{
				Ok(value) => value.as_uints().map(|a| a.to_vec()).unwrap_or_default(),
				Err(_) => continue,
			};
			match amounts.last() {
				Some(amount) if !amount.is_zero() => {
					answer = Some((router.address, *amount));
					break;
				}
				_ => continue,
			}
		}
		let (router, amount_out) =
			answer.ok_or(PriceError::SourceUnavailable(self.kind()))?;

		// Quotes come back net of the per-hop LP fee; gross it back up so
		// the price reflects the actual exchange rate. An amount too wide
		// to rescale is a corrupt answer.
		let fee_bips = FEE_BIPS_PER_HOP * hops;
		let grossed = amount_out
			.checked_mul(U256::from(BIPS))
			.map(|scaled| scaled / U256::from(BIPS - fee_bips))
			.ok_or(PriceError::SourceReverted(self.kind()))?;

		let mut quote = PriceQuote::new(
			u256_to_decimal(grossed, 0),
			network.usdc.decimals,
			self.kind(),
		);
		if token != network.weth.address {
			if let Some(liquidity) = self
				.pair_liquidity(resolver, router, token, block, depth)
				.await
			{
				quote.set_liquidity(liquidity);
			}
		}
		Ok(quote)
	}

	/// USD value of the WETH side of the token's pair, as a magnitude at
	/// the canonical scale. `None` when the pair cannot be inspected.
	async fn pair_liquidity(
		&self,
		resolver: &PriceResolver,
		router: Address,
		token: Address,
		block: Option<BlockNumber>,
		depth: u32,
	) -> Option<Decimal> {
		let network = resolver.network().ok()?;
		let weth = network.weth.address;

		let factory = resolver
			.client()
			.call(router, "factory", &[], block)
			.await
			.ok()?
			.as_address()
			.filter(|address| !address.is_zero())?;
		let pair = resolver
			.client()
			.call(
				factory,
				"getPair",
				&[CallArg::Address(token), CallArg::Address(weth)],
				block,
			)
			.await
			.ok()?
			.as_address()
			.filter(|address| !address.is_zero())?;

		let reserves = resolver
			.client()
			.call(pair, "getReserves", &[], block)
			.await
			.ok()?
			.as_uints()?
			.to_vec();
		if reserves.len() < 2 {
			return None;
		}
		let token0 = resolver
			.client()
			.call(pair, "token0", &[], block)
			.await
			.ok()?
			.as_address()?;
		let weth_reserve = if token0 == weth {
			reserves[0]
		} else {
			reserves[1]
		};

		let weth_quote = resolver.resolve_at_depth(weth, block, depth + 1).await.ok()?;
		u256_to_decimal(weth_reserve, network.weth.decimals)
			.checked_mul(weth_quote.value())
			.and_then(|reserve_usd| reserve_usd.checked_mul(pow10(USD_DECIMALS)))
	}

	async fn lp_share_price(
		&self,
		resolver: &PriceResolver,
		pair: Address,
		block: Option<BlockNumber>,
		depth: u32,
	) -> Result<PriceQuote, PriceError> {
		let client = resolver.client();
		let token0 = client
			.call(pair, "token0", &[], block)
			.await
			.map_err(|_| PriceError::SourceReverted(self.kind()))?
			.as_address()
			.filter(|address| !address.is_zero())
			.ok_or(PriceError::SourceReverted(self.kind()))?;
		let token1 = client
			.call(pair, "token1", &[], block)
			.await
			.map_err(|_| PriceError::SourceReverted(self.kind()))?
			.as_address()
			.filter(|address| !address.is_zero())
			.ok_or(PriceError::SourceReverted(self.kind()))?;
		let reserves = client
			.call(pair, "getReserves", &[], block)
			.await
			.map_err(|_| PriceError::SourceReverted(self.kind()))?
			.as_uints()
			.map(|values| values.to_vec())
			.unwrap_or_default();
		if reserves.len() < 2 {
			return Err(PriceError::SourceReverted(self.kind()));
		}
		let supply = helpers::token_supply(client, pair, block).await;
		if supply.is_zero() {
			return Err(PriceError::SourceReverted(self.kind()));
		}
		let pair_decimals = helpers::token_decimals(client, pair, block).await;

		let decimals0 = helpers::token_decimals(client, token0, block).await;
		let decimals1 = helpers::token_decimals(client, token1, block).await;
		let quote0 = resolver.resolve_at_depth(token0, block, depth + 1).await?;
		let quote1 = resolver.resolve_at_depth(token1, block, depth + 1).await?;

		let total_usd = u256_to_decimal(reserves[0], decimals0)
			.checked_mul(quote0.value())
			.zip(u256_to_decimal(reserves[1], decimals1).checked_mul(quote1.value()))
			.and_then(|(value0, value1)| value0.checked_add(value1))
			.ok_or(PriceError::SourceReverted(self.kind()))?;
		let per_share = total_usd
			.checked_mul(pow10(pair_decimals))
			.map(|scaled| scaled / u256_to_decimal(supply, 0))
			.and_then(|per_share| per_share.checked_mul(pow10(USD_DECIMALS)))
			.ok_or(PriceError::SourceReverted(self.kind()))?;

		Ok(PriceQuote::new(per_share, USD_DECIMALS, self.kind()))
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

	const TOKEN: u64 = 0x10;
	const ROUTER: u64 = 0x21;
	const FACTORY: u64 = 0x22;
	const PAIR: u64 = 0x23;
	const USDC: u64 = 0xA0;
	const WETH: u64 = 0xE0;
	const ETH: u64 = 0xEE;
	const DAI: u64 = 0xDA;
	const USDT: u64 = 0xA1;

	fn network(weth_is_stable: bool) -> NetworkConfig {
		let mut hardcoded_stables = vec![addr(DAI), addr(USDT)];
		if weth_is_stable {
			hardcoded_stables.push(addr(WETH));
		}
		NetworkConfig {
			oracle: OracleChainConfig {
				order: vec![SourceKind::UniswapForksRouter],
				count: 1,
			},
			overrides: Default::default(),
			contracts: SourceContracts {
				uniswap_routers: vec![ContractInfo::new(addr(ROUTER), 0)],
				..Default::default()
			},
			denylists: Default::default(),
			hardcoded_stables,
			blacklist: Vec::new(),
			usdc: TokenRef {
				address: addr(USDC),
				decimals: 6,
			},
			weth: TokenRef {
				address: addr(WETH),
				decimals: 18,
			},
			eth_alias: Some(addr(ETH)),
			stable_path: Vec::new(),
		}
	}

	fn resolver(network: NetworkConfig, client: MockCallClient) -> PriceResolver {
		let mut config = PricerConfig::default();
		config.networks.insert(ChainId::ETHEREUM, network);
		PriceResolver::new(ChainId::ETHEREUM, config, Arc::new(client))
	}

	fn three_hop_args() -> [CallArg; 2] {
		[
			CallArg::Uint(U256::exp10(18)),
			CallArg::Addresses(vec![addr(TOKEN), addr(WETH), addr(USDC)]),
		]
	}

	fn spot_client() -> MockCallClient {
		let mut client = MockCallClient::new();
		// 994_000 out, net of two 30-bps hops: grosses to exactly 1.00.
		client.on(
			addr(ROUTER),
			"getAmountsOut",
			&three_hop_args(),
			CallValue::Uints(vec![
				U256::exp10(18),
				U256::exp10(17) * U256::from(5),
				U256::from(994_000),
			]),
		);
		client.on_any(addr(ROUTER), "factory", CallValue::Address(addr(FACTORY)));
		client.on(
			addr(FACTORY),
			"getPair",
			&[CallArg::Address(addr(TOKEN)), CallArg::Address(addr(WETH))],
			CallValue::Address(addr(PAIR)),
		);
		client.on_any(
			addr(PAIR),
			"getReserves",
			CallValue::Uints(vec![
				U256::exp10(18) * U256::from(10),
				U256::exp10(18) * U256::from(5),
				U256::zero(),
			]),
		);
		client.on_any(addr(PAIR), "token0", CallValue::Address(addr(TOKEN)));
		client
	}

	#[tokio::test]
	async fn test_spot_price_grosses_up_fees() {
		let resolver = resolver(network(true), spot_client());
		let quote = resolver.resolve_price_usd(addr(TOKEN), None).await;
		assert_eq!(quote.value(), dec!(1));
		assert_eq!(quote.decimals(), 6);
		assert_eq!(quote.source(), SourceKind::UniswapForksRouter);
	}

	#[tokio::test]
	async fn test_spot_price_attaches_weth_side_liquidity() {
		// WETH is on the stable list here, so the 5 WETH reserve is 5 USD.
		let resolver = resolver(network(true), spot_client());
		let quote = resolver.resolve_price_usd(addr(TOKEN), None).await;
		assert_eq!(quote.liquidity_usd(), dec!(5000000));
	}

	#[tokio::test]
	async fn test_absurd_token_decimals_use_default_scale() {
		// A token claiming 100 decimals is corrupt; the spot path falls back
		// to the 18-decimal default instead of blowing up the input amount.
		let mut client = spot_client();
		client.on_any(addr(TOKEN), "decimals", CallValue::Uint(U256::from(100)));
		let resolver = resolver(network(true), client);
		let quote = resolver.resolve_price_usd(addr(TOKEN), None).await;
		assert_eq!(quote.value(), dec!(1));
	}

	#[tokio::test]
	async fn test_oversized_router_answer_fails_the_quote() {
		let mut client = MockCallClient::new();
		client.on(
			addr(ROUTER),
			"getAmountsOut",
			&three_hop_args(),
			CallValue::Uints(vec![U256::exp10(18), U256::one(), U256::MAX]),
		);
		let resolver = resolver(network(true), client);
		let quote = resolver.resolve_price_usd(addr(TOKEN), None).await;
		assert!(quote.failed_quote());
	}

	#[tokio::test]
	async fn test_weth_prices_through_two_hop_path() {
		let mut client = MockCallClient::new();
		client.on(
			addr(ROUTER),
			"getAmountsOut",
			&[
				CallArg::Uint(U256::exp10(18)),
				CallArg::Addresses(vec![addr(WETH), addr(USDC)]),
			],
			CallValue::Uints(vec![U256::exp10(18), U256::from(2_991_000)]),
		);
		let resolver = resolver(network(false), client);
		let quote = resolver.resolve_price_usd(addr(WETH), None).await;
		// One hop: 2_991_000 × 10000 / 9970 = 3_000_000.
		assert_eq!(quote.value(), dec!(3));
		assert_eq!(quote.liquidity_usd(), Decimal::ZERO);
	}

	#[tokio::test]
	async fn test_eth_alias_maps_to_weth() {
		let mut client = MockCallClient::new();
		client.on(
			addr(ROUTER),
			"getAmountsOut",
			&[
				CallArg::Uint(U256::exp10(18)),
				CallArg::Addresses(vec![addr(WETH), addr(USDC)]),
			],
			CallValue::Uints(vec![U256::exp10(18), U256::from(2_991_000)]),
		);
		let resolver = resolver(network(false), client);
		let quote = resolver.resolve_price_usd(addr(ETH), None).await;
		assert_eq!(quote.value(), dec!(3));
	}

	#[tokio::test]
	async fn test_lp_share_price_from_reserves() {
		let mut client = MockCallClient::new();
		client.on_any(addr(PAIR), "factory", CallValue::Address(addr(FACTORY)));
		client.on_any(addr(PAIR), "token0", CallValue::Address(addr(DAI)));
		client.on_any(addr(PAIR), "token1", CallValue::Address(addr(USDT)));
		client.on_any(
			addr(PAIR),
			"getReserves",
			CallValue::Uints(vec![
				U256::exp10(18) * U256::from(100),
				U256::exp10(6) * U256::from(200),
				U256::zero(),
			]),
		);
		client.on_any(
			addr(PAIR),
			"totalSupply",
			CallValue::Uint(U256::exp10(18) * U256::from(250)),
		);
		client.on_any(addr(USDT), "decimals", CallValue::Uint(U256::from(6)));

		let resolver = resolver(network(false), client);
		let quote = resolver.resolve_price_usd(addr(PAIR), None).await;
		// (100 × $1 + 200 × $1) / 250 shares = $1.20 per share.
		assert_eq!(quote.value(), dec!(1.2));
		assert_eq!(quote.source(), SourceKind::UniswapForksRouter);
	}

	#[tokio::test]
	async fn test_no_router_answers() {
		let resolver = resolver(network(false), MockCallClient::new());
		let quote = resolver.resolve_price_usd(addr(TOKEN), None).await;
		assert!(quote.failed_quote());
	}
}
