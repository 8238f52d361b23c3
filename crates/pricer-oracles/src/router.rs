//! Curve router: prices pool share tokens (and plain pools) by decomposing
//! them through the on-chain registries.
//!
//! A share token is looked up in each registry; the owning pool is then
//! classified as a crypto pool (it exposes an oracle-price accessor) or a
//! stable pool. Crypto pools are valued from their balances, stable pools
//! from the virtual price times a constituent's price. Constituent prices go
//! back through the full resolver, which is where the recursion depth limit
//! earns its keep.

use async_trait::async_trait;

use pricer_types::{
	pow10, u256_to_decimal, Address, BlockNumber, CallArg, PriceError, PriceQuote, SourceKind,
	U256, USD_DECIMALS,
};

use crate::{helpers, PriceResolver, PriceSource};

/// Registries report coins in fixed arrays of this many slots.
const COIN_SLOTS: usize = 8;

/// Virtual prices and oracle prices are 1e18-scaled.
const POOL_VALUE_DECIMALS: u32 = 18;

pub struct CurveRouter;

#[async_trait]
impl PriceSource for CurveRouter {
	fn kind(&self) -> SourceKind {
		SourceKind::CurveRouter
	}

	async fn quote(
		&self,
		resolver: &PriceResolver,
		token: Address,
		block: Option<BlockNumber>,
		depth: u32,
	) -> Result<PriceQuote, PriceError> {
		match self.pool_from_lp_token(resolver, token, block).await {
			Some(pool) => {
				if self.is_crypto_pool(resolver, pool, block).await {
					self.crypto_lp_price(resolver, token, pool, block, depth)
						.await
				} else {
					self.stable_lp_price(resolver, token, pool, block, depth)
						.await
				}
			}
			// Not a registered share token; maybe it is a pool itself.
			None => self.direct_pool_price(resolver, token, block, depth).await,
		}
	}
}

impl CurveRouter {
	async fn pool_from_lp_token(
		&self,
		resolver: &PriceResolver,
		lp_token: Address,
		block: Option<BlockNumber>,
	) -> Option<Address> {
		let network = resolver.network().ok()?;
		for registry in &network.contracts.curve_registries {
			if !registry.active_at(block) {
				continue;
			}
			let pool = resolver
				.client()
				.call(
					registry.address,
					"get_pool_from_lp_token",
					&[CallArg::Address(lp_token)],
					block,
				)
				.await
				.ok()
				.and_then(|value| value.as_address())
				.filter(|address| !address.is_zero());
			if pool.is_some() {
				return pool;
			}
		}
		None
	}

	/// Crypto pools answer `price_oracle`; stable pools revert on it.
	async fn is_crypto_pool(
		&self,
		resolver: &PriceResolver,
		pool: Address,
		block: Option<BlockNumber>,
	) -> bool {
		if resolver
			.client()
			.call(pool, "price_oracle", &[], block)
			.await
			.is_ok()
		{
			return true;
		}
		// Multi-asset crypto pools take a coin index.
		resolver
			.client()
			.call(pool, "price_oracle", &[CallArg::Uint(U256::zero())], block)
			.await
			.is_ok()
	}

	async fn stable_lp_price(
		&self,
		resolver: &PriceResolver,
		lp_token: Address,
		pool: Address,
		block: Option<BlockNumber>,
		depth: u32,
	) -> Result<PriceQuote, PriceError> {
		let network = resolver.network()?;

		let mut virtual_price = U256::zero();
		let mut coins: Vec<Address> = Vec::new();
		for registry in &network.contracts.curve_registries {
			if !registry.active_at(block) {
				continue;
			}
			if virtual_price.is_zero() {
				if let Ok(value) = resolver
					.client()
					.call(
						registry.address,
						"get_virtual_price_from_lp_token",
						&[CallArg::Address(lp_token)],
						block,
					)
					.await
				{
					virtual_price = value.as_uint().unwrap_or_default();
				}
			}
			if coins.is_empty() {
				if let Ok(value) = resolver
					.client()
					.call(
						registry.address,
						"get_underlying_coins",
						&[CallArg::Address(pool)],
						block,
					)
					.await
				{
					coins = value
						.as_addresses()
						.map(|addresses| addresses.to_vec())
						.unwrap_or_default();
				}
			}
		}
		if virtual_price.is_zero() {
			return Err(PriceError::SourceReverted(self.kind()));
		}

		let preferred = preferred_coin(&coins);
		if preferred.is_zero() {
			return Err(PriceError::SourceReverted(self.kind()));
		}

		let base = resolver.resolve_at_depth(preferred, block, depth + 1).await?;
		let value = u256_to_decimal(virtual_price, POOL_VALUE_DECIMALS)
			.checked_mul(base.value())
			.and_then(|value| value.checked_mul(pow10(USD_DECIMALS)))
			.ok_or(PriceError::SourceReverted(self.kind()))?;
		Ok(PriceQuote::new(value, USD_DECIMALS, self.kind()))
	}

	async fn crypto_lp_price(
		&self,
		resolver: &PriceResolver,
		lp_token: Address,
		pool: Address,
		block: Option<BlockNumber>,
		depth: u32,
	) -> Result<PriceQuote, PriceError> {
		let client = resolver.client();
		let supply = helpers::token_supply(client, lp_token, block).await;
		if supply.is_zero() {
			return Err(PriceError::SourceReverted(self.kind()));
		}
		let share_decimals = helpers::token_decimals(client, lp_token, block).await;

		let coins = self.pool_coins(resolver, pool, block).await;
		if coins.is_empty() {
			return Err(PriceError::SourceReverted(self.kind()));
		}

		let mut total_usd = rust_decimal::Decimal::ZERO;
		for (index, coin) in coins.iter().enumerate() {
			let balance = match client
				.call(
					pool,
					"balances",
					&[CallArg::Uint(U256::from(index as u64))],
					block,
				)
				.await
			{
				Ok(value) => value.as_uint().unwrap_or_default(),
				Err(_) => U256::zero(),
			};
			if balance.is_zero() {
				continue;
			}
			let decimals = helpers::token_decimals(client, *coin, block).await;
			let price = resolver.resolve_at_depth(*coin, block, depth + 1).await?;
			total_usd = u256_to_decimal(balance, decimals)
				.checked_mul(price.value())
				.and_then(|coin_usd| total_usd.checked_add(coin_usd))
				.ok_or(PriceError::SourceReverted(self.kind()))?;
		}

		let per_share = total_usd
			.checked_mul(pow10(share_decimals))
			.map(|scaled| scaled / u256_to_decimal(supply, 0))
			.and_then(|per_share| per_share.checked_mul(pow10(USD_DECIMALS)))
			.ok_or(PriceError::SourceReverted(self.kind()))?;
		Ok(PriceQuote::new(per_share, USD_DECIMALS, self.kind()))
	}

	/// A pool queried directly rather than through its share token:
	/// `get_virtual_price` times the preferred coin's price.
	async fn direct_pool_price(
		&self,
		resolver: &PriceResolver,
		pool: Address,
		block: Option<BlockNumber>,
		depth: u32,
	) -> Result<PriceQuote, PriceError> {
		let virtual_price = resolver
			.client()
			.call(pool, "get_virtual_price", &[], block)
			.await
			.map_err(|_| PriceError::SourceReverted(self.kind()))?
			.as_uint()
			.unwrap_or_default();
		if virtual_price.is_zero() {
			return Err(PriceError::SourceReverted(self.kind()));
		}

		let coins = self.pool_coins(resolver, pool, block).await;
		let preferred = preferred_coin(&coins);
		if preferred.is_zero() {
			return Err(PriceError::SourceReverted(self.kind()));
		}

		let base = resolver.resolve_at_depth(preferred, block, depth + 1).await?;
		let value = u256_to_decimal(virtual_price, POOL_VALUE_DECIMALS)
			.checked_mul(base.value())
			.and_then(|value| value.checked_mul(pow10(USD_DECIMALS)))
			.ok_or(PriceError::SourceReverted(self.kind()))?;
		Ok(PriceQuote::new(value, USD_DECIMALS, self.kind()))
	}

	async fn pool_coins(
		&self,
		resolver: &PriceResolver,
		pool: Address,
		block: Option<BlockNumber>,
	) -> Vec<Address> {
		let mut coins = Vec::new();
		for index in 0..COIN_SLOTS {
			let coin = resolver
				.client()
				.call(
					pool,
					"coins",
					&[CallArg::Uint(U256::from(index as u64))],
					block,
				)
				.await
				.ok()
				.and_then(|value| value.as_address())
				.filter(|address| !address.is_zero());
			match coin {
				Some(coin) => coins.push(coin),
				None => break,
			}
		}
		coins
	}
}

/// The last populated slot of the coin array, with an early exit once a
/// populated slot is followed by an empty one.
fn preferred_coin(coins: &[Address]) -> Address {
	let mut preferred = Address::zero();
	for (index, coin) in coins.iter().take(COIN_SLOTS).enumerate() {
		if !coin.is_zero() {
			preferred = *coin;
		}
		if (!preferred.is_zero() && coin.is_zero()) || index == COIN_SLOTS - 1 {
			break;
		}
	}
	preferred
}
