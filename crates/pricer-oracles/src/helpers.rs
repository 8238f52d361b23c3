//! ERC-20 read helpers with the conventional revert defaults.

use pricer_types::{Address, BlockNumber, CallClient, U256};

/// Default decimal scale assumed when a token does not answer `decimals()`.
pub const DEFAULT_DECIMALS: u32 = 18;

/// Largest decimal scale accepted from a token contract. No real token
/// exceeds this; a bigger answer is corrupt and would blow up the power-of-ten
/// arithmetic downstream.
pub const MAX_TOKEN_DECIMALS: u32 = 30;

/// Token decimals, defaulting to 18 when the call reverts or answers with
/// something out of range for a scale.
pub async fn token_decimals(
	client: &dyn CallClient,
	token: Address,
	block: Option<BlockNumber>,
) -> u32 {
	match client.call(token, "decimals", &[], block).await {
		Ok(value) => value
			.as_uint()
			.filter(|d| *d <= U256::from(MAX_TOKEN_DECIMALS))
			.map(|d| d.as_u32())
			.unwrap_or(DEFAULT_DECIMALS),
		Err(_) => DEFAULT_DECIMALS,
	}
}

/// Total supply, defaulting to one raw unit when the call reverts so that
/// downstream divisions stay defined.
pub async fn token_supply(
	client: &dyn CallClient,
	token: Address,
	block: Option<BlockNumber>,
) -> U256 {
	match client.call(token, "totalSupply", &[], block).await {
		Ok(value) => value.as_uint().unwrap_or_else(U256::one),
		Err(_) => U256::one(),
	}
}
