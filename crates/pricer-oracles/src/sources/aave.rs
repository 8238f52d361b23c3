//! Aave protocol oracle: 8-decimal asset prices, with fallback to the
//! underlying asset for wrapped deposit tokens.

use async_trait::async_trait;

use pricer_types::{
	u256_to_decimal, Address, BlockNumber, CallArg, PriceError, PriceQuote, SourceKind,
};

use crate::{PriceResolver, PriceSource};

/// Scale the Aave oracle quotes at.
const AAVE_ORACLE_DECIMALS: u32 = 8;

pub struct AaveOracle;

#[async_trait]
impl PriceSource for AaveOracle {
	fn kind(&self) -> SourceKind {
		SourceKind::AaveOracle
	}

	async fn quote(
		&self,
		resolver: &PriceResolver,
		token: Address,
		block: Option<BlockNumber>,
		depth: u32,
	) -> Result<PriceQuote, PriceError> {
		let network = resolver.network()?;
		if network.denylists.contains(self.kind(), &token) {
			return Err(PriceError::SourceDenylisted(self.kind()));
		}
		let oracle = network
			.contracts
			.aave_oracle
			.as_ref()
			.filter(|contract| contract.active_at(block))
			.ok_or(PriceError::SourceUnavailable(self.kind()))?;

		let answer = resolver
			.client()
			.call(
				oracle.address,
				"getAssetPrice",
				&[CallArg::Address(token)],
				block,
			)
			.await
			.map_err(|_| PriceError::SourceReverted(self.kind()))?
			.as_uint()
			.unwrap_or_default();

		if !answer.is_zero() {
			return Ok(PriceQuote::new(
				u256_to_decimal(answer, 0),
				AAVE_ORACLE_DECIMALS,
				self.kind(),
			));
		}

		// A zero answer usually means a deposit receipt token (aToken);
		// price whatever it wraps through the full pipeline instead.
		let underlying = resolver
			.client()
			.call(token, "UNDERLYING_ASSET_ADDRESS", &[], block)
			.await
			.ok()
			.and_then(|value| value.as_address())
			.filter(|address| !address.is_zero() && *address != token)
			.ok_or(PriceError::SourceReverted(self.kind()))?;

		resolver.resolve_at_depth(underlying, block, depth + 1).await
	}
}
