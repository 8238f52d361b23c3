//! SushiSwap calculations helper contract: 6-decimal USDC quotes derived
//! from Sushi pair reserves.

use async_trait::async_trait;

use pricer_types::{
	u256_to_decimal, Address, BlockNumber, CallArg, PriceError, PriceQuote, SourceKind,
	USD_DECIMALS,
};

use crate::{PriceResolver, PriceSource};

pub struct SushiCalculations;

#[async_trait]
impl PriceSource for SushiCalculations {
	fn kind(&self) -> SourceKind {
		SourceKind::SushiCalculations
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
		let calculations = network
			.contracts
			.sushi_calculations
			.as_ref()
			.filter(|contract| contract.active_at(block))
			.ok_or(PriceError::SourceUnavailable(self.kind()))?;

		let answer = resolver
			.client()
			.call(
				calculations.address,
				"getPriceUsdc",
				&[CallArg::Address(token)],
				block,
			)
			.await
			.map_err(|_| PriceError::SourceReverted(self.kind()))?;

		Ok(PriceQuote::new(
			u256_to_decimal(answer.as_uint().unwrap_or_default(), 0),
			USD_DECIMALS,
			self.kind(),
		))
	}
}
