//! 1inch offchain oracle: spot rates against a preference-ordered list of
//! reference stables.

use async_trait::async_trait;

use pricer_types::{
	pow10, u256_to_decimal, Address, BlockNumber, CallArg, PriceError, PriceQuote, SourceKind,
};

use crate::{helpers, PriceResolver, PriceSource};

/// The oracle's rates carry a fixed 1e18 numerator on top of the token
/// decimal adjustment.
const RATE_SCALE: u32 = 18;

pub struct OneInchOracle;

#[async_trait]
impl PriceSource for OneInchOracle {
	fn kind(&self) -> SourceKind {
		SourceKind::OneInchOracle
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
		let oracle = network
			.contracts
			.oneinch_oracle
			.as_ref()
			.filter(|contract| contract.active_at(block))
			.ok_or(PriceError::SourceUnavailable(self.kind()))?;

		let src_decimals = helpers::token_decimals(resolver.client(), token, block).await;

		for stable in &network.stable_path {
			let rate = match resolver
				.client()
				.call(
					oracle.address,
					"getRate",
					&[
						CallArg::Address(token),
						CallArg::Address(stable.address),
						CallArg::Bool(true),
					],
					block,
				)
				.await
			{
				Ok(value) => value.as_uint().unwrap_or_default(),
				Err(_) => continue,
			};
			if rate.is_zero() {
				continue;
			}

			// rate × 10^src / 1e18 is the answer as a magnitude at the
			// stable's own decimal scale. A rate too wide for the rescale
			// counts as no answer.
			let price = match u256_to_decimal(rate, 0).checked_mul(pow10(src_decimals)) {
				Some(scaled) => scaled / pow10(RATE_SCALE),
				None => continue,
			};
			return Ok(PriceQuote::new(price, stable.decimals, self.kind()));
		}

		Err(PriceError::SourceReverted(self.kind()))
	}
}
