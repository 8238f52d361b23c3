//! Yearn Lens oracle: direct 6-decimal USDC quotes.

use async_trait::async_trait;

use pricer_types::{
	u256_to_decimal, Address, BlockNumber, CallArg, PriceError, PriceQuote, SourceKind,
	USD_DECIMALS,
};

use crate::{PriceResolver, PriceSource};

pub struct YearnLens;

#[async_trait]
impl PriceSource for YearnLens {
	fn kind(&self) -> SourceKind {
		SourceKind::YearnLens
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
		let lens = network
			.contracts
			.yearn_lens
			.as_ref()
			.filter(|contract| contract.active_at(block))
			.ok_or(PriceError::SourceUnavailable(self.kind()))?;

		let answer = resolver
			.client()
			.call(
				lens.address,
				"getPriceUsdcRecommended",
				&[CallArg::Address(token)],
				block,
			)
			.await
			.map_err(|_| PriceError::SourceReverted(self.kind()))?;

		let price = answer.as_uint().unwrap_or_default();
		Ok(PriceQuote::new(
			u256_to_decimal(price, 0),
			USD_DECIMALS,
			self.kind(),
		))
	}
}
