//! Valuation: turning a price quote and a token amount into a USD figure,
//! bounded by reported liquidity for router-sourced quotes.

use rust_decimal::Decimal;
use tracing::warn;

use pricer_types::{pow10, Address, BlockNumber, PriceQuote, USD_DECIMALS};

use crate::helpers::{DEFAULT_DECIMALS, MAX_TOKEN_DECIMALS};
use crate::PriceResolver;

/// Decimal scales outside this range are treated as corrupt and replaced
/// with the default.
const MIN_VALID_DECIMALS: u32 = 1;

fn validated_decimals(decimals: u32) -> u32 {
	if (MIN_VALID_DECIMALS..=MAX_TOKEN_DECIMALS).contains(&decimals) {
		decimals
	} else {
		DEFAULT_DECIMALS
	}
}

impl PriceResolver {
	/// USD value of `amount` interpreted units of `token`.
	///
	/// Router-sourced quotes that report pair liquidity are bounded by it:
	/// a thin pool cannot honestly back a valuation larger than the money
	/// actually in it.
	pub async fn resolve_value_usd(
		&self,
		token: Address,
		amount: Decimal,
		block: Option<BlockNumber>,
	) -> Decimal {
		let quote = self.resolve_price_usd(token, block).await;
		if quote.failed_quote() || amount <= Decimal::ZERO {
			return Decimal::ZERO;
		}

		let naive = quote.value().saturating_mul(amount);
		if !quote.source().is_router() || quote.liquidity_usd() <= Decimal::ZERO {
			return naive;
		}
		let liquidity = quote.liquidity_usd() / pow10(USD_DECIMALS);
		if naive <= liquidity {
			return naive;
		}

		warn!(
			token = ?token,
			naive = %naive,
			liquidity = %liquidity,
			"valuation exceeds reported pair liquidity, bounding"
		);
		liquidity_bound_value(&quote, liquidity, amount)
	}
}

/// Re-prices the position against the pool's actual liquidity: the bounded
/// per-token price is the liquidity spread over the amount, and the value
/// follows from it. When the rescale itself overflows the liquidity figure
/// is already the tightest honest answer.
fn liquidity_bound_value(quote: &PriceQuote, liquidity: Decimal, amount: Decimal) -> Decimal {
	let scale = pow10(validated_decimals(quote.decimals()));
	liquidity
		.checked_mul(scale)
		.and_then(|scaled| scaled.checked_div(amount))
		.and_then(|bounded_price| bounded_price.checked_mul(amount))
		.and_then(|value| value.checked_div(scale))
		.unwrap_or(liquidity)
}
