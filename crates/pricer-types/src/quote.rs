//! Price quotes and the sources that produce them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::common::pow10;

/// Canonical USD quote scale (USDC decimals).
pub const USD_DECIMALS: u32 = 6;

/// Identifies which source family produced a quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceKind {
	YearnLens,
	ChainlinkFeed,
	AaveOracle,
	OneInchOracle,
	CurveCalculations,
	SushiCalculations,
	CurveRouter,
	UniswapForksRouter,
	/// Token on the known-stable list, quoted at exactly one dollar.
	Hardcoded,
	/// Reduced from several source quotes.
	Aggregated,
	/// No source answered.
	None,
}

impl SourceKind {
	/// Router sources report tradable liquidity alongside the price and are
	/// subject to liquidity bounding during valuation.
	pub fn is_router(&self) -> bool {
		matches!(self, SourceKind::CurveRouter | SourceKind::UniswapForksRouter)
	}
}

/// A single USD price observation.
///
/// `usd_price` is an unsigned magnitude carrying `decimals` fractional
/// digits; the interpreted dollar price is `usd_price / 10^decimals`. A
/// non-positive magnitude always means the source failed, so a failed quote
/// and a zero price are the same state by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
	usd_price: Decimal,
	decimals: u32,
	source: SourceKind,
	liquidity_usd: Decimal,
}

impl PriceQuote {
	/// A quote from a source that produced no usable answer.
	pub fn failed() -> Self {
		Self {
			usd_price: Decimal::ZERO,
			decimals: 0,
			source: SourceKind::None,
			liquidity_usd: Decimal::ZERO,
		}
	}

	/// Builds a quote from a raw magnitude. Non-positive magnitudes collapse
	/// to the failed quote.
	pub fn new(usd_price: Decimal, decimals: u32, source: SourceKind) -> Self {
		if usd_price <= Decimal::ZERO {
			return Self::failed();
		}
		Self {
			usd_price,
			decimals,
			source,
			liquidity_usd: Decimal::ZERO,
		}
	}

	pub fn usd_price(&self) -> Decimal {
		self.usd_price
	}

	pub fn decimals(&self) -> u32 {
		self.decimals
	}

	pub fn source(&self) -> SourceKind {
		self.source
	}

	pub fn liquidity_usd(&self) -> Decimal {
		self.liquidity_usd
	}

	pub fn failed_quote(&self) -> bool {
		self.usd_price <= Decimal::ZERO
	}

	/// Interpreted dollar price, `usd_price / 10^decimals`.
	pub fn value(&self) -> Decimal {
		if self.failed_quote() {
			return Decimal::ZERO;
		}
		self.usd_price / pow10(self.decimals)
	}

	/// Attaches the USD liquidity backing this quote, as a magnitude at the
	/// canonical scale.
	pub fn set_liquidity(&mut self, liquidity_usd: Decimal) {
		self.liquidity_usd = liquidity_usd.max(Decimal::ZERO);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rust_decimal_macros::dec;

	#[test]
	fn test_failed_quote_is_zero_price() {
		let quote = PriceQuote::failed();
		assert!(quote.failed_quote());
		assert_eq!(quote.value(), Decimal::ZERO);
		assert_eq!(quote.source(), SourceKind::None);
	}

	#[test]
	fn test_zero_magnitude_collapses_to_failed() {
		let quote = PriceQuote::new(Decimal::ZERO, 6, SourceKind::YearnLens);
		assert!(quote.failed_quote());
		let quote = PriceQuote::new(dec!(-1), 6, SourceKind::YearnLens);
		assert!(quote.failed_quote());
	}

	#[test]
	fn test_value_interprets_decimals() {
		let quote = PriceQuote::new(dec!(1020000), 6, SourceKind::CurveCalculations);
		assert_eq!(quote.value(), dec!(1.02));
		assert!(!quote.failed_quote());
	}

	#[test]
	fn test_router_kinds() {
		assert!(SourceKind::CurveRouter.is_router());
		assert!(SourceKind::UniswapForksRouter.is_router());
		assert!(!SourceKind::ChainlinkFeed.is_router());
		assert!(!SourceKind::Hardcoded.is_router());
	}

	#[test]
	fn test_set_liquidity_clamps_negative() {
		let mut quote = PriceQuote::new(dec!(1000000), 6, SourceKind::UniswapForksRouter);
		quote.set_liquidity(dec!(-5));
		assert_eq!(quote.liquidity_usd(), Decimal::ZERO);
		quote.set_liquidity(dec!(5000000));
		assert_eq!(quote.liquidity_usd(), dec!(5000000));
	}
}
