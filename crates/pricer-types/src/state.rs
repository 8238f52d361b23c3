//! Per-token state carried between price validations.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::common::BlockNumber;

/// Hysteresis state for one token.
///
/// The buffers count consecutive rejections; either one reaching the
/// configured limit forces the next candidate through, so a real repricing
/// is only delayed, never suppressed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenPriceState {
	/// Last accepted USD price, if any candidate has ever been accepted.
	pub last_price_usd: Option<Decimal>,
	/// Block at which the last price was accepted.
	pub last_price_block: BlockNumber,
	/// Consecutive rejections by the large-price-change gate.
	pub price_change_buffer: u32,
	/// Consecutive rejections by the TVL-impact gate.
	pub tvl_impact_buffer: u32,
}

impl Default for TokenPriceState {
	fn default() -> Self {
		Self {
			last_price_usd: None,
			last_price_block: 0,
			price_change_buffer: 0,
			tvl_impact_buffer: 0,
		}
	}
}

impl TokenPriceState {
	/// Records an accepted price and clears both rejection buffers.
	pub fn accept(&mut self, price_usd: Decimal, block: BlockNumber) {
		self.last_price_usd = Some(price_usd);
		self.last_price_block = block;
		self.price_change_buffer = 0;
		self.tvl_impact_buffer = 0;
	}
}
