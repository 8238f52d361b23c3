//! Common types used throughout the pricing system.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Re-export commonly used ethereum types
pub use ethers_core::types::{Address, U256};

/// Block number
pub type BlockNumber = u64;

/// Chain identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChainId(pub u64);

impl ChainId {
	pub const ETHEREUM: Self = Self(1);
	pub const ARBITRUM: Self = Self(42161);
	pub const OPTIMISM: Self = Self(10);
	pub const POLYGON: Self = Self(137);
	pub const BASE: Self = Self(8453);
}

impl fmt::Display for ChainId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl FromStr for ChainId {
	type Err = std::num::ParseIntError;

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		Ok(ChainId(s.parse()?))
	}
}

/// Largest power of ten whose mantissa still fits in a `Decimal` (96 bits).
const MAX_DECIMAL_POW10: u32 = 28;

/// `10^exp` as a `Decimal`, saturating to `Decimal::MAX` for exponents a
/// 96-bit mantissa cannot hold.
pub fn pow10(exp: u32) -> Decimal {
	if exp <= MAX_DECIMAL_POW10 {
		Decimal::from_i128_with_scale(10i128.pow(exp), 0)
	} else {
		Decimal::MAX
	}
}

/// Converts a raw on-chain magnitude into a `Decimal`, interpreting `scale`
/// as the number of fractional digits.
///
/// Values too wide for a `Decimal` mantissa are divided down in `U256` space
/// first, dropping fractional digits rather than failing; a value that still
/// does not fit saturates to `Decimal::MAX`. This never panics regardless of
/// what a contract returns.
pub fn u256_to_decimal(value: U256, scale: u32) -> Decimal {
	if value.is_zero() {
		return Decimal::ZERO;
	}
	if value.bits() <= 96 && scale <= MAX_DECIMAL_POW10 {
		if let Ok(dec) = Decimal::try_from_i128_with_scale(value.as_u128() as i128, scale) {
			return dec;
		}
	}

	// Shed the fractional part in integer space, then re-attach what fits.
	let divisor = U256::from(10u64).pow(U256::from(scale));
	let whole = value / divisor;
	if whole.bits() > 96 {
		return Decimal::MAX;
	}
	let whole = Decimal::from_i128_with_scale(whole.as_u128() as i128, 0);
	let remainder = value % divisor;
	if remainder.bits() <= 96 && scale <= MAX_DECIMAL_POW10 {
		if let Ok(frac) = Decimal::try_from_i128_with_scale(remainder.as_u128() as i128, scale) {
			return whole + frac;
		}
	}
	whole
}
