//! The abstract contract-call capability.
//!
//! Every oracle source performs its reads through [`CallClient`], so the
//! whole pipeline is deterministic for a given client and can be exercised
//! against a scripted implementation. Reverts are ordinary values here, not
//! exceptional conditions: most sources treat a revert as "this source does
//! not know this token" and fall through.

use async_trait::async_trait;
use thiserror::Error;

use crate::common::{Address, BlockNumber, U256};

/// Why a read call produced no value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallError {
	#[error("call reverted")]
	Reverted,
	#[error("transport error: {0}")]
	Transport(String),
}

/// Argument passed to a read call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallArg {
	Address(Address),
	Uint(U256),
	Bool(bool),
	Addresses(Vec<Address>),
}

/// Decoded return value of a read call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallValue {
	Address(Address),
	Uint(U256),
	Addresses(Vec<Address>),
	Uints(Vec<U256>),
}

impl CallValue {
	pub fn as_address(&self) -> Option<Address> {
		match self {
			CallValue::Address(address) => Some(*address),
			_ => None,
		}
	}

	pub fn as_uint(&self) -> Option<U256> {
		match self {
			CallValue::Uint(value) => Some(*value),
			_ => None,
		}
	}

	pub fn as_addresses(&self) -> Option<&[Address]> {
		match self {
			CallValue::Addresses(addresses) => Some(addresses),
			_ => None,
		}
	}

	pub fn as_uints(&self) -> Option<&[U256]> {
		match self {
			CallValue::Uints(values) => Some(values),
			_ => None,
		}
	}
}

/// Read-only access to contract state, optionally at a historical block.
#[async_trait]
pub trait CallClient: Send + Sync {
	/// Executes a read-only contract call.
	async fn call(
		&self,
		to: Address,
		method: &str,
		args: &[CallArg],
		block: Option<BlockNumber>,
	) -> Result<CallValue, CallError>;
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_call_value_accessors() {
		let value = CallValue::Uint(U256::from(42));
		assert_eq!(value.as_uint(), Some(U256::from(42)));
		assert_eq!(value.as_address(), None);

		let value = CallValue::Addresses(vec![Address::zero()]);
		assert_eq!(value.as_addresses().map(|a| a.len()), Some(1));
		assert_eq!(value.as_uints(), None);
	}
}
