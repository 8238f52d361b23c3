//! Scripted call client for tests.

use async_trait::async_trait;
use std::collections::HashMap;

use pricer_types::{Address, BlockNumber, CallArg, CallClient, CallError, CallValue};

/// Answers only the calls it was scripted with; everything else reverts,
/// which is exactly how an unknowing contract behaves.
#[derive(Default)]
pub struct MockCallClient {
	exact: HashMap<(Address, String, String), CallValue>,
	any_args: HashMap<(Address, String), CallValue>,
}

fn args_key(args: &[CallArg]) -> String {
	format!("{:?}", args)
}

impl MockCallClient {
	pub fn new() -> Self {
		Self::default()
	}

	/// Scripts an answer for one exact (contract, method, args) triple.
	pub fn on(&mut self, to: Address, method: &str, args: &[CallArg], value: CallValue) {
		self.exact
			.insert((to, method.to_string(), args_key(args)), value);
	}

	/// Scripts an answer for a (contract, method) pair regardless of args.
	pub fn on_any(&mut self, to: Address, method: &str, value: CallValue) {
		self.any_args.insert((to, method.to_string()), value);
	}
}

#[async_trait]
impl CallClient for MockCallClient {
	async fn call(
		&self,
		to: Address,
		method: &str,
		args: &[CallArg],
		_block: Option<BlockNumber>,
	) -> Result<CallValue, CallError> {
		if let Some(value) = self
			.exact
			.get(&(to, method.to_string(), args_key(args)))
		{
			return Ok(value.clone());
		}
		if let Some(value) = self.any_args.get(&(to, method.to_string())) {
			return Ok(value.clone());
		}
		Err(CallError::Reverted)
	}
}
