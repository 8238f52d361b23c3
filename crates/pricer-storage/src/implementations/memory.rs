//! In-memory state store.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use pricer_types::{Address, TokenPriceState};

use crate::{PriceStateStore, StateError};

/// Keeps every record in a process-local map.
#[derive(Default)]
pub struct MemoryStateStore {
	records: RwLock<HashMap<Address, TokenPriceState>>,
}

impl MemoryStateStore {
	pub fn new() -> Self {
		Self::default()
	}
}

#[async_trait]
impl PriceStateStore for MemoryStateStore {
	async fn load(&self, token: Address) -> Result<Option<TokenPriceState>, StateError> {
		Ok(self.records.read().await.get(&token).cloned())
	}

	async fn save(&self, token: Address, state: TokenPriceState) -> Result<(), StateError> {
		self.records.write().await.insert(token, state);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rust_decimal_macros::dec;

	#[tokio::test]
	async fn test_load_missing_is_none() {
		let store = MemoryStateStore::new();
		let loaded = store.load(Address::from_low_u64_be(1)).await.unwrap();
		assert!(loaded.is_none());
	}

	#[tokio::test]
	async fn test_save_then_load() {
		let store = MemoryStateStore::new();
		let token = Address::from_low_u64_be(1);

		let mut state = TokenPriceState::default();
		state.accept(dec!(1.25), 42);
		store.save(token, state.clone()).await.unwrap();

		let loaded = store.load(token).await.unwrap().unwrap();
		assert_eq!(loaded, state);

		// Saving again replaces the record.
		state.accept(dec!(1.30), 43);
		store.save(token, state.clone()).await.unwrap();
		let loaded = store.load(token).await.unwrap().unwrap();
		assert_eq!(loaded.last_price_usd, Some(dec!(1.30)));
	}
}
