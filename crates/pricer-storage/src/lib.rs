//! Persistence of per-token validation state.
//!
//! The change validator reads and writes one [`TokenPriceState`] record per
//! token through [`PriceStateStore`]. The in-memory backend is sufficient
//! for tests and single-process use; an embedding pipeline can provide its
//! own backend against the same trait.

pub mod implementations;

use async_trait::async_trait;
use thiserror::Error;

use pricer_types::{Address, TokenPriceState};

pub use implementations::memory::MemoryStateStore;

/// Storage errors
#[derive(Debug, Error)]
pub enum StateError {
	#[error("Storage backend error: {0}")]
	Backend(String),
	#[error("Serialization error: {0}")]
	Serialization(String),
}

/// Backend-agnostic access to per-token validation state.
#[async_trait]
pub trait PriceStateStore: Send + Sync {
	/// Loads the state for a token, `None` if it was never validated.
	async fn load(&self, token: Address) -> Result<Option<TokenPriceState>, StateError>;

	/// Persists the state for a token, replacing any previous record.
	async fn save(&self, token: Address, state: TokenPriceState) -> Result<(), StateError>;
}
