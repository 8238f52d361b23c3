//! USD price resolution for on-chain tokens.
//!
//! A [`PriceResolver`] walks an ordered chain of oracle sources for each
//! token, collects up to the configured number of answers, and reduces them
//! to a single consensus quote. Sources range from simple feed reads
//! (Yearn Lens, Chainlink) to recursive pool decomposition (the Curve
//! router) and AMM spot quoting (Uniswap forks). All chain I/O goes through
//! the [`CallClient`](pricer_types::CallClient) trait, so the whole pipeline
//! is deterministic for a given client.

pub mod aggregator;
pub mod helpers;
pub mod router;
pub mod sources;
pub mod valuation;

#[cfg(test)]
pub(crate) mod testutil;

use async_trait::async_trait;

use pricer_types::{Address, BlockNumber, PriceError, PriceQuote, SourceKind};

pub use aggregator::{PriceResolver, MAX_RECURSION_DEPTH};

/// One oracle in the configured chain.
///
/// Implementations read through the resolver's call client and may recurse
/// back into the resolver (with an incremented `depth`) to price pool
/// constituents or underlying assets.
#[async_trait]
pub trait PriceSource: Send + Sync {
	fn kind(&self) -> SourceKind;

	async fn quote(
		&self,
		resolver: &PriceResolver,
		token: Address,
		block: Option<BlockNumber>,
		depth: u32,
	) -> Result<PriceQuote, PriceError>;
}
