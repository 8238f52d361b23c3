//! The resolver: ordered source walk plus consensus reduction.

use rust_decimal::Decimal;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, warn};

use pricer_config::{NetworkConfig, PricerConfig};
use pricer_types::{
	pow10, Address, BlockNumber, CallClient, ChainId, PriceError, PriceQuote, SourceKind,
	USD_DECIMALS,
};

use crate::sources;
use crate::PriceSource;

/// Ceiling on pool-composition recursion. Pricing an LP share may require
/// pricing its constituents, which may themselves be pool shares; beyond
/// this depth the token is treated as unpriceable.
pub const MAX_RECURSION_DEPTH: u32 = 4;

/// Resolves tokens to USD quotes by walking the configured oracle chain.
pub struct PriceResolver {
	chain: ChainId,
	config: PricerConfig,
	client: Arc<dyn CallClient>,
	sources: Vec<Box<dyn PriceSource>>,
}

impl PriceResolver {
	pub fn new(chain: ChainId, config: PricerConfig, client: Arc<dyn CallClient>) -> Self {
		Self {
			chain,
			config,
			client,
			sources: sources::default_sources(),
		}
	}

	pub fn chain(&self) -> ChainId {
		self.chain
	}

	pub(crate) fn client(&self) -> &dyn CallClient {
		self.client.as_ref()
	}

	pub(crate) fn network(&self) -> Result<&NetworkConfig, PriceError> {
		self.config
			.network(self.chain)
			.ok_or(PriceError::ConfigurationMissing(self.chain.0))
	}

	/// Resolves a token to a USD quote.
	///
	/// This never fails the caller: any pipeline error is logged and
	/// absorbed into a failed quote, matching how an indexing pipeline
	/// wants to consume prices.
	pub async fn resolve_price_usd(
		&self,
		token: Address,
		block: Option<BlockNumber>,
	) -> PriceQuote {
		match self.resolve_at_depth(token, block, 0).await {
			Ok(quote) => quote,
			Err(error) => {
				warn!(token = ?token, %error, "price resolution failed");
				PriceQuote::failed()
			}
		}
	}

	/// The recursive entry point sources use to price constituents.
	pub(crate) async fn resolve_at_depth(
		&self,
		token: Address,
		block: Option<BlockNumber>,
		depth: u32,
	) -> Result<PriceQuote, PriceError> {
		if depth > MAX_RECURSION_DEPTH {
			return Err(PriceError::RecursionDepthExceeded);
		}
		if token == Address::zero() {
			return Err(PriceError::ConsensusUnreachable);
		}
		let network = self.network()?;

		if network.is_hardcoded_stable(&token) {
			return Ok(PriceQuote::new(
				pow10(USD_DECIMALS),
				USD_DECIMALS,
				SourceKind::Hardcoded,
			));
		}

		let oracle = network.oracle_config(&token);
		let mut collected: Vec<PriceQuote> = Vec::new();
		for kind in &oracle.order {
			if collected.len() >= oracle.count {
				break;
			}
			let Some(source) = self.sources.iter().find(|s| s.kind() == *kind) else {
				continue;
			};
			match source.quote(self, token, block, depth).await {
				Ok(quote) if !quote.failed_quote() => {
					debug!(source = ?kind, token = ?token, price = %quote.value(), "source answered");
					collected.push(quote);
				}
				Ok(_) => {}
				Err(error @ PriceError::RecursionDepthExceeded) => return Err(error),
				Err(error) => {
					debug!(source = ?kind, token = ?token, %error, "source skipped");
				}
			}
		}

		reduce(collected)
	}
}

/// Collapses collected quotes into one consensus quote.
///
/// A single quote passes through untouched (keeping its source and any
/// attached liquidity). Two quotes average. Three or more go through
/// k-closest outlier rejection first.
fn reduce(mut quotes: Vec<PriceQuote>) -> Result<PriceQuote, PriceError> {
	match quotes.len() {
		0 => Err(PriceError::ConsensusUnreachable),
		1 => Ok(quotes.swap_remove(0)),
		2 => Ok(mean_quote(&quotes)),
		_ => {
			let k = quotes.len().div_ceil(2);
			let closest = k_closest(&quotes, k);
			if closest.is_empty() {
				return Ok(quotes.swap_remove(0));
			}
			Ok(mean_quote(&closest))
		}
	}
}

/// Mean of the interpreted values, re-quoted at the canonical scale. A sum
/// too wide to represent collapses to the failed quote.
fn mean_quote(quotes: &[PriceQuote]) -> PriceQuote {
	let mut sum = Decimal::ZERO;
	for quote in quotes {
		sum = match sum.checked_add(quote.value()) {
			Some(sum) => sum,
			None => return PriceQuote::failed(),
		};
	}
	let count = Decimal::from(quotes.len() as u64);
	match (sum / count).checked_mul(pow10(USD_DECIMALS)) {
		Some(magnitude) => PriceQuote::new(magnitude, USD_DECIMALS, SourceKind::Aggregated),
		None => PriceQuote::failed(),
	}
}

/// The tightest cluster of quotes: endpoints of the `k` smallest adjacent
/// gaps after sorting by value. Equal gaps favor the lower-priced end so
/// the selection is deterministic.
fn k_closest(quotes: &[PriceQuote], k: usize) -> Vec<PriceQuote> {
	let mut sorted: Vec<&PriceQuote> = quotes.iter().collect();
	sorted.sort_by(|a, b| a.value().cmp(&b.value()));

	let gaps: Vec<Decimal> = sorted
		.windows(2)
		.map(|pair| pair[1].value() - pair[0].value())
		.collect();
	let mut order: Vec<usize> = (0..gaps.len()).collect();
	order.sort_by(|&a, &b| gaps[a].cmp(&gaps[b]).then(a.cmp(&b)));

	let mut picked: BTreeSet<usize> = BTreeSet::new();
	for &gap in order.iter().take(k) {
		picked.insert(gap);
		picked.insert(gap + 1);
	}
	picked.into_iter().map(|index| sorted[index].clone()).collect()
}
