//! Hysteresis validation of resolved prices.
//!
//! Oracle sources occasionally spike: a drained pool, a stale feed, a
//! manipulation attempt. The validator compares each candidate price against
//! the last accepted one and against the TVL move it would imply, and holds
//! the prior price through short-lived excursions. Persistent moves win
//! after a bounded number of consecutive rejections, so a genuine repricing
//! is delayed, never lost.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use pricer_storage::{PriceStateStore, StateError};
use pricer_types::{Address, BlockNumber};

/// Consecutive rejections either gate tolerates before letting the
/// candidate through.
pub const DEFAULT_BUFFER_LIMIT: u32 = 5;

/// Implied-TVL move, as a fraction of protocol TVL, above which a candidate
/// is suspect.
fn tvl_impact_threshold() -> Decimal {
	Decimal::new(5, 2)
}

/// A resolved price plus the TVL context needed to judge it. The caller
/// supplies supply and TVL figures from its own accounting.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceCandidate {
	/// Candidate USD price.
	pub price_usd: Decimal,
	/// Circulating token amount, in interpreted units.
	pub token_supply: Decimal,
	/// TVL currently attributed to this token.
	pub token_tvl_usd: Decimal,
	/// TVL of the whole protocol.
	pub protocol_tvl_usd: Decimal,
	/// Block the candidate was resolved at.
	pub block: BlockNumber,
}

/// Accepts or rejects candidate prices per token, keeping its state in a
/// [`PriceStateStore`].
pub struct PriceChangeValidator<S> {
	store: S,
	blacklist: Vec<Address>,
	limit: u32,
}

impl<S: PriceStateStore> PriceChangeValidator<S> {
	pub fn new(store: S, blacklist: Vec<Address>) -> Self {
		Self {
			store,
			blacklist,
			limit: DEFAULT_BUFFER_LIMIT,
		}
	}

	pub fn with_limit(mut self, limit: u32) -> Self {
		self.limit = limit;
		self
	}

	/// Returns the price to use for this token: the candidate if it passes,
	/// the prior accepted price if a gate holds it back, zero for
	/// blacklisted tokens.
	pub async fn accept_or_reject(
		&self,
		token: Address,
		candidate: &PriceCandidate,
	) -> Result<Decimal, StateError> {
		if self.blacklist.contains(&token) {
			debug!(token = ?token, "blacklisted token forced to zero");
			return Ok(Decimal::ZERO);
		}

		let mut state = self.store.load(token).await?.unwrap_or_default();
		let prior = state.last_price_usd.filter(|price| *price > Decimal::ZERO);

		// Both gates need a prior price to compare against; the first
		// observation is always accepted.
		if let Some(prior_price) = prior {
			if candidate.protocol_tvl_usd > Decimal::ZERO {
				// Saturating math: a candidate absurd enough to overflow the
				// implied-TVL figure should trip the gate, not panic.
				let implied_delta = candidate
					.price_usd
					.saturating_mul(candidate.token_supply)
					.saturating_sub(candidate.token_tvl_usd)
					.abs();
				let impact = implied_delta
					.checked_div(candidate.protocol_tvl_usd)
					.unwrap_or(Decimal::MAX);
				if impact > tvl_impact_threshold() && state.tvl_impact_buffer < self.limit {
					warn!(
						token = ?token,
						impact = %impact,
						candidate = %candidate.price_usd,
						prior = %prior_price,
						"candidate price implies an outsized TVL move, holding prior"
					);
					state.tvl_impact_buffer += 1;
					self.store.save(token, state).await?;
					return Ok(prior_price);
				}
			}

			let doubled = prior_price.saturating_mul(Decimal::TWO);
			let halved = prior_price / Decimal::TWO;
			if (candidate.price_usd > doubled || candidate.price_usd < halved)
				&& state.price_change_buffer < self.limit
			{
				warn!(
					token = ?token,
					candidate = %candidate.price_usd,
					prior = %prior_price,
					"candidate price moved more than 2x, holding prior"
				);
				state.price_change_buffer += 1;
				self.store.save(token, state).await?;
				return Ok(prior_price);
			}
		}

		state.accept(candidate.price_usd, candidate.block);
		self.store.save(token, state).await?;
		Ok(candidate.price_usd)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pricer_storage::MemoryStateStore;
	use rust_decimal_macros::dec;

	fn addr(n: u64) -> Address {
		Address::from_low_u64_be(n)
	}

	/// A candidate whose implied TVL matches the recorded TVL, so only the
	/// price gate is in play.
	fn quiet_candidate(price_usd: Decimal, block: BlockNumber) -> PriceCandidate {
		PriceCandidate {
			price_usd,
			token_supply: dec!(1000),
			token_tvl_usd: price_usd * dec!(1000),
			protocol_tvl_usd: dec!(1000000),
			block,
		}
	}

	fn validator(blacklist: Vec<Address>) -> PriceChangeValidator<MemoryStateStore> {
		PriceChangeValidator::new(MemoryStateStore::new(), blacklist)
	}

	#[tokio::test]
	async fn test_first_observation_is_accepted() {
		let validator = validator(Vec::new());
		let accepted = validator
			.accept_or_reject(addr(1), &quiet_candidate(dec!(123), 10))
			.await
			.unwrap();
		assert_eq!(accepted, dec!(123));
	}

	#[tokio::test]
	async fn test_blacklisted_token_is_zero() {
		let validator = validator(vec![addr(1)]);
		let accepted = validator
			.accept_or_reject(addr(1), &quiet_candidate(dec!(123), 10))
			.await
			.unwrap();
		assert_eq!(accepted, Decimal::ZERO);
		// Quarantined tokens never even get a state record.
		assert!(validator.store.load(addr(1)).await.unwrap().is_none());
	}

	#[tokio::test]
	async fn test_small_move_is_accepted() {
		let validator = validator(Vec::new());
		let token = addr(1);
		validator
			.accept_or_reject(token, &quiet_candidate(dec!(100), 10))
			.await
			.unwrap();
		let accepted = validator
			.accept_or_reject(token, &quiet_candidate(dec!(150), 11))
			.await
			.unwrap();
		assert_eq!(accepted, dec!(150));
	}

	#[tokio::test]
	async fn test_spike_held_until_limit_then_accepted() {
		let limit = 3;
		let validator = validator(Vec::new()).with_limit(limit);
		let token = addr(1);
		validator
			.accept_or_reject(token, &quiet_candidate(dec!(100), 10))
			.await
			.unwrap();

		// More-than-doubled candidates are held back `limit` times...
		for round in 0..limit {
			let held = validator
				.accept_or_reject(token, &quiet_candidate(dec!(300), 11 + round as u64))
				.await
				.unwrap();
			assert_eq!(held, dec!(100), "round {round} should hold the prior");
		}
		// ...and the persistent move wins on the next attempt.
		let accepted = validator
			.accept_or_reject(token, &quiet_candidate(dec!(300), 20))
			.await
			.unwrap();
		assert_eq!(accepted, dec!(300));
	}

	#[tokio::test]
	async fn test_halving_is_also_held() {
		let validator = validator(Vec::new());
		let token = addr(1);
		validator
			.accept_or_reject(token, &quiet_candidate(dec!(100), 10))
			.await
			.unwrap();
		let held = validator
			.accept_or_reject(token, &quiet_candidate(dec!(40), 11))
			.await
			.unwrap();
		assert_eq!(held, dec!(100));
	}

	#[tokio::test]
	async fn test_tvl_gate_holds_outsized_moves() {
		let validator = validator(Vec::new());
		let token = addr(1);
		validator
			.accept_or_reject(token, &quiet_candidate(dec!(100), 10))
			.await
			.unwrap();

		// Price moved only 50% but the implied TVL swing is 15% of the
		// protocol.
		let candidate = PriceCandidate {
			price_usd: dec!(150),
			token_supply: dec!(1000),
			token_tvl_usd: dec!(0),
			protocol_tvl_usd: dec!(1000000),
			block: 11,
		};
		let held = validator.accept_or_reject(token, &candidate).await.unwrap();
		assert_eq!(held, dec!(100));
	}

	#[tokio::test]
	async fn test_overflowing_candidate_holds_prior() {
		let validator = validator(Vec::new());
		let token = addr(1);
		validator
			.accept_or_reject(token, &quiet_candidate(dec!(100), 10))
			.await
			.unwrap();

		// price × supply does not fit a Decimal; the gate treats the implied
		// move as unbounded and holds the prior price.
		let candidate = PriceCandidate {
			price_usd: Decimal::MAX,
			token_supply: dec!(2),
			token_tvl_usd: dec!(100000),
			protocol_tvl_usd: dec!(1000000),
			block: 11,
		};
		let held = validator.accept_or_reject(token, &candidate).await.unwrap();
		assert_eq!(held, dec!(100));
	}

	#[tokio::test]
	async fn test_tvl_gate_skipped_on_first_observation() {
		let validator = validator(Vec::new());
		let candidate = PriceCandidate {
			price_usd: dec!(150),
			token_supply: dec!(1000),
			token_tvl_usd: dec!(0),
			protocol_tvl_usd: dec!(1000000),
			block: 10,
		};
		let accepted = validator
			.accept_or_reject(addr(1), &candidate)
			.await
			.unwrap();
		assert_eq!(accepted, dec!(150));
	}

	#[tokio::test]
	async fn test_acceptance_resets_buffers() {
		let store = MemoryStateStore::new();
		let validator = PriceChangeValidator::new(store, Vec::new()).with_limit(2);
		let token = addr(1);
		validator
			.accept_or_reject(token, &quiet_candidate(dec!(100), 10))
			.await
			.unwrap();
		validator
			.accept_or_reject(token, &quiet_candidate(dec!(300), 11))
			.await
			.unwrap();
		// An in-range candidate clears the rejection count.
		validator
			.accept_or_reject(token, &quiet_candidate(dec!(110), 12))
			.await
			.unwrap();

		let state = validator.store.load(token).await.unwrap().unwrap();
		assert_eq!(state.price_change_buffer, 0);
		assert_eq!(state.tvl_impact_buffer, 0);
		assert_eq!(state.last_price_usd, Some(dec!(110)));
		assert_eq!(state.last_price_block, 12);
	}
}
