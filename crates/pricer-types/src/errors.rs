//! Error kinds for the price resolution pipeline.
//!
//! None of these abort the embedding pipeline: the resolver logs them and
//! hands back a failed quote at its public surface.

use thiserror::Error;

use crate::quote::SourceKind;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
	/// No network table is configured for the requested chain.
	#[error("no price configuration for chain {0}")]
	ConfigurationMissing(u64),

	/// The source's contract is not configured on this network, or the query
	/// block predates its deployment.
	#[error("{0:?} is not available on this network at the queried block")]
	SourceUnavailable(SourceKind),

	/// The source's contract reverted or answered with nothing usable.
	#[error("{0:?} produced no usable answer")]
	SourceReverted(SourceKind),

	/// The token is on the source's denylist.
	#[error("token is denylisted for {0:?}")]
	SourceDenylisted(SourceKind),

	/// No configured source produced a usable quote.
	#[error("no source produced a usable quote")]
	ConsensusUnreachable,

	/// Pool-composition recursion exceeded the depth ceiling.
	#[error("recursion depth exceeded while resolving a pooled token")]
	RecursionDepthExceeded,
}
