//! Oracle source implementations.

pub mod aave;
pub mod chainlink;
pub mod curve_calculations;
pub mod oneinch;
pub mod sushi_calculations;
pub mod uniswap_forks;
pub mod yearn_lens;

use crate::router::CurveRouter;
use crate::PriceSource;

pub use aave::AaveOracle;
pub use chainlink::ChainlinkFeed;
pub use curve_calculations::CurveCalculations;
pub use oneinch::OneInchOracle;
pub use sushi_calculations::SushiCalculations;
pub use uniswap_forks::UniswapForksRouter;
pub use yearn_lens::YearnLens;

/// Every source the resolver knows how to drive. Which of them actually run
/// for a token is decided by the per-network oracle order.
pub fn default_sources() -> Vec<Box<dyn PriceSource>> {
	vec![
		Box::new(YearnLens),
		Box::new(ChainlinkFeed),
		Box::new(AaveOracle),
		Box::new(OneInchOracle),
		Box::new(CurveCalculations),
		Box::new(SushiCalculations),
		Box::new(CurveRouter),
		Box::new(UniswapForksRouter),
	]
}
