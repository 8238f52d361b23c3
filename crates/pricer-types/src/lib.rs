//! Shared types for the token pricing system.
//!
//! This crate defines the vocabulary the rest of the workspace speaks:
//! addresses and magnitudes, the abstract contract-call capability, price
//! quotes tagged with their source, per-token validation state, and the
//! pipeline error kinds.

pub mod call;
pub mod common;
pub mod errors;
pub mod quote;
pub mod state;

pub use call::{CallArg, CallClient, CallError, CallValue};
pub use common::{pow10, u256_to_decimal, Address, BlockNumber, ChainId, U256};
pub use errors::PriceError;
pub use quote::{PriceQuote, SourceKind, USD_DECIMALS};
pub use state::TokenPriceState;
