//! Network configuration for the token pricing system.
//!
//! Each chain gets one [`NetworkConfig`] table: which oracle contracts exist
//! and since when, the order sources are tried in, how many answers to
//! collect, and the address lists (hardcoded stables, per-source denylists,
//! the validator blacklist). A built-in Ethereum mainnet table ships with
//! the crate; anything else is loaded from TOML or JSON.

pub mod loader;
pub mod mainnet;
pub mod serde_helpers;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{
	ContractInfo, Denylists, NetworkConfig, OracleChainConfig, PricerConfig, SourceContracts,
	TokenRef,
};
