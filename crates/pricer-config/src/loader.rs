//! Configuration loading from files.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use pricer_types::SourceKind;

use crate::types::{OracleChainConfig, PricerConfig};

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
	/// Load configuration from file
	pub fn from_file<P: AsRef<Path>>(path: P) -> Result<PricerConfig> {
		let path = path.as_ref();
		info!("Loading price configuration from {:?}", path);

		let contents = std::fs::read_to_string(path)
			.with_context(|| format!("Failed to read config file: {:?}", path))?;

		let config = match path.extension().and_then(|s| s.to_str()) {
			Some("toml") => Self::from_toml(&contents)?,
			Some("json") => Self::from_json(&contents)?,
			_ => anyhow::bail!("Unsupported config format: {:?}", path),
		};

		Self::validate_config(&config)?;
		Ok(config)
	}

	/// Load from TOML string
	pub fn from_toml(contents: &str) -> Result<PricerConfig> {
		toml::from_str(contents).map_err(|e| anyhow::anyhow!("Failed to parse TOML: {}", e))
	}

	/// Load from JSON string
	pub fn from_json(contents: &str) -> Result<PricerConfig> {
		serde_json::from_str(contents).context("Failed to parse JSON")
	}

	/// Validate configuration
	pub fn validate_config(config: &PricerConfig) -> Result<()> {
		for (chain, network) in &config.networks {
			Self::validate_chain(chain.0, "default", &network.oracle)?;
			for (token, chain_config) in &network.overrides {
				Self::validate_chain(chain.0, &format!("override {:?}", token), chain_config)?;
			}
			if network.usdc.decimals == 0 || network.weth.decimals == 0 {
				anyhow::bail!("Chain {}: reference token decimals must be non-zero", chain);
			}
		}
		Ok(())
	}

	fn validate_chain(chain: u64, label: &str, oracle: &OracleChainConfig) -> Result<()> {
		if oracle.order.is_empty() {
			anyhow::bail!("Chain {}: {} oracle order is empty", chain, label);
		}
		if oracle.count == 0 {
			anyhow::bail!("Chain {}: {} oracle count must be at least 1", chain, label);
		}
		for kind in &oracle.order {
			if matches!(
				kind,
				SourceKind::Hardcoded | SourceKind::Aggregated | SourceKind::None
			) {
				anyhow::bail!(
					"Chain {}: {} oracle order contains non-source kind {:?}",
					chain,
					label,
					kind
				);
			}
		}
		Ok(())
	}
}

/// Built-in tables merged with file overrides: file networks win per chain.
pub fn load_with_builtin<P: AsRef<Path>>(path: Option<P>) -> Result<PricerConfig> {
	let mut config = PricerConfig::builtin();
	if let Some(path) = path {
		let loaded = ConfigLoader::from_file(path)?;
		for (chain, network) in loaded.networks {
			config.networks.insert(chain, network);
		}
	}
	Ok(config)
}
