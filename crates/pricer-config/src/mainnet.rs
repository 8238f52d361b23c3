//! Built-in Ethereum mainnet configuration.
//!
//! Addresses and start blocks for the mainnet oracle deployments, the
//! hardcoded-stable set, and the per-source denylists.

use pricer_types::{Address, SourceKind};

use crate::types::{ContractInfo, Denylists, NetworkConfig, OracleChainConfig, SourceContracts, TokenRef};

// Static table entries; a typo here is a programming error.
fn addr(value: &str) -> Address {
	value.parse().expect("valid address literal")
}

pub fn network_config() -> NetworkConfig {
	NetworkConfig {
		oracle: OracleChainConfig {
			order: vec![
				SourceKind::YearnLens,
				SourceKind::ChainlinkFeed,
				SourceKind::CurveCalculations,
				SourceKind::SushiCalculations,
				SourceKind::CurveRouter,
				SourceKind::UniswapForksRouter,
			],
			count: 1,
		},
		overrides: Default::default(),
		contracts: SourceContracts {
			yearn_lens: Some(ContractInfo::new(
				addr("0x83d95e0d5f402511db06817aff3f9ea88224b030"),
				12242339,
			)),
			chainlink_feed: Some(ContractInfo::new(
				addr("0x47fb2585d2c56fe188d0e6ec628a38b74fceeedf"),
				12864088,
			)),
			aave_oracle: None,
			oneinch_oracle: Some(ContractInfo::new(
				addr("0x07d91f5fb9bf7798734c3f606db065549f6893bb"),
				12522266,
			)),
			curve_calculations: Some(ContractInfo::new(
				addr("0x25bf7b72815476dd515044f9650bf79bad0df655"),
				12370088,
			)),
			sushi_calculations: Some(ContractInfo::new(
				addr("0x8263e161a855b644f582d9c164c66aabee53f927"),
				12692284,
			)),
			curve_registries: vec![
				ContractInfo::new(addr("0x7d86446ddb609ed0f5f8684acf30380a356b2b4c"), 11154794),
				ContractInfo::new(addr("0x8f942c20d02befc377d41445793068908e2250d0"), 13986752),
			],
			uniswap_routers: vec![
				// Uniswap V2
				ContractInfo::new(addr("0x7a250d5630b4cf539739df2c5dacb4c659f2488d"), 10207858),
				// SushiSwap
				ContractInfo::new(addr("0xd9e1ce17f2641f24ae83637ab66a2cca9c378b9f"), 10794261),
			],
		},
		denylists: Denylists {
			yearn_lens: vec![
				addr("0x5f98805a4e8be255a32880fdec7f6728c6568ba0"), // LUSD
				addr("0x8daebade922df735c38c80c7ebd708af50815faa"), // tBTC
				addr("0x0316eb71485b0ab14103307bf65a021042c6d380"), // HBTC
				addr("0xca3d75ac011bf5ad07a98d02f18225f9bd9a6bdf"), // crvTriCrypto
				addr("0xae7ab96520de3a18e5e111b5eaab095312d7fe84"), // stETH
			],
			curve_calculations: vec![
				addr("0xca3d75ac011bf5ad07a98d02f18225f9bd9a6bdf"), // crvTriCrypto
				addr("0xc4ad29ba4b3c580e6d59105fff484999997675ff"), // crv3Crypto
			],
			..Default::default()
		},
		hardcoded_stables: vec![
			addr("0x6b175474e89094c44da98b954eedeac495271d0f"), // DAI
			addr("0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48"), // USDC
			addr("0xdac17f958d2ee523a2206206994597c13d831ec7"), // USDT
			addr("0x6c3f90f043a72fa612cbac8115ee7e52bde6e490"), // 3CRV
			addr("0x853d955acef822db058eb8505911ed77f175b99e"), // FRAX
			addr("0xd632f22692fac7611d2aa1c0d552930d43caed3b"), // FRAX3CRV
			addr("0x99d8a9c45b2eca8864373a26d1459e3dff1e17f3"), // MIM
			addr("0x5a6a4d54456819380173272a5e8e9b9904bdf41b"), // MIM3CRV
			addr("0xbc6da0fe9ad5f3b0d58160288917aa56653660e9"), // alUSD
			addr("0x43b4fdfd4ff969587185cdb6f0bd875c5fc83f8c"), // alUSD3CRV
			addr("0x57ab1ec28d129707052df4df418d58a2d46d5f51"), // sUSD
			addr("0x0000000000085d4780b73119b644ae5ecd22b376"), // TUSD
			addr("0x056fd409e1d7a124bd7017459dfea2f387b6d5cd"), // GUSD
			addr("0x4fabb145d64652a948d72533023f6e7a623c7c53"), // BUSD
		],
		blacklist: Vec::new(),
		usdc: TokenRef {
			address: addr("0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48"),
			decimals: 6,
		},
		weth: TokenRef {
			address: addr("0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2"),
			decimals: 18,
		},
		eth_alias: Some(addr("0xeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee")),
		stable_path: vec![
			TokenRef {
				address: addr("0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48"), // USDC
				decimals: 6,
			},
			TokenRef {
				address: addr("0xdac17f958d2ee523a2206206994597c13d831ec7"), // USDT
				decimals: 6,
			},
			TokenRef {
				address: addr("0x6b175474e89094c44da98b954eedeac495271d0f"), // DAI
				decimals: 18,
			},
		],
	}
}
