use solana_sdk::pubkey::Pubkey;

use drift::state::oracle::OracleSource;

#[derive(Debug, Clone)]
pub struct PerpMarketConfig {
    pub symbol: &'static str,
    pub market_index: u16,
    pub oracle: Pubkey,
    pub oracle_source: OracleSource,
}

#[derive(Debug, Clone)]
pub struct SpotMarketConfig {
    pub symbol: &'static str,
    pub market_index: u16,
    pub oracle: Pubkey,
    pub oracle_source: OracleSource,
    /// External venue market addresses this spot market can source fallback
    /// liquidity from, keyed by venue name ("phoenix", "serum").
    pub external_markets: &'static [(&'static str, &'static str)],
}

macro_rules! pubkey {
    ($s:expr) => {
        match Pubkey::from_str($s) {
            Ok(key) => key,
            Err(_) => Pubkey::new_from_array([0u8; 32]),
        }
    };
}

use std::str::FromStr;

/// Static market registry for `devnet`/`mainnet`. This is a process-lifetime
/// fixture (markets are static per spec, no hot-reload) standing in for the
/// teacher's JSON-config-loading pattern; a production deployment would
/// source these from the same `drift-labs/protocol-v2` config JSON the
/// teacher's own tooling reads from.
pub fn perp_markets(env: &str) -> Vec<PerpMarketConfig> {
    match env {
        "mainnet" => vec![
            PerpMarketConfig {
                symbol: "SOL-PERP",
                market_index: 0,
                oracle: pubkey!("H6ARHf6YXhGYeQfUzQNGk6rDNnLBQKrenN712K4AQJEG"),
                oracle_source: OracleSource::PythPull,
            },
            PerpMarketConfig {
                symbol: "BTC-PERP",
                market_index: 1,
                oracle: pubkey!("486kr3pmFPfTsS4aZgcsQ7kS4i9rjMsYYZup6HQNSTT4"),
                oracle_source: OracleSource::PythPull,
            },
            PerpMarketConfig {
                symbol: "ETH-PERP",
                market_index: 2,
                oracle: pubkey!("JBu1AL4obBcCMqKBBxhpWCNUt136ijcuMZLFvTP7iWdB"),
                oracle_source: OracleSource::PythPull,
            },
        ],
        _ => vec![
            PerpMarketConfig {
                symbol: "SOL-PERP",
                market_index: 0,
                oracle: pubkey!("J83w4HKfqxwcq3BEMMkPFSppX3gqekLyLJBexebFVkix"),
                oracle_source: OracleSource::PythPull,
            },
            PerpMarketConfig {
                symbol: "BTC-PERP",
                market_index: 1,
                oracle: pubkey!("486kr3pmFPfTsS4aZgcsQ7kS4i9rjMsYYZup6HQNSTT4"),
                oracle_source: OracleSource::PythPull,
            },
        ],
    }
}

pub fn spot_markets(env: &str) -> Vec<SpotMarketConfig> {
    match env {
        "mainnet" => vec![
            SpotMarketConfig {
                symbol: "USDC",
                market_index: 0,
                oracle: Pubkey::new_from_array([0u8; 32]),
                oracle_source: OracleSource::QuoteAsset,
                external_markets: &[],
            },
            SpotMarketConfig {
                symbol: "SOL",
                market_index: 1,
                oracle: pubkey!("H6ARHf6YXhGYeQfUzQNGk6rDNnLBQKrenN712K4AQJEG"),
                oracle_source: OracleSource::PythPull,
                external_markets: &[("phoenix", "4DoNfFBfF7UokCC2FQzriy7yR7iFgjwwpQ1iFiVLrwQs")],
            },
        ],
        _ => vec![
            SpotMarketConfig {
                symbol: "USDC",
                market_index: 0,
                oracle: Pubkey::new_from_array([0u8; 32]),
                oracle_source: OracleSource::QuoteAsset,
                external_markets: &[],
            },
            SpotMarketConfig {
                symbol: "SOL",
                market_index: 1,
                oracle: pubkey!("J83w4HKfqxwcq3BEMMkPFSppX3gqekLyLJBexebFVkix"),
                oracle_source: OracleSource::PythPull,
                external_markets: &[],
            },
        ],
    }
}
