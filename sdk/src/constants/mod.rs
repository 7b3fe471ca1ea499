pub mod perp_markets;

use drift::state::oracle::OracleSource;
use drift::state::user::MarketType;
use solana_sdk::pubkey::Pubkey;

pub use perp_markets::{perp_markets, spot_markets, PerpMarketConfig, SpotMarketConfig};

#[derive(Debug, Clone, Copy)]
pub struct MarketInfo {
    pub market_type: MarketType,
    pub market_index: u16,
    pub oracle: Pubkey,
    pub oracle_source: OracleSource,
}

/// Name -> (type, index) -> oracle registry built once at startup from the
/// static market lists for the configured environment. Market selection at
/// the HTTP layer (`marketName` query param) resolves against this before
/// ever touching the DLOB.
#[derive(Debug, Clone)]
pub struct MarketRegistry {
    by_name: std::collections::HashMap<String, MarketInfo>,
}

impl MarketRegistry {
    pub fn load(env: &str) -> Self {
        let mut by_name = std::collections::HashMap::new();

        for market in perp_markets(env) {
            by_name.insert(
                market.symbol.to_string(),
                MarketInfo {
                    market_type: MarketType::Perp,
                    market_index: market.market_index,
                    oracle: market.oracle,
                    oracle_source: market.oracle_source,
                },
            );
        }

        for market in spot_markets(env) {
            by_name.insert(
                market.symbol.to_string(),
                MarketInfo {
                    market_type: MarketType::Spot,
                    market_index: market.market_index,
                    oracle: market.oracle,
                    oracle_source: market.oracle_source,
                },
            );
        }

        Self { by_name }
    }

    pub fn lookup(&self, name: &str) -> Option<MarketInfo> {
        self.by_name.get(name).copied()
    }

    /// Case-insensitive lookup, since `marketName` in the HTTP interface is
    /// documented as such (e.g. `sol-perp` resolves the same as `SOL-PERP`).
    pub fn lookup_ci(&self, name: &str) -> Option<MarketInfo> {
        let upper = name.to_ascii_uppercase();
        self.by_name.get(&upper).copied()
    }

    pub fn exists(&self, market_type: MarketType, market_index: u16) -> bool {
        self.by_name
            .values()
            .any(|m| m.market_type == market_type && m.market_index == market_index)
    }

    pub fn all(&self) -> Vec<MarketInfo> {
        self.by_name.values().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_symbol_case_sensitively() {
        let registry = MarketRegistry::load("devnet");
        assert!(registry.lookup("SOL-PERP").is_some());
        assert!(registry.lookup("sol-perp").is_none());
    }
}
