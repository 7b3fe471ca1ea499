use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use drift::state::oracle::{HistoricalOracleData, OracleSource, OraclePriceData};
use drift::state::user::MarketType;
use log::warn;
use tokio::time::{self, Duration};

use crate::accounts::AccountProvider;
use crate::constants::MarketInfo;
use crate::math::oracle::calculate_live_oracle_twap;
use crate::types::{DataAndSlot, SdkResult};

/// Decodes a raw oracle account buffer into a price given its `OracleSource`
/// (Pyth pull, Pyth legacy, Switchboard, or the zero-cost `QuoteAsset`
/// constant). The concrete decode logic for each wire format is an
/// injected contract, same as `AccountDecoder` -- this crate only
/// orchestrates polling, caching and TWAP/std derivation (spec's
/// `OracleView`, see `math::oracle`).
pub type OracleDecoder = fn(OracleSource, &[u8]) -> SdkResult<OraclePriceData>;

/// Live oracle price cache keyed by `(marketType, marketIndex)`, refreshed
/// by polling the configured oracle accounts through the same
/// `AccountProvider` boundary the user-account streams use.
pub struct OracleMap<T: AccountProvider> {
    account_provider: T,
    decoder: OracleDecoder,
    markets: Vec<MarketInfo>,
    prices: Arc<DashMap<(MarketType, u16), DataAndSlot<OraclePriceData>>>,
    polling_frequency: Duration,
    running: Arc<AtomicBool>,
}

impl<T: AccountProvider> Clone for OracleMap<T> {
    fn clone(&self) -> Self {
        Self {
            account_provider: self.account_provider.clone(),
            decoder: self.decoder,
            markets: self.markets.clone(),
            prices: self.prices.clone(),
            polling_frequency: self.polling_frequency,
            running: self.running.clone(),
        }
    }
}

impl<T: AccountProvider> OracleMap<T> {
    pub fn new(
        account_provider: T,
        decoder: OracleDecoder,
        markets: Vec<MarketInfo>,
        polling_frequency: Duration,
    ) -> Self {
        Self {
            account_provider,
            decoder,
            markets,
            prices: Arc::new(DashMap::new()),
            polling_frequency,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    async fn poll_once(&self) -> SdkResult<()> {
        let pubkeys: Vec<_> = self.markets.iter().map(|m| m.oracle).collect();
        let results = self.account_provider.get_multiple_accounts(&pubkeys).await?;

        for (market, result) in self.markets.iter().zip(results) {
            let Some(data_and_slot) = result else { continue };
            match (self.decoder)(market.oracle_source, &data_and_slot.data) {
                Ok(price_data) => {
                    self.prices.insert(
                        (market.market_type, market.market_index),
                        DataAndSlot {
                            slot: data_and_slot.slot,
                            data: price_data,
                        },
                    );
                }
                Err(e) => warn!("failed to decode oracle for {}: {e}", market.market_index),
            }
        }
        Ok(())
    }

    pub async fn subscribe(&self) -> SdkResult<()> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        self.poll_once().await?;

        let map = self.clone();
        tokio::spawn(async move {
            let mut interval = time::interval(map.polling_frequency);
            while map.running.load(Ordering::SeqCst) {
                interval.tick().await;
                if let Err(e) = map.poll_once().await {
                    warn!("oracle map poll failed: {e}");
                }
            }
        });

        Ok(())
    }

    pub fn get_price_data(
        &self,
        market_type: MarketType,
        market_index: u16,
    ) -> Option<OraclePriceData> {
        self.prices
            .get(&(market_type, market_index))
            .map(|entry| entry.data)
    }

    pub fn get_price_data_and_slot(
        &self,
        market_type: MarketType,
        market_index: u16,
    ) -> Option<DataAndSlot<OraclePriceData>> {
        self.prices.get(&(market_type, market_index)).map(|e| *e)
    }

    /// Live TWAP combining the cached live price with a market's own
    /// `historical_oracle_data` (tracked on-chain, not by this map).
    pub fn live_twap(
        &self,
        market_type: MarketType,
        market_index: u16,
        historical: &HistoricalOracleData,
        now: i128,
        period: i128,
    ) -> Option<i128> {
        let price_data = self.get_price_data(market_type, market_index)?;
        Some(calculate_live_oracle_twap(historical, &price_data, now, period))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn live_twap_returns_none_without_a_cached_price() {
        #[derive(Clone)]
        struct NoopProvider;

        #[async_trait::async_trait]
        impl AccountProvider for NoopProvider {
            async fn get_account(
                &self,
                _pubkey: &solana_sdk::pubkey::Pubkey,
            ) -> SdkResult<DataAndSlot<Vec<u8>>> {
                Err(crate::types::SdkError::InvalidAccount)
            }

            async fn get_multiple_accounts(
                &self,
                pubkeys: &[solana_sdk::pubkey::Pubkey],
            ) -> SdkResult<Vec<Option<DataAndSlot<Vec<u8>>>>> {
                Ok(vec![None; pubkeys.len()])
            }
        }

        fn decode(_source: OracleSource, _data: &[u8]) -> SdkResult<OraclePriceData> {
            Ok(OraclePriceData::default())
        }

        let map = OracleMap::new(NoopProvider, decode, vec![], Duration::from_secs(1));
        let historical = HistoricalOracleData::default();
        assert!(map
            .live_twap(MarketType::Perp, 0, &historical, 0, 300)
            .is_none());
    }
}
