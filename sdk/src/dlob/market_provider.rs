use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use drift::state::oracle::OraclePriceData;
use drift::state::perp_market::PerpMarket;
use drift::state::spot_market::SpotMarket;
use drift::state::user::MarketType;
use log::warn;
use solana_sdk::pubkey::Pubkey;
use tokio::time::{self, Duration};

use crate::accounts::{AccountDecoder, AccountProvider};
use crate::constants::MarketInfo;
use crate::oracle::{OracleDecoder, OracleMap};
use crate::types::SdkResult;

use super::types::MarketProvider;

/// Concrete `MarketProvider`: keeps a polled cache of perp/spot market
/// accounts (for vAMM reserves and oracle source lookups) alongside an
/// `OracleMap` for live prices. Both are refreshed through the same
/// `AccountProvider` boundary `UserMap`/`OrderSubscriber` use.
pub struct MarketAccountMap<T: AccountProvider> {
    account_provider: T,
    perp_decoder: AccountDecoder<PerpMarket>,
    spot_decoder: AccountDecoder<SpotMarket>,
    perp_addresses: Vec<(u16, Pubkey)>,
    spot_addresses: Vec<(u16, Pubkey)>,
    perp_markets: Arc<DashMap<u16, PerpMarket>>,
    spot_markets: Arc<DashMap<u16, SpotMarket>>,
    oracle_map: OracleMap<T>,
    polling_frequency: Duration,
    running: Arc<AtomicBool>,
}

impl<T: AccountProvider> Clone for MarketAccountMap<T> {
    fn clone(&self) -> Self {
        Self {
            account_provider: self.account_provider.clone(),
            perp_decoder: self.perp_decoder,
            spot_decoder: self.spot_decoder,
            perp_addresses: self.perp_addresses.clone(),
            spot_addresses: self.spot_addresses.clone(),
            perp_markets: self.perp_markets.clone(),
            spot_markets: self.spot_markets.clone(),
            oracle_map: self.oracle_map.clone(),
            polling_frequency: self.polling_frequency,
            running: self.running.clone(),
        }
    }
}

impl<T: AccountProvider> MarketAccountMap<T> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        account_provider: T,
        program_id: &Pubkey,
        markets: &[MarketInfo],
        perp_decoder: AccountDecoder<PerpMarket>,
        spot_decoder: AccountDecoder<SpotMarket>,
        oracle_decoder: OracleDecoder,
        polling_frequency: Duration,
    ) -> Self {
        use crate::addresses::pda::{get_perp_market_pubkey, get_spot_market_pubkey};

        let perp_addresses = markets
            .iter()
            .filter(|m| m.market_type == MarketType::Perp)
            .map(|m| (m.market_index, get_perp_market_pubkey(program_id, m.market_index)))
            .collect();
        let spot_addresses = markets
            .iter()
            .filter(|m| m.market_type == MarketType::Spot)
            .map(|m| (m.market_index, get_spot_market_pubkey(program_id, m.market_index)))
            .collect();

        let oracle_map = OracleMap::new(
            account_provider.clone(),
            oracle_decoder,
            markets.to_vec(),
            polling_frequency,
        );

        Self {
            account_provider,
            perp_decoder,
            spot_decoder,
            perp_addresses,
            spot_addresses,
            perp_markets: Arc::new(DashMap::new()),
            spot_markets: Arc::new(DashMap::new()),
            oracle_map,
            polling_frequency,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    async fn poll_once(&self) -> SdkResult<()> {
        if !self.perp_addresses.is_empty() {
            let pubkeys: Vec<_> = self.perp_addresses.iter().map(|(_, pk)| *pk).collect();
            let results = self.account_provider.get_multiple_accounts(&pubkeys).await?;
            for ((market_index, _), result) in self.perp_addresses.iter().zip(results) {
                let Some(data_and_slot) = result else { continue };
                match (self.perp_decoder)(&data_and_slot.data) {
                    Ok(market) => {
                        self.perp_markets.insert(*market_index, market);
                    }
                    Err(e) => warn!("failed to decode perp market {market_index}: {e}"),
                }
            }
        }

        if !self.spot_addresses.is_empty() {
            let pubkeys: Vec<_> = self.spot_addresses.iter().map(|(_, pk)| *pk).collect();
            let results = self.account_provider.get_multiple_accounts(&pubkeys).await?;
            for ((market_index, _), result) in self.spot_addresses.iter().zip(results) {
                let Some(data_and_slot) = result else { continue };
                match (self.spot_decoder)(&data_and_slot.data) {
                    Ok(market) => {
                        self.spot_markets.insert(*market_index, market);
                    }
                    Err(e) => warn!("failed to decode spot market {market_index}: {e}"),
                }
            }
        }

        Ok(())
    }

    pub async fn subscribe(&self) -> SdkResult<()> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        self.poll_once().await?;
        self.oracle_map.subscribe().await?;

        let map = self.clone();
        tokio::spawn(async move {
            let mut interval = time::interval(map.polling_frequency);
            while map.running.load(Ordering::SeqCst) {
                interval.tick().await;
                if let Err(e) = map.poll_once().await {
                    warn!("market account poll failed: {e}");
                }
            }
        });

        Ok(())
    }
}

impl<T: AccountProvider> MarketProvider for MarketAccountMap<T> {
    fn get_perp_market(&self, market_index: u16) -> Option<PerpMarket> {
        self.perp_markets.get(&market_index).map(|e| e.clone())
    }

    fn get_spot_market(&self, market_index: u16) -> Option<SpotMarket> {
        self.spot_markets.get(&market_index).map(|e| e.clone())
    }

    fn get_oracle_price_data(
        &self,
        market_type: MarketType,
        market_index: u16,
    ) -> Option<OraclePriceData> {
        self.oracle_map.get_price_data(market_type, market_index)
    }
}
