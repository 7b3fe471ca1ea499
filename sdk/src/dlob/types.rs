use async_trait::async_trait;
use drift::state::{oracle::OraclePriceData, perp_market::PerpMarket, spot_market::SpotMarket};

use crate::slot_subscriber::SlotSource;

use super::dlob::DLOB;

/// Produces an up-to-date `DLOB` snapshot for a given slot. The two
/// concrete implementations (full user-account map, compact order
/// subscriber) live in `crate::usermap`; `DLOBSubscriber` only depends on
/// this trait so it never needs to know which mode is active.
#[async_trait]
pub trait DlobSource: Send + Sync {
    async fn get_dlob(&self, slot: u64) -> DLOB;
}

/// Resolves market accounts and oracle prices needed to build L2/L3 views
/// and the vAMM fallback, independent of how those are fetched (static
/// registry + periodic `AccountProvider` refresh, see `constants` and
/// `oracle::OracleMap`).
pub trait MarketProvider: Send + Sync {
    fn get_perp_market(&self, market_index: u16) -> Option<PerpMarket>;
    fn get_spot_market(&self, market_index: u16) -> Option<SpotMarket>;
    fn get_oracle_price_data(
        &self,
        market_type: drift::state::user::MarketType,
        market_index: u16,
    ) -> Option<OraclePriceData>;
}

pub struct DLOBSubscriptionConfig<D: DlobSource, S: SlotSource> {
    pub dlob_source: D,
    pub slot_source: S,
    pub update_frequency: std::time::Duration,
}

pub trait DLOBSubscriberEvents {
    fn update(dlob: DLOB);
    fn error(message: String);
}
