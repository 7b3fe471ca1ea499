use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::extract::FromRef;
use dlob_sdk::constants::MarketRegistry;
use dlob_sdk::dlob::{BookBuilder, DLOBSubscriber, MarketAccountMap};
use dlob_sdk::usermap::{DlobProvider, UserStatsIndex};
use dlob_sdk::{SlotSource, SlotSubscriber};

use crate::config::Config;
use crate::provider::AccountStreamProvider;
use crate::rate_limit::RateLimitLayer;
use crate::rpc_provider::RpcAccountProvider;

pub type Dlob = DLOBSubscriber<BookBuilder<AccountStreamProvider>, SlotSubscriber, MarketAccountMap<RpcAccountProvider>>;

/// Everything an HTTP handler needs, cheaply `Clone`-able (every field is
/// itself an `Arc`/DashMap-backed handle). Owns no network resources
/// directly -- those live inside `provider`/`market_provider`/`dlob`.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub provider: AccountStreamProvider,
    pub market_provider: MarketAccountMap<RpcAccountProvider>,
    pub dlob: Dlob,
    pub market_registry: Arc<MarketRegistry>,
    pub user_stats_index: UserStatsIndex,
    pub slot_source: SlotSubscriber,
    subscribed: Arc<AtomicBool>,
}

impl AppState {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: Config,
        provider: AccountStreamProvider,
        market_provider: MarketAccountMap<RpcAccountProvider>,
        dlob: Dlob,
        market_registry: MarketRegistry,
        user_stats_index: UserStatsIndex,
        slot_source: SlotSubscriber,
    ) -> Self {
        Self {
            config,
            provider,
            market_provider,
            dlob,
            market_registry: Arc::new(market_registry),
            user_stats_index,
            slot_source,
            subscribed: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn current_slot(&self) -> u64 {
        self.slot_source.get_slot()
    }

    pub fn mark_subscribed(&self) {
        self.subscribed.store(true, Ordering::SeqCst);
    }

    /// `/startup` readiness: the account stream is subscribed, has tracked
    /// at least one account, and `userStats` has at least one PDA on file.
    /// `UserStatsIndex` PDAs are deterministic from an authority pubkey
    /// alone, so they're derived eagerly for every authority known at
    /// startup (see `main.rs`) rather than waiting on the first
    /// `/topMakers?includeUserStats=true` call, giving this leg a real
    /// signal instead of always reading zero.
    pub fn is_ready(&self) -> bool {
        self.subscribed.load(Ordering::SeqCst) && self.provider.size() > 0 && self.user_stats_index.size() > 0
    }
}

/// Bundles `AppState` with the rate limiter so both can be axum `State`
/// extractors off one router state type.
#[derive(Clone)]
pub struct ServerState {
    pub app: AppState,
    pub limiter: RateLimitLayer,
}

impl FromRef<ServerState> for AppState {
    fn from_ref(state: &ServerState) -> Self {
        state.app.clone()
    }
}

impl FromRef<ServerState> for RateLimitLayer {
    fn from_ref(state: &ServerState) -> Self {
        state.limiter.clone()
    }
}
