use std::sync::Arc;

use drift::state::user::{MarketType, Order};
use log::{error, info};
use solana_sdk::pubkey::Pubkey;
use tokio::sync::Mutex;
use tokio::time::{self, Duration};

use crate::event_emitter::EventEmitter;
use crate::types::{SdkError, SdkResult};

use super::dlob::DLOB;
use super::dlob_node::DLOBNode;
use super::order_book_levels::{L2OrderBook, L2OrderBookGenerator, L3OrderBook};
use super::types::{DLOBSubscriptionConfig, DlobSource, MarketProvider};
use super::vamm::VammL2Generator;

struct DLOBSubscriberInner {
    dlob: DLOB,
}

/// Owns the tick loop: every `update_frequency`, pulls a fresh `DLOB`
/// snapshot from its `DlobSource` and atomically swaps it in behind a
/// mutex, so readers (the HTTP routes) never block on a rebuild in
/// progress and never observe a partially-built book.
pub struct DLOBSubscriber<D, S, M>
where
    D: DlobSource + Clone + Send + Sync + 'static,
    S: crate::slot_subscriber::SlotSource + Clone + Send + Sync + 'static,
    M: MarketProvider + Clone + Send + Sync + 'static,
{
    dlob_source: D,
    slot_source: S,
    market_provider: M,
    update_frequency: Duration,
    dlob: Arc<Mutex<DLOBSubscriberInner>>,
    event_emitter: EventEmitter,
    running: Arc<std::sync::atomic::AtomicBool>,
}

impl<D, S, M> Clone for DLOBSubscriber<D, S, M>
where
    D: DlobSource + Clone + Send + Sync + 'static,
    S: crate::slot_subscriber::SlotSource + Clone + Send + Sync + 'static,
    M: MarketProvider + Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            dlob_source: self.dlob_source.clone(),
            slot_source: self.slot_source.clone(),
            market_provider: self.market_provider.clone(),
            update_frequency: self.update_frequency,
            dlob: self.dlob.clone(),
            event_emitter: self.event_emitter.clone(),
            running: self.running.clone(),
        }
    }
}

impl<D, S, M> DLOBSubscriber<D, S, M>
where
    D: DlobSource + Clone + Send + Sync + 'static,
    S: crate::slot_subscriber::SlotSource + Clone + Send + Sync + 'static,
    M: MarketProvider + Clone + Send + Sync + 'static,
{
    pub fn new(config: DLOBSubscriptionConfig<D, S>, market_provider: M) -> Self {
        Self {
            dlob_source: config.dlob_source,
            slot_source: config.slot_source,
            market_provider,
            update_frequency: config.update_frequency,
            dlob: Arc::new(Mutex::new(DLOBSubscriberInner { dlob: DLOB::new() })),
            event_emitter: EventEmitter::new(),
            running: Arc::new(std::sync::atomic::AtomicBool::new(false)),
        }
    }

    pub fn event_emitter(&self) -> EventEmitter {
        self.event_emitter.clone()
    }

    pub async fn subscribe(&self) -> SdkResult<()> {
        if self.running.swap(true, std::sync::atomic::Ordering::SeqCst) {
            return Ok(());
        }

        self.update_dlob().await?;

        let subscriber = self.clone();
        tokio::spawn(async move {
            let mut interval = time::interval(subscriber.update_frequency);
            while subscriber.running.load(std::sync::atomic::Ordering::SeqCst) {
                interval.tick().await;
                if let Err(e) = subscriber.update_dlob().await {
                    error!("dlob tick failed: {e}");
                    subscriber.event_emitter.emit("error", Box::new(TickError(e.to_string())));
                }
            }
        });

        Ok(())
    }

    async fn update_dlob(&self) -> SdkResult<()> {
        let slot = self.slot_source.get_slot();
        let new_dlob = self.dlob_source.get_dlob(slot).await;

        info!("dlob updated: {} perp orders, {} spot orders", new_dlob.size().0, new_dlob.size().1);

        let mut guard = self.dlob.lock().await;
        guard.dlob = new_dlob.clone();
        drop(guard);

        self.event_emitter.emit("update", Box::new(new_dlob));
        Ok(())
    }

    pub async fn get_dlob(&self) -> DLOB {
        self.dlob.lock().await.dlob.clone()
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn get_l2(
        &self,
        market_index: u16,
        market_type: MarketType,
        depth: usize,
        include_vamm: bool,
        num_vamm_orders: Option<usize>,
        mut fallback_l2_generators: Vec<Box<dyn L2OrderBookGenerator>>,
    ) -> SdkResult<L2OrderBook> {
        let is_perp = market_type == MarketType::Perp;

        let oracle_price_data = self
            .market_provider
            .get_oracle_price_data(market_type, market_index)
            .ok_or_else(|| SdkError::MarketNotFound(market_index.to_string()))?;

        if is_perp && include_vamm {
            if !fallback_l2_generators.is_empty() {
                return Err(SdkError::Generic(
                    "include_vamm can only be used if fallback_l2_generators is empty".to_string(),
                ));
            }

            let perp_market = self
                .market_provider
                .get_perp_market(market_index)
                .ok_or_else(|| SdkError::MarketNotFound(market_index.to_string()))?;

            let num_orders = num_vamm_orders.unwrap_or(depth);
            let vamm_generator = VammL2Generator::new(
                &perp_market,
                &oracle_price_data,
                num_orders,
                None,
                None,
            )?;
            fallback_l2_generators = vec![Box::new(vamm_generator)];
        }

        let slot = self.slot_source.get_slot();
        let mut dlob = self.dlob.lock().await.dlob.clone();
        Ok(dlob.get_l2(
            market_index,
            &market_type,
            slot,
            &oracle_price_data,
            depth,
            &mut fallback_l2_generators,
        ))
    }

    pub async fn get_l3(&self, market_index: u16, market_type: MarketType) -> SdkResult<L3OrderBook> {
        let oracle_price_data = self
            .market_provider
            .get_oracle_price_data(market_type, market_index)
            .ok_or_else(|| SdkError::MarketNotFound(market_index.to_string()))?;

        let slot = self.slot_source.get_slot();
        let mut dlob = self.dlob.lock().await.dlob.clone();
        Ok(dlob.get_l3(market_index, &market_type, slot, &oracle_price_data))
    }

    /// Resting-limit orders paired with their owning user account pubkey,
    /// for callers that need the actual `Order` struct rather than an L3
    /// projection of it (the `/orders/idl*` borsh codec).
    pub async fn get_orders_raw(
        &self,
        market_index: u16,
        market_type: MarketType,
    ) -> SdkResult<(Vec<(Pubkey, Order)>, Vec<(Pubkey, Order)>, u64)> {
        let oracle_price_data = self
            .market_provider
            .get_oracle_price_data(market_type, market_index)
            .ok_or_else(|| SdkError::MarketNotFound(market_index.to_string()))?;

        let slot = self.slot_source.get_slot();
        let mut dlob = self.dlob.lock().await.dlob.clone();

        let bids = dlob
            .get_resting_limit_bids(slot, &market_type, market_index, &oracle_price_data)
            .iter()
            .map(|node| (node.get_user_account(), *node.get_order()))
            .collect();
        let asks = dlob
            .get_resting_limit_asks(slot, &market_type, market_index, &oracle_price_data)
            .iter()
            .map(|node| (node.get_user_account(), *node.get_order()))
            .collect();

        Ok((bids, asks, slot))
    }

    pub fn unsubscribe(&self) {
        self.running.store(false, std::sync::atomic::Ordering::SeqCst);
    }
}

#[derive(Debug, Clone)]
struct TickError(String);

impl crate::event_emitter::Event for TickError {
    fn box_clone(&self) -> Box<dyn crate::event_emitter::Event> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
