#![allow(clippy::module_inception)]

use std::any::Any;
use std::collections::BinaryHeap;
use std::ops::Sub;

use drift::state::oracle::OraclePriceData;
use drift::state::user::{MarketType, Order, OrderStatus, User as UserAccount};
use rayon::prelude::*;
use solana_sdk::pubkey::Pubkey;

use crate::event_emitter::Event;
use crate::math::order::{is_order_expired, is_resting_limit_order};

use super::dlob_node::{
    create_node, get_order_signature, DLOBNode, DirectionalNode, NodeType, OrderNode, SubType,
};
use super::market::{get_node_subtype_and_type, Exchange};
use super::order_book_levels::{
    create_l2_levels, get_l2_generator_from_dlob_nodes, merge_l2_level_generators, L2OrderBook,
    L2OrderBookGenerator, L3Level, L3OrderBook,
};

/// Rebuilds a snapshot of the order book from a user-account stream each
/// tick. Orders are partitioned per market into resting/floating/taking/
/// trigger buckets at insert time (`market::get_node_subtype_and_type`);
/// L2/L3 queries read only the resting and floating-limit buckets, which is
/// what keeps an order that's still mid-auction, a pure market order, or an
/// untriggered conditional order out of the published book.
///
/// Fill-matching (crossing resting orders against each other or against
/// fallback liquidity to find what a filler bot should execute next) is
/// deliberately not implemented: this is a read-only market-data view, not
/// an execution engine, so the parts of the upstream DLOB that decide what
/// to fill are out of scope here.
#[derive(Clone, Default)]
pub struct DLOB {
    exchange: Exchange,
    initialized: bool,
    max_slot_for_resting_limit_orders: u64,
}

impl DLOB {
    pub fn new() -> DLOB {
        DLOB {
            exchange: Exchange::new(),
            initialized: true,
            max_slot_for_resting_limit_orders: 0,
        }
    }

    pub fn clear(&mut self) {
        self.exchange.clear();
        self.initialized = false;
        self.max_slot_for_resting_limit_orders = 0;
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Rebuilds the book wholesale from the current set of user accounts.
    /// `accounts` is any snapshot of `(pubkey, account)` pairs -- both the
    /// full `UserMap` and the compact `OrderSubscriber` provider feed this
    /// the same way, via the shared `DlobProvider` trait.
    pub fn build_from_accounts<I>(&mut self, accounts: I, slot: u64, now: i64)
    where
        I: IntoParallelIterator<Item = (Pubkey, UserAccount)>,
    {
        self.clear();
        accounts.into_par_iter().for_each(|(user_pubkey, user)| {
            for order in user.orders.iter() {
                if order.status == OrderStatus::Init || is_order_expired(order, now, None, None) {
                    continue;
                }
                self.insert_order(order, user_pubkey, slot);
            }
        });
        self.initialized = true;
    }

    pub fn size(&self) -> (usize, usize) {
        (self.exchange.perp_size(), self.exchange.spot_size())
    }

    pub fn insert_order(&self, order: &Order, user_account: Pubkey, slot: u64) {
        let market_index = order.market_index;
        let (sub_type, node_type) = get_node_subtype_and_type(order, slot);
        let node = create_node(*order, user_account);

        self.exchange
            .add_market_indempotent(&order.market_type, market_index);

        let map = match order.market_type {
            MarketType::Perp => &self.exchange.perp,
            MarketType::Spot => &self.exchange.spot,
        };
        let mut market = map.get_mut(&market_index).expect("market just inserted");
        let order_list = market.get_order_list_for_node_insert(node_type);

        match sub_type {
            SubType::Bid => order_list.insert_bid(node),
            SubType::Ask => order_list.insert_ask(node),
            other => {
                log::debug!("order {} parked as trigger side {other:?}", order.order_id);
            }
        }
    }

    pub fn get_order(&self, order_id: u32, user_account: Pubkey) -> Option<Order> {
        let signature = get_order_signature(order_id, user_account);
        for order_list in self.exchange.get_order_lists() {
            if let Some(node) = order_list.get_node(&signature) {
                return Some(*node.get_order());
            }
        }
        None
    }

    fn update_resting_limit_orders_for_market_type(&mut self, slot: u64, market_type: MarketType) {
        let map = match market_type {
            MarketType::Perp => &self.exchange.perp,
            MarketType::Spot => &self.exchange.spot,
        };

        for mut market_ref in map.iter_mut() {
            let market = market_ref.value_mut();

            let mut still_taking_bids: BinaryHeap<DirectionalNode> = BinaryHeap::new();
            while let Some(bid) = market.taking_limit_orders.get_best_bid() {
                if is_resting_limit_order(bid.get_order(), slot) {
                    market.resting_limit_orders.insert_bid(bid);
                } else {
                    still_taking_bids.push(DirectionalNode::new(bid));
                }
            }
            market.taking_limit_orders.bids = still_taking_bids;

            let mut still_taking_asks: BinaryHeap<DirectionalNode> = BinaryHeap::new();
            while let Some(ask) = market.taking_limit_orders.get_best_ask() {
                if is_resting_limit_order(ask.get_order(), slot) {
                    market.resting_limit_orders.insert_ask(ask);
                } else {
                    still_taking_asks.push(DirectionalNode::new(ask));
                }
            }
            market.taking_limit_orders.asks = still_taking_asks;
        }
    }

    pub fn update_resting_limit_orders(&mut self, slot: u64) {
        if slot <= self.max_slot_for_resting_limit_orders {
            return;
        }
        self.max_slot_for_resting_limit_orders = slot;

        self.update_resting_limit_orders_for_market_type(slot, MarketType::Perp);
        self.update_resting_limit_orders_for_market_type(slot, MarketType::Spot);
    }

    pub fn get_best_orders(
        &self,
        market_type: &MarketType,
        sub_type: SubType,
        node_type: NodeType,
        market_index: u16,
    ) -> Vec<OrderNode> {
        let map = match market_type {
            MarketType::Perp => &self.exchange.perp,
            MarketType::Spot => &self.exchange.spot,
        };
        let Some(market) = map.get(&market_index) else {
            return Vec::new();
        };
        let mut order_list = market.get_order_list_for_node_type(node_type);

        let mut best_orders = Vec::new();
        match sub_type {
            SubType::Bid => {
                while let Some(node) = order_list.get_best_bid() {
                    best_orders.push(node);
                }
            }
            SubType::Ask => {
                while let Some(node) = order_list.get_best_ask() {
                    best_orders.push(node);
                }
            }
            _ => {}
        }
        best_orders
    }

    /// Only orders whose auction has completed and whose effective price
    /// sits on the passive side of the oracle price are eligible to rest:
    /// asks at or above it, bids at or below it. An ask quoted under the
    /// oracle (or a bid over it) would cross the oracle itself, so it isn't
    /// a passive maker order.
    pub fn get_resting_limit_asks(
        &mut self,
        slot: u64,
        market_type: &MarketType,
        market_index: u16,
        oracle_price_data: &OraclePriceData,
    ) -> Vec<OrderNode> {
        self.update_resting_limit_orders(slot);

        let mut orders =
            self.get_best_orders(market_type, SubType::Ask, NodeType::RestingLimit, market_index);
        orders.extend(self.get_best_orders(
            market_type,
            SubType::Ask,
            NodeType::FloatingLimit,
            market_index,
        ));

        orders.retain(|node| node.get_price(oracle_price_data, slot) >= oracle_price_data.price as u64);
        orders.sort_by_key(|node| node.get_price(oracle_price_data, slot));
        orders
    }

    pub fn get_resting_limit_bids(
        &mut self,
        slot: u64,
        market_type: &MarketType,
        market_index: u16,
        oracle_price_data: &OraclePriceData,
    ) -> Vec<OrderNode> {
        self.update_resting_limit_orders(slot);

        let mut orders =
            self.get_best_orders(market_type, SubType::Bid, NodeType::RestingLimit, market_index);
        orders.extend(self.get_best_orders(
            market_type,
            SubType::Bid,
            NodeType::FloatingLimit,
            market_index,
        ));

        orders.retain(|node| node.get_price(oracle_price_data, slot) <= oracle_price_data.price as u64);
        orders.sort_by_key(|node| std::cmp::Reverse(node.get_price(oracle_price_data, slot)));
        orders
    }

    #[allow(clippy::too_many_arguments)]
    pub fn get_l2(
        &mut self,
        market_index: u16,
        market_type: &MarketType,
        slot: u64,
        oracle_price_data: &OraclePriceData,
        depth: usize,
        fallback_l2_generators: &mut [Box<dyn L2OrderBookGenerator>],
    ) -> L2OrderBook {
        let asks = self.get_resting_limit_asks(slot, market_type, market_index, oracle_price_data);
        let maker_ask_generator: Box<dyn Iterator<Item = _>> = Box::new(
            get_l2_generator_from_dlob_nodes(asks.into_iter(), *oracle_price_data, slot),
        );

        let mut ask_generators = vec![maker_ask_generator];
        for generator in fallback_l2_generators.iter_mut() {
            ask_generators.push(generator.get_l2_asks());
        }
        let merged_asks = merge_l2_level_generators(ask_generators, |a, b| a.price < b.price);
        let asks = create_l2_levels(merged_asks, depth);

        let bids = self.get_resting_limit_bids(slot, market_type, market_index, oracle_price_data);
        let maker_bid_generator: Box<dyn Iterator<Item = _>> = Box::new(
            get_l2_generator_from_dlob_nodes(bids.into_iter(), *oracle_price_data, slot),
        );

        let mut bid_generators = vec![maker_bid_generator];
        for generator in fallback_l2_generators.iter_mut() {
            bid_generators.push(generator.get_l2_bids());
        }
        let merged_bids = merge_l2_level_generators(bid_generators, |a, b| a.price > b.price);
        let bids = create_l2_levels(merged_bids, depth);

        L2OrderBook { asks, bids, slot }
    }

    pub fn get_l3(
        &mut self,
        market_index: u16,
        market_type: &MarketType,
        slot: u64,
        oracle_price_data: &OraclePriceData,
    ) -> L3OrderBook {
        let to_level = |node: &OrderNode| L3Level {
            price: node.get_price(oracle_price_data, slot),
            size: node
                .get_order()
                .base_asset_amount
                .sub(node.get_order().base_asset_amount_filled),
            maker: node.get_user_account(),
            order_id: node.get_order().order_id,
        };

        let asks = self
            .get_resting_limit_asks(slot, market_type, market_index, oracle_price_data)
            .iter()
            .map(to_level)
            .collect();

        let bids = self
            .get_resting_limit_bids(slot, market_type, market_index, oracle_price_data)
            .iter()
            .map(to_level)
            .collect();

        L3OrderBook { asks, bids, slot }
    }
}

impl Event for DLOB {
    fn box_clone(&self) -> Box<dyn Event> {
        Box::new((*self).clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drift::math::constants::PRICE_PRECISION_U64;
    use drift::state::user::OrderType;

    #[test]
    fn insert_and_lookup_round_trips_by_order_id() {
        let dlob = DLOB::new();
        let user_account = Pubkey::new_unique();

        let orders = [
            Order {
                order_id: 1,
                slot: 1,
                market_index: 0,
                market_type: MarketType::Perp,
                ..Default::default()
            },
            Order {
                order_id: 2,
                oracle_price_offset: 1,
                market_index: 0,
                market_type: MarketType::Perp,
                ..Default::default()
            },
            Order {
                order_id: 3,
                slot: 3,
                market_index: 0,
                market_type: MarketType::Perp,
                ..Default::default()
            },
        ];

        for order in &orders {
            dlob.insert_order(order, user_account, order.slot);
        }

        for order in &orders {
            assert!(dlob.get_order(order.order_id, user_account).is_some());
        }
        assert!(dlob.get_order(99, user_account).is_none());
    }

    #[test]
    fn best_orders_come_out_in_ascending_slot_order() {
        let dlob = DLOB::new();
        let user_account = Pubkey::new_unique();

        for (order_id, slot) in [(1u32, 1u64), (2, 2), (3, 3), (4, 4), (5, 5)] {
            let order = Order {
                order_id,
                slot,
                market_index: 0,
                direction: drift::controller::position::PositionDirection::Long,
                market_type: MarketType::Perp,
                auction_duration: 1,
                ..Default::default()
            };
            dlob.insert_order(&order, user_account, slot);
        }

        let best = dlob.get_best_orders(&MarketType::Perp, SubType::Bid, NodeType::TakingLimit, 0);
        let slots: Vec<_> = best.iter().map(|n| n.get_order().slot).collect();
        assert_eq!(slots, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn taking_orders_promote_to_resting_once_auction_completes() {
        let mut dlob = DLOB::new();
        let user_account = Pubkey::new_unique();

        let order = Order {
            order_id: 1,
            slot: 1,
            market_index: 0,
            direction: drift::controller::position::PositionDirection::Long,
            market_type: MarketType::Perp,
            auction_duration: 1,
            ..Default::default()
        };
        dlob.insert_order(&order, user_account, 1);

        assert_eq!(
            dlob.exchange.perp.get(&0).unwrap().taking_limit_orders.len(),
            1
        );

        dlob.update_resting_limit_orders(5);

        let market = dlob.exchange.perp.get(&0).unwrap();
        assert_eq!(market.taking_limit_orders.len(), 0);
        assert_eq!(market.resting_limit_orders.len(), 1);
    }

    #[test]
    fn resting_asks_surface_only_once_their_auction_completes() {
        let mut dlob = DLOB::new();
        let oracle_price_data = OraclePriceData {
            price: 12 * PRICE_PRECISION_U64 as i64,
            confidence: 1,
            delay: 0,
            has_sufficient_number_of_data_points: true,
        };
        let user_account = Pubkey::new_unique();

        for (order_id, slot, price) in [(1u32, 1u64, 12u64), (2, 11, 13), (3, 21, 14)] {
            let order = Order {
                order_id,
                slot,
                market_index: 0,
                direction: drift::controller::position::PositionDirection::Short,
                market_type: MarketType::Perp,
                order_type: OrderType::Limit,
                auction_duration: 10,
                price: price * PRICE_PRECISION_U64,
                ..Default::default()
            };
            dlob.insert_order(&order, user_account, slot);
        }

        let asks = dlob.get_resting_limit_asks(1, &MarketType::Perp, 0, &oracle_price_data);
        assert_eq!(asks.len(), 0);

        let asks = dlob.get_resting_limit_asks(12, &MarketType::Perp, 0, &oracle_price_data);
        assert_eq!(asks.len(), 1);
        assert_eq!(asks[0].get_order().order_id, 1);

        let asks = dlob.get_resting_limit_asks(23, &MarketType::Perp, 0, &oracle_price_data);
        assert_eq!(asks.len(), 2);

        let asks = dlob.get_resting_limit_asks(34, &MarketType::Perp, 0, &oracle_price_data);
        assert_eq!(asks.len(), 3);
        assert_eq!(asks[0].get_order().order_id, 1);
        assert_eq!(asks[2].get_order().order_id, 3);
    }
}
