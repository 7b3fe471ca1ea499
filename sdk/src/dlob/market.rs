use dashmap::DashMap;
use drift::controller::position::PositionDirection;
use drift::state::perp_market::PerpMarket;
use drift::state::spot_market::SpotMarket;
use drift::state::user::{MarketType, Order, OrderTriggerCondition, OrderType};

use crate::math::order::{is_resting_limit_order, is_triggered, must_be_triggered};

use super::dlob_node::{NodeType, SubType};
use super::order_list::Orderlist;

#[derive(Debug, PartialEq, Eq)]
pub enum MarketAccount {
    Perp(PerpMarket),
    Spot(SpotMarket),
}

/// Classifies an order into the (sub_type, node_type) pair that selects
/// which of a market's order lists it belongs in. Trigger orders that
/// haven't fired yet are parked in the `Trigger` list regardless of
/// direction so they never leak into L2/L3 output (see spec invariant:
/// untriggered trigger orders are excluded from the book).
pub fn get_node_subtype_and_type(order: &Order, slot: u64) -> (SubType, NodeType) {
    let is_inactive_trigger_order = must_be_triggered(order) && !is_triggered(order);

    let node_type = if is_inactive_trigger_order {
        NodeType::Trigger
    } else if matches!(
        order.order_type,
        OrderType::Market | OrderType::TriggerMarket | OrderType::Oracle
    ) {
        NodeType::Market
    } else if order.oracle_price_offset != 0 {
        NodeType::FloatingLimit
    } else if is_resting_limit_order(order, slot) {
        NodeType::RestingLimit
    } else {
        NodeType::TakingLimit
    };

    let sub_type = if is_inactive_trigger_order {
        if matches!(order.trigger_condition, OrderTriggerCondition::Above) {
            SubType::Above
        } else {
            SubType::Below
        }
    } else if matches!(order.direction, PositionDirection::Long) {
        SubType::Bid
    } else {
        SubType::Ask
    };

    (sub_type, node_type)
}

/// Per-market order storage, one instance per `(marketType, marketIndex)`.
/// Orders are partitioned by `NodeType` on insert; `resting_limit_orders`
/// and `floating_limit_orders` together make up the book surfaced by
/// `get_l2`/`get_l3`, `taking_limit_orders`/`market_orders` hold orders
/// still mid-auction or without a restable limit price, and
/// `trigger_orders` holds conditional orders that haven't triggered yet.
#[derive(Debug, Clone, Default)]
pub struct MarketOrders {
    pub taking_limit_orders: Orderlist,
    pub resting_limit_orders: Orderlist,
    pub floating_limit_orders: Orderlist,
    pub market_orders: Orderlist,
    pub trigger_orders: Orderlist,
}

impl MarketOrders {
    pub fn get_order_list_for_node_type(&self, node_type: NodeType) -> Orderlist {
        match node_type {
            NodeType::TakingLimit => self.taking_limit_orders.clone(),
            NodeType::RestingLimit => self.resting_limit_orders.clone(),
            NodeType::FloatingLimit => self.floating_limit_orders.clone(),
            NodeType::Market => self.market_orders.clone(),
            NodeType::Trigger => self.trigger_orders.clone(),
        }
    }

    pub fn get_order_list_for_node_insert(&mut self, node_type: NodeType) -> &mut Orderlist {
        match node_type {
            NodeType::TakingLimit => &mut self.taking_limit_orders,
            NodeType::RestingLimit => &mut self.resting_limit_orders,
            NodeType::FloatingLimit => &mut self.floating_limit_orders,
            NodeType::Market => &mut self.market_orders,
            NodeType::Trigger => &mut self.trigger_orders,
        }
    }

    fn size(&self) -> usize {
        self.taking_limit_orders.len()
            + self.resting_limit_orders.len()
            + self.floating_limit_orders.len()
            + self.market_orders.len()
            + self.trigger_orders.len()
    }

    fn all_lists(&self) -> [&Orderlist; 5] {
        [
            &self.taking_limit_orders,
            &self.resting_limit_orders,
            &self.floating_limit_orders,
            &self.market_orders,
            &self.trigger_orders,
        ]
    }
}

/// The set of per-market order books for the whole exchange, keyed
/// separately for perp and spot markets since the two have distinct
/// market-index namespaces on-chain.
#[derive(Clone, Default)]
pub struct Exchange {
    pub perp: DashMap<u16, MarketOrders>,
    pub spot: DashMap<u16, MarketOrders>,
}

impl Exchange {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.perp.clear();
        self.spot.clear();
    }

    pub fn add_market_indempotent(&self, market_type: &MarketType, market_index: u16) {
        let map = match market_type {
            MarketType::Perp => &self.perp,
            MarketType::Spot => &self.spot,
        };
        map.entry(market_index).or_default();
    }

    pub fn perp_size(&self) -> usize {
        self.perp.iter().map(|m| m.value().size()).sum()
    }

    pub fn spot_size(&self) -> usize {
        self.spot.iter().map(|m| m.value().size()).sum()
    }

    pub fn get_order_lists(&self) -> Vec<Orderlist> {
        let mut lists = Vec::new();
        for market in self.perp.iter() {
            lists.extend(market.value().all_lists().into_iter().cloned());
        }
        for market in self.spot.iter() {
            lists.extend(market.value().all_lists().into_iter().cloned());
        }
        lists
    }
}

impl std::fmt::Debug for Exchange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Exchange")
            .field("perp_markets", &self.perp.len())
            .field("spot_markets", &self.spot.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn market_order_has_no_restable_price_classification() {
        let order = Order {
            order_type: OrderType::Market,
            market_type: MarketType::Perp,
            direction: PositionDirection::Long,
            ..Default::default()
        };
        let (sub_type, node_type) = get_node_subtype_and_type(&order, 0);
        assert_eq!(node_type, NodeType::Market);
        assert_eq!(sub_type, SubType::Bid);
    }

    #[test]
    fn untriggered_trigger_order_is_parked_by_condition() {
        let order = Order {
            order_type: OrderType::TriggerLimit,
            trigger_condition: OrderTriggerCondition::Above,
            ..Default::default()
        };
        let (sub_type, node_type) = get_node_subtype_and_type(&order, 0);
        assert_eq!(node_type, NodeType::Trigger);
        assert_eq!(sub_type, SubType::Above);
    }
}
