use drift::{
    controller::position::PositionDirection,
    state::{
        oracle::OraclePriceData,
        user::{Order, OrderStatus, OrderTriggerCondition, OrderType},
    },
};

use crate::math::auction::{get_auction_price, is_auction_complete};

/// Effective price the book builder sorts an order by: the resolved auction
/// price while an order is mid-auction, the oracle-offset price for
/// floating-limit orders, the caller-supplied fallback for zero-price
/// market orders, otherwise the order's own static limit price.
pub fn get_limit_price(
    order: &Order,
    oracle_price_data: &OraclePriceData,
    slot: u64,
    fallback_price: Option<u64>,
) -> Option<u64> {
    if has_auction_price(order, slot) {
        let price = get_auction_price(order, slot, oracle_price_data.price)
            .max(0)
            .try_into()
            .unwrap_or(0);
        Some(price)
    } else if order.oracle_price_offset != 0 {
        let price = (oracle_price_data.price as i128 + order.oracle_price_offset as i128)
            .max(0)
            .try_into()
            .unwrap_or(0);
        Some(price)
    } else if order.price == 0 {
        fallback_price
    } else {
        Some(order.price)
    }
}

fn has_auction_price(order: &Order, slot: u64) -> bool {
    !is_auction_complete(order, slot)
        && (order.auction_start_price != 0 || order.auction_end_price != 0)
}

pub fn is_order_expired(
    order: &Order,
    ts: i64,
    enforce_buffer: Option<bool>,
    buffer_seconds: Option<i64>,
) -> bool {
    let enforce_buffer = enforce_buffer.unwrap_or(false);
    let buffer_seconds = buffer_seconds.unwrap_or(15);

    if must_be_triggered(order) || OrderStatus::Open != order.status || order.max_ts == 0 {
        return false;
    }

    let max_ts = if enforce_buffer && order.is_limit_order() {
        order.max_ts + buffer_seconds
    } else {
        order.max_ts
    };

    ts > max_ts
}

pub fn must_be_triggered(order: &Order) -> bool {
    matches!(
        order.order_type,
        OrderType::TriggerMarket | OrderType::TriggerLimit
    )
}

pub fn is_triggered(order: &Order) -> bool {
    matches!(
        order.trigger_condition,
        OrderTriggerCondition::TriggeredAbove | OrderTriggerCondition::TriggeredBelow
    )
}

pub fn is_resting_limit_order(order: &Order, slot: u64) -> bool {
    if !order.is_limit_order() {
        return false;
    }

    if order.order_type == OrderType::TriggerLimit {
        return match order.direction {
            PositionDirection::Long if order.trigger_price < order.price => false,
            PositionDirection::Short if order.trigger_price > order.price => false,
            _ => is_auction_complete(order, slot),
        };
    };

    order.post_only || is_auction_complete(order, slot)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_order() -> Order {
        Order {
            order_type: OrderType::Limit,
            price: 100,
            post_only: true,
            status: OrderStatus::Open,
            ..Default::default()
        }
    }

    #[test]
    fn resting_limit_requires_post_only_or_completed_auction() {
        let order = base_order();
        assert!(is_resting_limit_order(&order, 0));

        let taking = Order {
            post_only: false,
            auction_duration: 10,
            slot: 5,
            ..base_order()
        };
        assert!(!is_resting_limit_order(&taking, 6)); // still mid-auction
        assert!(is_resting_limit_order(&taking, 20)); // auction over
    }

    #[test]
    fn trigger_limit_direction_gates_resting_classification() {
        let long_above_trigger = Order {
            order_type: OrderType::TriggerLimit,
            direction: PositionDirection::Long,
            price: 100,
            trigger_price: 50,
            ..base_order()
        };
        assert!(!is_resting_limit_order(&long_above_trigger, 0));
    }

    #[test]
    fn expired_requires_open_status_and_nonzero_max_ts() {
        let mut order = base_order();
        order.max_ts = 100;
        assert!(is_order_expired(&order, 101, None, None));
        assert!(!is_order_expired(&order, 99, None, None));

        order.max_ts = 0;
        assert!(!is_order_expired(&order, 1_000_000, None, None));
    }
}
