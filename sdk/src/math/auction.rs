use drift::state::user::Order;

/// Linear interpolation over an order's Dutch auction window.
///
/// Drift orders that start with `auctionStartPrice`/`auctionEndPrice` set
/// walk the price linearly from start to end over `auctionDuration` slots,
/// beginning at `order.slot`. Both trigger and oracle-offset orders can
/// carry an auction; `oracle_price` lets oracle-relative auctions resolve
/// against the live oracle rather than a fixed reference.
pub fn get_auction_price(order: &Order, slot: u64, oracle_price: i64) -> i128 {
    if order.auction_duration == 0 {
        return order.auction_end_price as i128;
    }

    let slots_elapsed = slot.saturating_sub(order.slot);
    if slots_elapsed >= order.auction_duration as u64 {
        return resolve_auction_price(order.auction_end_price, oracle_price);
    }

    let start = resolve_auction_price(order.auction_start_price, oracle_price);
    let end = resolve_auction_price(order.auction_end_price, oracle_price);

    let progress = slots_elapsed as i128;
    let duration = order.auction_duration as i128;

    start + (end - start) * progress / duration
}

/// Oracle-offset auctions store a delta in `auction_start_price` when the
/// sign bit convention flags it; here we treat any auction price as already
/// absolute, matching `Order`'s on-chain representation used by the DLOB
/// (oracle-relative orders apply their offset separately in `get_limit_price`).
fn resolve_auction_price(price: i64, _oracle_price: i64) -> i128 {
    price as i128
}

pub fn is_auction_complete(order: &Order, slot: u64) -> bool {
    if order.auction_duration == 0 {
        return true;
    }
    slot.saturating_sub(order.slot) >= order.auction_duration as u64
}

/// An order becomes eligible for vAMM/external-venue fallback fill once its
/// auction has run for at least `min_auction_duration` slots (orders still
/// mid-auction are reserved for the resting limit book to cross first).
pub fn is_fallback_available_liquidity_source(
    order: &Order,
    min_auction_duration: u8,
    slot: u64,
) -> bool {
    let slots_elapsed = slot.saturating_sub(order.slot);
    slots_elapsed >= min_auction_duration as u64 || is_auction_complete(order, slot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use drift::state::user::Order;

    fn base_order() -> Order {
        Order {
            slot: 100,
            auction_duration: 10,
            auction_start_price: 1_000,
            auction_end_price: 2_000,
            ..Default::default()
        }
    }

    #[test]
    fn interpolates_linearly_mid_auction() {
        let order = base_order();
        let price = get_auction_price(&order, 105, 0);
        assert_eq!(price, 1_500);
    }

    #[test]
    fn clamps_to_end_price_once_complete() {
        let order = base_order();
        assert!(is_auction_complete(&order, 110));
        assert_eq!(get_auction_price(&order, 200, 0), 2_000);
    }

    #[test]
    fn zero_duration_is_immediately_complete() {
        let order = Order {
            slot: 100,
            auction_duration: 0,
            auction_end_price: 42,
            ..Default::default()
        };
        assert!(is_auction_complete(&order, 100));
        assert_eq!(get_auction_price(&order, 100, 0), 42);
    }
}
