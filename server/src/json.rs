use dlob_sdk::dlob::order_book_levels::{L2Level, L3Level, LiquiditySource};
use drift::state::oracle::OraclePriceData;
use drift::state::user::Order;
use serde_json::{json, Value};

fn source_name(source: LiquiditySource) -> &'static str {
    match source {
        LiquiditySource::Dlob => "dlob",
        LiquiditySource::Vamm => "vamm",
        LiquiditySource::Phoenix => "phoenix",
        LiquiditySource::Serum => "serum",
    }
}

/// Big integers as decimal strings, enums as names -- the `/l2`, `/l3` and
/// `/orders/json` (non-raw) serialization rule throughout this module.
pub fn l2_level_json(level: &L2Level) -> Value {
    let mut sources = serde_json::Map::new();
    for (source, size) in &level.sources {
        sources.insert(source_name(*source).to_string(), json!(size.to_string()));
    }
    json!({
        "price": level.price.to_string(),
        "size": level.size.to_string(),
        "sources": sources,
    })
}

pub fn l3_level_json(level: &L3Level) -> Value {
    json!({
        "price": level.price.to_string(),
        "size": level.size.to_string(),
        "maker": level.maker.to_string(),
        "orderId": level.order_id,
    })
}

/// `/orders/json/raw`: numeric fields verbatim, exactly as they sit in the
/// account. Deliberately leaks the chain's native integer widths into JSON
/// -- existing wire-compatible clients depend on this, not on the
/// stringified form `/orders/json` uses.
pub fn order_raw_json(user: &solana_sdk::pubkey::Pubkey, order: &Order) -> Value {
    json!({
        "user": user.to_string(),
        "order": {
            "orderId": order.order_id,
            "userOrderId": order.user_order_id,
            "marketType": format!("{:?}", order.market_type),
            "marketIndex": order.market_index,
            "status": format!("{:?}", order.status),
            "orderType": format!("{:?}", order.order_type),
            "direction": format!("{:?}", order.direction),
            "price": order.price,
            "triggerPrice": order.trigger_price,
            "oraclePriceOffset": order.oracle_price_offset,
            "baseAssetAmount": order.base_asset_amount,
            "baseAssetAmountFilled": order.base_asset_amount_filled,
            "quoteAssetAmountFilled": order.quote_asset_amount_filled,
            "slot": order.slot,
            "auctionStartPrice": order.auction_start_price,
            "auctionEndPrice": order.auction_end_price,
            "auctionDuration": order.auction_duration,
            "maxTs": order.max_ts,
            "triggerCondition": format!("{:?}", order.trigger_condition),
            "postOnly": order.post_only,
            "reduceOnly": order.reduce_only,
            "immediateOrCancel": order.immediate_or_cancel,
            "existingPositionDirection": format!("{:?}", order.existing_position_direction),
        },
    })
}

/// `/orders/json`: same order, bigints stringified, enums named -- the
/// pairing `order_raw_json` deliberately does not apply.
pub fn order_named_json(user: &solana_sdk::pubkey::Pubkey, order: &Order) -> Value {
    json!({
        "user": user.to_string(),
        "order": {
            "orderId": order.order_id,
            "userOrderId": order.user_order_id,
            "marketType": format!("{:?}", order.market_type),
            "marketIndex": order.market_index,
            "status": format!("{:?}", order.status),
            "orderType": format!("{:?}", order.order_type),
            "direction": format!("{:?}", order.direction),
            "price": order.price.to_string(),
            "triggerPrice": order.trigger_price.to_string(),
            "oraclePriceOffset": order.oracle_price_offset.to_string(),
            "baseAssetAmount": order.base_asset_amount.to_string(),
            "baseAssetAmountFilled": order.base_asset_amount_filled.to_string(),
            "quoteAssetAmountFilled": order.quote_asset_amount_filled.to_string(),
            "slot": order.slot.to_string(),
            "auctionStartPrice": order.auction_start_price.to_string(),
            "auctionEndPrice": order.auction_end_price.to_string(),
            "auctionDuration": order.auction_duration,
            "maxTs": order.max_ts.to_string(),
            "triggerCondition": format!("{:?}", order.trigger_condition),
            "postOnly": order.post_only,
            "reduceOnly": order.reduce_only,
            "immediateOrCancel": order.immediate_or_cancel,
            "existingPositionDirection": format!("{:?}", order.existing_position_direction),
        },
    })
}

pub fn oracle_json(data: &OraclePriceData) -> Value {
    json!({
        "price": data.price.to_string(),
        "confidence": data.confidence.to_string(),
        "hasSufficientNumberOfDataPoints": data.has_sufficient_number_of_data_points,
    })
}
