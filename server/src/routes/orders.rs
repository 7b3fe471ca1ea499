use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use dlob_sdk::dlob::codec::{encode_orders, encode_orders_with_slot};
use dlob_sdk::dlob::MarketProvider;
use dlob_sdk::usermap::DlobProvider;
use drift::state::user::{Order, OrderStatus};
use serde::Deserialize;
use serde_json::{json, Value};
use solana_sdk::pubkey::Pubkey;

use crate::error::{ApiError, ApiResult};
use crate::json::{oracle_json, order_named_json, order_raw_json};
use crate::market_query::resolve_market;
use crate::routes::l2::MarketParams;
use crate::state::AppState;

pub async fn orders_json_raw(State(state): State<AppState>) -> Json<Value> {
    orders_json_body(&state, order_raw_json).await
}

pub async fn orders_json(State(state): State<AppState>) -> Json<Value> {
    orders_json_body(&state, order_named_json).await
}

async fn orders_json_body(state: &AppState, render: fn(&solana_sdk::pubkey::Pubkey, &drift::state::user::Order) -> Value) -> Json<Value> {
    let mut orders = Vec::new();
    for (pubkey, user) in state.provider.user_accounts() {
        for order in user.orders.iter() {
            if order.status == OrderStatus::Init {
                continue;
            }
            orders.push(render(&pubkey, order));
        }
    }

    let mut oracles = Vec::new();
    for market in state.market_registry.all() {
        if let Some(price) = state.market_provider.get_oracle_price_data(market.market_type, market.market_index) {
            oracles.push(json!({
                "marketType": format!("{:?}", market.market_type),
                "marketIndex": market.market_index,
                "oracle": oracle_json(&price),
            }));
        }
    }

    Json(json!({
        "slot": state.current_slot(),
        "oracles": oracles,
        "orders": orders,
    }))
}

type RawOrders = Vec<(Pubkey, Order)>;

async fn collect_orders_raw_all(state: &AppState) -> ApiResult<(RawOrders, RawOrders, u64)> {
    let mut bids = Vec::new();
    let mut asks = Vec::new();
    let mut slot = 0;

    for market in state.market_registry.all() {
        match state.dlob.get_orders_raw(market.market_index, market.market_type).await {
            Ok((market_bids, market_asks, market_slot)) => {
                slot = slot.max(market_slot);
                bids.extend(market_bids);
                asks.extend(market_asks);
            }
            Err(e) => log::warn!("skipping market {:?}/{} in /orders/idl: {e}", market.market_type, market.market_index),
        }
    }

    Ok((bids, asks, slot))
}

pub async fn orders_idl(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let (bids, asks, _slot) = collect_orders_raw_all(&state).await?;
    let bytes = encode_orders(&bids, &asks).map_err(|e| ApiError::ClientValidation(e.to_string()))?;
    Ok(bytes)
}

#[derive(Debug, Deserialize)]
pub struct OrdersIdlParams {
    #[serde(flatten)]
    pub market: MarketParams,
}

pub async fn orders_idl_with_slot(
    State(state): State<AppState>,
    Query(params): Query<OrdersIdlParams>,
) -> ApiResult<Json<Value>> {
    let has_filter = params.market.market_name.is_some()
        || params.market.market_type.is_some()
        || params.market.market_index.is_some();

    let (bids, asks, slot) = if has_filter {
        let selector = resolve_market(
            &state.market_registry,
            params.market.market_name.as_deref(),
            params.market.market_type.as_deref(),
            params.market.market_index.as_deref(),
        )?;
        state.dlob.get_orders_raw(selector.market_index, selector.market_type).await?
    } else {
        collect_orders_raw_all(&state).await?
    };

    let bytes = encode_orders_with_slot(slot, &bids, &asks).map_err(|e| ApiError::ClientValidation(e.to_string()))?;

    Ok(Json(json!({
        "slot": slot,
        "data": STANDARD.encode(bytes),
    })))
}
