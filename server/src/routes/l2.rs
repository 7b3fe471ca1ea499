use axum::extract::{Query, State};
use axum::Json;
use dlob_sdk::dlob::fallback::{phoenix_generator, serum_generator};
use dlob_sdk::dlob::order_book_levels::{L2OrderBook, L2OrderBookGenerator};
use dlob_sdk::dlob::MarketProvider;
use drift::state::user::MarketType;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{ApiError, ApiResult};
use crate::grouping::group_levels;
use crate::json::{l2_level_json, oracle_json};
use crate::market_query::{batch_len, resolve_market, MarketSelector};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MarketParams {
    #[serde(rename = "marketName")]
    pub market_name: Option<String>,
    #[serde(rename = "marketType")]
    pub market_type: Option<String>,
    #[serde(rename = "marketIndex")]
    pub market_index: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct L2Params {
    #[serde(flatten)]
    pub market: MarketParams,
    pub depth: Option<i64>,
    #[serde(rename = "numVammOrders")]
    pub num_vamm_orders: Option<usize>,
    #[serde(rename = "includeVamm")]
    pub include_vamm: Option<bool>,
    #[serde(rename = "includePhoenix")]
    pub include_phoenix: Option<bool>,
    #[serde(rename = "includeSerum")]
    pub include_serum: Option<bool>,
    pub grouping: Option<u64>,
    #[serde(rename = "includeOracle")]
    pub include_oracle: Option<bool>,
}

const DEFAULT_DEPTH: i64 = 10;

fn requested_depth(depth: Option<i64>) -> usize {
    match depth {
        Some(d) if d < 0 => usize::MAX,
        Some(d) => d as usize,
        None => DEFAULT_DEPTH as usize,
    }
}

async fn fetch_l2(state: &AppState, selector: MarketSelector, params: &L2Params) -> ApiResult<L2OrderBook> {
    // "isSpot ? false : includeVamm" -- spot markets never draw vAMM liquidity.
    let include_vamm = selector.market_type == MarketType::Perp && params.include_vamm.unwrap_or(false);

    let grouping = params.grouping.filter(|g| *g > 0);
    // depth=-1 ("unlimited") is forced whenever grouping is requested, so the
    // full book is available to bucket before the real depth is applied.
    let depth = if grouping.is_some() { usize::MAX } else { requested_depth(params.depth) };

    let mut fallback_generators: Vec<Box<dyn L2OrderBookGenerator>> = Vec::new();
    if selector.market_type == MarketType::Spot {
        if params.include_phoenix.unwrap_or(false) {
            fallback_generators.push(Box::new(phoenix_generator()));
        }
        if params.include_serum.unwrap_or(false) {
            fallback_generators.push(Box::new(serum_generator()));
        }
    }

    let book = state
        .dlob
        .get_l2(
            selector.market_index,
            selector.market_type,
            depth,
            include_vamm,
            params.num_vamm_orders,
            fallback_generators,
        )
        .await?;

    if let Some(grouping) = grouping {
        let mut bids = group_levels(book.bids, grouping, false);
        let mut asks = group_levels(book.asks, grouping, true);
        let depth = requested_depth(params.depth);
        bids.truncate(depth);
        asks.truncate(depth);
        Ok(L2OrderBook { bids, asks, slot: book.slot })
    } else {
        Ok(book)
    }
}

async fn l2_response(state: &AppState, selector: MarketSelector, params: &L2Params) -> ApiResult<Value> {
    let book = fetch_l2(state, selector, params).await?;

    let mut body = json!({
        "bids": book.bids.iter().map(l2_level_json).collect::<Vec<_>>(),
        "asks": book.asks.iter().map(l2_level_json).collect::<Vec<_>>(),
        "slot": book.slot,
    });

    if params.include_oracle.unwrap_or(false) {
        let oracle = state
            .market_provider
            .get_oracle_price_data(selector.market_type, selector.market_index)
            .ok_or_else(|| ApiError::ClientValidation("oracle unavailable for market".to_string()))?;
        body["oracle"] = oracle_json(&oracle);
    }

    Ok(body)
}

pub async fn l2(State(state): State<AppState>, Query(params): Query<L2Params>) -> ApiResult<Json<Value>> {
    let selector = resolve_market(
        &state.market_registry,
        params.market.market_name.as_deref(),
        params.market.market_type.as_deref(),
        params.market.market_index.as_deref(),
    )?;
    Ok(Json(l2_response(&state, selector, &params).await?))
}

#[derive(Debug, Deserialize)]
pub struct BatchL2Params {
    #[serde(rename = "marketName")]
    pub market_name: Option<Vec<String>>,
    #[serde(rename = "marketType")]
    pub market_type: Option<Vec<String>>,
    #[serde(rename = "marketIndex")]
    pub market_index: Option<Vec<String>>,
    pub depth: Option<Vec<String>>,
    #[serde(rename = "numVammOrders")]
    pub num_vamm_orders: Option<Vec<String>>,
    #[serde(rename = "includeVamm")]
    pub include_vamm: Option<Vec<String>>,
    #[serde(rename = "includePhoenix")]
    pub include_phoenix: Option<Vec<String>>,
    #[serde(rename = "includeSerum")]
    pub include_serum: Option<Vec<String>>,
    pub grouping: Option<Vec<String>>,
    #[serde(rename = "includeOracle")]
    pub include_oracle: Option<Vec<String>>,
}

fn at(list: &Option<Vec<String>>, i: usize) -> Option<String> {
    list.as_ref().and_then(|v| v.get(i)).cloned()
}

pub async fn batch_l2(State(state): State<AppState>, Query(params): Query<BatchL2Params>) -> ApiResult<Json<Value>> {
    let len = batch_len(&[
        params.market_name.as_deref(),
        params.market_type.as_deref(),
        params.market_index.as_deref(),
        params.depth.as_deref(),
        params.num_vamm_orders.as_deref(),
        params.include_vamm.as_deref(),
        params.include_phoenix.as_deref(),
        params.include_serum.as_deref(),
        params.grouping.as_deref(),
        params.include_oracle.as_deref(),
    ])?;

    let mut l2s = Vec::with_capacity(len);
    for i in 0..len {
        let market = MarketParams {
            market_name: at(&params.market_name, i),
            market_type: at(&params.market_type, i),
            market_index: at(&params.market_index, i),
        };
        let single = L2Params {
            market,
            depth: at(&params.depth, i).and_then(|v| v.parse().ok()),
            num_vamm_orders: at(&params.num_vamm_orders, i).and_then(|v| v.parse().ok()),
            include_vamm: at(&params.include_vamm, i).and_then(|v| v.parse().ok()),
            include_phoenix: at(&params.include_phoenix, i).and_then(|v| v.parse().ok()),
            include_serum: at(&params.include_serum, i).and_then(|v| v.parse().ok()),
            grouping: at(&params.grouping, i).and_then(|v| v.parse().ok()),
            include_oracle: at(&params.include_oracle, i).and_then(|v| v.parse().ok()),
        };

        let selector = resolve_market(
            &state.market_registry,
            single.market.market_name.as_deref(),
            single.market.market_type.as_deref(),
            single.market.market_index.as_deref(),
        )?;
        l2s.push(l2_response(&state, selector, &single).await?);
    }

    Ok(Json(json!({ "l2s": l2s })))
}
