use axum::extract::{Query, State};
use axum::Json;
use serde_json::json;

use crate::error::ApiResult;
use dlob_sdk::dlob::MarketProvider;
use crate::json::{l3_level_json, oracle_json};
use crate::market_query::resolve_market;
use crate::routes::l2::MarketParams;
use crate::state::AppState;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct L3Params {
    #[serde(flatten)]
    pub market: MarketParams,
    #[serde(rename = "includeOracle")]
    pub include_oracle: Option<bool>,
}

pub async fn l3(State(state): State<AppState>, Query(params): Query<L3Params>) -> ApiResult<Json<serde_json::Value>> {
    let selector = resolve_market(
        &state.market_registry,
        params.market.market_name.as_deref(),
        params.market.market_type.as_deref(),
        params.market.market_index.as_deref(),
    )?;

    let book = state.dlob.get_l3(selector.market_index, selector.market_type).await?;

    let mut body = json!({
        "bids": book.bids.iter().map(l3_level_json).collect::<Vec<_>>(),
        "asks": book.asks.iter().map(l3_level_json).collect::<Vec<_>>(),
        "slot": book.slot,
    });

    if params.include_oracle.unwrap_or(false) {
        let oracle = state
            .market_provider
            .get_oracle_price_data(selector.market_type, selector.market_index)
            .ok_or_else(|| crate::error::ApiError::ClientValidation("oracle unavailable for market".to_string()))?;
        body["oracle"] = oracle_json(&oracle);
    }

    Ok(Json(body))
}
