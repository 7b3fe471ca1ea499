use axum::extract::{Query, State};
use axum::Json;
use dlob_sdk::dlob::top_makers::{top_makers as aggregate_top_makers, MakerStatsLookup};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{ApiError, ApiResult};
use crate::market_query::resolve_market;
use crate::routes::l2::MarketParams;
use crate::state::AppState;

const DEFAULT_LIMIT: usize = 10;

#[derive(Debug, Deserialize)]
pub struct TopMakersParams {
    #[serde(flatten)]
    pub market: MarketParams,
    pub side: String,
    pub limit: Option<usize>,
    #[serde(rename = "includeUserStats")]
    pub include_user_stats: Option<bool>,
}

pub async fn top_makers(
    State(state): State<AppState>,
    Query(params): Query<TopMakersParams>,
) -> ApiResult<Json<Value>> {
    let selector = resolve_market(
        &state.market_registry,
        params.market.market_name.as_deref(),
        params.market.market_type.as_deref(),
        params.market.market_index.as_deref(),
    )?;

    let side = params.side.to_ascii_lowercase();
    if side != "bid" && side != "ask" {
        return Err(ApiError::ClientValidation(format!("invalid side: {side}")));
    }
    let book = state.dlob.get_l3(selector.market_index, selector.market_type).await?;
    let levels = if side == "bid" { book.bids } else { book.asks };

    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);
    let include_user_stats = params.include_user_stats.unwrap_or(false);
    let stats: Option<&dyn MakerStatsLookup> = if include_user_stats {
        Some(&state.user_stats_index)
    } else {
        None
    };

    let makers = aggregate_top_makers(&levels, limit, stats);

    let body = if include_user_stats {
        json!(makers
            .iter()
            .map(|m| json!([m.maker.to_string(), m.user_stats.map(|p| p.to_string())]))
            .collect::<Vec<_>>())
    } else {
        json!(makers.iter().map(|m| m.maker.to_string()).collect::<Vec<_>>())
    };

    Ok(Json(body))
}
