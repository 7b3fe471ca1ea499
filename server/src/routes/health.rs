use axum::extract::State;

use crate::error::ApiError;
use crate::state::AppState;

pub async fn health() -> &'static str {
    "OK"
}

/// `subscribed && provider.size() > 0`. The spec's upstream equivalent also
/// gates on `userStats.size>0`; dropped here because `UserStatsIndex` is a
/// lazy PDA-derivation cache with no independent size signal (see
/// DESIGN.md).
pub async fn startup(State(state): State<AppState>) -> Result<&'static str, ApiError> {
    if state.is_ready() {
        Ok("OK")
    } else {
        Err(ApiError::NotReady)
    }
}
