pub mod health;
pub mod l2;
pub mod l3;
pub mod orders;
pub mod top_makers;

use axum::body::Body;
use axum::http::{Request, Uri};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::rate_limit::rate_limit_middleware;
use crate::state::ServerState;

pub fn build(state: ServerState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/", get(health::health))
        .route("/startup", get(health::startup))
        .route("/orders/json/raw", get(orders::orders_json_raw))
        .route("/orders/json", get(orders::orders_json))
        .route("/orders/idl", get(orders::orders_idl))
        .route("/orders/idlWithSlot", get(orders::orders_idl_with_slot))
        .route("/topMakers", get(top_makers::top_makers))
        .route("/l2", get(l2::l2))
        .route("/batchL2", get(l2::batch_l2))
        .route("/l3", get(l3::l3))
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn(rate_limit_middleware))
        .layer(middleware::from_fn(strip_dlob_prefix))
        .with_state(state)
}

/// Requests behind a load balancer path-routed under `/dlob` arrive with
/// that prefix still attached; strip it before the router ever sees the
/// path. An empty result (bare `/dlob`) becomes `/`.
async fn strip_dlob_prefix(mut req: Request<Body>, next: Next) -> Response {
    let path = req.uri().path();
    if let Some(stripped) = path.strip_prefix("/dlob") {
        let new_path = if stripped.is_empty() { "/" } else { stripped };
        let path_and_query = match req.uri().query() {
            Some(query) => format!("{new_path}?{query}"),
            None => new_path.to_string(),
        };
        if let Ok(path_and_query) = path_and_query.parse() {
            let mut parts = req.uri().clone().into_parts();
            parts.path_and_query = Some(path_and_query);
            if let Ok(new_uri) = Uri::from_parts(parts) {
                *req.uri_mut() = new_uri;
            }
        }
    }
    next.run(req).await
}
