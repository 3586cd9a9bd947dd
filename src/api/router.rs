//! Route table for the admin API.
//!
//! Everything nests under `/api/`. The dashboard frontend is served
//! from a different origin, so CORS is open.

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;

pub fn api_router(ctx: ApiContext) -> Router {
    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/scans", get(endpoints::scans::list))
        .route(
            "/users",
            get(endpoints::users::list).post(endpoints::users::create),
        )
        .route(
            "/users/:uid",
            axum::routing::put(endpoints::users::update).delete(endpoints::users::remove),
        )
        .route("/analytics", get(endpoints::analytics::overview))
        .route("/stats", get(endpoints::analytics::stats))
        .with_state(ctx);

    Router::new()
        .nest("/api", api)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
