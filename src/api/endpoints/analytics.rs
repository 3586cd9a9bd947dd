//! Server-side analytics: runs the aggregation pipeline over fresh
//! snapshots of both collections.

use axum::extract::State;
use axum::Json;
use chrono::Utc;

use crate::analytics::{self, DashboardStats, DerivedViews};
use crate::api::endpoints::{scans, users};
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::store::{SCANS, USERS};

/// `GET /api/analytics` — all derived views plus summary metrics.
///
/// The two snapshot reads are independent (disjoint collections, both
/// read-only) and run concurrently.
pub async fn overview(State(ctx): State<ApiContext>) -> Result<Json<DerivedViews>, ApiError> {
    let (scan_docs, user_docs) =
        tokio::join!(ctx.store.get_all(SCANS), ctx.store.get_all(USERS));

    let scan_docs = scan_docs.map_err(|e| ApiError::fetch("scans", e))?;
    let user_docs = user_docs.map_err(|e| ApiError::fetch("users", e))?;

    let scan_list = scans::decode_scans(scan_docs);
    let user_list = users::decode_users(user_docs);

    Ok(Json(analytics::derive(&scan_list, &user_list)))
}

/// `GET /api/stats` — headline numbers for the dashboard cards.
pub async fn stats(State(ctx): State<ApiContext>) -> Result<Json<DashboardStats>, ApiError> {
    let (scan_docs, user_docs) =
        tokio::join!(ctx.store.get_all(SCANS), ctx.store.get_all(USERS));

    let scan_docs = scan_docs.map_err(|e| ApiError::fetch("scans", e))?;
    let user_docs = user_docs.map_err(|e| ApiError::fetch("users", e))?;

    let scan_list = scans::decode_scans(scan_docs);
    let user_list = users::decode_users(user_docs);

    Ok(Json(analytics::dashboard_stats(
        &scan_list,
        &user_list,
        Utc::now(),
    )))
}
