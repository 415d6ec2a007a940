// src/handlers/health.rs
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use warp::reply::Json;
use warp::Rejection;

use super::AppState;
use crate::services::market::market_today;

pub async fn health(state: Arc<AppState>) -> Result<Json, Rejection> {
    Ok(warp::reply::json(&json!({
        "success": true,
        "message": "Server is healthy",
        "dataSource": state.settings.provider,
        "marketDate": market_today().to_string(),
        "timestamp": Utc::now().to_rfc3339(),
    })))
}
