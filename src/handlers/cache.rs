// src/handlers/cache.rs
use log::info;
use serde_json::json;
use std::sync::Arc;
use warp::reply::Json;
use warp::Rejection;

use super::AppState;

pub async fn clear_cache(state: Arc<AppState>) -> Result<Json, Rejection> {
    state.cache.clear().await;
    info!("Response cache cleared");
    Ok(warp::reply::json(&json!({
        "success": true,
        "message": "Cache cleared",
    })))
}

pub async fn cache_stats(state: Arc<AppState>) -> Result<Json, Rejection> {
    let stats = state.cache.stats().await;
    Ok(warp::reply::json(&json!({
        "success": true,
        "stats": stats,
    })))
}
