// src/handlers/market.rs
use log::{error, info};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use warp::reply::Json;
use warp::Rejection;

use super::error::ApiError;
use super::AppState;
use crate::services::market::get_market_data;

#[derive(Debug, Deserialize)]
pub struct MarketDataQuery {
    pub date: Option<String>,
}

pub async fn get_market(query: MarketDataQuery, state: Arc<AppState>) -> Result<Json, Rejection> {
    let date = match query.date.as_deref().map(str::trim) {
        Some(date) if !date.is_empty() => date.to_string(),
        _ => {
            return Err(warp::reject::custom(ApiError::bad_request(
                "Missing required parameter: date",
            )))
        }
    };

    let cache_key = format!("market_data_{}", date);
    if let Some(data) = state.cache.get(&cache_key).await {
        info!("Cache hit for {}", date);
        return Ok(warp::reply::json(&json!({
            "success": true,
            "data": data,
            "cached": true,
        })));
    }

    info!("Fetching data for {} ({})", date, state.settings.provider);
    let data = get_market_data(&state.settings, &date).await.map_err(|e| {
        error!("Failed to build market data for {}: {}", date, e);
        warp::reject::custom(ApiError::from(e))
    })?;

    state.cache.insert(cache_key, data.clone()).await;

    Ok(warp::reply::json(&json!({
        "success": true,
        "data": data,
        "cached": false,
        "dataSource": state.settings.provider,
    })))
}
