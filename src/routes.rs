// src/routes.rs
use log::info;
use std::convert::Infallible;
use std::sync::Arc;
use warp::reject::Rejection;
use warp::{Filter, Reply};

use crate::handlers::cache::{cache_stats, clear_cache};
use crate::handlers::error::ApiError;
use crate::handlers::health::health;
use crate::handlers::market::{get_market, MarketDataQuery};
use crate::handlers::AppState;

async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (code, body) = if err.is_not_found() {
        (
            warp::http::StatusCode::NOT_FOUND,
            serde_json::json!({ "error": "Not Found" }),
        )
    } else if let Some(api_error) = err.find::<ApiError>() {
        (
            api_error.status,
            serde_json::json!({
                "success": false,
                "message": api_error.message,
                "error": api_error.error,
            }),
        )
    } else if let Some(query_error) = err.find::<warp::reject::InvalidQuery>() {
        (
            warp::http::StatusCode::BAD_REQUEST,
            serde_json::json!({
                "success": false,
                "message": "Invalid request",
                "error": query_error.to_string(),
            }),
        )
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (
            warp::http::StatusCode::METHOD_NOT_ALLOWED,
            serde_json::json!({ "error": "Method Not Allowed" }),
        )
    } else {
        (
            warp::http::StatusCode::INTERNAL_SERVER_ERROR,
            serde_json::json!({ "error": "Internal Server Error" }),
        )
    };

    Ok(warp::reply::with_status(warp::reply::json(&body), code))
}

pub fn routes(
    state: Arc<AppState>,
) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    info!("Configuring routes...");

    let state_filter = warp::any().map(move || state.clone());

    let market_data_route = warp::path!("api" / "market-data")
        .and(warp::get())
        .and(warp::query::<MarketDataQuery>())
        .and(state_filter.clone())
        .and_then(get_market);

    let cache_clear_route = warp::path!("api" / "cache" / "clear")
        .and(warp::post())
        .and(state_filter.clone())
        .and_then(clear_cache);

    let cache_stats_route = warp::path!("api" / "cache" / "stats")
        .and(warp::get())
        .and(state_filter.clone())
        .and_then(cache_stats);

    let health_route = warp::path!("api" / "health")
        .and(warp::get())
        .and(state_filter.clone())
        .and_then(health);

    info!("All routes configured successfully.");

    market_data_route
        .or(cache_clear_route)
        .or(cache_stats_route)
        .or(health_route)
        .recover(handle_rejection)
}
