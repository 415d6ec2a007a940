//! HTTP surface exercised through `warp::test`.

mod common;

use serde_json::Value;
use std::sync::Arc;
use warp::http::{Response, StatusCode};

use market_dashboard::handlers::AppState;
use market_dashboard::routes::routes;

fn body<B: AsRef<[u8]>>(response: &Response<B>) -> Value {
    serde_json::from_slice(response.body().as_ref()).unwrap()
}

#[tokio::test]
async fn market_data_requires_a_date() {
    let dir = common::aggregator_dir();
    let api = routes(Arc::new(AppState::new(common::settings(&dir, "aggregator"))));

    let response = warp::test::request()
        .method("GET")
        .path("/api/market-data")
        .reply(&api)
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body(&response);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Missing required parameter: date");
}

#[tokio::test]
async fn market_data_rejects_malformed_date() {
    let dir = common::aggregator_dir();
    let api = routes(Arc::new(AppState::new(common::settings(&dir, "aggregator"))));

    let response = warp::test::request()
        .method("GET")
        .path("/api/market-data?date=2023-13-45")
        .reply(&api)
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body(&response)["success"], false);
}

#[tokio::test]
async fn market_data_is_served_then_cached() {
    let dir = common::aggregator_dir();
    let api = routes(Arc::new(AppState::new(common::settings(&dir, "aggregator"))));

    let first = warp::test::request()
        .method("GET")
        .path("/api/market-data?date=2023-02-15")
        .reply(&api)
        .await;
    assert_eq!(first.status(), StatusCode::OK);
    let json = body(&first);
    assert_eq!(json["success"], true);
    assert_eq!(json["cached"], false);
    assert_eq!(json["dataSource"], "aggregator");

    let data = &json["data"];
    assert_eq!(data["date"], "2023-02-15");
    assert_eq!(data["overview"]["upLimit"], 27);
    assert_eq!(data["overview"]["indices"].as_array().unwrap().len(), 4);
    assert_eq!(data["sectors"].as_array().unwrap().len(), 28);
    let spread = &data["equityBondSpread"];
    assert_eq!(spread["metrics"]["spread"], "2.50");
    assert_eq!(spread["metrics"]["pePercentile"], 100.0);
    assert_eq!(spread["chartData"][0]["displayYear"], 2023);
    assert_eq!(spread["chartData"][1]["displayYear"], "");
    assert_eq!(spread["estimatedFields"]["pe"], 0);

    let second = warp::test::request()
        .method("GET")
        .path("/api/market-data?date=2023-02-15")
        .reply(&api)
        .await;
    assert_eq!(body(&second)["cached"], true);

    let stats = warp::test::request()
        .method("GET")
        .path("/api/cache/stats")
        .reply(&api)
        .await;
    let stats = body(&stats);
    assert_eq!(stats["stats"]["keys"], 1);
    assert_eq!(stats["stats"]["hits"], 1);
    assert_eq!(stats["stats"]["misses"], 1);
}

#[tokio::test]
async fn clearing_the_cache_drops_entries() {
    let dir = common::aggregator_dir();
    let api = routes(Arc::new(AppState::new(common::settings(&dir, "aggregator"))));

    warp::test::request()
        .method("GET")
        .path("/api/market-data?date=2023-02-15")
        .reply(&api)
        .await;

    let cleared = warp::test::request()
        .method("POST")
        .path("/api/cache/clear")
        .reply(&api)
        .await;
    assert_eq!(cleared.status(), StatusCode::OK);
    assert_eq!(body(&cleared)["success"], true);

    let stats = warp::test::request()
        .method("GET")
        .path("/api/cache/stats")
        .reply(&api)
        .await;
    assert_eq!(body(&stats)["stats"]["keys"], 0);
}

#[tokio::test]
async fn health_reports_provider() {
    let dir = common::terminal_dir();
    let api = routes(Arc::new(AppState::new(common::settings(&dir, "terminal"))));

    let response = warp::test::request()
        .method("GET")
        .path("/api/health")
        .reply(&api)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body(&response);
    assert_eq!(json["success"], true);
    assert_eq!(json["dataSource"], "terminal");
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn unknown_paths_are_not_found() {
    let dir = common::aggregator_dir();
    let api = routes(Arc::new(AppState::new(common::settings(&dir, "aggregator"))));

    let response = warp::test::request()
        .method("GET")
        .path("/api/unknown")
        .reply(&api)
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body(&response)["error"], "Not Found");
}
