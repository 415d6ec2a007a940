use log::info;
use std::net::SocketAddr;
use std::sync::Arc;
use warp::Filter;

use market_dashboard::config::Settings;
use market_dashboard::handlers::AppState;
use market_dashboard::routes;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    info!("Logger initialized. Starting the application...");

    let settings = Settings::from_env()?;
    info!(
        "Using PORT: {}, provider: {}, data: {}",
        settings.port, settings.provider, settings.data_dir
    );

    // Bind on every interface for container deployments
    let addr: SocketAddr = ([0, 0, 0, 0], settings.port).into();

    let cors = warp::cors()
        .allow_any_origin()
        .allow_header("content-type")
        .allow_methods(vec!["GET", "POST"]);

    let state = Arc::new(AppState::new(settings));
    let api = routes::routes(state).with(cors);
    info!("Routes configured successfully with CORS.");

    info!("Starting server on {}", addr);
    warp::serve(api).run(addr).await;
    Ok(())
}
