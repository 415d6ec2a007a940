// src/bin/get_sectors.rs
use log::info;

use market_dashboard::config::Settings;
use market_dashboard::error::Result;
use market_dashboard::models::SectorSummary;
use market_dashboard::report::{emit, init_logging, positional_args};
use market_dashboard::services::market::Provider;
use market_dashboard::services::spread::parse_target_date;

async fn run() -> Result<Vec<SectorSummary>> {
    let args = positional_args(std::env::args(), &["date"])?;
    let day = parse_target_date(&args[0])?;
    let settings = Settings::from_env()?;
    // Board tables are snapshots; the date only labels the request.
    info!("Loading sector snapshot for {}", day);
    Ok(Provider::from_settings(&settings).sectors().await)
}

#[tokio::main]
async fn main() {
    init_logging();
    std::process::exit(emit(run().await));
}
