// src/bin/get_market_overview.rs
use market_dashboard::config::Settings;
use market_dashboard::error::Result;
use market_dashboard::models::Breadth;
use market_dashboard::report::{emit, init_logging, positional_args};
use market_dashboard::services::market::Provider;
use market_dashboard::services::spread::parse_target_date;

async fn run() -> Result<Breadth> {
    let args = positional_args(std::env::args(), &["date"])?;
    let day = parse_target_date(&args[0])?;
    let settings = Settings::from_env()?;
    Ok(Provider::from_settings(&settings).breadth(day).await)
}

#[tokio::main]
async fn main() {
    init_logging();
    std::process::exit(emit(run().await));
}
