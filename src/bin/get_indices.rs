// src/bin/get_indices.rs
use market_dashboard::config::Settings;
use market_dashboard::error::Result;
use market_dashboard::models::IndexQuote;
use market_dashboard::report::{emit, init_logging, positional_args};
use market_dashboard::services::indices::parse_codes;
use market_dashboard::services::market::Provider;
use market_dashboard::services::spread::parse_target_date;

async fn run() -> Result<Vec<IndexQuote>> {
    let args = positional_args(std::env::args(), &["codes", "date"])?;
    let codes = parse_codes(&args[0]);
    let day = parse_target_date(&args[1])?;
    let settings = Settings::from_env()?;
    Ok(Provider::from_settings(&settings)
        .index_quotes(&codes, day)
        .await)
}

#[tokio::main]
async fn main() {
    init_logging();
    std::process::exit(emit(run().await));
}
