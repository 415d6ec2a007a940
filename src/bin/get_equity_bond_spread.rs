// src/bin/get_equity_bond_spread.rs
use market_dashboard::config::Settings;
use market_dashboard::error::Result;
use market_dashboard::models::SpreadReport;
use market_dashboard::report::{emit, init_logging, positional_args};
use market_dashboard::services::market::equity_bond_spread;

async fn run() -> Result<SpreadReport> {
    let args = positional_args(std::env::args(), &["date"])?;
    let settings = Settings::from_env()?;
    equity_bond_spread(&settings, &args[0]).await
}

#[tokio::main]
async fn main() {
    init_logging();
    std::process::exit(emit(run().await));
}
