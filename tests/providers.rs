//! End-to-end reports from exported provider tables on disk.

mod common;

use chrono::NaiveDate;

use market_dashboard::error::AppError;
use market_dashboard::models::Breadth;
use market_dashboard::services::market::{equity_bond_spread, get_market_data, Provider};

fn feb_15() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 2, 15).unwrap()
}

#[tokio::test]
async fn aggregator_spread_report_merges_separate_tables() {
    let dir = common::aggregator_dir();
    let settings = common::settings(&dir, "aggregator");

    let report = equity_bond_spread(&settings, "2023-02-15").await.unwrap();

    assert_eq!(report.chart_data.len(), 2);
    assert_eq!(report.estimated_fields.total(), 0);
    assert_eq!(report.metrics.spread, "2.50");
    assert_eq!(report.metrics.spread_percentile, 50.0);
    assert_eq!(report.metrics.pe, 20.0);
    assert_eq!(report.metrics.pe_percentile, 100.0);
    assert_eq!(report.metrics.pb_percentile, 100.0);

    let january = &report.chart_data[0];
    assert_eq!(january.index_level, 3900.0);
    assert_eq!(january.earnings_yield, 10.0);
    assert_eq!(january.spread, 7.0);
}

#[tokio::test]
async fn terminal_spread_report_matches_aggregator() {
    let dir = common::terminal_dir();
    let settings = common::settings(&dir, "terminal");

    let report = equity_bond_spread(&settings, "2023-02-28").await.unwrap();

    assert_eq!(report.chart_data.len(), 2);
    assert_eq!(report.metrics.spread, "2.50");
    assert_eq!(report.metrics.pe_percentile, 100.0);
    assert_eq!(report.chart_data[1].index_level, 3100.0);

    // Rows stamped at month end still belong to a mid-month target's month.
    let mid_month = equity_bond_spread(&settings, "2023-02-15").await.unwrap();
    assert_eq!(mid_month.chart_data.len(), 2);
    assert_eq!(mid_month.metrics.spread, "2.50");
    assert_eq!(mid_month.metrics.pe_percentile, 100.0);
    assert_eq!(mid_month.metrics.spread_percentile, 50.0);
}

#[tokio::test]
async fn spread_report_rejects_bad_date_before_loading() {
    let dir = tempfile::TempDir::new().unwrap();
    let settings = common::settings(&dir, "aggregator");

    let err = equity_bond_spread(&settings, "15/02/2023").await.unwrap_err();
    assert!(matches!(err, AppError::InvalidDate(_)));
}

#[tokio::test]
async fn spread_report_fails_without_index_history() {
    let dir = tempfile::TempDir::new().unwrap();
    let settings = common::settings(&dir, "aggregator");

    let err = equity_bond_spread(&settings, "2023-02-15").await.unwrap_err();
    assert!(matches!(err, AppError::Io(_)));
}

#[tokio::test]
async fn aggregator_quotes_fall_back_per_code() {
    let dir = common::aggregator_dir();
    let settings = common::settings(&dir, "aggregator");
    let codes = vec![
        "000001.SH".to_string(),
        "000300.SH".to_string(),
        "399006.SZ".to_string(),
        "bogus".to_string(),
    ];

    let quotes = Provider::from_settings(&settings)
        .index_quotes(&codes, feb_15())
        .await;

    assert_eq!(quotes.len(), 4);
    assert_eq!(quotes[0].pct_chg, 0.78);
    assert_eq!(quotes[0].volume, 6000.0);
    assert!(quotes[0].error.is_none());
    // No bar on the day itself: the last earlier bar is used.
    assert_eq!(quotes[1].pct_chg, 2.56);
    assert_eq!(quotes[2].pct_chg, 0.0);
    assert!(quotes[2].error.is_some());
    assert!(quotes[3].error.is_some());
}

#[tokio::test]
async fn aggregator_breadth_is_estimated_from_index_moves() {
    let dir = common::aggregator_dir();
    let settings = common::settings(&dir, "aggregator");

    let breadth = Provider::from_settings(&settings).breadth(feb_15()).await;

    assert_eq!(
        breadth,
        Breadth {
            up_limit: 27,
            up: 2390,
            flat: 150,
            down: 1187,
            down_limit: 8,
            change_percent: 58.91,
        }
    );
}

#[tokio::test]
async fn aggregator_breadth_without_indices_uses_fixed_estimate() {
    let dir = tempfile::TempDir::new().unwrap();
    let settings = common::settings(&dir, "aggregator");

    let breadth = Provider::from_settings(&settings).breadth(feb_15()).await;
    assert_eq!(breadth, Breadth::estimate_default());
}

#[tokio::test]
async fn terminal_breadth_counts_stocks_on_the_day() {
    let dir = common::terminal_dir();
    let settings = common::settings(&dir, "terminal");

    let breadth = Provider::from_settings(&settings).breadth(feb_15()).await;

    assert_eq!(
        breadth,
        Breadth {
            up_limit: 1,
            up: 1,
            flat: 1,
            down: 1,
            down_limit: 0,
            change_percent: 25.0,
        }
    );
}

#[tokio::test]
async fn terminal_market_data_assembles_every_section() {
    let dir = common::terminal_dir();
    let settings = common::settings(&dir, "terminal");

    let data = get_market_data(&settings, "2023-02-15").await.unwrap();

    assert_eq!(data.date, "2023-02-15");
    assert_eq!(data.overview.breadth.up, 1);
    let names: Vec<&str> = data.overview.indices.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["上证指数", "深证成指", "创业板指", "沪深300"]);
    assert_eq!(data.overview.indices[0].change_percent, 0.51);
    assert_eq!(data.overview.indices[1].change_percent, -0.23);
    assert_eq!(data.overview.indices[2].change_percent, 0.0);

    assert_eq!(data.sectors.len(), 28);
    let bank = data.sectors.iter().find(|s| s.name == "银行").unwrap();
    assert_eq!(bank.category, "金融");
    assert_eq!(bank.change_percent, 1.23);
    assert_eq!(bank.top_gainer.name, "招商银行");
    assert_eq!(bank.top_gainer.change_percent, 3.46);
    assert_eq!(bank.top_loser.change_percent, -1.11);
    assert_eq!((bank.up_count, bank.down_count), (30, 12));

    let staples = data.sectors.iter().find(|s| s.name == "日常消费").unwrap();
    assert_eq!(staples.category, "消费");
    assert_eq!(staples.change_percent, -0.5);
    assert_eq!(staples.down_count, 45);
    assert!(data.sectors.iter().all(|s| s.name != "食品饮料"));

    assert_eq!(data.equity_bond_spread.metrics.spread, "2.50");
}

#[tokio::test]
async fn market_data_survives_missing_spread_history() {
    let dir = tempfile::TempDir::new().unwrap();
    let settings = common::settings(&dir, "terminal");

    let data = get_market_data(&settings, "2023-02-15").await.unwrap();

    assert!(data.equity_bond_spread.chart_data.is_empty());
    assert_eq!(data.equity_bond_spread.metrics.spread, "2.0");
    assert_eq!(data.overview.breadth, Breadth::zero());
    assert!(data.sectors.iter().all(|s| s.error.is_some()));
}
