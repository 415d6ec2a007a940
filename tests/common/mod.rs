//! Fixture data directories for the integration tests.
#![allow(dead_code)]

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use market_dashboard::config::Settings;

fn write(dir: &Path, name: &str, body: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, body).unwrap();
}

pub fn settings(dir: &TempDir, provider: &str) -> Settings {
    let data_dir = dir.path().to_string_lossy().to_string();
    Settings::from_lookup(|key| match key {
        "PORT" => Some("3002".to_string()),
        "DATA_PROVIDER" => Some(provider.to_string()),
        "DATA_DIR" => Some(data_dir.clone()),
        "FETCH_RETRIES" => Some("1".to_string()),
        "FETCH_RETRY_DELAY_MS" => Some("0".to_string()),
        _ => None,
    })
    .unwrap()
}

/// Aggregator exports for January and February 2023. Boards are left out so
/// sector summaries fall back to zero records.
pub fn aggregator_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    write(
        root,
        "index_daily/sh000300.csv",
        "date,open,close,volume\n\
         2023-01-03,3800,3900,100\n\
         2023-02-01,3900,4000,200\n",
    );
    write(
        root,
        "index_daily/sh000001.csv",
        "日期,开盘,收盘,成交量\n\
         2023-02-14,1024,1024,5000\n\
         2023-02-15,1024,1032,6000\n",
    );
    write(
        root,
        "index_daily/sz399001.csv",
        "日期,开盘,收盘,成交量\n\
         2023-02-15,2048,2064,7000\n",
    );
    write(
        root,
        "valuation.csv",
        "日期,PE,PB\n\
         2023-01-03,10,1.0\n\
         2023-02-01,20,2.0\n",
    );
    write(
        root,
        "bond_rates.csv",
        "日期,中国国债收益率10年\n\
         2023-01-03,3.0\n\
         2023-02-01,2.5\n",
    );
    dir
}

/// Terminal exports covering the same two months.
pub fn terminal_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    write(
        root,
        "wind_a_monthly.csv",
        "date,close,pe_ttm,pb_lf\n\
         2023-01-31,3000,10,1.0\n\
         2023-02-28,3100,20,2.0\n",
    );
    write(
        root,
        "bond_10y_monthly.csv",
        "date,close\n\
         2023-01-31,3.0\n\
         2023-02-28,2.5\n",
    );
    write(
        root,
        "index_quotes.csv",
        "code,date,pct_chg,volume,amt\n\
         000001.SH,2023-02-15,0.51,310000000,420000000000\n\
         399001.SZ,2023-02-15,-0.23,410000000,530000000000\n",
    );
    write(
        root,
        "stock_changes.csv",
        "code,date,pct_chg\n\
         600000.SH,2023-02-15,10.0\n\
         600001.SH,2023-02-15,1.5\n\
         600002.SH,2023-02-15,0\n\
         600003.SH,2023-02-15,-2.0\n\
         600004.SH,2023-02-14,-10.0\n",
    );
    write(
        root,
        "sectors.csv",
        "code,name,pct_chg,top_gainer,top_gainer_pct,top_loser,top_loser_pct,up_count,down_count\n\
         881001.WI,银行,1.234,招商银行,3.456,平安银行,-1.111,30,12\n\
         881012.WI,日常消费,-0.5,贵州茅台,1.25,伊利股份,-2.0,20,45\n",
    );
    dir
}
