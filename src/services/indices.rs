// src/services/indices.rs
use chrono::NaiveDate;
use regex::Regex;

use crate::error::{AppError, Result};
use crate::models::{IndexBar, IndexQuote};
use crate::services::calculations::{pct_change, round_to};

/// Indices shown on the dashboard overview, as (display name, terminal code).
pub const OVERVIEW_INDICES: [(&str, &str); 4] = [
    ("上证指数", "000001.SH"),
    ("深证成指", "399001.SZ"),
    ("创业板指", "399006.SZ"),
    ("沪深300", "000300.SH"),
];

/// Indices whose intraday move drives the aggregator breadth estimate.
pub const BREADTH_INDICES: [&str; 2] = ["sh000001", "sz399001"];

/// Convert a terminal code (`000300.SH`) into an aggregator symbol (`sh000300`).
pub fn aggregator_symbol(code: &str) -> Result<String> {
    let re = Regex::new(r"^(\d{6})\.(SH|SZ)$").map_err(|e| AppError::Parse(e.to_string()))?;
    let caps = re
        .captures(code.trim())
        .ok_or_else(|| AppError::InvalidInput(format!("unsupported index code '{}'", code)))?;
    Ok(format!("{}{}", caps[2].to_lowercase(), &caps[1]))
}

/// Split a comma separated code list, dropping blanks.
pub fn parse_codes(codes: &str) -> Vec<String> {
    codes
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(String::from)
        .collect()
}

/// Quote for `date` from chronologically ordered daily bars: the bar on that
/// day, else the most recent earlier bar. Change is measured against the
/// previous bar's close.
pub fn index_quote(code: &str, bars: &[IndexBar], date: NaiveDate) -> IndexQuote {
    let position = bars
        .iter()
        .position(|b| b.date == date)
        .or_else(|| bars.iter().rposition(|b| b.date <= date));

    let idx = match position {
        Some(idx) => idx,
        None => return IndexQuote::zero(code),
    };

    let bar = &bars[idx];
    let pct_chg = if idx > 0 {
        round_to(pct_change(bars[idx - 1].close, bar.close), 2)
    } else {
        0.0
    };

    IndexQuote {
        code: code.to_string(),
        pct_chg,
        volume: bar.volume,
        amt: 0.0,
        error: None,
    }
}
