// src/services/terminal.rs
//
// Adapter for commercial terminal exports. The terminal delivers monthly
// index valuation (PE TTM, PB LF) directly, per-index quotes with turnover,
// and per-stock changes for exact breadth counts.
use chrono::NaiveDate;
use log::{error, info, warn};

use crate::config::{ProviderKind, Settings};
use crate::error::{AppError, Result};
use crate::models::{Breadth, IndexQuote, Mover, RawSample, SectorSummary};
use crate::services::breadth::count_breadth;
use crate::services::calculations::round_to;
use crate::services::sectors::{configured_sectors, SectorConfig};
use crate::services::source::load_table;
use crate::services::spread::month_start;
use crate::services::table::{cell, date, number, Table};

pub const INDEX_MONTHLY_TABLE: &str = "wind_a_monthly.csv";
pub const BOND_MONTHLY_TABLE: &str = "bond_10y_monthly.csv";
pub const INDEX_QUOTES_TABLE: &str = "index_quotes.csv";
pub const STOCK_CHANGES_TABLE: &str = "stock_changes.csv";
pub const SECTORS_TABLE: &str = "sectors.csv";

/// Monthly rows are keyed by the first day of their month: the terminal stamps
/// them with the period's last trading day, which may lie past a mid-month
/// target date.
pub fn parse_index_monthly(table: &Table) -> Result<Vec<RawSample>> {
    let date_col = table.require(&["date"])?;
    let close_col = table.column(&["close"]);
    let pe_col = table.column(&["pe_ttm"]);
    let pb_col = table.column(&["pb_lf"]);

    Ok(table
        .rows()
        .iter()
        .filter_map(|row| {
            let day = date(row, date_col)?;
            Some(RawSample {
                date: month_start(day),
                index_level: close_col.and_then(|c| number(row, c)),
                pe: pe_col.and_then(|c| number(row, c)),
                pb: pb_col.and_then(|c| number(row, c)),
                bond_yield: None,
            })
        })
        .collect())
}

pub fn parse_bond_monthly(table: &Table) -> Result<Vec<RawSample>> {
    let date_col = table.require(&["date"])?;
    let close_col = table.require(&["close"])?;

    Ok(table
        .rows()
        .iter()
        .filter_map(|row| {
            let day = date(row, date_col)?;
            Some(RawSample {
                bond_yield: number(row, close_col),
                ..RawSample::empty(month_start(day))
            })
        })
        .collect())
}

pub fn quote_from_table(table: &Table, code: &str, day: NaiveDate) -> Result<IndexQuote> {
    let code_col = table.require(&["code"])?;
    let date_col = table.require(&["date"])?;
    let pct_col = table.column(&["pct_chg"]);
    let volume_col = table.column(&["volume"]);
    let amt_col = table.column(&["amt"]);

    let row = table
        .rows()
        .iter()
        .find(|row| cell(row, code_col) == code && date(row, date_col) == Some(day))
        .ok_or_else(|| AppError::Provider(format!("no quote for {} on {}", code, day)))?;

    let value = |col: Option<usize>| col.and_then(|c| number(row, c)).unwrap_or(0.0);
    Ok(IndexQuote {
        code: code.to_string(),
        pct_chg: value(pct_col),
        volume: value(volume_col),
        amt: value(amt_col),
        error: None,
    })
}

/// Per-stock changes traded on `day`; blank cells are skipped.
pub fn stock_changes_on(table: &Table, day: NaiveDate) -> Result<Vec<f64>> {
    let date_col = table.require(&["date"])?;
    let pct_col = table.require(&["pct_chg"])?;

    Ok(table
        .rows()
        .iter()
        .filter(|row| date(row, date_col) == Some(day))
        .filter_map(|row| number(row, pct_col))
        .collect())
}

/// Sector row for `board`, looked up by board code when the export carries a
/// `code` column and by name otherwise.
pub fn sector_from_table(table: &Table, board: &SectorConfig) -> Result<SectorSummary> {
    let (category, name) = (board.category, board.name);
    let (key_col, key) = match table.column(&["code"]) {
        Some(col) => (col, board.code),
        None => (table.require(&["name"])?, name),
    };
    let row = match table.rows().iter().find(|row| cell(row, key_col) == key) {
        Some(row) => row,
        None => return Ok(SectorSummary::zero(category, name)),
    };

    let value = |names: &[&str]| table.column(names).and_then(|c| number(row, c));
    let text = |names: &[&str]| {
        table
            .column(names)
            .map(|c| cell(row, c).to_string())
            .unwrap_or_default()
    };

    Ok(SectorSummary {
        category: category.to_string(),
        name: name.to_string(),
        change_percent: round_to(value(&["pct_chg"]).unwrap_or(0.0), 2),
        top_gainer: Mover {
            name: text(&["top_gainer"]),
            change_percent: round_to(value(&["top_gainer_pct"]).unwrap_or(0.0), 2),
        },
        top_loser: Mover {
            name: text(&["top_loser"]),
            change_percent: round_to(value(&["top_loser_pct"]).unwrap_or(0.0), 2),
        },
        up_count: value(&["up_count"]).unwrap_or(0.0) as usize,
        down_count: value(&["down_count"]).unwrap_or(0.0) as usize,
        error: None,
    })
}

pub struct Terminal<'a> {
    settings: &'a Settings,
}

impl<'a> Terminal<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Terminal { settings }
    }

    async fn table(&self, name: &str) -> Result<Table> {
        load_table(&self.settings.data_dir, name, &self.settings.fetch).await
    }

    /// Both monthly series are required; the terminal has no partial mode.
    pub async fn spread_samples(&self) -> Result<Vec<RawSample>> {
        let mut samples = parse_index_monthly(&self.table(INDEX_MONTHLY_TABLE).await?)?;
        samples.extend(parse_bond_monthly(&self.table(BOND_MONTHLY_TABLE).await?)?);
        info!("Loaded {} raw spread samples from terminal", samples.len());
        Ok(samples)
    }

    pub async fn index_quotes(&self, codes: &[String], day: NaiveDate) -> Vec<IndexQuote> {
        let table = match self.table(INDEX_QUOTES_TABLE).await {
            Ok(table) => table,
            Err(e) => {
                error!("Failed to load index quotes: {}", e);
                return codes
                    .iter()
                    .map(|code| IndexQuote::failed(code, e.to_string()))
                    .collect();
            }
        };

        codes
            .iter()
            .map(|code| {
                quote_from_table(&table, code, day)
                    .unwrap_or_else(|e| IndexQuote::failed(code, e.to_string()))
            })
            .collect()
    }

    pub async fn breadth(&self, day: NaiveDate) -> Breadth {
        match self
            .table(STOCK_CHANGES_TABLE)
            .await
            .and_then(|t| stock_changes_on(&t, day))
        {
            Ok(changes) => count_breadth(&changes),
            Err(e) => {
                warn!("Stock changes unavailable, breadth is empty: {}", e);
                Breadth::zero()
            }
        }
    }

    pub async fn sectors(&self) -> Vec<SectorSummary> {
        let table = self.table(SECTORS_TABLE).await;
        configured_sectors(ProviderKind::Terminal)
            .into_iter()
            .map(|board| {
                let summary = match &table {
                    Ok(table) => sector_from_table(table, &board),
                    Err(e) => Err(AppError::Provider(e.to_string())),
                };
                summary.unwrap_or_else(|e| SectorSummary {
                    error: Some(e.to_string()),
                    ..SectorSummary::zero(board.category, board.name)
                })
            })
            .collect()
    }
}
