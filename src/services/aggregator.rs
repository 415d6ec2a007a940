// src/services/aggregator.rs
//
// Adapter for the open-data aggregator exports: separate daily tables for the
// index, its valuation and the bond curve, plus board/constituent snapshots.
use chrono::NaiveDate;
use log::{error, info, warn};
use std::collections::HashMap;

use crate::config::{ProviderKind, Settings};
use crate::error::Result;
use crate::models::{Breadth, IndexBar, IndexQuote, RawSample, SectorSummary};
use crate::services::breadth::estimate_from_indices;
use crate::services::indices::{aggregator_symbol, index_quote, BREADTH_INDICES};
use crate::services::sectors::{configured_sectors, summarize_sector, Constituent};
use crate::services::source::load_table;
use crate::services::table::{cell, date, number, Table};

/// Index used as the whole-market proxy for the spread history.
pub const SPREAD_INDEX: &str = "sh000300";

pub const VALUATION_TABLE: &str = "valuation.csv";
pub const BOND_TABLE: &str = "bond_rates.csv";
pub const BOARDS_TABLE: &str = "boards.csv";

const BOND_10Y_COLUMNS: [&str; 2] = ["中国国债收益率10年", "中国10年期国债收益率"];

pub fn index_table(symbol: &str) -> String {
    format!("index_daily/{}.csv", symbol)
}

pub fn constituents_table(board: &str) -> String {
    format!("constituents/{}.csv", board)
}

/// Daily bars in date order. Rows without a date or close are skipped; a
/// missing open reads as the close.
pub fn parse_index_bars(table: &Table) -> Result<Vec<IndexBar>> {
    let date_col = table.require(&["date", "日期"])?;
    let close_col = table.require(&["close", "收盘"])?;
    let open_col = table.column(&["open", "开盘"]);
    let volume_col = table.column(&["volume", "成交量"]);

    let mut bars: Vec<IndexBar> = table
        .rows()
        .iter()
        .filter_map(|row| {
            let day = date(row, date_col)?;
            let close = number(row, close_col)?;
            Some(IndexBar {
                date: day,
                open: open_col.and_then(|c| number(row, c)).unwrap_or(close),
                close,
                volume: volume_col.and_then(|c| number(row, c)).unwrap_or(0.0),
            })
        })
        .collect();
    bars.sort_by_key(|b| b.date);
    Ok(bars)
}

pub fn index_samples(bars: &[IndexBar]) -> Vec<RawSample> {
    bars.iter()
        .map(|bar| RawSample {
            index_level: Some(bar.close),
            ..RawSample::empty(bar.date)
        })
        .collect()
}

pub fn parse_valuation(table: &Table) -> Result<Vec<RawSample>> {
    let date_col = table.require(&["日期", "date"])?;
    let pe_col = table.column(&["PE", "市盈率"]);
    let pb_col = table.column(&["PB", "市净率"]);

    Ok(table
        .rows()
        .iter()
        .filter_map(|row| {
            let day = date(row, date_col)?;
            Some(RawSample {
                pe: pe_col.and_then(|c| number(row, c)),
                pb: pb_col.and_then(|c| number(row, c)),
                ..RawSample::empty(day)
            })
        })
        .collect())
}

pub fn parse_bond_rates(table: &Table) -> Result<Vec<RawSample>> {
    let date_col = table.require(&["日期", "date"])?;
    let yield_col = table.require(&BOND_10Y_COLUMNS)?;

    Ok(table
        .rows()
        .iter()
        .filter_map(|row| {
            let day = date(row, date_col)?;
            Some(RawSample {
                bond_yield: number(row, yield_col),
                ..RawSample::empty(day)
            })
        })
        .collect())
}

/// Board name → daily change in percent.
pub fn parse_boards(table: &Table) -> Result<HashMap<String, f64>> {
    let name_col = table.require(&["板块名称"])?;
    let change_col = table.column(&["涨跌幅"]);

    Ok(table
        .rows()
        .iter()
        .map(|row| {
            let change = change_col.and_then(|c| number(row, c)).unwrap_or(0.0);
            (cell(row, name_col).to_string(), change)
        })
        .collect())
}

pub fn parse_constituents(table: &Table) -> Result<Vec<Constituent>> {
    let name_col = table.require(&["名称", "股票名称"])?;
    let change_col = table.require(&["涨跌幅"])?;

    Ok(table
        .rows()
        .iter()
        .map(|row| Constituent {
            name: cell(row, name_col).to_string(),
            change: number(row, change_col),
        })
        .collect())
}

pub struct Aggregator<'a> {
    settings: &'a Settings,
}

impl<'a> Aggregator<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Aggregator { settings }
    }

    async fn table(&self, name: &str) -> Result<Table> {
        load_table(&self.settings.data_dir, name, &self.settings.fetch).await
    }

    pub async fn index_bars(&self, symbol: &str) -> Result<Vec<IndexBar>> {
        let table = self.table(&index_table(symbol)).await?;
        parse_index_bars(&table)
    }

    /// Index, valuation and bond observations merged into one raw stream.
    /// Valuation and bond tables are optional: without them the engine falls
    /// back to its static defaults.
    pub async fn spread_samples(&self) -> Result<Vec<RawSample>> {
        let mut samples = index_samples(&self.index_bars(SPREAD_INDEX).await?);

        match self.table(VALUATION_TABLE).await.and_then(|t| parse_valuation(&t)) {
            Ok(valuation) => samples.extend(valuation),
            Err(e) => warn!("Valuation history unavailable, using default PE/PB: {}", e),
        }
        match self.table(BOND_TABLE).await.and_then(|t| parse_bond_rates(&t)) {
            Ok(bonds) => samples.extend(bonds),
            Err(e) => warn!("Bond history unavailable, using default yield: {}", e),
        }

        info!("Loaded {} raw spread samples", samples.len());
        Ok(samples)
    }

    pub async fn index_quotes(&self, codes: &[String], day: NaiveDate) -> Vec<IndexQuote> {
        let mut quotes = Vec::with_capacity(codes.len());
        for code in codes {
            let quote = match aggregator_symbol(code) {
                Ok(symbol) => match self.index_bars(&symbol).await {
                    Ok(bars) => index_quote(code, &bars, day),
                    Err(e) => {
                        error!("Failed to load bars for {}: {}", code, e);
                        IndexQuote::failed(code, e.to_string())
                    }
                },
                Err(e) => IndexQuote::failed(code, e.to_string()),
            };
            quotes.push(quote);
        }
        quotes
    }

    /// Estimated from the intraday move of the main indices' last bar on or
    /// before `day`.
    pub async fn breadth(&self, day: NaiveDate) -> Breadth {
        let mut latest = Vec::new();
        for symbol in BREADTH_INDICES {
            match self.index_bars(symbol).await {
                Ok(bars) => latest.extend(bars.iter().rev().find(|b| b.date <= day).cloned()),
                Err(e) => warn!("Skipping {} in breadth estimate: {}", symbol, e),
            }
        }
        estimate_from_indices(&latest)
    }

    pub async fn sectors(&self) -> Vec<SectorSummary> {
        let boards = match self.table(BOARDS_TABLE).await.and_then(|t| parse_boards(&t)) {
            Ok(boards) => Some(boards),
            Err(e) => {
                error!("Failed to load sector boards: {}", e);
                None
            }
        };

        let mut result = Vec::new();
        for board in configured_sectors(ProviderKind::Aggregator) {
            let (category, name) = (board.category, board.name);
            let summary = match boards.as_ref() {
                None => SectorSummary {
                    error: Some("sector boards unavailable".to_string()),
                    ..SectorSummary::zero(category, name)
                },
                Some(boards) => match boards.get(name) {
                    None => SectorSummary::zero(category, name),
                    Some(&change) => self.sector(category, name, change).await,
                },
            };
            result.push(summary);
        }
        result
    }

    async fn sector(&self, category: &str, name: &str, change: f64) -> SectorSummary {
        let constituents = self
            .table(&constituents_table(name))
            .await
            .and_then(|t| parse_constituents(&t));
        match constituents {
            Ok(stocks) => summarize_sector(category, name, change, &stocks),
            Err(e) => {
                warn!("No constituents for {}: {}", name, e);
                summarize_sector(category, name, change, &[])
            }
        }
    }
}
