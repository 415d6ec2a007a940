// src/services/table.rs
//
// Header-addressed access to provider CSV exports.
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};

use crate::error::{AppError, Result};

#[derive(Debug, Clone)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<StringRecord>,
}

impl Table {
    pub fn parse(text: &str) -> Result<Table> {
        let mut rdr = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(text.trim_start_matches('\u{feff}').as_bytes());

        let headers = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();
        let rows = rdr.records().collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Table { headers, rows })
    }

    /// Index of the first header matching any of `names`.
    pub fn column(&self, names: &[&str]) -> Option<usize> {
        names
            .iter()
            .find_map(|name| self.headers.iter().position(|h| h == name))
    }

    pub fn require(&self, names: &[&str]) -> Result<usize> {
        self.column(names).ok_or_else(|| {
            AppError::Parse(format!("no '{}' column in table", names.join("' / '")))
        })
    }

    pub fn rows(&self) -> &[StringRecord] {
        &self.rows
    }
}

pub fn cell<'a>(row: &'a StringRecord, idx: usize) -> &'a str {
    row.get(idx).map(str::trim).unwrap_or("")
}

/// Numeric cell; blanks, `--`, `NaN` and other non-numbers read as `None`.
pub fn number(row: &StringRecord, idx: usize) -> Option<f64> {
    cell(row, idx)
        .trim_end_matches('%')
        .replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Date cell in `YYYY-MM-DD`, `YYYY/MM/DD` or `YYYYMMDD`, with any time part
/// ignored.
pub fn date(row: &StringRecord, idx: usize) -> Option<NaiveDate> {
    let raw = cell(row, idx);
    let day = raw.split(|c| c == ' ' || c == 'T').next().unwrap_or(raw);
    ["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(day, fmt).ok())
}
