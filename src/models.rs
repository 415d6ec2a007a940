// src/models.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};

use crate::services::calculations::round_to;

/// One raw observation as delivered by a provider adapter. Any value may be
/// missing; the spread engine resolves gaps.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RawSample {
    pub date: NaiveDate,
    pub index_level: Option<f64>,
    pub pe: Option<f64>,
    pub pb: Option<f64>,
    pub bond_yield: Option<f64>,
}

impl RawSample {
    pub fn empty(date: NaiveDate) -> Self {
        RawSample {
            date,
            index_level: None,
            pe: None,
            pb: None,
            bond_yield: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    IndexLevel,
    Pe,
    Pb,
    BondYield,
}

/// Year label for sparse chart axes: the year in January, blank otherwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayYear(pub Option<i32>);

impl Serialize for DisplayYear {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Some(year) => serializer.serialize_i32(year),
            None => serializer.serialize_str(""),
        }
    }
}

fn serialize_round2<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(round_to(*value, 2))
}

fn serialize_whole<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_i64(round_to(*value, 0) as i64)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpreadPoint {
    pub date: NaiveDate,
    pub year: i32,
    pub display_year: DisplayYear,
    #[serde(serialize_with = "serialize_round2")]
    pub earnings_yield: f64,
    #[serde(serialize_with = "serialize_round2")]
    pub spread: f64,
    #[serde(serialize_with = "serialize_whole")]
    pub index_level: f64,
    #[serde(serialize_with = "serialize_round2")]
    pub pe: f64,
    #[serde(serialize_with = "serialize_round2")]
    pub pb: f64,
    #[serde(serialize_with = "serialize_round2")]
    pub bond_yield: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub estimated: Vec<Field>,
}

impl SpreadPoint {
    /// The fully populated sample this point was derived from.
    pub fn to_raw(&self) -> RawSample {
        RawSample {
            date: self.date,
            index_level: Some(self.index_level),
            pe: Some(self.pe),
            pb: Some(self.pb),
            bond_yield: Some(self.bond_yield),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub spread_percentile: f64,
    pub spread: String,
    pub pb: f64,
    pub pb_percentile: f64,
    pub pe: f64,
    pub pe_percentile: f64,
}

impl Default for Metrics {
    fn default() -> Self {
        Metrics {
            spread_percentile: 50.0,
            spread: "2.0".to_string(),
            pb: 1.5,
            pb_percentile: 50.0,
            pe: 15.0,
            pe_percentile: 50.0,
        }
    }
}

/// Number of months per field whose value came from a static default.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimatedFields {
    pub index_level: usize,
    pub pe: usize,
    pub pb: usize,
    pub bond_yield: usize,
}

impl EstimatedFields {
    pub fn tally(series: &[SpreadPoint]) -> Self {
        let mut counts = EstimatedFields::default();
        for field in series.iter().flat_map(|p| p.estimated.iter()) {
            match field {
                Field::IndexLevel => counts.index_level += 1,
                Field::Pe => counts.pe += 1,
                Field::Pb => counts.pb += 1,
                Field::BondYield => counts.bond_yield += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.index_level + self.pe + self.pb + self.bond_yield
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpreadReport {
    pub metrics: Metrics,
    pub chart_data: Vec<SpreadPoint>,
    pub estimated_fields: EstimatedFields,
}

/// Daily OHLCV bar of an index.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexBar {
    pub date: NaiveDate,
    pub open: f64,
    pub close: f64,
    pub volume: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexQuote {
    pub code: String,
    pub pct_chg: f64,
    pub volume: f64,
    pub amt: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IndexQuote {
    pub fn zero(code: &str) -> Self {
        IndexQuote {
            code: code.to_string(),
            pct_chg: 0.0,
            volume: 0.0,
            amt: 0.0,
            error: None,
        }
    }

    pub fn failed(code: &str, error: impl Into<String>) -> Self {
        IndexQuote {
            error: Some(error.into()),
            ..IndexQuote::zero(code)
        }
    }
}

/// Advance/decline counts for the whole market.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Breadth {
    pub up_limit: i64,
    pub up: i64,
    pub flat: i64,
    pub down: i64,
    pub down_limit: i64,
    pub change_percent: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Mover {
    pub name: String,
    pub change_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorSummary {
    pub category: String,
    pub name: String,
    pub change_percent: f64,
    pub top_gainer: Mover,
    pub top_loser: Mover,
    pub up_count: usize,
    pub down_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SectorSummary {
    pub fn zero(category: &str, name: &str) -> Self {
        SectorSummary {
            category: category.to_string(),
            name: name.to_string(),
            change_percent: 0.0,
            top_gainer: Mover::default(),
            top_loser: Mover::default(),
            up_count: 0,
            down_count: 0,
            error: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewIndex {
    pub name: String,
    pub change_percent: f64,
    pub volume: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    #[serde(flatten)]
    pub breadth: Breadth,
    pub indices: Vec<OverviewIndex>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketData {
    pub date: String,
    pub overview: Overview,
    pub sectors: Vec<SectorSummary>,
    pub equity_bond_spread: SpreadReport,
}
