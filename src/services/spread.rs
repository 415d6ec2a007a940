// src/services/spread.rs
//
// Equity/bond spread engine: monthly resampling of raw provider samples,
// forward-fill with static defaults, and percentile context for a target month.
use chrono::{Datelike, NaiveDate};
use log::{debug, warn};
use std::collections::BTreeMap;

use crate::error::{AppError, Result};
use crate::models::{
    DisplayYear, EstimatedFields, Field, Metrics, RawSample, SpreadPoint, SpreadReport,
};
use crate::services::calculations::round_to;

/// History always starts on January 1st of this year.
pub const HISTORY_START_YEAR: i32 = 2005;

pub const DEFAULT_PE: f64 = 15.0;
pub const DEFAULT_PB: f64 = 1.5;
pub const DEFAULT_BOND_YIELD: f64 = 3.0;
pub const DEFAULT_INDEX_LEVEL: f64 = 3000.0;

pub fn parse_target_date(date: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::InvalidDate(date.to_string()))
}

pub fn month_start(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

/// E/P in percent. Non-positive PE contributes no yield at all.
pub fn earnings_yield(pe: f64) -> f64 {
    if pe > 0.0 {
        100.0 / pe
    } else {
        0.0
    }
}

/// Share of `population` at or below `value`, in percent with two decimals.
pub fn percentile_rank(value: f64, population: &[f64]) -> f64 {
    if population.is_empty() {
        return 0.0;
    }
    let rank = population.iter().filter(|v| **v <= value).count();
    round_to(rank as f64 / population.len() as f64 * 100.0, 2)
}

#[derive(Debug, Default, Clone, Copy)]
struct MonthBucket {
    index_level: Option<f64>,
    pe: Option<f64>,
    pb: Option<f64>,
    bond_yield: Option<f64>,
}

fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

impl MonthBucket {
    // Later observations overwrite earlier ones field by field.
    fn absorb(&mut self, sample: &RawSample) {
        if let Some(v) = present(sample.index_level) {
            self.index_level = Some(v);
        }
        if let Some(v) = present(sample.pe) {
            self.pe = Some(v);
        }
        if let Some(v) = present(sample.pb) {
            self.pb = Some(v);
        }
        if let Some(v) = present(sample.bond_yield) {
            self.bond_yield = Some(v);
        }
    }
}

/// Returns the resolved value and whether it came from the static default.
fn resolve(current: Option<f64>, carried: &mut Option<f64>, default: f64) -> (f64, bool) {
    if let Some(value) = current {
        *carried = Some(value);
        return (value, false);
    }
    match carried {
        Some(value) => (*value, false),
        None => (default, true),
    }
}

fn in_window(date: NaiveDate, end_date: NaiveDate) -> bool {
    date.year() >= HISTORY_START_YEAR && date <= end_date
}

pub fn build_series(raw_samples: &[RawSample], end_date: NaiveDate) -> Vec<SpreadPoint> {
    let mut ordered: Vec<&RawSample> = raw_samples
        .iter()
        .filter(|s| in_window(s.date, end_date))
        .collect();
    // Stable: same-day samples keep their input order, so the later one wins.
    ordered.sort_by_key(|s| s.date);

    let mut months: BTreeMap<NaiveDate, MonthBucket> = BTreeMap::new();
    for sample in ordered {
        months
            .entry(month_start(sample.date))
            .or_default()
            .absorb(sample);
    }

    let mut carried = MonthBucket::default();
    let mut series = Vec::with_capacity(months.len());

    for (date, bucket) in months {
        let mut estimated = Vec::new();

        let (index_level, index_default) =
            resolve(bucket.index_level, &mut carried.index_level, DEFAULT_INDEX_LEVEL);
        let (pe, pe_default) = resolve(bucket.pe, &mut carried.pe, DEFAULT_PE);
        let (pb, pb_default) = resolve(bucket.pb, &mut carried.pb, DEFAULT_PB);
        let (bond_yield, bond_default) =
            resolve(bucket.bond_yield, &mut carried.bond_yield, DEFAULT_BOND_YIELD);

        for (defaulted, field) in [
            (index_default, Field::IndexLevel),
            (pe_default, Field::Pe),
            (pb_default, Field::Pb),
            (bond_default, Field::BondYield),
        ] {
            if defaulted {
                estimated.push(field);
            }
        }

        let earnings_yield = earnings_yield(pe);
        let year = date.year();

        series.push(SpreadPoint {
            date,
            year,
            display_year: DisplayYear(if date.month() == 1 { Some(year) } else { None }),
            earnings_yield,
            spread: earnings_yield - bond_yield,
            index_level,
            pe,
            pb,
            bond_yield,
            estimated,
        });
    }

    let estimated = EstimatedFields::tally(&series);
    if estimated.total() > 0 {
        warn!(
            "Spread history used defaults: indexLevel={} pe={} pb={} bondYield={} (of {} months)",
            estimated.index_level,
            estimated.pe,
            estimated.pb,
            estimated.bond_yield,
            series.len()
        );
    }

    series
}

pub fn target_metrics(series: &[SpreadPoint], target_date: &str) -> Result<Metrics> {
    let key = month_start(parse_target_date(target_date)?);

    let point = match series.iter().find(|p| p.date == key) {
        Some(point) => point,
        None => match series.last() {
            Some(latest) => {
                debug!("No spread point for {}, using latest month {}", key, latest.date);
                latest
            }
            None => {
                warn!("Empty spread history, returning default metrics");
                return Ok(Metrics::default());
            }
        },
    };

    let spreads: Vec<f64> = series.iter().map(|p| p.spread).collect();
    let pbs: Vec<f64> = series.iter().map(|p| p.pb).collect();
    let pes: Vec<f64> = series.iter().map(|p| p.pe).collect();

    Ok(Metrics {
        spread_percentile: percentile_rank(point.spread, &spreads),
        spread: format!("{:.2}", point.spread),
        pb: round_to(point.pb, 2),
        pb_percentile: percentile_rank(point.pb, &pbs),
        pe: round_to(point.pe, 2),
        pe_percentile: percentile_rank(point.pe, &pes),
    })
}

/// Full report for `target_date`: history up to that date plus metrics.
pub fn spread_report(raw_samples: &[RawSample], target_date: &str) -> Result<SpreadReport> {
    let end_date = parse_target_date(target_date)?;
    let chart_data = build_series(raw_samples, end_date);
    let metrics = target_metrics(&chart_data, target_date)?;
    let estimated_fields = EstimatedFields::tally(&chart_data);

    Ok(SpreadReport {
        metrics,
        chart_data,
        estimated_fields,
    })
}
