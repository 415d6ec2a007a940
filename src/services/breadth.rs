// src/services/breadth.rs
//
// Market breadth (advancers/decliners). The aggregator has no cheap
// whole-market snapshot, so its breadth is extrapolated from the intraday move
// of the two main indices; the terminal provides per-stock changes to count.
use log::debug;

use crate::models::{Breadth, IndexBar};
use crate::services::calculations::{calculate_average, pct_change, round_to};

/// Daily limit move used to classify limit-up / limit-down stocks.
pub const LIMIT_MOVE_PCT: f64 = 9.9;

impl Breadth {
    pub fn zero() -> Self {
        Breadth {
            up_limit: 0,
            up: 0,
            flat: 0,
            down: 0,
            down_limit: 0,
            change_percent: 0.0,
        }
    }

    /// Returned when no index data is available for the estimate.
    pub fn estimate_default() -> Self {
        Breadth {
            up_limit: 15,
            up: 1800,
            flat: 200,
            down: 1700,
            down_limit: 12,
            change_percent: 50.0,
        }
    }
}

/// Open-to-close change of a bar in percent.
pub fn intraday_pct(bar: &IndexBar) -> f64 {
    pct_change(bar.open, bar.close)
}

// Python-style int(): truncate toward zero.
fn trunc(value: f64) -> i64 {
    value as i64
}

pub fn estimate_breadth(avg_pct: f64) -> Breadth {
    let raw = if avg_pct > 2.0 {
        Breadth {
            up_limit: trunc(30.0 + avg_pct * 8.0),
            up: trunc(2500.0 + avg_pct * 300.0),
            flat: 120,
            down: trunc(1200.0 - avg_pct * 200.0),
            down_limit: trunc(8.0 - avg_pct),
            change_percent: round_to(60.0 + avg_pct * 3.0, 2),
        }
    } else if avg_pct > 0.0 {
        Breadth {
            up_limit: trunc(20.0 + avg_pct * 10.0),
            up: trunc(2000.0 + avg_pct * 500.0),
            flat: 150,
            down: trunc(1500.0 - avg_pct * 400.0),
            down_limit: trunc(10.0 - avg_pct * 2.0),
            change_percent: round_to(55.0 + avg_pct * 5.0, 2),
        }
    } else if avg_pct > -2.0 {
        Breadth {
            up_limit: trunc(10.0 + avg_pct * 2.0),
            up: trunc(1500.0 + avg_pct * 400.0),
            flat: 150,
            down: trunc(2000.0 - avg_pct * 500.0),
            down_limit: trunc(20.0 - avg_pct * 10.0),
            change_percent: round_to(45.0 + avg_pct * 5.0, 2),
        }
    } else {
        Breadth {
            up_limit: trunc(8.0 - avg_pct),
            up: trunc(1200.0 - avg_pct * 200.0),
            flat: 120,
            down: trunc(2500.0 + avg_pct * 300.0),
            down_limit: trunc(30.0 + avg_pct * 8.0),
            change_percent: round_to(40.0 + avg_pct * 3.0, 2),
        }
    };

    Breadth {
        up_limit: raw.up_limit.clamp(0, 200),
        up: raw.up.clamp(100, 4000),
        flat: raw.flat.clamp(50, 500),
        down: raw.down.clamp(100, 4000),
        down_limit: raw.down_limit.clamp(0, 200),
        change_percent: raw.change_percent.clamp(0.0, 100.0),
    }
}

/// Breadth estimate from the latest bar of each index that could be loaded.
pub fn estimate_from_indices(latest_bars: &[IndexBar]) -> Breadth {
    if latest_bars.is_empty() {
        debug!("No index bars for breadth estimate, using defaults");
        return Breadth::estimate_default();
    }
    let moves: Vec<f64> = latest_bars.iter().map(intraday_pct).collect();
    estimate_breadth(calculate_average(&moves))
}

/// Exact breadth from per-stock percentage changes.
pub fn count_breadth(changes: &[f64]) -> Breadth {
    if changes.is_empty() {
        return Breadth::zero();
    }

    let mut breadth = Breadth::zero();
    for &c in changes {
        if c >= LIMIT_MOVE_PCT {
            breadth.up_limit += 1;
        } else if c > 0.0 {
            breadth.up += 1;
        } else if c == 0.0 {
            breadth.flat += 1;
        } else if c > -LIMIT_MOVE_PCT {
            breadth.down += 1;
        } else {
            breadth.down_limit += 1;
        }
    }
    breadth.change_percent = round_to(breadth.up as f64 / changes.len() as f64 * 100.0, 2);
    breadth
}
