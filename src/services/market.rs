// src/services/market.rs
use chrono::{NaiveDate, Utc};
use chrono_tz::Asia::Shanghai;
use log::{info, warn};

use crate::config::{ProviderKind, Settings};
use crate::error::Result;
use crate::models::{
    Breadth, IndexQuote, MarketData, Overview, OverviewIndex, RawSample, SectorSummary,
    SpreadReport,
};
use crate::services::aggregator::Aggregator;
use crate::services::indices::OVERVIEW_INDICES;
use crate::services::spread::{parse_target_date, spread_report};
use crate::services::terminal::Terminal;

/// Today's date on the Shanghai/Shenzhen exchanges.
pub fn market_today() -> NaiveDate {
    Utc::now().with_timezone(&Shanghai).date_naive()
}

/// The configured data provider. Every report goes through here so callers
/// never depend on a provider's table layout.
pub enum Provider<'a> {
    Aggregator(Aggregator<'a>),
    Terminal(Terminal<'a>),
}

impl<'a> Provider<'a> {
    pub fn from_settings(settings: &'a Settings) -> Self {
        match settings.provider {
            ProviderKind::Aggregator => Provider::Aggregator(Aggregator::new(settings)),
            ProviderKind::Terminal => Provider::Terminal(Terminal::new(settings)),
        }
    }

    pub async fn spread_samples(&self) -> Result<Vec<RawSample>> {
        match self {
            Provider::Aggregator(p) => p.spread_samples().await,
            Provider::Terminal(p) => p.spread_samples().await,
        }
    }

    pub async fn index_quotes(&self, codes: &[String], day: NaiveDate) -> Vec<IndexQuote> {
        match self {
            Provider::Aggregator(p) => p.index_quotes(codes, day).await,
            Provider::Terminal(p) => p.index_quotes(codes, day).await,
        }
    }

    pub async fn breadth(&self, day: NaiveDate) -> Breadth {
        match self {
            Provider::Aggregator(p) => p.breadth(day).await,
            Provider::Terminal(p) => p.breadth(day).await,
        }
    }

    pub async fn sectors(&self) -> Vec<SectorSummary> {
        match self {
            Provider::Aggregator(p) => p.sectors().await,
            Provider::Terminal(p) => p.sectors().await,
        }
    }
}

/// Spread report for `date`. Fails on an invalid date or when the provider
/// cannot deliver the index history at all.
pub async fn equity_bond_spread(settings: &Settings, date: &str) -> Result<SpreadReport> {
    parse_target_date(date)?;
    let samples = Provider::from_settings(settings).spread_samples().await?;
    spread_report(&samples, date)
}

/// Full dashboard payload. Only an invalid date is an error; provider
/// outages degrade to default values.
pub async fn get_market_data(settings: &Settings, date: &str) -> Result<MarketData> {
    let day = parse_target_date(date)?;
    let provider = Provider::from_settings(settings);
    info!("Assembling market data for {} from {}", date, settings.provider);

    let samples = match provider.spread_samples().await {
        Ok(samples) => samples,
        Err(e) => {
            warn!("Spread history unavailable, using default metrics: {}", e);
            Vec::new()
        }
    };
    let equity_bond_spread = spread_report(&samples, date)?;

    let codes: Vec<String> = OVERVIEW_INDICES
        .iter()
        .map(|(_, code)| code.to_string())
        .collect();
    let (breadth, sectors, quotes) = tokio::join!(
        provider.breadth(day),
        provider.sectors(),
        provider.index_quotes(&codes, day)
    );

    let indices = OVERVIEW_INDICES
        .iter()
        .zip(quotes)
        .map(|((name, _), quote)| OverviewIndex {
            name: name.to_string(),
            change_percent: quote.pct_chg,
            volume: quote.volume,
        })
        .collect();

    Ok(MarketData {
        date: date.to_string(),
        overview: Overview { breadth, indices },
        sectors,
        equity_bond_spread,
    })
}
