// src/services/source.rs
use log::{error, info, warn};
use reqwest::Client;
use std::fmt;
use std::path::PathBuf;

use crate::config::FetchSettings;
use crate::error::{AppError, Result};
use crate::services::table::Table;

/// Where a provider table is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    Url(String),
}

impl Source {
    /// Join a table path onto the configured data directory or base URL.
    pub fn resolve(base: &str, table: &str) -> Source {
        let table = table.trim_start_matches('/');
        if base.starts_with("http://") || base.starts_with("https://") {
            Source::Url(format!("{}/{}", base.trim_end_matches('/'), table))
        } else {
            Source::File(PathBuf::from(base).join(table))
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Source::File(path) => write!(f, "{}", path.display()),
            Source::Url(url) => write!(f, "{}", url),
        }
    }
}

async fn fetch_url(client: &Client, url: &str) -> Result<String> {
    let text = client
        .get(url)
        .header("User-Agent", "Mozilla/5.0")
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    Ok(text)
}

/// Load a table as text. URL sources are retried up to `fetch.retries`
/// attempts; local files are read once.
pub async fn load_text(source: &Source, fetch: &FetchSettings) -> Result<String> {
    match source {
        Source::File(path) => {
            info!("Reading table from {}", source);
            tokio::fs::read_to_string(path)
                .await
                .map_err(|e| AppError::Io(format!("{}: {}", source, e)))
        }
        Source::Url(url) => {
            let client = Client::builder().timeout(fetch.timeout).build()?;
            let mut attempt = 1;
            loop {
                info!("Fetching table from URL: {} (attempt {})", source, attempt);
                match fetch_url(&client, url).await {
                    Ok(text) => return Ok(text),
                    Err(e) if attempt < fetch.retries => {
                        warn!("Fetch of {} failed: {}, retrying", source, e);
                        tokio::time::sleep(fetch.retry_delay).await;
                        attempt += 1;
                    }
                    Err(e) => {
                        error!("Giving up on {} after {} attempts: {}", source, attempt, e);
                        return Err(e);
                    }
                }
            }
        }
    }
}

/// Resolve `table` under `data_dir`, load it and parse it as CSV.
pub async fn load_table(data_dir: &str, table: &str, fetch: &FetchSettings) -> Result<Table> {
    let source = Source::resolve(data_dir, table);
    let text = load_text(&source, fetch).await?;
    Table::parse(&text)
}
