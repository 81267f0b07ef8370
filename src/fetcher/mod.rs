//! Download operations for Enelogic datapoints.
//!
//! This module talks to the Enelogic API and writes one CSV file per measuring
//! point and day. The main entry points are [`fetch`] and [`fetch_all`].

mod api_client;
mod daily_fetcher;
mod day_range;

// Re-export public API
pub use api_client::EnelogicClient;
pub use daily_fetcher::{fetch_all, fetch_point, FetchSummary};
pub use day_range::{clamp_range, days_in_range, parse_day, validate_day_format, DayWindow};

use crate::config::ResolvedConfig;
use crate::errors::AppResult;
use crate::models::Credentials;
use crate::storage::FsStore;

/// Fetches every missing day for every measuring point into `config.output_dir`.
pub async fn fetch(
    credentials: Credentials,
    config: &ResolvedConfig,
    window: &DayWindow,
) -> AppResult<FetchSummary> {
    let client = EnelogicClient::from_config(credentials, config)?;
    let mut store = FsStore::open(&config.output_dir)?;
    fetch_all(&client, &mut store, window).await
}
