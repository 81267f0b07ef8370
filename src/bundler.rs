//! Consolidation of daily CSV files into yearly bundles.
//!
//! Bundles are derived data: each run rebuilds every `<pointId>.<YYYY>.csv` from
//! whatever daily files are present, so they can be deleted at any time.

use crate::codec::Table;
use crate::config::ResolvedConfig;
use crate::errors::{AppError, AppResult};
use crate::models::{BundleKey, DailyKey};
use crate::storage::{FsStore, RecordStore};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Counts collected over one bundling run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BundleSummary {
    /// Daily files found in the store
    pub daily_files: usize,
    /// Yearly files written
    pub bundles_written: usize,
    /// Data rows written across all bundles
    pub rows: usize,
    /// Groups without any data rows
    pub skipped_groups: usize,
}

/// Groups daily files by measuring point and year, with days in calendar order.
pub fn group_daily_files(names: &[String]) -> BTreeMap<BundleKey, Vec<DailyKey>> {
    let mut groups: BTreeMap<BundleKey, Vec<DailyKey>> = BTreeMap::new();
    for key in names.iter().filter_map(|name| DailyKey::from_file_name(name)) {
        groups.entry(key.bundle_key()).or_default().push(key);
    }
    for days in groups.values_mut() {
        days.sort();
    }
    groups
}

/// Rebuilds every yearly bundle in `store` from its daily files.
///
/// # Errors
///
/// Returns an error if a daily file can't be read or parsed, if its columns are
/// not a subset of the bundle header, or if writing a bundle fails.
pub fn bundle<S: RecordStore>(store: &mut S) -> AppResult<BundleSummary> {
    let names = store.list()?;
    let groups = group_daily_files(&names);

    let mut summary = BundleSummary {
        daily_files: groups.values().map(Vec::len).sum(),
        ..BundleSummary::default()
    };

    info!(
        daily_files = summary.daily_files,
        bundles = groups.len(),
        "Starting bundling"
    );

    for (bundle_key, days) in &groups {
        let table = merge_days(store, days)?;
        let file_name = bundle_key.file_name();

        if table.is_empty() {
            warn!(file = %file_name, files = days.len(), "No rows to bundle, skipping");
            summary.skipped_groups += 1;
            continue;
        }

        store.write(&file_name, &table.to_csv()?)?;
        summary.bundles_written += 1;
        summary.rows += table.rows.len();
        debug!(file = %file_name, files = days.len(), rows = table.rows.len(), "Bundle written");
    }

    info!(
        bundles = summary.bundles_written,
        rows = summary.rows,
        skipped = summary.skipped_groups,
        "Bundling completed"
    );
    Ok(summary)
}

fn merge_days<S: RecordStore>(store: &S, days: &[DailyKey]) -> AppResult<Table> {
    let mut merged = Table::default();
    for day in days {
        let name = day.file_name();
        let table = Table::from_csv(&store.read(&name)?)
            .map_err(|e| AppError::ParseError(format!("{name}: {e}")))?;
        merged
            .append(table)
            .map_err(|e| AppError::DataError(format!("{name}: {e}")))?;
    }
    Ok(merged)
}

/// Rebuilds the yearly bundles in `config.output_dir`.
pub fn bundle_dir(config: &ResolvedConfig) -> AppResult<BundleSummary> {
    let mut store = FsStore::open(&config.output_dir)?;
    bundle(&mut store)
}
