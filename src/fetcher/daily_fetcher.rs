use super::api_client::EnelogicClient;
use super::day_range::{clamp_range, days_in_range, DayWindow};
use crate::codec::encode_records;
use crate::errors::AppResult;
use crate::models::{DailyKey, MeasuringPoint};
use crate::storage::RecordStore;
use crate::ui;
use tracing::{debug, info};

/// Counts collected over one fetch run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FetchSummary {
    /// Measuring points listed by the API
    pub points: usize,
    /// Days covered by the (clamped) ranges of all points
    pub days_in_range: usize,
    /// Days skipped because their file already existed
    pub skipped: usize,
    /// Daily files written
    pub written: usize,
    /// Days requested that returned no records
    pub empty: usize,
}

impl FetchSummary {
    /// Number of datapoint requests made.
    pub fn requested(&self) -> usize {
        self.written + self.empty
    }
}

/// Downloads every missing day of every measuring point into `store`.
///
/// Points are processed in id order, days in calendar order, one request at a
/// time. A day whose file already exists is skipped without a request, which
/// makes re-running after a failure cheap.
///
/// # Errors
///
/// Any network, JSON, CSV or storage error aborts the run immediately. Files
/// written before the failure are kept.
pub async fn fetch_all<S: RecordStore>(
    client: &EnelogicClient,
    store: &mut S,
    window: &DayWindow,
) -> AppResult<FetchSummary> {
    info!("Fetching measuring points");
    let points = client.measuring_points().await?;
    info!(points = points.len(), "Measuring points fetched");

    let mut summary = FetchSummary {
        points: points.len(),
        ..FetchSummary::default()
    };

    for point in points.values() {
        fetch_point(client, store, point, window, &mut summary).await?;
    }

    info!(
        points = summary.points,
        written = summary.written,
        empty = summary.empty,
        skipped = summary.skipped,
        "Fetch completed"
    );
    Ok(summary)
}

/// Downloads the missing days of a single measuring point.
pub async fn fetch_point<S: RecordStore>(
    client: &EnelogicClient,
    store: &mut S,
    point: &MeasuringPoint,
    window: &DayWindow,
    summary: &mut FetchSummary,
) -> AppResult<()> {
    let (start, end) = clamp_range(point.day_min, point.day_max, window);
    let days: Vec<_> = days_in_range(start, end).collect();
    summary.days_in_range += days.len();

    info!(
        point_id = %point.id,
        label = point.label.as_deref().unwrap_or(""),
        start = %start,
        end = %end,
        days = days.len(),
        "Processing measuring point"
    );

    let pb = ui::create_progress_bar(days.len() as u64)?;

    for day in days {
        pb.inc(1);
        let key = DailyKey::new(point.id.clone(), day);
        let file_name = key.file_name();

        if store.exists(&file_name)? {
            summary.skipped += 1;
            continue;
        }

        pb.set_message(file_name.clone());
        let next_day = day.succ_opt().unwrap_or(day);
        debug!(point_id = %point.id, day = %day, "Fetching datapoints");
        let records = client.datapoints(&point.id, day, next_day).await?;

        // An empty day leaves no file behind, so it is requested again next run
        if records.is_empty() {
            debug!(point_id = %point.id, day = %day, "No datapoints returned");
            summary.empty += 1;
            continue;
        }

        store.write(&file_name, &encode_records(&records)?)?;
        summary.written += 1;
        info!(file = %file_name, records = records.len(), "Daily file written");
    }

    pb.finish_and_clear();
    Ok(())
}
