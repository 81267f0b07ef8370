// API
pub const DEFAULT_BASE_URL: &str = "https://enelogic.com/api";
pub const MEASURING_POINTS_PATH: &str = "measuringpoints/";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

// Authentication
pub const WSSE_HEADER: &str = "X-WSSE";
/// The Enelogic clock runs behind ours; a `Created` value in its future is rejected.
pub const CLOCK_SKEW_SECS: i64 = 30;
pub const CREATED_FORMAT: &str = "%Y-%m-%dT%H:%M:00Z";

// Output layout
pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const CSV_EXT: &str = "csv";
pub const DAY_FORMAT: &str = "%Y-%m-%d";
pub const DAILY_FILE_PATTERN: &str = r"^([^.]+)\.([0-9]{4}-[0-9]{2}-[0-9]{2})\.csv$";
