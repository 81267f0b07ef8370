//! Common test utilities for integration tests

use enelogic_cli::models::Credentials;
use std::fs;
use std::path::Path;

/// Helper function to create a daily CSV file in a directory
#[allow(dead_code)]
pub fn create_daily_file(dir: &Path, name: &str, content: &str) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join(name), content).unwrap();
}

/// Credentials accepted by the mock server
#[allow(dead_code)]
pub fn test_credentials() -> Credentials {
    Credentials::new("user@example.com", "appid", "appsecret", "apikey")
}

/// Measuring point listing with one point covering two days
#[allow(dead_code)]
pub const TWO_DAY_POINTS: &str = r#"[
  {
    "id": 123,
    "label": "Electricity",
    "dayMin": "2024-01-01 00:00:00",
    "dayMax": "2024-01-03 00:00:00"
  }
]"#;

/// Datapoints as returned for one day
#[allow(dead_code)]
pub const DAY_ONE_DATAPOINTS: &str = r#"[
  {"date": "2024-01-01 00:00:00", "quantity": 1.5, "tariff": 1},
  {"date": "2024-01-01 00:15:00", "quantity": 2.25, "tariff": 1}
]"#;

#[allow(dead_code)]
pub const DAY_TWO_DATAPOINTS: &str = r#"[
  {"date": "2024-01-02 00:00:00", "quantity": 3, "tariff": 2}
]"#;
