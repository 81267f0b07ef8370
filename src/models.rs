use crate::constants::{CSV_EXT, DAILY_FILE_PATTERN, DAY_FORMAT};
use chrono::{Datelike, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::sync::OnceLock;

/// One datapoint as returned by the API: field name to JSON scalar, in API field order.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Cached regex for recognising daily file names.
static DAILY_FILE_REGEX: OnceLock<Regex> = OnceLock::new();

/// WSSE identity and shared secret used to sign every request.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    identity: String,
    secret: String,
}

impl Credentials {
    /// Combines the developer app credentials with the user account.
    ///
    /// The identity is `app_id.username` and the secret is `app_secret.api_key`.
    pub fn new(username: &str, app_id: &str, app_secret: &str, api_key: &str) -> Self {
        Self {
            identity: format!("{app_id}.{username}"),
            secret: format!("{app_secret}.{api_key}"),
        }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identity", &self.identity)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Stable identifier of a measuring point.
///
/// The API sends ids as JSON numbers; strings are accepted too. Ids end up in
/// file names, so separators and dots are rejected.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MeasuringPointId(String);

impl MeasuringPointId {
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        let valid = !id.is_empty() && !id.contains(['.', '/', '\\']);
        valid.then_some(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MeasuringPointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for MeasuringPointId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(u64),
            Text(String),
        }

        let raw = match RawId::deserialize(deserializer)? {
            RawId::Number(n) => n.to_string(),
            RawId::Text(s) => s,
        };
        MeasuringPointId::new(raw.clone())
            .ok_or_else(|| serde::de::Error::custom(format!("invalid measuring point id '{raw}'")))
    }
}

/// A meter with the half-open range of days `[day_min, day_max)` that has data.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MeasuringPoint {
    pub id: MeasuringPointId,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(rename = "dayMin", deserialize_with = "deserialize_day")]
    pub day_min: NaiveDate,
    #[serde(rename = "dayMax", deserialize_with = "deserialize_day")]
    pub day_max: NaiveDate,
}

/// Parses the date part of an API timestamp such as `2013-07-29 00:00:00`.
pub fn parse_api_day(value: &str) -> Result<NaiveDate, chrono::ParseError> {
    let date_part = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(date_part, DAY_FORMAT)
}

fn deserialize_day<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_api_day(&raw).map_err(|e| serde::de::Error::custom(format!("invalid day '{raw}': {e}")))
}

/// Identifies the daily file for one measuring point and calendar day.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DailyKey {
    pub point_id: MeasuringPointId,
    pub day: NaiveDate,
}

impl DailyKey {
    pub fn new(point_id: MeasuringPointId, day: NaiveDate) -> Self {
        Self { point_id, day }
    }

    /// `<pointId>.<YYYY-MM-DD>.csv`
    pub fn file_name(&self) -> String {
        format!(
            "{}.{}.{CSV_EXT}",
            self.point_id,
            self.day.format(DAY_FORMAT)
        )
    }

    /// Recognises a daily file name; yearly bundles and unrelated files yield `None`.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let regex = DAILY_FILE_REGEX.get_or_init(|| {
            Regex::new(DAILY_FILE_PATTERN).expect("DAILY_FILE_PATTERN is a valid regex pattern")
        });
        let captures = regex.captures(name)?;
        let point_id = MeasuringPointId::new(captures.get(1)?.as_str())?;
        let day = NaiveDate::parse_from_str(captures.get(2)?.as_str(), DAY_FORMAT).ok()?;
        Some(Self { point_id, day })
    }

    pub fn bundle_key(&self) -> BundleKey {
        BundleKey {
            point_id: self.point_id.clone(),
            year: self.day.year(),
        }
    }
}

/// Identifies the yearly bundle for one measuring point.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BundleKey {
    pub point_id: MeasuringPointId,
    pub year: i32,
}

impl BundleKey {
    /// `<pointId>.<YYYY>.csv`
    pub fn file_name(&self) -> String {
        format!("{}.{:04}.{CSV_EXT}", self.point_id, self.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DAY_FORMAT).unwrap()
    }

    #[test]
    fn credentials_combine_app_and_user() {
        let creds = Credentials::new("user@example.com", "appid", "appsecret", "apikey");
        assert_eq!(creds.identity(), "appid.user@example.com");
        assert_eq!(creds.secret(), "appsecret.apikey");
    }

    #[test]
    fn credentials_debug_hides_secret() {
        let creds = Credentials::new("user", "app", "topsecret", "key");
        let debug = format!("{creds:?}");
        assert!(debug.contains("app.user"));
        assert!(!debug.contains("topsecret"));
    }

    #[test]
    fn measuring_point_deserializes_numeric_id_and_timestamps() {
        let json = r#"{
            "id": 123,
            "label": "Electricity",
            "unitType": 0,
            "dayMin": "2023-06-01 00:00:00",
            "dayMax": "2023-06-02 00:00:00"
        }"#;
        let point: MeasuringPoint = serde_json::from_str(json).unwrap();
        assert_eq!(point.id.as_str(), "123");
        assert_eq!(point.label.as_deref(), Some("Electricity"));
        assert_eq!(point.day_min, day("2023-06-01"));
        assert_eq!(point.day_max, day("2023-06-02"));
    }

    #[test]
    fn measuring_point_accepts_string_id() {
        let json = r#"{"id": "abc", "dayMin": "2023-06-01", "dayMax": "2023-06-03"}"#;
        let point: MeasuringPoint = serde_json::from_str(json).unwrap();
        assert_eq!(point.id.as_str(), "abc");
        assert!(point.label.is_none());
    }

    #[test]
    fn measuring_point_rejects_dotted_id() {
        let json = r#"{"id": "1.2", "dayMin": "2023-06-01", "dayMax": "2023-06-03"}"#;
        assert!(serde_json::from_str::<MeasuringPoint>(json).is_err());
    }

    #[test]
    fn measuring_point_rejects_bad_day() {
        let json = r#"{"id": 1, "dayMin": "yesterday", "dayMax": "2023-06-03"}"#;
        assert!(serde_json::from_str::<MeasuringPoint>(json).is_err());
    }

    #[test]
    fn daily_key_file_name_round_trips() {
        let key = DailyKey::new(MeasuringPointId::new("123").unwrap(), day("2023-01-02"));
        assert_eq!(key.file_name(), "123.2023-01-02.csv");
        assert_eq!(DailyKey::from_file_name(&key.file_name()), Some(key));
    }

    #[test]
    fn daily_key_ignores_bundles_and_other_files() {
        assert!(DailyKey::from_file_name("123.2023.csv").is_none());
        assert!(DailyKey::from_file_name("123.2023-01-02.csv.part").is_none());
        assert!(DailyKey::from_file_name("notes.txt").is_none());
        assert!(DailyKey::from_file_name("123.2023-02-30.csv").is_none());
    }

    #[test]
    fn bundle_key_from_daily_key() {
        let key = DailyKey::new(MeasuringPointId::new("123").unwrap(), day("2023-12-31"));
        let bundle = key.bundle_key();
        assert_eq!(bundle.year, 2023);
        assert_eq!(bundle.file_name(), "123.2023.csv");
    }
}
