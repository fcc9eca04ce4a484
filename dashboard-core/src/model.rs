use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::presentation::WeatherCategory;

/// Current conditions for one city, as returned by `GET /api/weather`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub city: String,
    pub country: String,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
    pub temperature: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    /// Relative humidity, %.
    pub humidity: u8,
    /// hPa.
    pub pressure: u32,
    /// m/s.
    pub wind_speed: f64,
    /// Degrees, meteorological convention.
    #[serde(rename = "wind_deg", default)]
    pub wind_direction: u16,
    /// Cloudiness, %.
    #[serde(rename = "clouds")]
    pub cloudiness: u8,
    /// km.
    pub visibility: f64,
    /// Category code such as "Clear" or "Rain".
    #[serde(rename = "weather")]
    pub condition: String,
    #[serde(rename = "weather_description")]
    pub description: String,
    #[serde(rename = "weather_icon", default, skip_serializing_if = "Option::is_none")]
    pub icon_code: Option<String>,
    /// Local time, preformatted by the backend ("06:42").
    pub sunrise: String,
    pub sunset: String,
    /// Offset from UTC in seconds.
    #[serde(default)]
    pub timezone: i32,
}

impl WeatherSnapshot {
    pub fn category(&self) -> WeatherCategory {
        WeatherCategory::from_code(&self.condition)
    }
}

/// One past successful search, persisted by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub city_name: String,
    pub country: String,
    pub temperature: f64,
    pub humidity: u8,
    pub wind_speed: f64,
    pub weather_description: String,
    #[serde(deserialize_with = "iso_timestamp")]
    pub timestamp: DateTime<Utc>,
}

/// Body of `GET /api/history`.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryPage {
    #[serde(default)]
    pub count: usize,
    pub history: Vec<HistoryEntry>,
}

/// Body of `DELETE /api/history`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ClearAck {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub deleted_count: u64,
}

/// Error body the backend attaches to non-2xx responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: Option<String>,
}

/// Accepts both RFC 3339 timestamps and the naive `isoformat()` output the
/// backend stores, which is UTC without an offset.
fn iso_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{raw}'")))
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
