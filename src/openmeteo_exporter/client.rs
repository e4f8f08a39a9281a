// openmeteo_exporter - Prometheus metrics exporter for the Open-Meteo forecast API
//
// Copyright 2024 Nick Pillitteri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.
//

use crate::fields;
use crate::location::Location;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Deserializer};
use std::error;
use std::fmt;

/// Timezone used for local timestamps and daily aggregation unless configured otherwise.
pub const DEFAULT_TIMEZONE: &str = "America/Los_Angeles";

/// Only "today" is ever exported so only a single day of daily data is requested.
const FORECAST_DAYS: &str = "1";

#[derive(Debug)]
pub enum ClientError {
    Internal(reqwest::Error),
    InvalidUrl(String, url::ParseError),
    Unexpected(StatusCode, Url),
    Decode(serde_json::Error),
    InvalidOffset(i32),
    EmptyDaily(&'static str),
    MisalignedDaily {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Internal(e) => write!(f, "{}", e),
            Self::InvalidUrl(url, e) => write!(f, "invalid API URL {}: {}", url, e),
            Self::Unexpected(status, url) => write!(f, "unexpected status {} for {}", status, url),
            Self::Decode(e) => write!(f, "unable to decode forecast: {}", e),
            Self::InvalidOffset(secs) => write!(f, "invalid UTC offset {}s", secs),
            Self::EmptyDaily(field) => write!(f, "daily field {} has no entries", field),
            Self::MisalignedDaily {
                field,
                expected,
                actual,
            } => write!(f, "daily field {} has {} entries, expected {}", field, actual, expected),
        }
    }
}

impl error::Error for ClientError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Internal(e) => Some(e),
            Self::InvalidUrl(_, e) => Some(e),
            Self::Decode(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct OpenMeteoClient {
    client: Client,
    base_url: Url,
    timezone: String,
}

impl OpenMeteoClient {
    const USER_AGENT: &'static str = concat!(
        "openmeteo_exporter/",
        env!("CARGO_PKG_VERSION"),
        " (Prometheus exporter)"
    );
    const JSON_RESPONSE: &'static str = "application/json";

    /// Create a new client for the forecast endpoint at `base_url` (for example
    /// `https://api.open-meteo.com/v1/forecast`), requesting local times in `timezone`.
    pub fn new(client: Client, base_url: &str, timezone: &str) -> Result<Self, ClientError> {
        let parsed = Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(base_url.to_owned(), e))?;
        Ok(OpenMeteoClient {
            client,
            base_url: parsed,
            timezone: timezone.to_owned(),
        })
    }

    /// Fetch current conditions and today's summary for the given location.
    ///
    /// The response is validated before being returned: every daily sequence must have
    /// at least one entry and all daily sequences must be the same length.
    pub async fn forecast(&self, location: &Location) -> Result<WeatherSnapshot, ClientError> {
        let request_url = self.forecast_url(location);
        tracing::debug!(message = "making forecast request", url = %request_url);

        let res = self
            .client
            .get(request_url.clone())
            .header(USER_AGENT, Self::USER_AGENT)
            .header(ACCEPT, Self::JSON_RESPONSE)
            .send()
            .await
            .map_err(ClientError::Internal)?;

        let status = res.status();
        if status != StatusCode::OK {
            return Err(ClientError::Unexpected(status, request_url));
        }

        let body = res.bytes().await.map_err(ClientError::Internal)?;
        let snapshot = serde_json::from_slice::<WeatherSnapshot>(&body).map_err(ClientError::Decode)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn forecast_url(&self, location: &Location) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("latitude", &location.latitude().to_string())
            .append_pair("longitude", &location.longitude().to_string())
            .append_pair("current", &fields::current_variables())
            .append_pair("daily", &fields::daily_variables())
            .append_pair("timezone", &self.timezone)
            .append_pair("forecast_days", FORECAST_DAYS);

        url
    }
}

/// Decoded forecast response.
///
/// Timestamps are reported by the API as local wall-clock times in the requested timezone
/// without an offset. Use `resolve()` or the `*_time()` methods to turn them into absolute
/// points in time using `utc_offset_seconds`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    pub elevation: f64,
    #[serde(default)]
    pub utc_offset_seconds: i32,
    pub current: CurrentConditions,
    pub daily: DailySummary,
}

impl WeatherSnapshot {
    pub fn offset(&self) -> Option<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_seconds)
    }

    /// Convert a local timestamp from this response into an absolute point in time.
    pub fn resolve(&self, local: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        self.offset().and_then(|o| o.from_local_datetime(&local).single())
    }

    /// Time the current conditions were observed.
    pub fn current_time(&self) -> Option<DateTime<FixedOffset>> {
        self.resolve(self.current.time)
    }

    /// Start (local midnight) of the first day of the daily summary.
    pub fn daily_time(&self) -> Option<DateTime<FixedOffset>> {
        self.daily
            .time
            .first()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .and_then(|t| self.resolve(t))
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        if self.offset().is_none() {
            return Err(ClientError::InvalidOffset(self.utc_offset_seconds));
        }

        self.daily.validate()
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    #[serde(deserialize_with = "local_datetime")]
    pub time: NaiveDateTime,
    pub temperature_2m: Option<f64>,
    pub relative_humidity_2m: Option<f64>,
    pub apparent_temperature: Option<f64>,
    pub is_day: Option<f64>,
    pub precipitation: Option<f64>,
    pub rain: Option<f64>,
    pub showers: Option<f64>,
    pub snowfall: Option<f64>,
    pub weather_code: Option<f64>,
    pub cloud_cover: Option<f64>,
    pub pressure_msl: Option<f64>,
    pub surface_pressure: Option<f64>,
    pub wind_speed_10m: Option<f64>,
    pub wind_direction_10m: Option<f64>,
    pub wind_gusts_10m: Option<f64>,
}

/// Per-day values, index aligned: entry `i` of every sequence describes the same day.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct DailySummary {
    #[serde(deserialize_with = "local_dates")]
    pub time: Vec<NaiveDate>,
    #[serde(deserialize_with = "local_datetimes")]
    pub sunrise: Vec<NaiveDateTime>,
    #[serde(deserialize_with = "local_datetimes")]
    pub sunset: Vec<NaiveDateTime>,
    pub weather_code: Vec<Option<f64>>,
    pub temperature_2m_max: Vec<Option<f64>>,
    pub temperature_2m_min: Vec<Option<f64>>,
    pub apparent_temperature_max: Vec<Option<f64>>,
    pub apparent_temperature_min: Vec<Option<f64>>,
    pub daylight_duration: Vec<Option<f64>>,
    pub sunshine_duration: Vec<Option<f64>>,
    pub uv_index_max: Vec<Option<f64>>,
    pub uv_index_clear_sky_max: Vec<Option<f64>>,
    pub precipitation_sum: Vec<Option<f64>>,
    pub rain_sum: Vec<Option<f64>>,
    pub showers_sum: Vec<Option<f64>>,
    pub snowfall_sum: Vec<Option<f64>>,
    pub precipitation_hours: Vec<Option<f64>>,
    pub precipitation_probability_max: Vec<Option<f64>>,
    pub wind_speed_10m_max: Vec<Option<f64>>,
    pub wind_gusts_10m_max: Vec<Option<f64>>,
    pub wind_direction_10m_dominant: Vec<Option<f64>>,
    pub shortwave_radiation_sum: Vec<Option<f64>>,
    pub et0_fao_evapotranspiration: Vec<Option<f64>>,
}

impl DailySummary {
    /// Number of days in this summary.
    pub fn days(&self) -> usize {
        self.time.len()
    }

    /// Ensure every sequence has at least one entry and all sequences are the same length.
    pub fn validate(&self) -> Result<(), ClientError> {
        let expected = self.days();
        if expected == 0 {
            return Err(ClientError::EmptyDaily("time"));
        }

        let lengths = fields::DAILY
            .iter()
            .map(|f| (f.name, (f.values)(self).len()))
            .chain(fields::DAILY_TIMES.iter().map(|f| (f.name, (f.values)(self).len())));

        for (field, actual) in lengths {
            if actual == 0 {
                return Err(ClientError::EmptyDaily(field));
            }

            if actual != expected {
                return Err(ClientError::MisalignedDaily {
                    field,
                    expected,
                    actual,
                });
            }
        }

        Ok(())
    }
}

const FORMAT_MINUTES: &str = "%Y-%m-%dT%H:%M";
const FORMAT_SECONDS: &str = "%Y-%m-%dT%H:%M:%S";
const FORMAT_DATE: &str = "%Y-%m-%d";

/// Parse an ISO 8601 local date and time, with or without seconds (e.g. `2024-01-15T12:00`).
pub fn parse_local_datetime(s: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(s, FORMAT_MINUTES).or_else(|_| NaiveDateTime::parse_from_str(s, FORMAT_SECONDS))
}

fn local_datetime<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_local_datetime(&s).map_err(serde::de::Error::custom)
}

fn local_datetimes<'de, D>(deserializer: D) -> Result<Vec<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<String>::deserialize(deserializer)?
        .iter()
        .map(|s| parse_local_datetime(s))
        .collect::<Result<Vec<_>, _>>()
        .map_err(serde::de::Error::custom)
}

fn local_dates<'de, D>(deserializer: D) -> Result<Vec<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<String>::deserialize(deserializer)?
        .iter()
        .map(|s| NaiveDate::parse_from_str(s, FORMAT_DATE))
        .collect::<Result<Vec<_>, _>>()
        .map_err(serde::de::Error::custom)
}
