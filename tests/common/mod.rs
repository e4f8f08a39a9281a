//! Helpers shared by integration tests that run against a mock forecast API.

#![allow(dead_code)]

use openmeteo_exporter::client::{OpenMeteoClient, DEFAULT_TIMEZONE};
use openmeteo_exporter::location::Location;
use reqwest::Client;
use serde_json::{json, Value};
use wiremock::MockServer;

pub const FORECAST_PATH: &str = "/v1/forecast";

/// Forecast response body with one entry per value of `daily_max` in every daily sequence.
pub fn forecast_body(temperature: f64, daily_max: &[f64]) -> Value {
    let days = daily_max.len();
    let dates: Vec<String> = (0..days).map(|i| format!("2024-07-{:02}", 1 + i)).collect();
    let rises: Vec<String> = dates.iter().map(|d| format!("{}T05:12", d)).collect();
    let sets: Vec<String> = dates.iter().map(|d| format!("{}T20:41", d)).collect();
    let seq = |v: f64| -> Vec<f64> { (0..days).map(|i| v + i as f64).collect() };

    json!({
        "latitude": 45.52,
        "longitude": -122.68,
        "generationtime_ms": 0.07,
        "utc_offset_seconds": -25200,
        "timezone": "America/Los_Angeles",
        "timezone_abbreviation": "PDT",
        "elevation": 12.3,
        "current_units": {"time": "iso8601", "temperature_2m": "°C"},
        "current": {
            "time": "2024-07-01T10:45",
            "interval": 900,
            "temperature_2m": temperature,
            "relative_humidity_2m": 52,
            "apparent_temperature": 17.9,
            "is_day": 1,
            "precipitation": 0.0,
            "rain": 0.0,
            "showers": 0.0,
            "snowfall": 0.0,
            "weather_code": 2,
            "cloud_cover": 40,
            "pressure_msl": 1016.2,
            "surface_pressure": 1014.7,
            "wind_speed_10m": 6.5,
            "wind_direction_10m": 315,
            "wind_gusts_10m": 14.4
        },
        "daily_units": {"time": "iso8601", "temperature_2m_max": "°C"},
        "daily": {
            "time": dates,
            "weather_code": seq(2.0),
            "temperature_2m_max": daily_max,
            "temperature_2m_min": seq(12.4),
            "apparent_temperature_max": seq(21.7),
            "apparent_temperature_min": seq(11.9),
            "sunrise": rises,
            "sunset": sets,
            "daylight_duration": seq(55735.2),
            "sunshine_duration": seq(50400.0),
            "uv_index_max": seq(7.2),
            "uv_index_clear_sky_max": seq(7.4),
            "precipitation_sum": seq(0.0),
            "rain_sum": seq(0.0),
            "showers_sum": seq(0.0),
            "snowfall_sum": seq(0.0),
            "precipitation_hours": seq(0.0),
            "precipitation_probability_max": seq(3.0),
            "wind_speed_10m_max": seq(13.2),
            "wind_gusts_10m_max": seq(27.0),
            "wind_direction_10m_dominant": seq(310.0),
            "shortwave_radiation_sum": seq(27.6),
            "et0_fao_evapotranspiration": seq(5.1)
        }
    })
}

pub fn location() -> Location {
    Location::new(45.52, -122.68).unwrap()
}

pub fn client(server: &MockServer) -> OpenMeteoClient {
    let base_url = format!("{}{}", server.uri(), FORECAST_PATH);
    OpenMeteoClient::new(Client::new(), &base_url, DEFAULT_TIMEZONE).unwrap()
}
