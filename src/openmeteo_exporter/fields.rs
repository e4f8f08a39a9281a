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

//! Static tables of the forecast variables this exporter consumes.
//!
//! Each table drives the `current=` and `daily=` query parameters of the
//! forecast request, the gauges registered in `WeatherMetrics`, validation
//! of the daily block, and the per-cycle update of each gauge. Adding a new
//! variable means adding a field to the response model and one entry here.

use crate::client::{CurrentConditions, DailySummary};
use chrono::NaiveDateTime;

/// A scalar from the `current` block of a forecast response.
pub struct CurrentField {
    /// Variable name used by the API and as the metric name suffix.
    pub name: &'static str,
    pub help: &'static str,
    pub value: fn(&CurrentConditions) -> Option<f64>,
}

/// A numeric sequence from the `daily` block of a forecast response.
pub struct DailyField {
    /// Variable name used by the API and as the metric name suffix.
    pub name: &'static str,
    pub help: &'static str,
    pub values: fn(&DailySummary) -> &[Option<f64>],
}

/// A timestamp sequence from the `daily` block of a forecast response.
pub struct DailyTimeField {
    /// Variable name used by the API.
    pub name: &'static str,
    /// Metric name suffix. Timestamps are exported as seconds since the UNIX epoch.
    pub metric: &'static str,
    pub help: &'static str,
    pub values: fn(&DailySummary) -> &[NaiveDateTime],
}

pub const CURRENT: &[CurrentField] = &[
    CurrentField {
        name: "temperature_2m",
        help: "Air temperature at 2 meters above ground in celsius",
        value: |c| c.temperature_2m,
    },
    CurrentField {
        name: "relative_humidity_2m",
        help: "Relative humidity at 2 meters above ground (0-100)",
        value: |c| c.relative_humidity_2m,
    },
    CurrentField {
        name: "apparent_temperature",
        help: "Perceived feels-like temperature in celsius",
        value: |c| c.apparent_temperature,
    },
    CurrentField {
        name: "is_day",
        help: "1 if the current time step has daylight, 0 at night",
        value: |c| c.is_day,
    },
    CurrentField {
        name: "precipitation",
        help: "Total precipitation (rain, showers, snow) of the preceding interval in millimeters",
        value: |c| c.precipitation,
    },
    CurrentField {
        name: "rain",
        help: "Rain from large scale weather systems of the preceding interval in millimeters",
        value: |c| c.rain,
    },
    CurrentField {
        name: "showers",
        help: "Showers from convective precipitation of the preceding interval in millimeters",
        value: |c| c.showers,
    },
    CurrentField {
        name: "snowfall",
        help: "Snowfall of the preceding interval in centimeters",
        value: |c| c.snowfall,
    },
    CurrentField {
        name: "weather_code",
        help: "Weather condition as a WMO code",
        value: |c| c.weather_code,
    },
    CurrentField {
        name: "cloud_cover",
        help: "Total cloud cover as an area fraction (0-100)",
        value: |c| c.cloud_cover,
    },
    CurrentField {
        name: "pressure_msl",
        help: "Atmospheric air pressure reduced to mean sea level in hectopascals",
        value: |c| c.pressure_msl,
    },
    CurrentField {
        name: "surface_pressure",
        help: "Atmospheric air pressure at the surface in hectopascals",
        value: |c| c.surface_pressure,
    },
    CurrentField {
        name: "wind_speed_10m",
        help: "Wind speed at 10 meters above ground in kilometers per hour",
        value: |c| c.wind_speed_10m,
    },
    CurrentField {
        name: "wind_direction_10m",
        help: "Wind direction at 10 meters above ground in degrees",
        value: |c| c.wind_direction_10m,
    },
    CurrentField {
        name: "wind_gusts_10m",
        help: "Wind gusts at 10 meters above ground in kilometers per hour",
        value: |c| c.wind_gusts_10m,
    },
];

pub const DAILY: &[DailyField] = &[
    DailyField {
        name: "weather_code",
        help: "Most severe weather condition of the day as a WMO code",
        values: |d| d.weather_code.as_slice(),
    },
    DailyField {
        name: "temperature_2m_max",
        help: "Maximum daily air temperature at 2 meters above ground in celsius",
        values: |d| d.temperature_2m_max.as_slice(),
    },
    DailyField {
        name: "temperature_2m_min",
        help: "Minimum daily air temperature at 2 meters above ground in celsius",
        values: |d| d.temperature_2m_min.as_slice(),
    },
    DailyField {
        name: "apparent_temperature_max",
        help: "Maximum daily apparent temperature in celsius",
        values: |d| d.apparent_temperature_max.as_slice(),
    },
    DailyField {
        name: "apparent_temperature_min",
        help: "Minimum daily apparent temperature in celsius",
        values: |d| d.apparent_temperature_min.as_slice(),
    },
    DailyField {
        name: "daylight_duration",
        help: "Number of seconds of daylight per day",
        values: |d| d.daylight_duration.as_slice(),
    },
    DailyField {
        name: "sunshine_duration",
        help: "Number of seconds of sunshine per day",
        values: |d| d.sunshine_duration.as_slice(),
    },
    DailyField {
        name: "uv_index_max",
        help: "Daily maximum UV index",
        values: |d| d.uv_index_max.as_slice(),
    },
    DailyField {
        name: "uv_index_clear_sky_max",
        help: "Daily maximum UV index assuming cloud free conditions",
        values: |d| d.uv_index_clear_sky_max.as_slice(),
    },
    DailyField {
        name: "precipitation_sum",
        help: "Sum of daily precipitation (rain, showers, snowfall) in millimeters",
        values: |d| d.precipitation_sum.as_slice(),
    },
    DailyField {
        name: "rain_sum",
        help: "Sum of daily rain in millimeters",
        values: |d| d.rain_sum.as_slice(),
    },
    DailyField {
        name: "showers_sum",
        help: "Sum of daily showers in millimeters",
        values: |d| d.showers_sum.as_slice(),
    },
    DailyField {
        name: "snowfall_sum",
        help: "Sum of daily snowfall in centimeters",
        values: |d| d.snowfall_sum.as_slice(),
    },
    DailyField {
        name: "precipitation_hours",
        help: "Number of hours with precipitation during the day",
        values: |d| d.precipitation_hours.as_slice(),
    },
    DailyField {
        name: "precipitation_probability_max",
        help: "Maximum probability of precipitation during the day (0-100)",
        values: |d| d.precipitation_probability_max.as_slice(),
    },
    DailyField {
        name: "wind_speed_10m_max",
        help: "Maximum wind speed at 10 meters above ground in kilometers per hour",
        values: |d| d.wind_speed_10m_max.as_slice(),
    },
    DailyField {
        name: "wind_gusts_10m_max",
        help: "Maximum wind gusts at 10 meters above ground in kilometers per hour",
        values: |d| d.wind_gusts_10m_max.as_slice(),
    },
    DailyField {
        name: "wind_direction_10m_dominant",
        help: "Dominant wind direction at 10 meters above ground in degrees",
        values: |d| d.wind_direction_10m_dominant.as_slice(),
    },
    DailyField {
        name: "shortwave_radiation_sum",
        help: "Sum of solar radiation for the day in megajoules per square meter",
        values: |d| d.shortwave_radiation_sum.as_slice(),
    },
    DailyField {
        name: "et0_fao_evapotranspiration",
        help: "Daily sum of ET0 reference evapotranspiration of a well watered grass field in millimeters",
        values: |d| d.et0_fao_evapotranspiration.as_slice(),
    },
];

pub const DAILY_TIMES: &[DailyTimeField] = &[
    DailyTimeField {
        name: "sunrise",
        metric: "sunrise_timestamp_seconds",
        help: "Time of sunrise as seconds since the UNIX epoch",
        values: |d| d.sunrise.as_slice(),
    },
    DailyTimeField {
        name: "sunset",
        metric: "sunset_timestamp_seconds",
        help: "Time of sunset as seconds since the UNIX epoch",
        values: |d| d.sunset.as_slice(),
    },
];

/// Comma separated list of variables for the `current=` query parameter.
pub fn current_variables() -> String {
    CURRENT.iter().map(|f| f.name).collect::<Vec<_>>().join(",")
}

/// Comma separated list of variables for the `daily=` query parameter.
pub fn daily_variables() -> String {
    DAILY
        .iter()
        .map(|f| f.name)
        .chain(DAILY_TIMES.iter().map(|f| f.name))
        .collect::<Vec<_>>()
        .join(",")
}
