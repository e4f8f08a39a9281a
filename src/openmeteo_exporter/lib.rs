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

//! Prometheus metrics exporter for the Open-Meteo forecast API
//!
//! ## Features
//!
//! `openmeteo_exporter` periodically fetches current conditions and today's forecast summary for a
//! single location from the [Open-Meteo] forecast API and emits them as Prometheus metrics. Values
//! are exported as-is using the default units of the API (celsius, millimeters, km/h, hPa).
//!
//! * `openmeteo_elevation` - Elevation of the location, in meters.
//! * `openmeteo_current_*` - Current conditions, one gauge per variable (e.g.
//!   `openmeteo_current_temperature_2m`, `openmeteo_current_wind_speed_10m`).
//! * `openmeteo_current_time_since_last_update` - Seconds since the current conditions were observed.
//! * `openmeteo_daily_*` - Today's summary, one gauge per variable (e.g.
//!   `openmeteo_daily_temperature_2m_max`, `openmeteo_daily_precipitation_sum`).
//! * `openmeteo_daily_sunrise_timestamp_seconds` - UNIX timestamp of today's sunrise.
//! * `openmeteo_daily_sunset_timestamp_seconds` - UNIX timestamp of today's sunset.
//! * `openmeteo_daily_time_since_last_update` - Seconds since the start of the day the summary is for.
//! * `openmeteo_fetches_total` - Total attempts to fetch a forecast.
//! * `openmeteo_fetch_errors_total` - Total failed attempts to fetch a forecast.
//!
//! [Open-Meteo]: https://open-meteo.com/en/docs
//!
//! ## Build
//!
//! `openmeteo_exporter` is a Rust program and must be built from source using a
//! [Rust toolchain](https://rustup.rs/).
//!
//! ```text
//! cargo build --release
//! ```
//!
//! ## Usage
//!
//! `openmeteo_exporter` needs the latitude and longitude of the location to export weather for.
//! Both are required, a location of exactly `0,0` is rejected at startup.
//!
//! ```text
//! ./openmeteo_exporter --latitude 42.36 --longitude=-71.06
//! ```
//!
//! By default, the forecast is fetched every `60` seconds and a failed fetch is logged and retried
//! at the next interval. Use `--on-error exit` to stop the exporter on the first failed fetch
//! instead, for example when running under a supervisor that restarts it.
//!
//! ### Prometheus
//!
//! Prometheus metrics are exposed on port `9784` at `/metrics`. Once `openmeteo_exporter`
//! is running, configure scrapes of it by your Prometheus server. Add the host running
//! `openmeteo_exporter` as a target under the Prometheus `scrape_configs` section as described by
//! the example below.
//!
//! ```yaml
//! # Sample config for Prometheus.
//!
//! global:
//!   scrape_interval:     1m
//!   evaluation_interval: 1m
//!   external_labels:
//!     monitor: 'my_prom'
//!
//! scrape_configs:
//! - job_name: openmeteo_exporter
//!   static_configs:
//!   - targets: ['example:9784']
//! ```
//!

pub mod client;
pub mod fields;
pub mod http;
pub mod location;
pub mod metrics;
pub mod poller;
