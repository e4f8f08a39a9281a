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

use crate::client::WeatherSnapshot;
use crate::fields;
use chrono::{DateTime, FixedOffset, Utc};
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::gauge::Gauge;
use prometheus_client::registry::Registry;
use std::sync::atomic::AtomicU64;

const NAMESPACE: &str = "openmeteo";
const CURRENT_PREFIX: &str = "current_";
const DAILY_PREFIX: &str = "daily_";

type FloatGauge = Gauge<f64, AtomicU64>;

/// Holder for metrics that can be set from a `WeatherSnapshot`.
///
/// All metrics are created and registered upon call to `WeatherMetrics::new()` and are
/// never removed or recreated afterwards, only their values change. Metrics all share
/// the prefix "openmeteo_". Current conditions are exported as `openmeteo_current_*` and
/// today's values from the daily summary are exported as `openmeteo_daily_*`.
#[derive(Debug)]
pub struct WeatherMetrics {
    elevation: FloatGauge,
    current: Vec<FloatGauge>,
    current_since_update: FloatGauge,
    daily: Vec<FloatGauge>,
    daily_times: Vec<FloatGauge>,
    daily_since_update: FloatGauge,
    fetches: Counter,
    fetch_errors: Counter,
}

impl WeatherMetrics {
    /// Create a new `WeatherMetrics` and register each metric with the provided `Registry`.
    pub fn new(reg: &mut Registry) -> Self {
        let reg = reg.sub_registry_with_prefix(NAMESPACE);

        let elevation = FloatGauge::default();
        reg.register("elevation", "Elevation of the forecast location in meters", elevation.clone());

        let current = fields::CURRENT
            .iter()
            .map(|f| {
                let gauge = FloatGauge::default();
                reg.register(format!("{}{}", CURRENT_PREFIX, f.name), f.help, gauge.clone());
                gauge
            })
            .collect();

        let current_since_update = FloatGauge::default();
        reg.register(
            "current_time_since_last_update",
            "Seconds between the time of the current conditions and when they were fetched",
            current_since_update.clone(),
        );

        let daily = fields::DAILY
            .iter()
            .map(|f| {
                let gauge = FloatGauge::default();
                reg.register(format!("{}{}", DAILY_PREFIX, f.name), f.help, gauge.clone());
                gauge
            })
            .collect();

        let daily_times = fields::DAILY_TIMES
            .iter()
            .map(|f| {
                let gauge = FloatGauge::default();
                reg.register(format!("{}{}", DAILY_PREFIX, f.metric), f.help, gauge.clone());
                gauge
            })
            .collect();

        let daily_since_update = FloatGauge::default();
        reg.register(
            "daily_time_since_last_update",
            "Seconds between the start of the current day and when the daily summary was fetched",
            daily_since_update.clone(),
        );

        let fetches = Counter::default();
        reg.register("fetches", "Total attempts to fetch a forecast", fetches.clone());

        let fetch_errors = Counter::default();
        reg.register("fetch_errors", "Total failed attempts to fetch a forecast", fetch_errors.clone());

        Self {
            elevation,
            current,
            current_since_update,
            daily,
            daily_times,
            daily_since_update,
            fetches,
            fetch_errors,
        }
    }

    /// Set metrics from the provided forecast, using `now` to compute how stale it is.
    ///
    /// Only the first entry of each daily sequence is used. If the forecast doesn't contain
    /// a value for a particular metric, the metric will not be updated. The forecast is
    /// expected to have passed `WeatherSnapshot::validate()`.
    pub fn observe(&self, snapshot: &WeatherSnapshot, now: DateTime<Utc>) {
        self.elevation.set(snapshot.elevation);

        for (field, gauge) in fields::CURRENT.iter().zip(&self.current) {
            if let Some(v) = (field.value)(&snapshot.current) {
                gauge.set(v);
            }
        }

        for (field, gauge) in fields::DAILY.iter().zip(&self.daily) {
            if let Some(v) = (field.values)(&snapshot.daily).first().copied().flatten() {
                gauge.set(v);
            }
        }

        for (field, gauge) in fields::DAILY_TIMES.iter().zip(&self.daily_times) {
            if let Some(t) = (field.values)(&snapshot.daily).first().and_then(|t| snapshot.resolve(*t)) {
                gauge.set(t.timestamp() as f64);
            }
        }

        if let Some(t) = snapshot.current_time() {
            self.current_since_update.set(seconds_since(t, now));
        }

        if let Some(t) = snapshot.daily_time() {
            self.daily_since_update.set(seconds_since(t, now));
        }
    }

    pub fn record_fetch(&self) {
        self.fetches.inc();
    }

    pub fn record_error(&self) {
        self.fetch_errors.inc();
    }

    pub fn fetches(&self) -> u64 {
        self.fetches.get()
    }

    pub fn fetch_errors(&self) -> u64 {
        self.fetch_errors.get()
    }

    /// Current value of every gauge, keyed by name without the "openmeteo_" prefix.
    pub fn values(&self) -> Vec<(String, f64)> {
        let mut out = Vec::with_capacity(fields::CURRENT.len() + fields::DAILY.len() + fields::DAILY_TIMES.len() + 3);
        out.push(("elevation".to_owned(), self.elevation.get()));

        out.extend(
            fields::CURRENT
                .iter()
                .zip(&self.current)
                .map(|(f, g)| (format!("{}{}", CURRENT_PREFIX, f.name), g.get())),
        );
        out.push(("current_time_since_last_update".to_owned(), self.current_since_update.get()));

        out.extend(
            fields::DAILY
                .iter()
                .zip(&self.daily)
                .map(|(f, g)| (format!("{}{}", DAILY_PREFIX, f.name), g.get())),
        );
        out.extend(
            fields::DAILY_TIMES
                .iter()
                .zip(&self.daily_times)
                .map(|(f, g)| (format!("{}{}", DAILY_PREFIX, f.metric), g.get())),
        );
        out.push(("daily_time_since_last_update".to_owned(), self.daily_since_update.get()));

        out
    }

    /// Current value of a single gauge by name without the "openmeteo_" prefix.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values().into_iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }
}

fn seconds_since(then: DateTime<FixedOffset>, now: DateTime<Utc>) -> f64 {
    (now - then.with_timezone(&Utc)).num_milliseconds() as f64 / 1000.0
}
