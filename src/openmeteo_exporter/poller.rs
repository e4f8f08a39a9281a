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

use crate::client::{ClientError, OpenMeteoClient, WeatherSnapshot};
use crate::location::Location;
use crate::metrics::WeatherMetrics;
use chrono::Utc;
use clap::ValueEnum;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, Level};

/// What the poller does when fetching or decoding a forecast fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ErrorPolicy {
    /// Log the error, leave metrics as they are, and try again after the next interval.
    Continue,
    /// Stop polling and return the error.
    Exit,
}

/// Periodically fetches a forecast and publishes it to `WeatherMetrics`.
///
/// Each cycle makes a single request and updates metrics, then waits for the poll interval
/// before starting the next. Cycles never overlap.
#[derive(Debug)]
pub struct Poller {
    client: OpenMeteoClient,
    location: Location,
    metrics: Arc<WeatherMetrics>,
    interval: Duration,
    policy: ErrorPolicy,
}

impl Poller {
    pub fn new(
        client: OpenMeteoClient,
        location: Location,
        metrics: Arc<WeatherMetrics>,
        interval: Duration,
        policy: ErrorPolicy,
    ) -> Self {
        Poller {
            client,
            location,
            metrics,
            interval,
            policy,
        }
    }

    /// Run fetch and publish cycles until `token` is cancelled.
    ///
    /// Cancellation is observed both while waiting between cycles and while a request is
    /// in flight, in either case no further cycles are started and `Ok(())` is returned.
    /// A failed cycle only results in an error being returned when the policy is
    /// `ErrorPolicy::Exit`.
    pub async fn run(&self, token: CancellationToken) -> Result<(), ClientError> {
        tracing::info!(
            message = "forecast polling started",
            location = %self.location,
            interval_secs = self.interval.as_secs(),
            policy = ?self.policy,
        );

        loop {
            let res = match self
                .fetch(&token)
                .instrument(tracing::span!(Level::DEBUG, "openmeteo_forecast"))
                .await
            {
                Some(res) => res,
                None => break,
            };

            match res {
                Ok(snapshot) => {
                    self.metrics.observe(&snapshot, Utc::now());
                    tracing::info!(message = "fetched new forecast", time = %snapshot.current.time);
                }
                Err(e) => {
                    self.metrics.record_error();
                    if self.policy == ErrorPolicy::Exit {
                        return Err(e);
                    }

                    tracing::error!(message = "failed to fetch forecast", error = %e);
                }
            }

            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        tracing::info!("forecast polling stopped");
        Ok(())
    }

    /// Fetch a single forecast, returning `None` if cancelled before it completes.
    async fn fetch(&self, token: &CancellationToken) -> Option<Result<WeatherSnapshot, ClientError>> {
        tokio::select! {
            biased;
            _ = token.cancelled() => None,
            res = self.client.forecast(&self.location) => {
                self.metrics.record_fetch();
                Some(res)
            }
        }
    }
}
