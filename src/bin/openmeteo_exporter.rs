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

use clap::Parser;
use openmeteo_exporter::client::{OpenMeteoClient, DEFAULT_TIMEZONE};
use openmeteo_exporter::http::RequestState;
use openmeteo_exporter::location::Location;
use openmeteo_exporter::metrics::WeatherMetrics;
use openmeteo_exporter::poller::{ErrorPolicy, Poller};
use prometheus_client::registry::Registry;
use reqwest::Client;
use std::error::Error;
use std::io;
use std::net::SocketAddr;
use std::process;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal::unix::{self, SignalKind};
use tokio_util::sync::CancellationToken;
use tracing::Level;

const DEFAULT_LOG_LEVEL: Level = Level::INFO;
const DEFAULT_BIND_ADDR: ([u8; 4], u16) = ([0, 0, 0, 0], 9784);
const DEFAULT_REFERSH_SECS: u64 = 60;
const DEFAULT_TIMEOUT_MILLIS: u64 = 5000;
const DEFAULT_API_URL: &str = "https://api.open-meteo.com/v1/forecast";

#[derive(Debug, Parser)]
#[clap(name = "openmeteo_exporter", version = clap::crate_version!())]
struct OpenMeteoExporterApplication {
    /// Latitude of the location to fetch forecasts for
    #[clap(long, default_value_t = 0.0, allow_negative_numbers = true)]
    latitude: f64,

    /// Longitude of the location to fetch forecasts for
    #[clap(long, default_value_t = 0.0, allow_negative_numbers = true)]
    longitude: f64,

    /// URL of the Open-Meteo forecast API
    #[clap(long, default_value_t = DEFAULT_API_URL.into())]
    api_url: String,

    /// Timezone to request forecasts in. Determines the boundaries of each day for the
    /// daily summary.
    #[clap(long, default_value_t = DEFAULT_TIMEZONE.into())]
    timezone: String,

    /// Logging verbosity. Allowed values are 'trace', 'debug', 'info', 'warn', and 'error'
    /// (case insensitive)
    #[clap(long, default_value_t = DEFAULT_LOG_LEVEL)]
    log_level: Level,

    /// Fetch weather forecasts from the Open-Meteo API at this interval, in seconds.
    #[clap(long, default_value_t = DEFAULT_REFERSH_SECS, value_parser = clap::value_parser!(u64).range(1..))]
    refresh_secs: u64,

    /// Timeout for fetching weather forecasts from the Open-Meteo API, in milliseconds.
    #[clap(long, default_value_t = DEFAULT_TIMEOUT_MILLIS)]
    timeout_millis: u64,

    /// What to do when fetching a forecast fails: 'continue' logs the error and tries again
    /// at the next interval, 'exit' stops the exporter with a non-zero exit code.
    #[clap(long, value_enum, default_value_t = ErrorPolicy::Continue)]
    on_error: ErrorPolicy,

    /// Address to bind to. By default, openmeteo_exporter will bind to public address since
    /// the purpose is to expose metrics to an external system (Prometheus or another
    /// agent for ingestion)
    #[clap(long, default_value_t = DEFAULT_BIND_ADDR.into())]
    bind: SocketAddr,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let opts = OpenMeteoExporterApplication::parse();
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_max_level(opts.log_level)
            .finish(),
    )
    .expect("failed to set tracing subscriber");

    // Validate the location before doing anything else, there's no point in starting the
    // HTTP server if we'll never have any metrics to export.
    let location = Location::new(opts.latitude, opts.longitude).unwrap_or_else(|e| {
        tracing::error!(message = "invalid location", error = %e);
        process::exit(1)
    });

    let timeout = Duration::from_millis(opts.timeout_millis);
    let http_client = Client::builder().timeout(timeout).build().unwrap_or_else(|e| {
        tracing::error!(message = "unable to initialize HTTP client", error = %e);
        process::exit(1)
    });

    let client = OpenMeteoClient::new(http_client, &opts.api_url, &opts.timezone).unwrap_or_else(|e| {
        tracing::error!(message = "unable to initialize API client", error = %e);
        process::exit(1)
    });

    let mut registry = Registry::default();
    let metrics = Arc::new(WeatherMetrics::new(&mut registry));
    let poller = Poller::new(
        client,
        location,
        metrics,
        Duration::from_secs(opts.refresh_secs),
        opts.on_error,
    );

    let token = CancellationToken::new();
    let signal_token = token.clone();
    tokio::spawn(async move {
        // Wait for either SIGTERM or SIGINT to shutdown
        tokio::select! {
            _ = sigterm() => {}
            _ = sigint() => {}
        }

        signal_token.cancel();
    });

    let builder = axum::Server::try_bind(&opts.bind).unwrap_or_else(|e| {
        tracing::error!(message = "error binding to address", address = %opts.bind, error = %e);
        process::exit(1)
    });

    let server_token = token.clone();
    let app = openmeteo_exporter::http::app(RequestState { registry });
    let server = tokio::spawn(
        builder
            .serve(app.into_make_service())
            .with_graceful_shutdown(async move { server_token.cancelled().await }),
    );

    tracing::info!(message = "server started", address = %opts.bind, api_url = %opts.api_url);
    let res = poller.run(token.clone()).await;

    // Polling only stops on a signal or when a failed fetch is configured to be fatal. Make
    // sure the server is shut down in the second case too.
    token.cancel();
    server.await??;
    tracing::info!("server shutdown");

    if let Err(e) = res {
        tracing::error!(message = "failed to fetch forecast, exiting", error = %e);
        process::exit(1)
    }

    Ok(())
}

/// Return after the first SIGTERM signal received by this process
async fn sigterm() -> io::Result<()> {
    unix::signal(SignalKind::terminate())?.recv().await;
    Ok(())
}

/// Return after the first SIGINT signal received by this process
async fn sigint() -> io::Result<()> {
    unix::signal(SignalKind::interrupt())?.recv().await;
    Ok(())
}
