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

use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, StatusCode};
use axum::routing::get;
use axum::Router;
use prometheus_client::encoding::text::encode;
use prometheus_client::registry::Registry;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

const OPENMETRICS_TEXT: &str = "application/openmetrics-text; version=1.0.0; charset=utf-8";

/// State shared by every request made to the metrics endpoint.
#[derive(Debug)]
pub struct RequestState {
    pub registry: Registry,
}

/// Create a router that serves the metrics registry at `GET /metrics`.
pub fn app(state: RequestState) -> Router {
    Router::new()
        .route("/metrics", get(text_metrics_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

pub async fn text_metrics_handler(
    State(state): State<Arc<RequestState>>,
) -> (StatusCode, [(HeaderName, &'static str); 1], String) {
    let mut buf = String::new();
    let headers = [(CONTENT_TYPE, OPENMETRICS_TEXT)];

    match encode(&mut buf, &state.registry) {
        Ok(_) => {
            tracing::debug!(message = "encoded prometheus metrics to text format", num_bytes = buf.len());
            (StatusCode::OK, headers, buf)
        }
        Err(e) => {
            tracing::error!(message = "error encoding metrics", error = %e);
            (StatusCode::INTERNAL_SERVER_ERROR, headers, String::new())
        }
    }
}
