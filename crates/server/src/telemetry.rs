// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Prometheus metrics for the marketplace.
//!
//! # Exported Metrics
//!
//! ## Counters
//! - `slot_market_completed_orders_total` - Orders moved to `COMPLETED`
//! - `slot_market_http_requests_total{method,status}` - Finished HTTP requests
//!
//! ## Histograms
//! - `slot_market_http_request_duration_seconds{method}` - HTTP request latency
//!
//! ## Gauges
//! - `slot_market_clients_total` - Registered client profiles
//! - `slot_market_models_total` - Registered model profiles
//! - `slot_market_http_requests_in_flight` - HTTP requests being served
//!
//! The gauges are refreshed by a background task rather than on every write.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder};
use slot_market::{OrderMetrics, RepositoryError, UserRepository};
use slot_market_domain::Role;
use slot_market_persistence::SqlitePersistence;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub const COMPLETED_ORDERS: &str = "slot_market_completed_orders_total";
pub const CLIENTS: &str = "slot_market_clients_total";
pub const MODELS: &str = "slot_market_models_total";
pub const HTTP_REQUESTS: &str = "slot_market_http_requests_total";
pub const HTTP_REQUEST_DURATION: &str = "slot_market_http_request_duration_seconds";
pub const HTTP_REQUESTS_IN_FLIGHT: &str = "slot_market_http_requests_in_flight";

/// Latency buckets, in seconds, for [`HTTP_REQUEST_DURATION`].
const HTTP_DURATION_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Prometheus exporter configured with the HTTP latency buckets.
///
/// # Errors
///
/// Returns an error if the bucket list is rejected.
pub fn prometheus_builder() -> Result<PrometheusBuilder, BuildError> {
    PrometheusBuilder::new().set_buckets_for_metric(
        Matcher::Full(HTTP_REQUEST_DURATION.to_string()),
        HTTP_DURATION_BUCKETS,
    )
}

/// Registers metric descriptions with the installed recorder.
pub fn register_metrics() {
    describe_counter!(COMPLETED_ORDERS, "Total number of completed orders");
    describe_gauge!(CLIENTS, "Current number of client profiles");
    describe_gauge!(MODELS, "Current number of model profiles");
    describe_counter!(HTTP_REQUESTS, "Total number of HTTP requests");
    describe_histogram!(HTTP_REQUEST_DURATION, "HTTP request duration in seconds");
    describe_gauge!(HTTP_REQUESTS_IN_FLIGHT, "HTTP requests currently being served");
    info!("Metrics registered");
}

/// Records order events through the global `metrics` recorder.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrometheusMetrics;

impl OrderMetrics for PrometheusMetrics {
    fn completed_order(&self) {
        counter!(COMPLETED_ORDERS).increment(1);
        debug!("Recorded completed_order metric");
    }
}

/// Middleware recording count, latency and concurrency of HTTP requests.
pub async fn track_http_metrics(request: Request, next: Next) -> Response {
    let method = request.method().as_str().to_owned();
    let started = Instant::now();

    gauge!(HTTP_REQUESTS_IN_FLIGHT).increment(1.0);
    let response = next.run(request).await;
    gauge!(HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status().as_str().to_owned();
    counter!(HTTP_REQUESTS, "method" => method.clone(), "status" => status).increment(1);
    histogram!(HTTP_REQUEST_DURATION, "method" => method)
        .record(started.elapsed().as_secs_f64());
    response
}

/// Reads the per-role user counts and publishes them as gauges.
///
/// # Errors
///
/// Returns an error if either count query fails. The gauges keep their
/// previous values in that case.
#[allow(clippy::cast_precision_loss)]
pub async fn refresh_user_gauges(
    persistence: &Mutex<SqlitePersistence>,
) -> Result<(u64, u64), RepositoryError> {
    let mut guard = persistence.lock().await;
    let clients = guard.count_users_by_role(Role::Client)?;
    let models = guard.count_users_by_role(Role::Model)?;
    drop(guard);

    gauge!(CLIENTS).set(clients as f64);
    gauge!(MODELS).set(models as f64);
    debug!(clients, models, "Refreshed user gauges");
    Ok((clients, models))
}

/// Spawns the task that refreshes the user gauges every `period`.
pub fn spawn_gauge_refresher(
    persistence: Arc<Mutex<SqlitePersistence>>,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            if let Err(e) = refresh_user_gauges(&persistence).await {
                warn!(error = %e, "Failed to refresh user gauges");
            }
        }
    })
}
