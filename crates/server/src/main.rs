// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod routes;
mod telemetry;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use clap::Parser;
use slot_market::{BookingConfig, SystemClock};
use slot_market_api::Services;
use slot_market_persistence::SqlitePersistence;
use tokio::sync::Mutex;
use tracing::info;

use crate::routes::{AppState, build_router};
use crate::telemetry::{
    PrometheusMetrics, prometheus_builder, register_metrics, spawn_gauge_refresher,
};

/// Slot Market Server - HTTP server for the Slot Market booking backend
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long, env = "DATABASE_PATH")]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// Seconds between refreshes of the user-count gauges
    #[arg(
        long,
        env = "METRICS_REFRESH_SECS",
        default_value_t = 60,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    metrics_refresh_secs: u64,

    /// Identity to seed as an admin on startup, if it has no admin record yet
    #[arg(long, env = "BOOTSTRAP_ADMIN_AUTH_ID")]
    bootstrap_admin: Option<i64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is not an error
    let _ = dotenvy::dotenv();

    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Slot Market Server");

    let config: BookingConfig = BookingConfig::from_env()?;

    let prometheus = prometheus_builder()?.install_recorder()?;
    register_metrics();

    let mut persistence: SqlitePersistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        SqlitePersistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        SqlitePersistence::new_in_memory()?
    };

    let services = Services::new(
        config,
        Arc::new(SystemClock),
        Arc::new(PrometheusMetrics),
    );

    if let Some(auth_id) = args.bootstrap_admin {
        services.admin.bootstrap_admin(&mut persistence, auth_id)?;
    }

    let persistence = Arc::new(Mutex::new(persistence));
    spawn_gauge_refresher(
        Arc::clone(&persistence),
        Duration::from_secs(args.metrics_refresh_secs),
    );

    let app_state: AppState = AppState {
        persistence,
        services: Arc::new(services),
        prometheus,
    };

    let app: Router = build_router(app_state);

    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests;
