// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use metrics_exporter_prometheus::PrometheusBuilder;
use serde_json::Value;
use slot_market::{BookingConfig, Clock, NoopMetrics};
use slot_market_api::{AUTH_ID_HEADER, ROLE_HEADER, Services};
use slot_market_persistence::SqlitePersistence;
use time::OffsetDateTime;
use time::macros::datetime;
use tokio::sync::Mutex;
use tower::ServiceExt;

use crate::routes::{AppState, build_router};

pub const ADMIN: (i64, &str) = (9001, "ADMIN");
pub const CLIENT: (i64, &str) = (1001, "CLIENT");
pub const MODEL: (i64, &str) = (2001, "MODEL");

pub const fn now() -> OffsetDateTime {
    datetime!(2026-03-01 09:00 UTC)
}

struct FixedClock;

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        now()
    }
}

/// Builds a router over a fresh in-memory database with one bootstrapped admin.
pub fn create_test_app() -> Router {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let services = Services::new(
        BookingConfig::from_seconds(900).unwrap(),
        Arc::new(FixedClock),
        Arc::new(NoopMetrics),
    );
    services
        .admin
        .bootstrap_admin(&mut persistence, ADMIN.0)
        .unwrap();

    build_router(AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        services: Arc::new(services),
        prometheus: PrometheusBuilder::new().build_recorder().handle(),
    })
}

/// Sends one request and returns the status and the raw body.
pub async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    caller: Option<(i64, &str)>,
    body: Option<&Value>,
) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some((auth_id, role)) = caller {
        builder = builder
            .header(AUTH_ID_HEADER, auth_id.to_string())
            .header(ROLE_HEADER, role);
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

/// Sends one request and decodes the JSON response body.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    caller: Option<(i64, &str)>,
    body: Option<&Value>,
) -> (StatusCode, Value) {
    let (status, bytes) = send_raw(app, method, uri, caller, body).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

/// Creates and verifies profiles for the test client and model.
///
/// Returns the model's user id.
pub async fn onboard(app: &Router) -> i64 {
    let mut model_id = 0;
    for caller in [CLIENT, MODEL] {
        let (status, profile) = send(
            app,
            Method::POST,
            "/profile",
            Some(caller),
            Some(&serde_json::json!({ "name": "Test User", "birth_date": "1990-05-17" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let user_id = profile["user_id"].as_i64().unwrap();

        let (status, _) = send(
            app,
            Method::POST,
            &format!("/admin/users/{user_id}/verify"),
            Some(ADMIN),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        if caller == MODEL {
            model_id = user_id;
        }
    }
    model_id
}
