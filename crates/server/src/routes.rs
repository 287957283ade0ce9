// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! HTTP routes.
//!
//! Every handler resolves the caller from the identity headers, takes the
//! persistence lock for the duration of one API call and maps the outcome
//! onto an HTTP response.
//!
//! Middleware, outermost first:
//!
//! 1. `correlation-id`: taken from the request or generated, echoed on the response
//! 2. Trace span carrying the correlation id
//! 3. HTTP request metrics
//! 4. Panic recovery into a JSON `INTERNAL_ERROR`

use std::any::Any;
use std::sync::Arc;

use axum::{
    Json, Router,
    body::Body,
    extract::{Path, Query, State as AxumState},
    http::{HeaderMap, HeaderName, Request, StatusCode},
    middleware::from_fn,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use slot_market::Principal;
use slot_market_api::{
    AUTH_ID_HEADER, AdminResponse, ApiError, ApproveBookingResponse, BookingResponse,
    CreateAdminRequest, CreateBookingRequest, CreateProfileRequest, CreateServiceRequest,
    CreateSlotRequest, OrderResponse, OverrideBookingStatusRequest, OverrideOrderStatusRequest,
    PageQuery, ROLE_HEADER, ServiceResponse, Services, SlotResponse, UpdateNameRequest,
    UpdatePermissionsRequest, UpdateServiceRequest, UpdateSlotRequest, UserResponse,
    admin_get_booking, admin_get_order, admin_list_bookings, admin_list_orders, admin_list_users,
    approve_booking, cancel_booking, cancel_order, complete_order, create_admin, create_booking,
    create_profile, create_service, create_slot, deactivate_service, deactivate_slot, get_admin,
    get_own_profile, get_service, get_user, list_model_slots, list_my_bookings, list_my_orders,
    list_own_services, list_own_slots, list_services, override_booking_status,
    override_order_status, reactivate_slot, reject_booking, resolve_principal,
    update_admin_permissions, update_name, update_service, update_slot, verify_user,
};
use slot_market_persistence::SqlitePersistence;
use tokio::sync::Mutex;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::{Span, error, info_span, warn};

use crate::telemetry::track_http_metrics;

/// Header carrying the id that ties together every log line of one request.
pub const CORRELATION_ID: &str = "correlation-id";

fn correlation_id_header() -> HeaderName {
    HeaderName::from_static(CORRELATION_ID)
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The persistence layer, one connection behind an async lock.
    pub persistence: Arc<Mutex<SqlitePersistence>>,
    pub services: Arc<Services>,
    /// Renders the Prometheus scrape output.
    pub prometheus: PrometheusHandle,
}

/// Error body returned for every failed request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Stable machine-readable error code.
    pub code: String,
    /// Human-readable description. Not stable.
    pub message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            code: self.code.to_string(),
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status = match &err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::DomainRuleViolation { .. } => StatusCode::CONFLICT,
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::Internal { .. } => {
                error!(error = %err, "Request failed with an internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        if status.is_client_error() {
            warn!(code = err.code(), status = status.as_u16(), "Request rejected");
        }
        Self {
            status,
            code: err.code(),
            message: err.to_string(),
        }
    }
}

fn principal_from_headers(headers: &HeaderMap) -> Result<Principal, HttpError> {
    let auth_id = headers
        .get(AUTH_ID_HEADER)
        .and_then(|value| value.to_str().ok());
    let role = headers.get(ROLE_HEADER).and_then(|value| value.to_str().ok());
    resolve_principal(auth_id, role).map_err(HttpError::from)
}

/// Runs one authenticated API call under the persistence lock.
async fn authenticated<T, F>(
    app_state: &AppState,
    headers: &HeaderMap,
    call: F,
) -> Result<Json<T>, HttpError>
where
    F: FnOnce(&mut SqlitePersistence, &Services, &Principal) -> Result<T, ApiError>,
{
    let principal = principal_from_headers(headers)?;
    let mut persistence = app_state.persistence.lock().await;
    let result = call(&mut *persistence, &*app_state.services, &principal);
    drop(persistence);
    Ok(Json(result?))
}

/// Turns a handler panic into the same 500 body every internal error gets.
#[allow(clippy::needless_pass_by_value)]
fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| String::from("non-string panic payload"));
    error!(panic = %detail, "Handler panicked");

    HttpError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "INTERNAL_ERROR",
        message: String::from("Internal server error"),
    }
    .into_response()
}

fn make_request_span(request: &Request<Body>) -> Span {
    let correlation_id = request
        .headers()
        .get(CORRELATION_ID)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-");
    info_span!(
        "http_request",
        method = %request.method(),
        path = %request.uri().path(),
        correlation_id = %correlation_id
    )
}

#[allow(clippy::unused_async)]
async fn handle_health() -> &'static str {
    "ok"
}

#[allow(clippy::unused_async)]
async fn handle_metrics(AxumState(app_state): AxumState<AppState>) -> String {
    app_state.prometheus.render()
}

// ============================================================================
// Profiles
// ============================================================================

async fn handle_create_profile(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateProfileRequest>,
) -> Result<Json<UserResponse>, HttpError> {
    authenticated(&app_state, &headers, |p, s, who| create_profile(p, s, who, req)).await
}

async fn handle_get_own_profile(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
) -> Result<Json<UserResponse>, HttpError> {
    authenticated(&app_state, &headers, get_own_profile).await
}

async fn handle_update_name(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Json(req): Json<UpdateNameRequest>,
) -> Result<Json<UserResponse>, HttpError> {
    authenticated(&app_state, &headers, |p, s, who| update_name(p, s, who, req)).await
}

async fn handle_get_user(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path(user_id): Path<i64>,
) -> Result<Json<UserResponse>, HttpError> {
    authenticated(&app_state, &headers, |p, s, _| get_user(p, s, user_id)).await
}

// ============================================================================
// Slots
// ============================================================================

async fn handle_create_slot(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateSlotRequest>,
) -> Result<Json<SlotResponse>, HttpError> {
    authenticated(&app_state, &headers, |p, s, who| create_slot(p, s, who, req)).await
}

async fn handle_list_own_slots(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<SlotResponse>>, HttpError> {
    authenticated(&app_state, &headers, list_own_slots).await
}

async fn handle_update_slot(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path(slot_id): Path<i64>,
    Json(req): Json<UpdateSlotRequest>,
) -> Result<Json<SlotResponse>, HttpError> {
    authenticated(&app_state, &headers, |p, s, who| {
        update_slot(p, s, who, slot_id, req)
    })
    .await
}

async fn handle_deactivate_slot(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path(slot_id): Path<i64>,
) -> Result<Json<SlotResponse>, HttpError> {
    authenticated(&app_state, &headers, |p, s, who| {
        deactivate_slot(p, s, who, slot_id)
    })
    .await
}

async fn handle_reactivate_slot(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path(slot_id): Path<i64>,
) -> Result<Json<SlotResponse>, HttpError> {
    authenticated(&app_state, &headers, |p, s, who| {
        reactivate_slot(p, s, who, slot_id)
    })
    .await
}

async fn handle_list_model_slots(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path(model_id): Path<i64>,
) -> Result<Json<Vec<SlotResponse>>, HttpError> {
    authenticated(&app_state, &headers, |p, s, who| {
        list_model_slots(p, s, who, model_id)
    })
    .await
}

// ============================================================================
// Services
// ============================================================================

async fn handle_create_service(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateServiceRequest>,
) -> Result<Json<ServiceResponse>, HttpError> {
    authenticated(&app_state, &headers, |p, s, who| {
        create_service(p, s, who, req)
    })
    .await
}

async fn handle_list_services(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<ServiceResponse>>, HttpError> {
    authenticated(&app_state, &headers, |p, s, who| {
        list_services(p, s, who, query)
    })
    .await
}

async fn handle_get_service(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path(service_id): Path<i64>,
) -> Result<Json<ServiceResponse>, HttpError> {
    authenticated(&app_state, &headers, |p, s, who| {
        get_service(p, s, who, service_id)
    })
    .await
}

async fn handle_update_service(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path(service_id): Path<i64>,
    Json(req): Json<UpdateServiceRequest>,
) -> Result<Json<ServiceResponse>, HttpError> {
    authenticated(&app_state, &headers, |p, s, who| {
        update_service(p, s, who, service_id, req)
    })
    .await
}

async fn handle_deactivate_service(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path(service_id): Path<i64>,
) -> Result<Json<ServiceResponse>, HttpError> {
    authenticated(&app_state, &headers, |p, s, who| {
        deactivate_service(p, s, who, service_id)
    })
    .await
}

async fn handle_list_own_services(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<ServiceResponse>>, HttpError> {
    authenticated(&app_state, &headers, |p, s, who| {
        list_own_services(p, s, who, query)
    })
    .await
}

// ============================================================================
// Bookings and orders
// ============================================================================

async fn handle_create_booking(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateBookingRequest>,
) -> Result<Json<BookingResponse>, HttpError> {
    authenticated(&app_state, &headers, |p, s, who| {
        create_booking(p, s, who, req)
    })
    .await
}

async fn handle_list_my_bookings(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<BookingResponse>>, HttpError> {
    authenticated(&app_state, &headers, |p, s, who| {
        list_my_bookings(p, s, who, query)
    })
    .await
}

async fn handle_approve_booking(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path(booking_id): Path<i64>,
) -> Result<Json<ApproveBookingResponse>, HttpError> {
    authenticated(&app_state, &headers, |p, s, who| {
        approve_booking(p, s, who, booking_id)
    })
    .await
}

async fn handle_reject_booking(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path(booking_id): Path<i64>,
) -> Result<Json<BookingResponse>, HttpError> {
    authenticated(&app_state, &headers, |p, s, who| {
        reject_booking(p, s, who, booking_id)
    })
    .await
}

async fn handle_cancel_booking(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path(booking_id): Path<i64>,
) -> Result<Json<BookingResponse>, HttpError> {
    authenticated(&app_state, &headers, |p, s, who| {
        cancel_booking(p, s, who, booking_id)
    })
    .await
}

async fn handle_list_my_orders(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<OrderResponse>>, HttpError> {
    authenticated(&app_state, &headers, |p, s, who| {
        list_my_orders(p, s, who, query)
    })
    .await
}

async fn handle_cancel_order(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path(order_id): Path<i64>,
) -> Result<Json<OrderResponse>, HttpError> {
    authenticated(&app_state, &headers, |p, s, who| {
        cancel_order(p, s, who, order_id)
    })
    .await
}

async fn handle_complete_order(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path(order_id): Path<i64>,
) -> Result<Json<OrderResponse>, HttpError> {
    authenticated(&app_state, &headers, |p, s, who| {
        complete_order(p, s, who, order_id)
    })
    .await
}

// ============================================================================
// Admin
// ============================================================================

async fn handle_create_admin(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateAdminRequest>,
) -> Result<Json<AdminResponse>, HttpError> {
    authenticated(&app_state, &headers, |p, s, who| create_admin(p, s, who, req)).await
}

async fn handle_get_admin(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path(admin_id): Path<i64>,
) -> Result<Json<AdminResponse>, HttpError> {
    authenticated(&app_state, &headers, |p, s, who| {
        get_admin(p, s, who, admin_id)
    })
    .await
}

async fn handle_update_admin_permissions(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path(auth_id): Path<i64>,
    Json(req): Json<UpdatePermissionsRequest>,
) -> Result<Json<AdminResponse>, HttpError> {
    authenticated(&app_state, &headers, |p, s, who| {
        update_admin_permissions(p, s, who, auth_id, req)
    })
    .await
}

async fn handle_admin_list_users(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<UserResponse>>, HttpError> {
    authenticated(&app_state, &headers, |p, s, who| {
        admin_list_users(p, s, who, query)
    })
    .await
}

async fn handle_verify_user(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path(user_id): Path<i64>,
) -> Result<Json<UserResponse>, HttpError> {
    authenticated(&app_state, &headers, |p, s, who| {
        verify_user(p, s, who, user_id)
    })
    .await
}

async fn handle_admin_list_bookings(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<BookingResponse>>, HttpError> {
    authenticated(&app_state, &headers, |p, s, who| {
        admin_list_bookings(p, s, who, query)
    })
    .await
}

async fn handle_admin_get_booking(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path(booking_id): Path<i64>,
) -> Result<Json<BookingResponse>, HttpError> {
    authenticated(&app_state, &headers, |p, s, who| {
        admin_get_booking(p, s, who, booking_id)
    })
    .await
}

async fn handle_override_booking_status(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path(booking_id): Path<i64>,
    Json(req): Json<OverrideBookingStatusRequest>,
) -> Result<Json<BookingResponse>, HttpError> {
    authenticated(&app_state, &headers, |p, s, who| {
        override_booking_status(p, s, who, booking_id, req)
    })
    .await
}

async fn handle_admin_list_orders(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<OrderResponse>>, HttpError> {
    authenticated(&app_state, &headers, |p, s, who| {
        admin_list_orders(p, s, who, query)
    })
    .await
}

async fn handle_admin_get_order(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path(order_id): Path<i64>,
) -> Result<Json<OrderResponse>, HttpError> {
    authenticated(&app_state, &headers, |p, s, who| {
        admin_get_order(p, s, who, order_id)
    })
    .await
}

async fn handle_override_order_status(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path(order_id): Path<i64>,
    Json(req): Json<OverrideOrderStatusRequest>,
) -> Result<Json<OrderResponse>, HttpError> {
    authenticated(&app_state, &headers, |p, s, who| {
        override_order_status(p, s, who, order_id, req)
    })
    .await
}

/// Builds the application router with all endpoints.
pub fn build_router(app_state: AppState) -> Router {
    with_middleware(api_routes().with_state(app_state))
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handle_health))
        .route("/metrics", get(handle_metrics))
        .route(
            "/profile",
            get(handle_get_own_profile)
                .post(handle_create_profile)
                .patch(handle_update_name),
        )
        .route("/users/{id}", get(handle_get_user))
        .route("/slots", get(handle_list_own_slots).post(handle_create_slot))
        .route("/slots/{id}", put(handle_update_slot))
        .route("/slots/{id}/deactivate", post(handle_deactivate_slot))
        .route("/slots/{id}/reactivate", post(handle_reactivate_slot))
        .route("/models/{id}/slots", get(handle_list_model_slots))
        .route(
            "/services",
            get(handle_list_services).post(handle_create_service),
        )
        .route(
            "/services/{id}",
            get(handle_get_service).put(handle_update_service),
        )
        .route("/services/{id}/deactivate", post(handle_deactivate_service))
        .route("/my/services", get(handle_list_own_services))
        .route("/bookings", post(handle_create_booking))
        .route("/my/bookings", get(handle_list_my_bookings))
        .route("/bookings/{id}/approve", post(handle_approve_booking))
        .route("/bookings/{id}/reject", post(handle_reject_booking))
        .route("/bookings/{id}/cancel", post(handle_cancel_booking))
        .route("/orders", get(handle_list_my_orders))
        .route("/orders/{id}/cancel", post(handle_cancel_order))
        .route("/orders/{id}/complete", post(handle_complete_order))
        .route("/admin/admins", post(handle_create_admin))
        .route("/admin/admins/{id}", get(handle_get_admin))
        .route(
            "/admin/permissions/{auth_id}",
            put(handle_update_admin_permissions),
        )
        .route("/admin/users", get(handle_admin_list_users))
        .route("/admin/users/{id}/verify", post(handle_verify_user))
        .route("/admin/bookings", get(handle_admin_list_bookings))
        .route("/admin/bookings/{id}", get(handle_admin_get_booking))
        .route(
            "/admin/bookings/{id}/status",
            put(handle_override_booking_status),
        )
        .route("/admin/orders", get(handle_admin_list_orders))
        .route("/admin/orders/{id}", get(handle_admin_get_order))
        .route(
            "/admin/orders/{id}/status",
            put(handle_override_order_status),
        )
}

/// Wraps `router` in the HTTP middleware stack.
pub fn with_middleware(router: Router) -> Router {
    router
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(from_fn(track_http_metrics))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(PropagateRequestIdLayer::new(correlation_id_header()))
        .layer(SetRequestIdLayer::new(correlation_id_header(), MakeRequestUuid))
}
