use axum::{
    body::Body,
    extract::Request,
    routing::{get, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::api::handlers::{admin, booking, health, room, slot};
use crate::state::AppState;
use tower_http::{
    classify::ServerErrorsFailureClass,
    trace::TraceLayer,
};
use tracing::{error, info, info_span, Span};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Reference data
        .route("/api/v1/rooms", get(room::list_rooms))

        // Availability
        .route("/api/v1/slots", get(slot::get_slots))

        // Booking lifecycle
        .route("/api/v1/bookings", get(booking::list_user_bookings).post(booking::create_booking))
        .route("/api/v1/bookings/approved", get(booking::list_approved))
        .route(
            "/api/v1/bookings/{id}",
            get(booking::get_booking)
                .put(booking::edit_booking)
                .delete(booking::cancel_booking),
        )

        // Admin
        .route("/api/v1/admin/bookings", get(admin::list_all_bookings))
        .route("/api/v1/admin/bookings/{id}/status", put(admin::update_status))
        .route("/api/v1/admin/summary", get(admin::summary))
        .route("/api/v1/admin/stats", get(admin::stats))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
