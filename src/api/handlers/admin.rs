use crate::api::dtos::requests::UpdateStatusRequest;
use crate::api::extractors::admin::AdminToken;
use crate::domain::models::booking::BookingStatus;
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

pub async fn list_all_bookings(
    State(state): State<Arc<AppState>>,
    _admin: AdminToken,
) -> Result<impl IntoResponse, AppError> {
    let bookings = state.booking_repo.list_all().await?;
    Ok(Json(bookings))
}

pub async fn update_status(
    State(state): State<Arc<AppState>>,
    _admin: AdminToken,
    Path(id): Path<String>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    let status = BookingStatus::parse_admin(&payload.status)?;

    let current = state.booking_repo.find_by_id(&id).await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;

    // cancelled and rejected are terminal states.
    if current.has_status(BookingStatus::Cancelled) || current.has_status(BookingStatus::Rejected) {
        return Err(AppError::Forbidden(format!(
            "Booking is {} and cannot change status",
            current.status
        )));
    }

    let update = state.booking_repo.set_status(&id, status).await?;
    info!(
        "Booking {} set to {} ({} overlapping pending bookings auto-rejected)",
        update.booking.id,
        update.booking.status,
        update.auto_rejected.len()
    );

    state.notifier.status_changed(&update.booking);
    for rejected in &update.auto_rejected {
        state.notifier.status_changed(rejected);
    }

    Ok(Json(json!({
        "booking": update.booking,
        "auto_rejected": update.auto_rejected,
    })))
}

pub async fn summary(
    State(state): State<Arc<AppState>>,
    _admin: AdminToken,
) -> Result<impl IntoResponse, AppError> {
    let counts = state.booking_repo.count_per_day().await?;
    Ok(Json(counts))
}

pub async fn stats(
    State(state): State<Arc<AppState>>,
    _admin: AdminToken,
) -> Result<impl IntoResponse, AppError> {
    let stats = state.booking_repo.stats().await?;
    Ok(Json(stats))
}
