use crate::api::dtos::requests::{ApprovedParams, CreateBookingRequest, EditBookingRequest, OwnerParams};
use crate::domain::models::booking::{Booking, BookingStatus, NewBookingParams};
use crate::domain::services::{conflict, timefmt};
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use chrono_tz::Tz;
use std::sync::Arc;
use tracing::info;

fn parse_date(s: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date format (expected YYYY-MM-DD)".into()))
}

/// Rejects bookings that would start before the current facility wall-clock
/// time.
fn ensure_not_past(state: &AppState, date: NaiveDate, start_min: u32) -> Result<(), AppError> {
    let tz: Tz = state.config.timezone.parse().unwrap_or(chrono_tz::UTC);
    let now_local = state.clock.now_utc().with_timezone(&tz).naive_local();
    let start_local = date.and_time(timefmt::to_naive_time(start_min)?);

    if start_local < now_local {
        return Err(AppError::PastDate(format!(
            "Cannot book a slot in the past ({} {})",
            date,
            timefmt::format_display(start_min)
        )));
    }
    Ok(())
}

fn conflict_error(candidate: (u32, u32), intervals: &[(u32, u32)]) -> AppError {
    let taken = conflict::find_conflicts(candidate, intervals)
        .iter()
        .map(|(s, e)| format!("{}-{}", timefmt::format_display(*s), timefmt::format_display(*e)))
        .collect::<Vec<_>>()
        .join(", ");
    AppError::Conflict(format!(
        "The requested time slot conflicts with an existing booking ({})",
        taken
    ))
}

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let date = parse_date(&payload.date)?;
    let start = timefmt::parse_any_time(&payload.start_time)?;
    let end = timefmt::parse_any_time(&payload.end_time)?;
    state.grid.validate_range(start, end)?;

    state.room_repo.find_by_name(&payload.room).await?
        .ok_or_else(|| AppError::NotFound(format!("Room '{}' not found", payload.room)))?;

    ensure_not_past(&state, date, start)?;

    // Fast-fail with a descriptive reason; the repository re-checks the same
    // predicate inside the insert transaction, which is the authoritative
    // guard against a concurrent create.
    let existing = state.booking_repo.list_occupied(&payload.room, date).await?;
    let intervals = existing.iter().map(Booking::interval).collect::<Result<Vec<_>, _>>()?;
    if conflict::has_conflict((start, end), &intervals) {
        return Err(conflict_error((start, end), &intervals));
    }

    let booking = Booking::new(NewBookingParams {
        room: payload.room,
        date,
        start_time: timefmt::format_storage(start),
        end_time: timefmt::format_storage(end),
        user_name: payload.name,
        user_email: payload.email,
    });

    let created = state.booking_repo.insert(&booking).await?;
    info!("Booking created: {} for {} on {}", created.id, created.room, created.date);

    state.notifier.booking_created(&created);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_user_bookings(
    State(state): State<Arc<AppState>>,
    Query(params): Query<OwnerParams>,
) -> Result<impl IntoResponse, AppError> {
    let bookings = state.booking_repo.list_by_email(&params.email).await?;
    Ok(Json(bookings))
}

pub async fn list_approved(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ApprovedParams>,
) -> Result<impl IntoResponse, AppError> {
    let bookings = state.booking_repo.list_approved(params.email.as_deref()).await?;
    Ok(Json(bookings))
}

async fn find_owned(state: &AppState, id: &str, email: &str) -> Result<Booking, AppError> {
    let booking = state.booking_repo.find_by_id(id).await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;

    if !booking.is_owned_by(email) {
        return Err(AppError::Forbidden(
            "You do not have permission to manage this booking".into(),
        ));
    }
    Ok(booking)
}

pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<OwnerParams>,
) -> Result<impl IntoResponse, AppError> {
    let booking = find_owned(&state, &id, &params.email).await?;
    Ok(Json(booking))
}

pub async fn edit_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<EditBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let booking = find_owned(&state, &id, &payload.email).await?;

    if booking.has_status(BookingStatus::Approved) {
        return Err(AppError::Forbidden(
            "Approved bookings cannot be edited; cancel and rebook instead".into(),
        ));
    }
    if booking.has_status(BookingStatus::Cancelled) {
        return Err(AppError::Forbidden("Cancelled bookings cannot be edited".into()));
    }

    let start = timefmt::parse_any_time(&payload.start_time)?;
    let end = timefmt::parse_any_time(&payload.end_time)?;
    state.grid.validate_range(start, end)?;
    ensure_not_past(&state, booking.date, start)?;

    // The booking being moved never conflicts with itself.
    let existing = state.booking_repo.list_occupied(&booking.room, booking.date).await?;
    let intervals = existing
        .iter()
        .filter(|b| b.id != booking.id)
        .map(Booking::interval)
        .collect::<Result<Vec<_>, _>>()?;
    if conflict::has_conflict((start, end), &intervals) {
        return Err(conflict_error((start, end), &intervals));
    }

    let updated = state.booking_repo
        .reschedule(&booking.id, &timefmt::format_storage(start), &timefmt::format_storage(end))
        .await?;
    info!("Booking rescheduled: {} now {}-{}", updated.id, updated.start_time, updated.end_time);

    state.notifier.booking_rescheduled(&updated);
    Ok(Json(updated))
}

pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<OwnerParams>,
) -> Result<impl IntoResponse, AppError> {
    let booking = find_owned(&state, &id, &params.email).await?;

    // Idempotent: cancelling twice returns the already-cancelled booking.
    if booking.has_status(BookingStatus::Cancelled) {
        return Ok(Json(booking));
    }
    if booking.has_status(BookingStatus::Rejected) {
        return Err(AppError::Forbidden("Rejected bookings cannot be cancelled".into()));
    }

    let cancelled = state.booking_repo.cancel(&booking.id).await?;
    info!("Booking cancelled: {}", cancelled.id);

    state.notifier.booking_cancelled(&cancelled);
    Ok(Json(cancelled))
}
