use crate::api::dtos::requests::SlotQuery;
use crate::api::dtos::responses::{OccupiedInterval, SlotsResponse};
use crate::domain::services::timefmt;
use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::{Query, State}, response::IntoResponse, Json};
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Occupied ranges and the grid slots they claim for one room and date.
/// Slot membership is derived from the interval overlap predicate, never the
/// other way around.
pub async fn get_slots(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SlotQuery>,
) -> Result<impl IntoResponse, AppError> {
    let date = NaiveDate::parse_from_str(&params.date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date format (expected YYYY-MM-DD)".into()))?;

    state.room_repo.find_by_name(&params.room).await?
        .ok_or_else(|| AppError::NotFound(format!("Room '{}' not found", params.room)))?;

    let bookings = state.booking_repo.list_occupied(&params.room, date).await?;

    let mut occupied = Vec::with_capacity(bookings.len());
    let mut slot_starts = BTreeSet::new();

    for booking in &bookings {
        let (start, end) = booking.interval()?;
        for slot in state.grid.slots_occupied(start, end)? {
            slot_starts.insert(slot);
        }
        occupied.push(OccupiedInterval {
            time: booking.start_time.clone(),
            end_time: booking.end_time.clone(),
            start: timefmt::format_display(start),
            end: timefmt::format_display(end),
        });
    }

    Ok(Json(SlotsResponse {
        room: params.room,
        date: params.date,
        occupied,
        occupied_slots: slot_starts.into_iter().map(timefmt::format_storage).collect(),
    }))
}
