use crate::api::dtos::responses::RoomResponse;
use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;

pub async fn list_rooms(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let rooms = state.room_repo.list().await?;
    let response: Vec<RoomResponse> = rooms.iter().map(RoomResponse::from).collect();
    Ok(Json(response))
}
