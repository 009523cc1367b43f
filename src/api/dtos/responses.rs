use crate::domain::models::room::Room;
use serde::Serialize;

#[derive(Serialize)]
pub struct RoomResponse {
    pub id: String,
    pub name: String,
    pub capacity: i32,
    pub amenities: Vec<String>,
}

impl From<&Room> for RoomResponse {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.clone(),
            name: room.name.clone(),
            capacity: room.capacity,
            amenities: room.amenity_list(),
        }
    }
}

/// One occupied range, in both storage and display forms so the UI never
/// re-derives the conversion.
#[derive(Serialize)]
pub struct OccupiedInterval {
    pub time: String,
    pub end_time: String,
    pub start: String,
    pub end: String,
}

#[derive(Serialize)]
pub struct SlotsResponse {
    pub room: String,
    pub date: String,
    pub occupied: Vec<OccupiedInterval>,
    /// Grid slot starts (storage form) claimed by the occupied intervals,
    /// derived from the interval overlap predicate.
    pub occupied_slots: Vec<String>,
}
