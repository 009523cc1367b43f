use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Reference data. Rooms are seeded by migration and managed outside the
/// booking engine, which only ever reads them.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Room {
    pub id: String,
    pub name: String,
    pub capacity: i32,
    /// JSON array of amenity names, e.g. `["Projector","Whiteboard"]`.
    pub amenities: String,
    pub created_at: DateTime<Utc>,
}

impl Room {
    pub fn amenity_list(&self) -> Vec<String> {
        serde_json::from_str(&self.amenities).unwrap_or_default()
    }
}
