use serde::Deserialize;

/// Times are accepted in either the 12-hour display form ("9:00am") or the
/// 24-hour storage form ("09:00" / "09:00:00").
#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub room: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub name: String,
    pub email: String,
}

#[derive(Deserialize)]
pub struct EditBookingRequest {
    pub email: String,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[derive(Deserialize)]
pub struct OwnerParams {
    pub email: String,
}

#[derive(Deserialize)]
pub struct ApprovedParams {
    pub email: Option<String>,
}

#[derive(Deserialize)]
pub struct SlotQuery {
    pub room: String,
    pub date: String,
}
