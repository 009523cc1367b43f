use crate::domain::services::timefmt;
use crate::error::AppError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Approved => "approved",
            BookingStatus::Rejected => "rejected",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    /// Whether a booking in this status claims its time range. Rejected and
    /// cancelled bookings never count against availability.
    pub fn occupies(&self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Approved)
    }

    /// Statuses an administrator may set directly.
    pub fn parse_admin(s: &str) -> Result<Self, AppError> {
        match s {
            "approved" => Ok(BookingStatus::Approved),
            "rejected" => Ok(BookingStatus::Rejected),
            other => Err(AppError::InvalidStatus(format!(
                "Status '{}' cannot be set by an administrator (allowed: approved, rejected)",
                other
            ))),
        }
    }
}

/// Times are persisted in 24-hour "HH:MM:SS" form; zero-padding keeps string
/// comparison equivalent to time comparison in SQL.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Booking {
    pub id: String,
    pub room: String,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub user_name: String,
    pub user_email: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

pub struct NewBookingParams {
    pub room: String,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub user_name: String,
    pub user_email: String,
}

impl Booking {
    pub fn new(params: NewBookingParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            room: params.room,
            date: params.date,
            start_time: params.start_time,
            end_time: params.end_time,
            user_name: params.user_name,
            user_email: params.user_email,
            status: BookingStatus::Pending.as_str().to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn has_status(&self, status: BookingStatus) -> bool {
        self.status == status.as_str()
    }

    pub fn is_owned_by(&self, email: &str) -> bool {
        self.user_email == email
    }

    /// The `[start, end)` minute interval this booking claims.
    pub fn interval(&self) -> Result<(u32, u32), AppError> {
        Ok((
            timefmt::parse_storage_time(&self.start_time)?,
            timefmt::parse_storage_time(&self.end_time)?,
        ))
    }
}

#[derive(Debug, Serialize, FromRow)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub total: i64,
}

#[derive(Debug, Serialize, FromRow)]
pub struct BookingStats {
    pub total: i64,
    pub approved: i64,
    pub pending: i64,
}

/// Result of an admin status change: the updated booking plus any pending
/// bookings that were auto-rejected because they overlapped a fresh approval.
#[derive(Debug)]
pub struct StatusUpdate {
    pub booking: Booking,
    pub auto_rejected: Vec<Booking>,
}
