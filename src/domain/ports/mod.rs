use crate::domain::models::booking::{Booking, BookingStats, BookingStatus, DailyCount, StatusUpdate};
use crate::domain::models::room::Room;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Insert with the overlap invariant enforced inside one transaction.
    /// Returns `Conflict` if the interval is taken at commit time.
    async fn insert(&self, booking: &Booking) -> Result<Booking, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError>;
    async fn list_by_email(&self, email: &str) -> Result<Vec<Booking>, AppError>;
    async fn list_all(&self) -> Result<Vec<Booking>, AppError>;
    async fn list_approved(&self, email: Option<&str>) -> Result<Vec<Booking>, AppError>;
    /// Bookings occupying (room, date): status pending or approved, ordered by
    /// start time. Mirrors `BookingStatus::occupies`.
    async fn list_occupied(&self, room: &str, date: NaiveDate) -> Result<Vec<Booking>, AppError>;
    /// Move a booking to a new interval and reset it to pending, with the
    /// overlap guard excluding the booking itself. Transactional like `insert`.
    async fn reschedule(&self, id: &str, start_time: &str, end_time: &str) -> Result<Booking, AppError>;
    async fn cancel(&self, id: &str) -> Result<Booking, AppError>;
    /// Admin transition. Approving auto-rejects overlapping pending bookings
    /// for the same room and date within the same transaction.
    async fn set_status(&self, id: &str, status: BookingStatus) -> Result<StatusUpdate, AppError>;
    async fn count_per_day(&self) -> Result<Vec<DailyCount>, AppError>;
    async fn stats(&self) -> Result<BookingStats, AppError>;
}

#[async_trait]
pub trait RoomRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Room>, AppError>;
    async fn find_by_name(&self, name: &str) -> Result<Option<Room>, AppError>;
}

#[async_trait]
pub trait EmailService: Send + Sync {
    async fn send(&self, recipient: &str, subject: &str, html_body: &str) -> Result<(), AppError>;
}

/// Injectable time source so past-date rejection is testable.
pub trait Clock: Send + Sync {
    fn now_utc(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
