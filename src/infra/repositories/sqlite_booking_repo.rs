use crate::domain::models::booking::{Booking, BookingStats, BookingStatus, DailyCount, StatusUpdate};
use crate::domain::ports::BookingRepository;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::SqlitePool;

pub struct SqliteBookingRepo {
    pool: SqlitePool,
}

impl SqliteBookingRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

// Overlap predicate in SQL: start_time < candidate.end AND end_time >
// candidate.start, on zero-padded HH:MM:SS strings. Same half-open test as
// domain::services::conflict::overlaps.
const OVERLAP_COUNT_SQL: &str =
    "SELECT COUNT(*) FROM bookings
     WHERE room = ? AND date = ? AND id != ?
       AND status IN ('pending', 'approved')
       AND start_time < ? AND end_time > ?";

#[async_trait]
impl BookingRepository for SqliteBookingRepo {
    async fn insert(&self, booking: &Booking) -> Result<Booking, AppError> {
        // Mutate first: the INSERT takes SQLite's single writer lock, so the
        // verification below always observes any competing committed insert.
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let created = sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (id, room, date, start_time, end_time, user_name, user_email, status, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&booking.id).bind(&booking.room).bind(booking.date)
            .bind(&booking.start_time).bind(&booking.end_time)
            .bind(&booking.user_name).bind(&booking.user_email)
            .bind(&booking.status).bind(booking.created_at)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

        let overlapping: i64 = sqlx::query_scalar(OVERLAP_COUNT_SQL)
            .bind(&created.room).bind(created.date).bind(&created.id)
            .bind(&created.end_time).bind(&created.start_time)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

        if overlapping > 0 {
            tx.rollback().await.map_err(AppError::Database)?;
            return Err(AppError::Conflict(
                "The requested time slot conflicts with an existing booking".into(),
            ));
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_email(&self, email: &str) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE user_email = ? ORDER BY date ASC, start_time ASC"
        )
            .bind(email)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_all(&self) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings ORDER BY date DESC, start_time ASC")
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_approved(&self, email: Option<&str>) -> Result<Vec<Booking>, AppError> {
        match email {
            Some(email) => sqlx::query_as::<_, Booking>(
                "SELECT * FROM bookings WHERE status = 'approved' AND user_email = ?
                 ORDER BY date ASC, start_time ASC"
            )
                .bind(email)
                .fetch_all(&self.pool).await.map_err(AppError::Database),
            None => sqlx::query_as::<_, Booking>(
                "SELECT * FROM bookings WHERE status = 'approved' ORDER BY date ASC, start_time ASC"
            )
                .fetch_all(&self.pool).await.map_err(AppError::Database),
        }
    }

    async fn list_occupied(&self, room: &str, date: NaiveDate) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings
             WHERE room = ? AND date = ? AND status IN ('pending', 'approved')
             ORDER BY start_time ASC"
        )
            .bind(room).bind(date)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn reschedule(&self, id: &str, start_time: &str, end_time: &str) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let updated = sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET start_time = ?, end_time = ?, status = 'pending'
             WHERE id = ?
             RETURNING *"
        )
            .bind(start_time).bind(end_time).bind(id)
            .fetch_optional(&mut *tx).await.map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Booking not found".into()))?;

        let overlapping: i64 = sqlx::query_scalar(OVERLAP_COUNT_SQL)
            .bind(&updated.room).bind(updated.date).bind(&updated.id)
            .bind(&updated.end_time).bind(&updated.start_time)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

        if overlapping > 0 {
            tx.rollback().await.map_err(AppError::Database)?;
            return Err(AppError::Conflict(
                "The new time slot conflicts with an existing booking".into(),
            ));
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(updated)
    }

    async fn cancel(&self, id: &str) -> Result<Booking, AppError> {
        sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status = 'cancelled' WHERE id = ? RETURNING *"
        )
            .bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Booking not found".into()))
    }

    async fn set_status(&self, id: &str, status: BookingStatus) -> Result<StatusUpdate, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let booking = sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status = ? WHERE id = ? RETURNING *"
        )
            .bind(status.as_str()).bind(id)
            .fetch_optional(&mut *tx).await.map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Booking not found".into()))?;

        // First-approved-wins: an approval claims the interval, so competing
        // pending requests for the same range are rejected in the same
        // transaction.
        let auto_rejected = if status == BookingStatus::Approved {
            sqlx::query_as::<_, Booking>(
                "UPDATE bookings SET status = 'rejected'
                 WHERE room = ? AND date = ? AND id != ?
                   AND status = 'pending'
                   AND start_time < ? AND end_time > ?
                 RETURNING *"
            )
                .bind(&booking.room).bind(booking.date).bind(&booking.id)
                .bind(&booking.end_time).bind(&booking.start_time)
                .fetch_all(&mut *tx).await.map_err(AppError::Database)?
        } else {
            Vec::new()
        };

        tx.commit().await.map_err(AppError::Database)?;
        Ok(StatusUpdate { booking, auto_rejected })
    }

    async fn count_per_day(&self) -> Result<Vec<DailyCount>, AppError> {
        sqlx::query_as::<_, DailyCount>(
            "SELECT date, COUNT(*) AS total FROM bookings GROUP BY date ORDER BY date DESC"
        )
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn stats(&self) -> Result<BookingStats, AppError> {
        sqlx::query_as::<_, BookingStats>(
            "SELECT COUNT(*) AS total,
                    COALESCE(SUM(status = 'approved'), 0) AS approved,
                    COALESCE(SUM(status = 'pending'), 0) AS pending
             FROM bookings"
        )
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
}
