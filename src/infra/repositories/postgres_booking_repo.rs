use crate::domain::models::booking::{Booking, BookingStats, BookingStatus, DailyCount, StatusUpdate};
use crate::domain::ports::BookingRepository;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, Transaction};

pub struct PostgresBookingRepo {
    pool: PgPool,
}

impl PostgresBookingRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Serializes all overlap-checked mutations for one (room, date) so a
    // check-then-write sequence cannot race a concurrent one. Released at
    // commit/rollback.
    async fn lock_day(
        tx: &mut Transaction<'_, Postgres>,
        room: &str,
        date: NaiveDate,
    ) -> Result<(), AppError> {
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(format!("{}|{}", room, date))
            .execute(&mut **tx).await.map_err(AppError::Database)?;
        Ok(())
    }

    async fn count_overlap(
        tx: &mut Transaction<'_, Postgres>,
        room: &str,
        date: NaiveDate,
        exclude_id: &str,
        start_time: &str,
        end_time: &str,
    ) -> Result<i64, AppError> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM bookings
             WHERE room = $1 AND date = $2 AND id != $3
               AND status IN ('pending', 'approved')
               AND start_time < $4 AND end_time > $5"
        )
            .bind(room).bind(date).bind(exclude_id)
            .bind(end_time).bind(start_time)
            .fetch_one(&mut **tx).await.map_err(AppError::Database)
    }
}

#[async_trait]
impl BookingRepository for PostgresBookingRepo {
    async fn insert(&self, booking: &Booking) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        Self::lock_day(&mut tx, &booking.room, booking.date).await?;

        let overlapping = Self::count_overlap(
            &mut tx, &booking.room, booking.date, &booking.id,
            &booking.start_time, &booking.end_time,
        ).await?;
        if overlapping > 0 {
            return Err(AppError::Conflict(
                "The requested time slot conflicts with an existing booking".into(),
            ));
        }

        let created = sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (id, room, date, start_time, end_time, user_name, user_email, status, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING *"
        )
            .bind(&booking.id).bind(&booking.room).bind(booking.date)
            .bind(&booking.start_time).bind(&booking.end_time)
            .bind(&booking.user_name).bind(&booking.user_email)
            .bind(&booking.status).bind(booking.created_at)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_email(&self, email: &str) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE user_email = $1 ORDER BY date ASC, start_time ASC"
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
                "SELECT * FROM bookings WHERE status = 'approved' AND user_email = $1
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
             WHERE room = $1 AND date = $2 AND status IN ('pending', 'approved')
             ORDER BY start_time ASC"
        )
            .bind(room).bind(date)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn reschedule(&self, id: &str, start_time: &str, end_time: &str) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let current = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx).await.map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Booking not found".into()))?;

        Self::lock_day(&mut tx, &current.room, current.date).await?;

        let overlapping = Self::count_overlap(
            &mut tx, &current.room, current.date, id, start_time, end_time,
        ).await?;
        if overlapping > 0 {
            return Err(AppError::Conflict(
                "The new time slot conflicts with an existing booking".into(),
            ));
        }

        let updated = sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET start_time = $1, end_time = $2, status = 'pending'
             WHERE id = $3
             RETURNING *"
        )
            .bind(start_time).bind(end_time).bind(id)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(updated)
    }

    async fn cancel(&self, id: &str) -> Result<Booking, AppError> {
        sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status = 'cancelled' WHERE id = $1 RETURNING *"
        )
            .bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Booking not found".into()))
    }

    async fn set_status(&self, id: &str, status: BookingStatus) -> Result<StatusUpdate, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let booking = sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status = $1 WHERE id = $2 RETURNING *"
        )
            .bind(status.as_str()).bind(id)
            .fetch_optional(&mut *tx).await.map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Booking not found".into()))?;

        // First-approved-wins: overlapping pending requests lose when an
        // approval claims the interval.
        let auto_rejected = if status == BookingStatus::Approved {
            Self::lock_day(&mut tx, &booking.room, booking.date).await?;
            sqlx::query_as::<_, Booking>(
                "UPDATE bookings SET status = 'rejected'
                 WHERE room = $1 AND date = $2 AND id != $3
                   AND status = 'pending'
                   AND start_time < $4 AND end_time > $5
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
                    COUNT(*) FILTER (WHERE status = 'approved') AS approved,
                    COUNT(*) FILTER (WHERE status = 'pending') AS pending
             FROM bookings"
        )
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
}
