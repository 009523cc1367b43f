use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;
use tera::Tera;

use crate::config::Config;
use crate::domain::ports::SystemClock;
use crate::domain::services::notifier::Notifier;
use crate::domain::services::slots::SlotGrid;
use crate::infra::email::http_email_service::HttpEmailService;
use crate::infra::repositories::{
    postgres_booking_repo::PostgresBookingRepo, postgres_room_repo::PostgresRoomRepo,
    sqlite_booking_repo::SqliteBookingRepo, sqlite_room_repo::SqliteRoomRepo,
};
use crate::state::AppState;

pub fn load_templates() -> Tera {
    let mut tera = Tera::default();
    tera.add_raw_template("booking_pending.html", include_str!("templates/booking_pending.html"))
        .expect("Failed to load pending template");
    tera.add_raw_template("booking_updated.html", include_str!("templates/booking_updated.html"))
        .expect("Failed to load updated template");
    tera.add_raw_template("booking_cancelled.html", include_str!("templates/booking_cancelled.html"))
        .expect("Failed to load cancelled template");
    tera.add_raw_template("booking_status.html", include_str!("templates/booking_status.html"))
        .expect("Failed to load status template");
    tera
}

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;
    let email_service = Arc::new(HttpEmailService::new(
        config.mail_service_url.clone(),
        config.mail_service_token.clone(),
    ));

    let templates = Arc::new(load_templates());
    let notifier = Notifier::new(email_service.clone(), templates);
    let clock = Arc::new(SystemClock);
    let grid = SlotGrid::from_config(config).expect("Invalid booking grid configuration");

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        AppState {
            config: config.clone(),
            grid,
            booking_repo: Arc::new(PostgresBookingRepo::new(pool.clone())),
            room_repo: Arc::new(PostgresRoomRepo::new(pool)),
            email_service,
            clock,
            notifier,
        }
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        AppState {
            config: config.clone(),
            grid,
            booking_repo: Arc::new(SqliteBookingRepo::new(pool.clone())),
            room_repo: Arc::new(SqliteRoomRepo::new(pool)),
            email_service,
            clock,
            notifier,
        }
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
