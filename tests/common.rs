use roombook_backend::{
    api::router::create_router,
    config::Config,
    domain::ports::{Clock, EmailService},
    domain::services::notifier::Notifier,
    domain::services::slots::SlotGrid,
    error::AppError,
    infra::factory::load_templates,
    infra::repositories::{
        sqlite_booking_repo::SqliteBookingRepo,
        sqlite_room_repo::SqliteRoomRepo,
    },
    state::AppState,
};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request},
    Router,
};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;
use uuid::Uuid;

pub const ADMIN_TOKEN: &str = "test-admin-token";

/// The pinned "now" every TestApp runs at; bookable test dates lie after it.
pub const NOW: &str = "2030-06-01T00:00:00Z";

pub struct RecordingEmailService {
    pub sent: Mutex<Vec<(String, String)>>,
    pub fail: AtomicBool,
}

#[async_trait]
impl EmailService for RecordingEmailService {
    async fn send(&self, recipient: &str, subject: &str, _html_body: &str) -> Result<(), AppError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::InternalWithMsg("Simulated mail outage".into()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((recipient.to_string(), subject.to_string()));
        Ok(())
    }
}

pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now_utc(&self) -> DateTime<Utc> {
        self.0
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub email: Arc<RecordingEmailService>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url,
            port: 0,
            mail_service_url: "http://localhost".to_string(),
            mail_service_token: "token".to_string(),
            admin_token: ADMIN_TOKEN.to_string(),
            timezone: "UTC".to_string(),
            grid_start: "08:00".to_string(),
            grid_end: "16:00".to_string(),
            grid_step_min: 60,
        };

        let email = Arc::new(RecordingEmailService {
            sent: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
        });
        let templates = Arc::new(load_templates());
        let notifier = Notifier::new(email.clone(), templates);
        let grid = SlotGrid::from_config(&config).unwrap();

        let state = Arc::new(AppState {
            config,
            grid,
            booking_repo: Arc::new(SqliteBookingRepo::new(pool.clone())),
            room_repo: Arc::new(SqliteRoomRepo::new(pool.clone())),
            email_service: email.clone(),
            clock: Arc::new(FixedClock(NOW.parse().unwrap())),
            notifier,
        });

        let router = create_router(state);

        Self {
            router,
            pool,
            db_filename,
            email,
        }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> axum::response::Response {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");

        let request = match body {
            Some(json) => builder.body(Body::from(json.to_string())).unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn admin_request(&self, method: Method, uri: &str, body: Option<Value>) -> axum::response::Response {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .header("X-Admin-Token", ADMIN_TOKEN);

        let request = match body {
            Some(json) => builder.body(Body::from(json.to_string())).unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn create_booking(
        &self,
        room: &str,
        date: &str,
        start: &str,
        end: &str,
        name: &str,
        email: &str,
    ) -> axum::response::Response {
        self.request(
            Method::POST,
            "/api/v1/bookings",
            Some(json!({
                "room": room,
                "date": date,
                "start_time": start,
                "end_time": end,
                "name": name,
                "email": email,
            })),
        )
        .await
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}

#[allow(dead_code)]
pub async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
