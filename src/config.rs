use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub mail_service_url: String,
    pub mail_service_token: String,
    pub admin_token: String,
    /// IANA timezone the facility's wall-clock booking times are interpreted in.
    pub timezone: String,
    /// Bookable day window, 24-hour "HH:MM" form.
    pub grid_start: String,
    pub grid_end: String,
    pub grid_step_min: u32,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            mail_service_url: env::var("MAIL_SERVICE_URL").unwrap_or_else(|_| "http://localhost:8000/api/v1/send".to_string()),
            mail_service_token: env::var("MAIL_SERVICE_TOKEN").unwrap_or_else(|_| "test-token-1".to_string()),
            admin_token: env::var("ADMIN_TOKEN").expect("ADMIN_TOKEN must be set"),
            timezone: env::var("FACILITY_TIMEZONE").unwrap_or_else(|_| "UTC".to_string()),
            grid_start: env::var("GRID_START").unwrap_or_else(|_| "08:00".to_string()),
            grid_end: env::var("GRID_END").unwrap_or_else(|_| "16:00".to_string()),
            grid_step_min: env::var("GRID_STEP_MIN")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .expect("GRID_STEP_MIN must be a number"),
        }
    }
}
