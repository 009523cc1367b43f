use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::FromRequestParts, http::request::Parts};
use std::sync::Arc;

/// Marker extracted from the X-Admin-Token header. Session/auth protocol
/// design lives outside this service; a shared token gates the admin surface.
pub struct AdminToken;

impl FromRequestParts<Arc<AppState>> for AdminToken {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let provided = parts
            .headers
            .get("X-Admin-Token")
            .and_then(|v| v.to_str().ok());

        match provided {
            Some(token) if token == state.config.admin_token => Ok(AdminToken),
            _ => Err(AppError::Forbidden("Invalid admin token".into())),
        }
    }
}
