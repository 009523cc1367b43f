use crate::config::Config;
use crate::domain::ports::{BookingRepository, Clock, EmailService, RoomRepository};
use crate::domain::services::notifier::Notifier;
use crate::domain::services::slots::SlotGrid;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub grid: SlotGrid,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub room_repo: Arc<dyn RoomRepository>,
    pub email_service: Arc<dyn EmailService>,
    pub clock: Arc<dyn Clock>,
    pub notifier: Notifier,
}
