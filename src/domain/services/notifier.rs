//! Fire-and-forget booking emails. A failed send is logged and never
//! propagated to the lifecycle operation that triggered it.

use crate::domain::models::booking::Booking;
use crate::domain::ports::EmailService;
use crate::domain::services::timefmt;
use std::sync::Arc;
use tera::{Context, Tera};
use tracing::warn;

#[derive(Clone)]
pub struct Notifier {
    email_service: Arc<dyn EmailService>,
    templates: Arc<Tera>,
}

impl Notifier {
    pub fn new(email_service: Arc<dyn EmailService>, templates: Arc<Tera>) -> Self {
        Self { email_service, templates }
    }

    pub fn booking_created(&self, booking: &Booking) {
        self.dispatch(booking, "Meeting Room Booking Confirmation", "booking_pending.html");
    }

    pub fn booking_rescheduled(&self, booking: &Booking) {
        self.dispatch(booking, "Meeting Room Booking Updated", "booking_updated.html");
    }

    pub fn booking_cancelled(&self, booking: &Booking) {
        self.dispatch(booking, "Meeting Room Booking Cancelled", "booking_cancelled.html");
    }

    pub fn status_changed(&self, booking: &Booking) {
        self.dispatch(booking, "Meeting Room Booking Status Update", "booking_status.html");
    }

    fn dispatch(&self, booking: &Booking, subject: &str, template: &str) {
        let mut ctx = Context::new();
        ctx.insert("user_name", &booking.user_name);
        ctx.insert("room", &booking.room);
        ctx.insert("date", &booking.date.to_string());
        ctx.insert("status", &booking.status);
        ctx.insert("start", &display_or_raw(&booking.start_time));
        ctx.insert("end", &display_or_raw(&booking.end_time));

        let body = match self.templates.render(template, &ctx) {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to render email template {}: {:?}", template, e);
                return;
            }
        };

        let email_service = self.email_service.clone();
        let recipient = booking.user_email.clone();
        let subject = subject.to_string();

        tokio::spawn(async move {
            if let Err(e) = email_service.send(&recipient, &subject, &body).await {
                warn!("Email delivery to {} failed: {}", recipient, e);
            }
        });
    }
}

fn display_or_raw(stored: &str) -> String {
    match timefmt::parse_storage_time(stored) {
        Ok(minutes) => timefmt::format_display(minutes),
        Err(_) => stored.to_string(),
    }
}
