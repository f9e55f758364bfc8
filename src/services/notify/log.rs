use async_trait::async_trait;

use super::Notifier;
use crate::models::PersistedBooking;

/// Stands in for email delivery: the confirmation is only written to the log.
pub struct LogNotifier {
    from: String,
}

impl LogNotifier {
    pub fn new(business_name: &str, business_domain: &str) -> Self {
        Self {
            from: format!("{business_name} <hello@{business_domain}>"),
        }
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_confirmation(&self, booking: &PersistedBooking) -> anyhow::Result<()> {
        tracing::info!(
            from = %self.from,
            to = %booking.email,
            date = %booking.calendar_date(),
            time = %booking.time,
            "confirmation email (simulated)"
        );
        Ok(())
    }
}
