pub mod log;

use async_trait::async_trait;

use crate::models::PersistedBooking;

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_confirmation(&self, booking: &PersistedBooking) -> anyhow::Result<()>;
}
