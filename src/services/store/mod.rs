pub mod memory;
pub mod sqlite;

use crate::models::PersistedBooking;

pub use memory::MemoryBookingStore;
pub use sqlite::SqliteBookingStore;

/// The one well-known key the booking lives under.
pub const BOOKING_KEY: &str = "booking";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("failed to encode booking: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("stored booking is malformed: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Single-slot storage for the most recent booking. Saving replaces whatever
/// was there; there is no history.
pub trait BookingStore: Send + Sync {
    fn save(&self, booking: &PersistedBooking) -> Result<(), StoreError>;
    fn load(&self) -> Result<Option<PersistedBooking>, StoreError>;
    fn clear(&self) -> Result<(), StoreError>;
}

pub fn encode(booking: &PersistedBooking) -> Result<String, StoreError> {
    serde_json::to_string(booking).map_err(StoreError::Encode)
}

pub fn decode(text: &str) -> Result<PersistedBooking, StoreError> {
    serde_json::from_str(text).map_err(StoreError::Malformed)
}

/// Loads the booking for display. A malformed slot is cleared and reported
/// as absent so the caller can send the user back to the start.
pub fn load_or_discard(store: &dyn BookingStore) -> Result<Option<PersistedBooking>, StoreError> {
    match store.load() {
        Err(StoreError::Malformed(e)) => {
            tracing::warn!(error = %e, "discarding malformed booking");
            store.clear()?;
            Ok(None)
        }
        other => other,
    }
}
