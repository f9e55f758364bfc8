use std::sync::Mutex;

use super::{decode, encode, BookingStore, StoreError};
use crate::models::PersistedBooking;

/// Keeps the serialized booking in process memory. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryBookingStore {
    slot: Mutex<Option<String>>,
}

impl MemoryBookingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the slot with raw text, bypassing serialization.
    pub fn with_raw(text: &str) -> Self {
        Self {
            slot: Mutex::new(Some(text.to_string())),
        }
    }

    /// The stored text as written, without decoding it.
    pub fn raw(&self) -> Result<Option<String>, StoreError> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<String>>, StoreError> {
        self.slot
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }
}

impl BookingStore for MemoryBookingStore {
    fn save(&self, booking: &PersistedBooking) -> Result<(), StoreError> {
        let text = encode(booking)?;
        *self.lock()? = Some(text);
        Ok(())
    }

    fn load(&self) -> Result<Option<PersistedBooking>, StoreError> {
        match self.lock()?.as_deref() {
            Some(text) => decode(text).map(Some),
            None => Ok(None),
        }
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.lock()? = None;
        Ok(())
    }
}
