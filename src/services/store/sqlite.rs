use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;

use super::{decode, encode, BookingStore, StoreError, BOOKING_KEY};
use crate::db::queries;
use crate::models::PersistedBooking;

/// Persists the booking slot in the `kv_store` table.
pub struct SqliteBookingStore {
    db: Arc<Mutex<Connection>>,
}

impl SqliteBookingStore {
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
        }
    }

    pub fn shared(db: Arc<Mutex<Connection>>) -> Self {
        Self { db }
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.db
            .lock()
            .map_err(|_| StoreError::Unavailable("database lock poisoned".to_string()))
    }
}

impl BookingStore for SqliteBookingStore {
    fn save(&self, booking: &PersistedBooking) -> Result<(), StoreError> {
        let text = encode(booking)?;
        let db = self.conn()?;
        queries::put_value(&db, BOOKING_KEY, &text)?;
        Ok(())
    }

    fn load(&self) -> Result<Option<PersistedBooking>, StoreError> {
        let text = {
            let db = self.conn()?;
            queries::get_value(&db, BOOKING_KEY)?
        };
        text.as_deref().map(decode).transpose()
    }

    fn clear(&self) -> Result<(), StoreError> {
        let db = self.conn()?;
        if queries::delete_value(&db, BOOKING_KEY)? {
            tracing::debug!("cleared stored booking");
        }
        Ok(())
    }
}
