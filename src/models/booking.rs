use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::availability::parse_slot_label;

/// The single finalized booking kept in the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersistedBooking {
    pub date: DateTime<Utc>,
    pub time: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub message: String,
}

impl PersistedBooking {
    pub fn calendar_date(&self) -> NaiveDate {
        self.date.date_naive()
    }

    /// Start of the appointment: the booking date at the slot's clock time,
    /// or midnight when the label is not a clock time.
    pub fn starts_at(&self) -> NaiveDateTime {
        let date = self.calendar_date();
        match parse_slot_label(&self.time) {
            Ok(t) => date.and_time(t),
            Err(_) => self.date.naive_utc(),
        }
    }

    pub fn date_display(&self) -> String {
        self.date.format("%A, %B %-d, %Y").to_string()
    }
}

/// Midnight UTC of a calendar date, the form dates are persisted in.
pub fn date_to_timestamp(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}
