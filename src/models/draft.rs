use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::booking::{date_to_timestamp, PersistedBooking};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    SelectingDate,
    SelectingTime,
    EnteringDetails,
    Submitted,
}

impl WizardStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            WizardStep::SelectingDate => "selecting_date",
            WizardStep::SelectingTime => "selecting_time",
            WizardStep::EnteringDetails => "entering_details",
            WizardStep::Submitted => "submitted",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ContactDetails {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub message: String,
}

impl ContactDetails {
    /// Required fields that are still empty. Values are not trimmed.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = vec![];
        if self.name.is_empty() {
            missing.push("name");
        }
        if self.email.is_empty() {
            missing.push("email");
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BookingDraft {
    pub selected_date: Option<NaiveDate>,
    pub selected_time: Option<String>,
    pub contact: ContactDetails,
}

impl BookingDraft {
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = vec![];
        if self.selected_date.is_none() {
            missing.push("date");
        }
        if self.selected_time.as_deref().map_or(true, str::is_empty) {
            missing.push("time");
        }
        missing.extend(self.contact.missing_fields());
        missing
    }

    pub fn is_submittable(&self) -> bool {
        self.missing_fields().is_empty()
    }

    pub fn to_persisted(&self) -> Option<PersistedBooking> {
        if !self.is_submittable() {
            return None;
        }
        Some(PersistedBooking {
            date: date_to_timestamp(self.selected_date?),
            time: self.selected_time.clone()?,
            name: self.contact.name.clone(),
            email: self.contact.email.clone(),
            message: self.contact.message.clone(),
        })
    }
}
