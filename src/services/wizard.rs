use chrono::NaiveDate;

use crate::models::{BookingDraft, ContactDetails, PersistedBooking, WizardStep};
use crate::services::scheduling::{check_date, check_slot, SelectionError, SlotProvider};
use crate::services::store::{BookingStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("{0}")]
    Selection(#[from] SelectionError),

    #[error("cannot {action} while {}", .step.as_str())]
    WrongStep {
        action: &'static str,
        step: WizardStep,
    },

    #[error("please choose a date first")]
    NoDate,

    #[error("missing required fields: {}", .0.join(", "))]
    Incomplete(Vec<&'static str>),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Date → time → details → submitted. Rejected transitions leave the wizard
/// exactly as it was.
#[derive(Debug, Clone)]
pub struct BookingWizard {
    step: WizardStep,
    draft: BookingDraft,
}

impl Default for BookingWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl BookingWizard {
    pub fn new() -> Self {
        Self {
            step: WizardStep::SelectingDate,
            draft: BookingDraft::default(),
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    fn ensure_open(&self, action: &'static str) -> Result<(), WizardError> {
        if self.step == WizardStep::Submitted {
            return Err(WizardError::WrongStep {
                action,
                step: self.step,
            });
        }
        Ok(())
    }

    /// Picking a date always drops the previously chosen time.
    pub fn select_date(
        &mut self,
        date: NaiveDate,
        today: NaiveDate,
        slots: &dyn SlotProvider,
    ) -> Result<(), WizardError> {
        self.ensure_open("select a date")?;
        check_date(date, today, slots)?;

        self.draft.selected_date = Some(date);
        self.draft.selected_time = None;
        self.step = WizardStep::SelectingTime;
        Ok(())
    }

    pub fn select_time(&mut self, label: &str, slots: &dyn SlotProvider) -> Result<(), WizardError> {
        match self.step {
            WizardStep::SelectingTime | WizardStep::EnteringDetails => {}
            step => {
                return Err(WizardError::WrongStep {
                    action: "select a time",
                    step,
                })
            }
        }
        let date = self.draft.selected_date.ok_or(WizardError::NoDate)?;
        check_slot(date, label, slots)?;

        self.draft.selected_time = Some(label.to_string());
        self.step = WizardStep::EnteringDetails;
        Ok(())
    }

    pub fn back_to_date(&mut self) -> Result<(), WizardError> {
        match self.step {
            WizardStep::SelectingTime | WizardStep::EnteringDetails => {
                self.step = WizardStep::SelectingDate;
                Ok(())
            }
            step => Err(WizardError::WrongStep {
                action: "go back",
                step,
            }),
        }
    }

    pub fn update_contact(&mut self, contact: ContactDetails) -> Result<(), WizardError> {
        self.ensure_open("edit contact details")?;
        self.draft.contact = contact;
        Ok(())
    }

    /// Whether the submit control should be enabled.
    pub fn can_submit(&self) -> bool {
        self.step == WizardStep::EnteringDetails && self.draft.is_submittable()
    }

    pub fn submit(&mut self, store: &dyn BookingStore) -> Result<PersistedBooking, WizardError> {
        let Some(booking) = self.draft.to_persisted() else {
            return Err(WizardError::Incomplete(self.draft.missing_fields()));
        };
        if self.step != WizardStep::EnteringDetails {
            return Err(WizardError::WrongStep {
                action: "submit",
                step: self.step,
            });
        }

        store.save(&booking)?;
        self.step = WizardStep::Submitted;

        tracing::info!(
            date = %booking.calendar_date(),
            time = %booking.time,
            "booking submitted"
        );

        Ok(booking)
    }

    /// Starts over with an empty draft.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
