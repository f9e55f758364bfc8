pub mod availability;
pub mod booking;
pub mod draft;

pub use availability::{Availability, TimeSlot};
pub use booking::PersistedBooking;
pub use draft::{BookingDraft, ContactDetails, WizardStep};
