pub mod calendar;
pub mod notify;
pub mod scheduling;
pub mod store;
pub mod wizard;
