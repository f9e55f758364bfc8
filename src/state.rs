use crate::config::AppConfig;
use crate::services::notify::Notifier;
use crate::services::scheduling::SlotProvider;
use crate::services::store::BookingStore;

pub struct AppState {
    pub config: AppConfig,
    pub store: Box<dyn BookingStore>,
    pub slots: Box<dyn SlotProvider>,
    pub notifier: Box<dyn Notifier>,
}
