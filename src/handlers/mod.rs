pub mod booking;
pub mod calendar;
pub mod health;
pub mod pages;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(pages::landing_page))
        .route("/book", get(pages::booking_page))
        .route("/book/new", post(pages::start_new_booking))
        .route("/confirmation", get(pages::confirmation_page))
        .route("/confirmation/invite.ics", get(calendar::download_invite))
        .route("/api/calendar", get(booking::calendar_grid))
        .route("/api/slots", get(booking::list_slots))
        .route("/api/bookings", post(booking::submit_booking))
        .route("/health", get(health::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
