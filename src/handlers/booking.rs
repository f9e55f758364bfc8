use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{ContactDetails, PersistedBooking, TimeSlot};
use crate::services::scheduling::{
    check_date, CalendarDay, CalendarView, SlotProvider, ViewGranularity,
};
use crate::services::wizard::BookingWizard;
use crate::state::AppState;

fn parse_date(s: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest(format!("invalid date: {s}")))
}

// GET /api/calendar
#[derive(Deserialize)]
pub struct CalendarQuery {
    pub view: Option<ViewGranularity>,
    pub anchor: Option<String>,
}

#[derive(Serialize)]
pub struct CalendarResponse {
    view: ViewGranularity,
    title: String,
    anchor: NaiveDate,
    previous: NaiveDate,
    next: NaiveDate,
    days: Vec<CalendarDay>,
}

pub async fn calendar_grid(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<CalendarResponse>, AppError> {
    let today = Utc::now().date_naive();
    let anchor = match query.anchor.as_deref() {
        Some(s) => parse_date(s)?,
        None => today,
    };
    let view = CalendarView::new(query.view.unwrap_or_default(), anchor);

    Ok(Json(CalendarResponse {
        view: view.granularity(),
        title: view.title(),
        anchor: view.first_day(),
        previous: view.previous().first_day(),
        next: view.next().first_day(),
        days: view.days(today, state.slots.as_ref()),
    }))
}

// GET /api/slots
#[derive(Deserialize)]
pub struct SlotsQuery {
    pub date: String,
}

#[derive(Serialize)]
pub struct SlotsResponse {
    date: NaiveDate,
    slots: Vec<TimeSlot>,
}

pub async fn list_slots(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<SlotsResponse>, AppError> {
    let date = parse_date(&query.date)?;
    check_date(date, Utc::now().date_naive(), state.slots.as_ref())
        .map_err(|e| AppError::Validation(e.to_string()))?;

    Ok(Json(SlotsResponse {
        date,
        slots: state.slots.slots_for(date),
    }))
}

// POST /api/bookings
#[derive(Deserialize)]
pub struct BookingRequest {
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Serialize)]
pub struct BookingCreated {
    redirect: &'static str,
    booking: PersistedBooking,
}

pub async fn submit_booking(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BookingRequest>,
) -> Result<(StatusCode, Json<BookingCreated>), AppError> {
    let today = Utc::now().date_naive();
    let slots = state.slots.as_ref();

    let mut wizard = BookingWizard::new();
    if let Some(date) = req.date {
        wizard.select_date(date, today, slots)?;
        if !req.time.is_empty() {
            wizard.select_time(&req.time, slots)?;
        }
    }
    wizard.update_contact(ContactDetails {
        name: req.name,
        email: req.email,
        message: req.message,
    })?;

    let booking = wizard.submit(state.store.as_ref()).map_err(|e| {
        tracing::warn!(error = %e, "booking rejected");
        AppError::from(e)
    })?;

    if let Err(e) = state.notifier.send_confirmation(&booking).await {
        tracing::warn!(error = %e, "failed to send booking confirmation");
    }

    Ok((
        StatusCode::CREATED,
        Json(BookingCreated {
            redirect: "/confirmation",
            booking,
        }),
    ))
}
