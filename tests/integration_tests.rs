use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Utc, Weekday};
use tower::ServiceExt;

use warmbook::config::AppConfig;
use warmbook::handlers;
use warmbook::models::{Availability, PersistedBooking};
use warmbook::services::notify::Notifier;
use warmbook::services::store::{BookingStore, MemoryBookingStore};
use warmbook::state::AppState;

// ── Mock Providers ──

struct RecordingNotifier {
    sent: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_confirmation(&self, booking: &PersistedBooking) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push(booking.email.clone());
        Ok(())
    }
}

// ── Helpers ──

fn build_state(
    store: MemoryBookingStore,
    availability: Availability,
) -> (Arc<AppState>, Arc<Mutex<Vec<String>>>) {
    let sent = Arc::new(Mutex::new(vec![]));
    let state = Arc::new(AppState {
        config: AppConfig::default(),
        store: Box::new(store),
        slots: Box::new(availability),
        notifier: Box::new(RecordingNotifier {
            sent: Arc::clone(&sent),
        }),
    });
    (state, sent)
}

fn test_state() -> Arc<AppState> {
    build_state(MemoryBookingStore::new(), Availability::default()).0
}

fn test_app(state: Arc<AppState>) -> Router {
    handlers::router(state)
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// A weekday at least a week out, so it stays bookable for the whole test run.
fn future_weekday() -> NaiveDate {
    let mut date = today() + Duration::days(7);
    while is_weekend(date) {
        date += Duration::days(1);
    }
    date
}

fn future_saturday() -> NaiveDate {
    let mut date = today() + Duration::days(1);
    while date.weekday() != Weekday::Sat {
        date += Duration::days(1);
    }
    date
}

fn booking_request(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/bookings")
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(res: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

async fn body_text(res: axum::response::Response) -> String {
    let body = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

fn location(res: &axum::response::Response) -> &str {
    res.headers().get("location").unwrap().to_str().unwrap()
}

async fn submit_valid(state: &Arc<AppState>, date: NaiveDate) -> StatusCode {
    let res = test_app(state.clone())
        .oneshot(booking_request(serde_json::json!({
            "date": date.to_string(),
            "time": "10:00 AM",
            "name": "Alex",
            "email": "alex@example.com",
        })))
        .await
        .unwrap();
    res.status()
}

// ── Pages ──

#[tokio::test]
async fn test_health() {
    let res = test_app(test_state()).oneshot(get("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_text(res).await, "ok");
}

#[tokio::test]
async fn test_landing_and_booking_pages() {
    let state = test_state();
    for uri in ["/", "/book"] {
        let res = test_app(state.clone()).oneshot(get(uri)).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK, "{uri}");
        assert!(res
            .headers()
            .get("content-type")
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("text/html"));
    }
}

#[tokio::test]
async fn test_confirmation_without_booking_redirects_to_start() {
    let res = test_app(test_state())
        .oneshot(get("/confirmation"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/");
}

#[tokio::test]
async fn test_confirmation_with_malformed_booking_clears_and_redirects() {
    let (state, _) = build_state(
        MemoryBookingStore::with_raw("{\"date\": 12"),
        Availability::default(),
    );

    let res = test_app(state.clone())
        .oneshot(get("/confirmation"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/");
    assert!(state.store.load().unwrap().is_none());
}

// ── Booking Submission ──

#[tokio::test]
async fn test_submit_booking_round_trip() {
    let (state, sent) = build_state(MemoryBookingStore::new(), Availability::default());
    let date = future_weekday();

    let res = test_app(state.clone())
        .oneshot(booking_request(serde_json::json!({
            "date": date.to_string(),
            "time": "10:00 AM",
            "name": "Alex",
            "email": "alex@example.com",
        })))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::CREATED);
    let json = body_json(res).await;
    assert_eq!(json["redirect"], "/confirmation");
    assert_eq!(json["booking"]["date"], format!("{date}T00:00:00Z"));

    let stored = state.store.load().unwrap().unwrap();
    assert_eq!(stored.calendar_date(), date);
    assert_eq!(stored.time, "10:00 AM");
    assert_eq!(stored.name, "Alex");
    assert_eq!(stored.email, "alex@example.com");
    assert_eq!(stored.message, "");

    assert_eq!(*sent.lock().unwrap(), vec!["alex@example.com".to_string()]);

    // Confirmation page shows the stored fields
    let res = test_app(state).oneshot(get("/confirmation")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let html = body_text(res).await;
    assert!(html.contains(&date.format("%A, %B %-d, %Y").to_string()));
    assert!(html.contains("10:00 AM"));
    assert!(html.contains("Alex"));
    assert!(html.contains("alex@example.com"));
}

#[tokio::test]
async fn test_submit_overwrites_previous_booking() {
    let state = test_state();
    assert_eq!(submit_valid(&state, future_weekday()).await, StatusCode::CREATED);

    let later = future_weekday() + Duration::days(7);
    let res = test_app(state.clone())
        .oneshot(booking_request(serde_json::json!({
            "date": later.to_string(),
            "time": "2:00 PM",
            "name": "Sam",
            "email": "sam@example.com",
            "message": "Second visit",
        })))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let stored = state.store.load().unwrap().unwrap();
    assert_eq!(stored.name, "Sam");
    assert_eq!(stored.message, "Second visit");
    assert_eq!(stored.calendar_date(), later);
}

#[tokio::test]
async fn test_incomplete_submissions_leave_store_unchanged() {
    let (state, sent) = build_state(MemoryBookingStore::new(), Availability::default());
    let date = future_weekday().to_string();

    let cases = [
        serde_json::json!({ "time": "10:00 AM", "name": "Alex", "email": "alex@example.com" }),
        serde_json::json!({ "date": date, "name": "Alex", "email": "alex@example.com" }),
        serde_json::json!({ "date": date, "time": "10:00 AM", "email": "alex@example.com" }),
        serde_json::json!({ "date": date, "time": "10:00 AM", "name": "Alex", "email": "" }),
    ];

    for case in cases {
        let res = test_app(state.clone())
            .oneshot(booking_request(case.clone()))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY, "{case}");
        let json = body_json(res).await;
        assert!(json["error"]
            .as_str()
            .unwrap()
            .starts_with("missing required fields"));
        assert!(state.store.load().unwrap().is_none());
    }

    assert!(sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_submission_keeps_existing_booking() {
    let state = test_state();
    assert_eq!(submit_valid(&state, future_weekday()).await, StatusCode::CREATED);
    let before = state.store.load().unwrap();

    let res = test_app(state.clone())
        .oneshot(booking_request(serde_json::json!({
            "date": future_weekday().to_string(),
            "time": "10:00 AM",
            "name": "",
            "email": "other@example.com",
        })))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(state.store.load().unwrap(), before);
}

#[tokio::test]
async fn test_past_and_weekend_dates_rejected() {
    let state = test_state();
    for date in [today() - Duration::days(1), future_saturday()] {
        let res = test_app(state.clone())
            .oneshot(booking_request(serde_json::json!({
                "date": date.to_string(),
                "time": "10:00 AM",
                "name": "Alex",
                "email": "alex@example.com",
            })))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY, "{date}");
    }
    assert!(state.store.load().unwrap().is_none());
}

#[tokio::test]
async fn test_unavailable_or_unknown_slot_rejected() {
    let availability = Availability::from_json(
        r#"{"slots":[{"label":"9:00 AM"},{"label":"10:00 AM","available":false}]}"#,
    )
    .unwrap();
    let (state, _) = build_state(MemoryBookingStore::new(), availability);

    for time in ["10:00 AM", "6:00 PM"] {
        let res = test_app(state.clone())
            .oneshot(booking_request(serde_json::json!({
                "date": future_weekday().to_string(),
                "time": time,
                "name": "Alex",
                "email": "alex@example.com",
            })))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY, "{time}");
    }
    assert!(state.store.load().unwrap().is_none());
}

#[tokio::test]
async fn test_start_new_booking_clears_store() {
    let state = test_state();
    assert_eq!(submit_valid(&state, future_weekday()).await, StatusCode::CREATED);

    let res = test_app(state.clone())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/book/new")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/book");
    assert!(state.store.load().unwrap().is_none());

    let res = test_app(state).oneshot(get("/confirmation")).await.unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
}

// ── Calendar .ics Tests ──

#[tokio::test]
async fn test_invite_without_booking_redirects() {
    let res = test_app(test_state())
        .oneshot(get("/confirmation/invite.ics"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/");
}

#[tokio::test]
async fn test_invite_download() {
    let state = test_state();
    let date = future_weekday();
    assert_eq!(submit_valid(&state, date).await, StatusCode::CREATED);

    let res = test_app(state)
        .oneshot(get("/confirmation/invite.ics"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers().get("content-type").unwrap(),
        "text/calendar; charset=utf-8"
    );
    assert_eq!(
        res.headers().get("content-disposition").unwrap(),
        "attachment; filename=\"warmbook-appointment.ics\""
    );

    let text = body_text(res).await;
    assert!(text.contains("BEGIN:VCALENDAR"));
    assert!(text.contains("SUMMARY:Appointment with WarmBook"));
    assert!(text.contains("DESCRIPTION:Your appointment has been confirmed."));
    assert!(text.contains("LOCATION:Online"));

    let field = |name: &str| {
        let value = text
            .lines()
            .find_map(|l| l.strip_prefix(&format!("{name}:")))
            .unwrap();
        NaiveDateTime::parse_from_str(value.trim_end(), "%Y%m%dT%H%M%SZ").unwrap()
    };
    let start = field("DTSTART");
    let end = field("DTEND");
    assert_eq!(start.date(), date);
    assert_eq!(start.format("%H:%M").to_string(), "10:00");
    assert_eq!((end - start).num_seconds(), 3600);
}

// ── Calendar & Slot API ──

#[tokio::test]
async fn test_calendar_month_view_defaults_to_today() {
    let res = test_app(test_state())
        .oneshot(get("/api/calendar"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let json = body_json(res).await;
    assert_eq!(json["view"], "month");

    let today = today();
    let days = json["days"].as_array().unwrap();
    assert_eq!(days.len() % 7, 0);
    assert_eq!(days.iter().filter(|d| d["today"] == true).count(), 1);

    for day in days {
        let date = NaiveDate::parse_from_str(day["date"].as_str().unwrap(), "%Y-%m-%d").unwrap();
        let expected = date >= today && !is_weekend(date);
        assert_eq!(day["selectable"], expected, "{date}");
    }
}

#[tokio::test]
async fn test_calendar_paging_never_unlocks_past_or_weekends() {
    let state = test_state();
    let mut anchor = (today() - Duration::days(365)).to_string();

    for _ in 0..3 {
        let res = test_app(state.clone())
            .oneshot(get(&format!("/api/calendar?view=month&anchor={anchor}")))
            .await
            .unwrap();
        let json = body_json(res).await;
        assert!(json["days"]
            .as_array()
            .unwrap()
            .iter()
            .all(|d| d["selectable"] == false));
        anchor = json["next"].as_str().unwrap().to_string();
    }
}

#[tokio::test]
async fn test_calendar_week_view() {
    let anchor = future_weekday();
    let res = test_app(test_state())
        .oneshot(get(&format!("/api/calendar?view=week&anchor={anchor}")))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let json = body_json(res).await;
    assert_eq!(json["view"], "week");

    let days = json["days"].as_array().unwrap();
    assert_eq!(days.len(), 7);
    let selectable = days.iter().filter(|d| d["selectable"] == true).count();
    assert_eq!(selectable, 5);

    let start = NaiveDate::parse_from_str(json["anchor"].as_str().unwrap(), "%Y-%m-%d").unwrap();
    assert_eq!(start.weekday(), Weekday::Sun);
    assert_eq!(json["next"], (start + Duration::days(7)).to_string());
    assert_eq!(json["previous"], (start - Duration::days(7)).to_string());
}

#[tokio::test]
async fn test_calendar_week_at_last_representable_date() {
    let anchor = NaiveDate::MAX.to_string().replace('+', "%2B");
    let res = test_app(test_state())
        .oneshot(get(&format!("/api/calendar?view=week&anchor={anchor}")))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let json = body_json(res).await;
    assert_eq!(json["next"], json["anchor"]);
    let days = json["days"].as_array().unwrap();
    assert_eq!(days.last().unwrap()["date"], NaiveDate::MAX.to_string());
}

#[tokio::test]
async fn test_calendar_bad_anchor() {
    let res = test_app(test_state())
        .oneshot(get("/api/calendar?anchor=next-tuesday"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_slots_for_weekday() {
    let res = test_app(test_state())
        .oneshot(get(&format!("/api/slots?date={}", future_weekday())))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let json = body_json(res).await;
    let labels: Vec<&str> = json["slots"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["label"].as_str().unwrap())
        .collect();
    assert_eq!(
        labels,
        vec!["9:00 AM", "10:00 AM", "11:00 AM", "2:00 PM", "3:00 PM", "4:00 PM"]
    );
}

#[tokio::test]
async fn test_slots_for_closed_day() {
    let res = test_app(test_state())
        .oneshot(get(&format!("/api/slots?date={}", future_saturday())))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
