use std::sync::Arc;

use axum::extract::State;
use axum::response::{Html, IntoResponse, Redirect, Response};

use crate::errors::AppError;
use crate::models::PersistedBooking;
use crate::services::store::load_or_discard;
use crate::state::AppState;

static LANDING_HTML: &str = include_str!("../web/landing.html");
static BOOKING_HTML: &str = include_str!("../web/booking.html");
static CONFIRMATION_HTML: &str = include_str!("../web/confirmation.html");

pub async fn landing_page() -> Html<&'static str> {
    Html(LANDING_HTML)
}

pub async fn booking_page() -> Html<&'static str> {
    Html(BOOKING_HTML)
}

// GET /confirmation
pub async fn confirmation_page(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    match load_or_discard(state.store.as_ref())? {
        Some(booking) => Ok(Html(render_confirmation(&booking, &state.config.business_name))
            .into_response()),
        None => {
            tracing::debug!("no stored booking, redirecting to start");
            Ok(Redirect::to("/").into_response())
        }
    }
}

// POST /book/new
pub async fn start_new_booking(State(state): State<Arc<AppState>>) -> Result<Redirect, AppError> {
    state.store.clear()?;
    Ok(Redirect::to("/book"))
}

pub fn render_confirmation(booking: &PersistedBooking, business_name: &str) -> String {
    let message = if booking.message.is_empty() {
        String::new()
    } else {
        format!(
            "<div class=\"message\"><h3>Your Message</h3><p>{}</p></div>",
            escape_html(&booking.message)
        )
    };

    CONFIRMATION_HTML
        .replace("{{business}}", &escape_html(business_name))
        .replace("{{date}}", &escape_html(&booking.date_display()))
        .replace("{{time}}", &escape_html(&booking.time))
        .replace("{{name}}", &escape_html(&booking.name))
        .replace("{{email}}", &escape_html(&booking.email))
        .replace("{{message}}", &message)
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            // keeps user text from matching template placeholders
            '{' => out.push_str("&#123;"),
            '}' => out.push_str("&#125;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::booking::date_to_timestamp;
    use chrono::NaiveDate;

    fn booking(message: &str) -> PersistedBooking {
        PersistedBooking {
            date: date_to_timestamp(NaiveDate::from_ymd_opt(2026, 10, 20).unwrap()),
            time: "10:00 AM".to_string(),
            name: "Alex <script>".to_string(),
            email: "alex@example.com".to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_render_confirmation_fields() {
        let html = render_confirmation(&booking(""), "WarmBook");
        assert!(html.contains("Tuesday, October 20, 2026"));
        assert!(html.contains("10:00 AM"));
        assert!(html.contains("Alex &lt;script&gt;"));
        assert!(html.contains("alex@example.com"));
        assert!(!html.contains("Your Message"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn test_render_confirmation_with_message() {
        let html = render_confirmation(&booking("See you \"soon\""), "WarmBook");
        assert!(html.contains("Your Message"));
        assert!(html.contains("See you &quot;soon&quot;"));
    }
}
