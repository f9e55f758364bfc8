use chrono::{DateTime, Duration, Utc};

use crate::config::AppConfig;
use crate::models::PersistedBooking;

const ICS_TIMESTAMP: &str = "%Y%m%dT%H%M%SZ";

const MAX_LINE_OCTETS: usize = 75;

pub const INVITE_FILENAME: &str = "warmbook-appointment.ics";

pub fn generate_ics(booking: &PersistedBooking, config: &AppConfig, now: DateTime<Utc>) -> String {
    let start = booking.starts_at();
    let dtstart = start.format(ICS_TIMESTAMP).to_string();
    let dtend = (start + Duration::hours(1)).format(ICS_TIMESTAMP).to_string();
    let dtstamp = now.format(ICS_TIMESTAMP).to_string();
    let uid = format!("{}@{}", uuid::Uuid::new_v4(), config.business_domain);

    let prodid = escape_text(&config.business_name);
    let summary = escape_text(&format!("Appointment with {}", config.business_name));
    let description = if booking.message.is_empty() {
        "Your appointment has been confirmed.".to_string()
    } else {
        escape_text(&booking.message)
    };
    let location = escape_text(&config.event_location);

    let lines = [
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        format!("PRODID:-//{prodid}//EN"),
        "BEGIN:VEVENT".to_string(),
        format!("UID:{uid}"),
        format!("DTSTAMP:{dtstamp}"),
        format!("DTSTART:{dtstart}"),
        format!("DTEND:{dtend}"),
        format!("SUMMARY:{summary}"),
        format!("DESCRIPTION:{description}"),
        format!("LOCATION:{location}"),
        "END:VEVENT".to_string(),
        "END:VCALENDAR".to_string(),
    ];

    let mut ics = String::new();
    for line in &lines {
        ics.push_str(&fold_line(line));
        ics.push_str("\r\n");
    }
    ics
}

// RFC 5545 TEXT escaping
fn escape_text(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace(';', "\\;")
        .replace(',', "\\,")
        .replace("\r\n", "\\n")
        .replace('\r', "\\n")
        .replace('\n', "\\n")
}

/// Splits a content line into chunks of at most 75 octets. Each continuation
/// starts with a single space, which counts toward its chunk. Multi-byte
/// characters are never split.
fn fold_line(line: &str) -> String {
    let mut folded = String::with_capacity(line.len());
    let mut width = 0;
    for c in line.chars() {
        if width + c.len_utf8() > MAX_LINE_OCTETS {
            folded.push_str("\r\n ");
            width = 1;
        }
        folded.push(c);
        width += c.len_utf8();
    }
    folded
}
