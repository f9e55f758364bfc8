use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

const DEFAULT_SLOTS: [&str; 6] = ["9:00 AM", "10:00 AM", "11:00 AM", "2:00 PM", "3:00 PM", "4:00 PM"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeSlot {
    pub label: String,
    #[serde(default = "default_available")]
    pub available: bool,
}

impl TimeSlot {
    pub fn open(label: &str) -> Self {
        Self {
            label: label.to_string(),
            available: true,
        }
    }

    /// Clock time the label names, e.g. "2:00 PM" -> 14:00.
    pub fn clock_time(&self) -> Option<NaiveTime> {
        parse_slot_label(&self.label).ok()
    }
}

fn default_available() -> bool {
    true
}

fn default_closed_days() -> Vec<String> {
    vec!["sat".to_string(), "sun".to_string()]
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Availability {
    pub slots: Vec<TimeSlot>,
    #[serde(default = "default_closed_days")]
    pub closed_days: Vec<String>,
}

impl Default for Availability {
    fn default() -> Self {
        Self {
            slots: DEFAULT_SLOTS.iter().map(|l| TimeSlot::open(l)).collect(),
            closed_days: default_closed_days(),
        }
    }
}

impl Availability {
    pub fn from_json(s: &str) -> anyhow::Result<Self> {
        let mut availability: Availability = serde_json::from_str(s)?;
        if availability.slots.is_empty() {
            return Err(anyhow::anyhow!("availability must list at least one slot"));
        }
        for (i, slot) in availability.slots.iter().enumerate() {
            parse_slot_label(&slot.label)?;
            if availability.slots[..i].iter().any(|s| s.label == slot.label) {
                return Err(anyhow::anyhow!("duplicate slot: {}", slot.label));
            }
        }
        for day in &mut availability.closed_days {
            parse_weekday(day)?;
            *day = day.to_lowercase();
        }
        Ok(availability)
    }

    pub fn is_open_on(&self, date: &NaiveDate) -> bool {
        let weekday = date.format("%a").to_string().to_lowercase();
        !self.closed_days.iter().any(|d| *d == weekday)
    }

    pub fn slot(&self, label: &str) -> Option<&TimeSlot> {
        self.slots.iter().find(|s| s.label == label)
    }

    pub fn to_human_readable(&self) -> String {
        let day_order = ["mon", "tue", "wed", "thu", "fri", "sat", "sun"];

        let open_days = day_order
            .iter()
            .filter(|d| !self.closed_days.iter().any(|c| c.as_str() == **d))
            .map(|d| capitalize(d))
            .collect::<Vec<_>>();

        let times = self
            .slots
            .iter()
            .filter(|s| s.available)
            .map(|s| s.label.as_str())
            .collect::<Vec<_>>();

        if open_days.is_empty() || times.is_empty() {
            return String::new();
        }

        format!("{}: {}", open_days.join(", "), times.join(", "))
    }
}

fn capitalize(s: &str) -> String {
    let mut c = s.chars();
    match c.next() {
        None => String::new(),
        Some(f) => f.to_uppercase().to_string() + &c.as_str().to_lowercase(),
    }
}

fn parse_weekday(s: &str) -> anyhow::Result<()> {
    match s.to_lowercase().as_str() {
        "mon" | "tue" | "wed" | "thu" | "fri" | "sat" | "sun" => Ok(()),
        _ => Err(anyhow::anyhow!("invalid weekday: {s}")),
    }
}

/// Parses a 12-hour display label such as "9:00 AM".
pub fn parse_slot_label(s: &str) -> anyhow::Result<NaiveTime> {
    NaiveTime::parse_from_str(s, "%I:%M %p").map_err(|_| anyhow::anyhow!("invalid slot time: {s}"))
}
