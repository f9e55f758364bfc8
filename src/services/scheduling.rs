use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{Availability, TimeSlot};

/// Source of bookable days and slots. The fixed schedule implements it today;
/// a real availability backend can replace it without touching the wizard.
pub trait SlotProvider: Send + Sync {
    fn slots_for(&self, date: NaiveDate) -> Vec<TimeSlot>;
    fn is_open_on(&self, date: NaiveDate) -> bool;

    /// Human readable opening hours, used in error messages.
    fn describe(&self) -> String {
        String::new()
    }
}

impl SlotProvider for Availability {
    fn slots_for(&self, date: NaiveDate) -> Vec<TimeSlot> {
        if self.is_open_on(&date) {
            self.slots.clone()
        } else {
            vec![]
        }
    }

    fn is_open_on(&self, date: NaiveDate) -> bool {
        Availability::is_open_on(self, &date)
    }

    fn describe(&self) -> String {
        self.to_human_readable()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectionError {
    PastDate,
    ClosedDay { hours: String },
    UnknownSlot(String),
    SlotUnavailable(String),
}

impl std::fmt::Display for SelectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectionError::PastDate => write!(f, "That date has already passed."),
            SelectionError::ClosedDay { hours } if hours.is_empty() => {
                write!(f, "We're closed on that day.")
            }
            SelectionError::ClosedDay { hours } => {
                write!(f, "We're closed on that day. We're available: {hours}")
            }
            SelectionError::UnknownSlot(label) => {
                write!(f, "{label} is not one of our appointment times.")
            }
            SelectionError::SlotUnavailable(label) => {
                write!(f, "Sorry, {label} is not available. Could you pick a different time?")
            }
        }
    }
}

impl std::error::Error for SelectionError {}

pub fn check_date(
    date: NaiveDate,
    today: NaiveDate,
    slots: &dyn SlotProvider,
) -> Result<(), SelectionError> {
    if date < today {
        return Err(SelectionError::PastDate);
    }
    if !slots.is_open_on(date) {
        return Err(SelectionError::ClosedDay {
            hours: slots.describe(),
        });
    }
    Ok(())
}

pub fn is_selectable(date: NaiveDate, today: NaiveDate, slots: &dyn SlotProvider) -> bool {
    check_date(date, today, slots).is_ok()
}

pub fn check_slot(
    date: NaiveDate,
    label: &str,
    slots: &dyn SlotProvider,
) -> Result<(), SelectionError> {
    match slots.slots_for(date).into_iter().find(|s| s.label == label) {
        None => Err(SelectionError::UnknownSlot(label.to_string())),
        Some(slot) if !slot.available => Err(SelectionError::SlotUnavailable(label.to_string())),
        Some(_) => Ok(()),
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ViewGranularity {
    #[default]
    Month,
    Week,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub selectable: bool,
    pub today: bool,
    /// False for the leading/trailing days that pad a month grid to whole weeks.
    pub in_period: bool,
}

/// The page of the date grid currently on screen. Paging never touches the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarView {
    granularity: ViewGranularity,
    start: NaiveDate,
}

impl CalendarView {
    pub fn new(granularity: ViewGranularity, anchor: NaiveDate) -> Self {
        let start = match granularity {
            ViewGranularity::Month => anchor.with_day(1).unwrap_or(anchor),
            ViewGranularity::Week => week_start(anchor),
        };
        Self { granularity, start }
    }

    pub fn month(anchor: NaiveDate) -> Self {
        Self::new(ViewGranularity::Month, anchor)
    }

    pub fn week(anchor: NaiveDate) -> Self {
        Self::new(ViewGranularity::Week, anchor)
    }

    pub fn granularity(&self) -> ViewGranularity {
        self.granularity
    }

    pub fn first_day(&self) -> NaiveDate {
        self.start
    }

    pub fn last_day(&self) -> NaiveDate {
        match self.granularity {
            ViewGranularity::Month => self
                .start
                .checked_add_months(Months::new(1))
                .and_then(|d| d.pred_opt())
                .unwrap_or(NaiveDate::MAX),
            ViewGranularity::Week => self
                .start
                .checked_add_signed(Duration::days(6))
                .unwrap_or(NaiveDate::MAX),
        }
    }

    pub fn next(&self) -> Self {
        let start = match self.granularity {
            ViewGranularity::Month => self.start.checked_add_months(Months::new(1)),
            ViewGranularity::Week => self.start.checked_add_signed(Duration::days(7)),
        };
        Self {
            granularity: self.granularity,
            start: start.unwrap_or(self.start),
        }
    }

    pub fn previous(&self) -> Self {
        let start = match self.granularity {
            ViewGranularity::Month => self.start.checked_sub_months(Months::new(1)),
            ViewGranularity::Week => self.start.checked_sub_signed(Duration::days(7)),
        };
        Self {
            granularity: self.granularity,
            start: start.unwrap_or(self.start),
        }
    }

    pub fn title(&self) -> String {
        match self.granularity {
            ViewGranularity::Month => self.start.format("%B %Y").to_string(),
            ViewGranularity::Week => format!("Week of {}", self.start.format("%B %-d, %Y")),
        }
    }

    /// Grid cells for this page. Month pages are padded to whole Sunday-first weeks.
    pub fn days(&self, today: NaiveDate, slots: &dyn SlotProvider) -> Vec<CalendarDay> {
        let (first, last) = (self.first_day(), self.last_day());
        let (grid_start, grid_end) = match self.granularity {
            ViewGranularity::Month => (
                week_start(first),
                week_start(last)
                    .checked_add_signed(Duration::days(6))
                    .unwrap_or(NaiveDate::MAX),
            ),
            ViewGranularity::Week => (first, last),
        };

        // iter_days() never yields NaiveDate::MAX itself
        std::iter::successors(Some(grid_start), |d| d.succ_opt())
            .take_while(|d| *d <= grid_end)
            .map(|date| CalendarDay {
                date,
                selectable: is_selectable(date, today, slots),
                today: date == today,
                in_period: date >= first && date <= last,
            })
            .collect()
    }
}

fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_sunday() as i64;
    date.checked_sub_signed(Duration::days(offset)).unwrap_or(date)
}
