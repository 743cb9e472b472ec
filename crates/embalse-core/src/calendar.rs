//! Month grid for the admin events panel, and Spanish date labels.
//!
//! Dates are stored in UTC but the organization lives at UTC−06:00, so
//! every "which day is this" question is answered at [`site_offset`].

use std::collections::BTreeSet;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Offset, Utc};

use crate::models::Event;

const SITE_OFFSET_SECS: i32 = 6 * 3600;

const MONTHS: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

const MONTHS_SHORT: [&str; 12] = [
    "ENE", "FEB", "MAR", "ABR", "MAY", "JUN", "JUL", "AGO", "SEPT", "OCT", "NOV", "DIC",
];

/// Weekday headers, starting on Sunday.
pub const WEEKDAYS: [&str; 7] = ["Do", "Lu", "Ma", "Mi", "Ju", "Vi", "Sa"];

/// The site's local offset (UTC−06:00).
#[must_use]
pub fn site_offset() -> FixedOffset {
    FixedOffset::west_opt(SITE_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

/// Calendar date of `date` at the site offset.
#[must_use]
pub fn site_date(date: DateTime<Utc>) -> NaiveDate {
    date.with_timezone(&site_offset()).date_naive()
}

/// Uppercase short month name, e.g. `MAR`.
#[must_use]
pub fn month_short(date: NaiveDate) -> &'static str {
    MONTHS_SHORT[date.month0() as usize]
}

/// Long date label, e.g. `15 mar 2026`.
#[must_use]
pub fn date_label(date: DateTime<Utc>) -> String {
    let day = site_date(date);
    format!(
        "{} {} {}",
        day.day(),
        month_short(day).to_lowercase(),
        day.year()
    )
}

/// One month of the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarMonth {
    year: i32,
    month: u32,
}

impl CalendarMonth {
    /// `month` is 1-based. Returns `None` for a month outside 1..=12.
    #[must_use]
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    /// The month that contains `date` at the site offset.
    #[must_use]
    pub fn containing(date: DateTime<Utc>) -> Self {
        let day = site_date(date);
        Self {
            year: day.year(),
            month: day.month(),
        }
    }

    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    #[must_use]
    pub const fn month(self) -> u32 {
        self.month
    }

    #[must_use]
    pub fn prev(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    #[must_use]
    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// Weekday of the 1st, with Sunday = 0.
    #[must_use]
    pub fn first_weekday(self) -> u32 {
        self.first_day()
            .map_or(0, |d| d.weekday().num_days_from_sunday())
    }

    #[must_use]
    pub fn days_in_month(self) -> u32 {
        let next = self.next();
        match (self.first_day(), next.first_day()) {
            (Some(first), Some(following)) => {
                u32::try_from((following - first).num_days()).unwrap_or(0)
            }
            _ => 0,
        }
    }

    /// Spanish label, e.g. `marzo 2026`.
    #[must_use]
    pub fn label(self) -> String {
        let idx = usize::try_from(self.month.saturating_sub(1)).unwrap_or(0);
        format!("{} {}", MONTHS[idx % 12], self.year)
    }

    /// Days of this month that have at least one event.
    #[must_use]
    pub fn event_days(self, events: &[Event]) -> BTreeSet<u32> {
        events
            .iter()
            .map(|e| site_date(e.date))
            .filter(|d| d.year() == self.year && d.month() == self.month)
            .map(|d| d.day())
            .collect()
    }
}

impl std::fmt::Display for CalendarMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl std::str::FromStr for CalendarMonth {
    type Err = String;

    /// Parse `YYYY-MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| format!("expected YYYY-MM, got '{s}'"))?;
        let year: i32 = year.parse().map_err(|_| format!("invalid year in '{s}'"))?;
        let month: u32 = month.parse().map_err(|_| format!("invalid month in '{s}'"))?;
        Self::new(year, month).ok_or_else(|| format!("month out of range in '{s}'"))
    }
}
