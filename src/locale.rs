//! Locale-style date formatting for display strings.

use chrono::{DateTime, Datelike, FixedOffset, Offset, Timelike, Utc};
use std::str::FromStr;

use crate::error::DashboardError;

/// Display locale for dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateLocale {
    #[default]
    KoKr,
    EnUs,
}

impl FromStr for DateLocale {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ko-kr" | "ko" => Ok(DateLocale::KoKr),
            "en-us" | "en" => Ok(DateLocale::EnUs),
            other => Err(DashboardError::InvalidConfig(format!(
                "unsupported DATE_LOCALE '{}'",
                other
            ))),
        }
    }
}

/// Formats timestamps the way a browser's `toLocaleDateString` /
/// `toLocaleString` would for a fixed locale and time zone.
#[derive(Debug, Clone, Copy)]
pub struct DateFormatter {
    locale: DateLocale,
    offset: FixedOffset,
}

impl Default for DateFormatter {
    fn default() -> Self {
        Self::new(DateLocale::default(), Utc.fix())
    }
}

impl DateFormatter {
    pub fn new(locale: DateLocale, offset: FixedOffset) -> Self {
        Self { locale, offset }
    }

    pub fn format_date(&self, date: &DateTime<Utc>) -> String {
        let d = date.with_timezone(&self.offset);
        match self.locale {
            DateLocale::KoKr => format!("{}. {}. {}.", d.year(), d.month(), d.day()),
            DateLocale::EnUs => format!("{}/{}/{}", d.month(), d.day(), d.year()),
        }
    }

    pub fn format_date_time(&self, date: &DateTime<Utc>) -> String {
        let d = date.with_timezone(&self.offset);
        let (pm, hour) = d.hour12();
        let clock = format!("{}:{:02}:{:02}", hour, d.minute(), d.second());
        match self.locale {
            DateLocale::KoKr => format!(
                "{} {} {}",
                self.format_date(date),
                if pm { "오후" } else { "오전" },
                clock
            ),
            DateLocale::EnUs => format!(
                "{}, {} {}",
                self.format_date(date),
                clock,
                if pm { "PM" } else { "AM" }
            ),
        }
    }

    /// Date label for history list entries: the localized date minus its
    /// final character.
    // NOTE: the dropped character looks like a locale quirk (the trailing
    // "." of ko-KR dates). Kept literally until product confirms intent.
    pub fn history_date_label(&self, date: &DateTime<Utc>) -> String {
        slice_chars(&self.format_date(date), 0, 1)
    }

    /// Chart axis label: the localized date with its first five and last
    /// characters removed (month and day for ko-KR).
    pub fn chart_date_label(&self, date: &DateTime<Utc>) -> String {
        slice_chars(&self.format_date(date), 5, 1)
    }
}

/// Keeps characters in `[skip_front, len - skip_back)`, empty when that
/// range is empty.
fn slice_chars(s: &str, skip_front: usize, skip_back: usize) -> String {
    let len = s.chars().count();
    let end = len.saturating_sub(skip_back);
    if skip_front >= end {
        return String::new();
    }
    s.chars().skip(skip_front).take(end - skip_front).collect()
}
