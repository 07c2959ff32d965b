// SPDX-FileCopyrightText: 2026 Countdown Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Picker button payloads.
//!
//! Every inline button carries a colon-delimited payload with the `cal:`
//! prefix. Payloads are parsed once into [`CalendarAction`] at the
//! transport boundary:
//!
//! ```text
//! cal:ignore
//! cal:cancel
//! cal:prev:<year>:<month>
//! cal:next:<year>:<month>
//! cal:day:<YYYY-MM-DD>
//! cal:hour:<YYYY-MM-DD>:<hour 0-23>
//! cal:min:<YYYY-MM-DD>:<hour>:<minute 0|5|...|55>
//! cal:back_to_cal
//! cal:back_to_hours:<YYYY-MM-DD>
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate};
use countdown_core::CountdownError;

const PREFIX: &str = "cal";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Minute granularity of the minute picker.
pub const MINUTE_STEP: u32 = 5;

/// A calendar month. Ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    first: NaiveDate,
}

impl YearMonth {
    /// Returns `None` when `month` is outside 1..=12 or the year is out of range.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first| Self { first })
    }

    /// The month containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            first: date.with_day(1).unwrap_or(date),
        }
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn days(&self) -> u32 {
        self.first
            .checked_add_months(Months::new(1))
            .map(|next| (next - self.first).num_days() as u32)
            .unwrap_or(31)
    }

    pub fn prev(&self) -> Option<Self> {
        self.first
            .checked_sub_months(Months::new(1))
            .map(|first| Self { first })
    }

    pub fn next(&self) -> Option<Self> {
        self.first
            .checked_add_months(Months::new(1))
            .map(|first| Self { first })
    }

    /// Iterates over every date of the month.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.first.iter_days().take(self.days() as usize)
    }
}

/// A decoded picker button press.
///
/// `PrevMonth` and `NextMonth` carry the month that was on screen when the
/// button was rendered; the handler computes the adjacent month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarAction {
    Ignore,
    Cancel,
    PrevMonth(YearMonth),
    NextMonth(YearMonth),
    Day(NaiveDate),
    Hour {
        date: NaiveDate,
        hour: u32,
    },
    Minute {
        date: NaiveDate,
        hour: u32,
        minute: u32,
    },
    BackToCalendar,
    BackToHours(NaiveDate),
}

impl CalendarAction {
    /// Encodes the action as a button payload.
    pub fn encode(&self) -> String {
        self.to_string()
    }

    /// Stable label for metrics and logs.
    pub fn label(&self) -> &'static str {
        match self {
            CalendarAction::Ignore => "ignore",
            CalendarAction::Cancel => "cancel",
            CalendarAction::PrevMonth(_) => "prev",
            CalendarAction::NextMonth(_) => "next",
            CalendarAction::Day(_) => "day",
            CalendarAction::Hour { .. } => "hour",
            CalendarAction::Minute { .. } => "min",
            CalendarAction::BackToCalendar => "back_to_cal",
            CalendarAction::BackToHours(_) => "back_to_hours",
        }
    }
}

impl fmt::Display for CalendarAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = self.label();
        match self {
            CalendarAction::Ignore | CalendarAction::Cancel | CalendarAction::BackToCalendar => {
                write!(f, "{PREFIX}:{label}")
            }
            CalendarAction::PrevMonth(ym) | CalendarAction::NextMonth(ym) => {
                write!(f, "{PREFIX}:{label}:{}:{}", ym.year(), ym.month())
            }
            CalendarAction::Day(date) | CalendarAction::BackToHours(date) => {
                write!(f, "{PREFIX}:{label}:{}", date.format(DATE_FORMAT))
            }
            CalendarAction::Hour { date, hour } => {
                write!(f, "{PREFIX}:{label}:{}:{hour}", date.format(DATE_FORMAT))
            }
            CalendarAction::Minute { date, hour, minute } => write!(
                f,
                "{PREFIX}:{label}:{}:{hour}:{minute}",
                date.format(DATE_FORMAT)
            ),
        }
    }
}

impl FromStr for CalendarAction {
    type Err = CountdownError;

    fn from_str(payload: &str) -> Result<Self, Self::Err> {
        let invalid = || CountdownError::InvalidPayload(payload.to_string());

        let mut parts = payload.split(':');
        if parts.next() != Some(PREFIX) {
            return Err(invalid());
        }
        let parts: Vec<&str> = parts.collect();

        let action = match parts.as_slice() {
            ["ignore"] => CalendarAction::Ignore,
            ["cancel"] => CalendarAction::Cancel,
            ["back_to_cal"] => CalendarAction::BackToCalendar,
            ["prev", year, month] => CalendarAction::PrevMonth(parse_month(year, month).ok_or_else(invalid)?),
            ["next", year, month] => CalendarAction::NextMonth(parse_month(year, month).ok_or_else(invalid)?),
            ["day", date] => CalendarAction::Day(parse_date(date).ok_or_else(invalid)?),
            ["back_to_hours", date] => {
                CalendarAction::BackToHours(parse_date(date).ok_or_else(invalid)?)
            }
            ["hour", date, hour] => CalendarAction::Hour {
                date: parse_date(date).ok_or_else(invalid)?,
                hour: parse_hour(hour).ok_or_else(invalid)?,
            },
            ["min", date, hour, minute] => CalendarAction::Minute {
                date: parse_date(date).ok_or_else(invalid)?,
                hour: parse_hour(hour).ok_or_else(invalid)?,
                minute: parse_minute(minute).ok_or_else(invalid)?,
            },
            _ => return Err(invalid()),
        };
        Ok(action)
    }
}

fn parse_month(year: &str, month: &str) -> Option<YearMonth> {
    YearMonth::new(year.parse().ok()?, month.parse().ok()?)
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, DATE_FORMAT).ok()
}

fn parse_hour(text: &str) -> Option<u32> {
    text.parse().ok().filter(|h| *h < 24)
}

fn parse_minute(text: &str) -> Option<u32> {
    text.parse()
        .ok()
        .filter(|m| *m < 60 && *m % MINUTE_STEP == 0)
}
