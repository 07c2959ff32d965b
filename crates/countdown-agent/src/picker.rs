// SPDX-FileCopyrightText: 2026 Countdown Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inline keyboards for the three picker steps.
//!
//! All builders are pure: `today` is passed in, so identical input always
//! yields an identical keyboard.

use chrono::{Datelike, NaiveDate};
use countdown_core::{Button, Keyboard};

use crate::callback::{CalendarAction, MINUTE_STEP, YearMonth};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const WEEKDAYS: [&str; 7] = ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"];

const HOURS_PER_ROW: u32 = 6;
const MINUTES_PER_ROW: u32 = 6;

fn inert(text: impl Into<String>) -> Button {
    Button::new(text, CalendarAction::Ignore.encode())
}

fn action(text: impl Into<String>, action: CalendarAction) -> Button {
    Button::new(text, action.encode())
}

fn cancel_button() -> Button {
    action("❌ Cancel", CalendarAction::Cancel)
}

/// Renders the month grid for `shown`.
///
/// Layout: navigation header, Monday-first weekday row, one row per week,
/// cancel row. "Previous" is inert unless `shown` is after the month of
/// `today`, and days before `today` are rendered as inert `·D` cells.
pub fn build_calendar(shown: YearMonth, today: NaiveDate) -> Keyboard {
    let mut rows = Vec::new();

    let prev = if shown > YearMonth::of(today) {
        action("◀", CalendarAction::PrevMonth(shown))
    } else {
        inert(" ")
    };
    let title = format!("{} {}", MONTH_NAMES[shown.month() as usize - 1], shown.year());
    rows.push(vec![
        prev,
        inert(title),
        action("▶", CalendarAction::NextMonth(shown)),
    ]);

    rows.push(WEEKDAYS.iter().map(|d| inert(*d)).collect());

    let lead = shown.first_day().weekday().num_days_from_monday() as usize;
    let mut cells: Vec<Button> = (0..lead).map(|_| inert(" ")).collect();
    cells.extend(shown.dates().map(|date| {
        if date < today {
            inert(format!("·{}", date.day()))
        } else {
            action(date.day().to_string(), CalendarAction::Day(date))
        }
    }));
    while cells.len() % 7 != 0 {
        cells.push(inert(" "));
    }
    rows.extend(cells.chunks(7).map(<[Button]>::to_vec));

    rows.push(vec![cancel_button()]);
    Keyboard { rows }
}

/// Renders the 24-hour grid (4 rows of 6) for `date`.
pub fn build_hour_picker(date: NaiveDate) -> Keyboard {
    let mut rows = vec![vec![inert(format!("📅 {}", date.format("%Y-%m-%d")))]];

    for start in (0..24).step_by(HOURS_PER_ROW as usize) {
        rows.push(
            (start..start + HOURS_PER_ROW)
                .map(|hour| action(format!("{hour:02}"), CalendarAction::Hour { date, hour }))
                .collect(),
        );
    }

    rows.push(vec![
        action("◀ Back", CalendarAction::BackToCalendar),
        cancel_button(),
    ]);
    Keyboard { rows }
}

/// Renders the minute grid (2 rows of 6, five-minute steps) for `date` and `hour`.
pub fn build_minute_picker(date: NaiveDate, hour: u32) -> Keyboard {
    let mut rows = vec![vec![inert(format!(
        "📅 {} {hour:02}:__",
        date.format("%Y-%m-%d")
    ))]];

    let minutes: Vec<u32> = (0..60).step_by(MINUTE_STEP as usize).collect();
    for chunk in minutes.chunks(MINUTES_PER_ROW as usize) {
        rows.push(
            chunk
                .iter()
                .map(|&minute| {
                    action(
                        format!("{hour:02}:{minute:02}"),
                        CalendarAction::Minute { date, hour, minute },
                    )
                })
                .collect(),
        );
    }

    rows.push(vec![
        action("◀ Back", CalendarAction::BackToHours(date)),
        cancel_button(),
    ]);
    Keyboard { rows }
}
