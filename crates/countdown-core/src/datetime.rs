// SPDX-FileCopyrightText: 2026 Countdown Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Date/time parsing and formatting for event dates.
//!
//! Every event date is interpreted in a single fixed zone, [`SERVICE_TZ`],
//! regardless of where the bot runs. Three input grammars are accepted and
//! tried in order, first match wins:
//!
//! 1. `YYYY-M-D H:MM` (minute is always two digits)
//! 2. `YYYY-M-D` (midnight)
//! 3. `D.M.YYYY` (legacy, midnight)
//!
//! Output is always the canonical `YYYY-MM-DD HH:MM`.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone};
use chrono_tz::Tz;
use regex::Regex;

use crate::error::CountdownError;

/// The zone all event dates live in.
pub const SERVICE_TZ: Tz = chrono_tz::Europe::Moscow;

/// `strftime` pattern of the canonical event date text.
pub const CANONICAL_FORMAT: &str = "%Y-%m-%d %H:%M";

static DATE_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2}) (\d{1,2}):(\d{2})$").expect("date-time regex")
});

static DATE_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})$").expect("date regex"));

static LEGACY_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})\.(\d{1,2})\.(\d{4})$").expect("legacy date regex"));

static EVENT_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("event name regex"));

/// Parses user-supplied date text into an instant in [`SERVICE_TZ`].
///
/// Fails with [`CountdownError::InvalidFormat`] carrying the trimmed input when
/// no grammar matches, when the matched fields name an impossible date or
/// time, or when the local time does not exist in the zone.
pub fn parse_event_date(text: &str) -> Result<DateTime<Tz>, CountdownError> {
    let raw = text.trim();
    let invalid = || CountdownError::InvalidFormat(raw.to_string());

    let naive = if let Some(caps) = DATE_TIME.captures(raw) {
        let date = date_from_parts(&caps[1], &caps[2], &caps[3]).ok_or_else(invalid)?;
        let time = time_from_parts(&caps[4], &caps[5]).ok_or_else(invalid)?;
        date.and_time(time)
    } else if let Some(caps) = DATE_ONLY.captures(raw) {
        date_from_parts(&caps[1], &caps[2], &caps[3])
            .ok_or_else(invalid)?
            .and_time(NaiveTime::MIN)
    } else if let Some(caps) = LEGACY_DATE.captures(raw) {
        date_from_parts(&caps[3], &caps[2], &caps[1])
            .ok_or_else(invalid)?
            .and_time(NaiveTime::MIN)
    } else {
        return Err(invalid());
    };

    localize(naive).ok_or_else(invalid)
}

/// Formats an instant as canonical `YYYY-MM-DD HH:MM` in [`SERVICE_TZ`].
pub fn format_event_date<Z: TimeZone>(instant: &DateTime<Z>) -> String {
    instant
        .with_timezone(&SERVICE_TZ)
        .format(CANONICAL_FORMAT)
        .to_string()
}

/// Builds the instant selected through the picker.
pub fn compose_event_date(
    date: NaiveDate,
    hour: u32,
    minute: u32,
) -> Result<DateTime<Tz>, CountdownError> {
    let time = NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| {
        CountdownError::InvalidFormat(format!("{date} {hour:02}:{minute:02}"))
    })?;
    localize(date.and_time(time))
        .ok_or_else(|| CountdownError::InvalidFormat(format!("{date} {hour:02}:{minute:02}")))
}

/// Checks that `name` is usable as a command token.
pub fn validate_event_name(name: &str) -> Result<(), CountdownError> {
    if EVENT_NAME.is_match(name) {
        Ok(())
    } else {
        Err(CountdownError::InvalidName(name.to_string()))
    }
}

/// Remaining time until an event, truncated to whole minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeLeft {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
}

impl TimeLeft {
    /// Returns `None` once `target` is not strictly after `now`.
    pub fn until<Z: TimeZone>(now: &DateTime<Z>, target: &DateTime<Z>) -> Option<Self> {
        let delta = target.clone().signed_duration_since(now.clone());
        if delta <= TimeDelta::zero() {
            return None;
        }
        let total = delta.num_minutes();
        Some(Self {
            days: total / (24 * 60),
            hours: (total / 60) % 24,
            minutes: total % 60,
        })
    }
}

impl std::fmt::Display for TimeLeft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} days, {} hours, {} minutes",
            self.days, self.hours, self.minutes
        )
    }
}

fn date_from_parts(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

fn time_from_parts(hour: &str, minute: &str) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(hour.parse().ok()?, minute.parse().ok()?, 0)
}

fn localize(naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    SERVICE_TZ.from_local_datetime(&naive).earliest()
}
