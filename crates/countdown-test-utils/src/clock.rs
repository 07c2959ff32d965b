// SPDX-FileCopyrightText: 2026 Countdown Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A clock that only moves when told to.

use std::sync::Mutex;

use chrono::{DateTime, TimeDelta, TimeZone};
use chrono_tz::Tz;

use countdown_core::{Clock, SERVICE_TZ};

/// Clock frozen at a chosen instant in the service timezone.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Tz>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Tz>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Local wall time in the service timezone.
    ///
    /// # Panics
    ///
    /// Panics if the wall time does not exist in the zone.
    pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Self {
        let now = SERVICE_TZ
            .with_ymd_and_hms(year, month, day, hour, minute, 0)
            .single()
            .expect("valid local time");
        Self::new(now)
    }

    pub fn set(&self, now: DateTime<Tz>) {
        *self.now.lock().expect("clock lock") = now;
    }

    pub fn advance(&self, delta: TimeDelta) {
        let mut now = self.now.lock().expect("clock lock");
        *now += delta;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Tz> {
        *self.now.lock().expect("clock lock")
    }
}
