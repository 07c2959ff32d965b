// SPDX-FileCopyrightText: 2026 Countdown Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wall-clock access in the service timezone.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::datetime::SERVICE_TZ;

/// Source of "now". Injected so calendar floors and lazy status flips are testable.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> DateTime<Tz>;

    /// Today's date in the service timezone.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// The real system clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Tz> {
        Utc::now().with_timezone(&SERVICE_TZ)
    }
}
