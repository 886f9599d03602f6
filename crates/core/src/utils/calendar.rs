use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use chrono_tz::Tz;

use super::clock::{Clock, SystemClock};
use super::time_utils::{reporting_date, reporting_year, DEFAULT_REPORTING_TZ};

/// Clock plus the timezone used for statistics buckets and age evaluation.
#[derive(Clone)]
pub struct ReportingCalendar {
    clock: Arc<dyn Clock>,
    tz: Tz,
    pinned_reference_year: Option<i32>,
}

impl ReportingCalendar {
    pub fn new(clock: Arc<dyn Clock>, tz: Tz, pinned_reference_year: Option<i32>) -> Self {
        Self {
            clock,
            tz,
            pinned_reference_year,
        }
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    pub fn tz(&self) -> Tz {
        self.tz
    }

    pub fn today(&self) -> NaiveDate {
        reporting_date(self.now(), self.tz)
    }

    /// Year that customer ages are computed against.
    pub fn reference_year(&self) -> i32 {
        self.pinned_reference_year
            .unwrap_or_else(|| reporting_year(self.now(), self.tz))
    }
}

impl Default for ReportingCalendar {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock), DEFAULT_REPORTING_TZ, None)
    }
}

impl std::fmt::Debug for ReportingCalendar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportingCalendar")
            .field("tz", &self.tz)
            .field("pinned_reference_year", &self.pinned_reference_year)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::FixedClock;

    #[test]
    fn reference_year_follows_clock_unless_pinned() {
        let now = NaiveDate::from_ymd_opt(2026, 6, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let clock = Arc::new(FixedClock::new(now));
        let live = ReportingCalendar::new(clock.clone(), DEFAULT_REPORTING_TZ, None);
        assert_eq!(live.reference_year(), 2026);

        let pinned = ReportingCalendar::new(clock, DEFAULT_REPORTING_TZ, Some(2024));
        assert_eq!(pinned.reference_year(), 2024);
    }
}
