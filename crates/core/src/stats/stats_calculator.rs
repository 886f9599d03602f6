//! Pure aggregation over loaded engagement rows.

use chrono::{Duration, NaiveDate};
use chrono_tz::Tz;

use super::stats_model::{AgeGenderBand, DailyPoint, EngagementCounts, HourlyBucket};
use crate::customers::Gender;
use crate::engagement::{AudienceDemographic, TargetEngagement};
use crate::utils::time_utils::{reporting_date, reporting_hour};

/// Age bands of the dashboard distribution, youngest first. Ages below 30
/// fall into the first band and 60 or above into the last.
pub const AGE_BANDS: [&str; 5] = ["20s", "30s", "40s", "50s", "60s+"];

/// `part / whole`, or 0 when `whole` is 0.
pub fn rate(part: i64, whole: i64) -> f64 {
    if whole <= 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

pub fn engagement_counts(rows: &[TargetEngagement]) -> EngagementCounts {
    rows.iter().fold(EngagementCounts::default(), |mut acc, r| {
        acc.sent += r.sent_at.is_some() as i64;
        acc.read += r.read_at.is_some() as i64;
        acc.click += r.click_at.is_some() as i64;
        acc
    })
}

/// 24 buckets, each event counted in the hour of its own timestamp.
pub fn hourly_histogram(rows: &[TargetEngagement], tz: Tz) -> Vec<HourlyBucket> {
    let mut buckets: Vec<HourlyBucket> = (0..24)
        .map(|hour| HourlyBucket {
            hour,
            label: format!("{:02}:00", hour),
            sent: 0,
            read: 0,
            click: 0,
        })
        .collect();
    for row in rows {
        if let Some(at) = row.sent_at {
            buckets[reporting_hour(at, tz)].sent += 1;
        }
        if let Some(at) = row.read_at {
            buckets[reporting_hour(at, tz)].read += 1;
        }
        if let Some(at) = row.click_at {
            buckets[reporting_hour(at, tz)].click += 1;
        }
    }
    buckets
}

/// `days` daily points ending at `today`, oldest first, zero-filled.
pub fn daily_series(
    rows: &[TargetEngagement],
    today: NaiveDate,
    days: i64,
    tz: Tz,
) -> Vec<DailyPoint> {
    let start = today - Duration::days(days - 1);
    let mut points: Vec<DailyPoint> = (0..days)
        .map(|offset| DailyPoint {
            date: start + Duration::days(offset),
            sent: 0,
            read: 0,
            click: 0,
        })
        .collect();
    let slot = |date: NaiveDate| -> Option<usize> {
        let index = (date - start).num_days();
        if (0..days).contains(&index) {
            Some(index as usize)
        } else {
            None
        }
    };
    for row in rows {
        if let Some(i) = row.sent_at.and_then(|at| slot(reporting_date(at, tz))) {
            points[i].sent += 1;
        }
        if let Some(i) = row.read_at.and_then(|at| slot(reporting_date(at, tz))) {
            points[i].read += 1;
        }
        if let Some(i) = row.click_at.and_then(|at| slot(reporting_date(at, tz))) {
            points[i].click += 1;
        }
    }
    points
}

fn band_index(age: i32) -> usize {
    match age {
        a if a < 30 => 0,
        a if a < 40 => 1,
        a if a < 50 => 2,
        a if a < 60 => 3,
        _ => 4,
    }
}

/// Every band is always present, zero when empty.
pub fn age_gender_distribution(
    rows: &[AudienceDemographic],
    reference_year: i32,
) -> Vec<AgeGenderBand> {
    let mut bands: Vec<AgeGenderBand> = AGE_BANDS
        .iter()
        .map(|band| AgeGenderBand {
            band: band.to_string(),
            male: 0,
            female: 0,
        })
        .collect();
    for row in rows {
        let band = &mut bands[band_index(reference_year - row.birth_year)];
        match row.gender {
            Gender::M => band.male += 1,
            Gender::F => band.female += 1,
        }
    }
    bands
}
