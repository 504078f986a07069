//! Monthly chart bucketing.
//!
//! Records are keyed by their calendar month ordinal (`year * 12 + month0`,
//! UTC), so windows that cross a year boundary or reach back exactly twelve
//! months bucket correctly.

use chrono::{DateTime, Datelike, Months, NaiveDate, TimeZone, Utc};

use crate::db::DateRange;
use crate::models::{Order, Product, User};

/// Anything with a creation timestamp.
pub trait Timestamped {
    fn created_at(&self) -> DateTime<Utc>;
}

impl Timestamped for User {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Timestamped for Product {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Timestamped for Order {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

fn month_ordinal(at: DateTime<Utc>) -> i64 {
    i64::from(at.year()) * 12 + i64::from(at.month0())
}

/// Bucket of `at` in a `window`-month series ending at `today`'s month.
///
/// `None` for records older than the window or later than `today`'s month.
pub fn bucket_index(at: DateTime<Utc>, window: usize, today: DateTime<Utc>) -> Option<usize> {
    let month_diff = month_ordinal(today) - month_ordinal(at);
    let month_diff = usize::try_from(month_diff).ok()?;
    (month_diff < window).then(|| window - month_diff - 1)
}

// == Bucketize ==
/// Accumulates `(timestamp, weight)` samples into a `window`-month series.
///
/// Index 0 is the oldest month, the last index is `today`'s month. Samples
/// outside the window are dropped.
pub fn bucketize<I>(samples: I, window: usize, today: DateTime<Utc>) -> Vec<f64>
where
    I: IntoIterator<Item = (DateTime<Utc>, f64)>,
{
    let mut buckets = vec![0.0; window];
    for (at, weight) in samples {
        if let Some(index) = bucket_index(at, window, today) {
            buckets[index] += weight;
        }
    }
    buckets
}

/// Number of records created in each month of the window.
pub fn count_by_month<R: Timestamped>(records: &[R], window: usize, today: DateTime<Utc>) -> Vec<u64> {
    let mut buckets = vec![0; window];
    for record in records {
        if let Some(index) = bucket_index(record.created_at(), window, today) {
            buckets[index] += 1;
        }
    }
    buckets
}

/// Sum of `field` over the records created in each month of the window.
pub fn sum_by_month<R, F>(records: &[R], window: usize, today: DateTime<Utc>, field: F) -> Vec<f64>
where
    R: Timestamped,
    F: Fn(&R) -> f64,
{
    bucketize(
        records.iter().map(|r| (r.created_at(), field(r))),
        window,
        today,
    )
}

// == Windows ==

fn month_start(year: i32, month: u32) -> DateTime<Utc> {
    let date = NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN);
    Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN))
}

/// First instant of `today`'s month.
pub fn start_of_month(today: DateTime<Utc>) -> DateTime<Utc> {
    month_start(today.year(), today.month())
}

/// First instant of the oldest month in a `window`-month series.
pub fn window_start(today: DateTime<Utc>, window: usize) -> DateTime<Utc> {
    let back = window.saturating_sub(1) as u32;
    start_of_month(today)
        .checked_sub_months(Months::new(back))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Everything from the start of the window up to `today`.
pub fn window_range(today: DateTime<Utc>, window: usize) -> DateRange {
    DateRange::new(window_start(today, window), today)
}

/// From the first of this month up to `today`.
pub fn this_month(today: DateTime<Utc>) -> DateRange {
    DateRange::new(start_of_month(today), today)
}

/// The whole previous calendar month.
pub fn last_month(today: DateTime<Utc>) -> DateRange {
    let this_start = start_of_month(today);
    let last_start = this_start
        .checked_sub_months(Months::new(1))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    DateRange::new(last_start, this_start - chrono::Duration::nanoseconds(1))
}
