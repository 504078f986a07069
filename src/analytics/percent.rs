//! Month-over-month comparison.

/// This period as a percentage of the previous one, floored.
///
/// 100 means "same as last period", 150 means "one and a half times". A zero
/// baseline yields `current * 100` instead of dividing by zero.
pub fn percent_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return current * 100.0;
    }
    (current / previous * 100.0).floor()
}
