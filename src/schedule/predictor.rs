use crate::state::Timestamp;

/// Estimates the next update time from an ascending update history
///
/// The estimate is the last known update plus the mean interval between
/// consecutive updates. At least two points are needed to form an interval,
/// so shorter histories return `None` and the caller must fall back to a
/// conservative fixed interval.
///
/// # Example
///
/// ```
/// use freshrank::schedule::predict_next_update;
///
/// assert_eq!(predict_next_update(&[100.0, 130.0, 160.0]), Some(190.0));
/// assert_eq!(predict_next_update(&[100.0]), None);
/// ```
pub fn predict_next_update(history: &[Timestamp]) -> Option<Timestamp> {
    if history.len() < 2 {
        return None;
    }

    let intervals = history.windows(2).map(|pair| pair[1] - pair[0]);
    let mean_interval = intervals.sum::<f64>() / (history.len() - 1) as f64;

    history.last().map(|last| last + mean_interval)
}
