use tracing::warn;

use crate::aggregate::types::GlucoseSummary;
use crate::aggregate::utility::{mean_opt, round1};
use crate::reading::{GlucoseSlot, Reading};

/// Rows in the "last 30 days" window.
pub const RECENT_WINDOW: usize = 30;
/// Rows in the "last 7 days" window.
pub const WEEK_WINDOW: usize = 7;

/// Returns the last `n` rows, or every row when there are fewer than `n`.
pub fn trailing(rows: &[Reading], n: usize) -> &[Reading] {
    &rows[rows.len().saturating_sub(n)..]
}

/// Mean of the per-slot means across the charted slots.
///
/// Each slot is averaged over its typed values first; slots with no typed
/// value are left out. Returns `None` when no slot has a value.
pub fn window_mean(rows: &[Reading]) -> Option<f64> {
    let slot_means: Vec<f64> = GlucoseSlot::CHARTED
        .iter()
        .filter_map(|slot| {
            let values: Vec<f64> = rows.iter().filter_map(|r| r.glucose(*slot)).collect();
            mean_opt(&values)
        })
        .collect();

    mean_opt(&slot_means)
}

/// `later - earlier`, rounded. Inputs are expected to be rounded already.
pub fn delta(later: Option<f64>, earlier: Option<f64>) -> Option<f64> {
    Some(round1(later? - earlier?))
}

impl GlucoseSummary {
    pub fn from_readings(rows: &[Reading]) -> Self {
        let mean_all_time = window_mean(rows).map(round1);
        let mean_last_30 = window_mean(trailing(rows, RECENT_WINDOW)).map(round1);
        let mean_last_7 = window_mean(trailing(rows, WEEK_WINDOW)).map(round1);

        if mean_all_time.is_none() {
            warn!(days = rows.len(), "No glucose values to summarize");
        }

        GlucoseSummary {
            mean_all_time,
            mean_last_30,
            mean_last_7,
            diff_all: delta(mean_last_30, mean_all_time),
            diff_30: delta(mean_last_7, mean_last_30),
            day_count: rows.len(),
            reading_slots: rows.len() * GlucoseSlot::CHARTED.len(),
            first_date: rows.first().map(|r| r.date.clone()),
            last_date: rows.last().map(|r| r.date.clone()),
        }
    }
}
