use crate::aggregate::severity::SeverityScheme;
use crate::aggregate::summary::{RECENT_WINDOW, WEEK_WINDOW, trailing};
use crate::aggregate::types::{
    BucketCount, CategoryMean, ClassifiedReading, Horizon, HorizonBreakdown, LongReading,
};
use crate::aggregate::utility::mean_opt;
use crate::reading::{GlucoseSlot, Reading};

impl Horizon {
    /// Number of trailing rows this horizon covers in a table of `total` rows.
    pub fn window(self, total: usize) -> usize {
        match self {
            Horizon::All => total,
            Horizon::Last30Days => RECENT_WINDOW.min(total),
            Horizon::Last7Days => WEEK_WINDOW.min(total),
        }
    }

    pub fn rows(self, rows: &[Reading]) -> &[Reading] {
        trailing(rows, self.window(rows.len()))
    }
}

/// Fans the charted glucose columns out into one row per typed value.
///
/// Output is slot-major: every morning value in date order, then lunch,
/// dinner and bedtime. Blank and unconverted cells produce no row.
pub fn long_form(rows: &[Reading]) -> Vec<LongReading> {
    GlucoseSlot::CHARTED
        .iter()
        .flat_map(|slot| {
            rows.iter().filter_map(move |r| {
                r.glucose(*slot).map(|value| LongReading {
                    date: r.date.clone(),
                    slot: *slot,
                    value,
                })
            })
        })
        .collect()
}

/// Attaches a severity bucket to every value the scheme can classify.
pub fn classify_all(long: &[LongReading], scheme: &SeverityScheme) -> Vec<ClassifiedReading> {
    long.iter()
        .filter_map(|r| {
            scheme.classify(r.value).map(|bucket| ClassifiedReading {
                date: r.date.clone(),
                slot: r.slot,
                value: r.value,
                bucket: bucket.label.to_string(),
                rank: bucket.rank,
            })
        })
        .collect()
}

/// Tallies classified values per bucket, in severity order.
///
/// Buckets with no values are omitted; the order is the scheme's band
/// order regardless of count.
pub fn bucket_counts(classified: &[ClassifiedReading], scheme: &SeverityScheme) -> Vec<BucketCount> {
    let mut counts = vec![0usize; scheme.bands().len()];
    for reading in classified {
        if let Some(count) = counts.get_mut(reading.rank) {
            *count += 1;
        }
    }

    scheme
        .labels()
        .zip(counts)
        .enumerate()
        .filter(|(_, (_, count))| *count > 0)
        .map(|(rank, (label, count))| BucketCount {
            label: label.to_string(),
            rank,
            count,
        })
        .collect()
}

/// Mean value per charted slot, in slot order. Slots with no values are omitted.
pub fn category_means(long: &[LongReading]) -> Vec<CategoryMean> {
    GlucoseSlot::CHARTED
        .iter()
        .filter_map(|slot| {
            let values: Vec<f64> = long
                .iter()
                .filter(|r| r.slot == *slot)
                .map(|r| r.value)
                .collect();
            mean_opt(&values).map(|mean| CategoryMean { slot: *slot, mean })
        })
        .collect()
}

/// Builds the distribution view for one horizon.
pub fn breakdown(rows: &[Reading], horizon: Horizon, scheme: &SeverityScheme) -> HorizonBreakdown {
    let window = horizon.rows(rows);
    let long = long_form(window);
    let classified = classify_all(&long, scheme);

    HorizonBreakdown {
        horizon,
        label: horizon.label(),
        days: window.len(),
        bucket_counts: bucket_counts(&classified, scheme),
        category_means: category_means(&long),
        readings: classified,
    }
}
