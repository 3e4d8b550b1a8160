//! Data types produced by the aggregation pipeline.

use serde::{Deserialize, Serialize};

use crate::reading::GlucoseSlot;

/// Headline glucose means over the whole history and two trailing windows.
///
/// Means are rounded to one decimal. Deltas are taken between the rounded
/// means and rounded again, so they can differ from the rounded raw delta.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlucoseSummary {
    pub mean_all_time: Option<f64>,
    pub mean_last_30: Option<f64>,
    pub mean_last_7: Option<f64>,
    /// `mean_last_30 - mean_all_time`
    pub diff_all: Option<f64>,
    /// `mean_last_7 - mean_last_30`
    pub diff_30: Option<f64>,
    pub day_count: usize,
    /// Days times charted slots, whether or not each slot was filled in.
    pub reading_slots: usize,
    pub first_date: Option<String>,
    pub last_date: Option<String>,
}

/// One (day, time-of-day) glucose value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LongReading {
    pub date: String,
    #[serde(rename = "category")]
    pub slot: GlucoseSlot,
    pub value: f64,
}

/// A long-form value with its severity bucket attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedReading {
    pub date: String,
    #[serde(rename = "category")]
    pub slot: GlucoseSlot,
    pub value: f64,
    pub bucket: String,
    pub rank: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketCount {
    pub label: String,
    pub rank: usize,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryMean {
    #[serde(rename = "category")]
    pub slot: GlucoseSlot,
    pub mean: f64,
}

/// Time span a breakdown is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Horizon {
    All,
    Last30Days,
    Last7Days,
}

impl Horizon {
    pub fn label(self) -> &'static str {
        match self {
            Horizon::All => "All Readings",
            Horizon::Last30Days => "Last 30 days",
            Horizon::Last7Days => "Last 7 days",
        }
    }
}

/// Distribution data for one horizon: the classified long form, bucket
/// counts in severity order, and the per-category means.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HorizonBreakdown {
    pub horizon: Horizon,
    pub label: &'static str,
    pub days: usize,
    pub readings: Vec<ClassifiedReading>,
    pub bucket_counts: Vec<BucketCount>,
    pub category_means: Vec<CategoryMean>,
}
