//! Glucose aggregation and severity classification.
//!
//! This module computes windowed means and their deltas, reshapes the
//! charted glucose columns into long form, and buckets each value with a
//! configurable [`SeverityScheme`].

pub mod breakdown;
pub mod severity;
pub mod summary;
pub mod types;
pub mod utility;

pub use severity::{Band, Bucket, SeverityScheme};
pub use types::{
    BucketCount, CategoryMean, ClassifiedReading, GlucoseSummary, Horizon, HorizonBreakdown,
    LongReading,
};
