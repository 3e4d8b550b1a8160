//! Output formatting and persistence for dashboard data.
//!
//! Supports pretty-printing, JSON serialization, and CSV export.

use anyhow::{Context, Result};
use csv::WriterBuilder;
use serde::Serialize;
use std::fmt::Debug;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

use crate::aggregate::ClassifiedReading;
use crate::reading::Reading;

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty(value: &impl Debug) {
    debug!("{:#?}", value);
}

/// Prints a value to stdout as pretty-printed JSON.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Writes a value as pretty-printed JSON, replacing any existing file.
pub fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(file, value)?;
    info!(path = %path.display(), "JSON written");
    Ok(())
}

/// Flat CSV shape of a [`Reading`]; unconverted cells keep their source text.
#[derive(Debug, Serialize)]
struct ReadingRow {
    date: String,
    weight: String,
    morning: String,
    post_breakfast: String,
    lunch: String,
    post_lunch: String,
    dinner: String,
    bedtime: String,
    insulin_am: String,
    insulin_pm: String,
    sleep: String,
    rolling_weight_7: Option<f64>,
}

impl From<&Reading> for ReadingRow {
    fn from(r: &Reading) -> Self {
        ReadingRow {
            date: r.date.clone(),
            weight: r.weight.to_string(),
            morning: r.morning.to_string(),
            post_breakfast: r.post_breakfast.to_string(),
            lunch: r.lunch.to_string(),
            post_lunch: r.post_lunch.to_string(),
            dinner: r.dinner.to_string(),
            bedtime: r.bedtime.to_string(),
            insulin_am: r.insulin_am.to_string(),
            insulin_pm: r.insulin_pm.to_string(),
            sleep: r.sleep.to_string(),
            rolling_weight_7: r.rolling_weight_7,
        }
    }
}

fn write_rows<T: Serialize>(path: &Path, rows: impl IntoIterator<Item = T>) -> Result<usize> {
    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);

    let mut count = 0;
    for row in rows {
        writer.serialize(row)?;
        count += 1;
    }
    writer.flush()?;

    debug!(path = %path.display(), rows = count, "CSV written");
    Ok(count)
}

/// Writes the cleaned table as CSV, one row per day.
pub fn write_readings_csv(path: &Path, readings: &[Reading]) -> Result<usize> {
    write_rows(path, readings.iter().map(ReadingRow::from))
}

/// Writes the classified long form as CSV.
pub fn write_long_csv(path: &Path, classified: &[ClassifiedReading]) -> Result<usize> {
    write_rows(path, classified)
}
