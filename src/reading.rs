//! The cleaned per-day record and its glucose columns.

use chrono::NaiveDate;
use serde::Serialize;

use crate::aggregate::utility::{mean, round1};
use crate::coerce::Field;

/// Number of trailing rows averaged into `rolling_weight_7`.
pub const ROLLING_WINDOW: usize = 7;

/// One of the six daily glucose measurement slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum GlucoseSlot {
    #[serde(rename = "Morning (07:15)")]
    Morning,
    #[serde(rename = "Post Breakfast")]
    PostBreakfast,
    #[serde(rename = "Lunch (12:50)")]
    Lunch,
    #[serde(rename = "Post Lunch")]
    PostLunch,
    #[serde(rename = "Dinner (18:30)")]
    Dinner,
    #[serde(rename = "BedTime (21:45)")]
    Bedtime,
}

impl GlucoseSlot {
    pub const ALL: [GlucoseSlot; 6] = [
        GlucoseSlot::Morning,
        GlucoseSlot::PostBreakfast,
        GlucoseSlot::Lunch,
        GlucoseSlot::PostLunch,
        GlucoseSlot::Dinner,
        GlucoseSlot::Bedtime,
    ];

    /// Slots that feed the summary means, long form and charts.
    pub const CHARTED: [GlucoseSlot; 4] = [
        GlucoseSlot::Morning,
        GlucoseSlot::Lunch,
        GlucoseSlot::Dinner,
        GlucoseSlot::Bedtime,
    ];

    /// Column header used for this slot in the tracker workbook.
    pub fn label(self) -> &'static str {
        match self {
            GlucoseSlot::Morning => "Morning (07:15)",
            GlucoseSlot::PostBreakfast => "Post Breakfast",
            GlucoseSlot::Lunch => "Lunch (12:50)",
            GlucoseSlot::PostLunch => "Post Lunch",
            GlucoseSlot::Dinner => "Dinner (18:30)",
            GlucoseSlot::Bedtime => "BedTime (21:45)",
        }
    }

    pub fn field(self, reading: &Reading) -> &Field<f64> {
        match self {
            GlucoseSlot::Morning => &reading.morning,
            GlucoseSlot::PostBreakfast => &reading.post_breakfast,
            GlucoseSlot::Lunch => &reading.lunch,
            GlucoseSlot::PostLunch => &reading.post_lunch,
            GlucoseSlot::Dinner => &reading.dinner,
            GlucoseSlot::Bedtime => &reading.bedtime,
        }
    }
}

/// One day's metrics after cleaning. Glucose values are mmol/L, weight kg.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    pub date: String,
    pub weight: Field<f64>,
    pub morning: Field<f64>,
    pub post_breakfast: Field<f64>,
    pub lunch: Field<f64>,
    pub post_lunch: Field<f64>,
    pub dinner: Field<f64>,
    pub bedtime: Field<f64>,
    pub insulin_am: Field<f64>,
    pub insulin_pm: Field<f64>,
    pub sleep: Field<i64>,
    pub rolling_weight_7: Option<f64>,
}

impl Reading {
    /// An otherwise blank reading for `date`.
    pub fn new(date: impl Into<String>) -> Self {
        Reading {
            date: date.into(),
            weight: Field::Blank,
            morning: Field::Blank,
            post_breakfast: Field::Blank,
            lunch: Field::Blank,
            post_lunch: Field::Blank,
            dinner: Field::Blank,
            bedtime: Field::Blank,
            insulin_am: Field::Blank,
            insulin_pm: Field::Blank,
            sleep: Field::Blank,
            rolling_weight_7: None,
        }
    }

    /// Parses `date` as `YYYY-MM-DD`.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }

    pub fn glucose(&self, slot: GlucoseSlot) -> Option<f64> {
        slot.field(self).value()
    }
}

/// Fills `rolling_weight_7` with the trailing mean of weight.
///
/// A row gets a value only when it and the preceding six rows all hold a
/// typed weight; otherwise it stays `None`.
pub fn apply_rolling_weight(readings: &mut [Reading]) {
    let weights: Vec<Option<f64>> = readings.iter().map(|r| r.weight.value()).collect();

    for (i, reading) in readings.iter_mut().enumerate() {
        reading.rolling_weight_7 = if i + 1 < ROLLING_WINDOW {
            None
        } else {
            weights[i + 1 - ROLLING_WINDOW..=i]
                .iter()
                .copied()
                .collect::<Option<Vec<f64>>>()
                .map(|window| round1(mean(&window)))
        };
    }
}
