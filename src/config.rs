use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::aggregate::{Band, SeverityScheme};

/// Which severity bands to classify glucose values with.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SchemeChoice {
    #[default]
    SixBand,
    FiveBand,
    Custom { bands: Vec<Band> },
}

impl SchemeChoice {
    pub fn build(&self) -> crate::Result<SeverityScheme> {
        match self {
            SchemeChoice::SixBand => Ok(SeverityScheme::six_band()),
            SchemeChoice::FiveBand => Ok(SeverityScheme::five_band()),
            SchemeChoice::Custom { bands } => SeverityScheme::new(bands.clone()),
        }
    }
}

/// Runtime settings for loading and classifying the tracker workbook.
///
/// Stored as a JSON object on disk; every field is optional:
/// ```json
/// {
///   "sheet_name": "main",
///   "skip_rows": 4,
///   "scheme": { "kind": "five_band" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Sheet holding the daily table.
    pub sheet_name: String,
    /// Non-data rows between the header row and the first day.
    pub skip_rows: usize,
    pub scheme: SchemeChoice,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            sheet_name: "main".to_string(),
            skip_rows: 4,
            scheme: SchemeChoice::default(),
        }
    }
}

impl DashboardConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: DashboardConfig = serde_json::from_str(&content)
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(config)
    }
}
