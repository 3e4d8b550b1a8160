//! Single entry point from workbook to dashboard data.

use serde::Serialize;
use std::path::Path;
use tracing::info;

use crate::aggregate::breakdown::breakdown;
use crate::aggregate::{GlucoseSummary, Horizon, HorizonBreakdown, SeverityScheme};
use crate::config::DashboardConfig;
use crate::error::Result;
use crate::loader::load_readings;
use crate::reading::Reading;

/// Everything the presentation layer needs for one render.
///
/// Built once per load and never mutated; horizon breakdowns are projected
/// from it on demand.
#[derive(Debug, Clone)]
pub struct Dashboard {
    readings: Vec<Reading>,
    summary: GlucoseSummary,
    scheme: SeverityScheme,
}

/// Serializable bundle handed across the presentation boundary.
#[derive(Debug, Serialize)]
pub struct DashboardReport<'a> {
    pub summary: &'a GlucoseSummary,
    pub scheme: &'a SeverityScheme,
    pub readings: &'a [Reading],
    pub breakdown: HorizonBreakdown,
}

impl Dashboard {
    pub fn from_readings(readings: Vec<Reading>, scheme: SeverityScheme) -> Self {
        let summary = GlucoseSummary::from_readings(&readings);
        Dashboard {
            readings,
            summary,
            scheme,
        }
    }

    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    pub fn summary(&self) -> &GlucoseSummary {
        &self.summary
    }

    pub fn scheme(&self) -> &SeverityScheme {
        &self.scheme
    }

    pub fn breakdown(&self, horizon: Horizon) -> HorizonBreakdown {
        breakdown(&self.readings, horizon, &self.scheme)
    }

    pub fn report(&self, horizon: Horizon) -> DashboardReport<'_> {
        DashboardReport {
            summary: &self.summary,
            scheme: &self.scheme,
            readings: &self.readings,
            breakdown: self.breakdown(horizon),
        }
    }
}

/// Loads the workbook at `path` and computes the dashboard data.
///
/// # Errors
///
/// Fails on an invalid severity scheme, a missing file or sheet, or a
/// missing column. No partial dashboard is returned.
#[tracing::instrument(skip(path, config), fields(path = %path.display()))]
pub fn load_dashboard(path: &Path, config: &DashboardConfig) -> Result<Dashboard> {
    let scheme = config.scheme.build()?;
    let readings = load_readings(path, config)?;
    let dashboard = Dashboard::from_readings(readings, scheme);

    info!(
        days = dashboard.summary.day_count,
        mean_all_time = ?dashboard.summary.mean_all_time,
        mean_last_30 = ?dashboard.summary.mean_last_30,
        mean_last_7 = ?dashboard.summary.mean_last_7,
        "Dashboard computed"
    );
    Ok(dashboard)
}
