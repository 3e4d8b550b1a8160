//! Workbook loading and cleaning.
//!
//! [`read_sheet`] pulls the primary sheet out of the workbook as untyped
//! cells; [`clean`] turns those into ordered [`Reading`]s.

use calamine::{Data, ExcelDateTime, Range, Reader, open_workbook_auto};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::coerce::{RawCell, to_date_text, to_float, to_int};
use crate::config::DashboardConfig;
use crate::error::{Error, Result};
use crate::reading::{Reading, apply_rolling_weight};

/// Positional headers renamed to semantic column names.
static RENAMES: &[(&str, &str)] = &[
    ("Unnamed: 0", "Date"),
    ("Unnamed: 8", "Insulin AM"),
    ("Unnamed: 9", "Insulin PM"),
    ("Unnamed: 10", "Sleep"),
];

static BLANK: RawCell = RawCell::Blank;

/// Serial days Excel can hold as a date: 1900-01-00 up to 9999-12-31.
const SERIAL_RANGE: std::ops::Range<f64> = 0.0..2_958_466.0;

/// One source row, cells by absolute column position.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub cells: Vec<RawCell>,
}

impl RawRecord {
    /// The cell at `column`, blank when the row is shorter.
    pub fn get(&self, column: usize) -> &RawCell {
        self.cells.get(column).unwrap_or(&BLANK)
    }
}

/// A sheet as read from the workbook: header names plus the rows below.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSheet {
    /// One name per column. Blank headers read as `Unnamed: N`.
    pub columns: Vec<String>,
    pub records: Vec<RawRecord>,
}

impl RawSheet {
    /// Builds a sheet from rows of cells, the first row being the header.
    pub fn from_rows(rows: Vec<Vec<RawCell>>) -> Self {
        let mut rows = rows.into_iter();
        let columns = rows
            .next()
            .unwrap_or_default()
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                if cell.is_blank() {
                    format!("Unnamed: {i}")
                } else {
                    cell.to_text()
                }
            })
            .collect();

        RawSheet {
            columns,
            records: rows.map(|cells| RawRecord { cells }).collect(),
        }
    }

    /// Converts a worksheet range, keeping column positions absolute so a
    /// range that starts past column A still maps to the right headers.
    pub fn from_range(range: &Range<Data>) -> Self {
        let column_offset = range.start().map(|(_, col)| col as usize).unwrap_or(0);

        let rows: Vec<Vec<RawCell>> = range
            .rows()
            .map(|row| {
                std::iter::repeat_n(RawCell::Blank, column_offset)
                    .chain(row.iter().map(raw_cell))
                    .collect()
            })
            .collect();

        Self::from_rows(rows)
    }
}

fn raw_cell(cell: &Data) -> RawCell {
    match cell {
        Data::Empty => RawCell::Blank,
        Data::String(s) => RawCell::Text(s.clone()),
        Data::Int(i) => RawCell::Int(*i),
        Data::Float(f) => RawCell::Float(*f),
        Data::Bool(b) => RawCell::Bool(*b),
        Data::DateTime(dt) if dt.is_duration() => duration_text(dt)
            .map(RawCell::Text)
            .unwrap_or(RawCell::Float(dt.as_f64())),
        Data::DateTime(dt) => datetime_text(dt)
            .map(RawCell::DateTime)
            .unwrap_or(RawCell::Float(dt.as_f64())),
        Data::DateTimeIso(s) => RawCell::DateTime(s.clone()),
        Data::DurationIso(s) => RawCell::Text(s.clone()),
        Data::Error(e) => RawCell::Error(e.to_string()),
    }
}

/// Renders a date-time cell as `YYYY-MM-DD HH:MM:SS`, honouring the
/// workbook's 1900 or 1904 date system. `None` when out of range.
fn datetime_text(dt: &ExcelDateTime) -> Option<String> {
    if !SERIAL_RANGE.contains(&dt.as_f64()) {
        return None;
    }
    let datetime = dt.as_datetime()?;
    Some(datetime.format("%Y-%m-%d %H:%M:%S").to_string())
}

/// Renders a duration cell as `H:MM:SS`.
fn duration_text(dt: &ExcelDateTime) -> Option<String> {
    let days = dt.as_f64();
    // i64 seconds overflow well past this
    if !days.is_finite() || days.abs() > 1e12 {
        return None;
    }
    let seconds = (days * 86_400.0).round() as i64;
    let sign = if seconds < 0 { "-" } else { "" };
    let seconds = seconds.abs();
    Some(format!(
        "{sign}{}:{:02}:{:02}",
        seconds / 3600,
        seconds % 3600 / 60,
        seconds % 60
    ))
}

/// Number of rows whose date parses but precedes the previous parsed date.
fn out_of_order(readings: &[Reading]) -> usize {
    readings
        .iter()
        .filter_map(Reading::parsed_date)
        .collect::<Vec<_>>()
        .windows(2)
        .filter(|pair| pair[1] < pair[0])
        .count()
}

/// Reads the named sheet of the workbook at `path`.
///
/// # Errors
///
/// Fails when the file is missing or unreadable, or has no sheet called
/// `sheet_name`.
#[tracing::instrument(skip(path), fields(path = %path.display()))]
pub fn read_sheet(path: &Path, sheet_name: &str) -> Result<RawSheet> {
    if !path.exists() {
        return Err(Error::SourceMissing {
            path: path.to_path_buf(),
        });
    }

    let workbook_error = |source: calamine::Error| Error::Workbook {
        path: path.to_path_buf(),
        source,
    };

    let mut workbook = open_workbook_auto(path).map_err(workbook_error)?;

    let available = workbook.sheet_names();
    if !available.iter().any(|name| name == sheet_name) {
        return Err(Error::SheetMissing {
            sheet: sheet_name.to_string(),
            available,
        });
    }

    let range = workbook.worksheet_range(sheet_name).map_err(workbook_error)?;
    let sheet = RawSheet::from_range(&range);
    debug!(
        columns = sheet.columns.len(),
        records = sheet.records.len(),
        "Sheet read"
    );
    Ok(sheet)
}

/// Positions of the recognized columns in the source sheet.
struct ColumnMap {
    date: usize,
    weight: usize,
    morning: usize,
    post_breakfast: usize,
    lunch: usize,
    post_lunch: usize,
    dinner: usize,
    bedtime: usize,
    insulin_am: usize,
    insulin_pm: usize,
    sleep: usize,
}

impl ColumnMap {
    fn resolve(columns: &[String]) -> Result<Self> {
        let names: Vec<&str> = columns
            .iter()
            .map(|name| {
                RENAMES
                    .iter()
                    .find(|(from, _)| *from == name.as_str())
                    .map(|(_, to)| *to)
                    .unwrap_or(name.as_str())
            })
            .collect();

        let find = |column: &str| {
            names
                .iter()
                .position(|name| *name == column)
                .ok_or_else(|| Error::ColumnMissing {
                    column: column.to_string(),
                })
        };

        Ok(ColumnMap {
            date: find("Date")?,
            weight: find("Weight")?,
            morning: find("Morning (07:15)")?,
            post_breakfast: find("Post Breakfast")?,
            lunch: find("Lunch (12:50)")?,
            post_lunch: find("Post Lunch")?,
            dinner: find("Dinner (18:30)")?,
            bedtime: find("BedTime (21:45)")?,
            insulin_am: find("Insulin AM")?,
            insulin_pm: find("Insulin PM")?,
            sleep: find("Sleep")?,
        })
    }

    fn reading(&self, date: String, record: &RawRecord) -> Reading {
        Reading {
            date,
            weight: to_float(record.get(self.weight)),
            morning: to_float(record.get(self.morning)),
            post_breakfast: to_float(record.get(self.post_breakfast)),
            lunch: to_float(record.get(self.lunch)),
            post_lunch: to_float(record.get(self.post_lunch)),
            dinner: to_float(record.get(self.dinner)),
            bedtime: to_float(record.get(self.bedtime)),
            insulin_am: to_float(record.get(self.insulin_am)),
            insulin_pm: to_float(record.get(self.insulin_pm)),
            sleep: to_int(record.get(self.sleep)),
            rolling_weight_7: None,
        }
    }
}

/// Turns a raw sheet into the ordered reading table.
///
/// Skips the first `skip_rows` records, drops rows with nothing but a date
/// and rows without a date, keeps the recognized columns, and coerces each
/// cell best-effort. Source order is preserved.
///
/// # Errors
///
/// Fails only when a recognized column is missing from the header row.
pub fn clean(sheet: RawSheet, skip_rows: usize) -> Result<Vec<Reading>> {
    let map = ColumnMap::resolve(&sheet.columns)?;

    let mut padding = 0usize;
    let mut undated = 0usize;
    let mut readings = Vec::new();

    for record in sheet.records.iter().skip(skip_rows) {
        let has_data = record
            .cells
            .iter()
            .enumerate()
            .any(|(i, cell)| i != map.date && !cell.is_blank());
        if !has_data {
            padding += 1;
            continue;
        }

        let Some(date) = to_date_text(record.get(map.date)) else {
            undated += 1;
            continue;
        };

        readings.push(map.reading(date, record));
    }

    apply_rolling_weight(&mut readings);

    let unordered = out_of_order(&readings);
    if unordered > 0 {
        warn!(unordered, "Dates are not in ascending order; windows follow row order");
    }
    debug!(padding, undated, kept = readings.len(), "Rows cleaned");
    Ok(readings)
}

/// Reads and cleans the configured sheet of the workbook at `path`.
#[tracing::instrument(skip(path, config), fields(path = %path.display(), sheet = %config.sheet_name))]
pub fn load_readings(path: &Path, config: &DashboardConfig) -> Result<Vec<Reading>> {
    let sheet = read_sheet(path, &config.sheet_name)?;
    let readings = clean(sheet, config.skip_rows)?;
    info!(days = readings.len(), "Readings loaded");
    Ok(readings)
}
