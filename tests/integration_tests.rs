use glucose_dashboard::Error;
use glucose_dashboard::aggregate::Horizon;
use glucose_dashboard::coerce::{Field, RawCell};
use glucose_dashboard::config::{DashboardConfig, SchemeChoice};
use glucose_dashboard::dashboard::load_dashboard;
use glucose_dashboard::loader::load_readings;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::{Path, PathBuf};

const HEADERS: [(u16, &str); 7] = [
    (1, "Weight"),
    (2, "Morning (07:15)"),
    (3, "Post Breakfast"),
    (4, "Lunch (12:50)"),
    (5, "Post Lunch"),
    (6, "Dinner (18:30)"),
    (7, "BedTime (21:45)"),
];

/// Serial for 2024-06-19 in the 1900 date system.
const FIRST_DAY: f64 = 45462.0;

const WEIGHTS: [f64; 10] = [70.0, 70.2, 70.1, 69.9, 70.3, 70.0, 70.4, 70.6, 70.8, 71.0];

fn write_header(sheet: &mut Worksheet) {
    for (col, name) in HEADERS {
        sheet.write_string(0, col, name).unwrap();
    }
    // Free-text column the cleaner should discard.
    sheet.write_string(0, 11, "Notes").unwrap();
    for row in 1..=4 {
        sheet.write_string(row, 0, "target").unwrap();
        sheet.write_string(row, 2, "4-7").unwrap();
    }
}

fn write_day(sheet: &mut Worksheet, row: u32, day: usize, glucose: [f64; 4], date_format: &Format) {
    sheet
        .write_number_with_format(row, 0, FIRST_DAY + day as f64, date_format)
        .unwrap();
    sheet.write_number(row, 1, WEIGHTS[day]).unwrap();
    for (col, value) in [2u16, 4, 6, 7].into_iter().zip(glucose) {
        sheet.write_number(row, col, value).unwrap();
    }
    sheet.write_number(row, 8, 10.0).unwrap();
    sheet.write_number(row, 9, 12.0).unwrap();
    sheet.write_number(row, 10, 7.0).unwrap();
}

/// Ten days of readings; the first three are higher than the last seven.
/// Between them sit a blank row, an undated row and a trailing date-only row.
fn tracker_workbook(dir: &Path) -> PathBuf {
    let path = dir.join("DiabetesTracker.xlsx");
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");

    let notes = workbook.add_worksheet();
    notes.set_name("notes").unwrap();
    notes.write_string(0, 0, "not data").unwrap();

    let sheet = workbook.add_worksheet();
    sheet.set_name("main").unwrap();
    write_header(sheet);

    let mut row = 5;
    for day in 0..10 {
        let glucose = if day < 3 {
            [5.0, 7.5, 6.0, 9.0]
        } else {
            [6.0; 4]
        };
        write_day(sheet, row, day, glucose, &date_format);
        row += 1;

        if day == 4 {
            // blank padding row
            row += 1;
            // reading with no date
            sheet.write_number(row, 2, 14.0).unwrap();
            row += 1;
        }
    }
    sheet
        .write_number_with_format(row, 0, FIRST_DAY + 10.0, &date_format)
        .unwrap();

    workbook.save(&path).unwrap();
    path
}

#[test]
fn test_full_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let path = tracker_workbook(dir.path());

    let dashboard = load_dashboard(&path, &DashboardConfig::default()).unwrap();
    let readings = dashboard.readings();

    assert_eq!(readings.len(), 10);
    assert_eq!(readings[0].date, "2024-06-19");
    assert_eq!(readings[9].date, "2024-06-28");
    assert!(readings.windows(2).all(|w| w[0].date < w[1].date));

    assert_eq!(readings[0].weight, Field::Value(70.0));
    assert_eq!(readings[0].insulin_am, Field::Value(10.0));
    assert_eq!(readings[0].insulin_pm, Field::Value(12.0));
    assert_eq!(readings[0].sleep, Field::Value(7));
    assert!(readings[0].post_breakfast.is_blank());

    assert!(readings[..6].iter().all(|r| r.rolling_weight_7.is_none()));
    assert_eq!(readings[6].rolling_weight_7, Some(70.1));

    let summary = dashboard.summary();
    assert_eq!(summary.mean_all_time, Some(6.3));
    assert_eq!(summary.mean_last_30, Some(6.3));
    assert_eq!(summary.mean_last_7, Some(6.0));
    assert_eq!(summary.diff_all, Some(0.0));
    assert_eq!(summary.diff_30, Some(-0.3));
    assert_eq!(summary.reading_slots, 40);
    assert_eq!(summary.first_date.as_deref(), Some("2024-06-19"));

    let all = dashboard.breakdown(Horizon::All);
    let counts: Vec<(&str, usize)> = all
        .bucket_counts
        .iter()
        .map(|c| (c.label.as_str(), c.count))
        .collect();
    assert_eq!(counts, vec![("good", 34), ("elevated", 6)]);
    assert_eq!(all.readings.len(), 40);

    let week = dashboard.breakdown(Horizon::Last7Days);
    assert_eq!(week.days, 7);
    assert_eq!(week.bucket_counts.len(), 1);
    assert_eq!(week.bucket_counts[0].count, 28);
}

#[test]
fn test_loading_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = tracker_workbook(dir.path());
    let config = DashboardConfig::default();

    let first = load_readings(&path, &config).unwrap();
    let second = load_readings(&path, &config).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_five_band_scheme_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = tracker_workbook(dir.path());
    let config = DashboardConfig {
        scheme: SchemeChoice::FiveBand,
        ..DashboardConfig::default()
    };

    let dashboard = load_dashboard(&path, &config).unwrap();
    let labels: Vec<String> = dashboard
        .breakdown(Horizon::All)
        .bucket_counts
        .into_iter()
        .map(|c| c.label)
        .collect();
    assert_eq!(labels, vec!["good", "high"]);
}

#[test]
fn test_malformed_cells_survive_the_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("messy.xlsx");
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("main").unwrap();
    write_header(sheet);
    sheet.write_string(5, 0, "2024-06-19").unwrap();
    sheet.write_string(5, 1, "scale broken").unwrap();
    sheet.write_string(5, 2, "HI").unwrap();
    sheet.write_number(5, 4, 8.2).unwrap();
    sheet.write_number(5, 10, 6.5).unwrap();
    workbook.save(&path).unwrap();

    let dashboard = load_dashboard(&path, &DashboardConfig::default()).unwrap();
    let reading = &dashboard.readings()[0];
    assert_eq!(
        reading.weight,
        Field::Unconverted(RawCell::Text("scale broken".into()))
    );
    assert!(reading.morning.is_unconverted());
    assert_eq!(reading.lunch, Field::Value(8.2));
    assert!(reading.sleep.is_unconverted());

    assert_eq!(dashboard.summary().mean_all_time, Some(8.2));
    assert_eq!(dashboard.breakdown(Horizon::All).readings.len(), 1);
}

#[test]
fn test_missing_sheet_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wrong.xlsx");
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Sheet1").unwrap();
    write_header(sheet);
    workbook.save(&path).unwrap();

    let err = load_dashboard(&path, &DashboardConfig::default()).unwrap_err();
    match err {
        Error::SheetMissing { sheet, available } => {
            assert_eq!(sheet, "main");
            assert_eq!(available, vec!["Sheet1".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.xlsx");

    let err = load_dashboard(&path, &DashboardConfig::default()).unwrap_err();
    assert!(matches!(err, Error::SourceMissing { .. }));
    assert!(err.to_string().contains("absent.xlsx"));
}
