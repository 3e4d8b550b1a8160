//! Best-effort cell coercion.
//!
//! A cell that cannot be read as its column's type is kept verbatim as
//! [`Field::Unconverted`] instead of failing the load.

use serde::Serialize;
use std::fmt;

/// An untyped cell as it appears in the source sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawCell {
    Blank,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Date-time rendered as `YYYY-MM-DD HH:MM:SS`.
    DateTime(String),
    /// Spreadsheet error value such as `#DIV/0!`.
    Error(String),
}

impl RawCell {
    /// Empty cells, whitespace-only text and NaN all count as blank.
    pub fn is_blank(&self) -> bool {
        match self {
            RawCell::Blank => true,
            RawCell::Text(s) => s.trim().is_empty(),
            RawCell::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    pub fn to_text(&self) -> String {
        match self {
            RawCell::Blank => String::new(),
            RawCell::Text(s) | RawCell::DateTime(s) | RawCell::Error(s) => s.clone(),
            RawCell::Int(i) => i.to_string(),
            RawCell::Float(f) => f.to_string(),
            RawCell::Bool(b) => b.to_string(),
        }
    }
}

impl fmt::Display for RawCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

/// Outcome of coercing one cell to `T`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Field<T> {
    Blank,
    Value(T),
    Unconverted(RawCell),
}

impl<T: Copy> Field<T> {
    /// The typed value, if coercion succeeded.
    pub fn value(&self) -> Option<T> {
        match self {
            Field::Value(v) => Some(*v),
            _ => None,
        }
    }
}

impl<T> Field<T> {
    pub fn is_blank(&self) -> bool {
        matches!(self, Field::Blank)
    }

    pub fn is_unconverted(&self) -> bool {
        matches!(self, Field::Unconverted(_))
    }
}

impl<T: fmt::Display> fmt::Display for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Blank => Ok(()),
            Field::Value(v) => write!(f, "{v}"),
            Field::Unconverted(raw) => write!(f, "{raw}"),
        }
    }
}

/// Coerces a cell to a float. NaN is treated as blank.
pub fn to_float(cell: &RawCell) -> Field<f64> {
    if cell.is_blank() {
        return Field::Blank;
    }

    let parsed = match cell {
        RawCell::Float(f) => Some(*f),
        RawCell::Int(i) => Some(*i as f64),
        RawCell::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        RawCell::Text(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(v) if v.is_nan() => Field::Blank,
        Some(v) => Field::Value(v),
        None => Field::Unconverted(cell.clone()),
    }
}

/// Coerces a cell to an integer. Floats convert only when integral.
pub fn to_int(cell: &RawCell) -> Field<i64> {
    if cell.is_blank() {
        return Field::Blank;
    }

    let parsed = match cell {
        RawCell::Int(i) => Some(*i),
        RawCell::Float(f) => integral(*f),
        RawCell::Bool(b) => Some(i64::from(*b)),
        RawCell::Text(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(integral))
        }
        _ => None,
    };

    match parsed {
        Some(v) => Field::Value(v),
        None => Field::Unconverted(cell.clone()),
    }
}

fn integral(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

/// Renders a date cell as text and keeps its first 10 characters.
/// Returns `None` for blank cells.
pub fn to_date_text(cell: &RawCell) -> Option<String> {
    if cell.is_blank() {
        return None;
    }
    Some(cell.to_text().chars().take(10).collect())
}
