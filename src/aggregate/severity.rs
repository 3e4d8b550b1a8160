use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One labelled range of a [`SeverityScheme`]. `upper` is exclusive;
/// `None` marks the final, unbounded band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub upper: Option<f64>,
    pub label: String,
}

/// A classified value's bucket: its position in the scheme and its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket<'a> {
    pub rank: usize,
    pub label: &'a str,
}

/// | Range    | Label          |
/// |----------|----------------|
/// | < 3      | very low       |
/// | [3, 4)   | low            |
/// | [4, 7)   | good           |
/// | [7, 10)  | elevated       |
/// | [10, 15) | high           |
/// | >= 15    | extremely high |
static SIX_BAND: &[(Option<f64>, &str)] = &[
    (Some(3.0), "very low"),
    (Some(4.0), "low"),
    (Some(7.0), "good"),
    (Some(10.0), "elevated"),
    (Some(15.0), "high"),
    (None, "extremely high"),
];

/// | Range    | Label          |
/// |----------|----------------|
/// | < 4      | low            |
/// | [4, 7)   | good           |
/// | [7, 10)  | high           |
/// | [10, 15) | very high      |
/// | >= 15    | extremely high |
static FIVE_BAND: &[(Option<f64>, &str)] = &[
    (Some(4.0), "low"),
    (Some(7.0), "good"),
    (Some(10.0), "high"),
    (Some(15.0), "very high"),
    (None, "extremely high"),
];

/// Ordered, non-overlapping partition of the real line into labelled bands.
///
/// Bands are half-open and lower-inclusive, so a boundary value belongs to
/// the higher band. Rank follows band order, lowest severity first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeverityScheme {
    bands: Vec<Band>,
}

impl SeverityScheme {
    /// Builds a scheme from bands in increasing order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidScheme`] unless upper bounds are finite and
    /// strictly increasing, only the last band is unbounded, and labels are
    /// non-empty and distinct.
    pub fn new(bands: Vec<Band>) -> Result<Self> {
        let Some((last, bounded)) = bands.split_last() else {
            return Err(Error::InvalidScheme("no bands".into()));
        };

        if last.upper.is_some() {
            return Err(Error::InvalidScheme(format!(
                "last band '{}' must be unbounded",
                last.label
            )));
        }

        let mut previous: Option<f64> = None;
        for band in bounded {
            let upper = match band.upper {
                Some(u) if u.is_finite() => u,
                _ => {
                    return Err(Error::InvalidScheme(format!(
                        "band '{}' needs a finite upper bound",
                        band.label
                    )));
                }
            };
            if previous.is_some_and(|p| upper <= p) {
                return Err(Error::InvalidScheme(format!(
                    "upper bound {upper} of band '{}' is not increasing",
                    band.label
                )));
            }
            previous = Some(upper);
        }

        for (i, band) in bands.iter().enumerate() {
            if band.label.trim().is_empty() {
                return Err(Error::InvalidScheme(format!("band {i} has an empty label")));
            }
            if bands[..i].iter().any(|b| b.label == band.label) {
                return Err(Error::InvalidScheme(format!(
                    "duplicate label '{}'",
                    band.label
                )));
            }
        }

        Ok(SeverityScheme { bands })
    }

    pub fn six_band() -> Self {
        Self::from_table(SIX_BAND)
    }

    pub fn five_band() -> Self {
        Self::from_table(FIVE_BAND)
    }

    fn from_table(table: &[(Option<f64>, &str)]) -> Self {
        SeverityScheme {
            bands: table
                .iter()
                .map(|(upper, label)| Band {
                    upper: *upper,
                    label: label.to_string(),
                })
                .collect(),
        }
    }

    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.bands.iter().map(|b| b.label.as_str())
    }

    /// Returns the band containing `value`. Only NaN is unclassifiable.
    pub fn classify(&self, value: f64) -> Option<Bucket<'_>> {
        if value.is_nan() {
            return None;
        }
        self.bands
            .iter()
            .position(|band| band.upper.is_none_or(|upper| value < upper))
            .map(|rank| Bucket {
                rank,
                label: &self.bands[rank].label,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(scheme: &SeverityScheme, value: f64) -> &str {
        scheme.classify(value).unwrap().label
    }

    #[test]
    fn test_six_band_boundaries() {
        let s = SeverityScheme::six_band();
        assert_eq!(label(&s, 2.9), "very low");
        assert_eq!(label(&s, 3.0), "low");
        assert_eq!(label(&s, 3.9), "low");
        assert_eq!(label(&s, 4.0), "good");
        assert_eq!(label(&s, 6.8), "good");
        assert_eq!(label(&s, 7.0), "elevated");
        assert_eq!(label(&s, 9.9), "elevated");
        assert_eq!(label(&s, 10.0), "high");
        assert_eq!(label(&s, 14.99), "high");
        assert_eq!(label(&s, 15.0), "extremely high");
        assert_eq!(label(&s, 27.3), "extremely high");
    }

    #[test]
    fn test_five_band_boundaries() {
        let s = SeverityScheme::five_band();
        assert_eq!(label(&s, 2.0), "low");
        assert_eq!(label(&s, 6.8), "good");
        assert_eq!(label(&s, 9.9), "high");
        assert_eq!(label(&s, 10.0), "very high");
        assert_eq!(label(&s, 15.0), "extremely high");
    }

    #[test]
    fn test_classification_is_total() {
        let s = SeverityScheme::six_band();
        for value in [f64::NEG_INFINITY, -1.0, 0.0, 5.5, 1e9, f64::INFINITY] {
            let matches = s
                .bands()
                .iter()
                .enumerate()
                .filter(|(i, band)| {
                    let lower = if *i == 0 {
                        f64::NEG_INFINITY
                    } else {
                        s.bands()[i - 1].upper.unwrap()
                    };
                    value >= lower && band.upper.is_none_or(|u| value < u)
                })
                .count();
            assert_eq!(matches, 1, "value {value}");
            assert!(s.classify(value).is_some());
        }
        assert_eq!(s.classify(f64::NAN), None);
    }

    #[test]
    fn test_rank_follows_band_order() {
        let s = SeverityScheme::six_band();
        assert_eq!(s.classify(1.0).unwrap().rank, 0);
        assert_eq!(s.classify(20.0).unwrap().rank, 5);
        assert_eq!(s.classify(5.0).unwrap().rank, 2);
    }

    #[test]
    fn test_custom_scheme_validation() {
        let band = |upper: Option<f64>, label: &str| Band {
            upper,
            label: label.to_string(),
        };

        assert!(SeverityScheme::new(vec![]).is_err());
        assert!(SeverityScheme::new(vec![band(Some(4.0), "low")]).is_err());
        assert!(
            SeverityScheme::new(vec![
                band(Some(7.0), "low"),
                band(Some(4.0), "good"),
                band(None, "high"),
            ])
            .is_err()
        );
        assert!(
            SeverityScheme::new(vec![band(None, "low"), band(None, "high")]).is_err()
        );
        assert!(
            SeverityScheme::new(vec![band(Some(4.0), "low"), band(None, "low")]).is_err()
        );

        let s = SeverityScheme::new(vec![band(Some(7.0), "in range"), band(None, "above")])
            .unwrap();
        assert_eq!(label(&s, 7.0), "above");
        assert_eq!(label(&s, -3.0), "in range");
    }
}
