//! TNFD risk thresholds per nature risk category.

use dairy_tnfd_farm_models::RiskBucket;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::ReferenceError;

/// Nature-related risk categories recognized by the threshold table.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RiskCategory {
    /// Water availability relative to demand
    WaterStress,
    /// Pressure on local habitats and species
    BiodiversityRisk,
    /// Nitrogen/phosphorus loss to watercourses
    NutrientRunoff,
    /// Erosion, compaction, and organic matter loss
    SoilDegradation,
    /// Exposure to flooding
    FloodRisk,
    /// Exposure to drought
    DroughtRisk,
}

impl RiskCategory {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::WaterStress,
            Self::BiodiversityRisk,
            Self::NutrientRunoff,
            Self::SoilDegradation,
            Self::FloodRisk,
            Self::DroughtRisk,
        ]
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::WaterStress => "Water stress",
            Self::BiodiversityRisk => "Biodiversity risk",
            Self::NutrientRunoff => "Nutrient runoff",
            Self::SoilDegradation => "Soil degradation",
            Self::FloodRisk => "Flood risk",
            Self::DroughtRisk => "Drought risk",
        }
    }
}

/// Four ascending severity cutoffs for one category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeverityCutoffs {
    /// Value at which the category counts as low severity.
    pub low: f64,
    /// Value at which the category counts as medium severity.
    pub medium: f64,
    /// Value at which the category counts as high severity.
    pub high: f64,
    /// Value at which the category counts as critical.
    pub critical: f64,
}

impl SeverityCutoffs {
    /// Returns the highest severity whose cutoff `value` reaches, or `None`
    /// when it sits below the `low` cutoff.
    #[must_use]
    pub fn classify(&self, value: f64) -> Option<RiskBucket> {
        if value >= self.critical {
            Some(RiskBucket::Critical)
        } else if value >= self.high {
            Some(RiskBucket::High)
        } else if value >= self.medium {
            Some(RiskBucket::Medium)
        } else if value >= self.low {
            Some(RiskBucket::Low)
        } else {
            None
        }
    }

    /// Returns the cutoff for a given severity.
    #[must_use]
    pub const fn cutoff(&self, bucket: RiskBucket) -> f64 {
        match bucket {
            RiskBucket::Low => self.low,
            RiskBucket::Medium => self.medium,
            RiskBucket::High => self.high,
            RiskBucket::Critical => self.critical,
        }
    }

    fn is_ascending(&self) -> bool {
        self.low < self.medium && self.medium < self.high && self.high < self.critical
    }
}

/// Threshold cutoffs for every [`RiskCategory`], in table order.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdTable {
    rows: Vec<(RiskCategory, SeverityCutoffs)>,
}

impl ThresholdTable {
    /// Cutoffs for a category.
    #[must_use]
    pub fn get(&self, category: RiskCategory) -> Option<&SeverityCutoffs> {
        self.rows
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, cutoffs)| cutoffs)
    }

    /// Iterates categories in table order.
    pub fn iter(&self) -> impl Iterator<Item = (RiskCategory, &SeverityCutoffs)> {
        self.rows.iter().map(|(c, cutoffs)| (*c, cutoffs))
    }

    /// Number of categories in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no categories.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Deserialize)]
struct ThresholdsFile {
    category: Vec<ThresholdRow>,
}

#[derive(Deserialize)]
struct ThresholdRow {
    category: RiskCategory,
    #[serde(flatten)]
    cutoffs: SeverityCutoffs,
}

/// Parses and validates a thresholds table.
///
/// Every category must appear exactly once with strictly ascending cutoffs.
///
/// # Errors
///
/// Returns [`ReferenceError`] if the TOML is malformed, a category is
/// missing or duplicated, or cutoffs are not strictly ascending.
pub fn parse_thresholds(toml_str: &str) -> Result<ThresholdTable, ReferenceError> {
    let file: ThresholdsFile = toml::de::from_str(toml_str).map_err(|source| {
        ReferenceError::Parse {
            table: "thresholds",
            source,
        }
    })?;

    let mut rows = Vec::with_capacity(file.category.len());
    for row in file.category {
        if rows.iter().any(|(c, _)| *c == row.category) {
            return Err(ReferenceError::Invalid {
                table: "thresholds",
                message: format!("duplicate category '{}'", row.category),
            });
        }
        if !row.cutoffs.is_ascending() {
            return Err(ReferenceError::Invalid {
                table: "thresholds",
                message: format!("cutoffs for '{}' are not strictly ascending", row.category),
            });
        }
        rows.push((row.category, row.cutoffs));
    }

    if let Some(missing) = RiskCategory::all()
        .iter()
        .find(|category| !rows.iter().any(|(c, _)| c == *category))
    {
        return Err(ReferenceError::Invalid {
            table: "thresholds",
            message: format!("missing category '{missing}'"),
        });
    }

    Ok(ThresholdTable { rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ThresholdTable {
        parse_thresholds(include_str!("../tables/thresholds.toml")).unwrap()
    }

    #[test]
    fn embedded_values_match_published_cutoffs() {
        let table = table();
        let water = table.get(RiskCategory::WaterStress).unwrap();
        assert!((water.low - 10.0).abs() < f64::EPSILON);
        assert!((water.critical - 80.0).abs() < f64::EPSILON);

        let flood = table.get(RiskCategory::FloodRisk).unwrap();
        assert!((flood.low - 5.0).abs() < f64::EPSILON);
        assert!((flood.medium - 15.0).abs() < f64::EPSILON);
        assert!((flood.high - 30.0).abs() < f64::EPSILON);
        assert!((flood.critical - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn every_category_is_ascending() {
        for (category, cutoffs) in table().iter() {
            assert!(cutoffs.is_ascending(), "{category} cutoffs not ascending");
        }
    }

    #[test]
    fn classify_reaches_cutoffs_inclusively() {
        let cutoffs = table().get(RiskCategory::NutrientRunoff).copied().unwrap();
        assert_eq!(cutoffs.classify(14.9), None);
        assert_eq!(cutoffs.classify(15.0), Some(RiskBucket::Low));
        assert_eq!(cutoffs.classify(30.0), Some(RiskBucket::Medium));
        assert_eq!(cutoffs.classify(49.0), Some(RiskBucket::Medium));
        assert_eq!(cutoffs.classify(50.0), Some(RiskBucket::High));
        assert_eq!(cutoffs.classify(75.0), Some(RiskBucket::Critical));
        assert!((cutoffs.cutoff(RiskBucket::High) - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_descending_cutoffs() {
        let err = parse_thresholds(
            r#"
            [[category]]
            category = "water_stress"
            low = 10.0
            medium = 5.0
            high = 40.0
            critical = 80.0
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("not strictly ascending"));
    }

    #[test]
    fn rejects_missing_category() {
        let err = parse_thresholds(
            r#"
            [[category]]
            category = "water_stress"
            low = 10.0
            medium = 20.0
            high = 40.0
            critical = 80.0
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("missing category"));
    }

    #[test]
    fn rejects_unknown_category() {
        assert!(matches!(
            parse_thresholds(
                r#"
                [[category]]
                category = "heat_stress"
                low = 1.0
                medium = 2.0
                high = 3.0
                critical = 4.0
                "#,
            ),
            Err(ReferenceError::Parse { .. })
        ));
    }
}
