//! Portfolio performance targets and compliance card status cutoffs.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display};

use crate::ReferenceError;

/// Targets (0-100) for each performance dimension, plus the fixed carbon
/// management baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceTargets {
    /// Water efficiency target.
    pub water_efficiency: f64,
    /// Biodiversity target.
    pub biodiversity: f64,
    /// Nutrient efficiency target.
    pub nutrient_efficiency: f64,
    /// Soil health target (on the 0-100 axis).
    pub soil_health: f64,
    /// Carbon management target.
    pub carbon_management: f64,
    /// Current carbon management value reported for the portfolio.
    pub carbon_management_baseline: f64,
}

/// Rate cutoffs that decide a compliance card's status.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardStatusCutoffs {
    /// Rates at or above this are on track.
    pub on_track: f64,
    /// Rates at or above this (but below `on_track`) are at risk.
    pub at_risk: f64,
}

/// Status of a compliance card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "camelCase")]
pub enum CardStatus {
    /// Rate meets the on-track cutoff
    #[strum(to_string = "On track")]
    OnTrack,
    /// Rate meets the at-risk cutoff only
    #[strum(to_string = "At risk")]
    AtRisk,
    /// Rate below both cutoffs
    #[strum(to_string = "Action required")]
    ActionRequired,
}

impl CardStatusCutoffs {
    /// Classifies a compliance rate.
    #[must_use]
    pub fn status(&self, rate: f64) -> CardStatus {
        if rate >= self.on_track {
            CardStatus::OnTrack
        } else if rate >= self.at_risk {
            CardStatus::AtRisk
        } else {
            CardStatus::ActionRequired
        }
    }
}

#[derive(Deserialize)]
struct TargetsFile {
    targets: TargetRows,
    baseline: BaselineRows,
    card_status: CardStatusRows,
}

#[derive(Deserialize)]
struct TargetRows {
    water_efficiency: f64,
    biodiversity: f64,
    nutrient_efficiency: f64,
    soil_health: f64,
    carbon_management: f64,
}

#[derive(Deserialize)]
struct BaselineRows {
    carbon_management: f64,
}

#[derive(Deserialize)]
struct CardStatusRows {
    on_track: f64,
    at_risk: f64,
}

/// Parses the targets table.
///
/// # Errors
///
/// Returns [`ReferenceError`] if the TOML is malformed, a value falls
/// outside 0-100, or the card status cutoffs are out of order.
pub fn parse_targets(
    toml_str: &str,
) -> Result<(PerformanceTargets, CardStatusCutoffs), ReferenceError> {
    let file: TargetsFile =
        toml::de::from_str(toml_str).map_err(|source| ReferenceError::Parse {
            table: "targets",
            source,
        })?;

    let targets = PerformanceTargets {
        water_efficiency: file.targets.water_efficiency,
        biodiversity: file.targets.biodiversity,
        nutrient_efficiency: file.targets.nutrient_efficiency,
        soil_health: file.targets.soil_health,
        carbon_management: file.targets.carbon_management,
        carbon_management_baseline: file.baseline.carbon_management,
    };

    let values = [
        targets.water_efficiency,
        targets.biodiversity,
        targets.nutrient_efficiency,
        targets.soil_health,
        targets.carbon_management,
        targets.carbon_management_baseline,
    ];
    if values.iter().any(|v| !(0.0..=100.0).contains(v)) {
        return Err(ReferenceError::Invalid {
            table: "targets",
            message: "targets must lie within 0-100".to_string(),
        });
    }

    let card_status = CardStatusCutoffs {
        on_track: file.card_status.on_track,
        at_risk: file.card_status.at_risk,
    };
    if card_status.at_risk > card_status.on_track {
        return Err(ReferenceError::Invalid {
            table: "targets",
            message: "card_status.at_risk must not exceed card_status.on_track".to_string(),
        });
    }

    Ok((targets, card_status))
}
