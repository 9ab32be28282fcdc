#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Supplier farm record types, compliance flags, and risk buckets.
//!
//! This crate defines the canonical shape of a supplier farm as seen by the
//! rest of the dairy-tnfd workspace. Records are generated once per session
//! and never mutated; everything downstream (aggregation, rendering) borrows
//! them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Upper bound (inclusive) of the [`RiskBucket::Low`] band.
pub const LOW_RISK_MAX: f64 = 25.0;
/// Upper bound (inclusive) of the [`RiskBucket::Medium`] band.
pub const MEDIUM_RISK_MAX: f64 = 50.0;
/// Upper bound (inclusive) of the [`RiskBucket::High`] band.
pub const HIGH_RISK_MAX: f64 = 75.0;

/// UK region a supplier farm belongs to.
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
#[strum(ascii_case_insensitive)]
pub enum Region {
    /// South West England
    Southwest,
    /// North West England
    Northwest,
    /// East and West Midlands
    Midlands,
    /// Yorkshire and the Humber
    Yorkshire,
    /// South East England
    Southeast,
}

impl Region {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Southwest,
            Self::Northwest,
            Self::Midlands,
            Self::Yorkshire,
            Self::Southeast,
        ]
    }
}

/// Production system of a supplier farm.
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
#[strum(ascii_case_insensitive)]
pub enum FarmType {
    /// Housed, high-yield herd
    #[serde(rename = "Intensive Dairy")]
    #[strum(to_string = "Intensive Dairy", serialize = "intensive")]
    IntensiveDairy,
    /// Dairy alongside arable or other livestock
    #[serde(rename = "Mixed Farming")]
    #[strum(to_string = "Mixed Farming", serialize = "mixed")]
    MixedFarming,
    /// Pasture-based herd
    #[serde(rename = "Grass-Fed Dairy")]
    #[strum(to_string = "Grass-Fed Dairy", serialize = "grass-fed")]
    GrassFedDairy,
    /// Certified organic herd
    #[serde(rename = "Organic Dairy")]
    #[strum(to_string = "Organic Dairy", serialize = "organic")]
    OrganicDairy,
}

impl FarmType {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::IntensiveDairy,
            Self::MixedFarming,
            Self::GrassFedDairy,
            Self::OrganicDairy,
        ]
    }
}

/// One of the four independent compliance flags carried by a farm.
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
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum ComplianceFlag {
    /// Nature-related financial disclosure reporting
    Tnfd,
    /// Nitrate Vulnerable Zone regulations
    Nvz,
    /// Sustainable Farming Incentive enrollment
    Sfi,
    /// Abstraction and discharge permits
    WaterPermit,
}

impl ComplianceFlag {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Tnfd, Self::Nvz, Self::Sfi, Self::WaterPermit]
    }

    /// Short human-readable name used on compliance cards.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Tnfd => "TNFD Reporting",
            Self::Nvz => "NVZ Compliance",
            Self::Sfi => "SFI Enrolled",
            Self::WaterPermit => "Water Permit",
        }
    }

    /// One-line explanation of what the flag covers.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Tnfd => "Nature-related financial disclosures",
            Self::Nvz => "Nitrate Vulnerable Zone regulations",
            Self::Sfi => "Sustainable Farming Incentive scheme",
            Self::WaterPermit => "Abstraction and discharge permits",
        }
    }
}

/// Severity band derived from a farm's continuous risk score.
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
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "PascalCase", ascii_case_insensitive)]
pub enum RiskBucket {
    /// Score `<= 25`
    Low,
    /// Score in `(25, 50]`
    Medium,
    /// Score in `(50, 75]`
    High,
    /// Score `> 75`
    Critical,
}

impl RiskBucket {
    /// Returns all variants of this enum, in ascending severity.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Low, Self::Medium, Self::High, Self::Critical]
    }

    /// Buckets a risk score. Each band is inclusive on its upper edge
    /// except [`Self::Critical`], which is open-ended.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score <= LOW_RISK_MAX {
            Self::Low
        } else if score <= MEDIUM_RISK_MAX {
            Self::Medium
        } else if score <= HIGH_RISK_MAX {
            Self::High
        } else {
            Self::Critical
        }
    }
}

/// Regulatory and scheme status of a farm. Toggled externally, never derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct ComplianceFlags {
    /// Files nature-related financial disclosures.
    pub tnfd: bool,
    /// Meets Nitrate Vulnerable Zone rules.
    pub nvz: bool,
    /// Enrolled in the Sustainable Farming Incentive.
    pub sfi: bool,
    /// Holds a valid water abstraction/discharge permit.
    pub water_permit: bool,
}

impl ComplianceFlags {
    /// Returns the value of a single flag.
    #[must_use]
    pub const fn get(&self, flag: ComplianceFlag) -> bool {
        match flag {
            ComplianceFlag::Tnfd => self.tnfd,
            ComplianceFlag::Nvz => self.nvz,
            ComplianceFlag::Sfi => self.sfi,
            ComplianceFlag::WaterPermit => self.water_permit,
        }
    }

    /// Number of flags that are set.
    #[must_use]
    pub fn satisfied(&self) -> usize {
        ComplianceFlag::all()
            .iter()
            .filter(|flag| self.get(**flag))
            .count()
    }
}

/// Environmental scores recorded for a farm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmMetrics {
    /// Water use efficiency (%).
    pub water_efficiency: f64,
    /// Biodiversity score (0-100).
    pub biodiversity_score: f64,
    /// Nutrient use efficiency (%).
    pub nutrient_efficiency: f64,
    /// Soil health index (roughly 2-4.5).
    pub soil_health: f64,
    /// Carbon footprint per hectare.
    pub carbon_footprint: f64,
    /// Composite nature risk score (0-100).
    pub risk_score: f64,
}

/// One supplier farm in the processor's portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmRecord {
    /// Unique identifier (e.g. `"FARM_001"`).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Region the farm sits in.
    pub region: Region,
    /// Production system.
    #[serde(rename = "type")]
    pub farm_type: FarmType,
    /// Land area in hectares.
    pub area_ha: f64,
    /// Number of milking cows.
    pub herd_size: u32,
    /// Annual milk yield per cow in liters.
    pub milk_yield_per_cow: f64,
    /// Compliance flags.
    pub compliance: ComplianceFlags,
    /// Environmental scores.
    pub metrics: FarmMetrics,
    /// When the record was last refreshed. Informational only.
    pub last_updated: DateTime<Utc>,
    /// Open alert count. Informational only.
    pub alerts: u32,
}

impl FarmRecord {
    /// Annual milk volume in liters (herd size x yield per cow).
    #[must_use]
    pub fn annual_milk_liters(&self) -> f64 {
        f64::from(self.herd_size) * self.milk_yield_per_cow
    }

    /// Risk bucket for this farm's risk score.
    #[must_use]
    pub fn risk_bucket(&self) -> RiskBucket {
        RiskBucket::from_score(self.metrics.risk_score)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use super::*;

    #[test]
    fn risk_bucket_boundaries_are_upper_inclusive() {
        assert_eq!(RiskBucket::from_score(0.0), RiskBucket::Low);
        assert_eq!(RiskBucket::from_score(25.0), RiskBucket::Low);
        assert_eq!(RiskBucket::from_score(25.000_1), RiskBucket::Medium);
        assert_eq!(RiskBucket::from_score(50.0), RiskBucket::Medium);
        assert_eq!(RiskBucket::from_score(50.5), RiskBucket::High);
        assert_eq!(RiskBucket::from_score(75.0), RiskBucket::High);
        assert_eq!(RiskBucket::from_score(75.01), RiskBucket::Critical);
        assert_eq!(RiskBucket::from_score(100.0), RiskBucket::Critical);
    }

    #[test]
    fn farm_type_parses_display_and_short_names() {
        assert_eq!(
            FarmType::from_str("Grass-Fed Dairy").unwrap(),
            FarmType::GrassFedDairy
        );
        assert_eq!(
            FarmType::from_str("organic").unwrap(),
            FarmType::OrganicDairy
        );
        assert_eq!(FarmType::IntensiveDairy.to_string(), "Intensive Dairy");
        assert!(FarmType::from_str("Beef").is_err());
    }

    #[test]
    fn region_parses_case_insensitively() {
        assert_eq!(Region::from_str("yorkshire").unwrap(), Region::Yorkshire);
        assert_eq!(Region::Southeast.to_string(), "Southeast");
    }

    #[test]
    fn compliance_flags_lookup_matches_fields() {
        let flags = ComplianceFlags {
            tnfd: true,
            nvz: false,
            sfi: true,
            water_permit: false,
        };
        assert!(flags.get(ComplianceFlag::Tnfd));
        assert!(!flags.get(ComplianceFlag::Nvz));
        assert!(flags.get(ComplianceFlag::Sfi));
        assert!(!flags.get(ComplianceFlag::WaterPermit));
        assert_eq!(flags.satisfied(), 2);
    }

    #[test]
    fn farm_record_serializes_type_field_with_display_name() {
        let farm = FarmRecord {
            id: "FARM_001".to_string(),
            name: "Green Valley Farm".to_string(),
            region: Region::Southwest,
            farm_type: FarmType::MixedFarming,
            area_ha: 120.0,
            herd_size: 150,
            milk_yield_per_cow: 7000.0,
            compliance: ComplianceFlags::default(),
            metrics: FarmMetrics {
                water_efficiency: 70.0,
                biodiversity_score: 50.0,
                nutrient_efficiency: 60.0,
                soil_health: 3.0,
                carbon_footprint: 1000.0,
                risk_score: 40.0,
            },
            last_updated: DateTime::<Utc>::UNIX_EPOCH,
            alerts: 1,
        };

        let json = serde_json::to_value(&farm).unwrap();
        assert_eq!(json["type"], "Mixed Farming");
        assert_eq!(json["herdSize"], 150);
        assert!((farm.annual_milk_liters() - 1_050_000.0).abs() < f64::EPSILON);
        assert_eq!(farm.risk_bucket(), RiskBucket::Medium);
    }
}
