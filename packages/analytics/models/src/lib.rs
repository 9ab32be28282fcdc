#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Portfolio filter, summary, and TNFD metric types.
//!
//! Defines the inputs and outputs of the portfolio aggregator. Every output
//! type's [`Default`] is its all-zero value, which is exactly what the
//! aggregator reports for a filter that matches no farms.

use std::fmt;
use std::str::FromStr;

use dairy_tnfd_farm_models::{ComplianceFlag, FarmRecord, FarmType, Region, RiskBucket};
use dairy_tnfd_reference::CardStatus;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum_macros::{AsRefStr, Display, EnumString};
use thiserror::Error;

/// Token that selects every value of a filter dimension.
pub const ALL_TOKEN: &str = "all";

/// Error returned when a filter value names neither `all` nor a known
/// variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {dimension} '{value}'")]
pub struct FilterParseError {
    /// Which dimension was being parsed.
    pub dimension: &'static str,
    /// The rejected input.
    pub value: String,
}

/// One filter dimension: either everything or a single value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FilterValue<T> {
    /// Match every value.
    All,
    /// Match exactly this value.
    Only(T),
}

impl<T> Default for FilterValue<T> {
    fn default() -> Self {
        Self::All
    }
}

impl<T: PartialEq> FilterValue<T> {
    /// Whether `value` passes this filter.
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Self::All => true,
            Self::Only(selected) => selected == value,
        }
    }
}

impl<T: fmt::Display> fmt::Display for FilterValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL_TOKEN),
            Self::Only(value) => fmt::Display::fmt(value, f),
        }
    }
}

/// Names used in [`FilterParseError`] messages.
pub trait FilterDimension {
    /// Dimension name (e.g. `"region"`).
    const NAME: &'static str;
}

impl FilterDimension for Region {
    const NAME: &'static str = "region";
}

impl FilterDimension for FarmType {
    const NAME: &'static str = "farm type";
}

impl<T: FromStr + FilterDimension> FromStr for FilterValue<T> {
    type Err = FilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case(ALL_TOKEN) {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only).map_err(|_| FilterParseError {
            dimension: T::NAME,
            value: s.to_string(),
        })
    }
}

impl<T: fmt::Display> Serialize for FilterValue<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de, T: FromStr + FilterDimension> Deserialize<'de> for FilterValue<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Region and farm-type selection applied before aggregation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSelection {
    /// Selected region.
    pub region: FilterValue<Region>,
    /// Selected farm type.
    pub farm_type: FilterValue<FarmType>,
}

impl FilterSelection {
    /// Selection matching every farm.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            region: FilterValue::All,
            farm_type: FilterValue::All,
        }
    }

    /// Returns a copy with the region replaced.
    #[must_use]
    pub const fn with_region(self, region: FilterValue<Region>) -> Self {
        Self { region, ..self }
    }

    /// Returns a copy with the farm type replaced.
    #[must_use]
    pub const fn with_farm_type(self, farm_type: FilterValue<FarmType>) -> Self {
        Self { farm_type, ..self }
    }

    /// Whether a farm passes both predicates.
    #[must_use]
    pub fn matches(&self, farm: &FarmRecord) -> bool {
        self.region.matches(&farm.region) && self.farm_type.matches(&farm.farm_type)
    }
}

impl fmt::Display for FilterSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "region={}, type={}", self.region, self.farm_type)
    }
}

/// Percentage of filtered farms satisfying each compliance flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceRates {
    /// TNFD reporting rate.
    pub tnfd: f64,
    /// NVZ compliance rate.
    pub nvz: f64,
    /// SFI enrollment rate.
    pub sfi: f64,
    /// Water permit validity rate.
    pub water_permit: f64,
}

impl ComplianceRates {
    /// Rate for a single flag.
    #[must_use]
    pub const fn get(&self, flag: ComplianceFlag) -> f64 {
        match flag {
            ComplianceFlag::Tnfd => self.tnfd,
            ComplianceFlag::Nvz => self.nvz,
            ComplianceFlag::Sfi => self.sfi,
            ComplianceFlag::WaterPermit => self.water_permit,
        }
    }
}

/// Farm counts per risk bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskDistribution {
    /// Farms with score `<= 25`.
    pub low: usize,
    /// Farms with score in `(25, 50]`.
    pub medium: usize,
    /// Farms with score in `(50, 75]`.
    pub high: usize,
    /// Farms with score `> 75`.
    pub critical: usize,
}

impl RiskDistribution {
    /// Count for one bucket.
    #[must_use]
    pub const fn get(&self, bucket: RiskBucket) -> usize {
        match bucket {
            RiskBucket::Low => self.low,
            RiskBucket::Medium => self.medium,
            RiskBucket::High => self.high,
            RiskBucket::Critical => self.critical,
        }
    }

    /// Adds one farm to a bucket.
    pub fn record(&mut self, bucket: RiskBucket) {
        match bucket {
            RiskBucket::Low => self.low += 1,
            RiskBucket::Medium => self.medium += 1,
            RiskBucket::High => self.high += 1,
            RiskBucket::Critical => self.critical += 1,
        }
    }

    /// Sum over all buckets.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.low + self.medium + self.high + self.critical
    }
}

/// Portfolio-level statistics over a filtered farm subset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    /// Number of farms in the subset.
    pub farm_count: usize,
    /// Total land area (ha).
    pub total_area_ha: f64,
    /// Total head count.
    pub total_herd_size: u64,
    /// Total annual milk volume in millions of liters.
    pub total_milk_million_liters: f64,
    /// Mean biodiversity score.
    pub avg_biodiversity: f64,
    /// Mean water efficiency.
    pub avg_water_efficiency: f64,
    /// Mean nutrient efficiency.
    pub avg_nutrient_efficiency: f64,
    /// Compliance rate per flag.
    pub compliance_rates: ComplianceRates,
    /// Farm count per risk bucket.
    pub risk_distribution: RiskDistribution,
    /// Farms in the high and critical buckets.
    pub high_risk_farms: usize,
    /// `high_risk_farms` as a percentage of `farm_count`.
    pub high_risk_share: f64,
    /// Sum of open alerts.
    pub total_alerts: u64,
}

impl PortfolioSummary {
    /// Whether the subset was empty (and every figure is zero by policy).
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.farm_count == 0
    }
}

/// Land and ecosystem metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandMetrics {
    /// Estimated natural habitat (ha).
    pub natural_habitat_ha: f64,
    /// Mean biodiversity scaled to 0-1.
    pub ecosystem_connectivity: f64,
    /// Mean soil health index.
    pub soil_health: f64,
}

/// Water system metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterMetrics {
    /// Estimated daily withdrawal (L/day).
    pub withdrawal_intensity_l_per_day: f64,
    /// Mean water efficiency.
    pub treatment_efficiency: f64,
    /// Share of farms with a valid water permit (%).
    pub discharge_quality: f64,
}

/// Biodiversity impact metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BiodiversityMetrics {
    /// Mean biodiversity score.
    pub intactness_index: f64,
    /// Estimated species richness.
    pub species_richness: f64,
    /// Share of farms with a biodiversity score above the pollinator cutoff (%).
    pub pollinator_support: f64,
}

/// TNFD-aligned metric groups over a filtered farm subset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TnfdMetrics {
    /// Land and ecosystems.
    pub land: LandMetrics,
    /// Water systems.
    pub water: WaterMetrics,
    /// Biodiversity impact.
    pub biodiversity: BiodiversityMetrics,
}

/// Dimensions on the environmental performance profile.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "camelCase")]
pub enum PerformanceDimension {
    /// Mean water efficiency
    #[strum(to_string = "Water Efficiency")]
    WaterEfficiency,
    /// Mean biodiversity score
    #[strum(to_string = "Biodiversity")]
    Biodiversity,
    /// Mean nutrient efficiency
    #[strum(to_string = "Nutrient Efficiency")]
    NutrientEfficiency,
    /// Mean soil health, scaled onto 0-100
    #[strum(to_string = "Soil Health")]
    SoilHealth,
    /// Carbon management baseline
    #[strum(to_string = "Carbon Management")]
    CarbonManagement,
}

/// One axis of the performance profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceAxis {
    /// Which dimension.
    pub dimension: PerformanceDimension,
    /// Portfolio value.
    pub current: f64,
    /// Target value.
    pub target: f64,
    /// Axis maximum.
    pub full_mark: f64,
}

/// A compliance card with its rate filled in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemeCardView {
    /// Card heading.
    pub title: String,
    /// Compliance rate (%).
    pub rate: f64,
    /// Status derived from the rate.
    pub status: CardStatus,
    /// Requirements listed on the card.
    pub requirements: Vec<String>,
    /// Payment line.
    pub payment_rate: String,
}
