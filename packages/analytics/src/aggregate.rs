//! Portfolio aggregator.
//!
//! Filters the farm collection by region and farm type, then reduces the
//! matching farms into a [`PortfolioSummary`] in a single pass. The TNFD
//! metric groups, performance profile, and scheme cards are derived from the
//! same filtered subset.

use dairy_tnfd_analytics_models::{
    BiodiversityMetrics, ComplianceRates, FilterSelection, LandMetrics, PerformanceAxis,
    PerformanceDimension, PortfolioSummary, RiskDistribution, SchemeCardView, TnfdMetrics,
    WaterMetrics,
};
use dairy_tnfd_farm_models::{FarmRecord, RiskBucket};
use dairy_tnfd_reference::{CardRate, ReferenceTables};

/// Share of farm area assumed to be natural habitat.
pub const NATURAL_HABITAT_SHARE: f64 = 0.15;

/// Estimated daily water withdrawal per cow (L).
pub const WATER_PER_COW_L_PER_DAY: f64 = 50.0;

/// Species richness estimate per biodiversity point.
pub const SPECIES_RICHNESS_FACTOR: f64 = 0.8;

/// Biodiversity score a farm must exceed to count as pollinator-supporting.
pub const POLLINATOR_BIODIVERSITY_CUTOFF: f64 = 60.0;

/// Soil health index multiplier onto the 0-100 performance axis.
pub const SOIL_HEALTH_AXIS_SCALE: f64 = 20.0;

/// Liters per displayed milk-volume unit (millions of liters).
const LITERS_PER_MILLION: f64 = 1_000_000.0;

/// Maximum of every performance axis.
const AXIS_FULL_MARK: f64 = 100.0;

/// The summary plus the farms it was computed over.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioView<'a> {
    /// Aggregate statistics.
    pub summary: PortfolioSummary,
    /// Farms that passed the filter, in collection order.
    pub farms: Vec<&'a FarmRecord>,
}

/// Returns the farms matching `filter`, in collection order.
#[must_use]
pub fn filter_farms<'a>(farms: &'a [FarmRecord], filter: &FilterSelection) -> Vec<&'a FarmRecord> {
    farms.iter().filter(|farm| filter.matches(farm)).collect()
}

/// Filters and summarizes a farm collection.
#[must_use]
pub fn summarize<'a>(farms: &'a [FarmRecord], filter: &FilterSelection) -> PortfolioView<'a> {
    let filtered = filter_farms(farms, filter);
    let summary = summarize_subset(&filtered);

    log::debug!(
        "Summarized {}/{} farms for {filter}",
        summary.farm_count,
        farms.len()
    );

    PortfolioView {
        summary,
        farms: filtered,
    }
}

/// Running sums for one aggregation pass.
#[derive(Default)]
struct Totals {
    area_ha: f64,
    herd_size: u64,
    milk_liters: f64,
    biodiversity: f64,
    water_efficiency: f64,
    nutrient_efficiency: f64,
    tnfd: usize,
    nvz: usize,
    sfi: usize,
    water_permit: usize,
    alerts: u64,
    risk: RiskDistribution,
}

impl Totals {
    fn add(&mut self, farm: &FarmRecord) {
        self.area_ha += farm.area_ha;
        self.herd_size += u64::from(farm.herd_size);
        self.milk_liters += farm.annual_milk_liters();
        self.biodiversity += farm.metrics.biodiversity_score;
        self.water_efficiency += farm.metrics.water_efficiency;
        self.nutrient_efficiency += farm.metrics.nutrient_efficiency;
        self.tnfd += usize::from(farm.compliance.tnfd);
        self.nvz += usize::from(farm.compliance.nvz);
        self.sfi += usize::from(farm.compliance.sfi);
        self.water_permit += usize::from(farm.compliance.water_permit);
        self.alerts += u64::from(farm.alerts);
        self.risk.record(farm.risk_bucket());
    }
}

/// Summarizes an already-filtered subset.
///
/// An empty subset yields [`PortfolioSummary::default()`]: zero totals,
/// zero means, zero rates, and an empty distribution.
#[must_use]
pub fn summarize_subset(farms: &[&FarmRecord]) -> PortfolioSummary {
    let n = farms.len();
    if n == 0 {
        return PortfolioSummary::default();
    }

    let mut totals = Totals::default();
    for farm in farms {
        totals.add(farm);
    }

    let high_risk_farms = totals.risk.high + totals.risk.critical;

    PortfolioSummary {
        farm_count: n,
        total_area_ha: totals.area_ha,
        total_herd_size: totals.herd_size,
        total_milk_million_liters: totals.milk_liters / LITERS_PER_MILLION,
        avg_biodiversity: mean(totals.biodiversity, n),
        avg_water_efficiency: mean(totals.water_efficiency, n),
        avg_nutrient_efficiency: mean(totals.nutrient_efficiency, n),
        compliance_rates: ComplianceRates {
            tnfd: percent(totals.tnfd, n),
            nvz: percent(totals.nvz, n),
            sfi: percent(totals.sfi, n),
            water_permit: percent(totals.water_permit, n),
        },
        risk_distribution: totals.risk,
        high_risk_farms,
        high_risk_share: percent(high_risk_farms, n),
        total_alerts: totals.alerts,
    }
}

/// Derives the TNFD metric groups for a filtered subset.
#[must_use]
pub fn tnfd_metrics(farms: &[&FarmRecord]) -> TnfdMetrics {
    let n = farms.len();
    if n == 0 {
        return TnfdMetrics::default();
    }

    let sum = |f: fn(&FarmRecord) -> f64| farms.iter().map(|farm| f(farm)).sum::<f64>();

    let avg_biodiversity = mean(sum(|f| f.metrics.biodiversity_score), n);
    let permitted = farms.iter().filter(|f| f.compliance.water_permit).count();
    let pollinator_farms = farms
        .iter()
        .filter(|f| f.metrics.biodiversity_score > POLLINATOR_BIODIVERSITY_CUTOFF)
        .count();

    TnfdMetrics {
        land: LandMetrics {
            natural_habitat_ha: sum(|f| f.area_ha) * NATURAL_HABITAT_SHARE,
            ecosystem_connectivity: avg_biodiversity / 100.0,
            soil_health: mean(sum(|f| f.metrics.soil_health), n),
        },
        water: WaterMetrics {
            withdrawal_intensity_l_per_day: sum(|f| f64::from(f.herd_size))
                * WATER_PER_COW_L_PER_DAY,
            treatment_efficiency: mean(sum(|f| f.metrics.water_efficiency), n),
            discharge_quality: percent(permitted, n),
        },
        biodiversity: BiodiversityMetrics {
            intactness_index: avg_biodiversity,
            species_richness: mean(
                sum(|f| f.metrics.biodiversity_score * SPECIES_RICHNESS_FACTOR),
                n,
            ),
            pollinator_support: percent(pollinator_farms, n),
        },
    }
}

/// Builds the environmental performance profile: current portfolio values
/// against configured targets.
#[must_use]
pub fn performance_profile(
    summary: &PortfolioSummary,
    tnfd: &TnfdMetrics,
    tables: &ReferenceTables,
) -> Vec<PerformanceAxis> {
    let targets = &tables.targets;
    let axis = |dimension, current, target| PerformanceAxis {
        dimension,
        current,
        target,
        full_mark: AXIS_FULL_MARK,
    };

    vec![
        axis(
            PerformanceDimension::WaterEfficiency,
            summary.avg_water_efficiency,
            targets.water_efficiency,
        ),
        axis(
            PerformanceDimension::Biodiversity,
            summary.avg_biodiversity,
            targets.biodiversity,
        ),
        axis(
            PerformanceDimension::NutrientEfficiency,
            summary.avg_nutrient_efficiency,
            targets.nutrient_efficiency,
        ),
        axis(
            PerformanceDimension::SoilHealth,
            tnfd.land.soil_health * SOIL_HEALTH_AXIS_SCALE,
            targets.soil_health,
        ),
        axis(
            PerformanceDimension::CarbonManagement,
            targets.carbon_management_baseline,
            targets.carbon_management,
        ),
    ]
}

/// Fills in each compliance card's rate and status from a summary.
#[must_use]
pub fn scheme_cards(summary: &PortfolioSummary, tables: &ReferenceTables) -> Vec<SchemeCardView> {
    tables
        .cards
        .iter()
        .map(|card| {
            let rate = match card.rate {
                CardRate::Flag(flag) => summary.compliance_rates.get(flag),
                CardRate::Fixed(rate) => rate,
            };
            SchemeCardView {
                title: card.title.clone(),
                rate,
                status: tables.card_status.status(rate),
                requirements: card.requirements.clone(),
                payment_rate: card.payment_rate.clone(),
            }
        })
        .collect()
}

/// Farms in a given risk bucket, highest score first.
#[must_use]
pub fn farms_in_bucket<'a>(farms: &[&'a FarmRecord], bucket: RiskBucket) -> Vec<&'a FarmRecord> {
    let mut matching: Vec<&FarmRecord> = farms
        .iter()
        .copied()
        .filter(|farm| farm.risk_bucket() == bucket)
        .collect();
    matching.sort_by(|a, b| b.metrics.risk_score.total_cmp(&a.metrics.risk_score));
    matching
}

#[allow(clippy::cast_precision_loss)]
fn mean(sum: f64, n: usize) -> f64 {
    if n == 0 { 0.0 } else { sum / n as f64 }
}

#[allow(clippy::cast_precision_loss)]
fn percent(count: usize, n: usize) -> f64 {
    if n == 0 {
        0.0
    } else {
        count as f64 / n as f64 * 100.0
    }
}
