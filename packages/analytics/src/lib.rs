#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Portfolio aggregation over in-memory supplier farm records.
//!
//! [`aggregate::summarize`] is a pure function from a farm collection and a
//! [`FilterSelection`](dairy_tnfd_analytics_models::FilterSelection) to a
//! [`PortfolioSummary`](dairy_tnfd_analytics_models::PortfolioSummary).
//! [`cache::SummaryCache`] memoizes it per filter for a given record set.
//!
//! A filter that matches no farms is not an error: every total, mean, and
//! rate is reported as zero and the risk distribution is empty.

pub mod aggregate;
pub mod cache;

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{DateTime, Utc};
    use dairy_tnfd_farm_models::{ComplianceFlags, FarmMetrics, FarmRecord, FarmType, Region};

    /// A farm with round-number values; tests override what they check.
    pub fn farm(id: &str, region: Region, farm_type: FarmType) -> FarmRecord {
        FarmRecord {
            id: id.to_string(),
            name: format!("{id} Farm"),
            region,
            farm_type,
            area_ha: 100.0,
            herd_size: 100,
            milk_yield_per_cow: 7000.0,
            compliance: ComplianceFlags::default(),
            metrics: FarmMetrics {
                water_efficiency: 80.0,
                biodiversity_score: 50.0,
                nutrient_efficiency: 60.0,
                soil_health: 3.0,
                carbon_footprint: 1000.0,
                risk_score: 10.0,
            },
            last_updated: DateTime::<Utc>::UNIX_EPOCH,
            alerts: 0,
        }
    }
}
