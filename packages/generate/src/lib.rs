#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Sample supplier-farm portfolio generator.
//!
//! Builds the mock portfolio the dashboard runs against. Output is fully
//! determined by [`GenerateOptions`]: the same seed, count, and reference
//! time always produce the same records, so a session's record set can be
//! reproduced exactly.

use chrono::{DateTime, TimeDelta, Utc};
use dairy_tnfd_farm_models::{ComplianceFlags, FarmMetrics, FarmRecord, FarmType, Region};
use rand::rngs::StdRng;
use rand::{Rng as _, SeedableRng as _};

/// Default number of farms in a generated portfolio.
pub const DEFAULT_FARM_COUNT: usize = 12;

/// Default RNG seed.
pub const DEFAULT_SEED: u64 = 270;

/// Oldest a record's `last_updated` can be, relative to the reference time.
const MAX_RECORD_AGE_DAYS: i64 = 30;

const FARM_NAMES: &[&str] = &[
    "Green Valley",
    "Hill Top",
    "Oak Tree",
    "River Side",
    "Meadow View",
    "Spring Field",
    "Manor",
    "Willow",
    "Pine Ridge",
    "Stone Bridge",
    "Elm Grove",
    "Heather",
];

/// Options controlling portfolio generation.
#[derive(Debug, Clone, Copy)]
pub struct GenerateOptions {
    /// Number of farms to generate.
    pub count: usize,
    /// RNG seed.
    pub seed: u64,
    /// Reference time `last_updated` values are measured back from.
    pub now: DateTime<Utc>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            count: DEFAULT_FARM_COUNT,
            seed: DEFAULT_SEED,
            now: Utc::now(),
        }
    }
}

/// Generates a sample portfolio.
///
/// Regions and farm types cycle by index so every region/type appears
/// before any repeats. Names come from a fixed list and gain a numeric
/// suffix once the list is exhausted.
#[must_use]
pub fn generate_sample_farms(options: &GenerateOptions) -> Vec<FarmRecord> {
    let mut rng = StdRng::seed_from_u64(options.seed);
    let regions = Region::all();
    let farm_types = FarmType::all();

    let farms: Vec<FarmRecord> = (0..options.count)
        .map(|i| FarmRecord {
            id: format!("FARM_{:03}", i + 1),
            name: farm_name(i),
            region: regions[i % regions.len()],
            farm_type: farm_types[i % farm_types.len()],
            area_ha: rng.gen_range(80.0..200.0),
            herd_size: rng.gen_range(100..250),
            milk_yield_per_cow: rng.gen_range(6000.0..9000.0),
            compliance: ComplianceFlags {
                tnfd: rng.gen_bool(0.7),
                nvz: rng.gen_bool(0.8),
                sfi: rng.gen_bool(0.6),
                water_permit: rng.gen_bool(0.9),
            },
            metrics: FarmMetrics {
                water_efficiency: rng.gen_range(60.0..95.0),
                biodiversity_score: rng.gen_range(30.0..90.0),
                nutrient_efficiency: rng.gen_range(40.0..85.0),
                soil_health: rng.gen_range(2.0..4.5),
                carbon_footprint: rng.gen_range(800.0..1600.0),
                risk_score: rng.gen_range(0.0..=100.0),
            },
            last_updated: options.now
                - TimeDelta::milliseconds(
                    rng.gen_range(0..MAX_RECORD_AGE_DAYS * 24 * 60 * 60 * 1000),
                ),
            alerts: rng.gen_range(0..5),
        })
        .collect();

    log::debug!(
        "Generated {} sample farms (seed {})",
        farms.len(),
        options.seed
    );

    farms
}

fn farm_name(index: usize) -> String {
    let base = FARM_NAMES[index % FARM_NAMES.len()];
    let round = index / FARM_NAMES.len();
    if round == 0 {
        format!("{base} Farm")
    } else {
        format!("{base} Farm {}", round + 1)
    }
}
