#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal front end for the dairy TNFD portfolio dashboard.
//!
//! ```text
//! dairy_tnfd summary [--region R] [--farm-type T] [--json]
//! dairy_tnfd farms [--region R] [--farm-type T] [--bucket B] [--json]
//! dairy_tnfd farm <ID> [--tab T] [--json]
//! dairy_tnfd tnfd [--region R] [--farm-type T] [--json]
//! dairy_tnfd performance [--region R] [--farm-type T] [--json]
//! dairy_tnfd thresholds
//! dairy_tnfd schemes [--json]
//! dairy_tnfd chat <MESSAGE> [--json]
//! ```
//!
//! Running with no subcommand enters interactive mode. The sample portfolio
//! is configured through `DAIRY_TNFD_*` environment variables or the
//! `--seed`/`--farms` flags.

mod interactive;
mod render;

use clap::{Args, Parser, Subcommand};
use dairy_tnfd_analytics_models::FilterValue;
use dairy_tnfd_dashboard::{
    Action, ConfigError, Dashboard, DashboardConfig, DashboardError, DetailTab,
};
use dairy_tnfd_farm_models::{FarmType, Region, RiskBucket};
use serde::Serialize;
use thiserror::Error;

/// Errors surfaced by the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A dashboard action was rejected.
    #[error(transparent)]
    Dashboard(#[from] DashboardError),

    /// JSON output failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A terminal prompt failed.
    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),
}

#[derive(Parser)]
#[command(
    name = "dairy_tnfd",
    about = "UK dairy supplier portfolio TNFD dashboard"
)]
struct Cli {
    /// Seed for the sample portfolio (overrides DAIRY_TNFD_SEED)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Number of sample farms (overrides DAIRY_TNFD_FARM_COUNT)
    #[arg(long, global = true)]
    farms: Option<usize>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct FilterArgs {
    /// Region to include, or "all"
    #[arg(long, default_value = "all")]
    region: FilterValue<Region>,

    /// Farm type to include (e.g. "organic", "Mixed Farming"), or "all"
    #[arg(long, default_value = "all")]
    farm_type: FilterValue<FarmType>,
}

impl FilterArgs {
    fn apply(self, dashboard: &mut Dashboard) -> Result<(), DashboardError> {
        dashboard.dispatch(Action::SetRegion(self.region))?;
        dashboard.dispatch(Action::SetFarmType(self.farm_type))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Portfolio summary for the filtered farms
    Summary {
        #[command(flatten)]
        filters: FilterArgs,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// List the filtered farms
    Farms {
        #[command(flatten)]
        filters: FilterArgs,
        /// Only farms in this risk bucket, riskiest first
        #[arg(long)]
        bucket: Option<RiskBucket>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show one farm
    Farm {
        /// Farm ID (e.g. FARM_001)
        id: String,
        /// Detail tab: water, biodiversity, compliance, or tnfd
        #[arg(long, default_value = "water")]
        tab: DetailTab,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// TNFD-aligned metrics for the filtered farms
    Tnfd {
        #[command(flatten)]
        filters: FilterArgs,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Performance against targets and compliance cards
    Performance {
        #[command(flatten)]
        filters: FilterArgs,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// TNFD risk threshold table
    Thresholds,
    /// Environmental scheme reference table
    Schemes {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Ask the TNFD assistant a question
    Chat {
        /// The question
        message: String,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    let mut config = DashboardConfig::from_env()?;
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(farms) = cli.farms {
        config.farm_count = farms;
    }

    log::debug!(
        "Starting dashboard with {} farms (seed {})",
        config.farm_count,
        config.seed
    );
    let mut dashboard = Dashboard::from_config(&config);

    let Some(command) = cli.command else {
        return Ok(interactive::run(&mut dashboard).await?);
    };

    run_command(&mut dashboard, command).await?;
    Ok(())
}

fn print_json(value: &impl Serialize) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run_command(dashboard: &mut Dashboard, command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Summary { filters, json } => {
            filters.apply(dashboard)?;
            let summary = dashboard.portfolio();
            if json {
                print_json(&summary)?;
            } else {
                print!("{}", render::summary(&summary));
            }
        }
        Commands::Farms {
            filters,
            bucket,
            json,
        } => {
            filters.apply(dashboard)?;
            let farms = match bucket {
                Some(bucket) => dashboard.farms_in_bucket(bucket),
                None => dashboard.filtered_farms(),
            };
            if json {
                print_json(&farms)?;
            } else {
                print!("{}", render::farm_table(&farms));
            }
        }
        Commands::Farm { id, tab, json } => {
            dashboard.dispatch(Action::SelectFarm(id))?;
            dashboard.dispatch(Action::SelectTab(tab))?;
            if let Some(farm) = dashboard.selected_farm() {
                if json {
                    print_json(farm)?;
                } else {
                    print!("{}", render::farm_detail(farm, tab));
                }
            }
        }
        Commands::Tnfd { filters, json } => {
            filters.apply(dashboard)?;
            let metrics = dashboard.tnfd_metrics();
            if json {
                print_json(&metrics)?;
            } else {
                print!("{}", render::tnfd(&metrics));
            }
        }
        Commands::Performance { filters, json } => {
            filters.apply(dashboard)?;
            let axes = dashboard.performance_profile();
            let cards = dashboard.scheme_cards();
            if json {
                print_json(&serde_json::json!({ "profile": axes, "cards": cards }))?;
            } else {
                print!("{}", render::performance(&axes));
                println!();
                print!("{}", render::scheme_cards(&cards));
            }
        }
        Commands::Thresholds => {
            print!("{}", render::thresholds(&dashboard.tables().thresholds));
        }
        Commands::Schemes { json } => {
            let schemes = &dashboard.tables().schemes;
            if json {
                print_json(schemes)?;
            } else {
                print!("{}", render::schemes(schemes));
            }
        }
        Commands::Chat { message, json } => {
            let reply = dashboard.chat(message).await?;
            if json {
                print_json(&reply)?;
            } else {
                print!("{}", render::reply(&reply));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn filter_flags_parse_names_and_all() {
        let cli = Cli::try_parse_from([
            "dairy_tnfd",
            "summary",
            "--region",
            "yorkshire",
            "--farm-type",
            "organic",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Summary { filters, json }) => {
                assert_eq!(filters.region, FilterValue::Only(Region::Yorkshire));
                assert_eq!(filters.farm_type, FilterValue::Only(FarmType::OrganicDairy));
                assert!(!json);
            }
            _ => panic!("expected summary"),
        }
    }

    #[test]
    fn unknown_region_is_rejected() {
        assert!(Cli::try_parse_from(["dairy_tnfd", "summary", "--region", "wales"]).is_err());
    }

    #[test]
    fn farm_tab_defaults_to_water_audit() {
        let cli = Cli::try_parse_from(["dairy_tnfd", "farm", "FARM_001"]).unwrap();
        match cli.command {
            Some(Commands::Farm { id, tab, .. }) => {
                assert_eq!(id, "FARM_001");
                assert_eq!(tab, DetailTab::WaterAudit);
            }
            _ => panic!("expected farm"),
        }
    }

    #[test]
    fn global_overrides_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["dairy_tnfd", "farms", "--seed", "5", "--bucket", "critical"])
            .unwrap();
        assert_eq!(cli.seed, Some(5));
        assert!(matches!(
            cli.command,
            Some(Commands::Farms {
                bucket: Some(RiskBucket::Critical),
                ..
            })
        ));
    }

    #[test]
    fn no_subcommand_means_interactive() {
        let cli = Cli::try_parse_from(["dairy_tnfd"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[tokio::test]
    async fn unknown_farm_command_fails() {
        let mut dashboard = Dashboard::from_config(&DashboardConfig::default());
        let err = run_command(
            &mut dashboard,
            Commands::Farm {
                id: "FARM_404".into(),
                tab: DetailTab::Compliance,
                json: false,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            CliError::Dashboard(DashboardError::UnknownFarm { .. })
        ));
    }
}
