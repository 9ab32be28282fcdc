#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Static reference tables for the dairy-tnfd dashboard.
//!
//! The tables are read-only configuration: TNFD risk thresholds per nature
//! risk category, the environmental schemes farms can enroll in, the
//! compliance cards shown on the portfolio view, and the performance targets
//! the portfolio is measured against.
//!
//! Each table lives in a `.toml` file under `packages/reference/tables/` and
//! is baked into the binary at compile time via [`include_str!`].

pub mod schemes;
pub mod targets;
pub mod thresholds;

use std::sync::LazyLock;

use thiserror::Error;

pub use schemes::{CardRate, ComplianceCard, EnvironmentalScheme};
pub use targets::{CardStatus, CardStatusCutoffs, PerformanceTargets};
pub use thresholds::{RiskCategory, SeverityCutoffs, ThresholdTable};

const THRESHOLDS_TOML: &str = include_str!("../tables/thresholds.toml");
const SCHEMES_TOML: &str = include_str!("../tables/schemes.toml");
const TARGETS_TOML: &str = include_str!("../tables/targets.toml");

/// Errors raised while loading reference tables.
#[derive(Debug, Error)]
pub enum ReferenceError {
    /// A table failed to parse.
    #[error("Failed to parse {table} table: {source}")]
    Parse {
        /// Which table was being parsed.
        table: &'static str,
        /// Underlying TOML error.
        source: toml::de::Error,
    },

    /// A table parsed but its contents are inconsistent.
    #[error("Invalid {table} table: {message}")]
    Invalid {
        /// Which table was being validated.
        table: &'static str,
        /// Description of what went wrong.
        message: String,
    },
}

/// All reference tables, loaded together.
#[derive(Debug, Clone)]
pub struct ReferenceTables {
    /// TNFD risk thresholds per category.
    pub thresholds: ThresholdTable,
    /// Environmental schemes, in table order.
    pub schemes: Vec<EnvironmentalScheme>,
    /// Compliance cards, resolved against `schemes`.
    pub cards: Vec<ComplianceCard>,
    /// Performance targets and baselines.
    pub targets: PerformanceTargets,
    /// Rate cutoffs for compliance card status.
    pub card_status: CardStatusCutoffs,
}

impl ReferenceTables {
    /// Looks up a scheme by its short code (e.g. `"SFI"`), case-insensitively.
    #[must_use]
    pub fn scheme(&self, code: &str) -> Option<&EnvironmentalScheme> {
        self.schemes
            .iter()
            .find(|scheme| scheme.code.eq_ignore_ascii_case(code))
    }
}

/// Parses and validates the embedded tables.
///
/// # Errors
///
/// Returns [`ReferenceError`] if any embedded table is malformed.
pub fn load() -> Result<ReferenceTables, ReferenceError> {
    let thresholds = thresholds::parse_thresholds(THRESHOLDS_TOML)?;
    let (schemes, cards) = schemes::parse_schemes(SCHEMES_TOML)?;
    let (targets, card_status) = targets::parse_targets(TARGETS_TOML)?;

    log::debug!(
        "Loaded reference tables: {} threshold categories, {} schemes, {} cards",
        thresholds.len(),
        schemes.len(),
        cards.len()
    );

    Ok(ReferenceTables {
        thresholds,
        schemes,
        cards,
        targets,
        card_status,
    })
}

static TABLES: LazyLock<ReferenceTables> =
    LazyLock::new(|| load().unwrap_or_else(|e| panic!("Embedded reference tables: {e}")));

/// Returns the process-wide reference tables.
///
/// # Panics
///
/// Panics if an embedded table is malformed (this is a compile-time
/// guarantee since the tables are embedded).
#[must_use]
pub fn reference_tables() -> &'static ReferenceTables {
    &TABLES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_tables_load() {
        let tables = load().unwrap();
        assert_eq!(tables.thresholds.len(), RiskCategory::all().len());
        assert_eq!(tables.schemes.len(), 3);
        assert_eq!(tables.cards.len(), 3);
    }

    #[test]
    fn scheme_lookup_is_case_insensitive() {
        let tables = reference_tables();
        let sfi = tables.scheme("sfi").unwrap();
        assert_eq!(sfi.name, "Sustainable Farming Incentive");
        assert_eq!(sfi.payment_rate, "£25-£115/ha");
        assert!(tables.scheme("XYZ").is_none());
    }
}
