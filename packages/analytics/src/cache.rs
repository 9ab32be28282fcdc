//! Per-filter memo table for portfolio summaries.
//!
//! Summaries are pure functions of `(records, filter)`, so one computed
//! summary can be reused until the record set changes. The cache remembers
//! which record set its entries belong to and drops them all as soon as it
//! is handed a different one.

use std::collections::HashMap;
use std::sync::Arc;

use dairy_tnfd_analytics_models::{FilterSelection, PortfolioSummary};
use dairy_tnfd_farm_models::FarmRecord;

use crate::aggregate::{filter_farms, summarize_subset};

/// Hit/miss counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the table.
    pub hits: u64,
    /// Lookups that had to compute.
    pub misses: u64,
}

/// Memoized summaries keyed by filter selection.
#[derive(Debug, Default)]
pub struct SummaryCache {
    records: Option<Arc<[FarmRecord]>>,
    entries: HashMap<FilterSelection, PortfolioSummary>,
    generation: u64,
    stats: CacheStats,
}

impl SummaryCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the summary for `filter` over `records`, computing and
    /// storing it on a miss.
    ///
    /// If `records` is not the record set the current entries were
    /// computed from, the table is invalidated first.
    pub fn get_or_compute(
        &mut self,
        records: &Arc<[FarmRecord]>,
        filter: &FilterSelection,
    ) -> PortfolioSummary {
        let same_records = self
            .records
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, records));
        if !same_records {
            self.invalidate();
            self.records = Some(Arc::clone(records));
        }

        if let Some(summary) = self.entries.get(filter) {
            self.stats.hits += 1;
            log::trace!("Summary cache hit for {filter}");
            return *summary;
        }

        self.stats.misses += 1;
        log::trace!("Summary cache miss for {filter}");
        let summary = summarize_subset(&filter_farms(records, filter));
        self.entries.insert(*filter, summary);
        summary
    }

    /// Drops every entry and forgets the bound record set.
    pub fn invalidate(&mut self) {
        if self.records.is_some() || !self.entries.is_empty() {
            log::debug!(
                "Invalidating summary cache generation {} ({} entries)",
                self.generation,
                self.entries.len()
            );
        }
        self.entries.clear();
        self.records = None;
        self.generation += 1;
    }

    /// Number of times the cache has been invalidated.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of cached summaries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no summaries are cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Hit/miss counters since creation.
    #[must_use]
    pub const fn stats(&self) -> CacheStats {
        self.stats
    }
}
