#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dairy TNFD dashboard session.
//!
//! [`Dashboard`] ties together one immutable record set, the current
//! [`DashboardState`], a [`SummaryCache`], and the chat assistant. Front
//! ends drive it with [`Action`]s and read derived views back out.

pub mod config;
pub mod state;

use std::sync::Arc;

use chrono::Utc;
use dairy_tnfd_analytics::aggregate::{
    farms_in_bucket, filter_farms, performance_profile, scheme_cards, tnfd_metrics,
};
use dairy_tnfd_analytics::cache::{CacheStats, SummaryCache};
use dairy_tnfd_analytics_models::{
    PerformanceAxis, PortfolioSummary, SchemeCardView, TnfdMetrics,
};
use dairy_tnfd_assistant::{AssistantReply, MockAssistant};
use dairy_tnfd_farm_models::{FarmRecord, RiskBucket};
use dairy_tnfd_generate::{GenerateOptions, generate_sample_farms};
use dairy_tnfd_reference::{ReferenceTables, reference_tables};

pub use config::{ConfigError, DashboardConfig};
pub use state::{Action, DashboardError, DashboardState, DetailTab, View};

/// One dashboard session.
#[derive(Debug)]
pub struct Dashboard {
    farms: Arc<[FarmRecord]>,
    state: DashboardState,
    cache: SummaryCache,
    assistant: MockAssistant,
    tables: &'static ReferenceTables,
}

impl Dashboard {
    /// Starts a session over `farms`.
    #[must_use]
    pub fn new(farms: impl Into<Arc<[FarmRecord]>>, assistant: MockAssistant) -> Self {
        Self {
            farms: farms.into(),
            state: DashboardState::default(),
            cache: SummaryCache::new(),
            assistant,
            tables: reference_tables(),
        }
    }

    /// Starts a session over a freshly generated sample portfolio.
    #[must_use]
    pub fn from_config(config: &DashboardConfig) -> Self {
        let farms = generate_sample_farms(&GenerateOptions {
            count: config.farm_count,
            seed: config.seed,
            now: Utc::now(),
        });
        log::info!("Loaded {} sample farms", farms.len());
        Self::new(farms, MockAssistant::new(config.chat_latency()))
    }

    /// Every farm in the session, unfiltered.
    #[must_use]
    pub fn farms(&self) -> &[FarmRecord] {
        &self.farms
    }

    #[must_use]
    pub const fn state(&self) -> &DashboardState {
        &self.state
    }

    #[must_use]
    pub const fn tables(&self) -> &'static ReferenceTables {
        self.tables
    }

    /// Applies `action`. On error the state is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError`] if the action is rejected.
    pub fn dispatch(&mut self, action: Action) -> Result<(), DashboardError> {
        self.state = self.state.clone().apply(action, &self.farms)?;
        Ok(())
    }

    /// Replaces the record set. Cached summaries are dropped and a selected
    /// farm that no longer exists is cleared.
    pub fn replace_farms(&mut self, farms: impl Into<Arc<[FarmRecord]>>) {
        self.farms = farms.into();
        self.cache.invalidate();
        let stale = self
            .state
            .selected_farm
            .as_ref()
            .is_some_and(|id| !self.farms.iter().any(|farm| &farm.id == id));
        if stale {
            self.state.selected_farm = None;
            self.state.view = View::Portfolio;
        }
    }

    /// Farms passing the current filter, in record order.
    #[must_use]
    pub fn filtered_farms(&self) -> Vec<&FarmRecord> {
        filter_farms(&self.farms, &self.state.filter)
    }

    /// Summary of the filtered farms, served from the cache when possible.
    pub fn portfolio(&mut self) -> PortfolioSummary {
        self.cache.get_or_compute(&self.farms, &self.state.filter)
    }

    /// TNFD metrics of the filtered farms.
    #[must_use]
    pub fn tnfd_metrics(&self) -> TnfdMetrics {
        tnfd_metrics(&self.filtered_farms())
    }

    /// Current-versus-target profile of the filtered farms.
    pub fn performance_profile(&mut self) -> Vec<PerformanceAxis> {
        let summary = self.portfolio();
        performance_profile(&summary, &self.tnfd_metrics(), self.tables)
    }

    /// Compliance cards for the filtered farms.
    pub fn scheme_cards(&mut self) -> Vec<SchemeCardView> {
        let summary = self.portfolio();
        scheme_cards(&summary, self.tables)
    }

    /// Filtered farms in `bucket`, riskiest first.
    #[must_use]
    pub fn farms_in_bucket(&self, bucket: RiskBucket) -> Vec<&FarmRecord> {
        farms_in_bucket(&self.filtered_farms(), bucket)
    }

    /// The selected farm, if any. Ignores the filter.
    #[must_use]
    pub fn selected_farm(&self) -> Option<&FarmRecord> {
        let id = self.state.selected_farm.as_deref()?;
        self.farms.iter().find(|farm| farm.id == id)
    }

    #[must_use]
    pub const fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Submits `message`, waits for the assistant's reply task, and records
    /// the reply. If the task fails the submission is rolled back.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::EmptyMessage`] or
    /// [`DashboardError::ReplyPending`] if the message is not accepted, and
    /// [`DashboardError::ReplyFailed`] if the reply task does not complete.
    pub async fn chat(&mut self, message: String) -> Result<AssistantReply, DashboardError> {
        let before = self.state.clone();
        self.dispatch(Action::SubmitChat(message.clone()))?;

        let reply = match self.assistant.spawn_reply(message).await {
            Ok(reply) => reply,
            Err(e) => {
                log::warn!("Assistant reply task failed: {e}");
                self.state = before;
                return Err(DashboardError::ReplyFailed {
                    message: e.to_string(),
                });
            }
        };

        self.dispatch(Action::ReceiveReply(reply.clone()))?;
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use dairy_tnfd_analytics_models::FilterValue;
    use dairy_tnfd_farm_models::Region;

    use super::*;

    fn dashboard() -> Dashboard {
        Dashboard::from_config(&DashboardConfig {
            seed: 11,
            farm_count: 20,
            chat_latency_ms: 0,
        })
    }

    #[test]
    fn unfiltered_portfolio_covers_every_farm() {
        let mut dashboard = dashboard();
        let summary = dashboard.portfolio();
        assert_eq!(summary.farm_count, 20);
        assert_eq!(summary.risk_distribution.total(), 20);
    }

    #[test]
    fn filter_changes_summary_and_caches_per_filter() {
        let mut dashboard = dashboard();
        let all = dashboard.portfolio();

        dashboard
            .dispatch(Action::SetRegion(FilterValue::Only(Region::Yorkshire)))
            .unwrap();
        let yorkshire = dashboard.portfolio();
        assert_eq!(yorkshire.farm_count, 4);
        assert!(yorkshire.farm_count < all.farm_count);

        dashboard.dispatch(Action::ResetFilters).unwrap();
        assert_eq!(dashboard.portfolio(), all);
        assert_eq!(dashboard.cache_stats(), CacheStats { hits: 1, misses: 2 });
    }

    #[test]
    fn rejected_action_leaves_state_untouched() {
        let mut dashboard = dashboard();
        dashboard.dispatch(Action::ToggleFilters).unwrap();
        let before = dashboard.state().clone();

        assert!(dashboard.dispatch(Action::SelectFarm("nope".into())).is_err());
        assert_eq!(dashboard.state(), &before);
    }

    #[test]
    fn selected_farm_resolves_regardless_of_filter() {
        let mut dashboard = dashboard();
        dashboard.dispatch(Action::SelectFarm("FARM_002".into())).unwrap();
        dashboard
            .dispatch(Action::SetRegion(FilterValue::Only(Region::Southeast)))
            .unwrap();

        let farm = dashboard.selected_farm().unwrap();
        assert_eq!(farm.id, "FARM_002");
        assert_eq!(farm.region, Region::Northwest);
    }

    #[test]
    fn replacing_farms_invalidates_and_clears_stale_selection() {
        let mut dashboard = dashboard();
        dashboard.dispatch(Action::SelectFarm("FARM_015".into())).unwrap();
        dashboard.portfolio();

        let fewer = generate_sample_farms(&GenerateOptions {
            count: 3,
            seed: 1,
            now: Utc::now(),
        });
        dashboard.replace_farms(fewer);

        assert_eq!(dashboard.portfolio().farm_count, 3);
        assert!(dashboard.selected_farm().is_none());
        assert_eq!(dashboard.state().view, View::Portfolio);
    }

    #[test]
    fn derived_views_follow_reference_tables() {
        let mut dashboard = dashboard();
        assert_eq!(dashboard.performance_profile().len(), 5);
        assert_eq!(dashboard.scheme_cards().len(), dashboard.tables().cards.len());
    }

    #[test]
    fn bucket_listing_uses_filtered_farms() {
        let dashboard = dashboard();
        let total: usize = RiskBucket::all()
            .iter()
            .map(|bucket| dashboard.farms_in_bucket(*bucket).len())
            .sum();
        assert_eq!(total, dashboard.filtered_farms().len());
    }

    #[tokio::test(start_paused = true)]
    async fn chat_records_both_sides() {
        let mut dashboard = Dashboard::new(
            generate_sample_farms(&GenerateOptions::default()),
            MockAssistant::new(Duration::from_millis(1000)),
        );

        let reply = dashboard.chat("What needs attention?".into()).await.unwrap();

        assert_eq!(reply, AssistantReply::demo());
        assert_eq!(dashboard.state().transcript.len(), 2);
        assert!(!dashboard.state().awaiting_reply);
    }

    #[tokio::test(start_paused = true)]
    async fn chat_waits_for_spawned_reply() {
        let mut dashboard = Dashboard::new(
            generate_sample_farms(&GenerateOptions::default()),
            MockAssistant::new(Duration::from_millis(400)),
        );
        let started = tokio::time::Instant::now();

        dashboard.chat("  Which schemes fit?  ".into()).await.unwrap();

        assert!(started.elapsed() >= Duration::from_millis(400));
        assert_eq!(dashboard.state().transcript[0].content, "Which schemes fit?");
    }

    #[tokio::test(start_paused = true)]
    async fn blank_chat_never_reaches_assistant() {
        let mut dashboard = dashboard();
        let err = dashboard.chat("   ".into()).await.unwrap_err();
        assert_eq!(err, DashboardError::EmptyMessage);
        assert!(dashboard.state().transcript.is_empty());
    }
}
