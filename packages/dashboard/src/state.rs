//! Dashboard UI state as an immutable value.
//!
//! Every user interaction is an [`Action`]; [`DashboardState::apply`] turns
//! the current state and an action into the next state or rejects the
//! action. Nothing else mutates a state.

use dairy_tnfd_analytics_models::{FilterSelection, FilterValue};
use dairy_tnfd_assistant::{AssistantReply, ChatMessage};
use dairy_tnfd_farm_models::{FarmRecord, FarmType, Region};
use strum_macros::{AsRefStr, Display, EnumString};
use thiserror::Error;

/// Rejected state transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DashboardError {
    /// Chat message was empty or whitespace.
    #[error("Chat message is empty")]
    EmptyMessage,

    /// A chat message was submitted while the previous one is unanswered.
    #[error("Still waiting for a reply to the previous message")]
    ReplyPending,

    /// A reply arrived with no message awaiting one.
    #[error("Received a reply but no message is awaiting one")]
    NoReplyPending,

    /// Farm id not present in the record set.
    #[error("Unknown farm '{id}'")]
    UnknownFarm {
        /// Requested id.
        id: String,
    },

    /// The assistant task ended without producing a reply.
    #[error("Assistant reply failed: {message}")]
    ReplyFailed {
        /// Why the task ended.
        message: String,
    },
}

/// Top-level page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum View {
    /// Portfolio overview across the filtered farms.
    #[default]
    Portfolio,
    /// Detail of the selected farm, or a farm picker when none is selected.
    Farm,
}

/// Tab shown in the farm detail view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, AsRefStr)]
#[strum(ascii_case_insensitive)]
pub enum DetailTab {
    /// Water efficiency and estimated usage.
    #[default]
    #[strum(to_string = "Water Audit", serialize = "water")]
    WaterAudit,
    /// Biodiversity score and habitat estimates.
    #[strum(to_string = "Biodiversity", serialize = "biodiversity")]
    Biodiversity,
    /// Compliance flags.
    #[strum(to_string = "Compliance", serialize = "compliance")]
    Compliance,
    /// Farm-level TNFD metrics.
    #[strum(to_string = "TNFD Metrics", serialize = "tnfd")]
    TnfdMetrics,
}

impl DetailTab {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::WaterAudit,
            Self::Biodiversity,
            Self::Compliance,
            Self::TnfdMetrics,
        ]
    }
}

/// A user interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Restricts the portfolio to one region, or all.
    SetRegion(FilterValue<Region>),
    /// Restricts the portfolio to one farm type, or all.
    SetFarmType(FilterValue<FarmType>),
    /// Clears both filters.
    ResetFilters,
    /// Shows or hides the filter panel.
    ToggleFilters,
    /// Switches the top-level page. The selection is kept.
    SetView(View),
    /// Selects a farm by id and switches to the farm view.
    SelectFarm(String),
    /// Switches the farm detail tab.
    SelectTab(DetailTab),
    /// Sends a chat message to the assistant.
    SubmitChat(String),
    /// Records the assistant's answer to the pending message.
    ReceiveReply(AssistantReply),
}

/// Everything the dashboard shows besides the records themselves.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    /// Active region and farm-type filter.
    pub filter: FilterSelection,
    /// Whether the filter panel is open.
    pub show_filters: bool,
    /// Current page.
    pub view: View,
    /// Id of the farm shown in the farm view.
    pub selected_farm: Option<String>,
    /// Current farm detail tab.
    pub tab: DetailTab,
    /// Chat history, oldest first.
    pub transcript: Vec<ChatMessage>,
    /// Whether a submitted message is still unanswered.
    pub awaiting_reply: bool,
}

impl DashboardState {
    /// Applies `action`, checking farm ids against `farms`.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError`] if the action is not valid in this state.
    pub fn apply(mut self, action: Action, farms: &[FarmRecord]) -> Result<Self, DashboardError> {
        log::debug!("Applying {action:?}");

        match action {
            Action::SetRegion(region) => {
                self.filter = self.filter.with_region(region);
            }
            Action::SetFarmType(farm_type) => {
                self.filter = self.filter.with_farm_type(farm_type);
            }
            Action::ResetFilters => {
                self.filter = FilterSelection::all();
            }
            Action::ToggleFilters => {
                self.show_filters = !self.show_filters;
            }
            Action::SetView(view) => {
                self.view = view;
            }
            Action::SelectFarm(id) => {
                if !farms.iter().any(|farm| farm.id == id) {
                    return Err(DashboardError::UnknownFarm { id });
                }
                self.selected_farm = Some(id);
                self.view = View::Farm;
            }
            Action::SelectTab(tab) => {
                self.tab = tab;
            }
            Action::SubmitChat(message) => {
                let message = message.trim();
                if message.is_empty() {
                    return Err(DashboardError::EmptyMessage);
                }
                if self.awaiting_reply {
                    return Err(DashboardError::ReplyPending);
                }
                self.transcript.push(ChatMessage::user(message));
                self.awaiting_reply = true;
            }
            Action::ReceiveReply(reply) => {
                if !self.awaiting_reply {
                    return Err(DashboardError::NoReplyPending);
                }
                self.transcript.push(reply.into());
                self.awaiting_reply = false;
            }
        }

        Ok(self)
    }
}
