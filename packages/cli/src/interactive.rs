//! Menu-driven dashboard session.
//!
//! Each menu choice becomes one or more dashboard [`Action`]s. Rejected
//! actions are reported and the menu comes back; only prompt failures end
//! the session.

use dairy_tnfd_analytics_models::FilterValue;
use dairy_tnfd_assistant::SUGGESTED_PROMPTS;
use dairy_tnfd_dashboard::{Action, Dashboard, DashboardError, DetailTab, View};
use dairy_tnfd_farm_models::{FarmType, Region};
use dialoguer::{Confirm, Input, Select};

use crate::{CliError, render};

/// Top-level entries in the dashboard menu.
enum MenuAction {
    Portfolio,
    Farms,
    FilterRegion,
    FilterFarmType,
    ResetFilters,
    ToggleFilters,
    FarmView,
    SelectFarm,
    ChangeTab,
    BackToPortfolio,
    Chat,
    ChatHistory,
    Thresholds,
    Schemes,
    Quit,
}

impl MenuAction {
    const ALL: &[Self] = &[
        Self::Portfolio,
        Self::Farms,
        Self::FilterRegion,
        Self::FilterFarmType,
        Self::ResetFilters,
        Self::ToggleFilters,
        Self::FarmView,
        Self::SelectFarm,
        Self::ChangeTab,
        Self::BackToPortfolio,
        Self::Chat,
        Self::ChatHistory,
        Self::Thresholds,
        Self::Schemes,
        Self::Quit,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Portfolio => "Portfolio overview",
            Self::Farms => "List supplier farms",
            Self::FilterRegion => "Filter by region",
            Self::FilterFarmType => "Filter by farm type",
            Self::ResetFilters => "Reset filters",
            Self::ToggleFilters => "Show/hide active filters",
            Self::FarmView => "Farm detail view",
            Self::SelectFarm => "Select a farm",
            Self::ChangeTab => "Change farm detail tab",
            Self::BackToPortfolio => "Back to portfolio view",
            Self::Chat => "Ask the TNFD assistant",
            Self::ChatHistory => "Show chat history",
            Self::Thresholds => "TNFD risk thresholds",
            Self::Schemes => "Environmental schemes",
            Self::Quit => "Quit",
        }
    }
}

/// Runs the interactive menu until the user quits.
///
/// # Errors
///
/// Returns [`CliError::Prompt`] if a terminal prompt fails.
pub async fn run(dashboard: &mut Dashboard) -> Result<(), CliError> {
    println!("UK Dairy TNFD Dashboard");
    println!("{} supplier farms loaded", dashboard.farms().len());
    println!();

    let labels: Vec<&str> = MenuAction::ALL.iter().map(MenuAction::label).collect();

    loop {
        print_header(dashboard);

        let idx = Select::new()
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(0)
            .interact()?;

        let result = match MenuAction::ALL[idx] {
            MenuAction::Portfolio => {
                show_portfolio(dashboard);
                Ok(())
            }
            MenuAction::Farms => {
                print!("{}", render::farm_table(&dashboard.filtered_farms()));
                Ok(())
            }
            MenuAction::FilterRegion => pick_region(dashboard)?,
            MenuAction::FilterFarmType => pick_farm_type(dashboard)?,
            MenuAction::ResetFilters => dashboard.dispatch(Action::ResetFilters),
            MenuAction::ToggleFilters => dashboard.dispatch(Action::ToggleFilters),
            MenuAction::FarmView => open_farm_view(dashboard)?,
            MenuAction::SelectFarm => pick_farm(dashboard)?,
            MenuAction::ChangeTab => pick_tab(dashboard)?,
            MenuAction::BackToPortfolio => dashboard.dispatch(Action::SetView(View::Portfolio)),
            MenuAction::Chat => chat(dashboard).await?,
            MenuAction::ChatHistory => {
                let transcript = &dashboard.state().transcript;
                if transcript.is_empty() {
                    println!("No messages yet.");
                } else {
                    print!("{}", render::transcript(transcript));
                }
                Ok(())
            }
            MenuAction::Thresholds => {
                print!("{}", render::thresholds(&dashboard.tables().thresholds));
                Ok(())
            }
            MenuAction::Schemes => {
                print!("{}", render::schemes(&dashboard.tables().schemes));
                Ok(())
            }
            MenuAction::Quit => {
                if confirm_quit(dashboard)? {
                    return Ok(());
                }
                Ok(())
            }
        };

        if let Err(e) = result {
            eprintln!("{e}");
        }
        println!();
    }
}

fn print_header(dashboard: &Dashboard) {
    let state = dashboard.state();
    if state.show_filters {
        println!("Filters: {}", state.filter);
    }
    if state.view == View::Farm {
        match dashboard.selected_farm() {
            Some(farm) => println!("Viewing {} ({}) [{}]", farm.name, farm.id, state.tab),
            None => println!("Farm view: no farm selected"),
        }
    }
}

fn confirm_quit(dashboard: &Dashboard) -> Result<bool, CliError> {
    let messages = dashboard.state().transcript.len();
    if messages == 0 {
        return Ok(true);
    }

    Ok(Confirm::new()
        .with_prompt(format!("Discard {messages} chat messages and quit?"))
        .default(false)
        .interact()?)
}

fn show_portfolio(dashboard: &mut Dashboard) {
    let summary = dashboard.portfolio();
    let metrics = dashboard.tnfd_metrics();
    let axes = dashboard.performance_profile();
    let cards = dashboard.scheme_cards();
    print!(
        "{}",
        render::portfolio_page(&summary, &metrics, &axes, &cards, dashboard.tables())
    );
}

fn show_selected_farm(dashboard: &Dashboard) {
    if let Some(farm) = dashboard.selected_farm() {
        print!("{}", render::farm_detail(farm, dashboard.state().tab));
    }
}

type Outcome = Result<(), DashboardError>;

fn pick_region(dashboard: &mut Dashboard) -> Result<Outcome, CliError> {
    let mut labels = vec!["All regions".to_string()];
    labels.extend(Region::all().iter().map(ToString::to_string));

    let idx = Select::new()
        .with_prompt("Region")
        .items(&labels)
        .default(0)
        .interact()?;

    let region = idx
        .checked_sub(1)
        .map_or(FilterValue::All, |i| FilterValue::Only(Region::all()[i]));
    Ok(dashboard.dispatch(Action::SetRegion(region)))
}

fn pick_farm_type(dashboard: &mut Dashboard) -> Result<Outcome, CliError> {
    let mut labels = vec!["All types".to_string()];
    labels.extend(FarmType::all().iter().map(ToString::to_string));

    let idx = Select::new()
        .with_prompt("Farm type")
        .items(&labels)
        .default(0)
        .interact()?;

    let farm_type = idx
        .checked_sub(1)
        .map_or(FilterValue::All, |i| FilterValue::Only(FarmType::all()[i]));
    Ok(dashboard.dispatch(Action::SetFarmType(farm_type)))
}

fn open_farm_view(dashboard: &mut Dashboard) -> Result<Outcome, CliError> {
    if let Err(e) = dashboard.dispatch(Action::SetView(View::Farm)) {
        return Ok(Err(e));
    }
    if dashboard.selected_farm().is_some() {
        show_selected_farm(dashboard);
        return Ok(Ok(()));
    }

    print!("{}", render::no_farm_selected());
    pick_farm(dashboard)
}

fn pick_farm(dashboard: &mut Dashboard) -> Result<Outcome, CliError> {
    if dashboard.farms().is_empty() {
        println!("No farms loaded.");
        return Ok(Ok(()));
    }

    let labels: Vec<String> = dashboard
        .farms()
        .iter()
        .map(|farm| format!("{} ({}, {})", farm.name, farm.id, farm.region))
        .collect();

    let idx = Select::new()
        .with_prompt("Farm")
        .items(&labels)
        .default(0)
        .max_length(15)
        .interact()?;

    let id = dashboard.farms()[idx].id.clone();
    let outcome = dashboard.dispatch(Action::SelectFarm(id));
    if outcome.is_ok() {
        show_selected_farm(dashboard);
    }
    Ok(outcome)
}

fn pick_tab(dashboard: &mut Dashboard) -> Result<Outcome, CliError> {
    let labels: Vec<String> = DetailTab::all().iter().map(ToString::to_string).collect();
    let current = DetailTab::all()
        .iter()
        .position(|tab| *tab == dashboard.state().tab)
        .unwrap_or(0);

    let idx = Select::new()
        .with_prompt("Detail tab")
        .items(&labels)
        .default(current)
        .interact()?;

    let outcome = dashboard.dispatch(Action::SelectTab(DetailTab::all()[idx]));
    if outcome.is_ok() {
        show_selected_farm(dashboard);
    }
    Ok(outcome)
}

async fn chat(dashboard: &mut Dashboard) -> Result<Outcome, CliError> {
    let suggested = suggested_prompts(dashboard);
    let mut labels: Vec<&str> = suggested.to_vec();
    labels.push("Type a question...");

    let idx = Select::new()
        .with_prompt("Ask the TNFD assistant")
        .items(&labels)
        .default(0)
        .interact()?;

    let message = match suggested.get(idx) {
        Some(prompt) => (*prompt).to_string(),
        None => Input::<String>::new()
            .with_prompt("Question")
            .allow_empty(true)
            .interact_text()?,
    };

    println!("Thinking...");
    match dashboard.chat(message).await {
        Ok(reply) => {
            print!("{}", render::reply(&reply));
            Ok(Ok(()))
        }
        Err(e) => Ok(Err(e)),
    }
}

/// Starter prompts are only offered before the first message.
fn suggested_prompts(dashboard: &Dashboard) -> &'static [&'static str] {
    if dashboard.state().transcript.is_empty() {
        SUGGESTED_PROMPTS
    } else {
        &[]
    }
}

#[cfg(test)]
mod tests {
    use dairy_tnfd_dashboard::DashboardConfig;

    use super::*;

    fn dashboard() -> Dashboard {
        Dashboard::from_config(&DashboardConfig {
            seed: 3,
            farm_count: 4,
            chat_latency_ms: 0,
        })
    }

    #[test]
    fn every_menu_entry_has_a_label() {
        let labels: Vec<&str> = MenuAction::ALL.iter().map(MenuAction::label).collect();
        assert!(labels.contains(&"Show chat history"));
        assert!(labels.iter().all(|label| !label.is_empty()));
    }

    #[tokio::test(start_paused = true)]
    async fn suggested_prompts_only_before_first_message() {
        let mut dashboard = dashboard();
        assert_eq!(suggested_prompts(&dashboard), SUGGESTED_PROMPTS);

        dashboard.chat(SUGGESTED_PROMPTS[0].to_string()).await.unwrap();
        assert!(suggested_prompts(&dashboard).is_empty());
    }
}
