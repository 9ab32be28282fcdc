//! Plain-text rendering of dashboard views.
//!
//! Every function returns a `String` so output can be printed, paged, or
//! asserted on. Colors come from `console` and are dropped automatically
//! when stdout is not a terminal.

use std::fmt::Write as _;

use console::style;
use dairy_tnfd_analytics::aggregate::tnfd_metrics;
use dairy_tnfd_analytics_models::{
    PerformanceAxis, PortfolioSummary, SchemeCardView, TnfdMetrics,
};
use dairy_tnfd_assistant::{AssistantReply, ChatMessage, ChatRole};
use dairy_tnfd_dashboard::DetailTab;
use dairy_tnfd_farm_models::{ComplianceFlag, FarmRecord, RiskBucket};
use dairy_tnfd_reference::{CardStatus, EnvironmentalScheme, ReferenceTables, ThresholdTable};

/// Pollinator support is reported as "High" at or above this share.
const POLLINATOR_HIGH_SHARE: f64 = 50.0;

/// Footprint (kg CO2e/ha) at which carbon risk starts to register.
const CARBON_RISK_FLOOR: f64 = 800.0;

/// Carbon footprint mapped onto the 0-100 risk scale.
fn carbon_risk(footprint: f64) -> f64 {
    (footprint - CARBON_RISK_FLOOR) / 10.0
}

/// Colored risk bucket label.
#[must_use]
pub fn risk_badge(bucket: RiskBucket) -> String {
    let label = style(format!(" {bucket} ")).bold();
    match bucket {
        RiskBucket::Low => label.black().on_green(),
        RiskBucket::Medium => label.black().on_yellow(),
        RiskBucket::High => label.black().on_color256(208),
        RiskBucket::Critical => label.white().on_red(),
    }
    .to_string()
}

fn compliance_badge(ok: bool) -> String {
    if ok {
        style("Compliant").green().to_string()
    } else {
        style("Action Required").red().to_string()
    }
}

fn card_status_badge(status: CardStatus) -> String {
    let label = style(status.to_string());
    match status {
        CardStatus::OnTrack => label.green(),
        CardStatus::AtRisk => label.yellow(),
        CardStatus::ActionRequired => label.red(),
    }
    .to_string()
}

/// Portfolio overview: headline totals, averages, and the risk distribution.
#[must_use]
pub fn summary(summary: &PortfolioSummary) -> String {
    let mut out = String::new();

    if summary.is_empty() {
        writeln!(out, "No farms match the current filters.").unwrap();
    }

    writeln!(out, "{}", style("Portfolio Overview").bold()).unwrap();
    writeln!(out, "  Supplier farms      {}", summary.farm_count).unwrap();
    writeln!(out, "  Total area          {:.0} ha", summary.total_area_ha).unwrap();
    writeln!(out, "  Dairy cows          {}", summary.total_herd_size).unwrap();
    writeln!(
        out,
        "  Annual milk         {:.1} M L",
        summary.total_milk_million_liters
    )
    .unwrap();
    writeln!(out, "  Open alerts         {}", summary.total_alerts).unwrap();
    writeln!(out).unwrap();

    writeln!(out, "{}", style("Averages").bold()).unwrap();
    writeln!(out, "  Biodiversity        {:.1}/100", summary.avg_biodiversity).unwrap();
    writeln!(out, "  Water efficiency    {:.1}%", summary.avg_water_efficiency).unwrap();
    writeln!(
        out,
        "  Nutrient efficiency {:.1}%",
        summary.avg_nutrient_efficiency
    )
    .unwrap();
    writeln!(out).unwrap();

    writeln!(out, "{}", style("Compliance").bold()).unwrap();
    for flag in ComplianceFlag::all() {
        writeln!(
            out,
            "  {:<19} {:.1}%",
            flag.label(),
            summary.compliance_rates.get(*flag)
        )
        .unwrap();
    }
    writeln!(out).unwrap();

    writeln!(out, "{}", style("Nature Risk Distribution").bold()).unwrap();
    for bucket in RiskBucket::all() {
        writeln!(
            out,
            "  {} {}",
            risk_badge(*bucket),
            summary.risk_distribution.get(*bucket)
        )
        .unwrap();
    }
    writeln!(
        out,
        "  High-risk farms: {} ({:.1}%)",
        summary.high_risk_farms, summary.high_risk_share
    )
    .unwrap();

    out
}

/// One row per farm.
#[must_use]
pub fn farm_table(farms: &[&FarmRecord]) -> String {
    let mut out = String::new();

    if farms.is_empty() {
        writeln!(out, "No farms found.").unwrap();
        return out;
    }

    writeln!(
        out,
        "{:<9} {:<24} {:<10} {:<16} {:>6} {:>5}  RISK",
        "ID", "NAME", "REGION", "TYPE", "HERD", "SCORE"
    )
    .unwrap();
    writeln!(out, "{}", "-".repeat(90)).unwrap();

    for farm in farms {
        writeln!(
            out,
            "{:<9} {:<24} {:<10} {:<16} {:>6} {:>5.0}  {}",
            farm.id,
            farm.name,
            farm.region,
            farm.farm_type,
            farm.herd_size,
            farm.metrics.risk_score,
            risk_badge(farm.risk_bucket())
        )
        .unwrap();
    }

    writeln!(out, "\n{} farm(s)", farms.len()).unwrap();
    out
}

/// Metric cards for one farm followed by the requested detail tab.
#[must_use]
pub fn farm_detail(farm: &FarmRecord, tab: DetailTab) -> String {
    let mut out = String::new();

    writeln!(
        out,
        "{} ({})  {}",
        style(&farm.name).bold(),
        farm.id,
        risk_badge(farm.risk_bucket())
    )
    .unwrap();
    writeln!(
        out,
        "  {} | {} | {:.0} ha | {} cows | {:.0} L/cow",
        farm.region, farm.farm_type, farm.area_ha, farm.herd_size, farm.milk_yield_per_cow
    )
    .unwrap();
    writeln!(
        out,
        "  Updated {} | {} open alert(s)",
        farm.last_updated.format("%Y-%m-%d %H:%M"),
        farm.alerts
    )
    .unwrap();
    writeln!(out).unwrap();

    let metrics = &farm.metrics;
    writeln!(
        out,
        "  Biodiversity Score  {:.1}/100  {}",
        metrics.biodiversity_score,
        risk_badge(RiskBucket::from_score(100.0 - metrics.biodiversity_score))
    )
    .unwrap();
    writeln!(
        out,
        "  Water Efficiency    {:.1}%  {}",
        metrics.water_efficiency,
        risk_badge(RiskBucket::from_score(100.0 - metrics.water_efficiency))
    )
    .unwrap();
    writeln!(out, "  Nutrient Efficiency {:.1}%", metrics.nutrient_efficiency).unwrap();
    writeln!(
        out,
        "  Carbon Footprint    {:.2} tCO2e/ha  {}",
        metrics.carbon_footprint / 1000.0,
        risk_badge(RiskBucket::from_score(carbon_risk(metrics.carbon_footprint)))
    )
    .unwrap();
    writeln!(out).unwrap();

    writeln!(out, "{}", style(format!("[{tab}]")).cyan().bold()).unwrap();
    match tab {
        DetailTab::WaterAudit => {
            writeln!(out, "  Water efficiency    {:.1}%", metrics.water_efficiency).unwrap();
            writeln!(
                out,
                "  Permit status       {}",
                if farm.compliance.water_permit {
                    style("Valid").green().to_string()
                } else {
                    style("Missing").red().to_string()
                }
            )
            .unwrap();
        }
        DetailTab::Biodiversity => {
            writeln!(out, "  Biodiversity score  {:.1}/100", metrics.biodiversity_score).unwrap();
            writeln!(out, "  Soil health index   {:.2}", metrics.soil_health).unwrap();
            writeln!(
                out,
                "  Nutrient efficiency {:.1}%",
                metrics.nutrient_efficiency
            )
            .unwrap();
        }
        DetailTab::Compliance => {
            for flag in ComplianceFlag::all() {
                writeln!(
                    out,
                    "  {:<15} {:<38} {}",
                    flag.label(),
                    flag.description(),
                    compliance_badge(farm.compliance.get(*flag))
                )
                .unwrap();
            }
        }
        DetailTab::TnfdMetrics => {
            out.push_str(&tnfd(&tnfd_metrics(&[farm])));
        }
    }

    out
}

/// Placeholder for the farm view when no farm is selected.
#[must_use]
pub fn no_farm_selected() -> String {
    let mut out = String::new();
    writeln!(out, "{}", style("Select a Farm").bold()).unwrap();
    writeln!(
        out,
        "  Choose a farm to view its detailed environmental metrics."
    )
    .unwrap();
    out
}

/// TNFD-aligned metric groups.
#[must_use]
pub fn tnfd(metrics: &TnfdMetrics) -> String {
    let mut out = String::new();

    writeln!(out, "{}", style("Land & Ecosystems").green().bold()).unwrap();
    writeln!(
        out,
        "  Natural habitat       {:.1} ha",
        metrics.land.natural_habitat_ha
    )
    .unwrap();
    writeln!(
        out,
        "  Connectivity score    {:.1}/10",
        metrics.land.ecosystem_connectivity * 10.0
    )
    .unwrap();
    writeln!(out, "  Soil health index     {:.2}", metrics.land.soil_health).unwrap();

    writeln!(out, "{}", style("Water Systems").blue().bold()).unwrap();
    writeln!(
        out,
        "  Withdrawal intensity  {:.0} L/day",
        metrics.water.withdrawal_intensity_l_per_day
    )
    .unwrap();
    writeln!(
        out,
        "  Treatment efficiency  {:.1}%",
        metrics.water.treatment_efficiency
    )
    .unwrap();
    writeln!(
        out,
        "  Discharge quality     {:.1}% permitted",
        metrics.water.discharge_quality
    )
    .unwrap();

    writeln!(out, "{}", style("Biodiversity Impact").magenta().bold()).unwrap();
    writeln!(
        out,
        "  Intactness index      {:.1}/100",
        metrics.biodiversity.intactness_index
    )
    .unwrap();
    writeln!(
        out,
        "  Species richness      {:.0} species",
        metrics.biodiversity.species_richness
    )
    .unwrap();
    let pollinator = metrics.biodiversity.pollinator_support;
    writeln!(
        out,
        "  Pollinator support    {:.1}% ({})",
        pollinator,
        if pollinator >= POLLINATOR_HIGH_SHARE {
            "High"
        } else {
            "Low"
        }
    )
    .unwrap();

    out
}

/// Current-versus-target table.
#[must_use]
pub fn performance(axes: &[PerformanceAxis]) -> String {
    let mut out = String::new();

    writeln!(out, "{}", style("Environmental Performance").bold()).unwrap();
    writeln!(out, "  {:<20} {:>8} {:>8}", "DIMENSION", "CURRENT", "TARGET").unwrap();
    for axis in axes {
        let current = format!("{:>8.1}", axis.current);
        let current = if axis.current >= axis.target {
            style(current).green()
        } else {
            style(current).yellow()
        };
        writeln!(
            out,
            "  {:<20} {} {:>8.1}",
            axis.dimension.to_string(),
            current,
            axis.target
        )
        .unwrap();
    }

    out
}

/// Compliance cards with their computed rates.
#[must_use]
pub fn scheme_cards(cards: &[SchemeCardView]) -> String {
    let mut out = String::new();

    for card in cards {
        writeln!(
            out,
            "{}  {:.1}%  {}",
            style(&card.title).bold(),
            card.rate,
            card_status_badge(card.status)
        )
        .unwrap();
        for requirement in &card.requirements {
            writeln!(out, "  - {requirement}").unwrap();
        }
        writeln!(out, "  {}", card.payment_rate).unwrap();
        writeln!(out).unwrap();
    }

    out
}

/// Environmental scheme reference table.
#[must_use]
pub fn schemes(schemes: &[EnvironmentalScheme]) -> String {
    let mut out = String::new();

    for scheme in schemes {
        writeln!(out, "{} ({})", style(&scheme.name).bold(), scheme.code).unwrap();
        writeln!(out, "  Requirements: {}", scheme.requirements.join(", ")).unwrap();
        writeln!(out, "  Payment:      {}", scheme.payment_rate).unwrap();
    }

    out
}

/// TNFD risk threshold table.
#[must_use]
pub fn thresholds(table: &ThresholdTable) -> String {
    let mut out = String::new();

    writeln!(
        out,
        "{:<20} {:>8} {:>8} {:>8} {:>8}",
        "CATEGORY", "LOW", "MEDIUM", "HIGH", "CRITICAL"
    )
    .unwrap();
    for (category, cutoffs) in table.iter() {
        writeln!(
            out,
            "{:<20} {:>8} {:>8} {:>8} {:>8}",
            category.label(),
            cutoffs.low,
            cutoffs.medium,
            cutoffs.high,
            cutoffs.critical
        )
        .unwrap();
    }

    out
}

/// Everything on the portfolio page.
#[must_use]
pub fn portfolio_page(
    portfolio: &PortfolioSummary,
    metrics: &TnfdMetrics,
    axes: &[PerformanceAxis],
    cards: &[SchemeCardView],
    tables: &ReferenceTables,
) -> String {
    let mut out = summary(portfolio);
    writeln!(out).unwrap();
    out.push_str(&tnfd(metrics));
    writeln!(out).unwrap();
    out.push_str(&performance(axes));
    writeln!(out).unwrap();
    out.push_str(&scheme_cards(cards));
    writeln!(out, "{}", style("TNFD Risk Thresholds").bold()).unwrap();
    out.push_str(&thresholds(&tables.thresholds));
    out
}

/// An assistant reply with its structured sections.
#[must_use]
pub fn reply(reply: &AssistantReply) -> String {
    let mut out = String::new();

    writeln!(out, "{}", reply.content).unwrap();
    let sections = [
        ("Action items", &reply.action_items),
        ("Scheme opportunities", &reply.scheme_opportunities),
        ("Risk alerts", &reply.risk_alerts),
    ];
    for (heading, items) in sections {
        if items.is_empty() {
            continue;
        }
        writeln!(out, "{}", style(heading).bold()).unwrap();
        for item in items {
            writeln!(out, "  - {item}").unwrap();
        }
    }

    out
}

/// A chat transcript.
#[must_use]
pub fn transcript(messages: &[ChatMessage]) -> String {
    let mut out = String::new();

    for message in messages {
        match message.role {
            ChatRole::User => {
                writeln!(out, "{} {}", style("you>").cyan().bold(), message.content).unwrap();
            }
            ChatRole::Assistant => {
                writeln!(out, "{}", style("assistant>").green().bold()).unwrap();
                out.push_str(&reply(&AssistantReply {
                    content: message.content.clone(),
                    action_items: message.action_items.clone(),
                    scheme_opportunities: message.scheme_opportunities.clone(),
                    risk_alerts: message.risk_alerts.clone(),
                }));
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};
    use dairy_tnfd_analytics::aggregate::summarize_subset;
    use dairy_tnfd_farm_models::{ComplianceFlags, FarmMetrics, FarmType, Region};
    use dairy_tnfd_reference::reference_tables;

    use super::*;

    fn farm() -> FarmRecord {
        FarmRecord {
            id: "FARM_007".to_string(),
            name: "Manor Farm".to_string(),
            region: Region::Northwest,
            farm_type: FarmType::GrassFedDairy,
            area_ha: 150.0,
            herd_size: 200,
            milk_yield_per_cow: 7500.0,
            compliance: ComplianceFlags {
                tnfd: true,
                nvz: false,
                sfi: true,
                water_permit: true,
            },
            metrics: FarmMetrics {
                water_efficiency: 82.5,
                biodiversity_score: 64.0,
                nutrient_efficiency: 70.0,
                soil_health: 3.4,
                carbon_footprint: 1200.0,
                risk_score: 88.0,
            },
            last_updated: DateTime::<Utc>::UNIX_EPOCH,
            alerts: 3,
        }
    }

    #[test]
    fn badge_names_bucket() {
        for bucket in RiskBucket::all() {
            assert!(risk_badge(*bucket).contains(&bucket.to_string()));
        }
    }

    #[test]
    fn empty_summary_says_so_and_shows_zeros() {
        let text = summary(&PortfolioSummary::default());
        assert!(text.contains("No farms match"));
        assert!(text.contains("Annual milk         0.0 M L"));
    }

    #[test]
    fn summary_shows_milk_in_millions() {
        let farm = farm();
        let text = summary(&summarize_subset(&[&farm]));
        assert!(text.contains("1.5 M L"));
        assert!(text.contains("High-risk farms: 1 (100.0%)"));
    }

    #[test]
    fn farm_table_lists_each_farm() {
        let farm = farm();
        let text = farm_table(&[&farm, &farm]);
        assert_eq!(text.matches("FARM_007").count(), 2);
        assert!(text.contains("2 farm(s)"));
        assert_eq!(farm_table(&[]), "No farms found.\n");
    }

    #[test]
    fn farm_metric_cards_carry_risk_badges() {
        let mut farm = farm();
        farm.metrics.biodiversity_score = 20.0;
        farm.metrics.water_efficiency = 90.0;
        farm.metrics.carbon_footprint = 1350.0;
        let text = farm_detail(&farm, DetailTab::WaterAudit);

        let line = |prefix: &str| {
            text.lines()
                .find(|line| line.trim_start().starts_with(prefix))
                .unwrap()
                .to_string()
        };
        assert!(line("Biodiversity Score").contains(&risk_badge(RiskBucket::Critical)));
        assert!(line("Water Efficiency").contains(&risk_badge(RiskBucket::Low)));
        assert!(line("Carbon Footprint").contains(&risk_badge(RiskBucket::High)));
        assert!(!line("Nutrient Efficiency").contains(&risk_badge(RiskBucket::Low)));
    }

    #[test]
    fn farm_view_placeholder_prompts_for_selection() {
        let text = no_farm_selected();
        assert!(text.contains("Select a Farm"));
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn compliance_tab_marks_missing_flags() {
        let text = farm_detail(&farm(), DetailTab::Compliance);
        assert!(text.contains("NVZ Compliance"));
        assert_eq!(text.matches("Action Required").count(), 1);
        assert_eq!(text.matches("Compliant").count(), 3);
    }

    #[test]
    fn tnfd_tab_uses_single_farm_metrics() {
        let text = farm_detail(&farm(), DetailTab::TnfdMetrics);
        assert!(text.contains("22.5 ha"));
        assert!(text.contains("10000 L/day"));
    }

    #[test]
    fn thresholds_list_every_category() {
        let text = thresholds(&reference_tables().thresholds);
        assert_eq!(text.lines().count(), reference_tables().thresholds.len() + 1);
        assert!(text.contains("Water stress"));
    }

    #[test]
    fn reply_skips_empty_sections() {
        let text = reply(&AssistantReply::demo());
        assert!(text.contains("Action items"));
        assert!(!text.contains("Risk alerts"));
    }

    #[test]
    fn transcript_labels_roles() {
        let messages = vec![
            ChatMessage::user("hello"),
            ChatMessage::from(AssistantReply::demo()),
        ];
        let text = transcript(&messages);
        assert!(text.contains("you>"));
        assert!(text.contains("assistant>"));
        assert!(text.contains("SFI enrollment available"));
    }
}
