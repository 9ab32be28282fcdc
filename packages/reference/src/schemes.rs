//! Environmental schemes and the compliance cards built from them.

use dairy_tnfd_farm_models::ComplianceFlag;
use serde::{Deserialize, Serialize};

use crate::ReferenceError;

/// An environmental land-management scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentalScheme {
    /// Short code (e.g. `"SFI"`).
    pub code: String,
    /// Full scheme name.
    pub name: String,
    /// Requirement identifiers a farm must meet.
    pub requirements: Vec<String>,
    /// Payment rate, as published.
    pub payment_rate: String,
}

/// Where a compliance card takes its rate from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CardRate {
    /// The portfolio compliance rate of a farm flag.
    Flag(ComplianceFlag),
    /// A fixed placeholder percentage.
    Fixed(f64),
}

/// A compliance card on the portfolio view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceCard {
    /// Card heading.
    pub title: String,
    /// Requirements listed on the card.
    pub requirements: Vec<String>,
    /// Payment line shown on the card.
    pub payment_rate: String,
    /// Rate source.
    pub rate: CardRate,
}

#[derive(Deserialize)]
struct SchemesFile {
    scheme: Vec<SchemeRow>,
    #[serde(default)]
    card: Vec<CardDef>,
}

#[derive(Deserialize)]
struct SchemeRow {
    code: String,
    name: String,
    requirements: Vec<String>,
    payment_rate: String,
}

impl From<SchemeRow> for EnvironmentalScheme {
    fn from(row: SchemeRow) -> Self {
        Self {
            code: row.code,
            name: row.name,
            requirements: row.requirements,
            payment_rate: row.payment_rate,
        }
    }
}

/// A card as written in the table. Cards either reference a scheme (and
/// inherit its requirements and payment rate) or spell them out inline.
#[derive(Deserialize)]
struct CardDef {
    title: String,
    scheme: Option<String>,
    requirements: Option<Vec<String>>,
    payment_rate: Option<String>,
    rate: CardRate,
}

/// Parses the schemes table and resolves its cards.
///
/// # Errors
///
/// Returns [`ReferenceError`] if the TOML is malformed, a scheme code is
/// duplicated, or a card references an unknown scheme or lacks
/// requirements/payment information.
pub fn parse_schemes(
    toml_str: &str,
) -> Result<(Vec<EnvironmentalScheme>, Vec<ComplianceCard>), ReferenceError> {
    let file: SchemesFile =
        toml::de::from_str(toml_str).map_err(|source| ReferenceError::Parse {
            table: "schemes",
            source,
        })?;

    let schemes: Vec<EnvironmentalScheme> = file.scheme.into_iter().map(Into::into).collect();

    for (i, scheme) in schemes.iter().enumerate() {
        if schemes[..i].iter().any(|s| s.code == scheme.code) {
            return Err(ReferenceError::Invalid {
                table: "schemes",
                message: format!("duplicate scheme code '{}'", scheme.code),
            });
        }
    }

    let cards = file
        .card
        .into_iter()
        .map(|def| resolve_card(def, &schemes))
        .collect::<Result<Vec<_>, _>>()?;

    Ok((schemes, cards))
}

fn resolve_card(
    def: CardDef,
    schemes: &[EnvironmentalScheme],
) -> Result<ComplianceCard, ReferenceError> {
    let scheme = match def.scheme.as_deref() {
        Some(code) => Some(schemes.iter().find(|s| s.code == code).ok_or_else(|| {
            ReferenceError::Invalid {
                table: "schemes",
                message: format!("card '{}' references unknown scheme '{code}'", def.title),
            }
        })?),
        None => None,
    };

    let requirements = def
        .requirements
        .or_else(|| scheme.map(|s| s.requirements.clone()));
    let payment_rate = def
        .payment_rate
        .or_else(|| scheme.map(|s| s.payment_rate.clone()));

    let (Some(requirements), Some(payment_rate)) = (requirements, payment_rate) else {
        return Err(ReferenceError::Invalid {
            table: "schemes",
            message: format!(
                "card '{}' needs a scheme or inline requirements and payment_rate",
                def.title
            ),
        });
    };

    Ok(ComplianceCard {
        title: def.title,
        requirements,
        payment_rate,
        rate: def.rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_cards_resolve_against_schemes() {
        let (schemes, cards) = parse_schemes(include_str!("../tables/schemes.toml")).unwrap();
        assert_eq!(
            schemes.iter().map(|s| s.code.as_str()).collect::<Vec<_>>(),
            vec!["SFI", "CS", "ELM"]
        );

        let sfi = &cards[0];
        assert_eq!(sfi.title, "SFI");
        assert_eq!(sfi.payment_rate, "£25-£115/ha");
        assert_eq!(sfi.requirements.len(), 4);
        assert_eq!(sfi.rate, CardRate::Flag(ComplianceFlag::Sfi));

        let cs = &cards[1];
        assert_eq!(cs.rate, CardRate::Fixed(75.0));
        assert!(cs.requirements.contains(&"woodland".to_string()));

        let nvz = &cards[2];
        assert_eq!(nvz.payment_rate, "Regulatory requirement");
        assert_eq!(nvz.rate, CardRate::Flag(ComplianceFlag::Nvz));
    }

    #[test]
    fn scheme_json_uses_camel_case_keys() {
        let (schemes, _) = parse_schemes(include_str!("../tables/schemes.toml")).unwrap();
        let json = serde_json::to_value(&schemes[2]).unwrap();
        assert_eq!(json["paymentRate"], "Variable");
        assert!(json.get("payment_rate").is_none());
    }

    #[test]
    fn rejects_card_with_unknown_scheme() {
        let err = parse_schemes(
            r#"
            [[scheme]]
            code = "SFI"
            name = "Sustainable Farming Incentive"
            requirements = []
            payment_rate = "Variable"

            [[card]]
            title = "Mystery"
            scheme = "XYZ"
            rate = { fixed = 10.0 }
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("unknown scheme"));
    }

    #[test]
    fn rejects_card_without_payment_information() {
        let err = parse_schemes(
            r#"
            [[scheme]]
            code = "SFI"
            name = "Sustainable Farming Incentive"
            requirements = []
            payment_rate = "Variable"

            [[card]]
            title = "Bare"
            rate = { flag = "tnfd" }
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ReferenceError::Invalid { .. }));
    }

    #[test]
    fn rejects_duplicate_scheme_codes() {
        let err = parse_schemes(
            r#"
            [[scheme]]
            code = "SFI"
            name = "A"
            requirements = []
            payment_rate = "Variable"

            [[scheme]]
            code = "SFI"
            name = "B"
            requirements = []
            payment_rate = "Variable"
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate scheme code"));
    }
}
