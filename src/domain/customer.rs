use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub const MAX_SCORE: u16 = 1000;

const LOW_SCORE_CEILING: u16 = 350;
const MEDIUM_SCORE_CEILING: u16 = 650;

/// Person type as reported by the backend (`tipo_pessoa`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PersonType {
    /// Pessoa física.
    #[serde(rename = "PF")]
    Individual,
    /// Pessoa jurídica.
    #[serde(rename = "PJ")]
    Business,
}

impl PersonType {
    pub fn code(self) -> &'static str {
        match self {
            Self::Individual => "PF",
            Self::Business => "PJ",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Individual => "Pessoa Física",
            Self::Business => "Pessoa Jurídica",
        }
    }
}

/// Risk classification (`classe_risco`).
///
/// Known labels are matched case-insensitively; anything else is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RiskClass {
    Low,
    Medium,
    High,
    Other(String),
}

impl RiskClass {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.to_lowercase().as_str() {
            "baixo" => Self::Low,
            "médio" | "medio" => Self::Medium,
            "alto" => Self::High,
            _ => Self::Other(trimmed.to_owned()),
        }
    }

    /// Label sent back to the API and shown in badges.
    pub fn label(&self) -> &str {
        match self {
            Self::Low => "Baixo",
            Self::Medium => "Médio",
            Self::High => "Alto",
            Self::Other(label) => label,
        }
    }

    pub fn is_high(&self) -> bool {
        matches!(self, Self::High)
    }
}

impl fmt::Display for RiskClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for RiskClass {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for RiskClass {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Low,
    Medium,
    High,
}

impl ScoreBand {
    pub fn of(score: u16) -> Self {
        if score < LOW_SCORE_CEILING {
            Self::Low
        } else if score < MEDIUM_SCORE_CEILING {
            Self::Medium
        } else {
            Self::High
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "baixo",
            Self::Medium => "médio",
            Self::High => "alto",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "cpf_cnpj")]
    pub tax_id: String,
    #[serde(rename = "score_credito", deserialize_with = "deserialize_score")]
    pub score: u16,
    #[serde(rename = "classe_risco")]
    pub risk_class: RiskClass,
    #[serde(rename = "tipo_pessoa")]
    pub person_type: PersonType,
    #[serde(rename = "renda_mensal", default, skip_serializing_if = "Option::is_none")]
    pub monthly_income: Option<f64>,
    #[serde(
        rename = "faturamento_anual",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub annual_revenue: Option<f64>,
    #[serde(rename = "uf", default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(rename = "cidade", default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(rename = "ativo")]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Accepts any JSON number; fractional or out-of-range scores are rounded
/// and clamped into `0..=MAX_SCORE`.
fn deserialize_score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u16, D::Error> {
    let raw = f64::deserialize(deserializer)?;
    Ok(raw.round().clamp(0.0, f64::from(MAX_SCORE)) as u16)
}

impl Customer {
    pub fn score_band(&self) -> ScoreBand {
        ScoreBand::of(self.score)
    }

    /// Score as a 0..=100 percentage of the maximum.
    pub fn score_percent(&self) -> u16 {
        let clamped = u32::from(self.score.min(MAX_SCORE));
        ((clamped * 100 + u32::from(MAX_SCORE) / 2) / u32::from(MAX_SCORE)) as u16
    }

    pub fn location_label(&self) -> String {
        let city = self.city.as_deref().filter(|value| !value.trim().is_empty());
        let state = self.state.as_deref().filter(|value| !value.trim().is_empty());

        match (city, state) {
            (Some(city), Some(state)) => {
                let short: String = state.chars().take(2).collect();
                format!("{city}, {short}")
            }
            (Some(city), None) => city.to_owned(),
            (None, Some(state)) => state.to_owned(),
            (None, None) => "N/A".to_owned(),
        }
    }

    pub fn has_location(&self) -> bool {
        self.location_label() != "N/A"
    }

    /// Income for individuals, revenue for businesses.
    pub fn financial_label(&self) -> &'static str {
        match self.person_type {
            PersonType::Individual => "Renda Mensal",
            PersonType::Business => "Faturamento Anual",
        }
    }

    pub fn financial_value(&self) -> String {
        let amount = match self.person_type {
            PersonType::Individual => self.monthly_income,
            PersonType::Business => self.annual_revenue,
        };

        amount.map(format_brl).unwrap_or_else(|| "N/A".to_owned())
    }
}

/// Formats an amount as Brazilian reais, e.g. `R$ 12.345,67`.
pub fn format_brl(amount: f64) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}R$ {grouped},{fraction:02}")
}

/// Formats a backend timestamp as `dd/mm/yyyy`, falling back to the raw text.
pub fn format_backend_date(raw: &str) -> String {
    if let Ok(parsed) = chrono::DateTime::parse_from_rfc3339(raw) {
        return parsed.format("%d/%m/%Y").to_string();
    }

    if let Ok(parsed) = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return parsed.format("%d/%m/%Y").to_string();
    }

    raw.to_owned()
}
