use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::domain::{
    customer::{PersonType, RiskClass},
    filters::{ActiveFilter, CustomerFilters, PersonTypeFilter, RiskClassFilter, ScoreRange},
    local_view::SortOrder,
};

#[derive(Debug, Parser)]
#[command(
    name = "credibot",
    about = "Credibot terminal client: customers, credit scores, risk and AI chat"
)]
pub struct Cli {
    /// Path to config file (default: ./config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// API base URL, overriding config and CREDIBOT_API_URL
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Start TUI shell
    Run,
    /// Print one page of customers
    Customers(CustomersArgs),
    /// Print a single customer
    Customer {
        /// Customer id
        id: String,
    },
    /// Ask the AI assistant a question
    Ask {
        /// Question text; multiple words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,

        /// Use the stateless chat endpoint without database access
        #[arg(long)]
        plain: bool,
    },
}

#[derive(Debug, Clone, Args)]
pub struct CustomersArgs {
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Page size; defaults to `list.per_page` from the config file
    #[arg(long)]
    pub per_page: Option<u32>,

    /// Name or CPF/CNPJ fragment
    #[arg(short, long)]
    pub search: Option<String>,

    #[arg(long, value_parser = clap::value_parser!(u16).range(0..=1000))]
    pub score_min: Option<u16>,

    #[arg(long, value_parser = clap::value_parser!(u16).range(0..=1000))]
    pub score_max: Option<u16>,

    /// Risk class label, e.g. Baixo, Médio, Alto
    #[arg(long)]
    pub risk: Option<String>,

    #[arg(long = "type", value_enum)]
    pub person_type: Option<PersonTypeArg>,

    /// Only active (true) or inactive (false) customers
    #[arg(long, value_name = "BOOL")]
    pub active: Option<bool>,

    /// Local sort of the fetched page: name-asc, name-desc, score-asc, score-desc
    #[arg(long, value_parser = parse_sort)]
    pub sort: Option<SortOrder>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PersonTypeArg {
    Pf,
    Pj,
}

fn parse_sort(raw: &str) -> Result<SortOrder, String> {
    SortOrder::parse(raw)
        .ok_or_else(|| format!("invalid sort `{raw}`; expected name-asc, name-desc, score-asc or score-desc"))
}

impl Cli {
    pub fn command_or_default(&self) -> Command {
        self.command.clone().unwrap_or(Command::Run)
    }
}

impl CustomersArgs {
    pub fn per_page_or(&self, configured: u32) -> u32 {
        self.per_page.unwrap_or(configured)
    }

    pub fn filters(&self) -> Result<CustomerFilters, String> {
        let defaults = ScoreRange::default();
        let min = self.score_min.unwrap_or(defaults.min());
        let max = self.score_max.unwrap_or(defaults.max());
        let score = ScoreRange::new(min, max)
            .ok_or_else(|| format!("score range {min}-{max} is inverted"))?;

        let risk_class = match self.risk.as_deref().map(str::trim) {
            None | Some("") => RiskClassFilter::All,
            Some(label) => RiskClassFilter::Only(RiskClass::parse(label)),
        };

        Ok(CustomerFilters {
            search: self.search.clone().unwrap_or_default(),
            score,
            person_type: match self.person_type {
                None => PersonTypeFilter::All,
                Some(PersonTypeArg::Pf) => PersonTypeFilter::Only(PersonType::Individual),
                Some(PersonTypeArg::Pj) => PersonTypeFilter::Only(PersonType::Business),
            },
            risk_class,
            active: match self.active {
                None => ActiveFilter::All,
                Some(true) => ActiveFilter::Active,
                Some(false) => ActiveFilter::Inactive,
            },
        })
    }
}
