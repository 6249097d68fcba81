//! Portfolio KPIs derived from the customers loaded so far.

use super::customer::{Customer, RiskClass, ScoreBand};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PortfolioSummary {
    pub total: u64,
    pub loaded: usize,
    pub average_score: Option<u16>,
    pub high_risk: usize,
    pub active: usize,
    pub risk_distribution: Vec<(String, usize)>,
    pub score_bands: ScoreBandCounts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreBandCounts {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

impl ScoreBandCounts {
    fn record(&mut self, band: ScoreBand) {
        match band {
            ScoreBand::Low => self.low += 1,
            ScoreBand::Medium => self.medium += 1,
            ScoreBand::High => self.high += 1,
        }
    }
}

impl PortfolioSummary {
    /// `server_total` is the pagination total when at least one page is in.
    pub fn from_customers(customers: &[Customer], server_total: Option<u64>) -> Self {
        let loaded = customers.len();
        let mut summary = Self {
            total: server_total.unwrap_or(loaded as u64),
            loaded,
            ..Self::default()
        };

        let mut score_sum: u64 = 0;
        let mut fixed = [
            (RiskClass::Low, 0usize),
            (RiskClass::Medium, 0),
            (RiskClass::High, 0),
        ];
        let mut others: Vec<(String, usize)> = Vec::new();

        for customer in customers {
            score_sum += u64::from(customer.score);
            summary.score_bands.record(customer.score_band());
            if customer.active {
                summary.active += 1;
            }
            if customer.risk_class.is_high() {
                summary.high_risk += 1;
            }

            if let Some(slot) = fixed
                .iter_mut()
                .find(|(class, _)| *class == customer.risk_class)
            {
                slot.1 += 1;
                continue;
            }
            let label = customer.risk_class.label();
            match others.iter_mut().find(|(existing, _)| existing == label) {
                Some(slot) => slot.1 += 1,
                None => others.push((label.to_owned(), 1)),
            }
        }

        if loaded > 0 {
            let average = (score_sum as f64 / loaded as f64).round();
            summary.average_score = Some(average as u16);
        }

        others.sort_by(|left, right| left.0.cmp(&right.0));
        summary.risk_distribution = fixed
            .iter()
            .map(|(class, count)| (class.label().to_owned(), *count))
            .chain(others)
            .collect();

        summary
    }

    /// Share of loaded customers classified high risk, 0..=100.
    pub fn high_risk_percent(&self) -> f64 {
        percent(self.high_risk, self.loaded)
    }

    pub fn active_percent(&self) -> f64 {
        percent(self.active, self.loaded)
    }
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }

    part as f64 * 100.0 / whole as f64
}
