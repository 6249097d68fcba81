use super::customer::{Customer, MAX_SCORE};

const HISTORY_MONTHS: [(&str, u16); 5] = [("Jan", 50), ("Fev", 30), ("Mar", 20), ("Abr", 10), ("Mai", 0)];

#[derive(Debug, Clone, PartialEq)]
pub enum CustomerDetailUiState {
    Closed,
    Loading,
    Error(String),
    Loaded(Customer),
}

/// Read-only view of a single customer, keyed by id.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerDetailState {
    customer_id: Option<String>,
    ui_state: CustomerDetailUiState,
}

impl Default for CustomerDetailState {
    fn default() -> Self {
        Self {
            customer_id: None,
            ui_state: CustomerDetailUiState::Closed,
        }
    }
}

impl CustomerDetailState {
    pub fn ui_state(&self) -> &CustomerDetailUiState {
        &self.ui_state
    }

    /// Starts loading `customer_id`, returning the id to fetch.
    pub fn open(&mut self, customer_id: &str) -> String {
        self.customer_id = Some(customer_id.to_owned());
        self.ui_state = CustomerDetailUiState::Loading;
        customer_id.to_owned()
    }

    /// Re-fetches after an error. Returns the id to fetch.
    pub fn retry(&mut self) -> Option<String> {
        if !matches!(self.ui_state, CustomerDetailUiState::Error(_)) {
            return None;
        }

        let customer_id = self.customer_id.clone()?;
        self.ui_state = CustomerDetailUiState::Loading;
        Some(customer_id)
    }

    /// Applies a fetch result. Results for another id, or arriving after the
    /// view was closed, are ignored and `false` is returned.
    pub fn apply(&mut self, customer_id: &str, result: Result<Customer, String>) -> bool {
        if self.customer_id.as_deref() != Some(customer_id)
            || self.ui_state != CustomerDetailUiState::Loading
        {
            return false;
        }

        self.ui_state = match result {
            Ok(customer) => CustomerDetailUiState::Loaded(customer),
            Err(message) => CustomerDetailUiState::Error(message),
        };
        true
    }

    pub fn close(&mut self) {
        self.customer_id = None;
        self.ui_state = CustomerDetailUiState::Closed;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScorePoint {
    pub month: &'static str,
    pub score: u16,
}

/// Score against the remainder up to the maximum, for the split chart.
pub fn score_distribution(customer: &Customer) -> [(&'static str, u16); 2] {
    let score = customer.score.min(MAX_SCORE);
    [("Score", score), ("Restante", MAX_SCORE - score)]
}

/// Five-month history ending at the current score. The backend has no history
/// endpoint, so earlier months are offsets below the current value.
pub fn score_history(customer: &Customer) -> Vec<ScorePoint> {
    HISTORY_MONTHS
        .iter()
        .map(|&(month, offset)| ScorePoint {
            month,
            score: customer.score.saturating_sub(offset),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::customer::fixtures::customer;

    #[test]
    fn open_sets_loading_for_requested_id() {
        let mut state = CustomerDetailState::default();

        let id = state.open("c-9");

        assert_eq!(id, "c-9");
        assert_eq!(state.customer_id.as_deref(), Some("c-9"));
        assert_eq!(state.ui_state(), &CustomerDetailUiState::Loading);
    }

    #[test]
    fn apply_loads_matching_customer() {
        let mut state = CustomerDetailState::default();
        state.open("c-9");

        assert!(state.apply("c-9", Ok(customer("c-9", "Joana", 710))));

        match state.ui_state() {
            CustomerDetailUiState::Loaded(loaded) => assert_eq!(loaded.score, 710),
            other => panic!("unexpected state: {other:?}"),
        }
    }

    #[test]
    fn apply_ignores_results_for_other_ids_or_closed_view() {
        let mut state = CustomerDetailState::default();
        state.open("first");
        state.open("second");

        assert!(!state.apply("first", Ok(customer("first", "A", 1))));
        assert_eq!(state.ui_state(), &CustomerDetailUiState::Loading);

        state.close();
        assert!(!state.apply("second", Ok(customer("second", "B", 2))));
        assert_eq!(state.ui_state(), &CustomerDetailUiState::Closed);
    }

    #[test]
    fn error_then_retry_returns_to_loading() {
        let mut state = CustomerDetailState::default();
        state.open("c-1");
        state.apply("c-1", Err("Cliente não encontrado".to_owned()));

        assert_eq!(
            state.ui_state(),
            &CustomerDetailUiState::Error("Cliente não encontrado".to_owned())
        );
        assert_eq!(state.retry(), Some("c-1".to_owned()));
        assert_eq!(state.ui_state(), &CustomerDetailUiState::Loading);
        assert_eq!(state.retry(), None);
    }

    #[test]
    fn distribution_splits_score_against_maximum() {
        assert_eq!(
            score_distribution(&customer("1", "A", 720)),
            [("Score", 720), ("Restante", 280)]
        );
    }

    #[test]
    fn history_ends_at_current_score_and_floors_at_zero() {
        let history = score_history(&customer("1", "A", 40));
        let scores: Vec<u16> = history.iter().map(|point| point.score).collect();

        assert_eq!(scores, vec![0, 10, 20, 30, 40]);
        assert_eq!(history[0].month, "Jan");
        assert_eq!(history[4].month, "Mai");
    }
}
