use anyhow::Result;

use crate::domain::{customer_list_state::PageRequest, events::AppEvent, shell_state::ShellState};

pub trait AppEventSource {
    fn next_event(&mut self) -> Result<Option<AppEvent>>;
}

pub trait ShellOrchestrator {
    fn state(&self) -> &ShellState;
    fn state_mut(&mut self) -> &mut ShellState;
    fn handle_event(&mut self, event: AppEvent) -> Result<()>;
}

/// Starts backend requests without blocking the caller. Each request yields
/// exactly one `AppEvent::Api` later on.
pub trait RequestDispatcher {
    fn fetch_page(&self, request: PageRequest);
    fn fetch_customer(&self, customer_id: String);
    fn send_chat(&self, message: String);
}
