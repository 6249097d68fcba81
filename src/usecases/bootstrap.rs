use std::sync::mpsc;

use anyhow::Result;

use crate::{
    api::{client::ApiClient, dispatcher::ApiDispatcher},
    domain::shell_state::ShellState,
    infra::{self, clock::SystemClock, contracts::ConfigAdapter, storage_layout::StorageLayout},
    ui::CrosstermEventSource,
    usecases::{
        context::AppContext,
        contracts::{AppEventSource, ShellOrchestrator},
        shell::DefaultShellOrchestrator,
    },
};

/// Where tracing output goes for this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogSink {
    Stderr,
    /// `credibot.log` in the state directory; the TUI owns the terminal.
    StateFile,
}

pub struct ShellComposition {
    pub event_source: Box<dyn AppEventSource>,
    pub orchestrator: Box<dyn ShellOrchestrator>,
}

pub fn bootstrap(adapter: &impl ConfigAdapter, sink: LogSink) -> Result<AppContext> {
    let mut context = build_context(adapter)?;

    match sink {
        LogSink::Stderr => infra::logging::init(&context.config.logging)?,
        LogSink::StateFile => {
            let layout = StorageLayout::resolve()?;
            context.log_guard = Some(infra::logging::init_to_file(
                &context.config.logging,
                &layout,
            )?);
            tracing::info!(path = %layout.log_file().display(), "logging to state file");
        }
    }

    tracing::debug!(
        api_base_url = %context.config.api.base_url,
        chat_mode = ?context.config.chat.mode,
        "configuration loaded"
    );
    Ok(context)
}

fn build_context(adapter: &impl ConfigAdapter) -> Result<AppContext> {
    let config = adapter.load()?;

    Ok(AppContext::new(config))
}

pub fn build_client(context: &AppContext) -> Result<ApiClient> {
    let api = &context.config.api;

    Ok(ApiClient::new(&api.base_url, api.request_timeout())?)
}

/// Wires the TUI: API results flow back through the same channel the event
/// source drains before polling the keyboard.
pub fn compose_shell(context: &AppContext) -> Result<ShellComposition> {
    let (events_tx, events_rx) = mpsc::channel();
    let client = build_client(context)?;
    tracing::info!(api_base_url = client.base_url(), "api dispatcher starting");
    let dispatcher = ApiDispatcher::new(client, context.config.chat.clone(), events_tx)?;

    let list = &context.config.list;
    let state = ShellState::with_list_settings(list.per_page, list.search_debounce());
    let mut orchestrator = DefaultShellOrchestrator::new(state, dispatcher, SystemClock);
    orchestrator.start();

    Ok(ShellComposition {
        event_source: Box::new(CrosstermEventSource::new(events_rx)),
        orchestrator: Box::new(orchestrator),
    })
}
