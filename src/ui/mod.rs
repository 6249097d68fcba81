//! UI layer: rendering and interaction entry points (CLI/TUI).

mod chat_view;
mod customers_view;
mod dashboard_view;
mod detail_view;
mod event_source;
mod markdown;
pub mod report;
pub mod shell;
mod styles;
mod terminal;
mod text_input;
mod view;

pub(crate) use event_source::CrosstermEventSource;
