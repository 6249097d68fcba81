use anyhow::Result;

use crate::usecases::{
    context::AppContext,
    contracts::{AppEventSource, ShellOrchestrator},
};

use super::{terminal::TerminalSession, view};

pub fn start(
    context: &AppContext,
    event_source: &mut dyn AppEventSource,
    orchestrator: &mut dyn ShellOrchestrator,
) -> Result<()> {
    tracing::info!(
        log_level = %context.config.logging.level,
        api_base_url = %context.config.api.base_url,
        "starting TUI shell"
    );

    let mut terminal = TerminalSession::new()?;
    run_loop(event_source, orchestrator, |orchestrator| {
        terminal.draw(|frame| view::render(frame, orchestrator.state_mut()))
    })?;

    tracing::info!("TUI shell stopped");
    Ok(())
}

fn run_loop<F>(
    event_source: &mut dyn AppEventSource,
    orchestrator: &mut dyn ShellOrchestrator,
    mut draw: F,
) -> Result<()>
where
    F: FnMut(&mut dyn ShellOrchestrator) -> Result<()>,
{
    while orchestrator.state().is_running() {
        draw(&mut *orchestrator)?;

        if let Some(event) = event_source.next_event()? {
            orchestrator.handle_event(event)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, time::Duration};

    use super::*;
    use crate::{
        domain::{
            customer_list_state::PageRequest,
            events::{AppEvent, KeyInput},
            shell_state::{Screen, ShellState},
        },
        infra::stubs::ManualClock,
        ui::event_source::MockEventSource,
        usecases::{contracts::RequestDispatcher, shell::DefaultShellOrchestrator},
    };

    #[derive(Default)]
    struct CountingDispatcher {
        pages: RefCell<Vec<PageRequest>>,
    }

    impl RequestDispatcher for CountingDispatcher {
        fn fetch_page(&self, request: PageRequest) {
            self.pages.borrow_mut().push(request);
        }

        fn fetch_customer(&self, _customer_id: String) {}

        fn send_chat(&self, _message: String) {}
    }

    fn orchestrator() -> DefaultShellOrchestrator<CountingDispatcher, ManualClock> {
        DefaultShellOrchestrator::new(
            ShellState::with_list_settings(25, Duration::from_millis(500)),
            CountingDispatcher::default(),
            ManualClock::default(),
        )
    }

    #[test]
    fn mock_source_produces_quit_event() {
        let mut source = MockEventSource::from(vec![AppEvent::QuitRequested]);
        let event = source.next_event().expect("must read mock event");

        assert_eq!(event, Some(AppEvent::QuitRequested));
    }

    #[test]
    fn loop_draws_until_quit() {
        let mut source = MockEventSource::from(vec![
            AppEvent::InputKey(KeyInput::new("2", false)),
            AppEvent::Tick,
            AppEvent::QuitRequested,
        ]);
        let mut orchestrator = orchestrator();
        let mut frames = Vec::new();

        run_loop(&mut source, &mut orchestrator, |orchestrator| {
            frames.push(orchestrator.state().screen());
            Ok(())
        })
        .expect("loop should finish");

        assert!(!orchestrator.state().is_running());
        assert_eq!(
            frames,
            vec![Screen::Dashboard, Screen::Customers, Screen::Customers]
        );
    }
}
