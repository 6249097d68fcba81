use std::{
    sync::mpsc::{Receiver, TryRecvError},
    time::Duration,
};

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::{
    domain::events::{AppEvent, KeyInput},
    usecases::contracts::AppEventSource,
};

const EVENT_POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// Merges API outcomes from the dispatcher channel with terminal input.
/// Pending outcomes are drained before the keyboard is polled, and an idle
/// poll window yields `Tick`.
pub struct CrosstermEventSource {
    api_events: Receiver<AppEvent>,
    api_closed: bool,
}

impl CrosstermEventSource {
    pub fn new(api_events: Receiver<AppEvent>) -> Self {
        Self {
            api_events,
            api_closed: false,
        }
    }

    fn next_api_event(&mut self) -> Option<AppEvent> {
        if self.api_closed {
            return None;
        }

        match self.api_events.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                tracing::debug!("api event channel closed");
                self.api_closed = true;
                None
            }
        }
    }
}

impl AppEventSource for CrosstermEventSource {
    fn next_event(&mut self) -> Result<Option<AppEvent>> {
        if let Some(event) = self.next_api_event() {
            return Ok(Some(event));
        }

        if !event::poll(EVENT_POLL_TIMEOUT)? {
            return Ok(Some(AppEvent::Tick));
        }

        match event::read()? {
            Event::Key(key) => Ok(map_key_event(key)),
            // Redraw picks up the new size on the next loop iteration.
            Event::Resize(_, _) => Ok(Some(AppEvent::Tick)),
            _ => Ok(None),
        }
    }
}

pub(crate) fn map_key_event(key: KeyEvent) -> Option<AppEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
        return Some(AppEvent::QuitRequested);
    }

    let name = match key.code {
        KeyCode::Char(ch) => ch.to_string(),
        KeyCode::Enter => "enter".to_owned(),
        KeyCode::Esc => "esc".to_owned(),
        KeyCode::Backspace => "backspace".to_owned(),
        KeyCode::Delete => "delete".to_owned(),
        KeyCode::Left => "left".to_owned(),
        KeyCode::Right => "right".to_owned(),
        KeyCode::Up => "up".to_owned(),
        KeyCode::Down => "down".to_owned(),
        KeyCode::Home => "home".to_owned(),
        KeyCode::End => "end".to_owned(),
        KeyCode::Tab => "tab".to_owned(),
        _ => return None,
    };

    Some(AppEvent::InputKey(KeyInput::new(name, ctrl)))
}

#[cfg(test)]
pub struct MockEventSource {
    queue: std::collections::VecDeque<AppEvent>,
}

#[cfg(test)]
impl MockEventSource {
    pub fn from(events: Vec<AppEvent>) -> Self {
        Self {
            queue: events.into(),
        }
    }
}

#[cfg(test)]
impl AppEventSource for MockEventSource {
    fn next_event(&mut self) -> Result<Option<AppEvent>> {
        Ok(self.queue.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use crossterm::event::KeyEventState;

    use super::*;
    use crate::domain::events::ApiOutcome;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn ctrl_c_requests_quit() {
        let event = map_key_event(press(KeyCode::Char('c'), KeyModifiers::CONTROL));

        assert_eq!(event, Some(AppEvent::QuitRequested));
    }

    #[test]
    fn plain_q_is_forwarded_as_input() {
        let event = map_key_event(press(KeyCode::Char('q'), KeyModifiers::NONE));

        assert_eq!(event, Some(AppEvent::InputKey(KeyInput::new("q", false))));
    }

    #[test]
    fn named_keys_use_lowercase_names() {
        let cases = [
            (KeyCode::Enter, "enter"),
            (KeyCode::Esc, "esc"),
            (KeyCode::Backspace, "backspace"),
            (KeyCode::Tab, "tab"),
            (KeyCode::Down, "down"),
            (KeyCode::Char(' '), " "),
        ];

        for (code, name) in cases {
            assert_eq!(
                map_key_event(press(code, KeyModifiers::NONE)),
                Some(AppEvent::InputKey(KeyInput::new(name, false))),
                "{name}"
            );
        }
    }

    #[test]
    fn releases_and_unmapped_keys_are_ignored() {
        let mut release = press(KeyCode::Char('a'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;

        assert_eq!(map_key_event(release), None);
        assert_eq!(map_key_event(press(KeyCode::F(5), KeyModifiers::NONE)), None);
    }

    #[test]
    fn pending_api_events_come_before_terminal_input() {
        let (tx, rx) = mpsc::channel();
        let outcome = AppEvent::Api(ApiOutcome::ChatReply {
            result: Err("offline".to_owned()),
        });
        tx.send(outcome.clone()).expect("channel open");
        let mut source = CrosstermEventSource::new(rx);

        assert_eq!(source.next_api_event(), Some(outcome));
        assert_eq!(source.next_api_event(), None);

        drop(tx);
        assert_eq!(source.next_api_event(), None);
        assert!(source.api_closed);
    }
}
