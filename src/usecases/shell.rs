use anyhow::Result;

use crate::{
    domain::{
        customer_list_state::{PageApplied, PageRequest},
        events::{ApiOutcome, AppEvent, KeyInput},
        shell_state::{Screen, ShellState},
        text_input_state::TextInputState,
        visibility::VisibilityTrigger,
    },
    infra::contracts::Clock,
};

use super::contracts::{RequestDispatcher, ShellOrchestrator};

const LIST_PAGE_REQUESTED: &str = "LIST_PAGE_REQUESTED";
const LIST_PAGE_STALE: &str = "LIST_PAGE_STALE";
const LIST_PAGE_FAILED: &str = "LIST_PAGE_FAILED";
const DETAIL_FAILED: &str = "DETAIL_FAILED";
const CHAT_REPLY_FAILED: &str = "CHAT_REPLY_FAILED";

/// Rows before the end of the list at which the next page is requested.
const SENTINEL_MARGIN: usize = 2;

enum InputEdit {
    Changed,
    Moved,
    Ignored,
}

pub struct DefaultShellOrchestrator<D, C>
where
    D: RequestDispatcher,
    C: Clock,
{
    state: ShellState,
    dispatcher: D,
    clock: C,
    sentinel: VisibilityTrigger,
}

impl<D, C> DefaultShellOrchestrator<D, C>
where
    D: RequestDispatcher,
    C: Clock,
{
    pub fn new(state: ShellState, dispatcher: D, clock: C) -> Self {
        Self {
            state,
            dispatcher,
            clock,
            sentinel: VisibilityTrigger::with_margin(SENTINEL_MARGIN),
        }
    }

    /// Issues the first customer page. Later calls do nothing.
    pub fn start(&mut self) {
        if let Some(request) = self.state.customers_mut().start() {
            self.dispatch_page(request);
        }
    }

    fn dispatch_page(&self, request: PageRequest) {
        tracing::debug!(
            code = LIST_PAGE_REQUESTED,
            generation = request.generation,
            page = request.page,
            per_page = request.per_page,
            filtered = request.filters.has_active_filters(),
            "requesting customer page"
        );
        self.dispatcher.fetch_page(request);
    }

    fn on_tick(&mut self) {
        let now = self.clock.now();
        if let Some(request) = self.state.customers_mut().poll_filters(now) {
            self.dispatch_page(request);
        }

        if self.state.screen() != Screen::Customers {
            return;
        }

        let list = self.state.customers_mut();
        let viewport = list.viewport();
        let sentinel_row = list.sentinel_row();
        if let Some(Some(request)) =
            self.sentinel
                .observe(viewport, sentinel_row, || list.on_sentinel_visible())
        {
            self.dispatch_page(request);
        }
    }

    fn on_outcome(&mut self, outcome: ApiOutcome) {
        match outcome {
            ApiOutcome::CustomerPage { request, result } => {
                let applied = self.state.customers_mut().apply_page(&request, result);
                match applied {
                    PageApplied::Applied { appended } => tracing::debug!(
                        generation = request.generation,
                        page = request.page,
                        appended,
                        "customer page applied"
                    ),
                    PageApplied::Stale => tracing::debug!(
                        code = LIST_PAGE_STALE,
                        generation = request.generation,
                        current_generation = self.state.customers().generation(),
                        page = request.page,
                        "discarded customer page from an older request"
                    ),
                    PageApplied::Failed => tracing::warn!(
                        code = LIST_PAGE_FAILED,
                        generation = request.generation,
                        page = request.page,
                        "customer page failed"
                    ),
                }
            }
            ApiOutcome::Customer {
                customer_id,
                result,
            } => {
                let failed = result.is_err();
                let applied = self.state.detail_mut().apply(&customer_id, result);
                if applied && failed {
                    tracing::warn!(code = DETAIL_FAILED, customer_id = %customer_id, "customer detail failed");
                }
            }
            ApiOutcome::ChatReply { result } => {
                if let Err(message) = &result {
                    tracing::warn!(code = CHAT_REPLY_FAILED, error = %message, "chat reply failed");
                }
                let at = self.clock.wall_time();
                self.state.chat_mut().apply_reply(result, at);
            }
        }
    }

    fn on_key(&mut self, key: KeyInput) {
        if key.ctrl {
            if key.key == "c" {
                self.state.stop();
            }
            return;
        }

        if self.state.is_editing_text() {
            match self.state.screen() {
                Screen::Customers => self.on_search_key(&key),
                Screen::Chat => self.on_chat_input_key(&key),
                Screen::Dashboard | Screen::CustomerDetail => {}
            }
            return;
        }

        match key.key.as_str() {
            "q" => {
                self.state.stop();
                return;
            }
            "1" => {
                self.state.set_screen(Screen::Dashboard);
                return;
            }
            "2" => {
                self.state.set_screen(Screen::Customers);
                return;
            }
            "3" => {
                self.open_chat();
                return;
            }
            "tab" => {
                let next = self.state.screen().next_tab();
                if next == Screen::Chat {
                    self.open_chat();
                } else {
                    self.state.set_screen(next);
                }
                return;
            }
            _ => {}
        }

        match self.state.screen() {
            Screen::Dashboard => {
                if key.key == "R" {
                    self.reload_customers();
                }
            }
            Screen::Customers => self.on_customers_key(&key),
            Screen::CustomerDetail => self.on_detail_key(&key),
            Screen::Chat => self.on_chat_key(&key),
        }
    }

    fn on_customers_key(&mut self, key: &KeyInput) {
        let now = self.clock.now();
        match key.key.as_str() {
            "j" | "down" => self.state.customers_mut().select_next(),
            "k" | "up" => self.state.customers_mut().select_previous(),
            "enter" => self.open_selected_customer(),
            "/" => {
                let search = self.state.customers().draft_filters().search.clone();
                self.state.search_input_mut().set_text(&search);
                self.state.set_search_editing(true);
            }
            "t" => self
                .state
                .customers_mut()
                .edit_filters(|filters| filters.person_type = filters.person_type.cycle(), now),
            "r" => self
                .state
                .customers_mut()
                .edit_filters(|filters| filters.risk_class = filters.risk_class.cycle(), now),
            "a" => self
                .state
                .customers_mut()
                .edit_filters(|filters| filters.active = filters.active.cycle(), now),
            "[" => self
                .state
                .customers_mut()
                .edit_filters(|filters| filters.score.shift_min(false), now),
            "]" => self
                .state
                .customers_mut()
                .edit_filters(|filters| filters.score.shift_min(true), now),
            "{" => self
                .state
                .customers_mut()
                .edit_filters(|filters| filters.score.shift_max(false), now),
            "}" => self
                .state
                .customers_mut()
                .edit_filters(|filters| filters.score.shift_max(true), now),
            "x" => {
                self.state.search_input_mut().clear();
                self.state.customers_mut().clear_filters(now);
            }
            "s" => self.state.customers_mut().cycle_sort_key(),
            "o" => self.state.customers_mut().toggle_sort_direction(),
            "R" => self.reload_customers(),
            _ => {}
        }
    }

    fn on_search_key(&mut self, key: &KeyInput) {
        match key.key.as_str() {
            "enter" => {
                self.state.set_search_editing(false);
                if let Some(request) = self.state.customers_mut().commit_filters_now() {
                    self.dispatch_page(request);
                }
                return;
            }
            "esc" => {
                self.state.set_search_editing(false);
                return;
            }
            _ => {}
        }

        if let InputEdit::Changed = edit_text(self.state.search_input_mut(), key) {
            let now = self.clock.now();
            let search = self.state.search_input().text().to_owned();
            self.state
                .customers_mut()
                .edit_filters(|filters| filters.search = search, now);
        }
    }

    fn on_detail_key(&mut self, key: &KeyInput) {
        match key.key.as_str() {
            "esc" | "b" | "h" => {
                self.state.detail_mut().close();
                self.state.set_screen(Screen::Customers);
            }
            "R" => {
                if let Some(customer_id) = self.state.detail_mut().retry() {
                    self.dispatcher.fetch_customer(customer_id);
                }
            }
            _ => {}
        }
    }

    fn on_chat_key(&mut self, key: &KeyInput) {
        match key.key.as_str() {
            "i" | "enter" => self.state.chat_mut().set_input_focused(true),
            "j" | "down" => self.state.chat_mut().scroll_down(),
            "k" | "up" => self.state.chat_mut().scroll_up(),
            _ => {}
        }
    }

    fn on_chat_input_key(&mut self, key: &KeyInput) {
        match key.key.as_str() {
            "esc" => self.state.chat_mut().set_input_focused(false),
            "enter" => {
                let at = self.clock.wall_time();
                if let Some(submission) = self.state.chat_mut().submit(at) {
                    tracing::debug!(chars = submission.text.chars().count(), "chat message submitted");
                    self.dispatcher.send_chat(submission.text);
                }
            }
            _ => {
                edit_text(self.state.chat_mut().input_mut(), key);
            }
        }
    }

    fn open_chat(&mut self) {
        self.state.set_screen(Screen::Chat);
        self.state.chat_mut().set_input_focused(true);
    }

    fn open_selected_customer(&mut self) {
        let Some(customer_id) = self
            .state
            .customers()
            .selected_customer()
            .map(|customer| customer.id.clone())
        else {
            return;
        };

        let customer_id = self.state.detail_mut().open(&customer_id);
        self.state.set_screen(Screen::CustomerDetail);
        tracing::debug!(customer_id = %customer_id, "opening customer detail");
        self.dispatcher.fetch_customer(customer_id);
    }

    /// Retries a failed page, or reloads from page one when nothing failed.
    fn reload_customers(&mut self) {
        let list = self.state.customers_mut();
        let request = match list.retry() {
            Some(request) => request,
            None if list.is_loading() => return,
            None => list.refresh(),
        };
        self.dispatch_page(request);
    }
}

impl<D, C> ShellOrchestrator for DefaultShellOrchestrator<D, C>
where
    D: RequestDispatcher,
    C: Clock,
{
    fn state(&self) -> &ShellState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ShellState {
        &mut self.state
    }

    fn handle_event(&mut self, event: AppEvent) -> Result<()> {
        match event {
            AppEvent::Tick => self.on_tick(),
            AppEvent::QuitRequested => self.state.stop(),
            AppEvent::InputKey(key) => self.on_key(key),
            AppEvent::Api(outcome) => self.on_outcome(outcome),
        }

        Ok(())
    }
}

fn edit_text(input: &mut TextInputState, key: &KeyInput) -> InputEdit {
    let changed = match key.key.as_str() {
        "backspace" => input.backspace(),
        "delete" => input.delete(),
        "left" => {
            input.move_left();
            return InputEdit::Moved;
        }
        "right" => {
            input.move_right();
            return InputEdit::Moved;
        }
        "home" => {
            input.move_home();
            return InputEdit::Moved;
        }
        "end" => {
            input.move_end();
            return InputEdit::Moved;
        }
        _ => match key.as_char() {
            Some(ch) => input.insert(ch),
            None => false,
        },
    };

    if changed {
        InputEdit::Changed
    } else {
        InputEdit::Ignored
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, time::Duration};

    use super::*;
    use crate::{
        domain::{
            chat::{ChatRole, FALLBACK_REPLY},
            customer::fixtures::customer,
            customer_detail_state::CustomerDetailUiState,
            customer_list_state::{CustomerListState, CustomerPage, ListPhase},
            filters::PersonTypeFilter,
            pagination::PaginationInfo,
        },
        infra::stubs::ManualClock,
    };

    #[derive(Debug, Clone, PartialEq)]
    enum Dispatched {
        Page(PageRequest),
        Customer(String),
        Chat(String),
    }

    #[derive(Default)]
    struct RecordingDispatcher {
        sent: RefCell<Vec<Dispatched>>,
    }

    impl RecordingDispatcher {
        fn take(&self) -> Vec<Dispatched> {
            self.sent.borrow_mut().drain(..).collect()
        }
    }

    impl RequestDispatcher for RecordingDispatcher {
        fn fetch_page(&self, request: PageRequest) {
            self.sent.borrow_mut().push(Dispatched::Page(request));
        }

        fn fetch_customer(&self, customer_id: String) {
            self.sent.borrow_mut().push(Dispatched::Customer(customer_id));
        }

        fn send_chat(&self, message: String) {
            self.sent.borrow_mut().push(Dispatched::Chat(message));
        }
    }

    type TestOrchestrator = DefaultShellOrchestrator<RecordingDispatcher, ManualClock>;

    fn orchestrator() -> (TestOrchestrator, ManualClock) {
        let clock = ManualClock::default();
        let state = ShellState::new(CustomerListState::new(2, Duration::from_millis(500)));
        (
            DefaultShellOrchestrator::new(state, RecordingDispatcher::default(), clock.clone()),
            clock,
        )
    }

    fn press(orchestrator: &mut TestOrchestrator, key: &str) {
        orchestrator
            .handle_event(AppEvent::InputKey(KeyInput::new(key, false)))
            .expect("key must be handled");
    }

    fn type_text(orchestrator: &mut TestOrchestrator, text: &str) {
        for ch in text.chars() {
            press(orchestrator, &ch.to_string());
        }
    }

    fn tick(orchestrator: &mut TestOrchestrator) {
        orchestrator
            .handle_event(AppEvent::Tick)
            .expect("tick must be handled");
    }

    fn page_requests(dispatched: Vec<Dispatched>) -> Vec<PageRequest> {
        dispatched
            .into_iter()
            .filter_map(|item| match item {
                Dispatched::Page(request) => Some(request),
                _ => None,
            })
            .collect()
    }

    fn deliver_page(orchestrator: &mut TestOrchestrator, request: PageRequest, ids: &[&str], total_pages: u32) {
        let customers = ids
            .iter()
            .map(|id| customer(id, &format!("Cliente {id}"), 500))
            .collect();
        let pagination = PaginationInfo {
            page: request.page,
            per_page: request.per_page,
            total: u64::from(total_pages) * u64::from(request.per_page),
            total_pages,
        };
        orchestrator
            .handle_event(AppEvent::Api(ApiOutcome::CustomerPage {
                request,
                result: Ok(CustomerPage {
                    customers,
                    pagination,
                }),
            }))
            .expect("outcome must be handled");
    }

    /// Starts the orchestrator and loads the first page.
    fn started(total_pages: u32) -> (TestOrchestrator, ManualClock) {
        let (mut orchestrator, clock) = orchestrator();
        orchestrator.start();
        let first = page_requests(orchestrator.dispatcher.take()).remove(0);
        deliver_page(&mut orchestrator, first, &["1", "2"], total_pages);
        (orchestrator, clock)
    }

    #[test]
    fn start_requests_first_page_once() {
        let (mut orchestrator, _) = orchestrator();

        orchestrator.start();
        orchestrator.start();

        let requests = page_requests(orchestrator.dispatcher.take());
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].page, 1);
    }

    #[test]
    fn stops_on_quit_event_and_q_key() {
        let (mut orchestrator, _) = orchestrator();
        orchestrator
            .handle_event(AppEvent::QuitRequested)
            .expect("event must be handled");
        assert!(!orchestrator.state().is_running());

        let (mut orchestrator, _) = self::orchestrator();
        press(&mut orchestrator, "q");
        assert!(!orchestrator.state().is_running());
    }

    #[test]
    fn number_keys_and_tab_switch_screens() {
        let (mut orchestrator, _) = orchestrator();

        press(&mut orchestrator, "2");
        assert_eq!(orchestrator.state().screen(), Screen::Customers);
        press(&mut orchestrator, "tab");
        assert_eq!(orchestrator.state().screen(), Screen::Chat);
        assert!(orchestrator.state().chat().is_input_focused());

        press(&mut orchestrator, "esc");
        press(&mut orchestrator, "1");
        assert_eq!(orchestrator.state().screen(), Screen::Dashboard);
    }

    #[test]
    fn search_typing_is_debounced_into_one_fetch() {
        let (mut orchestrator, clock) = started(1);
        press(&mut orchestrator, "2");
        press(&mut orchestrator, "/");

        for ch in ["a", "n", "a"] {
            press(&mut orchestrator, ch);
            clock.advance(Duration::from_millis(100));
            tick(&mut orchestrator);
        }
        assert!(page_requests(orchestrator.dispatcher.take()).is_empty());

        clock.advance(Duration::from_millis(500));
        tick(&mut orchestrator);
        tick(&mut orchestrator);

        let requests = page_requests(orchestrator.dispatcher.take());
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].filters.search, "ana");
        assert_eq!(requests[0].page, 1);
        assert!(orchestrator.state().customers().items().is_empty());
    }

    #[test]
    fn q_while_editing_search_is_typed_not_quit() {
        let (mut orchestrator, _) = started(1);
        press(&mut orchestrator, "2");
        press(&mut orchestrator, "/");

        press(&mut orchestrator, "q");

        assert!(orchestrator.state().is_running());
        assert_eq!(orchestrator.state().search_input().text(), "q");
        press(&mut orchestrator, "enter");
        assert!(!orchestrator.state().is_search_editing());
    }

    #[test]
    fn enter_commits_search_without_waiting() {
        let (mut orchestrator, _) = started(1);
        press(&mut orchestrator, "2");
        press(&mut orchestrator, "/");
        type_text(&mut orchestrator, "bo");

        press(&mut orchestrator, "enter");
        tick(&mut orchestrator);

        let requests = page_requests(orchestrator.dispatcher.take());
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].filters.search, "bo");
        assert!(!orchestrator.state().is_search_editing());
    }

    #[test]
    fn filter_toggles_share_the_debounce_window() {
        let (mut orchestrator, clock) = started(1);
        press(&mut orchestrator, "2");

        press(&mut orchestrator, "t");
        press(&mut orchestrator, "t");
        press(&mut orchestrator, "]");
        tick(&mut orchestrator);
        assert!(page_requests(orchestrator.dispatcher.take()).is_empty());

        clock.advance(Duration::from_millis(500));
        tick(&mut orchestrator);

        let requests = page_requests(orchestrator.dispatcher.take());
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].filters.person_type,
            PersonTypeFilter::All.cycle().cycle()
        );
        assert_eq!(requests[0].filters.score.min(), 50);
    }

    #[test]
    fn visible_sentinel_requests_next_page_once_while_in_flight() {
        let (mut orchestrator, _) = started(3);
        press(&mut orchestrator, "2");
        orchestrator.state_mut().customers_mut().update_viewport(10);

        tick(&mut orchestrator);
        tick(&mut orchestrator);

        let requests = page_requests(orchestrator.dispatcher.take());
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].page, 2);
        assert_eq!(
            orchestrator.state().customers().phase(),
            ListPhase::LoadingNextPage
        );

        deliver_page(&mut orchestrator, requests[0].clone(), &["3", "4"], 3);
        tick(&mut orchestrator);
        let requests = page_requests(orchestrator.dispatcher.take());
        assert_eq!(requests.iter().map(|request| request.page).collect::<Vec<_>>(), vec![3]);

        deliver_page(&mut orchestrator, requests[0].clone(), &["5"], 3);
        tick(&mut orchestrator);
        assert!(page_requests(orchestrator.dispatcher.take()).is_empty());
        assert!(orchestrator.state().customers().reached_end());
    }

    #[test]
    fn sentinel_fires_only_within_the_margin_below_the_viewport() {
        let ids: Vec<String> = (1..=13).map(|id| id.to_string()).collect();
        let ids: Vec<&str> = ids.iter().map(String::as_str).collect();

        let (mut far, _) = orchestrator();
        far.start();
        let first = page_requests(far.dispatcher.take()).remove(0);
        deliver_page(&mut far, first, &ids, 3);
        press(&mut far, "2");
        far.state_mut().customers_mut().update_viewport(10);
        tick(&mut far);
        assert!(page_requests(far.dispatcher.take()).is_empty());

        let (mut near, _) = orchestrator();
        near.start();
        let first = page_requests(near.dispatcher.take()).remove(0);
        deliver_page(&mut near, first, &ids[..12], 3);
        press(&mut near, "2");
        near.state_mut().customers_mut().update_viewport(10);
        tick(&mut near);
        assert_eq!(
            page_requests(near.dispatcher.take())
                .iter()
                .map(|request| request.page)
                .collect::<Vec<_>>(),
            vec![2]
        );
    }

    #[test]
    fn sentinel_is_ignored_off_the_customers_screen() {
        let (mut orchestrator, _) = started(3);
        orchestrator.state_mut().customers_mut().update_viewport(10);

        tick(&mut orchestrator);

        assert!(page_requests(orchestrator.dispatcher.take()).is_empty());
    }

    #[test]
    fn stale_page_outcome_is_discarded() {
        let (mut orchestrator, _) = orchestrator();
        orchestrator.start();
        let old = page_requests(orchestrator.dispatcher.take()).remove(0);
        orchestrator.state_mut().customers_mut().apply_filters(Default::default());

        deliver_page(&mut orchestrator, old, &["old"], 1);

        assert!(orchestrator.state().customers().items().is_empty());
        assert_eq!(
            orchestrator.state().customers().phase(),
            ListPhase::LoadingFirstPage
        );
    }

    #[test]
    fn enter_opens_detail_and_escape_goes_back() {
        let (mut orchestrator, _) = started(1);
        press(&mut orchestrator, "2");
        press(&mut orchestrator, "j");

        press(&mut orchestrator, "enter");

        assert_eq!(orchestrator.state().screen(), Screen::CustomerDetail);
        assert_eq!(
            orchestrator.dispatcher.take(),
            vec![Dispatched::Customer("2".to_owned())]
        );

        orchestrator
            .handle_event(AppEvent::Api(ApiOutcome::Customer {
                customer_id: "2".to_owned(),
                result: Err("Cliente não encontrado".to_owned()),
            }))
            .expect("outcome must be handled");
        assert_eq!(
            orchestrator.state().detail().ui_state(),
            &CustomerDetailUiState::Error("Cliente não encontrado".to_owned())
        );

        press(&mut orchestrator, "R");
        assert_eq!(
            orchestrator.dispatcher.take(),
            vec![Dispatched::Customer("2".to_owned())]
        );

        press(&mut orchestrator, "esc");
        assert_eq!(orchestrator.state().screen(), Screen::Customers);
        assert_eq!(
            orchestrator.state().detail().ui_state(),
            &CustomerDetailUiState::Closed
        );
    }

    #[test]
    fn failed_page_is_retried_with_capital_r() {
        let (mut orchestrator, _) = started(3);
        press(&mut orchestrator, "2");
        orchestrator.state_mut().customers_mut().update_viewport(10);
        tick(&mut orchestrator);
        let next = page_requests(orchestrator.dispatcher.take()).remove(0);

        orchestrator
            .handle_event(AppEvent::Api(ApiOutcome::CustomerPage {
                request: next.clone(),
                result: Err("Failed to fetch data".to_owned()),
            }))
            .expect("outcome must be handled");
        assert_eq!(orchestrator.state().customers().phase(), ListPhase::Error);
        assert_eq!(orchestrator.state().customers().items().len(), 2);

        press(&mut orchestrator, "R");

        assert_eq!(page_requests(orchestrator.dispatcher.take()), vec![next]);
    }

    #[test]
    fn chat_submission_sends_once_and_failure_appends_apology() {
        let (mut orchestrator, _) = orchestrator();
        press(&mut orchestrator, "3");
        type_text(&mut orchestrator, "Qual o score médio?");

        press(&mut orchestrator, "enter");
        press(&mut orchestrator, "enter");

        assert_eq!(
            orchestrator.dispatcher.take(),
            vec![Dispatched::Chat("Qual o score médio?".to_owned())]
        );

        orchestrator
            .handle_event(AppEvent::Api(ApiOutcome::ChatReply {
                result: Err("timeout".to_owned()),
            }))
            .expect("outcome must be handled");

        let messages = orchestrator.state().chat().transcript().messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].role, ChatRole::User);
        assert_eq!(messages[2].content, FALLBACK_REPLY);
        assert!(!orchestrator.state().chat().is_pending());
    }

    #[test]
    fn sort_keys_reorder_visible_rows() {
        let (mut orchestrator, _) = started(1);
        press(&mut orchestrator, "2");

        press(&mut orchestrator, "s");
        press(&mut orchestrator, "o");

        let names: Vec<String> = orchestrator
            .state()
            .customers()
            .visible()
            .iter()
            .map(|item| item.name.clone())
            .collect();
        assert_eq!(names, vec!["Cliente 2", "Cliente 1"]);
    }
}
