use std::time::Duration;

use super::{
    chat::ChatState,
    customer_detail_state::CustomerDetailState,
    customer_list_state::CustomerListState,
    dashboard::PortfolioSummary,
    text_input_state::TextInputState,
};

const MAX_SEARCH_CHARS: usize = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Dashboard,
    Customers,
    CustomerDetail,
    Chat,
}

impl Screen {
    /// Tab order over the top-level screens. The detail view counts as customers.
    pub fn next_tab(self) -> Self {
        match self {
            Self::Dashboard => Self::Customers,
            Self::Customers | Self::CustomerDetail => Self::Chat,
            Self::Chat => Self::Dashboard,
        }
    }

    pub fn tab_index(self) -> usize {
        match self {
            Self::Dashboard => 0,
            Self::Customers | Self::CustomerDetail => 1,
            Self::Chat => 2,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Customers => "Clientes",
            Self::CustomerDetail => "Detalhes do Cliente",
            Self::Chat => "Chat IA",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShellState {
    running: bool,
    screen: Screen,
    customers: CustomerListState,
    detail: CustomerDetailState,
    chat: ChatState,
    search_input: TextInputState,
    search_editing: bool,
}

impl Default for ShellState {
    fn default() -> Self {
        Self::new(CustomerListState::default())
    }
}

impl ShellState {
    pub fn new(customers: CustomerListState) -> Self {
        Self {
            running: true,
            screen: Screen::default(),
            customers,
            detail: CustomerDetailState::default(),
            chat: ChatState::default(),
            search_input: TextInputState::with_max_chars(MAX_SEARCH_CHARS),
            search_editing: false,
        }
    }

    pub fn with_list_settings(per_page: u32, search_debounce: Duration) -> Self {
        Self::new(CustomerListState::new(per_page, search_debounce))
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn set_screen(&mut self, screen: Screen) {
        if screen != Screen::Customers {
            self.search_editing = false;
        }
        self.screen = screen;
    }

    pub fn customers(&self) -> &CustomerListState {
        &self.customers
    }

    pub fn customers_mut(&mut self) -> &mut CustomerListState {
        &mut self.customers
    }

    pub fn detail(&self) -> &CustomerDetailState {
        &self.detail
    }

    pub fn detail_mut(&mut self) -> &mut CustomerDetailState {
        &mut self.detail
    }

    pub fn chat(&self) -> &ChatState {
        &self.chat
    }

    pub fn chat_mut(&mut self) -> &mut ChatState {
        &mut self.chat
    }

    pub fn search_input(&self) -> &TextInputState {
        &self.search_input
    }

    pub fn search_input_mut(&mut self) -> &mut TextInputState {
        &mut self.search_input
    }

    pub fn is_search_editing(&self) -> bool {
        self.search_editing
    }

    pub fn set_search_editing(&mut self, editing: bool) {
        self.search_editing = editing;
    }

    /// True while keystrokes go into a text field rather than to shortcuts.
    pub fn is_editing_text(&self) -> bool {
        match self.screen {
            Screen::Customers => self.search_editing,
            Screen::Chat => self.chat.is_input_focused(),
            Screen::Dashboard | Screen::CustomerDetail => false,
        }
    }

    pub fn portfolio_summary(&self) -> PortfolioSummary {
        let cursor = self.customers.cursor();
        let server_total = (cursor.page() > 0).then_some(cursor.total());
        PortfolioSummary::from_customers(self.customers.items(), server_total)
    }
}
