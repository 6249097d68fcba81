use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::domain::{
    customer::Customer,
    customer_list_state::{CustomerListState, ListPhase},
    shell_state::ShellState,
};

use super::{
    styles,
    text_input::{render_text_input, TextInputView},
};

const NAME_COLUMN_WIDTH: usize = 28;
const TAX_ID_COLUMN_WIDTH: usize = 20;

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &mut ShellState) {
    let [search_area, filters_area, list_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(3),
        ])
        .areas(area);

    render_text_input(
        frame,
        search_area,
        state.search_input(),
        &TextInputView {
            title: "Buscar por nome ou CPF/CNPJ",
            placeholder: "Pressione / para buscar",
            focused: state.is_search_editing(),
        },
    );

    frame.render_widget(
        Paragraph::new(filter_summary_line(state.customers())),
        filters_area,
    );

    // Border rows are not list rows.
    let list_height = list_area.height.saturating_sub(2) as usize;
    state.customers_mut().update_viewport(list_height);
    render_list(frame, list_area, state.customers());
}

fn list_title(list: &CustomerListState) -> String {
    let cursor = list.cursor();
    if cursor.page() == 0 {
        return "Clientes".to_owned();
    }

    format!(
        "Clientes ({} de {}, página {} de {})",
        list.items().len(),
        cursor.total(),
        cursor.page(),
        cursor.total_pages()
    )
}

fn render_list(frame: &mut Frame<'_>, area: Rect, list: &CustomerListState) {
    let block = Block::default()
        .title(list_title(list))
        .borders(Borders::ALL)
        .border_style(styles::active_panel_border_style());

    if let Some(message) = placeholder_message(list) {
        let style = if list.phase() == ListPhase::Error {
            styles::error_style()
        } else {
            styles::muted_style()
        };
        let paragraph = Paragraph::new(Line::from(Span::styled(message, style))).block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let inner_width = area.width.saturating_sub(2) as usize;
    let mut items: Vec<ListItem<'static>> = list
        .visible()
        .into_iter()
        .map(|customer| ListItem::new(customer_row(customer, inner_width)))
        .collect();
    items.push(ListItem::new(sentinel_line(list)));

    let widget = List::new(items)
        .block(block)
        .highlight_style(styles::selection_style());
    let mut list_state = ListState::default()
        .with_offset(list.scroll_offset())
        .with_selected(list.selected_index());
    frame.render_stateful_widget(widget, area, &mut list_state);
}

/// Full-panel message used instead of rows when there is nothing to list.
fn placeholder_message(list: &CustomerListState) -> Option<String> {
    if !list.items().is_empty() {
        return None;
    }

    if list.is_empty_result() {
        let message = if list.committed_filters().has_active_filters() {
            "Nenhum cliente encontrado para os filtros atuais. Pressione x para limpar."
        } else {
            "Nenhum cliente cadastrado."
        };
        return Some(message.to_owned());
    }

    match list.phase() {
        ListPhase::Idle | ListPhase::LoadingFirstPage => Some("Carregando clientes...".to_owned()),
        ListPhase::Error => Some(format!(
            "Erro ao carregar clientes: {}. Pressione R para tentar novamente.",
            list.error_message().unwrap_or("erro desconhecido")
        )),
        ListPhase::Loaded | ListPhase::LoadingNextPage => None,
    }
}

/// Row after the last customer. Scrolling it into view loads the next page.
fn sentinel_line(list: &CustomerListState) -> Line<'static> {
    if list.phase() == ListPhase::LoadingNextPage {
        return Line::from(Span::styled(
            "Carregando mais clientes...",
            styles::muted_style(),
        ));
    }

    if let Some(message) = list.error_message() {
        return Line::from(Span::styled(
            format!("Erro: {message}. Pressione R para tentar novamente."),
            styles::error_style(),
        ));
    }

    if list.reached_end() {
        return Line::from(Span::styled(
            "Todos os clientes foram carregados",
            styles::muted_style(),
        ));
    }

    Line::from(Span::styled("...", styles::muted_style()))
}

fn filter_summary_line(list: &CustomerListState) -> Line<'static> {
    let filters = list.draft_filters();
    let order = match list.order() {
        Some(order) => format!("{} ({})", order.key.label(), order.direction.label()),
        None => "padrão".to_owned(),
    };

    let mut spans = vec![Span::styled(
        format!(
            "Tipo: {} | Risco: {} | Status: {} | Score: {}-{} | Ordem: {}",
            filters.person_type.label(),
            filters.risk_class.label(),
            filters.active.label(),
            filters.score.min(),
            filters.score.max(),
            order
        ),
        styles::muted_style(),
    )];

    if list.has_pending_filters() {
        spans.push(Span::styled("  (aplicando...)", styles::input_prompt_style()));
    }

    Line::from(spans)
}

pub(crate) fn customer_row(customer: &Customer, width: usize) -> Line<'static> {
    let name = fit_to_width(&customer.name, NAME_COLUMN_WIDTH);
    let tax_id = fit_to_width(&customer.tax_id, TAX_ID_COLUMN_WIDTH);
    let band = customer.score_band();

    let mut spans = vec![
        Span::styled(name, styles::input_text_style()),
        Span::raw(" "),
        Span::styled(tax_id, styles::muted_style()),
        Span::raw(" "),
        Span::styled(format!("{:>4}", customer.score), styles::score_style(band)),
        Span::raw("  "),
        Span::styled(
            fit_to_width(customer.risk_class.label(), 6),
            styles::risk_style(&customer.risk_class),
        ),
        Span::raw(" "),
        Span::styled(customer.person_type.code().to_owned(), styles::muted_style()),
    ];

    let used: usize = spans.iter().map(|span| span.content.width()).sum();
    let remaining = width.saturating_sub(used + 1);
    if remaining > 3 {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            fit_to_width(&customer.location_label(), remaining),
            styles::muted_style(),
        ));
    }

    if !customer.active {
        spans.push(Span::styled(" (inativo)", styles::error_style()));
    }

    Line::from(spans)
}

/// Pads or truncates `text` to exactly `width` display columns.
fn fit_to_width(text: &str, width: usize) -> String {
    let mut out = String::with_capacity(width);
    let mut used = 0;
    let total = text.width();

    for ch in text.chars() {
        let ch_width = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        let reserve = usize::from(total > width);
        if used + ch_width + reserve > width {
            break;
        }
        out.push(ch);
        used += ch_width;
    }

    if total > width && used < width {
        out.push('…');
        used += 1;
    }

    out.extend(std::iter::repeat(' ').take(width.saturating_sub(used)));
    out
}
