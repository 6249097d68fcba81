use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::domain::{
    customer::{format_backend_date, Customer, ScoreBand, MAX_SCORE},
    customer_detail_state::{
        score_distribution, score_history, CustomerDetailState, CustomerDetailUiState,
    },
};

use super::styles;

pub fn render(frame: &mut Frame<'_>, area: Rect, detail: &CustomerDetailState) {
    match detail.ui_state() {
        CustomerDetailUiState::Closed => render_message(
            frame,
            area,
            "Nenhum cliente selecionado. Esc volta para a lista.",
            styles::muted_style(),
        ),
        CustomerDetailUiState::Loading => render_message(
            frame,
            area,
            "Carregando cliente...",
            styles::muted_style(),
        ),
        CustomerDetailUiState::Error(message) => render_message(
            frame,
            area,
            &format!(
                "Erro ao carregar cliente: {message}\n\nR tenta novamente | Esc volta para a lista"
            ),
            styles::error_style(),
        ),
        CustomerDetailUiState::Loaded(customer) => render_customer(frame, area, customer),
    }
}

fn render_message(frame: &mut Frame<'_>, area: Rect, message: &str, style: Style) {
    let paragraph = Paragraph::new(message.to_owned())
        .style(style)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title("Detalhes do Cliente")
                .borders(Borders::ALL)
                .border_style(styles::active_panel_border_style()),
        );
    frame.render_widget(paragraph, area);
}

fn render_customer(frame: &mut Frame<'_>, area: Rect, customer: &Customer) {
    let [card_area, charts_area] = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .areas(area);

    let card = Paragraph::new(card_lines(customer))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(customer.name.clone())
                .borders(Borders::ALL)
                .border_style(styles::active_panel_border_style()),
        );
    frame.render_widget(card, card_area);

    let [gauge_area, history_area, split_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(6),
        ])
        .areas(charts_area);

    let band = customer.score_band();
    let gauge = Gauge::default()
        .block(
            Block::default()
                .title("Score de Crédito")
                .borders(Borders::ALL)
                .border_style(styles::inactive_panel_border_style()),
        )
        .gauge_style(Style::default().fg(styles::score_band_color(band)))
        .percent(customer.score_percent().min(100))
        .label(format!("{} / {MAX_SCORE} ({})", customer.score, band.label()));
    frame.render_widget(gauge, gauge_area);

    let history = score_history(customer);
    let history_bars: Vec<Bar<'_>> = history
        .iter()
        .map(|point| {
            Bar::default()
                .value(u64::from(point.score))
                .label(Line::from(point.month))
                .style(styles::score_style(ScoreBand::of(point.score)))
        })
        .collect();
    let history_chart = BarChart::default()
        .block(
            Block::default()
                .title("Evolução do Score")
                .borders(Borders::ALL)
                .border_style(styles::inactive_panel_border_style()),
        )
        .data(BarGroup::default().bars(&history_bars))
        .max(u64::from(MAX_SCORE))
        .bar_width(5)
        .bar_gap(1);
    frame.render_widget(history_chart, history_area);

    let split_bars: Vec<Bar<'_>> = score_distribution(customer)
        .iter()
        .enumerate()
        .map(|(index, (label, value))| {
            let style = if index == 0 {
                styles::score_style(band)
            } else {
                styles::muted_style()
            };
            Bar::default()
                .value(u64::from(*value))
                .label(Line::from(*label))
                .style(style)
        })
        .collect();
    let split_chart = BarChart::default()
        .block(
            Block::default()
                .title("Distribuição do Score")
                .borders(Borders::ALL)
                .border_style(styles::inactive_panel_border_style()),
        )
        .direction(Direction::Horizontal)
        .data(BarGroup::default().bars(&split_bars))
        .max(u64::from(MAX_SCORE))
        .bar_width(1)
        .bar_gap(1);
    frame.render_widget(split_chart, split_area);
}

fn card_lines(customer: &Customer) -> Vec<Line<'static>> {
    let status = if customer.active { "Ativo" } else { "Inativo" };
    let status_style = if customer.active {
        styles::score_style(ScoreBand::High)
    } else {
        styles::error_style()
    };

    let mut lines = vec![
        field("ID", customer.id.clone(), styles::input_text_style()),
        field("CPF/CNPJ", customer.tax_id.clone(), styles::input_text_style()),
        field(
            "Tipo",
            customer.person_type.label().to_owned(),
            styles::input_text_style(),
        ),
        field(
            "Score",
            customer.score.to_string(),
            styles::score_style(customer.score_band()),
        ),
        field(
            "Classe de Risco",
            customer.risk_class.label().to_owned(),
            styles::risk_style(&customer.risk_class),
        ),
        field(
            customer.financial_label(),
            customer.financial_value(),
            styles::input_text_style(),
        ),
        field("Status", status.to_owned(), status_style),
    ];

    if customer.has_location() {
        lines.push(field(
            "Localização",
            customer.location_label(),
            styles::input_text_style(),
        ));
    }
    if let Some(created_at) = customer.created_at.as_deref() {
        lines.push(field(
            "Cliente desde",
            format_backend_date(created_at),
            styles::muted_style(),
        ));
    }
    if let Some(updated_at) = customer.updated_at.as_deref() {
        lines.push(field(
            "Atualizado em",
            format_backend_date(updated_at),
            styles::muted_style(),
        ));
    }

    lines
}

fn field(label: &str, value: String, style: Style) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label}: "), styles::muted_style()),
        Span::styled(value, style),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::customer::{fixtures::customer, PersonType};

    fn texts(lines: &[Line<'_>]) -> Vec<String> {
        lines
            .iter()
            .map(|line| line.spans.iter().map(|span| span.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn business_card_shows_revenue_and_dates() {
        let mut item = customer("c7", "Padaria Sol", 455);
        item.person_type = PersonType::Business;
        item.annual_revenue = Some(1_250_000.0);
        item.created_at = Some("2023-02-10T12:00:00Z".to_owned());

        let lines = texts(&card_lines(&item));

        assert!(lines.contains(&"Faturamento Anual: R$ 1.250.000,00".to_owned()));
        assert!(lines.contains(&"Cliente desde: 10/02/2023".to_owned()));
        assert!(!lines.iter().any(|line| line.starts_with("Localização")));
    }

    #[test]
    fn inactive_customer_is_flagged() {
        let mut item = customer("c8", "Ana", 700);
        item.active = false;

        let lines = texts(&card_lines(&item));

        assert!(lines.contains(&"Status: Inativo".to_owned()));
    }
}
