//! Portfolio overview: KPI cards and distribution charts.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
    Frame,
};

use crate::domain::{
    customer::{RiskClass, ScoreBand},
    dashboard::PortfolioSummary,
    shell_state::ShellState,
};

use super::styles;

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &ShellState) {
    let [kpi_area, charts_area, footer_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(6),
            Constraint::Length(1),
        ])
        .areas(area);

    let summary = state.portfolio_summary();
    render_kpis(frame, kpi_area, &summary);

    let [risk_area, band_area] = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .areas(charts_area);
    render_risk_distribution(frame, risk_area, &summary);
    render_score_bands(frame, band_area, &summary);

    frame.render_widget(Paragraph::new(footer_line(state, &summary)), footer_area);
}

fn render_kpis(frame: &mut Frame<'_>, area: Rect, summary: &PortfolioSummary) {
    let areas: [Rect; 4] = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .areas(area);

    for (card, area) in kpi_cards(summary).into_iter().zip(areas) {
        let paragraph = Paragraph::new(vec![
            Line::from(Span::styled(card.value, card.style)),
            Line::from(Span::styled(card.caption, styles::muted_style())),
        ])
        .block(
            Block::default()
                .title(card.title)
                .borders(Borders::ALL)
                .border_style(styles::inactive_panel_border_style()),
        );
        frame.render_widget(paragraph, area);
    }
}

#[derive(Debug, Clone, PartialEq)]
struct KpiCard {
    title: &'static str,
    value: String,
    caption: String,
    style: Style,
}

fn kpi_cards(summary: &PortfolioSummary) -> [KpiCard; 4] {
    let average = match summary.average_score {
        Some(score) => KpiCard {
            title: "Score Médio",
            value: score.to_string(),
            caption: format!("faixa {}", ScoreBand::of(score).label()),
            style: styles::score_style(ScoreBand::of(score)),
        },
        None => KpiCard {
            title: "Score Médio",
            value: "N/A".to_owned(),
            caption: "sem dados".to_owned(),
            style: styles::muted_style(),
        },
    };

    [
        KpiCard {
            title: "Total de Clientes",
            value: summary.total.to_string(),
            caption: format!("{} carregados", summary.loaded),
            style: styles::kpi_value_style(),
        },
        average,
        KpiCard {
            title: "Alto Risco",
            value: summary.high_risk.to_string(),
            caption: format!("{:.1}% dos carregados", summary.high_risk_percent()),
            style: styles::risk_style(&RiskClass::High),
        },
        KpiCard {
            title: "Clientes Ativos",
            value: summary.active.to_string(),
            caption: format!("{:.1}% dos carregados", summary.active_percent()),
            style: styles::kpi_value_style(),
        },
    ]
}

fn render_risk_distribution(frame: &mut Frame<'_>, area: Rect, summary: &PortfolioSummary) {
    let bars: Vec<Bar<'_>> = summary
        .risk_distribution
        .iter()
        .map(|(label, count)| {
            let risk = RiskClass::parse(label);
            Bar::default()
                .value(*count as u64)
                .label(Line::from(label.clone()))
                .style(styles::risk_style(&risk))
        })
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .title("Distribuição por Risco")
                .borders(Borders::ALL)
                .border_style(styles::inactive_panel_border_style()),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(9)
        .bar_gap(2);
    frame.render_widget(chart, area);
}

fn render_score_bands(frame: &mut Frame<'_>, area: Rect, summary: &PortfolioSummary) {
    let bands = [
        (ScoreBand::Low, summary.score_bands.low),
        (ScoreBand::Medium, summary.score_bands.medium),
        (ScoreBand::High, summary.score_bands.high),
    ];
    let bars: Vec<Bar<'_>> = bands
        .iter()
        .map(|(band, count)| {
            Bar::default()
                .value(*count as u64)
                .label(Line::from(band.label()))
                .style(styles::score_style(*band))
        })
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .title("Faixas de Score")
                .borders(Borders::ALL)
                .border_style(styles::inactive_panel_border_style()),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(9)
        .bar_gap(2);
    frame.render_widget(chart, area);
}

fn footer_line(state: &ShellState, summary: &PortfolioSummary) -> Line<'static> {
    let list = state.customers();
    if let Some(message) = list.error_message() {
        return Line::from(Span::styled(
            format!("Erro ao carregar clientes: {message} (R para tentar novamente)"),
            styles::error_style(),
        ));
    }

    if list.is_loading() && summary.loaded == 0 {
        return Line::from(Span::styled("Carregando carteira...", styles::muted_style()));
    }

    Line::from(Span::styled(
        format!(
            "Indicadores calculados sobre {} de {} clientes carregados",
            summary.loaded, summary.total
        ),
        styles::muted_style(),
    ))
}
