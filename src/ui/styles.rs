//! Style definitions for the UI components.

use ratatui::style::{Color, Modifier, Style};

use crate::domain::customer::{RiskClass, ScoreBand};

// =============================================================================
// Chrome
// =============================================================================

pub fn active_tab_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

pub fn inactive_tab_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn active_panel_border_style() -> Style {
    Style::default().fg(Color::Cyan)
}

pub fn inactive_panel_border_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Key hints and secondary labels.
pub fn muted_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn error_style() -> Style {
    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
}

pub fn selection_style() -> Style {
    Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD)
}

// =============================================================================
// Scores and risk
// =============================================================================

/// Traffic-light color for a score band.
pub fn score_band_color(band: ScoreBand) -> Color {
    match band {
        ScoreBand::Low => Color::Red,
        ScoreBand::Medium => Color::Yellow,
        ScoreBand::High => Color::Green,
    }
}

pub fn score_style(band: ScoreBand) -> Style {
    Style::default()
        .fg(score_band_color(band))
        .add_modifier(Modifier::BOLD)
}

pub fn risk_color(risk: &RiskClass) -> Color {
    match risk {
        RiskClass::Low => Color::Green,
        RiskClass::Medium => Color::Yellow,
        RiskClass::High => Color::Red,
        RiskClass::Other(_) => Color::Gray,
    }
}

pub fn risk_style(risk: &RiskClass) -> Style {
    Style::default().fg(risk_color(risk))
}

pub fn kpi_value_style() -> Style {
    Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

// =============================================================================
// Chat
// =============================================================================

pub fn user_label_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

pub fn assistant_label_style() -> Style {
    Style::default()
        .fg(Color::Magenta)
        .add_modifier(Modifier::BOLD)
}

pub fn message_time_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn sql_style() -> Style {
    Style::default()
        .fg(Color::Blue)
        .add_modifier(Modifier::ITALIC)
}

// =============================================================================
// Assistant markdown
// =============================================================================

pub fn markdown_text_style() -> Style {
    Style::default().fg(Color::White)
}

pub fn markdown_heading_style(level: u8) -> Style {
    let style = Style::default().add_modifier(Modifier::BOLD);
    match level {
        1 => style.fg(Color::Cyan).add_modifier(Modifier::UNDERLINED),
        2 => style.fg(Color::Cyan),
        _ => style.fg(Color::White),
    }
}

pub fn markdown_code_style() -> Style {
    Style::default().fg(Color::Yellow)
}

pub fn markdown_bullet_style() -> Style {
    Style::default().fg(Color::Magenta)
}

pub fn markdown_quote_style() -> Style {
    Style::default()
        .fg(Color::Gray)
        .add_modifier(Modifier::ITALIC)
}

pub fn markdown_table_header_style() -> Style {
    Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

pub fn markdown_rule_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn input_prompt_style() -> Style {
    Style::default().fg(Color::Cyan)
}

pub fn input_text_style() -> Style {
    Style::default().fg(Color::White)
}

pub fn input_placeholder_style() -> Style {
    Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::ITALIC)
}
