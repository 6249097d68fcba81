//! Chat transcript rendering: wrapped bottom-anchored history and the prompt.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::domain::chat::{ChatMessage, ChatRole, ChatState};

use super::{
    markdown, styles,
    text_input::{render_text_input, TextInputView},
};

const CONTENT_INDENT: &str = "  ";

pub fn render(frame: &mut Frame<'_>, area: Rect, chat: &ChatState) {
    let [transcript_area, input_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .areas(area);

    let inner_width = transcript_area.width.saturating_sub(2) as usize;
    let inner_height = transcript_area.height.saturating_sub(2) as usize;
    let lines = transcript_lines(chat, inner_width);
    let visible = bottom_window(lines, inner_height, usize::from(chat.scroll_from_bottom()));

    let title = if chat.scroll_from_bottom() > 0 {
        "Credibot IA (histórico, j para descer)"
    } else {
        "Credibot IA"
    };
    let transcript = Paragraph::new(visible).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(if chat.is_input_focused() {
                styles::inactive_panel_border_style()
            } else {
                styles::active_panel_border_style()
            }),
    );
    frame.render_widget(transcript, transcript_area);

    let placeholder = if chat.is_pending() {
        "Aguardando resposta..."
    } else {
        "Pressione i para escrever"
    };
    render_text_input(
        frame,
        input_area,
        chat.input(),
        &TextInputView {
            title: "Mensagem",
            placeholder,
            focused: chat.is_input_focused(),
        },
    );
}

fn transcript_lines(chat: &ChatState, width: usize) -> Vec<Line<'static>> {
    let content_width = width.saturating_sub(CONTENT_INDENT.len()).max(1);
    let mut lines = Vec::new();

    for (index, message) in chat.transcript().messages().iter().enumerate() {
        if index > 0 {
            lines.push(Line::default());
        }
        lines.push(header_line(message));
        match message.role {
            ChatRole::User => {
                push_wrapped(&mut lines, &message.content, content_width, styles::input_text_style())
            }
            ChatRole::Assistant => {
                lines.extend(markdown::render(&message.content, content_width).into_iter().map(
                    |mut line| {
                        line.spans.insert(0, Span::raw(CONTENT_INDENT));
                        line
                    },
                ));
            }
        }

        if let Some(details) = &message.details {
            if details.used_database {
                lines.push(Line::from(Span::styled(
                    format!("{CONTENT_INDENT}consultou a base de clientes"),
                    styles::muted_style(),
                )));
            }
            if let Some(sql) = details.sql_query.as_deref().filter(|sql| !sql.trim().is_empty()) {
                push_wrapped(&mut lines, &format!("SQL: {sql}"), content_width, styles::sql_style());
            }
        }
    }

    if chat.is_pending() {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "Credibot está digitando...",
            styles::assistant_label_style(),
        )));
    }

    lines
}

fn header_line(message: &ChatMessage) -> Line<'static> {
    let label_style = match message.role {
        ChatRole::User => styles::user_label_style(),
        ChatRole::Assistant => styles::assistant_label_style(),
    };

    Line::from(vec![
        Span::styled(message.role.label().to_owned(), label_style),
        Span::raw(" "),
        Span::styled(
            message.created_at.format("%H:%M").to_string(),
            styles::message_time_style(),
        ),
    ])
}

fn push_wrapped(lines: &mut Vec<Line<'static>>, text: &str, width: usize, style: Style) {
    for row in wrap_text(text, width) {
        lines.push(Line::from(vec![
            Span::raw(CONTENT_INDENT),
            Span::styled(row, style),
        ]));
    }
}

/// Greedy word wrap by display width. Words wider than `width` are split.
pub(crate) fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        let mut current_width = 0;

        for word in paragraph.split_whitespace() {
            let word_width = word.width();
            let separator = usize::from(!current.is_empty());

            if current_width + separator + word_width <= width {
                if separator == 1 {
                    current.push(' ');
                }
                current.push_str(word);
                current_width += separator + word_width;
                continue;
            }

            if !current.is_empty() {
                rows.push(std::mem::take(&mut current));
                current_width = 0;
            }

            for ch in word.chars() {
                let ch_width = ch.width().unwrap_or(0);
                if current_width + ch_width > width && !current.is_empty() {
                    rows.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                current.push(ch);
                current_width += ch_width;
            }
        }

        rows.push(current);
    }

    if rows.is_empty() {
        rows.push(String::new());
    }

    rows
}

/// The `height` lines ending `scroll_from_bottom` lines above the last one.
fn bottom_window(
    lines: Vec<Line<'static>>,
    height: usize,
    scroll_from_bottom: usize,
) -> Vec<Line<'static>> {
    let max_scroll = lines.len().saturating_sub(height);
    let end = lines.len() - scroll_from_bottom.min(max_scroll);
    let start = end.saturating_sub(height);

    lines.into_iter().skip(start).take(end - start).collect()
}
