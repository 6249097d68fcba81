//! Single-line input field rendering shared by the search bar and chat prompt.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthChar;

use crate::domain::text_input_state::TextInputState;

use super::styles;

const PROMPT_SYMBOL: &str = "> ";

pub struct TextInputView<'a> {
    pub title: &'a str,
    pub placeholder: &'a str,
    pub focused: bool,
}

pub fn render_text_input(
    frame: &mut Frame<'_>,
    area: Rect,
    input: &TextInputState,
    view: &TextInputView<'_>,
) {
    let border_style = if view.focused {
        styles::active_panel_border_style()
    } else {
        styles::inactive_panel_border_style()
    };

    let inner_width = area.width.saturating_sub(2) as usize;
    let text_width = inner_width.saturating_sub(PROMPT_SYMBOL.len());
    let window = visible_window(input, text_width);
    let line = build_input_line(input, &window, view);

    let paragraph = Paragraph::new(line).block(
        Block::default()
            .title(view.title.to_owned())
            .borders(Borders::ALL)
            .border_style(border_style),
    );
    frame.render_widget(paragraph, area);

    if view.focused {
        let cursor_x = area
            .x
            .saturating_add(1)
            .saturating_add(PROMPT_SYMBOL.len() as u16)
            .saturating_add(window.cursor_column.min(u16::MAX as usize) as u16);
        let cursor_y = area.y.saturating_add(1);
        frame.set_cursor_position((cursor_x, cursor_y));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct InputWindow {
    text: String,
    cursor_column: usize,
}

/// Slice of the text that fits `width` columns while keeping the cursor in view.
fn visible_window(input: &TextInputState, width: usize) -> InputWindow {
    let chars: Vec<char> = input.text().chars().collect();
    let cursor = input.cursor().min(chars.len());
    let char_width = |ch: &char| ch.width().unwrap_or(0);

    let mut start = 0;
    let mut before_cursor: usize = chars[..cursor].iter().map(char_width).sum();
    // One column stays free for the cursor itself.
    while width > 0 && before_cursor >= width && start < cursor {
        before_cursor -= char_width(&chars[start]);
        start += 1;
    }

    let mut used = 0;
    let text: String = chars[start..]
        .iter()
        .take_while(|ch| {
            used += ch.width().unwrap_or(0);
            used <= width
        })
        .collect();

    InputWindow {
        text,
        cursor_column: before_cursor,
    }
}

fn build_input_line(
    input: &TextInputState,
    window: &InputWindow,
    view: &TextInputView<'_>,
) -> Line<'static> {
    let prompt = Span::styled(PROMPT_SYMBOL.to_owned(), styles::input_prompt_style());

    if input.text().is_empty() && !view.focused {
        return Line::from(vec![
            prompt,
            Span::styled(view.placeholder.to_owned(), styles::input_placeholder_style()),
        ]);
    }

    Line::from(vec![
        prompt,
        Span::styled(window.text.clone(), styles::input_text_style()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input_with(text: &str) -> TextInputState {
        let mut input = TextInputState::with_max_chars(200);
        input.set_text(text);
        input
    }

    fn line_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn short_text_is_shown_whole() {
        let window = visible_window(&input_with("maria"), 20);

        assert_eq!(window.text, "maria");
        assert_eq!(window.cursor_column, 5);
    }

    #[test]
    fn long_text_scrolls_to_keep_cursor_visible() {
        let window = visible_window(&input_with("abcdefghij"), 4);

        assert_eq!(window.text, "hij");
        assert_eq!(window.cursor_column, 3);
    }

    #[test]
    fn cursor_at_start_shows_the_head() {
        let mut input = input_with("abcdefghij");
        input.move_home();

        let window = visible_window(&input, 4);

        assert_eq!(window.text, "abcd");
        assert_eq!(window.cursor_column, 0);
    }

    #[test]
    fn placeholder_only_when_empty_and_unfocused() {
        let view = TextInputView {
            title: "Busca",
            placeholder: "Pressione / para buscar",
            focused: false,
        };
        let empty = input_with("");
        let window = visible_window(&empty, 20);

        assert!(line_text(&build_input_line(&empty, &window, &view)).contains("Pressione /"));

        let focused = TextInputView {
            focused: true,
            ..view
        };
        assert_eq!(line_text(&build_input_line(&empty, &window, &focused)), "> ");
    }
}
