use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use crate::domain::shell_state::{Screen, ShellState};

use super::{chat_view, customers_view, dashboard_view, detail_view, styles};

const TAB_TITLES: [&str; 3] = ["1 Dashboard", "2 Clientes", "3 Chat IA"];

pub fn render(frame: &mut Frame<'_>, state: &mut ShellState) {
    let [header_area, content_area, status_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

    render_header(frame, header_area, state.screen());

    match state.screen() {
        Screen::Dashboard => dashboard_view::render(frame, content_area, state),
        Screen::Customers => customers_view::render(frame, content_area, state),
        Screen::CustomerDetail => detail_view::render(frame, content_area, state.detail()),
        Screen::Chat => chat_view::render(frame, content_area, state.chat()),
    }

    frame.render_widget(Paragraph::new(status_line(state)), status_area);
}

fn render_header(frame: &mut Frame<'_>, area: Rect, screen: Screen) {
    let tabs = Tabs::new(TAB_TITLES)
        .block(
            Block::default()
                .title(format!(" Credibot | {} ", screen.title()))
                .borders(Borders::ALL)
                .border_style(styles::inactive_panel_border_style()),
        )
        .style(styles::inactive_tab_style())
        .highlight_style(styles::active_tab_style())
        .select(screen.tab_index());

    frame.render_widget(tabs, area);
}

fn status_line(state: &ShellState) -> Line<'static> {
    let hints = key_hints(state);
    let mut spans = vec![Span::styled(hints.to_owned(), styles::muted_style())];

    let list = state.customers();
    if list.is_loading() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled("carregando...", styles::input_prompt_style()));
    }

    Line::from(spans)
}

fn key_hints(state: &ShellState) -> &'static str {
    if state.is_editing_text() {
        return match state.screen() {
            Screen::Chat => "Enter enviar | Esc sair do campo | Ctrl+C sair",
            _ => "Enter buscar agora | Esc concluir busca | Ctrl+C sair",
        };
    }

    match state.screen() {
        Screen::Dashboard => "1-3/Tab telas | R recarregar | q sair",
        Screen::Customers => {
            "j/k mover | Enter detalhes | / buscar | t tipo | r risco | a status | [ ] { } score | x limpar | s/o ordem | R recarregar | q sair"
        }
        Screen::CustomerDetail => "Esc/b voltar | R tentar novamente | q sair",
        Screen::Chat => "i escrever | j/k rolar | 1-3/Tab telas | q sair",
    }
}

#[cfg(test)]
mod tests {
    use ratatui::{backend::TestBackend, Terminal};

    use super::*;

    fn line_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    fn rendered_text(state: &mut ShellState) -> String {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).expect("test terminal");
        terminal
            .draw(|frame| render(frame, state))
            .expect("render should succeed");

        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn hints_follow_screen_and_editing_mode() {
        let mut state = ShellState::default();
        assert!(line_text(&status_line(&state)).contains("R recarregar"));

        state.set_screen(Screen::Customers);
        state.set_search_editing(true);
        assert!(line_text(&status_line(&state)).contains("concluir busca"));
    }

    #[test]
    fn every_screen_renders_without_panicking() {
        let mut state = ShellState::default();

        for screen in [
            Screen::Dashboard,
            Screen::Customers,
            Screen::CustomerDetail,
            Screen::Chat,
        ] {
            state.set_screen(screen);
            let text = rendered_text(&mut state);
            assert!(text.contains("Credibot"), "{screen:?}");
        }
    }

    #[test]
    fn chat_screen_shows_greeting() {
        let mut state = ShellState::default();
        state.set_screen(Screen::Chat);

        let text = rendered_text(&mut state);

        assert!(text.contains("Olá! Sou o assistente"));
    }
}
