//! Chat surface rendering using ratatui.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use chatgate_core::ChatMode;

use super::app::App;

pub const TITLE: &str = "AI Chat Assistant";
const SIDEBAR_WIDTH: u16 = 48;

/// Render the whole surface: header, the variant for the current mode, and
/// the status bar. The dropdown is drawn last so it overlays the content.
pub fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Min(3),    // chat variant
            Constraint::Length(1), // status bar
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);

    match app.mode {
        ChatMode::Chat => render_chat(f, app, chunks[1]),
        ChatMode::Sidebar => render_sidebar(f, app, chunks[1]),
        ChatMode::Popup => render_popup(f, app, chunks[1]),
    }

    render_status_bar(f, app, chunks[2]);

    if app.selector.open {
        render_dropdown(f, app, chunks[0]);
    }
}

fn selector_label(mode: ChatMode) -> String {
    format!("[ {} ▾ ]", mode.label())
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let line = Line::from(vec![
        Span::styled(
            TITLE,
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            selector_label(app.mode),
            Style::default().fg(Color::Cyan),
        ),
    ]);

    let header = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(header, area);
}

fn render_dropdown(f: &mut Frame, app: &App, header: Rect) {
    // Directly under the selector: border + title + the two-space gap.
    let x = header.x + 1 + TITLE.len() as u16 + 2;
    let y = header.y + 2;
    let width = 14;
    let height = ChatMode::ALL.len() as u16 + 2;
    let area = Rect::new(x, y, width, height).intersection(f.area());

    let lines: Vec<Line> = ChatMode::ALL
        .iter()
        .enumerate()
        .map(|(i, mode)| {
            let style = if i == app.selector.highlighted {
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Line::from(Span::styled(format!(" {:<10}", mode.label()), style))
        })
        .collect();

    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL)),
        area,
    );
}

// -- Variants --

fn render_chat(f: &mut Frame, app: &App, area: Rect) {
    render_chat_panel(f, app, area, " Conversation ");
}

fn render_sidebar(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(SIDEBAR_WIDTH)])
        .split(area);
    render_chat_panel(f, app, chunks[1], " Sidebar Assistant ");
}

fn render_popup(f: &mut Frame, app: &App, area: Rect) {
    let middle = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Length(2),
            Constraint::Min(0),
        ])
        .split(area);
    let hint = Paragraph::new(Line::from(Span::styled(
        app.labels.popup_hint.as_str(),
        Style::default().fg(Color::Gray),
    )))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    f.render_widget(hint, middle[1]);

    let launcher = bottom_right(area, 13, 3);
    let launcher_style = if app.popup.open {
        Style::default().fg(Color::Black).bg(Color::Cyan)
    } else {
        Style::default().fg(Color::Cyan)
    };
    f.render_widget(
        Paragraph::new(" Open chat ")
            .style(launcher_style)
            .block(Block::default().borders(Borders::ALL)),
        launcher,
    );

    if app.popup.open {
        let above = Rect {
            height: area.height.saturating_sub(launcher.height),
            ..area
        };
        let window = bottom_right(above, 50, 16);
        f.render_widget(Clear, window);
        render_chat_panel(f, app, window, " Popup Assistant ");
    }
}

// -- Widget --

/// The chat widget shared by all three variants: transcript above an input
/// box that shows the placeholder while the draft is empty.
fn render_chat_panel(f: &mut Frame, app: &App, area: Rect, title: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue))
        .title(title.to_string());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(inner);

    let transcript: Vec<Line> = app
        .session
        .transcript
        .iter()
        .map(|message| {
            Line::from(vec![
                Span::styled("You: ", Style::default().fg(Color::Yellow)),
                Span::raw(message.as_str()),
            ])
        })
        .collect();
    let skip = transcript.len().saturating_sub(chunks[0].height as usize);
    f.render_widget(
        Paragraph::new(transcript.into_iter().skip(skip).collect::<Vec<_>>())
            .wrap(Wrap { trim: false }),
        chunks[0],
    );

    let input = if app.session.draft.is_empty() {
        Span::styled(
            app.labels.placeholder.as_str(),
            Style::default().fg(Color::DarkGray),
        )
    } else {
        Span::raw(app.session.draft.as_str())
    };
    f.render_widget(
        Paragraph::new(Line::from(input)).block(Block::default().borders(Borders::ALL)),
        chunks[1],
    );
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let hints = if app.selector.open {
        "j/k: move  Enter: select  Esc: close"
    } else if app.mode == ChatMode::Popup && !app.popup.open {
        "Enter: open launcher  Tab: mode  Esc: quit"
    } else {
        "Enter: send  Tab: mode  Esc: quit"
    };

    let bar = Line::from(vec![
        Span::styled(
            format!(" mode: {} ", app.mode),
            Style::default().bg(Color::Blue).fg(Color::White),
        ),
        Span::raw("  "),
        Span::styled(hints, Style::default().fg(Color::DarkGray)),
    ]);

    f.render_widget(Paragraph::new(bar), area);
}

// -- Helpers --

fn bottom_right(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + area.width - width,
        area.y + area.height - height,
        width,
        height,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use chatgate_core::ChatLabels;

    use super::*;

    const MARKERS: [(ChatMode, &str); 3] = [
        (ChatMode::Chat, "Conversation"),
        (ChatMode::Sidebar, "Sidebar Assistant"),
        (ChatMode::Popup, "Open the launcher"),
    ];

    fn labels() -> ChatLabels {
        ChatLabels {
            placeholder: "Ask me anything...".to_string(),
            popup_hint: "Open the launcher at the bottom right".to_string(),
        }
    }

    fn render_lines(app: &App) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect()
    }

    fn screen(app: &App) -> String {
        render_lines(app).join("\n")
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    /// Drive the dropdown with keys, the way a user would.
    fn choose(app: &mut App, mode: ChatMode) {
        app.handle_key(key(KeyCode::Tab));
        while app.selector.highlighted > mode.index() {
            app.handle_key(key(KeyCode::Up));
        }
        while app.selector.highlighted < mode.index() {
            app.handle_key(key(KeyCode::Down));
        }
        app.handle_key(key(KeyCode::Enter));
    }

    fn present_variants(app: &App) -> Vec<ChatMode> {
        let screen = screen(app);
        MARKERS
            .iter()
            .filter(|(_, marker)| screen.contains(marker))
            .map(|(mode, _)| *mode)
            .collect()
    }

    #[test]
    fn initial_render_shows_chat_variant() {
        let app = App::new(labels());
        assert_eq!(present_variants(&app), vec![ChatMode::Chat]);
        assert!(screen(&app).contains("Ask me anything..."));
    }

    #[test]
    fn selecting_each_mode_shows_exactly_that_variant() {
        for from in ChatMode::ALL {
            for to in ChatMode::ALL {
                let mut app = App::new(labels()).with_mode(from);
                choose(&mut app, to);
                assert_eq!(app.mode, to);
                assert_eq!(present_variants(&app), vec![to], "{from} -> {to}");
            }
        }
    }

    #[test]
    fn header_shows_title_immediately_followed_by_selector() {
        for mode in ChatMode::ALL {
            let app = App::new(labels()).with_mode(mode);
            let lines = render_lines(&app);
            let expected = format!("{TITLE}  [ {}", mode.label());
            assert!(
                lines[1].contains(&expected),
                "header row should contain {expected:?}, got {:?}",
                lines[1]
            );
        }
    }

    #[test]
    fn sidebar_and_chat_show_placeholder() {
        for mode in [ChatMode::Chat, ChatMode::Sidebar] {
            let app = App::new(labels()).with_mode(mode);
            assert!(screen(&app).contains("Ask me anything..."), "{mode}");
        }
    }

    #[test]
    fn closed_popup_shows_launcher_but_no_window() {
        let app = App::new(labels()).with_mode(ChatMode::Popup);
        let screen = screen(&app);
        assert!(screen.contains("Open chat"));
        assert!(!screen.contains("Popup Assistant"));
        assert!(!screen.contains("Ask me anything..."));
    }

    #[test]
    fn popup_hint_uses_default_labels() {
        let app = App::new(ChatLabels::default()).with_mode(ChatMode::Popup);
        let screen = screen(&app);
        // Wide glyphs occupy two cells, so look for single characters.
        assert!(screen.contains('点'));
        assert!(screen.contains('话'));
    }

    #[test]
    fn open_popup_shows_window_with_placeholder() {
        let mut app = App::new(labels()).with_mode(ChatMode::Popup);
        app.handle_key(key(KeyCode::Enter));
        let screen = screen(&app);
        assert!(screen.contains("Popup Assistant"));
        assert!(screen.contains("Ask me anything..."));
    }

    #[test]
    fn draft_replaces_placeholder_and_transcript_renders() {
        let mut app = App::new(labels());
        for c in "weather?".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        assert!(!screen(&app).contains("Ask me anything..."));
        assert!(screen(&app).contains("weather?"));

        app.handle_key(key(KeyCode::Enter));
        let screen = screen(&app);
        assert!(screen.contains("You: weather?"));
        assert!(screen.contains("Ask me anything..."));
    }

    #[test]
    fn open_dropdown_lists_all_options() {
        let mut app = App::new(labels());
        app.open_selector();
        let lines = render_lines(&app);
        let dropdown: String = lines[2..7].join("\n");
        for mode in ChatMode::ALL {
            assert!(dropdown.contains(mode.label()), "missing {}", mode.label());
        }
    }

    #[test]
    fn tiny_terminal_does_not_panic() {
        let mut terminal = Terminal::new(TestBackend::new(12, 6)).unwrap();
        for mode in ChatMode::ALL {
            let mut app = App::new(labels()).with_mode(mode);
            app.popup.open = true;
            app.open_selector();
            terminal.draw(|f| render(f, &app)).unwrap();
        }
    }
}
