//! Help overlay: scrollable keybinding reference for the current screen.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::action::Action;
use crate::tui::app::Screen;

static GLOBAL_KEYS: &[(&str, &str)] = &[
    ("F1", "help"),
    ("F2", "specialties"),
    ("F3", "office settings"),
    ("Ctrl+C", "quit"),
];

static SPECIALTIES_KEYS: &[(&str, &str)] = &[
    ("Tab / Shift-Tab", "next / prev field"),
    ("Enter", "register specialty"),
    ("↑/↓", "select row"),
    ("Del / Ctrl+D", "delete selected (y/n to confirm)"),
    ("Esc", "quit"),
];

static OFFICE_KEYS: &[(&str, &str)] = &[
    ("Tab / Shift-Tab", "next / prev field"),
    ("Enter", "save settings"),
    ("Enter on Logo", "attach the typed image path"),
    ("Ctrl+S", "save from any field"),
    ("Esc", "back to specialties"),
];

/// State for the help overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpState {
    scroll: u16,
    origin: Screen,
}

impl HelpState {
    /// Opens help for the given screen, scrolled to the top.
    pub fn new(origin: Screen) -> Self {
        Self { scroll: 0, origin }
    }

    /// Returns the current scroll offset.
    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    /// Returns the screen whose keys are listed.
    pub fn origin(&self) -> Screen {
        self.origin
    }

    /// Handles a key event, returning an [`Action`] for the app to apply.
    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Up => {
                self.scroll = self.scroll.saturating_sub(1);
                Action::None
            }
            KeyCode::Down => {
                self.scroll = self.scroll.saturating_add(1);
                Action::None
            }
            KeyCode::Char('q') | KeyCode::Esc | KeyCode::F(1) => Action::CloseHelp,
            _ => Action::None,
        }
    }
}

fn build_section(title: &'static str, keys: &[(&'static str, &'static str)]) -> Vec<Line<'static>> {
    let header_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let key_style = Style::default().fg(Color::Yellow);
    let dim_style = Style::default().fg(Color::DarkGray);

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(title, header_style)),
    ];
    for (key, desc) in keys {
        lines.push(Line::from(vec![
            Span::styled(format!("  {key:<20}"), key_style),
            Span::styled(*desc, dim_style),
        ]));
    }
    lines
}

fn help_content(origin: Screen) -> Vec<Line<'static>> {
    let mut lines = match origin {
        Screen::Specialties => build_section("Specialties", SPECIALTIES_KEYS),
        Screen::Office => build_section("Office Settings", OFFICE_KEYS),
    };
    lines.extend(build_section("Global", GLOBAL_KEYS));
    lines
}

/// Renders the help overlay on top of `area`.
#[mutants::skip]
pub fn draw_help(state: &HelpState, frame: &mut Frame, area: Rect) {
    let title = format!(" Help – {} ", state.origin().label());
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    frame.render_widget(Clear, area);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [content_area, footer_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(inner);

    let content_lines = help_content(state.origin());
    let total = u16::try_from(content_lines.len()).unwrap_or(u16::MAX);
    let capped_scroll = state.scroll().min(total.saturating_sub(content_area.height));

    frame.render_widget(
        Paragraph::new(content_lines).scroll((capped_scroll, 0)),
        content_area,
    );

    let footer =
        Paragraph::new("↑/↓: scroll  q/Esc/F1: close").style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, footer_area);
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyEventKind, KeyEventState, KeyModifiers};

    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn new_starts_at_top() {
        let state = HelpState::new(Screen::Office);
        assert_eq!(state.scroll(), 0);
        assert_eq!(state.origin(), Screen::Office);
    }

    mod handle_key {
        use super::*;

        #[test]
        fn up_at_zero_stays_zero() {
            let mut state = HelpState::new(Screen::Specialties);
            state.handle_key(press(KeyCode::Up));
            assert_eq!(state.scroll(), 0);
        }

        #[test]
        fn down_then_up() {
            let mut state = HelpState::new(Screen::Specialties);
            state.handle_key(press(KeyCode::Down));
            state.handle_key(press(KeyCode::Down));
            state.handle_key(press(KeyCode::Up));
            assert_eq!(state.scroll(), 1);
        }

        #[test]
        fn close_keys() {
            for code in [KeyCode::Esc, KeyCode::Char('q'), KeyCode::F(1)] {
                let mut state = HelpState::new(Screen::Specialties);
                assert_eq!(state.handle_key(press(code)), Action::CloseHelp);
            }
        }

        #[test]
        fn other_keys_ignored() {
            let mut state = HelpState::new(Screen::Office);
            assert_eq!(state.handle_key(press(KeyCode::Char('x'))), Action::None);
        }
    }

    mod content {
        use super::*;

        fn text(lines: &[Line<'_>]) -> String {
            lines
                .iter()
                .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
                .collect::<Vec<_>>()
                .join("\n")
        }

        #[test]
        fn specialties_lists_delete_and_globals() {
            let output = text(&help_content(Screen::Specialties));
            assert!(output.contains("Del / Ctrl+D"));
            assert!(output.contains("Ctrl+C"));
            assert!(!output.contains("Ctrl+S"));
        }

        #[test]
        fn office_lists_save_keys() {
            let output = text(&help_content(Screen::Office));
            assert!(output.contains("Ctrl+S"));
            assert!(output.contains("Enter on Logo"));
        }
    }

    mod rendering {
        use ratatui::Terminal;
        use ratatui::backend::TestBackend;

        use super::*;

        #[test]
        fn renders_title_with_origin() {
            let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
            let state = HelpState::new(Screen::Office);
            terminal
                .draw(|frame| draw_help(&state, frame, frame.area()))
                .unwrap();
            let buf = terminal.backend().buffer();
            let first_row: String = (0..buf.area.width)
                .map(|x| buf[(x, 0)].symbol().to_string())
                .collect();
            assert!(first_row.contains("Help"));
            assert!(first_row.contains("Office Settings"));
        }
    }
}
