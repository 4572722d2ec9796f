use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::{Frame, Terminal};
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::api::Backend;

use super::action::{Action, ScreenState};
use super::error::AppError;
use super::screens::{
    HelpState, OfficeState, SpecialtiesState, draw_help, draw_office, draw_specialties,
};
use super::tasks::{Completion, MountId, TaskRunner, TaskScope};
use super::widgets::draw_feedback_bar;

/// How long the event loop waits for input before checking completions.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// All screens the app can navigate between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    /// Register and delete specialties.
    Specialties,
    /// Edit the office profile.
    Office,
}

impl Screen {
    /// Human-readable label for the header and help title.
    pub fn label(self) -> &'static str {
        match self {
            Self::Specialties => "Specialties",
            Self::Office => "Office Settings",
        }
    }
}

/// The view-model of the mounted screen.
#[derive(Debug)]
enum Mounted {
    Specialties(SpecialtiesState),
    Office(OfficeState),
}

impl Mounted {
    fn new(screen: Screen) -> Self {
        match screen {
            Screen::Specialties => Self::Specialties(SpecialtiesState::new()),
            Screen::Office => Self::Office(OfficeState::new()),
        }
    }

    fn screen(&self) -> Screen {
        match self {
            Self::Specialties(_) => Screen::Specialties,
            Self::Office(_) => Screen::Office,
        }
    }

    fn state(&self) -> &dyn ScreenState {
        match self {
            Self::Specialties(state) => state,
            Self::Office(state) => state,
        }
    }

    fn state_mut(&mut self) -> &mut dyn ScreenState {
        match self {
            Self::Specialties(state) => state,
            Self::Office(state) => state,
        }
    }
}

/// Top-level application state.
pub struct App {
    mounted: Mounted,
    /// Dropped, and so cancelled, whenever another screen is mounted.
    scope: TaskScope,
    runner: TaskRunner,
    completions: UnboundedReceiver<Completion>,
    help: Option<HelpState>,
    should_quit: bool,
}

impl App {
    /// Creates the app and mounts [`Screen::Specialties`], which starts its load
    /// on `runtime`.
    pub fn new(backend: Arc<dyn Backend>, runtime: Handle) -> Self {
        let (runner, completions) = TaskRunner::new(backend, runtime);
        let mut app = Self {
            mounted: Mounted::new(Screen::Specialties),
            scope: TaskScope::new(MountId::new(1)),
            runner,
            completions,
            help: None,
            should_quit: false,
        };
        let action = app.mounted.state_mut().begin_load();
        app.apply(action);
        app
    }

    /// Main event loop: draw → poll input → dispatch → apply completions → expire feedback.
    #[cfg_attr(coverage_nightly, coverage(off))]
    #[mutants::skip]
    pub fn run<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;
            if event::poll(POLL_INTERVAL)? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key, Instant::now());
                }
            }
            let now = Instant::now();
            self.process_completions(now);
            self.tick(now);
        }
        Ok(())
    }

    /// Handles a key event: global keys first, then the help overlay or the
    /// mounted screen.
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if let Some(help) = &mut self.help {
            let action = help.handle_key(key);
            self.apply(action);
            return;
        }

        let action = match key.code {
            KeyCode::F(1) => {
                self.help = Some(HelpState::new(self.screen()));
                Action::None
            }
            KeyCode::F(2) => Action::Navigate(Screen::Specialties),
            KeyCode::F(3) => Action::Navigate(Screen::Office),
            _ => self.mounted.state_mut().handle_key(key, now),
        };
        self.apply(action);
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::None => {}
            Action::Navigate(screen) => {
                if screen != self.screen() {
                    self.mount(screen);
                }
            }
            Action::Request(request) => {
                tracing::debug!(mount = ?self.scope.mount(), ?request, "spawning request");
                self.runner.spawn(&self.scope, request);
            }
            Action::CloseHelp => self.help = None,
            Action::Quit => self.should_quit = true,
        }
    }

    /// Tears down the current screen and mounts `screen`, issuing its load.
    fn mount(&mut self, screen: Screen) {
        let mount = self.scope.mount().next();
        tracing::info!(from = ?self.screen(), to = ?screen, ?mount, "switching screen");
        self.scope = TaskScope::new(mount);
        self.mounted = Mounted::new(screen);
        self.help = None;
        let action = self.mounted.state_mut().begin_load();
        self.apply(action);
    }

    /// Applies every completion already waiting. Returns how many reached the
    /// mounted screen.
    pub fn process_completions(&mut self, now: Instant) -> usize {
        let mut delivered = 0;
        while let Ok(completion) = self.completions.try_recv() {
            if self.deliver(completion, now) {
                delivered += 1;
            }
        }
        delivered
    }

    /// Waits for the next completion and applies it. Returns `false` if it was
    /// discarded because its screen is gone.
    pub async fn next_completion(&mut self, now: Instant) -> bool {
        match self.completions.recv().await {
            Some(completion) => self.deliver(completion, now),
            None => false,
        }
    }

    fn deliver(&mut self, completion: Completion, now: Instant) -> bool {
        if completion.mount != self.scope.mount() {
            tracing::debug!(mount = ?completion.mount, "discarding completion from unmounted screen");
            return false;
        }
        self.mounted.state_mut().apply(completion.outcome, now);
        true
    }

    /// Expires feedback on the mounted screen.
    pub fn tick(&mut self, now: Instant) {
        self.mounted.state_mut().tick(now);
    }

    /// Renders the header, the mounted screen, its feedback and the help overlay.
    #[cfg_attr(coverage_nightly, coverage(off))]
    #[mutants::skip]
    pub fn draw(&self, frame: &mut Frame) {
        let [header_area, body_area, feedback_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .areas(frame.area());

        let mut spans = vec![Span::styled(
            " clinic-admin ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )];
        for (key, screen) in [("F2", Screen::Specialties), ("F3", Screen::Office)] {
            let style = if screen == self.screen() {
                Style::default().fg(Color::Black).bg(Color::Cyan)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            spans.push(Span::raw(" "));
            spans.push(Span::styled(format!(" {key} {} ", screen.label()), style));
        }
        spans.push(Span::styled("  F1 help", Style::default().fg(Color::DarkGray)));
        frame.render_widget(Line::from(spans), header_area);

        match &self.mounted {
            Mounted::Specialties(state) => draw_specialties(state, frame, body_area),
            Mounted::Office(state) => draw_office(state, frame, body_area),
        }
        draw_feedback_bar(self.mounted.state().feedback(), frame, feedback_area);

        if let Some(help) = &self.help {
            draw_help(help, frame, centered(frame.area(), 60, 20));
        }
    }

    /// Returns the mounted screen.
    pub fn screen(&self) -> Screen {
        self.mounted.screen()
    }

    /// Returns the id of the current mount.
    pub fn mount_id(&self) -> MountId {
        self.scope.mount()
    }

    /// Returns `true` if the app should quit.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Returns the help overlay, if open.
    pub fn help(&self) -> Option<&HelpState> {
        self.help.as_ref()
    }

    /// Returns the specialties view-model when that screen is mounted.
    pub fn specialties(&self) -> Option<&SpecialtiesState> {
        match &self.mounted {
            Mounted::Specialties(state) => Some(state),
            Mounted::Office(_) => None,
        }
    }

    /// Returns the office view-model when that screen is mounted.
    pub fn office(&self) -> Option<&OfficeState> {
        match &self.mounted {
            Mounted::Office(state) => Some(state),
            Mounted::Specialties(_) => None,
        }
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    cell
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use crossterm::event::KeyEventState;

    use super::*;
    use crate::api::{ApiError, OfficePayload};
    use crate::model::{ConfirmedDelete, NewSpecialty, OfficeProfile, Specialty, SpecialtyId};
    use crate::tui::screens::LoadState;
    use crate::tui::tasks::Outcome;

    /// Answers every request immediately with fixed data.
    struct StubBackend;

    #[async_trait]
    impl Backend for StubBackend {
        async fn list_specialties(&self) -> Result<Vec<Specialty>, ApiError> {
            Ok(vec![Specialty {
                id: SpecialtyId::Number(1),
                name: "Cardiología".into(),
                description: None,
            }])
        }

        async fn create_specialty(&self, new: &NewSpecialty) -> Result<Specialty, ApiError> {
            Ok(Specialty {
                id: SpecialtyId::Number(2),
                name: new.name.clone(),
                description: new.description.clone(),
            })
        }

        async fn delete_specialty(&self, _target: &ConfirmedDelete) -> Result<(), ApiError> {
            Ok(())
        }

        async fn active_office(&self) -> Result<OfficeProfile, ApiError> {
            Ok(OfficeProfile {
                name: "Clinica X".into(),
                ..OfficeProfile::default()
            })
        }

        async fn save_office(&self, _payload: OfficePayload) -> Result<(), ApiError> {
            Ok(())
        }
    }

    fn make_app() -> App {
        App::new(Arc::new(StubBackend), Handle::current())
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn release(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        }
    }

    fn ctrl_c() -> KeyEvent {
        KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    mod mounting {
        use super::*;

        #[tokio::test]
        async fn new_mounts_specialties_and_loads() {
            let mut app = make_app();
            assert_eq!(app.screen(), Screen::Specialties);
            assert!(app.specialties().unwrap().load_state().is_loading());

            assert!(app.next_completion(Instant::now()).await);
            let state = app.specialties().unwrap();
            assert_eq!(state.load_state(), &LoadState::Ready);
            assert_eq!(state.specialties().len(), 1);
        }

        #[tokio::test]
        async fn f3_mounts_office_with_new_id() {
            let mut app = make_app();
            let first = app.mount_id();
            app.handle_key(press(KeyCode::F(3)), Instant::now());
            assert_eq!(app.screen(), Screen::Office);
            assert_ne!(app.mount_id(), first);
            assert!(app.office().unwrap().load_state().is_loading());
            assert!(app.specialties().is_none());
        }

        #[tokio::test]
        async fn navigating_to_current_screen_keeps_mount() {
            let mut app = make_app();
            let first = app.mount_id();
            app.handle_key(press(KeyCode::F(2)), Instant::now());
            assert_eq!(app.mount_id(), first);
        }

        #[tokio::test]
        async fn esc_on_office_goes_back() {
            let mut app = make_app();
            app.handle_key(press(KeyCode::F(3)), Instant::now());
            app.handle_key(press(KeyCode::Esc), Instant::now());
            assert_eq!(app.screen(), Screen::Specialties);
            assert!(!app.should_quit());
        }

        #[tokio::test]
        async fn stale_completion_is_discarded() {
            let mut app = make_app();
            let stale = app.mount_id();
            app.handle_key(press(KeyCode::F(3)), Instant::now());
            let completion = Completion {
                mount: stale,
                outcome: Outcome::SpecialtiesLoaded(Ok(vec![])),
            };
            assert!(!app.deliver(completion, Instant::now()));
            assert!(app.office().unwrap().load_state().is_loading());
        }
    }

    mod keys {
        use super::*;

        #[tokio::test]
        async fn ctrl_c_quits_anywhere() {
            let mut app = make_app();
            app.handle_key(press(KeyCode::F(1)), Instant::now());
            app.handle_key(ctrl_c(), Instant::now());
            assert!(app.should_quit());
        }

        #[tokio::test]
        async fn esc_on_specialties_quits() {
            let mut app = make_app();
            app.handle_key(press(KeyCode::Esc), Instant::now());
            assert!(app.should_quit());
        }

        #[tokio::test]
        async fn release_events_ignored() {
            let mut app = make_app();
            app.handle_key(release(KeyCode::Esc), Instant::now());
            assert!(!app.should_quit());
        }

        #[tokio::test]
        async fn help_opens_and_closes_without_remount() {
            let mut app = make_app();
            let mount = app.mount_id();
            app.handle_key(press(KeyCode::F(1)), Instant::now());
            assert_eq!(app.help().map(HelpState::origin), Some(Screen::Specialties));

            app.handle_key(press(KeyCode::Esc), Instant::now());
            assert!(app.help().is_none());
            assert!(!app.should_quit());
            assert_eq!(app.mount_id(), mount);
        }

        #[tokio::test]
        async fn help_swallows_screen_keys() {
            let mut app = make_app();
            app.handle_key(press(KeyCode::F(1)), Instant::now());
            app.handle_key(press(KeyCode::F(3)), Instant::now());
            assert_eq!(app.screen(), Screen::Specialties);
        }
    }

    mod completions {
        use super::*;

        #[tokio::test]
        async fn submit_round_trip_updates_screen() {
            let mut app = make_app();
            app.next_completion(Instant::now()).await;

            for ch in "Pediatría".chars() {
                app.handle_key(press(KeyCode::Char(ch)), Instant::now());
            }
            app.handle_key(press(KeyCode::Enter), Instant::now());
            assert!(app.next_completion(Instant::now()).await);

            let state = app.specialties().unwrap();
            assert_eq!(state.specialties()[0].name, "Pediatría");
            assert!(state.feedback().success().is_some());
        }

        #[tokio::test]
        async fn process_completions_without_pending_is_zero() {
            let mut app = make_app();
            app.next_completion(Instant::now()).await;
            assert_eq!(app.process_completions(Instant::now()), 0);
        }
    }

    mod rendering {
        use ratatui::backend::TestBackend;

        use super::*;

        fn render(app: &App) -> String {
            let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
            terminal.draw(|frame| app.draw(frame)).unwrap();
            let buf = terminal.backend().buffer();
            let mut s = String::new();
            for y in 0..buf.area.height {
                for x in 0..buf.area.width {
                    s.push(buf[(x, y)].symbol().chars().next().unwrap_or(' '));
                }
                s.push('\n');
            }
            s
        }

        #[tokio::test]
        async fn header_lists_both_screens() {
            let app = make_app();
            let output = render(&app);
            let header = output.lines().next().unwrap();
            assert!(header.contains("F2 Specialties"));
            assert!(header.contains("F3 Office Settings"));
        }

        #[tokio::test]
        async fn help_overlay_is_drawn() {
            let mut app = make_app();
            app.handle_key(press(KeyCode::F(1)), Instant::now());
            assert!(render(&app).contains("Help"));
        }
    }
}
