//! TUI application state and main loop.

use super::event::{Event, EventHandler};
use super::theme::Theme;
use super::ui::{self, ScreenLayout};
use crate::config::Config;
use crate::link::{LinkEvent, SerialLink};
use crate::lock::{interpret_line, keypad, DeviceMessage, LockMirror};
use crate::port::{PortConfiguration, PortInfo, SerialBackend};
use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::{Position, Rect};
use ratatui::{backend::Backend, Terminal};
use std::io;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

/// Which surface currently receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Main screen
    #[default]
    Normal,
    /// Choosing a serial port
    PortPicker,
    /// A blocking alert is shown
    Alert,
    /// Help overlay
    Help,
}

/// Whether the main loop keeps going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Quitting,
}

/// Ports offered by the current port request.
#[derive(Debug, Clone, Default)]
pub struct PortPicker {
    pub ports: Vec<PortInfo>,
    pub selected: usize,
}

impl PortPicker {
    /// Build a picker, preselecting `preferred` when it is in the list.
    pub fn new(ports: Vec<PortInfo>, preferred: Option<&str>) -> Self {
        let selected = preferred
            .and_then(|name| ports.iter().position(|p| p.name == name))
            .unwrap_or(0);
        Self { ports, selected }
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.selected + 1 < self.ports.len() {
            self.selected += 1;
        }
    }

    pub fn selected_port(&self) -> Option<&PortInfo> {
        self.ports.get(self.selected)
    }
}

/// Main TUI application.
pub struct App {
    pub state: RunState,
    pub mode: Mode,
    pub theme: Theme,
    pub config: Config,

    /// Mirrored device state; only `handle_event` mutates it
    pub mirror: LockMirror,
    /// Last key reported by the device, for highlighting
    pub last_key: Option<char>,

    /// Serial connection owner
    pub link: SerialLink,
    pub picker: PortPicker,

    /// Text of the blocking alert, while `mode == Alert`
    pub alert: Option<String>,
    /// Status message to display
    pub status_message: Option<String>,

    /// Last known terminal area, for mouse hit-testing
    pub screen: Rect,

    events: UnboundedSender<Event>,
}

impl App {
    /// Create an application that opens ports through `backend` and feeds
    /// serial lines into `events`.
    pub fn new(
        config: Config,
        backend: Arc<dyn SerialBackend>,
        events: UnboundedSender<Event>,
    ) -> Self {
        let theme = match Theme::by_name(&config.tui.theme) {
            Some(theme) => theme.clone(),
            None => {
                warn!(theme = config.tui.theme.as_str(), "unknown theme, using dark");
                Theme::default()
            }
        };
        let port_config = PortConfiguration::with_read_buffer_size(config.serial.read_buffer_size);

        Self {
            state: RunState::Running,
            mode: Mode::Normal,
            theme,
            config,
            mirror: LockMirror::new(),
            last_key: None,
            link: SerialLink::new(backend, port_config),
            picker: PortPicker::default(),
            alert: None,
            status_message: None,
            screen: Rect::default(),
            events,
        }
    }

    /// Run the application main loop until the user quits.
    pub async fn run<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        events: &mut EventHandler,
    ) -> io::Result<()> {
        let size = terminal.size()?;
        self.screen = Rect::new(0, 0, size.width, size.height);

        while self.state == RunState::Running {
            terminal.draw(|frame| ui::render(self, frame))?;

            match events.next().await {
                Some(event) => self.handle_event(event).await,
                None => self.state = RunState::Quitting,
            }
        }

        self.link.close().await;
        Ok(())
    }

    /// Apply one event. This is the only place application state changes.
    pub async fn handle_event(&mut self, event: Event) {
        match event {
            Event::Tick => {}
            Event::Key(key) => self.handle_key(key).await,
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(width, height) => {
                self.screen = Rect::new(0, 0, width, height);
            }
            Event::Link(LinkEvent::Line { id, line }) => {
                if self.link.is_current(id) {
                    self.apply_line(&line);
                } else {
                    debug!(id, line = %line, "dropping line from stale connection");
                }
            }
            Event::Link(LinkEvent::Closed { id, port }) => {
                if self.link.handle_closed(id) {
                    self.status_message = Some(format!("Device on {} disconnected", port));
                }
            }
            Event::Error(err) => {
                self.status_message = Some(format!("Error: {}", err));
            }
        }
    }

    /// Feed one device line through the interpreter.
    pub fn apply_line(&mut self, line: &str) {
        if let Some(DeviceMessage::Key(c)) = DeviceMessage::parse(line) {
            self.last_key = Some(c);
        }
        interpret_line(&mut self.mirror, line);
    }

    /// Keypad index to highlight.
    pub fn highlighted_key(&self) -> Option<usize> {
        self.last_key.and_then(keypad::index_of)
    }

    pub fn link_baud(&self) -> u32 {
        crate::port::DEVICE_BAUD_RATE
    }

    async fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.state = RunState::Quitting;
            return;
        }

        match self.mode {
            Mode::Normal => self.handle_normal_key(key),
            Mode::PortPicker => self.handle_picker_key(key).await,
            Mode::Alert => self.handle_alert_key(key),
            Mode::Help => self.handle_help_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.state = RunState::Quitting,
            KeyCode::Char('c') | KeyCode::Enter | KeyCode::Char(' ') => self.press_connect(),
            KeyCode::F(1) | KeyCode::Char('?') => self.mode = Mode::Help,
            _ => {}
        }
    }

    async fn handle_picker_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.picker.move_up(),
            KeyCode::Down | KeyCode::Char('j') => self.picker.move_down(),
            KeyCode::Enter => self.connect_selected_port().await,
            KeyCode::Esc | KeyCode::Char('q') => {
                self.link.cancel_request();
                self.mode = Mode::Normal;
            }
            _ => {}
        }
    }

    fn handle_alert_key(&mut self, key: KeyEvent) {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
            self.alert = None;
            self.mode = Mode::Normal;
        }
    }

    fn handle_help_key(&mut self, key: KeyEvent) {
        if matches!(
            key.code,
            KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('q') | KeyCode::Char('?')
        ) {
            self.mode = Mode::Normal;
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.mode != Mode::Normal || mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        let button = ScreenLayout::new(self.screen).button;
        if button.contains(Position::new(mouse.column, mouse.row)) {
            self.press_connect();
        }
    }

    /// The connect button. Disabled while a port is open.
    pub fn press_connect(&mut self) {
        if self.link.is_open() {
            return;
        }

        match self.link.request_port() {
            Ok(ports) => {
                self.picker = PortPicker::new(ports, self.config.serial.preferred_port.as_deref());
                self.mode = Mode::PortPicker;
            }
            Err(e) => self.show_alert(e.to_string()),
        }
    }

    async fn connect_selected_port(&mut self) {
        let Some(port) = self.picker.selected_port().map(|p| p.name.clone()) else {
            self.link.cancel_request();
            self.mode = Mode::Normal;
            return;
        };

        self.mode = Mode::Normal;
        match self.link.connect(&port, self.events.clone()).await {
            Ok(id) => {
                info!(port = port.as_str(), id, "connected");
                self.status_message = Some(format!("Connected to {}", port));
            }
            Err(e) => self.show_alert(e.to_string()),
        }
    }

    /// Show a blocking alert; keys other than dismiss are swallowed.
    pub fn show_alert(&mut self, message: String) {
        self.alert = Some(message);
        self.mode = Mode::Alert;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::ConnectionPhase;
    use crate::lock::LockState;
    use crate::port::MockSerialBackend;
    use ratatui::backend::TestBackend;
    use tokio::sync::mpsc;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn app_with(backend: &MockSerialBackend) -> (App, mpsc::UnboundedReceiver<Event>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let app = App::new(Config::default(), Arc::new(backend.clone()), tx);
        (app, rx)
    }

    fn screen_text(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| ui::render(app, frame)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[tokio::test]
    async fn test_connect_flow_through_picker() {
        let backend = MockSerialBackend::new();
        backend.add_port("COM1");
        backend.add_port("COM4");
        let (mut app, _rx) = app_with(&backend);
        app.config.serial.preferred_port = Some("COM4".into());

        app.handle_event(key(KeyCode::Char('c'))).await;
        assert_eq!(app.mode, Mode::PortPicker);
        assert_eq!(app.picker.selected_port().unwrap().name, "COM4");
        assert_eq!(app.link.phase(), ConnectionPhase::Requested);
        assert!(screen_text(&app).contains("Connecting..."));

        app.handle_event(key(KeyCode::Enter)).await;
        assert_eq!(app.mode, Mode::Normal);
        assert!(app.link.is_open());
        assert_eq!(backend.open_log(), vec!["COM4"]);
        assert!(screen_text(&app).contains("Connected"));

        // Connect is disabled while open.
        app.handle_event(key(KeyCode::Char('c'))).await;
        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(backend.open_log().len(), 1);
    }

    #[tokio::test]
    async fn test_lines_from_link_update_mirror() {
        let backend = MockSerialBackend::new();
        let port = backend.add_port("COM1");
        let (mut app, mut rx) = app_with(&backend);

        app.press_connect();
        app.handle_event(key(KeyCode::Enter)).await;
        port.enqueue_read(b"KEY:1\nKEY:2\nKEY:B\n");
        port.close();

        let mut seen_close = false;
        while !seen_close {
            let event = tokio::time::timeout(std::time::Duration::from_secs(1), rx.recv())
                .await
                .expect("event")
                .expect("channel open");
            seen_close = matches!(event, Event::Link(LinkEvent::Closed { .. }));
            app.handle_event(event).await;
        }

        assert_eq!(app.mirror.entered.as_str(), "12");
        assert_eq!(app.last_key, Some('B'));
        assert_eq!(app.highlighted_key(), Some(7));
        assert!(!app.link.is_open());
        assert!(app.status_message.as_deref().unwrap().contains("disconnected"));
        assert_eq!(app.mode, Mode::Normal);
    }

    #[tokio::test]
    async fn test_open_failure_shows_alert() {
        let backend = MockSerialBackend::new();
        backend.add_port("COM3");
        backend.mark_busy("COM3");
        let (mut app, _rx) = app_with(&backend);

        app.press_connect();
        app.handle_event(key(KeyCode::Enter)).await;
        assert_eq!(app.mode, Mode::Alert);
        assert!(app.alert.as_deref().unwrap().contains("COM3"));
        assert!(screen_text(&app).contains("Alert"));

        // Alert swallows other keys.
        app.handle_event(key(KeyCode::Char('q'))).await;
        assert_eq!(app.state, RunState::Running);
        app.handle_event(key(KeyCode::Esc)).await;
        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.link.phase(), ConnectionPhase::Closed);
    }

    #[tokio::test]
    async fn test_unsupported_platform_alert() {
        let backend = MockSerialBackend::new();
        backend.set_unsupported(true);
        let (mut app, _rx) = app_with(&backend);
        app.press_connect();
        assert_eq!(app.mode, Mode::Alert);
        assert!(app.alert.as_deref().unwrap().contains("not supported"));
    }

    #[tokio::test]
    async fn test_picker_escape_cancels_request() {
        let backend = MockSerialBackend::new();
        backend.add_port("COM1");
        let (mut app, _rx) = app_with(&backend);
        app.press_connect();
        app.handle_event(key(KeyCode::Esc)).await;
        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.link.phase(), ConnectionPhase::Closed);
        assert!(backend.open_log().is_empty());
    }

    #[tokio::test]
    async fn test_mouse_click_on_button() {
        let backend = MockSerialBackend::new();
        backend.add_port("COM1");
        let (mut app, _rx) = app_with(&backend);
        app.handle_event(Event::Resize(80, 24)).await;

        let button = ScreenLayout::new(app.screen).button;
        app.handle_event(Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: button.x + 1,
            row: button.y + 1,
            modifiers: KeyModifiers::NONE,
        }))
        .await;
        assert_eq!(app.mode, Mode::PortPicker);
    }

    #[test]
    fn test_render_reflects_mirror() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = App::new(Config::default(), Arc::new(MockSerialBackend::new()), tx);

        let text = screen_text(&app);
        assert!(text.contains("Keypad Lock"));
        assert!(text.contains("Connect to Arduino"));
        assert!(text.contains("LOCKED"));
        assert!(text.contains("○"));

        app.apply_line("KEY:4");
        app.apply_line("KEY:2");
        app.apply_line("STATE:WRONG");
        assert_eq!(app.mirror.lock_state, LockState::Wrong);
        let text = screen_text(&app);
        assert!(text.contains("WRONG"));
        assert!(!text.contains("●"));

        app.apply_line("KEY:9");
        assert!(screen_text(&app).contains("●"));
    }

    #[tokio::test]
    async fn test_quit_keys() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = App::new(Config::default(), Arc::new(MockSerialBackend::new()), tx);
        app.handle_event(key(KeyCode::Char('?'))).await;
        assert_eq!(app.mode, Mode::Help);
        app.handle_event(key(KeyCode::Esc)).await;
        app.handle_event(Event::Key(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
        )))
        .await;
        assert_eq!(app.state, RunState::Quitting);
    }
}
