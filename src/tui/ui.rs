//! UI rendering for the TUI.

use super::app::{App, Mode, PortPicker};
use super::widgets::{Keypad, LockIcon, PinDots};
use crate::link::ConnectionPhase;
use crate::lock::keypad::grid_size;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io::{self, Stdout};

const BUTTON_WIDTH: u16 = 24;

/// Label on the connect button for a connection phase.
pub fn button_label(phase: ConnectionPhase) -> &'static str {
    match phase {
        ConnectionPhase::Closed => "Connect to Arduino",
        ConnectionPhase::Requested => "Connecting...",
        ConnectionPhase::Open => "Connected",
    }
}

/// Set up the terminal for TUI rendering.
pub fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    crossterm::terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    crossterm::execute!(
        stdout,
        crossterm::terminal::EnterAlternateScreen,
        crossterm::event::EnableMouseCapture
    )?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

/// Restore the terminal to normal mode.
pub fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    crossterm::terminal::disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        crossterm::terminal::LeaveAlternateScreen,
        crossterm::event::DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Screen regions, shared by rendering and mouse hit-testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    pub title: Rect,
    pub lock: Rect,
    pub pin: Rect,
    pub keypad: Rect,
    pub button: Rect,
    pub status: Rect,
}

impl ScreenLayout {
    pub fn new(area: Rect) -> Self {
        let (grid_w, grid_h) = grid_size();

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),          // Title
                Constraint::Min(grid_h + 2),    // Lock + keypad
                Constraint::Length(3),          // Button
                Constraint::Length(1),          // Status bar
            ])
            .split(area);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(20), Constraint::Length(grid_w + 4)])
            .split(rows[1]);

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(9), Constraint::Length(3)])
            .split(body[0]);

        let button_row = rows[2];
        let button = Rect::new(
            button_row.x + button_row.width.saturating_sub(BUTTON_WIDTH) / 2,
            button_row.y,
            BUTTON_WIDTH.min(button_row.width),
            button_row.height,
        );

        Self {
            title: rows[0],
            lock: left[0],
            pin: left[1],
            keypad: body[1],
            button,
            status: rows[3],
        }
    }
}

/// Render the entire UI. Reads `app`, never mutates it.
pub fn render(app: &App, frame: &mut Frame) {
    let size = frame.area();
    let layout = ScreenLayout::new(size);

    frame.render_widget(
        Block::default().style(Style::default().bg(app.theme.bg).fg(app.theme.fg)),
        size,
    );

    render_title(app, frame, layout.title);
    render_lock(app, frame, layout.lock);
    render_pin(app, frame, layout.pin);
    render_keypad(app, frame, layout.keypad);
    render_button(app, frame, layout.button);
    render_status_bar(app, frame, layout.status);

    // Overlay modals
    match app.mode {
        Mode::PortPicker => render_port_picker(app, &app.picker, frame, size),
        Mode::Help => render_help_overlay(app, frame, size),
        Mode::Alert => render_alert_overlay(app, frame, size),
        Mode::Normal => {}
    }
}

fn render_title(app: &App, frame: &mut Frame, area: Rect) {
    let title = Paragraph::new(Line::from(Span::styled(
        "Keypad Lock",
        Style::default()
            .fg(app.theme.accent)
            .add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(app.theme.border)),
    );
    frame.render_widget(title, area);
}

fn render_lock(app: &App, frame: &mut Frame, area: Rect) {
    let state = app.mirror.lock_state;
    frame.render_widget(
        LockIcon {
            state,
            color: app.theme.lock_color(state),
        },
        area,
    );
}

fn render_pin(app: &App, frame: &mut Frame, area: Rect) {
    frame.render_widget(
        PinDots {
            entered: &app.mirror.entered,
            filled: app.theme.fg,
            empty: app.theme.inactive,
        },
        area,
    );
}

fn render_keypad(app: &App, frame: &mut Frame, area: Rect) {
    frame.render_widget(
        Keypad {
            highlight: app.highlighted_key(),
            key_color: app.theme.fg,
            border_color: app.theme.border,
            highlight_color: app.theme.accent,
        },
        area,
    );
}

fn render_button(app: &App, frame: &mut Frame, area: Rect) {
    let phase = app.link.phase();
    let enabled = phase == ConnectionPhase::Closed;
    let color = if enabled { app.theme.accent } else { app.theme.inactive };
    let mut label_style = Style::default().fg(color);
    if enabled {
        label_style = label_style.add_modifier(Modifier::BOLD);
    }

    let button = Paragraph::new(Line::styled(button_label(phase), label_style))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(color)),
        );
    frame.render_widget(button, area);
}

fn render_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let port_info = match app.link.port_name() {
        Some(port) => format!("{} @ {}", port, app.link_baud()),
        None => "Not connected".to_string(),
    };
    let status_text = app.status_message.as_deref().unwrap_or("Ready");
    let keybinds = "c:connect  ?:help  q:quit";

    let status = Line::from(vec![
        Span::styled(format!(" {} ", port_info), Style::default().fg(app.theme.fg)),
        Span::raw("| "),
        Span::styled(
            app.mirror.lock_state.label(),
            Style::default().fg(app.theme.lock_color(app.mirror.lock_state)),
        ),
        Span::raw(" | "),
        Span::styled(status_text.to_string(), Style::default().fg(app.theme.fg)),
        Span::raw(" | "),
        Span::styled(keybinds, Style::default().fg(app.theme.inactive)),
    ]);

    frame.render_widget(
        Paragraph::new(status).style(Style::default().bg(app.theme.selection)),
        area,
    );
}

fn render_port_picker(app: &App, picker: &PortPicker, frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 50, area);
    frame.render_widget(Clear, popup_area);

    let items: Vec<ListItem> = picker
        .ports
        .iter()
        .enumerate()
        .map(|(i, port)| {
            let selected = i == picker.selected;
            let prefix = if selected { "> " } else { "  " };
            let text = match &port.description {
                Some(desc) => format!("{}{}  ({})", prefix, port.name, desc),
                None => format!("{}{}", prefix, port.name),
            };
            let style = if selected {
                Style::default()
                    .fg(app.theme.fg)
                    .bg(app.theme.selection)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(app.theme.fg)
            };
            ListItem::new(text).style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.accent))
            .title(" Select serial port (Enter: connect, Esc: cancel) ")
            .style(Style::default().bg(app.theme.bg)),
    );
    frame.render_widget(list, popup_area);
}

fn render_alert_overlay(app: &App, frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 30, area);
    frame.render_widget(Clear, popup_area);

    let message = app.alert.as_deref().unwrap_or_default();
    let text = vec![
        Line::from(Span::styled(message.to_string(), Style::default().fg(app.theme.wrong))),
        Line::from(""),
        Line::from(Span::styled(
            "Press Enter or Esc to dismiss",
            Style::default().fg(app.theme.inactive),
        )),
    ];

    let alert = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.wrong))
                .title(" Alert ")
                .style(Style::default().bg(app.theme.bg)),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(alert, popup_area);
}

fn render_help_overlay(app: &App, frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let help_text = vec![
        Line::from(Span::styled(
            "Keybindings",
            Style::default()
                .fg(app.theme.accent)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("  c / Enter  - Connect to the device"),
        Line::from("  click      - Press the connect button"),
        Line::from("  ? / F1     - Show help"),
        Line::from("  q / Ctrl+C - Quit"),
        Line::from(""),
        Line::from("Port picker:"),
        Line::from("  Up/Down    - Move selection"),
        Line::from("  Enter      - Open the selected port"),
        Line::from("  Esc        - Cancel"),
        Line::from(""),
        Line::from(Span::styled(
            "Press Esc or F1 to close",
            Style::default().fg(app.theme.inactive),
        )),
    ];

    let help_widget = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.accent))
                .title(" Help ")
                .style(Style::default().bg(app.theme.bg)),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(help_widget, popup_area);
}

/// Create a centered rectangle with the given percentage of the parent area.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
