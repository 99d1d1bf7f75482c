//! Terminal renderer for the keypad lock mirror.
//!
//! Draws the lock icon, PIN slots and keypad with ratatui, and hosts the
//! application loop that owns the [`LockMirror`](crate::lock::LockMirror).
//!
//! # Example
//!
//! ```rust,ignore
//! use keypad_lock_monitor::tui::{App, EventHandler};
//!
//! let mut events = EventHandler::new(config.tui.refresh_interval());
//! let mut app = App::new(config, Arc::new(SystemSerialBackend), events.sender());
//! let mut terminal = keypad_lock_monitor::tui::setup_terminal()?;
//! app.run(&mut terminal, &mut events).await?;
//! ```

mod app;
mod event;
mod theme;
mod ui;

pub mod widgets;

pub use app::{App, Mode, PortPicker, RunState};
pub use event::{Event, EventHandler};
pub use theme::{Theme, THEMES};
pub use ui::{button_label, render, restore_terminal, setup_terminal, ScreenLayout};
