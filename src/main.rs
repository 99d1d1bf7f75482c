//! Terminal entry point.
//!
//! # Usage
//!
//! ```bash
//! keypad-lock-monitor
//! keypad-lock-monitor --port /dev/ttyACM0
//! keypad-lock-monitor --config ./keypad-lock.toml --print-config
//! ```

use clap::Parser;
use keypad_lock_monitor::config::ConfigLoader;
use keypad_lock_monitor::port::SystemSerialBackend;
use keypad_lock_monitor::tui::{self, App, EventHandler};
use keypad_lock_monitor::{logging, AppResult};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Mirror a serial keypad lock in the terminal.",
    long_about = "Reads KEY:<c> and STATE:<name> lines from a keypad lock at 115200 baud and draws the lock icon, entered PIN and keypad."
)]
struct Args {
    /// Configuration file to load instead of the standard locations.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to preselect in the port picker.
    #[arg(short, long)]
    port: Option<String>,

    /// Print the effective configuration as TOML and exit.
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let args = Args::parse();

    let loader = ConfigLoader::load(args.config.as_deref())?;
    if args.print_config {
        print!("{}", loader.to_toml()?);
        return Ok(());
    }

    let mut config = loader.into_config();
    if let Some(port) = args.port {
        config.serial.preferred_port = Some(port);
    }

    // Logs only go to a file; stderr belongs to the TUI.
    logging::init(&config.logging)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting");

    let mut events = EventHandler::new(config.tui.refresh_interval());
    let mut app = App::new(config, Arc::new(SystemSerialBackend), events.sender());

    let mut terminal = tui::setup_terminal()?;
    let result = app.run(&mut terminal, &mut events).await;
    tui::restore_terminal(terminal)?;

    tracing::info!("exiting");
    Ok(result?)
}
