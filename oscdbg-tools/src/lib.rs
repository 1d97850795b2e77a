use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use oscdbg::monitor::Command;
use oscdbg::osc::util;
use oscdbg::osc::ListenerConfig;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::time::Duration;

pub mod tui;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "osc-monitor",
    version,
    about = "Watch live OSC traffic, pause it and inspect individual packets"
)]
pub struct MonitorOpts {
    /// UDP port to listen on
    #[arg(short = 'p', long = "port", default_value_t = util::DEFAULT_PORT)]
    pub port: u16,

    /// Local address to bind (0.0.0.0 listens on every interface)
    #[arg(
        short = 'b',
        long = "bind",
        default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED)
    )]
    pub bind: IpAddr,

    /// Screen refresh period in milliseconds
    #[arg(long = "tick-ms", default_value_t = 100, value_name = "MS")]
    pub tick_ms: u64,

    /// Write log output to this file
    #[arg(long = "log", value_name = "FILE")]
    pub log: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long = "log-level", default_value = "info", value_name = "LEVEL")]
    pub log_level: String,
}

impl MonitorOpts {
    pub fn listener_config(&self) -> ListenerConfig {
        ListenerConfig {
            bind: self.bind,
            port: self.port,
        }
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }
}

/// Maps a key press to the monitor command it triggers, if any.
pub fn command_for(key: KeyEvent) -> Option<Command> {
    match key.code {
        KeyCode::Char(' ') => Some(Command::ToggleHold),
        KeyCode::Up | KeyCode::Char('k') => Some(Command::NavigateUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Command::NavigateDown),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Command::RequestQuit)
        }
        KeyCode::Char('q') | KeyCode::Esc => Some(Command::RequestQuit),
        _ => None,
    }
}
