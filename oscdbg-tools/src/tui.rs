//! Crossterm front end for the monitor session: terminal setup and the
//! `Input` and `Renderer` implementations.

use crate::command_for;
use chrono::Local;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::style::{Attribute, Color, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::{cursor, style, terminal, ExecutableCommand, QueueableCommand};
use oscdbg::monitor::{Command, Frame, Input, Rect, Renderer, Viewport};
use oscdbg::osc::Packet;
use std::io::{self, Write};
use std::time::Duration;

pub const TITLE: &str = "OSC Debugger";

pub struct Tui {
    stdout: io::Stdout,
}

impl Tui {
    pub fn setup() -> io::Result<Self> {
        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        stdout.execute(terminal::EnterAlternateScreen)?;
        stdout.execute(cursor::Hide)?;
        stdout.execute(terminal::SetTitle(TITLE))?;
        Ok(Self { stdout })
    }

    /// Restores the terminal. Safe to call more than once, including from a
    /// panic hook on a fresh `Tui`.
    pub fn teardown(&mut self) {
        let _ = self.stdout.execute(cursor::Show);
        let _ = self.stdout.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
        let _ = self.stdout.flush();
    }

    pub fn restore() {
        Tui {
            stdout: io::stdout(),
        }
        .teardown();
    }
}

/// Keyboard input, read without blocking.
#[derive(Default)]
pub struct TerminalInput;

impl Input for TerminalInput {
    fn poll(&mut self) -> io::Result<Vec<Command>> {
        let mut commands = Vec::new();
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                // Windows also reports releases.
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                commands.extend(command_for(key));
            }
        }
        Ok(commands)
    }

    fn viewport(&mut self) -> io::Result<Viewport> {
        let (width, height) = terminal::size()?;
        Ok(Viewport { width, height })
    }
}

pub struct TerminalRenderer {
    stdout: io::Stdout,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self {
            stdout: io::stdout(),
        }
    }
}

impl Renderer for TerminalRenderer {
    fn render(&mut self, frame: &Frame<'_>) -> io::Result<()> {
        let layout = frame.layout;
        if frame.redraw.full {
            self.stdout
                .queue(terminal::Clear(terminal::ClearType::All))?;
            self.draw_box(layout.list, "Packets")?;
            if let Some(inspector) = layout.inspector {
                self.draw_box(inspector, "Inspector")?;
            }
        }

        self.draw_header(frame)?;
        if frame.redraw.list {
            self.draw_list(frame)?;
        }
        if let (true, Some(inspector)) = (frame.redraw.inspector, layout.inspector) {
            let lines = inspector_lines(frame.selected_packet());
            self.draw_lines(inspector.inner(), &lines)?;
        }
        self.stdout.flush()
    }
}

impl TerminalRenderer {
    fn draw_header(&mut self, frame: &Frame<'_>) -> io::Result<()> {
        let width = usize::from(frame.layout.header.width);
        if frame.layout.header.height == 0 || width == 0 {
            return Ok(());
        }
        let (status, color) = if frame.state.is_paused() {
            ("Paused", Color::Yellow)
        } else {
            ("Running", Color::Green)
        };
        let rest = format!(
            " | {} | {} packets | {} discarded | {} | Space pause, j/k select, q quit",
            frame.endpoint,
            frame.history.len(),
            frame.discarded,
            Local::now().format("%H:%M:%S"),
        );

        self.stdout.queue(cursor::MoveTo(0, 0))?;
        self.stdout.queue(SetAttribute(Attribute::Bold))?;
        self.stdout.queue(SetForegroundColor(color))?;
        self.stdout.queue(style::Print(fit(status, width)))?;
        self.stdout.queue(ResetColor)?;
        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        let used = status.chars().count().min(width);
        self.stdout
            .queue(style::Print(fit(&rest, width - used)))?;
        Ok(())
    }

    fn draw_list(&mut self, frame: &Frame<'_>) -> io::Result<()> {
        let area = frame.layout.list.inner();
        let width = usize::from(area.width);
        let visible = frame.visible();
        let cursor = frame.state.is_paused().then(|| frame.state.selected());

        for row in 0..area.height {
            let index = visible.start + usize::from(row);
            self.stdout.queue(cursor::MoveTo(area.x, area.y + row))?;
            let packet = match frame.history.get(index).filter(|_| index < visible.end) {
                Some(packet) => packet,
                None => {
                    self.stdout.queue(style::Print(fit("", width)))?;
                    continue;
                }
            };
            if cursor == Some(index) {
                self.stdout.queue(SetAttribute(Attribute::Reverse))?;
                self.stdout
                    .queue(style::Print(fit(&format!("> {}", packet.summary()), width)))?;
                self.stdout.queue(SetAttribute(Attribute::Reset))?;
            } else {
                self.stdout
                    .queue(style::Print(fit(&format!("  {}", packet.summary()), width)))?;
            }
        }
        Ok(())
    }

    /// Writes `lines` into `area`, one per row, blanking the rows below.
    fn draw_lines(&mut self, area: Rect, lines: &[String]) -> io::Result<()> {
        let width = usize::from(area.width);
        for row in 0..area.height {
            let line = lines.get(usize::from(row)).map_or("", String::as_str);
            self.stdout.queue(cursor::MoveTo(area.x, area.y + row))?;
            self.stdout.queue(style::Print(fit(line, width)))?;
        }
        Ok(())
    }

    fn draw_box(&mut self, rect: Rect, title: &str) -> io::Result<()> {
        if rect.width < 2 || rect.height < 2 {
            return Ok(());
        }
        let inner = usize::from(rect.width - 2);
        let label: String = format!(" {} ", title).chars().take(inner).collect();
        let fill = inner - label.chars().count();

        self.stdout.queue(cursor::MoveTo(rect.x, rect.y))?;
        self.stdout
            .queue(style::Print(format!("┌{}{}┐", label, "─".repeat(fill))))?;
        for row in 1..rect.height - 1 {
            self.stdout.queue(cursor::MoveTo(rect.x, rect.y + row))?;
            self.stdout.queue(style::Print("│"))?;
            self.stdout
                .queue(cursor::MoveTo(rect.x + rect.width - 1, rect.y + row))?;
            self.stdout.queue(style::Print("│"))?;
        }
        self.stdout
            .queue(cursor::MoveTo(rect.x, rect.y + rect.height - 1))?;
        self.stdout
            .queue(style::Print(format!("└{}┘", "─".repeat(inner))))?;
        Ok(())
    }
}

/// Inspector pane contents for the packet under the cursor.
pub fn inspector_lines(packet: Option<&Packet>) -> Vec<String> {
    let packet = match packet {
        Some(packet) => packet,
        None => return vec!["No packet selected".to_string()],
    };
    let mut lines = vec![
        format!("Address: {}", packet.address),
        format!("Source:  {}", packet.source),
        format!("Bundle:  {}", if packet.is_bundle { "yes" } else { "no" }),
        String::new(),
        format!("Arguments ({}):", packet.arguments.len()),
    ];
    if packet.arguments.is_empty() {
        lines.push("  (none)".to_string());
    }
    for (i, arg) in packet.arguments.iter().enumerate() {
        lines.push(format!("  [{}] {:<7} {}", i, arg.type_name(), arg.detail()));
    }
    lines
}

/// Cuts `text` to `width` characters and pads it with spaces to exactly that.
fn fit(text: &str, width: usize) -> String {
    let mut out: String = text.chars().take(width).collect();
    let len = out.chars().count();
    out.extend(std::iter::repeat(' ').take(width - len));
    out
}
