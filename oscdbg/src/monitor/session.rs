//! Monitor session
//!
//! The tick-driven main loop. A tick that finds the `Interrupt` flag set
//! quits right away. Otherwise, in order:
//! 1. drains the ingest queue into the history,
//! 2. polls every pending input command without blocking and applies it,
//! 3. recomputes the layout from the viewport, which sets the history
//!    capacity used by the next drain,
//! 4. hands a `Frame` to the renderer.
//!
//! Between ticks the loop waits one tick period. It ends once a quit was
//! requested, either as a command or through the `Interrupt` flag, and then
//! stops the receiver before returning.
//!
//! Terminal I/O stays behind the `Input` and `Renderer` traits.

use super::history::History;
use super::ingest::IngestQueue;
use super::layout::{Layout, Viewport};
use super::state::{Command, Redraw, UiState};
use crate::osc::{Packet, Receiver};
use std::io;
use std::ops::Range;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Default tick period.
pub const DEFAULT_TICK: Duration = Duration::from_millis(100);

/// Source of operator commands and of the viewport size.
pub trait Input {
    /// Every command available right now, in arrival order. Must not block.
    fn poll(&mut self) -> io::Result<Vec<Command>>;

    fn viewport(&mut self) -> io::Result<Viewport>;
}

pub trait Renderer {
    fn render(&mut self, frame: &Frame<'_>) -> io::Result<()>;
}

/// Read-only snapshot handed to the renderer once per tick.
pub struct Frame<'a> {
    pub history: &'a History,
    pub state: &'a UiState,
    pub layout: &'a Layout,
    /// What changed since the previous frame.
    pub redraw: Redraw,
    /// Where packets are being received.
    pub endpoint: &'a str,
    /// Packets thrown away while paused.
    pub discarded: u64,
}

impl Frame<'_> {
    /// The packet under the cursor, only while paused.
    pub fn selected_packet(&self) -> Option<&Packet> {
        if self.state.is_paused() {
            self.history.get(self.state.selected())
        } else {
            None
        }
    }

    /// History indices to draw in the list pane.
    pub fn visible(&self) -> Range<usize> {
        let cursor = self.state.is_paused().then(|| self.state.selected());
        self.layout.visible(self.history.len(), cursor)
    }
}

/// Cooperative cancellation flag, safe to trigger from a signal handler.
/// A triggered session quits at the start of its next tick.
#[derive(Debug, Clone, Default)]
pub struct Interrupt(Arc<AtomicBool>);

impl Interrupt {
    pub fn new() -> Interrupt {
        Interrupt::default()
    }

    pub fn trigger(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("input failed: {0}")]
    Input(#[source] io::Error),
    #[error("render failed: {0}")]
    Render(#[source] io::Error),
}

pub struct Session {
    ingest: Arc<IngestQueue>,
    receiver: Option<Receiver>,
    history: History,
    state: UiState,
    layout: Option<Layout>,
    pending: Redraw,
    interrupt: Interrupt,
    endpoint: String,
    tick: Duration,
}

impl Session {
    pub fn new(ingest: Arc<IngestQueue>) -> Session {
        Session {
            ingest,
            receiver: None,
            history: History::default(),
            state: UiState::new(),
            layout: None,
            pending: Redraw::FULL,
            interrupt: Interrupt::new(),
            endpoint: String::new(),
            tick: DEFAULT_TICK,
        }
    }

    /// Attaches the receiver feeding the ingest queue. It is stopped when
    /// the session ends.
    pub fn with_receiver(mut self, receiver: Receiver) -> Session {
        self.endpoint = receiver.endpoint();
        self.receiver = Some(receiver);
        self
    }

    pub fn with_tick(mut self, tick: Duration) -> Session {
        self.tick = tick;
        self
    }

    pub fn with_interrupt(mut self, interrupt: Interrupt) -> Session {
        self.interrupt = interrupt;
        self
    }

    pub fn interrupt(&self) -> Interrupt {
        self.interrupt.clone()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn ingest(&self) -> &Arc<IngestQueue> {
        &self.ingest
    }

    pub fn receiver(&self) -> Option<&Receiver> {
        self.receiver.as_ref()
    }

    /// Moves everything queued into the history and re-clamps the cursor.
    pub fn drain(&mut self) -> Redraw {
        let appended = self.history.append(self.ingest.take());
        if !appended.changed() {
            return Redraw::NONE;
        }
        self.state.clamp(self.history.len());
        Redraw {
            full: false,
            list: true,
            inspector: self.state.is_paused(),
        }
    }

    /// Applies one command, keeping the ingest queue's hold in step with the
    /// pause state.
    pub fn dispatch(&mut self, command: Command) -> Redraw {
        let was_paused = self.state.is_paused();
        let mut redraw = Redraw::NONE;
        match command {
            Command::ToggleHold if !was_paused => {
                // Hold first, so whatever is still queued is the last thing
                // to reach the history before the pause.
                self.ingest.set_held(true);
                redraw |= self.drain();
            }
            Command::RequestQuit => self.ingest.set_held(true),
            _ => {}
        }
        redraw |= self.state.apply(command, self.history.len());
        if was_paused && !self.state.is_paused() {
            self.ingest.set_held(false);
        }
        if was_paused != self.state.is_paused() {
            tracing::debug!(paused = self.state.is_paused(), "hold toggled");
        }
        redraw
    }

    /// Runs one tick.
    pub fn tick<I: Input, R: Renderer>(
        &mut self,
        input: &mut I,
        renderer: &mut R,
    ) -> Result<(), SessionError> {
        if self.interrupt.is_triggered() {
            tracing::info!("interrupted");
            self.dispatch(Command::RequestQuit);
            return Ok(());
        }

        let mut redraw = self.pending | self.drain();

        for command in input.poll().map_err(SessionError::Input)? {
            redraw |= self.dispatch(command);
            if !self.state.is_running() {
                return Ok(());
            }
        }

        let viewport = input.viewport().map_err(SessionError::Input)?;
        let layout = Layout::compute(viewport, self.state.is_paused());
        if self.layout != Some(layout) {
            redraw = Redraw::FULL;
            self.layout = Some(layout);
        }
        self.history.set_capacity(layout.capacity());

        let frame = Frame {
            history: &self.history,
            state: &self.state,
            layout: &layout,
            redraw,
            endpoint: &self.endpoint,
            discarded: self.ingest.discarded(),
        };
        renderer.render(&frame).map_err(SessionError::Render)?;
        self.pending = Redraw::NONE;
        Ok(())
    }

    /// Ticks until a quit is requested, then shuts down. The receiver is
    /// stopped even if a tick fails.
    pub fn run<I: Input, R: Renderer>(
        &mut self,
        input: &mut I,
        renderer: &mut R,
    ) -> Result<(), SessionError> {
        let result = self.run_ticks(input, renderer);
        self.shutdown();
        result
    }

    fn run_ticks<I: Input, R: Renderer>(
        &mut self,
        input: &mut I,
        renderer: &mut R,
    ) -> Result<(), SessionError> {
        let ticker = crossbeam::channel::tick(self.tick);
        while self.state.is_running() {
            self.tick(input, renderer)?;
            if self.state.is_running() {
                // A tick channel never disconnects.
                let _ = ticker.recv();
            }
        }
        Ok(())
    }

    /// Stops accepting packets and releases the transport. Idempotent.
    pub fn shutdown(&mut self) {
        self.ingest.set_held(true);
        if let Some(receiver) = self.receiver.as_mut() {
            receiver.stop();
        }
    }
}
