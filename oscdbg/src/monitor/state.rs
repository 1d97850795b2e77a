//! UI state machine
//!
//! Run/hold mode and the inspection cursor. Changed only by discrete
//! `Command`s, each returning the `Redraw` it requires.

use std::ops::{BitOr, BitOrAssign};

/// Logical input events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Pause or resume the stream.
    ToggleHold,
    NavigateUp,
    NavigateDown,
    RequestQuit,
}

/// Which parts of the screen need repainting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Redraw {
    /// Repaint everything, including borders.
    pub full: bool,
    pub list: bool,
    pub inspector: bool,
}

impl Redraw {
    pub const NONE: Redraw = Redraw {
        full: false,
        list: false,
        inspector: false,
    };

    pub const FULL: Redraw = Redraw {
        full: true,
        list: true,
        inspector: true,
    };

    /// The cursor moved: list marker and inspected packet change.
    pub const SELECTION: Redraw = Redraw {
        full: false,
        list: true,
        inspector: true,
    };

    pub fn is_empty(&self) -> bool {
        *self == Redraw::NONE
    }
}

impl BitOr for Redraw {
    type Output = Redraw;

    fn bitor(self, rhs: Redraw) -> Redraw {
        Redraw {
            full: self.full || rhs.full,
            list: self.list || rhs.list,
            inspector: self.inspector || rhs.inspector,
        }
    }
}

impl BitOrAssign for Redraw {
    fn bitor_assign(&mut self, rhs: Redraw) {
        *self = *self | rhs;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiState {
    running: bool,
    paused: bool,
    selected: usize,
}

impl Default for UiState {
    fn default() -> Self {
        UiState::new()
    }
}

impl UiState {
    pub fn new() -> UiState {
        UiState {
            running: true,
            paused: false,
            selected: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Cursor position. Only meaningful while paused.
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Applies `command` against a history of `len` packets.
    pub fn apply(&mut self, command: Command, len: usize) -> Redraw {
        match command {
            Command::ToggleHold => {
                self.paused = !self.paused;
                self.selected = 0;
                Redraw::FULL
            }
            Command::NavigateUp => self.move_cursor(self.selected.saturating_sub(1), len),
            Command::NavigateDown => self.move_cursor(self.selected.saturating_add(1), len),
            Command::RequestQuit => {
                self.running = false;
                Redraw::NONE
            }
        }
    }

    fn move_cursor(&mut self, target: usize, len: usize) -> Redraw {
        if !self.paused {
            return Redraw::NONE;
        }
        let before = self.selected;
        self.selected = target;
        self.clamp(len);
        if self.selected == before {
            Redraw::NONE
        } else {
            Redraw::SELECTION
        }
    }

    /// Pulls the cursor back inside a history of `len` packets. Returns
    /// whether it moved.
    pub fn clamp(&mut self, len: usize) -> bool {
        let last = len.saturating_sub(1);
        if self.selected > last {
            self.selected = last;
            true
        } else {
            false
        }
    }
}
