#![allow(dead_code)]

use oscdbg::monitor::{Command, Frame, Input, Redraw, Renderer, Viewport};
use oscdbg::osc::Packet;
use std::collections::VecDeque;
use std::io;

pub fn pkt(address: &str) -> Packet {
    Packet::new(address, vec![], "127.0.0.1:57120")
}

/// Viewport whose list pane holds exactly `capacity` packets.
pub fn viewport_for(capacity: u16) -> Viewport {
    Viewport {
        width: 80,
        height: capacity + 3,
    }
}

/// Input that replays one batch of commands per tick.
pub struct ScriptedInput {
    pub batches: VecDeque<Vec<Command>>,
    pub viewport: Viewport,
}

impl ScriptedInput {
    pub fn new(capacity: u16) -> ScriptedInput {
        ScriptedInput {
            batches: VecDeque::new(),
            viewport: viewport_for(capacity),
        }
    }

    pub fn push(&mut self, commands: &[Command]) {
        self.batches.push_back(commands.to_vec());
    }
}

impl Input for ScriptedInput {
    fn poll(&mut self) -> io::Result<Vec<Command>> {
        Ok(self.batches.pop_front().unwrap_or_default())
    }

    fn viewport(&mut self) -> io::Result<Viewport> {
        Ok(self.viewport)
    }
}

#[derive(Debug, Clone)]
pub struct RenderedFrame {
    pub addresses: Vec<String>,
    pub visible: std::ops::Range<usize>,
    pub paused: bool,
    pub selected: Option<String>,
    pub redraw: Redraw,
    pub endpoint: String,
    pub discarded: u64,
}

/// Renderer that keeps a summary of every frame it was given.
#[derive(Default)]
pub struct RecordingRenderer {
    pub frames: Vec<RenderedFrame>,
}

impl RecordingRenderer {
    pub fn last(&self) -> &RenderedFrame {
        self.frames.last().expect("nothing rendered")
    }
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, frame: &Frame<'_>) -> io::Result<()> {
        self.frames.push(RenderedFrame {
            addresses: frame.history.iter().map(|p| p.address.clone()).collect(),
            visible: frame.visible(),
            paused: frame.state.is_paused(),
            selected: frame.selected_packet().map(|p| p.address.clone()),
            redraw: frame.redraw,
            endpoint: frame.endpoint.to_string(),
            discarded: frame.discarded,
        });
        Ok(())
    }
}

pub fn osc_string(s: &str) -> Vec<u8> {
    let mut out = s.as_bytes().to_vec();
    out.push(0);
    while out.len() % 4 != 0 {
        out.push(0);
    }
    out
}

pub fn osc_message(address: &str, tags: &str, data: &[u8]) -> Vec<u8> {
    let mut out = osc_string(address);
    out.extend(osc_string(&format!(",{}", tags)));
    out.extend(data);
    out
}

pub fn osc_bundle(elements: &[Vec<u8>]) -> Vec<u8> {
    let mut out = osc_string("#bundle");
    out.extend(1u64.to_be_bytes());
    for element in elements {
        out.extend((element.len() as i32).to_be_bytes());
        out.extend(element);
    }
    out
}
