//! Ingestion queue
//!
//! The only state shared between the listener thread and the monitor loop.
//! The listener appends with `deliver()`; the loop swaps the whole backlog
//! out with `take()` once per tick, so the lock is held for one push or one
//! swap and never per drained item.
//!
//! While held, deliveries are discarded on the spot. A paused monitor never
//! accumulates a backlog.

use crate::osc::Packet;
use std::mem;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Default)]
struct Pending {
    held: bool,
    packets: Vec<Packet>,
    discarded: u64,
}

#[derive(Default)]
pub struct IngestQueue {
    pending: Mutex<Pending>,
}

impl IngestQueue {
    pub fn new() -> IngestQueue {
        IngestQueue::default()
    }

    fn lock(&self) -> MutexGuard<'_, Pending> {
        // Pending holds no invariant a panicking holder could break.
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queues `packet`, unless the queue is held. Returns whether it was kept.
    pub fn deliver(&self, packet: Packet) -> bool {
        let mut pending = self.lock();
        if pending.held {
            pending.discarded += 1;
            false
        } else {
            pending.packets.push(packet);
            true
        }
    }

    /// While held, every delivery is discarded. Packets already queued stay
    /// queued until the next `take()`.
    pub fn set_held(&self, held: bool) {
        self.lock().held = held;
    }

    pub fn is_held(&self) -> bool {
        self.lock().held
    }

    /// Moves out everything queued so far, in arrival order.
    pub fn take(&self) -> Vec<Packet> {
        mem::take(&mut self.lock().packets)
    }

    pub fn len(&self) -> usize {
        self.lock().packets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of packets discarded while held, since creation.
    pub fn discarded(&self) -> u64 {
        self.lock().discarded
    }
}
