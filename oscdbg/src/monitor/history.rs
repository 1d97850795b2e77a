//! History
//!
//! Bounded FIFO of the packets the monitor displays. Appending past the
//! capacity evicts the oldest entries. Capacity follows the viewport and may
//! change between ticks; a shrink takes effect at the next `append()`, even
//! when nothing new arrives.

use crate::osc::Packet;
use std::collections::{vec_deque, VecDeque};

/// Initial capacity, used until the first viewport size is known.
pub const DEFAULT_CAPACITY: usize = 50;

/// What an `append()` did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Appended {
    pub added: usize,
    pub evicted: usize,
}

impl Appended {
    pub fn changed(&self) -> bool {
        self.added > 0 || self.evicted > 0
    }
}

pub struct History {
    packets: VecDeque<Packet>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        History::new(DEFAULT_CAPACITY)
    }
}

impl History {
    pub fn new(capacity: usize) -> History {
        History {
            packets: VecDeque::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Takes effect at the next `append()`.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
    }

    /// Appends `incoming` in order, then evicts oldest first until the
    /// length fits the capacity.
    pub fn append(&mut self, incoming: impl IntoIterator<Item = Packet>) -> Appended {
        let mut result = Appended::default();
        for packet in incoming {
            self.packets.push_back(packet);
            result.added += 1;
            if self.packets.len() > self.capacity {
                self.packets.pop_front();
                result.evicted += 1;
            }
        }
        while self.packets.len() > self.capacity {
            self.packets.pop_front();
            result.evicted += 1;
        }
        result
    }

    pub fn len(&self) -> usize {
        self.packets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packets.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Packet> {
        self.packets.get(index)
    }

    pub fn iter(&self) -> vec_deque::Iter<'_, Packet> {
        self.packets.iter()
    }
}
