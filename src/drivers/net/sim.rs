//! Simulated NIC register file for protocol tests
//!
//! Stands in for the hardware side of the DMA handshake: tag and interrupt
//! reads come from scripted queues (falling back to the empty sentinel),
//! every write is recorded for ordering assertions, and the completion
//! counter can be programmed to go nonzero after the last expected receive
//! descriptor write, the way the hardware reports a finished transfer.

use super::dma::{DMA_CNT_RECV_PKT, DMA_INT, DMA_RECV_ADDR, DMA_TAG, SENTINEL};
use super::regfile::RegisterFile;
use core::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::vec::Vec;

pub struct SimRegs {
    tag_reads: RefCell<VecDeque<u32>>,
    irq_events: RefCell<VecDeque<u32>>,
    completion: Cell<u32>,
    completion_reads: Cell<u32>,
    // Remaining receive-address writes before the "hardware" reports done.
    recv_descriptors_until_complete: Cell<Option<u32>>,
    writes: Vec<(usize, u32)>,
}

impl SimRegs {
    pub fn new() -> Self {
        Self {
            tag_reads: RefCell::new(VecDeque::new()),
            irq_events: RefCell::new(VecDeque::new()),
            completion: Cell::new(0),
            completion_reads: Cell::new(0),
            recv_descriptors_until_complete: Cell::new(None),
            writes: Vec::new(),
        }
    }

    /// Script the next tag register read. Once the queue runs dry the tag
    /// reads as the empty sentinel.
    pub fn push_tag(&mut self, tag: u32) {
        self.tag_reads.borrow_mut().push_back(tag);
    }

    /// Script an interrupt queue event.
    pub fn push_irq_event(&mut self, event: u32) {
        self.irq_events.borrow_mut().push_back(event);
    }

    /// Force the completion counter, as hardware would.
    pub fn set_completion(&mut self, value: u32) {
        self.completion.set(value);
    }

    /// Report completion after `n` more receive descriptor (address) writes.
    pub fn complete_after_recv_descriptors(&mut self, n: u32) {
        self.recv_descriptors_until_complete.set(Some(n));
    }

    /// Every register write issued, in program order.
    pub fn writes(&self) -> &[(usize, u32)] {
        &self.writes
    }

    /// Writes issued to one register, in program order.
    pub fn writes_to(&self, offset: usize) -> Vec<u32> {
        self.writes
            .iter()
            .filter(|(off, _)| *off == offset)
            .map(|(_, v)| *v)
            .collect()
    }

    /// How many times the completion counter was polled.
    pub fn completion_reads(&self) -> u32 {
        self.completion_reads.get()
    }
}

impl RegisterFile for SimRegs {
    fn read(&self, offset: usize) -> u32 {
        match offset {
            DMA_TAG => self.tag_reads.borrow_mut().pop_front().unwrap_or(SENTINEL),
            DMA_INT => self.irq_events.borrow_mut().pop_front().unwrap_or(SENTINEL),
            DMA_CNT_RECV_PKT => {
                self.completion_reads.set(self.completion_reads.get() + 1);
                self.completion.get()
            }
            _ => 0,
        }
    }

    fn write(&mut self, offset: usize, value: u32) {
        self.writes.push((offset, value));
        match offset {
            DMA_CNT_RECV_PKT => self.completion.set(value),
            DMA_RECV_ADDR => {
                if let Some(remaining) = self.recv_descriptors_until_complete.get() {
                    if remaining <= 1 {
                        self.recv_descriptors_until_complete.set(None);
                        self.completion.set(1);
                    } else {
                        self.recv_descriptors_until_complete.set(Some(remaining - 1));
                    }
                }
            }
            _ => {}
        }
    }
}
