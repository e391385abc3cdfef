//! DMA register interface for the NanoCore NIC block
//!
//! The NIC block lives at `0x1007_0000` and is driven entirely through
//! (length, address) register write pairs. The register roles split into:
//!
//! - **read-only status**: `DMA_INT` (interrupt event queue, self-advancing on
//!   every read) and `DMA_TAG` (pending receive frame tag). Reading these is
//!   how hardware hands events to firmware; reads consume state.
//! - **write-triggered action**: `DMA_RECV_LEN`/`DMA_RECV_ADDR` and
//!   `DMA_SEND_LEN`/`DMA_SEND_ADDR`. Each address write latches the length
//!   write immediately before it and queues one DMA descriptor, so the
//!   length-then-address order is a hardware contract, never to be reordered
//!   or coalesced.
//! - **shared counter**: `DMA_CNT_RECV_PKT`, zeroed by the foreground path
//!   before arming a receive and set nonzero by hardware (or the DMA
//!   interrupt handler) on completion.
//!
//! There are no error returns at this layer: a hardware fault shows up as a
//! completion wait that never finishes. `PollBudget` bounds that spin for
//! test builds; production uses `PollBudget::Forever` to keep the original
//! blocking contract.

use super::regfile::RegisterFile;

/// NIC DMA register block base address.
pub const DMA_BASE: usize = 0x1007_0000;

/// Interrupt event queue (read, self-advancing). `0x8000_0000` means empty;
/// bit 31 set with any other bits means a receive completed; bit 31 clear
/// means a transmit completed.
pub const DMA_INT: usize = 0x00;
/// Receive tag: empty sentinel or pending frame length in the low 16 bits (read).
pub const DMA_TAG: usize = 0x04;
/// Length of the next receive descriptor (write; latched by the address write).
pub const DMA_RECV_LEN: usize = 0x08;
/// Buffer address of the next receive descriptor (write; triggers DMA action).
pub const DMA_RECV_ADDR: usize = 0x0C;
/// Length of the next transmit descriptor (write; latched by the address write).
pub const DMA_SEND_LEN: usize = 0x10;
/// Buffer address of the next transmit descriptor (write). Writing the
/// sentinel terminates the descriptor chain and starts transmission.
pub const DMA_SEND_ADDR: usize = 0x14;
/// Completion counter: 0 = pending, nonzero = complete (write 0 to arm).
pub const DMA_CNT_RECV_PKT: usize = 0x18;
/// DMA enable: write the magic guard value, then 1.
pub const DMA_START_EN: usize = 0x1C;

/// Reserved value meaning "empty" (tag, interrupt queue, UART read) or
/// "end of descriptor chain" (transmit address register). Never a valid
/// (nonzero-length, real-address) value.
pub const SENTINEL: u32 = 0x8000_0000;

/// Guard value the enable register expects before accepting the enable bit.
pub const ENABLE_MAGIC: u32 = 0x1234;

/// Raw value of the receive tag register.
///
/// Encoding: `0x8000_0000` exactly means no frame pending; any other value
/// carries the pending frame's byte length in the low 16 bits. The register
/// advances on reads in receive mode, so the tag must be re-read on every
/// poll rather than cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagWord(pub u32);

impl TagWord {
    /// No frame pending.
    pub fn is_empty(self) -> bool {
        self.0 == SENTINEL
    }

    /// Pending frame length in bytes. Meaningless when `is_empty()`.
    pub fn frame_len(self) -> u16 {
        (self.0 & 0xFFFF) as u16
    }
}

/// Bound on the completion busy-wait.
///
/// The hardware protocol has no timeout: a NIC that never completes hangs the
/// spin forever. `Forever` preserves that contract for production;
/// `Bounded(n)` lets tests give up on simulated non-responsive hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollBudget {
    Forever,
    Bounded(u32),
}

/// Primitive operations over the NIC DMA register block.
///
/// Stateless beyond the hardware's own registers; every method is one small
/// transaction on the register file.
pub struct DmaEngine<R: RegisterFile> {
    regs: R,
}

impl<R: RegisterFile> DmaEngine<R> {
    pub fn new(regs: R) -> Self {
        Self { regs }
    }

    pub fn regs(&self) -> &R {
        &self.regs
    }

    pub fn regs_mut(&mut self) -> &mut R {
        &mut self.regs
    }

    /// Enable the DMA subsystem: magic guard value first, then the enable bit.
    pub fn enable(&mut self) {
        self.regs.write(DMA_START_EN, ENABLE_MAGIC);
        self.regs.write(DMA_START_EN, 1);
    }

    /// Peek the receive tag register.
    pub fn read_tag(&self) -> TagWord {
        TagWord(self.regs.read(DMA_TAG))
    }

    /// Zero the completion counter.
    ///
    /// Must happen before the descriptors of a new receive are armed; a stale
    /// nonzero value reads back as a false "already complete".
    pub fn clear_completion(&mut self) {
        self.regs.write(DMA_CNT_RECV_PKT, 0);
    }

    /// Busy-poll the completion counter until it goes nonzero.
    ///
    /// Returns `false` only when a bounded budget ran out first. The spin
    /// does not yield; the interrupt handler can still run during it and
    /// satisfy the wait by setting the counter.
    pub fn wait_completion(&self, budget: PollBudget) -> bool {
        match budget {
            PollBudget::Forever => {
                while self.regs.read(DMA_CNT_RECV_PKT) == 0 {}
                true
            }
            PollBudget::Bounded(limit) => {
                for _ in 0..limit {
                    if self.regs.read(DMA_CNT_RECV_PKT) != 0 {
                        return true;
                    }
                }
                false
            }
        }
    }

    /// Queue one receive descriptor: length first, then the address write
    /// that latches it and triggers the hardware.
    pub fn recv_descriptor(&mut self, len: u32, addr: u32) {
        self.regs.write(DMA_RECV_LEN, len);
        self.regs.write(DMA_RECV_ADDR, addr);
    }

    /// Queue one transmit descriptor (length, then latching address write).
    pub fn send_descriptor(&mut self, len: u32, addr: u32) {
        self.regs.write(DMA_SEND_LEN, len);
        self.regs.write(DMA_SEND_ADDR, addr);
    }

    /// Terminate the transmit descriptor chain. Hardware begins transmission
    /// on seeing the sentinel address.
    pub fn end_send_chain(&mut self) {
        self.regs.write(DMA_SEND_ADDR, SENTINEL);
    }

    /// Drain the interrupt event queue, crediting receive completions to the
    /// completion counter.
    ///
    /// Reads `DMA_INT` until the empty sentinel comes back. Events with bit 31
    /// set are receive completions (low 16 bits carry the DMA start address)
    /// and set the counter to 1 - the same counter the polling path waits on,
    /// with the same sentinel encoding. Events with bit 31 clear are transmit
    /// completions; transmit is fire-and-forget, so they are consumed and
    /// ignored. Returns the number of receive completions seen.
    pub fn drain_irq_events(&mut self) -> u32 {
        let mut rx_completions = 0;
        let mut event = self.regs.read(DMA_INT);
        while event != SENTINEL {
            if event & SENTINEL != 0 {
                self.regs.write(DMA_CNT_RECV_PKT, 1);
                rx_completions += 1;
            }
            event = self.regs.read(DMA_INT);
        }
        rx_completions
    }
}
