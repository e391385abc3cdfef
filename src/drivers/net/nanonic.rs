//! NanoCore NIC packet driver
//!
//! Frame receive/transmit over the DMA register interface. Every frame moves
//! with a fixed 16-byte metadata prefix: the hardware expects one metadata
//! descriptor ahead of the frame descriptors in both directions. The receive
//! metadata scratch is all zero; the transmit metadata's second word is the
//! fixed `0x80` framing flag. Neither is payload.
//!
//! Receive and transmit use disjoint register ranges and can interleave
//! freely. Each call is a self-contained transaction; no state survives
//! between frames beyond the statistics counters.

use super::dma::{DmaEngine, PollBudget};
use super::netdev::{NetworkDevice, NetworkError};
use super::regfile::RegisterFile;
use crate::net::ethernet::MacAddress;
use crate::println;

/// Metadata prefix size in 32-bit words.
pub const META_WORDS: usize = 4;
/// Metadata prefix size in bytes, both directions.
pub const META_BYTES: u32 = 16;
/// Fixed framing flag in the second transmit metadata word.
pub const TX_META_FLAG: u32 = 0x80;

/// Largest frame the driver buffers for a single receive (standard MTU plus
/// headers, as the MAC delivers it).
pub const MAX_FRAME_SIZE: usize = 1536;

/// Largest length the 16-bit DMA length fields can describe.
pub const MAX_DMA_LEN: usize = 0xFFFF;

/// MAC address the board ships with (programmable, not read from hardware).
pub const DEFAULT_MAC: MacAddress = MacAddress::new([0x00, 0x0A, 0x35, 0x00, 0x01, 0x02]);

/// Frame counters, readable for diagnostics.
#[derive(Debug, Clone, Copy, Default)]
pub struct NicStats {
    /// Frames received and delivered to a caller buffer
    pub rx_frames: u32,
    /// Pending frames drained and discarded because no buffer could hold them
    pub rx_dropped: u32,
    /// Non-empty tags that decoded to a zero length (protocol violation)
    pub rx_bad_tag: u32,
    /// Receives abandoned because the completion wait exhausted its budget
    pub rx_stalled: u32,
    /// Frames queued for transmission
    pub tx_frames: u32,
}

/// NanoCore NIC driver state.
///
/// Generic over the register file so the protocol runs against real MMIO or
/// the simulated registers in tests.
pub struct NanoNic<R: RegisterFile> {
    dma: DmaEngine<R>,
    budget: PollBudget,
    // Metadata scratch regions, one per direction. DMA reads/writes these
    // ahead of the frame bytes in every transaction.
    meta_recv: [u32; META_WORDS],
    meta_send: [u32; META_WORDS],
    // Bounce buffer for draining pending frames nobody can take.
    drop_buf: [u8; MAX_FRAME_SIZE],
    mac_address: MacAddress,
    enabled: bool,
    stats: NicStats,
}

impl<R: RegisterFile> NanoNic<R> {
    pub fn new(regs: R) -> Self {
        Self {
            dma: DmaEngine::new(regs),
            budget: PollBudget::Forever,
            meta_recv: [0; META_WORDS],
            meta_send: [0, TX_META_FLAG, 0, 0],
            drop_buf: [0; MAX_FRAME_SIZE],
            mac_address: DEFAULT_MAC,
            enabled: false,
            stats: NicStats::default(),
        }
    }

    /// Bound the completion busy-wait (tests); production keeps `Forever`.
    pub fn with_poll_budget(mut self, budget: PollBudget) -> Self {
        self.budget = budget;
        self
    }

    pub fn set_mac_address(&mut self, mac: MacAddress) {
        self.mac_address = mac;
    }

    pub fn stats(&self) -> NicStats {
        self.stats
    }

    pub fn dma(&self) -> &DmaEngine<R> {
        &self.dma
    }

    pub fn dma_mut(&mut self) -> &mut DmaEngine<R> {
        &mut self.dma
    }

    /// Enable the DMA subsystem (two-phase magic sequence) and mark the
    /// device usable.
    pub fn enable(&mut self) {
        self.dma.enable();
        self.enabled = true;
    }

    fn recv_meta_addr(&self) -> u32 {
        self.meta_recv.as_ptr() as usize as u32
    }

    fn send_meta_addr(&self) -> u32 {
        self.meta_send.as_ptr() as usize as u32
    }

    /// Poll for one received frame into a single contiguous buffer.
    ///
    /// Non-blocking while no frame is pending; once the tag reports a frame,
    /// blocks on the DMA completion. Returns the frame length.
    pub fn try_recv(&mut self, buf: &mut [u8]) -> Option<usize> {
        let addr = buf.as_ptr() as usize as u32;
        let capacity = buf.len();
        self.recv_transaction(capacity, |dma, len| {
            dma.recv_descriptor(len as u32, addr);
        })
    }

    /// Poll for one received frame scattered across a fragment chain.
    ///
    /// One descriptor pair is issued per fragment, in chain order, before the
    /// completion wait; hardware accumulates fragments until the full frame
    /// length has landed.
    pub fn try_recv_chained(&mut self, frags: &mut [&mut [u8]]) -> Option<usize> {
        // Collect (addr, len) up front; the closure below can't borrow frags
        // while the driver is mutably borrowed.
        let capacity = frags.iter().map(|f| f.len()).sum();
        let frag_desc: heapless_chain::Chain = heapless_chain::collect(frags);
        self.recv_transaction(capacity, |dma, len| {
            let mut remaining = len;
            for &(addr, frag_len) in frag_desc.iter() {
                if remaining == 0 {
                    break;
                }
                let take = frag_len.min(remaining);
                dma.recv_descriptor(take as u32, addr);
                remaining -= take;
            }
        })
    }

    /// Shared receive transaction: tag poll, validation, completion-counter
    /// reset, metadata descriptor, caller-supplied frame descriptors, wait.
    fn recv_transaction(
        &mut self,
        capacity: usize,
        arm_frame: impl FnOnce(&mut DmaEngine<R>, usize),
    ) -> Option<usize> {
        if !self.enabled {
            return None;
        }

        let tag = self.dma.read_tag();
        if tag.is_empty() {
            return None;
        }

        let len = tag.frame_len() as usize;
        if len == 0 {
            // Non-empty tag must carry a nonzero length; drop, don't crash.
            println!("[NIC] protocol violation: pending tag 0x{:08X} with zero length", tag.0);
            self.stats.rx_bad_tag += 1;
            return None;
        }

        if capacity < len {
            self.drain_pending(len);
            return None;
        }

        // Stale nonzero counter would read as a false completion; zero it
        // before the first descriptor write.
        self.dma.clear_completion();
        let meta_addr = self.recv_meta_addr();
        self.dma.recv_descriptor(META_BYTES, meta_addr);
        arm_frame(&mut self.dma, len);

        if !self.dma.wait_completion(self.budget) {
            println!("[NIC] receive completion wait exhausted ({} bytes pending)", len);
            self.stats.rx_stalled += 1;
            return None;
        }

        self.stats.rx_frames += 1;
        Some(len)
    }

    /// Drain and discard the pending frame through the bounce buffer so the
    /// tag register does not sit pending forever when no buffer is available.
    fn drain_pending(&mut self, len: usize) {
        println!("[NIC] no buffer for {} byte frame, discarding", len);
        self.dma.clear_completion();
        let meta_addr = self.recv_meta_addr();
        let drop_addr = self.drop_buf.as_ptr() as usize as u32;
        self.dma.recv_descriptor(META_BYTES, meta_addr);
        // Hardware accumulates descriptors until `len` bytes have landed, so
        // reusing the one bounce buffer for every chunk is fine.
        let mut remaining = len;
        while remaining > 0 {
            let take = remaining.min(self.drop_buf.len());
            self.dma.recv_descriptor(take as u32, drop_addr);
            remaining -= take;
        }
        if !self.dma.wait_completion(self.budget) {
            self.stats.rx_stalled += 1;
        }
        self.stats.rx_dropped += 1;
    }

    /// Queue one contiguous frame for transmission. Fire-and-forget: the
    /// hardware starts on the sentinel write and the call never waits.
    pub fn send(&mut self, frame: &[u8]) -> Result<(), NetworkError> {
        self.send_chained(&[frame])
    }

    /// Queue a fragmented frame for transmission.
    ///
    /// Descriptor order on the wire: metadata pair, one pair per non-empty
    /// fragment in chain order, then the chain-terminating sentinel address.
    pub fn send_chained(&mut self, frags: &[&[u8]]) -> Result<(), NetworkError> {
        if !self.enabled {
            return Err(NetworkError::NotEnabled);
        }

        let total: usize = frags.iter().map(|f| f.len()).sum();
        if total == 0 {
            return Err(NetworkError::FrameEmpty);
        }
        if total > MAX_DMA_LEN {
            return Err(NetworkError::FrameTooLarge);
        }

        // Metadata descriptor length word: low half is the 16-byte prefix,
        // high half carries the total frame length for the hardware framer.
        let meta_len = ((total as u32) << 16) | META_BYTES;
        let meta_addr = self.send_meta_addr();
        self.dma.send_descriptor(meta_len, meta_addr);

        for frag in frags.iter().filter(|f| !f.is_empty()) {
            let addr = frag.as_ptr() as usize as u32;
            self.dma.send_descriptor(frag.len() as u32, addr);
        }

        self.dma.end_send_chain();
        self.stats.tx_frames += 1;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn test_meta_addrs(&self) -> (u32, u32) {
        (self.recv_meta_addr(), self.send_meta_addr())
    }

    #[cfg(test)]
    pub(crate) fn test_meta_send_words(&self) -> [u32; META_WORDS] {
        self.meta_send
    }

    #[cfg(test)]
    pub(crate) fn test_drop_buf_addr(&self) -> u32 {
        self.drop_buf.as_ptr() as usize as u32
    }
}

/// Fixed-capacity fragment descriptor list, enough for any pbuf-style chain
/// the stack hands down.
mod heapless_chain {
    const MAX_FRAGS: usize = 16;

    pub struct Chain {
        descs: [(u32, usize); MAX_FRAGS],
        len: usize,
    }

    impl Chain {
        pub fn iter(&self) -> core::slice::Iter<'_, (u32, usize)> {
            self.descs[..self.len].iter()
        }
    }

    pub fn collect(frags: &[&mut [u8]]) -> Chain {
        let mut chain = Chain {
            descs: [(0, 0); MAX_FRAGS],
            len: 0,
        };
        for frag in frags.iter().filter(|f| !f.is_empty()) {
            if chain.len == MAX_FRAGS {
                break;
            }
            chain.descs[chain.len] = (frag.as_ptr() as usize as u32, frag.len());
            chain.len += 1;
        }
        chain
    }
}

impl<R: RegisterFile> NetworkDevice for NanoNic<R> {
    fn init(&mut self) -> Result<(), NetworkError> {
        self.enable();
        Ok(())
    }

    fn recv(&mut self, buf: &mut [u8]) -> Option<usize> {
        self.try_recv(buf)
    }

    fn send(&mut self, frame: &[u8]) -> Result<(), NetworkError> {
        self.send_chained(&[frame])
    }

    fn mac_address(&self) -> MacAddress {
        self.mac_address
    }
}
