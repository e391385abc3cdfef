//! Word-level register file abstraction
//!
//! The DMA protocol logic never touches raw pointers itself; it goes through
//! `RegisterFile` so the same code drives real memory-mapped hardware and the
//! simulated register file used by the test suite.

/// Word read/write at fixed byte offsets from a register block base.
///
/// Implementations must not cache, elide, or reorder accesses: on the NanoCore
/// the hardware observes every write (an address write latches the length
/// write immediately before it), and status registers change underneath the
/// program between reads.
pub trait RegisterFile {
    /// Read the 32-bit register at `offset` bytes from the block base.
    fn read(&self, offset: usize) -> u32;

    /// Write the 32-bit register at `offset` bytes from the block base.
    fn write(&mut self, offset: usize, value: u32);
}

/// Memory-mapped register file over a fixed base address.
///
/// Every access is volatile. The Cv32e40p issues loads/stores to the
/// peripheral bus in program order, so volatile access order is the ordering
/// guarantee the hardware contract needs.
#[derive(Debug, Clone, Copy)]
pub struct Mmio {
    base: usize,
}

impl Mmio {
    /// Create a register file rooted at `base`.
    ///
    /// # Safety contract
    ///
    /// `base` must be the base of a device register block that is valid for
    /// 32-bit volatile access for the life of this value. Construction itself
    /// performs no access.
    pub const fn new(base: usize) -> Self {
        Self { base }
    }
}

impl RegisterFile for Mmio {
    #[inline]
    fn read(&self, offset: usize) -> u32 {
        let addr = (self.base + offset) as *const u32;
        // SAFETY: caller of `new` guarantees the block is mapped; device
        // registers are read with 32-bit volatile loads.
        unsafe { core::ptr::read_volatile(addr) }
    }

    #[inline]
    fn write(&mut self, offset: usize, value: u32) {
        let addr = (self.base + offset) as *mut u32;
        // SAFETY: caller of `new` guarantees the block is mapped; device
        // registers are written with 32-bit volatile stores.
        unsafe { core::ptr::write_volatile(addr, value) }
    }
}
