//! NanoCore system timer
//!
//! Lives in the CSR register block: a seconds counter, a 20ns-unit
//! subsecond counter, and a compare register that paces the timer interrupt.
//! Hardware latches the seconds value when the subsecond register is read,
//! so the subsecond register must be read first.

/// CSR register block base address
const CSR_BASE: usize = 0x1004_0000;

/// Subsecond counter, 20ns units (read this first)
const TIMER_NS: usize = 0x30;
/// Seconds counter (latched by the subsecond read)
const TIMER_S: usize = 0x34;
/// Interval, in 20ns units, between timer interrupts
const TIMER_CMP: usize = 0x38;

/// A point in time as the hardware reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSpec {
    pub secs: u32,
    /// Subsecond part in nanoseconds
    pub nanos: u32,
}

/// System timer access (stateless; all state is the hardware's).
pub struct SystemTimer;

impl SystemTimer {
    #[inline]
    fn read_reg(offset: usize) -> u32 {
        let addr = (CSR_BASE + offset) as *const u32;
        // SAFETY: CSR block registers are memory-mapped at valid addresses
        unsafe { core::ptr::read_volatile(addr) }
    }

    #[inline]
    fn write_reg(offset: usize, value: u32) {
        let addr = (CSR_BASE + offset) as *mut u32;
        // SAFETY: CSR block registers are memory-mapped at valid addresses
        unsafe { core::ptr::write_volatile(addr, value) }
    }

    /// Current uptime. Subsecond register first; the read latches seconds.
    pub fn now() -> TimeSpec {
        let ticks_20ns = Self::read_reg(TIMER_NS);
        let secs = Self::read_reg(TIMER_S);
        TimeSpec {
            secs,
            nanos: ticks_20ns.saturating_mul(20),
        }
    }

    /// Uptime in microseconds, for stack timestamps.
    pub fn uptime_micros() -> i64 {
        let t = Self::now();
        (t.secs as i64) * 1_000_000 + (t.nanos as i64) / 1_000
    }

    /// Program the timer interrupt interval in 20ns units.
    pub fn set_compare(interval_20ns: u32) {
        Self::write_reg(TIMER_CMP, interval_20ns);
    }
}
