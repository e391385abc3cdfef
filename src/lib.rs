//! nanonet - packet DMA driver for the NanoCore (Cv32e40p) NIC
//!
//! The NanoCore carries a hardware DMA/NIC block that moves Ethernet frames
//! between host memory and the wire. Firmware talks to it through a small set
//! of memory-mapped registers: a tag register reporting pending receive
//! frames, length/address register pairs describing transfer buffers, and a
//! completion counter. This crate implements that producer/consumer protocol
//! (`drivers::net`), the interrupt-driven completion path (`drivers::irq`),
//! and a smoltcp link-layer adapter (`net::iface`) so the driver plugs into a
//! TCP/IP stack the same way an lwIP netif would.
//!
//! All register access goes through the `RegisterFile` abstraction, so the
//! protocol logic runs unmodified against a software-simulated register file
//! in the test suite.

#![cfg_attr(not(test), no_std)]

pub mod drivers;
pub mod net;

use core::fmt;
#[cfg(target_arch = "riscv32")]
use core::fmt::Write;

/// Initialize the base platform devices (console first, so later bring-up
/// stages can print).
pub fn init() {
    #[cfg(target_arch = "riscv32")]
    drivers::uart::WRITER.lock().init();
}

/// Print implementation that acquires the UART writer lock
///
/// On non-riscv32 targets there is no NanoCore UART to write to; diagnostics
/// are discarded and tests assert on driver state instead.
#[doc(hidden)]
pub fn _print(args: fmt::Arguments) {
    #[cfg(target_arch = "riscv32")]
    drivers::uart::WRITER
        .lock()
        .write_fmt(args)
        .expect("Printing to UART failed");

    #[cfg(not(target_arch = "riscv32"))]
    let _ = args;
}

/// Print macro for console output
#[macro_export]
macro_rules! print {
    ($($arg:tt)*) => ($crate::_print(format_args!($($arg)*)));
}

/// Println macro for console output
#[macro_export]
macro_rules! println {
    () => ($crate::print!("\n"));
    ($($arg:tt)*) => ($crate::print!("{}\n", format_args!($($arg)*)));
}
