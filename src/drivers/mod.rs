//! Device drivers subsystem
//!
//! Organized by device class:
//! - `net`: packet DMA engine and network device drivers
//! - `uart`: NanoCore console UART
//! - `timer`: system timer (seconds + 20ns counter)
//! - `irq`: interrupt enable and dispatch

pub mod irq;
pub mod net;
pub mod timer;
pub mod uart;
