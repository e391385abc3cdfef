//! Network device drivers
//!
//! - `regfile`: word-level register access abstraction (MMIO in production,
//!   simulated in tests)
//! - `dma`: DMA register interface for the NanoCore NIC block
//! - `nanonic`: frame receive/transmit protocol on top of the DMA interface
//! - `netdev`: hardware-independent network device trait

pub mod dma;
pub mod nanonic;
pub mod netdev;
pub mod regfile;

#[cfg(test)]
pub(crate) mod sim;
