//! Network device abstraction
//!
//! Minimal interface a TCP/IP stack's link-layer driver hooks need: receive
//! one frame into a caller-supplied buffer (length or nothing), transmit one
//! frame (success or failure). Buffers stay owned by the caller for the whole
//! call; drivers only read or fill them for the duration of the transfer.

use crate::net::ethernet::MacAddress;
use core::fmt;

/// Errors surfaced by network device operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkError {
    /// Device is not enabled/initialized
    NotEnabled,

    /// Frame is empty (nothing to transmit)
    FrameEmpty,

    /// Frame exceeds what the DMA length fields can describe
    FrameTooLarge,
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkError::NotEnabled => write!(f, "Device not enabled"),
            NetworkError::FrameEmpty => write!(f, "Frame empty"),
            NetworkError::FrameTooLarge => write!(f, "Frame too large"),
        }
    }
}

/// Network device trait
///
/// Receive is a non-blocking poll that only blocks once a frame is actually
/// pending (on its DMA completion). Transmit queues the frame and returns
/// without waiting for it to leave the wire. Implementations are not required
/// to be thread-safe; callers wrap the device in a `Mutex`.
pub trait NetworkDevice {
    /// Bring the hardware up. Must be called before `recv`/`send`.
    fn init(&mut self) -> Result<(), NetworkError>;

    /// Poll for one received frame, filling `buf`.
    ///
    /// Returns the frame length, or `None` when no frame is pending, the
    /// frame had to be dropped, or the completion wait ran out.
    fn recv(&mut self, buf: &mut [u8]) -> Option<usize>;

    /// Queue one complete Ethernet frame for transmission (fire-and-forget).
    fn send(&mut self, frame: &[u8]) -> Result<(), NetworkError>;

    /// The device's MAC address.
    fn mac_address(&self) -> MacAddress;

    /// Link state; the NanoCore NIC has no link detection, so devices that
    /// cannot tell report up.
    fn link_up(&self) -> bool {
        true
    }
}
