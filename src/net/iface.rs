//! smoltcp link-layer adapter
//!
//! Wraps the NIC driver in `smoltcp::phy::Device` so the stack's interface
//! poll drives the same receive/transmit pair an lwIP netif would: a
//! non-blocking ingress poll that classifies the frame before handing it up,
//! and a fire-and-forget egress hook.

use super::ethernet::{ETHERTYPE_ARP, ETHERTYPE_IPV4, EthernetFrame};
use crate::drivers::net::nanonic::{MAX_FRAME_SIZE, NanoNic};
use crate::drivers::net::regfile::RegisterFile;
use crate::drivers::timer::SystemTimer;
use crate::println;
use smoltcp::phy::{self, Device, DeviceCapabilities, Medium};
use smoltcp::time::Instant;

/// Link-layer device over the NanoCore NIC.
///
/// Carries one staging buffer per direction; the DMA engine fills/reads them
/// while the stack borrows them through the tokens.
pub struct NanoDevice<R: RegisterFile> {
    nic: NanoNic<R>,
    rx_buf: [u8; MAX_FRAME_SIZE],
    tx_buf: [u8; MAX_FRAME_SIZE],
}

impl<R: RegisterFile> NanoDevice<R> {
    pub fn new(nic: NanoNic<R>) -> Self {
        Self {
            nic,
            rx_buf: [0; MAX_FRAME_SIZE],
            tx_buf: [0; MAX_FRAME_SIZE],
        }
    }

    pub fn nic(&self) -> &NanoNic<R> {
        &self.nic
    }

    pub fn nic_mut(&mut self) -> &mut NanoNic<R> {
        &mut self.nic
    }

    /// Timestamp for `Interface::poll`, from the system timer.
    pub fn now() -> Instant {
        Instant::from_micros(SystemTimer::uptime_micros())
    }
}

/// Ingress classification: only IPv4 and ARP go up the stack; everything
/// else is dropped at the driver boundary.
pub(crate) fn ingress_wanted(frame: &[u8]) -> bool {
    matches!(
        EthernetFrame::parse(frame).map(|f| f.ethertype),
        Some(ETHERTYPE_IPV4) | Some(ETHERTYPE_ARP)
    )
}

impl<R: RegisterFile> Device for NanoDevice<R> {
    type RxToken<'a>
        = RxToken<'a>
    where
        Self: 'a;
    type TxToken<'a>
        = TxToken<'a, R>
    where
        Self: 'a;

    fn receive(&mut self, _timestamp: Instant) -> Option<(Self::RxToken<'_>, Self::TxToken<'_>)> {
        let Self { nic, rx_buf, tx_buf } = self;
        let len = nic.try_recv(rx_buf)?;
        if !ingress_wanted(&rx_buf[..len]) {
            return None;
        }
        Some((
            RxToken(&mut rx_buf[..len]),
            TxToken { nic, buf: tx_buf },
        ))
    }

    fn transmit(&mut self, _timestamp: Instant) -> Option<Self::TxToken<'_>> {
        let Self { nic, tx_buf, .. } = self;
        Some(TxToken { nic, buf: tx_buf })
    }

    fn capabilities(&self) -> DeviceCapabilities {
        let mut caps = DeviceCapabilities::default();
        caps.medium = Medium::Ethernet;
        caps.max_transmission_unit = 1514;
        caps.max_burst_size = Some(1);
        caps
    }
}

/// One received frame, staged in the device's receive buffer.
pub struct RxToken<'a>(&'a mut [u8]);

impl phy::RxToken for RxToken<'_> {
    fn consume<Ret, F>(self, f: F) -> Ret
    where
        F: FnOnce(&mut [u8]) -> Ret,
    {
        f(self.0)
    }
}

/// Permission to transmit one frame through the device's staging buffer.
pub struct TxToken<'a, R: RegisterFile> {
    nic: &'a mut NanoNic<R>,
    buf: &'a mut [u8; MAX_FRAME_SIZE],
}

impl<R: RegisterFile> phy::TxToken for TxToken<'_, R> {
    fn consume<Ret, F>(self, len: usize, f: F) -> Ret
    where
        F: FnOnce(&mut [u8]) -> Ret,
    {
        let result = f(&mut self.buf[..len]);
        if let Err(err) = self.nic.send(&self.buf[..len]) {
            println!("[NIC] transmit failed: {}", err);
        }
        result
    }
}
