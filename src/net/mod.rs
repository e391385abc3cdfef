//! Network support
//!
//! - `ethernet`: MAC addresses and Ethernet II frame headers
//! - `iface`: smoltcp link-layer device adapter over the NIC driver

pub mod ethernet;
pub mod iface;

pub use ethernet::{ETHERTYPE_ARP, ETHERTYPE_IPV4, EthernetFrame, MacAddress};
