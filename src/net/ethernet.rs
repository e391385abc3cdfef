//! Ethernet frame handling
//!
//! MAC address representation and Ethernet II header parsing, just enough for
//! the link-layer adapter to classify ingress frames.

use core::fmt;
use core::str::FromStr;

/// EtherType for IPv4
pub const ETHERTYPE_IPV4: u16 = 0x0800;
/// EtherType for ARP
pub const ETHERTYPE_ARP: u16 = 0x0806;

/// 48-bit MAC (Media Access Control) address
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MacAddress(pub [u8; 6]);

impl MacAddress {
    /// Create a new MAC address from 6 bytes
    pub const fn new(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    /// Broadcast MAC address (FF:FF:FF:FF:FF:FF)
    pub const fn broadcast() -> Self {
        Self([0xFF; 6])
    }

    /// Check if this is a broadcast address
    pub fn is_broadcast(&self) -> bool {
        self.0 == [0xFF; 6]
    }

    /// Check if this is a multicast address (bit 0 of first byte is 1)
    pub fn is_multicast(&self) -> bool {
        (self.0[0] & 0x01) != 0
    }

    /// Check if this is a unicast address (not multicast)
    pub fn is_unicast(&self) -> bool {
        !self.is_multicast()
    }

    /// Get the bytes of this MAC address
    pub const fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }
}

/// Parse a MAC address from a colon-separated hex string, e.g.
/// "00:0A:35:00:01:02".
impl FromStr for MacAddress {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; 6];
        let mut count = 0;
        for part in s.split(':') {
            if count == 6 {
                return Err(());
            }
            bytes[count] = u8::from_str_radix(part, 16).map_err(|_| ())?;
            count += 1;
        }
        if count != 6 {
            return Err(());
        }
        Ok(Self(bytes))
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5]
        )
    }
}

/// Parsed Ethernet II frame header plus payload view
pub struct EthernetFrame<'a> {
    pub dest_mac: MacAddress,
    pub src_mac: MacAddress,
    pub ethertype: u16,
    pub payload: &'a [u8],
}

impl<'a> EthernetFrame<'a> {
    /// Ethernet header size: dest MAC (6) + src MAC (6) + ethertype (2)
    pub const HEADER_SIZE: usize = 14;

    /// Parse a raw frame. Returns `None` if it is too short to carry a
    /// complete header.
    pub fn parse(data: &'a [u8]) -> Option<Self> {
        if data.len() < Self::HEADER_SIZE {
            return None;
        }
        let mut dest = [0u8; 6];
        let mut src = [0u8; 6];
        dest.copy_from_slice(&data[0..6]);
        src.copy_from_slice(&data[6..12]);
        let ethertype = u16::from_be_bytes([data[12], data[13]]);
        Some(Self {
            dest_mac: MacAddress::new(dest),
            src_mac: MacAddress::new(src),
            ethertype,
            payload: &data[Self::HEADER_SIZE..],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mac_address_broadcast() {
        let mac = MacAddress::broadcast();
        assert!(mac.is_broadcast());
        assert!(mac.is_multicast());
        assert_eq!(mac.0, [0xFF; 6]);
    }

    #[test]
    fn mac_address_multicast() {
        let multicast = MacAddress::new([0x01, 0x00, 0x5E, 0x00, 0x00, 0x01]);
        assert!(multicast.is_multicast());
        assert!(!multicast.is_unicast());

        let unicast = MacAddress::new([0x00, 0x0A, 0x35, 0x00, 0x01, 0x02]);
        assert!(!unicast.is_multicast());
        assert!(unicast.is_unicast());
    }

    #[test]
    fn mac_address_display() {
        let mac = MacAddress::new([0x00, 0x0A, 0x35, 0x00, 0x01, 0x02]);
        assert_eq!(mac.to_string(), "00:0A:35:00:01:02");
    }

    #[test]
    fn mac_address_from_str() {
        let mac: MacAddress = "00:0a:35:00:01:02".parse().unwrap();
        assert_eq!(mac.0, [0x00, 0x0A, 0x35, 0x00, 0x01, 0x02]);

        assert!("invalid".parse::<MacAddress>().is_err());
        assert!("00:0A:35:00:01".parse::<MacAddress>().is_err());
        assert!("00:0A:35:00:01:02:03".parse::<MacAddress>().is_err());
        assert!("ZZ:0A:35:00:01:02".parse::<MacAddress>().is_err());
    }

    #[test]
    fn ethernet_frame_parse() {
        let mut buffer = [0u8; 64];
        buffer[0..6].copy_from_slice(&[0xFF; 6]);
        buffer[6..12].copy_from_slice(&[0x00, 0x0A, 0x35, 0x00, 0x01, 0x02]);
        buffer[12..14].copy_from_slice(&[0x08, 0x06]);

        let frame = EthernetFrame::parse(&buffer).unwrap();
        assert!(frame.dest_mac.is_broadcast());
        assert_eq!(frame.src_mac.0, [0x00, 0x0A, 0x35, 0x00, 0x01, 0x02]);
        assert_eq!(frame.ethertype, ETHERTYPE_ARP);
        assert_eq!(frame.payload.len(), 50);
    }

    #[test]
    fn ethernet_frame_parse_runt() {
        assert!(EthernetFrame::parse(&[0u8; 13]).is_none());
    }
}
