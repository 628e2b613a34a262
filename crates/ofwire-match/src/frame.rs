//! Link-layer frame classification.
//!
//! A [`ClassifiedFrame`] holds the mandatory Ethernet header plus six
//! optional layers. Each layer is parsed zero-copy from the raw bytes and is
//! present only if the enclosing header announces it and its own header is
//! complete and well formed:
//!
//! ```text
//! Ethernet ─┬─ 802.1Q tag(s) ─┐
//!           └─────────────────┴─┬─ IPv4 ─┬─ TCP
//!                               │        ├─ UDP
//!                               │        └─ ICMP
//!                               └─ ARP
//! ```
//!
//! Only a frame too short for its Ethernet header fails classification; a
//! missing or malformed inner layer is simply absent.

use std::net::Ipv4Addr;

use tracing::trace;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::{
    MacAddr,
    errors::{Result, SynthesisError},
};

/// IPv4 ethertype
pub const ETHERTYPE_IPV4: u16 = 0x0800;
/// ARP ethertype
pub const ETHERTYPE_ARP: u16 = 0x0806;
/// 802.1Q VLAN tag ethertype
pub const ETHERTYPE_VLAN: u16 = 0x8100;

/// ICMP IP protocol number
pub const IPPROTO_ICMP: u8 = 1;
/// TCP IP protocol number
pub const IPPROTO_TCP: u8 = 6;
/// UDP IP protocol number
pub const IPPROTO_UDP: u8 = 17;

/// A fixed-size protocol header that can be cast from untrusted bytes
///
/// Implementors store multi-byte fields as byte arrays, so every bit
/// pattern is a valid value and no alignment is required.
pub trait Layer: FromBytes + IntoBytes + KnownLayout + Immutable + Copy {
    /// Size of the header on the wire
    const LEN: usize;

    /// Copy the header from the front of `bytes`, returning it with the
    /// bytes that follow
    fn parse(bytes: &[u8]) -> Option<(Self, &[u8])> {
        Self::read_from_prefix(bytes).ok()
    }
}

/// Ethernet II header
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct EthernetHeader {
    dst: [u8; 6],
    src: [u8; 6],
    ether_type: [u8; 2],
}

impl Layer for EthernetHeader {
    const LEN: usize = 14;
}

impl EthernetHeader {
    /// Destination address
    #[must_use]
    pub fn dst(&self) -> MacAddr {
        MacAddr(self.dst)
    }

    /// Source address
    #[must_use]
    pub fn src(&self) -> MacAddr {
        MacAddr(self.src)
    }

    /// Ethertype of the payload (or of the VLAN tag)
    #[must_use]
    pub fn ether_type(&self) -> u16 {
        u16::from_be_bytes(self.ether_type)
    }
}

/// 802.1Q tag following the outer ethertype
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct VlanTag {
    tci: [u8; 2],
    ether_type: [u8; 2],
}

impl Layer for VlanTag {
    const LEN: usize = 4;
}

impl VlanTag {
    /// 12-bit VLAN id
    #[must_use]
    pub fn vid(&self) -> u16 {
        u16::from_be_bytes(self.tci) & 0x0fff
    }

    /// 3-bit priority code point
    #[must_use]
    pub fn pcp(&self) -> u8 {
        self.tci[0] >> 5
    }

    /// Ethertype of the tagged payload
    #[must_use]
    pub fn ether_type(&self) -> u16 {
        u16::from_be_bytes(self.ether_type)
    }
}

/// IPv4 header without options
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct Ipv4Header {
    version_ihl: u8,
    tos: u8,
    total_len: [u8; 2],
    id: [u8; 2],
    flags_fragment: [u8; 2],
    ttl: u8,
    protocol: u8,
    checksum: [u8; 2],
    src: [u8; 4],
    dst: [u8; 4],
}

impl Layer for Ipv4Header {
    const LEN: usize = 20;
}

impl Ipv4Header {
    /// IP version, 4 for a well-formed header
    #[must_use]
    pub fn version(&self) -> u8 {
        self.version_ihl >> 4
    }

    /// Header length in bytes, options included
    #[must_use]
    pub fn header_len(&self) -> usize {
        usize::from(self.version_ihl & 0x0f) * 4
    }

    /// Length of the datagram in bytes, header included
    #[must_use]
    pub fn total_len(&self) -> usize {
        usize::from(u16::from_be_bytes(self.total_len))
    }

    /// DSCP bits in place, with the two ECN bits cleared
    #[must_use]
    pub fn dscp(&self) -> u8 {
        self.tos & 0xfc
    }

    /// Encapsulated protocol number
    #[must_use]
    pub fn protocol(&self) -> u8 {
        self.protocol
    }

    /// Fragment offset in 8-byte units
    #[must_use]
    pub fn fragment_offset(&self) -> u16 {
        u16::from_be_bytes(self.flags_fragment) & 0x1fff
    }

    /// Source address
    #[must_use]
    pub fn src(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.src)
    }

    /// Destination address
    #[must_use]
    pub fn dst(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.dst)
    }
}

/// TCP header without options
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct TcpHeader {
    src_port: [u8; 2],
    dst_port: [u8; 2],
    seq: [u8; 4],
    ack: [u8; 4],
    offset_flags: [u8; 2],
    window: [u8; 2],
    checksum: [u8; 2],
    urgent: [u8; 2],
}

impl Layer for TcpHeader {
    const LEN: usize = 20;
}

impl TcpHeader {
    /// Source port
    #[must_use]
    pub fn src_port(&self) -> u16 {
        u16::from_be_bytes(self.src_port)
    }

    /// Destination port
    #[must_use]
    pub fn dst_port(&self) -> u16 {
        u16::from_be_bytes(self.dst_port)
    }

    /// Header length in bytes, options included
    #[must_use]
    pub fn header_len(&self) -> usize {
        usize::from(self.offset_flags[0] >> 4) * 4
    }
}

/// UDP header
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct UdpHeader {
    src_port: [u8; 2],
    dst_port: [u8; 2],
    len: [u8; 2],
    checksum: [u8; 2],
}

impl Layer for UdpHeader {
    const LEN: usize = 8;
}

impl UdpHeader {
    /// Source port
    #[must_use]
    pub fn src_port(&self) -> u16 {
        u16::from_be_bytes(self.src_port)
    }

    /// Destination port
    #[must_use]
    pub fn dst_port(&self) -> u16 {
        u16::from_be_bytes(self.dst_port)
    }
}

/// ICMP header
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct IcmpHeader {
    icmp_type: u8,
    code: u8,
    checksum: [u8; 2],
    rest: [u8; 4],
}

impl Layer for IcmpHeader {
    const LEN: usize = 8;
}

impl IcmpHeader {
    /// Message type (8 = echo request)
    #[must_use]
    pub fn icmp_type(&self) -> u8 {
        self.icmp_type
    }

    /// Type-specific code
    #[must_use]
    pub fn code(&self) -> u8 {
        self.code
    }
}

/// ARP packet for Ethernet hardware and IPv4 protocol addresses
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct ArpHeader {
    hardware_type: [u8; 2],
    protocol_type: [u8; 2],
    hardware_len: u8,
    protocol_len: u8,
    operation: [u8; 2],
    sender_mac: [u8; 6],
    sender_ip: [u8; 4],
    target_mac: [u8; 6],
    target_ip: [u8; 4],
}

impl Layer for ArpHeader {
    const LEN: usize = 28;
}

impl ArpHeader {
    /// Operation (1 = request, 2 = reply)
    #[must_use]
    pub fn operation(&self) -> u16 {
        u16::from_be_bytes(self.operation)
    }

    /// Sender protocol address
    #[must_use]
    pub fn sender_ip(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.sender_ip)
    }

    /// Target protocol address
    #[must_use]
    pub fn target_ip(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.target_ip)
    }

    /// Whether the address lengths match Ethernet and IPv4
    #[must_use]
    pub fn is_ethernet_ipv4(&self) -> bool {
        self.hardware_len == 6 && self.protocol_len == 4
    }
}

/// A frame annotated with the layers found in it
///
/// The optional layers are independent of one another. Classification of a
/// real frame yields at most one of TCP, UDP, ICMP and ARP, but a frame
/// assembled by hand may carry any combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifiedFrame {
    /// Outer Ethernet header
    pub ethernet: EthernetHeader,
    /// 802.1Q tag
    pub vlan: Option<VlanTag>,
    /// IPv4 header
    pub ipv4: Option<Ipv4Header>,
    /// TCP header
    pub tcp: Option<TcpHeader>,
    /// UDP header
    pub udp: Option<UdpHeader>,
    /// ICMP header
    pub icmp: Option<IcmpHeader>,
    /// ARP packet
    pub arp: Option<ArpHeader>,
}

impl ClassifiedFrame {
    /// A frame with an Ethernet header and no other layer
    #[must_use]
    pub fn new(ethernet: EthernetHeader) -> Self {
        Self { ethernet, vlan: None, ipv4: None, tcp: None, udp: None, icmp: None, arp: None }
    }

    /// Classify the layers of a raw Ethernet frame
    ///
    /// # Errors
    ///
    /// Returns [`SynthesisError::FrameClassification`] if the frame is
    /// shorter than an Ethernet header.
    pub fn classify(bytes: &[u8]) -> Result<Self> {
        let (ethernet, mut payload) = EthernetHeader::parse(bytes).ok_or(
            SynthesisError::FrameClassification { expected: EthernetHeader::LEN, actual: bytes.len() },
        )?;
        let mut frame = Self::new(ethernet);

        // Stacked tags are skipped; the outermost one is kept
        let mut ether_type = ethernet.ether_type();
        while ether_type == ETHERTYPE_VLAN {
            let Some((tag, rest)) = VlanTag::parse(payload) else {
                trace!(available = payload.len(), "truncated VLAN tag");
                break;
            };
            if frame.vlan.is_none() {
                frame.vlan = Some(tag);
            } else {
                trace!(vid = tag.vid(), "skipping inner VLAN tag");
            }
            ether_type = tag.ether_type();
            payload = rest;
        }

        match ether_type {
            ETHERTYPE_IPV4 => frame.classify_ipv4(payload),
            ETHERTYPE_ARP => {
                frame.arp = ArpHeader::parse(payload).map(|(arp, _)| arp).filter(ArpHeader::is_ethernet_ipv4);
                if frame.arp.is_none() {
                    trace!(available = payload.len(), "ARP layer absent");
                }
            },
            _ => trace!(ether_type, "no network layer"),
        }

        Ok(frame)
    }

    fn classify_ipv4(&mut self, payload: &[u8]) {
        let Some((ip, _)) = Ipv4Header::parse(payload) else {
            trace!(available = payload.len(), "truncated IPv4 header");
            return;
        };
        if ip.version() != 4 || ip.header_len() < Ipv4Header::LEN {
            trace!(version = ip.version(), header_len = ip.header_len(), "malformed IPv4 header");
            return;
        }
        if ip.total_len() < ip.header_len() {
            trace!(total_len = ip.total_len(), header_len = ip.header_len(), "malformed IPv4 header");
            return;
        }
        // Anything past total_len is link-layer padding
        let end = ip.total_len().min(payload.len());
        let Some(segment) = payload.get(ip.header_len()..end) else {
            trace!(header_len = ip.header_len(), available = payload.len(), "truncated IPv4 options");
            return;
        };
        self.ipv4 = Some(ip);

        // Only the first fragment carries the transport header
        if ip.fragment_offset() != 0 {
            trace!(offset = ip.fragment_offset(), "non-first IPv4 fragment");
            return;
        }

        match ip.protocol() {
            IPPROTO_TCP => {
                self.tcp = TcpHeader::parse(segment)
                    .map(|(tcp, _)| tcp)
                    .filter(|tcp| tcp.header_len() >= TcpHeader::LEN);
            },
            IPPROTO_UDP => self.udp = UdpHeader::parse(segment).map(|(udp, _)| udp),
            IPPROTO_ICMP => self.icmp = IcmpHeader::parse(segment).map(|(icmp, _)| icmp),
            protocol => trace!(protocol, "no transport layer"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ETH_IPV4: &str = "0a0b0c0d0e0f 010203040506 0800";
    const IPV4_TCP: &str = "45 00 0028 0000 0000 40 06 0000 0a000001 0a000002";
    const TCP_1234_80: &str = "04d2 0050 00000000 00000000 5000 ffff 0000 0000";

    fn frame(parts: &[&str]) -> Vec<u8> {
        hex::decode(parts.concat().replace(' ', "")).unwrap()
    }

    #[test]
    fn short_ethernet_fails() {
        assert_eq!(
            ClassifiedFrame::classify(&[0u8; 13]),
            Err(SynthesisError::FrameClassification { expected: 14, actual: 13 })
        );
    }

    #[test]
    fn tcp_frame_layers() {
        let bytes = frame(&[ETH_IPV4, IPV4_TCP, TCP_1234_80]);
        let frame = ClassifiedFrame::classify(&bytes).unwrap();

        assert_eq!(frame.ethernet.dst().to_string(), "0a:0b:0c:0d:0e:0f");
        assert!(frame.vlan.is_none());
        let ip = frame.ipv4.unwrap();
        assert_eq!(ip.src(), Ipv4Addr::new(10, 0, 0, 1));
        assert_eq!(ip.protocol(), IPPROTO_TCP);
        let tcp = frame.tcp.unwrap();
        assert_eq!((tcp.src_port(), tcp.dst_port()), (1234, 80));
        assert!(frame.udp.is_none() && frame.icmp.is_none() && frame.arp.is_none());
    }

    #[test]
    fn truncated_transport_is_absent() {
        let bytes = frame(&[ETH_IPV4, IPV4_TCP, "04d2 0050"]);
        let frame = ClassifiedFrame::classify(&bytes).unwrap();
        assert!(frame.ipv4.is_some());
        assert!(frame.tcp.is_none());
    }

    #[test]
    fn bad_ip_version_is_absent() {
        let bytes = frame(&[ETH_IPV4, "65 00 0028 0000 0000 40 06 0000 0a000001 0a000002", TCP_1234_80]);
        let frame = ClassifiedFrame::classify(&bytes).unwrap();
        assert!(frame.ipv4.is_none());
        assert!(frame.tcp.is_none());
    }

    #[test]
    fn later_fragment_has_no_transport() {
        let bytes = frame(&[ETH_IPV4, "45 00 0028 0000 00b9 40 06 0000 0a000001 0a000002", TCP_1234_80]);
        let frame = ClassifiedFrame::classify(&bytes).unwrap();
        assert_eq!(frame.ipv4.unwrap().fragment_offset(), 0xb9);
        assert!(frame.tcp.is_none());
    }

    #[test]
    fn ethernet_padding_is_not_transport() {
        // 20-byte datagram announcing UDP, zero-padded to the 60-byte minimum
        let mut bytes = frame(&[ETH_IPV4, "45 00 0014 0000 0000 40 11 0000 0a000001 0a000002"]);
        bytes.resize(60, 0);
        let frame = ClassifiedFrame::classify(&bytes).unwrap();
        assert_eq!(frame.ipv4.unwrap().total_len(), 20);
        assert!(frame.udp.is_none());
    }

    #[test]
    fn total_len_shorter_than_header_is_absent() {
        let bytes = frame(&[ETH_IPV4, "45 00 0010 0000 0000 40 06 0000 0a000001 0a000002", TCP_1234_80]);
        let frame = ClassifiedFrame::classify(&bytes).unwrap();
        assert!(frame.ipv4.is_none());
        assert!(frame.tcp.is_none());
    }

    #[test]
    fn captured_prefix_still_classifies() {
        // total_len announces a payload longer than the captured bytes
        let bytes = frame(&[ETH_IPV4, "45 00 05dc 0000 0000 40 06 0000 0a000001 0a000002", TCP_1234_80]);
        let frame = ClassifiedFrame::classify(&bytes).unwrap();
        assert_eq!(frame.tcp.unwrap().dst_port(), 80);
    }

    #[test]
    fn dscp_clears_ecn_bits() {
        let bytes = frame(&[ETH_IPV4, "45 b9 0028 0000 0000 40 06 0000 0a000001 0a000002", TCP_1234_80]);
        let ip = ClassifiedFrame::classify(&bytes).unwrap().ipv4.unwrap();
        assert_eq!(ip.dscp(), 0xb8);
    }

    #[test]
    fn stacked_vlan_tags_keep_outer_tag() {
        let tags = "0a0b0c0d0e0f 010203040506 8100 600a 8100 0014 0800";
        let bytes = frame(&[tags, IPV4_TCP, TCP_1234_80]);
        let frame = ClassifiedFrame::classify(&bytes).unwrap();
        let tag = frame.vlan.unwrap();
        assert_eq!((tag.vid(), tag.pcp()), (10, 3));
        assert_eq!(tag.ether_type(), ETHERTYPE_VLAN);
        assert_eq!(frame.ipv4.unwrap().dst(), Ipv4Addr::new(10, 0, 0, 2));
        assert_eq!(frame.tcp.unwrap().dst_port(), 80);
    }

    #[test]
    fn truncated_inner_vlan_tag_stops_classification() {
        let bytes = frame(&["0a0b0c0d0e0f 010203040506 8100 600a 8100 0014"]);
        let frame = ClassifiedFrame::classify(&bytes).unwrap();
        assert_eq!(frame.vlan.unwrap().vid(), 10);
        assert!(frame.ipv4.is_none() && frame.arp.is_none());
    }

    #[test]
    fn vlan_tag_fields() {
        let bytes = frame(&["0a0b0c0d0e0f 010203040506 8100", "600a 0806"]);
        let frame = ClassifiedFrame::classify(&bytes).unwrap();
        let tag = frame.vlan.unwrap();
        assert_eq!(tag.vid(), 10);
        assert_eq!(tag.pcp(), 3);
        assert_eq!(tag.ether_type(), ETHERTYPE_ARP);
        // ARP body missing
        assert!(frame.arp.is_none());
    }

    #[test]
    fn arp_requires_ethernet_ipv4_lengths() {
        let arp = "0001 0800 06 04 0001 010203040506 c0a80001 000000000000 c0a80002";
        let bytes = frame(&["ffffffffffff 010203040506 0806", arp]);
        let parsed = ClassifiedFrame::classify(&bytes).unwrap().arp.unwrap();
        assert_eq!(parsed.operation(), 1);
        assert_eq!(parsed.sender_ip(), Ipv4Addr::new(192, 168, 0, 1));
        assert_eq!(parsed.target_ip(), Ipv4Addr::new(192, 168, 0, 2));

        let odd = "0001 0800 08 04 0001 010203040506 c0a80001 000000000000 c0a80002";
        let bytes = frame(&["ffffffffffff 010203040506 0806", odd]);
        assert!(ClassifiedFrame::classify(&bytes).unwrap().arp.is_none());
    }
}
