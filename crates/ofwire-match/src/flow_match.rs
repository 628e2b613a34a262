//! Wildcarded OpenFlow 1.0 flow match.

use std::{fmt, net::Ipv4Addr};

use serde::{Deserialize, Serialize};

use crate::{MacAddr, Wildcards};

/// VLAN id meaning "frame carries no 802.1Q tag" (`OFP_VLAN_NONE`)
pub const OFP_VLAN_NONE: u16 = 0xffff;

/// Match record built by the synthesizer
///
/// # Invariants
///
/// - A field's value is meaningful only while its wildcard bit is clear.
///   Every setter assigns the field and clears the bit in the same call, so
///   the two can never disagree.
/// - Accessors return `None` for a wildcarded field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowMatch {
    wildcards: Wildcards,
    eth_src: MacAddr,
    eth_dst: MacAddr,
    eth_type: u16,
    vlan_vid: u16,
    vlan_pcp: u8,
    ip_proto: u8,
    ip_dscp: u8,
    ipv4_src: Ipv4Addr,
    ipv4_dst: Ipv4Addr,
    tcp_src: u16,
    tcp_dst: u16,
}

impl Default for FlowMatch {
    fn default() -> Self {
        Self {
            wildcards: Wildcards::ALL,
            eth_src: MacAddr::default(),
            eth_dst: MacAddr::default(),
            eth_type: 0,
            vlan_vid: 0,
            vlan_pcp: 0,
            ip_proto: 0,
            ip_dscp: 0,
            ipv4_src: Ipv4Addr::UNSPECIFIED,
            ipv4_dst: Ipv4Addr::UNSPECIFIED,
            tcp_src: 0,
            tcp_dst: 0,
        }
    }
}

impl FlowMatch {
    /// A match with every field wildcarded (matches anything)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current wildcard bitmask
    #[must_use]
    pub fn wildcards(&self) -> Wildcards {
        self.wildcards
    }

    fn exact(&self, flag: Wildcards) -> bool {
        !self.wildcards.intersects(flag)
    }

    fn field<T>(&self, flag: Wildcards, value: T) -> Option<T> {
        self.exact(flag).then_some(value)
    }

    /// Ethernet source address
    #[must_use]
    pub fn eth_src(&self) -> Option<MacAddr> {
        self.field(Wildcards::DL_SRC, self.eth_src)
    }

    /// Ethernet destination address
    #[must_use]
    pub fn eth_dst(&self) -> Option<MacAddr> {
        self.field(Wildcards::DL_DST, self.eth_dst)
    }

    /// Ethertype (the inner one for tagged frames)
    #[must_use]
    pub fn eth_type(&self) -> Option<u16> {
        self.field(Wildcards::DL_TYPE, self.eth_type)
    }

    /// VLAN id, [`OFP_VLAN_NONE`] for untagged frames
    #[must_use]
    pub fn vlan_vid(&self) -> Option<u16> {
        self.field(Wildcards::DL_VLAN, self.vlan_vid)
    }

    /// VLAN priority
    #[must_use]
    pub fn vlan_pcp(&self) -> Option<u8> {
        self.field(Wildcards::DL_VLAN_PCP, self.vlan_pcp)
    }

    /// IP protocol, or the low byte of the ARP opcode
    #[must_use]
    pub fn ip_proto(&self) -> Option<u8> {
        self.field(Wildcards::NW_PROTO, self.ip_proto)
    }

    /// DSCP bits of the ToS byte
    ///
    /// The six DSCP bits stay in place and the two ECN bits are always zero,
    /// so a ToS of `0xb9` reads back as `0xb8` rather than the raw byte.
    #[must_use]
    pub fn ip_dscp(&self) -> Option<u8> {
        self.field(Wildcards::NW_TOS, self.ip_dscp)
    }

    /// IPv4 source, or ARP sender protocol address
    ///
    /// `None` unless the whole address is matched exactly.
    #[must_use]
    pub fn ipv4_src(&self) -> Option<Ipv4Addr> {
        self.field(Wildcards::NW_SRC_MASK, self.ipv4_src)
    }

    /// IPv4 destination, or ARP target protocol address
    ///
    /// `None` unless the whole address is matched exactly.
    #[must_use]
    pub fn ipv4_dst(&self) -> Option<Ipv4Addr> {
        self.field(Wildcards::NW_DST_MASK, self.ipv4_dst)
    }

    /// TCP/UDP source port, or ICMP type
    #[must_use]
    pub fn tcp_src(&self) -> Option<u16> {
        self.field(Wildcards::TP_SRC, self.tcp_src)
    }

    /// TCP/UDP destination port, or ICMP code
    #[must_use]
    pub fn tcp_dst(&self) -> Option<u16> {
        self.field(Wildcards::TP_DST, self.tcp_dst)
    }

    pub(crate) fn set_eth_src(&mut self, mac: MacAddr) {
        self.eth_src = mac;
        self.wildcards.remove(Wildcards::DL_SRC);
    }

    pub(crate) fn set_eth_dst(&mut self, mac: MacAddr) {
        self.eth_dst = mac;
        self.wildcards.remove(Wildcards::DL_DST);
    }

    pub(crate) fn set_eth_type(&mut self, eth_type: u16) {
        self.eth_type = eth_type;
        self.wildcards.remove(Wildcards::DL_TYPE);
    }

    pub(crate) fn set_vlan_vid(&mut self, vid: u16) {
        self.vlan_vid = vid;
        self.wildcards.remove(Wildcards::DL_VLAN);
    }

    pub(crate) fn set_vlan_pcp(&mut self, pcp: u8) {
        self.vlan_pcp = pcp;
        self.wildcards.remove(Wildcards::DL_VLAN_PCP);
    }

    pub(crate) fn set_ip_proto(&mut self, proto: u8) {
        self.ip_proto = proto;
        self.wildcards.remove(Wildcards::NW_PROTO);
    }

    pub(crate) fn set_ip_dscp(&mut self, dscp: u8) {
        self.ip_dscp = dscp;
        self.wildcards.remove(Wildcards::NW_TOS);
    }

    pub(crate) fn set_ipv4_src(&mut self, addr: Ipv4Addr) {
        self.ipv4_src = addr;
        self.wildcards.remove(Wildcards::NW_SRC_MASK);
    }

    pub(crate) fn set_ipv4_dst(&mut self, addr: Ipv4Addr) {
        self.ipv4_dst = addr;
        self.wildcards.remove(Wildcards::NW_DST_MASK);
    }

    pub(crate) fn set_tcp_src(&mut self, port: u16) {
        self.tcp_src = port;
        self.wildcards.remove(Wildcards::TP_SRC);
    }

    pub(crate) fn set_tcp_dst(&mut self, port: u16) {
        self.tcp_dst = port;
        self.wildcards.remove(Wildcards::TP_DST);
    }
}

/// Exactly-matched fields as `name=value` pairs, or `any` when everything is
/// wildcarded
impl fmt::Display for FlowMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fields = Vec::new();

        if let Some(mac) = self.eth_dst() {
            fields.push(format!("eth_dst={mac}"));
        }
        if let Some(mac) = self.eth_src() {
            fields.push(format!("eth_src={mac}"));
        }
        if let Some(eth_type) = self.eth_type() {
            fields.push(format!("eth_type={eth_type:#06x}"));
        }
        if let Some(vid) = self.vlan_vid() {
            fields.push(format!("vlan_vid={vid}"));
        }
        if let Some(pcp) = self.vlan_pcp() {
            fields.push(format!("vlan_pcp={pcp}"));
        }
        if let Some(addr) = self.ipv4_src() {
            fields.push(format!("ipv4_src={addr}"));
        }
        if let Some(addr) = self.ipv4_dst() {
            fields.push(format!("ipv4_dst={addr}"));
        }
        if let Some(dscp) = self.ip_dscp() {
            fields.push(format!("ip_dscp={dscp}"));
        }
        if let Some(proto) = self.ip_proto() {
            fields.push(format!("ip_proto={proto}"));
        }
        if let Some(port) = self.tcp_src() {
            fields.push(format!("tcp_src={port}"));
        }
        if let Some(port) = self.tcp_dst() {
            fields.push(format!("tcp_dst={port}"));
        }

        if fields.is_empty() { f.write_str("any") } else { f.write_str(&fields.join(" ")) }
    }
}
