//! The 40-byte `ofp_match` structure embedded in flow-mod, flow-removed and
//! flow statistics messages.

use bytes::Buf;

use super::read_mac;

/// Flow match as it appears on the wire
///
/// `wildcards` is kept as the raw `OFPFW_*` bitmask. A field's value is only
/// meaningful when its wildcard bit is clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WireMatch {
    /// Raw wildcard bitmask
    pub wildcards: u32,
    /// Input switch port
    pub in_port: u16,
    /// Ethernet source address
    pub dl_src: [u8; 6],
    /// Ethernet destination address
    pub dl_dst: [u8; 6],
    /// Input VLAN id
    pub dl_vlan: u16,
    /// Input VLAN priority
    pub dl_vlan_pcp: u8,
    /// Ethernet frame type
    pub dl_type: u16,
    /// IP ToS (DSCP bits)
    pub nw_tos: u8,
    /// IP protocol or lower 8 bits of ARP opcode
    pub nw_proto: u8,
    /// IP source address
    pub nw_src: u32,
    /// IP destination address
    pub nw_dst: u32,
    /// TCP/UDP source port, or ICMP type
    pub tp_src: u16,
    /// TCP/UDP destination port, or ICMP code
    pub tp_dst: u16,
}

impl WireMatch {
    /// Size of the serialized match (40 bytes)
    pub const SIZE: usize = 40;

    /// Read a match from the front of `buf`.
    ///
    /// Callers must have checked that at least [`WireMatch::SIZE`] bytes
    /// remain.
    pub(crate) fn read(buf: &mut &[u8]) -> Self {
        let wildcards = buf.get_u32();
        let in_port = buf.get_u16();
        let dl_src = read_mac(buf);
        let dl_dst = read_mac(buf);
        let dl_vlan = buf.get_u16();
        let dl_vlan_pcp = buf.get_u8();
        buf.advance(1);
        let dl_type = buf.get_u16();
        let nw_tos = buf.get_u8();
        let nw_proto = buf.get_u8();
        buf.advance(2);
        let nw_src = buf.get_u32();
        let nw_dst = buf.get_u32();
        let tp_src = buf.get_u16();
        let tp_dst = buf.get_u16();

        Self {
            wildcards,
            in_port,
            dl_src,
            dl_dst,
            dl_vlan,
            dl_vlan_pcp,
            dl_type,
            nw_tos,
            nw_proto,
            nw_src,
            nw_dst,
            tp_src,
            tp_dst,
        }
    }
}
