//! Bitfields carried inside OpenFlow 1.0 message bodies.
//!
//! All constructors use `from_bits_retain`, so unknown bits sent by a switch
//! are preserved rather than rejected.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Datapath capabilities advertised in a features reply (`OFPC_*`)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Capabilities: u32 {
        /// Flow statistics
        const FLOW_STATS = 1 << 0;
        /// Table statistics
        const TABLE_STATS = 1 << 1;
        /// Port statistics
        const PORT_STATS = 1 << 2;
        /// 802.1d spanning tree
        const STP = 1 << 3;
        /// Reserved, must be zero
        const RESERVED = 1 << 4;
        /// Can reassemble IP fragments
        const IP_REASM = 1 << 5;
        /// Queue statistics
        const QUEUE_STATS = 1 << 6;
        /// Match IP addresses in ARP packets
        const ARP_MATCH_IP = 1 << 7;
    }
}

bitflags! {
    /// Administrative port configuration (`OFPPC_*`)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct PortConfig: u32 {
        /// Port is administratively down
        const PORT_DOWN = 1 << 0;
        /// Disable 802.1D spanning tree on port
        const NO_STP = 1 << 1;
        /// Drop all packets except 802.1D spanning tree
        const NO_RECV = 1 << 2;
        /// Drop received 802.1D STP packets
        const NO_RECV_STP = 1 << 3;
        /// Do not include this port when flooding
        const NO_FLOOD = 1 << 4;
        /// Drop packets forwarded to port
        const NO_FWD = 1 << 5;
        /// Do not send packet-in messages for port
        const NO_PACKET_IN = 1 << 6;
    }
}

bitflags! {
    /// Port link features (`OFPPF_*`)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct PortFeatures: u32 {
        /// 10 Mb half-duplex
        const RATE_10MB_HD = 1 << 0;
        /// 10 Mb full-duplex
        const RATE_10MB_FD = 1 << 1;
        /// 100 Mb half-duplex
        const RATE_100MB_HD = 1 << 2;
        /// 100 Mb full-duplex
        const RATE_100MB_FD = 1 << 3;
        /// 1 Gb half-duplex
        const RATE_1GB_HD = 1 << 4;
        /// 1 Gb full-duplex
        const RATE_1GB_FD = 1 << 5;
        /// 10 Gb full-duplex
        const RATE_10GB_FD = 1 << 6;
        /// Copper medium
        const COPPER = 1 << 7;
        /// Fiber medium
        const FIBER = 1 << 8;
        /// Auto-negotiation
        const AUTONEG = 1 << 9;
        /// Pause
        const PAUSE = 1 << 10;
        /// Asymmetric pause
        const PAUSE_ASYM = 1 << 11;
    }
}

bitflags! {
    /// Flow-mod flags (`OFPFF_*`)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct FlowModFlags: u16 {
        /// Send a flow-removed message when the entry expires or is deleted
        const SEND_FLOW_REM = 1 << 0;
        /// Check for overlapping entries first
        const CHECK_OVERLAP = 1 << 1;
        /// Emergency flow cache entry
        const EMERG = 1 << 2;
    }
}

bitflags! {
    /// Flags of a stats reply secondary header (`OFPSF_*`)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct StatsReplyFlags: u16 {
        /// More replies follow this one
        const REPLY_MORE = 1 << 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_bits_are_retained() {
        let caps = Capabilities::from_bits_retain(0x8000_0081);
        assert!(caps.contains(Capabilities::FLOW_STATS));
        assert!(caps.contains(Capabilities::ARP_MATCH_IP));
        assert_eq!(caps.bits(), 0x8000_0081);
    }

    #[test]
    fn reply_more() {
        assert!(StatsReplyFlags::from_bits_retain(1).contains(StatsReplyFlags::REPLY_MORE));
        assert!(StatsReplyFlags::from_bits_retain(0).is_empty());
    }
}
