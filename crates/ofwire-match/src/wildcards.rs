//! OpenFlow 1.0 wildcard bits (`OFPFW_*`).
//!
//! A set bit means "ignore this field when matching". The IPv4 source and
//! destination fields use 6-bit counts instead of single bits: the value is
//! the number of low address bits to ignore, so clearing the whole mask
//! requests an exact match and any count of 32 or more ignores the address.

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Wildcard bitmask of an OpenFlow 1.0 match
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Wildcards: u32 {
        /// Switch input port
        const IN_PORT = 1 << 0;
        /// VLAN id
        const DL_VLAN = 1 << 1;
        /// Ethernet source address
        const DL_SRC = 1 << 2;
        /// Ethernet destination address
        const DL_DST = 1 << 3;
        /// Ethernet frame type
        const DL_TYPE = 1 << 4;
        /// IP protocol
        const NW_PROTO = 1 << 5;
        /// TCP/UDP source port
        const TP_SRC = 1 << 6;
        /// TCP/UDP destination port
        const TP_DST = 1 << 7;

        /// IPv4 source address ignored-bits count
        const NW_SRC_MASK = 0x3f << 8;
        /// Any IPv4 source address
        const NW_SRC_ALL = 32 << 8;

        /// IPv4 destination address ignored-bits count
        const NW_DST_MASK = 0x3f << 14;
        /// Any IPv4 destination address
        const NW_DST_ALL = 32 << 14;

        /// VLAN priority
        const DL_VLAN_PCP = 1 << 20;
        /// IP ToS (DSCP field)
        const NW_TOS = 1 << 21;

        /// Wildcard all fields
        const ALL = (1 << 22) - 1;
    }
}

/// Names in the order they are printed, multi-bit fields included
const DISPLAY_ORDER: [(&str, Wildcards); 12] = [
    ("OFPFW_IN_PORT", Wildcards::IN_PORT),
    ("OFPFW_DL_VLAN", Wildcards::DL_VLAN),
    ("OFPFW_DL_SRC", Wildcards::DL_SRC),
    ("OFPFW_DL_DST", Wildcards::DL_DST),
    ("OFPFW_DL_TYPE", Wildcards::DL_TYPE),
    ("OFPFW_NW_PROTO", Wildcards::NW_PROTO),
    ("OFPFW_TP_SRC", Wildcards::TP_SRC),
    ("OFPFW_TP_DST", Wildcards::TP_DST),
    ("OFPFW_NW_SRC_MASK", Wildcards::NW_SRC_MASK),
    ("OFPFW_NW_DST_MASK", Wildcards::NW_DST_MASK),
    ("OFPFW_DL_VLAN_PCP", Wildcards::DL_VLAN_PCP),
    ("OFPFW_NW_TOS", Wildcards::NW_TOS),
];

impl Wildcards {
    /// Number of low IPv4 source address bits ignored (0 = exact match)
    #[must_use]
    pub const fn nw_src_ignored_bits(self) -> u32 {
        (self.bits() & Self::NW_SRC_MASK.bits()) >> 8
    }

    /// Number of low IPv4 destination address bits ignored (0 = exact match)
    #[must_use]
    pub const fn nw_dst_ignored_bits(self) -> u32 {
        (self.bits() & Self::NW_DST_MASK.bits()) >> 14
    }
}

impl Default for Wildcards {
    fn default() -> Self {
        Self::ALL
    }
}

/// `OFPFW_ALL`, or the set fields joined with `|`
///
/// A multi-bit field that is only partly set prints as `NAME&0x..`; bits
/// outside every known field print as a trailing hex value, and an empty
/// set prints as `0`.
impl fmt::Display for Wildcards {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::ALL {
            return f.write_str("OFPFW_ALL");
        }

        let mut remaining = self.bits();
        let mut parts = Vec::new();
        for (name, flag) in DISPLAY_ORDER {
            let flag = flag.bits();
            let present = remaining & flag;
            if present == flag {
                parts.push(name.to_string());
            } else if present != 0 {
                parts.push(format!("{name}&{present:#x}"));
            }
            remaining &= !flag;
        }
        if remaining != 0 {
            parts.push(format!("{remaining:#x}"));
        }

        if parts.is_empty() { f.write_str("0") } else { f.write_str(&parts.join("|")) }
    }
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;

    #[test]
    fn all_covers_every_field() {
        for (_, flag) in DISPLAY_ORDER {
            assert!(Wildcards::ALL.contains(flag));
        }
        assert_eq!(Wildcards::ALL.bits(), 0x003f_ffff);
        assert_eq!(Wildcards::default(), Wildcards::ALL);
    }

    #[test]
    fn ignored_bit_counts() {
        assert_eq!(Wildcards::ALL.nw_src_ignored_bits(), 0x3f);
        assert_eq!(Wildcards::NW_SRC_ALL.nw_src_ignored_bits(), 32);
        assert_eq!(Wildcards::NW_DST_ALL.nw_dst_ignored_bits(), 32);
        assert_eq!(Wildcards::empty().nw_dst_ignored_bits(), 0);
    }

    #[test]
    fn display_formats() {
        assert_snapshot!(Wildcards::ALL, @"OFPFW_ALL");
        assert_snapshot!(Wildcards::empty(), @"0");
        assert_snapshot!(Wildcards::IN_PORT | Wildcards::TP_DST, @"OFPFW_IN_PORT|OFPFW_TP_DST");
        assert_snapshot!(Wildcards::NW_SRC_ALL, @"OFPFW_NW_SRC_MASK&0x2000");
        assert_snapshot!(Wildcards::from_bits_retain(0x0040_0001), @"OFPFW_IN_PORT|0x400000");
    }
}
