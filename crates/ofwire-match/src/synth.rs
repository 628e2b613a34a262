//! Flow-match synthesis from a link-layer frame.
//!
//! The match starts fully wildcarded and is then filled by a fixed list of
//! rules, applied in order. Each rule runs whenever its layer is present,
//! so a later rule overwrites what an earlier one set:
//!
//! 1. Ethernet addresses and ethertype
//! 2. VLAN id and priority (the "no VLAN" sentinel when untagged)
//! 3. IPv4 addresses and DSCP
//! 4. TCP, else UDP: protocol number and ports
//! 5. ICMP: protocol 1, type and code in the port fields
//! 6. ARP: opcode as protocol, sender and target in the address fields
//!
//! A frame that a classifier marks with several of TCP, UDP, ICMP and ARP
//! therefore ends up with the fields of the last one in this list.

use std::{fmt, str::FromStr};

use tracing::{debug, trace};

use crate::{
    ClassifiedFrame, FlowMatch,
    errors::{Result, SynthesisError},
    flow_match::OFP_VLAN_NONE,
    frame::{IPPROTO_ICMP, IPPROTO_TCP, IPPROTO_UDP},
};

/// Top-level framing of the input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FrameFormat {
    /// Ethernet frames
    #[default]
    L2,
    /// Bare IP packets; recognized but not supported
    L3,
}

impl fmt::Display for FrameFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::L2 => "L2",
            Self::L3 => "L3",
        })
    }
}

/// Case-insensitive: `"l2"` and `"L2"` are the same format
impl FromStr for FrameFormat {
    type Err = SynthesisError;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("L2") {
            Ok(Self::L2)
        } else if s.eq_ignore_ascii_case("L3") {
            Ok(Self::L3)
        } else {
            Err(SynthesisError::UnsupportedFrameFormat(s.to_string()))
        }
    }
}

/// Frame handed to [`synthesize`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameInput<'a> {
    /// Raw frame bytes, classified before synthesis
    Raw(&'a [u8]),
    /// Frame already classified by the caller
    Classified(ClassifiedFrame),
}

impl<'a> From<&'a [u8]> for FrameInput<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self::Raw(bytes)
    }
}

impl From<ClassifiedFrame> for FrameInput<'_> {
    fn from(frame: ClassifiedFrame) -> Self {
        Self::Classified(frame)
    }
}

type Rule = fn(&ClassifiedFrame, &mut FlowMatch);

/// Synthesis rules in application order
const RULES: [(&str, Rule); 6] = [
    ("ethernet", ethernet),
    ("vlan", vlan),
    ("ipv4", ipv4),
    ("transport", transport),
    ("icmp", icmp),
    ("arp", arp),
];

/// Build a match for `input`
///
/// # Errors
///
/// - [`SynthesisError::UnsupportedFrameFormat`] unless `format` is
///   [`FrameFormat::L2`]
/// - [`SynthesisError::FrameClassification`] if raw bytes are too short for
///   an Ethernet header
pub fn synthesize<'a>(input: impl Into<FrameInput<'a>>, format: FrameFormat) -> Result<FlowMatch> {
    if format != FrameFormat::L2 {
        debug!(%format, "rejected frame format");
        return Err(SynthesisError::UnsupportedFrameFormat(format.to_string()));
    }

    let frame = match input.into() {
        FrameInput::Raw(bytes) => ClassifiedFrame::classify(bytes)?,
        FrameInput::Classified(frame) => frame,
    };

    Ok(synthesize_classified(&frame))
}

/// Build a match for an already-classified Ethernet frame
///
/// Infallible: every layer of a [`ClassifiedFrame`] is already validated.
#[must_use]
pub fn synthesize_classified(frame: &ClassifiedFrame) -> FlowMatch {
    let mut flow = FlowMatch::new();
    for (name, rule) in RULES {
        rule(frame, &mut flow);
        trace!(rule = name, wildcards = %flow.wildcards(), "applied rule");
    }
    flow
}

fn ethernet(frame: &ClassifiedFrame, flow: &mut FlowMatch) {
    flow.set_eth_dst(frame.ethernet.dst());
    flow.set_eth_src(frame.ethernet.src());
    flow.set_eth_type(frame.ethernet.ether_type());
}

fn vlan(frame: &ClassifiedFrame, flow: &mut FlowMatch) {
    match frame.vlan {
        Some(tag) => {
            flow.set_vlan_vid(tag.vid());
            flow.set_vlan_pcp(tag.pcp());
            flow.set_eth_type(tag.ether_type());
        },
        None => {
            flow.set_vlan_vid(OFP_VLAN_NONE);
            flow.set_vlan_pcp(0);
        },
    }
}

fn ipv4(frame: &ClassifiedFrame, flow: &mut FlowMatch) {
    if let Some(ip) = frame.ipv4 {
        flow.set_ipv4_src(ip.src());
        flow.set_ipv4_dst(ip.dst());
        flow.set_ip_dscp(ip.dscp());
    }
}

fn transport(frame: &ClassifiedFrame, flow: &mut FlowMatch) {
    let ports = match (frame.tcp, frame.udp) {
        (Some(tcp), _) => Some((IPPROTO_TCP, tcp.src_port(), tcp.dst_port())),
        (None, Some(udp)) => Some((IPPROTO_UDP, udp.src_port(), udp.dst_port())),
        (None, None) => None,
    };

    if let Some((proto, src, dst)) = ports {
        flow.set_ip_proto(proto);
        flow.set_tcp_src(src);
        flow.set_tcp_dst(dst);
    }
}

fn icmp(frame: &ClassifiedFrame, flow: &mut FlowMatch) {
    if let Some(icmp) = frame.icmp {
        flow.set_ip_proto(IPPROTO_ICMP);
        flow.set_tcp_src(u16::from(icmp.icmp_type()));
        flow.set_tcp_dst(u16::from(icmp.code()));
    }
}

fn arp(frame: &ClassifiedFrame, flow: &mut FlowMatch) {
    if let Some(arp) = frame.arp {
        // nw_proto carries the lower 8 bits of the opcode
        flow.set_ip_proto(arp.operation().to_be_bytes()[1]);
        flow.set_ipv4_src(arp.sender_ip());
        flow.set_ipv4_dst(arp.target_ip());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_parsing_ignores_case() {
        assert_eq!("l2".parse(), Ok(FrameFormat::L2));
        assert_eq!("L3".parse(), Ok(FrameFormat::L3));
        assert_eq!(
            "L7".parse::<FrameFormat>(),
            Err(SynthesisError::UnsupportedFrameFormat("L7".to_string()))
        );
    }

    #[test]
    fn l3_is_rejected_before_classification() {
        // too short to classify, but the format check comes first
        assert_eq!(
            synthesize(&[0u8; 2][..], FrameFormat::L3),
            Err(SynthesisError::UnsupportedFrameFormat("L3".to_string()))
        );
    }

    #[test]
    fn rules_run_in_overwrite_order() {
        let names: Vec<_> = RULES.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, ["ethernet", "vlan", "ipv4", "transport", "icmp", "arp"]);
    }
}
