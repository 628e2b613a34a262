//! Property-based tests for classification and synthesis.
//!
//! These tests use proptest to check that for all frames:
//! - synthesis never panics and only fails on frames shorter than Ethernet
//! - a field is readable exactly when its wildcard bit is clear
//! - link-layer and VLAN fields are always determined

use ofwire_match::{ClassifiedFrame, FlowMatch, FrameFormat, SynthesisError, Wildcards, synthesize};
use proptest::prelude::*;

// Strategy for frames whose ethertype and protocol bytes favour the layers
// the classifier knows about
fn plausible_frame() -> impl Strategy<Value = Vec<u8>> {
    let ether_type = prop_oneof![Just(0x0800u16), Just(0x0806), Just(0x8100), any::<u16>()];
    let protocol = prop_oneof![Just(1u8), Just(6), Just(17), any::<u8>()];
    (
        prop::collection::vec(any::<u8>(), 12),
        ether_type,
        any::<u8>(),
        protocol,
        prop::collection::vec(any::<u8>(), 0..96),
    )
        .prop_map(|(macs, ether_type, version_ihl, protocol, mut rest)| {
            let mut frame = macs;
            frame.extend_from_slice(&ether_type.to_be_bytes());
            if rest.len() > 9 {
                rest[0] = version_ihl;
                rest[9] = protocol;
            }
            frame.extend_from_slice(&rest);
            frame
        })
}

fn assert_consistent(flow: &FlowMatch) {
    let w = flow.wildcards();
    assert_eq!(flow.eth_src().is_some(), !w.contains(Wildcards::DL_SRC));
    assert_eq!(flow.eth_dst().is_some(), !w.contains(Wildcards::DL_DST));
    assert_eq!(flow.eth_type().is_some(), !w.contains(Wildcards::DL_TYPE));
    assert_eq!(flow.vlan_vid().is_some(), !w.contains(Wildcards::DL_VLAN));
    assert_eq!(flow.vlan_pcp().is_some(), !w.contains(Wildcards::DL_VLAN_PCP));
    assert_eq!(flow.ip_proto().is_some(), !w.contains(Wildcards::NW_PROTO));
    assert_eq!(flow.ip_dscp().is_some(), !w.contains(Wildcards::NW_TOS));
    assert_eq!(flow.ipv4_src().is_some(), !w.intersects(Wildcards::NW_SRC_MASK));
    assert_eq!(flow.ipv4_dst().is_some(), !w.intersects(Wildcards::NW_DST_MASK));
    assert_eq!(flow.tcp_src().is_some(), !w.contains(Wildcards::TP_SRC));
    assert_eq!(flow.tcp_dst().is_some(), !w.contains(Wildcards::TP_DST));
}

#[test]
fn prop_arbitrary_bytes_never_panic() {
    proptest!(|(bytes in prop::collection::vec(any::<u8>(), 0..128))| {
        match synthesize(&bytes[..], FrameFormat::L2) {
            Ok(flow) => prop_assert!(bytes.len() >= 14, "{flow}"),
            Err(SynthesisError::FrameClassification { actual, .. }) => prop_assert_eq!(actual, bytes.len()),
            Err(other) => prop_assert!(false, "unexpected error {other}"),
        }
    });
}

#[test]
fn prop_fields_follow_wildcards() {
    proptest!(|(bytes in plausible_frame())| {
        let flow = synthesize(&bytes[..], FrameFormat::L2).unwrap();
        assert_consistent(&flow);
    });
}

#[test]
fn prop_link_fields_always_set() {
    proptest!(|(bytes in plausible_frame())| {
        let flow = synthesize(&bytes[..], FrameFormat::L2).unwrap();
        let always = Wildcards::DL_SRC | Wildcards::DL_DST | Wildcards::DL_TYPE | Wildcards::DL_VLAN | Wildcards::DL_VLAN_PCP;
        prop_assert!(!flow.wildcards().intersects(always));
        prop_assert!(flow.wildcards().contains(Wildcards::IN_PORT));
    });
}

#[test]
fn prop_any_layer_combination_is_consistent() {
    proptest!(|(
        a in plausible_frame(),
        b in plausible_frame(),
        c in plausible_frame(),
    )| {
        // merge layers classified from unrelated frames
        let mut frame = ClassifiedFrame::classify(&a).unwrap();
        let other = ClassifiedFrame::classify(&b).unwrap();
        let third = ClassifiedFrame::classify(&c).unwrap();
        frame.tcp = frame.tcp.or(other.tcp).or(third.tcp);
        frame.udp = frame.udp.or(other.udp).or(third.udp);
        frame.icmp = frame.icmp.or(other.icmp).or(third.icmp);
        frame.arp = frame.arp.or(other.arp).or(third.arp);

        let flow = synthesize(frame, FrameFormat::L2).unwrap();
        assert_consistent(&flow);
        if let Some(arp) = frame.arp {
            prop_assert_eq!(flow.ipv4_src(), Some(arp.sender_ip()));
            prop_assert_eq!(flow.ip_proto(), Some(arp.operation().to_be_bytes()[1]));
        } else if let Some(icmp) = frame.icmp {
            prop_assert_eq!(flow.ip_proto(), Some(1));
            prop_assert_eq!(flow.tcp_src(), Some(u16::from(icmp.icmp_type())));
        }
    });
}
