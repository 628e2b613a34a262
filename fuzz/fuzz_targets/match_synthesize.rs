//! Random-input fuzzer for flow-match synthesis
//!
//! Invariants checked on every input:
//! - classification and synthesis never panic
//! - only frames shorter than an Ethernet header are rejected
//! - every exactly-matched field is readable and every wildcarded one is not

#![no_main]

use libfuzzer_sys::fuzz_target;
use ofwire_match::{ClassifiedFrame, FrameFormat, Wildcards, synthesize, synthesize_classified};

fuzz_target!(|data: &[u8]| {
    let result = synthesize(data, FrameFormat::L2);

    // INVARIANT 1: Rejection depends on length only
    let Ok(flow) = result else {
        assert!(data.len() < 14, "rejected a {} byte frame", data.len());
        return;
    };

    // INVARIANT 2: Raw and pre-classified inputs agree
    let frame = ClassifiedFrame::classify(data).expect("classify must accept what synthesize accepted");
    assert_eq!(synthesize_classified(&frame), flow);

    // INVARIANT 3: Fields follow their wildcard bits
    let w = flow.wildcards();
    assert_eq!(flow.eth_src().is_some(), !w.contains(Wildcards::DL_SRC));
    assert_eq!(flow.eth_type().is_some(), !w.contains(Wildcards::DL_TYPE));
    assert_eq!(flow.ip_proto().is_some(), !w.contains(Wildcards::NW_PROTO));
    assert_eq!(flow.ipv4_src().is_some(), !w.intersects(Wildcards::NW_SRC_MASK));
    assert_eq!(flow.tcp_src().is_some(), !w.contains(Wildcards::TP_SRC));
    assert_eq!(flow.tcp_dst().is_some(), !w.contains(Wildcards::TP_DST));
    assert!(w.contains(Wildcards::IN_PORT));

    // INVARIANT 4: L3 is always refused
    assert!(synthesize(data, FrameFormat::L3).is_err());
});
