//! Random-input fuzzer for message dispatch
//!
//! Feeds arbitrary bytes to the decoder, with the header optionally patched
//! so that libFuzzer spends most of its time past header validation:
//! - byte 0 selects whether the version is pinned
//! - byte 1 selects whether `length` is rewritten to the buffer size
//!
//! Invariants checked on every input:
//! - decoding never panics
//! - decoding the same bytes twice gives the same outcome
//! - a decoded message carries exactly the header that
//!   `decode_header_only` reports

#![no_main]

use libfuzzer_sys::fuzz_target;
use ofwire_proto::{Decoded, Decoder, DecoderConfig, Header, MsgType, OFP_VERSION};

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let config = if data[0] & 1 == 0 { DecoderConfig::default() } else { DecoderConfig::strict() };
    let decoder = Decoder::new(config);

    let mut buf = data[2..].to_vec();
    if data[1] & 1 == 1 && buf.len() >= Header::SIZE {
        let length = u16::try_from(buf.len()).unwrap_or(u16::MAX);
        buf[0] = OFP_VERSION;
        buf[2..4].copy_from_slice(&length.to_be_bytes());
    }

    let first = decoder.decode(&buf);
    let second = decoder.decode(&buf);

    // INVARIANT 1: Dispatch is deterministic
    assert_eq!(first, second, "decode is not idempotent");

    // INVARIANT 2: Frame length agrees with the header, and rejects only
    // lengths that cannot cover the header itself
    if let Ok(header) = decoder.decode_header_only(&buf) {
        match decoder.frame_len(&buf) {
            Ok(frame_len) => assert_eq!(frame_len, usize::from(header.length())),
            Err(_) => {
                assert!(usize::from(header.length()) < Header::SIZE);
                assert!(first.is_err(), "decode accepted a length below the header size");
            },
        }

        match &first {
            Ok(Decoded::Message(message)) => {
                // INVARIANT 3: Message header is the wire header
                assert_eq!(message.header, header);
                assert_eq!(message.msg_type().to_u8(), header.type_code());
            },
            Ok(Decoded::Unrecognized { msg_type, .. }) => {
                // INVARIANT 4: Only stats families are soft on unknown subtypes
                assert!(matches!(msg_type, MsgType::StatsRequest | MsgType::StatsReply));
            },
            Err(_) => {},
        }
    } else {
        assert!(first.is_err(), "decode accepted a header that header-only decoding rejects");
    }
});
