//! # ofwire Match: Flow-Match Synthesis
//!
//! Builds a wildcarded OpenFlow 1.0 match from an Ethernet frame, the way a
//! controller derives a flow entry from a packet-in.
//!
//! ## Pipeline
//!
//! 1. **Classify**: [`ClassifiedFrame::classify`] finds the optional VLAN,
//!    IPv4, TCP, UDP, ICMP and ARP layers. Malformed inner layers are left
//!    out; only a frame shorter than its Ethernet header is an error.
//! 2. **Synthesize**: [`synthesize`] starts from [`Wildcards::ALL`] and
//!    applies an ordered rule list, each rule setting fields and clearing
//!    their wildcard bits together.
//!
//! ```
//! use ofwire_match::{FrameFormat, synthesize};
//!
//! // Ethernet + IPv4 + UDP 5353 -> 53
//! let frame = [
//!     0x0a, 0x0b, 0x0c, 0x0d, 0x0e, 0x0f, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x08, 0x00, // eth
//!     0x45, 0x00, 0x00, 0x1c, 0x00, 0x00, 0x00, 0x00, 0x40, 0x11, 0x00, 0x00, // ipv4
//!     0x0a, 0x00, 0x00, 0x01, 0x0a, 0x00, 0x00, 0x02,
//!     0x14, 0xe9, 0x00, 0x35, 0x00, 0x08, 0x00, 0x00, // udp
//! ];
//! let flow = synthesize(&frame[..], FrameFormat::L2)?;
//! assert_eq!(flow.ip_proto(), Some(17));
//! assert_eq!(flow.tcp_dst(), Some(53));
//! # Ok::<(), ofwire_match::SynthesisError>(())
//! ```
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod errors;
pub mod flow_match;
pub mod frame;
pub mod mac;
pub mod synth;
pub mod wildcards;

pub use errors::{ParseMacError, Result, SynthesisError};
pub use flow_match::{FlowMatch, OFP_VLAN_NONE};
pub use frame::ClassifiedFrame;
pub use mac::MacAddr;
pub use synth::{FrameFormat, FrameInput, synthesize, synthesize_classified};
pub use wildcards::Wildcards;
