//! # ofwire Protocol: OpenFlow 1.0 Decoding
//!
//! This crate turns one complete OpenFlow 1.0 message buffer into a typed
//! [`Message`].
//!
//! ## Dispatch
//!
//! Every message starts with an 8-byte [`Header`]. Its `type` byte selects a
//! first-level route in a [`DispatchTable`]:
//!
//! - **Leaf types** map straight to a decoder function.
//! - **Container types** (stats request, stats reply, error) carry a second
//!   4-byte header whose subtype selects the decoder in a second-level table.
//!
//! The resolved decoder receives the whole buffer and re-reads the header
//! itself, so any decoder can also be called directly.
//!
//! Stats messages with an unregistered subtype are answered with
//! [`Decoded::Unrecognized`]; error messages with an unregistered error type
//! fail with [`DecodeError::UnknownSubtype`].
//!
//! ## Validation
//!
//! - The header `length` must cover the header and fit in the buffer; this is
//!   checked before any decoder runs.
//! - Each decoder checks its fixed layout and returns
//!   [`DecodeError::TruncatedBody`] instead of reading past the message.
//! - Decoding is a pure function of the input bytes. Tables are `const`
//!   values and the [`Decoder`] holds no mutable state.
//!
//! ```
//! use ofwire_proto::{Decoded, Header, MsgType, messages::Body};
//!
//! let wire = Header::new(MsgType::BarrierRequest, 8, 7).to_bytes();
//! let Decoded::Message(message) = ofwire_proto::decode(&wire)? else {
//!     unreachable!("barrier requests are always recognized");
//! };
//! assert_eq!(message.body, Body::BarrierRequest);
//! assert_eq!(message.xid(), 7);
//! # Ok::<(), ofwire_proto::DecodeError>(())
//! ```
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod decoder;
pub mod decoders;
pub mod dispatch;
pub mod errors;
pub mod flags;
pub mod header;
pub mod messages;
pub mod msg_type;

pub use decoder::{Decoded, Decoder, DecoderConfig, decode, decode_header_only};
pub use dispatch::{DecodeFn, DispatchTable, Family, Route};
pub use errors::{DecodeError, Result};
pub use header::{Header, OFP_VERSION};
pub use messages::{Body, Message};
pub use msg_type::{ErrorType, MsgType, StatsType};
