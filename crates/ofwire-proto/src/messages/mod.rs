//! Decoded OpenFlow 1.0 message bodies.
//!
//! Each first-level type has a body type with a `decode` function that
//! builds the value from the bytes following the header. Bodies are plain
//! values: a decoder either returns a complete body or an error, never a
//! partially filled one.
//!
//! Variable-length action and queue-property lists are kept as raw
//! [`Bytes`]; interpreting them is left to the caller.

pub mod asynchronous;
pub mod controller;
pub mod error;
pub mod port;
pub mod stats;
pub mod switch;
pub mod symmetric;
pub mod wire_match;

use bytes::{Buf, Bytes};

pub use self::{
    asynchronous::{FlowRemoved, PacketIn, PortStatus},
    controller::{FlowMod, PacketOut},
    error::{ErrorBody, ErrorMessage},
    port::PhyPort,
    stats::{StatsReply, StatsReplyBody, StatsRequest, StatsRequestBody},
    switch::{FeaturesReply, PortMod, QueueGetConfigReply, QueueGetConfigRequest, SwitchConfig},
    symmetric::{Echo, Hello, Vendor},
    wire_match::WireMatch,
};
use crate::{
    Header, MsgType,
    errors::{DecodeError, Result},
};

/// A fully decoded message: its header plus exactly one concrete body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Header as re-read by the per-type decoder
    pub header: Header,
    /// Decoded body
    pub body: Body,
}

impl Message {
    /// Type of the decoded body
    #[must_use]
    pub const fn msg_type(&self) -> MsgType {
        self.body.msg_type()
    }

    /// Transaction id from the header
    #[must_use]
    pub fn xid(&self) -> u32 {
        self.header.xid()
    }
}

/// Every first-level message variant
///
/// # Invariants
///
/// - **Type Uniqueness**: each variant corresponds to exactly one
///   [`MsgType`]; [`Body::msg_type`] is an exhaustive `match`, so adding a
///   variant without a type code fails to compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    // Symmetric messages
    /// Version negotiation
    Hello(Hello),
    /// Error notification
    Error(ErrorMessage),
    /// Liveness check
    EchoRequest(Echo),
    /// Liveness check answer
    EchoReply(Echo),
    /// Vendor extension
    Vendor(Vendor),

    // Switch configuration
    /// Capabilities request
    FeaturesRequest,
    /// Capabilities and ports
    FeaturesReply(FeaturesReply),
    /// Configuration request
    GetConfigRequest,
    /// Current configuration
    GetConfigReply(SwitchConfig),
    /// New configuration
    SetConfig(SwitchConfig),

    // Asynchronous messages
    /// Packet sent to the controller
    PacketIn(PacketIn),
    /// Flow entry removed
    FlowRemoved(FlowRemoved),
    /// Port change
    PortStatus(PortStatus),

    // Controller commands
    /// Packet injected by the controller
    PacketOut(PacketOut),
    /// Flow table modification
    FlowMod(FlowMod),
    /// Port modification
    PortMod(PortMod),

    // Statistics
    /// Statistics request
    StatsRequest(StatsRequest),
    /// Statistics reply
    StatsReply(StatsReply),

    // Barrier
    /// Barrier request
    BarrierRequest,
    /// Barrier reply
    BarrierReply,

    // Queue configuration
    /// Queue configuration request
    QueueGetConfigRequest(QueueGetConfigRequest),
    /// Queue configuration reply
    QueueGetConfigReply(QueueGetConfigReply),
}

impl Body {
    /// Get the type code for this body variant
    #[must_use]
    pub const fn msg_type(&self) -> MsgType {
        match self {
            Self::Hello(_) => MsgType::Hello,
            Self::Error(_) => MsgType::Error,
            Self::EchoRequest(_) => MsgType::EchoRequest,
            Self::EchoReply(_) => MsgType::EchoReply,
            Self::Vendor(_) => MsgType::Vendor,
            Self::FeaturesRequest => MsgType::FeaturesRequest,
            Self::FeaturesReply(_) => MsgType::FeaturesReply,
            Self::GetConfigRequest => MsgType::GetConfigRequest,
            Self::GetConfigReply(_) => MsgType::GetConfigReply,
            Self::SetConfig(_) => MsgType::SetConfig,
            Self::PacketIn(_) => MsgType::PacketIn,
            Self::FlowRemoved(_) => MsgType::FlowRemoved,
            Self::PortStatus(_) => MsgType::PortStatus,
            Self::PacketOut(_) => MsgType::PacketOut,
            Self::FlowMod(_) => MsgType::FlowMod,
            Self::PortMod(_) => MsgType::PortMod,
            Self::StatsRequest(_) => MsgType::StatsRequest,
            Self::StatsReply(_) => MsgType::StatsReply,
            Self::BarrierRequest => MsgType::BarrierRequest,
            Self::BarrierReply => MsgType::BarrierReply,
            Self::QueueGetConfigRequest(_) => MsgType::QueueGetConfigRequest,
            Self::QueueGetConfigReply(_) => MsgType::QueueGetConfigReply,
        }
    }
}

/// Re-read the header of a complete message buffer and return it with the
/// body bytes it covers.
///
/// The body slice ends at the header's `length`; trailing bytes beyond it
/// belong to the next message and are ignored.
///
/// # Errors
///
/// - [`DecodeError::TruncatedHeader`] if the buffer is shorter than a header
/// - [`DecodeError::InvalidLength`] if `length` is out of bounds
/// - [`DecodeError::TypeMismatch`] if the header names another type
pub fn split_message(buf: &[u8], expected: MsgType) -> Result<(Header, &[u8])> {
    let header = *Header::from_bytes(buf)?;
    header.validate_length(buf.len())?;

    if header.type_code() != expected.to_u8() {
        return Err(DecodeError::TypeMismatch { expected, actual: header.type_code() });
    }

    Ok((header, &buf[Header::SIZE..usize::from(header.length())]))
}

/// Fail with [`DecodeError::TruncatedBody`] unless `body` holds at least
/// `expected` bytes.
pub(crate) fn require(msg_type: MsgType, body: &[u8], expected: usize) -> Result<()> {
    if body.len() < expected {
        return Err(DecodeError::TruncatedBody { msg_type, expected, actual: body.len() });
    }
    Ok(())
}

pub(crate) fn read_mac(buf: &mut &[u8]) -> [u8; 6] {
    let mut mac = [0u8; 6];
    buf.copy_to_slice(&mut mac);
    mac
}

/// Read a NUL-padded fixed-width string field.
pub(crate) fn read_fixed_str(buf: &mut &[u8], len: usize) -> String {
    let raw = &buf[..len];
    let end = raw.iter().position(|&b| b == 0).unwrap_or(len);
    let value = String::from_utf8_lossy(&raw[..end]).into_owned();
    buf.advance(len);
    value
}

/// Copy whatever is left in `buf` into an owned buffer.
pub(crate) fn rest(buf: &[u8]) -> Bytes {
    Bytes::copy_from_slice(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_message_bounds_body_by_length() {
        let mut wire = Header::new(MsgType::EchoRequest, 12, 7).to_bytes().to_vec();
        wire.extend_from_slice(&[1, 2, 3, 4, 0xee, 0xee]);

        let (header, body) = split_message(&wire, MsgType::EchoRequest).unwrap();
        assert_eq!(header.xid(), 7);
        assert_eq!(body, &[1, 2, 3, 4]);
    }

    #[test]
    fn split_message_rejects_other_type() {
        let wire = Header::new(MsgType::Hello, 8, 0).to_bytes();
        assert_eq!(
            split_message(&wire, MsgType::EchoReply),
            Err(DecodeError::TypeMismatch { expected: MsgType::EchoReply, actual: 0 })
        );
    }

    #[test]
    fn fixed_str_stops_at_nul() {
        let bytes = *b"eth0\0\0\0\0garbage!";
        let mut buf = &bytes[..];
        assert_eq!(read_fixed_str(&mut buf, 8), "eth0");
        assert_eq!(buf, b"garbage!");
    }
}
