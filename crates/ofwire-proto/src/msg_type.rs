//! Type and subtype codes for OpenFlow 1.0 messages.
//!
//! The header's `type` byte selects a [`MsgType`]. Three of those types are
//! containers whose body starts with a secondary header carrying a 16-bit
//! subtype: stats requests and replies use [`StatsType`], error messages use
//! [`ErrorType`]. The two subtype spaces are independent: `StatsType::Port`
//! and `ErrorType::PortModFailed` share the value 4 and mean unrelated things.

use serde_repr::{Deserialize_repr, Serialize_repr};

/// First-level message type (`OFPT_*`)
///
/// # Representation
///
/// Serialized as the single `type` byte of the header. The `#[repr(u8)]`
/// keeps the numeric values stable for wire compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum MsgType {
    // Symmetric messages
    /// Version negotiation
    Hello = 0,
    /// Error notification (sub-dispatched on [`ErrorType`])
    Error = 1,
    /// Liveness check
    EchoRequest = 2,
    /// Liveness check answer
    EchoReply = 3,
    /// Vendor extension
    Vendor = 4,

    // Switch configuration
    /// Ask for the switch's capabilities
    FeaturesRequest = 5,
    /// Switch capabilities and ports
    FeaturesReply = 6,
    /// Ask for the switch configuration
    GetConfigRequest = 7,
    /// Current switch configuration
    GetConfigReply = 8,
    /// Replace the switch configuration
    SetConfig = 9,

    // Asynchronous messages
    /// Packet forwarded to the controller
    PacketIn = 10,
    /// Flow entry expired or was deleted
    FlowRemoved = 11,
    /// Port added, removed or modified
    PortStatus = 12,

    // Controller command messages
    /// Send a packet out of the datapath
    PacketOut = 13,
    /// Modify the flow table
    FlowMod = 14,
    /// Modify port behavior
    PortMod = 15,

    // Statistics
    /// Statistics request (sub-dispatched on [`StatsType`])
    StatsRequest = 16,
    /// Statistics reply (sub-dispatched on [`StatsType`])
    StatsReply = 17,

    // Barrier
    /// Barrier request
    BarrierRequest = 18,
    /// Barrier reply
    BarrierReply = 19,

    // Queue configuration
    /// Ask for a port's queue configuration
    QueueGetConfigRequest = 20,
    /// A port's queue configuration
    QueueGetConfigReply = 21,
}

impl MsgType {
    /// Every declared type code, in numeric order
    pub const ALL: [Self; 22] = [
        Self::Hello,
        Self::Error,
        Self::EchoRequest,
        Self::EchoReply,
        Self::Vendor,
        Self::FeaturesRequest,
        Self::FeaturesReply,
        Self::GetConfigRequest,
        Self::GetConfigReply,
        Self::SetConfig,
        Self::PacketIn,
        Self::FlowRemoved,
        Self::PortStatus,
        Self::PacketOut,
        Self::FlowMod,
        Self::PortMod,
        Self::StatsRequest,
        Self::StatsReply,
        Self::BarrierRequest,
        Self::BarrierReply,
        Self::QueueGetConfigRequest,
        Self::QueueGetConfigReply,
    ];

    /// Convert to the raw header byte
    #[must_use]
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Convert from the raw header byte
    ///
    /// Returns `None` for codes OpenFlow 1.0 does not define. The function is
    /// total, so callers decide how to report unknown types.
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Hello),
            1 => Some(Self::Error),
            2 => Some(Self::EchoRequest),
            3 => Some(Self::EchoReply),
            4 => Some(Self::Vendor),
            5 => Some(Self::FeaturesRequest),
            6 => Some(Self::FeaturesReply),
            7 => Some(Self::GetConfigRequest),
            8 => Some(Self::GetConfigReply),
            9 => Some(Self::SetConfig),
            10 => Some(Self::PacketIn),
            11 => Some(Self::FlowRemoved),
            12 => Some(Self::PortStatus),
            13 => Some(Self::PacketOut),
            14 => Some(Self::FlowMod),
            15 => Some(Self::PortMod),
            16 => Some(Self::StatsRequest),
            17 => Some(Self::StatsReply),
            18 => Some(Self::BarrierRequest),
            19 => Some(Self::BarrierReply),
            20 => Some(Self::QueueGetConfigRequest),
            21 => Some(Self::QueueGetConfigReply),
            _ => None,
        }
    }

    /// Whether the body starts with a secondary header that selects a subtype
    #[must_use]
    pub const fn is_container(self) -> bool {
        matches!(self, Self::StatsRequest | Self::StatsReply | Self::Error)
    }
}

/// Statistics subtype (`OFPST_*`) shared by stats requests and replies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
#[repr(u16)]
pub enum StatsType {
    /// Switch description
    Desc = 0,
    /// Individual flow statistics
    Flow = 1,
    /// Aggregate flow statistics
    Aggregate = 2,
    /// Flow table statistics
    Table = 3,
    /// Physical port statistics
    Port = 4,
    /// Queue statistics
    Queue = 5,
}

impl StatsType {
    /// Every declared stats code
    ///
    /// Vendor statistics (`0xffff`) are not declared and decode as an
    /// unrecognized stats variant.
    pub const ALL: [Self; 6] =
        [Self::Desc, Self::Flow, Self::Aggregate, Self::Table, Self::Port, Self::Queue];

    /// Convert to the raw secondary-header value
    #[must_use]
    pub const fn to_u16(self) -> u16 {
        self as u16
    }

    /// Convert from the raw secondary-header value
    #[must_use]
    pub const fn from_u16(value: u16) -> Option<Self> {
        match value {
            0 => Some(Self::Desc),
            1 => Some(Self::Flow),
            2 => Some(Self::Aggregate),
            3 => Some(Self::Table),
            4 => Some(Self::Port),
            5 => Some(Self::Queue),
            _ => None,
        }
    }
}

/// Error family subtype (`OFPET_*`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
#[repr(u16)]
pub enum ErrorType {
    /// Hello protocol failed
    HelloFailed = 0,
    /// Request was not understood
    BadRequest = 1,
    /// Error in action description
    BadAction = 2,
    /// Problem modifying a flow entry
    FlowModFailed = 3,
    /// Port mod request failed
    PortModFailed = 4,
    /// Queue operation failed
    QueueOpFailed = 5,
}

impl ErrorType {
    /// Every declared error code
    pub const ALL: [Self; 6] = [
        Self::HelloFailed,
        Self::BadRequest,
        Self::BadAction,
        Self::FlowModFailed,
        Self::PortModFailed,
        Self::QueueOpFailed,
    ];

    /// Convert to the raw secondary-header value
    #[must_use]
    pub const fn to_u16(self) -> u16 {
        self as u16
    }

    /// Convert from the raw secondary-header value
    #[must_use]
    pub const fn from_u16(value: u16) -> Option<Self> {
        match value {
            0 => Some(Self::HelloFailed),
            1 => Some(Self::BadRequest),
            2 => Some(Self::BadAction),
            3 => Some(Self::FlowModFailed),
            4 => Some(Self::PortModFailed),
            5 => Some(Self::QueueOpFailed),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn msg_type_round_trip() {
        for msg_type in MsgType::ALL {
            assert_eq!(MsgType::from_u8(msg_type.to_u8()), Some(msg_type));
        }
    }

    #[test]
    fn msg_type_codes_are_dense() {
        for (index, msg_type) in MsgType::ALL.iter().enumerate() {
            assert_eq!(usize::from(msg_type.to_u8()), index);
        }
    }

    #[test]
    fn subtype_round_trip() {
        for stats_type in StatsType::ALL {
            assert_eq!(StatsType::from_u16(stats_type.to_u16()), Some(stats_type));
        }
        for error_type in ErrorType::ALL {
            assert_eq!(ErrorType::from_u16(error_type.to_u16()), Some(error_type));
        }
    }

    #[test]
    fn invalid_msg_type() {
        assert_eq!(MsgType::from_u8(22), None);
        assert_eq!(MsgType::from_u8(0xff), None);
    }

    #[test]
    fn only_three_containers() {
        let containers: Vec<_> = MsgType::ALL.into_iter().filter(|t| t.is_container()).collect();
        assert_eq!(containers, vec![MsgType::Error, MsgType::StatsRequest, MsgType::StatsReply]);
    }

    #[test]
    fn subtype_spaces_are_independent() {
        assert_eq!(StatsType::from_u16(0xffff), None);
        assert_eq!(ErrorType::from_u16(0xffff), None);
        assert_eq!(StatsType::from_u16(4), Some(StatsType::Port));
        assert_eq!(ErrorType::from_u16(4), Some(ErrorType::PortModFailed));
        assert_eq!(StatsType::from_u16(6), None);
        assert_eq!(ErrorType::from_u16(6), None);
    }
}
