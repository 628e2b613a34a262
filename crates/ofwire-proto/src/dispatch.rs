//! Two-level dispatch tables.
//!
//! The first level maps a header `type` byte to a [`Route`]: either a leaf
//! decoder or one of the three subtype families. The second level maps a
//! family's 16-bit subtype to its decoder. Tables are plain values built at
//! compile time; [`DispatchTable::STANDARD`] registers every OpenFlow 1.0
//! type and subtype.
//!
//! A table is never mutated after construction. The `with_*` builders take
//! the table by value and return a modified copy, so a caller can derive a
//! table that swaps one decoder:
//!
//! ```
//! use ofwire_proto::{DispatchTable, MsgType, Result, decoders, messages::Message};
//!
//! fn logging_echo(buf: &[u8]) -> Result<Message> {
//!     decoders::echo_request(buf)
//! }
//!
//! static TABLE: DispatchTable = DispatchTable::STANDARD.with_leaf(MsgType::EchoRequest, logging_echo);
//! ```

use crate::{ErrorType, MsgType, StatsType, decoders, errors::Result, messages::Message};

/// A per-type decoder: takes the complete message buffer, header included
pub type DecodeFn = fn(&[u8]) -> Result<Message>;

/// Container types whose body starts with a subtype-selecting header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// Statistics request, subtypes are [`StatsType`]
    StatsRequest,
    /// Statistics reply, subtypes are [`StatsType`]
    StatsReply,
    /// Error message, subtypes are [`ErrorType`]
    Error,
}

impl Family {
    /// First-level type of the family
    #[must_use]
    pub const fn msg_type(self) -> MsgType {
        match self {
            Self::StatsRequest => MsgType::StatsRequest,
            Self::StatsReply => MsgType::StatsReply,
            Self::Error => MsgType::Error,
        }
    }

    /// Whether an unregistered subtype yields an absent result instead of
    /// an error
    ///
    /// Stats families answer unknown subtypes softly; the error family
    /// treats them as a decode failure.
    #[must_use]
    pub const fn unknown_subtype_is_soft(self) -> bool {
        matches!(self, Self::StatsRequest | Self::StatsReply)
    }
}

/// First-level table entry
#[derive(Debug, Clone, Copy)]
pub enum Route {
    /// Decode the whole buffer with this function
    Leaf(DecodeFn),
    /// Read the secondary header and consult the family's second-level table
    Family(Family),
}

const TYPES: usize = MsgType::ALL.len();
const STATS: usize = StatsType::ALL.len();
const ERRORS: usize = ErrorType::ALL.len();

/// Immutable two-level dispatch table
#[derive(Debug, Clone, Copy)]
pub struct DispatchTable {
    types: [Option<Route>; TYPES],
    stats_request: [Option<DecodeFn>; STATS],
    stats_reply: [Option<DecodeFn>; STATS],
    errors: [Option<DecodeFn>; ERRORS],
}

impl DispatchTable {
    /// Table with no routes at all
    pub const EMPTY: Self = Self {
        types: [None; TYPES],
        stats_request: [None; STATS],
        stats_reply: [None; STATS],
        errors: [None; ERRORS],
    };

    /// Every OpenFlow 1.0 type and subtype mapped to its standard decoder
    pub const STANDARD: Self = Self::EMPTY
        .with_leaf(MsgType::Hello, decoders::hello)
        .with_family(Family::Error)
        .with_leaf(MsgType::EchoRequest, decoders::echo_request)
        .with_leaf(MsgType::EchoReply, decoders::echo_reply)
        .with_leaf(MsgType::Vendor, decoders::vendor)
        .with_leaf(MsgType::FeaturesRequest, decoders::features_request)
        .with_leaf(MsgType::FeaturesReply, decoders::features_reply)
        .with_leaf(MsgType::GetConfigRequest, decoders::get_config_request)
        .with_leaf(MsgType::GetConfigReply, decoders::get_config_reply)
        .with_leaf(MsgType::SetConfig, decoders::set_config)
        .with_leaf(MsgType::PacketIn, decoders::packet_in)
        .with_leaf(MsgType::FlowRemoved, decoders::flow_removed)
        .with_leaf(MsgType::PortStatus, decoders::port_status)
        .with_leaf(MsgType::PacketOut, decoders::packet_out)
        .with_leaf(MsgType::FlowMod, decoders::flow_mod)
        .with_leaf(MsgType::PortMod, decoders::port_mod)
        .with_family(Family::StatsRequest)
        .with_family(Family::StatsReply)
        .with_leaf(MsgType::BarrierRequest, decoders::barrier_request)
        .with_leaf(MsgType::BarrierReply, decoders::barrier_reply)
        .with_leaf(MsgType::QueueGetConfigRequest, decoders::queue_get_config_request)
        .with_leaf(MsgType::QueueGetConfigReply, decoders::queue_get_config_reply)
        // Statistics requests
        .with_stats_request(StatsType::Desc, decoders::desc_stats_request)
        .with_stats_request(StatsType::Flow, decoders::flow_stats_request)
        .with_stats_request(StatsType::Aggregate, decoders::aggregate_stats_request)
        .with_stats_request(StatsType::Table, decoders::table_stats_request)
        .with_stats_request(StatsType::Port, decoders::port_stats_request)
        .with_stats_request(StatsType::Queue, decoders::queue_stats_request)
        // Statistics replies
        .with_stats_reply(StatsType::Desc, decoders::desc_stats_reply)
        .with_stats_reply(StatsType::Flow, decoders::flow_stats_reply)
        .with_stats_reply(StatsType::Aggregate, decoders::aggregate_stats_reply)
        .with_stats_reply(StatsType::Table, decoders::table_stats_reply)
        .with_stats_reply(StatsType::Port, decoders::port_stats_reply)
        .with_stats_reply(StatsType::Queue, decoders::queue_stats_reply)
        // Errors
        .with_error(ErrorType::HelloFailed, decoders::hello_failed)
        .with_error(ErrorType::BadRequest, decoders::bad_request)
        .with_error(ErrorType::BadAction, decoders::bad_action)
        .with_error(ErrorType::FlowModFailed, decoders::flow_mod_failed)
        .with_error(ErrorType::PortModFailed, decoders::port_mod_failed)
        .with_error(ErrorType::QueueOpFailed, decoders::queue_op_failed);

    /// Route `msg_type` straight to `decoder`
    #[must_use]
    pub const fn with_leaf(mut self, msg_type: MsgType, decoder: DecodeFn) -> Self {
        self.types[msg_type.to_u8() as usize] = Some(Route::Leaf(decoder));
        self
    }

    /// Route the family's type through its second-level table
    #[must_use]
    pub const fn with_family(mut self, family: Family) -> Self {
        self.types[family.msg_type().to_u8() as usize] = Some(Route::Family(family));
        self
    }

    /// Register the decoder for one stats request subtype
    #[must_use]
    pub const fn with_stats_request(mut self, stats_type: StatsType, decoder: DecodeFn) -> Self {
        self.stats_request[stats_type.to_u16() as usize] = Some(decoder);
        self
    }

    /// Register the decoder for one stats reply subtype
    #[must_use]
    pub const fn with_stats_reply(mut self, stats_type: StatsType, decoder: DecodeFn) -> Self {
        self.stats_reply[stats_type.to_u16() as usize] = Some(decoder);
        self
    }

    /// Register the decoder for one error family
    #[must_use]
    pub const fn with_error(mut self, error_type: ErrorType, decoder: DecodeFn) -> Self {
        self.errors[error_type.to_u16() as usize] = Some(decoder);
        self
    }

    /// First-level lookup on the raw header `type` byte
    #[must_use]
    pub fn route(&self, type_code: u8) -> Option<Route> {
        MsgType::from_u8(type_code).and_then(|msg_type| self.types[usize::from(msg_type.to_u8())])
    }

    /// Second-level lookup on a raw subtype
    ///
    /// Stats lookups go through [`StatsType::from_u16`] and error lookups
    /// through [`ErrorType::from_u16`]; the two code spaces never mix.
    #[must_use]
    pub fn subtype(&self, family: Family, subtype: u16) -> Option<DecodeFn> {
        match family {
            Family::StatsRequest => {
                StatsType::from_u16(subtype).and_then(|t| self.stats_request[usize::from(t.to_u16())])
            },
            Family::StatsReply => {
                StatsType::from_u16(subtype).and_then(|t| self.stats_reply[usize::from(t.to_u16())])
            },
            Family::Error => ErrorType::from_u16(subtype).and_then(|t| self.errors[usize::from(t.to_u16())]),
        }
    }
}

impl Default for DispatchTable {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Shared instance of [`DispatchTable::STANDARD`]
pub static STANDARD_TABLE: DispatchTable = DispatchTable::STANDARD;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_type_is_routed() {
        for msg_type in MsgType::ALL {
            let route = DispatchTable::STANDARD.route(msg_type.to_u8());
            match route {
                Some(Route::Family(family)) => {
                    assert!(msg_type.is_container());
                    assert_eq!(family.msg_type(), msg_type);
                },
                Some(Route::Leaf(_)) => assert!(!msg_type.is_container()),
                None => panic!("{msg_type:?} has no route"),
            }
        }
    }

    #[test]
    fn every_subtype_is_registered() {
        for stats_type in StatsType::ALL {
            assert!(STANDARD_TABLE.subtype(Family::StatsRequest, stats_type.to_u16()).is_some());
            assert!(STANDARD_TABLE.subtype(Family::StatsReply, stats_type.to_u16()).is_some());
        }
        for error_type in ErrorType::ALL {
            assert!(STANDARD_TABLE.subtype(Family::Error, error_type.to_u16()).is_some());
        }
    }

    #[test]
    fn undeclared_codes_are_absent() {
        assert!(STANDARD_TABLE.route(22).is_none());
        assert!(STANDARD_TABLE.route(0xff).is_none());
        for family in [Family::StatsRequest, Family::StatsReply, Family::Error] {
            assert!(STANDARD_TABLE.subtype(family, 6).is_none());
            assert!(STANDARD_TABLE.subtype(family, 0xffff).is_none());
        }
    }

    #[test]
    fn lookups_return_the_registered_function() {
        let Some(Route::Leaf(decoder)) = STANDARD_TABLE.route(MsgType::FlowMod.to_u8()) else {
            panic!("flow mod should be a leaf");
        };
        assert!(std::ptr::fn_addr_eq(decoder, decoders::flow_mod as DecodeFn));

        let decoder = STANDARD_TABLE.subtype(Family::Error, ErrorType::PortModFailed.to_u16()).unwrap();
        assert!(std::ptr::fn_addr_eq(decoder, decoders::port_mod_failed as DecodeFn));

        let decoder = STANDARD_TABLE.subtype(Family::StatsReply, StatsType::Port.to_u16()).unwrap();
        assert!(std::ptr::fn_addr_eq(decoder, decoders::port_stats_reply as DecodeFn));
    }

    #[test]
    fn builders_replace_one_entry() {
        fn never(_: &[u8]) -> Result<Message> {
            Err(crate::DecodeError::UnknownMessageType(0))
        }

        let table = DispatchTable::STANDARD.with_stats_reply(StatsType::Table, never);
        let replaced = table.subtype(Family::StatsReply, StatsType::Table.to_u16()).unwrap();
        assert!(std::ptr::fn_addr_eq(replaced, never as DecodeFn));

        let untouched = table.subtype(Family::StatsRequest, StatsType::Table.to_u16()).unwrap();
        assert!(std::ptr::fn_addr_eq(untouched, decoders::table_stats_request as DecodeFn));
    }

    #[test]
    fn empty_table_routes_nothing() {
        for msg_type in MsgType::ALL {
            assert!(DispatchTable::EMPTY.route(msg_type.to_u8()).is_none());
        }
    }
}
