//! Standard per-type decoders registered in [`DispatchTable::STANDARD`].
//!
//! Every function here has the [`DecodeFn`] shape: it takes the complete
//! message buffer, re-reads the header itself and rejects a buffer of the
//! wrong type with [`DecodeError::TypeMismatch`]. Family decoders also
//! re-read the secondary header and reject another subtype with
//! [`DecodeError::SubtypeMismatch`].
//!
//! The functions are public so a custom table can mix them with its own.
//!
//! [`DispatchTable::STANDARD`]: crate::DispatchTable::STANDARD
//! [`DecodeFn`]: crate::DecodeFn
//! [`DecodeError::TypeMismatch`]: crate::DecodeError::TypeMismatch
//! [`DecodeError::SubtypeMismatch`]: crate::DecodeError::SubtypeMismatch

use crate::{
    ErrorType, MsgType, StatsType,
    errors::Result,
    messages::{
        Body, Echo, ErrorMessage, FeaturesReply, FlowMod, FlowRemoved, Hello, Message, PacketIn,
        PacketOut, PortMod, PortStatus, QueueGetConfigReply, QueueGetConfigRequest, StatsReply,
        StatsRequest, SwitchConfig, Vendor, split_message,
    },
};

fn leaf(buf: &[u8], msg_type: MsgType, build: impl FnOnce(&[u8]) -> Result<Body>) -> Result<Message> {
    let (header, body) = split_message(buf, msg_type)?;
    Ok(Message { header, body: build(body)? })
}

/// `OFPT_HELLO`
pub fn hello(buf: &[u8]) -> Result<Message> {
    leaf(buf, MsgType::Hello, |body| Ok(Body::Hello(Hello::decode(body))))
}

/// `OFPT_ECHO_REQUEST`
pub fn echo_request(buf: &[u8]) -> Result<Message> {
    leaf(buf, MsgType::EchoRequest, |body| Ok(Body::EchoRequest(Echo::decode(body))))
}

/// `OFPT_ECHO_REPLY`
pub fn echo_reply(buf: &[u8]) -> Result<Message> {
    leaf(buf, MsgType::EchoReply, |body| Ok(Body::EchoReply(Echo::decode(body))))
}

/// `OFPT_VENDOR`
pub fn vendor(buf: &[u8]) -> Result<Message> {
    leaf(buf, MsgType::Vendor, |body| Vendor::decode(body).map(Body::Vendor))
}

/// `OFPT_FEATURES_REQUEST`
pub fn features_request(buf: &[u8]) -> Result<Message> {
    leaf(buf, MsgType::FeaturesRequest, |_| Ok(Body::FeaturesRequest))
}

/// `OFPT_FEATURES_REPLY`
pub fn features_reply(buf: &[u8]) -> Result<Message> {
    leaf(buf, MsgType::FeaturesReply, |body| FeaturesReply::decode(body).map(Body::FeaturesReply))
}

/// `OFPT_GET_CONFIG_REQUEST`
pub fn get_config_request(buf: &[u8]) -> Result<Message> {
    leaf(buf, MsgType::GetConfigRequest, |_| Ok(Body::GetConfigRequest))
}

/// `OFPT_GET_CONFIG_REPLY`
pub fn get_config_reply(buf: &[u8]) -> Result<Message> {
    leaf(buf, MsgType::GetConfigReply, |body| {
        SwitchConfig::decode(MsgType::GetConfigReply, body).map(Body::GetConfigReply)
    })
}

/// `OFPT_SET_CONFIG`
pub fn set_config(buf: &[u8]) -> Result<Message> {
    leaf(buf, MsgType::SetConfig, |body| SwitchConfig::decode(MsgType::SetConfig, body).map(Body::SetConfig))
}

/// `OFPT_PACKET_IN`
pub fn packet_in(buf: &[u8]) -> Result<Message> {
    leaf(buf, MsgType::PacketIn, |body| PacketIn::decode(body).map(Body::PacketIn))
}

/// `OFPT_FLOW_REMOVED`
pub fn flow_removed(buf: &[u8]) -> Result<Message> {
    leaf(buf, MsgType::FlowRemoved, |body| FlowRemoved::decode(body).map(Body::FlowRemoved))
}

/// `OFPT_PORT_STATUS`
pub fn port_status(buf: &[u8]) -> Result<Message> {
    leaf(buf, MsgType::PortStatus, |body| PortStatus::decode(body).map(Body::PortStatus))
}

/// `OFPT_PACKET_OUT`
pub fn packet_out(buf: &[u8]) -> Result<Message> {
    leaf(buf, MsgType::PacketOut, |body| PacketOut::decode(body).map(Body::PacketOut))
}

/// `OFPT_FLOW_MOD`
pub fn flow_mod(buf: &[u8]) -> Result<Message> {
    leaf(buf, MsgType::FlowMod, |body| FlowMod::decode(body).map(Body::FlowMod))
}

/// `OFPT_PORT_MOD`
pub fn port_mod(buf: &[u8]) -> Result<Message> {
    leaf(buf, MsgType::PortMod, |body| PortMod::decode(body).map(Body::PortMod))
}

/// `OFPT_BARRIER_REQUEST`
pub fn barrier_request(buf: &[u8]) -> Result<Message> {
    leaf(buf, MsgType::BarrierRequest, |_| Ok(Body::BarrierRequest))
}

/// `OFPT_BARRIER_REPLY`
pub fn barrier_reply(buf: &[u8]) -> Result<Message> {
    leaf(buf, MsgType::BarrierReply, |_| Ok(Body::BarrierReply))
}

/// `OFPT_QUEUE_GET_CONFIG_REQUEST`
pub fn queue_get_config_request(buf: &[u8]) -> Result<Message> {
    leaf(buf, MsgType::QueueGetConfigRequest, |body| {
        QueueGetConfigRequest::decode(body).map(Body::QueueGetConfigRequest)
    })
}

/// `OFPT_QUEUE_GET_CONFIG_REPLY`
pub fn queue_get_config_reply(buf: &[u8]) -> Result<Message> {
    leaf(buf, MsgType::QueueGetConfigReply, |body| {
        QueueGetConfigReply::decode(body).map(Body::QueueGetConfigReply)
    })
}

// Second level: one function per (family, subtype) pair

fn stats_request(buf: &[u8], stats_type: StatsType) -> Result<Message> {
    leaf(buf, MsgType::StatsRequest, |body| StatsRequest::decode(stats_type, body).map(Body::StatsRequest))
}

fn stats_reply(buf: &[u8], stats_type: StatsType) -> Result<Message> {
    leaf(buf, MsgType::StatsReply, |body| StatsReply::decode(stats_type, body).map(Body::StatsReply))
}

fn error(buf: &[u8], error_type: ErrorType) -> Result<Message> {
    leaf(buf, MsgType::Error, |body| ErrorMessage::decode(error_type, body).map(Body::Error))
}

/// `OFPST_DESC` request
pub fn desc_stats_request(buf: &[u8]) -> Result<Message> {
    stats_request(buf, StatsType::Desc)
}

/// `OFPST_FLOW` request
pub fn flow_stats_request(buf: &[u8]) -> Result<Message> {
    stats_request(buf, StatsType::Flow)
}

/// `OFPST_AGGREGATE` request
pub fn aggregate_stats_request(buf: &[u8]) -> Result<Message> {
    stats_request(buf, StatsType::Aggregate)
}

/// `OFPST_TABLE` request
pub fn table_stats_request(buf: &[u8]) -> Result<Message> {
    stats_request(buf, StatsType::Table)
}

/// `OFPST_PORT` request
pub fn port_stats_request(buf: &[u8]) -> Result<Message> {
    stats_request(buf, StatsType::Port)
}

/// `OFPST_QUEUE` request
pub fn queue_stats_request(buf: &[u8]) -> Result<Message> {
    stats_request(buf, StatsType::Queue)
}

/// `OFPST_DESC` reply
pub fn desc_stats_reply(buf: &[u8]) -> Result<Message> {
    stats_reply(buf, StatsType::Desc)
}

/// `OFPST_FLOW` reply
pub fn flow_stats_reply(buf: &[u8]) -> Result<Message> {
    stats_reply(buf, StatsType::Flow)
}

/// `OFPST_AGGREGATE` reply
pub fn aggregate_stats_reply(buf: &[u8]) -> Result<Message> {
    stats_reply(buf, StatsType::Aggregate)
}

/// `OFPST_TABLE` reply
pub fn table_stats_reply(buf: &[u8]) -> Result<Message> {
    stats_reply(buf, StatsType::Table)
}

/// `OFPST_PORT` reply
pub fn port_stats_reply(buf: &[u8]) -> Result<Message> {
    stats_reply(buf, StatsType::Port)
}

/// `OFPST_QUEUE` reply
pub fn queue_stats_reply(buf: &[u8]) -> Result<Message> {
    stats_reply(buf, StatsType::Queue)
}

/// `OFPET_HELLO_FAILED`
pub fn hello_failed(buf: &[u8]) -> Result<Message> {
    error(buf, ErrorType::HelloFailed)
}

/// `OFPET_BAD_REQUEST`
pub fn bad_request(buf: &[u8]) -> Result<Message> {
    error(buf, ErrorType::BadRequest)
}

/// `OFPET_BAD_ACTION`
pub fn bad_action(buf: &[u8]) -> Result<Message> {
    error(buf, ErrorType::BadAction)
}

/// `OFPET_FLOW_MOD_FAILED`
pub fn flow_mod_failed(buf: &[u8]) -> Result<Message> {
    error(buf, ErrorType::FlowModFailed)
}

/// `OFPET_PORT_MOD_FAILED`
pub fn port_mod_failed(buf: &[u8]) -> Result<Message> {
    error(buf, ErrorType::PortModFailed)
}

/// `OFPET_QUEUE_OP_FAILED`
pub fn queue_op_failed(buf: &[u8]) -> Result<Message> {
    error(buf, ErrorType::QueueOpFailed)
}
