//! Controller command messages: packet-out and flow-mod.

use bytes::{Buf, Bytes};

use super::{WireMatch, require, rest};
use crate::{
    MsgType,
    errors::{DecodeError, Result},
    flags::FlowModFlags,
};

/// Packet injected into the datapath by the controller (`ofp_packet_out`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketOut {
    /// Buffered packet to send, or `OFP_NO_BUFFER`
    pub buffer_id: u32,
    /// Packet's input port, or `OFPP_NONE`
    pub in_port: u16,
    /// Raw action list
    pub actions: Bytes,
    /// Packet data when not buffered
    pub data: Bytes,
}

impl PacketOut {
    const FIXED_LEN: usize = 8;

    /// Decode the bytes following the header
    ///
    /// # Errors
    ///
    /// Returns `TruncatedBody` if the fixed part or the action list
    /// announced by `actions_len` is incomplete.
    pub fn decode(mut body: &[u8]) -> Result<Self> {
        require(MsgType::PacketOut, body, Self::FIXED_LEN)?;

        let buffer_id = body.get_u32();
        let in_port = body.get_u16();
        let actions_len = usize::from(body.get_u16());

        if body.len() < actions_len {
            return Err(DecodeError::TruncatedBody {
                msg_type: MsgType::PacketOut,
                expected: Self::FIXED_LEN + actions_len,
                actual: Self::FIXED_LEN + body.len(),
            });
        }
        let (actions, data) = body.split_at(actions_len);

        Ok(Self { buffer_id, in_port, actions: rest(actions), data: rest(data) })
    }
}

/// Flow-mod command (`OFPFC_*`)
pub mod command {
    /// New flow
    pub const ADD: u16 = 0;
    /// Modify all matching flows
    pub const MODIFY: u16 = 1;
    /// Modify entry strictly matching wildcards
    pub const MODIFY_STRICT: u16 = 2;
    /// Delete all matching flows
    pub const DELETE: u16 = 3;
    /// Strictly match wildcards and priority
    pub const DELETE_STRICT: u16 = 4;
}

/// Flow table modification (`ofp_flow_mod`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowMod {
    /// Fields to match
    pub flow_match: WireMatch,
    /// Opaque controller-issued identifier
    pub cookie: u64,
    /// One of the [`command`] values
    pub command: u16,
    /// Idle time before discarding (seconds)
    pub idle_timeout: u16,
    /// Max time before discarding (seconds)
    pub hard_timeout: u16,
    /// Priority level of the flow entry
    pub priority: u16,
    /// Buffered packet to apply to, or `OFP_NO_BUFFER`
    pub buffer_id: u32,
    /// Output port filter for delete commands
    pub out_port: u16,
    /// Flow-mod flags
    pub flags: FlowModFlags,
    /// Raw action list
    pub actions: Bytes,
}

impl FlowMod {
    const FIXED_LEN: usize = WireMatch::SIZE + 24;

    /// Decode the bytes following the header
    ///
    /// # Errors
    ///
    /// Returns `TruncatedBody` if the body is shorter than 64 bytes.
    pub fn decode(mut body: &[u8]) -> Result<Self> {
        require(MsgType::FlowMod, body, Self::FIXED_LEN)?;

        let flow_match = WireMatch::read(&mut body);
        let cookie = body.get_u64();
        let command = body.get_u16();
        let idle_timeout = body.get_u16();
        let hard_timeout = body.get_u16();
        let priority = body.get_u16();
        let buffer_id = body.get_u32();
        let out_port = body.get_u16();
        let flags = FlowModFlags::from_bits_retain(body.get_u16());

        Ok(Self {
            flow_match,
            cookie,
            command,
            idle_timeout,
            hard_timeout,
            priority,
            buffer_id,
            out_port,
            flags,
            actions: rest(body),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packet_out_splits_actions_from_data() {
        // buffer_id, in_port, actions_len = 8, one output action, 2 data bytes
        let body = hex::decode("ffffffff fffe 0008 0000000800010000 abcd".replace(' ', "")).unwrap();
        let packet_out = PacketOut::decode(&body).unwrap();

        assert_eq!(packet_out.in_port, 0xfffe);
        assert_eq!(packet_out.actions.len(), 8);
        assert_eq!(packet_out.data.as_ref(), &[0xab, 0xcd]);
    }

    #[test]
    fn packet_out_actions_overrun() {
        let body = hex::decode("ffffffff00010010000000080001").unwrap();
        assert_eq!(
            PacketOut::decode(&body),
            Err(DecodeError::TruncatedBody {
                msg_type: MsgType::PacketOut,
                expected: 24,
                actual: 14
            })
        );
    }

    #[test]
    fn flow_mod_fixed_part() {
        let mut body = vec![0u8; WireMatch::SIZE];
        body[..4].copy_from_slice(&0x003f_ffffu32.to_be_bytes());
        body.extend_from_slice(&7u64.to_be_bytes()); // cookie
        body.extend_from_slice(&command::DELETE.to_be_bytes());
        body.extend_from_slice(&10u16.to_be_bytes()); // idle
        body.extend_from_slice(&0u16.to_be_bytes()); // hard
        body.extend_from_slice(&0x8000u16.to_be_bytes()); // priority
        body.extend_from_slice(&0xffff_ffffu32.to_be_bytes());
        body.extend_from_slice(&0xffffu16.to_be_bytes()); // out_port
        body.extend_from_slice(&3u16.to_be_bytes()); // flags

        let flow_mod = FlowMod::decode(&body).unwrap();
        assert_eq!(flow_mod.flow_match.wildcards, 0x003f_ffff);
        assert_eq!(flow_mod.cookie, 7);
        assert_eq!(flow_mod.command, command::DELETE);
        assert_eq!(flow_mod.idle_timeout, 10);
        assert_eq!(flow_mod.priority, 0x8000);
        assert!(flow_mod.flags.contains(FlowModFlags::SEND_FLOW_REM | FlowModFlags::CHECK_OVERLAP));
        assert!(flow_mod.actions.is_empty());
    }
}
