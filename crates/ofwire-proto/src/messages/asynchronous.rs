//! Asynchronous messages sent by the switch: packet-in, flow-removed and
//! port-status.

use bytes::{Buf, Bytes};

use super::{PhyPort, WireMatch, require, rest};
use crate::{MsgType, errors::Result};

/// Buffer id meaning "packet not buffered"
pub const OFP_NO_BUFFER: u32 = 0xffff_ffff;

/// Packet received on a port and sent to the controller (`ofp_packet_in`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketIn {
    /// Id assigned by the datapath, or [`OFP_NO_BUFFER`]
    pub buffer_id: u32,
    /// Full length of the frame
    pub total_len: u16,
    /// Port on which the frame was received
    pub in_port: u16,
    /// `OFPR_*` reason the packet is being sent
    pub reason: u8,
    /// Ethernet frame, possibly truncated to `miss_send_len`
    pub data: Bytes,
}

impl PacketIn {
    const FIXED_LEN: usize = 10;

    /// Decode the bytes following the header
    ///
    /// # Errors
    ///
    /// Returns `TruncatedBody` if the fixed part is incomplete.
    pub fn decode(mut body: &[u8]) -> Result<Self> {
        require(MsgType::PacketIn, body, Self::FIXED_LEN)?;

        let buffer_id = body.get_u32();
        let total_len = body.get_u16();
        let in_port = body.get_u16();
        let reason = body.get_u8();
        body.advance(1);

        Ok(Self { buffer_id, total_len, in_port, reason, data: rest(body) })
    }

    /// Whether the switch kept a copy of the packet
    #[must_use]
    pub fn is_buffered(&self) -> bool {
        self.buffer_id != OFP_NO_BUFFER
    }
}

/// Flow entry removed from the table (`ofp_flow_removed`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowRemoved {
    /// Description of the removed entry
    pub flow_match: WireMatch,
    /// Opaque controller-issued identifier
    pub cookie: u64,
    /// Priority level of the entry
    pub priority: u16,
    /// `OFPRR_*` removal reason
    pub reason: u8,
    /// Time the flow was alive, seconds part
    pub duration_sec: u32,
    /// Time the flow was alive beyond `duration_sec`, in nanoseconds
    pub duration_nsec: u32,
    /// Idle timeout of the flow-mod that installed the entry
    pub idle_timeout: u16,
    /// Packets matched by the entry
    pub packet_count: u64,
    /// Bytes matched by the entry
    pub byte_count: u64,
}

impl FlowRemoved {
    const FIXED_LEN: usize = WireMatch::SIZE + 40;

    /// Decode the bytes following the header
    ///
    /// # Errors
    ///
    /// Returns `TruncatedBody` if the body is shorter than 80 bytes.
    pub fn decode(mut body: &[u8]) -> Result<Self> {
        require(MsgType::FlowRemoved, body, Self::FIXED_LEN)?;

        let flow_match = WireMatch::read(&mut body);
        let cookie = body.get_u64();
        let priority = body.get_u16();
        let reason = body.get_u8();
        body.advance(1);
        let duration_sec = body.get_u32();
        let duration_nsec = body.get_u32();
        let idle_timeout = body.get_u16();
        body.advance(2);
        let packet_count = body.get_u64();
        let byte_count = body.get_u64();

        Ok(Self {
            flow_match,
            cookie,
            priority,
            reason,
            duration_sec,
            duration_nsec,
            idle_timeout,
            packet_count,
            byte_count,
        })
    }
}

/// A physical port was added, removed or modified (`ofp_port_status`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortStatus {
    /// `OFPPR_*` change reason
    pub reason: u8,
    /// Port description after the change
    pub desc: PhyPort,
}

impl PortStatus {
    const FIXED_LEN: usize = 8 + PhyPort::SIZE;

    /// Decode the bytes following the header
    ///
    /// # Errors
    ///
    /// Returns `TruncatedBody` if the body is shorter than 56 bytes.
    pub fn decode(mut body: &[u8]) -> Result<Self> {
        require(MsgType::PortStatus, body, Self::FIXED_LEN)?;

        let reason = body.get_u8();
        body.advance(7);
        let desc = PhyPort::read(&mut body);

        Ok(Self { reason, desc })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DecodeError;

    #[test]
    fn packet_in_unbuffered() {
        let body = hex::decode("ffffffff003c000200").unwrap();
        // one byte short of the fixed part
        assert_eq!(
            PacketIn::decode(&body),
            Err(DecodeError::TruncatedBody { msg_type: MsgType::PacketIn, expected: 10, actual: 9 })
        );

        let body = hex::decode("ffffffff003c00020100deadbeef").unwrap();
        let packet_in = PacketIn::decode(&body).unwrap();
        assert!(!packet_in.is_buffered());
        assert_eq!(packet_in.total_len, 60);
        assert_eq!(packet_in.in_port, 2);
        assert_eq!(packet_in.reason, 1);
        assert_eq!(packet_in.data.as_ref(), &[0xde, 0xad, 0xbe, 0xef]);
    }

    #[test]
    fn port_status_reads_description() {
        let mut body = vec![2u8, 0, 0, 0, 0, 0, 0, 0];
        body.extend_from_slice(&[0x00, 0x05]);
        body.extend_from_slice(&[0x02, 0, 0, 0, 0, 0x05]);
        let mut name = [0u8; 16];
        name[..4].copy_from_slice(b"eth5");
        body.extend_from_slice(&name);
        body.extend_from_slice(&1u32.to_be_bytes()); // config: PORT_DOWN
        body.extend_from_slice(&[0u8; 20]);

        let status = PortStatus::decode(&body).unwrap();
        assert_eq!(status.reason, 2);
        assert_eq!(status.desc.port_no, 5);
        assert_eq!(status.desc.name, "eth5");
        assert!(status.desc.config.contains(crate::flags::PortConfig::PORT_DOWN));
    }
}
