//! Switch configuration messages: features, config, port-mod and queue
//! configuration.

use bytes::{Buf, Bytes};

use super::{PhyPort, read_mac, require, rest};
use crate::{
    MsgType,
    errors::Result,
    flags::{Capabilities, PortConfig, PortFeatures},
};

/// Switch capabilities and port list (`ofp_switch_features`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeaturesReply {
    /// Datapath unique id; the lower 48 bits are a MAC address
    pub datapath_id: u64,
    /// Max packets buffered at once
    pub n_buffers: u32,
    /// Number of tables supported by the datapath
    pub n_tables: u8,
    /// Supported capabilities
    pub capabilities: Capabilities,
    /// Bitmap of supported `OFPAT_*` action types
    pub actions: u32,
    /// Port descriptions
    pub ports: Vec<PhyPort>,
}

impl FeaturesReply {
    const FIXED_LEN: usize = 24;

    /// Decode the bytes following the header
    ///
    /// Trailing bytes too short to form a whole port description are ignored.
    ///
    /// # Errors
    ///
    /// Returns `TruncatedBody` if the fixed part is incomplete.
    pub fn decode(mut body: &[u8]) -> Result<Self> {
        require(MsgType::FeaturesReply, body, Self::FIXED_LEN)?;

        let datapath_id = body.get_u64();
        let n_buffers = body.get_u32();
        let n_tables = body.get_u8();
        body.advance(3);
        let capabilities = Capabilities::from_bits_retain(body.get_u32());
        let actions = body.get_u32();

        let mut ports = Vec::with_capacity(body.len() / PhyPort::SIZE);
        while body.len() >= PhyPort::SIZE {
            ports.push(PhyPort::read(&mut body));
        }

        Ok(Self { datapath_id, n_buffers, n_tables, capabilities, actions, ports })
    }
}

/// Switch configuration (`ofp_switch_config`), used by get-config replies
/// and set-config messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwitchConfig {
    /// `OFPC_FRAG_*` fragment handling flags
    pub flags: u16,
    /// Max bytes of a new flow sent to the controller
    pub miss_send_len: u16,
}

impl SwitchConfig {
    const FIXED_LEN: usize = 4;

    /// Decode the bytes following the header of a `msg_type` message
    ///
    /// # Errors
    ///
    /// Returns `TruncatedBody` if fewer than 4 bytes are present.
    pub fn decode(msg_type: MsgType, mut body: &[u8]) -> Result<Self> {
        require(msg_type, body, Self::FIXED_LEN)?;
        Ok(Self { flags: body.get_u16(), miss_send_len: body.get_u16() })
    }
}

/// Port behavior modification (`ofp_port_mod`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortMod {
    /// Port to modify
    pub port_no: u16,
    /// Must match the port's hardware address
    pub hw_addr: [u8; 6],
    /// New configuration bits
    pub config: PortConfig,
    /// Which configuration bits to change
    pub mask: PortConfig,
    /// Features to advertise; zero leaves them unchanged
    pub advertise: PortFeatures,
}

impl PortMod {
    const FIXED_LEN: usize = 24;

    /// Decode the bytes following the header
    ///
    /// # Errors
    ///
    /// Returns `TruncatedBody` if the body is shorter than 24 bytes.
    pub fn decode(mut body: &[u8]) -> Result<Self> {
        require(MsgType::PortMod, body, Self::FIXED_LEN)?;

        let port_no = body.get_u16();
        let hw_addr = read_mac(&mut body);
        let config = PortConfig::from_bits_retain(body.get_u32());
        let mask = PortConfig::from_bits_retain(body.get_u32());
        let advertise = PortFeatures::from_bits_retain(body.get_u32());

        Ok(Self { port_no, hw_addr, config, mask, advertise })
    }
}

/// Queue configuration request for one port
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueGetConfigRequest {
    /// Port to be queried
    pub port: u16,
}

impl QueueGetConfigRequest {
    const FIXED_LEN: usize = 4;

    /// Decode the bytes following the header
    ///
    /// # Errors
    ///
    /// Returns `TruncatedBody` if the body is shorter than 4 bytes.
    pub fn decode(mut body: &[u8]) -> Result<Self> {
        require(MsgType::QueueGetConfigRequest, body, Self::FIXED_LEN)?;
        Ok(Self { port: body.get_u16() })
    }
}

/// Queue configuration of one port
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueGetConfigReply {
    /// Port that was queried
    pub port: u16,
    /// Raw `ofp_packet_queue` list
    pub queues: Bytes,
}

impl QueueGetConfigReply {
    const FIXED_LEN: usize = 8;

    /// Decode the bytes following the header
    ///
    /// # Errors
    ///
    /// Returns `TruncatedBody` if the body is shorter than 8 bytes.
    pub fn decode(mut body: &[u8]) -> Result<Self> {
        require(MsgType::QueueGetConfigReply, body, Self::FIXED_LEN)?;
        let port = body.get_u16();
        body.advance(6);
        Ok(Self { port, queues: rest(body) })
    }
}
