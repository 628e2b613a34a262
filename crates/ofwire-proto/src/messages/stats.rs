//! Statistics requests and replies (`ofp_stats_request`, `ofp_stats_reply`).
//!
//! Both messages start with a 4-byte secondary header:
//!
//! ```text
//! 8                10               12
//! +--------+--------+--------+--------+----------------
//! |   stats type    |      flags      | type-specific body
//! +--------+--------+--------+--------+----------------
//! ```
//!
//! Replies that carry one entry per flow, table, port or queue hold a list;
//! a trailing partial entry is a [`DecodeError::TruncatedBody`].

use bytes::{Buf, Bytes};

use super::{WireMatch, read_fixed_str, require, rest};
use crate::{
    MsgType, StatsType,
    errors::{DecodeError, Result},
    flags::StatsReplyFlags,
};

/// Size of the `{type, flags}` secondary header
pub const STATS_HEADER_LEN: usize = 4;

/// Read and check the secondary header of a stats message body.
///
/// Returns the flags and the bytes after the secondary header.
fn read_stats_header(msg_type: MsgType, stats_type: StatsType, mut body: &[u8]) -> Result<(u16, &[u8])> {
    if body.len() < STATS_HEADER_LEN {
        return Err(DecodeError::TruncatedSubHeader {
            msg_type,
            expected: crate::Header::SIZE + STATS_HEADER_LEN,
            actual: crate::Header::SIZE + body.len(),
        });
    }

    let subtype = body.get_u16();
    if subtype != stats_type.to_u16() {
        return Err(DecodeError::SubtypeMismatch { msg_type, expected: stats_type.to_u16(), actual: subtype });
    }
    let flags = body.get_u16();

    Ok((flags, body))
}

/// Decode a list of fixed-size entries filling the rest of `body`.
fn read_entries<T>(msg_type: MsgType, mut body: &[u8], size: usize, read: fn(&mut &[u8]) -> T) -> Result<Vec<T>> {
    let mut entries = Vec::with_capacity(body.len() / size);
    while !body.is_empty() {
        require(msg_type, body, size)?;
        entries.push(read(&mut body));
    }
    Ok(entries)
}

/// Statistics request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsRequest {
    /// Request flags (none are defined in OpenFlow 1.0)
    pub flags: u16,
    /// Subtype-specific body
    pub body: StatsRequestBody,
}

/// Body of a statistics request, one variant per [`StatsType`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatsRequestBody {
    /// Switch description
    Desc,
    /// Individual flow statistics
    Flow(FlowStatsRequest),
    /// Aggregate flow statistics
    Aggregate(FlowStatsRequest),
    /// Flow table statistics
    Table,
    /// Physical port statistics
    Port(PortStatsRequest),
    /// Queue statistics
    Queue(QueueStatsRequest),
}

impl StatsRequestBody {
    /// Subtype code of this variant
    #[must_use]
    pub const fn stats_type(&self) -> StatsType {
        match self {
            Self::Desc => StatsType::Desc,
            Self::Flow(_) => StatsType::Flow,
            Self::Aggregate(_) => StatsType::Aggregate,
            Self::Table => StatsType::Table,
            Self::Port(_) => StatsType::Port,
            Self::Queue(_) => StatsType::Queue,
        }
    }
}

impl StatsRequest {
    /// Decode the bytes following the header as a `stats_type` request
    ///
    /// # Errors
    ///
    /// - `TruncatedSubHeader` if the secondary header is missing
    /// - `SubtypeMismatch` if the body carries another stats type
    /// - `TruncatedBody` if the subtype's fixed body is incomplete
    pub fn decode(stats_type: StatsType, body: &[u8]) -> Result<Self> {
        const MSG: MsgType = MsgType::StatsRequest;

        let (flags, mut body) = read_stats_header(MSG, stats_type, body)?;

        let body = match stats_type {
            StatsType::Desc => StatsRequestBody::Desc,
            StatsType::Table => StatsRequestBody::Table,
            StatsType::Flow => StatsRequestBody::Flow(FlowStatsRequest::decode(MSG, body)?),
            StatsType::Aggregate => StatsRequestBody::Aggregate(FlowStatsRequest::decode(MSG, body)?),
            StatsType::Port => {
                require(MSG, body, PortStatsRequest::SIZE)?;
                let port_no = body.get_u16();
                StatsRequestBody::Port(PortStatsRequest { port_no })
            },
            StatsType::Queue => {
                require(MSG, body, QueueStatsRequest::SIZE)?;
                let port_no = body.get_u16();
                body.advance(2);
                let queue_id = body.get_u32();
                StatsRequestBody::Queue(QueueStatsRequest { port_no, queue_id })
            },
        };

        Ok(Self { flags, body })
    }
}

/// Body of a flow or aggregate statistics request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowStatsRequest {
    /// Fields to match
    pub flow_match: WireMatch,
    /// Table to read, `0xff` for all tables
    pub table_id: u8,
    /// Require matching entries to include this output port
    pub out_port: u16,
}

impl FlowStatsRequest {
    /// Size on the wire (44 bytes)
    pub const SIZE: usize = WireMatch::SIZE + 4;

    fn decode(msg_type: MsgType, mut body: &[u8]) -> Result<Self> {
        require(msg_type, body, Self::SIZE)?;

        let flow_match = WireMatch::read(&mut body);
        let table_id = body.get_u8();
        body.advance(1);
        let out_port = body.get_u16();

        Ok(Self { flow_match, table_id, out_port })
    }
}

/// Body of a port statistics request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortStatsRequest {
    /// Port to read, `OFPP_NONE` for all ports
    pub port_no: u16,
}

impl PortStatsRequest {
    /// Size on the wire (8 bytes)
    pub const SIZE: usize = 8;
}

/// Body of a queue statistics request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueStatsRequest {
    /// Port to read, `OFPP_ALL` for all ports
    pub port_no: u16,
    /// Queue to read, `OFPQ_ALL` for all queues
    pub queue_id: u32,
}

impl QueueStatsRequest {
    /// Size on the wire (8 bytes)
    pub const SIZE: usize = 8;
}

/// Statistics reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsReply {
    /// Reply flags; `REPLY_MORE` means more replies follow
    pub flags: StatsReplyFlags,
    /// Subtype-specific body
    pub body: StatsReplyBody,
}

/// Body of a statistics reply, one variant per [`StatsType`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatsReplyBody {
    /// Switch description
    Desc(DescStats),
    /// One entry per matching flow
    Flow(Vec<FlowStats>),
    /// Totals over all matching flows
    Aggregate(AggregateStats),
    /// One entry per table
    Table(Vec<TableStats>),
    /// One entry per port
    Port(Vec<PortStats>),
    /// One entry per queue
    Queue(Vec<QueueStats>),
}

impl StatsReplyBody {
    /// Subtype code of this variant
    #[must_use]
    pub const fn stats_type(&self) -> StatsType {
        match self {
            Self::Desc(_) => StatsType::Desc,
            Self::Flow(_) => StatsType::Flow,
            Self::Aggregate(_) => StatsType::Aggregate,
            Self::Table(_) => StatsType::Table,
            Self::Port(_) => StatsType::Port,
            Self::Queue(_) => StatsType::Queue,
        }
    }
}

impl StatsReply {
    /// Decode the bytes following the header as a `stats_type` reply
    ///
    /// # Errors
    ///
    /// - `TruncatedSubHeader` if the secondary header is missing
    /// - `SubtypeMismatch` if the body carries another stats type
    /// - `TruncatedBody` if the body or one of its entries is incomplete
    pub fn decode(stats_type: StatsType, body: &[u8]) -> Result<Self> {
        const MSG: MsgType = MsgType::StatsReply;

        let (flags, body) = read_stats_header(MSG, stats_type, body)?;

        let body = match stats_type {
            StatsType::Desc => StatsReplyBody::Desc(DescStats::decode(body)?),
            StatsType::Flow => StatsReplyBody::Flow(FlowStats::decode_list(body)?),
            StatsType::Aggregate => StatsReplyBody::Aggregate(AggregateStats::decode(body)?),
            StatsType::Table => StatsReplyBody::Table(read_entries(MSG, body, TableStats::SIZE, TableStats::read)?),
            StatsType::Port => StatsReplyBody::Port(read_entries(MSG, body, PortStats::SIZE, PortStats::read)?),
            StatsType::Queue => StatsReplyBody::Queue(read_entries(MSG, body, QueueStats::SIZE, QueueStats::read)?),
        };

        Ok(Self { flags: StatsReplyFlags::from_bits_retain(flags), body })
    }
}

/// Switch description (`ofp_desc_stats`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescStats {
    /// Manufacturer description
    pub mfr_desc: String,
    /// Hardware description
    pub hw_desc: String,
    /// Software description
    pub sw_desc: String,
    /// Serial number
    pub serial_num: String,
    /// Human readable datapath description
    pub dp_desc: String,
}

impl DescStats {
    /// Size on the wire (1056 bytes)
    pub const SIZE: usize = 4 * Self::DESC_LEN + Self::SERIAL_LEN;

    const DESC_LEN: usize = 256;
    const SERIAL_LEN: usize = 32;

    fn decode(mut body: &[u8]) -> Result<Self> {
        require(MsgType::StatsReply, body, Self::SIZE)?;

        Ok(Self {
            mfr_desc: read_fixed_str(&mut body, Self::DESC_LEN),
            hw_desc: read_fixed_str(&mut body, Self::DESC_LEN),
            sw_desc: read_fixed_str(&mut body, Self::DESC_LEN),
            serial_num: read_fixed_str(&mut body, Self::SERIAL_LEN),
            dp_desc: read_fixed_str(&mut body, Self::DESC_LEN),
        })
    }
}

/// Statistics of one flow entry (`ofp_flow_stats`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowStats {
    /// Table the flow lives in
    pub table_id: u8,
    /// Description of the entry
    pub flow_match: WireMatch,
    /// Time the flow has been alive, seconds part
    pub duration_sec: u32,
    /// Time alive beyond `duration_sec`, in nanoseconds
    pub duration_nsec: u32,
    /// Priority of the entry
    pub priority: u16,
    /// Seconds idle before expiration
    pub idle_timeout: u16,
    /// Seconds before expiration
    pub hard_timeout: u16,
    /// Opaque controller-issued identifier
    pub cookie: u64,
    /// Packets matched
    pub packet_count: u64,
    /// Bytes matched
    pub byte_count: u64,
    /// Raw action list
    pub actions: Bytes,
}

impl FlowStats {
    /// Size of an entry without actions (88 bytes)
    pub const FIXED_LEN: usize = WireMatch::SIZE + 48;

    /// Each entry announces its own length, actions included.
    fn decode_list(mut body: &[u8]) -> Result<Vec<Self>> {
        let mut entries = Vec::new();

        while !body.is_empty() {
            require(MsgType::StatsReply, body, Self::FIXED_LEN)?;

            let length = usize::from(u16::from_be_bytes([body[0], body[1]]));
            if length < Self::FIXED_LEN || length > body.len() {
                return Err(DecodeError::TruncatedBody {
                    msg_type: MsgType::StatsReply,
                    expected: length.max(Self::FIXED_LEN),
                    actual: body.len(),
                });
            }

            let (mut entry, tail) = body.split_at(length);
            body = tail;

            entry.advance(2);
            let table_id = entry.get_u8();
            entry.advance(1);
            let flow_match = WireMatch::read(&mut entry);
            let duration_sec = entry.get_u32();
            let duration_nsec = entry.get_u32();
            let priority = entry.get_u16();
            let idle_timeout = entry.get_u16();
            let hard_timeout = entry.get_u16();
            entry.advance(6);
            let cookie = entry.get_u64();
            let packet_count = entry.get_u64();
            let byte_count = entry.get_u64();

            entries.push(Self {
                table_id,
                flow_match,
                duration_sec,
                duration_nsec,
                priority,
                idle_timeout,
                hard_timeout,
                cookie,
                packet_count,
                byte_count,
                actions: rest(entry),
            });
        }

        Ok(entries)
    }
}

/// Totals over all matching flows (`ofp_aggregate_stats_reply`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateStats {
    /// Packets in matching flows
    pub packet_count: u64,
    /// Bytes in matching flows
    pub byte_count: u64,
    /// Number of matching flows
    pub flow_count: u32,
}

impl AggregateStats {
    /// Size on the wire (24 bytes)
    pub const SIZE: usize = 24;

    fn decode(mut body: &[u8]) -> Result<Self> {
        require(MsgType::StatsReply, body, Self::SIZE)?;
        Ok(Self { packet_count: body.get_u64(), byte_count: body.get_u64(), flow_count: body.get_u32() })
    }
}

/// Statistics of one flow table (`ofp_table_stats`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableStats {
    /// Table identifier
    pub table_id: u8,
    /// Table name
    pub name: String,
    /// Raw `OFPFW_*` bitmask of fields the table supports wildcarding
    pub wildcards: u32,
    /// Max number of entries supported
    pub max_entries: u32,
    /// Number of active entries
    pub active_count: u32,
    /// Packets looked up in the table
    pub lookup_count: u64,
    /// Packets that hit the table
    pub matched_count: u64,
}

impl TableStats {
    /// Size on the wire (64 bytes)
    pub const SIZE: usize = 64;

    const NAME_LEN: usize = 32;

    fn read(buf: &mut &[u8]) -> Self {
        let table_id = buf.get_u8();
        buf.advance(3);
        let name = read_fixed_str(buf, Self::NAME_LEN);

        Self {
            table_id,
            name,
            wildcards: buf.get_u32(),
            max_entries: buf.get_u32(),
            active_count: buf.get_u32(),
            lookup_count: buf.get_u64(),
            matched_count: buf.get_u64(),
        }
    }
}

/// Counters of one physical port (`ofp_port_stats`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PortStats {
    /// Port number
    pub port_no: u16,
    /// Received packets
    pub rx_packets: u64,
    /// Transmitted packets
    pub tx_packets: u64,
    /// Received bytes
    pub rx_bytes: u64,
    /// Transmitted bytes
    pub tx_bytes: u64,
    /// Packets dropped by RX
    pub rx_dropped: u64,
    /// Packets dropped by TX
    pub tx_dropped: u64,
    /// Receive errors
    pub rx_errors: u64,
    /// Transmit errors
    pub tx_errors: u64,
    /// Frame alignment errors
    pub rx_frame_err: u64,
    /// Packets with RX overrun
    pub rx_over_err: u64,
    /// CRC errors
    pub rx_crc_err: u64,
    /// Collisions
    pub collisions: u64,
}

impl PortStats {
    /// Size on the wire (104 bytes)
    pub const SIZE: usize = 104;

    fn read(buf: &mut &[u8]) -> Self {
        let port_no = buf.get_u16();
        buf.advance(6);

        Self {
            port_no,
            rx_packets: buf.get_u64(),
            tx_packets: buf.get_u64(),
            rx_bytes: buf.get_u64(),
            tx_bytes: buf.get_u64(),
            rx_dropped: buf.get_u64(),
            tx_dropped: buf.get_u64(),
            rx_errors: buf.get_u64(),
            tx_errors: buf.get_u64(),
            rx_frame_err: buf.get_u64(),
            rx_over_err: buf.get_u64(),
            rx_crc_err: buf.get_u64(),
            collisions: buf.get_u64(),
        }
    }
}

/// Counters of one port queue (`ofp_queue_stats`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueStats {
    /// Port the queue belongs to
    pub port_no: u16,
    /// Queue identifier
    pub queue_id: u32,
    /// Transmitted bytes
    pub tx_bytes: u64,
    /// Transmitted packets
    pub tx_packets: u64,
    /// Packets dropped due to overrun
    pub tx_errors: u64,
}

impl QueueStats {
    /// Size on the wire (32 bytes)
    pub const SIZE: usize = 32;

    fn read(buf: &mut &[u8]) -> Self {
        let port_no = buf.get_u16();
        buf.advance(2);

        Self {
            port_no,
            queue_id: buf.get_u32(),
            tx_bytes: buf.get_u64(),
            tx_packets: buf.get_u64(),
            tx_errors: buf.get_u64(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats_body(stats_type: StatsType, flags: u16, payload: &[u8]) -> Vec<u8> {
        let mut body = stats_type.to_u16().to_be_bytes().to_vec();
        body.extend_from_slice(&flags.to_be_bytes());
        body.extend_from_slice(payload);
        body
    }

    #[test]
    fn desc_request_has_no_body() {
        let body = stats_body(StatsType::Desc, 0, &[]);
        let request = StatsRequest::decode(StatsType::Desc, &body).unwrap();
        assert_eq!(request.body, StatsRequestBody::Desc);
        assert_eq!(request.body.stats_type(), StatsType::Desc);
    }

    #[test]
    fn queue_request_fields() {
        let body = stats_body(StatsType::Queue, 0, &hex::decode("fffc0000ffffffff").unwrap());
        let request = StatsRequest::decode(StatsType::Queue, &body).unwrap();
        assert_eq!(request.body, StatsRequestBody::Queue(QueueStatsRequest { port_no: 0xfffc, queue_id: 0xffff_ffff }));
    }

    #[test]
    fn subtype_mismatch() {
        let body = stats_body(StatsType::Table, 0, &[]);
        assert_eq!(
            StatsRequest::decode(StatsType::Desc, &body),
            Err(DecodeError::SubtypeMismatch { msg_type: MsgType::StatsRequest, expected: 0, actual: 3 })
        );
    }

    #[test]
    fn missing_sub_header() {
        assert_eq!(
            StatsReply::decode(StatsType::Desc, &[0x00]),
            Err(DecodeError::TruncatedSubHeader { msg_type: MsgType::StatsReply, expected: 12, actual: 9 })
        );
    }

    #[test]
    fn desc_reply_strings() {
        let mut payload = vec![0u8; DescStats::SIZE];
        payload[..4].copy_from_slice(b"Acme");
        payload[3 * 256..3 * 256 + 3].copy_from_slice(b"SN1");
        let body = stats_body(StatsType::Desc, 0, &payload);

        let reply = StatsReply::decode(StatsType::Desc, &body).unwrap();
        let StatsReplyBody::Desc(desc) = reply.body else { panic!("expected desc body") };
        assert_eq!(desc.mfr_desc, "Acme");
        assert_eq!(desc.serial_num, "SN1");
        assert!(desc.dp_desc.is_empty());
    }

    #[test]
    fn port_reply_lists_entries_and_flags() {
        let mut payload = Vec::new();
        for port_no in [1u16, 2] {
            let mut entry = vec![0u8; PortStats::SIZE];
            entry[..2].copy_from_slice(&port_no.to_be_bytes());
            entry[8..16].copy_from_slice(&100u64.to_be_bytes()); // rx_packets
            payload.extend_from_slice(&entry);
        }
        let body = stats_body(StatsType::Port, 1, &payload);

        let reply = StatsReply::decode(StatsType::Port, &body).unwrap();
        assert!(reply.flags.contains(StatsReplyFlags::REPLY_MORE));
        let StatsReplyBody::Port(ports) = reply.body else { panic!("expected port body") };
        assert_eq!(ports.iter().map(|p| p.port_no).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(ports[1].rx_packets, 100);
    }

    #[test]
    fn partial_entry_is_truncated() {
        let body = stats_body(StatsType::Queue, 0, &[0u8; QueueStats::SIZE + 5]);
        assert_eq!(
            StatsReply::decode(StatsType::Queue, &body),
            Err(DecodeError::TruncatedBody { msg_type: MsgType::StatsReply, expected: 32, actual: 5 })
        );
    }

    #[test]
    fn flow_reply_uses_entry_length() {
        let mut entry = vec![0u8; FlowStats::FIXED_LEN];
        entry[..2].copy_from_slice(&96u16.to_be_bytes());
        entry[2] = 0; // table_id
        entry.extend_from_slice(&hex::decode("0000000800020000").unwrap()); // output action
        let body = stats_body(StatsType::Flow, 0, &entry);

        let reply = StatsReply::decode(StatsType::Flow, &body).unwrap();
        let StatsReplyBody::Flow(flows) = reply.body else { panic!("expected flow body") };
        assert_eq!(flows.len(), 1);
        assert_eq!(flows[0].actions.len(), 8);
    }

    #[test]
    fn flow_reply_rejects_short_entry_length() {
        let mut entry = vec![0u8; FlowStats::FIXED_LEN];
        entry[..2].copy_from_slice(&4u16.to_be_bytes());
        let body = stats_body(StatsType::Flow, 0, &entry);

        assert_eq!(
            StatsReply::decode(StatsType::Flow, &body),
            Err(DecodeError::TruncatedBody { msg_type: MsgType::StatsReply, expected: 88, actual: 88 })
        );
    }
}
