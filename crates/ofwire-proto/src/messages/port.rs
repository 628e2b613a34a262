//! Physical port description (`ofp_phy_port`).

use bytes::Buf;

use super::{read_fixed_str, read_mac};
use crate::flags::{PortConfig, PortFeatures};

/// Description of a physical switch port
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhyPort {
    /// Port number
    pub port_no: u16,
    /// Hardware address
    pub hw_addr: [u8; 6],
    /// Interface name, NUL padding stripped
    pub name: String,
    /// Administrative configuration
    pub config: PortConfig,
    /// Raw `OFPPS_*` state (link down bit plus STP state)
    pub state: u32,
    /// Current features
    pub curr: PortFeatures,
    /// Features being advertised by the port
    pub advertised: PortFeatures,
    /// Features supported by the port
    pub supported: PortFeatures,
    /// Features advertised by the peer
    pub peer: PortFeatures,
}

impl PhyPort {
    /// Size of a serialized port description (48 bytes)
    pub const SIZE: usize = 48;

    const NAME_LEN: usize = 16;

    pub(crate) fn read(buf: &mut &[u8]) -> Self {
        let port_no = buf.get_u16();
        let hw_addr = read_mac(buf);
        let name = read_fixed_str(buf, Self::NAME_LEN);

        Self {
            port_no,
            hw_addr,
            name,
            config: PortConfig::from_bits_retain(buf.get_u32()),
            state: buf.get_u32(),
            curr: PortFeatures::from_bits_retain(buf.get_u32()),
            advertised: PortFeatures::from_bits_retain(buf.get_u32()),
            supported: PortFeatures::from_bits_retain(buf.get_u32()),
            peer: PortFeatures::from_bits_retain(buf.get_u32()),
        }
    }
}
