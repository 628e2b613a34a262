//! Symmetric messages: hello, echo and vendor.

use bytes::{Buf, Bytes};

use super::{require, rest};
use crate::{MsgType, errors::Result};

/// Version negotiation
///
/// OpenFlow 1.0 defines no hello body; any bytes a newer peer appends are
/// kept so the caller can inspect them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Hello {
    /// Trailing bytes after the header
    pub elements: Bytes,
}

impl Hello {
    /// Decode the bytes following the header
    #[must_use]
    pub fn decode(body: &[u8]) -> Self {
        Self { elements: rest(body) }
    }
}

/// Echo request or reply payload
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Echo {
    /// Arbitrary payload, echoed back verbatim by the peer
    pub data: Bytes,
}

impl Echo {
    /// Decode the bytes following the header
    #[must_use]
    pub fn decode(body: &[u8]) -> Self {
        Self { data: rest(body) }
    }
}

/// Vendor extension message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vendor {
    /// Vendor id (OUI in the low 24 bits, or an experimenter id)
    pub vendor: u32,
    /// Vendor-defined payload
    pub data: Bytes,
}

impl Vendor {
    const FIXED_LEN: usize = 4;

    /// Decode the bytes following the header
    ///
    /// # Errors
    ///
    /// Returns `TruncatedBody` if the vendor id is missing.
    pub fn decode(mut body: &[u8]) -> Result<Self> {
        require(MsgType::Vendor, body, Self::FIXED_LEN)?;
        let vendor = body.get_u32();
        Ok(Self { vendor, data: rest(body) })
    }
}
