//! Fixed message header with zero-copy parsing.
//!
//! Every OpenFlow message starts with the same 8-byte header (Big Endian):
//!
//! ```text
//! 0        1        2                 4                                  8
//! +--------+--------+--------+--------+--------+--------+--------+--------+
//! | version|  type  |     length      |               xid                 |
//! +--------+--------+--------+--------+--------+--------+--------+--------+
//! ```
//!
//! `length` covers the whole message, header included.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::{
    MsgType,
    errors::{DecodeError, Result},
};

/// Wire version of OpenFlow 1.0
pub const OFP_VERSION: u8 = 0x01;

/// Fixed 8-byte message header (Big Endian network byte order)
///
/// Multi-byte fields are stored as raw byte arrays so the struct has no
/// alignment requirement and every 8-byte pattern is a valid value. A
/// reference can therefore be cast straight from an untrusted buffer.
#[repr(C)]
#[derive(Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct Header {
    version: u8,
    msg_type: u8,
    length: [u8; 2],
    xid: [u8; 4],
}

impl Header {
    /// Size of the serialized header (8 bytes)
    pub const SIZE: usize = 8;

    /// Create an OpenFlow 1.0 header.
    #[must_use]
    pub fn new(msg_type: MsgType, length: u16, xid: u32) -> Self {
        Self {
            version: OFP_VERSION,
            msg_type: msg_type.to_u8(),
            length: length.to_be_bytes(),
            xid: xid.to_be_bytes(),
        }
    }

    /// Parse the header prefix of a buffer (zero-copy).
    ///
    /// Only the buffer size is checked here; the `length` field is left for
    /// [`Header::validate_length`] so routing code can read a header before
    /// the rest of the message has arrived.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::TruncatedHeader`] if the buffer holds fewer than
    /// [`Header::SIZE`] bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<&Self> {
        Self::ref_from_prefix(bytes)
            .map(|(header, _)| header)
            .map_err(|_| DecodeError::TruncatedHeader { expected: Self::SIZE, actual: bytes.len() })
    }

    /// Check the `length` field against the size of the buffer that holds
    /// the message.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::InvalidLength`] if `length` is smaller than the
    /// header itself or larger than `available`.
    pub fn validate_length(&self, available: usize) -> Result<()> {
        let length = self.length();
        if usize::from(length) < Self::SIZE || usize::from(length) > available {
            return Err(DecodeError::InvalidLength { length, actual: available });
        }
        Ok(())
    }

    /// Serialize header to bytes
    #[must_use]
    #[allow(clippy::wrong_self_convention)]
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut arr = [0u8; Self::SIZE];
        arr.copy_from_slice(self.as_bytes());
        arr
    }

    /// Get the protocol version
    #[must_use]
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Get the raw type code
    #[must_use]
    pub fn type_code(&self) -> u8 {
        self.msg_type
    }

    /// Get the type as an enum (if declared)
    #[must_use]
    pub fn msg_type(&self) -> Option<MsgType> {
        MsgType::from_u8(self.msg_type)
    }

    /// Get the total message length, header included
    #[must_use]
    pub fn length(&self) -> u16 {
        u16::from_be_bytes(self.length)
    }

    /// Get the transaction id
    #[must_use]
    pub fn xid(&self) -> u32 {
        u32::from_be_bytes(self.xid)
    }
}

impl std::fmt::Debug for Header {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Header")
            .field("version", &format!("{:#04x}", self.version()))
            .field("type", &self.msg_type().map_or_else(|| self.type_code().to_string(), |t| format!("{t:?}")))
            .field("length", &self.length())
            .field("xid", &self.xid())
            .finish()
    }
}

impl PartialEq for Header {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for Header {}
