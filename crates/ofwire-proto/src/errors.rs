//! Error types for OpenFlow message decoding.
//!
//! All errors are structured so callers can branch on the kind of failure
//! (log it, drop the message, or answer with a protocol error) instead of
//! matching on strings.

use thiserror::Error;

use crate::MsgType;

/// Failures produced while dispatching or decoding a message buffer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    // Header errors
    /// Buffer is shorter than the fixed header
    #[error("truncated header: expected at least {expected} bytes, got {actual}")]
    TruncatedHeader {
        /// Header size in bytes
        expected: usize,
        /// Bytes actually available
        actual: usize,
    },

    /// Header `length` is smaller than the header or larger than the buffer
    #[error("invalid length: header claims {length} bytes, buffer holds {actual}")]
    InvalidLength {
        /// Length claimed by the header
        length: u16,
        /// Bytes actually available
        actual: usize,
    },

    /// Version does not match the one pinned by the decoder configuration
    #[error("unsupported protocol version: {0:#04x}")]
    UnsupportedVersion(u8),

    // Dispatch errors
    /// A stats or error message is too short to hold its secondary header
    #[error("truncated {msg_type:?} sub-header: expected {expected} bytes, got {actual}")]
    TruncatedSubHeader {
        /// Container type being sub-dispatched
        msg_type: MsgType,
        /// Bytes needed for primary plus secondary header
        expected: usize,
        /// Bytes actually available
        actual: usize,
    },

    /// Header carries a type code with no first-level table entry
    #[error("unknown message type: {0}")]
    UnknownMessageType(u8),

    /// Error message carries a subtype with no second-level table entry
    #[error("unknown {msg_type:?} subtype: {subtype:#06x}")]
    UnknownSubtype {
        /// Container type being sub-dispatched
        msg_type: MsgType,
        /// Unregistered subtype code
        subtype: u16,
    },

    // Per-type decoder errors
    /// Message body is shorter than the fixed layout of its type
    #[error("truncated {msg_type:?} body: expected {expected} bytes, got {actual}")]
    TruncatedBody {
        /// Type whose body was being decoded
        msg_type: MsgType,
        /// Bytes required by the fixed layout
        expected: usize,
        /// Bytes actually available
        actual: usize,
    },

    /// A decoder was handed a buffer whose header names another type
    #[error("type mismatch: decoder for {expected:?} got type code {actual}")]
    TypeMismatch {
        /// Type the decoder handles
        expected: MsgType,
        /// Type code found in the header
        actual: u8,
    },

    /// A second-level decoder was handed a buffer of another subtype
    #[error("subtype mismatch in {msg_type:?}: expected {expected:#06x}, got {actual:#06x}")]
    SubtypeMismatch {
        /// Container type being decoded
        msg_type: MsgType,
        /// Subtype the decoder handles
        expected: u16,
        /// Subtype found in the secondary header
        actual: u16,
    },
}

/// Convenient Result type alias for decoding operations
pub type Result<T> = std::result::Result<T, DecodeError>;
