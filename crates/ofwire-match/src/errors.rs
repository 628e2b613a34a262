//! Error types for flow-match synthesis.

use thiserror::Error;

/// Failures produced while classifying a frame or building a match from it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SynthesisError {
    /// Requested framing is not link-layer (Ethernet) framing
    #[error("unsupported frame format {0:?}: only L2 frames can be synthesized")]
    UnsupportedFrameFormat(String),

    /// The frame is too short for its mandatory Ethernet header
    #[error("frame classification failed: Ethernet header needs {expected} bytes, frame has {actual}")]
    FrameClassification {
        /// Ethernet header size in bytes
        expected: usize,
        /// Bytes actually available
        actual: usize,
    },
}

/// Text that is not a colon-separated MAC address
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid MAC address: {0:?}")]
pub struct ParseMacError(pub String);

/// Convenient Result type alias for synthesis operations
pub type Result<T> = std::result::Result<T, SynthesisError>;
