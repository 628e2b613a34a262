//! Message decoder: header validation followed by two-level dispatch.

use tracing::{debug, trace};

use crate::{
    Header, OFP_VERSION,
    dispatch::{DispatchTable, Route, STANDARD_TABLE},
    errors::{DecodeError, Result},
    messages::Message,
    msg_type::MsgType,
};

/// Size of the primary header plus a family's `{subtype, flags/code}` header
pub const SUB_HEADER_END: usize = Header::SIZE + 4;

/// Decoder configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecoderConfig {
    /// Reject headers whose version differs from this one; `None` accepts
    /// any version
    pub expected_version: Option<u8>,
}

impl DecoderConfig {
    /// Accept OpenFlow 1.0 (`0x01`) headers only
    #[must_use]
    pub const fn strict() -> Self {
        Self { expected_version: Some(OFP_VERSION) }
    }
}

/// Outcome of a successful dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// The buffer decoded to exactly one message variant
    Message(Message),
    /// A stats message whose subtype has no registered decoder
    Unrecognized {
        /// Stats request or reply
        msg_type: MsgType,
        /// Subtype found in the secondary header
        subtype: u16,
    },
}

impl Decoded {
    /// The decoded message, if any
    #[must_use]
    pub fn message(self) -> Option<Message> {
        match self {
            Self::Message(message) => Some(message),
            Self::Unrecognized { .. } => None,
        }
    }
}

/// Classifies complete message buffers into decoded messages
///
/// A decoder holds no mutable state; one instance can serve any number of
/// threads.
#[derive(Debug, Clone, Copy)]
pub struct Decoder {
    config: DecoderConfig,
    table: &'static DispatchTable,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new(DecoderConfig::default())
    }
}

impl Decoder {
    /// Create a decoder using [`DispatchTable::STANDARD`]
    #[must_use]
    pub fn new(config: DecoderConfig) -> Self {
        Self::with_table(config, &STANDARD_TABLE)
    }

    /// Create a decoder using a caller-built table
    #[must_use]
    pub fn with_table(config: DecoderConfig, table: &'static DispatchTable) -> Self {
        Self { config, table }
    }

    /// Decode one complete message
    ///
    /// The header is validated, the type (and for stats and error messages
    /// the subtype) is looked up, and the resolved decoder is handed the
    /// whole buffer. Bytes past the header's `length` are ignored.
    ///
    /// A stats request or reply with an unregistered subtype is not an
    /// error: it yields [`Decoded::Unrecognized`].
    ///
    /// # Errors
    ///
    /// - [`DecodeError::TruncatedHeader`] if the buffer holds fewer than 8
    ///   bytes
    /// - [`DecodeError::InvalidLength`] if `length` is below 8 or beyond the
    ///   buffer
    /// - [`DecodeError::UnsupportedVersion`] if a version is pinned and the
    ///   header carries another one
    /// - [`DecodeError::UnknownMessageType`] if the type has no route
    /// - [`DecodeError::TruncatedSubHeader`] if a stats or error message
    ///   ends before its secondary header
    /// - [`DecodeError::UnknownSubtype`] if an error message carries an
    ///   unregistered error type
    /// - Any error returned by the per-type decoder
    pub fn decode(&self, buf: &[u8]) -> Result<Decoded> {
        let header = self.checked_header(buf)?;
        header.validate_length(buf.len())?;

        if self.config.expected_version.is_some_and(|expected| expected != header.version()) {
            return Err(DecodeError::UnsupportedVersion(header.version()));
        }

        let route = self
            .table
            .route(header.type_code())
            .ok_or(DecodeError::UnknownMessageType(header.type_code()))?;

        let decoder = match route {
            Route::Leaf(decoder) => decoder,
            Route::Family(family) => {
                let msg_type = family.msg_type();
                let length = usize::from(header.length());
                if length < SUB_HEADER_END {
                    return Err(DecodeError::TruncatedSubHeader {
                        msg_type,
                        expected: SUB_HEADER_END,
                        actual: length,
                    });
                }

                let subtype = u16::from_be_bytes([buf[Header::SIZE], buf[Header::SIZE + 1]]);
                match self.table.subtype(family, subtype) {
                    Some(decoder) => decoder,
                    None if family.unknown_subtype_is_soft() => {
                        debug!(?msg_type, subtype, xid = header.xid(), "unrecognized stats subtype");
                        return Ok(Decoded::Unrecognized { msg_type, subtype });
                    },
                    None => return Err(DecodeError::UnknownSubtype { msg_type, subtype }),
                }
            },
        };

        let message = decoder(buf)?;
        trace!(msg_type = ?message.msg_type(), xid = message.xid(), length = header.length(), "decoded message");

        Ok(Decoded::Message(message))
    }

    /// Parse only the header, without table lookup or body decoding
    ///
    /// No field is validated: the header comes back exactly as it sits on
    /// the wire, even when its `length` is smaller than the header itself or
    /// larger than the buffer.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::TruncatedHeader`] if the buffer holds fewer
    /// than 8 bytes.
    pub fn decode_header_only(&self, buf: &[u8]) -> Result<Header> {
        Ok(*Header::from_bytes(buf)?)
    }

    /// Total size of the message starting at `buf`, from its header
    ///
    /// A stream reader uses this to know how many bytes to collect before
    /// calling [`Decoder::decode`]. The `length` field is checked against the
    /// header size but not against the buffer.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::TruncatedHeader`] if the buffer holds fewer than 8
    ///   bytes
    /// - [`DecodeError::InvalidLength`] if `length` is below 8
    pub fn frame_len(&self, buf: &[u8]) -> Result<usize> {
        self.checked_header(buf).map(|header| usize::from(header.length()))
    }

    fn checked_header(&self, buf: &[u8]) -> Result<Header> {
        let header = *Header::from_bytes(buf)?;
        if usize::from(header.length()) < Header::SIZE {
            return Err(DecodeError::InvalidLength { length: header.length(), actual: buf.len() });
        }
        Ok(header)
    }
}

/// Decode one complete message with the default decoder
///
/// # Errors
///
/// See [`Decoder::decode`].
pub fn decode(buf: &[u8]) -> Result<Decoded> {
    Decoder::default().decode(buf)
}

/// Parse only the header of a message with the default decoder
///
/// # Errors
///
/// See [`Decoder::decode_header_only`].
pub fn decode_header_only(buf: &[u8]) -> Result<Header> {
    Decoder::default().decode_header_only(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::Body;

    fn message(msg_type: MsgType, xid: u32, body: &[u8]) -> Vec<u8> {
        let length = u16::try_from(Header::SIZE + body.len()).unwrap();
        let mut wire = Header::new(msg_type, length, xid).to_bytes().to_vec();
        wire.extend_from_slice(body);
        wire
    }

    #[test]
    fn decodes_hello() {
        let wire = message(MsgType::Hello, 42, &[]);
        let decoded = decode(&wire).unwrap();
        let message = decoded.message().unwrap();
        assert_eq!(message.xid(), 42);
        assert_eq!(message.msg_type(), MsgType::Hello);
    }

    #[test]
    fn strict_config_pins_version() {
        let mut wire = message(MsgType::EchoRequest, 1, &[]);
        wire[0] = 0x04;

        assert!(Decoder::default().decode(&wire).is_ok());
        assert_eq!(Decoder::new(DecoderConfig::strict()).decode(&wire), Err(DecodeError::UnsupportedVersion(0x04)));
    }

    #[test]
    fn length_must_cover_header() {
        let mut wire = message(MsgType::Hello, 1, &[]);
        wire[3] = 4;
        assert_eq!(decode(&wire), Err(DecodeError::InvalidLength { length: 4, actual: 8 }));
        assert_eq!(Decoder::default().frame_len(&wire), Err(DecodeError::InvalidLength { length: 4, actual: 8 }));

        // header-only parsing reports the field as found
        let header = decode_header_only(&wire).unwrap();
        assert_eq!(header.length(), 4);
        assert_eq!(header.msg_type(), Some(MsgType::Hello));
    }

    #[test]
    fn length_must_fit_buffer() {
        let mut wire = message(MsgType::Hello, 1, &[]);
        wire[3] = 16;
        assert_eq!(decode(&wire), Err(DecodeError::InvalidLength { length: 16, actual: 8 }));

        // header-only parsing does not need the body
        assert_eq!(decode_header_only(&wire).unwrap().length(), 16);
        assert_eq!(Decoder::default().frame_len(&wire), Ok(16));
    }

    #[test]
    fn family_needs_sub_header() {
        let wire = message(MsgType::Error, 1, &[0x00]);
        assert_eq!(
            decode(&wire),
            Err(DecodeError::TruncatedSubHeader { msg_type: MsgType::Error, expected: 12, actual: 9 })
        );
    }

    #[test]
    fn barrier_reply_body() {
        let wire = message(MsgType::BarrierReply, 9, &[]);
        let message = decode(&wire).unwrap().message().unwrap();
        assert_eq!(message.body, Body::BarrierReply);
    }
}
