//! Error messages (`ofp_error_msg`).
//!
//! The body starts with a 4-byte secondary header `{type: u16, code: u16}`;
//! `type` selects the [`ErrorType`] family and `code` its meaning within that
//! family. The rest is the offending request, usually truncated to 64 bytes.

use bytes::{Buf, Bytes};

use super::rest;
use crate::{
    ErrorType, Header, MsgType,
    errors::{DecodeError, Result},
};

/// Size of the `{type, code}` secondary header
pub const ERROR_HEADER_LEN: usize = 4;

/// Code and data shared by every error family
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorBody {
    /// Family-specific code (`OFPHFC_*`, `OFPBRC_*`, ...)
    pub code: u16,
    /// Leading bytes of the request that caused the error
    pub data: Bytes,
}

/// Error notification, one variant per [`ErrorType`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorMessage {
    /// Hello protocol failed
    HelloFailed(ErrorBody),
    /// Request was not understood
    BadRequest(ErrorBody),
    /// Error in an action description
    BadAction(ErrorBody),
    /// Problem modifying a flow entry
    FlowModFailed(ErrorBody),
    /// Port mod request failed
    PortModFailed(ErrorBody),
    /// Queue operation failed
    QueueOpFailed(ErrorBody),
}

impl ErrorMessage {
    /// Decode the bytes following the header as an `error_type` error
    ///
    /// # Errors
    ///
    /// - `TruncatedSubHeader` if the secondary header is missing
    /// - `SubtypeMismatch` if the body carries another error type
    pub fn decode(error_type: ErrorType, mut body: &[u8]) -> Result<Self> {
        if body.len() < ERROR_HEADER_LEN {
            return Err(DecodeError::TruncatedSubHeader {
                msg_type: MsgType::Error,
                expected: Header::SIZE + ERROR_HEADER_LEN,
                actual: Header::SIZE + body.len(),
            });
        }

        let subtype = body.get_u16();
        if subtype != error_type.to_u16() {
            return Err(DecodeError::SubtypeMismatch {
                msg_type: MsgType::Error,
                expected: error_type.to_u16(),
                actual: subtype,
            });
        }
        let code = body.get_u16();
        let inner = ErrorBody { code, data: rest(body) };

        Ok(match error_type {
            ErrorType::HelloFailed => Self::HelloFailed(inner),
            ErrorType::BadRequest => Self::BadRequest(inner),
            ErrorType::BadAction => Self::BadAction(inner),
            ErrorType::FlowModFailed => Self::FlowModFailed(inner),
            ErrorType::PortModFailed => Self::PortModFailed(inner),
            ErrorType::QueueOpFailed => Self::QueueOpFailed(inner),
        })
    }

    /// Family of this error
    #[must_use]
    pub const fn error_type(&self) -> ErrorType {
        match self {
            Self::HelloFailed(_) => ErrorType::HelloFailed,
            Self::BadRequest(_) => ErrorType::BadRequest,
            Self::BadAction(_) => ErrorType::BadAction,
            Self::FlowModFailed(_) => ErrorType::FlowModFailed,
            Self::PortModFailed(_) => ErrorType::PortModFailed,
            Self::QueueOpFailed(_) => ErrorType::QueueOpFailed,
        }
    }

    /// Code and data, whatever the family
    #[must_use]
    pub const fn body(&self) -> &ErrorBody {
        match self {
            Self::HelloFailed(body)
            | Self::BadRequest(body)
            | Self::BadAction(body)
            | Self::FlowModFailed(body)
            | Self::PortModFailed(body)
            | Self::QueueOpFailed(body) => body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_request_keeps_offending_bytes() {
        // OFPET_BAD_REQUEST / OFPBRC_BAD_TYPE, then the rejected header
        let body = hex::decode("00010001 01ff000800000001".replace(' ', "")).unwrap();
        let error = ErrorMessage::decode(ErrorType::BadRequest, &body).unwrap();

        assert_eq!(error.error_type(), ErrorType::BadRequest);
        assert_eq!(error.body().code, 1);
        assert_eq!(error.body().data.len(), 8);
    }

    #[test]
    fn family_must_match() {
        let body = hex::decode("00040000").unwrap();
        assert_eq!(
            ErrorMessage::decode(ErrorType::FlowModFailed, &body),
            Err(DecodeError::SubtypeMismatch { msg_type: MsgType::Error, expected: 3, actual: 4 })
        );
    }
}
