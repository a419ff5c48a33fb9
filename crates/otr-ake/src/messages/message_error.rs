use std::fmt;

use otr_crypto::CryptoError;

use crate::MessageKind;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MessageError {
    HeaderTooShort { len: usize, expected: usize },
    VersionMismatch { expected: u16, found: u16 },
    UnexpectedType { expected: MessageKind, found: u8 },
    UnknownType(u8),
    MalformedInteger,
    Truncated,
    InvalidFieldLength { field: &'static str, len: usize },
    TrailingBytes(usize),
}

impl fmt::Display for MessageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageError::HeaderTooShort { len, expected } => {
                write!(f, "message of {len} bytes is shorter than the {expected} byte header")
            }
            MessageError::VersionMismatch { expected, found } => {
                write!(f, "protocol version {found}, expected {expected}")
            }
            MessageError::UnexpectedType { expected, found } => {
                write!(f, "message type {found:#04x}, expected {expected}")
            }
            MessageError::UnknownType(found) => write!(f, "unknown message type {found:#04x}"),
            MessageError::MalformedInteger => write!(f, "malformed MPI"),
            MessageError::Truncated => write!(f, "truncated field"),
            MessageError::InvalidFieldLength { field, len } => {
                write!(f, "field {field} has invalid length {len}")
            }
            MessageError::TrailingBytes(n) => write!(f, "{n} trailing bytes after message body"),
        }
    }
}

impl std::error::Error for MessageError {}

impl From<CryptoError> for MessageError {
    fn from(value: CryptoError) -> Self {
        match value {
            CryptoError::MalformedInteger => MessageError::MalformedInteger,
            _ => MessageError::Truncated,
        }
    }
}
