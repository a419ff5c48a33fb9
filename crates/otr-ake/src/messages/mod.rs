pub mod dh_commit;
pub mod dh_key;
pub mod header;
pub mod message_error;
pub mod reveal_sig;
pub mod sig;

use std::fmt;

use crate::MessageError;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum MessageKind {
    DhCommit,
    DhKey,
    RevealSignature,
    Signature,
}

impl MessageKind {
    pub fn type_byte(&self) -> u8 {
        match self {
            MessageKind::DhCommit => 0x02,
            MessageKind::DhKey => 0x0a,
            MessageKind::RevealSignature => 0x11,
            MessageKind::Signature => 0x12,
        }
    }

    pub fn from_type_byte(byte: u8) -> Option<Self> {
        match byte {
            0x02 => Some(MessageKind::DhCommit),
            0x0a => Some(MessageKind::DhKey),
            0x11 => Some(MessageKind::RevealSignature),
            0x12 => Some(MessageKind::Signature),
            _ => None,
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MessageKind::DhCommit => "D-H Commit",
            MessageKind::DhKey => "D-H Key",
            MessageKind::RevealSignature => "Reveal Signature",
            MessageKind::Signature => "Signature",
        };
        f.write_str(name)
    }
}

/// A handshake message body. The header is added and checked by `MessageHeader`.
pub trait AkeMessage: Sized {
    const KIND: MessageKind;

    fn serialize(&self) -> Vec<u8>;

    /// Must consume `body` completely, leftovers are a `TrailingBytes` error.
    fn deserialize(body: &[u8]) -> Result<Self, MessageError>;
}

pub(crate) fn ensure_consumed(rest: &[u8]) -> Result<(), MessageError> {
    match rest.len() {
        0 => Ok(()),
        n => Err(MessageError::TrailingBytes(n)),
    }
}

pub(crate) fn fixed_field<const N: usize>(
    field: &'static str,
    bytes: &[u8],
) -> Result<[u8; N], MessageError> {
    bytes
        .try_into()
        .map_err(|_| MessageError::InvalidFieldLength {
            field,
            len: bytes.len(),
        })
}
