use otr_crypto::{append_short, append_word};
use serde::{Deserialize, Serialize};

use crate::{AkeConfig, AkeMessage, MessageError, MessageKind};

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum ProtocolVersion {
    V2,
    #[default]
    V3,
}

impl ProtocolVersion {
    pub fn as_u16(&self) -> u16 {
        match self {
            ProtocolVersion::V2 => 2,
            ProtocolVersion::V3 => 3,
        }
    }

    /// Version, type and, from v3 on, the sender and receiver instance tags.
    pub fn header_len(&self) -> usize {
        match self {
            ProtocolVersion::V2 => 3,
            ProtocolVersion::V3 => 11,
        }
    }

    pub fn has_instance_tags(&self) -> bool {
        matches!(self, ProtocolVersion::V3)
    }
}

/// Outgoing header template. Incoming instance tags belong to the transport
/// layer and are not interpreted here beyond their length.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct MessageHeader {
    version: ProtocolVersion,
    sender_instance_tag: u32,
    receiver_instance_tag: u32,
}

impl MessageHeader {
    pub fn new(version: ProtocolVersion, sender_instance_tag: u32, receiver_instance_tag: u32) -> Self {
        Self {
            version,
            sender_instance_tag,
            receiver_instance_tag,
        }
    }

    pub fn from_config(config: &AkeConfig) -> Self {
        Self::new(
            config.version,
            config.sender_instance_tag,
            config.receiver_instance_tag,
        )
    }

    pub fn version(&self) -> ProtocolVersion {
        self.version
    }

    pub fn header_len(&self) -> usize {
        self.version.header_len()
    }

    fn write(&self, kind: MessageKind) -> Vec<u8> {
        let mut out = append_short(Vec::with_capacity(self.header_len()), self.version.as_u16());
        out.push(kind.type_byte());
        if self.version.has_instance_tags() {
            out = append_word(out, self.sender_instance_tag);
            out = append_word(out, self.receiver_instance_tag);
        }
        out
    }

    /// Checks length and version, then returns the raw type byte.
    fn read_type(&self, msg: &[u8]) -> Result<u8, MessageError> {
        if msg.len() < self.header_len() {
            Err(MessageError::HeaderTooShort {
                len: msg.len(),
                expected: self.header_len(),
            })?
        }
        let found = u16::from_be_bytes([msg[0], msg[1]]);
        if found != self.version.as_u16() {
            Err(MessageError::VersionMismatch {
                expected: self.version.as_u16(),
                found,
            })?
        }
        Ok(msg[2])
    }

    /// Identifies an incoming message without parsing its body.
    pub fn peek_kind(&self, msg: &[u8]) -> Result<MessageKind, MessageError> {
        let byte = self.read_type(msg)?;
        MessageKind::from_type_byte(byte).ok_or(MessageError::UnknownType(byte))
    }

    /// Returns the body of a message of the given kind.
    pub fn strip<'m>(&self, kind: MessageKind, msg: &'m [u8]) -> Result<&'m [u8], MessageError> {
        let found = self.read_type(msg)?;
        if found != kind.type_byte() {
            Err(MessageError::UnexpectedType {
                expected: kind,
                found,
            })?
        }
        Ok(&msg[self.header_len()..])
    }

    pub fn encode<M: AkeMessage>(&self, message: &M) -> Vec<u8> {
        let mut out = self.write(M::KIND);
        out.extend_from_slice(&message.serialize());
        out
    }

    pub fn decode<M: AkeMessage>(&self, msg: &[u8]) -> Result<M, MessageError> {
        M::deserialize(self.strip(M::KIND, msg)?)
    }
}
