use std::fmt;

use otr_crypto::CryptoError;

use crate::{MessageError, MessageKind};

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AkeError {
    /// `message` is `None` when the header itself could not be read
    MalformedMessage {
        message: Option<MessageKind>,
        error: MessageError,
    },
    InsufficientRandomness,
    /// The revealed `g^x` does not hash to the committed value
    CommitmentMismatch,
    RangeViolation { message: MessageKind },
    /// Bad MAC or bad signature, deliberately not told apart
    AuthenticationFailure { message: MessageKind },
    CorruptEncryptedPayload { message: MessageKind },
    LocalEphemeralMissing,
    RemoteEphemeralMissing,
    CommitmentMissing,
    KeysMissing,
    HandshakeIncomplete,
    Crypto(CryptoError),
}

impl AkeError {
    pub(crate) fn malformed(message: MessageKind) -> impl FnOnce(MessageError) -> AkeError {
        move |error| AkeError::MalformedMessage {
            message: Some(message),
            error,
        }
    }
}

impl fmt::Display for AkeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AkeError::MalformedMessage {
                message: Some(kind),
                error,
            } => write!(f, "malformed {kind} message: {error}"),
            AkeError::MalformedMessage {
                message: None,
                error,
            } => write!(f, "malformed message: {error}"),
            AkeError::InsufficientRandomness => write!(f, "short read from random source"),
            AkeError::CommitmentMismatch => {
                write!(f, "bad commit MAC in Reveal Signature message")
            }
            AkeError::RangeViolation { message } => {
                write!(f, "DH value out of range in {message} message")
            }
            AkeError::AuthenticationFailure { message } => {
                write!(f, "authentication failed in {message} message")
            }
            AkeError::CorruptEncryptedPayload { message } => {
                write!(f, "corrupt encrypted payload in {message} message")
            }
            AkeError::LocalEphemeralMissing => write!(f, "local ephemeral key missing"),
            AkeError::RemoteEphemeralMissing => write!(f, "remote ephemeral key missing"),
            AkeError::CommitmentMissing => write!(f, "commitment missing"),
            AkeError::KeysMissing => write!(f, "handshake keys missing or already used"),
            AkeError::HandshakeIncomplete => write!(f, "handshake incomplete"),
            AkeError::Crypto(error) => write!(f, "crypto error: {error}"),
        }
    }
}

impl std::error::Error for AkeError {}

impl From<CryptoError> for AkeError {
    fn from(value: CryptoError) -> Self {
        match value {
            CryptoError::InsufficientRandomness => AkeError::InsufficientRandomness,
            other => AkeError::Crypto(other),
        }
    }
}

impl From<MessageError> for AkeError {
    fn from(error: MessageError) -> Self {
        AkeError::MalformedMessage {
            message: None,
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions() {
        assert_eq!(
            AkeError::from(CryptoError::InsufficientRandomness),
            AkeError::InsufficientRandomness
        );
        assert_eq!(
            AkeError::from(CryptoError::InvalidKeyLength),
            AkeError::Crypto(CryptoError::InvalidKeyLength)
        );
        assert_eq!(
            AkeError::malformed(MessageKind::DhKey)(MessageError::Truncated).to_string(),
            "malformed D-H Key message: truncated field"
        );
    }
}
