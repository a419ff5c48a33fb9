use otr_crypto::BigUint;
use otr_crypto::{append_mpi, extract_mpi};

use crate::messages::ensure_consumed;
use crate::{AkeMessage, MessageError, MessageKind};

/// Carries the responder's `g^y`. Range checks happen in the AKE, not here.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DhKey {
    pub gy: BigUint,
}

impl DhKey {
    pub fn new(gy: BigUint) -> Self {
        Self { gy }
    }
}

impl AkeMessage for DhKey {
    const KIND: MessageKind = MessageKind::DhKey;

    fn serialize(&self) -> Vec<u8> {
        append_mpi(Vec::new(), &self.gy)
    }

    fn deserialize(body: &[u8]) -> Result<Self, MessageError> {
        let (gy, rest) = extract_mpi(body)?;
        ensure_consumed(rest)?;
        Ok(Self { gy })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mpi_length_mismatch() {
        assert_eq!(
            DhKey::deserialize(&[0, 0, 0, 4, 1, 2]).unwrap_err(),
            MessageError::MalformedInteger
        );
    }

    #[test]
    fn trailing_bytes() {
        assert_eq!(
            DhKey::deserialize(&[0, 0, 0, 1, 7, 0, 0]).unwrap_err(),
            MessageError::TrailingBytes(2)
        );
    }

    #[test]
    fn parses_value() {
        let key = DhKey::deserialize(&[0, 0, 0, 2, 1, 0]).unwrap();
        assert_eq!(key.gy, BigUint::from(256u32));
    }
}
