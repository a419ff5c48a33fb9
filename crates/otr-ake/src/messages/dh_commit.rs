use otr_crypto::{append_data, extract_data};

use crate::messages::{ensure_consumed, fixed_field};
use crate::{AkeMessage, MessageError, MessageKind, HASHED_GX_SIZE};

/// Commits to `g^x` without revealing it: `AES-CTR_r(MPI(gx))` and `SHA256(MPI(gx))`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DhCommit {
    pub encrypted_gx: Vec<u8>,
    pub hashed_gx: [u8; HASHED_GX_SIZE],
}

impl AkeMessage for DhCommit {
    const KIND: MessageKind = MessageKind::DhCommit;

    fn serialize(&self) -> Vec<u8> {
        let out = append_data(Vec::new(), &self.encrypted_gx);
        append_data(out, &self.hashed_gx)
    }

    fn deserialize(body: &[u8]) -> Result<Self, MessageError> {
        let (encrypted_gx, rest) = extract_data(body)?;
        let (hashed_gx, rest) = extract_data(rest)?;
        ensure_consumed(rest)?;
        Ok(Self {
            encrypted_gx: encrypted_gx.to_vec(),
            hashed_gx: fixed_field("hashedGx", hashed_gx)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commit() -> DhCommit {
        DhCommit {
            encrypted_gx: vec![1, 2, 3, 4, 5],
            hashed_gx: [9; HASHED_GX_SIZE],
        }
    }

    #[test]
    fn body_layout() {
        let body = commit().serialize();
        assert_eq!(&body[..9], &[0, 0, 0, 5, 1, 2, 3, 4, 5]);
        assert_eq!(&body[9..13], &[0, 0, 0, 32]);
        assert_eq!(body.len(), 13 + HASHED_GX_SIZE);
        assert_eq!(DhCommit::deserialize(&body).unwrap(), commit());
    }

    #[test]
    fn rejects_trailing_bytes() {
        let mut body = commit().serialize();
        body.push(0);
        assert_eq!(
            DhCommit::deserialize(&body).unwrap_err(),
            MessageError::TrailingBytes(1)
        );
    }

    #[test]
    fn rejects_short_hash() {
        let body = append_data(append_data(Vec::new(), &[1, 2]), &[7; 20]);
        assert_eq!(
            DhCommit::deserialize(&body).unwrap_err(),
            MessageError::InvalidFieldLength {
                field: "hashedGx",
                len: 20
            }
        );
    }

    #[test]
    fn rejects_truncated_body() {
        let body = commit().serialize();
        assert_eq!(
            DhCommit::deserialize(&body[..body.len() - 1]).unwrap_err(),
            MessageError::Truncated
        );
    }
}
