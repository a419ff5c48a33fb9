use otr_crypto::{append_data, extract_data, TRUNCATED_MAC_SIZE};

use crate::messages::{ensure_consumed, fixed_field};
use crate::{AkeMessage, MessageError, MessageKind};

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Sig {
    pub encrypted_sig: Vec<u8>,
    pub mac_sig: [u8; TRUNCATED_MAC_SIZE],
}

impl AkeMessage for Sig {
    const KIND: MessageKind = MessageKind::Signature;

    fn serialize(&self) -> Vec<u8> {
        let mut out = append_data(Vec::new(), &self.encrypted_sig);
        out.extend_from_slice(&self.mac_sig);
        out
    }

    fn deserialize(body: &[u8]) -> Result<Self, MessageError> {
        let (encrypted_sig, rest) = extract_data(body)?;
        if rest.len() < TRUNCATED_MAC_SIZE {
            Err(MessageError::Truncated)?
        }
        let (mac_sig, rest) = rest.split_at(TRUNCATED_MAC_SIZE);
        ensure_consumed(rest)?;
        Ok(Self {
            encrypted_sig: encrypted_sig.to_vec(),
            mac_sig: fixed_field("macSig", mac_sig)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_rejects() {
        let sig = Sig {
            encrypted_sig: vec![1; 10],
            mac_sig: [2; TRUNCATED_MAC_SIZE],
        };
        let body = sig.serialize();
        assert_eq!(Sig::deserialize(&body).unwrap(), sig);

        let mut longer = body.clone();
        longer.push(0);
        assert_eq!(
            Sig::deserialize(&longer).unwrap_err(),
            MessageError::TrailingBytes(1)
        );
        assert_eq!(
            Sig::deserialize(&body[..3]).unwrap_err(),
            MessageError::Truncated
        );
    }
}
