use otr_crypto::{append_data, extract_data, TRUNCATED_MAC_SIZE};

use crate::messages::{ensure_consumed, fixed_field};
use crate::{AkeMessage, MessageError, MessageKind, R_SIZE};

/// Reveals `r` and carries the initiator's encrypted, MACed signature.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RevealSig {
    pub r: [u8; R_SIZE],
    pub encrypted_sig: Vec<u8>,
    pub mac_sig: [u8; TRUNCATED_MAC_SIZE],
}

impl AkeMessage for RevealSig {
    const KIND: MessageKind = MessageKind::RevealSignature;

    fn serialize(&self) -> Vec<u8> {
        let out = append_data(Vec::new(), &self.r);
        let mut out = append_data(out, &self.encrypted_sig);
        out.extend_from_slice(&self.mac_sig);
        out
    }

    fn deserialize(body: &[u8]) -> Result<Self, MessageError> {
        let (r, rest) = extract_data(body)?;
        let r = fixed_field("r", r)?;
        let (encrypted_sig, rest) = extract_data(rest)?;
        if rest.len() < TRUNCATED_MAC_SIZE {
            Err(MessageError::Truncated)?
        }
        let (mac_sig, rest) = rest.split_at(TRUNCATED_MAC_SIZE);
        ensure_consumed(rest)?;
        Ok(Self {
            r,
            encrypted_sig: encrypted_sig.to_vec(),
            mac_sig: fixed_field("macSig", mac_sig)?,
        })
    }
}
