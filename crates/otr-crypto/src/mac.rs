use crate::CryptoError;
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

pub const MAC_SIZE: usize = 32;
/// Signature MACs travel truncated to 160 bits.
pub const TRUNCATED_MAC_SIZE: usize = 20;

type HmacSha256 = Hmac<Sha256>;

pub fn sha256(messages: &[&[u8]]) -> [u8; MAC_SIZE] {
    let mut hasher = Sha256::new();
    for message in messages {
        hasher.update(message);
    }
    hasher.finalize().into()
}

pub fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<[u8; MAC_SIZE], CryptoError> {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(key)?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().into())
}

pub fn hmac_sha256_160(key: &[u8], data: &[u8]) -> Result<[u8; TRUNCATED_MAC_SIZE], CryptoError> {
    let mut full = hmac_sha256(key, data)?;
    let mut out = [0u8; TRUNCATED_MAC_SIZE];
    out.copy_from_slice(&full[..TRUNCATED_MAC_SIZE]);
    full.zeroize();
    Ok(out)
}

/// Constant time with respect to content. Lengths are public, a mismatch is simply `false`.
pub fn ct_eq(left: &[u8], right: &[u8]) -> bool {
    left.len() == right.len() && bool::from(left.ct_eq(right))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_vector() {
        assert_eq!(
            hex::encode(sha256(&[b"abc"])),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        // multi-part input hashes the concatenation
        assert_eq!(sha256(&[b"a", b"bc"]), sha256(&[b"abc"]));
    }

    #[test]
    fn hmac_rfc4231_case_2() {
        let tag = hmac_sha256(b"Jefe", b"what do ya want for nothing?").unwrap();
        assert_eq!(
            hex::encode(tag),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
        let short = hmac_sha256_160(b"Jefe", b"what do ya want for nothing?").unwrap();
        assert_eq!(short[..], tag[..TRUNCATED_MAC_SIZE]);
    }

    #[test]
    fn constant_time_compare() {
        assert!(ct_eq(b"same bytes", b"same bytes"));
        assert!(!ct_eq(b"same bytes", b"same bytez"));
        assert!(!ct_eq(b"short", b"longer"));
        assert!(ct_eq(&[], &[]));
    }
}
