use aes::Aes128;
use ctr::cipher::{KeyIvInit, StreamCipher};

pub const STREAM_KEY_SIZE: usize = 16;

type Aes128Ctr = ctr::Ctr128BE<Aes128>;

/// AES-128 in counter mode with an all-zero initial counter, applied in place.
///
/// Encryption and decryption are the same transform. A key must never be used
/// for more than one plaintext.
pub fn stream_apply(key: &[u8; STREAM_KEY_SIZE], buf: &mut [u8]) {
    let iv = [0u8; 16];
    let mut cipher = Aes128Ctr::new(key.into(), &iv.into());
    cipher.apply_keystream(buf);
}

pub fn stream_encrypt(key: &[u8; STREAM_KEY_SIZE], data: &[u8]) -> Vec<u8> {
    let mut out = data.to_vec();
    stream_apply(key, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    // NIST SP 800-38A F.5.1 key, first block run with a zero counter block
    const KEY: &str = "2b7e151628aed2a6abf7158809cf4f3c";

    fn key() -> [u8; STREAM_KEY_SIZE] {
        let mut key = [0u8; STREAM_KEY_SIZE];
        hex::decode_to_slice(KEY, &mut key).unwrap();
        key
    }

    #[test]
    fn keystream_is_aes_of_zero_counter() {
        // with an all-zero plaintext the output is AES_k(0^128)
        let out = stream_encrypt(&key(), &[0u8; 16]);
        assert_eq!(hex::encode(out), "7df76b0c1ab899b33e42f047b91b546f");
    }

    #[test]
    fn transform_is_its_own_inverse() {
        let message = b"reveal me later, but not before the commitment".to_vec();
        let ciphertext = stream_encrypt(&key(), &message);
        assert_ne!(ciphertext, message);
        assert_eq!(stream_encrypt(&key(), &ciphertext), message);
    }

    #[test]
    fn empty_input() {
        assert!(stream_encrypt(&key(), &[]).is_empty());
    }
}
