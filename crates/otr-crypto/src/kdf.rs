use crate::{ct_eq, encode_mpi, sha256, MAC_SIZE, STREAM_KEY_SIZE};
use num_bigint_dig::BigUint;
use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

pub const SSID_SIZE: usize = 8;

/// Short session identifier shown to users for out-of-band comparison.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Ssid([u8; SSID_SIZE]);

impl Ssid {
    pub fn from_bytes(bytes: [u8; SSID_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SSID_SIZE] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Ssid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// One encryption key and two MAC keys protecting exactly one handshake message.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct AkeKeys {
    c: [u8; STREAM_KEY_SIZE],
    m1: [u8; MAC_SIZE],
    m2: [u8; MAC_SIZE],
}

impl AkeKeys {
    pub fn new(c: [u8; STREAM_KEY_SIZE], m1: [u8; MAC_SIZE], m2: [u8; MAC_SIZE]) -> Self {
        Self { c, m1, m2 }
    }

    /// Stream key for the encrypted signature.
    pub fn c(&self) -> &[u8; STREAM_KEY_SIZE] {
        &self.c
    }

    /// MAC key over the signed verification data.
    pub fn m1(&self) -> &[u8; MAC_SIZE] {
        &self.m1
    }

    /// MAC key over the encrypted signature.
    pub fn m2(&self) -> &[u8; MAC_SIZE] {
        &self.m2
    }
}

impl PartialEq for AkeKeys {
    fn eq(&self, other: &Self) -> bool {
        ct_eq(&self.c, &other.c) & ct_eq(&self.m1, &other.m1) & ct_eq(&self.m2, &other.m2)
    }
}

impl Eq for AkeKeys {}

impl fmt::Debug for AkeKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AkeKeys")
            .field("c", &"***")
            .field("m1", &"***")
            .field("m2", &"***")
            .finish()
    }
}

/// `h2(b) = SHA256(b || MPI(s))`
fn h2(label: u8, secbytes: &[u8]) -> Zeroizing<[u8; MAC_SIZE]> {
    Zeroizing::new(sha256(&[&[label][..], secbytes]))
}

/// Maps the DH shared secret to `(ssid, reveal keys, signature keys)`.
///
/// Deterministic in `secret` alone, so both sides arrive at identical output.
pub fn derive_ake_keys(secret: &BigUint) -> (Ssid, AkeKeys, AkeKeys) {
    let secbytes = Zeroizing::new(encode_mpi(secret));

    let mut ssid = [0u8; SSID_SIZE];
    ssid.copy_from_slice(&h2(0x00, &secbytes)[..SSID_SIZE]);

    let cc = h2(0x01, &secbytes);
    let mut c = [0u8; STREAM_KEY_SIZE];
    let mut c_prime = [0u8; STREAM_KEY_SIZE];
    c.copy_from_slice(&cc[..STREAM_KEY_SIZE]);
    c_prime.copy_from_slice(&cc[STREAM_KEY_SIZE..]);

    let reveal = AkeKeys::new(c, *h2(0x02, &secbytes), *h2(0x03, &secbytes));
    let sig = AkeKeys::new(c_prime, *h2(0x04, &secbytes), *h2(0x05, &secbytes));
    c.zeroize();
    c_prime.zeroize();

    (Ssid(ssid), reveal, sig)
}
