mod dh;
mod encoding;
mod kdf;
mod mac;
mod random;
mod stream;

pub use num_bigint_dig::BigUint;

pub use dh::{
    check_public_value, gt, lt, mod_exp, DhKeyPair, SecretExponent, GENERATOR, P_MINUS_TWO, PRIME,
    SECRET_EXPONENT_LEN,
};
pub use encoding::{
    append_data, append_mpi, append_short, append_word, encode_mpi, extract_data, extract_mpi,
    extract_short, extract_word,
};
pub use kdf::{derive_ake_keys, AkeKeys, Ssid, SSID_SIZE};
pub use mac::{ct_eq, hmac_sha256, hmac_sha256_160, sha256, MAC_SIZE, TRUNCATED_MAC_SIZE};
pub use random::{fill_exact, OsRandom, RandomSource};
#[cfg(any(test, feature = "test-utils"))]
pub use random::SeededRandom;
pub use stream::{stream_apply, stream_encrypt, STREAM_KEY_SIZE};

use std::fmt;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CryptoError {
    /// The random source returned fewer bytes than requested
    InsufficientRandomness,
    /// An MPI declared more magnitude bytes than were available
    MalformedInteger,
    /// A length prefix or fixed-width field ran past the end of the input
    TruncatedData,
    /// A DH public value outside `[2, p-2]`
    OutOfRange,
    InvalidKeyLength,
}

impl fmt::Display for CryptoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CryptoError::InsufficientRandomness => write!(f, "short read from random source"),
            CryptoError::MalformedInteger => write!(f, "malformed MPI"),
            CryptoError::TruncatedData => write!(f, "truncated data"),
            CryptoError::OutOfRange => write!(f, "DH value out of range"),
            CryptoError::InvalidKeyLength => write!(f, "invalid key length"),
        }
    }
}

impl std::error::Error for CryptoError {}

impl From<digest::InvalidLength> for CryptoError {
    fn from(_: digest::InvalidLength) -> Self {
        CryptoError::InvalidKeyLength
    }
}
