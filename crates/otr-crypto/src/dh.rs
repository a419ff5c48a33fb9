use crate::{append_mpi, fill_exact, CryptoError, RandomSource};
use num_bigint_dig::BigUint;
use once_cell::sync::Lazy;
use std::fmt;
use zeroize::Zeroizing;

/// Number of random bytes drawn for a DH exponent (320 bits).
pub const SECRET_EXPONENT_LEN: usize = 40;

// RFC 3526 group 5, 1536-bit MODP prime
const PRIME_BYTES: [u8; 192] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xc9, 0x0f, 0xda, 0xa2,
    0x21, 0x68, 0xc2, 0x34, 0xc4, 0xc6, 0x62, 0x8b, 0x80, 0xdc, 0x1c, 0xd1,
    0x29, 0x02, 0x4e, 0x08, 0x8a, 0x67, 0xcc, 0x74, 0x02, 0x0b, 0xbe, 0xa6,
    0x3b, 0x13, 0x9b, 0x22, 0x51, 0x4a, 0x08, 0x79, 0x8e, 0x34, 0x04, 0xdd,
    0xef, 0x95, 0x19, 0xb3, 0xcd, 0x3a, 0x43, 0x1b, 0x30, 0x2b, 0x0a, 0x6d,
    0xf2, 0x5f, 0x14, 0x37, 0x4f, 0xe1, 0x35, 0x6d, 0x6d, 0x51, 0xc2, 0x45,
    0xe4, 0x85, 0xb5, 0x76, 0x62, 0x5e, 0x7e, 0xc6, 0xf4, 0x4c, 0x42, 0xe9,
    0xa6, 0x37, 0xed, 0x6b, 0x0b, 0xff, 0x5c, 0xb6, 0xf4, 0x06, 0xb7, 0xed,
    0xee, 0x38, 0x6b, 0xfb, 0x5a, 0x89, 0x9f, 0xa5, 0xae, 0x9f, 0x24, 0x11,
    0x7c, 0x4b, 0x1f, 0xe6, 0x49, 0x28, 0x66, 0x51, 0xec, 0xe4, 0x5b, 0x3d,
    0xc2, 0x00, 0x7c, 0xb8, 0xa1, 0x63, 0xbf, 0x05, 0x98, 0xda, 0x48, 0x36,
    0x1c, 0x55, 0xd3, 0x9a, 0x69, 0x16, 0x3f, 0xa8, 0xfd, 0x24, 0xcf, 0x5f,
    0x83, 0x65, 0x5d, 0x23, 0xdc, 0xa3, 0xad, 0x96, 0x1c, 0x62, 0xf3, 0x56,
    0x20, 0x85, 0x52, 0xbb, 0x9e, 0xd5, 0x29, 0x07, 0x70, 0x96, 0x96, 0x6d,
    0x67, 0x0c, 0x35, 0x4e, 0x4a, 0xbc, 0x98, 0x04, 0xf1, 0x74, 0x6c, 0x08,
    0xca, 0x23, 0x73, 0x27, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
];

pub static PRIME: Lazy<BigUint> = Lazy::new(|| BigUint::from_bytes_be(&PRIME_BYTES));
pub static P_MINUS_TWO: Lazy<BigUint> = Lazy::new(|| &*PRIME - 2u32);
pub static GENERATOR: Lazy<BigUint> = Lazy::new(|| BigUint::from(2u32));

/// `base^exponent mod p`
pub fn mod_exp(base: &BigUint, exponent: &BigUint) -> BigUint {
    base.modpow(exponent, &PRIME)
}

pub fn lt(left: &BigUint, right: &BigUint) -> bool {
    left < right
}

pub fn gt(left: &BigUint, right: &BigUint) -> bool {
    left > right
}

/// Accepts only `2 <= value <= p-2`.
pub fn check_public_value(value: &BigUint) -> Result<(), CryptoError> {
    if lt(value, &GENERATOR) || gt(value, &P_MINUS_TWO) {
        Err(CryptoError::OutOfRange)?
    }
    Ok(())
}

/// Ephemeral DH private exponent, zeroed on drop.
pub struct SecretExponent(Zeroizing<BigUint>);

impl SecretExponent {
    fn as_biguint(&self) -> &BigUint {
        &self.0
    }
}

impl fmt::Debug for SecretExponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretExponent").field("value", &"***").finish()
    }
}

/// An ephemeral exponent and its public value, always created together.
#[derive(Debug)]
pub struct DhKeyPair {
    secret: SecretExponent,
    public: BigUint,
}

impl DhKeyPair {
    pub fn generate<R: RandomSource + ?Sized>(rng: &mut R) -> Result<Self, CryptoError> {
        let mut bytes = Zeroizing::new([0u8; SECRET_EXPONENT_LEN]);
        fill_exact(rng, &mut bytes[..])?;
        Ok(Self::from_exponent(BigUint::from_bytes_be(&bytes[..])))
    }

    pub fn from_exponent(exponent: BigUint) -> Self {
        let public = mod_exp(&GENERATOR, &exponent);
        Self {
            secret: SecretExponent(Zeroizing::new(exponent)),
            public,
        }
    }

    pub fn public(&self) -> &BigUint {
        &self.public
    }

    /// Splits the pair so the exponent can be dropped independently of the public value.
    pub fn into_parts(self) -> (SecretExponent, BigUint) {
        (self.secret, self.public)
    }
}

impl SecretExponent {
    /// `their_public^x mod p`, the result is zeroed once dropped.
    pub fn shared_secret(&self, their_public: &BigUint) -> Zeroizing<BigUint> {
        Zeroizing::new(mod_exp(their_public, self.as_biguint()))
    }

    /// MPI encoding of the shared secret, handy for callers that only need bytes.
    pub fn shared_secret_mpi(&self, their_public: &BigUint) -> Zeroizing<Vec<u8>> {
        let secret = self.shared_secret(their_public);
        Zeroizing::new(append_mpi(Vec::new(), &secret))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SeededRandom;

    #[test]
    fn prime_shape() {
        assert_eq!(PRIME.bits(), 1536);
        assert_eq!(&*P_MINUS_TWO + 2u32, *PRIME);
    }

    #[test]
    fn range_bounds() {
        assert_eq!(check_public_value(&BigUint::from(0u32)), Err(CryptoError::OutOfRange));
        assert_eq!(check_public_value(&BigUint::from(1u32)), Err(CryptoError::OutOfRange));
        assert_eq!(check_public_value(&(&*PRIME - 1u32)), Err(CryptoError::OutOfRange));
        assert_eq!(check_public_value(&PRIME), Err(CryptoError::OutOfRange));
        assert!(check_public_value(&BigUint::from(2u32)).is_ok());
        assert!(check_public_value(&P_MINUS_TWO).is_ok());
    }

    #[test]
    fn small_exponent() {
        let pair = DhKeyPair::from_exponent(BigUint::from(10u32));
        assert_eq!(*pair.public(), BigUint::from(1024u32));
    }

    #[test]
    fn shared_secret_agrees() {
        let mut rng = SeededRandom::from_seed([3; 32]);
        let (x, gx) = DhKeyPair::generate(&mut rng).unwrap().into_parts();
        let (y, gy) = DhKeyPair::generate(&mut rng).unwrap().into_parts();
        assert!(check_public_value(&gx).is_ok());
        assert!(check_public_value(&gy).is_ok());
        assert_eq!(*x.shared_secret(&gy), *y.shared_secret(&gx));
        assert_eq!(*x.shared_secret_mpi(&gy), *y.shared_secret_mpi(&gx));
    }

    #[test]
    fn exponent_storage_is_wiped() {
        fn guarded<T: zeroize::Zeroize>(_: &Zeroizing<T>) {}

        let pair = DhKeyPair::from_exponent(BigUint::from(0xdead_beef_u32));
        let (secret, _) = pair.into_parts();
        guarded(&secret.0);

        let mut value = (*secret.0).clone();
        zeroize::Zeroize::zeroize(&mut value);
        assert!(value.to_bytes_be().iter().all(|b| *b == 0));
    }

    #[test]
    fn debug_hides_exponent() {
        let pair = DhKeyPair::from_exponent(BigUint::from(12345u32));
        let debug = format!("{:?}", pair);
        assert!(debug.contains("SecretExponent { value: \"***\" }"));
    }
}
