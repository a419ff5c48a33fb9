use std::fmt;

use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey, PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH};
use otr_crypto::{append_short, extract_short, fill_exact, sha256, CryptoError, RandomSource};
use zeroize::Zeroizing;

/// Key type tag written in front of a serialized Ed25519 public key.
pub const ED25519_KEY_TYPE: u16 = 0x0003;

/// A peer's long-term public key as it travels inside the encrypted signature.
pub trait PublicIdentity: Clone + fmt::Debug + Sized {
    fn serialize(&self) -> Vec<u8>;

    /// Parses a key off the front of `bytes`, returning what follows it.
    fn parse(bytes: &[u8]) -> Option<(Self, &[u8])>;

    /// Verifies the signature at the front of `sig` over `data` and returns
    /// the bytes after the signature.
    fn verify<'s>(&self, data: &[u8], sig: &'s [u8]) -> Option<&'s [u8]>;

    fn fingerprint(&self) -> [u8; 32];
}

/// Our long-term signing key, borrowed by the handshake and never stored by it.
pub trait IdentityKey {
    type Public: PublicIdentity;

    fn public(&self) -> Self::Public;

    fn sign<R: RandomSource + ?Sized>(&self, rng: &mut R, data: &[u8]) -> Result<Vec<u8>, CryptoError>;
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Ed25519Public(VerifyingKey);

impl Ed25519Public {
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        self.0.as_bytes()
    }
}

impl PublicIdentity for Ed25519Public {
    fn serialize(&self) -> Vec<u8> {
        let mut out = append_short(Vec::with_capacity(2 + PUBLIC_KEY_LENGTH), ED25519_KEY_TYPE);
        out.extend_from_slice(self.0.as_bytes());
        out
    }

    fn parse(bytes: &[u8]) -> Option<(Self, &[u8])> {
        let (key_type, rest) = extract_short(bytes).ok()?;
        if key_type != ED25519_KEY_TYPE || rest.len() < PUBLIC_KEY_LENGTH {
            return None;
        }
        let (key, rest) = rest.split_at(PUBLIC_KEY_LENGTH);
        let key = VerifyingKey::from_bytes(key.try_into().ok()?).ok()?;
        Some((Self(key), rest))
    }

    fn verify<'s>(&self, data: &[u8], sig: &'s [u8]) -> Option<&'s [u8]> {
        if sig.len() < SIGNATURE_LENGTH {
            return None;
        }
        let (sig, rest) = sig.split_at(SIGNATURE_LENGTH);
        let sig = Signature::from_bytes(sig.try_into().ok()?);
        self.0.verify_strict(data, &sig).ok()?;
        Some(rest)
    }

    fn fingerprint(&self) -> [u8; 32] {
        sha256(&[&self.0.as_bytes()[..]])
    }
}

pub struct Ed25519Identity {
    signing: SigningKey,
}

impl Ed25519Identity {
    pub fn generate<R: RandomSource + ?Sized>(rng: &mut R) -> Result<Self, CryptoError> {
        let mut seed = Zeroizing::new([0u8; 32]);
        fill_exact(rng, &mut seed[..])?;
        Ok(Self::from_seed(&seed))
    }

    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing: SigningKey::from_bytes(seed),
        }
    }
}

impl fmt::Debug for Ed25519Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ed25519Identity")
            .field("public", &hex_prefix(self.signing.verifying_key().as_bytes()))
            .field("secret", &"***")
            .finish()
    }
}

fn hex_prefix(bytes: &[u8]) -> String {
    bytes.iter().take(4).map(|b| format!("{b:02x}")).collect()
}

impl IdentityKey for Ed25519Identity {
    type Public = Ed25519Public;

    fn public(&self) -> Ed25519Public {
        Ed25519Public(self.signing.verifying_key())
    }

    /// Ed25519 is deterministic, `rng` is not consulted.
    fn sign<R: RandomSource + ?Sized>(&self, _rng: &mut R, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        Ok(self.signing.sign(data).to_bytes().to_vec())
    }
}
