use crate::CryptoError;
use rand::{rngs::OsRng, TryRngCore};
use zeroize::Zeroize;

/// A source of cryptographically secure random bytes.
///
/// `fill` reports how many bytes were actually written. Callers treat anything
/// short of `dest.len()` as a hard failure, see [`fill_exact`].
pub trait RandomSource {
    fn fill(&mut self, dest: &mut [u8]) -> usize;
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn fill(&mut self, dest: &mut [u8]) -> usize {
        (**self).fill(dest)
    }
}

/// Fills `dest` completely or fails. A short read is never padded, the partial
/// output is zeroed before returning the error.
pub fn fill_exact<R: RandomSource + ?Sized>(
    rng: &mut R,
    dest: &mut [u8],
) -> Result<(), CryptoError> {
    let written = rng.fill(dest);
    if written < dest.len() {
        dest.zeroize();
        Err(CryptoError::InsufficientRandomness)?
    }
    Ok(())
}

/// Operating system randomness.
#[derive(Copy, Clone, Debug, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill(&mut self, dest: &mut [u8]) -> usize {
        match OsRng.try_fill_bytes(dest) {
            Ok(()) => dest.len(),
            Err(_) => 0,
        }
    }
}

/// Deterministic ChaCha20 stream, only for tests.
#[cfg(any(test, feature = "test-utils"))]
pub struct SeededRandom(rand_chacha::ChaCha20Rng);

#[cfg(any(test, feature = "test-utils"))]
impl SeededRandom {
    pub fn from_seed(seed: [u8; 32]) -> Self {
        use rand_chacha::rand_core::SeedableRng;
        Self(rand_chacha::ChaCha20Rng::from_seed(seed))
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl RandomSource for SeededRandom {
    fn fill(&mut self, dest: &mut [u8]) -> usize {
        use rand_chacha::rand_core::RngCore;
        self.0.fill_bytes(dest);
        dest.len()
    }
}
