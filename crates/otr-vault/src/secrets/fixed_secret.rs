use std::sync::atomic::{AtomicU64, Ordering};

use crate::{SecureAccess, SecureContainer};
use otr_crypto::{ct_eq, fill_exact, CryptoError, RandomSource};
use zeroize::Zeroize;

/// For raw, fixed-size byte arrays such as symmetric keys whose size is known
/// at compile time. The bytes are zeroed on drop.
pub struct FixedSecret<const N: usize> {
    inner: [u8; N],
    tag: String,
    access_count: AtomicU64,
}

impl<const N: usize> FixedSecret<N> {
    /// Draws `N` bytes from `rng`, a short read leaves nothing behind.
    pub fn random<R: RandomSource + ?Sized>(
        tag: impl Into<String>,
        rng: &mut R,
    ) -> Result<Self, CryptoError> {
        let mut inner = [0u8; N];
        fill_exact(rng, &mut inner)?;
        Ok(Self::take(&mut inner, tag))
    }

    pub fn new(mut inner: [u8; N], tag: impl Into<String>) -> Self {
        Self::take(&mut inner, tag)
    }

    /// Copies the array in and zeroes the caller's copy.
    pub fn take(inner: &mut [u8; N], tag: impl Into<String>) -> Self {
        let secret = Self {
            inner: *inner,
            tag: tag.into(),
            access_count: AtomicU64::new(0),
        };
        inner.zeroize();
        secret
    }

    fn next_access(&self) -> u64 {
        self.access_count
            .fetch_add(1, Ordering::SeqCst)
            .saturating_add(1)
    }
}

impl<const N: usize> Drop for FixedSecret<N> {
    fn drop(&mut self) {
        self.inner.zeroize();
    }
}

impl<const N: usize> SecureContainer for FixedSecret<N> {
    type InnerType = [u8; N];

    fn tag(&self) -> &str {
        &self.tag
    }

    fn access_count(&self) -> u64 {
        self.access_count.load(Ordering::SeqCst)
    }

    fn len(&self) -> usize {
        N
    }
}

impl<const N: usize> SecureAccess for FixedSecret<N> {
    type CopyType = [u8; N];

    fn copy(&self) -> [u8; N] {
        self.audit_access(self.next_access(), "copy");
        self.inner
    }

    fn with<R>(&self, f: impl FnOnce(&Self::InnerType) -> R) -> R {
        self.audit_access(self.next_access(), "access");
        f(&self.inner)
    }

    fn with_mut<R>(&mut self, f: impl FnOnce(&mut Self::InnerType) -> R) -> R {
        self.audit_access(self.next_access(), "mutable access");
        f(&mut self.inner)
    }
}

impl<const N: usize> PartialEq for FixedSecret<N> {
    fn eq(&self, other: &Self) -> bool {
        ct_eq(&self.inner, &other.inner)
    }
}

impl<const N: usize> Eq for FixedSecret<N> {}

impl<const N: usize> std::fmt::Debug for FixedSecret<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixedSecret")
            .field("tag", &self.tag)
            .field("value", &"***")
            .finish()
    }
}
