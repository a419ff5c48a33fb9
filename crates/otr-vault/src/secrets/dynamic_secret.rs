use std::sync::atomic::{AtomicU64, Ordering};

use crate::{SecureAccess, SecureContainer, SecureRef};
use otr_crypto::ct_eq;
use zeroize::Zeroize;

/// Variable-length secret bytes, for values whose size is only known at runtime
/// (an MPI-encoded shared secret for example). Zeroed on drop.
pub struct DynamicSecret {
    inner: Vec<u8>,
    tag: String,
    access_count: AtomicU64,
}

impl DynamicSecret {
    /// Will consume the data in `inner`, zeroing it before dropping
    pub fn new(mut inner: Vec<u8>, tag: impl Into<String>) -> Self {
        Self::take(&mut inner, tag)
    }

    /// Moves the bytes out of `inner`, leaving it empty
    pub fn take(inner: &mut Vec<u8>, tag: impl Into<String>) -> Self {
        Self {
            inner: std::mem::take(inner),
            tag: tag.into(),
            access_count: AtomicU64::new(0),
        }
    }

    fn next_access(&self) -> u64 {
        self.access_count
            .fetch_add(1, Ordering::SeqCst)
            .saturating_add(1)
    }
}

impl Drop for DynamicSecret {
    fn drop(&mut self) {
        self.inner.zeroize();
    }
}

impl SecureContainer for DynamicSecret {
    type InnerType = Vec<u8>;

    fn tag(&self) -> &str {
        &self.tag
    }

    fn access_count(&self) -> u64 {
        self.access_count.load(Ordering::SeqCst)
    }

    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl SecureAccess for DynamicSecret {
    type CopyType = SecureRef<Vec<u8>>;

    fn copy(&self) -> SecureRef<Vec<u8>> {
        self.audit_access(self.next_access(), "copy");
        SecureRef::new(self.inner.clone())
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

impl PartialEq for DynamicSecret {
    fn eq(&self, other: &Self) -> bool {
        ct_eq(&self.inner, &other.inner)
    }
}

impl Eq for DynamicSecret {}

impl std::fmt::Debug for DynamicSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicSecret")
            .field("tag", &self.tag)
            .field("len", &self.inner.len())
            .finish()
    }
}
