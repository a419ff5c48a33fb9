use tracing::trace;

/// Common surface of the secret containers: a tag for audit output and an
/// access counter, the bytes themselves only reachable through `SecureAccess`.
pub trait SecureContainer {
    type InnerType: ?Sized;

    fn tag(&self) -> &str;
    fn access_count(&self) -> u64;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub trait SecureAccess: SecureContainer {
    type CopyType;

    fn copy(&self) -> Self::CopyType;

    fn with<R>(&self, f: impl FnOnce(&Self::InnerType) -> R) -> R;
    fn with_mut<R>(&mut self, f: impl FnOnce(&mut Self::InnerType) -> R) -> R;

    fn audit_access(&self, access_count: u64, operation: &str) {
        trace!(tag = self.tag(), access_count, operation, "secret access");
    }
}
