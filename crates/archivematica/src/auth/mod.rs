//! Credential management.
//!
//! Each service has a [`Credentials`] pair held in a [`CredentialCell`]. The
//! transport reads the cell when a request is dispatched, so credentials set
//! after the client was built apply to every later request and never to one
//! already sent.

mod credentials;

use std::sync::{Arc, RwLock};

pub use credentials::Credentials;

/// Shared, replaceable credentials for one service.
#[derive(Clone, Debug, Default)]
pub struct CredentialCell {
    inner: Arc<RwLock<Credentials>>,
}

impl CredentialCell {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            inner: Arc::new(RwLock::new(credentials)),
        }
    }

    /// Replace the stored credentials.
    pub fn set(&self, credentials: Credentials) {
        // A poisoned lock still holds a complete value; overwrite it.
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        *guard = credentials;
    }

    /// Snapshot of the current credentials.
    pub fn get(&self) -> Credentials {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// The `Authorization` header value for the current credentials.
    pub fn authorization_header(&self) -> String {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .authorization_header()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_updates() {
        let cell = CredentialCell::default();
        let shared = cell.clone();
        assert_eq!(shared.authorization_header(), "");

        cell.set(Credentials::new("test", "abc"));
        assert_eq!(shared.authorization_header(), "ApiKey test:abc");
        assert_eq!(shared.get().username(), "test");
    }
}
