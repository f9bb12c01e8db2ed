//! API key credentials.

use std::fmt;

/// A username and API key pair for one service.
///
/// Archivematica and the Storage Service each have their own pair. Keys are
/// static, so there is nothing to refresh.
///
/// # Security
///
/// The key is never exposed in Debug output to prevent accidental logging.
///
/// # Example
///
/// ```
/// use archivematica::Credentials;
///
/// let creds = Credentials::new("test", "3c23b036");
/// assert_eq!(creds.authorization_header(), "ApiKey test:3c23b036");
/// assert_eq!(Credentials::default().authorization_header(), "");
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    key: String,
}

impl Credentials {
    /// Create new credentials.
    pub fn new(username: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            key: key.into(),
        }
    }

    /// Returns the API username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the API key.
    ///
    /// # Security
    ///
    /// Use this only when constructing authentication headers or request
    /// bodies that need the key. Never log or display this value.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns true when both the username and key are set.
    pub fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.key.is_empty()
    }

    /// Build the `Authorization` header value.
    ///
    /// Returns `ApiKey <username>:<key>` when both parts are set and an empty
    /// string otherwise, which the services treat as unauthenticated.
    pub fn authorization_header(&self) -> String {
        if self.is_complete() {
            format!("ApiKey {}:{}", self.username, self.key)
        } else {
            String::new()
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("key", &"[REDACTED]")
            .finish()
    }
}
