use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// JWT claims wrapping an application-defined payload.
///
/// The payload is embedded verbatim under `user`, next to the registered
/// `iat` and `exp` claims. Signature verification covers all three.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims<T> {
    /// Snapshot of the authenticated principal
    pub user: T,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl<T> Claims<T> {
    /// Create claims issued now and expiring after `expiration_hours`.
    ///
    /// # Arguments
    /// * `user` - Payload to embed
    /// * `expiration_hours` - Hours until token expires
    ///
    /// # Returns
    /// Claims with iat and exp set
    pub fn new(user: T, expiration_hours: i64) -> Self {
        let now = Utc::now();
        let expiration = now + Duration::hours(expiration_hours);

        Self {
            user,
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        }
    }

    /// Override issued at (Unix timestamp).
    pub fn with_issued_at(mut self, iat: i64) -> Self {
        self.iat = iat;
        self
    }

    /// Override expiration (Unix timestamp).
    pub fn with_expiration(mut self, exp: i64) -> Self {
        self.exp = exp;
        self
    }

    /// Check if token is expired.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }
}
