//! Short-lived access tokens.

use std::fmt;

use chrono::{DateTime, Duration, Utc};

/// Seconds before expiry at which a token is treated as stale.
const EXPIRY_BUFFER_SECS: i64 = 60;

/// An OAuth access token obtained from an assertion exchange.
#[derive(Clone)]
pub struct AccessToken {
    secret: String,
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Creates a token that expires `expires_in_secs` after `issued_at`.
    pub fn new(secret: impl Into<String>, expires_in_secs: i64, issued_at: DateTime<Utc>) -> Self {
        Self {
            secret: secret.into(),
            expires_at: issued_at + Duration::seconds(expires_in_secs),
        }
    }

    /// The bearer value for API requests.
    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Returns true if the token is expired or within a minute of expiring.
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(EXPIRY_BUFFER_SECS) >= self.expires_at
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("secret", &"[redacted]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
