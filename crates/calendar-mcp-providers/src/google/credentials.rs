//! Service-account key loading.

use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::error::{ProviderError, ProviderResult};

/// Token endpoint used when the key file does not name one.
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// The fields of a Google service-account JSON key that signing needs.
///
/// Other fields in the file (`type`, `client_id`, `auth_uri`, ...) are
/// ignored.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    /// PEM-encoded RSA private key.
    pub private_key: String,
    /// Sent as the JWT `kid` header when present.
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default)]
    pub token_uri: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
}

impl ServiceAccountKey {
    /// Reads and parses a key file.
    ///
    /// # Errors
    ///
    /// `CredentialRead` if the file cannot be read, `CredentialParse` if its
    /// content is not a valid key record.
    pub fn from_file(path: impl AsRef<Path>) -> ProviderResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ProviderError::credential_read(format!(
                "failed to read credentials file {}: {}",
                path.display(),
                e
            ))
            .with_source(e)
        })?;
        Self::from_json(&content)
    }

    /// Parses a key record from JSON text.
    ///
    /// Both `client_email` and `private_key` must be present and non-empty.
    pub fn from_json(json: &str) -> ProviderResult<Self> {
        let key: Self = serde_json::from_str(json).map_err(|e| {
            ProviderError::credential_parse(format!("invalid service account JSON: {}", e))
                .with_source(e)
        })?;

        if key.client_email.trim().is_empty() {
            return Err(ProviderError::credential_parse("client_email is empty"));
        }
        if key.private_key.trim().is_empty() {
            return Err(ProviderError::credential_parse("private_key is empty"));
        }

        Ok(key)
    }

    /// The token endpoint to exchange assertions at.
    pub fn token_uri(&self) -> &str {
        self.token_uri
            .as_deref()
            .filter(|uri| !uri.is_empty())
            .unwrap_or(DEFAULT_TOKEN_URI)
    }
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key", &"[redacted]")
            .field("private_key_id", &self.private_key_id)
            .field("token_uri", &self.token_uri)
            .field("project_id", &self.project_id)
            .finish()
    }
}
