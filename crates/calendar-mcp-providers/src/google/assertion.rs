//! Signed-assertion authentication (OAuth 2.0 JWT bearer grant).
//!
//! A service account proves its identity by signing a JWT with its private
//! key and trading it at the token endpoint for an access token. No browser,
//! no refresh token: when the access token runs out a new assertion is
//! signed.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::{ProviderError, ProviderResult};
use crate::provider::BoxFuture;

use super::credentials::ServiceAccountKey;
use super::token::AccessToken;

/// Read-only access to calendars.
pub const CALENDAR_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/calendar.readonly";

/// Grant type for assertion exchanges.
pub const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime of a signed assertion. The token endpoint caps this at one hour.
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Used when the token endpoint omits `expires_in`.
const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 3600;

/// Claims of the assertion JWT.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionClaims {
    pub iss: String,
    /// Space-separated scopes.
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

/// Signs an RS256 assertion for `key` requesting `scopes`, issued at `now`.
///
/// # Errors
///
/// Returns an `Authentication` error if the private key is not a usable RSA
/// PEM key.
pub fn sign_assertion(
    key: &ServiceAccountKey,
    scopes: &[String],
    now: DateTime<Utc>,
) -> ProviderResult<String> {
    let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes()).map_err(|e| {
        ProviderError::authentication(format!("invalid service account private key: {}", e))
            .with_source(e)
    })?;

    let mut header = Header::new(Algorithm::RS256);
    header.kid = key.private_key_id.clone();

    let iat = now.timestamp();
    let claims = AssertionClaims {
        iss: key.client_email.clone(),
        scope: scopes.join(" "),
        aud: key.token_uri().to_string(),
        iat,
        exp: iat + ASSERTION_LIFETIME_SECS,
    };

    jsonwebtoken::encode(&header, &claims, &encoding_key).map_err(|e| {
        ProviderError::authentication(format!("failed to sign assertion: {}", e)).with_source(e)
    })
}

/// Successful token endpoint response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    /// Absent is taken as `Bearer`, the only type this client can send.
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Where signed assertions are exchanged for access tokens.
pub trait TokenEndpoint: Send + Sync {
    /// Exchanges `assertion` at `token_uri`.
    ///
    /// # Errors
    ///
    /// Every failure, network included, is an `Authentication` error.
    fn exchange<'a>(
        &'a self,
        token_uri: &'a str,
        assertion: &'a str,
    ) -> BoxFuture<'a, ProviderResult<TokenGrant>>;
}

/// [`TokenEndpoint`] over HTTPS.
#[derive(Debug, Clone)]
pub struct GoogleTokenEndpoint {
    http_client: reqwest::Client,
}

impl GoogleTokenEndpoint {
    pub fn new(timeout: Duration, user_agent: &str) -> ProviderResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| {
                ProviderError::authentication(format!("failed to create HTTP client: {}", e))
                    .with_source(e)
            })?;
        Ok(Self { http_client })
    }
}

impl TokenEndpoint for GoogleTokenEndpoint {
    fn exchange<'a>(
        &'a self,
        token_uri: &'a str,
        assertion: &'a str,
    ) -> BoxFuture<'a, ProviderResult<TokenGrant>> {
        Box::pin(async move {
            let params = [("grant_type", JWT_BEARER_GRANT), ("assertion", assertion)];

            let response = self
                .http_client
                .post(token_uri)
                .form(&params)
                .send()
                .await
                .map_err(|e| {
                    ProviderError::authentication(format!("token request failed: {}", e))
                        .with_source(e)
                })?;

            let status = response.status();
            let body = response.text().await.map_err(|e| {
                ProviderError::authentication(format!("failed to read token response: {}", e))
                    .with_source(e)
            })?;

            if !status.is_success() {
                return Err(ProviderError::authentication(format!(
                    "assertion rejected ({}): {}",
                    status, body
                )));
            }

            serde_json::from_str(&body).map_err(|e| {
                ProviderError::authentication(format!("invalid token response: {}", e))
                    .with_source(e)
            })
        })
    }
}

/// An authenticated client that keeps a valid access token at hand.
pub struct AssertionClient {
    key: ServiceAccountKey,
    scopes: Vec<String>,
    endpoint: Arc<dyn TokenEndpoint>,
    token: Mutex<AccessToken>,
}

impl AssertionClient {
    /// Signs the first assertion and exchanges it.
    ///
    /// # Errors
    ///
    /// `Authentication` if signing or the exchange fails.
    pub async fn connect(
        key: ServiceAccountKey,
        scopes: Vec<String>,
        endpoint: Arc<dyn TokenEndpoint>,
    ) -> ProviderResult<Self> {
        let token = fetch_token(&key, &scopes, endpoint.as_ref()).await?;
        info!(
            client_email = %key.client_email,
            expires_at = %token.expires_at(),
            "obtained access token"
        );

        Ok(Self {
            key,
            scopes,
            endpoint,
            token: Mutex::new(token),
        })
    }

    /// The service account this client acts as.
    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }

    /// Returns a bearer token, re-signing first if the current one is stale.
    ///
    /// Concurrent callers share one refresh.
    pub async fn access_token(&self) -> ProviderResult<String> {
        let mut token = self.token.lock().await;
        if token.is_stale(Utc::now()) {
            debug!(expires_at = %token.expires_at(), "access token stale, re-signing assertion");
            *token = fetch_token(&self.key, &self.scopes, self.endpoint.as_ref()).await?;
        }
        Ok(token.secret().to_string())
    }
}

impl std::fmt::Debug for AssertionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssertionClient")
            .field("client_email", &self.key.client_email)
            .field("scopes", &self.scopes)
            .finish_non_exhaustive()
    }
}

async fn fetch_token(
    key: &ServiceAccountKey,
    scopes: &[String],
    endpoint: &dyn TokenEndpoint,
) -> ProviderResult<AccessToken> {
    let issued_at = Utc::now();
    let assertion = sign_assertion(key, scopes, issued_at)?;
    let grant = endpoint.exchange(key.token_uri(), &assertion).await?;
    if let Some(token_type) = grant
        .token_type
        .as_deref()
        .filter(|t| !t.eq_ignore_ascii_case("bearer"))
    {
        return Err(ProviderError::authentication(format!(
            "token endpoint issued an unsupported token type: {}",
            token_type
        )));
    }
    Ok(AccessToken::new(
        grant.access_token,
        grant.expires_in.unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS),
        issued_at,
    ))
}
