//! Error types for calendar access.
//!
//! Every failure between a resource read and the calendar service is
//! classified into one of four kinds before it leaves this crate:
//!
//! | kind | raised when |
//! |---|---|
//! | [`ErrorKind::CredentialRead`] | the credential file is missing or unreadable |
//! | [`ErrorKind::CredentialParse`] | the file is not a record with `client_email` and `private_key` |
//! | [`ErrorKind::Authentication`] | the key cannot sign, or the token endpoint rejects the assertion |
//! | [`ErrorKind::EventFetch`] | the events query fails (network, quota, authorization, bad payload) |

use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// The category of a provider error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Credential file missing or unreadable.
    CredentialRead,
    /// Credential file is not a well-formed service-account record.
    CredentialParse,
    /// Signing or exchanging the assertion failed.
    Authentication,
    /// The events query failed.
    EventFetch,
}

impl ErrorKind {
    /// Returns a stable snake_case name for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CredentialRead => "credential_read",
            Self::CredentialParse => "credential_parse",
            Self::Authentication => "authentication",
            Self::EventFetch => "event_fetch",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What went wrong with an events query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchFailure {
    /// Connection failed, DNS, timeout.
    Network,
    /// 429 or quota exceeded.
    RateLimited,
    /// 401: the access token was refused.
    Unauthorized,
    /// 403: the service account cannot read this calendar.
    Forbidden,
    /// 404: unknown calendar id.
    NotFound,
    /// Any other non-success status.
    Server,
    /// The body did not match the expected schema.
    InvalidResponse,
}

impl FetchFailure {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::RateLimited => "rate_limited",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::Server => "server",
            Self::InvalidResponse => "invalid_response",
        }
    }
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An error raised while loading credentials, authenticating or querying.
///
/// Clones share the underlying source.
#[derive(Debug, Clone, Error)]
pub struct ProviderError {
    kind: ErrorKind,
    message: String,
    /// Set only for [`ErrorKind::EventFetch`].
    failure: Option<FetchFailure>,
    #[source]
    source: Option<Arc<dyn std::error::Error + Send + Sync>>,
}

impl ProviderError {
    fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            failure: None,
            source: None,
        }
    }

    /// Creates a credential read error.
    pub fn credential_read(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CredentialRead, message)
    }

    /// Creates a credential parse error.
    pub fn credential_parse(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CredentialParse, message)
    }

    /// Creates an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authentication, message)
    }

    /// Creates an event fetch error with its failure class.
    pub fn fetch(failure: FetchFailure, message: impl Into<String>) -> Self {
        let mut err = Self::new(ErrorKind::EventFetch, message);
        err.failure = Some(failure);
        err
    }

    /// Creates a network failure while fetching events.
    pub fn network(message: impl Into<String>) -> Self {
        Self::fetch(FetchFailure::Network, message)
    }

    /// Creates an invalid response failure while fetching events.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::fetch(FetchFailure::InvalidResponse, message)
    }

    /// Sets the source error for this error.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Arc::new(source));
        self
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the fetch failure class, for [`ErrorKind::EventFetch`] errors.
    pub fn failure(&self) -> Option<FetchFailure> {
        self.failure
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.failure {
            Some(failure) => write!(f, "{} ({}): {}", self.kind, failure, self.message),
            None => write!(f, "{}: {}", self.kind, self.message),
        }
    }
}

/// A specialized Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names() {
        assert_eq!(ErrorKind::CredentialRead.as_str(), "credential_read");
        assert_eq!(ErrorKind::CredentialParse.as_str(), "credential_parse");
        assert_eq!(ErrorKind::Authentication.as_str(), "authentication");
        assert_eq!(ErrorKind::EventFetch.as_str(), "event_fetch");
    }

    #[test]
    fn constructors_set_kind() {
        assert_eq!(
            ProviderError::credential_read("x").kind(),
            ErrorKind::CredentialRead
        );
        assert_eq!(
            ProviderError::credential_parse("x").kind(),
            ErrorKind::CredentialParse
        );
        assert_eq!(
            ProviderError::authentication("x").kind(),
            ErrorKind::Authentication
        );

        let err = ProviderError::network("connection reset");
        assert_eq!(err.kind(), ErrorKind::EventFetch);
        assert_eq!(err.failure(), Some(FetchFailure::Network));
        assert_eq!(err.message(), "connection reset");
    }

    #[test]
    fn only_fetch_errors_carry_failure() {
        assert!(ProviderError::authentication("denied").failure().is_none());
        assert_eq!(
            ProviderError::fetch(FetchFailure::RateLimited, "slow down").failure(),
            Some(FetchFailure::RateLimited)
        );
    }

    #[test]
    fn display_format() {
        let err = ProviderError::fetch(FetchFailure::Forbidden, "access denied");
        assert_eq!(err.to_string(), "event_fetch (forbidden): access denied");

        let err = ProviderError::credential_parse("missing client_email");
        assert_eq!(err.to_string(), "credential_parse: missing client_email");
    }

    #[test]
    fn with_source() {
        use std::error::Error;
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = ProviderError::credential_read("cannot open").with_source(io_err);
        assert!(err.source().is_some());
    }

    #[test]
    fn clone_keeps_source() {
        use std::error::Error;
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ProviderError::credential_read("cannot open").with_source(io_err);
        let copy = err.clone();

        assert_eq!(copy.kind(), ErrorKind::CredentialRead);
        assert_eq!(copy.to_string(), err.to_string());
        assert_eq!(
            copy.source().map(|s| s.to_string()),
            Some("denied".to_string())
        );
    }
}
