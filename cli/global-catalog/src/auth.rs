//! Authentication strategies for catalog client requests

use std::fmt::{self, Debug};

use reqwest::header::{self, HeaderMap, HeaderValue, InvalidHeaderValue};
use thiserror::Error;
use tracing::debug;

/// Strategy pattern for authentication header insertion
pub trait AuthStrategy {
    /// Add authorization headers to the provided HeaderMap
    fn add_auth_headers(&self, header_map: &mut HeaderMap) -> Result<(), AuthError>;
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("bearer token is not a valid header value")]
    InvalidBearerToken(#[source] InvalidHeaderValue),
}

/// Available authentication methods
#[derive(Clone, Default, PartialEq, Eq)]
pub enum AuthMethod {
    /// Send requests unauthenticated
    #[default]
    NoAuth,
    /// Send a static bearer token with every request
    Bearer(String),
}

impl Debug for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthMethod::NoAuth => write!(f, "NoAuth"),
            AuthMethod::Bearer(_) => write!(f, "Bearer(<redacted>)"),
        }
    }
}

impl AuthStrategy for AuthMethod {
    fn add_auth_headers(&self, header_map: &mut HeaderMap) -> Result<(), AuthError> {
        let AuthMethod::Bearer(token) = self else {
            return Ok(());
        };

        let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(AuthError::InvalidBearerToken)?;
        value.set_sensitive(true);
        header_map.insert(header::AUTHORIZATION, value);
        debug!("Added bearer token authorization header");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_auth_adds_nothing() {
        let mut headers = HeaderMap::new();
        AuthMethod::NoAuth.add_auth_headers(&mut headers).unwrap();
        assert!(headers.is_empty());
    }

    #[test]
    fn bearer_adds_authorization_header() {
        let mut headers = HeaderMap::new();
        AuthMethod::Bearer("abc".to_string())
            .add_auth_headers(&mut headers)
            .unwrap();
        assert_eq!(headers[header::AUTHORIZATION], "Bearer abc");
        assert!(headers[header::AUTHORIZATION].is_sensitive());
    }

    #[test]
    fn invalid_token_is_rejected() {
        let mut headers = HeaderMap::new();
        let result = AuthMethod::Bearer("line\nbreak".to_string()).add_auth_headers(&mut headers);
        assert!(matches!(result, Err(AuthError::InvalidBearerToken(_))));
        assert!(headers.get(header::AUTHORIZATION).is_none());
    }

    #[test]
    fn debug_hides_token() {
        let debug = format!("{:?}", AuthMethod::Bearer("secret".to_string()));
        assert!(!debug.contains("secret"));
    }
}
