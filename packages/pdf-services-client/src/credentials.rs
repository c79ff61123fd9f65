//! Service principal credentials.
//!
//! Uses the `secrecy` crate so the client secret never ends up in logs,
//! debug output, or error messages.

use secrecy::{ExposeSecret, SecretString};
use std::fmt;

/// OAuth server-to-server credentials for PDF Services.
///
/// The client id doubles as the `X-API-Key` header on every call, so it is
/// not treated as secret.
#[derive(Clone)]
pub struct ServicePrincipalCredentials {
    client_id: String,
    client_secret: SecretString,
}

impl ServicePrincipalCredentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: SecretString::from(client_secret.into()),
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Expose the secret for the token exchange.
    ///
    /// Only call this when building the actual request.
    pub fn expose_client_secret(&self) -> &str {
        self.client_secret.expose_secret()
    }
}

impl fmt::Debug for ServicePrincipalCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServicePrincipalCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}
