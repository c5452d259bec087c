//! Authentication records.

use serde::Deserialize;

/// Session credentials returned by the email authentication endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthenticateResponse {
    pub token: String,
    pub refresh_token: String,
}

/// Throwaway guest session minted by the custom-auth endpoint during
/// sign-up. Its bearer token signs the actual sign-up call and is dropped
/// afterwards.
#[derive(Debug, Clone, Deserialize)]
pub struct GuestSession {
    pub token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub created: bool,
}

/// The bearer/refresh token pair cached by the facade and attached to every
/// authenticated request. Expiry is the backend's business; none is tracked
/// locally.
#[derive(Debug, Clone)]
pub struct SessionToken {
    pub token: String,
    pub refresh_token: String,
}

/// Account credentials. Input only; never persisted beyond the process.
#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

// Keep the password out of logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guest_session_created_defaults_to_false() {
        let session: GuestSession =
            serde_json::from_str(r#"{"token":"T","refresh_token":"R"}"#).unwrap();
        assert!(!session.created);
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let creds = Credentials::new("a@b.com", "hunter2");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("a@b.com"));
        assert!(!debug.contains("hunter2"));
    }
}
