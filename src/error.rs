//! Error types for rbr-kit.
//!
//! # Error Hierarchy
//!
//! - [`Error`](enum@Error) — Main error type, returned by every operation
//!   - [`DecodeError`] — Typed-decoding failures (malformed or missing payload)
//! - [`ErrorKind`] — The failure category a call site declares for HTTP
//!   non-success statuses
//!
//! Transport failures (timeout, connection refused) are never caught
//! internally; they surface as [`Error::Http`]. A 200 response with an
//! unparsable payload is a [`DecodeError`], not the operation's declared
//! kind.
//!
//! # Pattern Matching
//!
//! ```rust,no_run
//! use rbr_kit::{Error, RocketBotRoyale};
//!
//! # async fn example() -> Result<(), Error> {
//! let client = RocketBotRoyale::connect("a@b.com", "pw").await?;
//!
//! match client.collect_timed_bonus().await {
//!     Ok(()) => println!("bonus collected"),
//!     Err(Error::CollectTimedBonus(msg)) => println!("backend said: {msg}"),
//!     Err(e) => return Err(e),
//! }
//! # Ok(())
//! # }
//! ```

use thiserror::Error;

/// Fallback message used when a failed response carries no `message` field.
pub(crate) const GENERIC_FAILURE: &str = "Unknown";

/// The failure category a call site declares for non-success statuses.
///
/// Each backend operation maps HTTP failures to exactly one [`Error`]
/// variant; the mapping is declared once, where the request is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Authentication,
    SignUp,
    CollectTimedBonus,
    FriendRequest,
    LootBox,
    UnknownUser,
}

impl ErrorKind {
    /// Build the [`Error`] for this kind, carrying the backend's message.
    pub fn with_message(self, message: impl Into<String>) -> Error {
        let message = message.into();
        match self {
            ErrorKind::Authentication => Error::Authentication(message),
            ErrorKind::SignUp => Error::SignUp(message),
            ErrorKind::CollectTimedBonus => Error::CollectTimedBonus(message),
            ErrorKind::FriendRequest => Error::FriendRequest(message),
            ErrorKind::LootBox => Error::LootBox(message),
            ErrorKind::UnknownUser => Error::UnknownUser(message),
        }
    }
}

/// Error decoding a backend reply into a typed record.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Response body is not valid JSON: {0}")]
    Body(#[source] serde_json::Error),

    #[error("Missing required field '{0}' in response")]
    MissingField(&'static str),

    #[error("Field '{field}' is not valid JSON text: {source}")]
    DoubleEncoded {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Response shape mismatch: {0}")]
    Shape(#[source] serde_json::Error),
}

/// Main error type for rbr-kit operations.
#[derive(Debug, Error)]
pub enum Error {
    // ─── Local (no network call made) ───
    #[error("No session token. Call authenticate() before authenticated operations.")]
    Unauthenticated,

    #[error("No credentials configured. Call .credentials() on ClientBuilder or use connect().")]
    NoCredentials,

    #[error("Session token is not a valid HTTP header value")]
    InvalidSessionToken,

    // ─── Transport ───
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // ─── Backend operations ───
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Sign-up failed: {0}")]
    SignUp(String),

    #[error("Collecting timed bonus failed: {0}")]
    CollectTimedBonus(String),

    #[error("Friend request failed: {0}")]
    FriendRequest(String),

    #[error("Loot box purchase failed: {0}")]
    LootBox(String),

    #[error("Unknown user: {0}")]
    UnknownUser(String),

    // ─── Decoding ───
    #[error(transparent)]
    Decode(#[from] DecodeError),

    // ─── Serialization ───
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// The backend message carried by an operation error, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            Error::Authentication(m)
            | Error::SignUp(m)
            | Error::CollectTimedBonus(m)
            | Error::FriendRequest(m)
            | Error::LootBox(m)
            | Error::UnknownUser(m) => Some(m),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_with_message() {
        assert!(matches!(
            ErrorKind::Authentication.with_message("bad password"),
            Error::Authentication(m) if m == "bad password"
        ));
        assert!(matches!(
            ErrorKind::SignUp.with_message("taken"),
            Error::SignUp(m) if m == "taken"
        ));
        assert!(matches!(
            ErrorKind::CollectTimedBonus.with_message("too soon"),
            Error::CollectTimedBonus(m) if m == "too soon"
        ));
        assert!(matches!(
            ErrorKind::FriendRequest.with_message("nope"),
            Error::FriendRequest(m) if m == "nope"
        ));
        assert!(matches!(
            ErrorKind::LootBox.with_message("broke"),
            Error::LootBox(m) if m == "broke"
        ));
        assert!(matches!(
            ErrorKind::UnknownUser.with_message("who"),
            Error::UnknownUser(m) if m == "who"
        ));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::Unauthenticated.to_string(),
            "No session token. Call authenticate() before authenticated operations."
        );
        assert_eq!(
            Error::Authentication("invalid email".to_string()).to_string(),
            "Authentication failed: invalid email"
        );
        assert_eq!(
            Error::CollectTimedBonus("too soon".to_string()).to_string(),
            "Collecting timed bonus failed: too soon"
        );
        assert_eq!(
            Error::UnknownUser("no such friend code".to_string()).to_string(),
            "Unknown user: no such friend code"
        );
    }

    #[test]
    fn test_decode_error_display() {
        assert_eq!(
            DecodeError::MissingField("payload").to_string(),
            "Missing required field 'payload' in response"
        );

        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = DecodeError::DoubleEncoded {
            field: "wallet",
            source,
        };
        assert!(err.to_string().starts_with("Field 'wallet' is not valid JSON text"));
    }

    #[test]
    fn test_error_message_accessor() {
        assert_eq!(
            Error::LootBox("sold out".to_string()).message(),
            Some("sold out")
        );
        assert_eq!(Error::Unauthenticated.message(), None);
    }

    #[test]
    fn test_error_from_decode_error() {
        let err: Error = DecodeError::MissingField("payload").into();
        assert!(matches!(err, Error::Decode(_)));
    }
}
