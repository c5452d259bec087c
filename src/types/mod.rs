//! Typed records for backend replies, and the decoding helpers that deal
//! with the backend's mixed encoding conventions.
//!
//! Three patterns appear on the wire:
//!
//! 1. Plain JSON objects, mapped directly ([`decode`]).
//! 2. Double-encoded fields: a field whose value is JSON text inside a JSON
//!    string (`wallet`, `user.metadata`). Records mark these with
//!    `#[serde(deserialize_with = "double_encoded")]` so callers never see
//!    the raw string.
//! 3. RPC payload envelopes: the result sits under a `payload` key, itself
//!    either a JSON object or a JSON-encoded string ([`decode_payload`]).

mod account;
mod auth;
mod lootbox;

pub use account::{AccountResponse, Device, Goal, Progress, User, UserMetadata, UserStats, Wallet};
pub use auth::{AuthenticateResponse, Credentials, GuestSession, SessionToken};
pub use lootbox::LootBoxReward;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::DecodeError;

/// Decode a raw response body directly into a typed record.
pub fn decode<T: DeserializeOwned>(body: &str) -> Result<T, DecodeError> {
    let value: Value = serde_json::from_str(body).map_err(DecodeError::Body)?;
    serde_json::from_value(value).map_err(DecodeError::Shape)
}

/// Unwrap an RPC `payload` envelope and decode the carried record.
///
/// The payload arrives either as a structured JSON object or as a
/// JSON-encoded string; both are normalized before mapping.
pub fn decode_payload<T: DeserializeOwned>(body: &str) -> Result<T, DecodeError> {
    let value: Value = serde_json::from_str(body).map_err(DecodeError::Body)?;
    let payload = value
        .get("payload")
        .ok_or(DecodeError::MissingField("payload"))?;

    let payload = match payload {
        Value::String(text) => serde_json::from_str(text).map_err(|source| {
            DecodeError::DoubleEncoded {
                field: "payload",
                source,
            }
        })?,
        other => other.clone(),
    };

    serde_json::from_value(payload).map_err(DecodeError::Shape)
}

/// Deserialize a field whose value is JSON text embedded in a JSON string.
pub(crate) fn double_encoded<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: DeserializeOwned,
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    serde_json::from_str(&text).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_direct_mapping() {
        let session: AuthenticateResponse =
            decode(r#"{"token":"T1","refresh_token":"R1"}"#).unwrap();
        assert_eq!(session.token, "T1");
        assert_eq!(session.refresh_token, "R1");
    }

    #[test]
    fn test_decode_rejects_non_json_body() {
        let err = decode::<AuthenticateResponse>("<html></html>").unwrap_err();
        assert!(matches!(err, DecodeError::Body(_)));
    }

    #[test]
    fn test_decode_rejects_missing_required_field() {
        let err = decode::<AuthenticateResponse>(r#"{"token":"T1"}"#).unwrap_err();
        assert!(matches!(err, DecodeError::Shape(_)));
    }

    #[test]
    fn test_decode_payload_as_object() {
        let body = r#"{"payload":{"award_id":"skin_1","is_new":true}}"#;
        let reward: LootBoxReward = decode_payload(body).unwrap();
        assert_eq!(reward.award_id, "skin_1");
        assert!(reward.is_new);
    }

    #[test]
    fn test_decode_payload_as_json_string() {
        let body = r#"{"payload": "{\"award_id\":\"skin_1\",\"is_new\":true}"}"#;
        let reward: LootBoxReward = decode_payload(body).unwrap();
        assert_eq!(reward.award_id, "skin_1");
        assert!(reward.is_new);
    }

    #[test]
    fn test_decode_payload_missing_envelope() {
        let err = decode_payload::<LootBoxReward>(r#"{"message":"nope"}"#).unwrap_err();
        assert!(matches!(err, DecodeError::MissingField("payload")));
    }

    #[test]
    fn test_decode_payload_invalid_inner_json() {
        let body = r#"{"payload": "{not json"}"#;
        let err = decode_payload::<LootBoxReward>(body).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::DoubleEncoded { field: "payload", .. }
        ));
    }
}
