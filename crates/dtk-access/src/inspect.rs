//! Unverified bearer-token inspection.
//!
//! Decodes the payload segment of a compact token for logging and
//! diagnostics. The signature is NOT checked: a tampered but well-formed
//! token decodes just as well as a genuine one. Nothing here may gate an
//! authorisation decision.
//!
//! Decoding is lenient about non-zero trailing bits in the last base64
//! symbol, which some encoders emit.

use base64::Engine as _;
use base64::alphabet;
use base64::engine::{GeneralPurpose, GeneralPurposeConfig};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// URL-safe alphabet, padded input, trailing bits ignored.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid token format: expected 3 dot-separated segments, found {0}")]
    Segments(usize),

    #[error("base64 decode failed: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("JSON parse failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("token payload is not a JSON object")]
    NotAnObject,
}

/// Decode the payload of `header.payload.signature` into a key-value map.
///
/// # Errors
///
/// Returns `DecodeError` if the token does not have exactly three segments,
/// the payload is not base64url, or it does not hold a JSON object.
pub fn decode(token: &str) -> Result<Map<String, Value>, DecodeError> {
    let segments: Vec<&str> = token.trim().split('.').collect();
    if segments.len() != 3 {
        return Err(DecodeError::Segments(segments.len()));
    }

    let bytes = PAYLOAD_ENGINE.decode(pad_segment(segments[1]))?;
    match serde_json::from_slice(&bytes)? {
        Value::Object(map) => Ok(map),
        _ => Err(DecodeError::NotAnObject),
    }
}

/// Append `=` until the length is a multiple of 4.
fn pad_segment(segment: &str) -> String {
    let mut padded = segment.to_string();
    let remainder = padded.len() % 4;
    if remainder != 0 {
        padded.push_str(&"=".repeat(4 - remainder));
    }
    padded
}

/// Typed view of the standard claims in a decoded payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TokenClaims {
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub iss: Option<String>,
    #[serde(default)]
    pub iat: Option<i64>,
    #[serde(default)]
    pub exp: Option<i64>,
}

impl TokenClaims {
    /// # Errors
    ///
    /// Returns `DecodeError` if the token cannot be decoded or a standard
    /// claim has the wrong type.
    pub fn from_token(token: &str) -> Result<Self, DecodeError> {
        Ok(serde_json::from_value(Value::Object(decode(token)?))?)
    }

    #[must_use]
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.iat.and_then(|secs| DateTime::from_timestamp(secs, 0))
    }

    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|secs| DateTime::from_timestamp(secs, 0))
    }

    /// Whether `exp` is at or before `now`. A token without `exp` never
    /// reports as expired.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|exp| exp <= now)
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    fn encode_for_test(payload: &Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256"}"#);
        let payload = URL_SAFE_NO_PAD.encode(payload.to_string());
        let signature = URL_SAFE_NO_PAD.encode("fake_sig");
        format!("{header}.{payload}.{signature}")
    }

    #[test]
    fn decode_recovers_known_payload() {
        let payload = json!({"sub": "jdoe", "iat": 1_700_000_000, "exp": 1_700_003_600, "iss": "Dependency-Track"});
        let map = decode(&encode_for_test(&payload)).unwrap();

        assert_eq!(Value::Object(map), payload);
    }

    #[rstest]
    #[case::two_pad("")]
    #[case::one_pad("a")]
    #[case::no_pad("ab")]
    fn decode_handles_every_padding_length(#[case] sub: &str) {
        let map = decode(&encode_for_test(&json!({"sub": sub}))).unwrap();
        assert_eq!(map["sub"], sub);
    }

    #[rstest]
    #[case::two_segments("eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiJhIn0", 2)]
    #[case::four_segments("a.b.c.d", 4)]
    #[case::empty("", 1)]
    fn decode_rejects_wrong_segment_count(#[case] token: &str, #[case] found: usize) {
        assert!(matches!(decode(token), Err(DecodeError::Segments(n)) if n == found));
    }

    #[test]
    fn decode_rejects_non_base64_payload() {
        let result = decode("header.!!!invalid!!!.signature");
        assert!(matches!(result, Err(DecodeError::Base64(_))));
    }

    #[test]
    fn decode_rejects_non_json_payload() {
        let payload = URL_SAFE_NO_PAD.encode("not json");
        let result = decode(&format!("h.{payload}.s"));
        assert!(matches!(result, Err(DecodeError::Json(_))));
    }

    #[test]
    fn decode_rejects_non_object_payload() {
        let payload = URL_SAFE_NO_PAD.encode("[1,2,3]");
        let result = decode(&format!("h.{payload}.s"));
        assert!(matches!(result, Err(DecodeError::NotAnObject)));
    }

    #[test]
    fn decode_ignores_trailing_bits_in_last_symbol() {
        // "e31" carries non-zero bits after the encoded "{}".
        let map = decode("h.e31.s").unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn decode_accepts_tampered_signature() {
        let token = encode_for_test(&json!({"sub": "mallory"}));
        let (unsigned, _) = token.rsplit_once('.').unwrap();
        let tampered = format!("{unsigned}.not-the-real-signature");
        assert_eq!(decode(&tampered).unwrap()["sub"], "mallory");
    }

    #[test]
    fn claims_expose_timestamps() {
        let token = encode_for_test(&json!({"sub": "jdoe", "iat": 1_700_000_000, "exp": 1_700_003_600}));
        let claims = TokenClaims::from_token(&token).unwrap();

        assert_eq!(claims.sub.as_deref(), Some("jdoe"));
        assert_eq!(claims.issued_at().unwrap().timestamp(), 1_700_000_000);
        assert_eq!(claims.expires_at().unwrap().timestamp(), 1_700_003_600);
        assert!(claims.is_expired_at(DateTime::from_timestamp(1_700_003_600, 0).unwrap()));
        assert!(!claims.is_expired_at(DateTime::from_timestamp(1_700_000_001, 0).unwrap()));
    }

    #[test]
    fn claims_without_exp_never_expire() {
        let token = encode_for_test(&json!({"sub": "svc"}));
        let claims = TokenClaims::from_token(&token).unwrap();
        assert!(claims.expires_at().is_none());
        assert!(!claims.is_expired_at(Utc::now()));
    }
}
