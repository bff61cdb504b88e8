//! Credential payload decoding.
//!
//! A bearer credential is three dot-separated base64url segments; the middle
//! one is the JSON claims payload. Decoding here is *reading*, not
//! verification — a credential that fails to decode is still sent to the
//! backend, which owns signature checks. Callers must treat a decode failure
//! as "no usable claims", not as a fatal error.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use thiserror::Error;

use crate::Claims;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The credential is not three dot-separated segments.
    #[error("malformed token: expected three dot-separated segments")]
    MalformedToken,

    /// The payload segment is not valid base64url.
    #[error("invalid payload encoding: {0}")]
    InvalidEncoding(String),

    /// The payload decoded, but is not a claims record.
    #[error("invalid claims payload: {0}")]
    InvalidPayload(String),
}

/// Decode the claims embedded in `raw` without contacting the network.
pub fn decode_claims(raw: &str) -> Result<Claims, DecodeError> {
    let mut segments = raw.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(DecodeError::MalformedToken);
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| DecodeError::InvalidEncoding(e.to_string()))?;

    serde_json::from_slice(&bytes).map_err(|e| DecodeError::InvalidPayload(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use policydesk_core::UserId;

    /// Build an unsigned three-segment token around the given payload JSON.
    fn token_with_payload(payload: &str) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(payload.as_bytes());
        format!("{header}.{body}.signature")
    }

    #[test]
    fn recovers_claims_from_a_well_formed_token() {
        let token = token_with_payload(
            r#"{"sub":"jdoe","exp":1893456000,"iat":1893452400,"role":"consultant","userId":12}"#,
        );

        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.sub, "jdoe");
        assert_eq!(claims.exp, 1893456000);
        assert_eq!(claims.iat, 1893452400);
        assert_eq!(claims.role.as_deref(), Some("consultant"));
        assert_eq!(claims.user_id, Some(UserId::new(12)));
    }

    #[test]
    fn tolerates_missing_optional_claims() {
        let token = token_with_payload(r#"{"sub":"jdoe","exp":10,"iat":5}"#);
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.role, None);
        assert_eq!(claims.user_id, None);
    }

    #[test]
    fn rejects_wrong_segment_counts() {
        assert_eq!(decode_claims(""), Err(DecodeError::MalformedToken));
        assert_eq!(decode_claims("onlyone"), Err(DecodeError::MalformedToken));
        assert_eq!(decode_claims("a.b"), Err(DecodeError::MalformedToken));
        assert_eq!(decode_claims("a.b.c.d"), Err(DecodeError::MalformedToken));
    }

    #[test]
    fn rejects_non_base64_payload() {
        let err = decode_claims("header.!!!not-base64!!!.sig").unwrap_err();
        assert!(matches!(err, DecodeError::InvalidEncoding(_)));
    }

    #[test]
    fn rejects_non_json_payload() {
        let body = URL_SAFE_NO_PAD.encode(b"plain text, not claims");
        let err = decode_claims(&format!("h.{body}.s")).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidPayload(_)));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 512,
                ..ProptestConfig::default()
            })]

            /// Property: decoding never panics, whatever the input.
            #[test]
            fn decode_never_panics(input in ".{0,256}") {
                let _ = decode_claims(&input);
            }

            /// Property: any well-formed payload round-trips through decode.
            #[test]
            fn well_formed_payload_round_trips(
                sub in "[a-z][a-z0-9_]{0,15}",
                iat in 0i64..2_000_000_000,
                ttl in 1i64..100_000,
            ) {
                let payload = format!(r#"{{"sub":"{sub}","exp":{},"iat":{iat}}}"#, iat + ttl);
                let token = token_with_payload(&payload);
                let claims = decode_claims(&token).unwrap();
                prop_assert_eq!(claims.sub, sub);
                prop_assert_eq!(claims.iat, iat);
                prop_assert_eq!(claims.exp, iat + ttl);
            }
        }
    }
}
