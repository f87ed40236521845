//! Signed session and application token codec.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::account::Role;

pub use jsonwebtoken::Algorithm;

/// Claims carried by every issued token.
///
/// `exp` is only present when the codec was configured with a lifetime;
/// without one, tokens do not expire and the claim is omitted entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject - the login identifier the token was issued for.
    pub sub: String,
    /// Role the subject held at issuance time.
    pub role: Role,
    /// Issued-at timestamp.
    pub iat: i64,
    /// Expiration timestamp, when expiry is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

/// Token decode/encode errors
#[derive(Debug, Error)]
pub enum TokenError {
    /// Signature does not match the payload
    #[error("token signature is invalid")]
    InvalidSignature,

    /// Token structure cannot be parsed
    #[error("token is malformed")]
    Malformed,

    /// Token carried an `exp` claim in the past
    #[error("token has expired")]
    Expired,

    /// Decoded claims carry an empty subject
    #[error("token claims are missing a subject")]
    MissingSubject,

    /// Unexpected signing backend failure, e.g. misconfiguration
    #[error("token backend error: {0}")]
    Internal(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidToken
            | ErrorKind::MissingRequiredClaim(_)
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_) => TokenError::Malformed,
            _ => TokenError::Internal(err.to_string()),
        }
    }
}

/// Signs and verifies compact, tamper-evident tokens.
///
/// One codec instance serves the whole process: session tokens and
/// application tokens are signed with the same key and algorithm, forming a
/// single trust domain. Signature and structural validity are the only
/// checks performed here; there is no revocation list and no nonce
/// tracking.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    header: Header,
    validation: Validation,
    ttl: Option<Duration>,
}

impl TokenCodec {
    /// Create a codec from the process-wide secret and algorithm.
    ///
    /// # Arguments
    ///
    /// * `secret` - Shared signing secret
    /// * `algorithm` - Signing algorithm, e.g. HS256
    /// * `ttl` - Token lifetime; `None` disables expiry issuance and checks
    pub fn new(secret: &str, algorithm: Algorithm, ttl: Option<Duration>) -> Self {
        let mut validation = Validation::new(algorithm);
        validation.leeway = 0;
        if ttl.is_none() {
            validation.validate_exp = false;
            validation.required_spec_claims.clear();
        }

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            header: Header::new(algorithm),
            validation,
            ttl,
        }
    }

    /// Issue a signed token for the given subject and role.
    ///
    /// # Errors
    ///
    /// * `TokenError::Internal` - The signing backend failed; callers must
    ///   treat this as a fatal internal error, not a credential failure
    pub fn issue(&self, subject: &str, role: Role) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: subject.to_string(),
            role,
            iat: now.timestamp(),
            exp: self.ttl.map(|ttl| (now + ttl).timestamp()),
        };

        encode(&self.header, &claims, &self.encoding_key)
            .map_err(|err| TokenError::Internal(err.to_string()))
    }

    /// Decode a token and check its signature.
    ///
    /// # Errors
    ///
    /// * `TokenError::InvalidSignature` - Signature mismatch
    /// * `TokenError::Malformed` - Structure cannot be parsed
    /// * `TokenError::Expired` - Expiry enabled and in the past
    /// * `TokenError::MissingSubject` - Claims decode to an empty subject
    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let data = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(TokenError::from)?;

        if data.claims.sub.is_empty() {
            return Err(TokenError::MissingSubject);
        }

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn codec() -> TokenCodec {
        TokenCodec::new(SECRET, Algorithm::HS256, None)
    }

    #[test]
    fn test_round_trip_preserves_claims() {
        let codec = codec();
        let token = codec.issue("a@x.com", Role::SystemUser).unwrap();
        let claims = codec.verify(&token).unwrap();

        assert_eq!(claims.sub, "a@x.com");
        assert_eq!(claims.role, Role::SystemUser);
        assert_eq!(claims.exp, None);
    }

    #[test]
    fn test_tampered_token_fails_with_signature_error() {
        let codec = codec();
        let token = codec.issue("a@x.com", Role::AppUser).unwrap();

        // Flip one character of the payload segment. The signature check
        // runs before any claim parsing, so the result must be a signature
        // failure and never a decode of different claims.
        let mut bytes = token.into_bytes();
        let payload_pos = bytes.iter().position(|&b| b == b'.').unwrap() + 2;
        bytes[payload_pos] = if bytes[payload_pos] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(bytes).unwrap();

        assert!(matches!(
            codec.verify(&tampered),
            Err(TokenError::InvalidSignature)
        ));
    }

    #[test]
    fn test_foreign_secret_fails_with_signature_error() {
        let token = codec().issue("a@x.com", Role::AppUser).unwrap();
        let other = TokenCodec::new("another_secret_another_secret_xx", Algorithm::HS256, None);

        assert!(matches!(
            other.verify(&token),
            Err(TokenError::InvalidSignature)
        ));
    }

    #[test]
    fn test_garbage_is_malformed() {
        let codec = codec();
        assert!(matches!(codec.verify("garbage"), Err(TokenError::Malformed)));
        assert!(matches!(
            codec.verify("not.a.token"),
            Err(TokenError::Malformed)
        ));
        assert!(matches!(codec.verify(""), Err(TokenError::Malformed)));
    }

    #[test]
    fn test_empty_subject_is_rejected() {
        let codec = codec();
        let token = codec.issue("", Role::AppClient).unwrap();
        assert!(matches!(
            codec.verify(&token),
            Err(TokenError::MissingSubject)
        ));
    }

    #[test]
    fn test_expiry_enforced_only_when_configured() {
        // A codec with a lifetime in the past issues tokens that are
        // already expired.
        let expiring = TokenCodec::new(SECRET, Algorithm::HS256, Some(Duration::minutes(-5)));
        let token = expiring.issue("a@x.com", Role::SystemUser).unwrap();
        assert!(matches!(expiring.verify(&token), Err(TokenError::Expired)));

        // The same expired token passes a codec without an expiry policy.
        let claims = codec().verify(&token).unwrap();
        assert_eq!(claims.sub, "a@x.com");
        assert!(claims.exp.is_some());
    }

    #[test]
    fn test_session_and_app_tokens_share_one_trust_domain() {
        // There is no kind discriminator in the claims: a token issued as a
        // session token decodes identically when presented as an app token.
        let codec = codec();
        let token = codec.issue("client-42", Role::AppClient).unwrap();
        let claims = codec.verify(&token).unwrap();
        assert_eq!(claims.sub, "client-42");
    }
}
