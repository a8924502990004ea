use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, decode_header, encode,
    errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

/// Lifetime of every access token. There is no refresh path.
pub const ACCESS_TOKEN_TTL_SECS: i64 = 3 * 60;

const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token is malformed")]
    Malformed,

    #[error("Wrong signing method")]
    WrongAlgorithm,

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token is expired")]
    Expired,

    #[error("Token is missing the {0} claim")]
    MissingClaim(String),

    #[error("Failed to sign token")]
    Signing,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidAlgorithm => TokenError::WrongAlgorithm,
            ErrorKind::MissingRequiredClaim(claim) => TokenError::MissingClaim(claim.clone()),
            _ => {
                debug!(error = %err, "rejecting malformed token");
                TokenError::Malformed
            }
        }
    }
}

/// Claims carried by an access token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessClaims {
    pub sub: Uuid,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies HS256 bearer tokens signed with the process-wide secret.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &SIGNING_ALGORITHM)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        let secret = secret.as_ref();

        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Signs a token for `subject` that stops verifying at `expires_at`.
    pub fn issue(&self, subject: Uuid, expires_at: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = AccessClaims {
            sub: subject,
            iat: Utc::now().timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(SIGNING_ALGORITHM), &claims, &self.encoding)
            .map_err(|_| TokenError::Signing)
    }

    /// Signs a token with the fixed access-token horizon.
    pub fn issue_access(&self, subject: Uuid) -> Result<String, TokenError> {
        self.issue(
            subject,
            Utc::now() + Duration::seconds(ACCESS_TOKEN_TTL_SECS),
        )
    }

    /// Returns the subject of a well-formed, correctly signed, unexpired token.
    ///
    /// The header algorithm is checked before the signature so that a token
    /// signed with any other algorithm is always reported as such.
    pub fn verify(&self, token: &str) -> Result<Uuid, TokenError> {
        let header = decode_header(token).map_err(|err| {
            if names_foreign_algorithm(token) {
                TokenError::WrongAlgorithm
            } else {
                TokenError::from(err)
            }
        })?;
        if header.alg != SIGNING_ALGORITHM {
            return Err(TokenError::WrongAlgorithm);
        }

        let data = decode::<AccessClaims>(token, &self.decoding, &self.validation)?;
        Ok(data.claims.sub)
    }
}

/// True when the raw header carries an `alg` that jsonwebtoken cannot
/// represent, such as `none`.
fn names_foreign_algorithm(token: &str) -> bool {
    let Some(segment) = token.split('.').next() else {
        return false;
    };
    let Ok(bytes) = URL_SAFE_NO_PAD.decode(segment.trim_end_matches('=')) else {
        return false;
    };
    let Ok(header) = serde_json::from_slice::<serde_json::Value>(&bytes) else {
        return false;
    };

    match header.get("alg").and_then(serde_json::Value::as_str) {
        Some(alg) => alg != "HS256",
        None => false,
    }
}
