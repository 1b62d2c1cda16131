//! JWT token utilities for authentication.
//!
//! Provides token creation and validation bound to a single process-wide
//! signing key loaded from configuration at startup. Verification reports
//! expiry and any other failure as distinct error kinds so the API layer
//! can answer with a precise message.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{ServiceError, ServiceResult};

/// JWT claims carried by every bearer token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User ID
    pub sub: Uuid,
    /// Email at issuance time
    pub email: String,
    /// Token expiration timestamp
    pub exp: usize,
    /// Token issued at timestamp
    pub iat: usize,
}

/// JWT utility for creating and validating tokens.
pub struct JwtUtils {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expires_in_seconds: u64,
}

impl JwtUtils {
    /// Builds the signing/verification keys from the configured secret.
    pub fn new(secret: &str, expires_in_seconds: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        JwtUtils {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            expires_in_seconds,
        }
    }

    /// Seconds until a freshly issued token expires.
    pub fn expires_in_seconds(&self) -> u64 {
        self.expires_in_seconds
    }

    /// Issues a signed token bound to the user's id and email.
    pub fn generate_token(&self, user_id: Uuid, email: &str) -> ServiceResult<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.expires_in_seconds as i64);

        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            exp: exp.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| ServiceError::Internal {
                source: anyhow::anyhow!("token generation failed: {e}"),
            })
    }

    /// Validates and decodes a token, distinguishing expiry from every
    /// other failure.
    pub fn validate_token(&self, token: &str) -> ServiceResult<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => ServiceError::TokenExpired,
                _ => ServiceError::InvalidToken,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_resolves_same_user() {
        let jwt = JwtUtils::new("test-secret", 7200);
        let user_id = Uuid::now_v7();

        let token = jwt.generate_token(user_id, "demo@user.com").unwrap();
        let claims = jwt.validate_token(&token).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email, "demo@user.com");
        assert_eq!(claims.exp - claims.iat, 7200);
    }

    #[test]
    fn expired_token_is_rejected_as_expired() {
        let jwt = JwtUtils::new("test-secret", 7200);
        let now = Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: Uuid::now_v7(),
            email: "demo@user.com".to_string(),
            exp: now - 3600,
            iat: now - 7200,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        let err = jwt.validate_token(&token).unwrap_err();
        assert!(matches!(err, ServiceError::TokenExpired));
    }

    #[test]
    fn tampered_token_is_invalid() {
        let jwt = JwtUtils::new("test-secret", 7200);
        let token = jwt.generate_token(Uuid::now_v7(), "demo@user.com").unwrap();

        let forged = JwtUtils::new("other-secret", 7200)
            .generate_token(Uuid::now_v7(), "demo@user.com")
            .unwrap();

        assert!(matches!(
            jwt.validate_token(&forged).unwrap_err(),
            ServiceError::InvalidToken
        ));
        assert!(matches!(
            jwt.validate_token(&format!("{token}x")).unwrap_err(),
            ServiceError::InvalidToken
        ));
    }
}
