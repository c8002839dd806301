//! Bearer token verification
//!
//! Tokens are issued elsewhere; this service only checks them.

use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user_id
    pub exp: i64,
    #[serde(default)]
    pub iat: i64,
}

/// Authentication service
pub struct AuthService;

impl AuthService {
    /// Verify an HS256 token and return its claims
    pub fn verify_token(token: &str, secret: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }

    /// Verify a token and resolve the user it was issued to
    pub fn authenticate(token: &str, secret: &str) -> AppResult<Uuid> {
        let claims = Self::verify_token(token, secret)?;
        Uuid::parse_str(&claims.sub).map_err(|_| AppError::InvalidToken)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};

    pub(crate) fn issue(sub: &str, secret: &str, ttl: Duration) -> String {
        let now = Utc::now();
        let claims = Claims {
            sub: sub.to_string(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_valid_token_resolves_user() {
        let user = Uuid::new_v4();
        let token = issue(&user.to_string(), "secret", Duration::minutes(5));
        assert_eq!(AuthService::authenticate(&token, "secret").unwrap(), user);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = issue(&Uuid::new_v4().to_string(), "secret", Duration::minutes(5));
        assert!(matches!(
            AuthService::authenticate(&token, "other"),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let token = issue(&Uuid::new_v4().to_string(), "secret", Duration::hours(-1));
        assert!(matches!(
            AuthService::authenticate(&token, "secret"),
            Err(AppError::TokenExpired)
        ));
    }

    #[test]
    fn test_non_uuid_subject_is_rejected() {
        let token = issue("alice", "secret", Duration::minutes(5));
        assert!(matches!(
            AuthService::authenticate(&token, "secret"),
            Err(AppError::InvalidToken)
        ));
    }
}
