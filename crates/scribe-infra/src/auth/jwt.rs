//! Session tokens as signed JWTs.

use chrono::{TimeDelta, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use scribe_core::domain::Principal;
use scribe_core::ports::{AuthError, SessionClaims, TokenService};

const DEFAULT_SECRET: &str = "change-me-in-production";

/// Signing configuration for session tokens.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: i64,
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_SECRET.to_string(),
            expiration_hours: 24,
            issuer: "scribe".to_string(),
        }
    }
}

impl JwtConfig {
    /// Read `JWT_SECRET`, `JWT_EXPIRATION_HOURS` and `JWT_ISSUER`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let secret = std::env::var("JWT_SECRET").unwrap_or(defaults.secret);

        if secret == DEFAULT_SECRET {
            let is_production = std::env::var("RUST_ENV")
                .map(|v| v == "production" || v == "prod")
                .unwrap_or(false);

            if is_production {
                tracing::error!(
                    "SECURITY: Using default JWT secret in production! Set JWT_SECRET environment variable."
                );
            } else {
                tracing::warn!("Using default JWT secret. Set JWT_SECRET for production use.");
            }
        }

        Self {
            secret,
            expiration_hours: std::env::var("JWT_EXPIRATION_HOURS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.expiration_hours),
            issuer: std::env::var("JWT_ISSUER").unwrap_or(defaults.issuer),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    username: String,
    staff: bool,
    exp: i64,
    iat: i64,
    iss: String,
}

/// HS256 session tokens.
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    config: JwtConfig,
}

impl JwtTokenService {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            encoding_key,
            decoding_key,
            config,
        }
    }

    pub fn from_env() -> Self {
        Self::new(JwtConfig::from_env())
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, principal: &Principal) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now + TimeDelta::hours(self.config.expiration_hours);

        let claims = Claims {
            sub: principal.id.to_string(),
            username: principal.username.clone(),
            staff: principal.is_staff,
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    fn validate(&self, token: &str) -> Result<SessionClaims, AuthError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.config.issuer]);

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken(e.to_string()),
            }
        })?;

        let user_id = Uuid::parse_str(&data.claims.sub)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        Ok(SessionClaims {
            user_id,
            username: data.claims.username,
            is_staff: data.claims.staff,
            exp: data.claims.exp,
        })
    }

    fn ttl_seconds(&self) -> i64 {
        self.config.expiration_hours * 3600
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str, issuer: &str) -> JwtConfig {
        JwtConfig {
            secret: secret.to_string(),
            expiration_hours: 1,
            issuer: issuer.to_string(),
        }
    }

    fn principal(is_staff: bool) -> Principal {
        Principal {
            id: Uuid::new_v4(),
            username: "testusername".to_string(),
            is_staff,
        }
    }

    #[test]
    fn test_issue_and_validate() {
        let service = JwtTokenService::new(config("test-secret-key", "scribe"));
        let principal = principal(true);

        let token = service.issue(&principal).unwrap();
        let claims = service.validate(&token).unwrap();

        assert_eq!(claims.user_id, principal.id);
        assert_eq!(claims.username, "testusername");
        assert!(claims.is_staff);
        assert_eq!(Principal::from(claims), principal);
    }

    #[test]
    fn test_validate_garbage() {
        let service = JwtTokenService::new(config("test-secret-key", "scribe"));

        let result = service.validate("invalid-token");

        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_validate_rejects_other_secret() {
        let ours = JwtTokenService::new(config("ours", "scribe"));
        let theirs = JwtTokenService::new(config("theirs", "scribe"));

        let token = theirs.issue(&principal(false)).unwrap();

        assert!(ours.validate(&token).is_err());
    }

    #[test]
    fn test_validate_rejects_other_issuer() {
        let first = JwtTokenService::new(config("same-secret", "issuer1"));
        let second = JwtTokenService::new(config("same-secret", "issuer2"));

        let token = first.issue(&principal(false)).unwrap();

        assert!(second.validate(&token).is_err());
    }

    #[test]
    fn test_expired_token() {
        let service = JwtTokenService::new(JwtConfig {
            expiration_hours: -2,
            ..config("test-secret-key", "scribe")
        });

        let token = service.issue(&principal(false)).unwrap();

        assert!(matches!(service.validate(&token), Err(AuthError::TokenExpired)));
    }

    #[test]
    fn test_ttl_seconds() {
        let service = JwtTokenService::new(JwtConfig {
            expiration_hours: 24,
            ..JwtConfig::default()
        });

        assert_eq!(service.ttl_seconds(), 86400);
    }
}
