use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::EnvironmentConfig;
use crate::models::user::{User, UserRole};
use crate::utils::errors::{AppError, AppResult};

/// Claims del token de sesión
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionClaims {
    pub sub: i32,
    pub role: String,
    pub organisation_id: Option<i32>,
    pub exp: i64,
    pub iat: i64,
}

impl SessionClaims {
    pub fn role(&self) -> AppResult<UserRole> {
        self.role
            .parse()
            .map_err(|_| AppError::Unauthorized("Invalid role in token".to_string()))
    }
}

/// Emisión y verificación de tokens HS256
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl JwtService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn from_config(config: &EnvironmentConfig) -> Self {
        Self::new(&config.jwt_secret, config.jwt_ttl)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Token con id, rol y organisation del usuario
    pub fn generate_token(&self, user: &User) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            sub: user.id,
            role: user.role.as_str().to_string(),
            organisation_id: user.organisation_id,
            exp: now + self.ttl.as_secs() as i64,
            iat: now,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Error generating token: {}", e)))
    }

    pub fn validate_token(&self, token: &str) -> AppResult<SessionClaims> {
        decode::<SessionClaims>(token, &self.decoding_key, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
            .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: UserRole, organisation_id: Option<i32>) -> User {
        User {
            id: 42,
            first_name: "Amal".to_string(),
            last_name: "Trabelsi".to_string(),
            email: "amal@example.tn".to_string(),
            phone: None,
            password_hash: String::new(),
            role,
            organisation_id,
            profile_image: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_generate_and_validate_token() {
        let service = JwtService::new("secret", Duration::from_secs(3600));
        let token = service
            .generate_token(&user(UserRole::OrganisationManager, Some(5)))
            .unwrap();

        let claims = service.validate_token(&token).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.role().unwrap(), UserRole::OrganisationManager);
        assert_eq!(claims.organisation_id, Some(5));
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let issuer = JwtService::new("secret", Duration::from_secs(3600));
        let verifier = JwtService::new("another-secret", Duration::from_secs(3600));
        let token = issuer.generate_token(&user(UserRole::Admin, None)).unwrap();

        assert!(matches!(verifier.validate_token(&token), Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let service = JwtService::new("secret", Duration::from_secs(3600));
        let token = service.generate_token(&user(UserRole::Client, None)).unwrap();
        let tampered = format!("{}x", token);

        assert!(service.validate_token(&tampered).is_err());
        assert!(service.validate_token("not-a-token").is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let service = JwtService::new("secret", Duration::from_secs(3600));
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            sub: 1,
            role: "CLIENT".to_string(),
            organisation_id: None,
            exp: now - 600,
            iat: now - 4200,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &service.encoding_key).unwrap();

        assert!(service.validate_token(&token).is_err());
    }
}
