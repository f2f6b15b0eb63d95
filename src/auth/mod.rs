use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use argon2::password_hash::{SaltString, rand_core::OsRng};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    domain::{Role, User},
    error::{AppError, Result},
};

/// Claims carried by a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies HMAC-signed (HS256) session tokens, and hashes
/// passwords. Tokens are stateless; there is no revocation list.
pub struct AuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_expiry_hours: i64,
}

impl AuthService {
    pub fn new(secret: &str, token_expiry_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_expiry_hours,
        }
    }

    pub fn issue_token(&self, user: &User) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            user_id: user.id,
            email: user.email.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: (now + Duration::hours(self.token_expiry_hours)).timestamp(),
        };

        self.encode_claims(&claims)
    }

    fn encode_claims(&self, claims: &Claims) -> Result<String> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Token signing failed: {}", e)))
    }

    /// Decodes a token, checking signature and expiry. Any failure is
    /// reported as `Unauthorized`.
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Rejected bearer token: {}", e);
                AppError::Unauthorized
            })
    }

    /// Argon2 is CPU-bound, so both password operations run on the
    /// blocking pool.
    pub async fn verify_password(password: &str, hash: &str) -> Result<bool> {
        let password = password.to_owned();
        let hash = hash.to_owned();

        tokio::task::spawn_blocking(move || -> Result<bool> {
            let parsed_hash = PasswordHash::new(&hash)
                .map_err(|e| AppError::Internal(format!("Invalid password hash: {}", e)))?;

            Ok(Argon2::default()
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok())
        })
        .await
        .map_err(|e| AppError::Internal(format!("Password verification task failed: {}", e)))?
    }

    pub async fn hash_password(password: &str) -> Result<String> {
        let password = password.to_owned();

        tokio::task::spawn_blocking(move || -> Result<String> {
            let salt = SaltString::generate(&mut OsRng);

            Argon2::default()
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
        })
        .await
        .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserStatus;

    fn sample_user(role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            first_name: "Dana".to_string(),
            last_name: "Reyes".to_string(),
            email: "dana@example.com".to_string(),
            phone: None,
            role,
            status: UserStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_token_carries_identity_and_role() {
        let service = AuthService::new("test-secret", 24);
        let user = sample_user(Role::Admin);

        let token = service.issue_token(&user).unwrap();
        let claims = service.verify_token(&token).unwrap();

        assert_eq!(claims.user_id, user.id);
        assert_eq!(claims.email, "dana@example.com");
        assert_eq!(claims.role, Role::Admin);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let issuer = AuthService::new("secret-a", 24);
        let verifier = AuthService::new("secret-b", 24);

        let token = issuer.issue_token(&sample_user(Role::Volunteer)).unwrap();
        assert!(matches!(verifier.verify_token(&token), Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let service = AuthService::new("test-secret", 24);
        let now = Utc::now();
        let claims = Claims {
            user_id: Uuid::new_v4(),
            email: "old@example.com".to_string(),
            role: Role::Volunteer,
            iat: (now - Duration::hours(3)).timestamp(),
            exp: (now - Duration::hours(2)).timestamp(),
        };

        let token = service.encode_claims(&claims).unwrap();
        assert!(matches!(service.verify_token(&token), Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let service = AuthService::new("test-secret", 24);
        assert!(matches!(service.verify_token("not.a.jwt"), Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_password_hashing() {
        let hash = AuthService::hash_password("correct horse").await.unwrap();
        assert!(AuthService::verify_password("correct horse", &hash).await.unwrap());
        assert!(!AuthService::verify_password("wrong horse", &hash).await.unwrap());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_hashing_and_malformed_hash() {
        let (first, second) = tokio::join!(
            AuthService::hash_password("first password"),
            AuthService::hash_password("second password"),
        );
        let (first, second) = (first.unwrap(), second.unwrap());
        assert_ne!(first, second);
        assert!(AuthService::verify_password("second password", &second).await.unwrap());

        let malformed = AuthService::verify_password("anything", "not-a-phc-string").await;
        assert!(matches!(malformed, Err(AppError::Internal(_))));
    }
}
