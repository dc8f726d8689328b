//! Authentication service

use argon2::{
    password_hash::{PasswordHash, PasswordVerifier},
    Argon2,
};
use chrono::Utc;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{User, UserClaims, UserPermissions},
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Authenticate by username and password, returning a JWT token and the user
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<(String, User)> {
        let user = self
            .repository
            .users
            .get_by_username(username)
            .await?
            .ok_or_else(|| {
                AppError::Authentication("Invalid username or password".to_string())
            })?;

        if !self.verify_password(&user, password)? {
            return Err(AppError::Authentication(
                "Invalid username or password".to_string(),
            ));
        }

        let token = self.create_token_for_user(&user)?;
        Ok((token, user))
    }

    /// Get the authenticated user's record
    pub async fn me(&self, user_id: i32) -> AppResult<User> {
        self.repository.users.get_by_id(user_id).await
    }

    fn create_token_for_user(&self, user: &User) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let exp = now + (self.config.jwt_expiration_hours as i64 * 3600);

        let claims = UserClaims {
            sub: user.username.clone(),
            user_id: user.id,
            permissions: UserPermissions::from(user),
            exp,
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        match user.password_hash {
            Some(ref hash) => {
                let parsed_hash = PasswordHash::new(hash)
                    .map_err(|e| AppError::Internal(format!("Invalid password hash: {}", e)))?;
                Ok(Argon2::default()
                    .verify_password(password.as_bytes(), &parsed_hash)
                    .is_ok())
            }
            // Account without a password cannot log in
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::password_hash::{rand_core::OsRng, PasswordHasher, SaltString};

    fn user_with_hash(hash: Option<String>) -> User {
        User {
            id: 1,
            username: "librarian".to_string(),
            password_hash: hash,
            first_name: None,
            last_name: None,
            can_mark_returned: true,
            can_alter_authors: false,
            can_alter_books: false,
        }
    }

    fn service() -> AuthService {
        // verify_password never touches the pool
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/locallibrary")
            .unwrap();
        AuthService::new(Repository::new(pool), AuthConfig::default())
    }

    #[tokio::test]
    async fn test_verify_password_matches() {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(b"s3cret", &salt)
            .unwrap()
            .to_string();

        let svc = service();
        let user = user_with_hash(Some(hash));
        assert!(svc.verify_password(&user, "s3cret").unwrap());
        assert!(!svc.verify_password(&user, "wrong").unwrap());
    }

    #[tokio::test]
    async fn test_passwordless_account_rejected() {
        let svc = service();
        let user = user_with_hash(None);
        assert!(!svc.verify_password(&user, "anything").unwrap());
    }

    #[test]
    fn test_claims_round_trip() {
        let claims = UserClaims {
            sub: "librarian".to_string(),
            user_id: 1,
            permissions: UserPermissions {
                can_mark_returned: true,
                can_alter_authors: false,
                can_alter_books: false,
            },
            exp: Utc::now().timestamp() + 3600,
            iat: Utc::now().timestamp(),
        };

        let token = claims.create_token("test-secret").unwrap();
        let decoded = UserClaims::from_token(&token, "test-secret").unwrap();
        assert_eq!(decoded.user_id, 1);
        assert!(decoded.permissions.can_mark_returned);
        assert!(!decoded.permissions.can_alter_books);

        assert!(UserClaims::from_token(&token, "other-secret").is_err());
    }
}
