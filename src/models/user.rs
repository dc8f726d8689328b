//! User model, JWT claims and capability checks

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::error::AppError;

/// Library user (patron or librarian) from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i32,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub can_mark_returned: bool,
    pub can_alter_authors: bool,
    pub can_alter_books: bool,
}

/// Capabilities carried in the JWT token
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct UserPermissions {
    /// Renew loans and see every reserved copy
    pub can_mark_returned: bool,
    /// Create, update and delete authors
    pub can_alter_authors: bool,
    /// Create, update and delete books and copies
    pub can_alter_books: bool,
}

impl From<&User> for UserPermissions {
    fn from(user: &User) -> Self {
        Self {
            can_mark_returned: user.can_mark_returned,
            can_alter_authors: user.can_alter_authors,
            can_alter_books: user.can_alter_books,
        }
    }
}

/// JWT Claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i32,
    pub permissions: UserPermissions,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    // Capability checks

    pub fn require_mark_returned(&self) -> Result<(), AppError> {
        if self.permissions.can_mark_returned {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Missing can_mark_returned permission".to_string(),
            ))
        }
    }

    pub fn require_alter_authors(&self) -> Result<(), AppError> {
        if self.permissions.can_alter_authors {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Missing can_alter_authors permission".to_string(),
            ))
        }
    }

    pub fn require_alter_books(&self) -> Result<(), AppError> {
        if self.permissions.can_alter_books {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Missing can_alter_books permission".to_string(),
            ))
        }
    }
}
