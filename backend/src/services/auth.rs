//! Authentication service for login, token issuance and user provisioning

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use shared::models::{Role, User};
use shared::validation::{validate_email, validate_name, validate_password};

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db: PgPool,
    jwt_secret: String,
    access_token_expiry: i64,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // User ID
    pub name: String,
    pub email: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Authentication token
#[derive(Debug, Serialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Input for creating a user account
#[derive(Debug, Deserialize)]
pub struct CreateUserInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// User info from database
#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    created_at: chrono::DateTime<Utc>,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(db: PgPool, config: &Config) -> Self {
        Self {
            db,
            jwt_secret: config.jwt.secret.clone(),
            access_token_expiry: config.jwt.access_token_expiry,
        }
    }

    /// Authenticate user with email and password
    pub async fn login(&self, email: &str, password: &str) -> AppResult<AuthTokens> {
        // Find user by email
        let user = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, password_hash, role::TEXT AS role, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

        // Verify password
        let valid = verify(password, &user.password_hash)
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))?;

        if !valid {
            return Err(AppError::InvalidCredentials);
        }

        let role: Role = user
            .role
            .parse()
            .map_err(|_| AppError::Internal(format!("Unknown role stored for user {}", user.id)))?;

        self.generate_tokens(user.id, &user.name, &user.email, role)
    }

    /// Create a user account (super-admin operation)
    pub async fn create_user(&self, input: CreateUserInput) -> AppResult<User> {
        if let Err(msg) = validate_name(&input.name) {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: msg.to_string(),
            });
        }
        if let Err(msg) = validate_email(&input.email) {
            return Err(AppError::Validation {
                field: "email".to_string(),
                message: msg.to_string(),
            });
        }
        if let Err(msg) = validate_password(&input.password) {
            return Err(AppError::Validation {
                field: "password".to_string(),
                message: msg.to_string(),
            });
        }

        // Hash password
        let password_hash = hash(&input.password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        let row = sqlx::query_as::<_, (Uuid, chrono::DateTime<Utc>)>(
            r#"
            INSERT INTO users (name, email, password_hash, role)
            VALUES ($1, $2, $3, $4::user_role)
            RETURNING id, created_at
            "#,
        )
        .bind(input.name.trim())
        .bind(&input.email)
        .bind(&password_hash)
        .bind(input.role.as_str())
        .fetch_one(&self.db)
        .await
        .map_err(|e| AppError::conflict_on_unique(e, "email"))?;

        Ok(User {
            id: row.0,
            name: input.name.trim().to_string(),
            email: input.email,
            role: input.role,
            created_at: row.1,
        })
    }

    /// Look up a user by id
    pub async fn get_user(&self, user_id: Uuid) -> AppResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, password_hash, role::TEXT AS role, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_string()))?;

        let role: Role = row
            .role
            .parse()
            .map_err(|_| AppError::Internal(format!("Unknown role stored for user {}", row.id)))?;

        Ok(User {
            id: row.id,
            name: row.name,
            email: row.email,
            role,
            created_at: row.created_at,
        })
    }

    /// Generate an access token for the user
    fn generate_tokens(
        &self,
        user_id: Uuid,
        name: &str,
        email: &str,
        role: Role,
    ) -> AppResult<AuthTokens> {
        let now = Utc::now();
        let access_exp = now + Duration::seconds(self.access_token_expiry);

        let claims = Claims {
            sub: user_id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            role: role.as_str().to_string(),
            exp: access_exp.timestamp(),
            iat: now.timestamp(),
        };

        let access_token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;

        Ok(AuthTokens {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_expiry,
        })
    }
}
