//! Authentication middleware
//!
//! JWT authentication and role-based access control middleware

use axum::{
    extract::Request,
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use shared::models::{Role, StaffIdentity};

use crate::error::{AppError, ErrorResponse};

/// Authenticated user information extracted from JWT
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: uuid::Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl AuthUser {
    /// Identity object handed to cart and order operations
    pub fn identity(&self) -> StaffIdentity {
        StaffIdentity {
            id: self.user_id,
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }

    /// Check if the user holds one of the given roles
    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.contains(&self.role)
    }
}

/// Authentication middleware that validates JWT tokens
/// Note: This middleware extracts and validates the JWT token from the Authorization header.
/// The actual token validation is done inline to avoid state dependency issues.
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    // Extract Authorization header
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) if header.starts_with("Bearer ") => &header[7..],
        _ => {
            return unauthorized_response("Missing or invalid Authorization header");
        }
    };

    // Decode and validate JWT token
    // Get JWT secret from environment (fallback for middleware without state)
    let jwt_secret = std::env::var("INDENT__JWT__SECRET")
        .or_else(|_| std::env::var("INDENT_JWT_SECRET"))
        .unwrap_or_else(|_| "development-secret-key".to_string());

    let claims = match decode_jwt(token, &jwt_secret) {
        Ok(claims) => claims,
        Err(err) => return err.into_response(),
    };

    // Parse identity fields from claims
    let user_id = match uuid::Uuid::parse_str(&claims.sub) {
        Ok(id) => id,
        Err(_) => return unauthorized_response("Invalid user ID in token"),
    };

    let role = match claims.role.parse::<Role>() {
        Ok(role) => role,
        Err(_) => return unauthorized_response("Invalid role in token"),
    };

    // Create AuthUser and insert into request extensions
    let auth_user = AuthUser {
        user_id,
        name: claims.name,
        email: claims.email,
        role,
    };

    request.extensions_mut().insert(auth_user);

    next.run(request).await
}

/// JWT claims structure
#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct Claims {
    sub: String,
    name: String,
    email: String,
    role: String,
    exp: i64,
    iat: i64,
}

/// Decode and validate JWT token
fn decode_jwt(token: &str, secret: &str) -> Result<Claims, AppError> {
    use jsonwebtoken::{decode, errors::ErrorKind, DecodingKey, Validation};

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AppError::TokenExpired,
        _ => AppError::InvalidToken,
    })
}

/// Create unauthorized response
fn unauthorized_response(message: &str) -> Response {
    AppError::Unauthorized(message.to_string()).into_response()
}

/// Extractor for authenticated user
/// Use this in handlers to get the current user
#[derive(Clone, Debug)]
pub struct CurrentUser(pub AuthUser);

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| {
                let error = ErrorResponse {
                    error: crate::error::ErrorDetail {
                        code: "UNAUTHORIZED".to_string(),
                        message: "Authentication required".to_string(),
                        field: None,
                    },
                };
                (StatusCode::UNAUTHORIZED, Json(error))
            })
    }
}

/// Role guard for use in handlers
/// Returns an error if the user's role is not one of the allowed roles
pub fn require_role(user: &AuthUser, allowed: &[Role]) -> Result<(), crate::error::AppError> {
    if user.has_any_role(allowed) {
        Ok(())
    } else {
        let allowed_names: Vec<&str> = allowed.iter().map(|r| r.as_str()).collect();
        Err(crate::error::AppError::Forbidden(format!(
            "Access restricted to roles: {}",
            allowed_names.join(", ")
        )))
    }
}
