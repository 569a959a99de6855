//! The identity provider: registration, login, and session tokens.
//!
//! Passwords are hashed with Argon2id and stored as PHC strings. Session
//! tokens are HS256 JWTs with a fixed expiry; the format is private to this
//! module, so the rest of the crate (and the engine) only ever handles
//! opaque strings. There is no refresh or revocation.

use std::time::Duration;

use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use sea_orm::{ActiveModelTrait, ActiveValue, ColumnTrait, Condition, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use api_types::auth::{AuthResponse, LoginRequest, RegisterRequest, UserView};
use engine::EngineError;

use crate::{ServerError, required_text, server::ServerState, user};

/// Default session lifetime: 24 hours.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("missing credentials")]
    MissingCredentials,
    #[error("invalid username or password")]
    BadCredentials,
    #[error("invalid or expired token")]
    InvalidToken,
    /// Never shown to clients; logged and surfaced as a 500.
    #[error("{0}")]
    Internal(String),
}

#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: Vec<u8>,
    pub token_ttl: Duration,
}

/// Signs and validates session tokens.
pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_ttl: Duration,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub username: String,
    pub iat: usize,
    pub exp: usize,
}

pub struct IssuedToken {
    pub token: String,
    /// Seconds until expiry.
    pub expires_in: u64,
}

impl AuthManager {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        Self {
            encoding_key: EncodingKey::from_secret(&config.jwt_secret),
            decoding_key: DecodingKey::from_secret(&config.jwt_secret),
            validation,
            token_ttl: config.token_ttl,
        }
    }

    pub fn issue_token(&self, user_id: &str, username: &str) -> Result<IssuedToken, AuthError> {
        let iat = Utc::now().timestamp();
        let exp = iat + self.token_ttl.as_secs() as i64;
        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            iat: iat as usize,
            exp: exp as usize,
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|err| AuthError::Internal(format!("failed to sign token: {err}")))?;

        Ok(IssuedToken {
            token,
            expires_in: self.token_ttl.as_secs(),
        })
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| AuthError::InvalidToken)
    }
}

fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| AuthError::Internal(format!("failed to hash password: {err}")))
}

fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|err| AuthError::Internal(format!("stored password hash is invalid: {err}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

fn user_view(user: &user::Model) -> UserView {
    UserView {
        id: user.id.clone(),
        username: user.username.clone(),
        email: user.email.clone(),
    }
}

pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ServerError> {
    let username = user::canonical_username(&required_text(payload.username, "username")?);
    let email = user::canonical_email(&required_text(payload.email, "email")?);
    let password = required_text(payload.password, "password")?;

    let taken = user::Entity::find()
        .filter(
            Condition::any()
                .add(user::Column::Username.eq(&username))
                .add(user::Column::Email.eq(&email)),
        )
        .one(&state.db)
        .await
        .map_err(EngineError::from)?;
    if taken.is_some() {
        return Err(ServerError::Conflict(
            "username or email already in use".to_string(),
        ));
    }

    let model = user::ActiveModel {
        id: ActiveValue::Set(Uuid::new_v4().to_string()),
        username: ActiveValue::Set(username),
        email: ActiveValue::Set(email),
        password_hash: ActiveValue::Set(hash_password(&password)?),
        created_at: ActiveValue::Set(Utc::now()),
    };
    let user = model.insert(&state.db).await.map_err(EngineError::from)?;
    tracing::info!("registered user {}", user.username);

    let issued = state.auth.issue_token(&user.id, &user.username)?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: user_view(&user),
            token: issued.token,
            expires_in: issued.expires_in,
        }),
    ))
}

pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ServerError> {
    let username = user::canonical_username(&required_text(payload.username, "username")?);
    let password = required_text(payload.password, "password")?;

    // Unknown user and wrong password are indistinguishable to the caller.
    let user = user::Entity::find()
        .filter(user::Column::Username.eq(&username))
        .one(&state.db)
        .await
        .map_err(EngineError::from)?
        .ok_or(AuthError::BadCredentials)?;

    if !verify_password(&password, &user.password_hash)? {
        return Err(AuthError::BadCredentials.into());
    }

    let issued = state.auth.issue_token(&user.id, &user.username)?;
    Ok(Json(AuthResponse {
        user: user_view(&user),
        token: issued.token,
        expires_in: issued.expires_in,
    }))
}
