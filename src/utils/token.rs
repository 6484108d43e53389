// src/utils/token.rs

use std::time::{SystemTime, UNIX_EPOCH};

use axum::http::{HeaderMap, HeaderValue, header};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{error::AppError, models::difficulty::Difficulty};

/// Name of the cookie remembering the last chosen difficulty.
pub const DIFFICULTY_COOKIE: &str = "quiz_difficulty";

/// Claims of the difficulty token.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DifficultyClaims {
    pub difficulty: Difficulty,
    /// Expiration time as Unix timestamp.
    pub exp: usize,
}

/// Signs a token remembering `difficulty` for `expiration_seconds`.
pub fn sign_difficulty_token(
    difficulty: Difficulty,
    secret: &str,
    expiration_seconds: u64,
) -> Result<String, AppError> {
    let expiration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .as_secs() as usize
        + expiration_seconds as usize;

    let claims = DifficultyClaims {
        difficulty,
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(e.to_string()))
}

/// Verifies a difficulty token and returns the remembered tier.
pub fn verify_difficulty_token(token: &str, secret: &str) -> Result<Difficulty, AppError> {
    let token_data = decode::<DifficultyClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims.difficulty)
}

/// `Set-Cookie` value carrying the difficulty token.
pub fn difficulty_cookie(token: &str, max_age_seconds: u64) -> Result<HeaderValue, AppError> {
    HeaderValue::from_str(&format!(
        "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
        DIFFICULTY_COOKIE, token, max_age_seconds
    ))
    .map_err(|e| AppError::InternalServerError(e.to_string()))
}

/// Finds cookie `name` across all `Cookie` headers.
pub fn read_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}
