use crate::models::{Claims, User};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use std::env;

const DEFAULT_SECRET: &str = "coco-dev-secret-change-this-in-production";

/// Token lifetime in hours
const TOKEN_TTL_HOURS: i64 = 24;

fn get_secret() -> String {
    env::var("JWT_SECRET").unwrap_or_else(|_| DEFAULT_SECRET.to_string())
}

/// Build the claims for a freshly authenticated user
pub fn claims_for(user: &User) -> Claims {
    Claims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        role: user.role,
        exp: (Utc::now() + chrono::Duration::hours(TOKEN_TTL_HOURS)).timestamp() as usize,
    }
}

pub fn create_token(claims: &Claims) -> Result<String, jsonwebtoken::errors::Error> {
    let secret = get_secret();
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn validate_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let secret = get_secret();
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}
