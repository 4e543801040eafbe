use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// Claims of a bearer token issued by the identity provider.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Opaque user id
    pub exp: usize,  // Expiration timestamp
}

/// Sign a token for `user_id`, valid for `ttl`.
pub fn sign(user_id: &str, secret: &str, ttl: Duration) -> jsonwebtoken::errors::Result<String> {
    let claims = Claims {
        sub: user_id.to_owned(),
        exp: (Utc::now() + ttl).timestamp().max(0) as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Verify signature and expiry, returning the decoded claims.
pub fn verify(token: &str, secret: &str) -> jsonwebtoken::errors::Result<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}
