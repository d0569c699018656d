use crate::config::JwtConfig;
use crate::user::UserId;
use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::Deserialize;
use serde::Serialize;

/// Issues and validates the HS256 tokens that carry a user's identity. Holds no per-token state,
/// so expiry is the only way a token stops being accepted.
#[derive(Clone)]
pub struct JWTAuth {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    audience: String,
    expire_seconds: i64,
}

#[derive(Serialize, Deserialize)]
struct Claims {
    sub: String,
    name: String,
    email: String,
    iss: String,
    aud: String,
    iat: i64,
    exp: i64,
}

/// Token lifetime in seconds for `days`, or `None` if an expiry that far out cannot be represented.
pub fn ttl_seconds(days: u64) -> Option<i64> {
    let seconds = i64::try_from(days)
        .ok()?
        .checked_mul(JWTAuth::SECONDS_PER_DAY)?;
    Utc::now().timestamp().checked_add(seconds)?;
    Some(seconds)
}

impl JWTAuth {
    const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

    pub fn from_config(config: &JwtConfig) -> JWTAuth {
        let secret = config.secret.as_bytes();
        JWTAuth {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            expire_seconds: ttl_seconds(config.token_ttl_days).unwrap_or(i64::MAX),
        }
    }

    pub fn create_token(
        &self,
        user_id: UserId,
        name: &str,
        email: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            name: name.to_owned(),
            email: email.to_owned(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now,
            exp: now.saturating_add(self.expire_seconds),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
    }

    /// Checks signature, expiry, issuer and audience and returns the user id from `sub`.
    pub fn validate_token(&self, token: &str) -> Result<UserId, jsonwebtoken::errors::Error> {
        let claims = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation())?;
        claims
            .claims
            .sub
            .parse()
            .map_err(|_| ErrorKind::InvalidSubject.into())
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation
    }
}
