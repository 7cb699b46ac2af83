use axum::http::{HeaderMap, HeaderName};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::{config::Config, notes::UserId};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("missing token")]
    MissingToken,
    #[error("invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
    #[error("token lifetime out of range: {0} hours")]
    InvalidTtl(i64),
    #[error("token expiry out of range")]
    ExpiryOutOfRange,
    #[error("invalid auth header name")]
    InvalidHeaderName(#[from] axum::http::header::InvalidHeaderName),
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct TokenUser {
    pub id: UserId,
}

/// Token payload, `{"user": {"id": ..}, "iat": .., "exp": ..}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user: TokenUser,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and decodes the HS256 tokens that identify callers.
#[derive(Clone)]
pub struct TokenCodec {
    header: HeaderName,
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("header", &self.header)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    pub fn new(header: &str, secret: &[u8], ttl: Duration) -> Result<Self> {
        Ok(Self {
            header: HeaderName::try_from(header)?,
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let hours = config.token_ttl_hours;
        let ttl = Duration::try_hours(hours)
            .filter(|ttl| *ttl > Duration::zero())
            .ok_or(Error::InvalidTtl(hours))?;

        Self::new(&config.auth_header, config.jwt_secret.as_bytes(), ttl)
    }

    pub fn header(&self) -> &HeaderName {
        &self.header
    }

    pub fn issue(&self, user_id: UserId) -> Result<String> {
        let now = Utc::now();
        let exp = now.checked_add_signed(self.ttl).ok_or(Error::ExpiryOutOfRange)?;
        let claims = Claims {
            user: TokenUser { id: user_id },
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    pub fn decode(&self, token: &str) -> Result<UserId> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())?;
        Ok(data.claims.user.id)
    }

    /// Reads the token from the configured header. `Bearer ` prefix is optional.
    pub fn token_from_headers<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str> {
        let value = headers.get(&self.header)?.to_str().ok()?.trim();
        let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();

        (!token.is_empty()).then_some(token)
    }
}
