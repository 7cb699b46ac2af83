use axum::{
    extract::{Extension, FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};

use crate::{auth, auth::TokenCodec, notes::UserId, Error, DB};

#[derive(Clone, Debug, FromRequestParts)]
pub struct BaseParams {
    pub ctx: Ctx,
    #[from_request(via(Extension))]
    pub db: DB,
}

impl BaseParams {
    pub fn new(db: DB, ctx: Ctx) -> Self {
        Self { db, ctx }
    }
}

/// Caller identity, attached to the request by [`authenticate`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ctx {
    pub user_id: UserId,
}

impl Ctx {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }
}

impl<S> FromRequestParts<S> for Ctx
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Ctx>().copied().ok_or(Error::Unauthenticated)
    }
}

pub async fn authenticate(State(tokens): State<TokenCodec>, mut request: Request, next: Next) -> crate::Result<Response> {
    let token = tokens
        .token_from_headers(request.headers())
        .ok_or(auth::Error::MissingToken)?;
    let user_id = tokens.decode(token)?;

    tracing::debug!(%user_id, "authenticated");
    request.extensions_mut().insert(Ctx::new(user_id));

    Ok(next.run(request).await)
}
