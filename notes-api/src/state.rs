use std::sync::Arc;

use axum::extract::FromRef;

use crate::{auth::TokenCodec, config::Config, db::DB};

#[derive(FromRef, Clone)]
pub struct AppState {
    pub conn: DB,
    pub tokens: TokenCodec,
    pub config: Arc<Config>,
}
