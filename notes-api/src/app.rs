use std::sync::Arc;

use axum::{
    extract::State,
    middleware::{self},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use rand::Rng;
use serde_json::json;
use tower::ServiceBuilder;

use crate::{config::Config, errors::on_error, state::AppState};

pub struct AppParams<R>
where
    R: FnOnce(AppState) -> Router,
{
    pub state: AppState,
    pub router: R,
}

pub fn create<R>(AppParams { state, router }: AppParams<R>) -> Router
where
    R: FnOnce(AppState) -> Router,
{
    let ops = Router::new()
        .route("/__version__", get(version))
        .route("/__heartbeat__", get(heartbeat))
        .route("/__lbheartbeat__", get(lbheartbeat))
        .with_state(state.clone());

    ops.merge(router(state.clone())).layer(
        ServiceBuilder::new()
            .layer(Extension(state.conn))
            .layer(middleware::from_fn(on_error)),
    )
}

async fn version(State(config): State<Arc<Config>>) -> impl IntoResponse {
    Json(json!({
        "source" : config.source,
        "version": config.version,
        "commit" : config.git_commit,
        "build"  : config.pipeline_id
    }))
}

async fn heartbeat() -> impl IntoResponse {
    let mut rng = rand::thread_rng();
    let random: u32 = rng.gen_range(0..=10000);

    Json(json!({
        "status" : "ok",
        "random": random,
    }))
}

async fn lbheartbeat() -> impl IntoResponse {
    ""
}
