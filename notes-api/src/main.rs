mod config;

mod app;
mod auth;
mod ctx;
mod db;
mod errors;
mod extract;
mod notes;
mod shared;
mod state;

use std::{net::SocketAddr, sync::Arc};

use app::AppParams;
use auth::TokenCodec;
use config::Config;
pub use db::{init_db, DB};
pub use errors::{Error, Result};
use state::AppState;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> errors::Result<()> {
    let config = Config::from_env()?;

    shared::tracing::setup_tracing(config.log_json);

    let conn = init_db(&config.database_url).await?;
    let tokens = TokenCodec::from_config(&config)?;

    let port = config.port;
    let state = AppState {
        conn,
        tokens,
        config: Arc::new(config),
    };

    let app = app::create(AppParams {
        state,
        router: notes::router,
    });
    let app = shared::tracing::add_tracing_layer(app);

    let listener = TcpListener::bind(format!("127.0.0.1:{port}")).await?;

    tracing::info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;

    Ok(())
}
