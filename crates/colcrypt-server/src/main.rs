mod config;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use colcrypt_api::{AppState, AppStateInner};
use colcrypt_crypto::ColumnCipher;
use colcrypt_crypto::keys::generate_column_key;
use colcrypt_db::Database;

use crate::config::{COLUMN_KEY, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "colcrypt=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;

    let key = match config.column_key.clone() {
        Some(key) => key,
        None => {
            warn!(
                "{} not set; using an ephemeral column key. Previously stored ciphertext will not decrypt.",
                COLUMN_KEY
            );
            generate_column_key()
        }
    };
    let cipher = ColumnCipher::new(&key);

    // Init database
    let db = if config.in_memory() {
        Database::open_in_memory(cipher)?
    } else {
        Database::open(&config.db_path, cipher)?
    };

    if config.seed {
        colcrypt_db::seed::run(&db)?;
    }

    let state: AppState = Arc::new(AppStateInner { db });

    let app = Router::new()
        .merge(colcrypt_api::routes(state))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    info!("colcrypt server listening on {}", config.addr);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
