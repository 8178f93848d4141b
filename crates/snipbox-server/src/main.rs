use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use snipbox_web::{AppState, AppStateInner, app_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "snipbox_server=debug,snipbox_web=debug,snipbox_db=debug,tower_http=debug".into()
            }),
        )
        .init();

    // Config
    let db_path = std::env::var("SNIPBOX_DB_PATH").unwrap_or_else(|_| "snipbox.db".into());
    let host = std::env::var("SNIPBOX_HOST").unwrap_or_else(|_| "127.0.0.1".into());
    let port: u16 = std::env::var("SNIPBOX_PORT")
        .unwrap_or_else(|_| "4000".into())
        .parse()?;

    // Init database (runs migrations)
    let db = Arc::new(snipbox_db::Database::open(&PathBuf::from(&db_path))?);

    // Shared state — one database behind both store capabilities
    let state: AppState = Arc::new(AppStateInner {
        snippets: db.clone(),
        users: db,
    });

    let app = app_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Snipbox listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
