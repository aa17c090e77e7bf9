use anyhow::Result;
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;

use lottery_lib::http_handler::{AppState, router};
use lottery_lib::{api, config, connection};

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    tracing::info!("Let's roll your lottery numbers.");

    let db_conn = connection::conn(&config.database_url)?;
    let db = Arc::new(Mutex::new(db_conn));

    if let Some(upto) = config.sync_rounds {
        match api::sync_draws(&db, upto).await {
            Ok(0) => tracing::info!("draw data already up to date"),
            Ok(n) => tracing::info!("synced {} new draws", n),
            Err(e) => tracing::warn!("draw sync failed: {}", e),
        }
    }

    let state = AppState::new(db);
    let app = router(state, &config.static_dir);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("listening on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
