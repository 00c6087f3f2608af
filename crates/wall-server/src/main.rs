mod config;

use std::net::SocketAddr;

use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use wall_api::AppStateInner;
use wall_db::{Database, migrations};

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "wall=debug,wall_server=debug,wall_api=debug,wall_db=info,tower_http=debug".into()
            }),
        )
        .init();

    let config = Config::from_env()?;

    // Schema resources; an unreadable directory is fatal
    let resources = match &config.migrations_dir {
        Some(dir) => {
            info!("Loading schema resources from {}", dir.display());
            migrations::load_dir(dir)?
        }
        None => migrations::embedded(),
    };

    // Init database (applies schema before anything is served)
    let db = Database::open(&config.db_path, &resources, config.store)?;
    let state = AppStateInner::new(db);

    let app = wall_api::router(state)
        .nest_service("/static", ServeDir::new(&config.static_dir))
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::new(config.host.parse()?, config.port);
    info!("Wall server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
