use std::sync::Arc;

use bookmarks::auth::StaticBearerToken;
use bookmarks::config::{Cli, Config, default_config_dir, default_config_path, load_env_file};
use bookmarks::handler::{AppState, app};
use bookmarks::store;
use clap::Parser;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // a missing .env is fine, the variables may come from the real environment
    let dotenv = load_env_file(std::path::Path::new(".env"));
    let args = Cli::parse();

    // With --config the data (database file) lives next to the config file,
    // otherwise both live under ~/.bookmarks/
    let (config_path, data_dir) = match args.config_path {
        Some(path) => {
            let path = std::path::PathBuf::from(path);
            let dir = path
                .parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| std::path::PathBuf::from("."));
            (path, dir)
        }
        None => (default_config_path(), default_config_dir()),
    };

    if let Err(e) = std::fs::create_dir_all(&data_dir) {
        eprintln!("failed to create data directory {:?}: {}", data_dir, e);
        std::process::exit(1);
    }

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    tracing::info!("bookmarks.svc starting");
    if let Err(e) = dotenv {
        tracing::debug!("no .env file loaded: {}", e);
    }

    let cfg = Config::new(&config_path.to_string_lossy()).unwrap_or_else(|e| {
        tracing::error!(error = %e, path = ?config_path, "failed to load config file");
        std::process::exit(1);
    });
    let store = store::open(&cfg.store, &data_dir).await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to setup bookmark store");
        std::process::exit(1);
    });

    let state = AppState {
        store,
        credentials: Arc::new(StaticBearerToken::new(cfg.app.get_api_token())),
        environment: cfg.app.environment,
    };

    let address = format!("0.0.0.0:{}", cfg.app.get_port());
    let listener = tokio::net::TcpListener::bind(&address).await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to setup tcp listener");
        std::process::exit(1);
    });

    let cancellation_token = CancellationToken::new();
    let shutdown_token = cancellation_token.clone();
    tokio::spawn(async move {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl+c");
            return;
        }
        tracing::info!("ctrl+c signal received, preparing to shutdown");
        shutdown_token.cancel();
    });

    tracing::info!(environment = ?cfg.app.environment, "bookmarks.svc running on {}", &address);
    let server = axum::serve(listener, app(state)).with_graceful_shutdown(cancellation_token.cancelled_owned());
    if let Err(err) = server.await {
        tracing::error!(error = %err, "server exited with error");
        std::process::exit(1);
    }

    tracing::info!("bookmarks.svc going off, graceful shutdown complete");
}
