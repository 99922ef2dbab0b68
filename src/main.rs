use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use wishwall_server::config::{generate_config_template, Config};
use wishwall_server::{db, polls, quotes, routes, state, wishes, ws};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load config with layered precedence: defaults < TOML < env < CLI
    let config = Config::load()?;

    // Handle --generate-config: print template and exit
    if config.generate_config {
        print!("{}", generate_config_template());
        return Ok(());
    }

    // Initialize tracing/logging
    if config.json_logs {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "wishwall_server=info".parse().unwrap()),
            )
            .init();
    } else {
        tracing_subscriber::fmt()
            .pretty()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "wishwall_server=info".parse().unwrap()),
            )
            .init();
    }

    tracing::info!("Wishwall server v{} starting", env!("CARGO_PKG_VERSION"));

    // Initialize SQLite database for the durable collaborators
    let db = db::init_db(&config.data_dir)?;
    polls::seed_poll_counters(&db)?;
    quotes::seed::seed_default_quotes(&db)?;

    // Rolling wish store plus its periodic age-based eviction task
    let wish_store = Arc::new(wishes::store::WishStore::new(config.max_wishes));
    wishes::retention::spawn_eviction_task(
        wish_store.clone(),
        config.retention_secs,
        config.eviction_interval_secs,
    );

    let connections = ws::new_connection_registry();

    let app_state = state::AppState {
        db,
        wishes: wish_store,
        connections: connections.clone(),
        session_timeout_secs: config.session_timeout_secs,
        max_message_chars: config.max_message_chars,
        max_wishes: config.max_wishes,
        cors_origins: config.cors_origins.clone(),
    };

    let app = routes::build_router(app_state);

    // Bind and serve
    let addr = format!("{}:{}", config.bind_address, config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal(connections))
    .await?;

    Ok(())
}

/// Wait for SIGINT/SIGTERM, then tell every push connection we are going
/// away so their supervisors can wind down.
async fn shutdown_signal(connections: ws::ConnectionRegistry) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, shutting down");
        }
    }

    ws::broadcast::close_all(&connections, ws::CLOSE_GOING_AWAY, "Server shutting down");
}
