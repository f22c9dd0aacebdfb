//! Assessment funnel server entry point

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use funnel_config::{constants, load_settings, DomainConfig, Settings};
use funnel_persistence::FileAdminSessionStore;
use funnel_server::{create_router, init_metrics, AppState};

/// Interval between idle-session sweeps
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Priority: env vars > config/{env}.yaml > config/default.yaml > defaults
    let env = std::env::var("FUNNEL_ENV").ok();
    let config = match load_settings(env.as_deref()) {
        Ok(settings) => {
            // Tracing not yet initialized, use eprintln for early logging
            eprintln!(
                "Loaded configuration (env: {})",
                env.as_deref().unwrap_or("default")
            );
            settings
        }
        Err(e) => {
            eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
            Settings::default()
        }
    };

    init_tracing(&config);

    tracing::info!("Starting assessment funnel server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        environment = ?config.environment,
        config_path = env.as_deref().unwrap_or("default"),
        "Configuration loaded"
    );

    let _metrics_handle = init_metrics();
    tracing::info!("Initialized Prometheus metrics at /metrics");

    let domain = DomainConfig::load_dir(&config.domain_config_dir)?;
    tracing::info!(
        dir = %config.domain_config_dir,
        questions = domain.questions.questions.len(),
        "Loaded domain configuration"
    );

    let state = match &config.admin_session_path {
        Some(path) => {
            tracing::info!(path = %path, "Using file-backed admin session store");
            let store = FileAdminSessionStore::open(path, constants::admin::SESSION_FLAG_KEY)
                .map_err(|e| anyhow::anyhow!("failed to open admin session store: {e}"))?;
            AppState::with_admin_session_store(config.clone(), domain, Arc::new(store))?
        }
        None => {
            tracing::info!("Using in-memory admin session store");
            AppState::new(config.clone(), domain)?
        }
    };

    spawn_session_sweeper(state.clone());

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Periodically drop funnel sessions idle past the configured timeout
fn spawn_session_sweeper(state: AppState) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SWEEP_INTERVAL);
        // The first tick fires immediately; skip it
        ticker.tick().await;
        loop {
            ticker.tick().await;
            state.sessions.sweep_expired(state.session_idle_timeout());
        }
    });
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}

/// Initialize tracing with an env-filter and optional JSON output
fn init_tracing(config: &Settings) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "funnel=info,funnel_server=info,tower_http=debug".into());

    let json_output = config.environment.is_production();
    let subscriber = tracing_subscriber::registry().with(env_filter);
    if json_output {
        subscriber
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        subscriber.with(tracing_subscriber::fmt::layer()).init();
    }
}
