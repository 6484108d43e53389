// src/main.rs

use dotenvy::dotenv;
use quiz_backend::config::Config;
use quiz_backend::quiz::engine::run_session_reaper;
use quiz_backend::quiz::source::DirectorySource;
use quiz_backend::routes;
use quiz_backend::state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let (config, config_warnings) = Config::load();

    let file_appender = tracing_appender::rolling::daily("logs", "quiz.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    for warning in &config_warnings {
        tracing::warn!("{}", warning);
    }

    tracing::info!(
        "Loading question banks from {}",
        config.questions_dir.display()
    );
    let source = Arc::new(DirectorySource::new(&config.questions_dir));
    let state = AppState::new(config.clone(), source);

    // Evict abandoned sessions in the background
    let reaper = tokio::spawn(run_session_reaper(
        state.engine.clone(),
        config.sweep_interval(),
        config.idle_timeout(),
    ));

    // Create the Axum application router
    let app = routes::create_router(state);

    // Bind to the listening address
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Quiz server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listening address");

    // Start the server
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    reaper.abort();
    tracing::info!("Server stopped");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {:?}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
