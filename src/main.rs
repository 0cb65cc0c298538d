use helpdesk_console::bootstrap;
use helpdesk_console::config::Config;
use helpdesk_console::infrastructure::http::router::build_router;
use helpdesk_console::infrastructure::observability;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing and metrics
    let _guard = observability::init(&config).map_err(|e| anyhow::anyhow!(e.to_string()))?;
    tracing::info!("Configuration loaded");

    // Build application state
    let state = bootstrap::build_app_state(&config)?;
    bootstrap::warm_vocabulary(&state).await;

    // Build router
    let app = build_router(state);

    // Start server
    let addr = config.server_address();
    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
