//! Luplup - a state-managed focus timer service
//!
//! This is the main entry point for the luplup application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use luplup::{
    api::create_router,
    config::Config,
    services::{GeminiClient, Notifier},
    state::AppState,
    tasks::countdown_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("luplup={},tower_http=info", config.log_level()))
        .init();

    info!("Starting luplup v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, focus={}s, short break={}s, long break={}s",
        config.host, config.port, config.focus_secs, config.short_break_secs, config.long_break_secs
    );

    let api_key = config.api_key();
    if api_key.is_none() {
        warn!("GEMINI_API_KEY is not set; AI planning will fall back to manual tasks");
    }
    let generator = Arc::new(GeminiClient::new(api_key, config.model.clone()));

    // Probe the notification capability once at startup
    let notifier = Notifier::probe();

    // Create application state
    let state = Arc::new(
        AppState::new(config.durations(), generator, notifier)
            .with_server_info(config.host.clone(), config.port),
    );

    // Start the countdown driver background task
    let timer_state = Arc::clone(&state);
    tokio::spawn(async move {
        countdown_task(timer_state).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST   /timer/toggle     - Start or pause the countdown");
    info!("  POST   /timer/reset      - Restore the current mode's full duration");
    info!("  POST   /timer/mode/:mode - Switch mode (focus, short-break, long-break)");
    info!("  GET    /tasks            - List session tasks");
    info!("  POST   /tasks            - Add a manual task");
    info!("  POST   /tasks/plan       - Expand a goal into subtasks via Gemini");
    info!("  POST   /tasks/:id/toggle - Flip a task's completed flag");
    info!("  DELETE /tasks/:id        - Remove a task");
    info!("  POST   /sound/toggle     - Mute or unmute completion alerts");
    info!("  GET    /status           - Current timer, ring, and task state");
    info!("  GET    /health           - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
