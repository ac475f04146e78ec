//! Exam Clock - A multi-timer countdown server for supervising timed examinations
//! 
//! This is the main entry point for the exam-clock application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use exam_clock::{
    config::Config,
    state::AppState,
    api::create_router,
    tasks::wall_clock_task,
    utils::shutdown_signal,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("exam_clock={},tower_http=info", config.log_level()))
        .init();

    info!("Starting exam-clock server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, countdown={}min, exam warning={}min", 
          config.host, config.port, config.minutes, config.exam_warning_minutes);

    // Create application state
    let state = Arc::new(AppState::new(&config));

    // Start the wall-clock refresh task
    let clock_state = Arc::clone(&state);
    let clock_task = tokio::spawn(async move {
        wall_clock_task(clock_state).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;
    
    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET    /exams            - Exam snapshot and display order");
    info!("  POST   /exams            - Add an exam");
    info!("  PATCH  /exams/:id        - Edit an idle exam");
    info!("  DELETE /exams/:id        - Remove an exam");
    info!("  POST   /exams/start      - Start all idle exams");
    info!("  POST   /exams/reset      - Reset all exams");
    info!("  GET    /countdown        - Single countdown snapshot");
    info!("  POST   /countdown/start  - Start or resume the countdown");
    info!("  POST   /countdown/pause  - Pause the countdown");
    info!("  POST   /countdown/reset  - Reset the countdown");
    info!("  PUT    /countdown/duration - Set the countdown duration");
    info!("  GET    /status           - Server status");
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

    clock_task.abort();
    state.shutdown();

    info!("Server shutdown complete");
    Ok(())
}
