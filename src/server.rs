use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    response::{IntoResponse, Response},
    routing::get,
};
use tokio::{net::TcpListener, signal};
use tower_http::catch_panic::CatchPanicLayer;
use tracing::info;

use crate::config::ServeArgs;
use crate::dataset::Dataset;
use crate::error::{SearchError, StartupError};
use crate::handlers::{health_handler, metrics_handler, search_handler};
use crate::metrics::{self, SEARCH_REQUESTS};
use crate::rate_limit::RateLimiter;
use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route("/api/search", get(search_handler))
        .layer(CatchPanicLayer::custom(panic_response))
        .with_state(state)
}

// Turns a handler panic into the generic 500 body
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    SEARCH_REQUESTS.with_label_values(&[metrics::ERROR]).inc();
    SearchError::Internal(detail).into_response()
}

pub fn build_state(args: &ServeArgs) -> Result<AppState, StartupError> {
    let dataset = match &args.dataset {
        Some(path) => Dataset::from_file(path)?,
        None => Dataset::bundled()?,
    };
    info!(
        courses = dataset.len(),
        sha256 = dataset.fingerprint(),
        "Dataset loaded"
    );

    let rate_limiter = RateLimiter::new(args.rate_limit, args.rate_window());

    Ok(AppState::new(dataset, rate_limiter).with_simulated_latency(args.simulated_latency()))
}

pub async fn serve(args: ServeArgs) -> Result<(), StartupError> {
    let state = Arc::new(build_state(&args)?);
    let app = router(state);

    let address = format!("0.0.0.0:{}", args.port);
    let listener = TcpListener::bind(&address).await?;

    info!("Search server running on http://localhost:{}", args.port);
    info!(
        "Rate limit: {} requests per {} seconds",
        args.rate_limit, args.rate_window
    );
    if let Some(latency) = args.simulated_latency() {
        info!("Simulating up to {:?} of latency per search", latency);
    }

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install terminate handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
