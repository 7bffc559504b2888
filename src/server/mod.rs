//! HTTP Server Module
//!
//! axum router over the romanization pipeline, the speech service and the
//! easy-Korean service. CORS is permissive so browser and mobile clients on
//! other origins can call it.

mod handlers;
pub mod types;

pub use handlers::ROOT_MESSAGE;

use crate::config::SpeechDelivery;
use crate::romanize::RomanizationPipeline;
use crate::simplify::SimplificationService;
use crate::speech::SpeechService;
use axum::routing::{get, post};
use axum::Router;
use std::future::Future;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared handler state. Cloned per request; every field is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: RomanizationPipeline,
    pub speech: SpeechService,
    pub simplifier: SimplificationService,
    pub delivery: SpeechDelivery,
}

impl AppState {
    pub fn new(
        pipeline: RomanizationPipeline,
        speech: SpeechService,
        simplifier: SimplificationService,
        delivery: SpeechDelivery,
    ) -> Self {
        Self {
            pipeline,
            speech,
            simplifier,
            delivery,
        }
    }
}

/// Build the axum router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/romanize", post(handlers::romanize))
        .route("/speak", post(handlers::speak))
        .route("/tts/{filename}", get(handlers::get_tts))
        .route("/check_tts_file/{filename}", get(handlers::check_tts_file))
        .route(
            "/translate-to-easy-korean",
            post(handlers::translate_to_easy_korean),
        )
        .route("/echo", post(handlers::echo))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve until `shutdown` resolves, then drain in-flight requests
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("🚀 malsori listening on http://{}", addr);
    }

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

/// Resolves on Ctrl-C
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, draining connections");
}
