//! Convertidor - a small web service that converts uploaded files to PDF.
//!
//! One upload route dispatches to one of three conversion strategies by
//! file extension (images via the `image` crate, plain text via `printpdf`,
//! office documents via an external headless converter), and one download
//! route serves the finished PDFs. See [`convert`] for the strategies and
//! [`config::Config`] for the runtime knobs.

pub mod api;
pub mod cleanup;
pub mod config;
pub mod convert;
pub mod errors;
pub mod storage;
pub mod telemetry;
pub mod templates;

#[cfg(test)]
mod test_utils;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::get,
};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::info;

pub use config::Config;
use storage::Storage;

/// Shared state for all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub storage: Storage,
}

/// Build the service router.
pub fn build_router(state: AppState) -> Router {
    let max_upload_size = state.config.max_upload_size;
    Router::new()
        .route(
            "/",
            get(api::handlers::convert::show_form).post(api::handlers::convert::upload_and_convert),
        )
        .route("/pdfs/{filename}", get(api::handlers::download::download_pdf))
        .route("/healthz", get(|| async { "OK" }))
        .layer(DefaultBodyLimit::max(max_upload_size))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// The assembled application: router, state, and background tasks.
pub struct Application {
    router: Router,
    config: Config,
    shutdown_token: CancellationToken,
    sweeper: JoinHandle<()>,
}

impl Application {
    /// Create a new application instance with all resources initialized.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        tracing::debug!("Starting convertidor with configuration: {:#?}", config);

        let storage = Storage::new(config.upload_dir.clone(), config.pdf_dir.clone());
        storage.ensure_dirs().await?;

        let shutdown_token = CancellationToken::new();
        let sweeper = tokio::spawn(cleanup::run_cleanup_sweeper(
            config.cleanup.clone(),
            storage.clone(),
            shutdown_token.clone(),
        ));

        let state = AppState {
            config: config.clone(),
            storage,
        };
        let router = build_router(state);

        Ok(Self {
            router,
            config,
            shutdown_token,
            sweeper,
        })
    }

    /// Start serving the application until the shutdown future resolves.
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "Convertidor listening on http://{}, available at http://localhost:{}",
            bind_addr, self.config.port
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        // Stop the sweeper and wait for it to finish
        self.shutdown_token.cancel();
        if let Err(e) = self.sweeper.await {
            tracing::warn!(error = %e, "Cleanup sweeper did not shut down cleanly");
        }

        Ok(())
    }
}
