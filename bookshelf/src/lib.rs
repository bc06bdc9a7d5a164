//! # bookshelf: validated book submissions over HTTP
//!
//! `bookshelf` is a small HTTP service with one operation: `POST /books` accepts a JSON payload
//! `{"filename": ..., "contents": {"name": ..., "age": ..., "body": ...}}`, validates it, and
//! writes the book body to a record named `filename`.
//!
//! ## Request Flow
//!
//! Every request gets exactly one response. Stages run strictly in order and the first failure
//! ends the request:
//!
//! 1. **Method and path**: anything but POST is answered with 405 before the path is looked at;
//!    a POST to an unknown path gets 404 ([`api::middleware`]).
//! 2. **Parse**: the body must be JSON and not `null`, otherwise 400 `Invalid JSON`
//!    ([`api::models::books::ParsedPayload`]).
//! 3. **Validate**: [`validation::validate`] checks the filename, then the contents, and returns a
//!    [`validation::ValidationVerdict`]. An invalid payload gets 400 with the reason.
//! 4. **Persist**: the [`store::RecordStore`] writes the record, bounded by
//!    [`Config::store_timeout`]. Failure gets 500 `Internal Error`; the cause is only logged.
//!
//! Responses are always `application/json`: `{"message": ...}` on success, `{"error": ...}`
//! otherwise.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use bookshelf::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = bookshelf::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     bookshelf::telemetry::init_telemetry(config.enable_otel_export)?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     })
//!     .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! See the [`config`] module for configuration options.

pub mod api;
pub mod config;
pub mod errors;
pub mod openapi;
pub mod store;
pub mod telemetry;
pub mod validation;

#[cfg(test)]
pub mod test_utils;

use axum::{Router, extract::DefaultBodyLimit, middleware::from_fn, routing::post};
use bon::Builder;
pub use config::Config;
use std::sync::Arc;
use store::RecordStore;
use tokio::net::TcpListener;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{Level, debug, info, instrument};

/// Application state shared across all request handlers.
///
/// Nothing here is mutated per request: handlers read the configuration and hand records to the
/// store, which does its own synchronisation.
#[derive(Clone, Builder)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn RecordStore>,
}

/// Build the application router.
///
/// The method filter is layered over both the books route and the fallback, so a non-POST
/// request is answered with 405 whatever its path.
#[instrument(skip_all)]
pub fn build_router(state: AppState) -> Router {
    let books_path = state.config.books_path.clone();
    let max_body_size = state.config.max_body_size;

    Router::new()
        .route(&books_path, post(api::handlers::books::create_book))
        .fallback(api::handlers::not_found)
        .layer(from_fn(api::middleware::require_post))
        .layer(DefaultBodyLimit::max(max_body_size))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

/// Main application: owns the router and serves it until shutdown.
///
/// 1. **Create**: [`Application::new`] sets up the record store and builds the router
/// 2. **Serve**: [`Application::serve`] binds to the configured address and handles requests
/// 3. **Shutdown**: when the shutdown future resolves, in-flight requests finish and telemetry is
///    flushed
pub struct Application {
    router: Router,
    config: Config,
}

impl Application {
    /// Create a new application instance with the store described by `config.storage`
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting bookshelf with configuration: {:#?}", config);

        let store = store::create_record_store(&config.storage).await?;

        Ok(Self::with_store(config, store))
    }

    /// Create an application around an existing store
    pub fn with_store(config: Config, store: Arc<dyn RecordStore>) -> Self {
        let app_state = AppState::builder().config(config.clone()).store(store).build();
        let router = build_router(app_state);

        Self { router, config }
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "bookshelf listening on http://{}, accepting submissions at {}",
            bind_addr, self.config.books_path
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Shutting down telemetry...");
        telemetry::shutdown_telemetry();

        Ok(())
    }
}
