//! HTTP server wiring for snipstore (API, handlers, and shared state).

/// HTTP error mapping for API handlers.
pub mod error;
/// HTTP handlers for document endpoints.
pub mod handlers;

pub use snipstore_core::{
    config, db, models, AppError, Config, Database, DocumentHandler, DEFAULT_PORT,
};

use axum::{
    extract::DefaultBodyLimit,
    http::header,
    routing::{get, post},
    Router,
};
use hyper::header::HeaderValue;
use snipstore_core::db::document::DocumentDb;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

/// Slack on top of the escaped content for JSON framing and other fields.
const BODY_LIMIT_OVERHEAD: usize = 64 * 1024;

/// Worst-case JSON expansion per content byte (`\u0001` style escapes).
const JSON_ESCAPE_FACTOR: usize = 6;

/// Request body cap that admits any document up to `max_document_size`.
///
/// The exact content-length check happens in the create handler, after
/// JSON decoding.
pub(crate) fn request_body_limit(max_document_size: usize) -> usize {
    max_document_size
        .saturating_mul(JSON_ESCAPE_FACTOR)
        .saturating_add(BODY_LIMIT_OVERHEAD)
}

/// Shared state passed to HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub handler: Arc<DocumentHandler<DocumentDb>>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Construct shared application state.
    ///
    /// # Arguments
    /// - `config`: Loaded configuration.
    /// - `db`: Open database handle.
    ///
    /// # Returns
    /// A new [`AppState`].
    ///
    /// # Errors
    /// Returns [`AppError::InvalidConfig`] when the id settings are unusable.
    pub fn new(config: Config, db: Database) -> Result<Self, AppError> {
        let handler = DocumentHandler::new(config.id, db.documents)?;
        Ok(Self {
            handler: Arc::new(handler),
            config: Arc::new(config),
        })
    }
}

/// Resolve the listener address from the configured override and security policy.
///
/// # Arguments
/// - `config`: Server configuration containing `port` and an optional `bind`.
///
/// # Returns
/// A socket address that stays on loopback unless public access is enabled.
pub fn resolve_bind_address(config: &Config) -> SocketAddr {
    let default_bind = SocketAddr::from(([127, 0, 0, 1], config.port));
    let requested = match config.bind.as_deref() {
        Some(value) => match value.trim().parse::<SocketAddr>() {
            Ok(addr) => addr,
            Err(err) => {
                tracing::warn!(
                    "Invalid BIND='{}': {}. Falling back to {}",
                    value,
                    err,
                    default_bind
                );
                default_bind
            }
        },
        None => default_bind,
    };

    if config.allow_public_access || requested.ip().is_loopback() {
        return requested;
    }

    tracing::warn!(
        "Non-loopback bind {} requested without ALLOW_PUBLIC_ACCESS; forcing 127.0.0.1",
        requested
    );
    SocketAddr::from(([127, 0, 0, 1], requested.port()))
}

fn cors_layer(allow_public_access: bool, port: u16) -> CorsLayer {
    let methods = [axum::http::Method::GET, axum::http::Method::POST];
    if allow_public_access {
        return CorsLayer::new()
            .allow_origin(tower_http::cors::Any)
            .allow_methods(methods)
            .allow_headers(tower_http::cors::Any);
    }

    let origins: Vec<HeaderValue> = [
        format!("http://localhost:{}", port),
        format!("http://127.0.0.1:{}", port),
    ]
    .iter()
    .filter_map(|origin| HeaderValue::from_str(origin).ok())
    .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(methods)
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}

/// Create the application router with all routes and middleware.
///
/// # Arguments
/// - `state`: Shared application state.
///
/// # Returns
/// Configured `axum::Router`.
pub fn create_app(state: AppState) -> Router {
    let cors_port = state.config.port;
    create_app_with_cors_port(state, cors_port)
}

fn create_app_with_cors_port(state: AppState, cors_port: u16) -> Router {
    let cors = cors_layer(state.config.allow_public_access, cors_port);
    let body_limit = request_body_limit(state.config.max_document_size);

    Router::new()
        .route("/api/document", post(handlers::document::create_document))
        .route("/api/document/:id", get(handlers::document::get_document))
        .route(
            "/api/document/:id/raw",
            get(handlers::document::get_raw_document),
        )
        .with_state(state)
        .layer(
            tower::ServiceBuilder::new()
                .layer(DefaultBodyLimit::max(body_limit))
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors)
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_FRAME_OPTIONS,
                    HeaderValue::from_static("DENY"),
                )),
        )
}

fn listener_cors_port(listener: &tokio::net::TcpListener, fallback_port: u16) -> u16 {
    listener
        .local_addr()
        .map(|addr| addr.port())
        .unwrap_or(fallback_port)
}

/// Run the Axum server with graceful shutdown support.
///
/// # Arguments
/// - `listener`: Bound TCP listener for the server.
/// - `state`: Shared application state.
/// - `shutdown_signal`: Future that resolves when shutdown should start.
///
/// # Errors
/// Returns any I/O error produced by `axum::serve`.
pub async fn serve_router(
    listener: tokio::net::TcpListener,
    state: AppState,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    let cors_port = listener_cors_port(&listener, state.config.port);
    let app = create_app_with_cors_port(state, cors_port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
}
