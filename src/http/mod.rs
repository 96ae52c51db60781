//! HTTP surface of the note server.
//!
//! Handlers parse the request, hand it to [`Note`](crate::entity::Note) and
//! translate the outcome into a JSON response.

pub mod error;
mod routes;

use std::sync::Arc;
use std::time::Instant;

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, patch, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower::ServiceBuilder;
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::error::Result;
use crate::identity::IdentityResolver;
use crate::storage::SqliteStore;

pub use error::ApiError;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// The note store, shared between requests.
    pub store: Arc<Mutex<SqliteStore>>,
    /// Finds the acting user of a request.
    pub identity: Arc<IdentityResolver>,
}

impl AppState {
    pub fn new(store: SqliteStore, config: &ServerConfig) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            identity: Arc::new(IdentityResolver::new(
                config.identity_header.clone(),
                config.trust_payload_owner,
            )),
        }
    }
}

/// Build the note routes.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/note", post(routes::create_note))
        .route("/note/{id}", get(routes::get_note).delete(routes::delete_note))
        .route("/note/{id}/owner", patch(routes::change_owner))
        .route("/note/{id}/rename", patch(routes::rename_note))
        .route("/note/{id}/update", patch(routes::update_note))
        .route("/notes/owner/{owner_id}", get(routes::notes_by_owner))
        .layer(ServiceBuilder::new().layer(middleware::from_fn(trace_request)))
        .with_state(state)
}

async fn trace_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started = Instant::now();

    let response = next.run(request).await;

    info!(
        %method,
        path = %path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request"
    );
    response
}

/// Open the store and serve until Ctrl-C.
pub async fn serve(config: ServerConfig) -> Result<()> {
    let store = SqliteStore::open(&config.database)?;
    let state = AppState::new(store, &config);

    let listener = TcpListener::bind(&config.bind).await?;
    info!(
        bind = %config.bind,
        database = %config.database.display(),
        "turnote listening"
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("turnote stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
