//! # HTTP Server for the Studio
//!
//! Local HTTP surface over one editing session and the recent moments.
//!
//! ## Usage
//!
//! ```bash
//! polaroid serve --listen 127.0.0.1:8080
//! ```
//!
//! ## Routes
//!
//! | Method | Path | Does |
//! |--------|------|------|
//! | `POST` | `/api/capture` | multipart `image` (+ optional `facing`), starts a session |
//! | `GET` | `/api/session` | active session id and style |
//! | `PUT` | `/api/session/style` | replace the style, re-arms the auto-save |
//! | `GET` | `/api/session/preview` | composed print as JPEG |
//! | `POST` | `/api/session/save` | compose and save now |
//! | `POST` | `/api/session/export` | save the print into the export directory |
//! | `GET` | `/api/moments` | recent moments, most recent first |
//! | `DELETE` | `/api/moments` | clear all |
//! | `GET` | `/api/moments/:id/print` | stored print as JPEG |
//! | `POST` | `/api/moments/:id/reopen` | load a moment into the session |
//! | `DELETE` | `/api/moments/:id` | remove one |

mod handlers;
mod state;

pub use state::AppState;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::StudioConfig;
use crate::error::PolaroidError;

/// Build the router over shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Capture (50MB limit for uploads)
        .route(
            "/api/capture",
            post(handlers::session::capture).layer(DefaultBodyLimit::max(50 * 1024 * 1024)),
        )
        // Editing session
        .route("/api/session", get(handlers::session::show))
        .route("/api/session/style", put(handlers::session::update_style))
        .route("/api/session/preview", get(handlers::session::preview))
        .route("/api/session/save", post(handlers::session::save))
        .route("/api/session/export", post(handlers::session::export))
        // Recent moments
        .route(
            "/api/moments",
            get(handlers::moments::list).delete(handlers::moments::clear),
        )
        .route("/api/moments/:id", delete(handlers::moments::remove))
        .route("/api/moments/:id/print", get(handlers::moments::print))
        .route("/api/moments/:id/reopen", post(handlers::moments::reopen))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use polaroid::config::StudioConfig;
/// use polaroid::server::serve;
///
/// # async fn example() -> Result<(), polaroid::error::PolaroidError> {
/// serve(StudioConfig::default()).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: StudioConfig) -> Result<(), PolaroidError> {
    let state = Arc::new(AppState::new(&config)?);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .map_err(|e| {
            PolaroidError::Server(format!("Failed to bind to {}: {}", config.listen_addr, e))
        })?;

    tracing::info!(
        addr = %config.listen_addr,
        store = %config.store_path.display(),
        exports = %config.export_dir.display(),
        "polaroid studio listening"
    );

    axum::serve(listener, app)
        .await
        .map_err(|e| PolaroidError::Server(format!("Server error: {}", e)))?;

    Ok(())
}
