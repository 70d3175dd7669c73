use crate::config::Config;
use crate::error::{QuickshareError, Result};
use axum::Router;
use axum::http::{HeaderValue, header};
use std::net::SocketAddr;
use std::path::Path;
use tokio::sync::oneshot;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::{error, info};

/// Handle to the running static file server.
///
/// Dropping the handle shuts the server down, so the listening socket is
/// released on every exit path instead of being left to process teardown.
pub struct ServerHandle {
    shutdown_tx: Option<oneshot::Sender<()>>,
    port: u16,
}

impl ServerHandle {
    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Start the static file server in a background task.
///
/// Binds `0.0.0.0:<port>` (port 0 lets the OS pick one) and serves the
/// configured root directory. Per-request access logging is deliberately
/// absent; the only output is the startup line.
pub async fn start(config: &Config) -> Result<ServerHandle> {
    let root = config.server.root_dir();
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));

    let listener =
        tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|source| QuickshareError::BindError {
                port: config.server.port,
                source,
            })?;
    let port = listener.local_addr()?.port();

    let app = router(&root);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        let graceful = axum::serve(listener, app).with_graceful_shutdown(async {
            let _ = shutdown_rx.await;
        });

        if let Err(e) = graceful.await {
            error!("Static server error: {e}");
        }
    });

    info!(
        "Serving {} at http://localhost:{}",
        root.display(),
        port
    );

    Ok(ServerHandle {
        shutdown_tx: Some(shutdown_tx),
        port,
    })
}

/// Static-file router with the development headers stamped on every
/// response, including 404s: cross-origin GETs are allowed from anywhere and
/// clients must never cache, so repeated fetches always see current file
/// contents.
fn router(root: &Path) -> Router {
    Router::new()
        .fallback_service(ServeDir::new(root))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store, no-cache, must-revalidate"),
        ))
}
