use crate::config::Config;
use crate::error::Result;
use crate::{server, tunnel};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Run the full flow: serve the root directory, expose it through the
/// tunnel, open the public URL, then idle until interrupted.
pub async fn run(config: Config) -> Result<()> {
    let server = server::start(&config).await?;
    let port = server.port();

    wait_until_ready(port, Duration::from_secs(config.server.ready_timeout_secs)).await;

    match tunnel::establish(&config.tunnel, port).await {
        Ok(tunnel) => {
            info!("Your project is now live at: {}", tunnel.url());

            if config.browser.auto_open {
                info!("Opening tunnel URL in browser...");
                if let Err(e) = open::that(tunnel.url()) {
                    warn!("Failed to open browser: {e}");
                }
            }

            info!("Press Ctrl+C to stop the server and tunnel");
            wait_for_interrupt().await;

            info!("Shutting down...");
            drop(tunnel);
            server.shutdown();
        }
        Err(e) => {
            error!("Failed to establish tunnel: {e}");

            if config.tunnel.keep_serving_on_failure {
                info!("Still serving locally at http://localhost:{port} (Ctrl+C to stop)");
                wait_for_interrupt().await;
                info!("Shutting down...");
            }

            server.shutdown();
        }
    }

    Ok(())
}

/// Poll the freshly started server until it answers, bounding the settle
/// time instead of sleeping blind. Any HTTP response counts as ready; a
/// timeout is only worth a warning since the listener is already bound.
async fn wait_until_ready(port: u16, ready_timeout: Duration) {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(1))
        .build()
        .expect("Failed to create HTTP client");

    let url = format!("http://127.0.0.1:{port}/");
    let deadline = Instant::now() + ready_timeout;

    while Instant::now() < deadline {
        if client.get(&url).send().await.is_ok() {
            debug!("Static server is ready");
            return;
        }
        tokio::time::sleep(Duration::from_millis(200)).await;
    }

    warn!(
        "Static server did not respond within {}s, continuing anyway",
        ready_timeout.as_secs()
    );
}

async fn wait_for_interrupt() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {e}");
    }
}
