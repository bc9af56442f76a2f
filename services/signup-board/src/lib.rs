//! Signup board - activity signup view synchronizer
//!
//! Loads the activity roster from the activities API, keeps a view model of
//! it in step with signups and removals, and serves the rendered board.

pub mod activity;
pub mod alert;
pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod escape;
pub mod io;
pub mod render;
pub mod status;
pub mod synchronizer;
pub mod view;

pub use config::{load_config, Config};
pub use error::{BoardError, Result};
pub use synchronizer::ViewSynchronizer;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::alert::LogAlerter;
use crate::api::SignupClient;
use crate::io::ReqwestHttpClient;

/// Build a synchronizer talking to the configured backend over reqwest
pub fn build_synchronizer(config: &Config) -> ViewSynchronizer {
    let http: Arc<dyn io::HttpClient> = Arc::new(ReqwestHttpClient::default());
    ViewSynchronizer::new(
        SignupClient::new(&config.backend.base_url, http),
        view::new_board_handle(),
        Arc::new(LogAlerter),
        config.status.hide_after,
    )
}

/// Run the signup board with the given configuration
pub async fn run(config: Config) -> Result<()> {
    let sync = Arc::new(build_synchronizer(&config));
    let cancel = CancellationToken::new();

    sync.initialize().await;

    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {}", e);
            return;
        }
        tracing::info!("Shutdown signal received");
        cancel_for_signal.cancel();
    });

    let router = dashboard::build_router(Arc::clone(&sync));
    let addr = SocketAddr::from(([0, 0, 0, 0], config.dashboard.port));
    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        BoardError::Dashboard(format!(
            "Failed to bind dashboard to port {}: {}",
            config.dashboard.port, e
        ))
    })?;
    tracing::info!("Signup board listening on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            cancel.cancelled().await;
        })
        .await?;

    tracing::info!("Signup board stopped");
    Ok(())
}
