//! Signal handling for graceful shutdown.

use std::future::Future;
use tokio::signal::unix::{SignalKind, signal};

/// Creates a future that completes when a shutdown signal is received.
///
/// Listens for SIGTERM and SIGINT (Ctrl+C). If the handlers cannot be
/// installed, falls back to `ctrl_c`; if that fails too, never completes.
pub async fn shutdown_signal() {
    let (mut sigterm, mut sigint) = match (
        signal(SignalKind::terminate()),
        signal(SignalKind::interrupt()),
    ) {
        (Ok(sigterm), Ok(sigint)) => (sigterm, sigint),
        (Err(e), _) | (_, Err(e)) => {
            tracing::error!(error = %e, "Failed to install signal handlers, falling back to ctrl_c");
            wait_for_ctrl_c(tokio::signal::ctrl_c()).await;
            return;
        }
    };

    tokio::select! {
        _ = sigterm.recv() => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
        _ = sigint.recv() => {
            tracing::info!("Received SIGINT, initiating graceful shutdown");
        }
    }
}

async fn wait_for_ctrl_c(ctrl_c: impl Future<Output = std::io::Result<()>>) {
    match ctrl_c.await {
        Ok(()) => tracing::info!("Received ctrl_c, initiating graceful shutdown"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for ctrl_c, running until killed");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_ctrl_c_completes_fallback() {
        tokio::time::timeout(Duration::from_secs(1), wait_for_ctrl_c(async { Ok(()) }))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_failed_ctrl_c_never_completes() {
        let waited = tokio::time::timeout(
            Duration::from_millis(50),
            wait_for_ctrl_c(async { Err(std::io::Error::other("no signal driver")) }),
        )
        .await;
        assert!(waited.is_err());
    }
}
