use std::sync::mpsc::Receiver;

use tokio::task::spawn_blocking;
use tracing::warn;

/// Resolves once a shutdown signal is sent on `rx`, or every sender has
/// been dropped.
///
/// We use a regular mpsc channel here because the signal is sent from
/// [Drop], which can't await.
pub async fn shutdown_signal(rx: Receiver<()>) {
    let res = spawn_blocking(move || rx.recv()).await;
    match res {
        Ok(Ok(())) => warn!("Received shutdown signal"),
        Ok(Err(_)) => warn!("Shutdown senders dropped"),
        Err(e) => warn!("Shutdown listener failed: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::mpsc, time::Duration};

    use tokio::time::timeout;

    use super::*;

    #[tokio::test]
    async fn test_shutdown_signal() {
        let (tx, rx) = mpsc::channel();
        tx.send(()).unwrap();
        timeout(Duration::from_secs(1), shutdown_signal(rx))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_sender_dropped() {
        let (_, rx) = mpsc::channel::<()>();
        timeout(Duration::from_secs(1), shutdown_signal(rx))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_no_signal() {
        let (_tx, rx) = mpsc::channel::<()>();
        assert!(timeout(Duration::from_millis(50), shutdown_signal(rx))
            .await
            .is_err());
    }
}
