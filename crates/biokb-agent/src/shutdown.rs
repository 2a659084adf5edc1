//! Interrupt handling: the first signal drains the batch, the second quits.

use std::future::Future;

use tokio::sync::watch;
use tracing::warn;

/// Wait for interrupts from `next_signal`. The first one raises the shutdown
/// flag; the function returns once a second one arrives. It also returns if
/// signals can no longer be received, without raising the flag.
pub async fn forward_interrupts<F, Fut>(mut next_signal: F, shutdown: watch::Sender<bool>) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = next_signal().await {
        warn!(error = %e, "Cannot listen for interrupts");
        return false;
    }
    warn!("Interrupt received, finishing in-flight articles (press Ctrl-C again to quit)");
    let _ = shutdown.send(true);

    next_signal().await.is_ok()
}
