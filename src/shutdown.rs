//! Interrupt handling for the driver binary.
//!
//! The first interrupt cancels the shutdown token so the driver stops and
//! flushes. A second one reports [`InterruptOutcome::Forced`], which the
//! binary turns into an immediate exit.

use std::future::Future;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Exit code used when a second interrupt forces the process down.
pub const FORCED_EXIT_CODE: i32 = 130;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptOutcome {
    /// A second interrupt arrived after shutdown had started.
    Forced,
    /// Listening for the signal failed.
    ListenFailed,
}

/// Wait for interrupts from `next_signal`: cancel `shutdown` on the first,
/// return [`InterruptOutcome::Forced`] on the second.
pub async fn watch_interrupts<F, Fut>(
    mut next_signal: F,
    shutdown: CancellationToken,
) -> InterruptOutcome
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = next_signal().await {
        error!("Failed to listen for Ctrl+C: {e}");
        return InterruptOutcome::ListenFailed;
    }
    info!("Received interrupt signal (Ctrl+C), shutting down; press Ctrl+C again to exit");
    shutdown.cancel();

    if let Err(e) = next_signal().await {
        error!("Failed to listen for Ctrl+C: {e}");
        return InterruptOutcome::ListenFailed;
    }
    warn!("Received second interrupt signal, exiting without waiting for the flush");
    InterruptOutcome::Forced
}
