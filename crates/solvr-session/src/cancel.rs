//! Cancellation helpers shared by the async workflows.

use std::future::Future;

use solvr_core::CoreError;
use tokio_util::sync::CancellationToken;

/// Run `fut` until it finishes or `cancel` fires.
///
/// Returns [`CoreError::Cancelled`] if the token fired first. The future is
/// dropped in that case, so whatever it would have produced is never applied.
pub async fn or_cancel<F, T>(fut: F, cancel: &CancellationToken) -> Result<T, CoreError>
where
    F: Future<Output = T>,
{
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(CoreError::Cancelled),
        value = fut => Ok(value),
    }
}

/// Guard placed before every state mutation that follows an await.
///
/// # Errors
///
/// [`CoreError::Cancelled`] if the session has moved on.
pub fn ensure_live(cancel: &CancellationToken) -> Result<(), CoreError> {
    if cancel.is_cancelled() {
        tracing::debug!("dropping result for cancelled session");
        return Err(CoreError::Cancelled);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn completes_when_not_cancelled() {
        let token = CancellationToken::new();
        assert_eq!(or_cancel(async { 7 }, &token).await.unwrap(), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_wins_over_slow_future() {
        let token = CancellationToken::new();
        let child = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            child.cancel();
        });
        let result = or_cancel(tokio::time::sleep(Duration::from_secs(60)), &token).await;
        assert!(matches!(result, Err(CoreError::Cancelled)));
    }

    #[tokio::test]
    async fn already_cancelled_never_polls() {
        let token = CancellationToken::new();
        token.cancel();
        let result: Result<(), CoreError> =
            or_cancel(async { unreachable!("must not run") }, &token).await;
        assert!(matches!(result, Err(CoreError::Cancelled)));
        assert!(ensure_live(&token).is_err());
    }
}
