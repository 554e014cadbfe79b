//! Shared utilities for use cases.
//!
//! Contains cancellation checking and the cancellable-await helper used by
//! the strategies, the tool-call bridge and the capabilities.

use crate::error::StrategyError;
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Check if cancellation has been requested.
///
/// Returns `Err(StrategyError::Cancelled)` if the token is cancelled.
pub(crate) fn check_cancelled(token: &CancellationToken) -> Result<(), StrategyError> {
    if token.is_cancelled() {
        return Err(StrategyError::Cancelled);
    }
    Ok(())
}

/// Await `future` unless `token` is cancelled first.
///
/// Returns `None` on cancellation; the future is dropped.
pub(crate) async fn cancellable<F: Future>(token: &CancellationToken, future: F) -> Option<F::Output> {
    tokio::select! {
        biased;
        _ = token.cancelled() => None,
        output = future => Some(output),
    }
}

/// Shorten `text` to at most `max_chars` characters for log output.
pub(crate) fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_cancellable_completes() {
        let token = CancellationToken::new();
        assert_eq!(cancellable(&token, async { 42 }).await, Some(42));
    }

    #[tokio::test]
    async fn test_cancellable_observes_token() {
        let token = CancellationToken::new();
        token.cancel();
        let result = cancellable(&token, tokio::time::sleep(Duration::from_secs(60))).await;
        assert!(result.is_none());
        assert!(check_cancelled(&token).unwrap_err().is_cancelled());
    }

    #[test]
    fn test_preview() {
        assert_eq!(preview("short", 10), "short");
        assert_eq!(preview("Madrid weather", 6), "Madrid...");
        assert_eq!(preview("añoñoño", 2), "añ...");
    }
}
