use std::fmt::Display;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

pub const DEFAULT_FAILURE_MESSAGE: &str = "An unexpected error occurred";

/// Outcome of an asynchronous read.
///
/// `Failure` always holds a human-readable message; error values are turned
/// into text at the catalog boundary and never travel further.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum FetchResult<T> {
    Loading,
    Success(T),
    Failure(String),
}

impl<T> FetchResult<T> {
    pub fn from_result<E: Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(error) => Self::Failure(failure_message(&error)),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> FetchResult<U> {
        match self {
            Self::Loading => FetchResult::Loading,
            Self::Success(value) => FetchResult::Success(f(value)),
            Self::Failure(message) => FetchResult::Failure(message),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn success(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn failure_message(&self) -> Option<&str> {
        match self {
            Self::Failure(message) => Some(message.as_str()),
            _ => None,
        }
    }
}

impl<T> Default for FetchResult<T> {
    fn default() -> Self {
        Self::Loading
    }
}

/// Display text of `error`, or the generic message when that text is blank.
pub fn failure_message<E: Display + ?Sized>(error: &E) -> String {
    let message = error.to_string();
    if message.trim().is_empty() {
        DEFAULT_FAILURE_MESSAGE.to_string()
    } else {
        message
    }
}

/// Observable slot holding the latest `FetchResult` for one feed.
#[derive(Debug)]
pub struct LiveState<T> {
    sender: watch::Sender<FetchResult<T>>,
    generation: AtomicU64,
}

impl<T: Clone> LiveState<T> {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(FetchResult::Loading);
        Self {
            sender,
            generation: AtomicU64::new(0),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchResult<T>> {
        self.sender.subscribe()
    }

    pub fn current(&self) -> FetchResult<T> {
        self.sender.borrow().clone()
    }

    /// Publishes `Loading`, then drives `fetch` and publishes what it returns.
    ///
    /// When runs overlap, the most recently started one owns the slot: a run
    /// that finishes after a newer one has begun returns its result to the
    /// caller but does not publish it.
    pub async fn run<F>(&self, fetch: F) -> FetchResult<T>
    where
        F: Future<Output = FetchResult<T>>,
    {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.sender.send_replace(FetchResult::Loading);
        let result = fetch.await;
        if self.generation.load(Ordering::SeqCst) == generation {
            self.sender.send_replace(result.clone());
        } else {
            tracing::debug!(generation, "stale fetch result discarded");
        }
        result
    }
}

impl<T: Clone> Default for LiveState<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::oneshot;

    struct BlankError;

    impl Display for BlankError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("  ")
        }
    }

    #[test]
    fn from_result_keeps_error_text() {
        let result: FetchResult<u8> = FetchResult::from_result(Err::<u8, _>("connection reset"));
        assert_eq!(result, FetchResult::Failure("connection reset".to_string()));
    }

    #[test]
    fn blank_error_text_falls_back_to_generic_message() {
        let result: FetchResult<u8> = FetchResult::from_result(Err(BlankError));
        assert_eq!(result.failure_message(), Some(DEFAULT_FAILURE_MESSAGE));
    }

    #[test]
    fn map_only_touches_success() {
        let doubled = FetchResult::Success(21).map(|value| value * 2);
        let failed = FetchResult::<i32>::Failure("boom".to_string()).map(|value| value * 2);
        let loading = FetchResult::<i32>::Loading.map(|value| value * 2);

        assert_eq!(doubled, FetchResult::Success(42));
        assert_eq!(failed, FetchResult::Failure("boom".to_string()));
        assert!(loading.is_loading());
    }

    #[test]
    fn serializes_with_state_tag() {
        let json = serde_json::to_value(FetchResult::Success(vec![1, 2])).expect("serialize");
        assert_eq!(json, serde_json::json!({ "state": "success", "data": [1, 2] }));

        let loading = serde_json::to_value(FetchResult::<u8>::Loading).expect("serialize");
        assert_eq!(loading, serde_json::json!({ "state": "loading" }));
    }

    #[tokio::test]
    async fn run_publishes_loading_before_result() {
        let state = LiveState::<Vec<u32>>::new();
        state.run(async { FetchResult::Success(vec![1]) }).await;
        assert_eq!(state.current(), FetchResult::Success(vec![1]));

        let mut receiver = state.subscribe();
        let (release, gate) = oneshot::channel::<()>();
        let run = state.run(async move {
            let _ = gate.await;
            FetchResult::Success(vec![2, 3])
        });

        let observer = async {
            receiver.changed().await.expect("sender alive");
            let seen = receiver.borrow_and_update().clone();
            let _ = release.send(());
            seen
        };

        let (result, seen) = tokio::join!(run, observer);
        assert!(seen.is_loading());
        assert_eq!(result, FetchResult::Success(vec![2, 3]));
        assert_eq!(state.current(), FetchResult::Success(vec![2, 3]));
    }

    #[tokio::test]
    async fn stale_run_does_not_overwrite_newer_result() {
        let state = LiveState::<Vec<u32>>::new();
        let (release_old, old_gate) = oneshot::channel::<()>();

        let old_run = state.run(async move {
            let _ = old_gate.await;
            FetchResult::Success(vec![1])
        });
        let newer = async {
            tokio::task::yield_now().await;
            let result = state.run(async { FetchResult::Success(vec![2]) }).await;
            let _ = release_old.send(());
            result
        };

        let (old_result, new_result) = tokio::join!(old_run, newer);
        assert_eq!(old_result, FetchResult::Success(vec![1]));
        assert_eq!(new_result, FetchResult::Success(vec![2]));
        assert_eq!(state.current(), FetchResult::Success(vec![2]));
    }
}
