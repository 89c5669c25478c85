//! Action state machine.
//!
//! # State Transitions
//! ```text
//! idle → loading (error and data cleared)
//! loading → done-success (data set) | done-error (error set)
//! any → loading (a new run always restarts)
//! ```
//!
//! # Design Decisions
//! - Errors never propagate past this boundary; callers inspect state
//! - Each `run` gets a generation number; a settling attempt applies its
//!   result only while it is still the newest, so a slow older attempt
//!   cannot overwrite a newer one

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::action::notify::Notifier;
use crate::client::ApiError;

const FALLBACK_MESSAGE: &str = "Unexpected error";

/// Observable state of one asynchronous action.
#[derive(Debug)]
pub struct ActionState<T> {
    pub loading: bool,
    pub error: Option<String>,
    pub data: Option<T>,
}

impl<T> Default for ActionState<T> {
    fn default() -> Self {
        Self {
            loading: false,
            error: None,
            data: None,
        }
    }
}

/// Wrapper running asynchronous calls and exposing loading/error/data.
pub struct ApiAction<T> {
    state: Arc<Mutex<ActionState<T>>>,
    generation: Arc<AtomicU64>,
    notifier: Option<Arc<dyn Notifier>>,
}

impl<T> Clone for ApiAction<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            generation: self.generation.clone(),
            notifier: self.notifier.clone(),
        }
    }
}

impl<T> Default for ApiAction<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ApiAction<T> {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(ActionState::default())),
            generation: Arc::new(AtomicU64::new(0)),
            notifier: None,
        }
    }

    /// Attach a sink for failure notifications.
    pub fn with_notifier(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            notifier: Some(notifier),
            ..Self::new()
        }
    }

    /// Run one attempt of the operation.
    ///
    /// Transitions to loading, awaits the operation, and records exactly one
    /// of data/error. If a newer `run` started in the meantime this attempt's
    /// result is discarded. Returns the value on success, `None` otherwise;
    /// never returns an error.
    ///
    /// Staleness is checked under the state lock, in the same critical
    /// section as the write; a newer run's reset cannot interleave between
    /// an older attempt's check and its write.
    pub async fn run<F, Fut>(&self, operation: F) -> Option<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
        T: Clone,
    {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut state = self.lock();
            if self.generation.load(Ordering::SeqCst) != generation {
                return None;
            }
            state.loading = true;
            state.error = None;
            state.data = None;
        }

        let result = operation().await;

        match result {
            Ok(value) => {
                let mut state = self.lock();
                if self.generation.load(Ordering::SeqCst) != generation {
                    return None;
                }
                state.loading = false;
                state.data = Some(value.clone());
                Some(value)
            }
            Err(err) => {
                let message = normalize_message(&err);
                {
                    let mut state = self.lock();
                    if self.generation.load(Ordering::SeqCst) != generation {
                        return None;
                    }
                    state.loading = false;
                    state.error = Some(message.clone());
                }
                if let Some(notifier) = &self.notifier {
                    notifier.notify(&message);
                }
                None
            }
        }
    }

    pub fn loading(&self) -> bool {
        self.lock().loading
    }

    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    pub fn data(&self) -> Option<T>
    where
        T: Clone,
    {
        self.lock().data.clone()
    }

    /// Replace the stored data outside of a run (e.g. local edits).
    pub fn set_data(&self, data: T) {
        self.lock().data = Some(data);
    }

    fn lock(&self) -> MutexGuard<'_, ActionState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn normalize_message(err: &ApiError) -> String {
    if err.message.trim().is_empty() {
        FALLBACK_MESSAGE.to_string()
    } else {
        err.message.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::notify::ChannelNotifier;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn success_stores_data_and_clears_loading() {
        let action: ApiAction<u32> = ApiAction::new();
        let result = action.run(|| async { Ok(7) }).await;
        assert_eq!(result, Some(7));
        assert_eq!(action.data(), Some(7));
        assert!(!action.loading());
        assert_eq!(action.error(), None);
    }

    #[tokio::test]
    async fn failure_stores_message_and_notifies() {
        let (notifier, mut toasts) = ChannelNotifier::new();
        let action: ApiAction<u32> = ApiAction::with_notifier(notifier);

        let result = action
            .run(|| async { Err(ApiError::from_status(404, serde_json::json!({"detail": "not found"}))) })
            .await;

        assert_eq!(result, None);
        assert_eq!(action.error().as_deref(), Some("not found"));
        assert_eq!(action.data(), None);
        assert!(!action.loading());
        assert_eq!(toasts.recv().await.as_deref(), Some("not found"));
    }

    #[tokio::test]
    async fn new_run_clears_previous_terminal_state() {
        let action: ApiAction<u32> = ApiAction::new();
        action
            .run(|| async { Err(ApiError::timeout()) })
            .await;
        assert!(action.error().is_some());

        let result = action.run(|| async { Ok(1) }).await;
        assert_eq!(result, Some(1));
        assert_eq!(action.error(), None);
    }

    #[tokio::test]
    async fn stale_result_does_not_overwrite_newer() {
        let action: ApiAction<u32> = ApiAction::new();
        let (release_tx, release_rx) = oneshot::channel::<()>();
        let (entered_tx, entered_rx) = oneshot::channel::<()>();

        let slow = action.clone();
        let first = tokio::spawn(async move {
            slow.run(|| async move {
                let _ = entered_tx.send(());
                let _ = release_rx.await;
                Ok(1)
            })
            .await
        });

        entered_rx.await.unwrap();
        let second = action.run(|| async { Ok(2) }).await;
        assert_eq!(second, Some(2));

        let _ = release_tx.send(());
        let stale = first.await.unwrap();
        assert_eq!(stale, None, "superseded attempt must not report a value");
        assert_eq!(action.data(), Some(2));
        assert!(!action.loading());
    }

    #[tokio::test]
    async fn stale_completion_leaves_newer_run_in_flight() {
        let action: ApiAction<u32> = ApiAction::new();
        let (first_release_tx, first_release_rx) = oneshot::channel::<()>();
        let (first_entered_tx, first_entered_rx) = oneshot::channel::<()>();
        let (second_release_tx, second_release_rx) = oneshot::channel::<()>();
        let (second_entered_tx, second_entered_rx) = oneshot::channel::<()>();

        let older = action.clone();
        let first = tokio::spawn(async move {
            older
                .run(|| async move {
                    let _ = first_entered_tx.send(());
                    let _ = first_release_rx.await;
                    Ok(1)
                })
                .await
        });
        first_entered_rx.await.unwrap();

        let newer = action.clone();
        let second = tokio::spawn(async move {
            newer
                .run(|| async move {
                    let _ = second_entered_tx.send(());
                    let _ = second_release_rx.await;
                    Ok(2)
                })
                .await
        });
        second_entered_rx.await.unwrap();

        // The older attempt settles while the newer one is still in flight;
        // observers must keep seeing the newer run's loading state.
        let _ = first_release_tx.send(());
        assert_eq!(first.await.unwrap(), None);
        assert!(action.loading(), "newer run must remain visible as in flight");
        assert_eq!(action.data(), None);
        assert_eq!(action.error(), None);

        let _ = second_release_tx.send(());
        assert_eq!(second.await.unwrap(), Some(2));
        assert_eq!(action.data(), Some(2));
        assert!(!action.loading());
    }
}
