//! Adapters between the async operations and callback-style integrators

use super::ApiError;
use tokio::sync::oneshot;

/// Error-first completion callback
pub type Callback<T> = Box<dyn FnOnce(Result<T, ApiError>) + Send + 'static>;

/// Hands a result to the callback if one was given, otherwise returns it
pub fn deliver<T>(result: Result<T, ApiError>, callback: Option<Callback<T>>) -> Option<Result<T, ApiError>> {
    match callback {
        Some(callback) => {
            callback(result);
            None
        }
        None => Some(result),
    }
}

/// Handle to the outcome of an operation.
///
/// A handle created with [`Pending::settled`] yields its result. A detached
/// handle belongs to a call whose result already went to a callback, and
/// yields `None`.
#[derive(Debug)]
pub struct Pending<T> {
    rx: oneshot::Receiver<Result<T, ApiError>>,
}

impl<T> Pending<T> {
    pub fn settled(result: Result<T, ApiError>) -> Self {
        let (tx, rx) = oneshot::channel();
        // The receiver is alive, so the send cannot fail.
        let _ = tx.send(result);
        Self { rx }
    }

    pub fn detached() -> Self {
        let (_, rx) = oneshot::channel();
        Self { rx }
    }

    /// Resolve the handle; `None` when the result went to a callback
    pub async fn wait(self) -> Option<Result<T, ApiError>> {
        self.rx.await.ok()
    }

    /// Settle either way: through the callback or into the returned handle
    pub fn from_outcome(result: Result<T, ApiError>, callback: Option<Callback<T>>) -> Self {
        match deliver(result, callback) {
            Some(result) => Self::settled(result),
            None => Self::detached(),
        }
    }
}
