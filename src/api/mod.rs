//! Plumbing shared by every API operation: errors, collaborator traits,
//! HTTP dispatch and response validation

mod callback;
mod dispatch;
mod response;

pub use callback::{deliver, Callback, Pending};
pub use dispatch::{FormPayload, HttpDispatcher, RawResponse};
pub use response::parse_and_check_login;

use async_trait::async_trait;
use reqwest::cookie::Jar;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Missing required argument: {0}")]
    MissingArgument(&'static str),

    #[error("Could not retrieve data: {0}")]
    DataRetrieval(String),

    #[error("Remote API error: {0}")]
    RemoteApi(Value),

    #[error("Not logged in (user {user_id})")]
    NotLoggedIn { user_id: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ApiError {
    /// Raw error payload from the remote service, if this is a remote error
    pub fn remote_payload(&self) -> Option<&Value> {
        match self {
            ApiError::RemoteApi(payload) => Some(payload),
            _ => None,
        }
    }
}

/// Performs the outgoing HTTP POST for an operation
#[async_trait]
pub trait Dispatcher: Send + Sync {
    async fn post(
        &self,
        url: &str,
        jar: &Jar,
        form: &FormPayload,
        headers: &[(&str, String)],
    ) -> Result<RawResponse, ApiError>;
}

/// Supplies raw thread metadata; either a single record or an array of them
#[async_trait]
pub trait ThreadInfoSource: Send + Sync {
    async fn get_thread_info(&self, thread_id: &str) -> Result<Option<Value>, ApiError>;
}

/// Records operation failures
pub trait ErrorLogger: Send + Sync {
    fn error(&self, operation: &str, message: &str);
}

/// Logger that forwards failures to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl ErrorLogger for TracingLogger {
    fn error(&self, operation: &str, message: &str) {
        tracing::error!(operation, "{}", message);
    }
}
