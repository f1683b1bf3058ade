//! fca-themes - thread themes over the unofficial Messenger web API
//!
//! This library builds and sends the requests behind Messenger's theme
//! features and normalizes their loosely shaped responses.
//!
//! ## Key Features
//!
//! - **AI Themes**: Generate theme candidates from a text prompt
//! - **Theme Info**: Read a thread's current theme from raw thread metadata
//! - **Dual Calling Style**: Await the result directly or hand it to a callback
//! - **Session Context**: Tokens, revision flags and cookies loaded from config and app state

pub mod api;
pub mod config;
pub mod context;
pub mod themes;

pub use api::{
    ApiError, Callback, Dispatcher, ErrorLogger, FormPayload, HttpDispatcher, Pending,
    RawResponse, ThreadInfoSource, TracingLogger,
};
pub use config::{Config, ConfigBuilder, ConfigError};
pub use context::{ContextError, RequestContext};
pub use themes::{ThemeClient, ThemeCreator, ThemeInfo, ThemeInfoReader, ThemeRecord};
