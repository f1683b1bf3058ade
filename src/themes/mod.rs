//! Thread themes: AI theme generation and current theme lookup

mod create;
mod info;

pub use create::{build_ai_theme_form, ThemeCreator, CREATE_AI_THEME};
pub use info::{normalize_thread_info, theme_info_from_record, ThemeInfoReader, DEFAULT_EMOJI, GET_THEME_INFO};

use crate::api::{Callback, Dispatcher, ErrorLogger, Pending, ThreadInfoSource};
use crate::config::GraphqlSettings;
use crate::context::RequestContext;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Whether a raw field counts as set: not null, `false`, `""` or zero
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// One generated theme candidate, passed through as the server sent it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThemeRecord(Value);

impl ThemeRecord {
    pub fn new(raw: Value) -> Self {
        Self(raw)
    }

    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(Value::as_str)
    }

    /// Human readable theme name
    pub fn accessibility_label(&self) -> Option<&str> {
        self.0.get("accessibility_label").and_then(Value::as_str)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

/// Canonical theme metadata of a thread.
///
/// Text fields (`threadName`, `color`, `emoji`, `theme_id`, `theme_color`)
/// are always strings: a non-string source value is stored as its JSON
/// text, so a numeric color `16711680` becomes `"16711680"`.
/// `gradient_colors` is kept as the raw value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeInfo {
    #[serde(rename = "threadID")]
    pub thread_id: String,
    #[serde(rename = "threadName")]
    pub thread_name: String,
    pub color: Option<String>,
    pub emoji: String,
    pub theme_id: Option<String>,
    pub theme_color: Option<String>,
    pub gradient_colors: Option<Value>,
    pub is_default: bool,
}

/// Both theme operations over one shared set of collaborators
pub struct ThemeClient {
    creator: ThemeCreator,
    reader: ThemeInfoReader,
}

impl ThemeClient {
    pub fn new(
        ctx: Arc<RequestContext>,
        graphql: GraphqlSettings,
        dispatcher: Arc<dyn Dispatcher>,
        threads: Arc<dyn ThreadInfoSource>,
        logger: Arc<dyn ErrorLogger>,
    ) -> Self {
        Self {
            creator: ThemeCreator::new(ctx, graphql, dispatcher, logger.clone()),
            reader: ThemeInfoReader::new(threads, logger),
        }
    }

    pub async fn create_ai_theme(
        &self,
        prompt: &str,
        callback: Option<Callback<Vec<ThemeRecord>>>,
    ) -> Option<Result<Vec<ThemeRecord>, crate::api::ApiError>> {
        self.creator.create_ai_theme(prompt, callback).await
    }

    pub async fn get_theme_info(
        &self,
        thread_id: &str,
        callback: Option<Callback<ThemeInfo>>,
    ) -> Pending<ThemeInfo> {
        self.reader.get_theme_info(thread_id, callback).await
    }

    pub fn creator(&self) -> &ThemeCreator {
        &self.creator
    }

    pub fn reader(&self) -> &ThemeInfoReader {
        &self.reader
    }
}
