//! Current theme of a thread, derived from raw thread metadata

use super::{is_truthy, ThemeInfo};
use crate::api::{ApiError, Callback, ErrorLogger, Pending, ThreadInfoSource};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Operation tag used when logging failures
pub const GET_THEME_INFO: &str = "getThemeInfo";

/// Emoji reported when the thread has none
pub const DEFAULT_EMOJI: &str = "👍";

// Source field names per output field, most preferred first.
const THREAD_NAME: &[&str] = &["threadName", "name"];
const COLOR: &[&str] = &["color"];
const EMOJI: &[&str] = &["emoji"];
const THEME_ID: &[&str] = &["theme_id", "themeID"];
const THEME_COLOR: &[&str] = &["theme_color", "color"];
const GRADIENT_COLORS: &[&str] = &["gradient_colors"];

/// Reduce a thread info result to a single record.
///
/// Arrays yield their first element. Nothing, an empty array or a non-object
/// record is a retrieval error.
pub fn normalize_thread_info(raw: Option<Value>) -> Result<Map<String, Value>, ApiError> {
    let record = match raw {
        None | Some(Value::Null) => None,
        Some(Value::Array(items)) => items.into_iter().next(),
        Some(other) => Some(other),
    };

    match record {
        Some(Value::Object(fields)) => Ok(fields),
        Some(_) => Err(ApiError::DataRetrieval(
            "thread info is not an object".to_string(),
        )),
        None => Err(ApiError::DataRetrieval(
            "Could not retrieve thread info".to_string(),
        )),
    }
}

/// Map a raw thread record onto [`ThemeInfo`]
pub fn theme_info_from_record(thread_id: &str, record: &Map<String, Value>) -> ThemeInfo {
    let color = lookup(record, COLOR).map(text);
    let theme_id = lookup(record, THEME_ID).map(text);
    let is_default = color.is_none() && theme_id.is_none();

    ThemeInfo {
        thread_id: thread_id.to_string(),
        thread_name: lookup(record, THREAD_NAME).map(text).unwrap_or_default(),
        color,
        emoji: lookup(record, EMOJI)
            .map(text)
            .unwrap_or_else(|| DEFAULT_EMOJI.to_string()),
        theme_id,
        theme_color: lookup(record, THEME_COLOR).map(text),
        gradient_colors: lookup(record, GRADIENT_COLORS).cloned(),
        is_default,
    }
}

fn lookup<'a>(record: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .find(|value| is_truthy(value))
}

/// String values as-is; anything else as its JSON text
fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Reads the current theme of a thread through a [`ThreadInfoSource`]
pub struct ThemeInfoReader {
    threads: Arc<dyn ThreadInfoSource>,
    logger: Arc<dyn ErrorLogger>,
}

impl ThemeInfoReader {
    pub fn new(threads: Arc<dyn ThreadInfoSource>, logger: Arc<dyn ErrorLogger>) -> Self {
        Self { threads, logger }
    }

    /// Read theme info, returning the result directly
    pub async fn read(&self, thread_id: &str) -> Result<ThemeInfo, ApiError> {
        let result = self.fetch(thread_id).await;
        if let Err(err) = &result {
            self.logger.error(GET_THEME_INFO, &err.to_string());
        }
        result
    }

    /// Read theme info in either calling style.
    ///
    /// A handle is returned in both styles. With a callback, the callback
    /// gets the result and the handle is detached, so waiting on it yields
    /// `None`.
    pub async fn get_theme_info(
        &self,
        thread_id: &str,
        callback: Option<Callback<ThemeInfo>>,
    ) -> Pending<ThemeInfo> {
        Pending::from_outcome(self.read(thread_id).await, callback)
    }

    async fn fetch(&self, thread_id: &str) -> Result<ThemeInfo, ApiError> {
        if thread_id.is_empty() {
            return Err(ApiError::MissingArgument("threadID"));
        }

        let raw = self.threads.get_thread_info(thread_id).await?;
        let record = normalize_thread_info(raw)?;
        Ok(theme_info_from_record(thread_id, &record))
    }
}
