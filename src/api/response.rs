//! Decoding and session checks for web API responses

use super::{ApiError, RawResponse};
use crate::context::RequestContext;
use serde_json::Value;
use tracing::warn;

/// Prefix prepended to JSON bodies to block script inclusion
const ANTI_HIJACK_PREFIX: &str = "for (;;);";

/// Error code returned when the session cookies are no longer valid
const NOT_LOGGED_IN: i64 = 1357001;

/// Decode a raw response and make sure it came from a live session.
///
/// Bodies may be prefixed with `for (;;);` and GraphQL endpoints sometimes
/// stream several newline-separated JSON objects; only the first carries the
/// operation result.
pub fn parse_and_check_login(ctx: &RequestContext, raw: RawResponse) -> Result<Value, ApiError> {
    if raw.status >= 400 {
        return Err(ApiError::Transport(format!(
            "HTTP {}: {}",
            raw.status,
            truncate(&raw.body, 200)
        )));
    }

    let body = raw.body.trim();
    let body = body.strip_prefix(ANTI_HIJACK_PREFIX).unwrap_or(body);

    let parsed: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(full_err) => {
            let first = body.lines().next().unwrap_or_default();
            serde_json::from_str(first).map_err(|_| {
                ApiError::MalformedResponse(format!(
                    "{} (body: {})",
                    full_err,
                    truncate(body, 200)
                ))
            })?
        }
    };

    if parsed.get("error").and_then(Value::as_i64) == Some(NOT_LOGGED_IN) {
        warn!(user = ctx.actor_id(), "session rejected by server");
        return Err(ApiError::NotLoggedIn {
            user_id: ctx.actor_id().to_string(),
        });
    }

    Ok(parsed)
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
