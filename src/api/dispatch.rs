//! HTTP dispatch for form-encoded web API requests

use super::{ApiError, Dispatcher};
use crate::config::DispatchSettings;
use async_trait::async_trait;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{COOKIE, ORIGIN, REFERER, SET_COOKIE, USER_AGENT};
use reqwest::{Client, Url};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Ordered form fields, sent as `application/x-www-form-urlencoded`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormPayload {
    fields: Vec<(String, String)>,
}

impl FormPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((key.into(), value.into()));
        self
    }

    /// First value stored under `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Undecoded HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }
}

/// `Dispatcher` backed by reqwest; cookies come from the session jar per call
pub struct HttpDispatcher {
    client: Client,
    settings: DispatchSettings,
}

impl HttpDispatcher {
    pub fn new(settings: DispatchSettings) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self { client, settings })
    }
}

#[async_trait]
impl Dispatcher for HttpDispatcher {
    async fn post(
        &self,
        url: &str,
        jar: &Jar,
        form: &FormPayload,
        headers: &[(&str, String)],
    ) -> Result<RawResponse, ApiError> {
        let parsed = Url::parse(url)
            .map_err(|e| ApiError::Transport(format!("invalid url {}: {}", url, e)))?;

        let mut request = self
            .client
            .post(parsed.clone())
            .header(USER_AGENT, &self.settings.user_agent)
            .header(ORIGIN, &self.settings.origin)
            .header(REFERER, &self.settings.referer)
            .form(form);

        if let Some(cookies) = jar.cookies(&parsed) {
            request = request.header(COOKIE, cookies);
        }
        for (name, value) in headers {
            request = request.header(*name, value.as_str());
        }

        debug!(url, fields = form.len(), "POST");
        let response = request.send().await?;

        let mut set_cookies = response.headers().get_all(SET_COOKIE).iter();
        jar.set_cookies(&mut set_cookies, &parsed);

        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(RawResponse { status, body })
    }
}
