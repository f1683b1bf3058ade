//! Session context shared read-only by every request

use crate::config::Config;
use reqwest::cookie::Jar;
use reqwest::Url;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_HS: &str = "19742.HYP:comet_pkg.2.1..2.1";
pub const DEFAULT_REV: &str = "1017526459";
pub const DEFAULT_S: &str = ":hbexez:79z5zq";
pub const DEFAULT_HSI: &str = "7448759542765711111";

#[derive(Error, Debug)]
pub enum ContextError {
    #[error("Failed to read app state: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse app state: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid cookie domain: {0}")]
    InvalidDomain(String),

    #[error("No user id in configuration or app state")]
    MissingUser,
}

/// One cookie of an exported browser session
#[derive(Debug, Clone, Deserialize)]
pub struct AppStateCookie {
    #[serde(alias = "name")]
    pub key: String,
    pub value: String,
    pub domain: String,
    #[serde(default = "default_cookie_path")]
    pub path: String,
}

fn default_cookie_path() -> String {
    "/".to_string()
}

/// Session identifiers, security tokens, revision flags and the cookie jar
/// for one logged-in account.
///
/// Optional revision flags fall back to fixed literals when unset.
#[derive(Debug, Default)]
pub struct RequestContext {
    user_id: String,
    i_user_id: Option<String>,
    fb_dtsg: Option<String>,
    jazoest: Option<String>,
    lsd: Option<String>,
    hs: Option<String>,
    rev: Option<String>,
    s: Option<String>,
    hsi: Option<String>,
    dyn_: Option<String>,
    csr: Option<String>,
    jar: Arc<Jar>,
}

impl RequestContext {
    pub fn builder() -> RequestContextBuilder {
        RequestContextBuilder::default()
    }

    /// Build a context from configuration, loading the app state cookies if
    /// a path is configured
    pub fn from_config(config: &Config) -> Result<Self, ContextError> {
        let session = &config.session;
        let mut builder = RequestContext::builder();
        builder.ctx.i_user_id = session.i_user_id.clone();
        builder.ctx.fb_dtsg = session.fb_dtsg.clone();
        builder.ctx.jazoest = session.jazoest.clone();
        builder.ctx.lsd = session.lsd.clone();
        builder.ctx.hs = session.hs.clone();
        builder.ctx.rev = session.rev.clone();
        builder.ctx.s = session.s.clone();
        builder.ctx.hsi = session.hsi.clone();
        builder.ctx.dyn_ = session.dyn_.clone();
        builder.ctx.csr = session.csr.clone();

        let mut user_id = session.user_id.clone();
        if let Some(path) = &config.app_state_path {
            let cookies = load_app_state(path)?;
            if user_id.is_none() {
                user_id = cookies
                    .iter()
                    .find(|c| c.key == "c_user")
                    .map(|c| c.value.clone());
            }
            builder = builder.cookies(&cookies)?;
        }

        let user_id = user_id.ok_or(ContextError::MissingUser)?;
        Ok(builder.user_id(user_id).build())
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Account requests are made as: the acting-as user if set, else the
    /// logged-in user
    pub fn actor_id(&self) -> &str {
        self.i_user_id.as_deref().unwrap_or(&self.user_id)
    }

    pub fn fb_dtsg(&self) -> &str {
        self.fb_dtsg.as_deref().unwrap_or_default()
    }

    pub fn jazoest(&self) -> &str {
        self.jazoest.as_deref().unwrap_or_default()
    }

    pub fn lsd(&self) -> &str {
        self.lsd.as_deref().unwrap_or_default()
    }

    pub fn hs(&self) -> &str {
        self.hs.as_deref().unwrap_or(DEFAULT_HS)
    }

    pub fn rev(&self) -> &str {
        self.rev.as_deref().unwrap_or(DEFAULT_REV)
    }

    pub fn s(&self) -> &str {
        self.s.as_deref().unwrap_or(DEFAULT_S)
    }

    pub fn hsi(&self) -> &str {
        self.hsi.as_deref().unwrap_or(DEFAULT_HSI)
    }

    pub fn dyn_(&self) -> &str {
        self.dyn_.as_deref().unwrap_or_default()
    }

    pub fn csr(&self) -> &str {
        self.csr.as_deref().unwrap_or_default()
    }

    pub fn jar(&self) -> &Jar {
        &self.jar
    }
}

/// Builder for [`RequestContext`]
#[derive(Default)]
pub struct RequestContextBuilder {
    ctx: RequestContext,
}

impl RequestContextBuilder {
    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.ctx.user_id = user_id.into();
        self
    }

    pub fn i_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.ctx.i_user_id = Some(user_id.into());
        self
    }

    pub fn fb_dtsg(mut self, token: impl Into<String>) -> Self {
        self.ctx.fb_dtsg = Some(token.into());
        self
    }

    pub fn jazoest(mut self, token: impl Into<String>) -> Self {
        self.ctx.jazoest = Some(token.into());
        self
    }

    pub fn lsd(mut self, token: impl Into<String>) -> Self {
        self.ctx.lsd = Some(token.into());
        self
    }

    pub fn rev(mut self, rev: impl Into<String>) -> Self {
        self.ctx.rev = Some(rev.into());
        self
    }

    pub fn hs(mut self, hs: impl Into<String>) -> Self {
        self.ctx.hs = Some(hs.into());
        self
    }

    /// Add exported browser cookies to the jar
    pub fn cookies(self, cookies: &[AppStateCookie]) -> Result<Self, ContextError> {
        for cookie in cookies {
            let host = cookie.domain.trim_start_matches('.');
            let url = Url::parse(&format!("https://{}/", host))
                .map_err(|_| ContextError::InvalidDomain(cookie.domain.clone()))?;
            let header = format!(
                "{}={}; Domain={}; Path={}",
                cookie.key, cookie.value, cookie.domain, cookie.path
            );
            self.ctx.jar.add_cookie_str(&header, &url);
        }
        debug!(count = cookies.len(), "loaded session cookies");
        Ok(self)
    }

    pub fn build(self) -> RequestContext {
        self.ctx
    }
}

/// Read an app state file (a JSON array of cookies)
pub fn load_app_state(path: &Path) -> Result<Vec<AppStateCookie>, ContextError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigBuilder;
    use reqwest::cookie::CookieStore;

    const APP_STATE: &str = r#"[
        {"key": "c_user", "value": "100042", "domain": ".facebook.com", "path": "/"},
        {"name": "xs", "value": "secret", "domain": "facebook.com"}
    ]"#;

    #[test]
    fn test_defaults_for_revision_flags() {
        let ctx = RequestContext::builder().user_id("1").build();
        assert_eq!(ctx.hs(), DEFAULT_HS);
        assert_eq!(ctx.rev(), DEFAULT_REV);
        assert_eq!(ctx.s(), DEFAULT_S);
        assert_eq!(ctx.hsi(), DEFAULT_HSI);
        assert_eq!(ctx.dyn_(), "");
        assert_eq!(ctx.csr(), "");

        let ctx = RequestContext::builder().user_id("1").rev("2000").build();
        assert_eq!(ctx.rev(), "2000");
    }

    #[test]
    fn test_actor_prefers_acting_user() {
        let ctx = RequestContext::builder().user_id("1").build();
        assert_eq!(ctx.actor_id(), "1");

        let ctx = RequestContext::builder().user_id("1").i_user_id("2").build();
        assert_eq!(ctx.actor_id(), "2");
        assert_eq!(ctx.user_id(), "1");
    }

    #[test]
    fn test_from_config_with_app_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("appstate.json");
        std::fs::write(&path, APP_STATE).unwrap();

        let config = ConfigBuilder::new()
            .app_state_path(&path)
            .fb_dtsg("dtsg")
            .build();
        let ctx = RequestContext::from_config(&config).unwrap();

        assert_eq!(ctx.user_id(), "100042");
        assert_eq!(ctx.fb_dtsg(), "dtsg");

        let url = Url::parse("https://web.facebook.com/api/graphql/").unwrap();
        let header = ctx.jar().cookies(&url).unwrap();
        let header = header.to_str().unwrap();
        assert!(header.contains("c_user=100042"));
        assert!(header.contains("xs=secret"));
    }

    #[test]
    fn test_from_config_without_user() {
        let config = ConfigBuilder::new().fb_dtsg("dtsg").build();
        assert!(matches!(
            RequestContext::from_config(&config),
            Err(ContextError::MissingUser)
        ));
    }
}
