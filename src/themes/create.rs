//! AI theme generation through the `useGenerateAIThemeMutation` GraphQL mutation

use super::{is_truthy, ThemeRecord};
use crate::api::{
    deliver, parse_and_check_login, ApiError, Callback, Dispatcher, ErrorLogger, FormPayload,
};
use crate::config::GraphqlSettings;
use crate::context::RequestContext;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

/// Operation tag used when logging failures
pub const CREATE_AI_THEME: &str = "createAITheme";

/// Build the mutation form for `prompt`, in the field order the web client uses
pub fn build_ai_theme_form(ctx: &RequestContext, graphql: &GraphqlSettings, prompt: &str) -> FormPayload {
    let variables = json!({
        "input": {
            "client_mutation_id": "1",
            "actor_id": ctx.actor_id(),
            "bypass_cache": true,
            "caller": "MESSENGER",
            "num_themes": 1,
            "prompt": prompt,
        }
    });
    let analytics_tags = json!([format!("qpl_active_flow_ids={}", graphql.qpl_active_flow_ids)]);

    FormPayload::new()
        .field("av", ctx.actor_id())
        .field("__user", ctx.actor_id())
        .field("__a", "1")
        .field("__req", "1")
        .field("__hs", ctx.hs())
        .field("dpr", "1")
        .field("__ccg", "EXCELLENT")
        .field("__rev", ctx.rev())
        .field("__s", ctx.s())
        .field("__hsi", ctx.hsi())
        .field("__dyn", ctx.dyn_())
        .field("__csr", ctx.csr())
        .field("__comet_req", "15")
        .field("fb_dtsg", ctx.fb_dtsg())
        .field("jazoest", ctx.jazoest())
        .field("lsd", ctx.lsd())
        .field("qpl_active_flow_ids", graphql.qpl_active_flow_ids.as_str())
        .field("fb_api_caller_class", "RelayModern")
        .field("fb_api_req_friendly_name", graphql.ai_theme_friendly_name.as_str())
        .field("variables", variables.to_string())
        .field("server_timestamps", "true")
        .field("doc_id", graphql.ai_theme_doc_id.as_str())
        .field("fb_api_analytics_tags", analytics_tags.to_string())
}

/// Generates AI themes from a text prompt
pub struct ThemeCreator {
    ctx: Arc<RequestContext>,
    graphql: GraphqlSettings,
    dispatcher: Arc<dyn Dispatcher>,
    logger: Arc<dyn ErrorLogger>,
}

impl ThemeCreator {
    pub fn new(
        ctx: Arc<RequestContext>,
        graphql: GraphqlSettings,
        dispatcher: Arc<dyn Dispatcher>,
        logger: Arc<dyn ErrorLogger>,
    ) -> Self {
        Self {
            ctx,
            graphql,
            dispatcher,
            logger,
        }
    }

    /// Generate themes, returning the result directly
    pub async fn generate(&self, prompt: &str) -> Result<Vec<ThemeRecord>, ApiError> {
        let result = self.request(prompt).await;
        if let Err(err) = &result {
            self.logger.error(CREATE_AI_THEME, &err.to_string());
        }
        result
    }

    /// Generate themes in either calling style.
    ///
    /// With a callback the result is handed to it and `None` is returned;
    /// without one the result is returned.
    pub async fn create_ai_theme(
        &self,
        prompt: &str,
        callback: Option<Callback<Vec<ThemeRecord>>>,
    ) -> Option<Result<Vec<ThemeRecord>, ApiError>> {
        deliver(self.generate(prompt).await, callback)
    }

    async fn request(&self, prompt: &str) -> Result<Vec<ThemeRecord>, ApiError> {
        let form = build_ai_theme_form(&self.ctx, &self.graphql, prompt);
        let headers = [
            ("x-fb-friendly-name", self.graphql.ai_theme_friendly_name.clone()),
            ("x-fb-lsd", self.ctx.lsd().to_string()),
        ];

        debug!(actor = self.ctx.actor_id(), "requesting AI theme");
        let raw = self
            .dispatcher
            .post(&self.graphql.url, self.ctx.jar(), &form, &headers)
            .await?;
        let body = parse_and_check_login(&self.ctx, raw)?;

        extract_themes(body)
    }
}

fn extract_themes(mut body: Value) -> Result<Vec<ThemeRecord>, ApiError> {
    if let Some(errors) = body.get_mut("errors") {
        if is_truthy(errors) {
            return Err(ApiError::RemoteApi(errors.take()));
        }
    }

    match body
        .pointer_mut("/data/xfb_generate_ai_themes_from_prompt/themes")
        .map(Value::take)
    {
        Some(Value::Array(themes)) => Ok(themes.into_iter().map(ThemeRecord::new).collect()),
        _ => Err(ApiError::MalformedResponse(
            "missing data.xfb_generate_ai_themes_from_prompt.themes".to_string(),
        )),
    }
}
