//! Integration tests for the HTTP dispatcher and AI theme creation
//!
//! These tests use wiremock to stand in for the GraphQL endpoint and check
//! the full request/response cycle, including cookies and headers.

use fca_themes::api::{ApiError, Dispatcher, FormPayload, HttpDispatcher, TracingLogger};
use fca_themes::config::{DispatchSettings, GraphqlSettings};
use fca_themes::context::{AppStateCookie, RequestContext};
use fca_themes::themes::ThemeCreator;
use reqwest::cookie::CookieStore;
use reqwest::Url;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_string_contains, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn cookie(key: &str, value: &str) -> AppStateCookie {
    AppStateCookie {
        key: key.to_string(),
        value: value.to_string(),
        domain: "127.0.0.1".to_string(),
        path: "/".to_string(),
    }
}

fn context() -> RequestContext {
    RequestContext::builder()
        .user_id("100001")
        .fb_dtsg("dtsg-token")
        .lsd("lsd-token")
        .cookies(&[cookie("c_user", "100001"), cookie("xs", "secret")])
        .unwrap()
        .build()
}

fn graphql(server: &MockServer) -> GraphqlSettings {
    GraphqlSettings {
        url: format!("{}/api/graphql/", server.uri()),
        ..GraphqlSettings::default()
    }
}

// =============================================================================
// Dispatcher
// =============================================================================

#[tokio::test]
async fn test_post_sends_form_cookies_and_headers() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/graphql/"))
        .and(header("x-fb-lsd", "lsd-token"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(header_exists("cookie"))
        .and(body_string_contains("fb_dtsg=dtsg-token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("for (;;);{\"ok\":true}"))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = context();
    let dispatcher = HttpDispatcher::new(DispatchSettings::default()).unwrap();
    let form = FormPayload::new().field("fb_dtsg", ctx.fb_dtsg());

    let response = dispatcher
        .post(
            &format!("{}/api/graphql/", server.uri()),
            ctx.jar(),
            &form,
            &[("x-fb-lsd", ctx.lsd().to_string())],
        )
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.body, "for (;;);{\"ok\":true}");

    let requests = server.received_requests().await.unwrap();
    let cookies = requests[0].headers.get("cookie").unwrap().to_str().unwrap();
    assert!(cookies.contains("c_user=100001"));
    assert!(cookies.contains("xs=secret"));
}

#[tokio::test]
async fn test_post_reports_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&server)
        .await;

    let dispatcher = HttpDispatcher::new(DispatchSettings::default()).unwrap();
    let response = dispatcher
        .post(&server.uri(), context().jar(), &FormPayload::new(), &[])
        .await
        .unwrap();

    assert_eq!(response.status, 503);
}

#[tokio::test]
async fn test_post_rejects_bad_url() {
    let dispatcher = HttpDispatcher::new(DispatchSettings::default()).unwrap();
    let result = dispatcher
        .post("not a url", context().jar(), &FormPayload::new(), &[])
        .await;

    assert!(matches!(result, Err(ApiError::Transport(_))));
}

#[tokio::test]
async fn test_post_stores_response_cookies() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "fr=abc; Path=/")
                .set_body_string("{}"),
        )
        .mount(&server)
        .await;

    let ctx = context();
    let dispatcher = HttpDispatcher::new(DispatchSettings::default()).unwrap();
    dispatcher
        .post(&server.uri(), ctx.jar(), &FormPayload::new(), &[])
        .await
        .unwrap();

    let url = Url::parse(&server.uri()).unwrap();
    let cookies = ctx.jar().cookies(&url).unwrap();
    let cookies = cookies.to_str().unwrap();
    assert!(cookies.contains("fr=abc"));
    assert!(cookies.contains("c_user=100001"));
}

// =============================================================================
// AI theme creation over HTTP
// =============================================================================

#[tokio::test]
async fn test_create_ai_theme_end_to_end() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/graphql/"))
        .and(header("x-fb-friendly-name", "useGenerateAIThemeMutation"))
        .and(body_string_contains("doc_id=23873748445608673"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "xfb_generate_ai_themes_from_prompt": {
                    "themes": [{"id": "1", "accessibility_label": "Sunset"}]
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let creator = ThemeCreator::new(
        Arc::new(context()),
        graphql(&server),
        Arc::new(HttpDispatcher::new(DispatchSettings::default()).unwrap()),
        Arc::new(TracingLogger),
    );

    let themes = creator.generate("sunset").await.unwrap();
    assert_eq!(themes.len(), 1);
    assert_eq!(themes[0].id(), Some("1"));
    assert_eq!(themes[0].accessibility_label(), Some("Sunset"));
}

#[tokio::test]
async fn test_create_ai_theme_not_logged_in() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("for (;;);{\"error\":1357001}"),
        )
        .mount(&server)
        .await;

    let creator = ThemeCreator::new(
        Arc::new(context()),
        graphql(&server),
        Arc::new(HttpDispatcher::new(DispatchSettings::default()).unwrap()),
        Arc::new(TracingLogger),
    );

    let err = creator.generate("sunset").await.unwrap_err();
    assert!(matches!(err, ApiError::NotLoggedIn { .. }));
}
