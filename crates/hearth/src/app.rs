use std::time::Duration;

use axum::{http::StatusCode, routing::get, Router};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::{
    handlers::{
        document::render_document,
        health::{healthz, livez},
    },
    state::AppState,
};

/// Headroom on top of the crawler timeout before the request is cut off.
const TIMEOUT_HEADROOM: Duration = Duration::from_secs(5);

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    // Only bounds the time to the response head; streamed bodies are not cut.
    let request_timeout = state.assembler.config().bot_timeout() + TIMEOUT_HEADROOM;

    Router::new()
        .route("/livez", get(livez))
        .route("/healthz", get(healthz))
        .route("/", get(render_document))
        .route("/{*path}", get(render_document))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use hearth_ssr::{AssemblerConfig, RenderMode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    const GOOGLEBOT: &str = "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)";

    fn app(mode: RenderMode) -> Router {
        let state = AppState::demo(AssemblerConfig::with_defaults(mode)).unwrap();
        create_app(state)
    }

    async fn body_string(response: axum::response::Response) -> String {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(body.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_index_streams_full_document() {
        let response = app(RenderMode::Streaming)
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/html");
        assert_eq!(
            response.headers()["cross-origin-embedder-policy"],
            "require-corp"
        );
        assert_eq!(
            response.headers()["cross-origin-opener-policy"],
            "same-origin"
        );

        let html = body_string(response).await;
        assert!(html.starts_with(
            r#"<!DOCTYPE html><html lang="en" data-theme="light"><head><meta charset="utf-8"><title>Hearth</title>"#
        ));
        assert!(html.contains("Loading recent activity..."));
        assert!(html.contains("Deployed build 42"));
        assert!(html.ends_with("</div></body></html>"));
    }

    #[tokio::test]
    async fn test_crawler_receives_settled_document() {
        let response = app(RenderMode::Streaming)
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(header::USER_AGENT, GOOGLEBOT)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("<h2>Recent activity</h2>"));
        assert!(html.ends_with("</div></body></html>"));
    }

    #[tokio::test]
    async fn test_crawler_sees_error_status_for_failed_section() {
        let response = app(RenderMode::Streaming)
            .oneshot(
                Request::builder()
                    .uri("/dashboard")
                    .header(header::USER_AGENT, GOOGLEBOT)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let html = body_string(response).await;
        assert!(html.contains("No open alerts"));
        assert!(!html.contains("billing service unavailable"));
    }

    #[tokio::test]
    async fn test_browser_keeps_status_for_failed_section() {
        let response = app(RenderMode::Streaming)
            .oneshot(
                Request::builder()
                    .uri("/dashboard")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_string(response).await.contains("1,204 requests today"));
    }

    #[tokio::test]
    async fn test_unknown_path_renders_not_found() {
        let response = app(RenderMode::Streaming)
            .oneshot(
                Request::builder()
                    .uri("/missing/page")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/html");
        assert!(body_string(response).await.contains("<h1>Not found</h1>"));
    }

    #[tokio::test]
    async fn test_theme_cookie_is_applied() {
        let response = app(RenderMode::Streaming)
            .oneshot(
                Request::builder()
                    .uri("/about")
                    .header(header::COOKIE, "theme=dark")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(body_string(response)
            .await
            .contains(r#"data-theme="dark""#));
    }

    #[tokio::test]
    async fn test_quoted_theme_cookie_is_applied() {
        let response = app(RenderMode::Streaming)
            .oneshot(
                Request::builder()
                    .uri("/about")
                    .header(header::COOKIE, r#"session=abc; theme="dark""#)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(body_string(response)
            .await
            .contains(r#"data-theme="dark""#));
    }

    #[tokio::test]
    async fn test_buffered_mode_renders_fallbacks() {
        let response = app(RenderMode::Buffered)
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["cross-origin-opener-policy"],
            "same-origin"
        );
        let html = body_string(response).await;
        assert!(html.contains("Loading recent activity..."));
        assert!(!html.contains("Deployed build 42"));
    }

    #[tokio::test]
    async fn test_post_is_not_allowed() {
        let response = app(RenderMode::Streaming)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_shutdown_cancels_renders() {
        let state = AppState::demo(AssemblerConfig::with_defaults(RenderMode::Streaming)).unwrap();
        state.signal_shutdown();

        let response = create_app(state)
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status().as_u16(), 499);
    }

    #[tokio::test]
    async fn test_livez() {
        let response = app(RenderMode::Streaming)
            .oneshot(Request::builder().uri("/livez").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_healthz_reports_config() {
        let response = app(RenderMode::Buffered)
            .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["healthy"], true);
        assert_eq!(json["render_mode"], "buffered");
        assert_eq!(json["bot_timeout_ms"], 5_000);
        assert_eq!(json["default_theme"], "light");
    }
}
