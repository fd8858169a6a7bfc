//! Integration tests for health checks and authentication.

use axum::http::{Method, StatusCode};
use serde_json::Value;

use taskboard_integration_tests::TestContext;

#[tokio::test]
async fn health_checks_need_no_token() {
    let ctx = TestContext::new();

    let (status, body) = ctx
        .send_with_token(Method::GET, "/health", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("ok".to_string()));

    let (status, _) = ctx
        .send_with_token(Method::GET, "/health/ready", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn board_routes_require_token() {
    let ctx = TestContext::new();

    for uri in ["/lists", "/projects?userId=1"] {
        let (status, body) = ctx.send_with_token(Method::GET, uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(body["error"], "Unauthorized");

        let (status, _) = ctx
            .send_with_token(Method::GET, uri, None, Some("not-the-token"))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
    }
}
