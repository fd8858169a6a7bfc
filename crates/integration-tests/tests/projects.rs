//! Integration tests for project routes.

use axum::http::{Method, StatusCode};
use serde_json::{Value, json};

use taskboard_integration_tests::TestContext;

async fn create_project(ctx: &TestContext, title: &str, user_id: i32) -> Value {
    let (status, body) = ctx
        .send(
            Method::POST,
            "/projects",
            Some(json!({ "title": title, "userId": user_id })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

#[tokio::test]
async fn create_project_returns_view() {
    let ctx = TestContext::new();
    let project = create_project(&ctx, "Dashboard", 1).await;

    assert_eq!(project["title"], "Dashboard");
    assert_eq!(project["userId"], 1);
    assert!(project["id"].is_number());
    assert!(project["createdAt"].is_string());
}

#[tokio::test]
async fn get_projects_with_unknown_user_returns_not_found() {
    let ctx = TestContext::new();
    create_project(&ctx, "Orphan", 5).await;

    let (status, body) = ctx.send(Method::GET, "/projects?userId=5", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "User not found" }));

    let (status, _) = ctx.send(Method::GET, "/projects", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_projects_returns_users_projects() {
    let ctx = TestContext::new();
    let user = ctx.create_user("Ana").await;
    create_project(&ctx, "First", user.as_i32()).await;
    create_project(&ctx, "Second", user.as_i32()).await;
    create_project(&ctx, "Someone else's", user.as_i32() + 1).await;

    let (status, page) = ctx
        .send(
            Method::GET,
            &format!("/projects?userId={user}&sort=title&fields=title"),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["count"], 2);
    assert_eq!(page["rows"][0]["title"], "First");
    assert_eq!(page["rows"][1]["title"], "Second");
    assert!(page["rows"][0].get("userId").is_none());
}

#[tokio::test]
async fn edit_project_keeps_absent_fields() {
    let ctx = TestContext::new();
    let project = create_project(&ctx, "Old", 1).await;

    let (status, body) = ctx
        .send(
            Method::PUT,
            &format!("/projects/{}", project["id"]),
            Some(json!({ "title": "New" })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "New");
    assert_eq!(body["userId"], 1);
}

#[tokio::test]
async fn edit_project_with_null_title_clears_it() {
    let ctx = TestContext::new();
    let project = create_project(&ctx, "Old", 1).await;

    let (status, body) = ctx
        .send(
            Method::PUT,
            &format!("/projects/{}", project["id"]),
            Some(json!({ "title": null })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], Value::Null);
    assert_eq!(body["userId"], 1);
}

#[tokio::test]
async fn delete_project_keeps_its_lists() {
    let ctx = TestContext::new();
    let project = create_project(&ctx, "Doomed", 1).await;
    let uri = format!("/projects/{}", project["id"]);

    let (status, _) = ctx
        .send(Method::DELETE, &uri, Some(json!({ "userId": 2 })))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = ctx
        .send(Method::PUT, &uri, Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::OK, "mismatched owner must not delete");

    let (status, _) = ctx
        .send(Method::DELETE, &uri, Some(json!({ "userId": 1 })))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = ctx
        .send(Method::PUT, &uri, Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, lists) = ctx
        .send(
            Method::GET,
            &format!("/lists?projectId={}", project["id"]),
            None,
        )
        .await;
    assert_eq!(lists["count"], 4);
}
