mod common;

use axum::{
    body::to_bytes,
    http::{header, Method},
};

#[tokio::test]
async fn pixel_is_served_for_unknown_targets() {
    let app = common::test_app().await;
    let response = app.send(Method::GET, "/t/r/no-such-target", None, None).await;
    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/gif");
    assert_eq!(
        response.headers()[header::CACHE_CONTROL],
        "no-cache, no-store, must-revalidate"
    );
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(body.starts_with(b"GIF89a"));
}

#[tokio::test]
async fn click_on_unknown_target_redirects_to_fallback() {
    let app = common::test_app().await;
    let response = app.send(Method::GET, "/t/c/no-such-target", None, None).await;
    assert_eq!(response.status(), 302);
    assert_eq!(
        response.headers()[header::LOCATION],
        "https://fallback.example.com/"
    );
}

#[tokio::test]
async fn portal_marks_report_unknown_targets() {
    let app = common::test_app().await;
    let (status, _) = app
        .json(Method::POST, "/customer/messages/no-such-target/read", None, None)
        .await;
    assert_eq!(status, 404);
}
