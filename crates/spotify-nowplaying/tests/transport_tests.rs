//! HTTP ingress and handler loop tests.

mod common;

use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use tower::ServiceExt;
use wiremock::MockServer;

use common::harness;
use spotify_nowplaying::Registry;
use spotify_nowplaying::models::Visibility;
use spotify_nowplaying::server::{Bot, transport::create_router};

fn command_request(command: &str, user_id: &str) -> Request<Body> {
    let body = serde_urlencoded::to_string([
        ("command", command),
        ("user_id", user_id),
        ("response_url", "https://hooks.example.com/respond/1"),
        ("text", ""),
    ])
    .unwrap();

    Request::post("/slack/command")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let router = create_router(spotify_nowplaying::server::Dispatcher::default());

    let response =
        router.oneshot(Request::get("/health").body(Body::empty()).unwrap()).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_unknown_command_is_404() {
    let mock_server = MockServer::start().await;
    let h = harness(&mock_server).await;
    let bot = Bot::start(&Registry::spotify().unwrap(), &h.ctx, 4);

    let response =
        create_router(bot.dispatcher()).oneshot(command_request("/weather", "U1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    bot.shutdown().await;
}

#[tokio::test]
async fn test_unknown_webhook_is_404() {
    let mock_server = MockServer::start().await;
    let h = harness(&mock_server).await;
    let bot = Bot::start(&Registry::spotify().unwrap(), &h.ctx, 4);

    let response = create_router(bot.dispatcher())
        .oneshot(Request::get("/webhooks/github?x=1").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    bot.shutdown().await;
}

#[tokio::test]
async fn test_command_is_dispatched_to_loop() {
    let mock_server = MockServer::start().await;
    let h = harness(&mock_server).await;
    let bot = Bot::start(&Registry::spotify().unwrap(), &h.ctx, 4);

    let response =
        create_router(bot.dispatcher()).oneshot(command_request("/nowplaying", "U1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let sent = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let sent = h.replies.sent().await;
            if !sent.is_empty() {
                return sent;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();

    assert_eq!(sent[0].0, "https://hooks.example.com/respond/1");
    assert_eq!(sent[0].1.visibility, Visibility::Ephemeral);
    assert!(sent[0].1.text.contains("Please visit"));

    bot.shutdown().await;
}

#[tokio::test]
async fn test_webhook_acknowledged_with_ok() {
    let mock_server = MockServer::start().await;
    let h = harness(&mock_server).await;
    let bot = Bot::start(&Registry::spotify().unwrap(), &h.ctx, 4);

    let response = create_router(bot.dispatcher())
        .oneshot(
            Request::get("/webhooks/spotifyAuthorize?code=abc&state=S1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");

    bot.shutdown().await;
}

#[tokio::test]
async fn test_dispatch_after_shutdown_is_unavailable() {
    let mock_server = MockServer::start().await;
    let h = harness(&mock_server).await;
    let bot = Bot::start(&Registry::spotify().unwrap(), &h.ctx, 4);
    let router = create_router(bot.dispatcher());

    bot.shutdown().await;

    let response = router.oneshot(command_request("/nowplaying", "U1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(h.replies.sent().await.is_empty());
}

#[tokio::test]
async fn test_shutdown_stops_loops() {
    let mock_server = MockServer::start().await;
    let h = harness(&mock_server).await;
    let bot = Bot::start(&Registry::spotify().unwrap(), &h.ctx, 4);

    tokio::time::timeout(Duration::from_secs(5), bot.shutdown()).await.unwrap();
    assert!(h.ctx.cancel.is_cancelled());
}
