use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Widget};
use serde_json::Value;
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

// --- widgets ---

#[tokio::test]
async fn list_widgets_empty() {
    let resp = app().oneshot(empty_request("GET", "/v1/widgets")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let widgets: Vec<Widget> = body_json(resp).await;
    assert!(widgets.is_empty());
}

#[tokio::test]
async fn create_widget_returns_201_with_first_id() {
    let resp = app()
        .oneshot(json_request("POST", "/v1/widgets", r#"{"name":"a"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let widget: Widget = body_json(resp).await;
    assert_eq!(widget, Widget { id: 1, name: "a".to_string() });
}

#[tokio::test]
async fn create_widget_rejects_missing_name() {
    let resp = app()
        .oneshot(json_request("POST", "/v1/widgets", r#"{}"#))
        .await
        .unwrap();

    assert!(resp.status().is_client_error());
}

#[tokio::test]
async fn get_unknown_widget_returns_404() {
    let resp = app().oneshot(empty_request("GET", "/v1/widgets/42")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_unknown_widget_explains_itself() {
    let resp = app().oneshot(empty_request("DELETE", "/v1/widgets/42")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(&body_bytes(resp).await[..], b"no such widget");
}

// --- echo ---

#[tokio::test]
async fn echo_reflects_the_request() {
    let req = Request::builder()
        .method("PATCH")
        .uri("/v1/echo/a/b?x=1")
        .header("X-Scope", "1")
        .body("payload".to_string())
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let echoed: Value = body_json(resp).await;
    assert_eq!(echoed["method"], "PATCH");
    assert_eq!(echoed["path"], "/v1/echo/a/b");
    assert_eq!(echoed["query"], "x=1");
    assert_eq!(echoed["headers"]["x-scope"], "1");
    assert_eq!(echoed["body"], "payload");
}

#[tokio::test]
async fn echo_without_query_reports_null() {
    let resp = app().oneshot(empty_request("GET", "/v1/echo")).await.unwrap();

    let echoed: Value = body_json(resp).await;
    assert_eq!(echoed["path"], "/v1/echo");
    assert!(echoed["query"].is_null());
}

// --- fixtures ---

#[tokio::test]
async fn text_is_plain() {
    let resp = app().oneshot(empty_request("GET", "/v1/text")).await.unwrap();

    assert_eq!(
        resp.headers()[http::header::CONTENT_TYPE],
        "text/plain; charset=utf-8"
    );
    assert_eq!(&body_bytes(resp).await[..], b"pong");
}

#[tokio::test]
async fn broken_claims_json_but_is_not() {
    let resp = app().oneshot(empty_request("GET", "/v1/broken")).await.unwrap();

    assert_eq!(resp.headers()[http::header::CONTENT_TYPE], "application/json");
    let bytes = body_bytes(resp).await;
    assert!(serde_json::from_slice::<Value>(&bytes).is_err());
}

#[tokio::test]
async fn empty_is_no_content() {
    let resp = app().oneshot(empty_request("GET", "/v1/empty")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());
}
