//! `ReqwestTransport` against a local socket.

use crate::integration::test_utils::{closed_port_url, StubServer};
use kanvas_snapshot::config::{HttpConfig, MesheryConfig};
use kanvas_snapshot::design::{DesignClient, DesignRequest};
use kanvas_snapshot::error::RequestError;
use kanvas_snapshot::http::{HttpTransport, OutboundRequest, ReqwestTransport};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn transport(timeout_secs: u64) -> ReqwestTransport {
    ReqwestTransport::new(&HttpConfig {
        timeout_secs,
        connect_timeout_secs: 2,
    })
    .unwrap()
}

#[tokio::test]
async fn test_posts_json_and_returns_status_and_body() {
    let server = StubServer::start(vec![(201, r#"{"ok":true}"#)]);
    let request = OutboundRequest::post(
        format!("{}/api/echo", server.base_url()),
        json!({"name": "nginx"}),
    )
    .header("SystemID", "sys-1");

    let response = transport(5).post_json(request).await.unwrap();

    assert_eq!(response.status, 201);
    assert_eq!(response.body, r#"{"ok":true}"#);

    let captured = server.requests();
    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0].method, "POST");
    assert_eq!(captured[0].path, "/api/echo");
    assert_eq!(captured[0].header("systemid"), Some("sys-1"));
    assert!(captured[0]
        .header("content-type")
        .unwrap_or_default()
        .starts_with("application/json"));
    assert_eq!(captured[0].json(), json!({"name": "nginx"}));
}

#[tokio::test]
async fn test_non_success_status_is_not_a_transport_error() {
    let server = StubServer::start(vec![(500, "internal")]);
    let request = OutboundRequest::post(server.base_url().to_string(), json!({}));

    let response = transport(5).post_json(request).await.unwrap();
    assert_eq!(response.status, 500);

    let err = response.ensure_success().unwrap_err();
    assert_eq!(
        err,
        RequestError::UnexpectedResponseCode {
            status: 500,
            body: "internal".to_string(),
        }
    );
}

#[tokio::test]
async fn test_connection_refused_maps_to_transport_error() {
    let request = OutboundRequest::post(closed_port_url(), json!({}));
    let err = transport(5).post_json(request).await.unwrap_err();
    assert!(matches!(err, RequestError::Transport(_)), "{:?}", err);
}

#[tokio::test]
async fn test_request_timeout_maps_to_transport_error() {
    let server = StubServer::silent(Duration::from_secs(5));
    let request = OutboundRequest::post(server.base_url().to_string(), json!({}));

    let err = transport(1).post_json(request).await.unwrap_err();
    match err {
        RequestError::Transport(message) => assert!(message.contains("timeout"), "{}", message),
        other => panic!("expected transport error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_design_client_over_http() {
    let server = StubServer::start(vec![(200, r#"[{"id":"abc123"}]"#), (200, "[]")]);
    let config = MesheryConfig {
        api_base_url: server.base_url().to_string(),
        provider_token: Some("session-token".to_string()),
        ..MesheryConfig::default()
    };
    let client = DesignClient::new(&config, Arc::new(transport(5)));
    let request = DesignRequest {
        chart_uri: "https://charts.example.com/nginx-1.0.0.tgz".to_string(),
        design_name: "nginx-1.0.0".to_string(),
        notify_email: None,
    };

    let record = client.create_design(&request).await.unwrap();
    assert_eq!(record.design_id, "abc123");

    let err = client.create_design(&request).await.unwrap_err();
    assert!(matches!(err, RequestError::Decoding(_)));

    let captured = server.requests();
    assert_eq!(captured[0].path, "/api/pattern/import");
    assert_eq!(captured[0].header("cookie"), Some("session-token"));
    assert_eq!(captured[0].json()["save"], true);
}
