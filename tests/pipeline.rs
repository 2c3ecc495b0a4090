// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! End-to-end pipeline tests against a local mock server

mod common;

use std::io::Write;
use std::time::Duration;

use reqkit::{Config, Error, HttpClient, RequestDescriptor, Session};
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::matchers::{body_string, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::map;

#[tokio::test]
async fn test_get_with_params() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get"))
        .and(query_param("name", "张三"))
        .and(query_param("age", "12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"args": {"name": "张三"}})))
        .mount(&server)
        .await;

    let url = format!("{}/get", server.uri());
    let resp = reqkit::api::get_with_params(&url, map(&[("name", "张三"), ("age", "12")]))
        .await
        .unwrap();

    assert_eq!(resp.status_code, 200);
    assert_eq!(resp.reason, "OK");
    assert_eq!(resp.get_str("args.name").as_deref(), Some("张三"));
    assert!(resp.elapsed >= 0.0);
}

#[tokio::test]
async fn test_base_url_and_config_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get"))
        .and(header("x-token", "request"))
        .and(header("x-client", "config"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = HttpClient::new().with_config(
        Config::new()
            .base_url(server.uri())
            .header("X-Token", "config")
            .header("X-Client", "config"),
    );
    let resp = client
        .execute(&RequestDescriptor::to("/get").header("x-token", "request"))
        .await
        .unwrap();

    assert_eq!(resp.status_code, 200);
    assert!(resp.url.starts_with(&server.uri()));
}

#[tokio::test]
async fn test_form_body_infers_post() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/post"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string("a=1"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let request = RequestDescriptor::to(format!("{}/post", server.uri())).form_field("a", "1");
    let resp = reqkit::api::send(&request).await.unwrap();

    assert_eq!(resp.status_code, 200);
    assert_eq!(resp.request.data.as_ref().map(|d| d.len()), Some(1));
}

#[tokio::test]
async fn test_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/post"))
        .and(header("content-type", "application/json"))
        .and(body_string(r#"{"name":"kevin"}"#))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;

    let url = format!("{}/post", server.uri());
    let resp = reqkit::api::post_json(&url, r#"{"name":"kevin"}"#)
        .await
        .unwrap();

    assert_eq!(resp.status_code, 201);
    assert_eq!(resp.reason, "Created");
}

#[tokio::test]
async fn test_raw_wins_over_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/raw"))
        .and(header("content-type", "text/plain"))
        .and(body_string("hello raw"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let request = RequestDescriptor::post(format!("{}/raw", server.uri()))
        .json_text(r#"{"ignored":true}"#)
        .raw("hello raw")
        .content_type("text/plain");
    let resp = reqkit::api::send(&request).await.unwrap();

    assert_eq!(resp.status_code, 200);
}

#[tokio::test]
async fn test_multipart_upload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .and(body_string_contains(r#"name="note""#))
        .and(body_string_contains("remember me"))
        .and(body_string_contains(r#"filename="avatar.txt""#))
        .and(body_string_contains("hello upload"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file_path = dir.path().join("avatar.txt");
    let mut file = std::fs::File::create(&file_path).unwrap();
    file.write_all(b"hello upload").unwrap();

    let url = format!("{}/upload", server.uri());
    let resp = reqkit::api::post_multipart(
        &url,
        map(&[("note", "remember me")]),
        map(&[("avatar", file_path.to_str().unwrap())]),
    )
    .await
    .unwrap();

    assert_eq!(resp.status_code, 200);
}

#[tokio::test]
async fn test_missing_upload_file_fails() {
    let server = MockServer::start().await;
    let url = format!("{}/upload", server.uri());

    let err = reqkit::api::post_multipart(
        &url,
        map(&[]),
        map(&[("avatar", "/definitely/not/here.png")]),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, Error::Upload { ref field, .. } if field == "avatar"));
}

#[tokio::test]
async fn test_basic_auth_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/basic-auth"))
        .and(header("authorization", "Basic a2V2aW46MTIzNDU2"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let request = RequestDescriptor::get(format!("{}/basic-auth", server.uri()))
        .basic_auth("kevin", "123456");
    let resp = reqkit::api::send(&request).await.unwrap();

    assert_eq!(resp.status_code, 200);
}

#[tokio::test]
async fn test_redirect_policy() {
    let server = MockServer::start().await;
    let target = format!("{}/target", server.uri());
    Mock::given(method("GET"))
        .and(path("/redirect"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", target.as_str()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/target"))
        .respond_with(ResponseTemplate::new(200).set_body_string("arrived"))
        .mount(&server)
        .await;

    let url = format!("{}/redirect", server.uri());

    let held = reqkit::api::send(&RequestDescriptor::get(&url).no_redirects(true))
        .await
        .unwrap();
    assert_eq!(held.status_code, 302);
    assert_eq!(held.reason, "Found");
    assert!(held.is_redirect());

    let followed = reqkit::api::get(&url).await.unwrap();
    assert_eq!(followed.status_code, 200);
    assert_eq!(followed.text, "arrived");
    assert!(followed.url.ends_with("/target"));
}

#[tokio::test]
async fn test_not_found_reason() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("nope"))
        .mount(&server)
        .await;

    let resp = reqkit::api::get(&format!("{}/missing", server.uri()))
        .await
        .unwrap();

    assert_eq!(resp.status_code, 404);
    assert_eq!(resp.reason, "Not Found");
    assert!(resp.is_client_error());
    assert!(resp.json_object().is_empty());
}

#[tokio::test]
async fn test_response_headers_and_cookies() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cookies/set"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Set-Cookie", "sid=abc; Path=/; HttpOnly")
                .insert_header("X-Trace", "t-1"),
        )
        .mount(&server)
        .await;

    let resp = reqkit::api::get(&format!("{}/cookies/set", server.uri()))
        .await
        .unwrap();

    assert_eq!(resp.cookies["sid"], "abc");
    assert_eq!(resp.header("X-TRACE"), Some("t-1"));
    assert!(resp.set_cookies()[0].http_only);
}

#[tokio::test]
async fn test_timeout_is_typed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/delay"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let request = RequestDescriptor::get(format!("{}/delay", server.uri())).timeout_ms(200);
    let err = reqkit::api::send(&request).await.unwrap_err();

    assert!(err.is_timeout(), "expected timeout, got {:?}", err);
    assert_eq!(err.url(), Some(format!("{}/delay", server.uri()).as_str()));
}

#[tokio::test]
async fn test_connection_refused_is_send_error() {
    let session = Session::new();
    let err = session.get("http://127.0.0.1:1/").await.unwrap_err();

    assert!(matches!(err, Error::Send { .. }), "got {:?}", err);
    assert!(err.is_send_failure());
    assert!(session.cookies().is_empty());
}

/// Answer one connection with `status_line` and a two-byte body
async fn raw_server(status_line: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        let reply = format!(
            "HTTP/1.1 {}\r\nContent-Length: 2\r\nConnection: close\r\n\r\nok",
            status_line
        );
        socket.write_all(reply.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
    });

    format!("http://{}/", addr)
}

#[tokio::test]
async fn test_non_canonical_reason_kept() {
    let url = raw_server("299 Custom Thing").await;
    let resp = reqkit::api::get(&url).await.unwrap();

    assert_eq!(resp.status_code, 299);
    assert_eq!(resp.reason, "Custom Thing");
    assert_eq!(resp.text, "ok");
}

#[tokio::test]
async fn test_custom_reason_on_standard_code() {
    let url = raw_server("200 Everything Fine").await;
    let resp = reqkit::api::get(&url).await.unwrap();

    assert_eq!(resp.status_code, 200);
    assert_eq!(resp.reason, "Everything Fine");
}

#[tokio::test]
async fn test_config_proxy_routes_request() {
    let proxy = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/proxied"))
        .respond_with(ResponseTemplate::new(200).set_body_string("proxied"))
        .mount(&proxy)
        .await;

    let client = HttpClient::new().with_config(Config::new().proxy(proxy.uri()));
    let resp = client
        .execute(&RequestDescriptor::get("http://upstream.invalid/proxied"))
        .await
        .unwrap();

    assert_eq!(resp.status_code, 200);
    assert_eq!(resp.text, "proxied");
}

#[tokio::test]
async fn test_request_proxy_routes_request() {
    let proxy = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/via-request"))
        .respond_with(ResponseTemplate::new(200).set_body_string("proxied"))
        .mount(&proxy)
        .await;

    let request = RequestDescriptor::get("http://upstream.invalid/via-request").proxy(proxy.uri());
    let resp = reqkit::api::send(&request).await.unwrap();

    assert_eq!(resp.text, "proxied");
}

#[tokio::test]
async fn test_unreachable_host_without_proxy_fails() {
    let err = reqkit::api::get("http://upstream.invalid/proxied")
        .await
        .unwrap_err();
    assert!(err.is_send_failure());
}
