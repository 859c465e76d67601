//! End-to-end relay tests for the forwarding proxy.

use std::io::Write;

use forward_proxy::config::ProxyConfig;

mod common;

fn config_with_error_page(page: &tempfile::NamedTempFile) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.relay.error_page_path = page.path().to_string_lossy().into_owned();
    config
}

#[tokio::test]
async fn relays_origin_form_request_verbatim() {
    let (origin_addr, mut captured) = common::start_capturing_origin("hello".to_string()).await;

    let page = tempfile::NamedTempFile::new().unwrap();
    let (proxy_addr, shutdown) = common::start_proxy(config_with_error_page(&page)).await;

    let request = format!(
        "GET /index.html HTTP/1.1\r\nHost: {}\r\n\r\n",
        origin_addr
    );
    let response = common::roundtrip(proxy_addr, request.as_bytes()).await;

    // No absolute-URL prefix in the request, so the origin receives the
    // request bytes unchanged.
    let forwarded = captured.recv().await.unwrap();
    assert_eq!(forwarded, request.as_bytes());

    let text = String::from_utf8(response).unwrap();
    assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(text.ends_with("hello"));

    shutdown.trigger();
}

#[tokio::test]
async fn strips_absolute_form_target_before_origin() {
    let (origin_addr, mut captured) = common::start_capturing_origin("ok".to_string()).await;

    let page = tempfile::NamedTempFile::new().unwrap();
    let (proxy_addr, shutdown) = common::start_proxy(config_with_error_page(&page)).await;

    let request = format!(
        "GET http://{addr}/a HTTP/1.1\r\nHost: {addr}\r\n\r\n",
        addr = origin_addr
    );
    let response = common::roundtrip(proxy_addr, request.as_bytes()).await;

    let forwarded = captured.recv().await.unwrap();
    let forwarded_text = String::from_utf8(forwarded).unwrap();
    assert!(forwarded_text.starts_with("GET /a HTTP/1.1\r\n"));

    assert!(String::from_utf8(response).unwrap().ends_with("ok"));

    shutdown.trigger();
}

#[tokio::test]
async fn streams_response_body_beyond_buffer_capacity() {
    let origin_addr = common::start_mock_origin("x".repeat(1000)).await;

    let page = tempfile::NamedTempFile::new().unwrap();
    let mut config = config_with_error_page(&page);
    // Head capture is truncated at 64 bytes; the remainder must still be
    // streamed to the client in full.
    config.relay.buffer_size = 64;
    let (proxy_addr, shutdown) = common::start_proxy(config).await;

    let request = format!("GET / HTTP/1.1\r\nHost: {}\r\n\r\n", origin_addr);
    let response = common::roundtrip(proxy_addr, request.as_bytes()).await;

    let text = String::from_utf8(response).unwrap();
    assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(text.ends_with(&"x".repeat(1000)));

    shutdown.trigger();
}

#[tokio::test]
async fn serves_http_client_through_proxy() {
    let origin_addr = common::start_mock_origin("proxied body".to_string()).await;

    let page = tempfile::NamedTempFile::new().unwrap();
    let (proxy_addr, shutdown) = common::start_proxy(config_with_error_page(&page)).await;

    let client = reqwest::Client::builder()
        .proxy(reqwest::Proxy::http(format!("http://{}", proxy_addr)).unwrap())
        .build()
        .unwrap();

    let response = client
        .get(format!("http://{}/index.html", origin_addr))
        .send()
        .await
        .expect("Proxy unreachable");

    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "proxied body");

    shutdown.trigger();
}

#[tokio::test]
async fn proxy_stays_serviceable_across_error_branches() {
    let origin_addr = common::start_mock_origin("still alive".to_string()).await;

    let mut page = tempfile::NamedTempFile::new().unwrap();
    write!(page, "<html>blocked</html>").unwrap();
    let (proxy_addr, shutdown) = common::start_proxy(config_with_error_page(&page)).await;

    // Parse failure branch: no Host header at all.
    let response = common::roundtrip(proxy_addr, b"GET / HTTP/1.1\r\n\r\n").await;
    assert!(String::from_utf8_lossy(&response).starts_with("HTTP/1.1 403 Forbidden"));

    // Connect failure branch: resolvable host, closed port.
    let response =
        common::roundtrip(proxy_addr, b"GET / HTTP/1.1\r\nHost: 127.0.0.1:1\r\n\r\n").await;
    assert!(String::from_utf8_lossy(&response).starts_with("HTTP/1.1 403 Forbidden"));

    // Success branch still works after both failures.
    let request = format!("GET / HTTP/1.1\r\nHost: {}\r\n\r\n", origin_addr);
    let response = common::roundtrip(proxy_addr, request.as_bytes()).await;
    assert!(String::from_utf8_lossy(&response).ends_with("still alive"));

    shutdown.trigger();
}
