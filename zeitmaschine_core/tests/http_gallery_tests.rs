//! Integration tests for the HTTP gallery client
//!
//! Each test starts a loopback server that answers exactly one request and
//! hands back what it received.

use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use zeitmaschine_core::error::{Error, NetworkError};
use zeitmaschine_core::{
    GalleryConfig, HttpGallery, ImageMetadata, ImageService, PageQuery, RemoteGallery,
};
use zeitmaschine_test_utils::SearchResponseBuilder;

/// What the server saw
struct ReceivedRequest {
    request_line: String,
    headers: HashMap<String, String>,
    body: Vec<u8>,
}

/// Serve one request with `status` and `body`, returning the server address
async fn serve_once(status: &'static str, body: Bytes) -> (String, JoinHandle<ReceivedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = format!("http://{}", listener.local_addr().unwrap());

    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut reader = BufReader::new(stream);

        let mut request_line = String::new();
        reader.read_line(&mut request_line).await.unwrap();

        let mut headers = HashMap::new();
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).await.unwrap();
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
            }
        }

        let content_length = headers
            .get("content-length")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(0);
        let mut request_body = vec![0u8; content_length];
        reader.read_exact(&mut request_body).await.unwrap();

        let head = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        );
        let mut stream = reader.into_inner();
        stream.write_all(head.as_bytes()).await.unwrap();
        stream.write_all(&body).await.unwrap();
        let _ = stream.shutdown().await;

        ReceivedRequest {
            request_line: request_line.trim_end().to_string(),
            headers,
            body: request_body,
        }
    });

    (address, server)
}

fn gallery_for(address: &str) -> HttpGallery {
    let config = GalleryConfig::new(
        format!("{address}/zeitmaschine/_search"),
        format!("{address}/"),
    );
    HttpGallery::new(&config).unwrap()
}

#[tokio::test]
async fn test_search_posts_page_query_with_token() {
    let response = SearchResponseBuilder::new()
        .hit("a.jpg", "b64...", "2020-01-01")
        .build();
    let (address, server) = serve_once("200 OK", response).await;
    let gallery = gallery_for(&address).with_bearer_token("tok");
    let service = ImageService::new(Arc::new(gallery));

    let images = service.get_images(0).await.unwrap();
    let request = server.await.unwrap();

    assert_eq!(
        images,
        vec![
            ImageMetadata::new("a.jpg")
                .with_thumbnail("b64...")
                .with_date("2020-01-01")
        ]
    );
    assert_eq!(request.request_line, "POST /zeitmaschine/_search HTTP/1.1");
    assert_eq!(
        request.headers.get("authorization").map(String::as_str),
        Some("Bearer tok")
    );
    assert_eq!(
        request.headers.get("content-type").map(String::as_str),
        Some("application/json")
    );

    let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
    assert_eq!(
        body,
        serde_json::json!({
            "from": 0,
            "size": 64,
            "sort": [{ "created": { "order": "desc" } }]
        })
    );
}

#[tokio::test]
async fn test_fetch_image_requests_rendition_path() {
    let (address, server) = serve_once("200 OK", Bytes::from_static(b"\xff\xd8jpeg")).await;
    let gallery = gallery_for(&address);

    let blob = gallery.fetch_image("2019/a b.jpg", "large").await.unwrap();
    let request = server.await.unwrap();

    assert_eq!(blob, Bytes::from_static(b"\xff\xd8jpeg"));
    assert_eq!(
        request.request_line,
        "GET /image/large?name=2019%2Fa+b.jpg HTTP/1.1"
    );
    assert!(!request.headers.contains_key("authorization"));
    assert!(request.body.is_empty());
}

#[tokio::test]
async fn test_fetch_image_not_found() {
    let (address, server) = serve_once("404 Not Found", Bytes::new()).await;
    let gallery = gallery_for(&address);

    let error = gallery.fetch_image("gone.jpg", "thumbnail").await.unwrap_err();
    server.await.unwrap();

    assert!(matches!(
        error,
        Error::Network(NetworkError::Status { status: 404, .. })
    ));
}

#[tokio::test]
async fn test_search_server_error_is_transient() {
    let (address, server) = serve_once("503 Service Unavailable", Bytes::new()).await;
    let gallery = gallery_for(&address);

    let error = gallery
        .search(&PageQuery::newest_first(64, 64))
        .await
        .unwrap_err();
    let request = server.await.unwrap();

    let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
    assert_eq!(body["from"], 64);
    match error {
        Error::Network(e) => {
            assert!(matches!(e, NetworkError::Status { status: 503, .. }));
            assert!(e.is_transient());
        }
        other => panic!("expected a network error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_search_malformed_body_is_deserialization_error() {
    let (address, server) = serve_once("200 OK", Bytes::from_static(b"<html>")).await;
    let service = ImageService::new(Arc::new(gallery_for(&address)));

    let error = service.get_images(0).await.unwrap_err();
    server.await.unwrap();

    assert!(matches!(error, Error::Deserialization { .. }));
}
