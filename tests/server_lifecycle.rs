//! Serving over a real socket and shutting down gracefully.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use restskin::Shutdown;

mod common;

async fn raw_request(addr: std::net::SocketAddr, request: &str) -> String {
    let mut socket = TcpStream::connect(addr).await.unwrap();
    socket.write_all(request.as_bytes()).await.unwrap();
    let mut response = Vec::new();
    socket.read_to_end(&mut response).await.unwrap();
    String::from_utf8(response).unwrap().to_ascii_lowercase()
}

#[tokio::test]
async fn test_serves_and_shuts_down() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = common::server(common::config());
    let handle = tokio::spawn(server.run(listener, shutdown.clone()));

    let response = raw_request(
        addr,
        "POST /++rest++b/app HTTP/1.1\r\nHost: localhost\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
    )
    .await;
    assert!(response.starts_with("http/1.1 405 method not allowed"), "{response}");
    assert!(response.contains("allow: get, put\r\n"));
    assert!(response.contains("content-length: 18\r\n"));
    assert!(response.contains("x-request-id: "));
    assert!(response.ends_with("\r\n\r\nmethod not allowed"));

    let response = raw_request(
        addr,
        "GET /++rest++e/app/alpha HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    )
    .await;
    assert!(response.starts_with("http/1.1 200 ok"), "{response}");
    assert!(response.ends_with("get3"));

    shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("server stops after shutdown")
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn test_oversized_body_rejected() {
    let mut config = common::config();
    config.limits.max_body_bytes = 8;
    let router = common::router(config);

    let reply = common::send(&router, "POST", "/++rest++f/app/alpha", None, b"far more than eight bytes").await;
    assert_eq!(reply.status, axum::http::StatusCode::PAYLOAD_TOO_LARGE);
}
