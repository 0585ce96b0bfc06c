use std::net::SocketAddr;

use async_std::net::TcpStream;
use async_std::prelude::*;
use async_std::task;
use rustycookie::config::{self, ServerConfig};
use rustycookie::net::server::Server;

// Every test installs the same config, so whichever runs first wins.
fn setup() {
    let _ = config::set_config(ServerConfig {
        port: 0,
        trust_proxy: true,
        ..ServerConfig::default()
    });
}

async fn spawn_server() -> SocketAddr {
    setup();
    let server = Server::bind(config::config()).await.unwrap();
    let addr = server.local_addr().unwrap();
    task::spawn(server.run());
    addr
}

async fn send(addr: SocketAddr, raw: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(raw.as_bytes()).await.unwrap();
    let mut out = String::new();
    stream.read_to_string(&mut out).await.unwrap();
    out
}

fn head(response: &str) -> &str {
    response.split("\r\n\r\n").next().unwrap()
}

fn set_cookies(response: &str) -> Vec<&str> {
    head(response)
        .lines()
        .filter_map(|l| l.strip_prefix("Set-Cookie: "))
        .collect()
}

#[async_std::test]
async fn test_visit_counter_round_trip() {
    let addr = spawn_server().await;

    let first = send(addr, "GET / HTTP/1.1\r\nHost: localhost\r\n\r\n").await;
    assert!(first.starts_with("HTTP/1.1 200 OK\r\n"));
    let cookies = set_cookies(&first);
    assert_eq!(cookies.len(), 1);
    assert!(cookies[0].starts_with("visits=1;"));

    let second = send(
        addr,
        "GET / HTTP/1.1\r\nHost: localhost\r\nCookie: theme=dark; visits=1\r\n\r\n",
    )
    .await;
    let cookies = set_cookies(&second);
    assert_eq!(cookies.len(), 1);
    assert!(cookies[0].starts_with("visits=2;"));
    assert!(second.contains("Visit #2"));
}

#[async_std::test]
async fn test_logout_expires_cookie() {
    let addr = spawn_server().await;

    let res = send(
        addr,
        "GET /logout HTTP/1.1\r\nHost: localhost\r\nCookie: visits=7\r\n\r\n",
    )
    .await;
    let cookies = set_cookies(&res);
    assert_eq!(cookies.len(), 1);
    assert!(cookies[0].starts_with("visits=;"));
    assert!(cookies[0].contains("Expires=Thu, 01 Jan 1970 00:00:00 GMT"));
}

#[async_std::test]
async fn test_secure_cookie_over_plain_connection_is_aborted() {
    let addr = spawn_server().await;

    let res = send(addr, "GET /secure HTTP/1.1\r\nHost: localhost\r\n\r\n").await;
    assert!(res.starts_with("HTTP/1.1 500 Internal Server Error\r\n"));
    assert!(set_cookies(&res).is_empty());
    assert!(!res.contains("Token issued"));
}

#[async_std::test]
async fn test_secure_cookie_behind_trusted_proxy() {
    let addr = spawn_server().await;

    let res = send(
        addr,
        "GET /secure HTTP/1.1\r\nHost: localhost\r\nX-Forwarded-Proto: https\r\n\r\n",
    )
    .await;
    assert!(res.starts_with("HTTP/1.1 200 OK\r\n"));
    let cookies = set_cookies(&res);
    assert_eq!(cookies.len(), 1);
    assert!(cookies[0].starts_with("token=issued;"));
    assert!(cookies[0].contains("Secure"));
}

#[async_std::test]
async fn test_malformed_request_gets_no_cookies() {
    let addr = spawn_server().await;

    let res = send(addr, "GET / HTTP/1.1\r\nCookie: visits=1\r\n\r\n").await;
    assert!(res.starts_with("HTTP/1.1 400 Bad Request\r\n"));
    assert!(set_cookies(&res).is_empty());
}

#[async_std::test]
async fn test_response_carries_date_and_close() {
    let addr = spawn_server().await;

    let res = send(addr, "GET /missing HTTP/1.1\r\nHost: localhost\r\n\r\n").await;
    assert!(res.starts_with("HTTP/1.1 404 Not Found\r\n"));
    assert!(head(&res).lines().any(|l| l.starts_with("Date: ")));
    assert!(head(&res).lines().any(|l| l == "Connection: close"));
}
