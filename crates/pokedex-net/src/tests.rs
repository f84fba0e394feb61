//! End-to-end tests against a one-shot local HTTP server.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread::JoinHandle;

use pokedex_types::error::FetchError;

use crate::http::{HttpOptions, http_get};

/// Serve each canned response to one connection, in order.
fn serve(responses: Vec<String>) -> (u16, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let handle = std::thread::spawn(move || {
        let mut requests = Vec::new();
        for resp in responses {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 4096];
            let n = stream.read(&mut buf).unwrap();
            requests.push(String::from_utf8_lossy(&buf[..n]).into_owned());
            stream.write_all(resp.as_bytes()).unwrap();
            stream.flush().unwrap();
        }
        requests
    });
    (port, handle)
}

#[test]
fn get_returns_body_and_status() {
    let body = r#"{"count":0,"next":null,"previous":null,"results":[]}"#;
    let (port, handle) = serve(vec![format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{body}",
        body.len()
    )]);

    let url = format!("http://127.0.0.1:{port}/api/v2/location/?offset=20&limit=20");
    let resp = http_get(&url, None, &HttpOptions::default()).unwrap();
    assert_eq!(resp.status_code, 200);
    assert_eq!(resp.body, body.as_bytes());
    assert_eq!(resp.url, url);

    let requests = handle.join().unwrap();
    assert!(requests[0].starts_with("GET /api/v2/location/?offset=20&limit=20 HTTP/1.1\r\n"));
}

#[test]
fn error_status_is_returned_not_raised() {
    let (port, handle) = serve(vec![
        "HTTP/1.1 500 Internal Server Error\r\nContent-Length: 4\r\n\r\noops".to_string(),
    ]);
    let resp = http_get(
        &format!("http://127.0.0.1:{port}/"),
        None,
        &HttpOptions::default(),
    )
    .unwrap();
    assert_eq!(resp.status_code, 500);
    assert_eq!(resp.body, b"oops");
    handle.join().unwrap();
}

#[test]
fn follows_relative_redirect() {
    let (port, handle) = serve(vec![
        "HTTP/1.1 301 Moved\r\nLocation: /api/v2/location/\r\nContent-Length: 0\r\n\r\n"
            .to_string(),
        "HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nok".to_string(),
    ]);
    let resp = http_get(
        &format!("http://127.0.0.1:{port}/api/v2/location"),
        None,
        &HttpOptions::default(),
    )
    .unwrap();
    assert_eq!(resp.status_code, 200);
    assert_eq!(resp.url, format!("http://127.0.0.1:{port}/api/v2/location/"));

    let requests = handle.join().unwrap();
    assert_eq!(requests.len(), 2);
    assert!(requests[1].starts_with("GET /api/v2/location/ HTTP/1.1"));
}

#[test]
fn custom_user_agent_is_sent() {
    let (port, handle) = serve(vec!["HTTP/1.1 204 No Content\r\n\r\n".to_string()]);
    let options = HttpOptions {
        user_agent: "pokedex-test/1".to_string(),
        ..HttpOptions::default()
    };
    http_get(&format!("http://127.0.0.1:{port}/"), None, &options).unwrap();
    let requests = handle.join().unwrap();
    assert!(requests[0].contains("User-Agent: pokedex-test/1\r\n"));
}

#[test]
fn connection_refused_is_transport_error() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let err = http_get(
        &format!("http://127.0.0.1:{port}/"),
        None,
        &HttpOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)));
}
