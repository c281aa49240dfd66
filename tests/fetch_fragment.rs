//! Remote fragment loading against a local single-shot HTTP server.

use std::collections::HashMap;
use std::fs;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::PathBuf;
use std::thread;

use serde_json::{json, Value};

use prepare_openapi::fragment::fetch_url;

/// Serve one HTTP response on an ephemeral port and hand back the raw
/// request for inspection.
fn serve_once(status: &'static str, body: &'static str) -> (String, thread::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();

        let mut request = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let read = stream.read(&mut chunk).unwrap();
            request.extend_from_slice(&chunk[..read]);
            if read == 0 || request.windows(4).any(|window| window == b"\r\n\r\n") {
                break;
            }
        }

        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len(),
        );
        stream.write_all(response.as_bytes()).unwrap();

        String::from_utf8_lossy(&request).into_owned()
    });

    (format!("http://{addr}"), handle)
}

#[test]
fn fetches_json_fragment_and_forwards_headers() {
    let (url, server) = serve_once("200 OK", r#"{"info":{"title":"forum-api"}}"#);

    let mut headers = HashMap::new();
    headers.insert("x-env-hint".to_string(), "staging".to_string());

    let node = fetch_url(&url, &headers).unwrap();
    assert_eq!(node["info"], json!({ "title": "forum-api" }));

    let request = server.join().unwrap().to_ascii_lowercase();
    assert!(request.starts_with("get / http/1.1"));
    assert!(request.contains("x-env-hint: staging"));
}

#[test]
fn http_error_status_is_a_fetch_error() {
    let (url, server) = serve_once("502 Bad Gateway", "");

    let err = fetch_url(&url, &HashMap::new()).unwrap_err();
    assert!(matches!(err, prepare_openapi::PrepareError::Fetch { .. }));

    server.join().unwrap();
}

#[test]
fn non_mapping_response_is_rejected() {
    let (url, server) = serve_once("200 OK", r#"["not", "a", "mapping"]"#);

    let err = fetch_url(&url, &HashMap::new()).unwrap_err();
    assert!(matches!(err, prepare_openapi::PrepareError::NotAMapping(_)));

    server.join().unwrap();
}

#[test]
fn run_merges_url_fragment_with_configured_headers() {
    let (url, server) = serve_once(
        "200 OK",
        r#"{"paths":{"/comments":{"get":{"responses":{"200":{"description":"OK"}}}}}}"#,
    );

    let dir = std::env::temp_dir().join(format!(
        "prepare-openapi-fetch-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    fs::create_dir_all(&dir).unwrap();

    let core = dir.join("core.yml");
    fs::write(&core, "paths:\n  /discussions:\n    get: {}\n").unwrap();
    let out = dir.join("openapi.yml");
    let config: PathBuf = dir.join("prepare.yml");
    fs::write(
        &config,
        format!(
            "out: {out}\nrequest:\n  headers:\n    x-env-hint: staging\nfragments:\n  - path: {core}\n  - url: {url}\n",
            out = out.display(),
            core = core.display(),
        ),
    )
    .unwrap();

    prepare_openapi::run(&config, false).unwrap();

    let request = server.join().unwrap().to_ascii_lowercase();
    assert!(request.contains("x-env-hint: staging"));

    let document: Value = serde_yaml::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    let paths: Vec<&str> = document["paths"]
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(paths, ["/comments", "/discussions"]);

    let _ = fs::remove_dir_all(&dir);
}
