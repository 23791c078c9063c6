//! End-to-end request assembly: arguments and environment in, prepared
//! request and wire dump out. Nothing here touches the network.

mod common;

use std::io::Write;

use common::{build, defaults, draft, dump};
use req::ReqError;
use serde_json::{json, Value};

#[test]
fn get_search_folds_fields_into_query() {
    let env = defaults(&[("REQ_HOST", "localhost:8080"), ("REQ_PATH", "example/movies")]);
    let request = build(&env, &["get", "search", "--", "title=Pulp Fiction"]).unwrap();

    assert_eq!(
        request.url.as_str(),
        "http://localhost:8080/example/movies/search?title=Pulp+Fiction"
    );
    assert!(request.body.is_none());
    assert!(request.headers.get("Content-Type").is_none());
}

#[test]
fn put_with_json_body() {
    let env = defaults(&[("REQ_HOST", "localhost:8080"), ("REQ_PATH", "example")]);
    let request = build(
        &env,
        &[
            "--format",
            "json",
            "put",
            "repos",
            "--",
            "repository=git@github.com:u/r.git",
            "description=Example movies database",
        ],
    )
    .unwrap();

    assert_eq!(request.headers.get("Content-Type"), Some("application/json"));
    let body: Value = serde_json::from_slice(request.body.as_deref().unwrap()).unwrap();
    assert_eq!(
        body,
        json!({
            "description": "Example movies database",
            "repository": "git@github.com:u/r.git",
        })
    );
}

#[test]
fn attachment_forces_multipart_even_with_form_format() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("package.zip");
    std::fs::File::create(&path)
        .unwrap()
        .write_all(b"zip-bytes")
        .unwrap();
    let pair = format!("package=@{}", path.display());

    let env = defaults(&[("REQ_HOST", "localhost"), ("REQ_FORMAT", "form")]);
    let request = build(&env, &["post", "upload", "--", &pair, "channel=stable"]).unwrap();

    let content_type = request.headers.get("Content-Type").unwrap();
    assert!(content_type.starts_with("multipart/form-data"));

    let body = String::from_utf8_lossy(request.body.as_deref().unwrap()).into_owned();
    assert!(body.contains("name=\"package\"; filename=\"package.zip\""));
    assert!(body.contains("zip-bytes"));
    assert!(body.contains("name=\"channel\"\r\n\r\nstable\r\n"));
}

#[test]
fn missing_attachment_aborts_the_build() {
    let dir = tempfile::tempdir().unwrap();
    let pair = format!("f=@{}", dir.path().join("absent.bin").display());

    let err = build(&defaults(&[]), &["post", "localhost", "--", &pair]).unwrap_err();
    assert!(matches!(err, ReqError::Attachment { .. }));
}

#[test]
fn bare_host_invocation() {
    let request = build(&defaults(&[]), &["get", "google.com"]).unwrap();
    assert_eq!(request.url.as_str(), "http://google.com/");
    assert_eq!(request.request_target(), "/");
}

#[test]
fn missing_host_value_is_a_usage_error() {
    let parsed = draft(&defaults(&[]), &["get", "--host"]);
    // `--host` after the method is a host token, not a flag
    assert_eq!(parsed.unwrap().host, "--host");

    let err = draft(&defaults(&[]), &["-v", "--host"]).unwrap_err();
    assert!(err.to_string().contains("no --host value"));
}

#[test]
fn flags_override_environment_defaults() {
    let env = defaults(&[("REQ_HOST", "env.example.com"), ("REQ_PATH", "/env/")]);
    let request = build(
        &env,
        &["--scheme", "https", "--host", "api.example.com", "--path", "v2", "get", "users"],
    )
    .unwrap();
    assert_eq!(request.url.as_str(), "https://api.example.com/v2/users");
}

#[test]
fn form_body_from_environment_format() {
    let env = defaults(&[("REQ_HOST", "localhost"), ("REQ_FORMAT", "form")]);
    let request = build(&env, &["post", "movies", "--", "title=Heat", "year=1995"]).unwrap();
    assert_eq!(
        request.headers.get("Content-Type"),
        Some("application/x-www-form-urlencoded")
    );
    assert_eq!(request.body.as_deref(), Some(&b"title=Heat&year=1995"[..]));
}

#[test]
fn dump_reproduces_method_url_and_headers() {
    let env = defaults(&[("REQ_HOST", "localhost:3000")]);
    let request = build(
        &env,
        &["-v", "--header", "Accept: application/json", "delete", "movies", "7"],
    )
    .unwrap();
    let text = dump(&request);

    let mut lines = text.split("\r\n");
    assert_eq!(lines.next(), Some("DELETE //movies/7 HTTP/1.1"));
    assert_eq!(lines.next(), Some("Host: localhost:3000"));
    for (name, value) in request.headers.iter() {
        assert!(text.contains(&format!("{name}: {value}\r\n")));
    }
    assert!(text.ends_with("\r\n\r\n"));
}
