//! NEL stamping on axum responses, both directly and through a live router.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use axum::body::Body;
use axum::http::HeaderMap;
use axum::response::Response;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use nelhdr_core::{HeaderSink, NelPolicy, ValidationError};
use nelhdr_gateway::app_state::AppState;
use nelhdr_gateway::config::{self, NelMode};
use nelhdr_gateway::router::build_router;
use nelhdr_gateway::stamp::{HeaderMapSink, NelStamp};

fn valid_policy() -> NelPolicy {
    NelPolicy {
        report_to: "default".into(),
        max_age: 3600,
        include_subdomains: true,
        ..NelPolicy::default()
    }
}

#[test]
fn apply_mode_sets_header() {
    let stamp = NelStamp::new(NelMode::Apply, valid_policy());
    let mut resp = Response::new(Body::empty());

    stamp.stamp(&mut HeaderMapSink::of(&mut resp)).unwrap();

    assert_eq!(
        resp.headers().get("NEL").unwrap(),
        r#"{"report_to":"default","max_age":3600,"include_subdomains":true}"#
    );
}

#[test]
fn apply_mode_rejection_leaves_response_untouched() {
    let mut policy = valid_policy();
    policy.max_age = 0;
    let stamp = NelStamp::new(NelMode::Apply, policy);
    let mut resp = Response::new(Body::empty());

    let err = stamp.stamp(&mut HeaderMapSink::of(&mut resp)).unwrap_err();

    assert_eq!(err, ValidationError::PolicyRemoved);
    assert!(resp.headers().get("NEL").is_none());
    assert_eq!(stamp.preview(), None);
}

#[test]
fn revoke_mode_keeps_configured_policy() {
    let stamp = NelStamp::new(NelMode::Revoke, valid_policy());
    let mut headers = HeaderMap::new();

    stamp.stamp(&mut HeaderMapSink(&mut headers)).unwrap();
    stamp.stamp(&mut HeaderMapSink(&mut headers)).unwrap();

    assert_eq!(
        headers.get("nel").unwrap(),
        r#"{"report_to":"default","max_age":0,"include_subdomains":true}"#
    );
    assert_eq!(headers.get_all("nel").iter().count(), 1);
    assert_eq!(stamp.policy().max_age, 3600);
    assert_eq!(
        stamp.preview().as_deref(),
        Some(r#"{"report_to":"default","max_age":0,"include_subdomains":true}"#)
    );
}

#[test]
fn non_ascii_report_to_is_kept() {
    let mut headers = HeaderMap::new();
    HeaderMapSink(&mut headers).set_header("NEL", r#"{"report_to":"grüppe","max_age":0}"#);
    assert_eq!(
        headers.get("nel").unwrap().as_bytes(),
        r#"{"report_to":"grüppe","max_age":0}"#.as_bytes()
    );
}

#[test]
fn invalid_header_value_is_dropped() {
    let mut headers = HeaderMap::new();
    HeaderMapSink(&mut headers).set_header("NEL", "line\nbreak");
    assert!(headers.is_empty());
}

async fn get_raw(addr: std::net::SocketAddr, path: &str) -> String {
    let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
    let req = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
    stream.write_all(req.as_bytes()).await.unwrap();
    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).await.unwrap();
    String::from_utf8(buf).unwrap()
}

async fn serve(yaml: &str) -> std::net::SocketAddr {
    let cfg = config::load_from_str(yaml).unwrap();
    let app = build_router(AppState::new(cfg).unwrap());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

#[tokio::test]
async fn router_stamps_every_route() {
    let addr = serve(
        r#"
version: 1
nel:
  policy:
    report_to: "default"
    max_age: 60
    success_fraction: 0.5
    include_subdomains: true
"#,
    )
    .await;

    let expected = r#"nel: {"report_to":"default","max_age":60,"success_fraction":0.5,"include_subdomains":true}"#;
    for path in ["/healthz", "/v1/nel", "/missing"] {
        let raw = get_raw(addr, path).await.to_ascii_lowercase();
        assert!(raw.contains(&expected.to_ascii_lowercase()), "path={path} response={raw}");
    }

    let raw = get_raw(addr, "/v1/nel").await;
    let body = raw.split("\r\n\r\n").nth(1).unwrap();
    assert_eq!(
        body,
        r#"{"report_to":"default","max_age":60,"success_fraction":0.5,"include_subdomains":true}"#
    );
}

#[tokio::test]
async fn router_whole_fraction_uses_go_layout() {
    let addr = serve(
        r#"
version: 1
nel:
  policy:
    report_to: "default"
    max_age: 86400
    failure_fraction: 1.0
    success_fraction: 0.01
    include_subdomains: true
"#,
    )
    .await;

    let raw = get_raw(addr, "/v1/nel").await;
    let body = raw.split("\r\n\r\n").nth(1).unwrap();
    assert_eq!(
        body,
        r#"{"report_to":"default","max_age":86400,"failure_fraction":1,"success_fraction":0.01,"include_subdomains":true}"#
    );
}

#[tokio::test]
async fn router_unencodable_policy_yields_empty_value() {
    let addr = serve(
        r#"
version: 1
nel:
  policy:
    report_to: "default"
    max_age: 60
    success_fraction: .nan
    include_subdomains: true
"#,
    )
    .await;

    let raw = get_raw(addr, "/v1/nel").await;
    let (head, body) = raw.split_once("\r\n\r\n").unwrap();
    assert_eq!(body, "");
    assert!(
        head.lines().any(|l| l.trim_end().eq_ignore_ascii_case("nel:")),
        "{head}"
    );
}

#[tokio::test]
async fn router_revoke_mode() {
    let addr = serve(
        r#"
version: 1
nel:
  mode: revoke
  policy:
    report_to: "default"
    max_age: 3600
"#,
    )
    .await;

    let raw = get_raw(addr, "/healthz").await.to_ascii_lowercase();
    assert!(raw.contains(r#"nel: {"report_to":"default","max_age":0}"#), "{raw}");
}
