use crumbs::config::{Config, Source};
use crumbs::error::CrumbsError;
use crumbs::http::CollectorClient;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

fn config_for(server: &MockServer, key: Option<&str>) -> Config {
    let mut config = Config::default();
    config.source.source = Some(Source::Remote(format!("{}/api/v1/data/", server.uri())));
    config.source.key = key.map(str::to_string);
    config
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn test_fetch_sends_key_header() {
    if !can_bind_localhost() {
        return;
    }

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/data/"))
        .and(header("spec", "s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "_id": "1", "url": "example.com", "data": "a=1", "updatedAt": "2024-01-01T00:00:00Z" },
            { "profile": "p", "cookiesList": [{ "_id": "2" }] }
        ])))
        .mount(&server)
        .await;

    let client = CollectorClient::new(config_for(&server, Some("s3cret"))).expect("client");
    let records = client.fetch_records().await.expect("records");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].data.as_deref(), Some("a=1"));
    assert_eq!(records[1].cookies_list.as_ref().map(Vec::len), Some(1));
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn test_fetch_uses_custom_key_header() {
    if !can_bind_localhost() {
        return;
    }

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("x-access", "k"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let mut config = config_for(&server, Some("k"));
    config.source.key_header = "x-access".to_string();
    let client = CollectorClient::new(config).expect("client");
    let records = client.fetch_records().await.expect("records");
    assert!(records.is_empty());
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn test_fetch_rejects_error_status() {
    if !can_bind_localhost() {
        return;
    }

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let client = CollectorClient::new(config_for(&server, None)).expect("client");
    let err = client.fetch_records().await.expect_err("forbidden");
    assert!(matches!(err, CrumbsError::Status(403)));
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn test_fetch_rejects_non_array_body() {
    if !can_bind_localhost() {
        return;
    }

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"error\":\"nope\"}"))
        .mount(&server)
        .await;

    let client = CollectorClient::new(config_for(&server, None)).expect("client");
    let err = client.fetch_records().await.expect_err("not an array");
    assert!(matches!(err, CrumbsError::Json(_)));
}
