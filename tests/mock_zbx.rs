#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::time::Duration;

use secrecy::SecretString;
use serde_json::{Value, json};
use tokio::time::timeout;
use url::Url;
use wiremock::matchers::{body_string_contains, method};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zbx_apps::error::{ConfigError, Error as ZbxAppsError, ZbxError};
use zbx_apps::types::SelectQuery;
use zbx_apps::zbx_client::{ApplicationQuery, Items, ZbxClient};

fn client(base: &MockServer) -> ZbxClient {
    ZbxClient::new(
        Url::parse(&base.uri()).expect("valid mock url"),
        SecretString::from("token"),
        Duration::from_secs(2),
        Duration::from_secs(1),
        true,
    )
    .expect("client")
}

fn rpc_result(result: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "jsonrpc": "2.0",
        "result": result,
        "id": 1
    }))
}

async fn request_bodies(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .expect("requests")
        .iter()
        .map(|req| serde_json::from_slice(&req.body).expect("json body"))
        .collect()
}

#[tokio::test]
async fn applications_returns_converted_records() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("application.get"))
        .respond_with(rpc_result(json!([
            {
                "hostid": "10084",
                "applicationid": "1121",
                "name": "CPU",
                "flag": "0",
                "templateids": ["179"],
                "items": [
                    {
                        "itemid": "23296",
                        "name": "Processor load (1 min average per core)",
                        "key_": "system.cpu.load[percpu,avg1]",
                        "lastvalue": "0.0250"
                    }
                ]
            },
            {
                "hostid": "10084",
                "applicationid": "1122",
                "name": "Filesystems",
                "flag": "4",
                "templateids": []
            }
        ])))
        .mount(&server)
        .await;

    let query = ApplicationQuery::new()
        .host_ids(["10084"])
        .select_items(SelectQuery::EXTEND);
    let apps = client(&server).applications(&query).await.expect("apps");

    assert_eq!(apps.len(), 2);
    assert_eq!(apps[0].application_id, 1121);
    assert_eq!(apps[0].host_id, 10084);
    assert_eq!(apps[0].template_ids, vec!["179".to_string()]);
    assert_eq!(
        apps[0].items.list()[0].key.as_deref(),
        Some("system.cpu.load[percpu,avg1]")
    );
    assert_eq!(apps[1].application_id, 1122);
    assert_eq!(apps[1].flags, "4");
    assert!(apps[1].items.list().is_empty());
}

#[tokio::test]
async fn item_count_mode_decodes_counts() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("application.get"))
        .respond_with(rpc_result(json!([
            {
                "hostid": "10084",
                "applicationid": "1",
                "name": "CPU",
                "flag": "0",
                "templateids": [],
                "items": "3"
            }
        ])))
        .mount(&server)
        .await;

    let query = ApplicationQuery::new().select_items(SelectQuery::COUNT);
    let apps = client(&server).applications(&query).await.expect("apps");

    assert_eq!(apps[0].items, Items::Count("3".to_string()));
    assert_eq!(apps[0].items.count(), Some(3));

    let bodies = request_bodies(&server).await;
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["params"]["selectItems"], json!("count"));
}

#[tokio::test]
async fn application_request_payload_snapshot() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(rpc_result(json!([])))
        .mount(&server)
        .await;

    let query = ApplicationQuery::new()
        .host_ids(["10084"])
        .select_items(SelectQuery::EXTEND);
    let _ = client(&server).applications(&query).await;

    let bodies = request_bodies(&server).await;
    let body = &bodies[0];
    insta::assert_json_snapshot!("application_get_payload", body);
}

#[tokio::test]
async fn only_set_filters_reach_the_wire() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(rpc_result(json!([])))
        .mount(&server)
        .await;

    let _ = client(&server)
        .applications(&ApplicationQuery::new().host_ids(["10084"]))
        .await;

    let bodies = request_bodies(&server).await;
    assert_eq!(bodies[0]["params"], json!({"hostids": ["10084"]}));
}

#[tokio::test]
async fn empty_result_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(rpc_result(json!([])))
        .mount(&server)
        .await;

    let err = client(&server)
        .applications(&ApplicationQuery::default())
        .await
        .expect_err("should fail");
    assert!(err.is_not_found(), "unexpected error: {err}");
}

#[tokio::test]
async fn malformed_identifier_reports_record_and_field() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(rpc_result(json!([
            {"hostid": "1", "applicationid": "10", "name": "ok", "flag": "0", "templateids": []},
            {"hostid": "1", "applicationid": "abc", "name": "bad", "flag": "0", "templateids": []}
        ])))
        .mount(&server)
        .await;

    let err = client(&server)
        .applications(&ApplicationQuery::default())
        .await
        .expect_err("should fail");
    match err {
        ZbxAppsError::Zabbix(ZbxError::FieldParse { index, source }) => {
            assert_eq!(index, 1);
            assert_eq!(source.field, "applicationid");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn retries_exhaust_on_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client(&server)
        .applications(&ApplicationQuery::default())
        .await
        .expect_err("should fail");
    match err {
        ZbxAppsError::Zabbix(ZbxError::RetryExhausted { .. }) => {}
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(request_bodies(&server).await.len(), 3);
}

#[tokio::test]
async fn wrongly_shaped_result_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(rpc_result(json!({"applicationid": "1"})))
        .mount(&server)
        .await;

    let err = client(&server)
        .applications(&ApplicationQuery::default())
        .await
        .expect_err("should fail");
    match err {
        ZbxAppsError::Zabbix(ZbxError::Json { message }) => {
            assert!(message.contains("error decoding response body"), "{message}");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(request_bodies(&server).await.len(), 1);
}

#[tokio::test]
async fn truncated_body_is_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"jsonrpc":"2.0","result":["#))
        .mount(&server)
        .await;

    let err = client(&server)
        .applications(&ApplicationQuery::default())
        .await
        .expect_err("should fail");
    match err {
        ZbxAppsError::Zabbix(ZbxError::RetryExhausted { source }) => {
            assert!(matches!(*source, ZbxError::Json { .. }), "{source}");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(request_bodies(&server).await.len(), 3);
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let err = client(&server)
        .applications(&ApplicationQuery::default())
        .await
        .expect_err("should fail");
    match err {
        ZbxAppsError::Zabbix(ZbxError::HttpStatus { status }) => assert_eq!(status.as_u16(), 403),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(request_bodies(&server).await.len(), 1);
}

#[tokio::test]
async fn returns_api_error_details() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "error": {
                "code": -32602,
                "message": "Invalid params.",
                "data": "Not authorised."
            },
            "id": 1
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .applications(&ApplicationQuery::default())
        .await
        .expect_err("should fail");
    match err {
        ZbxAppsError::Zabbix(ZbxError::Api { code, message }) => {
            assert_eq!(code, -32602);
            assert!(message.contains("Not authorised."), "{message}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn envelope_without_result_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"jsonrpc": "2.0", "id": 1})))
        .mount(&server)
        .await;

    let err = client(&server)
        .applications(&ApplicationQuery::default())
        .await
        .expect_err("should fail");
    assert!(matches!(
        err,
        ZbxAppsError::Zabbix(ZbxError::MissingField { field: "result" })
    ));
}

#[tokio::test]
async fn every_request_carries_a_correlation_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(rpc_result(json!([])))
        .mount(&server)
        .await;

    let _ = client(&server)
        .applications(&ApplicationQuery::default())
        .await;

    let requests = server.received_requests().await.expect("requests");
    assert!(requests[0].headers.contains_key("x-correlation-id"));
}

#[tokio::test]
async fn api_version_is_sent_without_auth() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("apiinfo.version"))
        .respond_with(rpc_result(json!("4.0.30")))
        .mount(&server)
        .await;

    let version = client(&server).api_version().await.expect("version");
    assert_eq!(version, "4.0.30");

    let bodies = request_bodies(&server).await;
    assert!(bodies[0].get("auth").is_none());
}

#[tokio::test]
async fn plain_http_requires_insecure_flag() {
    let err = ZbxClient::new(
        Url::parse("http://zabbix.example.com/api_jsonrpc.php").unwrap(),
        SecretString::from("token"),
        Duration::from_secs(1),
        Duration::from_secs(1),
        false,
    )
    .err()
    .expect("http must be refused");
    assert!(matches!(
        err,
        ZbxAppsError::Config(ConfigError::InvalidField {
            field: "zabbix.url",
            ..
        })
    ));
}

#[tokio::test]
async fn timeouts_surface_as_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            rpc_result(json!([])).set_delay(Duration::from_millis(1500)),
        )
        .mount(&server)
        .await;

    let client = ZbxClient::new(
        Url::parse(&server.uri()).unwrap(),
        SecretString::from("token"),
        Duration::from_millis(500),
        Duration::from_millis(200),
        true,
    )
    .unwrap();

    let res = timeout(
        Duration::from_secs(5),
        client.applications(&ApplicationQuery::default()),
    )
    .await;
    let err = res.expect("timeout future").expect_err("should fail");
    assert!(matches!(err, ZbxAppsError::Zabbix(ZbxError::Request { .. })));
}
