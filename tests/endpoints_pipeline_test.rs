mod common;

use common::test_config;
use cortex_sentinel_connector::apis::endpoints::endpoints_collector;
use cortex_sentinel_connector::app::poll_use_case::{PollUseCase, RunOutcome};
use cortex_sentinel_connector::app::ports::RecordSource;
use cortex_sentinel_connector::infra::log_analytics::LogAnalyticsSink;
use cortex_sentinel_connector::types::NormalizedRecord;
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ENDPOINTS_PATH: &str = "/public_api/v1/endpoints/get_endpoints";

#[tokio::test]
async fn test_endpoints_request_has_no_filters() {
    let cortex = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINTS_PATH))
        .and(body_json(json!({
            "request_data": {"filters": [], "search_from": 0, "search_to": 100}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "reply": {
                "endpoints": [
                    {
                        "endpoint_id": "a1b2",
                        "endpoint_name": "db-01",
                        "os_type": "AGENT_OS_LINUX",
                        "ip": ["10.2.0.9"],
                        "endpoint_status": "DISCONNECTED",
                        "last_seen": 1704067200000i64,
                        "tags": {"endpoint_tags": ["prod"]}
                    }
                ]
            }
        })))
        .expect(1)
        .mount(&cortex)
        .await;

    let source = endpoints_collector(&test_config()).unwrap().with_base_url(cortex.uri());
    let records = source.fetch().await.unwrap();

    assert_eq!(records.len(), 1);
    let endpoint = match &records[0] {
        NormalizedRecord::Endpoint(endpoint) => endpoint,
        other => panic!("expected an endpoint record, got {:?}", other),
    };
    assert_eq!(endpoint.endpoint_id, "a1b2");
    assert_eq!(endpoint.endpoint_name, "db-01");
    assert_eq!(endpoint.os, "AGENT_OS_LINUX");
    assert_eq!(endpoint.ip_address, r#"["10.2.0.9"]"#);
    assert_eq!(endpoint.status, "DISCONNECTED");
    assert_eq!(endpoint.last_seen_time, json!(1704067200000i64));
    assert_eq!(endpoint.agent_version, "");
    assert_eq!(endpoint.tags, json!({"endpoint_tags": ["prod"]}));
}

#[tokio::test]
async fn test_reply_without_endpoints_skips_the_sink() {
    let cortex = MockServer::start().await;
    let workspace = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINTS_PATH))
        .and(header("x-xdr-auth-id", common::API_KEY_ID))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"reply": {}})))
        .expect(1)
        .mount(&cortex)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&workspace)
        .await;

    let config = test_config();
    let source = endpoints_collector(&config).unwrap().with_base_url(cortex.uri());
    let sink = LogAnalyticsSink::new(&config).unwrap().with_base_url(workspace.uri());
    let use_case = PollUseCase::new(Box::new(source), Box::new(sink));

    let report = use_case.run_once().await.unwrap();

    assert_eq!(report.outcome, RunOutcome::Empty);
    assert_eq!(report.records_sent, 0);
    assert_eq!(report.log_type, "CortexCloudEndpoints");
}

#[tokio::test]
async fn test_endpoint_batch_reaches_workspace_under_endpoint_log_type() {
    let cortex = MockServer::start().await;
    let workspace = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "reply": {"endpoints": [{"endpoint_id": "x"}, {"endpoint_id": "y"}, {"endpoint_id": "z"}]}
        })))
        .mount(&cortex)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/logs"))
        .and(header("Log-Type", "CortexCloudEndpoints"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&workspace)
        .await;

    let config = test_config();
    let source = endpoints_collector(&config).unwrap().with_base_url(cortex.uri());
    let sink = LogAnalyticsSink::new(&config).unwrap().with_base_url(workspace.uri());
    let report = PollUseCase::new(Box::new(source), Box::new(sink))
        .run_once()
        .await
        .unwrap();

    assert_eq!(report.records_sent, 3);
    let requests = workspace.received_requests().await.unwrap();
    let batch: Vec<Value> = serde_json::from_slice(&requests[0].body).unwrap();
    let ids: Vec<_> = batch.iter().map(|r| r["EndpointId"].clone()).collect();
    assert_eq!(ids, vec![json!("x"), json!("y"), json!("z")]);
    assert_eq!(batch[0]["LastSeenTime"], "");
    assert_eq!(batch[0]["Tags"], json!([]));
}

#[test]
fn test_default_endpoint_url_uses_fqdn() {
    let source = endpoints_collector(&test_config()).unwrap();
    assert_eq!(
        source.endpoint_url(),
        "https://api-tenant.xdr.eu.paloaltonetworks.com/public_api/v1/endpoints/get_endpoints"
    );
}
