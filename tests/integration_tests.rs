//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: settings + built-in catalog → HTTP requests → records

use dataarts_studio::lister::Lister;
use dataarts_studio::{load_catalog, Arguments, DataArtsService, Error, ListRequest, Settings};
use dataarts_studio::pagination::{PaginationConfig, StopCondition};
use dataarts_studio::http::{HttpClient, HttpClientConfig};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings(server: &MockServer) -> Settings {
    Settings::from_yaml_str(&format!(
        r"
endpoint: {}
project_id: p1
workspace_id: ws-1
auth_token: tok
max_retries: 0
rate_limit_rps: 0
",
        server.uri()
    ))
    .unwrap()
}

fn service(server: &MockServer) -> DataArtsService {
    let catalog = load_catalog("dataarts").unwrap();
    DataArtsService::from_settings(&settings(server), catalog).unwrap()
}

fn args(pairs: &[(&str, &str)]) -> Arguments {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

fn business_error(code: &str) -> ResponseTemplate {
    ResponseTemplate::new(400).set_body_json(json!({
        "error_code": code,
        "error_msg": "resource does not exist"
    }))
}

// ============================================================================
// Lister Integration Tests
// ============================================================================

#[tokio::test]
async fn test_lister_over_http_client() {
    let server = MockServer::start().await;

    for (offset, body) in [
        ("0", json!({"items": [{"id": 1}, {"id": 2}]})),
        ("2", json!({"items": [{"id": 3}]})),
        ("3", json!({"items": []})),
    ] {
        Mock::given(method("GET"))
            .and(path("/items"))
            .and(query_param("offset", offset))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = HttpClient::with_config(
        HttpClientConfig::builder()
            .base_url(server.uri())
            .max_retries(0)
            .no_rate_limit()
            .build(),
    )
    .unwrap();
    let lister = Lister::new(Arc::new(client));

    let request = ListRequest::new("items")
        .records_path("items")
        .pagination(PaginationConfig::offset("offset", "limit", 2, StopCondition::EmptyPage));
    let listing = lister.list_all(&request).await.unwrap();

    assert_eq!(listing.records, vec![json!({"id": 1}), json!({"id": 2}), json!({"id": 3})]);
    assert_eq!(listing.stats.pages_fetched, 3);
    assert_eq!(listing.stats.records_fetched, 3);
}

// ============================================================================
// Built-in Catalog Flows
// ============================================================================

#[tokio::test]
async fn test_list_apps_until_empty_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/p1/service/apps"))
        .and(query_param("offset", "0"))
        .and(query_param("limit", "100"))
        .and(header("workspace", "ws-1"))
        .and(header("Dlm-Type", "SHARED"))
        .and(header("X-Auth-Token", "tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "apps": [
                {"id": "a1", "app_type": "APIG", "create_user": "alice"},
                {"id": "a2", "app_type": "ROMA", "create_user": "bob"}
            ],
            "total": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/p1/service/apps"))
        .and(query_param("offset", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"apps": [], "total": 2})))
        .expect(1)
        .mount(&server)
        .await;

    let records = service(&server)
        .list("dataservice_apps", &args(&[("created_by", "bob")]))
        .await
        .unwrap();

    assert_eq!(
        records,
        vec![json!({"id": "a2", "app_type": "ROMA", "create_user": "bob"})]
    );
}

#[tokio::test]
async fn test_list_messages_until_total() {
    let server = MockServer::start().await;

    let page = |range: std::ops::Range<u32>| {
        let records: Vec<Value> = range
            .map(|i| json!({"id": format!("m{i}"), "app_name": if i % 2 == 0 { "even" } else { "odd" }}))
            .collect();
        json!({"records": records, "total": 12})
    };

    Mock::given(method("GET"))
        .and(path("/v1/p1/service/messages"))
        .and(query_param("offset", "0"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(0..10)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/p1/service/messages"))
        .and(query_param("offset", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(10..12)))
        .expect(1)
        .mount(&server)
        .await;

    let svc = service(&server);

    let all = svc.list("authorization_messages", &Arguments::new()).await.unwrap();
    assert_eq!(all.len(), 12);
    assert_eq!(all[11]["id"], "m11");
}

#[tokio::test]
async fn test_list_apis_with_details() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/p1/service/apis"))
        .and(header("Dlm-Type", "EXCLUSIVE"))
        .and(query_param("name", "orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "records": [
                {"id": "api-1", "name": "orders"},
                {"id": "api-2", "name": "orders"}
            ],
            "total": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/p1/service/apis/api-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "api-1",
            "name": "orders",
            "protocol": "PROTOCOL_TYPE_HTTPS",
            "create_time": 1_700_000_000_000_i64
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/p1/service/apis/api-2"))
        .respond_with(business_error("DLM.4018"))
        .mount(&server)
        .await;

    let records = service(&server)
        .list(
            "dataservice_apis",
            &args(&[("name", "orders"), ("dlm_type", "EXCLUSIVE")]),
        )
        .await
        .unwrap();

    assert_eq!(records.len(), 1);
    let api = &records[0];
    assert_eq!(api["id"], "api-1");
    assert_eq!(api["protocol"], "PROTOCOL_TYPE_HTTPS");
    assert_eq!(api["created_at"], "2023-11-14T22:13:20Z");
    assert_eq!(api["updated_at"], Value::Null);
    assert_eq!(api["request_params"], json!([]));
}

#[tokio::test]
async fn test_get_api_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/p1/service/apis/gone"))
        .respond_with(business_error("DLM.4001"))
        .expect(1)
        .mount(&server)
        .await;

    let record = service(&server)
        .get("dataservice_apis", &Arguments::new(), "gone")
        .await
        .unwrap();
    assert_eq!(record, None);
}

#[tokio::test]
async fn test_find_job_by_name() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/p1/jobs"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jobs": [
                {"name": "job_a", "processType": "BATCH", "priority": 0, "createTime": 1_700_000_000_000_i64},
                {"name": "job_b", "processType": "REAL_TIME", "priority": 1, "createTime": 1_700_000_000_000_i64}
            ],
            "total": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let job = service(&server)
        .find("factory_jobs", &Arguments::new(), "job_b")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(job["name"], "job_b");
    assert_eq!(job["process_type"], "REAL_TIME");
    assert_eq!(job["priority"], "1");
    assert_eq!(job["created_at"], "2023-11-14T22:13:20Z");
}

#[tokio::test]
async fn test_table_models_nested_error_code() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/p1/design/table-model"))
        .and(query_param("model_id", "m-9"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "errors": [{"error_code": "DLG.0818", "error_msg": "model not found"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = service(&server)
        .list("architecture_table_models", &args(&[("model_id", "m-9")]))
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert!(matches!(err, Error::ResourceNotFound { ref code, .. } if code == "DLG.0818"));
}

#[tokio::test]
async fn test_unlisted_business_error_propagates() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/p1/service/apps"))
        .respond_with(business_error("DLM.1234"))
        .mount(&server)
        .await;

    let err = service(&server)
        .list("dataservice_apps", &Arguments::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::HttpStatus { status: 400, .. }));
}

#[tokio::test]
async fn test_code_table_values_need_table_id() {
    let server = MockServer::start().await;

    let err = service(&server)
        .list("code_table_values", &Arguments::new())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("code_table_id"));
}

#[tokio::test]
async fn test_code_table_values_page_by_fifty() {
    let server = MockServer::start().await;

    let page = |range: std::ops::Range<u32>| {
        let records: Vec<Value> = range.map(|i| json!({"fd_value": format!("v{i}")})).collect();
        json!({"data": {"value": {"records": records}}})
    };

    for (offset, body) in [("0", page(0..50)), ("50", page(50..60)), ("60", page(0..0))] {
        Mock::given(method("GET"))
            .and(path("/v2/p1/design/code-tables/ct-1/values"))
            .and(query_param("limit", "50"))
            .and(query_param("offset", offset))
            .and(header("workspace", "ws-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&server)
            .await;
    }

    let values = service(&server)
        .list("code_table_values", &args(&[("code_table_id", "ct-1")]))
        .await
        .unwrap();

    assert_eq!(values.len(), 60);
    assert_eq!(values[0], json!({"fd_value": "v0"}));
    assert_eq!(values[59], json!({"fd_value": "v59"}));
}

#[tokio::test]
async fn test_list_code_tables_by_name() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/p1/design/code-tables"))
        .and(query_param("name", "colour"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"value": {"records": [
                {"id": "ct-1", "name_ch": "colour", "name_en": "COLOUR", "create_time": 1_700_000_000},
                {"id": "ct-2", "name_ch": "colour_old", "name_en": "COLOUR_OLD"}
            ]}}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/p1/design/code-tables"))
        .and(query_param("offset", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"value": {"records": []}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tables = service(&server)
        .list("architecture_code_tables", &args(&[("name", "colour"), ("name_ch", "colour")]))
        .await
        .unwrap();

    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0]["id"], "ct-1");
    assert_eq!(tables[0]["name"], "colour");
    assert_eq!(tables[0]["code"], "COLOUR");
    assert_eq!(tables[0]["created_at"], "2023-11-14T22:13:20Z");
}

#[tokio::test]
async fn test_get_code_table_detail() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/p1/design/code-tables/ct-1"))
        .and(header("workspace", "ws-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"value": {"id": "ct-1", "name_ch": "colour", "directory_id": "d-1"}}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/p1/design/code-tables/ct-9"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "errors": [{"error_code": "DLG.6022", "error_msg": "code table not found"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let svc = service(&server);
    let table = svc
        .get("architecture_code_tables", &Arguments::new(), "ct-1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(table["name"], "colour");
    assert_eq!(table["directory_id"], "d-1");

    assert_eq!(
        svc.get("architecture_code_tables", &Arguments::new(), "ct-9").await.unwrap(),
        None
    );
}

#[tokio::test]
async fn test_standard_template_fields() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/p1/design/standards/templates"))
        .and(header("workspace", "ws-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"value": {
                "hasTemplate": true,
                "optional": [
                    {"id": "f1", "fd_name": "dataLength", "actived": true, "required": false},
                    {"id": "f2", "fd_name": "referCodeTable", "actived": false, "required": false}
                ],
                "custom": [
                    {"id": "c1", "fd_name": "owner_dept", "optional_values": "a;b", "required": true}
                ]
            }}
        })))
        .expect(2)
        .mount(&server)
        .await;

    let svc = service(&server);

    let optional = svc
        .list("standard_template_optional_fields", &args(&[("actived", "true")]))
        .await
        .unwrap();
    assert_eq!(optional.len(), 1);
    assert_eq!(optional[0]["field_name"], "dataLength");
    assert_eq!(optional[0]["created_by"], Value::Null);

    let custom = svc
        .list("standard_template_custom_fields", &Arguments::new())
        .await
        .unwrap();
    assert_eq!(custom.len(), 1);
    assert_eq!(custom[0]["optional_values"], "a;b");
    assert_eq!(custom[0]["required"], true);
}

#[tokio::test]
async fn test_datatables_of_connection() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/p1/conn-1/datatables"))
        .and(query_param("database_name", "sales"))
        .and(query_param("limit", "16"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tables": [{"table_id": "t-1", "table_name": "orders"}, {"table_id": "t-2", "table_name": "items"}]
        })))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/p1/conn-1/datatables"))
        .and(query_param("offset", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"tables": []})))
        .expect(1)
        .mount(&server)
        .await;

    let table = service(&server)
        .find(
            "datatables",
            &args(&[("connection_id", "conn-1"), ("database_name", "sales")]),
            "t-2",
        )
        .await
        .unwrap();
    assert_eq!(table, Some(json!({"table_id": "t-2", "table_name": "items"})));

    let tables = service(&server)
        .list(
            "datatables",
            &args(&[("connection_id", "conn-1"), ("database_name", "sales"), ("table_id", "t-1")]),
        )
        .await;
    assert_eq!(tables.unwrap(), vec![json!({"table_id": "t-1", "table_name": "orders"})]);
}

#[tokio::test]
async fn test_table_models_list_skips_detail_lookups() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/p1/design/table-model"))
        .and(query_param("model_id", "m-1"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"value": {"records": [
                {"id": "tm-1", "logic_tb_name": "orders"},
                {"id": "tm-2", "logic_tb_name": "items"}
            ]}}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/p1/design/table-model"))
        .and(query_param("offset", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"value": {"records": []}}
        })))
        .expect(1)
        .mount(&server)
        .await;
    for id in ["tm-1", "tm-2"] {
        Mock::given(method("GET"))
            .and(path(format!("/v2/p1/design/table-model/{id}")))
            .respond_with(ResponseTemplate::new(403))
            .expect(0)
            .mount(&server)
            .await;
    }

    let models = service(&server)
        .list("architecture_table_models", &args(&[("model_id", "m-1")]))
        .await
        .unwrap();

    let names: Vec<_> = models.iter().map(|m| m["table_name"].clone()).collect();
    assert_eq!(names, vec![json!("orders"), json!("items")]);
}

#[tokio::test]
async fn test_get_encodes_record_id() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/p1/service/apis/a%20b%3Fc%2Fd"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "a b?c/d", "name": "odd"})))
        .expect(1)
        .mount(&server)
        .await;

    let api = service(&server)
        .get("dataservice_apis", &Arguments::new(), "a b?c/d")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(api["name"], "odd");
}

// ============================================================================
// Settings Tests
// ============================================================================

#[test]
fn test_service_requires_project() {
    let settings = Settings::from_yaml_str("endpoint: https://dataarts.example.com\n").unwrap();
    let catalog = load_catalog("dataarts").unwrap();

    let err = DataArtsService::from_settings(&settings, catalog).unwrap_err();
    assert!(err.to_string().contains("project_id"));
}
