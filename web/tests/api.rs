use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use oasprobe_core::{EndpointDefinition, EndpointStore, MemoryStore, Pipeline, RunnerConfig, TestOutcome, TestRunner};
use oasprobe_web::envelope::Envelope;
use oasprobe_web::{configure, AppPipeline};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const PETSTORE: &str = r#"{
  "openapi": "3.0.3",
  "info": {"title": "Pets", "version": "1"},
  "paths": {
    "/pets/{id}": {
      "get": {
        "operationId": "getPet",
        "parameters": [
          {"name": "id", "in": "path", "required": true, "schema": {"type": "integer"}}
        ],
        "responses": {"200": {"description": "ok", "content": {"application/json": {"example": {"id": 1}}}}}
      },
      "delete": {
        "responses": {"204": {"description": "gone"}}
      }
    }
  }
}"#;

fn pipeline() -> web::Data<AppPipeline> {
    let store: Arc<dyn EndpointStore> = Arc::new(MemoryStore::new());
    let runner = TestRunner::http(&RunnerConfig {
        timeout: Duration::from_secs(5),
        ..RunnerConfig::default()
    })
    .unwrap();
    web::Data::new(Pipeline::new(store, runner))
}

macro_rules! app {
    ($data:expr) => {
        test::init_service(
            App::new()
                .app_data($data.clone())
                .configure(|cfg| configure(cfg, 64 * 1024)),
        )
        .await
    };
}

fn multipart(file_name: &str, content: &str) -> (String, Vec<u8>) {
    let boundary = "oasprobe-boundary";
    let body = format!(
        "--{b}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"{f}\"\r\n\
         Content-Type: application/octet-stream\r\n\
         \r\n\
         {c}\r\n\
         --{b}--\r\n",
        b = boundary,
        f = file_name,
        c = content
    );
    (
        format!("multipart/form-data; boundary={}", boundary),
        body.into_bytes(),
    )
}

#[actix_web::test]
async fn test_validate_text_accepts_and_rejects() {
    let data = pipeline();
    let app = app!(data);

    let req = test::TestRequest::post()
        .uri("/swagger/validate/text")
        .set_json(json!({"content": PETSTORE}))
        .to_request();
    let body: Envelope<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.code, 0);
    assert!(body.message.contains("OpenAPI 3.0.3"));

    let req = test::TestRequest::post()
        .uri("/swagger/validate/text")
        .set_json(json!({"content": "{\"swagger\": \"2.0\", \"paths\": {}}"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Envelope<Value> = test::read_body_json(resp).await;
    assert_eq!(body.code, 400);
    assert!(body.message.contains("Swagger 2.0"));
}

#[actix_web::test]
async fn test_validate_file_returns_json_content() {
    let data = pipeline();
    let app = app!(data);

    let yaml = "openapi: 3.0.0\ninfo:\n  title: t\n  version: '1'\npaths:\n  /a:\n    get:\n      responses:\n        '200':\n          description: ok\n";
    let (content_type, payload) = multipart("api.yaml", yaml);
    let req = test::TestRequest::post()
        .uri("/swagger/validate/file")
        .insert_header(("content-type", content_type))
        .set_payload(payload)
        .to_request();
    let body: Envelope<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.code, 0);

    let content = body.data.unwrap()["content"].as_str().unwrap().to_string();
    let parsed: Value = serde_json::from_str(&content).unwrap();
    assert_eq!(parsed["openapi"], "3.0.0");
}

#[actix_web::test]
async fn test_validate_file_rejects_extension() {
    let data = pipeline();
    let app = app!(data);

    let (content_type, payload) = multipart("api.txt", PETSTORE);
    let req = test::TestRequest::post()
        .uri("/swagger/validate/file")
        .insert_header(("content-type", content_type))
        .set_payload(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_parse_list_update_delete() {
    let data = pipeline();
    let app = app!(data);

    let req = test::TestRequest::post()
        .uri("/swagger/parse")
        .set_json(json!({"content": PETSTORE}))
        .to_request();
    let body: Envelope<Vec<EndpointDefinition>> = test::call_and_read_body_json(&app, req).await;
    let parsed = body.data.unwrap();
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[0].operation_id, "getPet");
    assert_eq!(parsed[1].operation_id, "delete_pets_id");
    let document_id = parsed[0].owner_document_id;

    let req = test::TestRequest::get()
        .uri(&format!("/swagger/endpoints?swagger_id={}", document_id))
        .to_request();
    let body: Envelope<Vec<EndpointDefinition>> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.data.unwrap(), parsed);

    let mut edited = parsed[0].clone();
    edited.parameters[0].value = Some("42".into());
    let req = test::TestRequest::put()
        .uri("/swagger/endpoint")
        .set_json(&edited)
        .to_request();
    let body: Envelope<EndpointDefinition> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.data.unwrap().parameters[0].value.as_deref(), Some("42"));

    let id = parsed[1].id.unwrap();
    let req = test::TestRequest::delete()
        .uri(&format!("/swagger/endpoint/{}", id))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/swagger/endpoint/{}", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Envelope<Value> = test::read_body_json(resp).await;
    assert_eq!(body.code, 404);
}

#[actix_web::test]
async fn test_list_requires_swagger_id() {
    let data = pipeline();
    let app = app!(data);

    let req = test::TestRequest::get().uri("/swagger/endpoints").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_malformed_json_body_is_enveloped() {
    let data = pipeline();
    let app = app!(data);

    let req = test::TestRequest::post()
        .uri("/swagger/parse")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Envelope<Value> = test::read_body_json(resp).await;
    assert_eq!(body.code, 400);
}

#[actix_web::test]
async fn test_missing_path_value_is_bad_request() {
    let data = pipeline();
    let app = app!(data);

    let req = test::TestRequest::post()
        .uri("/swagger/parse")
        .set_json(json!({"content": PETSTORE}))
        .to_request();
    let body: Envelope<Vec<EndpointDefinition>> = test::call_and_read_body_json(&app, req).await;
    let id = body.data.unwrap()[0].id.unwrap();

    let req = test::TestRequest::post()
        .uri(&format!("/swagger/endpoint/{}/test?base_url=http://127.0.0.1:1", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Envelope<Value> = test::read_body_json(resp).await;
    assert!(body.message.contains("id"));
}

#[actix_web::test]
async fn test_unsaved_endpoint_against_local_server() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut buf = [0u8; 2048];
        let _ = stream.read(&mut buf).unwrap();
        stream
            .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\nok")
            .unwrap();
    });

    let data = pipeline();
    let app = app!(data);

    let endpoint = json!({
        "operation_id": "health",
        "method": "GET",
        "path": "/health"
    });
    let req = test::TestRequest::post()
        .uri(&format!("/swagger/endpoint/test?base_url=http://127.0.0.1:{}", port))
        .set_json(endpoint)
        .to_request();
    let body: Envelope<TestOutcome> = test::call_and_read_body_json(&app, req).await;
    let outcome = body.data.unwrap();

    assert_eq!(outcome.status_code, Some(200));
    assert_eq!(outcome.body, "ok");
    assert_eq!(outcome.error, None);
    assert_eq!(outcome.url, format!("http://127.0.0.1:{}/health", port));
}
