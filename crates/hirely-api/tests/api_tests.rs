//! Router-level tests: auth, guard, handlers and the store behind wiremock.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use hirely_api::{create_router, ApiConfig, AppState, AuthConfig, SessionVerifier};
use hirely_models::{Upload, UploadKind};
use hirely_storage::{BlobStore, StorageResult, StoredObject};
use hirely_store::{RetryConfig, StoreClient, StoreConfig};

const SECRET: &str = "test-secret";
const BOUNDARY: &str = "hirely-test-boundary";

#[derive(Default)]
struct MemoryBlobs {
    keys: Mutex<Vec<String>>,
}

#[async_trait]
impl BlobStore for MemoryBlobs {
    async fn put(&self, _kind: UploadKind, key: &str, _upload: &Upload) -> StorageResult<StoredObject> {
        self.keys.lock().unwrap().push(key.to_string());
        Ok(StoredObject {
            bucket: "resumes".to_string(),
            key: key.to_string(),
            public_url: format!("https://store.test/storage/v1/object/public/resumes/{}", key),
        })
    }
}

struct Harness {
    server: MockServer,
    blobs: Arc<MemoryBlobs>,
    app: Router,
}

async fn harness() -> Harness {
    let server = MockServer::start().await;
    let mut store_config = StoreConfig::new(server.uri(), "anon-key");
    store_config.retry = RetryConfig::disabled();

    let blobs = Arc::new(MemoryBlobs::default());
    let state = AppState::from_parts(
        ApiConfig::default(),
        StoreClient::new(store_config).unwrap(),
        blobs.clone(),
        SessionVerifier::new(AuthConfig::with_secret(SECRET)).unwrap(),
    );

    Harness {
        server,
        blobs,
        app: create_router(state, None),
    }
}

fn token(sub: &str, role: Option<&str>) -> String {
    let mut claims = json!({
        "sub": sub,
        "exp": chrono::Utc::now().timestamp() + 3600,
    });
    if let Some(role) = role {
        claims["unsafe_metadata"] = json!({ "role": role });
    }
    encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes())).unwrap()
}

fn get(uri: &str, bearer: Option<&str>) -> Request<Body> {
    let mut builder = Request::get(uri);
    if let Some(t) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", t));
    }
    builder.body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, bearer: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", bearer))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn apply_request(job_id: &str, bearer: &str, resume_type: &str) -> Request<Body> {
    let mut body = String::new();
    for (name, value) in [
        ("name", "Asha Rao"),
        ("experience", "4"),
        ("skills", "Rust, SQL"),
        ("education", "Graduate"),
    ] {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    body.push_str(&format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"resume\"; filename=\"cv\"\r\nContent-Type: {resume_type}\r\n\r\n%PDF-1.7 resume\r\n--{BOUNDARY}--\r\n"
    ));

    Request::post(format!("/api/jobs/{}/applications", job_id))
        .header(header::AUTHORIZATION, format!("Bearer {}", bearer))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

fn job_row(recruiter_id: &str) -> Value {
    json!({
        "id": 17,
        "title": "Backend Engineer",
        "description": "Build APIs",
        "requirements": "- Rust",
        "location": "Karnataka",
        "company_id": 42,
        "recruiter_id": recruiter_id,
        "isOpen": true,
        "created_at": "2024-05-01T10:00:00Z"
    })
}

#[tokio::test]
async fn test_health_is_public() {
    let h = harness().await;
    let (status, body) = send(&h.app, get("/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let h = harness().await;
    let (status, _) = send(&h.app, get("/api/jobs", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&h.app, get("/api/jobs", Some("not-a-jwt"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_roleless_user_must_onboard() {
    let h = harness().await;
    let (status, body) = send(&h.app, get("/api/jobs", Some(&token("user_new", None)))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "onboarding_required");
    assert!(h.server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_jobs_sends_only_non_blank_filters() {
    let h = harness().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/jobs"))
        .and(query_param("location", "eq.Karnataka"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([job_row("user_recruiter")])))
        .expect(1)
        .mount(&h.server)
        .await;

    let bearer = token("user_candidate", Some("candidate"));
    let (status, body) = send(
        &h.app,
        get("/api/jobs?location=Karnataka&search=&company_id=", Some(&bearer)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let requests = h.server.received_requests().await.unwrap();
    let params: Vec<String> = requests[0].url.query_pairs().map(|(k, _)| k.into_owned()).collect();
    assert!(!params.contains(&"title".to_string()));
    assert!(!params.contains(&"company_id".to_string()));
}

#[tokio::test]
async fn test_candidate_cannot_post_job() {
    let h = harness().await;
    let (status, _) = send(
        &h.app,
        json_request(
            "POST",
            "/api/jobs",
            &token("user_candidate", Some("candidate")),
            json!({"title": "x", "description": "x", "location": "x", "company_id": "1", "requirements": "x"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_recruiter_posts_open_job() {
    let h = harness().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/jobs"))
        .and(body_partial_json(json!([{
            "title": "Backend Engineer",
            "location": "Karnataka",
            "company_id": "42",
            "recruiter_id": "user_recruiter",
            "isOpen": true
        }])))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([job_row("user_recruiter")])))
        .expect(1)
        .mount(&h.server)
        .await;

    let (status, body) = send(
        &h.app,
        json_request(
            "POST",
            "/api/jobs",
            &token("user_recruiter", Some("recruiter")),
            json!({
                "title": "Backend Engineer",
                "description": "Build APIs",
                "location": "Karnataka",
                "company_id": "42",
                "requirements": "- Rust"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["isOpen"], true);
    assert_eq!(body["recruiter_id"], "user_recruiter");
}

#[tokio::test]
async fn test_post_job_validation_lists_fields() {
    let h = harness().await;
    let (status, body) = send(
        &h.app,
        json_request(
            "POST",
            "/api/jobs",
            &token("user_recruiter", Some("recruiter")),
            json!({"title": "", "description": "d", "location": "", "company_id": "42", "requirements": "r"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["title"].is_array());
    assert!(body["fields"]["location"].is_array());
}

#[tokio::test]
async fn test_only_owner_deletes_job() {
    let h = harness().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([job_row("user_other")])))
        .mount(&h.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/rest/v1/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&h.server)
        .await;

    let request = Request::delete("/api/jobs/17")
        .header(
            header::AUTHORIZATION,
            format!("Bearer {}", token("user_recruiter", Some("recruiter"))),
        )
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&h.app, request).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

fn application_row(status: &str) -> Value {
    json!({
        "id": 5,
        "job_id": 17,
        "candidate_id": "user_candidate",
        "name": "Asha Rao",
        "experience": 4,
        "education": "Graduate",
        "skills": "Rust, SQL",
        "resume": "https://store.test/storage/v1/object/public/resumes/resume-1-user_candidate",
        "status": status,
        "created_at": "2024-05-02T09:30:00Z"
    })
}

async fn mount_application_of_job_owned_by(server: &MockServer, owner: &str) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/applications"))
        .and(query_param("id", "eq.5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([application_row("applied")])))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/jobs"))
        .and(query_param("id", "eq.17"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([job_row(owner)])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_only_job_owner_updates_application_status() {
    let h = harness().await;
    mount_application_of_job_owned_by(&h.server, "user_owner").await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/applications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([application_row("hired")])))
        .expect(0)
        .mount(&h.server)
        .await;

    let (status, _) = send(
        &h.app,
        json_request(
            "PATCH",
            "/api/applications/5/status",
            &token("user_stranger", Some("recruiter")),
            json!({"status": "hired"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_job_owner_updates_application_status() {
    let h = harness().await;
    mount_application_of_job_owned_by(&h.server, "user_owner").await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/applications"))
        .and(query_param("id", "eq.5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([application_row("interviewing")])))
        .expect(1)
        .mount(&h.server)
        .await;

    let (status, body) = send(
        &h.app,
        json_request(
            "PATCH",
            "/api/applications/5/status",
            &token("user_owner", Some("recruiter")),
            json!({"status": "interviewing"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "interviewing");
}

#[tokio::test]
async fn test_status_update_of_unknown_application_is_not_found() {
    let h = harness().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/applications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&h.server)
        .await;

    let (status, _) = send(
        &h.app,
        json_request(
            "PATCH",
            "/api/applications/99/status",
            &token("user_owner", Some("recruiter")),
            json!({"status": "hired"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_failed_application_insert_orphans_resume() {
    let h = harness().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/applications"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "insert failed"})))
        .expect(1)
        .mount(&h.server)
        .await;

    let (status, body) = send(
        &h.app,
        apply_request("17", &token("user_candidate", Some("candidate")), "application/pdf"),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "partial_write");

    let keys = h.blobs.keys.lock().unwrap().clone();
    assert_eq!(keys.len(), 1);
    assert!(keys[0].starts_with("resume-") && keys[0].ends_with("-user_candidate"));
}

#[tokio::test]
async fn test_wrong_resume_type_rejected_before_upload() {
    let h = harness().await;
    let (status, body) = send(
        &h.app,
        apply_request("17", &token("user_candidate", Some("candidate")), "text/plain"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["resume"].is_array());
    assert!(h.blobs.keys.lock().unwrap().is_empty());
    assert!(h.server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_access_decisions() {
    let h = harness().await;

    let (status, body) = send(&h.app, get("/api/access?path=/post-job", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["action"], "redirect");
    assert_eq!(body["to"], "/?sign-in=true");

    let roleless = token("user_new", None);
    let (_, body) = send(&h.app, get("/api/access?path=/post-job", Some(&roleless))).await;
    assert_eq!(body["to"], "/onboarding");

    let (_, body) = send(&h.app, get("/api/access?path=/onboarding", Some(&roleless))).await;
    assert_eq!(body["action"], "render");

    let (_, body) = send(&h.app, get("/api/access?path=/", None)).await;
    assert_eq!(body["action"], "render");

    let (status, _) = send(&h.app, get("/api/access?path=/nowhere", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_security_headers_and_request_id() {
    let h = harness().await;
    let response = h
        .app
        .clone()
        .oneshot(
            Request::get("/health")
                .header("x-request-id", "req-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.headers()["x-request-id"], "req-123");
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
}
