use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode, Uri};
use axum::Router;
use radiolab_api::endpoints::{images::UploadImage, ImageId, ProjectId, ReportId};
use radiolab_api::workflows::{self, DeleteOutcome};
use radiolab_api::{ApiError, Client, Request};
use serde_json::{json, Value};
use tokio::net::TcpListener;

const PROJECT_JSON: &str = r#"{
    "id": 1,
    "name": "Patient A",
    "patientId": "PAC-001",
    "date": "15/04/2025",
    "imageCount": 3,
    "reportCount": 2
}"#;

#[derive(Debug, Clone)]
struct Received {
    route: String,
    body: String,
}

impl Received {
    fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("request body is JSON")
    }
}

/// Backend stand-in answering `"METHOD /path"` with scripted responses. Anything
/// unscripted gets FastAPI's default 404.
#[derive(Clone, Default)]
struct MockBackend {
    responses: Arc<Mutex<HashMap<String, (StatusCode, String)>>>,
    received: Arc<Mutex<Vec<Received>>>,
}

impl MockBackend {
    fn reply(self, route: &str, status: StatusCode, body: &str) -> Self {
        self.responses
            .lock()
            .expect("responses lock")
            .insert(route.to_string(), (status, body.to_string()));
        self
    }

    fn received(&self, route: &str) -> Received {
        self.received
            .lock()
            .expect("received lock")
            .iter()
            .find(|r| r.route == route)
            .cloned()
            .unwrap_or_else(|| panic!("no request for {route}"))
    }
}

async fn respond(
    State(backend): State<MockBackend>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> (StatusCode, String) {
    let route = format!("{} {}", method, uri.path());
    backend.received.lock().expect("received lock").push(Received {
        route: route.clone(),
        body: String::from_utf8_lossy(&body).into_owned(),
    });

    backend
        .responses
        .lock()
        .expect("responses lock")
        .get(&route)
        .cloned()
        .unwrap_or((StatusCode::NOT_FOUND, r#"{"detail": "Not Found"}"#.to_string()))
}

async fn serve(backend: &MockBackend) -> Client {
    let app = Router::new().fallback(respond).with_state(backend.clone());
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock backend");
    let address = listener.local_addr().expect("mock backend address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("run mock backend");
    });
    Client::new(&format!("http://{address}"))
}

// ============================================================================
// Reads and creates
// ============================================================================

#[tokio::test]
async fn test_missing_project_is_not_found_with_server_detail() {
    let backend = MockBackend::default().reply(
        "GET /projects/999",
        StatusCode::NOT_FOUND,
        r#"{"detail": "Project not found"}"#,
    );
    let client = serve(&backend).await;

    let err = client
        .send(Request::projects().get(ProjectId::new(999)))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ApiError::NotFound {
            detail: "Project not found".to_string()
        }
    );
}

#[tokio::test]
async fn test_project_list_skips_entry_with_unusable_id() {
    let backend = MockBackend::default().reply(
        "GET /projects",
        StatusCode::OK,
        r#"[
            {"id": 1, "name": "Alpha", "patientId": "PAC-1"},
            {"id": "imported-7c", "name": "Legacy", "patientId": "PAC-2"}
        ]"#,
    );
    let client = serve(&backend).await;

    let projects = client
        .send(Request::projects().list())
        .await
        .unwrap()
        .into_vec();

    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].name, "Alpha");
}

#[tokio::test]
async fn test_create_project_accepts_plain_id_body() {
    let backend = MockBackend::default().reply("POST /projects", StatusCode::OK, "7");
    let client = serve(&backend).await;

    let created = client
        .send(Request::projects().create("Hallux case", "PAC-7"))
        .await
        .unwrap();

    assert_eq!(created.into_id(), ProjectId::new(7));
    let sent = backend.received("POST /projects").json();
    assert_eq!(sent["patientId"], "PAC-7");
    assert_eq!(sent["imageCount"], 0);
}

#[tokio::test]
async fn test_create_project_accepts_wrapped_id_body() {
    let backend = MockBackend::default().reply("POST /projects", StatusCode::OK, r#"{"id": 7}"#);
    let client = serve(&backend).await;

    let created = client
        .send(Request::projects().create("Hallux case", "PAC-7"))
        .await
        .unwrap();

    assert_eq!(created.into_id(), ProjectId::new(7));
}

// ============================================================================
// Updates and deletes
// ============================================================================

#[tokio::test]
async fn test_delete_answered_with_json_message_succeeds() {
    let backend = MockBackend::default().reply(
        "DELETE /reports/1",
        StatusCode::OK,
        r#"{"message": "Report deleted"}"#,
    );
    let client = serve(&backend).await;

    let result = client.execute(Request::reports().delete(ReportId::new(1))).await;

    assert_eq!(result, Ok(()));
}

#[tokio::test]
async fn test_update_answered_with_empty_body_succeeds() {
    let backend = MockBackend::default().reply("PUT /projects/1", StatusCode::OK, "");
    let client = serve(&backend).await;

    let result = client
        .execute(Request::projects().update(ProjectId::new(1)).report_count(1u32))
        .await;

    assert_eq!(result, Ok(()));
    assert_eq!(
        backend.received("PUT /projects/1").json(),
        json!({ "reportCount": 1 })
    );
}

#[tokio::test]
async fn test_delete_answered_with_no_content_succeeds() {
    let backend = MockBackend::default().reply("DELETE /images/img-1", StatusCode::NO_CONTENT, "");
    let client = serve(&backend).await;

    let result = client
        .execute(Request::images().delete(ImageId::new("img-1")))
        .await;

    assert_eq!(result, Ok(()));
}

#[tokio::test]
async fn test_rejected_update_keeps_status_and_detail() {
    let backend = MockBackend::default().reply(
        "PUT /reports/3",
        StatusCode::UNPROCESSABLE_ENTITY,
        r#"{"detail": "name must not be empty"}"#,
    );
    let client = serve(&backend).await;

    let err = client
        .execute(Request::reports().update(ReportId::new(3)).name(""))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ApiError::RequestFailed {
            status: Some(422),
            detail: "name must not be empty".to_string()
        }
    );
}

#[tokio::test]
async fn test_deleting_missing_project_is_not_found() {
    let backend = MockBackend::default();
    let client = serve(&backend).await;

    let err = client
        .execute(Request::projects().delete(ProjectId::new(4)))
        .await
        .unwrap_err();

    assert!(err.is_not_found());
}

// ============================================================================
// Uploads
// ============================================================================

#[tokio::test]
async fn test_upload_returns_stored_url() {
    let backend = MockBackend::default().reply(
        "POST /images/upload",
        StatusCode::OK,
        r#"{"url": "/uploads/left.png"}"#,
    );
    let client = serve(&backend).await;

    let url = client
        .upload(UploadImage::new(
            ProjectId::new(1),
            "left.png",
            "image/png",
            b"png".to_vec(),
        ))
        .await
        .unwrap();

    assert_eq!(url, "/uploads/left.png");
    let sent = backend.received("POST /images/upload").body;
    assert!(sent.contains(r#"name="projectId""#));
    assert!(sent.contains(r#"filename="left.png""#));
}

#[tokio::test]
async fn test_upload_failure_maps_status() {
    let backend = MockBackend::default().reply(
        "POST /images/upload",
        StatusCode::PAYLOAD_TOO_LARGE,
        "File too large",
    );
    let client = serve(&backend).await;

    let err = client
        .upload(UploadImage::new(
            ProjectId::new(1),
            "huge.dcm",
            "application/dicom",
            vec![0u8; 16],
        ))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(413));
    assert_eq!(err.detail(), "File too large");
}

// ============================================================================
// Workflows
// ============================================================================

#[tokio::test]
async fn test_report_delete_decrements_count_over_http() {
    let backend = MockBackend::default()
        .reply(
            "DELETE /reports/5",
            StatusCode::OK,
            r#"{"message": "Report deleted"}"#,
        )
        .reply("GET /projects/1", StatusCode::OK, PROJECT_JSON)
        .reply(
            "PUT /projects/1",
            StatusCode::OK,
            r#"{"message": "Project updated"}"#,
        );
    let client = serve(&backend).await;

    let outcome = workflows::delete_report(&client, ReportId::new(5), ProjectId::new(1))
        .await
        .unwrap();

    assert_eq!(outcome, DeleteOutcome::Deleted { remaining: 1 });
    assert_eq!(
        backend.received("PUT /projects/1").json(),
        json!({ "reportCount": 1 })
    );
}
