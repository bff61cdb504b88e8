//! Black-box tests for the session layer and request pipeline, driven
//! against a stub backend on an ephemeral port.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::json;

use policydesk_client::models::auth::LoginRequest;
use policydesk_client::models::project::NewProject;
use policydesk_client::{
    ApiClient, ClientConfig, DashboardApi, DeliverablesApi, MemoryTokenStore, OrganizationsApi,
    ProjectsApi, SessionController, SessionEvent, SessionState, TokenStore, UsersApi,
};
use policydesk_core::{DeliverableId, OrganizationId, UserId};

// ─────────────────────────────────────────────────────────────────────────
// Stub backend
// ─────────────────────────────────────────────────────────────────────────

#[derive(Default)]
struct StubState {
    hits: AtomicUsize,
    last_auth: Mutex<Option<String>>,
    last_upload_content_type: Mutex<Option<String>>,
}

impl StubState {
    fn record(&self, headers: &HeaderMap) {
        self.hits.fetch_add(1, Ordering::SeqCst);
        *self.last_auth.lock().unwrap() = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
    }

    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    fn last_auth(&self) -> Option<String> {
        self.last_auth.lock().unwrap().clone()
    }
}

struct StubServer {
    base_url: String,
    state: Arc<StubState>,
    handle: tokio::task::JoinHandle<()>,
}

impl StubServer {
    async fn spawn() -> Self {
        let state = Arc::new(StubState::default());
        let app = stub_router(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{addr}");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, state, handle }
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn stub_router(state: Arc<StubState>) -> Router {
    Router::new()
        .route("/auth/login", post(login))
        .route("/users/username/:username", get(profile_by_username))
        .route("/dashboard", get(dashboard))
        .route("/projects", get(projects_unauthorized).post(create_project))
        .route("/organizations/:id", delete(delete_organization))
        .route("/users/:id/activate", put(activate_user))
        .route("/deliverables/:id/upload", post(upload_deliverable))
        .with_state(state)
}

fn unauthorized_envelope() -> axum::response::Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"error": "unauthorized", "message": "token rejected"})),
    )
        .into_response()
}

async fn login(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> axum::response::Response {
    state.record(&headers);
    if body["username"] == "jdoe" && body["password"] == "correct-horse" {
        (StatusCode::OK, Json(json!({"token": mint_token("jdoe", 3600)}))).into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "unauthorized", "message": "bad credentials"})),
        )
            .into_response()
    }
}

async fn profile_by_username(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Path(username): Path<String>,
) -> axum::response::Response {
    state.record(&headers);
    if !headers.contains_key(header::AUTHORIZATION) {
        return unauthorized_envelope();
    }

    (
        StatusCode::OK,
        Json(json!({
            "id": 7,
            "username": username,
            "fullName": "Jane Doe",
            "email": "jdoe@example.com",
            "role": "project_manager",
            "organization": {"id": 3, "name": "Acme Policy Group", "isActive": true},
            "isActive": true,
        })),
    )
        .into_response()
}

async fn dashboard(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
) -> axum::response::Response {
    state.record(&headers);
    if !headers.contains_key(header::AUTHORIZATION) {
        return unauthorized_envelope();
    }

    (
        StatusCode::OK,
        Json(json!({
            "activeProjects": 2,
            "pendingDeliverables": 4,
            "openTickets": 1,
            "activeUsers": 9,
        })),
    )
        .into_response()
}

async fn projects_unauthorized(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
) -> axum::response::Response {
    state.record(&headers);
    unauthorized_envelope()
}

async fn create_project(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Json(_body): Json<serde_json::Value>,
) -> axum::response::Response {
    state.record(&headers);
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"error": "validation_error", "message": "name is required"})),
    )
        .into_response()
}

async fn activate_user(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Path(_id): Path<i64>,
) -> StatusCode {
    state.record(&headers);
    StatusCode::NO_CONTENT
}

async fn delete_organization(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Path(_id): Path<i64>,
) -> axum::response::Response {
    state.record(&headers);
    unauthorized_envelope()
}

async fn upload_deliverable(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> axum::response::Response {
    state.record(&headers);
    *state.last_upload_content_type.lock().unwrap() = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    (
        StatusCode::OK,
        Json(json!({
            "id": id,
            "projectId": 1,
            "title": "Quarterly Report",
            "status": "submitted",
            "fileName": "report.pdf",
        })),
    )
        .into_response()
}

// ─────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────

/// An unsigned three-segment token; the stub never checks signatures, the
/// client never verifies them.
fn mint_token(sub: &str, ttl_secs: i64) -> String {
    let now = chrono::Utc::now().timestamp();
    let payload = json!({
        "sub": sub,
        "iat": now - 10,
        "exp": now + ttl_secs,
        "role": "project_manager",
        "userId": 7,
    });

    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload.to_string().as_bytes());
    format!("{header}.{body}.sig")
}

struct TestContext {
    server: StubServer,
    client: ApiClient,
    store: Arc<MemoryTokenStore>,
}

async fn setup() -> TestContext {
    policydesk_observability::init();

    let server = StubServer::spawn().await;
    let store = Arc::new(MemoryTokenStore::new());
    let client = ApiClient::new(ClientConfig::new(server.base_url.clone()), store.clone());

    TestContext { server, client, store }
}

// ─────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn bearer_header_is_attached_exactly_when_a_credential_is_stored() {
    let ctx = setup().await;
    let dashboard = DashboardApi::new(ctx.client.clone());

    let token = mint_token("jdoe", 3600);
    ctx.store.set(&token);
    dashboard.summary().await.unwrap();
    assert_eq!(ctx.server.state.last_auth(), Some(format!("Bearer {token}")));

    ctx.store.clear();
    let err = dashboard.summary().await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(ctx.server.state.last_auth(), None);
}

#[tokio::test]
async fn login_establishes_a_session_and_authorizes_requests() {
    let ctx = setup().await;
    let controller = SessionController::new(ctx.client.clone());
    let events = controller.events().subscribe();

    let request = LoginRequest {
        username: "jdoe".to_string(),
        password: "correct-horse".to_string(),
    };
    let session = controller.login(&request).await.unwrap();

    assert_eq!(ctx.store.get(), Some(session.token.clone()));
    assert_eq!(controller.state(), SessionState::Authenticated);
    assert_eq!(events.try_recv(), Ok(SessionEvent::LoggedIn));

    let claims = session.claims.expect("token minted by the stub must decode");
    assert_eq!(claims.sub, "jdoe");

    let profile = session.profile.expect("login fetches the profile");
    assert_eq!(profile.id, UserId::new(7));
    assert_eq!(profile.username, "jdoe");

    let summary = DashboardApi::new(ctx.client.clone()).summary().await.unwrap();
    assert_eq!(summary.active_projects, 2);
}

#[tokio::test]
async fn failed_login_stays_unauthenticated() {
    let ctx = setup().await;
    let controller = SessionController::new(ctx.client.clone());

    let request = LoginRequest {
        username: "jdoe".to_string(),
        password: "wrong".to_string(),
    };
    let err = controller.login(&request).await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(err.to_string(), "unauthorized: bad credentials");
    assert_eq!(ctx.store.get(), None);
    assert_eq!(controller.state(), SessionState::Unauthenticated);
}

#[tokio::test]
async fn unauthorized_responses_end_the_session_exactly_once() {
    let ctx = setup().await;
    let controller = SessionController::new(ctx.client.clone());

    let request = LoginRequest {
        username: "jdoe".to_string(),
        password: "correct-horse".to_string(),
    };
    controller.login(&request).await.unwrap();

    // Subscribe after login so only expiry shows up here.
    let events = controller.events().subscribe();

    let organizations = OrganizationsApi::new(ctx.client.clone());
    let projects = ProjectsApi::new(ctx.client.clone());

    // Two requests in flight, both answered 401.
    let (org_result, proj_result) = tokio::join!(
        organizations.delete(OrganizationId::new(42)),
        projects.list(),
    );

    assert!(org_result.unwrap_err().is_unauthorized());
    assert!(proj_result.unwrap_err().is_unauthorized());

    assert_eq!(ctx.store.get(), None);
    assert_eq!(controller.state(), SessionState::Unauthenticated);

    assert_eq!(events.try_recv(), Ok(SessionEvent::SessionExpired));
    assert!(
        events.try_recv().is_err(),
        "expiry must be announced exactly once for both 401s"
    );
}

#[tokio::test]
async fn no_content_responses_are_plain_success() {
    let ctx = setup().await;
    ctx.store.set(&mint_token("jdoe", 3600));

    let users = UsersApi::new(ctx.client.clone());
    users.activate(UserId::new(7)).await.unwrap();
}

#[tokio::test]
async fn validation_errors_carry_the_server_message_verbatim() {
    let ctx = setup().await;
    ctx.store.set(&mint_token("jdoe", 3600));

    let projects = ProjectsApi::new(ctx.client.clone());
    let request = NewProject {
        name: String::new(),
        description: None,
        organization_id: OrganizationId::new(3),
        start_date: None,
        end_date: None,
    };

    match projects.create(&request).await.unwrap_err() {
        policydesk_client::ApiError::Validation { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "name is required");
        }
        other => panic!("expected a validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn expired_stored_credential_restores_to_nothing_without_network() {
    let ctx = setup().await;
    ctx.store.set(&mint_token("jdoe", -3600));

    let controller = SessionController::new(ctx.client.clone());
    assert!(controller.restore_from_storage().is_none());

    assert_eq!(ctx.store.get(), None);
    assert_eq!(controller.state(), SessionState::Unauthenticated);
    assert_eq!(ctx.server.state.hits(), 0, "restore must not touch the network");
}

#[tokio::test]
async fn valid_stored_credential_restores_a_session_offline() {
    let ctx = setup().await;
    ctx.store.set(&mint_token("jdoe", 3600));

    let controller = SessionController::new(ctx.client.clone());
    let session = controller.restore_from_storage().expect("credential is fresh");

    assert_eq!(session.profile, None, "restore is offline; no profile yet");
    assert_eq!(ctx.server.state.hits(), 0);
    assert_eq!(controller.state(), SessionState::Authenticated);

    let profile = controller.refresh_profile().await.unwrap();
    assert_eq!(profile.username, "jdoe");
    assert_eq!(ctx.server.state.hits(), 1);
    assert_eq!(
        controller.current().unwrap().profile.as_ref().map(|p| p.id),
        Some(UserId::new(7))
    );
}

#[tokio::test]
async fn undecodable_stored_credential_is_cleared_on_restore() {
    let ctx = setup().await;
    ctx.store.set("not-a-jwt");

    let controller = SessionController::new(ctx.client.clone());
    assert!(controller.restore_from_storage().is_none());
    assert_eq!(ctx.store.get(), None);
    assert_eq!(ctx.server.state.hits(), 0);
}

#[tokio::test]
async fn multipart_upload_goes_through_the_same_pipeline() {
    let ctx = setup().await;
    let token = mint_token("jdoe", 3600);
    ctx.store.set(&token);

    let deliverables = DeliverablesApi::new(ctx.client.clone());
    let uploaded = deliverables
        .upload(DeliverableId::new(5), "report.pdf", b"%PDF-1.7 ...".to_vec())
        .await
        .unwrap();

    assert_eq!(uploaded.file_name.as_deref(), Some("report.pdf"));
    assert_eq!(ctx.server.state.last_auth(), Some(format!("Bearer {token}")));

    let content_type = ctx
        .server
        .state
        .last_upload_content_type
        .lock()
        .unwrap()
        .clone()
        .expect("upload must carry a content type");
    assert!(content_type.starts_with("multipart/form-data"));
}

#[tokio::test]
async fn logout_clears_announces_and_suppresses_later_expiry_noise() {
    let ctx = setup().await;
    let controller = SessionController::new(ctx.client.clone());

    let request = LoginRequest {
        username: "jdoe".to_string(),
        password: "correct-horse".to_string(),
    };
    controller.login(&request).await.unwrap();

    let events = controller.events().subscribe();
    controller.logout();

    assert_eq!(ctx.store.get(), None);
    assert_eq!(controller.state(), SessionState::Unauthenticated);
    assert_eq!(events.try_recv(), Ok(SessionEvent::LoggedOut));

    // An unauthenticated request answered 401 is not a session expiry.
    let err = DashboardApi::new(ctx.client.clone()).summary().await.unwrap_err();
    assert!(err.is_unauthorized());
    assert!(events.try_recv().is_err(), "no SessionExpired after explicit logout");
}
