use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    routing::get,
    Router,
};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;

use jobboard_core::auth::{JwtKeys, ROLE_SUPERVISOR, ROLE_USER};
use jobboard_core::breaker::BreakerConfig;
use organization_service::{
    app as org_app,
    config::Config as OrgConfig,
    store::{MemoryOrganizationStore, NewOrganization, OrganizationStore},
    AppState as OrgAppState,
};
use vacancy_service::{
    app,
    config::Config,
    store::{MemoryVacancyStore, VacancyRecord, VacancyStore},
    AppState,
};

const SECRET: &str = "test_secret_key";

fn small_breaker() -> BreakerConfig {
    BreakerConfig {
        failure_rate: 1.0,
        min_calls: 2,
        open_duration: Duration::from_secs(60),
        half_open_probes: 1,
    }
}

fn test_config(org_url: &str, user_url: &str) -> Config {
    Config {
        server_address: "127.0.0.1:0".to_string(),
        database_url: String::new(),
        jwt_secret: SECRET.to_string(),
        organization_service_url: org_url.to_string(),
        user_service_url: user_url.to_string(),
        remote_timeout: Duration::from_millis(500),
        breaker: small_breaker(),
    }
}

fn test_state(org_url: &str, user_url: &str) -> (AppState, Arc<MemoryVacancyStore>) {
    let store = Arc::new(MemoryVacancyStore::new());
    let state = AppState::new(test_config(org_url, user_url), store.clone()).expect("state");
    (state, store)
}

fn token(user_id: i64, roles: &[&str]) -> String {
    JwtKeys::from_secret(SECRET)
        .issue(
            user_id,
            roles.iter().map(|r| r.to_string()).collect(),
            Duration::from_secs(600),
        )
        .expect("token")
}

async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve stub");
    });
    addr
}

/// A real organization-service instance backed by its in-memory store,
/// seeded with one organization owned by `director`.
async fn spawn_org_service(director: i64) -> (SocketAddr, Arc<MemoryOrganizationStore>, i64) {
    let store = Arc::new(MemoryOrganizationStore::new());
    let org = store
        .insert(NewOrganization {
            nickname: "Acme".to_string(),
            email: "acme@example.com".to_string(),
            director,
        })
        .await
        .expect("seed organization");

    let config = OrgConfig {
        server_address: "127.0.0.1:0".to_string(),
        database_url: String::new(),
        jwt_secret: SECRET.to_string(),
        vacancy_service_url: "http://127.0.0.1:1".to_string(),
        remote_timeout: Duration::from_millis(500),
        breaker: small_breaker(),
    };
    let state = OrgAppState::new(config, store.clone()).expect("org state");
    let addr = serve(org_app(state)).await;
    (addr, store, org.id)
}

fn request(method: &str, uri: &str, bearer: Option<&str>, body: Option<JsonValue>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    match body {
        Some(value) => builder
            .header("content-type", "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn body_json(response: axum::response::Response) -> JsonValue {
    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn vacancy_payload(org_id: i64) -> JsonValue {
    json!({
        "title": "Rust engineer",
        "description": "Build resilient services",
        "salary": 90_000,
        "city": "Berlin",
        "organization_id": org_id
    })
}

#[tokio::test]
async fn director_lifecycle_and_orphan_tolerance() {
    let (org_addr, org_store, org_id) = spawn_org_service(10).await;
    let (state, _) = test_state(&format!("http://{org_addr}"), "http://127.0.0.1:1");
    let app = app(state);
    let director = token(10, &[ROLE_USER]);

    // The director creates a vacancy: the organization id resolves through
    // the real organization service using the forwarded caller token.
    let resp = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/vacancies",
            Some(&director),
            Some(vacancy_payload(org_id)),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let vacancy = body_json(resp).await;
    let vacancy_id = vacancy["id"].as_i64().unwrap();
    assert_eq!(vacancy["organization_id"], json!(org_id));

    // Another user may not update it.
    let resp = app
        .clone()
        .oneshot(request(
            "PUT",
            &format!("/api/vacancies/{vacancy_id}"),
            Some(&token(11, &[ROLE_USER])),
            Some(vacancy_payload(org_id)),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // The director may.
    let resp = app
        .clone()
        .oneshot(request(
            "PUT",
            &format!("/api/vacancies/{vacancy_id}"),
            Some(&director),
            Some(json!({
                "title": "Senior Rust engineer",
                "description": "Build resilient services",
                "organization_id": org_id
            })),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["title"], json!("Senior Rust engineer"));

    // Deleting the organization orphans the vacancy; it is still served.
    org_store.delete(org_id).await.unwrap();
    let resp = app
        .clone()
        .oneshot(request(
            "GET",
            &format!("/api/vacancies/{vacancy_id}"),
            Some(&director),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // The director can no longer prove ownership against the deleted
    // organization, but a supervisor can still clean the orphan up.
    let resp = app
        .clone()
        .oneshot(request(
            "DELETE",
            &format!("/api/vacancies/{vacancy_id}"),
            Some(&director),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = app
        .oneshot(request(
            "DELETE",
            &format!("/api/vacancies/{vacancy_id}"),
            Some(&token(1, &[ROLE_SUPERVISOR])),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn non_director_cannot_create_for_an_organization() {
    let (org_addr, _, org_id) = spawn_org_service(10).await;
    let (state, store) = test_state(&format!("http://{org_addr}"), "http://127.0.0.1:1");
    let app = app(state);

    let resp = app
        .oneshot(request(
            "POST",
            "/api/vacancies",
            Some(&token(11, &[ROLE_USER])),
            Some(vacancy_payload(org_id)),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(store.list(None, 50, 0).await.unwrap().1, 0);
}

#[tokio::test]
async fn unknown_organization_aborts_before_any_write() {
    let (org_addr, _, _) = spawn_org_service(10).await;
    let (state, store) = test_state(&format!("http://{org_addr}"), "http://127.0.0.1:1");
    let app = app(state);

    let resp = app
        .oneshot(request(
            "POST",
            "/api/vacancies",
            Some(&token(10, &[ROLE_USER])),
            Some(vacancy_payload(999)),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(store.list(None, 50, 0).await.unwrap().1, 0);
}

#[tokio::test]
async fn open_breaker_fails_fast_without_touching_the_network() {
    let hits = Arc::new(AtomicUsize::new(0));
    let failing = Router::new().route(
        "/api/organizations/:id",
        get({
            let hits = hits.clone();
            move || {
                let hits = hits.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            }
        }),
    );
    let org_addr = serve(failing).await;
    let (state, store) = test_state(&format!("http://{org_addr}"), "http://127.0.0.1:1");
    let app = app(state);
    let caller = token(10, &[ROLE_USER]);

    // Two failing validations trip the breaker (min_calls = 2, rate 1.0).
    for _ in 0..2 {
        let resp = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/vacancies",
                Some(&caller),
                Some(vacancy_payload(1)),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
    assert_eq!(hits.load(Ordering::SeqCst), 2);

    // Breaker open: same outcome, but no request reaches the dependency.
    let resp = app
        .oneshot(request(
            "POST",
            "/api/vacancies",
            Some(&caller),
            Some(vacancy_payload(1)),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(hits.load(Ordering::SeqCst), 2);

    // Nothing was ever persisted.
    assert_eq!(store.list(None, 50, 0).await.unwrap().1, 0);
}

#[tokio::test]
async fn negative_salary_is_rejected() {
    let (org_addr, _, org_id) = spawn_org_service(10).await;
    let (state, store) = test_state(&format!("http://{org_addr}"), "http://127.0.0.1:1");
    let app = app(state);

    let resp = app
        .oneshot(request(
            "POST",
            "/api/vacancies",
            Some(&token(10, &[ROLE_USER])),
            Some(json!({
                "title": "Rust engineer",
                "description": "desc",
                "salary": -1,
                "organization_id": org_id
            })),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(store.list(None, 50, 0).await.unwrap().1, 0);
}

#[tokio::test]
async fn list_is_paged_capped_and_filterable() {
    let (state, store) = test_state("http://127.0.0.1:1", "http://127.0.0.1:1");
    let app = app(state);
    for i in 0..60 {
        store
            .insert(VacancyRecord {
                title: format!("Vacancy {i}"),
                description: "desc".to_string(),
                salary: None,
                city: None,
                organization_id: if i % 2 == 0 { 1 } else { 2 },
            })
            .await
            .unwrap();
    }
    let caller = token(10, &[ROLE_USER]);

    let resp = app
        .clone()
        .oneshot(request("GET", "/api/vacancies?size=1000", Some(&caller), None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("X-Total-Count").unwrap().to_str().unwrap(),
        "60"
    );
    assert_eq!(body_json(resp).await.as_array().unwrap().len(), 50);

    let resp = app
        .clone()
        .oneshot(request(
            "GET",
            "/api/vacancies?page=1&size=60",
            Some(&caller),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(body_json(resp).await.as_array().unwrap().len(), 10);

    let resp = app
        .oneshot(request(
            "GET",
            "/api/vacancies?organization_id=1",
            Some(&caller),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(
        resp.headers().get("X-Total-Count").unwrap().to_str().unwrap(),
        "30"
    );
}

#[tokio::test]
async fn reads_require_authentication() {
    let (state, _) = test_state("http://127.0.0.1:1", "http://127.0.0.1:1");
    let app = app(state);

    let resp = app
        .oneshot(request("GET", "/api/vacancies", None, None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
