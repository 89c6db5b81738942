use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    extract::Path,
    http::{Request, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;

use jobboard_core::auth::{JwtKeys, ROLE_USER};
use jobboard_core::breaker::BreakerConfig;
use user_service::{
    app,
    config::Config,
    store::{MemoryUserStore, NewUser, UserStore},
    utils::crypto,
    AppState,
};

const SECRET: &str = "test_secret_key";

fn test_config(vacancy_url: &str) -> Config {
    Config {
        server_address: "127.0.0.1:0".to_string(),
        database_url: String::new(),
        jwt_secret: SECRET.to_string(),
        vacancy_service_url: vacancy_url.to_string(),
        remote_timeout: Duration::from_millis(500),
        token_ttl: Duration::from_secs(600),
        breaker: BreakerConfig {
            failure_rate: 1.0,
            min_calls: 2,
            open_duration: Duration::from_secs(60),
            half_open_probes: 1,
        },
        supervisor_email: None,
        supervisor_password: None,
    }
}

fn test_state(vacancy_url: &str) -> (AppState, Arc<MemoryUserStore>) {
    let store = Arc::new(MemoryUserStore::new());
    let state = AppState::new(test_config(vacancy_url), store.clone()).expect("state");
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

async fn seed_user(store: &Arc<MemoryUserStore>, nickname: &str, email: &str) -> i64 {
    store
        .insert(NewUser {
            nickname: nickname.to_string(),
            email: email.to_string(),
            cv_link: None,
            password_hash: "unused".to_string(),
            roles: vec![ROLE_USER.to_string()],
        })
        .await
        .expect("seed user")
        .id
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

/// Stub vacancy service: ids below 100 resolve, everything else is 404.
fn vacancy_stub() -> Router {
    Router::new().route(
        "/api/vacancies/:id",
        get(|Path(id): Path<i64>| async move {
            if id < 100 {
                Json(json!({"id": id, "title": "Stub vacancy", "organization_id": 1}))
                    .into_response()
            } else {
                StatusCode::NOT_FOUND.into_response()
            }
        }),
    )
}

fn dead_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
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

#[tokio::test]
async fn login_issues_a_usable_supervisor_token() {
    let (state, _) = test_state("http://127.0.0.1:1");
    state
        .auth
        .ensure_supervisor("su@example.com", "super-secret-pass")
        .await
        .expect("bootstrap");
    let app = app(state);

    let resp = app
        .clone()
        .oneshot(request(
            "POST",
            "/auth/login",
            None,
            Some(json!({"email": "su@example.com", "password": "wrong-password"})),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = app
        .clone()
        .oneshot(request(
            "POST",
            "/auth/login",
            None,
            Some(json!({"email": "su@example.com", "password": "super-secret-pass"})),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    let issued = body["token"].as_str().expect("token").to_string();

    // The issued token carries the SUPERVISOR role: user creation works.
    let resp = app
        .oneshot(request(
            "POST",
            "/api/users",
            Some(&issued),
            Some(json!({
                "nickname": "Alice",
                "email": "alice@example.com",
                "password": "alice-password",
                "cv_link": "http://cv.example.com/alice"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = body_json(resp).await;
    assert_eq!(created["email"], json!("alice@example.com"));
    assert!(created.get("password_hash").is_none());
}

#[tokio::test]
async fn user_creation_is_supervisor_only() {
    let (state, _) = test_state("http://127.0.0.1:1");
    let app = app(state);

    let resp = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/users",
            Some(&token(5, &[ROLE_USER])),
            Some(json!({"nickname": "Bob", "email": "bob@example.com", "password": "bob-password"})),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = app
        .oneshot(request(
            "POST",
            "/api/users",
            None,
            Some(json!({"nickname": "Bob", "email": "bob@example.com", "password": "bob-password"})),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn created_users_can_log_in() {
    let (state, store) = test_state("http://127.0.0.1:1");
    store
        .insert(NewUser {
            nickname: "Carol".to_string(),
            email: "carol@example.com".to_string(),
            cv_link: None,
            password_hash: crypto::hash_password("carol-password").unwrap(),
            roles: vec![ROLE_USER.to_string()],
        })
        .await
        .unwrap();
    let app = app(state);

    let resp = app
        .oneshot(request(
            "POST",
            "/auth/login",
            None,
            Some(json!({"email": "carol@example.com", "password": "carol-password"})),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn profile_updates_are_self_only() {
    let (state, store) = test_state("http://127.0.0.1:1");
    let app = app(state);
    let alice = seed_user(&store, "Alice", "alice@example.com").await;
    let bob = seed_user(&store, "Bob", "bob@example.com").await;

    let resp = app
        .clone()
        .oneshot(request(
            "PUT",
            &format!("/api/users/{bob}"),
            Some(&token(alice, &[ROLE_USER])),
            Some(json!({"nickname": "Hijacked", "email": "bob@example.com"})),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = app
        .clone()
        .oneshot(request(
            "PUT",
            &format!("/api/users/{alice}"),
            Some(&token(alice, &[ROLE_USER])),
            Some(json!({"nickname": "Alice2", "email": "alice2@example.com"})),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["nickname"], json!("Alice2"));

    // Taking another user's email is a conflict.
    let resp = app
        .oneshot(request(
            "PUT",
            &format!("/api/users/{alice}"),
            Some(&token(alice, &[ROLE_USER])),
            Some(json!({"nickname": "Alice2", "email": "bob@example.com"})),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn adding_a_favorite_is_idempotent() {
    let stub = serve(vacancy_stub()).await;
    let (state, store) = test_state(&format!("http://{stub}"));
    let app = app(state);
    let alice = seed_user(&store, "Alice", "alice@example.com").await;
    let caller = token(alice, &[ROLE_USER]);

    for _ in 0..3 {
        let resp = app
            .clone()
            .oneshot(request(
                "PUT",
                &format!("/api/users/{alice}/favorite/42"),
                Some(&caller),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
    assert_eq!(store.favorite_ids(alice).await.unwrap(), vec![42]);

    let resp = app
        .clone()
        .oneshot(request(
            "GET",
            &format!("/api/users/{alice}/favorites/ids"),
            Some(&caller),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!([42]));

    // Removing twice is just as safe.
    for _ in 0..2 {
        let resp = app
            .clone()
            .oneshot(request(
                "DELETE",
                &format!("/api/users/{alice}/favorite/42"),
                Some(&caller),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
    assert!(store.favorite_ids(alice).await.unwrap().is_empty());
}

#[tokio::test]
async fn favorites_of_another_user_are_forbidden() {
    let stub = serve(vacancy_stub()).await;
    let (state, store) = test_state(&format!("http://{stub}"));
    let app = app(state);
    let alice = seed_user(&store, "Alice", "alice@example.com").await;
    let mallory = token(999, &[ROLE_USER]);

    let resp = app
        .clone()
        .oneshot(request(
            "PUT",
            &format!("/api/users/{alice}/favorite/42"),
            Some(&mallory),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert!(store.favorite_ids(alice).await.unwrap().is_empty());

    let resp = app
        .oneshot(request(
            "GET",
            &format!("/api/users/{alice}/favorites/ids"),
            Some(&mallory),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn unknown_vacancy_is_rejected_before_any_write() {
    let stub = serve(vacancy_stub()).await;
    let (state, store) = test_state(&format!("http://{stub}"));
    let app = app(state);
    let alice = seed_user(&store, "Alice", "alice@example.com").await;

    let resp = app
        .oneshot(request(
            "PUT",
            &format!("/api/users/{alice}/favorite/999"),
            Some(&token(alice, &[ROLE_USER])),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(store.favorite_ids(alice).await.unwrap().is_empty());
}

#[tokio::test]
async fn unavailable_vacancy_service_blocks_writes_but_not_removal() {
    let (state, store) = test_state(&format!("http://{}", dead_addr()));
    let app = app(state);
    let alice = seed_user(&store, "Alice", "alice@example.com").await;
    store.add_response(alice, 42).await.unwrap();
    let caller = token(alice, &[ROLE_USER]);

    let resp = app
        .clone()
        .oneshot(request(
            "PUT",
            &format!("/api/users/{alice}/respond/43"),
            Some(&caller),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(store.response_ids(alice).await.unwrap(), vec![42]);

    // Removal never needs the remote service.
    let resp = app
        .oneshot(request(
            "DELETE",
            &format!("/api/users/{alice}/respond/42"),
            Some(&caller),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(store.response_ids(alice).await.unwrap().is_empty());
}

#[tokio::test]
async fn favorite_hydration_skips_orphans_and_degrades_when_down() {
    let stub = serve(vacancy_stub()).await;
    let (state, store) = test_state(&format!("http://{stub}"));
    let app = app(state);
    let alice = seed_user(&store, "Alice", "alice@example.com").await;
    store.add_favorite(alice, 5).await.unwrap();
    store.add_favorite(alice, 999).await.unwrap(); // dangles
    let caller = token(alice, &[ROLE_USER]);

    let resp = app
        .oneshot(request(
            "GET",
            &format!("/api/users/{alice}/favorites"),
            Some(&caller),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let items = body_json(resp).await;
    assert_eq!(items.as_array().unwrap().len(), 1);
    assert_eq!(items[0]["id"], json!(5));

    // With the vacancy service unreachable the listing degrades to empty.
    let (state, store) = test_state(&format!("http://{}", dead_addr()));
    let app = user_service::app(state);
    let alice = seed_user(&store, "Alice", "alice@example.com").await;
    store.add_favorite(alice, 5).await.unwrap();

    let resp = app
        .oneshot(request(
            "GET",
            &format!("/api/users/{alice}/favorites"),
            Some(&token(alice, &[ROLE_USER])),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_json(resp).await.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn expired_or_malformed_tokens_act_as_anonymous() {
    let (state, _) = test_state("http://127.0.0.1:1");
    let app = app(state);

    let resp = app
        .clone()
        .oneshot(request("GET", "/api/users/1", Some("garbage.token"), None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // The open endpoints stay reachable without a token.
    let resp = app
        .oneshot(request("GET", "/health", None, None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}
