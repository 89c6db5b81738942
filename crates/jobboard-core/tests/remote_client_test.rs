use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::Path,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;

use jobboard_core::breaker::{BreakerConfig, BreakerState, CircuitBreaker};
use jobboard_core::clients::{OrganizationClient, RemoteError};

async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve stub");
    });
    addr
}

fn client(addr: SocketAddr, config: BreakerConfig) -> OrganizationClient {
    let http = reqwest::Client::builder()
        .timeout(Duration::from_millis(500))
        .build()
        .expect("http client");
    OrganizationClient::new(
        http,
        format!("http://{addr}"),
        CircuitBreaker::new("organization-service", config),
    )
}

fn small_breaker(open_ms: u64) -> BreakerConfig {
    BreakerConfig {
        failure_rate: 1.0,
        min_calls: 2,
        open_duration: Duration::from_millis(open_ms),
        half_open_probes: 1,
    }
}

#[tokio::test]
async fn fetch_resolves_remote_entity() {
    let app = Router::new().route(
        "/api/organizations/:id",
        get(|Path(id): Path<i64>| async move { Json(json!({"id": id, "director": 10})) }),
    );
    let addr = serve(app).await;
    let client = client(addr, BreakerConfig::default());

    let org = client.fetch(5, None).await.expect("resolved");
    assert_eq!(org.id, 5);
    assert_eq!(org.director, Some(10));
    assert_eq!(client.breaker().state(), BreakerState::Closed);
}

#[tokio::test]
async fn missing_entity_maps_to_not_found_without_tripping_breaker() {
    let app = Router::new().route(
        "/api/organizations/:id",
        get(|| async { StatusCode::NOT_FOUND }),
    );
    let addr = serve(app).await;
    let client = client(addr, small_breaker(60_000));

    for _ in 0..5 {
        let err = client.fetch(1, None).await.unwrap_err();
        assert_eq!(err, RemoteError::NotFound);
    }
    assert_eq!(client.breaker().state(), BreakerState::Closed);
}

#[tokio::test]
async fn repeated_failures_open_breaker_and_short_circuit() {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = Router::new().route(
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
    let addr = serve(app).await;
    let client = client(addr, small_breaker(60_000));

    for _ in 0..2 {
        let err = client.fetch(1, None).await.unwrap_err();
        assert!(matches!(err, RemoteError::Unavailable(_)));
    }
    assert_eq!(client.breaker().state(), BreakerState::Open);
    assert_eq!(hits.load(Ordering::SeqCst), 2);

    // Open circuit: the next call fails fast with no network attempt.
    let err = client.fetch(1, None).await.unwrap_err();
    assert!(matches!(err, RemoteError::Unavailable(_)));
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn cooldown_admits_one_probe_and_recovers() {
    let hits = Arc::new(AtomicUsize::new(0));
    let healthy = Arc::new(AtomicBool::new(false));
    let app = Router::new().route(
        "/api/organizations/:id",
        get({
            let hits = hits.clone();
            let healthy = healthy.clone();
            move |Path(id): Path<i64>| {
                let hits = hits.clone();
                let healthy = healthy.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    if healthy.load(Ordering::SeqCst) {
                        Json(json!({"id": id, "director": 10})).into_response()
                    } else {
                        StatusCode::INTERNAL_SERVER_ERROR.into_response()
                    }
                }
            }
        }),
    );
    let addr = serve(app).await;
    let client = client(addr, small_breaker(50));

    client.fetch(1, None).await.unwrap_err();
    client.fetch(1, None).await.unwrap_err();
    assert_eq!(client.breaker().state(), BreakerState::Open);
    assert_eq!(hits.load(Ordering::SeqCst), 2);

    healthy.store(true, Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(80)).await;

    // A single probe goes through and closes the circuit again.
    let org = client.fetch(1, None).await.expect("probe succeeds");
    assert_eq!(org.id, 1);
    assert_eq!(hits.load(Ordering::SeqCst), 3);
    assert_eq!(client.breaker().state(), BreakerState::Closed);
}

#[tokio::test]
async fn unreachable_dependency_is_unavailable() {
    // Bind and immediately drop a listener so the port refuses connections.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client(addr, BreakerConfig::default());
    let err = client.fetch(1, None).await.unwrap_err();
    assert!(matches!(err, RemoteError::Unavailable(_)));
}

#[tokio::test]
async fn client_errors_do_not_trip_the_breaker() {
    let app = Router::new().route(
        "/api/organizations/:id",
        get(|| async { StatusCode::FORBIDDEN }),
    );
    let addr = serve(app).await;
    let client = client(addr, small_breaker(60_000));

    for _ in 0..5 {
        let err = client.fetch(1, None).await.unwrap_err();
        assert!(matches!(err, RemoteError::Unavailable(_)));
    }
    assert_eq!(client.breaker().state(), BreakerState::Closed);
}

#[tokio::test]
async fn bearer_token_is_forwarded_unchanged() {
    let seen = Arc::new(Mutex::new(None::<String>));
    let app = Router::new().route(
        "/api/organizations/:id",
        get({
            let seen = seen.clone();
            move |Path(id): Path<i64>, headers: HeaderMap| {
                let seen = seen.clone();
                async move {
                    let auth = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .map(|v| v.to_string());
                    *seen.lock().unwrap() = auth;
                    Json(json!({"id": id}))
                }
            }
        }),
    );
    let addr = serve(app).await;
    let client = client(addr, BreakerConfig::default());

    client
        .fetch(7, Some("original-caller-token"))
        .await
        .expect("resolved");
    assert_eq!(
        seen.lock().unwrap().as_deref(),
        Some("Bearer original-caller-token")
    );
}
