use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use xemphim_core::config::AppConfig;
use jsonwebtoken::{encode, EncodingKey, Header};
use xemphim_server::gate::Claims;
use xemphim_server::routes::build_router;
use xemphim_server::state::AppState;

const SECRET: &str = "test-secret";

fn app_with_backend(backend_url: &str) -> Router {
    let mut config = AppConfig::default().server;
    config.jwt_secret = SECRET.to_string();
    config.backend_url = backend_url.to_string();
    build_router(AppState::from_config(&config).unwrap())
}

fn app() -> Router {
    app_with_backend("http://127.0.0.1:9")
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> axum::http::request::Builder {
    Request::builder().method("GET").uri(uri)
}

fn rate_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/movies/rate")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Claims shaped like the storefront login mints them, valid for five minutes.
fn claims_for(user: &str, user_id: &str, role: Option<&str>) -> Claims {
    let claims = match role {
        Some("Admin") => vec!["film.view", "film.edit", "film.delete"],
        Some("User") => vec!["film.view"],
        _ => Vec::new(),
    };
    Claims {
        user: user.to_string(),
        roles: role.map(str::to_string),
        claims: claims.into_iter().map(str::to_string).collect(),
        user_id: user_id.to_string(),
        exp: (chrono::Utc::now().timestamp() + 300) as usize,
    }
}

fn sign(claims: &Claims, secret: &str) -> String {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

fn token_for(user: &str) -> String {
    sign(&claims_for(user, "u1", Some("User")), SECRET)
}

async fn spawn_backend(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn protected_path_without_token_is_rejected() {
    let (status, body) = send(
        app(),
        get("/api/authenticate/test-security")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Authentication required");
}

#[tokio::test]
async fn wildcard_paths_are_gated_too() {
    let (status, body) = send(app(), get("/api/secure/a/b").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Authentication required");
}

#[tokio::test]
async fn forged_token_is_rejected() {
    let forged = sign(&claims_for("mallory", "u9", None), "wrong-secret");
    let (status, body) = send(
        app(),
        get("/api/authenticate/test-security")
            .header("authorization", format!("Bearer {forged}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token");
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let mut claims = claims_for("alice", "u1", Some("User"));
    claims.exp = (chrono::Utc::now().timestamp() - 3600) as usize;
    let token = sign(&claims, SECRET);
    let (status, body) = send(
        app(),
        get("/api/authenticate/test-security")
            .header("authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token");
}

#[tokio::test]
async fn bearer_token_reaches_handler_with_claims() {
    let (status, body) = send(
        app(),
        get("/api/authenticate/test-security")
            .header("authorization", format!("Bearer {}", token_for("alice")))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], true);
    assert_eq!(body["message"], "login success");
    assert_eq!(body["userData"]["user"], "alice");
    assert_eq!(body["userData"]["userId"], "u1");
    assert_eq!(body["userData"]["claims"], json!(["film.view"]));
}

#[tokio::test]
async fn cookie_token_is_accepted() {
    let (status, body) = send(
        app(),
        get("/api/authenticate/test-security")
            .header("cookie", format!("token={}", token_for("bob")))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["userData"]["user"], "bob");
}

#[tokio::test]
async fn rating_out_of_range_is_a_bad_request() {
    for body in [
        json!({ "movieId": "m1", "rating": 6 }),
        json!({ "movieId": "m1", "rating": 0 }),
        json!({ "rating": 3 }),
    ] {
        let (status, body) = send(app(), rate_request(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({ "success": false, "message": "Invalid rating or movie ID" })
        );
    }
}

#[tokio::test]
async fn rating_is_forwarded_and_relayed() {
    let seen = Arc::new(Mutex::new(None));
    let sink = seen.clone();
    let backend = Router::new().route(
        "/movies/rate",
        post(move |Json(body): Json<Value>| {
            let sink = sink.clone();
            async move {
                *sink.lock().unwrap() = Some(body);
                Json(json!({ "success": true, "rating": 4.2, "ratingCount": 11 }))
            }
        }),
    );
    let base = spawn_backend(backend).await;

    let (status, body) = send(
        app_with_backend(&base),
        rate_request(json!({ "movieId": "m1", "rating": 4 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ratingCount"], 11);

    let forwarded = seen.lock().unwrap().clone().unwrap();
    assert_eq!(forwarded["movieId"], "m1");
    assert_eq!(forwarded["rating"], 4.0);
}

#[tokio::test]
async fn numeric_string_rating_is_forwarded_as_number() {
    let seen = Arc::new(Mutex::new(None));
    let sink = seen.clone();
    let backend = Router::new().route(
        "/movies/rate",
        post(move |Json(body): Json<Value>| {
            let sink = sink.clone();
            async move {
                *sink.lock().unwrap() = Some(body);
                Json(json!({ "success": true }))
            }
        }),
    );
    let base = spawn_backend(backend).await;

    let (status, _) = send(
        app_with_backend(&base),
        rate_request(json!({ "movieId": "m1", "rating": "3" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let forwarded = seen.lock().unwrap().clone().unwrap();
    assert_eq!(forwarded["rating"], 3.0);
}

#[tokio::test]
async fn backend_rejection_becomes_generic_failure() {
    let backend = Router::new().route(
        "/movies/rate",
        post(|| async {
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "message": "Movie not found" })),
            )
        }),
    );
    let base = spawn_backend(backend).await;

    let (status, body) = send(
        app_with_backend(&base),
        rate_request(json!({ "movieId": "m404", "rating": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({ "success": false, "message": "Failed to rate movie" })
    );
}

#[tokio::test]
async fn unreachable_backend_becomes_generic_failure() {
    let (status, body) = send(app(), rate_request(json!({ "movieId": "m1", "rating": 3 }))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Failed to rate movie");
}

#[tokio::test]
async fn malformed_rating_body_fails() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/movies/rate")
        .body(Body::from("not json"))
        .unwrap();
    let (status, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
}
