//! End-to-end page flows against a local HTTP backend.

use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use xemphim_api::{ApiClient, TokenSource};
use xemphim_core::config::AppConfig;
use xemphim_core::fallback::Origin;
use xemphim_core::pages::{Action, Home, Login, Profile, Services};
use xemphim_core::route::Route;
use xemphim_core::session::SessionStore;

#[derive(Clone, Default)]
struct Recorder {
    log: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    fn note(&self, line: impl Into<String>) {
        self.log.lock().unwrap().push(line.into());
    }

    fn lines(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

async fn login(State(b): State<Recorder>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    b.note("POST /auth/login");
    if body["username"] == "alice" && body["password"] == "secret" {
        (StatusCode::OK, Json(json!({ "token": "abc", "userId": "u1", "username": "alice" })))
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid credentials" })),
        )
    }
}

async fn profile(State(b): State<Recorder>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    b.note(format!("GET /auth/profile {}", bearer(&headers).unwrap_or("-")));
    match bearer(&headers) {
        Some("abc") => (
            StatusCode::OK,
            Json(json!({ "_id": "u1", "username": "alice", "email": "a@x.io" })),
        ),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Token expired" })),
        ),
    }
}

async fn broken_films(State(b): State<Recorder>) -> StatusCode {
    b.note("GET /movies");
    StatusCode::INTERNAL_SERVER_ERROR
}

async fn add_favorite(
    State(b): State<Recorder>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> StatusCode {
    b.note(format!(
        "POST /favorites {} {} {}",
        bearer(&headers).unwrap_or("-"),
        body["userId"].as_str().unwrap_or("-"),
        body["movieId"].as_str().unwrap_or("-"),
    ));
    StatusCode::CREATED
}

async fn user_list(State(b): State<Recorder>, Path(user): Path<String>) -> Json<Value> {
    b.note(format!("GET list {user}"));
    Json(json!([]))
}

async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

async fn services(router: Router) -> Services<ApiClient> {
    let base = spawn(router).await;
    let session = Arc::new(SessionStore::in_memory());
    let client = ApiClient::new(&base, session.clone() as Arc<dyn TokenSource>).unwrap();
    Services::new(client, session, AppConfig::default())
}

#[tokio::test]
async fn login_stores_token_and_lands_on_home() {
    let backend = Recorder::default();
    let router = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/profile", get(profile))
        .with_state(backend.clone());
    let svc = services(router).await;

    let mut form = Login::with_credentials("alice", "secret");
    assert_eq!(form.submit(&svc).await, Action::Navigate(Route::Home));
    assert_eq!(svc.session.token().as_deref(), Some("abc"));
    assert_eq!(svc.session.user_id().as_deref(), Some("u1"));

    // The stored token rides on the next call.
    let (page, action) = Profile::open(&svc).await;
    assert_eq!(page.user().map(|u| u.username.as_str()), Some("alice"));
    assert_ne!(action, Action::Navigate(Route::Login));
    assert!(backend.lines().contains(&"GET /auth/profile abc".to_string()));
}

#[tokio::test]
async fn wrong_password_shows_backend_message() {
    let router = Router::new()
        .route("/auth/login", post(login))
        .with_state(Recorder::default());
    let svc = services(router).await;

    let mut form = Login::with_credentials("alice", "nope");
    match form.submit(&svc).await {
        Action::Notify(notice) => assert_eq!(notice.message, "Invalid credentials"),
        other => panic!("unexpected {other:?}"),
    }
    assert!(!svc.session.is_logged_in());
}

#[tokio::test]
async fn broken_catalog_still_allows_favoriting() {
    let backend = Recorder::default();
    let router = Router::new()
        .route("/auth/login", post(login))
        .route("/movies", get(broken_films))
        .route("/movies/top", get(broken_films))
        .route("/favorites", post(add_favorite))
        .route("/favorites/user/{id}", get(user_list))
        .route("/movies/ratings/user/{id}", get(user_list))
        .with_state(backend.clone());
    let svc = services(router).await;
    Login::with_credentials("alice", "secret").submit(&svc).await;

    let mut home = Home::new();
    home.load(&svc).await;
    assert_eq!(home.films.origin, Origin::Fallback);
    assert_eq!(home.films.data.len(), 6);
    assert_eq!(
        home.error.as_deref(),
        Some("Failed to load films. Please try again later.")
    );

    let first = home.films.data[0].id.clone();
    home.toggle_favorite(&svc, &first).await;
    assert!(backend
        .lines()
        .contains(&format!("POST /favorites abc u1 {first}")));
    assert!(home.favorites.contains(&first));
}

#[tokio::test]
async fn expired_token_on_profile_logs_out() {
    let router = Router::new()
        .route("/auth/profile", get(profile))
        .with_state(Recorder::default());
    let svc = services(router).await;
    svc.session.login(
        "stale",
        &xemphim_core::session::SessionUser {
            id: "u1".into(),
            username: "alice".into(),
        },
    );

    let (_, action) = Profile::open(&svc).await;
    assert!(action.into_vec().contains(&Action::Navigate(Route::Login)));
    assert!(!svc.session.is_logged_in());
}
