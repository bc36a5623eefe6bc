//! Integration tests for the PlugOn session and cart core.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p plugon-integration-tests
//! ```
//!
//! Nothing external is needed: remote collaborators are exercised against
//! [`MockApi`], an in-process `axum` server on an ephemeral port.
//!
//! # Test Categories
//!
//! - `cart_scenarios` - Cart invariants and shopping flows
//! - `persistence` - File-backed round-trips and corrupt-data recovery
//! - `remote_collaborators` - Remote catalog and auth over HTTP

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use url::Url;

use plugon_core::{Email, Role, UserId};
use plugon_storefront::models::Identity;

/// Session cookie the mock API hands out on login.
pub const SESSION_COOKIE: &str = "plugon_session=mock-session";

/// Email and password the mock API accepts.
pub const MOCK_EMAIL: &str = "admin@plugon.co.kr";
pub const MOCK_PASSWORD: &str = "admin123";

/// Product id the mock API answers with a 500.
pub const BROKEN_PRODUCT: &str = "prod-500";

#[derive(Default)]
struct MockState {
    product_hits: AtomicUsize,
}

/// A running mock of the PlugOn API.
///
/// - `GET /api/products/{id}` - `prod-001` found, `prod-500` errors, else 404
/// - `POST /api/auth/login` - accepts [`MOCK_EMAIL`] / [`MOCK_PASSWORD`]
/// - `GET /api/auth/me` - 200 with the user if the session cookie is sent
/// - `POST /api/auth/logout` - always succeeds
pub struct MockApi {
    base_url: Url,
    state: Arc<MockState>,
}

impl MockApi {
    /// Bind to an ephemeral port and serve in the background.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    #[allow(clippy::unwrap_used)]
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new()
            .route("/api/products/{id}", get(product))
            .route("/api/auth/login", post(login))
            .route("/api/auth/me", get(me))
            .route("/api/auth/logout", post(logout))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: Url::parse(&format!("http://{addr}")).unwrap(),
            state,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> Url {
        self.base_url.clone()
    }

    /// How many product lookups reached the server.
    #[must_use]
    pub fn product_hits(&self) -> usize {
        self.state.product_hits.load(Ordering::SeqCst)
    }
}

fn mock_user() -> Value {
    json!({
        "id": "u-1001",
        "email": MOCK_EMAIL,
        "firstName": "관리자",
        "lastName": "최고",
        "role": "super_admin",
        "companyName": "PlugOn",
        "phone": "010-1234-5678",
        "createdAt": "2024-01-15T09:00:00Z"
    })
}

async fn product(State(state): State<Arc<MockState>>, Path(id): Path<String>) -> impl IntoResponse {
    state.product_hits.fetch_add(1, Ordering::SeqCst);

    match id.as_str() {
        "prod-001" => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "product": {
                    "id": "prod-001",
                    "name": "PlugOn 스탠다드 패키지",
                    "description": "기본 전산시스템 패키지로 소규모 사업체에 최적화된 솔루션입니다.",
                    "price": 99000,
                    "category": "software",
                    "imageUrl": null,
                    "featured": true,
                    "stock": 100
                }
            })),
        ),
        BROKEN_PRODUCT => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "success": false, "message": "internal error" })),
        ),
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({ "success": false, "message": "상품을 찾을 수 없습니다." })),
        ),
    }
}

async fn login(Json(body): Json<Value>) -> axum::response::Response {
    if body["email"] == MOCK_EMAIL && body["password"] == MOCK_PASSWORD {
        (
            StatusCode::OK,
            [(header::SET_COOKIE, format!("{SESSION_COOKIE}; Path=/"))],
            Json(json!({ "success": true, "user": mock_user() })),
        )
            .into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "success": false,
                "message": "이메일 또는 비밀번호가 올바르지 않습니다."
            })),
        )
            .into_response()
    }
}

async fn me(headers: HeaderMap) -> impl IntoResponse {
    let has_session = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|value| value.contains(SESSION_COOKIE));

    if has_session {
        (
            StatusCode::OK,
            Json(json!({ "success": true, "user": mock_user() })),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "success": false, "message": "로그인이 필요합니다." })),
        )
    }
}

async fn logout() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(
            header::SET_COOKIE,
            "plugon_session=; Path=/; Max-Age=0".to_string(),
        )],
        Json(json!({ "success": true, "message": "로그아웃되었습니다." })),
    )
}

/// A local identity with the given role.
///
/// # Panics
///
/// Never; the fixture email is valid.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn identity(role: Role) -> Identity {
    Identity {
        id: UserId::new("1705300000000"),
        email: Email::parse("user@plugon.co.kr").unwrap(),
        first_name: "사용자".to_string(),
        last_name: "일반".to_string(),
        role,
        company_name: Some("테스트회사".to_string()),
        phone: Some("010-9876-5432".to_string()),
        created_at: None,
    }
}
