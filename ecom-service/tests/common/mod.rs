#![allow(dead_code)]

pub mod db;

use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use auth::Authenticator;
use auth::PasswordHasher;
use axum::extract::State;
use axum::routing::get;
use axum::Json;
use axum::Router;
use chrono::Duration;
use ecom_service::domain::order::service::OrderService;
use ecom_service::domain::product::service::ProductService;
use ecom_service::domain::user::ports::UserRepository;
use ecom_service::domain::user::ports::UserServicePort;
use ecom_service::domain::user::service::UserService;
use ecom_service::inbound::http::middleware::protect;
use ecom_service::inbound::http::middleware::AuthGate;
use ecom_service::inbound::http::middleware::CurrentUser;
use ecom_service::inbound::http::router::create_router;
use ecom_service::outbound::repositories::InMemoryStore;
use reqwest::StatusCode;
use serde_json::json;
use serde_json::Value;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const TEST_PASSWORD: &str = "123mudar";

fn test_hasher() -> PasswordHasher {
    PasswordHasher::with_params(1024, 1, 1).expect("Failed to build password hasher")
}

pub fn test_authenticator() -> Authenticator {
    Authenticator::new(TEST_SECRET, Duration::hours(1)).with_password_hasher(test_hasher())
}

async fn serve(router: Router) -> String {
    // Use random port (0 = OS assigns)
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Server error");
    });

    format!("http://127.0.0.1:{}", port)
}

/// Test application that spawns the real router over an in-memory store
pub struct TestApp {
    pub address: String,
    pub store: Arc<InMemoryStore>,
    pub authenticator: Arc<Authenticator>,
    pub api_client: reqwest::Client,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let authenticator = Arc::new(test_authenticator());

        let user_service = Arc::new(UserService::new(Arc::clone(&store), test_hasher()));
        let product_service = Arc::new(ProductService::new(Arc::clone(&store)));
        let order_service = Arc::new(OrderService::new(Arc::clone(&store), Arc::clone(&store)));

        let router = create_router(
            user_service,
            product_service,
            order_service,
            Arc::clone(&authenticator),
        );

        Self {
            address: serve(router).await,
            store,
            authenticator,
            api_client: reqwest::Client::builder()
                .cookie_store(true)
                .build()
                .expect("Failed to create reqwest client"),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(&format!("{}/api/v1{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(&format!("{}/api/v1{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Register a user and return its ID
    pub async fn register(&self, email: &str) -> String {
        let response = self
            .post("/register")
            .json(&json!({
                "first_name": "john",
                "last_name": "doe",
                "email": email,
                "password": TEST_PASSWORD
            }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), StatusCode::CREATED);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"]["id"].as_str().unwrap().to_string()
    }

    /// Register a user, log in and return the bearer token
    pub async fn register_and_login(&self, email: &str) -> String {
        self.register(email).await;

        let response = self
            .post("/login")
            .json(&json!({ "email": email, "password": TEST_PASSWORD }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"]["token"].as_str().unwrap().to_string()
    }

    /// Add a product to the catalog and return its ID
    pub async fn create_product(
        &self,
        token: &str,
        name: &str,
        price: i64,
        quantity: u32,
    ) -> String {
        let response = self
            .post_authenticated("/products", token)
            .json(&json!({
                "name": name,
                "description": format!("A {}", name),
                "image_url": format!("https://img.example.com/{}.png", name),
                "price": price,
                "quantity": quantity
            }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), StatusCode::CREATED);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"]["id"].as_str().unwrap().to_string()
    }

    /// Issue a token signed with the application's secret
    pub fn create_test_token(&self, subject: &str) -> String {
        self.authenticator
            .issue_token(subject)
            .expect("Failed to issue token")
            .access_token
    }
}

/// Minimal server with one gated route backed by a handler that counts its calls
pub struct GateHarness {
    pub address: String,
    pub store: Arc<InMemoryStore>,
    pub authenticator: Arc<Authenticator>,
    pub calls: Arc<AtomicUsize>,
    pub api_client: reqwest::Client,
}

async fn whoami(
    State(calls): State<Arc<AtomicUsize>>,
    CurrentUser(user): CurrentUser,
) -> Json<Value> {
    calls.fetch_add(1, Ordering::SeqCst);
    Json(json!({ "id": user.id.to_string(), "email": user.email.to_string() }))
}

async fn ungated(
    State(calls): State<Arc<AtomicUsize>>,
    CurrentUser(user): CurrentUser,
) -> Json<Value> {
    calls.fetch_add(1, Ordering::SeqCst);
    Json(json!({ "id": user.id.to_string() }))
}

impl GateHarness {
    pub async fn spawn() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let user_service = Arc::new(UserService::new(Arc::clone(&store), test_hasher()));
        Self::spawn_with(store, user_service).await
    }

    /// Gate backed by a custom credential store; `store` is left empty
    pub async fn with_user_repository<R: UserRepository>(repository: R) -> Self {
        let user_service = Arc::new(UserService::new(Arc::new(repository), test_hasher()));
        Self::spawn_with(Arc::new(InMemoryStore::new()), user_service).await
    }

    async fn spawn_with(store: Arc<InMemoryStore>, user_service: Arc<dyn UserServicePort>) -> Self {
        let authenticator = Arc::new(test_authenticator());
        let calls = Arc::new(AtomicUsize::new(0));

        let gate = AuthGate::new(Arc::clone(&authenticator), user_service);

        let router = protect(Router::new().route("/whoami", get(whoami)), gate)
            .route("/ungated", get(ungated))
            .with_state(Arc::clone(&calls));

        Self {
            address: serve(router).await,
            store,
            authenticator,
            calls,
            api_client: reqwest::Client::new(),
        }
    }

    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(&format!("{}{}", self.address, path))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}
