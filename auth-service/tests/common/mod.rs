#![allow(dead_code)]

use std::sync::Arc;

use auth::Authenticator;
use auth::TokenSettings;
use auth_service::domain::session::service::SessionService;
use auth_service::inbound::http::router::create_router;
use auth_service::outbound::repositories::InMemoryCredentialStore;
use serde_json::json;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const PASSWORD_SALT: &[u8] = b"test-password-salt";

pub fn authenticator() -> Authenticator {
    Authenticator::new(JWT_SECRET, PASSWORD_SALT, TokenSettings::default())
}

/// Session service over a fresh in-memory store
pub fn session_service() -> SessionService<InMemoryCredentialStore> {
    SessionService::new(Arc::new(InMemoryCredentialStore::new()), authenticator())
}

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let router = create_router(Arc::new(session_service()));

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            api_client: reqwest::Client::new(),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(&format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(&format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Register a user and return the response body
    pub async fn register(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/api/users")
            .json(&json!({
                "email": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Log in and return the response
    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/api/auth/login")
            .json(&json!({
                "email": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Exchange a refresh token and return the response
    pub async fn refresh(&self, refresh_token: &str) -> reqwest::Response {
        self.post("/api/auth/refresh")
            .json(&json!({
                "refresh_token": refresh_token
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }
}
