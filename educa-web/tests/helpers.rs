//! Integration test helpers
//!
//! Drives the full router in-process with `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Duration;
use educa_applications::CourseRepository;
use educa_core::EducaConfig;
use educa_web::{create_app, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

pub const DEMO_EMAIL: &str = "demo@demo.com";
pub const DEMO_PASSWORD: &str = "1234";

/// Test application instance
pub struct TestApp {
    pub state: AppState,
    router: Router,
}

/// Status, headers and parsed JSON body of a response
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Value,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::with_config(EducaConfig::default()).await
    }

    pub async fn with_config(config: EducaConfig) -> Self {
        let state = AppState::new(config).await.expect("Failed to build state");
        Self::with_state(state)
    }

    /// Default configuration around a caller-supplied repository
    pub fn with_repository(courses: Arc<CourseRepository>) -> Self {
        let state = AppState::with_repository(EducaConfig::default(), courses)
            .expect("Failed to build state");
        Self::with_state(state)
    }

    fn with_state(state: AppState) -> Self {
        let router = create_app(state.clone());
        Self { state, router }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request.");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn post_login(&self, email: &str, password: &str) -> TestResponse {
        self.request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": email, "password": password })),
        )
        .await
    }

    /// Log in as the seeded demo user and return the token
    pub async fn login(&self) -> String {
        let response = self.post_login(DEMO_EMAIL, DEMO_PASSWORD).await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.body);
        response.body["token"]
            .as_str()
            .expect("token in login response")
            .to_string()
    }

    /// Token for the demo user that expired a minute ago
    pub fn expired_token(&self) -> String {
        self.state
            .token_codec
            .issue(DEMO_EMAIL, Duration::seconds(-60))
            .expect("issue expired token")
    }

    pub async fn create_course(&self, token: &str, nombre: &str, codigo: &str) -> TestResponse {
        self.request(
            Method::POST,
            "/api/cursos",
            Some(token),
            Some(json!({ "nombre": nombre, "codigo": codigo })),
        )
        .await
    }
}
