#![allow(dead_code)]

use std::collections::HashMap;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, Response},
    Router,
};
use geocast_server::{api::app_router, build_state, config::Config};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "admin-password";

pub struct TestApp {
    pub router: Router,
    _dir: TempDir,
}

pub async fn test_app() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("test.db").to_string_lossy().into_owned();
    let vars: HashMap<&str, String> = HashMap::from([
        ("GC_DB_PATH", db_path),
        ("GC_JWT_SECRET", "MDEyMzQ1Njc4OWFiY2RlZjAxMjM0NTY3ODlhYmNkZWY=".to_string()),
        ("GC_ADMIN_EMAIL", ADMIN_EMAIL.to_string()),
        ("GC_ADMIN_PASSWORD", ADMIN_PASSWORD.to_string()),
        ("GC_TIMEZONE", "Asia/Seoul".to_string()),
        ("GC_AGE_REFERENCE_YEAR", "2025".to_string()),
        (
            "GC_TRACKING_FALLBACK_URL",
            "https://fallback.example.com/".to_string(),
        ),
    ]);
    let config = Config::from_lookup(|key| vars.get(key).cloned()).unwrap();
    let state = build_state(&config).await.unwrap();
    TestApp {
        router: app_router(state, &config),
        _dir: dir,
    }
}

impl TestApp {
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        self.router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap()
    }

    /// Sends the request and returns the status with the parsed JSON body.
    pub async fn json(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (u16, Value) {
        let response = self.send(method, uri, token, body).await;
        let status = response.status().as_u16();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    pub async fn login(&self, email: &str, password: &str) -> String {
        let (status, body) = self
            .json(
                Method::POST,
                "/api/v1/auth/login",
                None,
                Some(serde_json::json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(status, 200, "login failed: {body}");
        body["accessToken"].as_str().unwrap().to_string()
    }

    pub async fn signup(&self, email: &str) -> String {
        let (status, body) = self
            .json(
                Method::POST,
                "/api/v1/auth/signup",
                None,
                Some(serde_json::json!({
                    "email": email,
                    "password": "correct-horse",
                    "businessNo": "123-45-67890",
                    "companyName": "Acme Coffee",
                })),
            )
            .await;
        assert_eq!(status, 200, "signup failed: {body}");
        body["accessToken"].as_str().unwrap().to_string()
    }

    /// Creates a customer through the admin API and returns its id.
    pub async fn seed_customer(&self, admin_token: &str, customer: Value) -> String {
        let (status, body) = self
            .json(
                Method::POST,
                "/api/v1/admin/customers",
                Some(admin_token),
                Some(customer),
            )
            .await;
        assert_eq!(status, 200, "customer create failed: {body}");
        body["id"].as_str().unwrap().to_string()
    }
}

pub fn customer(name: &str, gender: &str, birth_year: i32, lat: f64, lng: f64) -> Value {
    serde_json::json!({
        "name": name,
        "gender": gender,
        "birthYear": birth_year,
        "phone": "010-1234-5678",
        "roadAddress": "123 Teheran-ro",
        "detailAddress": null,
        "postalCode": "06234",
        "sido": "Seoul",
        "sigungu": "Gangnam-gu",
        "lat": lat,
        "lng": lng,
    })
}
