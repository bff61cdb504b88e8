use reqwest::Method;

use crate::error::ApiError;
use crate::http::ApiClient;
use crate::models::auth::{LoginRequest, LoginResponse, RegisterRequest};

/// `/auth` endpoints.
///
/// Prefer [`crate::session::SessionController`] for login — it persists the
/// credential and establishes the session; this facade is the raw surface.
#[derive(Debug, Clone)]
pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.client.post("/auth/login", request).await
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<(), ApiError> {
        let _: Option<serde_json::Value> = self.client.post("/auth/register", request).await?;
        Ok(())
    }

    pub async fn verify_email(&self, token: &str) -> Result<(), ApiError> {
        let path = format!("/auth/verify-email?token={}", urlencoding::encode(token));
        self.client.execute(Method::POST, &path).await
    }

    /// Exchange the current credential for a fresh one. The caller decides
    /// whether to persist it.
    pub async fn refresh_token(&self) -> Result<LoginResponse, ApiError> {
        self.client.post_action("/auth/refresh-token").await
    }

    pub async fn forgot_password(&self, email: &str) -> Result<(), ApiError> {
        let path = format!("/auth/forgot-password?email={}", urlencoding::encode(email));
        self.client.execute(Method::POST, &path).await
    }
}
