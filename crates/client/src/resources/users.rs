use reqwest::Method;

use policydesk_core::UserId;

use crate::error::ApiError;
use crate::http::ApiClient;
use crate::models::user::{UpdateUserRequest, UserProfile};

/// `/users` endpoints.
#[derive(Debug, Clone)]
pub struct UsersApi {
    client: ApiClient,
}

impl UsersApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<UserProfile>, ApiError> {
        // The backend routes the collection under a trailing slash.
        self.client.get("/users/").await
    }

    pub async fn get(&self, id: UserId) -> Result<UserProfile, ApiError> {
        self.client.get(&format!("/users/{id}")).await
    }

    pub async fn by_username(&self, username: &str) -> Result<UserProfile, ApiError> {
        let path = format!("/users/username/{}", urlencoding::encode(username));
        self.client.get(&path).await
    }

    pub async fn update(
        &self,
        id: UserId,
        changes: &UpdateUserRequest,
    ) -> Result<UserProfile, ApiError> {
        self.client.put(&format!("/users/{id}"), changes).await
    }

    pub async fn activate(&self, id: UserId) -> Result<(), ApiError> {
        self.client.execute(Method::PUT, &format!("/users/{id}/activate")).await
    }

    pub async fn deactivate(&self, id: UserId) -> Result<(), ApiError> {
        self.client.execute(Method::PUT, &format!("/users/{id}/deactivate")).await
    }

    pub async fn delete(&self, id: UserId) -> Result<(), ApiError> {
        self.client.delete(&format!("/users/{id}")).await
    }
}
