use reqwest::multipart::{Form, Part};

use policydesk_core::{DeliverableId, UserId};

use crate::error::ApiError;
use crate::http::ApiClient;
use crate::models::deliverable::{Deliverable, NewDeliverable, UpdateDeliverable};

/// `/deliverables` endpoints.
#[derive(Debug, Clone)]
pub struct DeliverablesApi {
    client: ApiClient,
}

impl DeliverablesApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Deliverable>, ApiError> {
        self.client.get("/deliverables").await
    }

    pub async fn create(&self, deliverable: &NewDeliverable) -> Result<Deliverable, ApiError> {
        self.client.post("/deliverables", deliverable).await
    }

    pub async fn get(&self, id: DeliverableId) -> Result<Deliverable, ApiError> {
        self.client.get(&format!("/deliverables/{id}")).await
    }

    pub async fn update(
        &self,
        id: DeliverableId,
        changes: &UpdateDeliverable,
    ) -> Result<Deliverable, ApiError> {
        self.client.put(&format!("/deliverables/{id}"), changes).await
    }

    pub async fn delete(&self, id: DeliverableId) -> Result<(), ApiError> {
        self.client.delete(&format!("/deliverables/{id}")).await
    }

    /// Submit the deliverable to the named client contact for review.
    pub async fn submit(
        &self,
        id: DeliverableId,
        client_id: UserId,
    ) -> Result<Deliverable, ApiError> {
        let path = format!("/deliverables/{id}/submit?clientId={client_id}");
        self.client.put_action(&path).await
    }

    /// Attach a file to the deliverable (multipart upload).
    pub async fn upload(
        &self,
        id: DeliverableId,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<Deliverable, ApiError> {
        let form = Form::new().part("file", Part::bytes(bytes).file_name(file_name.to_string()));
        self.client
            .post_multipart(&format!("/deliverables/{id}/upload"), form)
            .await
    }
}
