use policydesk_core::OrganizationId;

use crate::error::ApiError;
use crate::http::ApiClient;
use crate::models::organization::{
    NewOrganization, Organization, OrganizationStats, UpdateOrganization,
};

/// `/organizations` endpoints.
#[derive(Debug, Clone)]
pub struct OrganizationsApi {
    client: ApiClient,
}

impl OrganizationsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Organization>, ApiError> {
        self.client.get("/organizations").await
    }

    pub async fn create(&self, organization: &NewOrganization) -> Result<Organization, ApiError> {
        self.client.post("/organizations", organization).await
    }

    pub async fn get(&self, id: OrganizationId) -> Result<Organization, ApiError> {
        self.client.get(&format!("/organizations/{id}")).await
    }

    pub async fn update(
        &self,
        id: OrganizationId,
        changes: &UpdateOrganization,
    ) -> Result<Organization, ApiError> {
        self.client.put(&format!("/organizations/{id}"), changes).await
    }

    pub async fn delete(&self, id: OrganizationId) -> Result<(), ApiError> {
        self.client.delete(&format!("/organizations/{id}")).await
    }

    pub async fn stats(&self) -> Result<OrganizationStats, ApiError> {
        self.client.get("/organizations/stats").await
    }
}
