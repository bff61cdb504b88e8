use reqwest::Method;

use policydesk_auth::Role;
use policydesk_core::{ProjectId, UserId};

use crate::error::ApiError;
use crate::http::ApiClient;
use crate::models::deliverable::Deliverable;
use crate::models::project::{NewProject, Project, ProjectMember, UpdateProject};

/// `/projects` endpoints.
#[derive(Debug, Clone)]
pub struct ProjectsApi {
    client: ApiClient,
}

impl ProjectsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Project>, ApiError> {
        self.client.get("/projects").await
    }

    pub async fn create(&self, project: &NewProject) -> Result<Project, ApiError> {
        self.client.post("/projects", project).await
    }

    pub async fn get(&self, id: ProjectId) -> Result<Project, ApiError> {
        self.client.get(&format!("/projects/{id}")).await
    }

    pub async fn update(&self, id: ProjectId, changes: &UpdateProject) -> Result<Project, ApiError> {
        self.client.put(&format!("/projects/{id}"), changes).await
    }

    pub async fn delete(&self, id: ProjectId) -> Result<(), ApiError> {
        self.client.delete(&format!("/projects/{id}")).await
    }

    pub async fn members(&self, id: ProjectId) -> Result<Vec<ProjectMember>, ApiError> {
        self.client.get(&format!("/projects/{id}/members")).await
    }

    pub async fn add_member(
        &self,
        id: ProjectId,
        user_id: UserId,
        role: Role,
    ) -> Result<(), ApiError> {
        let path = format!("/projects/{id}/members/{user_id}/{role}/add");
        self.client.execute(Method::POST, &path).await
    }

    pub async fn remove_member(
        &self,
        id: ProjectId,
        user_id: UserId,
        role: Role,
    ) -> Result<(), ApiError> {
        let path = format!("/projects/{id}/members/{user_id}/{role}/delete");
        self.client.execute(Method::DELETE, &path).await
    }

    pub async fn deliverables(&self, id: ProjectId) -> Result<Vec<Deliverable>, ApiError> {
        self.client.get(&format!("/projects/{id}/deliverables")).await
    }
}
