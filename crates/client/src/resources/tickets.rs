use reqwest::multipart::{Form, Part};

use policydesk_core::{ProjectId, TicketId, UserId};

use crate::error::ApiError;
use crate::http::ApiClient;
use crate::models::ticket::{
    NewTicket, NewTicketComment, Ticket, TicketAttachment, TicketComment,
};

/// `/v1/tickets` endpoints.
///
/// The ticket service is versioned separately from the rest of the backend,
/// hence the `/v1` prefix; it still goes through the same pipeline as
/// everything else.
#[derive(Debug, Clone)]
pub struct TicketsApi {
    client: ApiClient,
}

impl TicketsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn get(&self, id: TicketId) -> Result<Ticket, ApiError> {
        self.client.get(&format!("/v1/tickets/{id}")).await
    }

    pub async fn for_user(&self, user_id: UserId) -> Result<Vec<Ticket>, ApiError> {
        self.client.get(&format!("/v1/tickets/userid/{user_id}")).await
    }

    pub async fn for_project(&self, project_id: ProjectId) -> Result<Vec<Ticket>, ApiError> {
        self.client.get(&format!("/v1/tickets/project/{project_id}")).await
    }

    pub async fn create(&self, ticket: &NewTicket) -> Result<Ticket, ApiError> {
        self.client.post("/v1/tickets", ticket).await
    }

    pub async fn submit_approval(&self, id: TicketId) -> Result<Ticket, ApiError> {
        self.client
            .patch_action(&format!("/v1/tickets/{id}/submit-approval"))
            .await
    }

    pub async fn assign(
        &self,
        id: TicketId,
        new_assignee_id: UserId,
        actor_id: UserId,
    ) -> Result<Ticket, ApiError> {
        let path = format!(
            "/v1/tickets/{id}/assign?newAssigneeId={new_assignee_id}&actorId={actor_id}"
        );
        self.client.patch_action(&path).await
    }

    pub async fn approve(&self, id: TicketId, client_id: UserId) -> Result<Ticket, ApiError> {
        let path = format!("/v1/tickets/{id}/approve?clientId={client_id}");
        self.client.patch_action(&path).await
    }

    pub async fn reject(&self, id: TicketId, approver_id: UserId) -> Result<Ticket, ApiError> {
        let path = format!("/v1/tickets/{id}/reject?approverId={approver_id}");
        self.client.put_action(&path).await
    }

    /// Attach a file to the ticket (multipart upload).
    pub async fn add_attachment(
        &self,
        id: TicketId,
        uploader_id: UserId,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<TicketAttachment, ApiError> {
        let form = Form::new().part("file", Part::bytes(bytes).file_name(file_name.to_string()));
        let path = format!("/v1/tickets/{id}/attachments?uploaderId={uploader_id}");
        self.client.post_multipart(&path, form).await
    }

    pub async fn comments(&self, ticket_id: TicketId) -> Result<Vec<TicketComment>, ApiError> {
        self.client.get(&format!("/v1/tickets/{ticket_id}/comments")).await
    }

    pub async fn add_comment(
        &self,
        ticket_id: TicketId,
        comment: &NewTicketComment,
    ) -> Result<TicketComment, ApiError> {
        self.client
            .post(&format!("/v1/tickets/{ticket_id}/comments"), comment)
            .await
    }
}
