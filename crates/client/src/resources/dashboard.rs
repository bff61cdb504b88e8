use crate::error::ApiError;
use crate::http::ApiClient;
use crate::models::dashboard::DashboardSummary;

/// `GET /dashboard`.
#[derive(Debug, Clone)]
pub struct DashboardApi {
    client: ApiClient,
}

impl DashboardApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn summary(&self) -> Result<DashboardSummary, ApiError> {
        self.client.get("/dashboard").await
    }
}
