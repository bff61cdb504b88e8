use serde::{Deserialize, Serialize};

use policydesk_auth::Role;
use policydesk_core::UserId;

use crate::models::organization::Organization;

/// A user account as the backend reports it.
///
/// `role` is typed: a response carrying a role outside the closed set is a
/// malformed response and fails classification, it does not limp into the
/// UI.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub organization: Option<Organization>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}
