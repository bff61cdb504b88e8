use core::str::FromStr;

use serde::{Deserialize, Serialize};

use policydesk_core::DomainError;

/// Role granted to a user account.
///
/// This is a closed set: the backend only ever issues these role names, and
/// anything else must be treated as "no recognized role" by callers (parsing
/// is fallible on purpose).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    Admin,
    SystemAdmin,
    ProjectManager,
    Consultant,
    MainClient,
    SubClient,
    PolicyEditor,
    PolicyReviewer,
    QualityMonitor,
}

impl Role {
    /// Every role, in a stable order. Useful for exhaustive policy checks.
    pub const ALL: [Role; 10] = [
        Role::SuperAdmin,
        Role::Admin,
        Role::SystemAdmin,
        Role::ProjectManager,
        Role::Consultant,
        Role::MainClient,
        Role::SubClient,
        Role::PolicyEditor,
        Role::PolicyReviewer,
        Role::QualityMonitor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::Admin => "admin",
            Role::SystemAdmin => "system_admin",
            Role::ProjectManager => "project_manager",
            Role::Consultant => "consultant",
            Role::MainClient => "main_client",
            Role::SubClient => "sub_client",
            Role::PolicyEditor => "policy_editor",
            Role::PolicyReviewer => "policy_reviewer",
            Role::QualityMonitor => "quality_monitor",
        }
    }

    /// Whether this role carries platform administration rights.
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::SuperAdmin | Role::Admin | Role::SystemAdmin)
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .iter()
            .find(|r| r.as_str() == s)
            .copied()
            .ok_or_else(|| DomainError::validation(format!("unknown role: {s}")))
    }
}
