use core::str::FromStr;

use serde::{Deserialize, Serialize};

use policydesk_core::DomainError;

/// Navigable application area.
///
/// Sections are what the shell's navigation renders; visibility per role is
/// answered by [`crate::policy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Dashboard,
    Projects,
    Deliverables,
    Clients,
    Tickets,
    Reports,
    Users,
    Settings,
}

impl Section {
    /// Every section, in navigation order.
    pub const ALL: [Section; 8] = [
        Section::Dashboard,
        Section::Projects,
        Section::Deliverables,
        Section::Clients,
        Section::Tickets,
        Section::Reports,
        Section::Users,
        Section::Settings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Dashboard => "dashboard",
            Section::Projects => "projects",
            Section::Deliverables => "deliverables",
            Section::Clients => "clients",
            Section::Tickets => "tickets",
            Section::Reports => "reports",
            Section::Users => "users",
            Section::Settings => "settings",
        }
    }
}

impl core::fmt::Display for Section {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .iter()
            .find(|sec| sec.as_str() == s)
            .copied()
            .ok_or_else(|| DomainError::validation(format!("unknown section: {s}")))
    }
}
