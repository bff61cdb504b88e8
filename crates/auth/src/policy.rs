//! Role→section visibility policy.
//!
//! A single static table answers every "may this role see this section?"
//! question; nothing else in the codebase is allowed to re-derive it.
//!
//! - No IO
//! - No panics
//! - Unknown role names are denied everything (fail-closed)

use crate::{Role, Section};

/// The sections a role may view. Total over [`Role`]; never empty.
pub fn sections_for(role: Role) -> &'static [Section] {
    use Section::*;

    match role {
        Role::SuperAdmin | Role::Admin | Role::SystemAdmin => &[
            Dashboard,
            Projects,
            Deliverables,
            Clients,
            Tickets,
            Reports,
            Users,
            Settings,
        ],
        Role::ProjectManager => &[Dashboard, Projects, Deliverables, Clients, Tickets, Reports],
        Role::Consultant => &[Dashboard, Projects, Deliverables, Tickets],
        Role::MainClient => &[Dashboard, Projects, Deliverables, Tickets, Reports],
        Role::SubClient => &[Dashboard, Deliverables, Tickets],
        Role::PolicyEditor => &[Dashboard, Projects, Deliverables],
        Role::PolicyReviewer => &[Dashboard, Deliverables, Reports],
        Role::QualityMonitor => &[Dashboard, Deliverables, Tickets, Reports],
    }
}

/// Whether `role` may view `section`.
pub fn can_access_section(role: Role, section: Section) -> bool {
    sections_for(role).contains(&section)
}

/// Same check from a raw role name, e.g. straight out of decoded claims.
///
/// An unrecognized name yields `false` for every section.
pub fn can_access_section_str(role: &str, section: Section) -> bool {
    role.parse::<Role>()
        .map(|r| can_access_section(r, section))
        .unwrap_or(false)
}
