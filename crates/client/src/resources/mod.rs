//! Typed facades, one per backend resource.
//!
//! A facade binds paths, verbs and DTOs — nothing more. No retries, no
//! caching, no error handling: classified errors from the pipeline pass
//! through to the caller untouched.

pub mod auth;
pub mod dashboard;
pub mod deliverables;
pub mod organizations;
pub mod projects;
pub mod tickets;
pub mod users;

pub use auth::AuthApi;
pub use dashboard::DashboardApi;
pub use deliverables::DeliverablesApi;
pub use organizations::OrganizationsApi;
pub use projects::ProjectsApi;
pub use tickets::TicketsApi;
pub use users::UsersApi;
