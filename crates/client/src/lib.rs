//! `policydesk-client` — typed client for the PolicyDesk backend.
//!
//! The load-bearing pieces live here:
//!
//! - [`token`]: one slot holding the current bearer credential.
//! - [`http`]: the single request pipeline — credential injection, dispatch,
//!   and failure classification into [`error::ApiError`]. A 401 ends the
//!   session exactly once, however many requests are in flight.
//! - [`session`]: login/restore/logout lifecycle and the current session.
//! - [`events`]: the bus the application shell subscribes to for
//!   login/logout/expiry announcements (navigation is the shell's job).
//! - [`resources`]: one thin typed facade per backend resource.
//!
//! Role/section visibility questions are answered by `policydesk-auth`;
//! this crate only moves bytes.

pub mod config;
pub mod error;
pub mod events;
pub mod http;
pub mod models;
pub mod resources;
pub mod session;
pub mod token;

pub use config::ClientConfig;
pub use error::ApiError;
pub use events::{SessionEvent, SessionEventBus, Subscription};
pub use http::ApiClient;
pub use resources::{
    AuthApi, DashboardApi, DeliverablesApi, OrganizationsApi, ProjectsApi, TicketsApi, UsersApi,
};
pub use session::{Session, SessionController, SessionState};
pub use token::{FileTokenStore, MemoryTokenStore, TokenStore};
