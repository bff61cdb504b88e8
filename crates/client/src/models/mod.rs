//! Request/response DTOs, one module per backend resource.
//!
//! These are explicit schemas for the wire: a response that doesn't match
//! fails fast in the pipeline instead of leaking undefined fields upward.

pub mod auth;
pub mod dashboard;
pub mod deliverable;
pub mod organization;
pub mod project;
pub mod ticket;
pub mod user;
