//! `policydesk-auth` — pure authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: it reads and
//! validates credential claims and answers role/section visibility questions,
//! nothing else. The backend remains the authority for every real
//! authorization decision; everything here only gates what the UI shows.

pub mod claims;
pub mod decode;
pub mod policy;
pub mod role;
pub mod section;

pub use claims::{Claims, TokenValidationError, validate_claims};
pub use decode::{DecodeError, decode_claims};
pub use policy::{can_access_section, can_access_section_str, sections_for};
pub use role::Role;
pub use section::Section;
