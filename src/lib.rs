//! Commons Dialogue - pairing and conversation service for the Common Sense community
//!
//! Members answer opinion questions, which yields an orientation score. The
//! matchmaker pairs each member with the nearest unmatched member whose score
//! differs enough to make for a real exchange, at most one active pairing per
//! member. Paired members talk in a match conversation; any two members can
//! also talk in the open direct channel.

pub mod auth;
pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{PartnerSelector, Selection};
pub use error::AppError;
pub use models::{ActiveMatch, Candidate, DirectMessage, MatchMessage, MemberSummary};
