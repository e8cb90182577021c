//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer and hosts the
//! process-local collaborators the services depend on.
//!
//! # Modules
//!
//! - [`persistence`] - PostgreSQL repository implementations
//! - [`title`] - Best-effort page title fetching
//! - [`recent_log`] - Bounded buffer of recent log lines

pub mod persistence;
pub mod recent_log;
pub mod title;
