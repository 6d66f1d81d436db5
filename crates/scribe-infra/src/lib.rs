//! # Scribe Infrastructure
//!
//! Concrete implementations of the ports defined in `scribe-core`.
//!
//! ## Feature Flags
//!
//! - `postgres` (default) - PostgreSQL repositories via SeaORM
//!
//! The in-memory store and the Argon2/JWT identity services are always built.

pub mod auth;
pub mod database;
pub mod memory;

pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
pub use database::DatabaseConnections;
pub use memory::InMemoryStore;
