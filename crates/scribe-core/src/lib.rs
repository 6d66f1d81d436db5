//! # Scribe Core
//!
//! The domain layer of the Scribe blog.
//! Entities, field validation, authorization policy, store ports and the
//! services that combine them. No infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod policy;
pub mod ports;
pub mod services;
pub mod validation;

pub use error::DomainError;
pub use policy::{Denial, Outcome};
