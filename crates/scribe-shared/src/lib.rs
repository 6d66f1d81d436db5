//! # Scribe Shared
//!
//! Wire types for the blog's HTTP surface: form bodies coming in, JSON going out.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse, FieldProblem};
