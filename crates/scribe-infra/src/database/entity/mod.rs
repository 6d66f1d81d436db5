//! SeaORM entities, one module per table.

pub mod comment;
pub mod post;
pub mod reaction;
pub mod user;
