//! Database connection management and PostgreSQL repositories.

mod connections;

#[cfg(feature = "postgres")]
mod postgres_base;
#[cfg(feature = "postgres")]
pub mod postgres_repo;

#[cfg(feature = "postgres")]
pub mod entity;

pub use connections::{DatabaseConfig, DatabaseConnections};

#[cfg(feature = "postgres")]
pub use postgres_repo::{
    PostgresCommentRepository, PostgresPostRepository, PostgresReactionRepository,
    PostgresUserRepository,
};

#[cfg(feature = "postgres")]
impl DatabaseConnections {
    /// Repositories backed by this pool.
    pub fn repositories(&self) -> scribe_core::ports::Repositories {
        use std::sync::Arc;

        scribe_core::ports::Repositories {
            users: Arc::new(PostgresUserRepository::new(self.main.clone())),
            posts: Arc::new(PostgresPostRepository::new(self.main.clone())),
            comments: Arc::new(PostgresCommentRepository::new(self.main.clone())),
            reactions: Arc::new(PostgresReactionRepository::new(self.main.clone())),
        }
    }
}
