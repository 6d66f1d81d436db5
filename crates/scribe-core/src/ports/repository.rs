use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Comment, Post, Reaction, ReactionKind, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Persist a new entity.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Overwrite an existing entity. Fails with `NotFound` if it is gone.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their (unique) username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;
}

/// Which posts a listing should include.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    /// Substring that must appear in the title or the content.
    pub query: Option<String>,
}

impl PostFilter {
    pub fn all() -> Self {
        Self::default()
    }

    /// Blank queries select everything; anything else is matched verbatim.
    pub fn search(query: Option<&str>) -> Self {
        let query = query
            .filter(|q| !q.trim().is_empty())
            .map(str::to_string);
        Self { query }
    }
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Posts matching `filter`, oldest first, skipping `offset` and returning at most `limit`.
    async fn search(
        &self,
        filter: &PostFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError>;

    /// Number of posts matching `filter`.
    async fn count(&self, filter: &PostFilter) -> Result<u64, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// Comments on a post, oldest first.
    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError>;

    async fn count_by_post(&self, post_id: Uuid) -> Result<u64, RepoError>;
}

/// Reaction repository. Implementations must keep (post, user) unique even
/// under concurrent upserts.
#[async_trait]
pub trait ReactionRepository: Send + Sync {
    /// Insert a reaction, or overwrite the kind of the existing one for the
    /// same (post, user). Returns the stored row.
    async fn upsert(&self, post_id: Uuid, user_id: Uuid, kind: ReactionKind)
    -> Result<Reaction, RepoError>;

    async fn find(&self, post_id: Uuid, user_id: Uuid) -> Result<Option<Reaction>, RepoError>;

    async fn count_by_kind(&self, post_id: Uuid, kind: ReactionKind) -> Result<u64, RepoError>;
}

/// Handles to every store the services need.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub reactions: Arc<dyn ReactionRepository>,
}
