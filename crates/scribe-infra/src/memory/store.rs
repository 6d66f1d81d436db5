//! In-memory content store - used when no database is configured, and in tests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use scribe_core::domain::{Comment, Post, Reaction, ReactionKind, User};
use scribe_core::error::RepoError;
use scribe_core::ports::{
    BaseRepository, CommentRepository, PostFilter, PostRepository, ReactionRepository,
    UserRepository,
};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    posts: HashMap<Uuid, Post>,
    comments: HashMap<Uuid, Comment>,
    reactions: HashMap<(Uuid, Uuid), Reaction>,
}

impl Tables {
    fn sorted_posts<'a>(&'a self, filter: &'a PostFilter) -> Vec<&'a Post> {
        let mut posts: Vec<&Post> = self
            .posts
            .values()
            .filter(|p| filter.query.as_deref().is_none_or(|q| p.matches(q)))
            .collect();
        posts.sort_by_key(|p| (p.created_at, p.id));
        posts
    }
}

/// All four tables behind one async `RwLock`.
///
/// Writes take the lock once, so check-then-write sequences (username
/// uniqueness, the reaction upsert) are atomic. Deletes cascade the same way
/// the PostgreSQL schema does. Data is lost on process restart.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored reactions, across all posts.
    pub async fn reaction_rows(&self) -> usize {
        self.tables.read().await.reactions.len()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(RepoError::Constraint("users_username_key".to_string()));
        }
        if tables.users.contains_key(&user.id) {
            return Err(RepoError::Constraint("users_pkey".to_string()));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user.id) {
            return Err(RepoError::NotFound);
        }
        if tables
            .users
            .values()
            .any(|u| u.username == user.username && u.id != user.id)
        {
            return Err(RepoError::Constraint("users_username_key".to_string()));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.users.remove(&id).ok_or(RepoError::NotFound)?;
        // Posts are orphaned; comments and reactions go with their author.
        tables.comments.retain(|_, c| c.author_id != id);
        tables.reactions.retain(|(_, user_id), _| *user_id != id);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.posts.contains_key(&post.id) {
            return Err(RepoError::Constraint("posts_pkey".to_string()));
        }
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        let slot = tables.posts.get_mut(&post.id).ok_or(RepoError::NotFound)?;
        *slot = post.clone();
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.posts.remove(&id).ok_or(RepoError::NotFound)?;
        tables.comments.retain(|_, c| c.post_id != id);
        tables.reactions.retain(|(post_id, _), _| *post_id != id);
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn search(
        &self,
        filter: &PostFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError> {
        let tables = self.tables.read().await;
        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);

        Ok(tables
            .sorted_posts(filter)
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn count(&self, filter: &PostFilter) -> Result<u64, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.sorted_posts(filter).len() as u64)
    }
}

#[async_trait]
impl BaseRepository<Comment, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        Ok(self.tables.read().await.comments.get(&id).cloned())
    }

    async fn insert(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&comment.post_id) {
            return Err(RepoError::Constraint("comments_post_id_fkey".to_string()));
        }
        tables.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn update(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        let slot = tables
            .comments
            .get_mut(&comment.id)
            .ok_or(RepoError::NotFound)?;
        *slot = comment.clone();
        Ok(comment)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.comments.remove(&id).ok_or(RepoError::NotFound)?;
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let tables = self.tables.read().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by_key(|c| (c.created_at, c.id));
        Ok(comments)
    }

    async fn count_by_post(&self, post_id: Uuid) -> Result<u64, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.comments.values().filter(|c| c.post_id == post_id).count() as u64)
    }
}

#[async_trait]
impl ReactionRepository for InMemoryStore {
    async fn upsert(
        &self,
        post_id: Uuid,
        user_id: Uuid,
        kind: ReactionKind,
    ) -> Result<Reaction, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&post_id) {
            return Err(RepoError::Constraint("reactions_post_id_fkey".to_string()));
        }

        let reaction = tables
            .reactions
            .entry((post_id, user_id))
            .and_modify(|r| r.kind = kind)
            .or_insert_with(|| Reaction {
                id: Uuid::new_v4(),
                post_id,
                user_id,
                kind,
                created_at: Utc::now(),
            });

        Ok(reaction.clone())
    }

    async fn find(&self, post_id: Uuid, user_id: Uuid) -> Result<Option<Reaction>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.reactions.get(&(post_id, user_id)).cloned())
    }

    async fn count_by_kind(&self, post_id: Uuid, kind: ReactionKind) -> Result<u64, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .reactions
            .values()
            .filter(|r| r.post_id == post_id && r.kind == kind)
            .count() as u64)
    }
}
