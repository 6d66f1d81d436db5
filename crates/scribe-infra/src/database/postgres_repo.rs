//! PostgreSQL repository implementations.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{LikeExpr, OnConflict};
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    Select, Set,
};
use uuid::Uuid;

use scribe_core::domain::{Comment, Post, Reaction, ReactionKind, User};
use scribe_core::error::RepoError;
use scribe_core::ports::{
    CommentRepository, PostFilter, PostRepository, ReactionRepository, UserRepository,
};

use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::reaction::{self, Entity as ReactionEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, repo_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

/// PostgreSQL reaction repository.
pub type PostgresReactionRepository = PostgresBaseRepository<ReactionEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(%username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.map(Into::into))
    }
}

/// Escape LIKE wildcards so the query text matches literally.
fn like_pattern(query: &str) -> LikeExpr {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    LikeExpr::new(escaped).escape('\\')
}

/// Posts matching `filter`: title OR content contains the query.
pub(crate) fn filtered_posts(filter: &PostFilter) -> Select<PostEntity> {
    let mut select = PostEntity::find();
    if let Some(query) = &filter.query {
        select = select.filter(
            Condition::any()
                .add(post::Column::Title.like(like_pattern(query)))
                .add(post::Column::Content.like(like_pattern(query))),
        );
    }
    select
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn search(
        &self,
        filter: &PostFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError> {
        let result = filtered_posts(filter)
            .order_by_asc(post::Column::CreatedAt)
            .order_by_asc(post::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn count(&self, filter: &PostFilter) -> Result<u64, RepoError> {
        filtered_posts(filter).count(&self.db).await.map_err(repo_err)
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let result = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_asc(comment::Column::CreatedAt)
            .order_by_asc(comment::Column::Id)
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn count_by_post(&self, post_id: Uuid) -> Result<u64, RepoError> {
        CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .count(&self.db)
            .await
            .map_err(repo_err)
    }
}

#[async_trait]
impl ReactionRepository for PostgresReactionRepository {
    async fn upsert(
        &self,
        post_id: Uuid,
        user_id: Uuid,
        kind: ReactionKind,
    ) -> Result<Reaction, RepoError> {
        let row = reaction::ActiveModel {
            id: Set(Uuid::new_v4()),
            post_id: Set(post_id),
            user_id: Set(user_id),
            kind: Set(kind.into()),
            created_at: Set(Utc::now().into()),
        };

        // Relies on the unique index over (post_id, user_id).
        ReactionEntity::insert(row)
            .on_conflict(
                OnConflict::columns([reaction::Column::PostId, reaction::Column::UserId])
                    .update_column(reaction::Column::Kind)
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(repo_err)?;

        self.find(post_id, user_id)
            .await?
            .ok_or(RepoError::NotFound)
    }

    async fn find(&self, post_id: Uuid, user_id: Uuid) -> Result<Option<Reaction>, RepoError> {
        let result = ReactionEntity::find()
            .filter(reaction::Column::PostId.eq(post_id))
            .filter(reaction::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.map(Into::into))
    }

    async fn count_by_kind(&self, post_id: Uuid, kind: ReactionKind) -> Result<u64, RepoError> {
        ReactionEntity::find()
            .filter(reaction::Column::PostId.eq(post_id))
            .filter(reaction::Column::Kind.eq(reaction::Kind::from(kind)))
            .count(&self.db)
            .await
            .map_err(repo_err)
    }
}
