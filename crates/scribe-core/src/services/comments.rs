//! Comment lifecycle.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Actor, Comment};
use crate::error::{DomainError, RepoError};
use crate::policy::{self, Denial, Outcome};
use crate::ports::{BaseRepository, CommentRepository, PostRepository};
use crate::validation::CommentInput;

#[derive(Clone)]
pub struct CommentService {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
}

impl CommentService {
    pub fn new(posts: Arc<dyn PostRepository>, comments: Arc<dyn CommentRepository>) -> Self {
        Self { posts, comments }
    }

    pub async fn add_comment(
        &self,
        actor: &Actor,
        post_id: Uuid,
        input: CommentInput,
    ) -> Result<Outcome<Comment>, DomainError> {
        let author_id = match actor.id() {
            Some(id) if policy::can_comment(actor) => id,
            _ => return Ok(Outcome::Denied(Denial::LoginRequired)),
        };

        if self.posts.find_by_id(post_id).await?.is_none() {
            return Err(DomainError::not_found("Post", post_id));
        }

        input.validate()?;

        let comment = self
            .comments
            .insert(Comment::new(author_id, post_id, input.content))
            .await?;
        tracing::info!(%post_id, comment_id = %comment.id, %author_id, "Comment added");

        Ok(Outcome::Applied(comment))
    }

    /// Delete a comment on `post_id` if `actor` wrote it.
    ///
    /// `Applied(true)` means a row was removed, `Applied(false)` that there was
    /// no such comment on that post. Callers should answer a denial exactly as
    /// they answer `Applied(false)`.
    pub async fn delete_comment(
        &self,
        actor: &Actor,
        post_id: Uuid,
        comment_id: Uuid,
    ) -> Result<Outcome<bool>, DomainError> {
        if !actor.is_authenticated() {
            return Ok(Outcome::Denied(Denial::LoginRequired));
        }

        let comment = match self.comments.find_by_id(comment_id).await? {
            Some(comment) if comment.post_id == post_id => comment,
            _ => {
                tracing::debug!(%post_id, %comment_id, "Comment delete: nothing to delete");
                return Ok(Outcome::Applied(false));
            }
        };

        if !policy::can_delete_comment(actor, &comment) {
            tracing::info!(%comment_id, actor = ?actor.id(), "Comment delete refused: not the author");
            return Ok(Outcome::Denied(Denial::NotPermitted));
        }

        match self.comments.delete(comment_id).await {
            Ok(()) => {}
            // Already gone.
            Err(RepoError::NotFound) => return Ok(Outcome::Applied(false)),
            Err(e) => return Err(e.into()),
        }
        tracing::info!(%post_id, %comment_id, "Comment deleted");

        Ok(Outcome::Applied(true))
    }
}
