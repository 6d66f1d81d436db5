//! Post lifecycle: create, edit, delete, and the detail view.

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::domain::{Actor, Comment, Post, VoteTally};
use crate::error::DomainError;
use crate::policy::{self, Outcome};
use crate::ports::{BaseRepository, CommentRepository, PostRepository};
use crate::services::ReactionEngine;
use crate::validation::PostInput;

/// Everything shown on a post's page.
#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    pub post: Post,
    pub comments: Vec<Comment>,
    pub votes: VoteTally,
}

#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    reactions: ReactionEngine,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
        reactions: ReactionEngine,
    ) -> Self {
        Self {
            posts,
            comments,
            reactions,
        }
    }

    pub async fn get_post(&self, post_id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", post_id))
    }

    pub async fn post_detail(&self, post_id: Uuid) -> Result<PostDetail, DomainError> {
        let post = self.get_post(post_id).await?;
        let comments = self.comments.find_by_post(post_id).await?;
        let votes = self.reactions.tally(post_id).await?;

        Ok(PostDetail {
            post,
            comments,
            votes,
        })
    }

    /// Publish a new post authored by `actor`. Only staff may do this.
    pub async fn create_post(
        &self,
        actor: &Actor,
        input: PostInput,
    ) -> Result<Outcome<Post>, DomainError> {
        let author_id = match actor.id() {
            Some(id) if policy::can_create_post(actor) => id,
            _ => {
                tracing::info!(actor = ?actor.id(), "Post creation refused: not staff");
                return Ok(denied(actor));
            }
        };

        input.validate()?;

        let post = self
            .posts
            .insert(Post::new(author_id, input.title, input.content))
            .await?;
        tracing::info!(post_id = %post.id, %author_id, "Post created");

        Ok(Outcome::Applied(post))
    }

    /// Replace a post's title and content. Anyone but the author gets a
    /// denial and the post is left as it was.
    pub async fn edit_post(
        &self,
        actor: &Actor,
        post_id: Uuid,
        input: PostInput,
    ) -> Result<Outcome<Post>, DomainError> {
        let mut post = self.get_post(post_id).await?;

        if !policy::can_edit_post(actor, &post) {
            tracing::info!(%post_id, actor = ?actor.id(), "Post edit refused: not the author");
            return Ok(denied(actor));
        }

        input.validate()?;

        post.revise(input.title, input.content);
        let post = self.posts.update(post).await?;
        tracing::info!(%post_id, "Post updated");

        Ok(Outcome::Applied(post))
    }

    /// Remove a post together with its comments and reactions.
    pub async fn delete_post(&self, actor: &Actor, post_id: Uuid) -> Result<Outcome<()>, DomainError> {
        let post = self.get_post(post_id).await?;

        if !policy::can_delete_post(actor, &post) {
            tracing::info!(%post_id, actor = ?actor.id(), "Post delete refused: not the author");
            return Ok(denied(actor));
        }

        self.posts.delete(post_id).await?;
        tracing::info!(%post_id, "Post deleted");

        Ok(Outcome::Applied(()))
    }
}

fn denied<T>(actor: &Actor) -> Outcome<T> {
    Outcome::Denied(policy::Denial::for_actor(actor))
}
