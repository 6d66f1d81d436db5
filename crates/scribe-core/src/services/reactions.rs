//! Reaction engine - one vote per user per post, counted on demand.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Actor, ReactionKind, VoteTally};
use crate::error::DomainError;
use crate::policy::{self, Denial, Outcome};
use crate::ports::{BaseRepository, PostRepository, ReactionRepository};

#[derive(Clone)]
pub struct ReactionEngine {
    posts: Arc<dyn PostRepository>,
    reactions: Arc<dyn ReactionRepository>,
}

impl ReactionEngine {
    pub fn new(posts: Arc<dyn PostRepository>, reactions: Arc<dyn ReactionRepository>) -> Self {
        Self { posts, reactions }
    }

    /// Record `actor`'s vote on a post, replacing any earlier vote, and
    /// return the post's fresh tally.
    pub async fn apply_reaction(
        &self,
        actor: &Actor,
        post_id: Uuid,
        kind: ReactionKind,
    ) -> Result<Outcome<VoteTally>, DomainError> {
        let user_id = match actor.id() {
            Some(id) if policy::can_react(actor) => id,
            _ => {
                tracing::debug!(%post_id, "Anonymous reaction refused");
                return Ok(Outcome::Denied(Denial::for_actor(actor)));
            }
        };

        if self.posts.find_by_id(post_id).await?.is_none() {
            return Err(DomainError::not_found("Post", post_id));
        }

        let reaction = self.reactions.upsert(post_id, user_id, kind).await?;
        tracing::info!(
            %post_id,
            %user_id,
            reaction_id = %reaction.id,
            kind = %reaction.kind,
            "Reaction recorded"
        );

        Ok(Outcome::Applied(self.tally(post_id).await?))
    }

    /// Current vote counts, recomputed from the stored reactions.
    pub async fn tally(&self, post_id: Uuid) -> Result<VoteTally, DomainError> {
        let upvotes = self
            .reactions
            .count_by_kind(post_id, ReactionKind::Upvote)
            .await?;
        let downvotes = self
            .reactions
            .count_by_kind(post_id, ReactionKind::Downvote)
            .await?;

        Ok(VoteTally { upvotes, downvotes })
    }
}
