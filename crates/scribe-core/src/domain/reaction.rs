use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// The two votes a user can cast on a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionKind {
    Upvote,
    Downvote,
}

impl ReactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReactionKind::Upvote => "upvote",
            ReactionKind::Downvote => "downvote",
        }
    }
}

impl fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReactionKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upvote" => Ok(ReactionKind::Upvote),
            "downvote" => Ok(ReactionKind::Downvote),
            other => Err(DomainError::InvalidReactionKind(other.to_string())),
        }
    }
}

/// Reaction entity. At most one exists per (post, user).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub kind: ReactionKind,
    pub created_at: DateTime<Utc>,
}

impl Reaction {
    pub fn new(post_id: Uuid, user_id: Uuid, kind: ReactionKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            post_id,
            user_id,
            kind,
            created_at: Utc::now(),
        }
    }
}

/// Aggregate vote counts for one post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    pub upvotes: u64,
    pub downvotes: u64,
}

impl VoteTally {
    pub fn score(&self) -> i64 {
        self.upvotes as i64 - self.downvotes as i64
    }
}
